use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use pdf_analyzer::{
    AnalyzerError, Upload, ValidationError, DEFAULT_LANGUAGE, DEFAULT_QUESTION_COUNT,
    MAX_QUESTION_COUNT,
};

/// Fields accepted by the upload routes. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Upload>,
    pub language: Option<String>,
    pub num_questions: Option<String>,
}

impl UploadForm {
    /// Reads the whole form, refusing a `file` part larger than `max_upload_mb`
    /// as soon as the limit is crossed.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_upload_mb: usize,
    ) -> Result<Self, AnalyzerError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_upload_mb))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = Some(read_file(field, max_upload_mb).await?),
                "language" => form.language = Some(read_text(field, &name, max_upload_mb).await?),
                "num_questions" => {
                    form.num_questions = Some(read_text(field, &name, max_upload_mb).await?)
                }
                other => log::debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self) -> Result<Upload, ValidationError> {
        self.file.take().ok_or(ValidationError::MissingFile)
    }

    pub fn language(&self) -> String {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    pub fn question_count(&self) -> Result<usize, ValidationError> {
        let Some(raw) = self.num_questions.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
        else {
            return Ok(DEFAULT_QUESTION_COUNT);
        };

        let count: i64 = raw.parse().map_err(|_| ValidationError::InvalidField {
            field: "num_questions".to_string(),
            reason: format!("'{raw}' is not an integer"),
        })?;

        if count < 1 || count > MAX_QUESTION_COUNT as i64 {
            return Err(ValidationError::QuestionCount {
                max: MAX_QUESTION_COUNT,
            });
        }
        Ok(count as usize)
    }
}

async fn read_file(mut field: Field<'_>, max_upload_mb: usize) -> Result<Upload, AnalyzerError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| "upload.pdf".to_string());
    let content_type = field.content_type().map(str::to_string);
    let limit = max_upload_mb * 1024 * 1024;

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_upload_mb))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(ValidationError::TooLarge {
                limit_mb: max_upload_mb,
            }
            .into());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(Upload {
        filename,
        content_type,
        bytes,
    })
}

async fn read_text(
    field: Field<'_>,
    name: &str,
    max_upload_mb: usize,
) -> Result<String, AnalyzerError> {
    field.text().await.map_err(|e| match multipart_error(e, max_upload_mb) {
        AnalyzerError::Validation(ValidationError::InvalidField { reason, .. }) => {
            AnalyzerError::from(ValidationError::InvalidField {
                field: name.to_string(),
                reason,
            })
        }
        other => other,
    })
}

/// A request that is not `multipart/form-data` at all.
pub fn rejected_form(rejection: MultipartRejection) -> ValidationError {
    ValidationError::InvalidField {
        field: "multipart".to_string(),
        reason: rejection.body_text(),
    }
}

fn multipart_error(error: MultipartError, max_upload_mb: usize) -> AnalyzerError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ValidationError::TooLarge {
            limit_mb: max_upload_mb,
        }
        .into();
    }
    ValidationError::InvalidField {
        field: "multipart".to_string(),
        reason: error.body_text(),
    }
    .into()
}
