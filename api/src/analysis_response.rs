use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdf_analyzer::{AnalysisOutcome, AnalysisResult, AnalyzerError, ValidationError};
use serde::Serialize;

#[derive(Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub filename: String,
    pub summary: String,
    pub language: String,
    pub extracted_chars: usize,
    pub text_preview: String,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub filename: String,
    pub questions: Vec<String>,
    pub num_questions: usize,
    pub language: String,
    pub extracted_chars: usize,
    pub text_preview: String,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Summary(SummaryResponse),
    Questions(QuestionsResponse),
}

impl AnalysisResponse {
    pub fn new(outcome: AnalysisOutcome, language: String, num_questions: usize) -> Self {
        let AnalysisOutcome {
            filename,
            result,
            extracted_chars,
            text_preview,
        } = outcome;

        match result {
            AnalysisResult::Summary(summary) => AnalysisResponse::Summary(SummaryResponse {
                success: true,
                filename,
                summary,
                language,
                extracted_chars,
                text_preview,
            }),
            AnalysisResult::Questions(questions) => {
                AnalysisResponse::Questions(QuestionsResponse {
                    success: true,
                    filename,
                    questions,
                    num_questions,
                    language,
                    extracted_chars,
                    text_preview,
                })
            }
        }
    }
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub filename: String,
    pub page_count: usize,
    pub total_characters: usize,
    pub total_words: usize,
    pub first_500_chars: String,
    pub last_500_chars: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub detail: String,
    pub error: &'static str,
    pub category: &'static str,
    pub retryable: bool,
}

/// Every failure leaves a handler through this type.
pub struct ApiError(pub AnalyzerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AnalyzerError::Validation(ValidationError::UnsupportedType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AnalyzerError::Validation(ValidationError::TooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AnalyzerError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalyzerError::ExtractionEmpty
            | AnalyzerError::ExtractionFailure(_)
            | AnalyzerError::ProviderConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AnalyzerError::ProviderTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AnalyzerError::ProviderCall(_) | AnalyzerError::FormattingAnomaly(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            detail: self.0.to_string(),
            error: self.0.code(),
            category: self.0.category().as_str(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
