use thiserror::Error;

/// Which party can fix a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something unusable; resubmitting the same input will fail again.
    Input,
    /// The provider or network misbehaved; the same request may succeed later.
    Transient,
    /// The service is misconfigured; an operator has to step in.
    Configuration,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Transient => "transient",
            ErrorCategory::Configuration => "configuration",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Only PDF files are allowed (received content-type: {0})")]
    UnsupportedType(String),
    #[error("File size exceeds {limit_mb} MB limit")]
    TooLarge { limit_mb: usize },
    #[error("Number of questions must be between 1 and {max}")]
    QuestionCount { max: usize },
    #[error("Invalid form field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No text could be extracted from the PDF. The PDF might be image-based or scanned.")]
    ExtractionEmpty,
    #[error("Error extracting text from PDF: {0}")]
    ExtractionFailure(String),
    #[error("Completion provider is misconfigured: {0}")]
    ProviderConfig(String),
    #[error("Completion provider call failed: {0}")]
    ProviderCall(String),
    #[error("Completion provider timed out: {0}")]
    ProviderTimeout(String),
    #[error("Completion provider returned unusable output: {0}")]
    FormattingAnomaly(String),
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::Validation(_)
            | AnalyzerError::ExtractionEmpty
            | AnalyzerError::ExtractionFailure(_) => ErrorCategory::Input,
            AnalyzerError::ProviderConfig(_) => ErrorCategory::Configuration,
            AnalyzerError::ProviderCall(_)
            | AnalyzerError::ProviderTimeout(_)
            | AnalyzerError::FormattingAnomaly(_) => ErrorCategory::Transient,
        }
    }

    /// Stable machine-readable code for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzerError::Validation(ValidationError::MissingFile) => "missing_file",
            AnalyzerError::Validation(ValidationError::UnsupportedType(_)) => "unsupported_type",
            AnalyzerError::Validation(ValidationError::TooLarge { .. }) => "file_too_large",
            AnalyzerError::Validation(ValidationError::QuestionCount { .. }) => {
                "invalid_question_count"
            }
            AnalyzerError::Validation(ValidationError::InvalidField { .. }) => "invalid_field",
            AnalyzerError::ExtractionEmpty => "no_text_found",
            AnalyzerError::ExtractionFailure(_) => "extraction_failed",
            AnalyzerError::ProviderConfig(_) => "provider_misconfigured",
            AnalyzerError::ProviderCall(_) => "provider_error",
            AnalyzerError::ProviderTimeout(_) => "provider_timeout",
            AnalyzerError::FormattingAnomaly(_) => "unusable_completion",
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}
