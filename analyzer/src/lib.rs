pub mod analysis_service;
pub mod config;
pub mod document_processor;
pub mod error;
pub mod models;
pub mod openai_service;
pub mod prompt_builder;
pub mod response_formatter;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use analysis_service::AnalysisService;
pub use config::{AnalyzerConfig, ConfigError};
pub use document_processor::{DocumentProcessor, Extractor};
pub use error::{AnalyzerError, ErrorCategory, ValidationError};
pub use models::*;
pub use openai_service::{Completer, OpenAiService};
pub use prompt_builder::PromptBuilder;
pub use response_formatter::ResponseFormatter;
