use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MAX_QUESTION_COUNT: usize = 50;

/// A PDF as it arrived over the wire, before any validation.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub filename: String,
    pub content: String,
    pub page_count: usize,
}

impl ExtractedDocument {
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Summary,
    Questions,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Summary => "summary",
            AnalysisMode::Questions => "questions",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    pub language: String,
    pub question_count: usize,
}

impl AnalysisRequest {
    pub fn summary(language: impl Into<String>) -> Self {
        Self {
            mode: AnalysisMode::Summary,
            language: language.into(),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn questions(language: impl Into<String>, question_count: usize) -> Self {
        Self {
            mode: AnalysisMode::Questions,
            language: language.into(),
            question_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Summary(String),
    Questions(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub filename: String,
    pub result: AnalysisResult,
    pub extracted_chars: usize,
    pub text_preview: String,
}

/// Everything the completion provider needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Returns the first `limit` characters of `text`, with `...` appended when cut.
pub fn text_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
