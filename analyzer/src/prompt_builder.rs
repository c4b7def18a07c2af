use crate::config::AnalyzerConfig;
use crate::models::*;

/// Turns extracted text into the instruction payload for one analysis mode.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_input_chars: usize,
    summary_max_tokens: u32,
    questions_max_tokens: u32,
    temperature: f32,
}

impl PromptBuilder {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            max_input_chars: config.max_input_chars,
            summary_max_tokens: config.summary_max_tokens,
            questions_max_tokens: config.questions_max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn build(&self, text: &str, request: &AnalysisRequest) -> CompletionPrompt {
        let text_to_send = truncate_chars(text, self.max_input_chars);
        log::info!(
            "Sending {} characters to the completion provider for {}",
            text_to_send.chars().count(),
            request.mode
        );

        match request.mode {
            AnalysisMode::Summary => CompletionPrompt {
                system: self.summary_system_prompt(&request.language),
                user: self.summary_user_prompt(text_to_send),
                max_tokens: self.summary_max_tokens,
                temperature: self.temperature,
            },
            AnalysisMode::Questions => CompletionPrompt {
                system: self.questions_system_prompt(&request.language, request.question_count),
                user: self.questions_user_prompt(text_to_send, request.question_count),
                max_tokens: self.questions_max_tokens,
                temperature: self.temperature,
            },
        }
    }

    fn summary_system_prompt(&self, language: &str) -> String {
        format!(
            r#"You are an academic assistant. Create detailed, comprehensive summaries of academic content.

IMPORTANT RULES:
1. IGNORE all cover pages, title pages, author information, publisher details, and copyright information
2. Focus ONLY on the main academic content (chapters, topics, concepts, theories)
3. Skip introductory metadata and go straight to the substantive material
4. Provide a concise summary that covers key topics, concepts, and important points
5. Generate the summary in {language} language."#
        )
    }

    fn summary_user_prompt(&self, text: &str) -> String {
        format!(
            r#"Create an academic summary of the following document content.

SKIP: title pages, author names, publishers, copyright info, introductions about the book itself
FOCUS ON: main topics, key concepts, theories, important information from the actual content

Text to summarize:
{text}"#
        )
    }

    fn questions_system_prompt(&self, language: &str, count: usize) -> String {
        format!(
            r#"You are an academic assistant. Generate thoughtful study questions based on the main academic content.

IMPORTANT RULES:
1. IGNORE cover pages, author information, publisher details, and metadata
2. Focus questions on the ACTUAL CONTENT (topics, concepts, theories, key information)
3. Create questions that test understanding of the material
4. Return exactly {count} questions, each on a new line
5. Generate the questions in {language} language."#
        )
    }

    fn questions_user_prompt(&self, text: &str, count: usize) -> String {
        format!(
            r#"Generate exactly {count} study questions based on the main content of this text.

SKIP: questions about authors, publishers, book title, metadata
FOCUS ON: questions about actual topics, concepts, and information in the content

Text:
{text}"#
        )
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn builder() -> PromptBuilder {
        let vars: HashMap<String, String> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_INPUT_CHARS", "40"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        PromptBuilder::new(&AnalyzerConfig::from_map(&vars).unwrap())
    }

    #[test]
    fn summary_prompt_uses_summary_budget_and_language() {
        let prompt = builder().build("Mitochondria produce ATP.", &AnalysisRequest::summary("Spanish"));
        assert_eq!(prompt.max_tokens, 1500);
        assert!(prompt.system.contains("Spanish"));
        assert!(prompt.user.ends_with("Mitochondria produce ATP."));
    }

    #[test]
    fn questions_prompt_asks_for_requested_count() {
        let prompt = builder().build("Cells divide.", &AnalysisRequest::questions("English", 7));
        assert_eq!(prompt.max_tokens, 1000);
        assert!(prompt.system.contains("exactly 7 questions, each on a new line"));
        assert!(prompt.user.contains("exactly 7 study questions"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let request = AnalysisRequest::questions("English", 5);
        assert_eq!(builder().build("same", &request), builder().build("same", &request));
    }

    #[test]
    fn long_text_is_truncated_before_prompting() {
        let text = "a".repeat(100);
        let prompt = builder().build(&text, &AnalysisRequest::summary("English"));
        assert!(prompt.user.ends_with(&"a".repeat(40)));
        assert!(!prompt.user.contains(&"a".repeat(41)));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        assert_eq!(truncate_chars("ünïcödé", 3), "ünï");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
