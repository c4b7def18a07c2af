use crate::error::AnalyzerError;
use crate::models::*;
use regex::Regex;
use std::sync::OnceLock;

pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn format(mode: AnalysisMode, completion: &str) -> Result<AnalysisResult, AnalyzerError> {
        match mode {
            AnalysisMode::Summary => Self::format_summary(completion).map(AnalysisResult::Summary),
            AnalysisMode::Questions => {
                Self::parse_questions(completion).map(AnalysisResult::Questions)
            }
        }
    }

    pub fn format_summary(completion: &str) -> Result<String, AnalyzerError> {
        let summary = completion.trim();
        if summary.is_empty() {
            return Err(AnalyzerError::FormattingAnomaly(
                "the provider returned an empty summary".to_string(),
            ));
        }
        Ok(summary.to_string())
    }

    /// One question per non-empty line, numbering and bullet prefixes removed, order kept.
    pub fn parse_questions(completion: &str) -> Result<Vec<String>, AnalyzerError> {
        let questions: Vec<String> = completion
            .lines()
            .map(|line| Self::strip_list_marker(line.trim()))
            .filter(|question| !question.is_empty())
            .map(str::to_string)
            .collect();

        if questions.is_empty() {
            return Err(AnalyzerError::FormattingAnomaly(
                "no questions could be parsed from the provider output".to_string(),
            ));
        }

        log::info!("Parsed {} questions", questions.len());
        Ok(questions)
    }

    fn strip_list_marker(line: &str) -> &str {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        let re = MARKER.get_or_init(|| {
            Regex::new(r"^(?:\d+[.):]|[-*•]|(?i:q(?:uestion)?)\s*\d+[.):])(?:\s+|$)")
                .expect("valid list marker regex")
        });
        match re.find(line) {
            Some(marker) => line[marker.end()..].trim(),
            None => line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_questions_are_stripped_in_order() {
        let questions = ResponseFormatter::parse_questions("1. Q1?\n2. Q2?\n3. Q3?").unwrap();
        assert_eq!(questions, vec!["Q1?", "Q2?", "Q3?"]);
    }

    #[test]
    fn blank_lines_and_mixed_markers_are_handled() {
        let raw = "\n1) What is osmosis?\n\n- Define diffusion.\n* Why do cells divide?\n• Name two organelles.\nQuestion 5: What is ATP?\n10. What is a gene?\n";
        let questions = ResponseFormatter::parse_questions(raw).unwrap();
        assert_eq!(
            questions,
            vec![
                "What is osmosis?",
                "Define diffusion.",
                "Why do cells divide?",
                "Name two organelles.",
                "What is ATP?",
                "What is a gene?",
            ]
        );
    }

    #[test]
    fn unnumbered_lines_are_kept_verbatim() {
        let questions =
            ResponseFormatter::parse_questions("Q1?\nWhat happened in 1914?").unwrap();
        assert_eq!(questions, vec!["Q1?", "What happened in 1914?"]);
    }

    #[test]
    fn leading_numbers_in_question_text_survive() {
        let raw = "1914-1918: What changed in Europe?\n-5 degrees: why does water freeze?\n1.5 million people lived where?";
        let questions = ResponseFormatter::parse_questions(raw).unwrap();
        assert_eq!(
            questions,
            vec![
                "1914-1918: What changed in Europe?",
                "-5 degrees: why does water freeze?",
                "1.5 million people lived where?",
            ]
        );
    }

    #[test]
    fn duplicates_are_not_removed() {
        let questions = ResponseFormatter::parse_questions("1. Same?\n2. Same?").unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn empty_question_output_is_an_anomaly() {
        let err = ResponseFormatter::parse_questions(" \n\n 1. \n").unwrap_err();
        assert!(matches!(err, AnalyzerError::FormattingAnomaly(_)));
    }

    #[test]
    fn summary_is_trimmed_and_blank_summary_rejected() {
        assert_eq!(
            ResponseFormatter::format(AnalysisMode::Summary, "  Cells divide.\n").unwrap(),
            AnalysisResult::Summary("Cells divide.".to_string())
        );
        assert!(matches!(
            ResponseFormatter::format(AnalysisMode::Summary, "   "),
            Err(AnalyzerError::FormattingAnomaly(_))
        ));
    }
}
