use crate::config::AnalyzerConfig;
use crate::document_processor::{validate_upload, Extractor};
use crate::error::AnalyzerError;
use crate::models::*;
use crate::openai_service::Completer;
use crate::prompt_builder::PromptBuilder;
use crate::response_formatter::ResponseFormatter;
use std::sync::Arc;

const PREVIEW_CHARS: usize = 200;

/// Runs one upload through validate → extract → prompt → complete → format.
pub struct AnalysisService {
    extractor: Arc<dyn Extractor>,
    completer: Arc<dyn Completer>,
    prompt_builder: PromptBuilder,
    max_upload_mb: usize,
}

impl AnalysisService {
    pub fn new(
        config: &AnalyzerConfig,
        extractor: Arc<dyn Extractor>,
        completer: Arc<dyn Completer>,
    ) -> Self {
        Self {
            extractor,
            completer,
            prompt_builder: PromptBuilder::new(config),
            max_upload_mb: config.max_upload_mb,
        }
    }

    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_mb
    }

    /// Validates and extracts without contacting the provider.
    pub async fn extract(&self, upload: &Upload) -> Result<ExtractedDocument, AnalyzerError> {
        validate_upload(upload, self.max_upload_mb)?;
        self.extractor.extract(&upload.filename, &upload.bytes).await
    }

    pub async fn analyze(
        &self,
        upload: &Upload,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalyzerError> {
        let start_time = std::time::Instant::now();

        let document = self.extract(upload).await?;
        let prompt = self.prompt_builder.build(&document.content, request);
        let completion = self.completer.complete(&prompt).await?;
        let result = ResponseFormatter::format(request.mode, &completion)?;

        log::info!(
            "Generated {} for {} in {} ms",
            request.mode,
            document.filename,
            start_time.elapsed().as_millis()
        );

        Ok(AnalysisOutcome {
            filename: document.filename.clone(),
            result,
            extracted_chars: document.char_count(),
            text_preview: text_preview(&document.content, PREVIEW_CHARS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeExtractor {
        text: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        async fn extract(
            &self,
            filename: &str,
            _bytes: &[u8],
        ) -> Result<ExtractedDocument, AnalyzerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.text.is_empty() {
                return Err(AnalyzerError::ExtractionEmpty);
            }
            Ok(ExtractedDocument {
                filename: filename.to_string(),
                content: self.text.clone(),
                page_count: 1,
            })
        }
    }

    enum Reply {
        Text(&'static str),
        Timeout,
    }

    struct FakeCompleter {
        reply: Reply,
        prompts: Mutex<Vec<CompletionPrompt>>,
    }

    #[async_trait]
    impl Completer for FakeCompleter {
        async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, AnalyzerError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Timeout => Err(AnalyzerError::ProviderTimeout(
                    "no response within 60 seconds".into(),
                )),
            }
        }
    }

    fn setup(
        text: &str,
        reply: Reply,
    ) -> (AnalysisService, Arc<FakeExtractor>, Arc<FakeCompleter>) {
        let vars: HashMap<String, String> = [("OPENAI_API_KEY", "sk-test"), ("MAX_FILE_SIZE_MB", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = AnalyzerConfig::from_map(&vars).unwrap();
        let extractor = Arc::new(FakeExtractor {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        });
        let completer = Arc::new(FakeCompleter {
            reply,
            prompts: Mutex::new(Vec::new()),
        });
        let service = AnalysisService::new(&config, extractor.clone(), completer.clone());
        (service, extractor, completer)
    }

    fn pdf_upload(bytes: Vec<u8>) -> Upload {
        Upload {
            filename: "lecture.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes,
        }
    }

    #[tokio::test]
    async fn summary_flows_through_every_stage() {
        let (service, extractor, completer) =
            setup("Plants convert light into energy.", Reply::Text("Plants use light."));

        let outcome = service
            .analyze(&pdf_upload(b"%PDF".to_vec()), &AnalysisRequest::summary("English"))
            .await
            .unwrap();

        assert_eq!(outcome.filename, "lecture.pdf");
        assert_eq!(outcome.result, AnalysisResult::Summary("Plants use light.".into()));
        assert_eq!(outcome.extracted_chars, 33);
        assert_eq!(outcome.text_preview, "Plants convert light into energy.");
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
        let prompts = completer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("Plants convert light into energy."));
    }

    #[tokio::test]
    async fn questions_are_parsed_from_completion() {
        let (service, _, _) = setup("Text", Reply::Text("1. Q1?\n2. Q2?\n3. Q3?"));
        let outcome = service
            .analyze(&pdf_upload(b"%PDF".to_vec()), &AnalysisRequest::questions("English", 3))
            .await
            .unwrap();
        assert_eq!(
            outcome.result,
            AnalysisResult::Questions(vec!["Q1?".into(), "Q2?".into(), "Q3?".into()])
        );
    }

    #[tokio::test]
    async fn rejected_upload_never_reaches_extractor_or_provider() {
        let (service, extractor, completer) = setup("Text", Reply::Text("unused"));
        let upload = Upload {
            filename: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: b"hello".to_vec(),
        };

        let err = service
            .analyze(&upload, &AnalysisRequest::summary("English"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalyzerError::Validation(ValidationError::UnsupportedType(_))
        ));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
        assert!(completer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_extraction() {
        let (service, extractor, _) = setup("Text", Reply::Text("unused"));
        let upload = pdf_upload(vec![0u8; 1024 * 1024 + 1]);
        let err = service
            .analyze(&upload, &AnalysisRequest::summary("English"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Validation(ValidationError::TooLarge { limit_mb: 1 })
        ));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_document_skips_provider() {
        let (service, _, completer) = setup("", Reply::Text("unused"));
        let err = service
            .analyze(&pdf_upload(b"%PDF".to_vec()), &AnalysisRequest::summary("English"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::ExtractionEmpty));
        assert!(completer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_timeout_is_surfaced_after_a_single_call() {
        let (service, _, completer) = setup("Text", Reply::Timeout);
        let err = service
            .analyze(&pdf_upload(b"%PDF".to_vec()), &AnalysisRequest::summary("English"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(completer.prompts.lock().unwrap().len(), 1);
    }
}
