use crate::analysis_response::{AnalysisResponse, ApiError, ExtractResponse, HealthResponse};
use crate::upload_form::{rejected_form, UploadForm};
use crate::utils::{count_words, head_graphemes, tail_graphemes};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use pdf_analyzer::{
    AnalysisMode, AnalysisRequest, AnalysisService, AnalyzerError, ErrorCategory,
    ExtractedDocument,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub const SERVICE_NAME: &str = "AI PDF Analyzer";

/// Headroom for multipart boundaries and the small text fields around the file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub type AppState = Arc<AnalysisService>;

pub fn create_router(service: AppState) -> Router {
    let body_limit = service.max_upload_mb() * 1024 * 1024 + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health_check))
        .route("/upload/summary", post(upload_summary))
        .route("/upload/questions", post(upload_questions))
        .route("/test/extract", post(test_extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

async fn upload_summary(
    State(service): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    analyze_upload(service, multipart, AnalysisMode::Summary).await
}

async fn upload_questions(
    State(service): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    analyze_upload(service, multipart, AnalysisMode::Questions).await
}

async fn analyze_upload(
    service: AppState,
    multipart: Result<Multipart, MultipartRejection>,
    mode: AnalysisMode,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    log::info!("[{}] POST /upload/{}", request_id, mode);

    match run_analysis(&service, multipart, mode).await {
        Ok(response) => {
            log::info!("[{}] {} completed", request_id, mode);
            Ok(Json(response))
        }
        Err(error) => Err(log_failure(request_id, error)),
    }
}

async fn run_analysis(
    service: &AnalysisService,
    multipart: Result<Multipart, MultipartRejection>,
    mode: AnalysisMode,
) -> Result<AnalysisResponse, AnalyzerError> {
    let multipart = multipart.map_err(rejected_form)?;
    let mut form = UploadForm::from_multipart(multipart, service.max_upload_mb()).await?;
    let upload = form.take_file()?;
    let language = form.language();
    let request = match mode {
        AnalysisMode::Summary => AnalysisRequest::summary(language),
        AnalysisMode::Questions => AnalysisRequest::questions(language, form.question_count()?),
    };

    let outcome = service.analyze(&upload, &request).await?;
    Ok(AnalysisResponse::new(
        outcome,
        request.language,
        request.question_count,
    ))
}

async fn test_extract(
    State(service): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    log::info!("[{}] POST /test/extract", request_id);

    let document = run_extraction(&service, multipart)
        .await
        .map_err(|error| log_failure(request_id, error))?;

    Ok(Json(ExtractResponse {
        success: true,
        page_count: document.page_count,
        total_characters: document.char_count(),
        total_words: count_words(&document.content),
        first_500_chars: head_graphemes(&document.content, 500),
        last_500_chars: tail_graphemes(&document.content, 500),
        filename: document.filename,
    }))
}

async fn run_extraction(
    service: &AnalysisService,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ExtractedDocument, AnalyzerError> {
    let multipart = multipart.map_err(rejected_form)?;
    let mut form = UploadForm::from_multipart(multipart, service.max_upload_mb()).await?;
    let upload = form.take_file()?;
    service.extract(&upload).await
}

fn log_failure(request_id: Uuid, error: AnalyzerError) -> ApiError {
    match error.category() {
        ErrorCategory::Input => log::warn!("[{}] rejected: {}", request_id, error),
        ErrorCategory::Transient => log::error!("[{}] provider failure: {}", request_id, error),
        ErrorCategory::Configuration => {
            log::error!("[{}] service misconfigured: {}", request_id, error)
        }
    }
    ApiError(error)
}
