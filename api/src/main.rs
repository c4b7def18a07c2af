mod analysis_response;
mod routes;
mod upload_form;
mod utils;

use pdf_analyzer::{AnalysisService, AnalyzerConfig, DocumentProcessor, OpenAiService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AnalyzerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded configuration: {:?}", config);

    let completer = match OpenAiService::new(&config) {
        Ok(completer) => Arc::new(completer),
        Err(e) => {
            log::error!("Failed to initialize completion provider: {}", e);
            std::process::exit(1);
        }
    };

    let service = AnalysisService::new(&config, Arc::new(DocumentProcessor::new()), completer);
    let app = routes::create_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    log::info!(
        "{} listening on {} (max upload {} MB)",
        routes::SERVICE_NAME,
        listener.local_addr()?,
        config.max_upload_mb
    );
    axum::serve(listener, app).await?;

    Ok(())
}
