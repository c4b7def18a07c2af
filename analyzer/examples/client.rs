//! Exercises a running analyzer server.
//!
//! ```text
//! cargo run -p pdf_analyzer --example client -- path/to/document.pdf [http://127.0.0.1:8000]
//! ```

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

fn pdf_form(filename: &str, bytes: Vec<u8>) -> Result<Form> {
    let part = Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str("application/pdf")?;
    Ok(Form::new().part("file", part).text("language", "English"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: client <file.pdf> [base_url]");
    };
    let base_url = args.next().unwrap_or_else(|| "http://127.0.0.1:8000".to_string());

    let bytes = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;
    let filename = std::path::Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "document.pdf".to_string());

    let client = Client::new();

    println!("Health Check:");
    let health: serde_json::Value = client
        .get(format!("{base_url}/health"))
        .send()
        .await?
        .json()
        .await?;
    println!("{}", serde_json::to_string_pretty(&health)?);

    println!("\nSummary:");
    let response = client
        .post(format!("{base_url}/upload/summary"))
        .multipart(pdf_form(&filename, bytes.clone())?)
        .send()
        .await?;
    println!("Status: {}", response.status());
    let summary: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\nQuestions:");
    let form = pdf_form(&filename, bytes)?.text("num_questions", "5");
    let response = client
        .post(format!("{base_url}/upload/questions"))
        .multipart(form)
        .send()
        .await?;
    println!("Status: {}", response.status());
    let questions: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&questions)?);

    Ok(())
}
