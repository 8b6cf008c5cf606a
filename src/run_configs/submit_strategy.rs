use crate::{
    models::submission::SubmissionRequest, run_configs::build_handler, utils::config::AppConfig,
};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::fs;

/// Submits the request described by a JSON file. `code_path`, when given,
/// replaces the inline `code` of the request.
pub async fn run(config: &AppConfig, request_path: &Path, code_path: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(request_path)
        .await
        .with_context(|| format!("Unable to read {}", request_path.display()))?;
    let mut request: SubmissionRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid submission request in {}", request_path.display()))?;

    if let Some(code_path) = code_path {
        request.params_mut().code = fs::read_to_string(code_path)
            .await
            .with_context(|| format!("Unable to read {}", code_path.display()))?;
    }

    let handler = build_handler(config).await?;

    match handler.submit(request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => Err(anyhow!("{} (status {})", e, e.status_code())),
    }
}
