//! External advanced-optimizer client
//!
//! An optional collaborator (typically an ML-based service) consulted
//! before the local strategies for large inputs. Its result is only
//! accepted when the reported reduction clears the configured threshold;
//! any failure falls back to local strategies.

use frugal_core::RemoteSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    task_id: &'a str,
    content: &'a str,
}

/// Result reported by the remote optimizer
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteResult {
    pub optimized_content: String,
    pub reduction_percentage: f64,
}

/// Ask the remote optimizer to reduce `content`.
///
/// Returns `Ok(Some(..))` only when the service responded and its reported
/// reduction meets `reduction_threshold`; `Ok(None)` when the result was
/// rejected as insufficient.
pub async fn optimize_remote(
    settings: &RemoteSettings,
    reduction_threshold: f64,
    task_id: &str,
    content: &str,
) -> anyhow::Result<Option<RemoteResult>> {
    let client = reqwest::Client::new();

    let mut request = client
        .post(&settings.endpoint)
        .json(&RemoteRequest { task_id, content });
    if let Some(key) = &settings.api_key {
        request = request.header("x-api-key", key);
    }

    let response = request.send().await?.error_for_status()?;
    let result: RemoteResult = response.json().await?;

    if result.reduction_percentage < reduction_threshold {
        tracing::info!(
            task_id,
            reported = result.reduction_percentage,
            required = reduction_threshold,
            "remote optimization below reduction threshold, using local strategies"
        );
        return Ok(None);
    }

    // Never trust a "reduction" that grew the content
    if result.optimized_content.len() > content.len() {
        return Ok(None);
    }

    Ok(Some(result))
}
