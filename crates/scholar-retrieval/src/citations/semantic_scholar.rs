//! Semantic Scholar batch lookups with bounded retries.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinSet;

use scholar_core::config::defaults::{CITATION_BACKOFF_BASE_MS, CITATION_RETRY_ATTEMPTS};
use scholar_core::errors::CitationError;
use scholar_core::ScholarResult;

use super::CitationCounts;

pub struct SemanticScholarProvider {
    http: reqwest::Client,
    base_url: String,
    max_batch_size: usize,
}

#[derive(Deserialize)]
struct CitationRow {
    #[serde(rename = "citationCount")]
    citation_count: Option<u64>,
}

/// "arxiv/2401.00001" becomes the provider's "ARXIV:2401.00001" form.
/// Ids without a source prefix pass through unchanged.
fn normalize_id(fqn: &str) -> String {
    match fqn.split_once('/') {
        Some((source, id)) => format!("{}:{id}", source.to_uppercase()),
        None => fqn.to_string(),
    }
}

impl SemanticScholarProvider {
    pub fn new(url: &str, api_key: Option<&str>, max_batch_size: usize) -> ScholarResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(key).map_err(|e| {
                CitationError::Transport {
                    message: format!("invalid api key header: {e}"),
                }
            })?;
            headers.insert("x-api-key", value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CitationError::Transport {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            max_batch_size,
        })
    }

    pub async fn citation_counts(&self, fqns: &[String]) -> ScholarResult<CitationCounts> {
        if fqns.is_empty() {
            return Ok(CitationCounts::new());
        }

        // Chunks run concurrently; each retries independently.
        let mut tasks: JoinSet<ScholarResult<Vec<(String, Option<u64>)>>> = JoinSet::new();
        for chunk in fqns.chunks(self.max_batch_size) {
            let http = self.http.clone();
            let url = format!("{}/graph/v1/paper/batch", self.base_url);
            let chunk: Vec<String> = chunk.to_vec();
            tasks.spawn(async move { fetch_chunk_with_retry(http, url, chunk).await });
        }

        let mut counts = CitationCounts::with_capacity(fqns.len());
        while let Some(joined) = tasks.join_next().await {
            let chunk_counts = joined.map_err(|e| CitationError::Transport {
                message: format!("lookup task panicked: {e}"),
            })??;
            counts.extend(chunk_counts);
        }
        Ok(counts)
    }
}

async fn fetch_chunk_with_retry(
    http: reqwest::Client,
    url: String,
    fqns: Vec<String>,
) -> ScholarResult<Vec<(String, Option<u64>)>> {
    let mut last_error = String::new();
    for attempt in 0..CITATION_RETRY_ATTEMPTS {
        if attempt > 0 {
            let delay = CITATION_BACKOFF_BASE_MS * (1 << (attempt - 1));
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match fetch_chunk(&http, &url, &fqns).await {
            Ok(counts) => return Ok(counts),
            Err(e) => {
                tracing::warn!(attempt, error = %e, "citation chunk lookup failed");
                last_error = e.to_string();
            }
        }
    }
    Err(CitationError::RetriesExhausted {
        attempts: CITATION_RETRY_ATTEMPTS,
        message: last_error,
    }
    .into())
}

async fn fetch_chunk(
    http: &reqwest::Client,
    url: &str,
    fqns: &[String],
) -> ScholarResult<Vec<(String, Option<u64>)>> {
    let ids: Vec<String> = fqns.iter().map(|fqn| normalize_id(fqn)).collect();
    let response = http
        .post(url)
        .query(&[("fields", "citationCount")])
        .json(&json!({ "ids": ids }))
        .send()
        .await
        .map_err(|e| CitationError::Transport {
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CitationError::Transport {
            message: format!("status {status}"),
        }
        .into());
    }

    // Unknown ids come back as nulls, position-aligned with the request.
    let rows: Vec<Option<CitationRow>> =
        response
            .json()
            .await
            .map_err(|e| CitationError::MalformedResponse {
                reason: e.to_string(),
            })?;
    if rows.len() != fqns.len() {
        return Err(CitationError::MalformedResponse {
            reason: format!("{} rows for {} ids", rows.len(), fqns.len()),
        }
        .into());
    }

    Ok(fqns
        .iter()
        .zip(rows)
        .map(|(fqn, row)| (fqn.clone(), row.and_then(|r| r.citation_count)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqn_normalizes_to_uppercase_source_prefix() {
        assert_eq!(normalize_id("arxiv/2401.00001"), "ARXIV:2401.00001");
        assert_eq!(normalize_id("acl/P19-1001"), "ACL:P19-1001");
    }

    #[test]
    fn id_without_source_passes_through() {
        assert_eq!(normalize_id("bare-id"), "bare-id");
    }

    #[test]
    fn id_with_slashes_in_the_tail_splits_once() {
        assert_eq!(normalize_id("arxiv/hep-ph/0201001"), "ARXIV:hep-ph/0201001");
    }
}
