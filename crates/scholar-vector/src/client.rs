//! REST client for a qdrant-style vector index.

use std::time::Duration;

use serde_json::{json, Value};

use scholar_core::config::VectorIndexConfig;
use scholar_core::errors::VectorIndexError;
use scholar_core::ScholarResult;

use crate::types::{FusionQuery, PaperPoint, ScoredPointId};
use crate::{IVectorIndex, DENSE_SPACE, SPARSE_ABSTRACT_SPACE, SPARSE_MODEL, SPARSE_TITLE_SPACE};

/// HTTP implementation of [`IVectorIndex`].
pub struct HttpVectorIndex {
    http: reqwest::Client,
    base_url: String,
}

impl HttpVectorIndex {
    pub fn new(config: &VectorIndexConfig) -> ScholarResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(transport_err)?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    async fn check_status(response: reqwest::Response) -> ScholarResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorIndexError::BadStatus {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| VectorIndexError::BadResponse { reason: e.to_string() }.into())
    }
}

fn transport_err(e: reqwest::Error) -> scholar_core::ScholarError {
    VectorIndexError::Transport {
        message: e.to_string(),
    }
    .into()
}

/// Collection schema body: one cosine dense space, two IDF sparse spaces.
fn create_collection_body(dense_dim: usize) -> Value {
    json!({
        "vectors": {
            DENSE_SPACE: { "size": dense_dim, "distance": "Cosine" }
        },
        "sparse_vectors": {
            SPARSE_TITLE_SPACE: { "modifier": "idf" },
            SPARSE_ABSTRACT_SPACE: { "modifier": "idf" }
        }
    })
}

/// One point in the upsert body. Sparse sides ship raw text tagged with
/// the named server-side encoding model.
fn point_body(point: &PaperPoint) -> Value {
    json!({
        "id": point.id.to_string(),
        "vector": {
            DENSE_SPACE: point.dense,
            SPARSE_TITLE_SPACE: { "text": point.sparse_title, "model": SPARSE_MODEL },
            SPARSE_ABSTRACT_SPACE: { "text": point.sparse_abstract, "model": SPARSE_MODEL }
        },
        "payload": serde_json::to_value(&point.payload).unwrap_or(Value::Null)
    })
}

/// Fusion query body: dense + sparse prefetches merged by DBSF, only the
/// fqn payload field requested back.
fn fusion_query_body(query: &FusionQuery) -> Value {
    json!({
        "prefetch": [
            {
                "query": query.query_vector,
                "using": DENSE_SPACE,
                "limit": query.prefetch_limit
            },
            {
                "query": { "text": query.query_text, "model": SPARSE_MODEL },
                "using": SPARSE_ABSTRACT_SPACE,
                "limit": query.prefetch_limit
            }
        ],
        "query": { "fusion": "dbsf" },
        "limit": query.limit,
        "with_payload": ["fully_qualified_name"]
    })
}

fn parse_fused_points(body: &Value) -> ScholarResult<Vec<ScoredPointId>> {
    let points = body
        .pointer("/result/points")
        .and_then(Value::as_array)
        .ok_or_else(|| VectorIndexError::BadResponse {
            reason: "missing result.points".to_string(),
        })?;

    points
        .iter()
        .map(|point| {
            let fqn = point
                .pointer("/payload/fully_qualified_name")
                .and_then(Value::as_str)
                .ok_or_else(|| VectorIndexError::BadResponse {
                    reason: "point without fully_qualified_name payload".to_string(),
                })?;
            let score = point
                .get("score")
                .and_then(Value::as_f64)
                .ok_or_else(|| VectorIndexError::BadResponse {
                    reason: "point without score".to_string(),
                })?;
            Ok(ScoredPointId {
                fqn: fqn.to_string(),
                score: score as f32,
            })
        })
        .collect()
}

impl IVectorIndex for HttpVectorIndex {
    async fn collection_exists(&self, collection: &str) -> ScholarResult<bool> {
        let response = self
            .http
            .get(format!("{}/collections/{collection}/exists", self.base_url))
            .send()
            .await
            .map_err(transport_err)?;
        let body = Self::check_status(response).await?;
        Ok(body
            .pointer("/result/exists")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    async fn create_collection(&self, collection: &str, dense_dim: usize) -> ScholarResult<()> {
        let response = self
            .http
            .put(format!("{}/collections/{collection}", self.base_url))
            .json(&create_collection_body(dense_dim))
            .send()
            .await
            .map_err(transport_err)?;
        Self::check_status(response).await?;
        tracing::info!(collection, dense_dim, "created vector collection");
        Ok(())
    }

    async fn upsert_points(&self, collection: &str, points: &[PaperPoint]) -> ScholarResult<()> {
        if points.is_empty() {
            return Ok(());
        }
        let body = json!({ "points": points.iter().map(point_body).collect::<Vec<_>>() });
        let response = self
            .http
            .put(format!(
                "{}/collections/{collection}/points?wait=true",
                self.base_url
            ))
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;
        Self::check_status(response).await?;
        tracing::debug!(collection, points = points.len(), "upserted points");
        Ok(())
    }

    async fn query_fusion(
        &self,
        collection: &str,
        query: &FusionQuery,
    ) -> ScholarResult<Vec<ScoredPointId>> {
        let response = self
            .http
            .post(format!(
                "{}/collections/{collection}/points/query",
                self.base_url
            ))
            .json(&fusion_query_body(query))
            .send()
            .await
            .map_err(transport_err)?;
        let body = Self::check_status(response).await?;
        parse_fused_points(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::types::PointPayload;

    #[test]
    fn collection_body_names_all_three_spaces() {
        let body = create_collection_body(768);
        assert_eq!(body["vectors"][DENSE_SPACE]["size"], 768);
        assert_eq!(body["vectors"][DENSE_SPACE]["distance"], "Cosine");
        assert_eq!(body["sparse_vectors"][SPARSE_TITLE_SPACE]["modifier"], "idf");
        assert_eq!(
            body["sparse_vectors"][SPARSE_ABSTRACT_SPACE]["modifier"],
            "idf"
        );
    }

    #[test]
    fn point_body_tags_sparse_text_with_the_named_model() {
        let point = PaperPoint {
            id: Uuid::nil(),
            dense: vec![0.1, 0.2],
            sparse_title: "a title".into(),
            sparse_abstract: "an abstract".into(),
            payload: PointPayload {
                title: "a title".into(),
                n_versions: 1,
                journal_ref: None,
                fully_qualified_name: "arxiv/1".into(),
                updated_at: Utc::now(),
                categories: vec!["cs.IR".into()],
            },
        };
        let body = point_body(&point);
        assert_eq!(body["vector"][SPARSE_TITLE_SPACE]["model"], SPARSE_MODEL);
        assert_eq!(body["vector"][SPARSE_ABSTRACT_SPACE]["text"], "an abstract");
        assert_eq!(body["payload"]["fully_qualified_name"], "arxiv/1");
    }

    #[test]
    fn fusion_body_prefetches_both_spaces_and_requests_only_the_fqn() {
        let body = fusion_query_body(&FusionQuery {
            query_text: "graph networks".into(),
            query_vector: vec![0.5; 4],
            prefetch_limit: 50,
            limit: 50,
        });
        let prefetch = body["prefetch"].as_array().unwrap();
        assert_eq!(prefetch.len(), 2);
        assert_eq!(prefetch[0]["using"], DENSE_SPACE);
        assert_eq!(prefetch[1]["using"], SPARSE_ABSTRACT_SPACE);
        assert_eq!(body["query"]["fusion"], "dbsf");
        assert_eq!(body["with_payload"][0], "fully_qualified_name");
    }

    #[test]
    fn fused_points_parse_fqn_and_score() {
        let body = serde_json::json!({
            "result": { "points": [
                { "id": "x", "score": 0.91, "payload": { "fully_qualified_name": "arxiv/1" } },
                { "id": "y", "score": 0.44, "payload": { "fully_qualified_name": "arxiv/2" } }
            ]}
        });
        let points = parse_fused_points(&body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].fqn, "arxiv/1");
        assert!((points[1].score - 0.44).abs() < 1e-6);
    }

    #[test]
    fn missing_payload_field_is_a_bad_response() {
        let body = serde_json::json!({
            "result": { "points": [ { "id": "x", "score": 0.9, "payload": {} } ] }
        });
        assert!(parse_fused_points(&body).is_err());
    }
}
