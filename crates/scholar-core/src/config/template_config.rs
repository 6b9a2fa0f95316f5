use serde::{Deserialize, Serialize};

/// Raw template strings for the dense encoder. Validated when the
/// [`EncodingTemplate`](crate::templates::EncodingTemplate) is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingTemplateConfig {
    pub query_template: String,
    pub document_template: String,
}

impl Default for EncodingTemplateConfig {
    fn default() -> Self {
        Self {
            query_template: "$QUERY".to_string(),
            document_template: "$DOCUMENT".to_string(),
        }
    }
}

/// Raw template string for the cross-encoder reranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    pub template: String,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            template: "Query: $QUERY\nDocument: $DOCUMENT".to_string(),
        }
    }
}
