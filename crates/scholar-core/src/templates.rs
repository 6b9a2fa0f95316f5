//! Prompt templates for the dense encoder and the reranker.
//!
//! Templates are plain strings with `$QUERY` / `$DOCUMENT` placeholders.
//! Placeholder presence is validated at construction; a missing
//! placeholder is a fatal configuration error, not a silent no-op.

use crate::config::{EncodingTemplateConfig, RerankerConfig};
use crate::errors::ConfigError;
use crate::paper::PaperMetadata;

const QUERY_PLACEHOLDER: &str = "$QUERY";
const DOCUMENT_PLACEHOLDER: &str = "$DOCUMENT";

/// Renders a paper into the text block both templates embed.
fn document_block(meta: &PaperMetadata) -> String {
    let categories: Vec<&str> = meta.categories.iter().map(String::as_str).collect();
    format!(
        "Title: {}\nCategories: {}.\n\nAbstract: {}",
        meta.title,
        categories.join(", "),
        meta.abstract_text
    )
}

/// Query- and document-side templates for the dense embedding model.
#[derive(Debug, Clone)]
pub struct EncodingTemplate {
    query_template: String,
    document_template: String,
}

impl EncodingTemplate {
    pub fn new(config: &EncodingTemplateConfig) -> Result<Self, ConfigError> {
        if !config.query_template.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                template: "query",
                placeholder: QUERY_PLACEHOLDER,
            });
        }
        if !config.document_template.contains(DOCUMENT_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                template: "document",
                placeholder: DOCUMENT_PLACEHOLDER,
            });
        }
        Ok(Self {
            query_template: config.query_template.clone(),
            document_template: config.document_template.clone(),
        })
    }

    pub fn template_query(&self, query: &str) -> String {
        self.query_template.replace(QUERY_PLACEHOLDER, query)
    }

    pub fn template_document(&self, meta: &PaperMetadata) -> String {
        self.document_template
            .replace(DOCUMENT_PLACEHOLDER, &document_block(meta))
    }
}

/// (query, document) prompt template for the cross-encoder reranker.
#[derive(Debug, Clone)]
pub struct RerankTemplate {
    template: String,
}

impl RerankTemplate {
    pub fn new(config: &RerankerConfig) -> Result<Self, ConfigError> {
        if !config.template.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                template: "rerank",
                placeholder: QUERY_PLACEHOLDER,
            });
        }
        if !config.template.contains(DOCUMENT_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                template: "rerank",
                placeholder: DOCUMENT_PLACEHOLDER,
            });
        }
        Ok(Self {
            template: config.template.clone(),
        })
    }

    pub fn format(&self, query: &str, meta: &PaperMetadata) -> String {
        self.template
            .replace(QUERY_PLACEHOLDER, query)
            .replace(DOCUMENT_PLACEHOLDER, &document_block(meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn paper() -> PaperMetadata {
        PaperMetadata {
            source: "arxiv".into(),
            id: "1".into(),
            authors: "X".into(),
            title: "Graph attention".into(),
            doi: None,
            license: None,
            abstract_text: "We study attention.".into(),
            categories: BTreeSet::from(["cs.LG".to_string()]),
            journal_ref: None,
            updated_at: Utc::now(),
            versions: vec![],
        }
    }

    #[test]
    fn query_template_substitutes_placeholder() {
        let template = EncodingTemplate::new(&EncodingTemplateConfig {
            query_template: "search: $QUERY".into(),
            document_template: "doc: $DOCUMENT".into(),
        })
        .unwrap();
        assert_eq!(template.template_query("gnn"), "search: gnn");
    }

    #[test]
    fn document_template_renders_title_categories_abstract() {
        let template = EncodingTemplate::new(&EncodingTemplateConfig::default()).unwrap();
        let text = template.template_document(&paper());
        assert!(text.contains("Title: Graph attention"));
        assert!(text.contains("Categories: cs.LG."));
        assert!(text.contains("Abstract: We study attention."));
    }

    #[test]
    fn missing_query_placeholder_is_a_config_error() {
        let err = EncodingTemplate::new(&EncodingTemplateConfig {
            query_template: "no placeholder".into(),
            document_template: "$DOCUMENT".into(),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingPlaceholder { .. }));
    }

    #[test]
    fn rerank_template_requires_both_placeholders() {
        assert!(RerankTemplate::new(&RerankerConfig {
            template: "$QUERY only".into(),
        })
        .is_err());
        let template = RerankTemplate::new(&RerankerConfig::default()).unwrap();
        let prompt = template.format("gnn", &paper());
        assert!(prompt.starts_with("Query: gnn"));
        assert!(prompt.contains("Graph attention"));
    }
}
