use serde::{Deserialize, Serialize};

use super::defaults;

/// Citation-provider selection. Closed set, mapped by the retrieval
/// crate's factory. The no-op variant is the mandated fallback: it
/// answers every id with an unknown count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CitationProviderConfig {
    SemanticScholar {
        url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_max_batch_size")]
        max_batch_size: usize,
    },
    NoOp,
}

fn default_max_batch_size() -> usize {
    defaults::DEFAULT_CITATION_MAX_BATCH_SIZE
}

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidates pre-fetched per vector space = `limit * prefetch_factor`.
    pub prefetch_factor: usize,
    /// Weight of the log-scaled citation boost.
    pub citation_boost_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            prefetch_factor: defaults::DEFAULT_PREFETCH_FACTOR,
            citation_boost_weight: defaults::DEFAULT_CITATION_BOOST_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_provider_parses_from_tag_alone() {
        let cfg: CitationProviderConfig = toml::from_str("type = \"no_op\"").unwrap();
        assert!(matches!(cfg, CitationProviderConfig::NoOp));
    }

    #[test]
    fn semantic_scholar_defaults_batch_size() {
        let cfg: CitationProviderConfig = toml::from_str(
            r#"
            type = "semantic_scholar"
            url = "https://api.semanticscholar.org"
            "#,
        )
        .unwrap();
        match cfg {
            CitationProviderConfig::SemanticScholar {
                max_batch_size,
                api_key,
                ..
            } => {
                assert_eq!(max_batch_size, defaults::DEFAULT_CITATION_MAX_BATCH_SIZE);
                assert!(api_key.is_none());
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }
}
