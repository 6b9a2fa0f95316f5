//! The paper metadata model shared by sync, indexing, and retrieval.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published revision of a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperVersion {
    pub version: String,
    pub created: DateTime<Utc>,
}

/// Versioned metadata for a single paper, as delivered by a metadata
/// provider and stored verbatim as the record payload.
///
/// Identity is the fully-qualified name `"<source>/<id>"`, which is
/// globally unique and immutable once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub source: String,
    pub id: String,
    pub authors: String,
    pub title: String,
    pub doi: Option<String>,
    pub license: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub categories: BTreeSet<String>,
    pub journal_ref: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub versions: Vec<PaperVersion>,
}

impl PaperMetadata {
    /// The fully-qualified name: the stable identity key across the
    /// metadata store and the vector index.
    pub fn fqn(&self) -> String {
        format!("{}/{}", self.source, self.id)
    }

    /// Abstract length in characters, used for work-queue ordering
    /// (shorter abstracts embed faster and are leased first).
    pub fn abstract_len(&self) -> usize {
        self.abstract_text.chars().count()
    }
}
