//! # scholar-core
//!
//! Foundation crate for the scholar paper-search backend.
//! Defines the paper metadata model, errors, config, prompt templates,
//! and the embedding/reranking model traits. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod errors;
pub mod paper;
pub mod templates;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{ScholarError, ScholarResult};
pub use paper::{PaperMetadata, PaperVersion};
