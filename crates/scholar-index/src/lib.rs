//! # scholar-index
//!
//! The indexing worker. Drains the paper backlog in leased batches:
//! render each paper through the document template, embed the batch,
//! upsert points into the per-source collection, then mark the batch
//! indexed. Deterministic point ids make re-indexing an overwrite.

pub mod engine;
pub mod populator;

pub use engine::IndexEngine;
pub use populator::{point_id, CollectionPopulator};
