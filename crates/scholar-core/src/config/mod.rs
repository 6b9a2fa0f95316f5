//! Configuration structs for every subsystem.
//!
//! All structs are plain `serde` data (TOML-friendly) with defaults; how
//! they are loaded (env, files, CLI) is the embedding application's
//! business. Provider selection uses tagged enums: the variant set is
//! closed and known at build time, and each factory maps a variant to its
//! concrete implementation.

pub mod defaults;

mod index_config;
mod search_config;
mod sync_config;
mod template_config;
mod vector_config;

pub use index_config::IndexConfig;
pub use search_config::{CitationProviderConfig, SearchConfig};
pub use sync_config::{MetadataProviderConfig, SyncConfig};
pub use template_config::{EncodingTemplateConfig, RerankerConfig};
pub use vector_config::VectorIndexConfig;
