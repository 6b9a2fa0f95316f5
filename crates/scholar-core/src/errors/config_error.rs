/// Configuration errors. Fatal at startup or first use, never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{template} template must contain the '{placeholder}' placeholder")]
    MissingPlaceholder {
        template: &'static str,
        placeholder: &'static str,
    },

    #[error("collection '{collection}' holds {expected}-dim vectors but the batch produced {actual}-dim")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },
}
