//! Loader error types

use thiserror::Error;

use super::types::SourceKind;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource has no location to load from
    #[error("Resource {resource_id} has no document location")]
    NoLocation { resource_id: String },

    /// Every attempted location failed
    #[error("All document sources failed for {resource_id} (tried: {}): {last_error}", format_tried(.tried))]
    AllSourcesFailed {
        resource_id: String,
        tried: Vec<SourceKind>,
        last_error: String,
    },
}

fn format_tried(tried: &[SourceKind]) -> String {
    tried
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
