//! Resource manifest loading
//!
//! The manifest is a JSON array of resource descriptors, fetched once when a
//! browser session starts.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::fetch::{FetchError, Fetcher};
use crate::resource::{ResourceDescriptor, ResourceKind};

/// Manifests larger than this are rejected
const MAX_MANIFEST_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to fetch manifest: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Manifest fetch timed out after {0}ms")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, ManifestError>;

/// Source of the resource list
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ResourceDescriptor>>;
}

/// Manifest read from a URL or local path
pub struct LocationManifest {
    fetcher: Fetcher,
    location: String,
    timeout: Duration,
}

impl LocationManifest {
    pub fn new(fetcher: Fetcher, location: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            location: location.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ManifestSource for LocationManifest {
    async fn fetch(&self) -> Result<Vec<ResourceDescriptor>> {
        tracing::debug!("Fetching manifest from {}", self.location);
        let fetch = self.fetcher.fetch(&self.location, Some(MAX_MANIFEST_BYTES));
        let bytes = tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| ManifestError::Timeout(self.timeout.as_millis() as u64))??;
        parse_manifest(&bytes)
    }
}

/// Parse and validate manifest content
pub fn parse_manifest(bytes: &[u8]) -> Result<Vec<ResourceDescriptor>> {
    let resources: Vec<ResourceDescriptor> = serde_json::from_slice(bytes)?;
    validate(&resources)?;
    Ok(resources)
}

fn validate(resources: &[ResourceDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();

    for resource in resources {
        if resource.id.trim().is_empty() {
            return Err(ManifestError::Invalid(format!(
                "resource '{}' has no id",
                resource.title
            )));
        }
        if !seen.insert(resource.id.as_str()) {
            return Err(ManifestError::Invalid(format!(
                "duplicate resource id '{}'",
                resource.id
            )));
        }

        let needs_location = !matches!(
            resource.kind,
            ResourceKind::Collection | ResourceKind::Unsupported
        );
        if needs_location && resource.location.is_none() {
            return Err(ManifestError::Invalid(format!(
                "resource '{}' has no location",
                resource.id
            )));
        }
    }

    Ok(())
}
