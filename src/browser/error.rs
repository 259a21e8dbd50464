//! Browser error types
//!
//! None of these end a session. Each is turned into an error state and a
//! status message at the operation boundary.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum BrowserError {
    /// Resource list could not be fetched or parsed; built-in content is used
    #[error("Could not load the resource list: {0}")]
    ManifestLoadFailure(String),

    /// Neither document source could be opened
    #[error("Could not load document: {0}")]
    LoadFailure(String),

    /// A page failed to render; the document stays open
    #[error("Page render failed: {0}")]
    RenderFailure(String),

    #[error("No resources in category '{0}'")]
    EmptyFilterResult(String),

    #[error("Unsupported resource type: {0}")]
    UnsupportedType(String),
}
