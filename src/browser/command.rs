//! Structured commands from the host shell

use serde::{Deserialize, Serialize};

/// Operations the shell can invoke on a browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BrowserCommand {
    Select { index: usize },
    SelectById { id: String },
    Filter { category: String },
    NextResource,
    PrevResource,
    NextPage,
    PrevPage,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    OpenCollectionItem { index: usize },
    Like,
    Key { key: Key },
}

/// Keyboard shortcuts; DOM key names are accepted too
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Previous page when a document is open, else previous resource
    #[serde(alias = "ArrowLeft")]
    Left,
    /// Next page when a document is open, else next resource
    #[serde(alias = "ArrowRight")]
    Right,
    #[serde(alias = "+")]
    Plus,
    #[serde(alias = "-")]
    Minus,
}
