//! Resource module
//!
//! Descriptors for the mixed-media resources the browser lists, plus the
//! built-in content used when no manifest is available.

mod types;

pub use types::{
    category_display_name, default_content, ExternalLink, ResourceDescriptor, ResourceKind,
};
