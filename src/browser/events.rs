//! Events emitted to the host shell
//!
//! The browser never touches a rendering target. It describes what should be
//! shown and the shell fulfils it.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::document::{PageHandle, Viewport};
use crate::resource::{category_display_name, ExternalLink, ResourceDescriptor, ResourceKind};

use super::error::BrowserError;

#[derive(Debug, Clone)]
pub enum BrowserEvent {
    /// A resource is being prepared
    Loading { resource_id: String, message: String },
    /// Show a resource's description and body
    Show(ContentView),
    /// Draw a document page at a scale
    RenderPage(RenderInstruction),
    CountersUpdated {
        resource_id: String,
        views: u64,
        likes: u64,
    },
    Status(String),
    Error(BrowserError),
    /// Remove whatever is displayed
    Cleared,
}

/// Request to draw one page
#[derive(Clone)]
pub struct RenderInstruction {
    pub resource_id: String,
    /// Selection generation the page belongs to
    pub generation: u64,
    /// Render request within the generation; only the latest one counts
    pub render_seq: u64,
    pub page_number: u32,
    pub total_pages: u32,
    pub scale: f32,
    pub viewport: Viewport,
    pub page: Arc<dyn PageHandle>,
}

impl fmt::Debug for RenderInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderInstruction")
            .field("resource_id", &self.resource_id)
            .field("generation", &self.generation)
            .field("render_seq", &self.render_seq)
            .field("page_number", &self.page_number)
            .field("total_pages", &self.total_pages)
            .field("scale", &self.scale)
            .finish()
    }
}

/// Presentation-neutral description of a resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub resource_id: String,
    pub title: String,
    pub description: String,
    pub type_name: String,
    pub category_name: String,
    pub body: ContentBody,
    pub external_links: Vec<ExternalLink>,
}

impl ContentView {
    pub fn new(resource: &ResourceDescriptor, body: ContentBody) -> Self {
        let description = if resource.description.is_empty() {
            "No description".to_string()
        } else {
            resource.description.clone()
        };

        Self {
            resource_id: resource.id.clone(),
            title: resource.title.clone(),
            description,
            type_name: resource.kind.display_name().to_string(),
            category_name: category_display_name(&resource.category).to_string(),
            body,
            external_links: resource.external_links.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBody {
    Document {
        #[serde(rename = "totalPages")]
        total_pages: u32,
    },
    Video {
        url: String,
    },
    Page {
        url: String,
    },
    /// Items open through `open_collection_item`; an empty list is an empty folder
    Collection {
        items: Vec<CollectionEntry>,
    },
}

impl ContentBody {
    /// Body for a resource that needs no loading
    pub fn immediate(resource: &ResourceDescriptor) -> Option<Self> {
        let url = resource.location.clone().unwrap_or_default();
        match resource.kind {
            ResourceKind::EmbeddedVideo => Some(ContentBody::Video { url }),
            ResourceKind::EmbeddedPage => Some(ContentBody::Page { url }),
            ResourceKind::Collection => Some(ContentBody::Collection {
                items: resource
                    .items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| CollectionEntry {
                        index,
                        title: item.title.clone(),
                        type_name: item.kind.display_name().to_string(),
                        icon: item.kind.icon().to_string(),
                    })
                    .collect(),
            }),
            ResourceKind::PaginatedDocument | ResourceKind::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub index: usize,
    pub title: String,
    pub type_name: String,
    pub icon: String,
}
