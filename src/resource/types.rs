//! Resource data types
//!
//! Wire names follow the viewer's manifest format (`url`, `githubRelease`,
//! `pdf`/`youtube`/`webpage`/`folder`); the descriptive names are accepted
//! as aliases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a resource's content is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Consumed page by page (PDF)
    #[serde(rename = "pdf", alias = "paginated-document")]
    PaginatedDocument,
    #[serde(rename = "youtube", alias = "embedded-video")]
    EmbeddedVideo,
    #[serde(rename = "webpage", alias = "embedded-page")]
    EmbeddedPage,
    /// A list of child resources
    #[serde(rename = "folder", alias = "collection")]
    Collection,
    /// Any type this viewer cannot display
    #[serde(rename = "unsupported")]
    #[serde(other)]
    Unsupported,
}

impl ResourceKind {
    /// Human-readable type name
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::PaginatedDocument => "PDF Document",
            ResourceKind::EmbeddedVideo => "Video Lesson",
            ResourceKind::EmbeddedPage => "Web Link",
            ResourceKind::Collection => "Resource Folder",
            ResourceKind::Unsupported => "Unsupported",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ResourceKind::EmbeddedVideo => "🎬",
            ResourceKind::EmbeddedPage => "🌐",
            ResourceKind::Collection => "📁",
            ResourceKind::PaginatedDocument | ResourceKind::Unsupported => "📄",
        }
    }
}

/// A supplementary reference shown alongside a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub name: String,
    pub url: String,
    /// Free-form link type, used for icon selection
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A learning resource as listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Preferred source for paginated documents
    #[serde(
        default,
        rename = "githubRelease",
        alias = "primaryLocation",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_location: Option<String>,
    /// Default source; required unless this is a collection
    #[serde(
        default,
        rename = "url",
        alias = "location",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ResourceDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_links: Vec<ExternalLink>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

impl ResourceDescriptor {
    pub fn is_paginated(&self) -> bool {
        self.kind == ResourceKind::PaginatedDocument
    }

    /// Build a single-use descriptor for an item opened from a collection.
    ///
    /// The result carries a fresh id, so it never matches a counter in the
    /// resource list.
    pub fn transient_from(item: &ResourceDescriptor, parent: &ResourceDescriptor) -> Self {
        Self {
            id: format!("collection-item-{}", Uuid::new_v4()),
            title: item.title.clone(),
            description: format!("From collection: {}", parent.title),
            kind: item.kind,
            primary_location: item.primary_location.clone(),
            location: item.location.clone(),
            category: parent.category.clone(),
            items: item.items.clone(),
            external_links: item.external_links.clone(),
            views: 0,
            likes: 0,
        }
    }
}

/// Content shown when the manifest cannot be loaded
pub fn default_content() -> Vec<ResourceDescriptor> {
    vec![ResourceDescriptor {
        id: "default-1".to_string(),
        title: "ChatGPT Getting Started".to_string(),
        description: "An introduction to everyday ChatGPT use".to_string(),
        kind: ResourceKind::PaginatedDocument,
        primary_location: None,
        location: Some(
            "https://raw.githubusercontent.com/mozilla/pdf.js/gh-pages/web/compressed.tracemonkey-pldi-09.pdf"
                .to_string(),
        ),
        category: "beginner".to_string(),
        items: Vec::new(),
        external_links: Vec::new(),
        views: 0,
        likes: 0,
    }]
}

/// Human-readable category name; unknown categories are shown as-is
pub fn category_display_name(category: &str) -> &str {
    match category {
        "all" => "All Resources",
        "beginner" => "Getting Started",
        "tools" => "Tool Tutorials",
        "productivity" => "Productivity",
        "design" => "Creative Design",
        "advanced" => "Advanced Techniques",
        other => other,
    }
}
