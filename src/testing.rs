//! Test doubles for the injected capabilities

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::document::{
    DocumentError, DocumentHandle, DocumentOpener, DocumentResult, OpenOptions, PageFrame,
    PageHandle, PageSize, RenderSurface, Viewport,
};
use crate::manifest::{ManifestError, ManifestSource};
use crate::resource::{ResourceDescriptor, ResourceKind};

/// How the fake opener treats a location
#[derive(Clone)]
pub(crate) enum Behavior {
    /// Opens with this many pages
    Pages(u32),
    /// Opens, but every page fails to load
    BrokenPages(u32),
    Fail(String),
    /// Never resolves
    Hang,
    Delay(Duration, u32),
    /// Waits for the notify, then opens
    Gate(Arc<Notify>, u32),
}

#[derive(Default)]
pub(crate) struct FakeOpener {
    behaviors: Mutex<HashMap<String, Behavior>>,
    calls: Mutex<Vec<String>>,
}

impl FakeOpener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(self: &Arc<Self>, uri: &str, behavior: Behavior) -> Arc<Self> {
        self.behaviors
            .lock()
            .unwrap()
            .insert(uri.to_string(), behavior);
        Arc::clone(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, uri: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == uri).count()
    }

    fn behavior(&self, uri: &str) -> Option<Behavior> {
        self.behaviors.lock().unwrap().get(uri).cloned()
    }
}

#[async_trait]
impl DocumentOpener for FakeOpener {
    async fn open(&self, uri: &str, _options: &OpenOptions) -> DocumentResult<Arc<dyn DocumentHandle>> {
        self.calls.lock().unwrap().push(uri.to_string());

        let pages = match self.behavior(uri) {
            Some(Behavior::Pages(pages)) => pages,
            Some(Behavior::BrokenPages(pages)) => {
                return Ok(Arc::new(FakeDocument { pages, broken: true }));
            }
            Some(Behavior::Fail(message)) => return Err(DocumentError::Parse(message)),
            Some(Behavior::Hang) => std::future::pending().await,
            Some(Behavior::Delay(delay, pages)) => {
                tokio::time::sleep(delay).await;
                pages
            }
            Some(Behavior::Gate(gate, pages)) => {
                gate.notified().await;
                pages
            }
            None => return Err(DocumentError::NotFound(uri.to_string())),
        };

        Ok(Arc::new(FakeDocument {
            pages,
            broken: false,
        }))
    }

    async fn exists(&self, uri: &str) -> DocumentResult<bool> {
        match self.behavior(uri) {
            Some(Behavior::Hang) => std::future::pending().await,
            Some(Behavior::Fail(message)) => Err(DocumentError::Parse(message)),
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }
}

pub(crate) struct FakeDocument {
    pages: u32,
    broken: bool,
}

#[async_trait]
impl DocumentHandle for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages
    }

    async fn get_page(&self, number: u32) -> DocumentResult<Arc<dyn PageHandle>> {
        if self.broken {
            return Err(DocumentError::Render(format!("page {} is damaged", number)));
        }
        if number == 0 || number > self.pages {
            return Err(DocumentError::PageOutOfRange {
                page: number,
                total: self.pages,
            });
        }
        Ok(Arc::new(FakePage { number }))
    }
}

pub(crate) struct FakePage {
    number: u32,
}

#[async_trait]
impl PageHandle for FakePage {
    fn number(&self) -> u32 {
        self.number
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::for_page(
            PageSize {
                width: 600.0,
                height: 800.0,
            },
            scale,
        )
    }

    async fn render_to(&self, surface: &mut dyn RenderSurface, viewport: &Viewport) -> DocumentResult<()> {
        let (width, height) = viewport.pixel_size();
        surface.resize(width, height);
        surface.present(PageFrame {
            page_number: self.number,
            width,
            height,
            scale: viewport.scale,
        });
        Ok(())
    }
}

/// Manifest with fixed content
pub(crate) struct StaticManifest(pub Result<Vec<ResourceDescriptor>, String>);

#[async_trait]
impl ManifestSource for StaticManifest {
    async fn fetch(&self) -> Result<Vec<ResourceDescriptor>, ManifestError> {
        self.0.clone().map_err(ManifestError::Invalid)
    }
}

pub(crate) fn resource(id: &str, kind: ResourceKind, category: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        id: id.to_string(),
        title: format!("Title {}", id),
        description: String::new(),
        kind,
        primary_location: None,
        location: Some(format!("{}.loc", id)),
        category: category.to_string(),
        items: Vec::new(),
        external_links: Vec::new(),
        views: 0,
        likes: 0,
    }
}

pub(crate) fn pdf(id: &str, category: &str) -> ResourceDescriptor {
    resource(id, ResourceKind::PaginatedDocument, category)
}

pub(crate) fn pdf_with_primary(id: &str, category: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        primary_location: Some(format!("https://releases.example.com/{}.pdf", id)),
        ..pdf(id, category)
    }
}
