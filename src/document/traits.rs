//! Document traits
//!
//! The rendering primitive the browser drives: open a document, fetch a page,
//! draw the page onto a surface supplied by the host shell.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::Result;
use super::types::{OpenOptions, PageFrame, Viewport};

/// Opens documents from a location
#[async_trait]
pub trait DocumentOpener: Send + Sync {
    /// Open the document at `uri`
    async fn open(&self, uri: &str, options: &OpenOptions) -> Result<Arc<dyn DocumentHandle>>;

    /// Lightweight existence check for `uri`
    async fn exists(&self, uri: &str) -> Result<bool>;
}

/// An open document
#[async_trait]
pub trait DocumentHandle: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> u32;

    /// Get a page by 1-based number
    async fn get_page(&self, number: u32) -> Result<Arc<dyn PageHandle>>;
}

/// A single page of an open document
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 1-based page number
    fn number(&self) -> u32;

    /// Viewport for drawing this page at `scale`
    fn viewport(&self, scale: f32) -> Viewport;

    /// Present this page to `surface` at `viewport`
    async fn render_to(&self, surface: &mut dyn RenderSurface, viewport: &Viewport) -> Result<()>;
}

/// Drawing target owned by the host shell
pub trait RenderSurface: Send {
    fn resize(&mut self, width: u32, height: u32);

    fn present(&mut self, frame: PageFrame);
}
