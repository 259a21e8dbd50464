//! PDF backend
//!
//! Documents are read through the fetcher and parsed with the `pdf` crate.
//! Page geometry is extracted once at open time; the parsed file is not kept.
//! No rasterizer is bundled: rendering presents a frame that describes the
//! page's pixel geometry and draws no page content.

use std::sync::Arc;

use async_trait::async_trait;
use ::pdf::file::FileOptions;

use crate::fetch::{FetchError, Fetcher};

use super::error::{DocumentError, Result};
use super::traits::{DocumentHandle, DocumentOpener, PageHandle, RenderSurface};
use super::types::{OpenOptions, PageFrame, PageSize, Viewport};

/// Opens PDF documents from remote or local locations
#[derive(Clone)]
pub struct PdfOpener {
    fetcher: Fetcher,
}

impl PdfOpener {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl DocumentOpener for PdfOpener {
    async fn open(&self, uri: &str, options: &OpenOptions) -> Result<Arc<dyn DocumentHandle>> {
        let bytes = self
            .fetcher
            .fetch(uri, options.max_bytes)
            .await
            .map_err(|e| match e {
                FetchError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    DocumentError::NotFound(uri.to_string())
                }
                FetchError::Status { status: 404, .. } => DocumentError::NotFound(uri.to_string()),
                other => DocumentError::Fetch(other),
            })?;

        let pages = tokio::task::spawn_blocking(move || read_page_sizes(bytes))
            .await
            .map_err(|e| DocumentError::Parse(format!("parser task failed: {}", e)))??;

        tracing::debug!("Opened PDF {} ({} pages)", uri, pages.len());
        Ok(Arc::new(PdfDocument::new(pages)))
    }

    async fn exists(&self, uri: &str) -> Result<bool> {
        Ok(self.fetcher.exists(uri).await?)
    }
}

fn read_page_sizes(bytes: Vec<u8>) -> Result<Vec<PageSize>> {
    let file = FileOptions::cached()
        .load(bytes)
        .map_err(|e| DocumentError::Parse(e.to_string()))?;

    let mut sizes = Vec::with_capacity(file.num_pages() as usize);
    for index in 0..file.num_pages() {
        let page = file
            .get_page(index)
            .map_err(|e| DocumentError::Parse(format!("page {}: {}", index + 1, e)))?;
        let size = match page.media_box() {
            Ok(rect) => PageSize {
                width: (rect.right - rect.left).abs(),
                height: (rect.top - rect.bottom).abs(),
            },
            Err(_) => PageSize::LETTER,
        };
        sizes.push(size);
    }

    if sizes.is_empty() {
        return Err(DocumentError::Parse("document has no pages".to_string()));
    }
    Ok(sizes)
}

/// An opened PDF
pub struct PdfDocument {
    pages: Vec<PageSize>,
}

impl PdfDocument {
    pub fn new(pages: Vec<PageSize>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl DocumentHandle for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn get_page(&self, number: u32) -> Result<Arc<dyn PageHandle>> {
        let total = self.page_count();
        let size = number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .ok_or(DocumentError::PageOutOfRange { page: number, total })?;

        Ok(Arc::new(PdfPage {
            number,
            size: *size,
        }))
    }
}

/// A page of an opened PDF
pub struct PdfPage {
    number: u32,
    size: PageSize,
}

#[async_trait]
impl PageHandle for PdfPage {
    fn number(&self) -> u32 {
        self.number
    }

    fn viewport(&self, scale: f32) -> Viewport {
        Viewport::for_page(self.size, scale)
    }

    /// Size the surface for `viewport` and present a geometry-only frame.
    /// Page content is not drawn.
    async fn render_to(&self, surface: &mut dyn RenderSurface, viewport: &Viewport) -> Result<()> {
        if viewport.scale <= 0.0 {
            return Err(DocumentError::Render(format!(
                "invalid scale {}",
                viewport.scale
            )));
        }

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
