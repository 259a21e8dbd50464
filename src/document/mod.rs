//! Document rendering primitive
//!
//! Format-agnostic interfaces for opening paginated documents, fetching pages
//! and drawing them onto a host-supplied surface, plus the PDF backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! use resource_viewer::document::{DocumentOpener, OpenOptions, PdfOpener};
//!
//! let opener = PdfOpener::new(fetcher);
//! let doc = opener.open("./pdfs/intro.pdf", &OpenOptions::default()).await?;
//! let page = doc.get_page(1).await?;
//! let viewport = page.viewport(1.5);
//! page.render_to(&mut surface, &viewport).await?;
//! ```

mod error;
mod pdf;
mod traits;
mod types;

pub use self::pdf::{PdfDocument, PdfOpener, PdfPage};
pub use error::{DocumentError, DocumentResult, Result};
pub use traits::{DocumentHandle, DocumentOpener, PageHandle, RenderSurface};
pub use types::{OpenOptions, PageFrame, PageSize, Viewport};
