//! Application state management

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::browser::ContentBrowser;
use crate::document::PageFrame;
use crate::loader::ResourceLoader;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    browser: ContentBrowser,
    loader: ResourceLoader,
    /// Last page drawn by the shell
    frame: RwLock<Option<PageFrame>>,
}

impl AppState {
    pub fn new(browser: ContentBrowser, loader: ResourceLoader) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                browser,
                loader,
                frame: RwLock::new(None),
            }),
        }
    }

    /// Get the browser session
    pub fn browser(&self) -> &ContentBrowser {
        &self.inner.browser
    }

    /// Get the document loader
    pub fn loader(&self) -> &ResourceLoader {
        &self.inner.loader
    }

    pub async fn frame(&self) -> Option<PageFrame> {
        self.inner.frame.read().await.clone()
    }

    pub async fn set_frame(&self, frame: Option<PageFrame>) {
        *self.inner.frame.write().await = frame;
    }
}
