//! Server-side host shell
//!
//! Drains the browser's events and fulfils them: pages are drawn onto a
//! [`FrameSurface`] and the resulting frame is kept in the application state
//! for `GET /api/v1/browser/frame`.

use tokio::sync::mpsc;

use crate::browser::{BrowserEvent, RenderInstruction};
use crate::document::{PageFrame, RenderSurface};
use crate::state::AppState;

/// Render surface that records the frame presented to it
#[derive(Debug, Default)]
pub struct FrameSurface {
    width: u32,
    height: u32,
    frame: Option<PageFrame>,
}

impl FrameSurface {
    pub fn into_frame(self) -> Option<PageFrame> {
        self.frame
    }
}

impl RenderSurface for FrameSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn present(&mut self, frame: PageFrame) {
        self.frame = Some(frame);
    }
}

/// Handle browser events until the browser is dropped
pub async fn run_event_pump(state: AppState, mut events: mpsc::UnboundedReceiver<BrowserEvent>) {
    while let Some(event) = events.recv().await {
        handle_event(&state, event).await;
    }
    tracing::info!("Browser event stream closed");
}

pub async fn handle_event(state: &AppState, event: BrowserEvent) {
    match event {
        BrowserEvent::RenderPage(instruction) => render(state, instruction).await,
        BrowserEvent::Show(view) => {
            tracing::info!("Showing '{}' ({}, {})", view.title, view.type_name, view.category_name);
            state.set_frame(None).await;
        }
        BrowserEvent::Cleared => state.set_frame(None).await,
        BrowserEvent::Loading { message, .. } => tracing::debug!("{}", message),
        BrowserEvent::Status(message) => tracing::debug!("Status: {}", message),
        BrowserEvent::CountersUpdated {
            resource_id,
            views,
            likes,
        } => tracing::debug!("Counters for {}: {} views, {} likes", resource_id, views, likes),
        BrowserEvent::Error(error) => tracing::warn!("Browser error: {}", error),
    }
}

async fn render(state: &AppState, instruction: RenderInstruction) {
    let mut surface = FrameSurface::default();
    match instruction
        .page
        .render_to(&mut surface, &instruction.viewport)
        .await
    {
        Ok(()) => {
            tracing::debug!(
                "Drew page {}/{} of {} at {}",
                instruction.page_number,
                instruction.total_pages,
                instruction.resource_id,
                instruction.scale
            );
            state.set_frame(surface.into_frame()).await;
        }
        Err(e) => {
            state
                .browser()
                .report_render_failure(
                    instruction.generation,
                    instruction.render_seq,
                    &e.to_string(),
                )
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::browser::ContentBrowser;
    use crate::config::{BrowserConfig, LoaderConfig};
    use crate::loader::ResourceLoader;
    use crate::storage::MemoryStore;
    use crate::testing::{pdf, Behavior, FakeOpener, StaticManifest};

    #[tokio::test]
    async fn test_pump_keeps_latest_frame() {
        let opener = FakeOpener::new().with("intro.loc", Behavior::Pages(3));
        let loader = ResourceLoader::new(opener, LoaderConfig::default());
        let (browser, mut events) = ContentBrowser::new(
            BrowserConfig::default(),
            loader.clone(),
            Arc::new(StaticManifest(Ok(vec![pdf("intro", "x")]))),
            Arc::new(MemoryStore::new()),
        );
        let state = AppState::new(browser.clone(), loader);

        browser.init().await;
        browser.next_page().await;
        while let Ok(event) = events.try_recv() {
            handle_event(&state, event).await;
        }

        let frame = state.frame().await.unwrap();
        assert_eq!(frame.page_number, 2);
        assert_eq!((frame.width, frame.height), (900, 1200));
    }

    #[test]
    fn test_surface_records_size() {
        let mut surface = FrameSurface::default();
        surface.resize(10, 20);
        assert_eq!((surface.width, surface.height), (10, 20));
        assert!(surface.into_frame().is_none());
    }
}
