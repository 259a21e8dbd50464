//! Content browser
//!
//! Owns the resource list, the category filter, the active selection and the
//! page/zoom state of an open document. Every operation returns the
//! resulting [`ViewState`]; presentation work is described through
//! [`BrowserEvent`]s sent to the host shell.
//!
//! Selections may overlap. Each one takes a new generation number, and any
//! load or render that completes under an older generation is discarded.

mod command;
mod error;
mod events;
mod session;
mod share;

pub use command::{BrowserCommand, Key};
pub use error::BrowserError;
pub use events::{BrowserEvent, CollectionEntry, ContentBody, ContentView, RenderInstruction};
pub use session::{SessionSnapshot, ViewState, ALL_CATEGORIES};
pub use share::{facebook_share_url, share_link};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};

use crate::config::BrowserConfig;
use crate::loader::ResourceLoader;
use crate::manifest::ManifestSource;
use crate::resource::{default_content, ResourceDescriptor, ResourceKind};
use crate::stats::{self, CounterStore, Totals};
use crate::storage::KeyValueStore;

use session::{Phase, Session};

/// Handle to a browser session; clones share the same session
#[derive(Clone)]
pub struct ContentBrowser {
    inner: Arc<BrowserInner>,
}

struct BrowserInner {
    config: BrowserConfig,
    loader: ResourceLoader,
    manifest: Arc<dyn ManifestSource>,
    counters: CounterStore,
    session: Mutex<Session>,
    events: mpsc::UnboundedSender<BrowserEvent>,
}

impl ContentBrowser {
    /// Create a browser and the receiver for its events
    pub fn new(
        config: BrowserConfig,
        loader: ResourceLoader,
        manifest: Arc<dyn ManifestSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> (Self, mpsc::UnboundedReceiver<BrowserEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let counters = CounterStore::new(
            store,
            config.stats_key.clone(),
            config.page_visits_key.clone(),
        );
        let session = Mutex::new(Session::new(config.default_scale));

        let browser = Self {
            inner: Arc::new(BrowserInner {
                config,
                loader,
                manifest,
                counters,
                session,
                events,
            }),
        };
        (browser, receiver)
    }

    fn emit(&self, event: BrowserEvent) {
        if self.inner.events.send(event).is_err() {
            tracing::trace!("No event receiver attached");
        }
    }

    fn set_status(&self, session: &mut Session, message: String) {
        session.status = Some(message.clone());
        self.emit(BrowserEvent::Status(message));
    }

    fn fail(&self, session: &mut Session, error: BrowserError) {
        tracing::warn!("{}", error);
        session.phase = Phase::Error(error.clone());
        session.status = Some(error.to_string());
        self.emit(BrowserEvent::Error(error));
    }

    /// Fetch the manifest, merge persisted counters and display the first
    /// resource. A missing or empty manifest is replaced by the built-in
    /// content.
    pub async fn init(&self) -> ViewState {
        {
            let mut session = self.inner.session.lock().await;
            session.phase = Phase::Loading;
            self.set_status(&mut session, "Loading resources...".to_string());
        }

        let resources = match self.inner.manifest.fetch().await {
            Ok(resources) if !resources.is_empty() => resources,
            Ok(_) => {
                tracing::warn!("Manifest is empty, using built-in content");
                default_content()
            }
            Err(e) => {
                let error = BrowserError::ManifestLoadFailure(e.to_string());
                tracing::warn!("{}, using built-in content", error);
                self.emit(BrowserEvent::Error(error));
                default_content()
            }
        };

        let counters = match self.inner.counters.load().await {
            Ok(counters) => counters,
            Err(e) => {
                tracing::warn!("Could not read stored counters, starting from zero: {}", e);
                HashMap::new()
            }
        };

        {
            let mut session = self.inner.session.lock().await;
            session.install(resources, &counters);
            let totals = stats::totals(&session.full_list);
            tracing::info!(
                "Loaded {} resources ({} views, {} likes)",
                session.full_list.len(),
                totals.views,
                totals.likes
            );
        }

        self.select_by_index(0).await
    }

    /// Display the resource at `index` in the filtered list. An out-of-range
    /// index leaves the state unchanged.
    pub async fn select_by_index(&self, index: usize) -> ViewState {
        let (resource, generation) = {
            let mut session = self.inner.session.lock().await;
            let Some(resource) = session.filtered_resource(index).cloned() else {
                tracing::debug!("Ignoring selection of index {}", index);
                return session.view_state();
            };

            session.current_index = Some(index);
            let generation = session.begin(resource.clone(), self.inner.config.default_scale);
            self.emit(BrowserEvent::Loading {
                resource_id: resource.id.clone(),
                message: format!("Loading {}...", resource.title),
            });
            (resource, generation)
        };

        self.display(resource, generation).await
    }

    /// Display the resource with `id` if it is in the filtered list
    pub async fn select_by_id(&self, id: &str) -> ViewState {
        let index = {
            let session = self.inner.session.lock().await;
            let position = session
                .filtered
                .iter()
                .position(|&i| session.full_list[i].id == id);
            match position {
                Some(index) => index,
                None => {
                    tracing::debug!("No resource '{}' in the current list", id);
                    return session.view_state();
                }
            }
        };
        self.select_by_index(index).await
    }

    /// Restrict the list to `category` and show its first resource
    pub async fn filter_by_category(&self, category: &str) -> ViewState {
        {
            let mut session = self.inner.session.lock().await;
            session.apply_filter(category);
            tracing::debug!(
                "Filter '{}' matched {} resources",
                category,
                session.filtered.len()
            );

            if session.filtered.is_empty() {
                session.clear();
                self.emit(BrowserEvent::Cleared);
                self.fail(
                    &mut session,
                    BrowserError::EmptyFilterResult(category.to_string()),
                );
                return session.view_state();
            }
        }
        self.select_by_index(0).await
    }

    pub async fn next_resource(&self) -> ViewState {
        let target = {
            let session = self.inner.session.lock().await;
            match session.current_index {
                Some(index) if index + 1 < session.filtered.len() => index + 1,
                _ => return session.view_state(),
            }
        };
        self.select_by_index(target).await
    }

    pub async fn prev_resource(&self) -> ViewState {
        let target = {
            let session = self.inner.session.lock().await;
            match session.current_index {
                Some(index) if index > 0 => index - 1,
                _ => return session.view_state(),
            }
        };
        self.select_by_index(target).await
    }

    /// Display an item of the active collection without touching the list
    /// or the selection
    pub async fn open_collection_item(&self, item_index: usize) -> ViewState {
        let (resource, generation) = {
            let mut session = self.inner.session.lock().await;
            let transient = match session.current.as_ref() {
                Some(parent) if parent.kind == ResourceKind::Collection => {
                    match parent.items.get(item_index) {
                        Some(item) => ResourceDescriptor::transient_from(item, parent),
                        None => return session.view_state(),
                    }
                }
                _ => return session.view_state(),
            };

            let generation = session.begin(transient.clone(), self.inner.config.default_scale);
            self.emit(BrowserEvent::Loading {
                resource_id: transient.id.clone(),
                message: format!("Opening {}...", transient.title),
            });
            (transient, generation)
        };

        self.display(resource, generation).await
    }

    async fn display(&self, resource: ResourceDescriptor, generation: u64) -> ViewState {
        match self.inner.counters.record_page_visit().await {
            Ok(visits) => tracing::debug!("Page visit #{}", visits),
            Err(e) => tracing::warn!("Could not record page visit: {}", e),
        }

        if resource.is_paginated() {
            return self.display_document(resource, generation).await;
        }

        let mut session = self.inner.session.lock().await;
        if !session.is_current(generation) {
            return session.view_state();
        }

        match ContentBody::immediate(&resource) {
            Some(body) => {
                session.phase = Phase::Displaying;
                self.count_view(&mut session, &resource.id).await;
                self.emit(BrowserEvent::Show(ContentView::new(&resource, body)));
                self.set_status(&mut session, format!("Loaded: {}", resource.title));
            }
            None => self.fail(
                &mut session,
                BrowserError::UnsupportedType(resource.title.clone()),
            ),
        }
        session.view_state()
    }

    async fn display_document(&self, resource: ResourceDescriptor, generation: u64) -> ViewState {
        let result = self.inner.loader.load(&resource).await;

        {
            let mut session = self.inner.session.lock().await;
            if !session.is_current(generation) {
                tracing::debug!("Discarding stale load of '{}'", resource.title);
                return session.view_state();
            }

            match result {
                Ok(document) => {
                    let total_pages = document.page_count().max(1);
                    session.document = Some(document);
                    session.total_pages = total_pages;
                    session.page = 1;
                    session.phase = Phase::Displaying;

                    self.count_view(&mut session, &resource.id).await;
                    self.emit(BrowserEvent::Show(ContentView::new(
                        &resource,
                        ContentBody::Document { total_pages },
                    )));
                    self.set_status(
                        &mut session,
                        format!("Loaded: {} ({} pages)", resource.title, total_pages),
                    );
                }
                Err(e) => {
                    self.fail(&mut session, BrowserError::LoadFailure(e.to_string()));
                    return session.view_state();
                }
            }
        }

        self.render_current().await
    }

    /// Fetch the current page and ask the shell to draw it
    async fn render_current(&self) -> ViewState {
        let (document, page, scale, generation, render_seq) = {
            let mut session = self.inner.session.lock().await;
            let Some(document) = session.document.clone() else {
                return session.view_state();
            };
            session.render_seq += 1;
            (
                document,
                session.page,
                session.scale,
                session.generation,
                session.render_seq,
            )
        };

        let result = document.get_page(page).await;

        let mut session = self.inner.session.lock().await;
        if !session.is_current(generation) || session.render_seq != render_seq {
            tracing::debug!("Discarding stale render of page {}", page);
            return session.view_state();
        }

        match result {
            Ok(handle) => {
                let viewport = handle.viewport(scale);
                self.emit(BrowserEvent::RenderPage(RenderInstruction {
                    resource_id: session.current_id(),
                    generation,
                    render_seq,
                    page_number: page,
                    total_pages: session.total_pages,
                    scale,
                    viewport,
                    page: handle,
                }));
            }
            Err(e) => self.render_failed(&mut session, e.to_string()),
        }
        session.view_state()
    }

    fn render_failed(&self, session: &mut Session, message: String) {
        let error = BrowserError::RenderFailure(message);
        tracing::warn!("{}", error);
        session.status = Some(error.to_string());
        self.emit(BrowserEvent::Error(error));
    }

    /// Report that the shell failed to draw the page requested by
    /// `(generation, render_seq)`. Failures of superseded requests are
    /// ignored. The document stays open.
    pub async fn report_render_failure(
        &self,
        generation: u64,
        render_seq: u64,
        message: &str,
    ) -> ViewState {
        let mut session = self.inner.session.lock().await;
        let latest = session.is_current(generation) && session.render_seq == render_seq;
        if latest && session.document.is_some() {
            self.render_failed(&mut session, message.to_string());
        } else {
            tracing::debug!("Ignoring render failure of a superseded page: {}", message);
        }
        session.view_state()
    }

    pub async fn next_page(&self) -> ViewState {
        {
            let mut session = self.inner.session.lock().await;
            if session.document.is_none() || session.page >= session.total_pages {
                return session.view_state();
            }
            session.page += 1;
        }
        self.render_current().await
    }

    pub async fn prev_page(&self) -> ViewState {
        {
            let mut session = self.inner.session.lock().await;
            if session.document.is_none() || session.page <= 1 {
                return session.view_state();
            }
            session.page -= 1;
        }
        self.render_current().await
    }

    pub async fn zoom_in(&self) -> ViewState {
        let step = self.inner.config.zoom_step;
        self.rescale(move |scale| scale + step).await
    }

    /// Zoom out by one step, never below the minimum scale
    pub async fn zoom_out(&self) -> ViewState {
        let step = self.inner.config.zoom_step;
        let min = self.inner.config.min_scale;
        self.rescale(move |scale| (scale - step).max(min)).await
    }

    pub async fn reset_zoom(&self) -> ViewState {
        let default = self.inner.config.default_scale;
        self.rescale(move |_| default).await
    }

    async fn rescale(&self, adjust: impl FnOnce(f32) -> f32) -> ViewState {
        {
            let mut session = self.inner.session.lock().await;
            if session.document.is_none() {
                return session.view_state();
            }
            session.scale = adjust(session.scale);
        }
        self.render_current().await
    }

    /// Increment the view counter of `resource_id` and persist all counters.
    /// Transient collection items have no counters.
    async fn count_view(&self, session: &mut Session, resource_id: &str) {
        let Some(resource) = session.full_list.iter_mut().find(|r| r.id == resource_id) else {
            return;
        };
        resource.views += 1;
        let (views, likes) = (resource.views, resource.likes);

        session
            .last_viewed
            .insert(resource_id.to_string(), Utc::now());
        self.persist(session).await;
        self.emit(BrowserEvent::CountersUpdated {
            resource_id: resource_id.to_string(),
            views,
            likes,
        });
    }

    async fn persist(&self, session: &Session) {
        if let Err(e) = self
            .inner
            .counters
            .save(&session.full_list, &session.last_viewed)
            .await
        {
            tracing::warn!("Could not persist counters: {}", e);
        }
    }

    /// Like the active resource; returns its new like count
    pub async fn like_current(&self) -> Option<u64> {
        let mut session = self.inner.session.lock().await;
        let id = session.current.as_ref()?.id.clone();
        let resource = session.full_list.iter_mut().find(|r| r.id == id)?;
        resource.likes += 1;
        let (views, likes) = (resource.views, resource.likes);

        self.persist(&session).await;
        self.emit(BrowserEvent::CountersUpdated {
            resource_id: id,
            views,
            likes,
        });
        Some(likes)
    }

    /// Map a keyboard shortcut onto page or resource navigation
    pub async fn handle_key(&self, key: Key) -> ViewState {
        let has_document = self.inner.session.lock().await.document.is_some();
        match key {
            Key::Left if has_document => self.prev_page().await,
            Key::Left => self.prev_resource().await,
            Key::Right if has_document => self.next_page().await,
            Key::Right => self.next_resource().await,
            Key::Plus => self.zoom_in().await,
            Key::Minus => self.zoom_out().await,
        }
    }

    /// Run a structured command from the shell
    pub async fn dispatch(&self, command: BrowserCommand) -> ViewState {
        tracing::debug!("Command: {:?}", command);
        match command {
            BrowserCommand::Select { index } => self.select_by_index(index).await,
            BrowserCommand::SelectById { id } => self.select_by_id(&id).await,
            BrowserCommand::Filter { category } => self.filter_by_category(&category).await,
            BrowserCommand::NextResource => self.next_resource().await,
            BrowserCommand::PrevResource => self.prev_resource().await,
            BrowserCommand::NextPage => self.next_page().await,
            BrowserCommand::PrevPage => self.prev_page().await,
            BrowserCommand::ZoomIn => self.zoom_in().await,
            BrowserCommand::ZoomOut => self.zoom_out().await,
            BrowserCommand::ResetZoom => self.reset_zoom().await,
            BrowserCommand::OpenCollectionItem { index } => self.open_collection_item(index).await,
            BrowserCommand::Like => {
                self.like_current().await;
                self.state().await
            }
            BrowserCommand::Key { key } => self.handle_key(key).await,
        }
    }

    /// Share link for the active resource
    pub async fn share_link(&self) -> Option<String> {
        let session = self.inner.session.lock().await;
        session
            .current
            .as_ref()
            .map(|r| share_link(&self.inner.config.share_base_url, &r.id))
    }

    /// Facebook sharer URL for the active resource
    pub async fn facebook_share_url(&self) -> Option<String> {
        let session = self.inner.session.lock().await;
        session.current.as_ref().map(|r| {
            let link = share_link(&self.inner.config.share_base_url, &r.id);
            facebook_share_url(&link, &r.title)
        })
    }

    pub async fn state(&self) -> ViewState {
        self.inner.session.lock().await.view_state()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.session.lock().await.snapshot()
    }

    pub async fn full_list(&self) -> Vec<ResourceDescriptor> {
        self.inner.session.lock().await.full_list.clone()
    }

    pub async fn filtered_list(&self) -> Vec<ResourceDescriptor> {
        self.inner.session.lock().await.filtered_list()
    }

    pub async fn totals(&self) -> Totals {
        stats::totals(&self.inner.session.lock().await.full_list)
    }
}
