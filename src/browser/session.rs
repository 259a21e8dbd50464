//! Browser session state

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::DocumentHandle;
use crate::resource::ResourceDescriptor;
use crate::stats::{merge_counters, totals, CounterRecord, Totals};

use super::error::BrowserError;

/// Category that matches every resource
pub const ALL_CATEGORIES: &str = "all";

/// Observable state of the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Empty,
    Loading {
        #[serde(rename = "resourceId")]
        resource_id: String,
    },
    Displaying {
        #[serde(rename = "resourceId")]
        resource_id: String,
        page: u32,
        scale: f32,
    },
    Error {
        error: BrowserError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Empty,
    Loading,
    Displaying,
    Error(BrowserError),
}

/// Mutable session state, guarded by the browser's mutex
pub(crate) struct Session {
    pub full_list: Vec<ResourceDescriptor>,
    /// Indices into `full_list`, in list order
    pub filtered: Vec<usize>,
    pub category: String,
    pub current_index: Option<usize>,
    /// Active resource; may be a transient collection item
    pub current: Option<ResourceDescriptor>,
    pub phase: Phase,
    /// Bumped by every selection; completions from older selections are dropped
    pub generation: u64,
    /// Bumped by every page render request
    pub render_seq: u64,
    pub document: Option<Arc<dyn DocumentHandle>>,
    pub page: u32,
    pub total_pages: u32,
    pub scale: f32,
    pub last_viewed: HashMap<String, DateTime<Utc>>,
    pub status: Option<String>,
}

impl Session {
    pub fn new(default_scale: f32) -> Self {
        Self {
            full_list: Vec::new(),
            filtered: Vec::new(),
            category: ALL_CATEGORIES.to_string(),
            current_index: None,
            current: None,
            phase: Phase::Empty,
            generation: 0,
            render_seq: 0,
            document: None,
            page: 1,
            total_pages: 0,
            scale: default_scale,
            last_viewed: HashMap::new(),
            status: None,
        }
    }

    /// Replace the resource list, merging persisted counters
    pub fn install(
        &mut self,
        mut resources: Vec<ResourceDescriptor>,
        counters: &HashMap<String, CounterRecord>,
    ) {
        merge_counters(&mut resources, counters);
        self.last_viewed = counters
            .iter()
            .filter_map(|(id, record)| record.last_viewed.map(|at| (id.clone(), at)))
            .collect();
        self.full_list = resources;
        self.apply_filter(ALL_CATEGORIES);
        self.current_index = None;
    }

    /// Recompute the filtered view for `category`
    pub fn apply_filter(&mut self, category: &str) {
        self.category = category.to_string();
        self.filtered = self
            .full_list
            .iter()
            .enumerate()
            .filter(|(_, r)| category == ALL_CATEGORIES || r.category == category)
            .map(|(i, _)| i)
            .collect();
    }

    pub fn filtered_resource(&self, index: usize) -> Option<&ResourceDescriptor> {
        self.filtered.get(index).map(|&i| &self.full_list[i])
    }

    pub fn filtered_list(&self) -> Vec<ResourceDescriptor> {
        self.filtered
            .iter()
            .map(|&i| self.full_list[i].clone())
            .collect()
    }

    /// Start displaying `resource`; returns the new generation
    pub fn begin(&mut self, resource: ResourceDescriptor, default_scale: f32) -> u64 {
        self.generation += 1;
        self.current = Some(resource);
        self.phase = Phase::Loading;
        self.document = None;
        self.page = 1;
        self.total_pages = 0;
        self.scale = default_scale;
        self.generation
    }

    /// Drop the active resource and invalidate in-flight work
    pub fn clear(&mut self) {
        self.generation += 1;
        self.current_index = None;
        self.current = None;
        self.document = None;
        self.page = 1;
        self.total_pages = 0;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn current_id(&self) -> String {
        self.current
            .as_ref()
            .map(|r| r.id.clone())
            .unwrap_or_default()
    }

    pub fn view_state(&self) -> ViewState {
        match &self.phase {
            Phase::Empty => ViewState::Empty,
            Phase::Loading => ViewState::Loading {
                resource_id: self.current_id(),
            },
            Phase::Displaying => ViewState::Displaying {
                resource_id: self.current_id(),
                page: self.page,
                scale: self.scale,
            },
            Phase::Error(error) => ViewState::Error {
                error: error.clone(),
            },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let has_document = self.document.is_some();
        SessionSnapshot {
            state: self.view_state(),
            category: self.category.clone(),
            current_index: self.current_index,
            resources: self.filtered_list(),
            current: self.current.clone(),
            page: has_document.then_some(self.page),
            total_pages: has_document.then_some(self.total_pages),
            scale: self.scale,
            status: self.status.clone(),
            totals: totals(&self.full_list),
        }
    }
}

/// Point-in-time view of a session for the host shell
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: ViewState,
    pub category: String,
    pub current_index: Option<usize>,
    /// The filtered list, in list order
    pub resources: Vec<ResourceDescriptor>,
    pub current: Option<ResourceDescriptor>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub scale: f32,
    pub status: Option<String>,
    pub totals: Totals,
}
