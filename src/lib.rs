//! Resource Viewer Library
//!
//! A session-oriented browser for mixed-media learning resources (PDF
//! documents, embedded videos, web pages and collections), with a document
//! loader that prefers a primary remote source and falls back to a local copy.
//!
//! # Modules
//!
//! - `resource`: Resource descriptors, kinds and built-in default content
//! - `manifest`: Resource manifest fetching and validation
//! - `fetch`: Remote/local location access
//! - `document`: Rendering primitive (open, page, render) and the PDF backend
//! - `loader`: Primary-first loader with timeouts and an attempt record
//! - `storage`: Injected key-value store (memory, SQLite)
//! - `stats`: View/like counters persisted through the key-value store
//! - `browser`: The content browser state machine
//! - `routes`, `shell`, `state`: HTTP host shell

pub mod browser;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod manifest;
pub mod resource;
pub mod routes;
pub mod shell;
pub mod state;
pub mod stats;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
