//! Loader data types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which candidate location a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Primary,
    Fallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Primary => write!(f, "primary"),
            SourceKind::Fallback => write!(f, "fallback"),
        }
    }
}

/// Record of the last successful load of a resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadAttemptRecord {
    pub source: SourceKind,
    /// The location actually used
    #[serde(rename = "resolvedLocation")]
    pub resolved_location: String,
    pub timestamp: DateTime<Utc>,
}

/// A successful load, as listed in stats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentLoad {
    pub id: String,
    pub source: SourceKind,
    pub time: DateTime<Utc>,
}

/// Summary of recorded loads
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoaderStats {
    pub total: usize,
    #[serde(rename = "byPrimary")]
    pub by_primary: usize,
    #[serde(rename = "byFallback")]
    pub by_fallback: usize,
    /// Most recent first
    #[serde(rename = "recentSuccesses")]
    pub recent_successes: Vec<RecentLoad>,
}
