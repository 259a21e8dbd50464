//! Location access
//!
//! Resources and manifests are addressed by a single string that is either a
//! remote `http(s)` URL or a local path. Remote locations go through reqwest,
//! local ones through tokio's filesystem API.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading a location
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{uri} returned status {status}")]
    Status { uri: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{uri} exceeds the {limit} byte limit")]
    TooLarge { uri: String, limit: usize },
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// A classified location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

impl Location {
    /// Classify `uri`, resolving relative paths against `local_root`
    pub fn parse(uri: &str, local_root: &Path) -> Self {
        let trimmed = uri.trim();
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Location::Remote(trimmed.to_string());
        }

        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        let path = Path::new(path);
        if path.is_absolute() {
            Location::Local(path.to_path_buf())
        } else {
            Location::Local(local_root.join(path))
        }
    }
}

/// Reads bytes from remote or local locations
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    local_root: PathBuf,
}

impl Fetcher {
    pub fn new(local_root: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            local_root: local_root.into(),
        }
    }

    pub fn location(&self, uri: &str) -> Location {
        Location::parse(uri, &self.local_root)
    }

    /// Read the full contents of a location
    pub async fn fetch(&self, uri: &str, max_bytes: Option<usize>) -> Result<Vec<u8>> {
        let bytes = match self.location(uri) {
            Location::Remote(url) => {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        uri: url,
                        status: status.as_u16(),
                    });
                }
                if let (Some(limit), Some(length)) = (max_bytes, response.content_length()) {
                    if length as usize > limit {
                        return Err(FetchError::TooLarge { uri: url, limit });
                    }
                }
                response.bytes().await?.to_vec()
            }
            Location::Local(path) => tokio::fs::read(&path).await?,
        };

        match max_bytes {
            Some(limit) if bytes.len() > limit => Err(FetchError::TooLarge {
                uri: uri.to_string(),
                limit,
            }),
            _ => Ok(bytes),
        }
    }

    /// Check that a location exists without reading its body
    pub async fn exists(&self, uri: &str) -> Result<bool> {
        match self.location(uri) {
            Location::Remote(url) => {
                let response = self.client.head(&url).send().await?;
                Ok(response.status().is_success())
            }
            Location::Local(path) => Ok(tokio::fs::try_exists(&path).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_classification() {
        let root = Path::new("/srv/viewer");

        assert_eq!(
            Location::parse("https://github.com/a/b.pdf", root),
            Location::Remote("https://github.com/a/b.pdf".to_string())
        );
        assert_eq!(
            Location::parse("HTTP://example.com/x", root),
            Location::Remote("HTTP://example.com/x".to_string())
        );
        assert_eq!(
            Location::parse("./pdfs/a.pdf", root),
            Location::Local(PathBuf::from("/srv/viewer/./pdfs/a.pdf"))
        );
        assert_eq!(
            Location::parse("file:///tmp/a.pdf", root),
            Location::Local(PathBuf::from("/tmp/a.pdf"))
        );
    }

    #[tokio::test]
    async fn test_local_fetch_and_exists() {
        let dir = std::env::temp_dir().join(format!("viewer-fetch-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("doc.bin"), b"0123456789").await.unwrap();

        let fetcher = Fetcher::new(&dir);
        assert_eq!(fetcher.fetch("doc.bin", None).await.unwrap(), b"0123456789");
        assert!(fetcher.exists("doc.bin").await.unwrap());
        assert!(!fetcher.exists("missing.bin").await.unwrap());
        assert!(matches!(
            fetcher.fetch("doc.bin", Some(4)).await,
            Err(FetchError::TooLarge { limit: 4, .. })
        ));
        assert!(matches!(fetcher.fetch("missing.bin", None).await, Err(FetchError::Io(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
