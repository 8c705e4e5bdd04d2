// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shader source loaders.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Error type for shader source retrieval.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The server answered with a non-success status.
    #[error("failed to load shader from {url}: {status} {reason}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },
    /// The request never produced a response body.
    #[error("failed to load shader from {url}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// Reading a local source failed.
    #[error("failed to read shader from {}", path.display())]
    Io {
        /// Resolved file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl LoadError {
    /// HTTP status for [`LoadError::Status`].
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fetches shader source text by URL.
///
/// One attempt per call, no retries. Dropping the returned future cancels the
/// fetch.
pub trait ShaderSourceLoader {
    /// Load the UTF-8 source at `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Loads sources over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpSourceLoader {
    client: reqwest::Client,
}

impl HttpSourceLoader {
    /// Loader with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LoadError::Client)?;
        Ok(Self { client })
    }

    /// Loader sharing an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ShaderSourceLoader for HttpSourceLoader {
    async fn load(&self, url: &str) -> Result<String, LoadError> {
        debug!(url, "fetching shader source");
        let transport = |source| LoadError::Transport {
            url: url.to_owned(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "shader fetch rejected");
            return Err(LoadError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }
        response.text().await.map_err(transport)
    }
}

/// Loads sources from a local directory.
///
/// URLs are treated as paths relative to `root`; a leading `/` is ignored so
/// `/shaders/cryo-logo/cryo-logo.vert` resolves under the root.
#[derive(Debug, Clone)]
pub struct FsSourceLoader {
    root: PathBuf,
}

impl FsSourceLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a URL resolves to.
    pub fn resolve(&self, url: &str) -> PathBuf {
        self.root.join(url.trim_start_matches('/'))
    }
}

impl ShaderSourceLoader for FsSourceLoader {
    async fn load(&self, url: &str) -> Result<String, LoadError> {
        let path = self.resolve(url);
        debug!(path = %path.display(), "reading shader source");
        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(source),
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_strips_leading_slash() {
        let loader = FsSourceLoader::new("/srv/assets");
        assert_eq!(
            loader.resolve("/shaders/cryo-logo/cryo-logo.vert"),
            PathBuf::from("/srv/assets/shaders/cryo-logo/cryo-logo.vert")
        );
        assert_eq!(loader.resolve("a.frag"), PathBuf::from("/srv/assets/a.frag"));
    }

    #[test]
    fn status_errors_carry_url_and_code() {
        let err = LoadError::Status {
            url: "https://cdn.example/x.frag".into(),
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "failed to load shader from https://cdn.example/x.frag: 404 Not Found"
        );
    }
}
