use log::debug;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch a manifest or feed document
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a fetch that reached the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Body(String),
    /// HTTP 404 or a missing local file
    NotFound,
}

/// Where the manifest and daily feeds are read from
#[derive(Debug, Clone)]
pub enum FeedSource {
    /// Published site or raw data branch, e.g. `https://host/repo/data-branch`
    Http { client: Client, base_url: String },
    /// Local checkout of the published data
    Local { root: PathBuf },
}

impl FeedSource {
    pub fn http(base_url: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(concat!("daily-arxiv-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FeedError::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Ok(FeedSource::Http {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn local<P: Into<PathBuf>>(root: P) -> Self {
        FeedSource::Local { root: root.into() }
    }

    /// Human-readable location of `path` within this source
    pub fn locate(&self, path: &str) -> String {
        match self {
            FeedSource::Http { base_url, .. } => format!("{}/{}", base_url, path),
            FeedSource::Local { root } => root.join(path).display().to_string(),
        }
    }

    /// Fetch a document by its path relative to the source root
    pub async fn fetch(&self, path: &str) -> Result<Fetched, FeedError> {
        let location = self.locate(path);
        debug!("Fetching {}", location);

        match self {
            FeedSource::Http { client, .. } => {
                let transport = |source| FeedError::Transport {
                    url: location.clone(),
                    source,
                };
                let resp = client.get(&location).send().await.map_err(transport)?;
                let status = resp.status();
                if status == StatusCode::NOT_FOUND {
                    return Ok(Fetched::NotFound);
                }
                if !status.is_success() {
                    return Err(FeedError::Status {
                        status: status.as_u16(),
                        url: location.clone(),
                    });
                }
                let body = resp.text().await.map_err(transport)?;
                Ok(Fetched::Body(body))
            }
            FeedSource::Local { .. } => match tokio::fs::read_to_string(&location).await {
                Ok(body) => Ok(Fetched::Body(body)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fetched::NotFound),
                Err(source) => Err(FeedError::Io {
                    path: location,
                    source,
                }),
            },
        }
    }
}
