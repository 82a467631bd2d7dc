use std::path::PathBuf;

use crate::feature_collection::{Dataset, DatasetError};

/// Where a dataset document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DatasetSource::Url(location.to_string())
        } else {
            DatasetSource::File(PathBuf::from(location))
        }
    }

    pub fn label(&self) -> String {
        match self {
            DatasetSource::File(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string()),
            DatasetSource::Url(url) => url.clone(),
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Http {
        url: String,
        source: reqwest::Error,
    },
    Status {
        url: String,
        status: u16,
    },
    Parse {
        source_label: String,
        source: DatasetError,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Http { url, source } => write!(f, "request to {url} failed: {source}"),
            LoadError::Status { url, status } => write!(f, "{url} answered HTTP {status}"),
            LoadError::Parse {
                source_label,
                source,
            } => write!(f, "failed to parse {source_label}: {source}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Http { source, .. } => Some(source),
            LoadError::Status { .. } => None,
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads and parses one dataset document.
pub async fn fetch_dataset(
    source: &DatasetSource,
    http: &reqwest::Client,
) -> Result<Dataset, LoadError> {
    let bytes = match source {
        DatasetSource::File(path) => {
            tokio::fs::read(path).await.map_err(|e| LoadError::Io {
                path: path.clone(),
                source: e,
            })?
        }
        DatasetSource::Url(url) => {
            let resp = http.get(url).send().await.map_err(|e| LoadError::Http {
                url: url.clone(),
                source: e,
            })?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            resp.bytes()
                .await
                .map_err(|e| LoadError::Http {
                    url: url.clone(),
                    source: e,
                })?
                .to_vec()
        }
    };

    Dataset::from_geojson_bytes(source.label(), &bytes).map_err(|e| LoadError::Parse {
        source_label: source.to_string(),
        source: e,
    })
}
