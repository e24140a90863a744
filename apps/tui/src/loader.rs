//! Dataset loading: one timeout-bounded request (or file read) per load,
//! run as a cancellable tokio task.

use heatmap_core::{Dataset, HeatmapError};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server responded with {0}")]
    Status(StatusCode),

    /// No complete response within the deadline
    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Local dataset could not be read
    #[error("Failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body was not a valid dataset
    #[error(transparent)]
    Parse(#[from] HeatmapError),

    /// Load was aborted before it finished
    #[error("Load was cancelled")]
    Cancelled,
}

/// Client for one load. Bounds connecting only; the whole-exchange deadline
/// lives in `fetch_dataset`.
pub fn build_client(timeout: Duration) -> Result<Client, LoadError> {
    Client::builder()
        .connect_timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Into::into)
}

/// GET the dataset and parse it, failing if the whole exchange exceeds `timeout`
pub async fn fetch_dataset(client: &Client, url: &str, timeout: Duration) -> Result<Dataset, LoadError> {
    log::info!("Fetching dataset from {url}");

    let request = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Bad response from {url}: {status}");
            return Err(LoadError::Status(status));
        }
        Ok::<_, LoadError>(response.text().await?)
    };

    let body = tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| LoadError::Timeout(timeout))??;

    let dataset = Dataset::from_json(&body)?;
    log::info!("Loaded {} monthly variances", dataset.len());
    Ok(dataset)
}

/// Read a dataset from a local JSON file with the same shape as the remote one
pub async fn read_dataset(path: &Path) -> Result<Dataset, LoadError> {
    log::info!("Reading dataset from {}", path.display());

    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Dataset::from_json(&body)?)
}

pub async fn load_dataset(source: &DataSource, timeout: Duration) -> Result<Dataset, LoadError> {
    match source {
        DataSource::Remote(url) => {
            let client = build_client(timeout)?;
            fetch_dataset(&client, url, timeout).await
        }
        DataSource::File(path) => read_dataset(path).await,
    }
}

/// An in-flight load. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct LoadHandle {
    source: DataSource,
    task: JoinHandle<()>,
    result: oneshot::Receiver<Result<Dataset, LoadError>>,
}

impl LoadHandle {
    pub const fn source(&self) -> &DataSource {
        &self.source
    }

    /// Non-blocking check for the result. Returns `None` while still running.
    pub fn try_take(&mut self) -> Option<Result<Dataset, LoadError>> {
        match self.result.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(LoadError::Cancelled)),
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start loading on the current tokio runtime
pub fn spawn_load(source: DataSource, timeout: Duration) -> LoadHandle {
    let (tx, rx) = oneshot::channel();
    let task_source = source.clone();

    let task = tokio::spawn(async move {
        let result = load_dataset(&task_source, timeout).await;
        if let Err(e) = &result {
            log::warn!("Loading {task_source} failed: {e}");
        }
        // Receiver may be gone if the app quit first
        let _ = tx.send(result);
    });

    LoadHandle {
        source,
        task,
        result: rx,
    }
}
