use std::fmt;
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::error::{Error, MalformedTreeError, NetworkError, Result};
use crate::model::RawNode;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Progress reported by a background load. Exactly one of `Done` or `Failed`
/// follows `Started`.
#[derive(Debug)]
pub enum LoadMsg {
    Started { source: String },
    Done(RawNode),
    Failed(Error),
}

/// One-shot dataset loader. Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    timeout: Option<Duration>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request timeout; `None` (the default) waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches and parses the dataset on the calling thread.
    pub fn load(&self, source: &Source) -> Result<RawNode> {
        let text = match source {
            Source::Url(url) => fetch(url, self.timeout)?,
            Source::File(path) => std::fs::read_to_string(path)?,
        };
        let raw = parse_dataset(&text)?;
        tracing::info!(%source, bytes = text.len(), "loaded dataset");
        Ok(raw)
    }

    /// Loads on a worker thread and reports through `tx`.
    pub fn spawn(self, source: Source, tx: Sender<LoadMsg>) -> JoinHandle<()> {
        std::thread::spawn(move || {
            let _ = tx.send(LoadMsg::Started {
                source: source.to_string(),
            });
            let msg = match self.load(&source) {
                Ok(raw) => LoadMsg::Done(raw),
                Err(e) => {
                    tracing::error!(%source, error = %e, "dataset load failed");
                    LoadMsg::Failed(e)
                }
            };
            let _ = tx.send(msg);
        })
    }
}

pub fn parse_dataset(text: &str) -> std::result::Result<RawNode, MalformedTreeError> {
    serde_json::from_str(text).map_err(|e| MalformedTreeError::InvalidJson(e.to_string()))
}

fn fetch(url: &str, timeout: Option<Duration>) -> std::result::Result<String, NetworkError> {
    let request_err = |message: String| NetworkError::Request {
        url: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pledgemap/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| request_err(e.to_string()))?;

    tracing::debug!(url, ?timeout, "requesting dataset");
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| request_err(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| NetworkError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })
}
