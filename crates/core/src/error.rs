//! Error taxonomy for the render pipeline.
//!
//! Loading, tree building and layout each have their own error enum; the
//! umbrella [`Error`] is what session-level operations return.

use thiserror::Error;

/// Fetching the dataset failed before any JSON was seen.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Client construction, connection, or timeout failure
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server answered with a non-2xx status
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be read
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// The dataset does not describe a well-formed weighted tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedTreeError {
    #[error("invalid dataset JSON: {0}")]
    InvalidJson(String),

    #[error("leaf {name:?} has no value")]
    MissingValue { name: String },

    #[error("leaf {name:?} has a non-numeric value {value}")]
    InvalidValue { name: String, value: String },

    #[error("leaf {name:?} has non-positive value {value}")]
    NonPositiveValue { name: String, value: f64 },

    #[error("node {name:?} has an empty children list and no value")]
    EmptyBranch { name: String },

    #[error("tree is deeper than {max_depth} levels")]
    TooDeep { max_depth: usize },

    #[error("node {node} is reachable more than once from the root")]
    Cycle { node: usize },
}

/// The layout engine produced geometry that breaks its own contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("canvas {width}x{height} has no area")]
    EmptyCanvas { width: f64, height: f64 },

    #[error("node {node} received non-finite coordinates")]
    NonFinite { node: usize },

    #[error("node {node} lies outside the canvas")]
    OutOfBounds { node: usize },
}

/// Errors surfaced by session-level operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    MalformedTree(#[from] MalformedTreeError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Configuration could not be parsed or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing an export artefact failed
    #[error("export error: {0}")]
    Export(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MalformedTreeError::MissingValue {
            name: "Pebble".to_string(),
        };
        assert_eq!(err.to_string(), "leaf \"Pebble\" has no value");

        let err = NetworkError::Status {
            url: "http://x".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "request to http://x returned HTTP 404");
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let err: Error = LayoutError::EmptyCanvas {
            width: 0.0,
            height: 10.0,
        }
        .into();
        assert!(matches!(err, Error::Layout(_)));
        assert_eq!(err.to_string(), "canvas 0x10 has no area");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
