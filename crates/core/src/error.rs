use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebMapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read document {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write document {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("route resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error("{path}: {source}")]
    Splice {
        path: PathBuf,
        #[source]
        source: SpliceError,
    },
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("filter entry `{0}` must start with either + or -")]
    InvalidPrefix(String),
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("type {type_name} matches `{marker}` but has no `{marker}/` segment to derive a route from")]
    MarkerSegmentMissing { type_name: String, marker: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    #[error("no generated region and none of the anchors {anchors:?} is present")]
    AnchorNotFound { anchors: Vec<String> },
    #[error("start marker found without a following end marker")]
    UnterminatedRegion,
}

pub type Result<T> = std::result::Result<T, WebMapError>;
