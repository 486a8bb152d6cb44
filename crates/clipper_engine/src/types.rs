use std::fmt;

use thiserror::Error;

use crate::wire::{ActionResponse, JobReport, RemoteListing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobAccepted {
        job_id: String,
    },
    /// The backend answered the submission with `success: false`, or another
    /// job is still running.
    JobRejected {
        output: Option<String>,
    },
    JobSubmitFailed(ApiError),
    JobStatus(JobReport),
    JobCancelled,
    ListingLoaded {
        seq: u64,
        listing: RemoteListing,
    },
    ListingFailed {
        seq: u64,
        error: ApiError,
    },
    ActionCompleted {
        endpoint: String,
        result: Result<ActionResponse, ApiError>,
    },
    FolderOpened(Result<(), ApiError>),
    /// The process received Ctrl-C.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The body was not the JSON we expected.
    Decode,
    /// The envelope said `success: false`.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by server"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
}
