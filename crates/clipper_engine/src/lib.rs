//! Clipper engine: backend HTTP client, job polling and effect execution.
mod client;
mod engine;
mod job;
mod sink;
mod types;
mod wire;

pub use client::{ApiClient, ClientSettings, ReqwestApiClient};
pub use engine::{EngineConfig, EngineHandle};
pub use job::{poll_until_terminal, run_job, JobHandle, JobRunOutcome, PollSettings};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{ApiError, EngineError, EngineEvent, FailureKind};
pub use wire::{
    ActionResponse, FilesResponse, FullAutoRequest, JobReport, JobState, JobStatusResponse,
    RemoteChapter, RemoteEntry, RemoteListing, StartJobResponse, DEFAULT_TOTAL_STEPS,
};
