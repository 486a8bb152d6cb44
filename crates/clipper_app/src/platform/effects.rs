use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clipper_core::{
    ActionReply, Chapter, DirectoryListing, Effect, FileEntry, FormId, FullAutoParams, JobStatus,
    JobUpdate, Msg,
};
use clipper_engine::{
    ActionResponse, ApiError, EngineConfig, EngineError, EngineEvent, EngineHandle, FailureKind,
    FullAutoRequest, JobReport, JobState, RemoteListing,
};
use engine_logging::{engine_debug, engine_info, engine_warn};
use serde_json::{Map, Value};

/// What the front-end loop receives: state machine messages plus the
/// process-level events the state machine does not model.
#[derive(Debug)]
pub enum Inbound {
    Msg(Msg),
    Input(String),
    InputClosed,
    FolderOpened(Result<(), String>),
    Interrupted,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, tx: mpsc::Sender<Inbound>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config)?;
        let runner = Self { engine };
        runner.spawn_event_loop(tx);
        Ok(runner)
    }

    pub fn watch_interrupt(&self) {
        self.engine.watch_interrupt();
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitFullAuto(params) => {
                    engine_info!(
                        "SubmitFullAuto url_len={} method={}",
                        params.url.len(),
                        params.analysis_method.as_str()
                    );
                    self.engine.submit_job(full_auto_request(params));
                }
                Effect::CancelJob => self.engine.cancel_job(),
                Effect::CallAction {
                    form,
                    endpoint,
                    payload,
                } => {
                    engine_info!("CallAction form={} endpoint={}", form.key(), endpoint);
                    let body: Map<String, Value> = payload
                        .into_iter()
                        .map(|(field, value)| (field, Value::String(value)))
                        .collect();
                    self.engine.call_action(endpoint, Value::Object(body));
                }
                Effect::ListDirectory { seq, path } => {
                    engine_debug!("ListDirectory seq={} path={:?}", seq, path);
                    self.engine.list_directory(seq, path);
                }
                Effect::OpenFolder { path } => self.engine.open_folder(path),
            }
        }
    }

    fn spawn_event_loop(&self, tx: mpsc::Sender<Inbound>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(20)) else {
                continue;
            };
            let Some(inbound) = map_event(event) else {
                continue;
            };
            if tx.send(inbound).is_err() {
                break;
            }
        });
    }
}

fn full_auto_request(params: FullAutoParams) -> FullAutoRequest {
    FullAutoRequest {
        analysis_method: params.analysis_method.as_str().to_string(),
        url: params.url,
        api_key: params.api_key,
        model: params.model,
        watermark: params.watermark,
        burn_subtitle: params.burn_subtitle,
    }
}

fn map_event(event: EngineEvent) -> Option<Inbound> {
    let msg = match event {
        EngineEvent::JobAccepted { job_id } => Msg::JobAccepted { job_id },
        EngineEvent::JobRejected { output } => Msg::JobRejected { output },
        EngineEvent::JobSubmitFailed(error) => Msg::JobSubmitFailed {
            error: error.to_string(),
        },
        EngineEvent::JobStatus(report) => Msg::JobStatusReceived(map_report(report)),
        EngineEvent::JobCancelled => Msg::JobCancelled,
        EngineEvent::ListingLoaded { seq, listing } => Msg::ListingLoaded {
            seq,
            listing: map_listing(listing),
        },
        EngineEvent::ListingFailed { seq, error } => Msg::ListingFailed {
            seq,
            error: describe_error(&error),
        },
        EngineEvent::ActionCompleted { endpoint, result } => {
            let Some(form) = FormId::from_endpoint(&endpoint) else {
                engine_warn!("Dropping reply for unknown endpoint {}", endpoint);
                return None;
            };
            Msg::ActionCompleted {
                form,
                result: result
                    .map(map_reply)
                    .map_err(|error| describe_error(&error)),
            }
        }
        EngineEvent::FolderOpened(result) => {
            if let Err(error) = &result {
                engine_warn!("Open folder failed: {}", error);
            }
            return Some(Inbound::FolderOpened(
                result.map_err(|error| describe_error(&error)),
            ));
        }
        EngineEvent::Interrupted => return Some(Inbound::Interrupted),
    };
    Some(Inbound::Msg(msg))
}

/// Refusals carry the server's own wording; everything else keeps its kind.
fn describe_error(error: &ApiError) -> String {
    match error.kind {
        FailureKind::Rejected => error.message.clone(),
        _ => error.to_string(),
    }
}

fn map_report(report: JobReport) -> JobUpdate {
    JobUpdate {
        job_id: report.job_id,
        status: match report.state {
            JobState::Running => JobStatus::Running,
            JobState::Done => JobStatus::Done,
            JobState::Error => JobStatus::Error,
        },
        step: report.step,
        total_steps: report.total_steps,
        message: report.message,
        output: report.output,
    }
}

fn map_listing(listing: RemoteListing) -> DirectoryListing {
    DirectoryListing {
        current_path: listing.current_path,
        parent_path: listing.parent_path,
        entries: listing
            .entries
            .into_iter()
            .map(|entry| FileEntry {
                name: entry.name,
                path: entry.path,
                is_dir: entry.is_dir,
                size: entry.size.unwrap_or(0),
                ext: entry.ext.unwrap_or_default(),
            })
            .collect(),
    }
}

fn map_reply(reply: ActionResponse) -> ActionReply {
    ActionReply {
        success: reply.success,
        output: reply.output,
        chapters: reply.chapters.map(|chapters| {
            chapters
                .into_iter()
                .map(|chapter| Chapter {
                    title: chapter.title,
                    start: chapter.start,
                    end: chapter.end,
                    reason: chapter.reason,
                })
                .collect()
        }),
        raw: reply.raw,
    }
}
