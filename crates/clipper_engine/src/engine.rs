use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use serde_json::Value;

use crate::client::{ApiClient, ClientSettings, ReqwestApiClient};
use crate::job::{JobHandle, PollSettings};
use crate::sink::{ChannelEventSink, EventSink};
use crate::wire::FullAutoRequest;
use crate::{EngineError, EngineEvent};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub poll: PollSettings,
}

enum EngineCommand {
    SubmitJob(FullAutoRequest),
    CancelJob,
    ListDirectory { seq: u64, path: String },
    CallAction { endpoint: String, payload: Value },
    OpenFolder { path: String },
    WatchInterrupt,
}

/// Owns the async runtime thread. Commands go in through the handle; results
/// come back as [`EngineEvent`]s.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = ReqwestApiClient::new(&config.client)?;
        engine_info!("Engine using backend {}", client.base_url());
        Self::with_client(Arc::new(client), config.poll)
    }

    pub fn with_client(
        client: Arc<dyn ApiClient>,
        poll: PollSettings,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        thread::spawn(move || {
            let mut active: Option<JobHandle> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::SubmitJob(request) => {
                        if active.as_ref().is_some_and(|job| !job.is_finished()) {
                            engine_warn!("Job submission refused: a job is already running");
                            sink.emit(EngineEvent::JobRejected {
                                output: Some("A job is already running.".to_string()),
                            });
                            continue;
                        }
                        active = Some(JobHandle::spawn(
                            runtime.handle(),
                            client.clone(),
                            request,
                            poll.clone(),
                            sink.clone(),
                        ));
                    }
                    EngineCommand::CancelJob => {
                        match active.as_ref().filter(|job| !job.is_finished()) {
                            Some(job) => job.cancel(),
                            None => {
                                // The job may have ended while the cancel was in flight.
                                engine_info!("Cancel requested with no job running");
                                sink.emit(EngineEvent::JobCancelled);
                            }
                        }
                    }
                    other => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(client.as_ref(), other, sink.as_ref()).await;
                        });
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit_job(&self, request: FullAutoRequest) {
        self.send(EngineCommand::SubmitJob(request));
    }

    pub fn cancel_job(&self) {
        self.send(EngineCommand::CancelJob);
    }

    pub fn list_directory(&self, seq: u64, path: impl Into<String>) {
        self.send(EngineCommand::ListDirectory {
            seq,
            path: path.into(),
        });
    }

    pub fn call_action(&self, endpoint: impl Into<String>, payload: Value) {
        self.send(EngineCommand::CallAction {
            endpoint: endpoint.into(),
            payload,
        });
    }

    pub fn open_folder(&self, path: impl Into<String>) {
        self.send(EngineCommand::OpenFolder { path: path.into() });
    }

    /// Emits [`EngineEvent::Interrupted`] on every Ctrl-C from now on.
    pub fn watch_interrupt(&self) {
        self.send(EngineCommand::WatchInterrupt);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread has stopped; command dropped");
        }
    }
}

async fn handle_command(client: &dyn ApiClient, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::ListDirectory { seq, path } => match client.list_files(&path).await {
            Ok(listing) => sink.emit(EngineEvent::ListingLoaded { seq, listing }),
            Err(error) => {
                engine_warn!("Listing {:?} failed: {}", path, error);
                sink.emit(EngineEvent::ListingFailed { seq, error });
            }
        },
        EngineCommand::CallAction { endpoint, payload } => {
            let result = client.call_action(&endpoint, &payload).await;
            if let Err(err) = &result {
                engine_warn!("Action {} failed: {}", endpoint, err);
            }
            sink.emit(EngineEvent::ActionCompleted { endpoint, result });
        }
        EngineCommand::OpenFolder { path } => {
            sink.emit(EngineEvent::FolderOpened(client.open_folder(&path).await));
        }
        EngineCommand::WatchInterrupt => loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                engine_warn!("Cannot listen for Ctrl-C: {}", err);
                return;
            }
            sink.emit(EngineEvent::Interrupted);
        },
        EngineCommand::SubmitJob(_) | EngineCommand::CancelJob => {}
    }
}
