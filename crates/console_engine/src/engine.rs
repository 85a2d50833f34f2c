use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use console_core::{DeletionTarget, PollId, RequestId, ResourceRequest};
use console_logging::{console_debug, console_info};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::fetch::{FetchSettings, ReqwestFetcher, ResourceFetcher};
use crate::poller::Poller;
use crate::{CredentialProvider, EngineError, EngineEvent, EventSink};

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        resource: ResourceRequest,
    },
    Abort {
        request_id: RequestId,
    },
    Delete {
        request_id: RequestId,
        target: DeletionTarget,
        message: String,
    },
    ArmPolling {
        poll_id: PollId,
        interval: Duration,
    },
    DisarmPolling,
    Debounce {
        generation: u64,
        delay: Duration,
    },
    Shutdown,
}

/// Runs IO on a dedicated thread with its own tokio runtime. Results are
/// reported through the [`EventSink`].
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(
        settings: FetchSettings,
        credential: Arc<dyn CredentialProvider>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(settings, credential)?);
        Self::with_fetcher(fetcher, sink)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn ResourceFetcher>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let worker = thread::Builder::new()
            .name("console-engine".to_string())
            .spawn(move || runtime.block_on(run(fetcher, sink, cmd_rx)))?;
        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    pub fn fetch(&self, request_id: RequestId, resource: ResourceRequest) {
        self.send(EngineCommand::Fetch {
            request_id,
            resource,
        });
    }

    /// Best effort: a fetch that already finished still reports its result.
    pub fn abort(&self, request_id: RequestId) {
        self.send(EngineCommand::Abort { request_id });
    }

    pub fn delete(&self, request_id: RequestId, target: DeletionTarget, message: String) {
        self.send(EngineCommand::Delete {
            request_id,
            target,
            message,
        });
    }

    pub fn arm_polling(&self, poll_id: PollId, interval: Duration) {
        self.send(EngineCommand::ArmPolling { poll_id, interval });
    }

    pub fn disarm_polling(&self) {
        self.send(EngineCommand::DisarmPolling);
    }

    pub fn schedule_debounce(&self, generation: u64, delay: Duration) {
        self.send(EngineCommand::Debounce { generation, delay });
    }

    /// Stops the runtime and waits for the worker thread. In-flight work is
    /// dropped without reporting.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    fn stop(&mut self) {
        self.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    fetcher: Arc<dyn ResourceFetcher>,
    sink: Arc<dyn EventSink>,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
) {
    let mut in_flight: HashMap<RequestId, AbortHandle> = HashMap::new();
    let mut poller = Poller::new();
    console_info!("engine started");

    while let Some(command) = cmd_rx.recv().await {
        in_flight.retain(|_, handle| !handle.is_finished());
        match command {
            EngineCommand::Fetch {
                request_id,
                resource,
            } => {
                let fetcher = fetcher.clone();
                let sink = sink.clone();
                let task = tokio::spawn(async move {
                    let result = fetcher.fetch(&resource).await;
                    sink.emit(EngineEvent::FetchCompleted { request_id, result });
                });
                in_flight.insert(request_id, task.abort_handle());
            }
            EngineCommand::Abort { request_id } => {
                if let Some(handle) = in_flight.remove(&request_id) {
                    console_debug!("aborting fetch {}", request_id);
                    handle.abort();
                }
            }
            EngineCommand::Delete {
                request_id,
                target,
                message,
            } => {
                let fetcher = fetcher.clone();
                let sink = sink.clone();
                tokio::spawn(async move {
                    let result = fetcher.delete(&target, &message).await;
                    sink.emit(EngineEvent::DeleteCompleted { request_id, result });
                });
            }
            EngineCommand::ArmPolling { poll_id, interval } => {
                console_debug!("arming poll {} every {:?}", poll_id, interval);
                let sink = sink.clone();
                poller.arm(interval, move || {
                    sink.emit(EngineEvent::PollTick {
                        poll_id,
                        at: Utc::now(),
                    });
                });
            }
            EngineCommand::DisarmPolling => poller.disarm(),
            EngineCommand::Debounce { generation, delay } => {
                let sink = sink.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    sink.emit(EngineEvent::DebounceElapsed { generation });
                });
            }
            EngineCommand::Shutdown => break,
        }
    }

    poller.disarm();
    for (_, handle) in in_flight.drain() {
        handle.abort();
    }
    console_info!("engine stopped");
}
