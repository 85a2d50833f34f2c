use std::sync::mpsc;
use std::time::Duration;

use console_core::{Effect, Msg};
use console_engine::{EngineEvent, EngineHandle, EventSink};
use console_logging::{console_debug, console_info, console_warn};

use crate::app::HostEvent;

/// Forwards engine events into the host's queue as messages.
pub struct MsgSink {
    host_tx: mpsc::Sender<HostEvent>,
}

impl MsgSink {
    pub fn new(host_tx: mpsc::Sender<HostEvent>) -> Self {
        Self { host_tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.host_tx.send(HostEvent::Msg(event_to_msg(event)));
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FetchCompleted { request_id, result } => {
            if let Err(err) = &result {
                console_warn!("Fetch {} failed: {}", request_id, err);
            }
            Msg::FetchCompleted { request_id, result }
        }
        EngineEvent::DeleteCompleted { request_id, result } => {
            if let Err(err) = &result {
                console_warn!("Deletion {} failed: {}", request_id, err);
            }
            Msg::DeleteCompleted { request_id, result }
        }
        EngineEvent::PollTick { poll_id, at } => Msg::PollTick { poll_id, at },
        EngineEvent::DebounceElapsed { generation } => Msg::FilterDebounceElapsed { generation },
    }
}

/// Executes effects against the engine.
pub struct EffectRunner {
    engine: EngineHandle,
    on_logout: Box<dyn FnMut() + Send>,
    logged_out: bool,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, on_logout: Box<dyn FnMut() + Send>) -> Self {
        Self {
            engine,
            on_logout,
            logged_out: false,
        }
    }

    pub fn logged_out(&self) -> bool {
        self.logged_out
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch {
                    request_id,
                    resource,
                } => {
                    console_debug!("Fetch request_id={} slot={:?}", request_id, resource.slot());
                    self.engine.fetch(request_id, resource);
                }
                Effect::AbortFetch { request_id } => self.engine.abort(request_id),
                Effect::ScheduleDebounce {
                    generation,
                    delay_ms,
                } => self
                    .engine
                    .schedule_debounce(generation, Duration::from_millis(delay_ms)),
                Effect::ArmPolling {
                    poll_id,
                    interval_ms,
                } => self
                    .engine
                    .arm_polling(poll_id, Duration::from_millis(interval_ms)),
                Effect::DisarmPolling => self.engine.disarm_polling(),
                Effect::SubmitDeletion {
                    request_id,
                    target,
                    message,
                } => {
                    console_info!("Submitting removal of {} {}", target.kind, target.id);
                    self.engine.delete(request_id, target, message);
                }
                Effect::Logout => {
                    self.engine.disarm_polling();
                    (self.on_logout)();
                    self.logged_out = true;
                }
            }
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}
