use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use console_core::{update, ConsoleState, Msg, Tab};
use console_engine::EngineHandle;
use console_logging::{console_info, console_warn};

use crate::commands::{parse_command, Command, HELP};
use crate::config::AppConfig;
use crate::effects::{EffectRunner, MsgSink};
use crate::render::render;

/// Everything the main loop waits on.
#[derive(Debug)]
pub enum HostEvent {
    Line(String),
    InputClosed,
    Msg(Msg),
}

/// What the loop should do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the console state and feeds it messages.
pub struct Host {
    state: ConsoleState,
    runner: EffectRunner,
}

impl Host {
    pub fn new(state: ConsoleState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    pub fn tab(&self) -> Tab {
        self.state.tab()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        if self.state.consume_dirty() {
            print!("{}", render(&self.state.view()));
        }
    }

    pub fn handle(&mut self, event: HostEvent) -> Flow {
        match event {
            HostEvent::Msg(msg) => self.dispatch(msg),
            HostEvent::Line(line) => match parse_command(&line, self.tab()) {
                Ok(Some(Command::Send(msg))) => self.dispatch(msg),
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(Command::Quit)) => return Flow::Exit,
                Ok(None) => {}
                Err(err) => println!("{err}"),
            },
            HostEvent::InputClosed => return Flow::Exit,
        }
        if self.runner.logged_out() {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    /// Disarms timers and abandons in-flight work before the engine stops.
    pub fn close(mut self) {
        if !self.runner.logged_out() {
            self.dispatch(Msg::Teardown);
        }
        self.runner.shutdown();
    }
}

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let (host_tx, host_rx) = mpsc::channel();
    let sink = Arc::new(MsgSink::new(host_tx.clone()));
    let engine = EngineHandle::new(config.fetch_settings(), config.credential.provider(), sink)
        .context("failed to start the console engine")?;

    let login_url = config.login_url.clone();
    let runner = EffectRunner::new(
        engine,
        Box::new(move || match &login_url {
            Some(url) => println!("Logged out. Sign in again at {url}"),
            None => println!("Logged out."),
        }),
    );

    spawn_reader(host_tx);
    console_info!("Console started against {}", config.base_url);
    println!("type `help` for commands");

    let mut host = Host::new(ConsoleState::with_settings(config.console.clone()), runner);
    host.dispatch(Msg::Started);
    while let Ok(event) = host_rx.recv() {
        if host.handle(event) == Flow::Exit {
            break;
        }
    }
    host.close();
    console_info!("Console stopped");
    Ok(())
}

fn spawn_reader(host_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if host_tx.send(HostEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    console_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = host_tx.send(HostEvent::InputClosed);
    });
}
