//! Terminal host for the admin console: config, input, rendering, effect execution.
pub mod app;
pub mod commands;
pub mod config;
pub mod effects;
pub mod render;

pub use app::{run, Flow, Host, HostEvent};
pub use commands::{parse_command, Command, CommandError};
pub use config::{AppConfig, ConfigError, ConfigOrigin, CredentialSource, LogTarget};
pub use effects::{event_to_msg, EffectRunner, MsgSink};
