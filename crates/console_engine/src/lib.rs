//! Console engine: HTTP access to the admin API and effect execution.
mod credential;
mod engine;
mod fetch;
mod poller;
mod types;

pub use credential::{CredentialProvider, EnvCredential, StaticCredential};
pub use engine::EngineHandle;
pub use fetch::{filter_param, Endpoints, FetchSettings, ReqwestFetcher, ResourceFetcher};
pub use poller::Poller;
pub use types::{ChannelEventSink, EngineError, EngineEvent, EventSink};
