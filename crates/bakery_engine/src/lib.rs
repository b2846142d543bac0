//! Bakery engine: HTTP access to the bakery backend and async call execution.
mod api;
mod engine;
mod types;
pub mod wire;

pub use api::{ApiClient, ClientSettings, ReqwestApiClient, DEFAULT_BASE_URL};
pub use engine::{execute, EngineHandle, ROOT_SCOPE};
pub use types::{ApiCall, ApiReply, CallId, EngineEvent, FailureKind, RequestError, ScopeId};
