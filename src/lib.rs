pub mod config;
pub mod error;
pub mod infra;
pub mod proxy;
pub mod routes;

pub use config::Config;
pub use error::{AppError, ForwardError};
pub use infra::{ReqwestTransport, Transport, TransportError};
pub use proxy::{Body, Forwarder, Metadata, ResultEnvelope, UpstreamResponse};
pub use routes::{router, AppState};
