pub mod envelope;
pub mod forwarder;
pub mod types;

pub use envelope::{build_envelope, classify_body};
pub use forwarder::{Forwarder, DEFAULT_TIMEOUT};
pub use types::*;
