//! Infrastructure layer providing abstractions for external dependencies.
//!
//! Currently this is the outbound HTTP transport; the forwarder only sees the
//! [`Transport`] trait, so implementations can be swapped without touching
//! the proxy logic.

pub mod transport;

pub use transport::{ReqwestTransport, Transport, TransportError, TransportFuture};
