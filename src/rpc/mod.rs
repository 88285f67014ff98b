//! JSON-RPC transport layer.
//!
//! This module owns the wire protocol: envelope framing, HTTP dispatch,
//! authorization, TLS trust policy and error classification. It knows
//! nothing about individual service methods; the typed per-operation
//! surface lives in [`crate::client`].
//!
//! # Architecture
//!
//! - [`JsonRpcCaller`] - performs one request/response transaction per call
//! - [`EndpointConfig`] - connection configuration read by every call
//! - [`RpcContext`] - optional per-call tracing metadata
//! - [`RpcError`] - typed failure taxonomy
//!
//! # Error Handling
//!
//! The caller performs no recovery and no retries. Every failure is
//! classified into one [`RpcError`] variant and propagated unchanged:
//! authorization failures, connectivity failures (with timeouts reported
//! distinctly), protocol violations, and application-level errors reported
//! by the remote method with their code, message and detail preserved.

mod caller;
mod config;
mod envelope;
mod error;

pub use caller::JsonRpcCaller;
pub use config::EndpointConfig;
pub use envelope::{ErrorObject, JSON_RPC_VERSION, RpcContext};
pub use error::RpcError;
