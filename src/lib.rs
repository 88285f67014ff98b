//! Client library for the NarrativeService JSON-RPC API.
//!
//! The [`client`] module exposes the typed per-operation surface; the
//! [`rpc`] module owns the wire protocol and is reusable for calling the
//! service without the typed façade. Authentication lives in [`auth`].
//!
//! This crate never initializes logging; it emits through the `log` facade
//! and leaves appender setup to the embedding application.

pub mod auth;
pub mod client;
pub mod rpc;

pub use crate::auth::AuthToken;
pub use crate::client::NarrativeServiceClient;
pub use crate::client::types;
pub use crate::rpc::{JsonRpcCaller, RpcContext, RpcError};
