// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision carried in every request envelope.
pub const JSON_RPC_VERSION: &str = "1.1";

/// Response envelope: either a positional result array or an error object.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<Value>,
}

/// Application-level error reported by the remote method.
///
/// All three fields are surfaced to the caller unaltered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Per-call tracing metadata, sent as the optional `context` field of the
/// request envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcContext {
    /// Custom key/value metadata attached by the embedding application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<HashMap<String, Value>>,
    /// Identifiers of parent calls, outermost first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_stack: Option<Vec<String>>,
}

impl RpcContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one custom metadata entry.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Appends a parent call identifier to the call stack.
    pub fn with_parent_call(mut self, call_id: impl Into<String>) -> Self {
        self.call_stack.get_or_insert_with(Vec::new).push(call_id.into());
        self
    }
}
