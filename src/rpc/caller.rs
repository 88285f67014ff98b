// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::io::ReaderStream;
use url::Url;
use uuid::Uuid;

use crate::auth::AuthToken;

use super::config::EndpointConfig;
use super::envelope::{ErrorObject, JSON_RPC_VERSION, JsonRpcResponse};
use super::error::RpcError;
use super::RpcContext;

/// Performs one JSON-RPC request/response transaction per invocation.
///
/// The caller owns the endpoint configuration and the optional bearer
/// credential shared by all calls made through it. It keeps no connection,
/// session or cache between calls; every invocation is an independent HTTP
/// POST bounded only by the configured read timeout. There are no hidden
/// retries; every failure surfaces as an [`RpcError`].
///
/// Configuration setters take `&mut self`, so reconfiguring a caller that is
/// shared across tasks requires external synchronization; calls themselves
/// only need `&self`.
///
/// # Example
///
/// ```rust,no_run
/// use narrative_service_client::rpc::JsonRpcCaller;
/// use url::Url;
///
/// # async fn example() -> Result<(), narrative_service_client::RpcError> {
/// let caller = JsonRpcCaller::new(Url::parse("https://example.org/services/narrative").unwrap());
/// let status: Option<Vec<serde_json::Value>> = caller
///     .call("NarrativeService.status", &[] as &[serde_json::Value], true, true, None, None)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonRpcCaller {
    config: EndpointConfig,
    token: Option<AuthToken>,
    /// One-shot capture target for the next raw response body.
    next_response_file: Mutex<Option<PathBuf>>,
}

impl JsonRpcCaller {
    /// Creates an anonymous caller for the given service URL.
    pub fn new(url: Url) -> Self {
        Self {
            config: EndpointConfig::new(url),
            token: None,
            next_response_file: Mutex::new(None),
        }
    }

    /// Creates a caller that sends the given token with every request.
    ///
    /// The token is attached as-is; no validation round trip is performed.
    pub fn with_token(url: Url, token: AuthToken) -> Self {
        Self {
            config: EndpointConfig::new(url),
            token: Some(token),
            next_response_file: Mutex::new(None),
        }
    }

    /// Creates a caller by exchanging a username and password for a token
    /// against the default authorization endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Unauthorized`] if the credentials are rejected.
    pub async fn login(url: Url, user: &str, password: &str) -> Result<Self, RpcError> {
        let token = AuthToken::login(user, password).await?;
        Ok(Self::with_token(url, token))
    }

    /// Like [`login`](Self::login), but against a custom authorization
    /// endpoint.
    pub async fn login_with_auth_url(
        url: Url,
        user: &str,
        password: &str,
        auth_url: &Url,
    ) -> Result<Self, RpcError> {
        let token = AuthToken::login_with_url(auth_url, user, password).await?;
        Ok(Self::with_token(url, token))
    }

    pub fn url(&self) -> &Url {
        self.config.url()
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// See [`EndpointConfig::read_timeout`].
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.config.set_read_timeout(timeout);
    }

    pub fn is_insecure_http_allowed(&self) -> bool {
        self.config.is_insecure_http_allowed()
    }

    pub fn set_insecure_http_allowed(&mut self, allowed: bool) {
        self.config.set_insecure_http_allowed(allowed);
    }

    pub fn is_all_certificates_trusted(&self) -> bool {
        self.config.is_all_certificates_trusted()
    }

    pub fn set_all_certificates_trusted(&mut self, trust_all: bool) {
        self.config.set_all_certificates_trusted(trust_all);
    }

    pub fn is_streaming_mode_on(&self) -> bool {
        self.config.is_streaming_mode_on()
    }

    pub fn set_streaming_mode_on(&mut self, on: bool) {
        self.config.set_streaming_mode_on(on);
    }

    /// Arms a one-shot capture of the next raw response body into `path`.
    ///
    /// The path is consumed by the next call, whether or not it succeeds.
    pub fn set_file_for_next_rpc_response(&self, path: impl Into<PathBuf>) {
        *self
            .next_response_file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(path.into());
    }

    /// Performs one call: builds the envelope, POSTs it, and decodes the
    /// positional result sequence into `R`.
    ///
    /// `params` must serialize to a JSON array; order is significant and
    /// matches the remote signature. `expect_result` makes a missing or
    /// empty result sequence a protocol violation; `allow_absent_result`
    /// additionally tolerates a completely empty response body (a quirk of
    /// some deployed service revisions). `service_version` is appended to
    /// the route as a path suffix when present.
    ///
    /// Returns `Ok(None)` when an absent payload was tolerated, otherwise
    /// the decoded result sequence.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Unauthorized`]: HTTP 401, or a credential would have
    ///   been sent over plain http without [`Self::set_insecure_http_allowed`].
    /// - [`RpcError::Timeout`] / [`RpcError::RequestFailed`]: the transport
    ///   failed; the read timeout is reported distinctly.
    /// - [`RpcError::Server`]: the remote method reported a failure; code,
    ///   message and detail are preserved verbatim.
    /// - [`RpcError::Protocol`]: the response was not a well-formed envelope
    ///   or the result sequence had the wrong arity or shape.
    pub async fn call<P, R>(
        &self,
        method: &str,
        params: &P,
        expect_result: bool,
        allow_absent_result: bool,
        context: Option<&RpcContext>,
        service_version: Option<&str>,
    ) -> Result<Option<Vec<R>>, RpcError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let capture = self
            .next_response_file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();

        if self.token.is_some()
            && self.config.url().scheme() == "http"
            && !self.config.is_insecure_http_allowed()
        {
            return Err(RpcError::Unauthorized(
                "refusing to send credentials over insecure http; use https or explicitly allow \
                 insecure connections"
                    .into(),
            ));
        }

        let call_id = Uuid::new_v4().to_string();
        let mut envelope = serde_json::json!({
            "method": method,
            "version": JSON_RPC_VERSION,
            "id": call_id.as_str(),
        });
        envelope["params"] = serde_json::to_value(params)
            .map_err(|e| RpcError::Protocol(format!("failed to serialize call parameters: {e}")))?;
        if let Some(context) = context {
            envelope["context"] = serde_json::to_value(context)
                .map_err(|e| RpcError::Protocol(format!("failed to serialize call context: {e}")))?;
        }
        let body = serde_json::to_vec(&envelope)
            .map_err(|e| RpcError::Protocol(format!("failed to serialize request envelope: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.config.read_timeout() {
            builder = builder.timeout(timeout);
        }
        if self.config.is_all_certificates_trusted() {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        let mut request = client
            .post(self.target_url(service_version)?)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", token.token());
        }

        // In streaming mode the serialized envelope is staged to disk and
        // sent chunked instead of buffered in memory.
        let mut staging: Option<PathBuf> = None;
        if self.config.is_streaming_mode_on() {
            let path = std::env::temp_dir().join(format!("rpc-request-{call_id}.json"));
            tokio::fs::write(&path, &body).await?;
            let file = tokio::fs::File::open(&path).await?;
            request = request.body(reqwest::Body::wrap_stream(ReaderStream::new(file)));
            staging = Some(path);
        } else {
            request = request.body(body);
        }

        debug!(method = method, id = &*call_id; "RPC: dispatching request");
        let sent = request.send().await;
        if let Some(path) = staging {
            let _ = tokio::fs::remove_file(&path).await;
        }
        let response = sent?;

        let status = response.status();
        let body = response.bytes().await.map_err(RpcError::from)?;
        debug!(method = method, status = status.as_u16(); "RPC: response received");

        if let Some(path) = &capture {
            tokio::fs::write(path, &body).await?;
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(RpcError::Unauthorized(format!(
                "server rejected the call: {}",
                snippet(&body)
            )));
        }
        if !status.is_success() {
            // Failed calls still carry a regular error envelope on some
            // deployments; surface it rather than the bare status.
            if let Ok(envelope) = serde_json::from_slice::<JsonRpcResponse>(&body) {
                if let Some(error) = envelope.error {
                    return Err(server_error(method, error));
                }
            }
            return Err(RpcError::Server {
                code: i64::from(status.as_u16()),
                message: snippet(&body),
                data: None,
            });
        }

        if body.is_empty() {
            if expect_result && !allow_absent_result {
                return Err(RpcError::Protocol(format!(
                    "{method} returned an empty body but a result is required"
                )));
            }
            return Ok(None);
        }

        let envelope: JsonRpcResponse = serde_json::from_slice(&body)
            .map_err(|e| RpcError::Protocol(format!("response is not a JSON-RPC envelope: {e}")))?;

        if let Some(error) = envelope.error {
            return Err(server_error(method, error));
        }

        match envelope.result {
            None | Some(Value::Null) => {
                if expect_result {
                    Err(RpcError::Protocol(format!("{method} returned no result")))
                } else {
                    Ok(None)
                }
            },
            Some(Value::Array(items)) => {
                if items.is_empty() && expect_result {
                    return Err(RpcError::Protocol(format!(
                        "{method} returned an empty result sequence"
                    )));
                }
                let mut decoded = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let value = serde_json::from_value(item).map_err(|e| {
                        RpcError::Protocol(format!(
                            "{method} result element {index} does not match the expected shape: {e}"
                        ))
                    })?;
                    decoded.push(value);
                }
                Ok(Some(decoded))
            },
            Some(other) => Err(RpcError::Protocol(format!(
                "{method} result is not a sequence: {other}"
            ))),
        }
    }

    fn target_url(&self, service_version: Option<&str>) -> Result<Url, RpcError> {
        let mut url = self.config.url().clone();
        if let Some(version) = service_version {
            url.path_segments_mut()
                .map_err(|()| {
                    RpcError::Protocol("service URL cannot carry a version path suffix".into())
                })?
                .pop_if_empty()
                .push(version);
        }
        Ok(url)
    }
}

fn server_error(method: &str, error: ErrorObject) -> RpcError {
    warn!(method = method, code = error.code; "RPC: server reported an error");
    RpcError::Server {
        code: error.code,
        message: error.message,
        data: error.data,
    }
}

fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(200).collect()
}
