//! Bearer credentials and the username/password exchange.
//!
//! A [`AuthToken`] is an opaque bearer token with an associated user
//! identity and optional expiry. Tokens are either injected directly
//! (no validation) or obtained by exchanging a username and password
//! against an authorization endpoint; the exchange itself is the
//! validation. Tokens are never refreshed automatically, and an expired token
//! simply starts failing calls with an authorization error.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::rpc::RpcError;

/// Authorization endpoint used by [`AuthToken::login`].
pub const DEFAULT_AUTH_URL: &str = "https://kbase.us/services/auth/api/legacy/KBase/Sessions/Login";

const LOGIN_TIMEOUT_SECS: u64 = 30;

/// An opaque bearer token tied to a user identity.
#[derive(Debug, Clone)]
pub struct AuthToken {
    token: String,
    user: String,
    expiry: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user_id: String,
    /// Expiry as milliseconds since the epoch, when the endpoint reports one.
    #[serde(default)]
    expires: Option<i64>,
}

impl AuthToken {
    /// Wraps an externally obtained token. No validation is performed.
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: user.into(),
            expiry: None,
        }
    }

    /// Like [`new`](Self::new), with a known expiry.
    pub fn with_expiry(
        token: impl Into<String>,
        user: impl Into<String>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            user: user.into(),
            expiry: Some(expiry),
        }
    }

    /// Exchanges a username and password for a token against
    /// [`DEFAULT_AUTH_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Unauthorized`] if the endpoint rejects the
    /// credentials.
    pub async fn login(user: &str, password: &str) -> Result<Self, RpcError> {
        let auth_url = Url::parse(DEFAULT_AUTH_URL)
            .map_err(|e| RpcError::Protocol(format!("default authorization URL is invalid: {e}")))?;
        Self::login_with_url(&auth_url, user, password).await
    }

    /// Exchanges a username and password for a token against a custom
    /// authorization endpoint.
    pub async fn login_with_url(auth_url: &Url, user: &str, password: &str) -> Result<Self, RpcError> {
        debug!(user = user; "AUTH: exchanging credentials for a token");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(LOGIN_TIMEOUT_SECS))
            .build()?;

        let response = client
            .post(auth_url.clone())
            .form(&[
                ("user_id", user),
                ("password", password),
                ("fields", "user_id,token,expires"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await.map_err(RpcError::from)?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RpcError::Unauthorized(
                "authorization endpoint rejected the credentials".into(),
            ));
        }
        if !status.is_success() {
            return Err(RpcError::Server {
                code: i64::from(status.as_u16()),
                message: String::from_utf8_lossy(&body).chars().take(200).collect(),
                data: None,
            });
        }

        let login: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| RpcError::Protocol(format!("authorization response is not valid JSON: {e}")))?;
        Ok(Self {
            token: login.token,
            user: login.user_id,
            expiry: login.expires.and_then(DateTime::from_timestamp_millis),
        })
    }

    /// The raw token value sent in the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The user identity this token belongs to.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// True when a known expiry lies in the past. A token without a known
    /// expiry is never considered expired locally.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= Utc::now())
    }
}
