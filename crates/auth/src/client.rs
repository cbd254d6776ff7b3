//! Session lookup over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AuthError, AuthenticatedUser, SessionVerifier};

pub const GET_SESSION_PATH: &str = "/api/auth/get-session";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Forwarded headers carrying the caller's credentials.
const FORWARDED: [reqwest::header::HeaderName; 2] = [COOKIE, AUTHORIZATION];

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    id: Option<String>,
    email: Option<String>,
    name: Option<String>,
}

/// Asks `{base_url}/api/auth/get-session` who owns the forwarded session.
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionVerifier {
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Upstream(format!("client init: {e}")))?;
        let endpoint = format!("{}{GET_SESSION_PATH}", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let mut forwarded = HeaderMap::new();
        for name in FORWARDED {
            for value in headers.get_all(&name) {
                forwarded.append(name.clone(), value.clone());
            }
        }
        if forwarded.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let response = self.client.get(&self.endpoint).headers(forwarded).send().await?;
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::Unauthenticated);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Session lookup failed");
            return Err(AuthError::Upstream(format!("HTTP {status}")));
        }

        let body = response.text().await?;
        let envelope: Option<SessionEnvelope> = serde_json::from_str(&body)
            .map_err(|e| AuthError::Upstream(format!("invalid session body: {e}")))?;

        let user = envelope.and_then(|env| env.user).ok_or(AuthError::Unauthenticated)?;
        let user_id =
            user.id.filter(|id| !id.trim().is_empty()).ok_or(AuthError::Unauthenticated)?;
        debug!(user_id = %user_id, "Session verified");
        Ok(AuthenticatedUser { user_id, email: user.email, name: user.name })
    }
}
