//! Request authentication.
//!
//! Sessions are owned by an external auth service; this crate only asks it
//! who the caller is.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod client;
mod error;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

pub use client::{GET_SESSION_PATH, HttpSessionVerifier};
pub use error::AuthError;

/// The caller behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), email: None, name: None }
    }
}

/// Resolves request headers to an authenticated user.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError>;
}
