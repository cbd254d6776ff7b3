use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No session, an expired one, or one without a user.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The auth service could not be reached or answered unexpectedly.
    #[error("auth service: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
