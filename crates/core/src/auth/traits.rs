use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthRequest, Identity};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Credential check performed before a conversion is accepted.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a request and return the caller's identity.
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError>;

    /// Name of this authentication method, as reported in the config
    /// endpoint and logs.
    fn method_name(&self) -> &'static str;
}
