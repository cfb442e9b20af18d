//! Session validation port for bearer token validation.
//!
//! Provider-agnostic: the HTTP middleware only depends on this trait. The
//! shipped implementations are an HS256 JWT validator and a mock used in
//! tests.
//!
//! All implementations MUST validate:
//! - **Signature**
//! - **Issuer (iss)** and **Audience (aud)** when configured
//! - **Expiry (exp)**

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient or configuration errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
