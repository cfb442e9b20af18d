//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Bearer token validation settings (HS256 shared secret)
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the token issuer signs with
    pub jwt_secret: SecretString,

    /// Expected `iss` claim; unchecked when unset
    pub issuer: Option<String>,

    /// Expected `aud` claim; unchecked when unset
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("MANAIGER__AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_BYTES));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            issuer: None,
            audience: None,
        }
    }

    #[test]
    fn test_validation_missing_secret() {
        assert!(matches!(
            config("  ").validate(&Environment::Development),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        assert!(config("dev-secret").validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        assert!(matches!(
            config("dev-secret").validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(32))
        ));
        assert!(config(&"x".repeat(32))
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let rendered = format!("{:?}", config("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
