//! Admin token authentication.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Verifies admin Bearer tokens.
///
/// Only the HMAC-SHA256 of the admin token (keyed by `signing_secret`) is
/// configured, so the server never holds the raw token. Without a configured
/// hash every request is rejected.
#[derive(Clone)]
pub struct AuthService {
    signing_secret: String,
    admin_token_hash: Option<Vec<u8>>,
}

impl AuthService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the one used by `admin token create`
    /// - `admin_token_hash` - hex-encoded HMAC of the admin token, if any
    ///
    /// # Errors
    ///
    /// Returns an error if `admin_token_hash` is not valid hex.
    pub fn new(
        signing_secret: impl Into<String>,
        admin_token_hash: Option<&str>,
    ) -> Result<Self, hex::FromHexError> {
        let admin_token_hash = admin_token_hash
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(hex::decode)
            .transpose()?;

        Ok(Self {
            signing_secret: signing_secret.into(),
            admin_token_hash,
        })
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Hashes a raw token. Returns a 64-character lowercase hex MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Returns true if an admin token hash is configured.
    pub fn is_configured(&self) -> bool {
        self.admin_token_hash.is_some()
    }

    /// Checks a raw token against the configured hash in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if no hash is configured or the
    /// token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let Some(expected) = &self.admin_token_hash else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Admin API is not configured" }),
            ));
        };

        let mut mac = self.mac();
        mac.update(token.as_bytes());
        mac.verify_slice(expected).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    fn configured_for(token: &str) -> AuthService {
        let hash = AuthService::new(SECRET, None).unwrap().hash_token(token);
        AuthService::new(SECRET, Some(&hash)).unwrap()
    }

    #[test]
    fn test_authenticate_success() {
        assert!(configured_for("admin-token").authenticate("admin-token").is_ok());
    }

    #[test]
    fn test_authenticate_wrong_token() {
        let err = configured_for("admin-token").authenticate("guess").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_authenticate_without_configured_hash() {
        let service = AuthService::new(SECRET, None).unwrap();
        assert!(!service.is_configured());
        assert!(service.authenticate("anything").is_err());
    }

    #[test]
    fn test_blank_hash_means_unconfigured() {
        assert!(!AuthService::new(SECRET, Some("  ")).unwrap().is_configured());
    }

    #[test]
    fn test_invalid_hex_hash_is_rejected() {
        assert!(AuthService::new(SECRET, Some("not-hex")).is_err());
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let a = AuthService::new("secret-a", None).unwrap().hash_token("t");
        let b = AuthService::new("secret-b", None).unwrap().hash_token("t");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
