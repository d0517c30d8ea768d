//! Error types for authcrypt operations.
//!
//! Every failure of the crate is one variant of [`AuthcryptError`]. The
//! variants follow the lifecycle of an envelope: configuration, input
//! validation, recipient lookup, structural decoding and finally
//! cryptographic verification.
//!
//! Messages for cryptographic failures are intentionally vague. A wrong key
//! and a tampered ciphertext produce the same [`AuthcryptError::AuthenticationFailure`].

use thiserror::Error;

/// Errors that can occur when packing or unpacking an envelope.
#[derive(Debug, Error)]
pub enum AuthcryptError {
    /// The content encryption algorithm is not one of `C20P` / `XC20P`,
    /// or does not match the algorithm of the crypter in use.
    #[error("Unsupported content encryption algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// `pack` was called without any recipient.
    #[error("Empty recipients")]
    EmptyRecipients,

    /// A key is malformed, on a low-order point, or does not match its pair.
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(&'static str),

    /// No recipient entry matches the supplied key identifier.
    #[error("Recipient not found")]
    RecipientNotFound {
        /// The identifier that was looked up, when a single one was given.
        kid: Option<String>,
    },

    /// The envelope is not structurally valid.
    #[error("Malformed envelope: {field}: {reason}")]
    MalformedEnvelope {
        /// The offending field, e.g. `recipients.header.iv`.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Tag verification failed.
    /// Intentionally vague for security.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// The random source could not produce bytes.
    #[error("Random source failure")]
    RandomSource,
}

impl AuthcryptError {
    /// Shorthand for [`AuthcryptError::MalformedEnvelope`].
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for authcrypt operations.
pub type AuthcryptResult<T> = Result<T, AuthcryptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthcryptError::UnsupportedAlgorithm("ROT13".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported content encryption algorithm: ROT13"
        );

        let err = AuthcryptError::EmptyRecipients;
        assert_eq!(err.to_string(), "Empty recipients");

        let err = AuthcryptError::InvalidKeypair("low-order public key");
        assert_eq!(err.to_string(), "Invalid keypair: low-order public key");

        let err = AuthcryptError::RecipientNotFound {
            kid: Some("abc".to_string()),
        };
        assert_eq!(err.to_string(), "Recipient not found");

        let err = AuthcryptError::malformed("iv", "expected 24 bytes, got 12");
        assert_eq!(
            err.to_string(),
            "Malformed envelope: iv: expected 24 bytes, got 12"
        );

        let err = AuthcryptError::AuthenticationFailure;
        assert_eq!(err.to_string(), "Authentication failed");

        let err = AuthcryptError::RandomSource;
        assert_eq!(err.to_string(), "Random source failure");
    }

    #[test]
    fn test_malformed_carries_field() {
        let err = AuthcryptError::malformed("recipients", "missing");
        assert!(matches!(
            err,
            AuthcryptError::MalformedEnvelope { field: "recipients", .. }
        ));
    }

    #[test]
    fn test_error_debug() {
        let err = AuthcryptError::EmptyRecipients;
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("EmptyRecipients"));
    }
}
