//! Content encryption algorithms.
//!
//! Two algorithms are supported, both from the ChaCha20-Poly1305 family:
//!
//! | Name | Cipher | Nonce |
//! |------|--------|-------|
//! | `C20P` | ChaCha20-Poly1305 (IETF) | 96 bits |
//! | `XC20P` | XChaCha20-Poly1305 | 192 bits |
//!
//! Nonces are always drawn at random. With a 96-bit nonce the birthday bound
//! is reached after roughly 2^48 messages under one key, so `XC20P` is the
//! right choice for high-volume senders.

use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::AuthcryptError;

/// Size of every symmetric key used by the crate (CEK and KEK).
pub const KEY_SIZE: usize = 32;

/// Size of the Poly1305 authentication tag.
pub const TAG_SIZE: usize = 16;

/// Nonce size of `C20P`.
pub const C20P_NONCE_SIZE: usize = 12;

/// Nonce size of `XC20P`.
pub const XC20P_NONCE_SIZE: usize = 24;

/// A content encryption algorithm.
///
/// The set is closed: any other algorithm name fails to parse with
/// [`AuthcryptError::UnsupportedAlgorithm`].
///
/// ```rust
/// use authcrypt::ContentEncryption;
///
/// let alg: ContentEncryption = "XC20P".parse().expect("supported");
/// assert_eq!(alg.nonce_size(), 24);
/// assert!("ROT13".parse::<ContentEncryption>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEncryption {
    /// ChaCha20-Poly1305 with a 96-bit nonce.
    #[serde(rename = "C20P")]
    C20P,
    /// XChaCha20-Poly1305 with a 192-bit nonce.
    #[serde(rename = "XC20P")]
    XC20P,
}

impl ContentEncryption {
    /// All supported algorithms.
    pub const ALL: [Self; 2] = [Self::C20P, Self::XC20P];

    /// The algorithm identifier used in the protected header `enc` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::C20P => "C20P",
            Self::XC20P => "XC20P",
        }
    }

    /// The key management identifier used in the protected header `alg`
    /// field, and as the Concat KDF algorithm id.
    #[must_use]
    pub const fn key_wrap_alg(self) -> &'static str {
        match self {
            Self::C20P => "ECDH-SS+C20PKW",
            Self::XC20P => "ECDH-SS+XC20PKW",
        }
    }

    /// Nonce length in bytes.
    #[must_use]
    pub const fn nonce_size(self) -> usize {
        match self {
            Self::C20P => C20P_NONCE_SIZE,
            Self::XC20P => XC20P_NONCE_SIZE,
        }
    }
}

impl Display for ContentEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentEncryption {
    type Err = AuthcryptError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "C20P" => Ok(Self::C20P),
            "XC20P" => Ok(Self::XC20P),
            other => Err(AuthcryptError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl TryFrom<&str> for ContentEncryption {
    type Error = AuthcryptError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_sizes() {
        assert_eq!(ContentEncryption::C20P.nonce_size(), 12);
        assert_eq!(ContentEncryption::XC20P.nonce_size(), 24);
    }

    #[test]
    fn test_parse_supported() -> Result<(), AuthcryptError> {
        assert_eq!("C20P".parse::<ContentEncryption>()?, ContentEncryption::C20P);
        assert_eq!(
            ContentEncryption::try_from("XC20P")?,
            ContentEncryption::XC20P
        );
        Ok(())
    }

    #[test]
    fn test_parse_unsupported() {
        let result = "ROT13".parse::<ContentEncryption>();
        assert!(matches!(
            result,
            Err(AuthcryptError::UnsupportedAlgorithm(ref name)) if name == "ROT13"
        ));

        // Names are case sensitive
        assert!("xc20p".parse::<ContentEncryption>().is_err());
        assert!("".parse::<ContentEncryption>().is_err());
    }

    #[test]
    fn test_display_matches_header_names() {
        for alg in ContentEncryption::ALL {
            assert_eq!(alg.to_string(), alg.as_str());
            assert_eq!(alg.key_wrap_alg(), format!("ECDH-SS+{alg}KW"));
        }
    }

    #[test]
    fn test_serde_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&ContentEncryption::XC20P)?, "\"XC20P\"");
        let alg: ContentEncryption = serde_json::from_str("\"C20P\"")?;
        assert_eq!(alg, ContentEncryption::C20P);
        assert!(serde_json::from_str::<ContentEncryption>("\"A256GCM\"").is_err());
        Ok(())
    }
}
