//! Protected header of an envelope.
//!
//! The header is a JSON object with three string members, always written in
//! this order:
//!
//! ```json
//! {"typ":"prs.hyperledger.aries-auth-message","alg":"ECDH-SS+XC20PKW","enc":"XC20P"}
//! ```
//!
//! It travels base64url-encoded in the envelope's `protected` field and the
//! encoded form is bound into the payload tag.

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::algorithm::ContentEncryption;
use crate::core::error::{AuthcryptError, AuthcryptResult};

/// Media type of authcrypt messages.
pub const AUTHCRYPT_TYP: &str = "prs.hyperledger.aries-auth-message";

/// The decoded protected header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    /// Message type.
    pub typ: String,
    /// Key management algorithm.
    pub alg: String,
    /// Content encryption algorithm.
    pub enc: String,
}

impl ProtectedHeader {
    /// The header for envelopes encrypted with `alg`.
    #[must_use]
    pub fn for_algorithm(alg: ContentEncryption) -> Self {
        Self {
            typ: AUTHCRYPT_TYP.to_string(),
            alg: alg.key_wrap_alg().to_string(),
            enc: alg.as_str().to_string(),
        }
    }

    /// Encodes the header into its `protected` field form.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] if serialization fails.
    pub fn encode(&self) -> AuthcryptResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| AuthcryptError::malformed("protected", e.to_string()))?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a `protected` field.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] if the field is not
    /// base64url JSON with string `typ`, `alg` and `enc` members.
    pub fn decode(protected: &str) -> AuthcryptResult<Self> {
        let json = BASE64_URL_SAFE_NO_PAD
            .decode(protected)
            .map_err(|e| AuthcryptError::malformed("protected", e.to_string()))?;
        serde_json::from_slice(&json)
            .map_err(|e| AuthcryptError::malformed("protected", e.to_string()))
    }

    /// Resolves and cross-checks the declared algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] if `enc` is unknown or
    /// `alg` does not belong to it.
    pub fn content_encryption(&self) -> AuthcryptResult<ContentEncryption> {
        let enc: ContentEncryption = self.enc.parse().map_err(|_| {
            AuthcryptError::malformed("protected", format!("unsupported enc {}", self.enc))
        })?;

        if self.alg != enc.key_wrap_alg() {
            return Err(AuthcryptError::malformed(
                "protected",
                format!("alg {} does not match enc {enc}", self.alg),
            ));
        }

        Ok(enc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_json_field_order() -> Result<(), serde_json::Error> {
        let header = ProtectedHeader::for_algorithm(ContentEncryption::XC20P);
        assert_eq!(
            serde_json::to_string(&header)?,
            r#"{"typ":"prs.hyperledger.aries-auth-message","alg":"ECDH-SS+XC20PKW","enc":"XC20P"}"#
        );
        Ok(())
    }

    #[test]
    fn test_encode_decode() -> AuthcryptResult<()> {
        for alg in ContentEncryption::ALL {
            let header = ProtectedHeader::for_algorithm(alg);
            let encoded = header.encode()?;
            assert!(!encoded.contains('='));

            let decoded = ProtectedHeader::decode(&encoded)?;
            assert_eq!(decoded, header);
            assert_eq!(decoded.content_encryption()?, alg);
        }
        Ok(())
    }

    #[test]
    fn test_decode_invalid_base64() {
        let result = ProtectedHeader::decode("!!!invalid!!!");
        assert!(matches!(
            result,
            Err(AuthcryptError::MalformedEnvelope { field: "protected", .. })
        ));
    }

    #[test]
    fn test_decode_not_json() {
        let encoded = BASE64_URL_SAFE_NO_PAD.encode("not json");
        let result = ProtectedHeader::decode(&encoded);
        assert!(matches!(
            result,
            Err(AuthcryptError::MalformedEnvelope { field: "protected", .. })
        ));
    }

    #[test]
    fn test_unsupported_enc() {
        let header = ProtectedHeader {
            typ: AUTHCRYPT_TYP.to_string(),
            alg: "ECDH-SS+ROT13KW".to_string(),
            enc: "ROT13".to_string(),
        };
        assert!(matches!(
            header.content_encryption(),
            Err(AuthcryptError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_mismatched_alg() {
        let mut header = ProtectedHeader::for_algorithm(ContentEncryption::C20P);
        header.alg = ContentEncryption::XC20P.key_wrap_alg().to_string();
        assert!(matches!(
            header.content_encryption(),
            Err(AuthcryptError::MalformedEnvelope { .. })
        ));
    }
}
