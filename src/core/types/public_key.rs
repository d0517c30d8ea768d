//! `PublicKey` - X25519 public key of a sender or recipient.
//!
//! The textual form of a public key is its key identifier (`kid`):
//! `base64url(key)` without padding. Recipients use it to find their entry
//! in an envelope.

use core::fmt::{self, Debug, Display};

use base64::prelude::*;

use crate::core::error::{AuthcryptError, AuthcryptResult};

/// Size of an X25519 public key.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// An X25519 public key.
///
/// # Example
///
/// ```rust
/// use authcrypt::PublicKey;
///
/// let key = PublicKey::from_bytes(&[9u8; 32]).expect("valid length");
/// let kid = key.kid();
/// assert_eq!(PublicKey::try_from(kid.as_str()).expect("valid kid"), key);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Creates a public key from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::InvalidKeypair`] if the slice is not 32
    /// bytes long or is the all-zero point.
    pub fn from_bytes(bytes: &[u8]) -> AuthcryptResult<Self> {
        let key: [u8; PUBLIC_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| AuthcryptError::InvalidKeypair("public key must be 32 bytes"))?;

        if key == [0u8; PUBLIC_KEY_SIZE] {
            return Err(AuthcryptError::InvalidKeypair("all-zero public key"));
        }

        Ok(Self { key })
    }

    /// Converts an Ed25519 verification key to its X25519 (Montgomery) form.
    ///
    /// DID documents usually publish Ed25519 keys; this yields the key that
    /// agreement with the matching [`KeyPair::from_ed25519_keypair_bytes`]
    /// produces.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::InvalidKeypair`] if `verifying_key` is not a
    /// valid compressed Edwards point.
    ///
    /// [`KeyPair::from_ed25519_keypair_bytes`]: crate::KeyPair::from_ed25519_keypair_bytes
    pub fn from_ed25519(verifying_key: &[u8; 32]) -> AuthcryptResult<Self> {
        use ed25519_dalek::VerifyingKey;

        let verifying = VerifyingKey::from_bytes(verifying_key)
            .map_err(|_| AuthcryptError::InvalidKeypair("invalid Ed25519 public key"))?;

        Self::from_bytes(verifying.to_montgomery().as_bytes())
    }

    pub(crate) const fn from_array(key: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.key
    }

    /// The key identifier recipients are addressed by.
    #[must_use]
    pub fn kid(&self) -> String {
        BASE64_URL_SAFE_NO_PAD.encode(self.key)
    }

    pub(crate) fn to_x25519(self) -> x25519_dalek::PublicKey {
        x25519_dalek::PublicKey::from(self.key)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kid())
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.kid()).finish()
    }
}

impl TryFrom<&str> for PublicKey {
    type Error = AuthcryptError;

    fn try_from(kid: &str) -> Result<Self, Self::Error> {
        let bytes = BASE64_URL_SAFE_NO_PAD
            .decode(kid)
            .map_err(|_| AuthcryptError::InvalidKeypair("kid is not base64url"))?;
        Self::from_bytes(&bytes)
    }
}
