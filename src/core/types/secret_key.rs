//! `SecretKey` - X25519 private key.

use core::fmt::{self, Debug};

use x25519_dalek::{SharedSecret, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::types::PublicKey;

/// Size of an X25519 secret key.
pub const SECRET_KEY_SIZE: usize = 32;

/// An X25519 secret key.
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts the key
/// - Equality comparison uses constant-time comparison
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; SECRET_KEY_SIZE],
}

impl SecretKey {
    /// Creates a secret key from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::InvalidKeypair`] if the slice is not 32
    /// bytes long.
    pub fn from_bytes(bytes: &[u8]) -> AuthcryptResult<Self> {
        let key: [u8; SECRET_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| AuthcryptError::InvalidKeypair("secret key must be 32 bytes"))?;
        Ok(Self { key })
    }

    /// Returns a reference to the raw key bytes.
    ///
    /// Avoid logging or persisting the returned bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.key
    }

    /// Computes the matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(self.key);
        PublicKey::from_array(x25519_dalek::PublicKey::from(&secret).to_bytes())
    }

    /// X25519 agreement with `public`.
    ///
    /// A non-contributory result means `public` is a low-order point, which
    /// would make the shared secret predictable.
    pub(crate) fn diffie_hellman(&self, public: &PublicKey) -> AuthcryptResult<SharedSecret> {
        let secret = StaticSecret::from(self.key);
        let shared = secret.diffie_hellman(&public.to_x25519());
        if !shared.was_contributory() {
            return Err(AuthcryptError::InvalidKeypair("low-order public key"));
        }
        Ok(shared)
    }
}

impl From<[u8; SECRET_KEY_SIZE]> for SecretKey {
    fn from(key: [u8; SECRET_KEY_SIZE]) -> Self {
        Self { key }
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for SecretKey {}
