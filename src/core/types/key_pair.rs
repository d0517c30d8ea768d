//! `KeyPair` - a secret key together with its public key.

use core::fmt::{self, Debug};

use zeroize::Zeroizing;

use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::random::{random_array, RandomSource};
use crate::core::types::{PublicKey, SecretKey, SECRET_KEY_SIZE};

/// An X25519 keypair used to send or receive envelopes.
///
/// The public half always matches the secret half; every constructor
/// enforces it.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generates a fresh keypair from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::RandomSource`] if `source` fails.
    pub fn generate(source: &dyn RandomSource) -> AuthcryptResult<Self> {
        let bytes = Zeroizing::new(random_array::<SECRET_KEY_SIZE>(source)?);
        Ok(Self::from_secret(SecretKey::from(*bytes)))
    }

    /// Builds the keypair of an existing secret key.
    #[must_use]
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Pairs a secret key with a claimed public key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::InvalidKeypair`] if `public` is not the
    /// public key of `secret`.
    pub fn try_from_parts(secret: SecretKey, public: PublicKey) -> AuthcryptResult<Self> {
        if secret.public_key() != public {
            return Err(AuthcryptError::InvalidKeypair(
                "public key does not match secret key",
            ));
        }
        Ok(Self { secret, public })
    }

    /// Converts an Ed25519 keypair (`seed || public`, 64 bytes) into the
    /// X25519 keypair used for agreement.
    ///
    /// The resulting public key equals
    /// [`PublicKey::from_ed25519`] applied to the Ed25519 public half.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::InvalidKeypair`] if the public half does not
    /// match the seed.
    pub fn from_ed25519_keypair_bytes(keypair: &[u8; 64]) -> AuthcryptResult<Self> {
        use ed25519_dalek::SigningKey;

        let signing = SigningKey::from_keypair_bytes(keypair)
            .map_err(|_| AuthcryptError::InvalidKeypair("invalid Ed25519 keypair"))?;

        // X25519 clamps the scalar on use, giving the same scalar Ed25519 signs with
        let scalar = Zeroizing::new(signing.to_scalar_bytes());
        Ok(Self::from_secret(SecretKey::from(*scalar)))
    }

    /// The secret half.
    #[must_use]
    pub const fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// The public half.
    #[must_use]
    pub const fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The key identifier of the public half.
    #[must_use]
    pub fn kid(&self) -> String {
        self.public.kid()
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
