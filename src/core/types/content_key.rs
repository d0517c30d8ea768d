//! `ContentKey` - the content-encryption key (CEK) of one envelope.

use core::fmt::{self, Debug};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::algorithm::KEY_SIZE;
use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::random::RandomSource;

/// A 256-bit symmetric key that encrypts one payload.
///
/// A fresh key is generated for every envelope and wrapped separately for
/// each recipient. It is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    key: [u8; KEY_SIZE],
}

impl ContentKey {
    /// Generates a new random content key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::RandomSource`] if `source` fails.
    pub fn generate(source: &dyn RandomSource) -> AuthcryptResult<Self> {
        let mut key = Self {
            key: [0u8; KEY_SIZE],
        };
        source.try_fill(&mut key.key)?;
        Ok(key)
    }

    /// Creates a content key from unwrapped bytes.
    pub(crate) fn from_slice(bytes: &[u8]) -> AuthcryptResult<Self> {
        let key: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| AuthcryptError::malformed("recipients.encrypted_key", "bad key size"))?;
        Ok(Self { key })
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for ContentKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for ContentKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::{OsRandom, SeededRandom};

    #[test]
    fn test_generate_unique() -> AuthcryptResult<()> {
        let a = ContentKey::generate(&OsRandom)?;
        let b = ContentKey::generate(&OsRandom)?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_generate_seeded() -> AuthcryptResult<()> {
        let a = ContentKey::generate(&SeededRandom::seed_from_u64(5))?;
        let b = ContentKey::generate(&SeededRandom::seed_from_u64(5))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_from_slice_length() {
        assert!(ContentKey::from_slice(&[0u8; 32]).is_ok());
        let result = ContentKey::from_slice(&[0u8; 16]);
        assert!(matches!(
            result,
            Err(AuthcryptError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() -> AuthcryptResult<()> {
        let key = ContentKey::generate(&OsRandom)?;
        assert!(format!("{key:?}").contains("[REDACTED]"));
        Ok(())
    }
}
