//! Lookup of locally held recipient keys.

use crate::core::types::KeyPair;

/// Resolves a recipient key identifier to a locally held key pair.
///
/// [`Crypter::unpack_with_keys`](crate::Crypter::unpack_with_keys) walks an
/// envelope's recipient entries and asks the provider for each `kid` in
/// turn. Wallets and key stores implement this over their own storage.
pub trait KeyProvider {
    /// The key pair addressed by `kid`, if this provider holds it.
    fn key_pair(&self, kid: &str) -> Option<KeyPair>;
}

impl KeyProvider for [KeyPair] {
    fn key_pair(&self, kid: &str) -> Option<KeyPair> {
        self.iter().find(|pair| pair.kid() == kid).cloned()
    }
}

impl KeyProvider for Vec<KeyPair> {
    fn key_pair(&self, kid: &str) -> Option<KeyPair> {
        self.as_slice().key_pair(kid)
    }
}

impl KeyProvider for KeyPair {
    fn key_pair(&self, kid: &str) -> Option<KeyPair> {
        (self.kid() == kid).then(|| self.clone())
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for &P {
    fn key_pair(&self, kid: &str) -> Option<KeyPair> {
        (**self).key_pair(kid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AuthcryptResult;
    use crate::core::random::SeededRandom;

    #[test]
    fn test_slice_provider() -> AuthcryptResult<()> {
        let source = SeededRandom::seed_from_u64(3);
        let keys = vec![KeyPair::generate(&source)?, KeyPair::generate(&source)?];

        let found = keys.key_pair(&keys[1].kid());
        assert_eq!(found.as_ref(), Some(&keys[1]));
        assert!(keys.as_slice().key_pair("unknown").is_none());
        Ok(())
    }

    #[test]
    fn test_single_pair_provider() -> AuthcryptResult<()> {
        let source = SeededRandom::seed_from_u64(4);
        let pair = KeyPair::generate(&source)?;

        assert!(pair.key_pair(&pair.kid()).is_some());
        assert!(pair.key_pair("unknown").is_none());
        Ok(())
    }
}
