//! AEAD engine for content and key encryption.
//!
//! Both algorithms use a detached 16-byte Poly1305 tag. Opening verifies the
//! tag before any plaintext is released; on failure nothing is returned.

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag, XChaCha20Poly1305, XNonce};

use crate::core::algorithm::{ContentEncryption, KEY_SIZE, TAG_SIZE};
use crate::core::error::{AuthcryptError, AuthcryptResult};

/// Output of [`AeadEngine::seal`]: ciphertext and detached tag.
pub type SealedOutput = (Vec<u8>, [u8; TAG_SIZE]);

/// Seal/open primitives for one [`ContentEncryption`] algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadEngine {
    alg: ContentEncryption,
}

impl AeadEngine {
    /// Creates the engine for `alg`.
    #[must_use]
    pub const fn new(alg: ContentEncryption) -> Self {
        Self { alg }
    }

    /// The algorithm this engine runs.
    #[must_use]
    pub const fn algorithm(&self) -> ContentEncryption {
        self.alg
    }

    /// Required nonce length in bytes.
    #[must_use]
    pub const fn nonce_size(&self) -> usize {
        self.alg.nonce_size()
    }

    /// Encrypts `plaintext`, authenticating it together with `aad`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] if `nonce` has the wrong
    /// length for the algorithm.
    pub fn seal(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> AuthcryptResult<SealedOutput> {
        self.check_nonce(nonce)?;

        let mut buffer = plaintext.to_vec();
        let key = Key::from_slice(key);
        let tag = match self.alg {
            ContentEncryption::C20P => ChaCha20Poly1305::new(key).encrypt_in_place_detached(
                Nonce::from_slice(nonce),
                aad,
                &mut buffer,
            ),
            ContentEncryption::XC20P => XChaCha20Poly1305::new(key).encrypt_in_place_detached(
                XNonce::from_slice(nonce),
                aad,
                &mut buffer,
            ),
        }
        // Only reachable for payloads beyond the cipher's 256 GiB limit
        .map_err(|_| AuthcryptError::malformed("ciphertext", "payload too large"))?;

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);
        Ok((buffer, tag_bytes))
    }

    /// Decrypts `ciphertext` after verifying `tag` over it and `aad`.
    ///
    /// # Errors
    ///
    /// - [`AuthcryptError::MalformedEnvelope`] if the nonce or tag length is wrong
    /// - [`AuthcryptError::AuthenticationFailure`] if verification fails
    pub fn open(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> AuthcryptResult<Vec<u8>> {
        self.check_nonce(nonce)?;
        if tag.len() != TAG_SIZE {
            return Err(AuthcryptError::malformed(
                "tag",
                format!("expected {TAG_SIZE} bytes, got {}", tag.len()),
            ));
        }

        let mut buffer = ciphertext.to_vec();
        let key = Key::from_slice(key);
        let tag = Tag::from_slice(tag);
        let verified = match self.alg {
            ContentEncryption::C20P => ChaCha20Poly1305::new(key).decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                aad,
                &mut buffer,
                tag,
            ),
            ContentEncryption::XC20P => XChaCha20Poly1305::new(key).decrypt_in_place_detached(
                XNonce::from_slice(nonce),
                aad,
                &mut buffer,
                tag,
            ),
        };

        match verified {
            Ok(()) => Ok(buffer),
            Err(_) => Err(AuthcryptError::AuthenticationFailure),
        }
    }

    fn check_nonce(&self, nonce: &[u8]) -> AuthcryptResult<()> {
        if nonce.len() == self.nonce_size() {
            Ok(())
        } else {
            Err(AuthcryptError::malformed(
                "iv",
                format!(
                    "expected {} bytes for {}, got {}",
                    self.nonce_size(),
                    self.alg,
                    nonce.len()
                ),
            ))
        }
    }
}
