//! Crypter - packs and unpacks authcrypt envelopes.
//!
//! # Pack
//!
//! 1. Reject an empty recipient set and low-order recipient keys
//! 2. Generate a fresh CEK and payload nonce
//! 3. Encrypt the payload once, authenticating `protected || "." || aad`
//! 4. Wrap the CEK for every recipient, binding the payload tag
//!
//! # Unpack
//!
//! 1. Check the envelope's `enc` against the crypter's algorithm
//! 2. Locate the caller's recipient entry by `kid`
//! 3. Open `oid` to learn the sender, unwrap the CEK
//! 4. Verify and decrypt the payload
//!
//! No step releases data before every tag involved has verified.

use core::fmt::{self, Debug};
use std::sync::Arc;

use base64::prelude::*;
use tracing::debug;

use crate::core::algorithm::ContentEncryption;
use crate::core::envelope::{authenticated_data, Envelope, Recipient};
use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::header::ProtectedHeader;
use crate::core::operations::aead::AeadEngine;
use crate::core::operations::kdf::recipients_digest;
use crate::core::operations::sender::open_sender;
use crate::core::operations::wrap::{unwrap_for_recipient, wrap_for_recipient};
use crate::core::provider::KeyProvider;
use crate::core::random::{OsRandom, RandomSource};
use crate::core::types::{ContentKey, KeyPair, PublicKey, SecretKey};

/// Result of a successful unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpacked {
    /// The decrypted payload.
    pub plaintext: Vec<u8>,
    /// The authenticated sender.
    pub sender: PublicKey,
    /// The recipient entry that was opened.
    pub kid: String,
}

/// Packs and unpacks envelopes for one content encryption algorithm.
///
/// A crypter holds no key material. It is cheap to clone and can be shared
/// between threads; every operation takes the keys it needs as arguments.
///
/// # Example
///
/// ```rust
/// use authcrypt::{ContentEncryption, Crypter, KeyPair, OsRandom};
///
/// let crypter = Crypter::new(ContentEncryption::XC20P);
/// let alice = KeyPair::generate(&OsRandom).expect("random");
/// let bob = KeyPair::generate(&OsRandom).expect("random");
///
/// let envelope = crypter
///     .pack(b"hello world", &alice, &[*bob.public()])
///     .expect("pack");
///
/// let plaintext = crypter
///     .unpack(&envelope, bob.secret(), &bob.kid())
///     .expect("unpack");
/// assert_eq!(plaintext, b"hello world");
/// ```
#[derive(Clone)]
pub struct Crypter {
    alg: ContentEncryption,
    nonce_size: usize,
    rng: Arc<dyn RandomSource>,
}

impl Crypter {
    /// Creates a crypter drawing randomness from the operating system.
    #[must_use]
    pub fn new(alg: ContentEncryption) -> Self {
        Self::with_random_source(alg, Arc::new(OsRandom))
    }

    /// Creates a crypter drawing randomness from `rng`.
    #[must_use]
    pub fn with_random_source(alg: ContentEncryption, rng: Arc<dyn RandomSource>) -> Self {
        Self {
            alg,
            nonce_size: alg.nonce_size(),
            rng,
        }
    }

    /// Creates a crypter from an algorithm name (`"C20P"` or `"XC20P"`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::UnsupportedAlgorithm`] for any other name.
    pub fn from_alg_name(name: &str) -> AuthcryptResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// The content encryption algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> ContentEncryption {
        self.alg
    }

    /// Payload nonce length in bytes.
    #[must_use]
    pub const fn nonce_size(&self) -> usize {
        self.nonce_size
    }

    /// Encrypts `plaintext` from `sender` to every key in `recipients`.
    ///
    /// The envelope's `aad` binds the recipient set: a digest of the sorted
    /// recipient `kid`s.
    ///
    /// # Errors
    ///
    /// - [`AuthcryptError::EmptyRecipients`] if `recipients` is empty
    /// - [`AuthcryptError::InvalidKeypair`] if a recipient key is a low-order point
    /// - [`AuthcryptError::RandomSource`] if the random source fails
    pub fn pack(
        &self,
        plaintext: &[u8],
        sender: &KeyPair,
        recipients: &[PublicKey],
    ) -> AuthcryptResult<Envelope> {
        self.pack_with_aad(plaintext, sender, recipients, None)
    }

    /// Like [`Crypter::pack`], using `aad` as the envelope's additional
    /// authenticated data when given. An empty `aad` leaves the field out
    /// and authenticates the protected header alone.
    ///
    /// # Errors
    ///
    /// Same as [`Crypter::pack`].
    pub fn pack_with_aad(
        &self,
        plaintext: &[u8],
        sender: &KeyPair,
        recipients: &[PublicKey],
        aad: Option<&[u8]>,
    ) -> AuthcryptResult<Envelope> {
        if recipients.is_empty() {
            return Err(AuthcryptError::EmptyRecipients);
        }

        // Reject low-order recipient keys before drawing any key material
        for recipient in recipients {
            sender.secret().diffie_hellman(recipient).map(drop)?;
        }

        let source = self.rng.as_ref();
        let protected = ProtectedHeader::for_algorithm(self.alg).encode()?;
        let aad = match aad {
            Some([]) => None,
            Some(aad) => Some(BASE64_URL_SAFE_NO_PAD.encode(aad)),
            None => {
                let kids: Vec<String> = recipients.iter().map(PublicKey::kid).collect();
                Some(BASE64_URL_SAFE_NO_PAD.encode(recipients_digest(
                    kids.iter().map(String::as_str),
                )))
            }
        };

        let cek = ContentKey::generate(source)?;
        let mut iv = vec![0u8; self.nonce_size];
        source.try_fill(&mut iv)?;

        let (ciphertext, tag) = AeadEngine::new(self.alg).seal(
            cek.as_bytes(),
            &iv,
            &authenticated_data(&protected, aad.as_deref()),
            plaintext,
        )?;

        let entries = recipients
            .iter()
            .map(|recipient| {
                wrap_for_recipient(self.alg, &cek, sender, recipient, &tag, source)
            })
            .collect::<AuthcryptResult<Vec<Recipient>>>()?;

        debug!(
            enc = %self.alg,
            sender = %sender.public(),
            recipients = entries.len(),
            "Packed envelope"
        );

        Ok(Envelope::new(
            self.alg,
            protected,
            entries,
            aad,
            iv,
            tag.to_vec(),
            ciphertext,
        ))
    }

    /// Decrypts `envelope` with the secret key of recipient `kid`.
    ///
    /// # Errors
    ///
    /// - [`AuthcryptError::UnsupportedAlgorithm`] if the envelope uses another algorithm
    /// - [`AuthcryptError::RecipientNotFound`] if no entry is addressed to `kid`
    /// - [`AuthcryptError::AuthenticationFailure`] if any tag fails to verify
    pub fn unpack(
        &self,
        envelope: &Envelope,
        recipient: &SecretKey,
        kid: &str,
    ) -> AuthcryptResult<Vec<u8>> {
        self.unpack_with_sender(envelope, recipient, kid)
            .map(|unpacked| unpacked.plaintext)
    }

    /// Like [`Crypter::unpack`], also returning the authenticated sender.
    ///
    /// # Errors
    ///
    /// Same as [`Crypter::unpack`].
    pub fn unpack_with_sender(
        &self,
        envelope: &Envelope,
        recipient: &SecretKey,
        kid: &str,
    ) -> AuthcryptResult<Unpacked> {
        self.check_algorithm(envelope)?;

        let entry = envelope.recipient(kid).ok_or_else(|| {
            debug!(kid, "No recipient entry for key");
            AuthcryptError::RecipientNotFound {
                kid: Some(kid.to_string()),
            }
        })?;

        self.open_entry(envelope, entry, recipient)
    }

    /// Decrypts `envelope` with the first recipient entry whose `kid`
    /// `provider` holds a key pair for.
    ///
    /// # Errors
    ///
    /// - [`AuthcryptError::RecipientNotFound`] if the provider holds none
    /// - otherwise as [`Crypter::unpack`]
    pub fn unpack_with_keys<P>(&self, envelope: &Envelope, provider: &P) -> AuthcryptResult<Unpacked>
    where
        P: KeyProvider + ?Sized,
    {
        self.check_algorithm(envelope)?;

        for entry in envelope.recipients() {
            if let Some(pair) = provider.key_pair(entry.kid()) {
                return self.open_entry(envelope, entry, pair.secret());
            }
        }

        debug!(
            recipients = envelope.recipients().len(),
            "No local key for any recipient entry"
        );
        Err(AuthcryptError::RecipientNotFound { kid: None })
    }

    /// Decodes `bytes` and unpacks the result.
    ///
    /// # Errors
    ///
    /// - [`AuthcryptError::MalformedEnvelope`] if `bytes` is not a valid envelope
    /// - otherwise as [`Crypter::unpack`]
    pub fn unpack_bytes(
        &self,
        bytes: &[u8],
        recipient: &SecretKey,
        kid: &str,
    ) -> AuthcryptResult<Vec<u8>> {
        let envelope = Envelope::decode(bytes)?;
        self.unpack(&envelope, recipient, kid)
    }

    fn check_algorithm(&self, envelope: &Envelope) -> AuthcryptResult<()> {
        let enc = envelope.content_encryption();
        if enc == self.alg {
            Ok(())
        } else {
            Err(AuthcryptError::UnsupportedAlgorithm(enc.to_string()))
        }
    }

    fn open_entry(
        &self,
        envelope: &Envelope,
        entry: &Recipient,
        recipient: &SecretKey,
    ) -> AuthcryptResult<Unpacked> {
        let sender = open_sender(entry.header().oid(), recipient)?;
        let cek = unwrap_for_recipient(self.alg, entry, recipient, &sender, envelope.tag())?;

        let plaintext = AeadEngine::new(self.alg).open(
            cek.as_bytes(),
            envelope.iv(),
            &envelope.authenticated_data(),
            envelope.ciphertext(),
            envelope.tag(),
        )?;

        debug!(enc = %self.alg, kid = entry.kid(), sender = %sender, "Unpacked envelope");

        Ok(Unpacked {
            plaintext,
            sender,
            kid: entry.kid().to_string(),
        })
    }
}

impl Debug for Crypter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crypter")
            .field("alg", &self.alg)
            .field("nonce_size", &self.nonce_size)
            .finish_non_exhaustive()
    }
}
