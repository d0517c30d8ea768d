//! Anonymous sealing of the sender's public key (`oid` header).
//!
//! Each recipient entry carries the sender's public key sealed to that
//! recipient, so the recipient learns who sent the envelope without any
//! out-of-band context and nobody else does. The construction:
//!
//! - X25519 between a fresh ephemeral key and the recipient's key
//! - BLAKE2b key derivation of an encryption key and an authentication key
//! - XChaCha20 encryption of the 32-byte sender key
//! - BLAKE2b-MAC tag over `header || epk || ciphertext`
//!
//! Wire form: `epk (32) || ciphertext (32) || tag (32)`.

use blake2::digest::{FixedOutput, KeyInit, Update};
use blake2::Blake2bMac;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroizing;

use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::random::{random_array, RandomSource};
use crate::core::types::{PublicKey, SecretKey, PUBLIC_KEY_SIZE};

/// Size of the ephemeral public key.
pub const OID_EPHEMERAL_SIZE: usize = 32;

/// Size of the encrypted sender key.
pub const OID_CIPHERTEXT_SIZE: usize = PUBLIC_KEY_SIZE;

/// Size of the authentication tag.
pub const OID_TAG_SIZE: usize = 32;

/// Total size of a sealed sender key.
pub const OID_SIZE: usize = OID_EPHEMERAL_SIZE + OID_CIPHERTEXT_SIZE + OID_TAG_SIZE;

/// Header bound into the tag.
const OID_HEADER: &[u8] = b"authcrypt.oid.";

/// Domain separation for the encryption key.
const OID_EK_DOMAIN: &[u8] = b"authcrypt.oid.ek";

/// Domain separation for the authentication key.
const OID_AK_DOMAIN: &[u8] = b"authcrypt.oid.ak";

type Blake2bMac32 = Blake2bMac<blake2::digest::consts::U32>;

/// Seals `sender` so that only the holder of `recipient`'s secret key can
/// open it.
pub(crate) fn seal_sender(
    sender: &PublicKey,
    recipient: &PublicKey,
    source: &dyn RandomSource,
) -> AuthcryptResult<[u8; OID_SIZE]> {
    let ephemeral_bytes = Zeroizing::new(random_array::<32>(source)?);
    let ephemeral_secret = StaticSecret::from(*ephemeral_bytes);
    let ephemeral_pk = X25519Public::from(&ephemeral_secret).to_bytes();

    let shared = ephemeral_secret.diffie_hellman(&recipient.to_x25519());
    if !shared.was_contributory() {
        return Err(AuthcryptError::InvalidKeypair("low-order public key"));
    }

    let (encryption_key, auth_key) =
        derive_keys(shared.as_bytes(), &ephemeral_pk, recipient.as_bytes())?;

    // Ek is unique per seal, so a zero nonce is safe
    let mut ciphertext = *sender.as_bytes();
    let mut cipher = XChaCha20::new(&(*encryption_key).into(), &[0u8; 24].into());
    cipher.apply_keystream(&mut ciphertext);

    let tag = compute_tag(&auth_key, &ephemeral_pk, &ciphertext)?;

    let mut sealed = [0u8; OID_SIZE];
    sealed[..OID_EPHEMERAL_SIZE].copy_from_slice(&ephemeral_pk);
    sealed[OID_EPHEMERAL_SIZE..OID_EPHEMERAL_SIZE + OID_CIPHERTEXT_SIZE]
        .copy_from_slice(&ciphertext);
    sealed[OID_EPHEMERAL_SIZE + OID_CIPHERTEXT_SIZE..].copy_from_slice(&tag);
    Ok(sealed)
}

/// Opens a sealed sender key with the recipient's secret key.
///
/// # Errors
///
/// - [`AuthcryptError::MalformedEnvelope`] if `sealed` is not 96 bytes
/// - [`AuthcryptError::AuthenticationFailure`] if it was not sealed to this key
pub(crate) fn open_sender(sealed: &[u8], recipient: &SecretKey) -> AuthcryptResult<PublicKey> {
    use subtle::ConstantTimeEq;

    if sealed.len() != OID_SIZE {
        return Err(AuthcryptError::malformed(
            "recipients.header.oid",
            format!("expected {OID_SIZE} bytes, got {}", sealed.len()),
        ));
    }

    let (ephemeral_pk, rest) = sealed.split_at(OID_EPHEMERAL_SIZE);
    let (ciphertext, tag) = rest.split_at(OID_CIPHERTEXT_SIZE);

    let ephemeral = PublicKey::from_bytes(ephemeral_pk)
        .map_err(|_| AuthcryptError::AuthenticationFailure)?;
    let shared = recipient
        .diffie_hellman(&ephemeral)
        .map_err(|_| AuthcryptError::AuthenticationFailure)?;
    let recipient_pk = recipient.public_key();

    let (encryption_key, auth_key) =
        derive_keys(shared.as_bytes(), ephemeral_pk, recipient_pk.as_bytes())?;

    let computed_tag = compute_tag(&auth_key, ephemeral_pk, ciphertext)?;
    if !bool::from(computed_tag.as_slice().ct_eq(tag)) {
        return Err(AuthcryptError::AuthenticationFailure);
    }

    let mut plaintext = [0u8; PUBLIC_KEY_SIZE];
    plaintext.copy_from_slice(ciphertext);
    let mut cipher = XChaCha20::new(&(*encryption_key).into(), &[0u8; 24].into());
    cipher.apply_keystream(&mut plaintext);

    PublicKey::from_bytes(&plaintext)
}

type DerivedKeys = (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>);

/// Ek = BLAKE2b(key=EK_DOMAIN, shared || epk || rpk), Ak likewise.
fn derive_keys(
    shared: &[u8],
    ephemeral_pk: &[u8],
    recipient_pk: &[u8],
) -> AuthcryptResult<DerivedKeys> {
    let derive = |domain: &[u8]| -> AuthcryptResult<Zeroizing<[u8; 32]>> {
        let mut mac = <Blake2bMac32 as KeyInit>::new_from_slice(domain)
            .map_err(|_| AuthcryptError::AuthenticationFailure)?;
        <Blake2bMac32 as Update>::update(&mut mac, shared);
        <Blake2bMac32 as Update>::update(&mut mac, ephemeral_pk);
        <Blake2bMac32 as Update>::update(&mut mac, recipient_pk);
        Ok(Zeroizing::new(
            <Blake2bMac32 as FixedOutput>::finalize_fixed(mac).into(),
        ))
    };

    Ok((derive(OID_EK_DOMAIN)?, derive(OID_AK_DOMAIN)?))
}

fn compute_tag(
    auth_key: &[u8; 32],
    ephemeral_pk: &[u8],
    ciphertext: &[u8],
) -> AuthcryptResult<[u8; OID_TAG_SIZE]> {
    let mut mac = <Blake2bMac32 as KeyInit>::new_from_slice(auth_key)
        .map_err(|_| AuthcryptError::AuthenticationFailure)?;
    <Blake2bMac32 as Update>::update(&mut mac, OID_HEADER);
    <Blake2bMac32 as Update>::update(&mut mac, ephemeral_pk);
    <Blake2bMac32 as Update>::update(&mut mac, ciphertext);
    Ok(<Blake2bMac32 as FixedOutput>::finalize_fixed(mac).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::SeededRandom;
    use crate::core::types::KeyPair;

    fn keypairs() -> AuthcryptResult<(KeyPair, KeyPair, SeededRandom)> {
        let source = SeededRandom::seed_from_u64(11);
        let sender = KeyPair::generate(&source)?;
        let recipient = KeyPair::generate(&source)?;
        Ok((sender, recipient, source))
    }

    #[test]
    fn test_seal_open_roundtrip() -> AuthcryptResult<()> {
        let (sender, recipient, source) = keypairs()?;

        let sealed = seal_sender(sender.public(), recipient.public(), &source)?;
        assert_ne!(&sealed[OID_EPHEMERAL_SIZE..64], sender.public().as_bytes());

        let opened = open_sender(&sealed, recipient.secret())?;
        assert_eq!(&opened, sender.public());
        Ok(())
    }

    #[test]
    fn test_seal_produces_different_output() -> AuthcryptResult<()> {
        let (sender, recipient, source) = keypairs()?;

        let a = seal_sender(sender.public(), recipient.public(), &source)?;
        let b = seal_sender(sender.public(), recipient.public(), &source)?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_open_wrong_key() -> AuthcryptResult<()> {
        let (sender, recipient, source) = keypairs()?;
        let other = KeyPair::generate(&source)?;

        let sealed = seal_sender(sender.public(), recipient.public(), &source)?;
        let result = open_sender(&sealed, other.secret());
        assert!(matches!(result, Err(AuthcryptError::AuthenticationFailure)));
        Ok(())
    }

    #[test]
    fn test_open_modified() -> AuthcryptResult<()> {
        let (sender, recipient, source) = keypairs()?;
        let sealed = seal_sender(sender.public(), recipient.public(), &source)?;

        for index in [0, 40, OID_SIZE - 1] {
            let mut tampered = sealed;
            tampered[index] ^= 0x01;
            let result = open_sender(&tampered, recipient.secret());
            assert!(matches!(result, Err(AuthcryptError::AuthenticationFailure)));
        }
        Ok(())
    }

    #[test]
    fn test_open_wrong_length() -> AuthcryptResult<()> {
        let (_, recipient, _) = keypairs()?;
        let result = open_sender(&[1u8; 64], recipient.secret());
        assert!(matches!(
            result,
            Err(AuthcryptError::MalformedEnvelope { .. })
        ));
        Ok(())
    }
}
