//! Per-recipient key wrapping (ECDH-SS + Concat KDF + AEAD key wrap).
//!
//! For every recipient the sender:
//!
//! 1. draws a random 32-byte `apu`
//! 2. computes `Z = X25519(sender_sk, recipient_pk)`
//! 3. derives `KEK = ConcatKDF(Z, "ECDH-SS+<enc>KW", apu, recipient_pk)`
//! 4. encrypts the CEK under `KEK` with the envelope's AEAD, binding the
//!    recipient's `kid` and the payload tag as associated data
//! 5. seals its own public key to the recipient (`oid`)
//!
//! Each recipient gets an independent KEK, so compromise of one recipient
//! key exposes only that recipient's entry.
//!
//! Every recipient can recover the shared CEK. Binding the payload tag into
//! each wrap keeps a recipient from re-encrypting the payload under that CEK
//! and passing it off to the others as the sender's.

use crate::core::algorithm::ContentEncryption;
use crate::core::envelope::{Recipient, RecipientHeaders};
use crate::core::error::AuthcryptResult;
use crate::core::operations::aead::AeadEngine;
use crate::core::operations::kdf::derive_kek;
use crate::core::operations::sender::seal_sender;
use crate::core::random::{random_array, RandomSource};
use crate::core::types::{ContentKey, KeyPair, PublicKey, SecretKey};

/// Size of the agreement PartyUInfo value.
pub const APU_SIZE: usize = 32;

/// Wraps `cek` for `recipient`, binding it to the payload sealed under
/// `cek` through `payload_tag`.
///
/// # Errors
///
/// - [`InvalidKeypair`](crate::AuthcryptError::InvalidKeypair) if `recipient` is a low-order point
/// - [`RandomSource`](crate::AuthcryptError::RandomSource) if the random source fails
pub fn wrap_for_recipient(
    alg: ContentEncryption,
    cek: &ContentKey,
    sender: &KeyPair,
    recipient: &PublicKey,
    payload_tag: &[u8],
    source: &dyn RandomSource,
) -> AuthcryptResult<Recipient> {
    let shared = sender.secret().diffie_hellman(recipient)?;

    let apu: [u8; APU_SIZE] = random_array(source)?;
    let kek = derive_kek(&shared, alg, &apu, recipient.as_bytes());

    let engine = AeadEngine::new(alg);
    let mut nonce = vec![0u8; engine.nonce_size()];
    source.try_fill(&mut nonce)?;

    let kid = recipient.kid();
    let (encrypted_key, tag) = engine.seal(
        &kek,
        &nonce,
        &wrap_aad(&kid, payload_tag),
        cek.as_bytes(),
    )?;
    let oid = seal_sender(sender.public(), recipient, source)?;

    Ok(Recipient::new(
        encrypted_key,
        RecipientHeaders::new(apu.to_vec(), nonce, tag.to_vec(), kid, oid.to_vec()),
    ))
}

/// Recovers the CEK from `recipient` with the recipient's secret key and the
/// sender's public key. `payload_tag` is the envelope's payload tag.
///
/// # Errors
///
/// - [`InvalidKeypair`](crate::AuthcryptError::InvalidKeypair) if `sender` is a low-order point
/// - [`AuthenticationFailure`](crate::AuthcryptError::AuthenticationFailure)
///   if the entry was not wrapped for this key pair and payload, or was modified
pub fn unwrap_for_recipient(
    alg: ContentEncryption,
    recipient: &Recipient,
    recipient_secret: &SecretKey,
    sender: &PublicKey,
    payload_tag: &[u8],
) -> AuthcryptResult<ContentKey> {
    let header = recipient.header();
    let shared = recipient_secret.diffie_hellman(sender)?;
    let recipient_pk = recipient_secret.public_key();

    let kek = derive_kek(&shared, alg, header.apu(), recipient_pk.as_bytes());

    let cek = zeroize::Zeroizing::new(AeadEngine::new(alg).open(
        &kek,
        header.iv(),
        &wrap_aad(header.kid(), payload_tag),
        recipient.encrypted_key(),
        header.tag(),
    )?);

    ContentKey::from_slice(&cek)
}

/// Associated data of a key wrap: `kid || "." || payload_tag`.
fn wrap_aad(kid: &str, payload_tag: &[u8]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(kid.len() + 1 + payload_tag.len());
    aad.extend_from_slice(kid.as_bytes());
    aad.push(b'.');
    aad.extend_from_slice(payload_tag);
    aad
}
