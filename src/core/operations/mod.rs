//! Cryptographic operations behind pack and unpack.
//!
//! - [`aead`] - content and key encryption (ChaCha20-Poly1305 / XChaCha20-Poly1305)
//! - [`kdf`] - Concat KDF key-encryption key derivation
//! - [`sender`] - anonymous sealing of the sender key (`oid`)
//! - [`wrap`] - per-recipient CEK wrapping

pub mod aead;
pub mod kdf;
pub mod sender;
pub mod wrap;
