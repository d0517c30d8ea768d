//! Core authcrypt types and operations.
//!
//! - [`algorithm`] - Content encryption algorithms and their sizes
//! - [`error`] - Error types for authcrypt operations
//! - [`header`] - The protected header
//! - [`types`] - Key material (public, secret, key pairs, content keys)
//! - [`random`] - Injectable randomness
//! - [`operations`] - Cryptographic operations (AEAD, KDF, key wrap)
//! - [`envelope`] - The wire envelope and its codec
//! - [`crypter`] - Pack and unpack
//! - [`provider`] - Recipient key lookup

pub mod algorithm;
pub mod crypter;
pub mod envelope;
pub mod error;
pub mod header;
pub mod operations;
pub mod provider;
pub mod random;
pub mod types;

// Re-export commonly used items
pub use error::{AuthcryptError, AuthcryptResult};
