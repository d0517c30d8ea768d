//! Key types.
//!
//! - [`PublicKey`] - X25519 public key, addressed by its `kid`
//! - [`SecretKey`] - X25519 secret key
//! - [`KeyPair`] - A secret key with its matching public key
//! - [`ContentKey`] - The per-envelope content-encryption key

mod content_key;
mod key_pair;
mod public_key;
mod secret_key;

pub use content_key::ContentKey;
pub use key_pair::KeyPair;
pub use public_key::{PublicKey, PUBLIC_KEY_SIZE};
pub use secret_key::{SecretKey, SECRET_KEY_SIZE};
