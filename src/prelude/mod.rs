//! Ergonomic layer for authcrypt operations.
//!
//! # Usage
//!
//! ```rust
//! use authcrypt::prelude::*;
//!
//! let crypter = Crypter::new(ContentEncryption::C20P);
//! assert_eq!(crypter.nonce_size(), 12);
//! ```

use std::sync::Arc;

pub use crate::core::algorithm::ContentEncryption;
pub use crate::core::crypter::{Crypter, Unpacked};
pub use crate::core::envelope::Envelope;
pub use crate::core::error::{AuthcryptError, AuthcryptResult};
pub use crate::core::provider::KeyProvider;
pub use crate::core::random::{OsRandom, RandomSource};
pub use crate::core::types::{KeyPair, PublicKey, SecretKey};

/// Creates a crypter for `alg` backed by a shared random source.
///
/// # Example
///
/// ```rust
/// use authcrypt::prelude::*;
/// use authcrypt::SeededRandom;
///
/// let crypter = crypter_with(ContentEncryption::XC20P, SeededRandom::seed_from_u64(7));
/// assert_eq!(crypter.algorithm(), ContentEncryption::XC20P);
/// ```
pub fn crypter_with<R: RandomSource + 'static>(alg: ContentEncryption, source: R) -> Crypter {
    Crypter::with_random_source(alg, Arc::new(source))
}
