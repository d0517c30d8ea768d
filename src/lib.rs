//! Authenticated multi-recipient encryption envelopes ("authcrypt").
//!
//! A sender encrypts a payload once under a fresh content encryption key
//! (CEK) and wraps that key for each recipient with a key derived from
//! static X25519 agreement between the sender's and the recipient's keys.
//! A recipient unwraps the CEK with its own secret key, learns and
//! authenticates the sender, and decrypts the payload.
//!
//! # Quick Start
//!
//! ```rust
//! use authcrypt::{ContentEncryption, Crypter, Envelope, KeyPair, OsRandom};
//!
//! let crypter = Crypter::new(ContentEncryption::XC20P);
//!
//! let alice = KeyPair::generate(&OsRandom).expect("random");
//! let bob = KeyPair::generate(&OsRandom).expect("random");
//!
//! // Alice packs a message for Bob
//! let bytes = crypter
//!     .pack(b"hello world", &alice, &[*bob.public()])
//!     .and_then(|envelope| envelope.encode())
//!     .expect("pack");
//!
//! // Bob unpacks it and learns that Alice sent it
//! let envelope = Envelope::decode(&bytes).expect("decode");
//! let unpacked = crypter
//!     .unpack_with_sender(&envelope, bob.secret(), &bob.kid())
//!     .expect("unpack");
//! assert_eq!(unpacked.plaintext, b"hello world");
//! assert_eq!(&unpacked.sender, alice.public());
//! ```
//!
//! # Algorithms
//!
//! | `enc` | Cipher | Nonce |
//! |-------|--------|-------|
//! | `C20P` | ChaCha20-Poly1305 | 12 bytes |
//! | `XC20P` | XChaCha20-Poly1305 | 24 bytes |
//!
//! The key management algorithm is `ECDH-SS+<enc>KW`: X25519 static-static
//! agreement, Concat KDF (SHA-256), and the same AEAD as key wrap.
//!
//! # Security
//!
//! - Key material is zeroized on drop
//! - Debug output redacts secret keys
//! - Constant-time comparison for secret keys and tags
//! - No plaintext is released before authentication
//! - No unsafe code
//!
//! # Modules
//!
//! - [`core`] - Core types and operations
//! - [`prelude`] - Ergonomic imports (requires `prelude` feature)

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use core::algorithm::ContentEncryption;
pub use core::crypter::{Crypter, Unpacked};
pub use core::envelope::{Envelope, Recipient, RecipientHeaders};
pub use core::error::{AuthcryptError, AuthcryptResult};
pub use core::header::ProtectedHeader;
pub use core::provider::KeyProvider;
pub use core::random::{OsRandom, RandomSource, SeededRandom};
pub use core::types::{ContentKey, KeyPair, PublicKey, SecretKey};
