//! Key derivation.
//!
//! Key-encryption keys come from the single-step Concat KDF of NIST
//! SP 800-56A as profiled by JOSE (RFC 7518 §4.6.2), with SHA-256:
//!
//! ```text
//! round_i = SHA-256(be32(i) || Z || be32(len(alg)) || alg
//!                   || be32(len(apu)) || apu || be32(len(apv)) || apv
//!                   || be32(keydatalen))
//! ```

use sha2::{Digest, Sha256};
use x25519_dalek::SharedSecret;
use zeroize::Zeroizing;

use crate::core::algorithm::{ContentEncryption, KEY_SIZE};

/// Derives the key-encryption key for one recipient.
///
/// * `shared` - X25519 output of sender secret and recipient public key
/// * `apu` - agreement PartyUInfo, random per recipient
/// * `apv` - agreement PartyVInfo, the recipient's public key
pub(crate) fn derive_kek(
    shared: &SharedSecret,
    alg: ContentEncryption,
    apu: &[u8],
    apv: &[u8],
) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut kek = Zeroizing::new([0u8; KEY_SIZE]);
    concat_kdf(
        shared.as_bytes(),
        alg.key_wrap_alg().as_bytes(),
        apu,
        apv,
        kek.as_mut_slice(),
    );
    kek
}

/// Fills `out` with Concat KDF output; `keydatalen` is `out.len()` in bits.
///
/// Each round's input holds `Z` and is zeroized after hashing, as is the
/// round output.
pub fn concat_kdf(z: &[u8], alg_id: &[u8], apu: &[u8], apv: &[u8], out: &mut [u8]) {
    let keydatalen = (out.len() as u32) * 8;

    let mut input = Zeroizing::new(Vec::with_capacity(
        4 + z.len() + 12 + alg_id.len() + apu.len() + apv.len() + 4,
    ));
    for (index, chunk) in out.chunks_mut(32).enumerate() {
        let counter = index as u32 + 1;

        input.clear();
        input.extend_from_slice(&counter.to_be_bytes());
        input.extend_from_slice(z);
        for field in [alg_id, apu, apv] {
            input.extend_from_slice(&(field.len() as u32).to_be_bytes());
            input.extend_from_slice(field);
        }
        input.extend_from_slice(&keydatalen.to_be_bytes());

        let mut round = Sha256::digest(input.as_slice());
        chunk.copy_from_slice(&round[..chunk.len()]);
        zeroize::Zeroize::zeroize(round.as_mut_slice());
    }
}

/// Digest binding the recipient set: SHA-256 over the sorted `kid`s joined
/// with `"."`. Independent of recipient order.
pub(crate) fn recipients_digest<'a>(kids: impl IntoIterator<Item = &'a str>) -> [u8; 32] {
    let mut kids: Vec<&str> = kids.into_iter().collect();
    kids.sort_unstable();
    Sha256::digest(kids.join(".").as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use base64::prelude::*;

    use super::*;

    #[test]
    fn test_concat_kdf_rfc7518_appendix_c() {
        // ECDH-ES example: Z from Alice/Bob P-256 agreement
        let z: [u8; 32] = [
            158, 86, 217, 29, 129, 113, 53, 211, 114, 131, 66, 131, 191, 132, 38, 156, 251, 49,
            110, 163, 218, 128, 106, 72, 246, 218, 167, 121, 140, 254, 144, 196,
        ];
        let mut out = [0u8; 16];
        concat_kdf(&z, b"A128GCM", b"Alice", b"Bob", &mut out);

        let expected = BASE64_URL_SAFE_NO_PAD
            .decode("VqqN6vgjbSBcIijNcacQGg")
            .expect("valid base64");
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_concat_kdf_multi_round() {
        let mut long = [0u8; 48];
        concat_kdf(b"secret", b"alg", b"u", b"v", &mut long);

        let mut first = [0u8; 32];
        concat_kdf(b"secret", b"alg", b"u", b"v", &mut first);

        // keydatalen is part of the input, so a longer output is not an extension
        assert_ne!(&long[..32], &first[..]);
        assert_ne!(&long[..16], &long[32..]);
    }

    #[test]
    fn test_concat_kdf_binds_party_info() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        concat_kdf(b"z", b"alg", b"apu-1", b"apv", &mut a);
        concat_kdf(b"z", b"alg", b"apu-2", b"apv", &mut b);
        assert_ne!(a, b);

        // Length prefixes keep field boundaries unambiguous
        concat_kdf(b"z", b"alg", b"ab", b"c", &mut a);
        concat_kdf(b"z", b"alg", b"a", b"bc", &mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_recipients_digest_order_independent() {
        let a = recipients_digest(["bob", "alice", "carol"]);
        let b = recipients_digest(["carol", "bob", "alice"]);
        assert_eq!(a, b);

        let c = recipients_digest(["alice", "bob"]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_recipients_digest_value() {
        let digest = recipients_digest(["b", "a"]);
        assert_eq!(
            hex::encode(digest),
            hex::encode(Sha256::digest(b"a.b"))
        );
    }
}
