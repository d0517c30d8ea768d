//! Property-based tests for envelope invariants.
//!
//! - Pack/unpack round-trips arbitrary payloads for every recipient
//! - Any single bit flip in the payload fields fails authentication
//! - Decoding arbitrary input never panics

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use std::sync::Arc;

use authcrypt::{
    AuthcryptError, ContentEncryption, Crypter, Envelope, KeyPair, PublicKey, SeededRandom,
};
use proptest::prelude::*;

fn algorithm() -> impl Strategy<Value = ContentEncryption> {
    prop_oneof![Just(ContentEncryption::C20P), Just(ContentEncryption::XC20P)]
}

fn key_pairs(seed: u64, count: usize) -> Vec<KeyPair> {
    let source = SeededRandom::seed_from_u64(seed);
    (0..count)
        .map(|_| KeyPair::generate(&source).expect("seeded source"))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every recipient recovers the exact payload and the sender.
    #[test]
    fn roundtrip_all_recipients(
        alg in algorithm(),
        plaintext in prop::collection::vec(any::<u8>(), 0..2048),
        recipient_count in 1usize..5,
        seed in any::<u64>(),
    ) {
        let keys = key_pairs(seed, recipient_count + 1);
        let (sender, recipients) = (&keys[0], &keys[1..]);
        let publics: Vec<PublicKey> = recipients.iter().map(|k| *k.public()).collect();

        let crypter = Crypter::with_random_source(alg, Arc::new(SeededRandom::seed_from_u64(seed)));
        let bytes = crypter.pack(&plaintext, sender, &publics).unwrap().encode().unwrap();

        for recipient in recipients {
            let envelope = Envelope::decode(&bytes).unwrap();
            let unpacked = crypter
                .unpack_with_sender(&envelope, recipient.secret(), &recipient.kid())
                .unwrap();
            prop_assert_eq!(&unpacked.plaintext, &plaintext);
            prop_assert_eq!(&unpacked.sender, sender.public());
        }
    }

    /// Flipping any bit of ciphertext, tag or iv is detected.
    #[test]
    fn single_bit_flip_detected(
        alg in algorithm(),
        plaintext in prop::collection::vec(any::<u8>(), 1..256),
        field in 0usize..3,
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let keys = key_pairs(17, 2);
        let crypter = Crypter::new(alg);
        let envelope = crypter.pack(&plaintext, &keys[0], &[*keys[1].public()]).unwrap();

        let mut json: serde_json::Value = serde_json::from_slice(&envelope.encode().unwrap()).unwrap();
        let name = ["ciphertext", "tag", "iv"][field];
        let mut bytes = match name {
            "ciphertext" => envelope.ciphertext().to_vec(),
            "tag" => envelope.tag().to_vec(),
            _ => envelope.iv().to_vec(),
        };
        let index = position.index(bytes.len());
        bytes[index] ^= 1 << bit;
        json[name] = serde_json::json!(base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            &bytes
        ));

        let tampered = Envelope::decode(json.to_string().as_bytes()).unwrap();
        let result = crypter.unpack(&tampered, keys[1].secret(), &keys[1].kid());
        prop_assert!(matches!(result, Err(AuthcryptError::AuthenticationFailure)));
    }

    /// Decoding never panics, whatever the input.
    #[test]
    fn decode_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Envelope::decode(&data);
    }

    /// Algorithm names other than the two supported ones are rejected.
    #[test]
    fn unknown_algorithm_names_rejected(name in "[A-Za-z0-9]{0,8}") {
        prop_assume!(name != "C20P" && name != "XC20P");
        prop_assert!(
            matches!(
                Crypter::from_alg_name(&name),
                Err(AuthcryptError::UnsupportedAlgorithm(_))
            ),
            "unsupported algorithm name: {}",
            name
        );
    }
}
