#![no_main]

use authcrypt::{ContentEncryption, Crypter, KeyPair, SecretKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let recipient = KeyPair::from_secret(SecretKey::from([0x42u8; 32]));

    // Unpacking attacker-controlled bytes must fail cleanly, never panic
    for alg in ContentEncryption::ALL {
        let crypter = Crypter::new(alg);
        let _ = crypter.unpack_bytes(data, recipient.secret(), &recipient.kid());
    }
});
