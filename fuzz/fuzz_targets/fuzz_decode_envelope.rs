#![no_main]

use authcrypt::Envelope;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic
    if let Ok(envelope) = Envelope::decode(data) {
        // Anything that decodes re-encodes to something that decodes the same
        let bytes = envelope.encode().expect("decoded envelope encodes");
        let again = Envelope::decode(&bytes).expect("re-encoded envelope decodes");
        assert_eq!(again, envelope);
    }
});
