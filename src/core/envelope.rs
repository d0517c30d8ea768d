//! Envelope - the wire form of an authcrypt message.
//!
//! ```json
//! {
//!   "protected": "<base64url header JSON>",
//!   "recipients": [
//!     { "encrypted_key": "...", "header": { "apu", "iv", "tag", "kid", "oid" } }
//!   ],
//!   "aad": "...",
//!   "iv": "...",
//!   "tag": "...",
//!   "ciphertext": "..."
//! }
//! ```
//!
//! All byte fields are base64url without padding. Fields are always written
//! in the order above; `aad` and an empty `ciphertext` are omitted.
//!
//! Decoding checks structure only: presence, encoding and the length of
//! every field against the `enc` declared in the protected header. Nothing
//! is verified cryptographically until the envelope is unpacked.

use core::fmt::{self, Display};

use base64::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::algorithm::{ContentEncryption, KEY_SIZE, TAG_SIZE};
use crate::core::error::{AuthcryptError, AuthcryptResult};
use crate::core::header::ProtectedHeader;
use crate::core::operations::sender::OID_SIZE;
use crate::core::operations::wrap::APU_SIZE;

// =============================================================================
// Recipient entries
// =============================================================================

/// Per-recipient key management headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientHeaders {
    #[serde(serialize_with = "b64")]
    apu: Vec<u8>,
    #[serde(serialize_with = "b64")]
    iv: Vec<u8>,
    #[serde(serialize_with = "b64")]
    tag: Vec<u8>,
    kid: String,
    #[serde(serialize_with = "b64")]
    oid: Vec<u8>,
}

impl RecipientHeaders {
    pub(crate) fn new(apu: Vec<u8>, iv: Vec<u8>, tag: Vec<u8>, kid: String, oid: Vec<u8>) -> Self {
        Self {
            apu,
            iv,
            tag,
            kid,
            oid,
        }
    }

    /// Agreement PartyUInfo bound into key derivation.
    #[must_use]
    pub fn apu(&self) -> &[u8] {
        &self.apu
    }

    /// Nonce of the key wrap.
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Tag of the key wrap.
    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// Identifier of the recipient this entry is for.
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The sender's public key, sealed to the recipient.
    #[must_use]
    pub fn oid(&self) -> &[u8] {
        &self.oid
    }
}

/// One recipient entry: the wrapped CEK and how to unwrap it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    #[serde(serialize_with = "b64")]
    encrypted_key: Vec<u8>,
    header: RecipientHeaders,
}

impl Recipient {
    pub(crate) fn new(encrypted_key: Vec<u8>, header: RecipientHeaders) -> Self {
        Self {
            encrypted_key,
            header,
        }
    }

    /// The wrapped content encryption key.
    #[must_use]
    pub fn encrypted_key(&self) -> &[u8] {
        &self.encrypted_key
    }

    /// Key management headers.
    #[must_use]
    pub const fn header(&self) -> &RecipientHeaders {
        &self.header
    }

    /// Shorthand for `header().kid()`.
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.header.kid
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A packed, encrypted and authenticated message.
///
/// Obtained from [`Crypter::pack`](crate::Crypter::pack) or by decoding
/// received bytes with [`Envelope::decode`].
///
/// # Example
///
/// ```rust
/// use authcrypt::{ContentEncryption, Crypter, Envelope, KeyPair, OsRandom};
///
/// let crypter = Crypter::new(ContentEncryption::XC20P);
/// let sender = KeyPair::generate(&OsRandom).expect("random");
/// let recipient = KeyPair::generate(&OsRandom).expect("random");
///
/// let envelope = crypter
///     .pack(b"hello", &sender, &[*recipient.public()])
///     .expect("pack");
/// let bytes = envelope.encode().expect("encode");
///
/// let received = Envelope::decode(&bytes).expect("decode");
/// assert_eq!(received, envelope);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    protected: String,
    recipients: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aad: Option<String>,
    #[serde(serialize_with = "b64")]
    iv: Vec<u8>,
    #[serde(serialize_with = "b64")]
    tag: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "b64")]
    ciphertext: Vec<u8>,
    #[serde(skip)]
    enc: ContentEncryption,
}

impl Envelope {
    pub(crate) fn new(
        enc: ContentEncryption,
        protected: String,
        recipients: Vec<Recipient>,
        aad: Option<String>,
        iv: Vec<u8>,
        tag: Vec<u8>,
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            protected,
            recipients,
            aad,
            iv,
            tag,
            ciphertext,
            enc,
        }
    }

    /// Encodes the envelope to its canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] if serialization fails.
    pub fn encode(&self) -> AuthcryptResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| AuthcryptError::malformed("envelope", e.to_string()))
    }

    /// Decodes and structurally validates envelope bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthcryptError::MalformedEnvelope`] naming the first field
    /// that is missing, not base64url, or of the wrong length.
    pub fn decode(bytes: &[u8]) -> AuthcryptResult<Self> {
        let wire: WireEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| AuthcryptError::malformed("envelope", e.to_string()))?;
        Self::try_from(wire)
    }

    /// The base64url protected header, as transmitted.
    #[must_use]
    pub fn protected(&self) -> &str {
        &self.protected
    }

    /// The decoded protected header.
    ///
    /// # Errors
    ///
    /// Never fails for a decoded or packed envelope; the header was
    /// validated when the envelope was built.
    pub fn protected_header(&self) -> AuthcryptResult<ProtectedHeader> {
        ProtectedHeader::decode(&self.protected)
    }

    /// The content encryption algorithm declared by the protected header.
    #[must_use]
    pub const fn content_encryption(&self) -> ContentEncryption {
        self.enc
    }

    /// Recipient entries, in pack order.
    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// The first entry addressed to `kid`.
    #[must_use]
    pub fn recipient(&self, kid: &str) -> Option<&Recipient> {
        self.recipients.iter().find(|r| r.kid() == kid)
    }

    /// The base64url additional authenticated data, if any.
    #[must_use]
    pub fn aad(&self) -> Option<&str> {
        self.aad.as_deref()
    }

    /// Payload nonce.
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Payload tag.
    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// Encrypted payload.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Associated data of the payload AEAD: `protected` or
    /// `protected || "." || aad`.
    pub(crate) fn authenticated_data(&self) -> Vec<u8> {
        authenticated_data(&self.protected, self.aad.as_deref())
    }
}

pub(crate) fn authenticated_data(protected: &str, aad: Option<&str>) -> Vec<u8> {
    match aad {
        Some(aad) => format!("{protected}.{aad}").into_bytes(),
        None => protected.as_bytes().to_vec(),
    }
}

// =============================================================================
// Display / parsing
// =============================================================================

impl Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl TryFrom<&[u8]> for Envelope {
    type Error = AuthcryptError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::decode(bytes)
    }
}

impl TryFrom<&str> for Envelope {
    type Error = AuthcryptError;

    fn try_from(json: &str) -> Result<Self, Self::Error> {
        Self::decode(json.as_bytes())
    }
}

impl TryFrom<String> for Envelope {
    type Error = AuthcryptError;

    fn try_from(json: String) -> Result<Self, Self::Error> {
        Self::decode(json.as_bytes())
    }
}

fn b64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64_URL_SAFE_NO_PAD.encode(bytes))
}

// =============================================================================
// Wire validation
// =============================================================================

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    recipients: Option<Vec<WireRecipient>>,
    #[serde(default)]
    aad: Option<String>,
    #[serde(default)]
    iv: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    ciphertext: Option<String>,
}

#[derive(Deserialize)]
struct WireRecipient {
    #[serde(default)]
    encrypted_key: Option<String>,
    #[serde(default)]
    header: Option<WireRecipientHeaders>,
}

#[derive(Deserialize)]
struct WireRecipientHeaders {
    #[serde(default)]
    apu: Option<String>,
    #[serde(default)]
    iv: Option<String>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    kid: Option<String>,
    #[serde(default)]
    oid: Option<String>,
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = AuthcryptError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        let protected = required("protected", wire.protected)?;
        let enc = ProtectedHeader::decode(&protected)?.content_encryption()?;
        let nonce_size = enc.nonce_size();

        let recipients = wire.recipients.unwrap_or_default();
        if recipients.is_empty() {
            return Err(AuthcryptError::malformed("recipients", "missing or empty"));
        }
        let recipients = recipients
            .into_iter()
            .map(|r| Recipient::from_wire(r, nonce_size))
            .collect::<AuthcryptResult<Vec<_>>>()?;

        let aad = match wire.aad.filter(|aad| !aad.is_empty()) {
            Some(aad) => {
                decode_field("aad", &aad)?;
                Some(aad)
            }
            None => None,
        };

        let iv = decode_exact("iv", &required("iv", wire.iv)?, nonce_size)?;
        let tag = decode_exact("tag", &required("tag", wire.tag)?, TAG_SIZE)?;
        let ciphertext = match wire.ciphertext {
            Some(ciphertext) => decode_field("ciphertext", &ciphertext)?,
            None => Vec::new(),
        };

        Ok(Self::new(enc, protected, recipients, aad, iv, tag, ciphertext))
    }
}

impl Recipient {
    fn from_wire(wire: WireRecipient, nonce_size: usize) -> AuthcryptResult<Self> {
        let encrypted_key = decode_exact(
            "recipients.encrypted_key",
            &required("recipients.encrypted_key", wire.encrypted_key)?,
            KEY_SIZE,
        )?;

        let header = wire
            .header
            .ok_or_else(|| AuthcryptError::malformed("recipients.header", "missing"))?;

        let kid = required("recipients.header.kid", header.kid)?;
        let apu = decode_exact(
            "recipients.header.apu",
            &required("recipients.header.apu", header.apu)?,
            APU_SIZE,
        )?;
        let iv = decode_exact(
            "recipients.header.iv",
            &required("recipients.header.iv", header.iv)?,
            nonce_size,
        )?;
        let tag = decode_exact(
            "recipients.header.tag",
            &required("recipients.header.tag", header.tag)?,
            TAG_SIZE,
        )?;
        let oid = decode_exact(
            "recipients.header.oid",
            &required("recipients.header.oid", header.oid)?,
            OID_SIZE,
        )?;

        Ok(Self::new(
            encrypted_key,
            RecipientHeaders::new(apu, iv, tag, kid, oid),
        ))
    }
}

fn required(field: &'static str, value: Option<String>) -> AuthcryptResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthcryptError::malformed(field, "missing"))
}

fn decode_field(field: &'static str, value: &str) -> AuthcryptResult<Vec<u8>> {
    BASE64_URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| AuthcryptError::malformed(field, e.to_string()))
}

fn decode_exact(field: &'static str, value: &str, len: usize) -> AuthcryptResult<Vec<u8>> {
    let bytes = decode_field(field, value)?;
    if bytes.len() != len {
        return Err(AuthcryptError::malformed(
            field,
            format!("expected {len} bytes, got {}", bytes.len()),
        ));
    }
    Ok(bytes)
}
