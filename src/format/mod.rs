//! Wire format for encrypted payload envelopes.
//!
//! Every envelope is a text string with a leading version tag:
//!
//! ```text
//! v1:<base64 iv>:<base64 ciphertext+tag>        (AES-256-GCM)
//! v2:<hex nonce>:<base64 ciphertext+tag>        (XChaCha20-Poly1305)
//! ```
//!
//! The tag pins the scheme, so legacy and current envelopes can coexist in
//! one document store and migrate without out-of-band metadata. A bare
//! `<nonce>:<ciphertext>` pair predates the tag and is rejected: without it
//! the two schemes cannot be told apart.

use crate::crypto::Scheme;
use crate::error::CryptoError;

pub mod v1;
pub mod v2;

/// Field delimiter between version tag, nonce, and ciphertext.
pub const DELIMITER: char = ':';

/// A decoded envelope: scheme plus raw nonce and ciphertext bytes.
#[derive(Debug)]
pub struct Envelope {
    scheme: Scheme,
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn new(scheme: Scheme, nonce: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self {
            scheme,
            nonce,
            ciphertext,
        }
    }

    /// Returns the scheme named by the envelope's version tag.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the per-encryption nonce or IV.
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Returns the ciphertext including the authentication tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// Serializes an envelope to its wire string.
///
/// Dispatches on the envelope's scheme.
pub fn serialize(envelope: &Envelope) -> String {
    match envelope.scheme() {
        Scheme::Legacy => v1::serialize(envelope),
        Scheme::Current => v2::serialize(envelope),
    }
}

/// Parses an envelope wire string.
///
/// # Errors
///
/// - [`CryptoError::MalformedEnvelope`] if the string lacks the three-field
///   structure or a field fails to decode.
/// - [`CryptoError::UnsupportedFormat`] if the version tag is missing or
///   names an unknown scheme.
pub fn parse(raw: &str) -> Result<Envelope, CryptoError> {
    let mut fields = raw.splitn(3, DELIMITER);
    let tag = fields.next().unwrap_or_default();
    let nonce = fields.next();
    let ciphertext = fields.next();

    match (nonce, ciphertext) {
        (Some(nonce), Some(ciphertext)) => match tag {
            v1::TAG => v1::parse(nonce, ciphertext),
            v2::TAG => v2::parse(nonce, ciphertext),
            _ => Err(CryptoError::UnsupportedFormat(format!(
                "unknown version tag '{tag}'"
            ))),
        },
        (Some(_), None) => Err(CryptoError::UnsupportedFormat(
            "missing version tag".into(),
        )),
        _ => Err(CryptoError::MalformedEnvelope(
            "expected <version>:<nonce>:<ciphertext>".into(),
        )),
    }
}
