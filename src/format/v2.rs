//! Envelope format v2 (current): XChaCha20-Poly1305.
//!
//! ```text
//! v2:<hex nonce (24 bytes)>:<base64 ciphertext+tag>
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};

use super::Envelope;
use crate::crypto::{Scheme, XCHACHA_NONCE_LEN};
use crate::error::CryptoError;

/// Version tag for current envelopes.
pub const TAG: &str = "v2";

/// Serializes a current envelope.
pub fn serialize(envelope: &Envelope) -> String {
    format!(
        "{TAG}:{}:{}",
        hex::encode(envelope.nonce()),
        STANDARD.encode(envelope.ciphertext())
    )
}

/// Parses the nonce and ciphertext fields of a current envelope.
///
/// # Errors
///
/// Returns an error if the nonce is not valid hex of the right length or the
/// ciphertext is not valid base64.
pub fn parse(nonce: &str, ciphertext: &str) -> Result<Envelope, CryptoError> {
    let nonce = hex::decode(nonce)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid hex nonce: {e}")))?;

    if nonce.len() != XCHACHA_NONCE_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "nonce must be {XCHACHA_NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }

    let ciphertext = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64 ciphertext: {e}")))?;

    Ok(Envelope::new(Scheme::Current, nonce, ciphertext))
}
