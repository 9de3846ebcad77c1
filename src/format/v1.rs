//! Envelope format v1 (legacy): AES-256-GCM.
//!
//! ```text
//! v1:<base64 iv (12 bytes)>:<base64 ciphertext+tag>
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};

use super::Envelope;
use crate::crypto::{GCM_IV_LEN, Scheme};
use crate::error::CryptoError;

/// Version tag for legacy envelopes.
pub const TAG: &str = "v1";

/// Serializes a legacy envelope.
pub fn serialize(envelope: &Envelope) -> String {
    format!(
        "{TAG}:{}:{}",
        STANDARD.encode(envelope.nonce()),
        STANDARD.encode(envelope.ciphertext())
    )
}

/// Parses the nonce and ciphertext fields of a legacy envelope.
///
/// # Errors
///
/// Returns an error if a field is not valid base64 or the IV has the wrong
/// length.
pub fn parse(nonce: &str, ciphertext: &str) -> Result<Envelope, CryptoError> {
    let nonce = STANDARD
        .decode(nonce)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64 iv: {e}")))?;

    if nonce.len() != GCM_IV_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "iv must be {GCM_IV_LEN} bytes, got {}",
            nonce.len()
        )));
    }

    let ciphertext = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64 ciphertext: {e}")))?;

    Ok(Envelope::new(Scheme::Legacy, nonce, ciphertext))
}
