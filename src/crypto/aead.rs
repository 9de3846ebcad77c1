use aes_gcm::{Aes256Gcm, Nonce};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use getrandom::fill;
use zeroize::Zeroizing;

use super::{ACCOUNT_NONCE_LEN, GCM_IV_LEN, KEY_LEN, Scheme, XCHACHA_NONCE_LEN};
use crate::error::CryptoError;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    fill(buf).map_err(|_| CryptoError::RandomUnavailable)
}

/// Generates a fresh public account nonce, hex-encoded (32 random bytes).
pub fn generate_account_nonce() -> Result<String, CryptoError> {
    let mut nonce = [0u8; ACCOUNT_NONCE_LEN];
    secure_random(&mut nonce)?;
    Ok(hex::encode(nonce))
}

/// Nonce/IV length the given scheme's cipher requires.
pub fn nonce_len(scheme: Scheme) -> usize {
    match scheme {
        Scheme::Legacy => GCM_IV_LEN,
        Scheme::Current => XCHACHA_NONCE_LEN,
    }
}

/// Encrypts a payload under the master key, drawing one fresh random nonce.
///
/// Returns `(ciphertext_with_tag, nonce)`. The key must be the master-key
/// half of a derivation; the server-password half is never a cipher key.
pub fn encrypt(
    scheme: Scheme,
    key: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    let mut nonce = vec![0u8; nonce_len(scheme)];
    secure_random(&mut nonce)?;

    let ciphertext = match scheme {
        Scheme::Legacy => {
            let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| key_length_error(key))?;
            cipher.encrypt(Nonce::from_slice(&nonce), plaintext)
        }
        Scheme::Current => {
            let cipher =
                XChaCha20Poly1305::new_from_slice(key).map_err(|_| key_length_error(key))?;
            cipher.encrypt(XNonce::from_slice(&nonce), plaintext)
        }
    }
    .map_err(|_| CryptoError::Parameter("encryption failed".into()))?;

    Ok((ciphertext, nonce))
}

/// Verifies and decrypts a payload. All-or-nothing: any tag mismatch or
/// corruption fails, never yielding partial or unauthenticated plaintext.
pub fn decrypt(
    scheme: Scheme,
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let expected = nonce_len(scheme);
    if nonce.len() != expected {
        return Err(CryptoError::MalformedEnvelope(format!(
            "nonce must be {expected} bytes, got {}",
            nonce.len()
        )));
    }

    let plaintext = match scheme {
        Scheme::Legacy => {
            let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| key_length_error(key))?;
            cipher.decrypt(Nonce::from_slice(nonce), ciphertext)
        }
        Scheme::Current => {
            let cipher =
                XChaCha20Poly1305::new_from_slice(key).map_err(|_| key_length_error(key))?;
            cipher.decrypt(XNonce::from_slice(nonce), ciphertext)
        }
    }
    .map_err(|_| CryptoError::AuthenticationFailure)?;

    Ok(Zeroizing::new(plaintext))
}

fn key_length_error(key: &[u8]) -> CryptoError {
    CryptoError::Parameter(format!(
        "cipher key must be {KEY_LEN} bytes, got {}",
        key.len()
    ))
}
