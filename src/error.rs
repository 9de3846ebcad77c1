use std::fmt;

/// Failure taxonomy for credential derivation and payload encryption.
///
/// Every failure is returned to the immediate caller; nothing is retried or
/// recovered internally. Messages never carry passwords or key material.
#[derive(Debug)]
pub enum CryptoError {
    /// KDF cost parameters, output length, or key length rejected before any
    /// cryptographic work ran.
    Parameter(String),
    /// Envelope string does not have the expected field layout or encoding.
    MalformedEnvelope(String),
    /// AEAD tag verification failed: tampering, wrong key, or corruption.
    AuthenticationFailure,
    /// Envelope carries no version tag, or the tag names an unknown scheme.
    UnsupportedFormat(String),
    /// The OS random generator was unavailable.
    RandomUnavailable,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::Parameter(msg) => write!(f, "invalid parameter: {msg}"),
            CryptoError::MalformedEnvelope(msg) => write!(f, "malformed envelope: {msg}"),
            CryptoError::AuthenticationFailure => {
                write!(f, "authentication failed: wrong key or corrupted envelope")
            }
            CryptoError::UnsupportedFormat(msg) => write!(f, "unsupported envelope format: {msg}"),
            CryptoError::RandomUnavailable => write!(f, "OS random generator unavailable"),
        }
    }
}

impl std::error::Error for CryptoError {}
