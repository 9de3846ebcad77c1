//! Cryptographic primitives for credential derivation and payload encryption.
//!
//! Provides the salt derivation, key derivation, key-material splitting, and
//! AEAD building blocks that the library facade wires together.

use serde::{Deserialize, Serialize};

pub mod aead;
pub mod kdf;
pub mod salt;
pub mod split;

pub use aead::{decrypt, encrypt, generate_account_nonce};
pub use kdf::{KdfParams, derive_key};
pub use salt::derive_salt;
pub use split::split_key_material;

/// Length of the derived salt (16 bytes / 128 bits).
pub const SALT_LEN: usize = 16;
/// Length of the public per-account nonce mixed into the salt (32 bytes).
pub const ACCOUNT_NONCE_LEN: usize = 32;
/// Length of an AEAD key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the AES-256-GCM IV (12 bytes / 96 bits).
pub const GCM_IV_LEN: usize = 12;
/// Length of the XChaCha20-Poly1305 nonce (24 bytes / 192 bits).
pub const XCHACHA_NONCE_LEN: usize = 24;
/// Default key-material length produced by the KDF (64 bytes / 512 bits).
pub const KDF_OUT_LEN: usize = 64;
/// Number of parts the derived key material is split into
/// (master key + server password).
pub const SPLIT_PARTS: usize = 2;

/// Cryptographic scheme, carried as the leading version tag of every
/// envelope so legacy and current ciphertexts can coexist in one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// PBKDF2-HMAC-SHA256 + AES-256-GCM (envelope tag `v1`).
    Legacy,
    /// Argon2id + XChaCha20-Poly1305 (envelope tag `v2`).
    Current,
}
