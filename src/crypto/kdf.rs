use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{SPLIT_PARTS, Scheme};
use crate::error::CryptoError;

/// Cost parameters for one derivation, tied to the scheme they belong to.
///
/// Callers persist these next to the account nonce so a login can re-run the
/// exact derivation that registration used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfParams {
    /// PBKDF2-HMAC-SHA256 with an iteration count.
    Pbkdf2 { iterations: u32 },
    /// Argon2id with an operation limit and a memory limit in KiB.
    Argon2id { ops_limit: u32, mem_limit_kib: u32 },
}

impl KdfParams {
    /// Default legacy parameters (100,000 PBKDF2 iterations).
    pub fn legacy() -> Self {
        KdfParams::Pbkdf2 {
            iterations: 100_000,
        }
    }

    /// Default current parameters (Argon2id, 5 passes over 64 MiB).
    pub fn current() -> Self {
        KdfParams::Argon2id {
            ops_limit: 5,
            mem_limit_kib: 64 * 1024,
        }
    }

    /// Default parameters for the given scheme.
    pub fn default_for(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Legacy => Self::legacy(),
            Scheme::Current => Self::current(),
        }
    }

    /// The scheme these parameters drive.
    pub fn scheme(&self) -> Scheme {
        match self {
            KdfParams::Pbkdf2 { .. } => Scheme::Legacy,
            KdfParams::Argon2id { .. } => Scheme::Current,
        }
    }

    /// Rejects degenerate cost parameters before any derivation work runs.
    pub fn validate(&self) -> Result<(), CryptoError> {
        match *self {
            KdfParams::Pbkdf2 { iterations } => {
                if iterations < 1 {
                    return Err(CryptoError::Parameter(
                        "pbkdf2 iteration count must be >= 1".into(),
                    ));
                }
            }
            KdfParams::Argon2id {
                ops_limit,
                mem_limit_kib,
            } => {
                if ops_limit < 1 {
                    return Err(CryptoError::Parameter(
                        "argon2 ops limit must be >= 1".into(),
                    ));
                }
                if mem_limit_kib < 8 {
                    return Err(CryptoError::Parameter("argon2 memory limit too low".into()));
                }
            }
        }
        Ok(())
    }
}

/// Derives `out_len` bytes of raw key material from a password and salt.
///
/// The output is handed to the splitter, so its length must be non-zero and
/// evenly divisible by the split factor. Memory-hard derivation is expensive
/// on purpose; see the async entry points on the library facade for callers
/// that must not block.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: KdfParams,
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    params.validate()?;

    if out_len == 0 || out_len % SPLIT_PARTS != 0 {
        return Err(CryptoError::Parameter(format!(
            "output length {out_len} is not divisible into {SPLIT_PARTS} parts"
        )));
    }

    let mut material = Zeroizing::new(vec![0u8; out_len]);

    match params {
        KdfParams::Pbkdf2 { iterations } => {
            pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut material);
        }
        KdfParams::Argon2id {
            ops_limit,
            mem_limit_kib,
        } => {
            let argon2_params = Params::new(mem_limit_kib, ops_limit, 1, Some(out_len))
                .map_err(|e| CryptoError::Parameter(format!("argon2 parameters rejected: {e}")))?;

            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

            argon2
                .hash_password_into(password.as_bytes(), salt, &mut material)
                .map_err(|e| CryptoError::Parameter(format!("argon2 derivation failed: {e}")))?;
        }
    }

    Ok(material)
}
