//! Credential derivation and payload encryption for client-side encrypted
//! note stores.
//!
//! From a low-entropy password and an account identifier, notelock derives a
//! pair of independent secrets: a master key for local payload encryption and
//! a server password for remote authentication. The master key encrypts text
//! payloads into portable `version:nonce:ciphertext` envelope strings that an
//! external document store can persist opaquely.
//!
//! Two schemes coexist behind one [`Scheme`] tag: the legacy pipeline
//! (PBKDF2-HMAC-SHA256 + AES-256-GCM) and the current one (Argon2id +
//! XChaCha20-Poly1305). Every envelope carries its scheme as a leading
//! version tag, so both can live in the same store and legacy data can be
//! migrated in place.
//!
//! All operations are stateless and single-shot. Passwords and derived key
//! material are zeroized when dropped and never written to any output.

mod crypto;
mod error;
mod format;

pub use crate::crypto::{KdfParams, Scheme, derive_salt, split_key_material};
pub use crate::error::CryptoError;

use zeroize::{Zeroize, Zeroizing};

/// The two halves of one key derivation plus the public account nonce.
///
/// The master key encrypts payloads locally; the server password
/// authenticates against a remote. They are disjoint halves of a single
/// derivation output and must never stand in for each other. Both are
/// zeroized on drop.
pub struct RootCredential {
    master_key: Vec<u8>,
    server_password: Vec<u8>,
    nonce: String,
    scheme: Scheme,
}

impl Drop for RootCredential {
    fn drop(&mut self) {
        self.master_key.zeroize();
        self.server_password.zeroize();
    }
}

impl RootCredential {
    /// The local payload-encryption key (first half of the derivation).
    pub fn master_key(&self) -> &[u8] {
        &self.master_key
    }

    /// The server-side authentication secret (second half of the derivation).
    pub fn server_password(&self) -> &[u8] {
        &self.server_password
    }

    /// The public account nonce (hex). Needed to re-derive this credential.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The scheme this credential was derived under.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Encrypts a payload under this credential's master key, using the
    /// scheme the credential was derived with. The server-password half is
    /// never used here.
    pub fn encrypt_payload(&self, plaintext: &str) -> Result<String, CryptoError> {
        encrypt_payload(plaintext, &self.master_key, self.scheme)
    }

    /// Decrypts an envelope under this credential's master key. The scheme
    /// is read from the envelope's version tag.
    pub fn decrypt_payload(&self, envelope: &str) -> Result<Zeroizing<String>, CryptoError> {
        decrypt_payload(envelope, &self.master_key)
    }
}

/// Derives a fresh root credential for a new account (registration path).
///
/// Draws a random 32-byte account nonce; everything else is deterministic.
/// The caller must keep the nonce (it is public) to log in again later.
pub fn derive_root_credential(
    identifier: &str,
    password: &str,
    params: KdfParams,
) -> Result<RootCredential, CryptoError> {
    let nonce = crypto::generate_account_nonce()?;
    derive_root_credential_with_nonce(identifier, password, &nonce, params)
}

/// Re-derives a root credential from a known account nonce (login path).
///
/// Deterministic: identical `(identifier, password, nonce, params)` always
/// reproduce the identical master key and server password.
pub fn derive_root_credential_with_nonce(
    identifier: &str,
    password: &str,
    nonce: &str,
    params: KdfParams,
) -> Result<RootCredential, CryptoError> {
    let salt = crypto::derive_salt(identifier, nonce);
    let material = crypto::derive_key(password, &salt, params, crypto::KDF_OUT_LEN)?;
    let halves = crypto::split_key_material(&material, crypto::SPLIT_PARTS)?;

    Ok(RootCredential {
        master_key: halves[0].to_vec(),
        server_password: halves[1].to_vec(),
        nonce: nonce.to_string(),
        scheme: params.scheme(),
    })
}

/// Async variant of [`derive_root_credential`].
///
/// The memory-hard KDF runs for tens to hundreds of milliseconds, so it is
/// moved onto a blocking worker instead of stalling the async caller. There
/// is no cancellation; an in-flight derivation runs to completion.
pub async fn derive_root_credential_async(
    identifier: &str,
    password: &str,
    params: KdfParams,
) -> Result<RootCredential, CryptoError> {
    let nonce = crypto::generate_account_nonce()?;
    derive_root_credential_with_nonce_async(identifier, password, &nonce, params).await
}

/// Async variant of [`derive_root_credential_with_nonce`].
pub async fn derive_root_credential_with_nonce_async(
    identifier: &str,
    password: &str,
    nonce: &str,
    params: KdfParams,
) -> Result<RootCredential, CryptoError> {
    let identifier = identifier.to_string();
    let password = Zeroizing::new(password.to_string());
    let nonce = nonce.to_string();

    let handle = tokio::task::spawn_blocking(move || {
        derive_root_credential_with_nonce(&identifier, &password, &nonce, params)
    });

    match handle.await {
        Ok(result) => result,
        Err(err) => std::panic::resume_unwind(err.into_panic()),
    }
}

/// Encrypts a text payload under a master key into an envelope string.
///
/// Each call draws one fresh random nonce; encrypting the same payload twice
/// never produces the same envelope.
pub fn encrypt_payload(
    plaintext: &str,
    master_key: &[u8],
    scheme: Scheme,
) -> Result<String, CryptoError> {
    let (ciphertext, nonce) = crypto::encrypt(scheme, master_key, plaintext.as_bytes())?;
    Ok(format::serialize(&format::Envelope::new(
        scheme, nonce, ciphertext,
    )))
}

/// Decrypts an envelope produced by [`encrypt_payload`].
///
/// The scheme is read from the envelope's version tag. All-or-nothing: on a
/// malformed envelope or failed authentication this returns an error and
/// never partial plaintext.
pub fn decrypt_payload(envelope: &str, master_key: &[u8]) -> Result<Zeroizing<String>, CryptoError> {
    let envelope = format::parse(envelope)?;
    let plaintext = crypto::decrypt(
        envelope.scheme(),
        master_key,
        envelope.nonce(),
        envelope.ciphertext(),
    )?;

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| CryptoError::MalformedEnvelope("payload is not valid UTF-8".into()))?;

    Ok(Zeroizing::new(text.to_string()))
}

/// Re-encrypts a legacy envelope under the current scheme.
///
/// The rotation path for stored data: decrypt with whatever the envelope's
/// tag names, re-encrypt as current. Envelopes that are already current are
/// returned unchanged.
pub fn migrate_payload(envelope: &str, master_key: &[u8]) -> Result<String, CryptoError> {
    if format::parse(envelope)?.scheme() == Scheme::Current {
        return Ok(envelope.to_string());
    }

    let plaintext = decrypt_payload(envelope, master_key)?;
    encrypt_payload(&plaintext, master_key, Scheme::Current)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTIFIER: &str = "user@example.com";
    const PASSWORD: &str = "correct horse battery";
    const NONCE: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    fn fast_argon2() -> KdfParams {
        KdfParams::Argon2id {
            ops_limit: 1,
            mem_limit_kib: 1024,
        }
    }

    #[test]
    fn legacy_derivation_matches_reference_vector() {
        let cred =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, KdfParams::legacy())
                .unwrap();

        assert_eq!(
            hex::encode(cred.master_key()),
            "a89cb6a4cc95da344cc355b9e79fd568098fcf1ce6aff00ffa5828eb638cf70d"
        );
        assert_eq!(
            hex::encode(cred.server_password()),
            "23d985c0631d1adff85675e2ea2ba07384939024c4f3f1f45439c0c351c186f4"
        );
        assert_eq!(cred.nonce(), NONCE);
    }

    #[test]
    fn derivation_is_deterministic() {
        let c1 =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, fast_argon2()).unwrap();
        let c2 =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, fast_argon2()).unwrap();

        assert_eq!(c1.master_key(), c2.master_key());
        assert_eq!(c1.server_password(), c2.server_password());
    }

    #[test]
    fn halves_are_independent() {
        let cred =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, fast_argon2()).unwrap();

        assert_eq!(cred.master_key().len(), 32);
        assert_eq!(cred.server_password().len(), 32);
        assert_ne!(cred.master_key(), cred.server_password());
    }

    #[test]
    fn identifier_is_bound_into_the_salt() {
        let alice =
            derive_root_credential_with_nonce("alice@example.com", PASSWORD, NONCE, fast_argon2())
                .unwrap();
        let bob =
            derive_root_credential_with_nonce("bob@example.com", PASSWORD, NONCE, fast_argon2())
                .unwrap();

        assert_ne!(alice.master_key(), bob.master_key());
    }

    #[test]
    fn registration_draws_a_fresh_nonce() {
        let c1 = derive_root_credential(IDENTIFIER, PASSWORD, fast_argon2()).unwrap();
        let c2 = derive_root_credential(IDENTIFIER, PASSWORD, fast_argon2()).unwrap();

        assert_ne!(c1.nonce(), c2.nonce());
        assert_ne!(c1.master_key(), c2.master_key());
        assert_eq!(c1.nonce().len(), 64);
    }

    #[test]
    fn payload_roundtrip_both_schemes() {
        let key = [5u8; 32];

        for scheme in [Scheme::Legacy, Scheme::Current] {
            let envelope = encrypt_payload("a note body", &key, scheme).unwrap();
            let plaintext = decrypt_payload(&envelope, &key).unwrap();
            assert_eq!(&*plaintext, "a note body");
        }
    }

    #[test]
    fn credential_scoped_roundtrip() {
        let cred =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, fast_argon2()).unwrap();

        let envelope = cred.encrypt_payload("shopping list").unwrap();
        assert!(envelope.starts_with("v2:"));
        assert_eq!(&*cred.decrypt_payload(&envelope).unwrap(), "shopping list");
    }

    #[test]
    fn identical_payloads_produce_distinct_envelopes() {
        let key = [5u8; 32];

        let e1 = encrypt_payload("same", &key, Scheme::Current).unwrap();
        let e2 = encrypt_payload("same", &key, Scheme::Current).unwrap();

        assert_ne!(e1, e2);
    }

    #[test]
    fn legacy_envelope_decrypts_against_fixed_vector() {
        // AES-256-GCM with key 00..1f, IV 00..0b, plaintext "hello world".
        let key: Vec<u8> = (0u8..32).collect();
        let envelope = "v1:AAECAwQFBgcICQoL:L2e6d6rFtXT/LfMFMBxWQ34jd7mO85YcJxko";

        let plaintext = decrypt_payload(envelope, &key).unwrap();
        assert_eq!(&*plaintext, "hello world");
    }

    #[test]
    fn tampered_envelope_never_decrypts() {
        let key = [5u8; 32];
        let envelope = encrypt_payload("a note body", &key, Scheme::Current).unwrap();

        // Flip one bit inside the ciphertext field.
        use base64::{Engine, engine::general_purpose::STANDARD};
        let (head, ciphertext) = envelope.rsplit_once(':').unwrap();
        let mut bytes = STANDARD.decode(ciphertext).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{head}:{}", STANDARD.encode(&bytes));

        let err = decrypt_payload(&tampered, &key).unwrap_err();
        assert!(matches!(err, CryptoError::AuthenticationFailure));
    }

    #[test]
    fn cross_scheme_tag_swap_never_silently_decrypts() {
        let key = [5u8; 32];

        let current = encrypt_payload("a note body", &key, Scheme::Current).unwrap();
        let as_legacy = format!("v1{}", current.strip_prefix("v2").unwrap());
        assert!(decrypt_payload(&as_legacy, &key).is_err());

        let legacy = encrypt_payload("a note body", &key, Scheme::Legacy).unwrap();
        let as_current = format!("v2{}", legacy.strip_prefix("v1").unwrap());
        assert!(decrypt_payload(&as_current, &key).is_err());
    }

    #[test]
    fn untagged_envelope_is_rejected() {
        let key = [5u8; 32];
        let envelope = encrypt_payload("a note body", &key, Scheme::Current).unwrap();
        let untagged = envelope.strip_prefix("v2:").unwrap();

        let err = decrypt_payload(untagged, &key).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedFormat(_)));
    }

    #[test]
    fn migrate_rewrites_legacy_envelopes() {
        let key = [5u8; 32];

        let legacy = encrypt_payload("keep me", &key, Scheme::Legacy).unwrap();
        let migrated = migrate_payload(&legacy, &key).unwrap();

        assert!(migrated.starts_with("v2:"));
        assert_eq!(&*decrypt_payload(&migrated, &key).unwrap(), "keep me");
    }

    #[test]
    fn migrate_leaves_current_envelopes_alone() {
        let key = [5u8; 32];

        let current = encrypt_payload("keep me", &key, Scheme::Current).unwrap();
        assert_eq!(migrate_payload(&current, &key).unwrap(), current);
    }

    #[test]
    fn migrate_with_wrong_key_fails() {
        let key = [5u8; 32];
        let other = [6u8; 32];

        let legacy = encrypt_payload("keep me", &key, Scheme::Legacy).unwrap();
        assert!(migrate_payload(&legacy, &other).is_err());
    }

    #[tokio::test]
    async fn async_derivation_matches_blocking() {
        let blocking =
            derive_root_credential_with_nonce(IDENTIFIER, PASSWORD, NONCE, fast_argon2()).unwrap();
        let derived =
            derive_root_credential_with_nonce_async(IDENTIFIER, PASSWORD, NONCE, fast_argon2())
                .await
                .unwrap();

        assert_eq!(blocking.master_key(), derived.master_key());
        assert_eq!(blocking.server_password(), derived.server_password());
    }

    #[tokio::test]
    async fn async_registration_yields_a_usable_credential() {
        let cred = derive_root_credential_async(IDENTIFIER, PASSWORD, fast_argon2())
            .await
            .unwrap();

        let envelope = cred.encrypt_payload("hello").unwrap();
        assert_eq!(&*cred.decrypt_payload(&envelope).unwrap(), "hello");
    }
}
