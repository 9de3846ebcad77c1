use sha2::{Digest, Sha256};

use super::SALT_LEN;

/// Derives the KDF salt from the account identifier and its public nonce.
///
/// The salt is the first 128 bits of `SHA-256(identifier || ":" || nonce)`.
/// Binding the identifier in means two accounts with the same password never
/// share a salt, while anyone who knows the (non-secret) nonce can re-derive
/// it. Deterministic; an empty identifier is permitted but discouraged.
pub fn derive_salt(identifier: &str, nonce: &str) -> [u8; SALT_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hasher.update(b":");
    hasher.update(nonce.as_bytes());
    let digest = hasher.finalize();

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&digest[..SALT_LEN]);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONCE: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    #[test]
    fn salt_matches_reference_vector() {
        let salt = derive_salt("user@example.com", NONCE);
        assert_eq!(hex::encode(salt), "d9adda3b38c8adb879789e9282040279");
    }

    #[test]
    fn salt_is_deterministic() {
        let s1 = derive_salt("user@example.com", NONCE);
        let s2 = derive_salt("user@example.com", NONCE);
        assert_eq!(s1, s2);
    }

    #[test]
    fn different_identifiers_produce_different_salts() {
        let s1 = derive_salt("alice@example.com", NONCE);
        let s2 = derive_salt("bob@example.com", NONCE);
        assert_ne!(s1, s2);
    }

    #[test]
    fn different_nonces_produce_different_salts() {
        let s1 = derive_salt("user@example.com", NONCE);
        let s2 = derive_salt("user@example.com", "ff00");
        assert_ne!(s1, s2);
    }

    #[test]
    fn empty_identifier_is_permitted() {
        let salt = derive_salt("", NONCE);
        assert_eq!(salt.len(), SALT_LEN);
    }
}
