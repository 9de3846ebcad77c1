use crate::error::CryptoError;

/// Splits key material into `parts` equal, contiguous, non-overlapping slices.
///
/// The length must divide evenly; anything else is rejected up front rather
/// than silently truncated. The halves of a credential derivation come back
/// in order: master key first, server password second.
pub fn split_key_material(material: &[u8], parts: usize) -> Result<Vec<&[u8]>, CryptoError> {
    if parts == 0 {
        return Err(CryptoError::Parameter(
            "split requires at least one part".into(),
        ));
    }
    if material.is_empty() || material.len() % parts != 0 {
        return Err(CryptoError::Parameter(format!(
            "key material length {} is not divisible into {parts} equal parts",
            material.len()
        )));
    }

    Ok(material.chunks_exact(material.len() / parts).collect())
}
