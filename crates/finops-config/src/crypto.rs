//! Symmetric encryption for secret values (AES-256-GCM).
//!
//! Ciphertexts encode as `iv:tag:data` with each segment hex-encoded, so a
//! stored secret is a plain string that round-trips through the JSON
//! document. Decryption fails loudly on a malformed encoding or when the
//! authentication tag does not match.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use finops_core::AppError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Environment variable overriding the development key.
pub const KEY_ENV: &str = "FINOPS_ENCRYPTION_KEY";

const DEV_KEY: &str = "finops-dev-encryption-key-change-in-production";

/// Derive the fixed 32-byte key from `FINOPS_ENCRYPTION_KEY` or the
/// built-in development default.
fn derive_key() -> [u8; 32] {
    let material = std::env::var(KEY_ENV).unwrap_or_else(|_| DEV_KEY.to_string());
    Sha256::digest(material.as_bytes()).into()
}

/// Encrypt `plaintext` with the fixed key, producing `iv:tag:data`.
pub fn encrypt(plaintext: &str) -> Result<String, AppError> {
    encrypt_with_key(&derive_key(), plaintext)
}

/// Decrypt a string produced by [`encrypt`].
pub fn decrypt(encoded: &str) -> Result<String, AppError> {
    decrypt_with_key(&derive_key(), encoded)
}

pub(crate) fn encrypt_with_key(key: &[u8; 32], plaintext: &str) -> Result<String, AppError> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|e| AppError::Encryption(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // aes-gcm appends the tag to the ciphertext; split it back out so the
    // encoded form keeps the iv:tag:data layout.
    let sealed = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| AppError::Encryption(e.to_string()))?;
    let (data, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    Ok(format!(
        "{}:{}:{}",
        hex::encode(nonce_bytes),
        hex::encode(tag),
        hex::encode(data)
    ))
}

pub(crate) fn decrypt_with_key(key: &[u8; 32], encoded: &str) -> Result<String, AppError> {
    let parts: Vec<&str> = encoded.split(':').collect();
    let [iv_hex, tag_hex, data_hex] = parts.as_slice() else {
        return Err(AppError::Decryption(format!(
            "expected iv:tag:data, got {} segment(s)",
            parts.len()
        )));
    };

    let iv = decode_segment(iv_hex, "iv")?;
    let tag = decode_segment(tag_hex, "tag")?;
    let data = decode_segment(data_hex, "data")?;
    if iv.len() != NONCE_LEN {
        return Err(AppError::Decryption(format!(
            "iv must be {NONCE_LEN} bytes, got {}",
            iv.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(AppError::Decryption(format!(
            "tag must be {TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }

    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|e| AppError::Decryption(e.to_string()))?;

    let mut sealed = data;
    sealed.extend_from_slice(&tag);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
        .map_err(|_| AppError::Decryption("authentication tag mismatch".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| AppError::Decryption("plaintext is not valid UTF-8".to_string()))
}

fn decode_segment(segment: &str, label: &str) -> Result<Vec<u8>, AppError> {
    hex::decode(segment).map_err(|_| AppError::Decryption(format!("{label} is not valid hex")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [7u8; 32];

    #[test]
    fn test_round_trip() {
        let encoded = encrypt_with_key(&KEY, "hello").expect("encrypt");
        assert_eq!(decrypt_with_key(&KEY, &encoded).expect("decrypt"), "hello");
    }

    #[test]
    fn test_round_trip_default_key() {
        let encoded = encrypt("top secret").expect("encrypt");
        assert_eq!(decrypt(&encoded).expect("decrypt"), "top secret");
    }

    #[test]
    fn test_round_trip_empty_plaintext() {
        let encoded = encrypt_with_key(&KEY, "").expect("encrypt");
        assert_eq!(decrypt_with_key(&KEY, &encoded).expect("decrypt"), "");
    }

    #[test]
    fn test_nonce_varies_between_calls() {
        let a = encrypt_with_key(&KEY, "same").expect("encrypt");
        let b = encrypt_with_key(&KEY, "same").expect("encrypt");
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_tag_fails() {
        let encoded = encrypt_with_key(&KEY, "hello").expect("encrypt");
        let mut parts: Vec<String> = encoded.split(':').map(String::from).collect();
        // Flip one nibble in the tag segment
        let flipped = if parts[1].as_bytes()[0] == b'0' { "1" } else { "0" };
        parts[1].replace_range(0..1, flipped);

        let err = decrypt_with_key(&KEY, &parts.join(":")).unwrap_err();
        assert!(err.to_string().contains("authentication tag mismatch"));
    }

    #[test]
    fn test_tampered_data_fails() {
        let encoded = encrypt_with_key(&KEY, "hello").expect("encrypt");
        let mut parts: Vec<String> = encoded.split(':').map(String::from).collect();
        let flipped = if parts[2].as_bytes()[0] == b'0' { "1" } else { "0" };
        parts[2].replace_range(0..1, flipped);

        assert!(decrypt_with_key(&KEY, &parts.join(":")).is_err());
    }

    #[test]
    fn test_wrong_segment_count_fails() {
        let err = decrypt_with_key(&KEY, "deadbeef:cafe").unwrap_err();
        assert!(err.to_string().contains("2 segment(s)"));

        assert!(decrypt_with_key(&KEY, "").is_err());
    }

    #[test]
    fn test_non_hex_segment_fails() {
        let encoded = encrypt_with_key(&KEY, "hello").expect("encrypt");
        let mut parts: Vec<String> = encoded.split(':').map(String::from).collect();
        parts[0] = "not-hex".to_string();
        let err = decrypt_with_key(&KEY, &parts.join(":")).unwrap_err();
        assert!(err.to_string().contains("iv is not valid hex"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let encoded = encrypt_with_key(&KEY, "hello").expect("encrypt");
        let other = [8u8; 32];
        assert!(decrypt_with_key(&other, &encoded).is_err());
    }
}
