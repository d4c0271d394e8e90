//! Login payload encryption
//!
//! The mobile app encrypts the login JSON with AES-CBC (PKCS#7 padding) using a
//! key and IV baked into the app, then base64-encodes the ciphertext.

use aes::{Aes128, Aes192, Aes256};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::error::RtlError;

/// Encrypt a login payload and return it base64-encoded
///
/// The AES variant follows the key length: 16, 24 or 32 bytes.
///
/// # Errors
///
/// Returns `RtlError::Encryption` if the key or IV has an unsupported length.
pub fn encrypt_login_payload(plaintext: &str, key: &[u8], iv: &[u8]) -> Result<String, RtlError> {
    let data = plaintext.as_bytes();
    let invalid = |e: cbc::cipher::InvalidLength| RtlError::Encryption(e.to_string());

    let ciphertext = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        other => {
            return Err(RtlError::Encryption(format!(
                "unsupported AES key length: {other} bytes"
            )));
        },
    };

    Ok(STANDARD.encode(ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_LOGIN_IV, DEFAULT_LOGIN_KEY};

    fn encrypt_with_defaults(plaintext: &str) -> Result<String, RtlError> {
        encrypt_login_payload(
            plaintext,
            DEFAULT_LOGIN_KEY.as_bytes(),
            DEFAULT_LOGIN_IV.as_bytes(),
        )
    }

    #[test]
    fn matches_known_ciphertext() {
        // Reference values produced with `openssl enc -aes-192-cbc`
        let encrypted = encrypt_with_defaults(r#"{"email":"a@b.mv"}"#).unwrap();
        assert_eq!(encrypted, "0PbhuUHsNDgn61B+PjWfJ5hte8vGyiXlAataWZneMTI=");
    }

    #[test]
    fn empty_payload_is_one_padding_block() {
        let encrypted = encrypt_with_defaults("").unwrap();
        assert_eq!(encrypted, "tNGf9hQoA1s8CHGqQBxNPw==");
    }

    #[test]
    fn ciphertext_is_block_aligned() {
        let encrypted = encrypt_with_defaults("sixteen byte msg").unwrap();
        let raw = STANDARD.decode(encrypted).unwrap();
        // Full block of padding is appended to an already aligned payload
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn rejects_unsupported_key_length() {
        let err = encrypt_login_payload("x", b"short", DEFAULT_LOGIN_IV.as_bytes()).unwrap_err();
        assert!(matches!(err, RtlError::Encryption(_)));
    }

    #[test]
    fn rejects_bad_iv_length() {
        let err = encrypt_login_payload("x", DEFAULT_LOGIN_KEY.as_bytes(), b"iv").unwrap_err();
        assert!(matches!(err, RtlError::Encryption(_)));
    }

    #[test]
    fn supports_aes128_and_aes256_keys() {
        let iv = DEFAULT_LOGIN_IV.as_bytes();
        assert!(encrypt_login_payload("x", &[7u8; 16], iv).is_ok());
        assert!(encrypt_login_payload("x", &[7u8; 32], iv).is_ok());
    }
}
