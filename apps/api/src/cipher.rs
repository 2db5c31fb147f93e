//! AES-256-CBC encryption and decryption of individual PII string fields
//! (email, phone, address).
//!
//! The string representation stored in the database is
//! `<hex(iv)>:<hex(ciphertext)>` with a fresh random 16-byte IV per call.
//! CBC with Pkcs7 padding carries no authentication tag, so tampered
//! ciphertext is not reliably detected; this matches the system being
//! reworked and is a recorded limitation, not an invitation to rely on it.
//!
//! Key derivation is deliberately simple: the configured secret is
//! truncated or zero-padded to 32 bytes, not hashed. Also recorded as a
//! known weakness.

use std::fmt;

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialization vector (one AES block).
pub const IV_LEN: usize = 16;

/// Delimiter between the hex-encoded IV and ciphertext.
const DELIMITER: char = ':';

/// Errors produced by the cipher layer. Deliberately generic: callers get
/// no detail about which part of the input was malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("malformed encrypted value")]
    InvalidFormat,
    #[error("decryption failed")]
    Decrypt,
}

/// A parsed, encrypted field value.
///
/// The string representation is `<hex(iv)>:<hex(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    /// Raw IV bytes, freshly random per encryption call.
    pub iv: [u8; IV_LEN],
    /// Raw ciphertext bytes (padded to a whole number of AES blocks).
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Parse an encrypted field string back into an [`EncryptedField`].
    ///
    /// Returns [`CipherError::InvalidFormat`] if the delimiter is missing,
    /// either half is not valid hex, or the IV is not exactly 16 bytes.
    pub fn parse(value: &str) -> Result<Self, CipherError> {
        let (iv_hex, ct_hex) = value
            .split_once(DELIMITER)
            .ok_or(CipherError::InvalidFormat)?;

        let iv_bytes = hex::decode(iv_hex).map_err(|_| CipherError::InvalidFormat)?;
        if iv_bytes.len() != IV_LEN {
            return Err(CipherError::InvalidFormat);
        }
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&iv_bytes);

        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::InvalidFormat)?;

        Ok(Self { iv, ciphertext })
    }
}

impl fmt::Display for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(self.iv),
            DELIMITER,
            hex::encode(&self.ciphertext)
        )
    }
}

/// Symmetric cipher for masking PII columns at rest.
///
/// Constructed once at startup from the configured secret and shared via
/// `AppState`; the key is an explicit value, not process-global state.
pub struct FieldCipher {
    key: [u8; KEY_LEN],
}

impl FieldCipher {
    /// Build a cipher from arbitrary secret material. The secret is
    /// truncated or zero-padded to exactly 32 bytes.
    pub fn new(secret: &str) -> Self {
        let mut key = [0u8; KEY_LEN];
        let bytes = secret.as_bytes();
        let n = bytes.len().min(KEY_LEN);
        key[..n].copy_from_slice(&bytes[..n]);
        FieldCipher { key }
    }

    /// Encrypt a plaintext field. Every call draws a fresh random IV, so
    /// encrypting the same plaintext twice yields different output.
    pub fn encrypt(&self, plaintext: &str) -> EncryptedField {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        EncryptedField { iv, ciphertext }
    }

    /// Decrypt a stored `ivHex:ciphertextHex` value back to the plaintext.
    ///
    /// Fails with a generic error on malformed input or when the Pkcs7
    /// padding check fails. A padding failure is the only tamper signal
    /// CBC gives; it is not a real integrity check.
    pub fn decrypt(&self, value: &str) -> Result<String, CipherError> {
        let field = EncryptedField::parse(value)?;

        let plaintext = Aes256CbcDec::new(&self.key.into(), &field.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&field.ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decrypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::new("unit-test-secret")
    }

    #[test]
    fn test_round_trip() {
        let c = cipher();
        let encrypted = c.encrypt("jane.doe@example.com").to_string();
        assert_eq!(c.decrypt(&encrypted).unwrap(), "jane.doe@example.com");
    }

    #[test]
    fn test_phone_number_round_trip() {
        let c = cipher();
        let encrypted = c.encrypt("+34600000000").to_string();
        assert_eq!(c.decrypt(&encrypted).unwrap(), "+34600000000");
    }

    #[test]
    fn test_iv_freshness() {
        let c = cipher();
        let a = c.encrypt("same plaintext");
        let b = c.encrypt("same plaintext");
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_output_shape() {
        let c = cipher();
        let value = c.encrypt("x").to_string();
        let (iv_hex, ct_hex) = value.split_once(':').unwrap();
        assert_eq!(iv_hex.len(), IV_LEN * 2);
        // Pkcs7 pads a 1-byte plaintext to one full block.
        assert_eq!(ct_hex.len(), 32);
    }

    #[test]
    fn test_missing_delimiter_rejected() {
        let c = cipher();
        assert_eq!(
            c.decrypt("deadbeefdeadbeef"),
            Err(CipherError::InvalidFormat)
        );
    }

    #[test]
    fn test_invalid_hex_rejected() {
        let c = cipher();
        assert_eq!(
            c.decrypt("not-hex-at-all:zzzz"),
            Err(CipherError::InvalidFormat)
        );
    }

    #[test]
    fn test_short_iv_rejected() {
        let c = cipher();
        assert_eq!(c.decrypt("deadbeef:00112233"), Err(CipherError::InvalidFormat));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let c = cipher();
        let value = c.encrypt("some plaintext value").to_string();
        let (iv_hex, _) = value.split_once(':').unwrap();
        // Ciphertext that is not a whole number of blocks cannot unpad.
        let mangled = format!("{iv_hex}:00");
        assert_eq!(c.decrypt(&mangled), Err(CipherError::Decrypt));
    }

    #[test]
    fn test_key_longer_than_32_bytes_truncated() {
        let long = FieldCipher::new(&"k".repeat(100));
        let trunc = FieldCipher::new(&"k".repeat(32));
        let encrypted = long.encrypt("hello").to_string();
        assert_eq!(trunc.decrypt(&encrypted).unwrap(), "hello");
    }
}
