use aes::cipher::{
    block_padding::Pkcs7, generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut,
    KeyIvInit,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub const KEY_LEN: usize = 32;
pub const BLOCK_LEN: usize = 16;

/// Errors that can occur while protecting fields
#[derive(Debug, Error)]
pub enum ProtectionError {
    #[error("Encryption key is not configured (set {0})")]
    MissingKey(String),

    #[error("Encryption key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Ciphertext is too short")]
    Truncated,

    #[error("Ciphertext padding is invalid")]
    Padding,

    #[error("Decrypted data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Where the encryption secret comes from
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionSettings {
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

impl Default for ProtectionSettings {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
        }
    }
}

fn default_key_env() -> String {
    "AES_ENCRYPTION_KEY".to_string()
}

/// Symmetric encryption for sensitive profile fields
///
/// Output layout is `base64(iv || ciphertext)` with a fresh random IV per
/// call, AES-256-CBC and PKCS#7 padding.
#[derive(Clone)]
pub struct FieldProtector {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for FieldProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldProtector")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl FieldProtector {
    /// Use a raw 256-bit key
    pub fn from_key(key: &[u8]) -> Result<Self, ProtectionError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| ProtectionError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: key.len(),
            })?;
        Ok(Self { key })
    }

    /// Derive the key by hashing a secret with SHA-256
    pub fn from_secret(secret: &str) -> Result<Self, ProtectionError> {
        if secret.is_empty() {
            return Err(ProtectionError::MissingKey("a non-empty secret".to_string()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
        Ok(Self { key })
    }

    /// Derive the key from the secret held in an environment variable
    pub fn from_env(var: &str) -> Result<Self, ProtectionError> {
        match std::env::var(var) {
            Ok(secret) if !secret.is_empty() => Self::from_secret(&secret),
            _ => Err(ProtectionError::MissingKey(var.to_string())),
        }
    }

    pub fn from_settings(settings: &ProtectionSettings) -> Result<Self, ProtectionError> {
        Self::from_env(&settings.key_env)
    }

    /// Encrypt a string
    pub fn encrypt(&self, plaintext: &str) -> String {
        let iv: [u8; BLOCK_LEN] = rand::random();
        let cipher = Aes256CbcEnc::new(
            GenericArray::from_slice(&self.key),
            GenericArray::from_slice(&iv),
        );
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut blob = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);

        STANDARD.encode(blob)
    }

    /// Decrypt a string produced by [`FieldProtector::encrypt`]
    pub fn decrypt(&self, encoded: &str) -> Result<String, ProtectionError> {
        let blob = STANDARD.decode(encoded)?;
        if blob.len() <= BLOCK_LEN {
            return Err(ProtectionError::Truncated);
        }

        let (iv, ciphertext) = blob.split_at(BLOCK_LEN);
        let cipher = Aes256CbcDec::new(
            GenericArray::from_slice(&self.key),
            GenericArray::from_slice(iv),
        );
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| ProtectionError::Padding)?;

        Ok(String::from_utf8(plaintext)?)
    }

    /// One-way hash of an identifier (lowercase hex SHA-256)
    pub fn hash_sensitive(data: &str) -> String {
        Sha256::digest(data.as_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// Phone numbers shorter than this are shown as-is
const PHONE_MIN_LEN: usize = 7;
const PHONE_PREFIX: usize = 3;
const PHONE_SUFFIX: usize = 4;

/// Handles this short or shorter are masked entirely
const HANDLE_FULL_MASK_LEN: usize = 4;
const HANDLE_KEEP: usize = 2;

/// Mask a phone number, keeping the first 3 and last 4 characters
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < PHONE_MIN_LEN {
        return phone.to_string();
    }

    let head: String = chars[..PHONE_PREFIX].iter().collect();
    let tail: String = chars[chars.len() - PHONE_SUFFIX..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Mask a social handle, keeping the first and last 2 characters
pub fn mask_handle(handle: &str) -> String {
    let chars: Vec<char> = handle.chars().collect();
    if chars.len() <= HANDLE_FULL_MASK_LEN {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..HANDLE_KEEP].iter().collect();
    let tail: String = chars[chars.len() - HANDLE_KEEP..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 2 * HANDLE_KEEP), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protector() -> FieldProtector {
        FieldProtector::from_secret("test-secret").unwrap()
    }

    #[test]
    fn test_round_trip() {
        let protector = protector();
        let encrypted = protector.encrypt("110101199003077777");
        assert_ne!(encrypted, "110101199003077777");
        assert_eq!(protector.decrypt(&encrypted).unwrap(), "110101199003077777");
    }

    #[test]
    fn test_round_trip_unicode_and_empty() {
        let protector = protector();
        for text in ["", "上海市浦东新区", "exactly sixteen!"] {
            let encrypted = protector.encrypt(text);
            assert_eq!(protector.decrypt(&encrypted).unwrap(), text);
        }
    }

    #[test]
    fn test_random_iv() {
        let protector = protector();
        assert_ne!(protector.encrypt("same"), protector.encrypt("same"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = protector().encrypt("secret data that spans blocks");
        let other = FieldProtector::from_secret("another-secret").unwrap();
        assert!(other.decrypt(&encrypted).map_or(true, |text| text != "secret data that spans blocks"));
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(matches!(
            FieldProtector::from_key(&[0u8; 16]),
            Err(ProtectionError::InvalidKeyLength { expected: 32, actual: 16 })
        ));
        assert!(FieldProtector::from_key(&[7u8; 32]).is_ok());
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(
            FieldProtector::from_secret(""),
            Err(ProtectionError::MissingKey(_))
        ));
        assert!(matches!(
            FieldProtector::from_env("MATCH_ENGINE_TEST_UNSET_KEY"),
            Err(ProtectionError::MissingKey(var)) if var == "MATCH_ENGINE_TEST_UNSET_KEY"
        ));
    }

    #[test]
    fn test_malformed_ciphertext() {
        let protector = protector();
        assert!(matches!(protector.decrypt("not base64!"), Err(ProtectionError::Decode(_))));
        assert!(matches!(
            protector.decrypt(&STANDARD.encode([0u8; 16])),
            Err(ProtectionError::Truncated)
        ));
    }

    #[test]
    fn test_hash_sensitive() {
        assert_eq!(
            FieldProtector::hash_sensitive("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("13812345678"), "138****5678");
        assert_eq!(mask_phone("123456"), "123456");
    }

    #[test]
    fn test_mask_handle() {
        assert_eq!(mask_handle("lucky_star88"), "lu********88");
        assert_eq!(mask_handle("abcd"), "****");
        assert_eq!(mask_handle("abcde"), "ab*de");
        assert_eq!(mask_handle("微信号码很长"), "微信**很长");
    }

    #[test]
    fn test_debug_hides_key() {
        assert!(!format!("{:?}", protector()).contains("key: ["));
    }
}
