//! Sensitive-field codec: AES-256-CBC with Base64 text encoding.
//!
//! The platform requires certificate numbers (`idCardNumber`) to be
//! AES-encrypted in transit. It issues one 32-character shared secret per
//! integrator: the full secret is the AES-256 key and its first 16 bytes are
//! the CBC initialization vector, with PKCS#7 padding and standard Base64
//! output. That derivation is the interop contract with the live service —
//! the IV is fixed, so encryption is deterministic.
//!
//! The codec operates on individual string fields only; nothing in the
//! request or response path invokes it implicitly. Callers encrypt a field
//! before building a request and decrypt fields picked out of a normalized
//! envelope.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CipherError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_SIZE: usize = 16;
const SECRET_LEN: usize = 32;

/// Symmetric codec for individual sensitive field values.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct FieldCipher {
    key: [u8; SECRET_LEN],
    iv: [u8; BLOCK_SIZE],
}

impl FieldCipher {
    /// Build a codec from the platform-issued shared secret, which must be
    /// exactly 32 bytes.
    pub fn new(secret: &str) -> Result<Self, CipherError> {
        let bytes = secret.as_bytes();
        if bytes.len() != SECRET_LEN {
            return Err(CipherError::SecretLength(bytes.len()));
        }
        let mut key = [0u8; SECRET_LEN];
        key.copy_from_slice(bytes);
        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(&bytes[..BLOCK_SIZE]);
        Ok(Self { key, iv })
    }

    /// Encrypt a field value, returning Base64 ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        STANDARD.encode(ciphertext)
    }

    /// Decrypt a Base64 field value back to the plaintext string.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        let raw = STANDARD
            .decode(ciphertext)
            .map_err(|e| CipherError::Base64(e.to_string()))?;
        if raw.is_empty() || raw.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::BlockLength(raw.len()));
        }
        let plaintext = Aes256CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&raw)
            .map_err(|_| CipherError::Padding)?;
        String::from_utf8(plaintext).map_err(|e| CipherError::Utf8(e.to_string()))
    }
}
