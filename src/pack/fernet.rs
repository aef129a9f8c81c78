//! Fernet tokens: versioned, timestamped, authenticated symmetric encryption.
//!
//! A token is the url-safe base64 encoding of
//!
//! ```text
//! 0x80 | timestamp (u64 BE) | IV (16 bytes) | AES-128-CBC PKCS#7 ciphertext | HMAC-SHA256 (32 bytes)
//! ```
//!
//! where the HMAC covers everything before it. Tokens written here can be read by any other Fernet
//! implementation given the same key, and the other way around.

use aes::Aes128;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use super::{entropy::Entropy, key::PackKey};

/// Version byte of every token.
pub const VERSION: u8 = 0x80;

const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const MAC_LEN: usize = 32;
const BLOCK_LEN: usize = 16;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

type HmacSha256 = Hmac<Sha256>;
type Encryptor = cbc::Encryptor<Aes128>;
type Decryptor = cbc::Decryptor<Aes128>;

/// A token that cannot be opened. No plaintext is returned in any of these cases.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecryptionError {
    /// The token is not url-safe base64.
    #[error("token is not valid base64")]
    InvalidBase64,
    /// The token is too short or its ciphertext is not block aligned.
    #[error("token is truncated or malformed")]
    InvalidToken,
    /// The version byte is unknown.
    #[error("token version {0:#04x} is not supported")]
    UnsupportedVersion(u8),
    /// The signature does not match. The token was altered or the key is wrong.
    #[error("token signature does not match")]
    SignatureMismatch,
    /// The ciphertext authenticated but its padding is broken.
    #[error("token padding is invalid")]
    InvalidPadding,
}

fn mac(key: &PackKey) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(key.signing_key())
        .expect("HMAC should accept a key of any length")
}

/// Encrypts `plaintext` into a token stamped with `timestamp` (Unix seconds).
#[must_use]
pub fn encrypt(
    key: &PackKey,
    plaintext: &[u8],
    timestamp: u64,
    entropy: &mut impl Entropy,
) -> String {
    let mut iv = [0; IV_LEN];
    entropy.fill(&mut iv);

    let ciphertext = Encryptor::new(key.encryption_key().into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
    token.push(VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(&iv);
    token.extend_from_slice(&ciphertext);

    let mut signer = mac(key);
    signer.update(&token);
    token.extend_from_slice(&signer.finalize().into_bytes());

    log::trace!(
        "encrypted {} bytes into a {} byte token",
        plaintext.len(),
        token.len()
    );
    URL_SAFE.encode(token)
}

/// A token whose signature has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    /// Creation time of the token, in Unix seconds.
    pub timestamp: u64,
    /// The decrypted bytes.
    pub plaintext: Vec<u8>,
}

/// Checks the signature of `token` and decrypts it.
///
/// Surrounding whitespace is ignored. The timestamp is returned but not checked against the
/// current time: saved packs do not expire.
///
/// # Errors
///
/// Returns [`DecryptionError`] when the token is malformed, altered, or was made with another key.
pub fn decrypt(key: &PackKey, token: &[u8]) -> Result<Decrypted, DecryptionError> {
    let token = URL_SAFE
        .decode(token.trim_ascii())
        .map_err(|_| DecryptionError::InvalidBase64)?;
    if token.len() < HEADER_LEN + MAC_LEN {
        return Err(DecryptionError::InvalidToken);
    }
    if token[0] != VERSION {
        return Err(DecryptionError::UnsupportedVersion(token[0]));
    }

    let (signed, signature) = token.split_at(token.len() - MAC_LEN);
    let mut verifier = mac(key);
    verifier.update(signed);
    verifier
        .verify_slice(signature)
        .map_err(|_| DecryptionError::SignatureMismatch)?;

    let (header, ciphertext) = signed.split_at(HEADER_LEN);
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptionError::InvalidToken);
    }
    let mut timestamp = [0; TIMESTAMP_LEN];
    timestamp.copy_from_slice(&header[1..1 + TIMESTAMP_LEN]);
    let iv = &header[1 + TIMESTAMP_LEN..];

    let plaintext = Decryptor::new(key.encryption_key().into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecryptionError::InvalidPadding)?;
    Ok(Decrypted {
        timestamp: u64::from_be_bytes(timestamp),
        plaintext,
    })
}
