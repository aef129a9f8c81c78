//! Key derivation of the encrypted container.
//!
//! The key comes from PBKDF2-HMAC-SHA256 over a passphrase and salt that every installation
//! shares. Anyone holding them can read and forge packs, so the encryption only keeps the file
//! from being edited by hand. It does not keep the songs secret.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Length of a derived key in bytes.
pub const KEY_LEN: usize = 32;

/// Parameters of the key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDerivation {
    /// The passphrase.
    pub passphrase: Vec<u8>,
    /// The salt.
    pub salt: Vec<u8>,
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Default for KeyDerivation {
    /// The parameters every released editor uses. Packs written with other parameters cannot be
    /// opened by the editor.
    fn default() -> Self {
        Self {
            passphrase: b"MikuMikuDB_NyxC_2025".to_vec(),
            salt: b"mikumiku_salt_v1".to_vec(),
            iterations: 100_000,
        }
    }
}

impl KeyDerivation {
    /// Derives the key.
    #[must_use]
    pub fn derive(&self) -> PackKey {
        log::trace!(
            "deriving pack key with {} PBKDF2 iterations",
            self.iterations
        );
        let mut key = [0; KEY_LEN];
        pbkdf2_hmac::<Sha256>(&self.passphrase, &self.salt, self.iterations, &mut key);
        PackKey(key)
    }
}

/// A derived key. The first half signs, the second half encrypts.
#[derive(Clone, PartialEq, Eq)]
pub struct PackKey([u8; KEY_LEN]);

impl PackKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// The HMAC-SHA256 signing key.
    #[must_use]
    pub fn signing_key(&self) -> &[u8] {
        &self.0[..KEY_LEN / 2]
    }

    /// The AES-128 encryption key.
    #[must_use]
    pub fn encryption_key(&self) -> &[u8] {
        &self.0[KEY_LEN / 2..]
    }

    /// The key as url-safe base64, the form other Fernet implementations take.
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::{Engine, engine::general_purpose::URL_SAFE};
        URL_SAFE.encode(self.0)
    }
}

impl std::fmt::Debug for PackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PackKey(..)")
    }
}
