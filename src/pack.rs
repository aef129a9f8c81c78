//! The `.pdpack` project file.
//!
//! A pack is stored in one of two formats:
//!
//! - [`PackFormat::LegacyJson`]: the [`PackConfig`] as plain UTF-8 JSON. Written by old editors,
//!   still read.
//! - [`PackFormat::Encrypted`]: [`ENCRYPTED_HEADER`] followed by a [Fernet](fernet) token of the
//!   JSON. The key comes from [`KeyDerivation`].
//!
//! Decoding fails closed: a pack is either returned whole or not at all.
//!
//! ```
//! # #[cfg(feature = "rand")]
//! # {
//! use pvdb_rs::{model::PackConfig, pack::{PackCodec, PackFormat}};
//!
//! let mut codec = PackCodec::new();
//! let pack = PackConfig::new("My Pack", "");
//! let bytes = codec.encode(&pack).unwrap();
//! assert!(bytes.starts_with(b"PDPACK_ENCRYPTED_V1\n"));
//! let decoded = codec.decode_with_format(&bytes).unwrap();
//! assert_eq!(decoded.format, PackFormat::Encrypted);
//! assert_eq!(decoded.config, pack);
//! # }
//! ```

pub mod entropy;
pub mod fernet;
pub mod key;

use thiserror::Error;

use self::{
    entropy::Entropy,
    fernet::DecryptionError,
    key::{KeyDerivation, PackKey},
};
use crate::model::PackConfig;

/// Marker at the start of encrypted packs.
pub const ENCRYPTED_HEADER: &[u8] = b"PDPACK_ENCRYPTED_V1\n";

/// Version reported for packs that do not state one.
pub const DEFAULT_PACK_VERSION: &str = "1.0";

/// Container format of a `.pdpack` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackFormat {
    /// Header plus Fernet token.
    Encrypted,
    /// Plain JSON object.
    LegacyJson,
}

impl std::fmt::Display for PackFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Encrypted => "encrypted pack",
            Self::LegacyJson => "legacy JSON pack",
        })
    }
}

/// Tells the format of a `.pdpack` file from its first bytes.
#[must_use]
pub fn detect_format(bytes: &[u8]) -> Option<PackFormat> {
    if bytes.starts_with(ENCRYPTED_HEADER) {
        Some(PackFormat::Encrypted)
    } else if bytes.starts_with(b"{") {
        Some(PackFormat::LegacyJson)
    } else {
        None
    }
}

/// An error on writing a pack.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The pack could not be written as JSON.
    #[error("failed to write pack JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An error on reading a pack, by the stage that failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are neither an encrypted pack nor JSON.
    #[error("unrecognized pack format")]
    UnknownFormat,
    /// The encrypted payload could not be opened.
    #[error("failed to decrypt pack: {0}")]
    Decrypt(#[from] DecryptionError),
    /// The JSON does not describe a pack.
    #[error("invalid pack JSON at `{}`: {}", .0.path(), .0.inner())]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),
}

/// A decoded pack and the format it was stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPack {
    /// The pack.
    pub config: PackConfig,
    /// The format it was read from.
    pub format: PackFormat,
}

/// Reads and writes packs with a derived key and an IV source.
///
/// Deriving the key is slow by design of PBKDF2, so the codec derives it once and keeps it.
pub struct PackCodec<E> {
    key: PackKey,
    entropy: E,
}

#[cfg(feature = "rand")]
impl PackCodec<entropy::RandEntropy<rand::rngs::StdRng>> {
    /// A codec with the editor's key and OS-seeded IVs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_entropy(entropy::RandEntropy::from_os_rng())
    }
}

#[cfg(feature = "rand")]
impl Default for PackCodec<entropy::RandEntropy<rand::rngs::StdRng>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> PackCodec<E> {
    /// A codec with the editor's key and the given IV source.
    #[must_use]
    pub fn with_entropy(entropy: E) -> Self {
        Self::with_settings(&KeyDerivation::default(), entropy)
    }

    /// A codec with a custom key derivation. Packs written this way cannot be opened by the
    /// editor.
    #[must_use]
    pub fn with_settings(derivation: &KeyDerivation, entropy: E) -> Self {
        Self {
            key: derivation.derive(),
            entropy,
        }
    }

    /// Reads a pack in either format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] naming the stage that failed.
    pub fn decode(&self, bytes: &[u8]) -> Result<PackConfig, DecodeError> {
        self.decode_with_format(bytes).map(|decoded| decoded.config)
    }

    /// Reads a pack in either format, also telling which format it was.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] naming the stage that failed.
    pub fn decode_with_format(&self, bytes: &[u8]) -> Result<DecodedPack, DecodeError> {
        decode_with_key(&self.key, bytes)
    }
}

impl<E: Entropy> PackCodec<E> {
    /// Writes `config` as an encrypted pack stamped with the current time.
    ///
    /// The metadata of `config` is written as is. Call [`PackConfig::mark_encrypted`] first to
    /// stamp it the way the editor does.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the pack cannot be written as JSON.
    pub fn encode(&mut self, config: &PackConfig) -> Result<Vec<u8>, EncodeError> {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        self.encode_at(config, now)
    }

    /// Writes `config` as an encrypted pack stamped with `timestamp` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the pack cannot be written as JSON.
    pub fn encode_at(&mut self, config: &PackConfig, timestamp: u64) -> Result<Vec<u8>, EncodeError> {
        let json = to_json(config)?;
        let token = fernet::encrypt(&self.key, &json, timestamp, &mut self.entropy);
        let mut bytes = Vec::with_capacity(ENCRYPTED_HEADER.len() + token.len());
        bytes.extend_from_slice(ENCRYPTED_HEADER);
        bytes.extend_from_slice(token.as_bytes());
        log::debug!(
            "encoded pack `{}` with {} songs into {} bytes",
            config.pack_name,
            config.songs.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl<E> std::fmt::Debug for PackCodec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackCodec").finish_non_exhaustive()
    }
}

/// Writes `config` as legacy plain JSON: two space indent, non-ASCII text kept as is.
///
/// # Errors
///
/// Returns [`EncodeError`] when the pack cannot be written as JSON.
pub fn to_json(config: &PackConfig) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec_pretty(config)?)
}

fn from_json(json: &[u8]) -> Result<PackConfig, DecodeError> {
    let de = &mut serde_json::Deserializer::from_slice(json);
    Ok(serde_path_to_error::deserialize(de)?)
}

fn decode_with_key(key: &PackKey, bytes: &[u8]) -> Result<DecodedPack, DecodeError> {
    let format = detect_format(bytes).ok_or(DecodeError::UnknownFormat)?;
    let config = match format {
        PackFormat::Encrypted => {
            let token = bytes.strip_prefix(ENCRYPTED_HEADER).unwrap_or_default();
            let decrypted = fernet::decrypt(key, token)?;
            log::trace!("pack token was created at {}", decrypted.timestamp);
            from_json(&decrypted.plaintext)?
        }
        PackFormat::LegacyJson => from_json(bytes)?,
    };
    log::debug!("decoded {format} with {} songs", config.songs.len());
    Ok(DecodedPack { config, format })
}

/// Writes `config` as an encrypted pack with the editor's key and OS-seeded IVs.
///
/// Derives the key on every call. Keep a [`PackCodec`] to write many packs.
///
/// # Errors
///
/// Returns [`EncodeError`] when the pack cannot be written as JSON.
#[cfg(feature = "rand")]
pub fn encode_pack(config: &PackConfig) -> Result<Vec<u8>, EncodeError> {
    PackCodec::new().encode(config)
}

/// Reads a pack in either format with the editor's key.
///
/// Derives the key on every call. Keep a [`PackCodec`] to read many packs.
///
/// # Errors
///
/// Returns [`DecodeError`] naming the stage that failed.
pub fn decode_pack(bytes: &[u8]) -> Result<PackConfig, DecodeError> {
    decode_with_key(&KeyDerivation::default().derive(), bytes).map(|decoded| decoded.config)
}

/// What [`summarize_pack`] reports about a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSummary {
    /// The container format.
    pub format: PackFormat,
    /// Number of songs.
    pub songs: usize,
    /// Name of the pack, `"Unknown"` when empty or missing.
    pub pack_name: String,
    /// Stated version, [`DEFAULT_PACK_VERSION`] when absent.
    pub version: String,
}

/// Decodes a pack and summarizes it.
///
/// # Errors
///
/// Returns [`DecodeError`] when the pack cannot be read.
pub fn summarize_pack<E>(codec: &PackCodec<E>, bytes: &[u8]) -> Result<PackSummary, DecodeError> {
    let DecodedPack { config, format } = codec.decode_with_format(bytes)?;
    Ok(PackSummary {
        format,
        songs: config.songs.len(),
        pack_name: if config.pack_name.is_empty() {
            "Unknown".into()
        } else {
            config.pack_name
        },
        version: config
            .version
            .unwrap_or_else(|| DEFAULT_PACK_VERSION.into()),
    })
}
