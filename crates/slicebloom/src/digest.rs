//! Digest algorithm registry
//!
//! The binary format identifies the digest by name, so the set of
//! recognized names is closed: `sha256`, `sha512`, `sha3_256`, `sha3_512`.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use sha3::{Sha3_256, Sha3_512};

/// Digest algorithms the index expansion can run on
///
/// The name string is part of the exported format identity. `from_name`
/// matches exactly these names, no aliases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256
    #[serde(rename = "sha256")]
    Sha2_256,
    /// SHA-512
    #[serde(rename = "sha512")]
    Sha2_512,
    /// SHA3-256
    #[default]
    #[serde(rename = "sha3_256")]
    Sha3_256,
    /// SHA3-512
    #[serde(rename = "sha3_512")]
    Sha3_512,
}

impl HashAlgorithm {
    /// Every registered algorithm
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha2_256,
        HashAlgorithm::Sha2_512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_512,
    ];

    /// Identifier stored in the binary format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha2_256 => "sha256",
            Self::Sha2_512 => "sha512",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_512 => "sha3_512",
        }
    }

    /// Look up an algorithm by its identifier
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha256" => Some(Self::Sha2_256),
            "sha512" => Some(Self::Sha2_512),
            "sha3_256" => Some(Self::Sha3_256),
            "sha3_512" => Some(Self::Sha3_512),
            _ => None,
        }
    }

    /// Digest output size in bytes
    pub fn digest_size(&self) -> usize {
        match self {
            Self::Sha2_256 | Self::Sha3_256 => 32,
            Self::Sha2_512 | Self::Sha3_512 => 64,
        }
    }

    /// One-shot digest of `salt || value`
    pub(crate) fn digest_salted(&self, salt: &[u8; 4], value: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha2_256 => salted::<Sha256>(salt, value),
            Self::Sha2_512 => salted::<Sha512>(salt, value),
            Self::Sha3_256 => salted::<Sha3_256>(salt, value),
            Self::Sha3_512 => salted::<Sha3_512>(salt, value),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn salted<D: Digest>(salt: &[u8; 4], value: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(salt);
    hasher.update(value);
    hasher.finalize().to_vec()
}
