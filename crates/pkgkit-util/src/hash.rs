use digest::DynDigest;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Chunk size used when streaming files into a hasher (256 KiB).
pub const CHUNK_SIZE: usize = 262_144;

/// Hash algorithms accepted by [`hashsum_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Blake3,
}

/// Returned when an algorithm name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hash algorithm: {0}")]
pub struct UnknownHashAlgorithm(pub String);

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Blake3,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    fn hasher(self) -> StreamHasher {
        match self {
            Self::Md5 => StreamHasher::Digest(Box::new(md5::Md5::default())),
            Self::Sha1 => StreamHasher::Digest(Box::new(sha1::Sha1::default())),
            Self::Sha256 => StreamHasher::Digest(Box::new(sha2::Sha256::default())),
            Self::Sha512 => StreamHasher::Digest(Box::new(sha2::Sha512::default())),
            Self::Blake3 => StreamHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = UnknownHashAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algo| algo.as_str() == lower)
            .ok_or_else(|| UnknownHashAlgorithm(s.to_string()))
    }
}

enum StreamHasher {
    Digest(Box<dyn DynDigest>),
    Blake3(Box<blake3::Hasher>),
}

impl StreamHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Digest(d) => d.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Digest(d) => to_hex(&d.finalize()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Compute the digest of a file with the given algorithm, returning lowercase hex.
///
/// The file is streamed in [`CHUNK_SIZE`] chunks so large packages never
/// have to fit in memory.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn hashsum_file(path: &Path, algorithm: HashAlgorithm) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize_hex())
}

/// MD5 digest of a file.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn md5_file(path: &Path) -> io::Result<String> {
    hashsum_file(path, HashAlgorithm::Md5)
}

/// Compute the digest of a byte slice, returning lowercase hex.
#[must_use]
pub fn hashsum_bytes(data: &[u8], algorithm: HashAlgorithm) -> String {
    let mut hasher = algorithm.hasher();
    hasher.update(data);
    hasher.finalize_hex()
}
