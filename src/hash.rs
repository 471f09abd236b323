// src/hash.rs

//! SHA-256 content hashing for cache validity
//!
//! Every generated recipe file records the hash of the exact bytes it was
//! derived from. Hashes are stored and compared as lowercase hex strings, so
//! a cached file written by any earlier run can be checked without knowing
//! anything else about that run.
//!
//! Changing the algorithm invalidates every existing cache, which only costs
//! one recomputation per stage.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Length of a SHA-256 digest as a hex string
pub const HEX_LEN: usize = 64;

/// Hash parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Hash string has the wrong length
    InvalidLength { expected: usize, got: usize },
    /// Hash string contains invalid hex characters
    InvalidHex(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid hash length: expected {}, got {}", expected, got)
            }
            Self::InvalidHex(s) => write!(f, "invalid hex in hash: {}", s),
        }
    }
}

impl std::error::Error for HashError {}

/// A SHA-256 hash as lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse a hex hash string, normalizing to lowercase
    pub fn parse(value: &str) -> Result<Self, HashError> {
        if value.len() != HEX_LEN {
            return Err(HashError::InvalidLength {
                expected: HEX_LEN,
                got: value.len(),
            });
        }

        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashError::InvalidHex(value.to_string()));
        }

        Ok(Self(value.to_lowercase()))
    }

    /// Get the hash value as a hex string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a stored hash string names the same content
    ///
    /// Malformed stored values never match.
    pub fn matches(&self, stored: &str) -> bool {
        ContentHash::parse(stored).is_ok_and(|other| other == *self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Incremental SHA-256 hasher
#[derive(Default)]
pub struct Hasher {
    state: Sha256,
}

impl Hasher {
    /// Create a new hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalize and return the hash
    pub fn finalize(self) -> ContentHash {
        ContentHash(format!("{:x}", self.state.finalize()))
    }
}

/// Compute the hash of a byte slice
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Compute the hash of everything left in a reader
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<ContentHash> {
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Compute the hash of a file's raw bytes
///
/// Streams the file content to avoid loading it entirely into memory.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

/// Reader adapter that hashes every byte passing through it
///
/// Used to prove that the bytes a parser consumed are the bytes that were
/// hashed for the cache check.
pub struct HashingReader<R> {
    inner: R,
    hasher: Hasher,
    bytes_read: u64,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            bytes_read: 0,
        }
    }

    /// Number of bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the remainder of the stream and return the hash of all bytes
    pub fn finish(mut self) -> io::Result<ContentHash> {
        io::copy(&mut self, &mut io::sink())?;
        Ok(self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_read += n as u64;
        Ok(n)
    }
}
