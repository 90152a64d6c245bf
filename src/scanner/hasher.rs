//! Two-tier content hashing.
//!
//! # Overview
//!
//! Content identity is decided by two digests with very different costs:
//!
//! - **Quick hash**: XxHash64 over the first [`PREHASH_SIZE`] bytes. It is not
//!   collision resistant and only ever used to rule files *out*.
//! - **Full hash**: BLAKE3 over the entire file, streamed in fixed-size chunks.
//!   This is the final word on "same content".
//!
//! Both digests are rendered as lowercase hex in the cache file, see
//! [`hash_to_hex`] and [`hex_to_hash`].

use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::Path;

use twox_hash::XxHash64;

use super::HashError;

/// Number of leading bytes covered by the quick hash.
pub const PREHASH_SIZE: usize = 1024;

/// Read buffer used while streaming a file through BLAKE3.
const BUFFER_SIZE: usize = 64 * 1024;

/// Digest of the first [`PREHASH_SIZE`] bytes (big-endian XxHash64).
pub type QuickHash = [u8; 8];

/// BLAKE3 digest of the whole file.
pub type FullHash = [u8; 32];

/// Computes quick and full hashes for files on disk.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default streaming buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom streaming buffer size.
    ///
    /// The size only affects how many bytes are read per call; the resulting
    /// digest is identical for any buffer size.
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Hash the first [`PREHASH_SIZE`] bytes of a file.
    ///
    /// Files shorter than [`PREHASH_SIZE`] are hashed in full.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] if the file no longer exists,
    /// [`HashError::PermissionDenied`] if it cannot be opened, and
    /// [`HashError::Io`] for any other read failure.
    pub fn prehash(&self, path: &Path) -> Result<QuickHash, HashError> {
        let file = open(path)?;
        let mut head = Vec::with_capacity(PREHASH_SIZE);
        file.take(PREHASH_SIZE as u64)
            .read_to_end(&mut head)
            .map_err(|e| HashError::from_io(path, e))?;

        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&head);
        Ok(hasher.finish().to_be_bytes())
    }

    /// Hash the entire content of a file, reading it sequentially to the end.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::prehash`].
    pub fn full_hash(&self, path: &Path) -> Result<FullHash, HashError> {
        let mut file = open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

fn open(path: &Path) -> Result<File, HashError> {
    File::open(path).map_err(|e| HashError::from_io(path, e))
}

/// Render digest bytes as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(DIGITS[(byte >> 4) as usize] as char);
        out.push(DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Parse a hexadecimal digest of exactly `N` bytes.
///
/// Returns `None` if the string has the wrong length or contains a
/// non-hex character. Both upper and lower case digits are accepted.
#[must_use]
pub fn hex_to_hash<const N: usize>(hex: &str) -> Option<[u8; N]> {
    let bytes = hex.as_bytes();
    if bytes.len() != N * 2 {
        return None;
    }

    let mut out = [0u8; N];
    for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
        let high = hex_digit(pair[0])?;
        let low = hex_digit(pair[1])?;
        *slot = (high << 4) | low;
    }
    Some(out)
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
