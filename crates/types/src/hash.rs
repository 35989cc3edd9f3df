//! Keccak256 digests and composite store keys.

use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Computes the Keccak256 hash of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    B256::from_slice(&hasher.finalize())
}

/// Computes the Keccak256 hash of several slices without concatenating them.
pub fn keccak256_concat(data: &[&[u8]]) -> B256 {
    let mut hasher = Keccak256::new();
    for slice in data {
        hasher.update(slice);
    }
    B256::from_slice(&hasher.finalize())
}

/// Joins key segments into one store key.
///
/// Segments are written back to back; callers use fixed-width segments
/// (addresses, big-endian integers) after a distinct textual prefix so that
/// keys of different record kinds never collide.
pub fn concat_key(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut key = Vec::with_capacity(len);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_concat() {
        let parts: &[&[u8]] = &[b"hello", b" ", b"world"];
        assert_eq!(keccak256_concat(parts), keccak256(b"hello world"));
    }

    #[test]
    fn test_concat_key() {
        let key = concat_key(&[b"st_validator", &[0xaa; 20]]);
        assert_eq!(key.len(), 12 + 20);
        assert!(key.starts_with(b"st_validator"));
    }
}
