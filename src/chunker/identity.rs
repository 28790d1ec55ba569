//! Deterministic chunk identity and content hashing.
//!
//! Both digests are SHA-256 truncated to 128 bits and rendered as 32 lowercase
//! hex characters. They are identity keys, not a security boundary.

use sha2::{Digest, Sha256};

use crate::types::ChunkLevel;

const DIGEST_BYTES: usize = 16;

/// Positional/nominal identity of a chunk. Independent of the chunk body.
pub fn chunk_id(
    file_path: &str,
    start_line: u32,
    end_line: u32,
    level: ChunkLevel,
    language: &str,
    name: &str,
) -> String {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, file_path.as_bytes());
    update_field(&mut hasher, &start_line.to_le_bytes());
    update_field(&mut hasher, &end_line.to_le_bytes());
    update_field(&mut hasher, level.as_str().as_bytes());
    update_field(&mut hasher, language.as_bytes());
    update_field(&mut hasher, name.as_bytes());
    finish(hasher)
}

/// Hash of the chunk body only.
pub fn content_hash(content: &str) -> String {
    finish(Sha256::new_with_prefix(content.as_bytes()))
}

// Length prefix keeps ("ab", "c") and ("a", "bc") apart.
fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn finish(hasher: Sha256) -> String {
    let digest = hasher.finalize();
    hex::encode(&digest[..DIGEST_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_is_fixed_width_hex() {
        let id = chunk_id("src/main.rs", 1, 10, ChunkLevel::Method, "rust", "main");
        assert_eq!(id.len(), DIGEST_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_chunk_id_deterministic() {
        let a = chunk_id("a.go", 3, 7, ChunkLevel::Class, "go", "Server");
        let b = chunk_id("a.go", 3, 7, ChunkLevel::Class, "go", "Server");
        assert_eq!(a, b);
    }

    #[test]
    fn test_chunk_id_sensitive_to_each_field() {
        let base = chunk_id("a.go", 3, 7, ChunkLevel::Class, "go", "Server");
        assert_ne!(base, chunk_id("b.go", 3, 7, ChunkLevel::Class, "go", "Server"));
        assert_ne!(base, chunk_id("a.go", 4, 7, ChunkLevel::Class, "go", "Server"));
        assert_ne!(base, chunk_id("a.go", 3, 8, ChunkLevel::Class, "go", "Server"));
        assert_ne!(base, chunk_id("a.go", 3, 7, ChunkLevel::Method, "go", "Server"));
        assert_ne!(base, chunk_id("a.go", 3, 7, ChunkLevel::Class, "java", "Server"));
        assert_ne!(base, chunk_id("a.go", 3, 7, ChunkLevel::Class, "go", "Client"));
    }

    #[test]
    fn test_chunk_id_field_boundaries() {
        let a = chunk_id("ab", 1, 1, ChunkLevel::File, "c", "x");
        let b = chunk_id("a", 1, 1, ChunkLevel::File, "bc", "x");
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_hash() {
        let a = content_hash("fn a() { 1 }");
        assert_eq!(a, content_hash("fn a() { 1 }"));
        assert_ne!(a, content_hash("fn a() { 2 }"));
        assert_eq!(a.len(), 32);
    }
}
