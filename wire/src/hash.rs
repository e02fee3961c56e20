//! Payload integrity hashing.

use blake3::Hasher;

/// Computes the payload hash stored in the artifact header.
///
/// The table length is hashed first so that bytes cannot migrate between the
/// table blob and the data stream without changing the hash.
#[must_use]
pub fn payload_hash(tables: &[u8], data: &[u8]) -> u64 {
    let mut hasher = Hasher::new();
    write_u64(&mut hasher, tables.len() as u64);
    hasher.update(tables);
    hasher.update(data);

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

fn write_u64(hasher: &mut Hasher, value: u64) {
    hasher.update(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_hash_is_stable() {
        assert_eq!(payload_hash(b"ab", b"cd"), payload_hash(b"ab", b"cd"));
    }

    #[test]
    fn payload_hash_depends_on_split() {
        assert_ne!(payload_hash(b"ab", b"cd"), payload_hash(b"abc", b"d"));
    }

    #[test]
    fn payload_hash_depends_on_content() {
        assert_ne!(payload_hash(b"ab", b"cd"), payload_hash(b"ab", b"ce"));
    }
}
