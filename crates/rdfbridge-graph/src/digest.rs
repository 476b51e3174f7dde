//! Stable content digests for generated identifiers.
//!
//! Generated resources (property-schema nodes) must get the same identifier
//! in every run and in every process, so identifiers are derived from content
//! with a fixed algorithm rather than from object identity:
//!
//! - algorithm: **FNV-1a 64-bit**
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! This digest is **not** a security primitive.

/// Prefix used in serialized digests.
pub const DIGEST_V1_PREFIX: &str = "fnv1a64:";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

fn fnv1a64_update(hash: &mut u64, bytes: &[u8]) {
    for b in bytes {
        *hash ^= (*b) as u64;
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

/// Raw 64-bit FNV-1a hash of `bytes`.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    fnv1a64_update(&mut hash, bytes);
    hash
}

pub fn fnv1a64_digest_bytes(bytes: &[u8]) -> String {
    format!("{DIGEST_V1_PREFIX}{:016x}", fnv1a64(bytes))
}

/// Digest over named fields, framed as `key=value;` pairs in the given order.
///
/// Framing keeps `("ab", "c")` and `("a", "bc")` apart.
pub fn fnv1a64_digest_fields(fields: &[(&str, &str)]) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for (key, value) in fields {
        fnv1a64_update(&mut hash, key.as_bytes());
        fnv1a64_update(&mut hash, b"=");
        fnv1a64_update(&mut hash, &(value.len() as u64).to_le_bytes());
        fnv1a64_update(&mut hash, value.as_bytes());
        fnv1a64_update(&mut hash, b";");
    }
    format!("{DIGEST_V1_PREFIX}{hash:016x}")
}
