//! Hash and key equality functions to plug into a
//! [`HashTableBuilder`](../struct.HashTableBuilder.html).

use std::io::Cursor;

const MURMUR3_SEED: u32 = 0x1234_5678;

/// Hashes a byte string with 32-bit MurmurHash3. The default choice for
/// arbitrary keys.
pub fn murmur3_32(key: &[u8]) -> u32 {
    // Reading from an in-memory cursor cannot fail.
    murmur3::murmur3_32(&mut Cursor::new(key), MURMUR3_SEED).unwrap_or_default()
}

/// Hashes a key holding a little-endian 32-bit integer by returning the
/// integer itself. Shorter keys are zero-padded; extra bytes are ignored.
pub fn int_hash_32(key: &[u8]) -> u32 {
    let mut bytes = [0u8; 4];
    let n = key.len().min(4);
    bytes[..n].copy_from_slice(&key[..n]);
    u32::from_le_bytes(bytes)
}

/// Hashes a key holding a little-endian 64-bit integer by folding its low
/// 16 bits into the rest. Shorter keys are zero-padded; extra bytes are
/// ignored.
pub fn int_hash_64(key: &[u8]) -> u32 {
    let mut bytes = [0u8; 8];
    let n = key.len().min(8);
    bytes[..n].copy_from_slice(&key[..n]);
    let v = u64::from_le_bytes(bytes);
    ((v >> 16).wrapping_add(v & 0xFFFF)) as u32
}

/// Compares two keys byte by byte. The default key equality.
pub fn bytewise_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}
