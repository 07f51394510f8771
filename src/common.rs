pub(crate) mod constants;
pub(crate) mod error;
pub(crate) mod latch;

use self::constants::{
    LOAD_FACTOR_DENOMINATOR, LOAD_FACTOR_NUMERATOR, MAX_CAPACITY, MIN_CAPACITY,
};

/// Rounds a capacity hint up to a power of two within
/// `MIN_CAPACITY..=MAX_CAPACITY`.
pub(crate) fn bucket_capacity(hint: usize) -> usize {
    hint.clamp(MIN_CAPACITY, MAX_CAPACITY).next_power_of_two()
}

/// Returns `true` when `len` entries overload `capacity` buckets.
pub(crate) fn needs_resize(len: u64, capacity: usize) -> bool {
    len.saturating_mul(LOAD_FACTOR_DENOMINATOR as u64)
        >= (capacity as u64).saturating_mul(LOAD_FACTOR_NUMERATOR as u64)
}

#[cfg(feature = "logging")]
pub(crate) fn log_prefix(table_name: Option<&str>) -> String {
    table_name
        .map(|name| format!("[{name}] "))
        .unwrap_or_default()
}

#[inline]
pub(crate) fn bucket_index(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}
