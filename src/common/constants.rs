/// The smallest number of buckets a table can have.
pub(crate) const MIN_CAPACITY: usize = 4;

/// Growth stops at this number of buckets. Beyond it, chains simply get longer.
pub(crate) const MAX_CAPACITY: usize = 16 * 1024 * 1024;

// The load factor is 0.75, i.e. a resize is due once `len * 4 >= capacity * 3`.
pub(crate) const LOAD_FACTOR_NUMERATOR: usize = 3;
pub(crate) const LOAD_FACTOR_DENOMINATOR: usize = 4;

/// Pinning a node beyond this many references logs a warning.
#[cfg_attr(not(feature = "logging"), allow(dead_code))]
pub(crate) const MAX_WARNING_REF_COUNT: i32 = 10_000;
