use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use crate::{common::error::Error, notification::RemovalCause};

const LIVE: u8 = 0;

/// A single key-value record.
///
/// Nodes are immutable once created; an update replaces the node instead of
/// editing it. A node is shared through `triomphe::Arc` between its bucket
/// chain and every `Entry`/`Pinned` handed out for it, so its bytes stay valid
/// for as long as any of them is alive.
///
/// `ref_count` is the _logical_ reference count. The table owns one reference
/// for as long as the node is live and every pin adds one. A tombstoned node
/// stays linked in its chain until its count drops to zero.
pub(crate) struct Node {
    hash: u32,
    key: Box<[u8]>,
    value: Box<[u8]>,
    ref_count: AtomicI32,
    // LIVE, or the `RemovalCause` that tombstoned the node.
    tombstone: AtomicU8,
}

impl Node {
    pub(crate) fn new(key: &[u8], value: &[u8], hash: u32) -> Result<Self, Error> {
        Ok(Self {
            hash,
            key: copy_bytes(key, "the key of a new node")?,
            value: copy_bytes(value, "the value of a new node")?,
            ref_count: AtomicI32::new(1),
            tombstone: AtomicU8::new(LIVE),
        })
    }

    #[inline]
    pub(crate) fn hash(&self) -> u32 {
        self.hash
    }

    #[inline]
    pub(crate) fn key(&self) -> &[u8] {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &[u8] {
        &self.value
    }

    pub(crate) fn has_key(&self, key: &[u8], equal: &dyn Fn(&[u8], &[u8]) -> bool) -> bool {
        self.key.len() == key.len() && equal(&self.key, key)
    }

    #[inline]
    pub(crate) fn is_tombstoned(&self) -> bool {
        self.tombstone.load(Ordering::Acquire) != LIVE
    }

    /// Marks the node as logically gone. The first cause wins.
    pub(crate) fn tombstone(&self, cause: RemovalCause) {
        let _ = self.tombstone.compare_exchange(
            LIVE,
            cause.to_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub(crate) fn removal_cause(&self) -> Option<RemovalCause> {
        RemovalCause::from_u8(self.tombstone.load(Ordering::Acquire))
    }

    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    pub(crate) fn ref_count(&self) -> i32 {
        self.ref_count.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn set_ref_count(&self, count: i32) {
        self.ref_count.store(count, Ordering::Release);
    }

    /// Adds a reference and returns the new count. Refuses (leaving the count
    /// untouched) if the count would overflow.
    pub(crate) fn pin(&self) -> Result<i32, Error> {
        self.ref_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_add(1))
            .map(|prev| prev + 1)
            .map_err(|_| Error::RefCountOverflow)
    }

    /// Drops a reference and returns the remaining count.
    pub(crate) fn unpin(&self) -> i32 {
        self.ref_count.fetch_sub(1, Ordering::AcqRel) - 1
    }
}

fn copy_bytes(bytes: &[u8], what: &'static str) -> Result<Box<[u8]>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())
        .map_err(|_| Error::OutOfMemory { what })?;
    buf.extend_from_slice(bytes);
    Ok(buf.into_boxed_slice())
}
