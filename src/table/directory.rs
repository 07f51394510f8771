use parking_lot::lock_api::RawRwLock;
use triomphe::Arc as TrioArc;

use super::{bucket::Bucket, node::Node};
use crate::common::{self, error::Error};

/// The bucket directory. Its length is always a power of two.
///
/// The directory lives behind the table's global latch: every ordinary
/// operation holds it in read mode, and only a resize or a clear holds it in
/// write mode. A resize therefore never runs concurrently with anything else.
pub(crate) struct Directory<R: RawRwLock> {
    buckets: Vec<Bucket<R>>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Growth {
    /// The directory doubled and `relocated` nodes moved to new buckets.
    Doubled { relocated: usize },
    /// Doubling would exceed the maximum capacity.
    AtMaxCapacity,
    /// The larger directory could not be allocated.
    OutOfMemory,
}

impl<R: RawRwLock> Directory<R> {
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, Error> {
        debug_assert!(capacity.is_power_of_two());
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory {
                what: "the bucket directory",
            })?;
        buckets.resize_with(capacity, Bucket::default);
        Ok(Self { buckets })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn index_of(&self, hash: u32) -> usize {
        common::bucket_index(hash, self.capacity())
    }

    #[inline]
    pub(crate) fn bucket(&self, hash: u32) -> &Bucket<R> {
        &self.buckets[self.index_of(hash)]
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Bucket<R> {
        &self.buckets[index]
    }

    pub(crate) fn buckets(&self) -> impl Iterator<Item = &Bucket<R>> {
        self.buckets.iter()
    }

    /// Doubles the directory and moves every node whose index changed into
    /// its new bucket. Nodes are relinked, never copied; live nodes and
    /// tombstones move alike, keeping their relative order.
    pub(crate) fn grow(&mut self, max_capacity: usize) -> Growth {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity << 1;
        if new_capacity > max_capacity {
            return Growth::AtMaxCapacity;
        }
        if self.buckets.try_reserve_exact(old_capacity).is_err() {
            return Growth::OutOfMemory;
        }
        self.buckets.resize_with(new_capacity, Bucket::default);

        // A node in bucket `i` either stays or moves to `i + old_capacity`.
        let (low, high) = self.buckets.split_at_mut(old_capacity);
        let mut relocated = 0;

        for (index, (bucket, sibling)) in low.iter_mut().zip(high.iter_mut()).enumerate() {
            if bucket.is_empty() {
                continue;
            }

            let nodes = std::mem::take(bucket.chain_mut());
            for node in nodes {
                if common::bucket_index(node.hash(), new_capacity) == index {
                    bucket.chain_mut().push_back(node);
                } else {
                    sibling.chain_mut().push_back(node);
                    relocated += 1;
                }
            }

            let (kept, moved) = (bucket.chain_mut().len(), sibling.chain_mut().len());
            bucket.set_count(kept);
            sibling.set_count(moved);
        }

        Growth::Doubled { relocated }
    }

    /// Unlinks every node from every bucket.
    pub(crate) fn drain(&mut self) -> Vec<TrioArc<Node>> {
        let mut nodes = Vec::new();
        for bucket in self.buckets.iter_mut() {
            if bucket.is_empty() {
                continue;
            }
            nodes.extend(bucket.chain_mut().drain(..));
            bucket.set_count(0);
        }
        nodes
    }
}
