use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU32, Ordering},
};

use parking_lot::lock_api::RawRwLock;
use triomphe::Arc as TrioArc;

use super::node::Node;
use crate::common::latch::{ReadGuard, RwLatch, WriteGuard};

/// The nodes of a bucket, head first. New keys are pushed at the front.
pub(crate) type Chain = VecDeque<TrioArc<Node>>;

/// One slot of the bucket directory: a latch-protected chain of nodes.
pub(crate) struct Bucket<R: RawRwLock> {
    // The number of nodes linked in the chain, tombstones included. Written
    // only while the chain is write-locked (or exclusively borrowed), read
    // without locking to skip empty buckets.
    count: AtomicU32,
    chain: RwLatch<R, Chain>,
}

impl<R: RawRwLock> Default for Bucket<R> {
    fn default() -> Self {
        Self {
            count: AtomicU32::new(0),
            chain: RwLatch::new(Chain::new()),
        }
    }
}

impl<R: RawRwLock> Bucket<R> {
    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::Acquire) as usize
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub(crate) fn read(&self) -> ReadGuard<'_, R, Chain> {
        self.chain.read()
    }

    pub(crate) fn write(&self) -> WriteGuard<'_, R, Chain> {
        self.chain.write()
    }

    pub(crate) fn chain_mut(&mut self) -> &mut Chain {
        self.chain.get_mut()
    }

    /// Publishes the new chain length. Call it while still holding the
    /// chain's write guard.
    pub(crate) fn set_count(&self, len: usize) {
        self.count.store(len as u32, Ordering::Release);
    }
}

/// Returns the position of the live node holding `key`.
pub(crate) fn find(
    chain: &Chain,
    key: &[u8],
    equal: &dyn Fn(&[u8], &[u8]) -> bool,
) -> Option<usize> {
    chain
        .iter()
        .position(|node| !node.is_tombstoned() && node.has_key(key, equal))
}

/// Returns the position of this very node (not of an equal key).
pub(crate) fn position_of(chain: &Chain, node: &TrioArc<Node>) -> Option<usize> {
    chain.iter().position(|n| TrioArc::ptr_eq(n, node))
}

/// Returns the positions of the live nodes at or after `from`.
pub(crate) fn live_from(chain: &Chain, from: usize) -> impl Iterator<Item = usize> + '_ {
    chain
        .iter()
        .enumerate()
        .skip(from)
        .filter(|(_, node)| !node.is_tombstoned())
        .map(|(pos, _)| pos)
}
