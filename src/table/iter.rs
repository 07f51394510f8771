use parking_lot::lock_api::RawRwLock;
use triomphe::Arc as TrioArc;

use super::{
    bucket::{self, Chain},
    directory::Directory,
    entry::{Entry, Pinned},
    map::HashTable,
    node::Node,
};
use crate::common::error::Error;

#[cfg(feature = "logging")]
use crate::common::constants::MAX_WARNING_REF_COUNT;

/// What `unpin_in_place` found while its bucket was locked.
struct Unpinned {
    slot: usize,
    next: Option<TrioArc<Node>>,
    unlinked: Option<TrioArc<Node>>,
}

impl<R: RawRwLock> HashTable<R> {
    /// Advances an iteration cursor.
    ///
    /// Pass `None` to start from the first bucket, or the `Pinned` returned by
    /// the previous call to continue. The previous pin is released, then the
    /// scan resumes right after that node (in its bucket, then in the
    /// following buckets) and the next live entry is pinned and returned.
    /// Returns `None` once every bucket has been scanned.
    ///
    /// The iteration tolerates concurrent puts and removes from other threads.
    /// It visits every entry that stays live throughout the iteration exactly
    /// once, as long as the table does not grow meanwhile; a resize between
    /// two calls may make it skip or repeat entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hashlatch::{hash, HashTable};
    ///
    /// let table = HashTable::new(16, hash::murmur3_32, false).unwrap();
    /// table.put(b"k1", b"v1").unwrap();
    /// table.put(b"k2", b"v2").unwrap();
    ///
    /// let mut total = 0;
    /// let mut cursor = table.iterate(None);
    /// while let Some(pinned) = cursor {
    ///     total += pinned.value().len();
    ///     cursor = table.iterate(Some(pinned));
    /// }
    /// assert_eq!(total, 4);
    /// ```
    pub fn iterate<'a>(&'a self, cursor: Option<Pinned<'a, R>>) -> Option<Pinned<'a, R>> {
        let mut slot = 0;
        let mut next = None;
        let mut unlinked = None;

        {
            let directory = self.directory().read();

            if let Some(cursor) = cursor {
                debug_assert!(cursor.is_pinned_in(self));
                let node = cursor.into_node();
                let unpinned = self.unpin_in_place(&directory, &node, true);
                slot = unpinned.slot + 1;
                next = unpinned.next;
                unlinked = unpinned.unlinked;
            }

            while next.is_none() && slot < directory.capacity() {
                let bucket = directory.slot(slot);
                if !bucket.is_empty() {
                    let chain = bucket.write();
                    next = self.pin_next_live(&chain, 0);
                }
                slot += 1;
            }
        }

        if let Some(node) = unlinked {
            self.notify(&node);
        }
        next.map(|node| Pinned::new(self, node))
    }

    /// Ends an iteration early, releasing the cursor's pin.
    pub fn cancel_iterate(&self, cursor: Pinned<'_, R>) {
        debug_assert!(cursor.is_pinned_in(self));
        drop(cursor);
    }

    /// Looks up `key` and pins its entry, so that the returned reference stays
    /// linked in the table until it is released, even if the key is removed
    /// or updated meanwhile. Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// [`Error::RefCountOverflow`] if the entry is already pinned
    /// `i32::MAX - 1` times. Nothing is pinned in that case.
    pub fn acquire(&self, key: &[u8]) -> Result<Option<Pinned<'_, R>>, Error> {
        if key.is_empty() || self.is_empty() {
            return Ok(None);
        }

        let hash = self.hash(key);
        let directory = self.directory().read();
        let bucket = directory.bucket(hash);
        if bucket.is_empty() {
            return Ok(None);
        }

        let node = {
            let chain = bucket.write();
            let Some(pos) = bucket::find(&chain, key, self.equal_fn()) else {
                return Ok(None);
            };
            self.pin(&chain[pos])?;
            TrioArc::clone(&chain[pos])
        };
        drop(directory);

        self.before_return(&node);
        Ok(Some(Pinned::new(self, node)))
    }

    /// Releases a reference returned by [`acquire`](#method.acquire).
    ///
    /// Same as dropping it, and as [`cancel_iterate`](#method.cancel_iterate).
    pub fn release(&self, pinned: Pinned<'_, R>) {
        debug_assert!(pinned.is_pinned_in(self));
        drop(pinned);
    }

    /// Returns an iterator visiting every live entry, driven by
    /// [`iterate`](#method.iterate). The same consistency rules apply.
    ///
    /// The iterator keeps the entry it last returned pinned until the next
    /// call to `next` or until it is dropped.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            table: self,
            cursor: None,
            is_done: false,
        }
    }

    /// Drops a pin taken by `acquire` or `iterate`.
    pub(crate) fn unpin(&self, node: TrioArc<Node>) {
        let unlinked = {
            let directory = self.directory().read();
            self.unpin_in_place(&directory, &node, false).unlinked
        };
        if let Some(node) = unlinked {
            self.notify(&node);
        }
    }

    /// Drops one reference of `node` under its bucket's write latch and
    /// unlinks it if that was the last one. With `advance`, also pins the next
    /// live node after it in the same chain.
    fn unpin_in_place(
        &self,
        directory: &Directory<R>,
        node: &TrioArc<Node>,
        advance: bool,
    ) -> Unpinned {
        let slot = directory.index_of(node.hash());
        let bucket = directory.slot(slot);
        let mut chain = bucket.write();

        let Some(pos) = bucket::position_of(&chain, node) else {
            // Only `clear` unlinks pinned nodes.
            node.unpin();
            #[cfg(feature = "logging")]
            log::error!(
                "{}The pinned entry is no longer in bucket {slot}. Was the table cleared?",
                self.log_prefix()
            );
            return Unpinned {
                slot,
                next: None,
                unlinked: None,
            };
        };

        let next = if advance {
            self.pin_next_live(&chain, pos + 1)
        } else {
            None
        };

        let unlinked = if node.unpin() <= 0 {
            let removed = chain.remove(pos);
            bucket.set_count(chain.len());
            removed
        } else {
            None
        };

        Unpinned {
            slot,
            next,
            unlinked,
        }
    }

    /// Pins the first live node at or after `from` that can be pinned.
    fn pin_next_live(&self, chain: &Chain, from: usize) -> Option<TrioArc<Node>> {
        bucket::live_from(chain, from)
            .map(|pos| &chain[pos])
            .find(|node| self.pin(node).is_ok())
            .cloned()
    }

    fn pin(&self, node: &Node) -> Result<(), Error> {
        match node.pin() {
            Ok(_count) => {
                #[cfg(feature = "logging")]
                if _count >= MAX_WARNING_REF_COUNT {
                    log::warn!(
                        "{}The reference count of an entry is abnormally high: {_count}",
                        self.log_prefix()
                    );
                }
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                log::warn!(
                    "{}The reference count of an entry overflowed (current: {}). The pin was refused",
                    self.log_prefix(),
                    node.ref_count()
                );
                Err(e)
            }
        }
    }
}

/// An iterator over the live entries of a [`HashTable`][hash-table].
///
/// Created by [`HashTable::iter`][iter]. Yields unpinned [`Entry`][entry]
/// values while pinning the current position internally.
///
/// [hash-table]: ./struct.HashTable.html
/// [iter]: ./struct.HashTable.html#method.iter
/// [entry]: ./struct.Entry.html
pub struct Iter<'a, R: RawRwLock = parking_lot::RawRwLock> {
    table: &'a HashTable<R>,
    cursor: Option<Pinned<'a, R>>,
    is_done: bool,
}

impl<'a, R: RawRwLock> Iterator for Iter<'a, R> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }

        match self.table.iterate(self.cursor.take()) {
            Some(pinned) => {
                let entry = pinned.to_entry();
                self.cursor = Some(pinned);
                Some(entry)
            }
            None => {
                self.is_done = true;
                None
            }
        }
    }
}

impl<'a, R: RawRwLock> IntoIterator for &'a HashTable<R> {
    type Item = Entry;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
