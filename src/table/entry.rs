use std::{fmt, ops::Deref};

use parking_lot::lock_api::RawRwLock;
use triomphe::Arc as TrioArc;

use super::{map::HashTable, node::Node};

/// A reference to the value of an entry, returned by
/// [`HashTable::get`][get] and yielded by [`Iter`][iter].
///
/// `Entry` shares the table's node instead of copying it, so it is cheap to
/// create and clone. The bytes it exposes are those of the entry at the time
/// of the lookup: a later update or removal of the key does not change them,
/// and they remain valid until the `Entry` is dropped.
///
/// An `Entry` does _not_ pin the entry in the table. If you need the table to
/// keep a removed entry linked (for example to continue an iteration from it),
/// use [`HashTable::acquire`][acquire] instead.
///
/// [get]: ./struct.HashTable.html#method.get
/// [iter]: ./struct.Iter.html
/// [acquire]: ./struct.HashTable.html#method.acquire
#[derive(Clone)]
pub struct Entry {
    node: TrioArc<Node>,
}

impl Entry {
    pub(crate) fn new(node: TrioArc<Node>) -> Self {
        Self { node }
    }

    /// Returns the key bytes of the entry.
    pub fn key(&self) -> &[u8] {
        self.node.key()
    }

    /// Returns the value bytes of the entry.
    pub fn value(&self) -> &[u8] {
        self.node.value()
    }

    /// Returns `true` if the entry has been removed or replaced in the table
    /// since this `Entry` was created.
    pub fn is_stale(&self) -> bool {
        self.node.is_tombstoned()
    }

    /// Copies the value into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.node.value().to_vec()
    }
}

impl Deref for Entry {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.value()
    }
}

impl AsRef<[u8]> for Entry {
    fn as_ref(&self) -> &[u8] {
        self.value()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("is_stale", &self.is_stale())
            .finish()
    }
}

/// A pinned reference to the value of an entry, returned by
/// [`HashTable::acquire`][acquire] and [`HashTable::iterate`][iterate].
///
/// While a `Pinned` is alive, the table keeps the entry's node linked in its
/// bucket even if the key is removed or updated by another thread; the node is
/// then a tombstone and is unlinked when the last pin is released. Release a
/// pin by dropping it, or explicitly with [`HashTable::release`][release] or
/// [`HashTable::cancel_iterate`][cancel].
///
/// [acquire]: ./struct.HashTable.html#method.acquire
/// [iterate]: ./struct.HashTable.html#method.iterate
/// [release]: ./struct.HashTable.html#method.release
/// [cancel]: ./struct.HashTable.html#method.cancel_iterate
pub struct Pinned<'a, R: RawRwLock = parking_lot::RawRwLock> {
    table: &'a HashTable<R>,
    // `None` only after `into_node`.
    node: Option<TrioArc<Node>>,
}

impl<'a, R: RawRwLock> Pinned<'a, R> {
    pub(crate) fn new(table: &'a HashTable<R>, node: TrioArc<Node>) -> Self {
        Self {
            table,
            node: Some(node),
        }
    }

    /// Takes the node out without releasing the pin.
    pub(crate) fn into_node(mut self) -> TrioArc<Node> {
        self.node.take().expect("Bug: Pinned node is None")
    }

    pub(crate) fn is_pinned_in(&self, table: &HashTable<R>) -> bool {
        std::ptr::eq(self.table, table)
    }

    fn node(&self) -> &Node {
        self.node.as_ref().expect("Bug: Pinned node is None")
    }

    /// Returns the key bytes of the entry.
    pub fn key(&self) -> &[u8] {
        self.node().key()
    }

    /// Returns the value bytes of the entry.
    pub fn value(&self) -> &[u8] {
        self.node().value()
    }

    /// Returns `true` if the entry has been removed or replaced in the table
    /// while pinned.
    pub fn is_stale(&self) -> bool {
        self.node().is_tombstoned()
    }

    /// Returns an unpinned [`Entry`](./struct.Entry.html) sharing this entry.
    pub fn to_entry(&self) -> Entry {
        Entry::new(TrioArc::clone(
            self.node.as_ref().expect("Bug: Pinned node is None"),
        ))
    }
}

impl<R: RawRwLock> Drop for Pinned<'_, R> {
    fn drop(&mut self) {
        if let Some(node) = self.node.take() {
            self.table.unpin(node);
        }
    }
}

impl<R: RawRwLock> Deref for Pinned<'_, R> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.value()
    }
}

impl<R: RawRwLock> AsRef<[u8]> for Pinned<'_, R> {
    fn as_ref(&self) -> &[u8] {
        self.value()
    }
}

impl<R: RawRwLock> fmt::Debug for Pinned<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pinned")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("is_stale", &self.is_stale())
            .finish()
    }
}
