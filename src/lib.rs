#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

//! Hashlatch is a concurrent, resizable hash table mapping byte-string keys to
//! byte-string values.
//!
//! - Every bucket has its own reader/writer latch, so lookups and updates of
//!   keys in different buckets run in parallel, and lookups within one bucket
//!   share it.
//! - The table doubles its bucket directory when the number of entries reaches
//!   three quarters of the number of buckets, up to 16M buckets.
//! - Entries handed out by [`acquire`][acquire] and [`iterate`][iterate] are
//!   pinned: removing or updating their key turns them into tombstones that
//!   stay readable until the last pin is released.
//! - An optional free callback learns about every entry the table discards,
//!   together with its [`RemovalCause`][cause].
//!
//! A [`HashTable`][table] uses `parking_lot` latches and is `Send + Sync`. An
//! [`UnsyncHashTable`][unsync] runs the same algorithms without any
//! synchronization for single-threaded use.
//!
//! # Example
//!
//! ```rust
//! use hashlatch::{hash, HashTable};
//! use std::{sync::Arc, thread};
//!
//! let table = Arc::new(HashTable::new(64, hash::murmur3_32, true).unwrap());
//!
//! let handles: Vec<_> = (0..4u32)
//!     .map(|i| {
//!         let table = Arc::clone(&table);
//!         thread::spawn(move || {
//!             for j in 0..100u32 {
//!                 let key = (i * 1000 + j).to_le_bytes();
//!                 table.put(&key, b"value").unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! handles.into_iter().for_each(|h| h.join().unwrap());
//!
//! assert_eq!(table.len(), 400);
//! assert_eq!(table.get(&2042u32.to_le_bytes()).as_deref(), Some(&b"value"[..]));
//! ```
//!
//! # Logging
//!
//! With the `logging` feature (enabled by default), the table reports resizes
//! at the debug level and abnormal conditions (very high pin counts, panicking
//! callbacks) through the [`log`](https://docs.rs/log) crate.
//!
//! [acquire]: ./struct.HashTable.html#method.acquire
//! [iterate]: ./struct.HashTable.html#method.iterate
//! [cause]: ./enum.RemovalCause.html
//! [table]: ./struct.HashTable.html
//! [unsync]: ./type.UnsyncHashTable.html

pub(crate) mod builder;
pub(crate) mod common;
pub mod hash;
pub mod notification;
pub(crate) mod table;

pub use builder::HashTableBuilder;
pub use common::{error::Error, latch::NoLatch};
pub use notification::RemovalCause;
pub use table::{
    entry::{Entry, Pinned},
    iter::Iter,
    map::HashTable,
};

/// A [`HashTable`](./struct.HashTable.html) without any synchronization.
///
/// It is `Send` but not `Sync`. Build one with
/// [`HashTableBuilder::without_locking`](./struct.HashTableBuilder.html#method.without_locking).
pub type UnsyncHashTable = HashTable<NoLatch>;

#[cfg(test)]
mod tests {
    use super::{HashTable, UnsyncHashTable};

    fn assert_send_sync<T: Send + Sync>() {}
    fn assert_send<T: Send>() {}

    #[test]
    fn lock_modes() {
        assert_send_sync::<HashTable>();
        assert_send::<UnsyncHashTable>();
    }
}
