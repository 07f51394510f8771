use crate::{
    common::{error::Error, latch::NoLatch},
    notification::{BeforeReturnFn, EqualFn, FreeListener, HashFn, RemovalCause},
    HashTable,
};

use std::{marker::PhantomData, sync::Arc};

use parking_lot::lock_api::RawRwLock;

/// Builds a [`HashTable`][table-struct] with various configuration knobs.
///
/// The latch type parameter picks the lock mode. `HashTableBuilder::new`
/// starts with thread-safe `parking_lot` latches; call
/// [`without_locking`](#method.without_locking) to build an
/// [`UnsyncHashTable`][unsync] instead.
///
/// [table-struct]: ./struct.HashTable.html
/// [unsync]: ./type.UnsyncHashTable.html
///
/// # Examples
///
/// ```rust
/// use hashlatch::{hash, HashTableBuilder, RemovalCause};
///
/// let table = HashTableBuilder::new(1024) // Start with 1,024 buckets
///     .hash_fn(hash::murmur3_32)
///     // Let a put overwrite an existing key.
///     .enable_update(true)
///     // Called outside any latch whenever an entry is discarded.
///     .free_fn(|key, _value, cause| {
///         if cause == RemovalCause::Replaced {
///             println!("{key:?} was updated");
///         }
///     })
///     .name("sessions")
///     .build()
///     .unwrap();
///
/// table.put(b"alice", b"1").unwrap();
/// table.put(b"alice", b"2").unwrap();
/// ```
///
pub struct HashTableBuilder<R = parking_lot::RawRwLock> {
    initial_capacity: usize,
    hash_fn: Option<HashFn>,
    equal_fn: Option<EqualFn>,
    free_fn: Option<FreeListener>,
    before_return_fn: Option<BeforeReturnFn>,
    update_allowed: bool,
    name: Option<String>,
    lock_mode: PhantomData<R>,
}

impl HashTableBuilder<parking_lot::RawRwLock> {
    /// Constructs a new `HashTableBuilder` for a table starting with
    /// `initial_capacity` buckets. The capacity is rounded up to a power of
    /// two and clamped between 4 and 16M.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            hash_fn: None,
            equal_fn: None,
            free_fn: None,
            before_return_fn: None,
            update_allowed: false,
            name: None,
            lock_mode: PhantomData,
        }
    }

    /// Makes the builder build an [`UnsyncHashTable`][unsync], which takes no
    /// latches at all. Such a table is `Send` but not `Sync`, so the compiler
    /// keeps it on one thread at a time.
    ///
    /// [unsync]: ./type.UnsyncHashTable.html
    pub fn without_locking(self) -> HashTableBuilder<NoLatch> {
        HashTableBuilder {
            initial_capacity: self.initial_capacity,
            hash_fn: self.hash_fn,
            equal_fn: self.equal_fn,
            free_fn: self.free_fn,
            before_return_fn: self.before_return_fn,
            update_allowed: self.update_allowed,
            name: self.name,
            lock_mode: PhantomData,
        }
    }
}

impl<R: RawRwLock> HashTableBuilder<R> {
    /// Sets the function that hashes keys. Required.
    ///
    /// See the [`hash`](./hash/index.html) module for ready-made ones.
    pub fn hash_fn(self, hash_fn: impl Fn(&[u8]) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            hash_fn: Some(Arc::new(hash_fn)),
            ..self
        }
    }

    /// Sets the function that compares two keys of the same length.
    ///
    /// Defaults to comparing the bytes.
    pub fn equal_fn(
        self,
        equal_fn: impl Fn(&[u8], &[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            equal_fn: Some(Arc::new(equal_fn)),
            ..self
        }
    }

    /// Sets the function called with the key, the value and the
    /// [`RemovalCause`][cause] whenever the table discards an entry.
    ///
    /// The function is called once per entry, after the entry is unlinked and
    /// without holding any latch. If it panics, the panic is caught and the
    /// function is not called again.
    ///
    /// [cause]: ./enum.RemovalCause.html
    pub fn free_fn(
        self,
        free_fn: impl Fn(&[u8], &[u8], RemovalCause) + Send + Sync + 'static,
    ) -> Self {
        Self {
            free_fn: Some(Arc::new(free_fn)),
            ..self
        }
    }

    /// Sets the function called with a value right before a lookup returns
    /// it.
    pub fn before_return_fn(self, before_return_fn: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        Self {
            before_return_fn: Some(Arc::new(before_return_fn)),
            ..self
        }
    }

    /// Sets whether `put` may replace the value of an existing key. When
    /// disabled (the default), it fails with `Error::DuplicateKey` instead.
    pub fn enable_update(self, update_allowed: bool) -> Self {
        Self {
            update_allowed,
            ..self
        }
    }

    /// Sets the name of the table. The name shows up in log messages.
    pub fn name(self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self
        }
    }

    /// Builds a `HashTable`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingHashFunction`] if no hash function was set.
    /// - [`Error::OutOfMemory`] if the bucket directory cannot be allocated.
    pub fn build(self) -> Result<HashTable<R>, Error> {
        let hash_fn = self.hash_fn.ok_or(Error::MissingHashFunction)?;
        HashTable::with_everything(
            self.name,
            self.initial_capacity,
            hash_fn,
            self.equal_fn,
            self.free_fn,
            self.before_return_fn,
            self.update_allowed,
        )
    }
}
