use std::{
    fmt,
    mem::size_of,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use crossbeam_utils::CachePadded;
use parking_lot::lock_api::RawRwLock;
use triomphe::Arc as TrioArc;

use super::{
    bucket::{self, Bucket},
    directory::{Directory, Growth},
    entry::Entry,
    node::Node,
};
use crate::{
    builder::HashTableBuilder,
    common::{self, constants::MAX_CAPACITY, error::Error},
    notification::{
        notifier::FreeNotifier, BeforeReturnFn, EqualFn, FreeListener, HashFn, RemovalCause,
    },
};

/// A concurrent hash table from byte-string keys to byte-string values.
///
/// `HashTable` supports full concurrency of lookups and updates across
/// different buckets. Each bucket has its own reader/writer latch and the
/// bucket directory has one more, taken in write mode only while the table
/// grows. See the [crate level documentation][crate-doc] for details.
///
/// The latch type `R` selects the lock mode: the default
/// `parking_lot::RawRwLock` makes the table `Send + Sync`, while
/// [`NoLatch`][no-latch] (see [`UnsyncHashTable`][unsync]) drops all
/// synchronization for single-threaded use.
///
/// # Examples
///
/// ```rust
/// use hashlatch::{hash, HashTable};
///
/// let table = HashTable::builder(4)
///     .hash_fn(hash::murmur3_32)
///     .enable_update(true)
///     .build()
///     .unwrap();
///
/// table.put(b"a", b"1").unwrap();
/// table.put(b"b", b"2").unwrap();
/// table.put(b"c", b"3").unwrap();
/// assert_eq!(table.len(), 3);
///
/// table.put(b"a", b"99").unwrap();
/// assert_eq!(table.get(b"a").as_deref(), Some(&b"99"[..]));
/// assert_eq!(table.len(), 3);
///
/// assert!(table.remove(b"b"));
/// assert!(table.get(b"b").is_none());
/// assert_eq!(table.len(), 2);
/// ```
///
/// [crate-doc]: ./index.html
/// [no-latch]: ./struct.NoLatch.html
/// [unsync]: ./type.UnsyncHashTable.html
pub struct HashTable<R: RawRwLock = parking_lot::RawRwLock> {
    directory: common::latch::RwLatch<R, Directory<R>>,
    // Mirrors `directory.capacity()` so that `put` can test the load factor
    // without taking the global latch.
    capacity: AtomicUsize,
    len: CachePadded<AtomicU64>,
    max_capacity: usize,
    // Set once the table first needed to grow past `max_capacity`.
    hit_max_capacity: AtomicBool,
    hash_fn: HashFn,
    equal_fn: EqualFn,
    before_return_fn: Option<BeforeReturnFn>,
    free_notifier: Option<FreeNotifier>,
    update_allowed: bool,
    name: Option<String>,
}

impl<R: RawRwLock> fmt::Debug for HashTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("update_allowed", &self.update_allowed)
            .finish()
    }
}

impl HashTable {
    /// Creates a thread-safe table with room for `capacity` buckets (rounded
    /// up to a power of two, at least 4) that hashes keys with `hash_fn`.
    ///
    /// If `update_allowed` is `false`, putting an existing key fails with
    /// [`Error::DuplicateKey`][dup].
    ///
    /// To set more options, use the [`builder`](#method.builder).
    ///
    /// [dup]: ./enum.Error.html#variant.DuplicateKey
    pub fn new<F>(capacity: usize, hash_fn: F, update_allowed: bool) -> Result<Self, Error>
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        Self::builder(capacity)
            .hash_fn(hash_fn)
            .enable_update(update_allowed)
            .build()
    }

    /// Returns a [`HashTableBuilder`][builder], which can build a table with
    /// various configurations.
    ///
    /// [builder]: ./struct.HashTableBuilder.html
    pub fn builder(capacity: usize) -> HashTableBuilder<parking_lot::RawRwLock> {
        HashTableBuilder::new(capacity)
    }
}

impl<R: RawRwLock> HashTable<R> {
    pub(crate) fn with_everything(
        name: Option<String>,
        capacity: usize,
        hash_fn: HashFn,
        equal_fn: Option<EqualFn>,
        free_fn: Option<FreeListener>,
        before_return_fn: Option<BeforeReturnFn>,
        update_allowed: bool,
    ) -> Result<Self, Error> {
        let capacity = common::bucket_capacity(capacity);
        let directory = Directory::with_capacity(capacity)?;
        let free_notifier = free_fn.map(|f| FreeNotifier::new(f, name.clone()));

        Ok(Self {
            directory: common::latch::RwLatch::new(directory),
            capacity: AtomicUsize::new(capacity),
            len: CachePadded::new(AtomicU64::new(0)),
            max_capacity: MAX_CAPACITY,
            hit_max_capacity: AtomicBool::new(false),
            hash_fn,
            equal_fn: equal_fn.unwrap_or_else(default_equal_fn),
            before_return_fn,
            free_notifier,
            update_allowed,
            name,
        })
    }

    /// Returns the table's name, if one was given to the builder.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replaces the function that compares keys. Keys are only compared when
    /// their lengths are equal.
    pub fn set_equal_fn(
        &mut self,
        equal_fn: impl Fn(&[u8], &[u8]) -> bool + Send + Sync + 'static,
    ) {
        self.equal_fn = Arc::new(equal_fn);
    }

    /// Sets the function called with the key, value and reason whenever the
    /// table discards an entry.
    ///
    /// The function is called without holding any latch. If it panics, it is
    /// disabled for the rest of the table's life.
    pub fn set_free_fn(
        &mut self,
        free_fn: impl Fn(&[u8], &[u8], RemovalCause) + Send + Sync + 'static,
    ) {
        self.free_notifier = Some(FreeNotifier::new(Arc::new(free_fn), self.name.clone()));
    }

    /// Sets the function called with a value right before `get`, `get_copy` or
    /// `acquire` hands it out.
    pub fn set_before_return_fn(
        &mut self,
        before_return_fn: impl Fn(&[u8]) + Send + Sync + 'static,
    ) {
        self.before_return_fn = Some(Arc::new(before_return_fn));
    }

    /// Returns the number of live entries. Lock-free.
    pub fn len(&self) -> u64 {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` if the table has no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current number of buckets.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Inserts a key-value pair, or replaces the value of an existing key when
    /// updates are enabled.
    ///
    /// The key and value are copied into a new node before any latch is
    /// taken. Replacing a key never edits the old value: the new node is
    /// linked in front of the old one, and the old one is unlinked right away
    /// unless something pins it.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyKey`] if `key` is empty.
    /// - [`Error::OutOfMemory`] if the new node cannot be allocated.
    /// - [`Error::DuplicateKey`] if `key` exists and updates are disabled.
    ///
    /// In every error case the table is left unchanged.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let hash = (self.hash_fn)(key);
        let new_node = TrioArc::new(Node::new(key, value, hash)?);

        let capacity = self.capacity();
        if common::needs_resize(self.len(), capacity) {
            if capacity < self.max_capacity {
                self.resize();
            } else {
                self.report_max_capacity(capacity);
            }
        }

        let directory = self.directory.read();
        let bucket = directory.bucket(hash);
        let mut chain = bucket.write();

        let displaced = match bucket::find(&chain, key, &*self.equal_fn) {
            None => {
                chain.push_front(new_node);
                self.len.fetch_add(1, Ordering::AcqRel);
                None
            }
            Some(_) if !self.update_allowed => return Err(Error::DuplicateKey),
            Some(pos) => {
                let old = &chain[pos];
                old.tombstone(RemovalCause::Replaced);
                if old.unpin() <= 0 {
                    Some(std::mem::replace(&mut chain[pos], new_node))
                } else {
                    // Still pinned; it stays linked right behind its
                    // replacement until released.
                    chain.insert(pos, new_node);
                    None
                }
            }
        };

        bucket.set_count(chain.len());
        drop(chain);
        drop(directory);

        if let Some(old) = displaced {
            self.notify(&old);
        }
        Ok(())
    }

    /// Returns the value of `key`, or `None` if the key is absent or empty.
    ///
    /// The returned [`Entry`][entry] shares the table's node, so no bytes are
    /// copied and the value stays valid however the table changes afterwards.
    ///
    /// [entry]: ./struct.Entry.html
    pub fn get(&self, key: &[u8]) -> Option<Entry> {
        let node = self.lookup(key)?;
        self.before_return(&node);
        Some(Entry::new(node))
    }

    /// Copies the value of `key` into `buf`, growing it if it is too small,
    /// and returns the value length. Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if `buf` cannot grow. `buf` is left empty.
    pub fn get_copy(&self, key: &[u8], buf: &mut Vec<u8>) -> Result<Option<usize>, Error> {
        let Some(node) = self.lookup(key) else {
            return Ok(None);
        };
        self.before_return(&node);

        let value = node.value();
        buf.clear();
        buf.try_reserve(value.len())
            .map_err(|_| Error::OutOfMemory {
                what: "the copy buffer",
            })?;
        buf.extend_from_slice(value);
        Ok(Some(value.len()))
    }

    /// Returns `true` if the table holds a live entry for `key`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes `key`. Returns `false` if it was absent.
    ///
    /// The entry is gone from `len` and from lookups as soon as this returns.
    /// If something still pins it, its node stays linked as a tombstone until
    /// the last pin is released.
    pub fn remove(&self, key: &[u8]) -> bool {
        self.remove_node(key).is_some()
    }

    /// Removes `key` and copies its value into `out`. Returns `false` (leaving
    /// `out` untouched) if the key was absent.
    pub fn remove_with_data(&self, key: &[u8], out: &mut Vec<u8>) -> bool {
        match self.remove_node(key) {
            Some(node) => {
                out.clear();
                out.extend_from_slice(node.value());
                true
            }
            None => false,
        }
    }

    /// Discards every entry and resets the length to zero.
    ///
    /// This runs under the global latch in write mode. Entries pinned at that
    /// moment are unlinked anyway; their `Pinned` handles stay readable and
    /// releasing them later is harmless.
    pub fn clear(&self) {
        let nodes = {
            let mut directory = self.directory.write();
            let nodes = directory.drain();
            self.len.store(0, Ordering::Release);
            nodes
        };
        self.notify_cleared(nodes);
    }

    /// Clears the table and releases its directory.
    ///
    /// Equivalent to dropping the table.
    pub fn destroy(self) {
        drop(self);
    }

    /// Returns the length of the longest bucket chain, tombstones included.
    ///
    /// Bucket latches are not taken, so the result is approximate under
    /// concurrent updates. Meant for profiling.
    pub fn max_chain_length(&self) -> usize {
        let directory = self.directory.read();
        let longest = directory.buckets().map(Bucket::count).max();
        longest.unwrap_or_default()
    }

    /// Returns an approximation of the memory used by the table's own
    /// structures: the directory, one node header per live entry and the
    /// table itself. Key and value bytes are not counted. Meant for profiling.
    pub fn memory_footprint(&self) -> usize {
        self.capacity() * size_of::<Bucket<R>>()
            + self.len() as usize * size_of::<Node>()
            + size_of::<Self>()
    }
}

// Private methods shared with the iteration protocol.
impl<R: RawRwLock> HashTable<R> {
    pub(crate) fn hash(&self, key: &[u8]) -> u32 {
        (self.hash_fn)(key)
    }

    pub(crate) fn equal_fn(&self) -> &dyn Fn(&[u8], &[u8]) -> bool {
        &*self.equal_fn
    }

    pub(crate) fn directory(&self) -> &common::latch::RwLatch<R, Directory<R>> {
        &self.directory
    }

    pub(crate) fn before_return(&self, node: &Node) {
        if let Some(f) = &self.before_return_fn {
            f(node.value());
        }
    }

    /// Tells the free callback that the table let go of `node`.
    pub(crate) fn notify(&self, node: &Node) {
        if let Some(notifier) = &self.free_notifier {
            let cause = node.removal_cause().unwrap_or(RemovalCause::Cleared);
            notifier.notify(node.key(), node.value(), cause);
        }
    }

    #[cfg(feature = "logging")]
    pub(crate) fn log_prefix(&self) -> String {
        common::log_prefix(self.name.as_deref())
    }

    fn lookup(&self, key: &[u8]) -> Option<TrioArc<Node>> {
        if key.is_empty() || self.is_empty() {
            return None;
        }

        let hash = self.hash(key);
        let directory = self.directory.read();
        let bucket = directory.bucket(hash);
        if bucket.is_empty() {
            return None;
        }

        let chain = bucket.read();
        bucket::find(&chain, key, self.equal_fn()).map(|pos| TrioArc::clone(&chain[pos]))
    }

    fn remove_node(&self, key: &[u8]) -> Option<TrioArc<Node>> {
        if key.is_empty() || self.is_empty() {
            return None;
        }

        let hash = self.hash(key);
        let unlinked = {
            let directory = self.directory.read();
            let bucket = directory.bucket(hash);
            if bucket.is_empty() {
                return None;
            }

            let mut chain = bucket.write();
            let pos = bucket::find(&chain, key, self.equal_fn())?;
            let node = TrioArc::clone(&chain[pos]);
            node.tombstone(RemovalCause::Removed);
            self.len.fetch_sub(1, Ordering::AcqRel);

            let unlinked = node.unpin() <= 0;
            if unlinked {
                chain.remove(pos);
                bucket.set_count(chain.len());
            }
            (node, unlinked)
        };

        let (node, unlinked) = unlinked;
        if unlinked {
            self.notify(&node);
        }
        Some(node)
    }

    fn resize(&self) {
        let mut directory = self.directory.write();

        // Another thread may have grown the directory while we waited.
        let capacity = directory.capacity();
        if !common::needs_resize(self.len(), capacity) {
            return;
        }

        #[cfg(feature = "logging")]
        let started = std::time::Instant::now();

        match directory.grow(self.max_capacity) {
            Growth::Doubled { relocated: _relocated } => {
                self.capacity
                    .store(directory.capacity(), Ordering::Release);

                #[cfg(feature = "logging")]
                log::debug!(
                    "{}Resized the table, new capacity: {}, load factor: {:.3}, relocated nodes: {}, elapsed: {:?}",
                    self.log_prefix(),
                    directory.capacity(),
                    self.len() as f64 / directory.capacity() as f64,
                    _relocated,
                    started.elapsed()
                );
            }
            Growth::AtMaxCapacity => self.report_max_capacity(capacity),
            Growth::OutOfMemory => {
                #[cfg(feature = "logging")]
                log::debug!(
                    "{}Failed to allocate a larger directory. Capacity remains {capacity}",
                    self.log_prefix()
                );
            }
        }
    }

    /// Logs, once per table, that the load factor is exceeded but the
    /// directory cannot grow any more. Chains just get longer from here on.
    fn report_max_capacity(&self, _capacity: usize) {
        if self.hit_max_capacity.swap(true, Ordering::AcqRel) {
            return;
        }
        #[cfg(feature = "logging")]
        log::debug!(
            "{}Current capacity: {_capacity}, maximum capacity: {}. No resize applied",
            self.log_prefix(),
            self.max_capacity
        );
    }

    fn notify_cleared(&self, nodes: Vec<TrioArc<Node>>) {
        for node in nodes {
            node.tombstone(RemovalCause::Cleared);
            self.notify(&node);
        }
    }
}

fn default_equal_fn() -> EqualFn {
    Arc::new(crate::hash::bytewise_equal)
}

impl<R: RawRwLock> Drop for HashTable<R> {
    fn drop(&mut self) {
        let nodes = self.directory.get_mut().drain();
        *self.len.get_mut() = 0;
        self.notify_cleared(nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::HashTable;
    use crate::{common::error::Error, hash, notification::RemovalCause};

    use std::sync::{atomic::Ordering, Arc, Mutex};

    fn table(update_allowed: bool) -> HashTable {
        HashTable::new(4, hash::murmur3_32, update_allowed).unwrap()
    }

    type Log = Arc<Mutex<Vec<(Vec<u8>, Vec<u8>, RemovalCause)>>>;

    fn with_free_log(t: &mut HashTable) -> Log {
        let log: Log = Arc::default();
        let log1 = Arc::clone(&log);
        t.set_free_fn(move |k, v, cause| {
            log1.lock().unwrap().push((k.to_vec(), v.to_vec(), cause));
        });
        log
    }

    #[test]
    fn basic_scenario() {
        let t = table(true);
        t.put(b"a", b"1").unwrap();
        t.put(b"b", b"2").unwrap();
        t.put(b"c", b"3").unwrap();
        assert_eq!(t.len(), 3);

        t.put(b"a", b"99").unwrap();
        assert_eq!(t.get(b"a").unwrap().value(), b"99");
        assert_eq!(t.len(), 3);

        assert!(t.remove(b"b"));
        assert!(t.get(b"b").is_none());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn empty_key_is_rejected() {
        let t = table(true);
        assert_eq!(t.put(b"", b"v"), Err(Error::EmptyKey));
        assert!(t.is_empty());
        assert!(t.get(b"").is_none());
        assert!(!t.remove(b""));
    }

    #[test]
    fn zero_length_value_round_trips() {
        let t = table(false);
        t.put(b"k", b"").unwrap();
        let entry = t.get(b"k").unwrap();
        assert!(entry.value().is_empty());
        assert_eq!(entry.key(), b"k");
    }

    #[test]
    fn duplicate_key_without_updates() {
        let t = table(false);
        t.put(b"k", b"v1").unwrap();
        assert_eq!(t.put(b"k", b"v2"), Err(Error::DuplicateKey));
        assert_eq!(t.get(b"k").unwrap().value(), b"v1");
        assert_eq!(t.len(), 1);
        assert_eq!(t.max_chain_length(), 1);
    }

    #[test]
    fn update_replaces_the_value() {
        let mut t = table(true);
        let log = with_free_log(&mut t);
        t.put(b"k", b"v1").unwrap();
        t.put(b"k", b"v2").unwrap();
        assert_eq!(t.get(b"k").unwrap().value(), b"v2");
        assert_eq!(t.len(), 1);
        // The old node was not pinned, so it is gone already.
        assert_eq!(t.max_chain_length(), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec![(b"k".to_vec(), b"v1".to_vec(), RemovalCause::Replaced)]
        );
    }

    #[test]
    fn an_entry_outlives_an_update() {
        let t = table(true);
        t.put(b"k", b"v1").unwrap();
        let entry = t.get(b"k").unwrap();
        t.put(b"k", b"v2").unwrap();
        assert_eq!(entry.value(), b"v1");
        assert!(entry.is_stale());
    }

    #[test]
    fn remove_absent_key() {
        let t = table(true);
        t.put(b"k", b"v").unwrap();
        assert!(!t.remove(b"other"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn remove_with_data_copies_the_value_out() {
        let mut t = table(true);
        let log = with_free_log(&mut t);
        t.put(b"k", b"value").unwrap();

        let mut out = b"stale".to_vec();
        assert!(!t.remove_with_data(b"x", &mut out));
        assert_eq!(out, b"stale");

        assert!(t.remove_with_data(b"k", &mut out));
        assert_eq!(out, b"value");
        assert!(t.is_empty());
        assert_eq!(log.lock().unwrap()[0].2, RemovalCause::Removed);
    }

    #[test]
    fn get_copy_grows_the_buffer() {
        let t = table(true);
        t.put(b"k", b"a longer value").unwrap();

        let mut buf = Vec::with_capacity(2);
        assert_eq!(t.get_copy(b"k", &mut buf), Ok(Some(14)));
        assert_eq!(buf, b"a longer value");

        // The copy is independent of later updates.
        t.put(b"k", b"x").unwrap();
        assert_eq!(buf, b"a longer value");
        assert_eq!(t.get_copy(b"missing", &mut buf), Ok(None));
    }

    #[test]
    fn before_return_hook_sees_values() {
        let mut t = table(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen1 = Arc::clone(&seen);
        t.set_before_return_fn(move |v| seen1.lock().unwrap().push(v.to_vec()));

        t.put(b"k", b"v").unwrap();
        assert!(t.contains_key(b"k"));
        t.get(b"k");
        t.get_copy(b"k", &mut Vec::new()).unwrap();
        t.get(b"missing");
        assert_eq!(*seen.lock().unwrap(), vec![b"v".to_vec(), b"v".to_vec()]);
    }

    #[test]
    fn custom_equality() {
        // Every key lands in the same bucket and only the first byte matters.
        let mut t = HashTable::new(4, |_: &[u8]| 0, false).unwrap();
        t.set_equal_fn(|a, b| a[0] == b[0]);

        t.put(b"ab", b"1").unwrap();
        assert_eq!(t.put(b"ac", b"2"), Err(Error::DuplicateKey));
        // Keys of different lengths are never compared.
        t.put(b"abc", b"3").unwrap();
        assert_eq!(t.get(b"ax").unwrap().value(), b"1");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn growth_preserves_content() {
        for n in [3usize, 6, 40] {
            let t = HashTable::new(4, hash::murmur3_32, false).unwrap();
            for i in 0..n {
                t.put(format!("key-{i}").as_bytes(), &i.to_le_bytes()).unwrap();
            }
            assert_eq!(t.len(), n as u64);
            assert!(t.capacity().is_power_of_two());
            assert!(t.capacity() >= 4);
            for i in 0..n {
                let entry = t.get(format!("key-{i}").as_bytes()).unwrap();
                assert_eq!(entry.value(), &i.to_le_bytes());
            }
        }
    }

    #[test]
    fn resize_happens_at_three_quarters() {
        let t = HashTable::new(8, hash::murmur3_32, false).unwrap();
        for i in 0..6u32 {
            t.put(&i.to_le_bytes(), b"").unwrap();
        }
        assert_eq!(t.capacity(), 8);
        // len (6) >= 8 * 0.75, so the next put grows the table first.
        t.put(b"seventh", b"").unwrap();
        assert_eq!(t.capacity(), 16);
    }

    #[test]
    fn growth_stops_at_max_capacity() {
        let mut t = HashTable::new(4, hash::murmur3_32, false).unwrap();
        t.max_capacity = 8;

        for i in 0..5u32 {
            t.put(&i.to_le_bytes(), &i.to_be_bytes()).unwrap();
        }
        assert_eq!(t.capacity(), 8);
        assert!(!t.hit_max_capacity.load(Ordering::Acquire));

        // Past 3/4 of the maximum, puts keep succeeding on longer chains.
        for i in 5..40u32 {
            t.put(&i.to_le_bytes(), &i.to_be_bytes()).unwrap();
        }
        assert_eq!(t.capacity(), 8);
        assert!(t.hit_max_capacity.load(Ordering::Acquire));
        assert!(t.max_chain_length() >= 5);
        for i in 0..40u32 {
            assert_eq!(t.get(&i.to_le_bytes()).unwrap().value(), &i.to_be_bytes());
        }
    }

    #[test]
    fn clear_notifies_and_resets() {
        let mut t = table(true);
        let log = with_free_log(&mut t);
        for i in 0..10u8 {
            t.put(&[i + 1], &[i]).unwrap();
        }
        let capacity = t.capacity();
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.max_chain_length(), 0);
        assert_eq!(t.capacity(), capacity);
        assert!(t.get(&[1]).is_none());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 10);
        assert!(log.iter().all(|(_, _, c)| *c == RemovalCause::Cleared));
    }

    #[test]
    fn drop_notifies_remaining_entries() {
        let mut t = table(true);
        let log = with_free_log(&mut t);
        t.put(b"a", b"1").unwrap();
        t.put(b"b", b"2").unwrap();
        t.destroy();
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn profiling_helpers() {
        let t = HashTable::new(64, |_: &[u8]| 7, false).unwrap();
        assert_eq!(t.max_chain_length(), 0);
        let empty = t.memory_footprint();
        for i in 1..=5u8 {
            t.put(&[i], b"v").unwrap();
        }
        assert_eq!(t.max_chain_length(), 5);
        assert!(t.memory_footprint() > empty);
    }
}
