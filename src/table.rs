//! A resizable hash table with striped reader/writer latches.
//!
//! The table is a power-of-two directory of buckets. Each bucket is a chain of
//! nodes behind its own reader/writer latch, and the whole directory sits
//! behind one more reader/writer latch, the global latch. Every ordinary
//! operation takes the global latch in read mode and then the latch of exactly
//! one bucket, so operations on different buckets run in parallel. A resize
//! takes the global latch in write mode and therefore runs alone. The global
//! latch is always acquired before a bucket latch and no call holds two bucket
//! latches at once, which rules out deadlocks between table operations.
//!
//! Nodes are never edited in place. An update links a fresh node in front of
//! the old one and tombstones the old one; a removal tombstones the node. A
//! tombstone is unlinked as soon as nothing pins it. Pinning is how
//! [`acquire`][acquire] and [`iterate`][iterate] hand out references that stay
//! valid while other threads keep mutating the table: each node carries a
//! logical reference count, the table holding one reference for as long as the
//! node is live and each pin adding one. The node memory itself is shared with
//! `triomphe::Arc`, so even a reference that outlives its pin (or the table's
//! `clear`) never dangles.
//!
//! A resize doubles the directory when the number of live entries reaches
//! three quarters of the number of buckets. It relinks the existing nodes into
//! their new buckets without copying them. Growth stops at 16M buckets; beyond
//! that the chains just get longer.
//!
//! [acquire]: ../struct.HashTable.html#method.acquire
//! [iterate]: ../struct.HashTable.html#method.iterate

pub(crate) mod bucket;
pub(crate) mod directory;
pub(crate) mod entry;
pub(crate) mod iter;
pub(crate) mod map;
pub(crate) mod node;
