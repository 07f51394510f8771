/// The error type for the fallible operations of a
/// [`HashTable`][hash-table].
///
/// Looking up or removing a missing key is _not_ an error. Those operations
/// return `None` or `false` instead.
///
/// [hash-table]: ./struct.HashTable.html
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The table was built without a hash function.
    ///
    /// Set one by calling the [`HashTableBuilder::hash_fn`][hash-fn] method at
    /// the table creation time.
    ///
    /// [hash-fn]: ./struct.HashTableBuilder.html#method.hash_fn
    #[error(
        "No hash function was given. \
    Please set one by calling the hash_fn method of the builder at the table creation time"
    )]
    MissingHashFunction,

    /// A key must have at least one byte.
    #[error("The key must not be empty")]
    EmptyKey,

    /// An allocation failed. The table is left unchanged.
    #[error("Failed to allocate memory for {what}")]
    OutOfMemory { what: &'static str },

    /// The key already exists and the table does not allow updates.
    #[error("The key already exists and updates are disabled for this table")]
    DuplicateKey,

    /// The entry is pinned too many times to be pinned again.
    #[error("The reference count of the entry would overflow")]
    RefCountOverflow,
}
