use std::cell::Cell;

use parking_lot::lock_api::{GuardNoSend, RawRwLock};

pub(crate) type RwLatch<R, T> = parking_lot::lock_api::RwLock<R, T>;
pub(crate) type ReadGuard<'a, R, T> = parking_lot::lock_api::RwLockReadGuard<'a, R, T>;
pub(crate) type WriteGuard<'a, R, T> = parking_lot::lock_api::RwLockWriteGuard<'a, R, T>;

/// A latch that performs no synchronization.
///
/// A [`HashTable`][hash-table] built with `NoLatch` (see
/// [`HashTableBuilder::without_locking`][without-locking]) runs the same
/// algorithms as the default one, but every latch acquisition is a plain,
/// non-atomic update of a borrow flag. `NoLatch` is not `Sync`, so such a table
/// cannot be shared between threads; wrap it in a lock of your own if it must
/// be accessed from several threads.
///
/// Acquiring the latch in a conflicting mode (which can only happen when a
/// user supplied callback calls back into the same table) panics.
///
/// [hash-table]: ../struct.HashTable.html
/// [without-locking]: ../struct.HashTableBuilder.html#method.without_locking
pub struct NoLatch {
    // > 0: number of readers, -1: a writer, 0: free.
    state: Cell<isize>,
}

const WRITER: isize = -1;

unsafe impl RawRwLock for NoLatch {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        state: Cell::new(0),
    };

    type GuardMarker = GuardNoSend;

    fn lock_shared(&self) {
        assert!(
            self.try_lock_shared(),
            "NoLatch is already held exclusively. Did a callback re-enter the table?"
        );
    }

    fn try_lock_shared(&self) -> bool {
        let readers = self.state.get();
        if readers == WRITER {
            return false;
        }
        self.state.set(readers + 1);
        true
    }

    unsafe fn unlock_shared(&self) {
        self.state.set(self.state.get() - 1);
    }

    fn lock_exclusive(&self) {
        assert!(
            self.try_lock_exclusive(),
            "NoLatch is already held. Did a callback re-enter the table?"
        );
    }

    fn try_lock_exclusive(&self) -> bool {
        if self.state.get() != 0 {
            return false;
        }
        self.state.set(WRITER);
        true
    }

    unsafe fn unlock_exclusive(&self) {
        self.state.set(0);
    }

    fn is_locked(&self) -> bool {
        self.state.get() != 0
    }
}
