//! Callbacks invoked when a table lets go of its entries.

pub(crate) mod notifier;

use std::sync::Arc;

/// The cleanup callback. Called with the key, the value and the reason when
/// the table discards a node.
pub(crate) type FreeListener = Arc<dyn Fn(&[u8], &[u8], RemovalCause) + Send + Sync + 'static>;

pub(crate) type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync + 'static>;

pub(crate) type EqualFn = Arc<dyn Fn(&[u8], &[u8]) -> bool + Send + Sync + 'static>;

pub(crate) type BeforeReturnFn = Arc<dyn Fn(&[u8]) + Send + Sync + 'static>;

/// Indicates the reason why an entry was discarded by the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalCause {
    /// The entry was removed by `remove` or `remove_with_data`.
    Removed,
    /// The entry was displaced by a `put` of the same key.
    Replaced,
    /// The entry was dropped by `clear`, `destroy` or dropping the table.
    Cleared,
}

impl RemovalCause {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Self::Removed => 1,
            Self::Replaced => 2,
            Self::Cleared => 3,
        }
    }

    pub(crate) fn from_u8(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Removed),
            2 => Some(Self::Replaced),
            3 => Some(Self::Cleared),
            _ => None,
        }
    }
}
