use std::{
    panic::{self, AssertUnwindSafe},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::notification::{FreeListener, RemovalCause};

/// Runs the free callback of a table.
///
/// A callback that panics once is switched off for good: the table keeps
/// unlinking entries, it just stops reporting them.
pub(crate) struct FreeNotifier {
    listener: FreeListener,
    is_enabled: AtomicBool,
    #[cfg(feature = "logging")]
    table_name: Option<String>,
}

impl FreeNotifier {
    pub(crate) fn new(listener: FreeListener, _table_name: Option<String>) -> Self {
        Self {
            listener,
            is_enabled: AtomicBool::new(true),
            #[cfg(feature = "logging")]
            table_name: _table_name,
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.is_enabled.load(Ordering::Acquire)
    }

    /// Hands an unlinked entry to the callback. Never called with a latch held.
    pub(crate) fn notify(&self, key: &[u8], value: &[u8], cause: RemovalCause) {
        if !self.is_enabled() {
            return;
        }

        // The listener only sees immutable byte slices, and it is disabled
        // right after a panic, so no broken state can be observed again.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.listener)(key, value, cause)));

        if let Err(_payload) = outcome {
            self.is_enabled.store(false, Ordering::Release);
            #[cfg(feature = "logging")]
            self.report_panic(&*_payload, key.len(), cause);
        }
    }

    #[cfg(feature = "logging")]
    fn report_panic(
        &self,
        payload: &(dyn std::any::Any + Send + 'static),
        key_len: usize,
        cause: RemovalCause,
    ) {
        log::error!(
            "{}The free callback panicked on a {cause:?} entry ({key_len}-byte key): '{}'. \
            It is disabled for the rest of the table's life",
            crate::common::log_prefix(self.table_name.as_deref()),
            panic_message(payload).unwrap_or("<non-string panic payload>")
        );
    }
}

#[cfg(feature = "logging")]
fn panic_message<'a>(payload: &'a (dyn std::any::Any + Send + 'static)) -> Option<&'a str> {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}
