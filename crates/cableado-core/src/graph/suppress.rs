//! Cooperative reentrancy suppression for notification handlers.
//!
//! A committed connection triggers a notification, which triggers a
//! view update, which must not re-issue the mutation that caused it.
//! The guard here is a thread-confined boolean scope, not a lock: while
//! raised, subscribers skip the work that would loop back into the
//! mutation gateway (creating a cable the gesture already owns), but
//! the underlying mutation and its notification always run.
//!
//! `Rc<Cell<bool>>` keeps the flag `!Send`, so it structurally cannot
//! leak across execution contexts.

use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to the suppression state.
///
/// The gateway owns one and hands clones to subscribers; all clones
/// observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct SuppressionFlag {
    active: Rc<Cell<bool>>,
}

impl SuppressionFlag {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a suppression scope is currently open.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Opens a suppression scope.
    ///
    /// The previous state is restored when the returned guard drops —
    /// including during unwinding — so nested scopes and error paths
    /// cannot leave the flag stuck.
    pub fn raise(&self) -> SuppressionGuard {
        let prev = self.active.replace(true);
        SuppressionGuard {
            active: Rc::clone(&self.active),
            prev,
        }
    }
}

/// RAII scope opened by [`SuppressionFlag::raise`].
pub struct SuppressionGuard {
    active: Rc<Cell<bool>>,
    prev: bool,
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        self.active.set(self.prev);
    }
}
