// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! IRQ-Save Spinlock
//!
//! Mutual exclusion for state that is shared between cores and touched from
//! interrupt-adjacent paths. The critical section always runs with
//! interrupts suppressed on `kernel` builds, so a core can never deadlock
//! against its own interrupt handler while holding the lock.
//!
//! Without the `smp` feature there is only one core and the lock collapses
//! to direct cell access. Callers get one code path either way.

#[cfg(not(feature = "smp"))]
use core::cell::UnsafeCell;

use crate::arch;

/// A spinlock whose critical section runs with interrupts disabled.
///
/// Access is closure-scoped rather than guard-based so the interrupt flag
/// restore can never be separated from the unlock.
pub struct IrqSpinMutex<T> {
    #[cfg(feature = "smp")]
    inner: spin::Mutex<T>,
    #[cfg(not(feature = "smp"))]
    inner: UnsafeCell<T>,
}

// Single-core builds have no lock word. Soundness rests on the two
// invariants the clock observes: the interrupt handler never takes this
// lock, and interrupts are off for the duration of every `with()` on
// kernel builds.
unsafe impl<T: Send> Sync for IrqSpinMutex<T> {}
unsafe impl<T: Send> Send for IrqSpinMutex<T> {}

impl<T> IrqSpinMutex<T> {
    /// Create a new lock holding `value`.
    #[cfg(feature = "smp")]
    pub const fn new(value: T) -> Self {
        Self {
            inner: spin::Mutex::new(value),
        }
    }

    /// Create a new lock holding `value`.
    #[cfg(not(feature = "smp"))]
    pub const fn new(value: T) -> Self {
        Self {
            inner: UnsafeCell::new(value),
        }
    }

    /// Run `f` with exclusive access to the protected value.
    ///
    /// Interrupts are disabled before the lock is taken and restored to
    /// their prior state after it is released.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let was_enabled = arch::irq_save();

        #[cfg(feature = "smp")]
        let ret = {
            let mut guard = self.inner.lock();
            f(&mut guard)
        };

        #[cfg(not(feature = "smp"))]
        let ret = unsafe { f(&mut *self.inner.get()) };

        arch::irq_restore(was_enabled);
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_mutates() {
        let lock = IrqSpinMutex::new(0u64);
        lock.with(|v| *v += 5);
        lock.with(|v| *v *= 2);
        assert_eq!(lock.with(|v| *v), 10);
    }

    #[test]
    fn test_with_returns_closure_value() {
        let lock = IrqSpinMutex::new("clock");
        let len = lock.with(|v| v.len());
        assert_eq!(len, 5);
    }

    #[test]
    fn test_nested_state_updates() {
        struct Reference {
            enabled: bool,
            cycles: u64,
        }

        let lock = IrqSpinMutex::new(Reference {
            enabled: false,
            cycles: 0,
        });

        lock.with(|r| {
            r.enabled = true;
            r.cycles = 42;
        });

        assert!(lock.with(|r| r.enabled));
        assert_eq!(lock.with(|r| r.cycles), 42);
    }
}
