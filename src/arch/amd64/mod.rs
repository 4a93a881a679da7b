// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! AMD64 (x86-64) support
//!
//! TSC cycle source, 8254 PIT programming, and interrupt-flag control.

pub mod pit;
pub mod tsc;

/// Disable interrupts, returning whether they were enabled.
#[cfg(feature = "kernel")]
pub fn irq_save() -> bool {
    let was_enabled = x86_64::instructions::interrupts::are_enabled();
    if was_enabled {
        x86_64::instructions::interrupts::disable();
    }
    was_enabled
}

/// Restore the interrupt flag saved by [`irq_save`].
#[cfg(feature = "kernel")]
pub fn irq_restore(was_enabled: bool) {
    if was_enabled {
        x86_64::instructions::interrupts::enable();
    }
}

/// Halt the core until the next interrupt.
///
/// Requires ring 0. The usual [`Platform::halt`](crate::Platform::halt)
/// implementation on this architecture.
pub fn halt() {
    x86_64::instructions::hlt();
}
