// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Architecture Support
//!
//! Hardware-facing pieces of the subsystem: the cycle counter, the
//! programmable interval timer, and interrupt-flag control. Only x86-64
//! has a port today; other targets compile with the hardware paths absent
//! and the interrupt-flag shims as no-ops.

#[cfg(target_arch = "x86_64")]
pub mod amd64;

#[cfg(all(target_arch = "x86_64", feature = "kernel"))]
pub use amd64::{irq_restore, irq_save};

/// Disable interrupts, returning whether they were enabled.
///
/// No-op outside `kernel` builds.
#[cfg(not(all(target_arch = "x86_64", feature = "kernel")))]
pub fn irq_save() -> bool {
    false
}

/// Restore the interrupt flag saved by [`irq_save`].
#[cfg(not(all(target_arch = "x86_64", feature = "kernel")))]
pub fn irq_restore(_was_enabled: bool) {}
