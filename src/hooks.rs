// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Collaborator Traits
//!
//! The clock service does not own the scheduler, the interrupt dispatch
//! mechanism, or the processor calibration data. It reaches all of them
//! through the two traits in this module, so a kernel wires in its real
//! services and tests wire in synthetic ones.

use crate::types::{Cycles, Tick};

/// A monotonically increasing hardware cycle counter.
///
/// Implementations must be infallible and callable from interrupt context.
pub trait CycleSource {
    /// Read the current cycle counter value.
    fn read_cycles(&self) -> Cycles;
}

/// Scheduler and platform services consumed by the clock.
pub trait Platform {
    /// Calibrated processor frequency in MHz, or 0 if not yet known.
    ///
    /// The cycle-to-tick conversion divides by `1_000_000 * cpu_freq_mhz()`,
    /// so the unit convention here is load-bearing for tick accounting.
    fn cpu_freq_mhz(&self) -> u64;

    /// Whether the calling execution context is the scheduler's idle task.
    fn is_idle_task(&self) -> bool;

    /// Drain any pending ready work. Non-blocking and idempotent.
    fn check_workqueues(&self);

    /// Arm a one-shot wakeup for the given absolute tick deadline.
    fn set_timer(&self, deadline: Tick);

    /// Suspend the calling context until some future event makes it
    /// runnable again.
    fn reschedule(&self);

    /// Halt the core until the next interrupt.
    fn halt(&self);

    /// Route the given interrupt vector to the clock's tick callback.
    fn install_timer_vector(&self, vector: u8);
}
