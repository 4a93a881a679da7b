// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Monotick - Kernel Timekeeping Subsystem
//!
//! This crate maintains a monotonic logical clock for a cooperatively
//! scheduled kernel. The clock is driven either by a periodic hardware
//! interrupt (one tick per fire, boot CPU only) or, in tickless mode, by
//! extrapolation from a high-resolution cycle counter. On top of the clock
//! sits a deadline-wait primitive that integrates with the scheduler's
//! idle loop and blocking-reschedule path.
//!
//! # Design
//!
//! - **One writer**: the counter is advanced by exactly one active tick
//!   source at a time; readers are lock-free atomic loads.
//! - **Explicit seams**: the cycle counter and every scheduler service are
//!   reached through the [`CycleSource`] and [`Platform`] traits, so the
//!   whole subsystem runs against synthetic collaborators in tests.
//! - **One code path**: the single-core/multi-core split lives entirely in
//!   the lock abstraction ([`sync::IrqSpinMutex`]), selected by the `smp`
//!   feature.
//!
//! # Usage
//!
//! ```ignore
//! let clock = ClockService::new(DEFAULT_TICK_HZ, BOOT_CPU_ID, tsc, platform);
//! clock.init_timer()?;
//!
//! // From the periodic interrupt handler:
//! clock.timer_tick(cpu);
//!
//! // From a task that has nothing to do for half a second:
//! clock.wait_ticks(clock.tick_freq_hz() / 2)?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod clock;
pub mod delay;
pub mod hooks;
pub mod sync;
pub mod tickless;
pub mod types;
pub mod wait;

pub use clock::{ClockService, BOOT_CPU_ID, DEFAULT_TICK_HZ};
pub use hooks::{CycleSource, Platform};
pub use tickless::TicklessState;
pub use types::{CpuId, Cycles, Result, Status, Tick};
