// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Clock Service
//!
//! The single owner of all timekeeping state: a monotonic 64-bit tick
//! counter, the configured tick frequency, and the tickless reference
//! record. A kernel constructs exactly one service at boot and hands
//! references to every consumer; tests construct as many isolated
//! instances as they need.
//!
//! # Tick sources
//!
//! The counter has exactly one active writer at any time:
//!
//! - In ticking mode, the periodic interrupt calls [`ClockService::timer_tick`]
//!   and the counter advances by one per fire on the boot CPU.
//! - In tickless mode, [`ClockService::resync`](crate::tickless) reconstructs
//!   elapsed ticks from the cycle counter on demand.
//!
//! Readers never take a lock; the counter is a plain atomic load.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::hooks::{CycleSource, Platform};
use crate::sync::IrqSpinMutex;
use crate::tickless::TicklessState;
use crate::types::{CpuId, Result, Tick};

/// Default tick frequency in Hz.
pub const DEFAULT_TICK_HZ: u64 = 100;

/// The boot (reference) CPU in the usual numbering.
pub const BOOT_CPU_ID: CpuId = 0;

/// Process-wide timekeeping state.
pub struct ClockService<C, P> {
    /// Monotonic tick counter, 0 at construction.
    pub(crate) ticks: AtomicU64,

    /// Logical tick frequency in Hz, fixed at construction.
    pub(crate) tick_freq_hz: u64,

    /// The only CPU whose periodic interrupt advances the counter.
    pub(crate) boot_cpu: CpuId,

    /// Tickless reference record, guarded against cross-core resyncs.
    pub(crate) tickless: IrqSpinMutex<TicklessState>,

    /// Hardware cycle counter.
    pub(crate) cycles: C,

    /// Scheduler and platform services.
    pub(crate) platform: P,
}

impl<C: CycleSource, P: Platform> ClockService<C, P> {
    /// Create a clock service ticking at `tick_freq_hz`, advanced by the
    /// periodic interrupt of `boot_cpu`.
    pub fn new(tick_freq_hz: u64, boot_cpu: CpuId, cycles: C, platform: P) -> Self {
        Self {
            ticks: AtomicU64::new(0),
            tick_freq_hz,
            boot_cpu,
            tickless: IrqSpinMutex::new(TicklessState::new()),
            cycles,
            platform,
        }
    }

    /// The configured tick frequency in Hz.
    pub fn tick_freq_hz(&self) -> u64 {
        self.tick_freq_hz
    }

    /// Current value of the logical tick counter.
    ///
    /// In tickless mode this is current only as of the last resync; callers
    /// needing tickless accuracy resync first.
    pub fn current_tick(&self) -> Tick {
        self.ticks.load(Ordering::Acquire)
    }

    /// Periodic interrupt callback.
    ///
    /// Advances the counter by exactly one when called on the boot CPU and
    /// ignores fires on any other core, so per-core periodic interrupts
    /// never double-count. Lock-free and bounded; safe from interrupt
    /// context.
    pub fn timer_tick(&self, cpu: CpuId) {
        if cpu == self.boot_cpu {
            self.ticks.fetch_add(1, Ordering::Release);
        }
    }

    /// Set up the periodic interrupt source.
    ///
    /// The tick callback is registered for both vector numbers the two
    /// interrupt-controller configurations use; only one is ever live. If
    /// the processor frequency is already calibrated the hardware is
    /// considered configured and nothing else happens, so repeated calls
    /// are harmless.
    pub fn init_timer(&self) -> Result {
        #[cfg(target_arch = "x86_64")]
        {
            use crate::arch::amd64::pit;
            self.platform.install_timer_vector(pit::PIT_VECTOR);
            self.platform.install_timer_vector(pit::APIC_TIMER_VECTOR);
        }

        if self.platform.cpu_freq_mhz() != 0 {
            return Ok(());
        }

        #[cfg(target_arch = "x86_64")]
        // SAFETY: one-time boot path; nothing else is driving the PIT yet.
        unsafe {
            crate::arch::amd64::pit::program(&self.cycles, self.tick_freq_hz);
        }

        log::info!("timer: periodic source programmed at {} Hz", self.tick_freq_hz);
        Ok(())
    }
}
