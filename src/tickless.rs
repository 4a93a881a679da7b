// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Tickless Synchronizer
//!
//! In tickless mode no periodic interrupt is relied upon. The cycle counter
//! runs far faster than the tick frequency, so elapsed ticks are
//! reconstructed on demand by integer-scaled division of the cycle delta
//! since a reference point:
//!
//! ```text
//! diff_ticks = (cur_cycles - ref_cycles) * tick_freq / (1_000_000 * cpu_mhz)
//! ```
//!
//! The multiply happens before the divide to keep sub-tick precision; at a
//! 100 Hz tick the product stays inside u64 for cycle deltas below roughly
//! 2^57, far beyond any realistic resync interval. The subtraction wraps,
//! so a cycle counter rollover yields the correct small delta rather than
//! a huge one.
//!
//! When the delta is too small to produce a whole tick, the reference is
//! left alone so the fractional remainder is carried into the next resync
//! instead of being discarded.

use core::sync::atomic::{fence, Ordering};

use crate::clock::ClockService;
use crate::hooks::{CycleSource, Platform};
use crate::types::Cycles;

/// Tickless mode record, guarded by the clock's tickless lock.
pub struct TicklessState {
    /// Whether tickless accounting is active.
    pub enabled: bool,

    /// Cycle count at the last counter advance.
    ///
    /// Not read by any advancing logic while `enabled` is false; cleared to
    /// 0 on exit so a stale value can never leak into a later computation.
    pub last_cycles: Cycles,
}

impl TicklessState {
    /// Create the record in ticking (non-tickless) mode.
    pub const fn new() -> Self {
        Self {
            enabled: false,
            last_cycles: 0,
        }
    }
}

impl Default for TicklessState {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CycleSource, P: Platform> ClockService<C, P> {
    /// Enter tickless mode.
    ///
    /// The enable flag is published before the reference cycle count is
    /// sampled, with a fence keeping the read from being hoisted above the
    /// flag write.
    pub fn start_tickless(&self) {
        self.tickless.with(|state| {
            state.enabled = true;
            fence(Ordering::SeqCst);
            state.last_cycles = self.cycles.read_cycles();
        });
        log::debug!("timer: tickless mode on");
    }

    /// Leave tickless mode.
    ///
    /// Any later resync becomes a no-op until tickless mode is started
    /// again.
    pub fn end_tickless(&self) {
        self.tickless.with(|state| {
            state.enabled = false;
            state.last_cycles = 0;
        });
        log::debug!("timer: tickless mode off");
    }

    /// Fold cycles elapsed since the reference point into the tick counter.
    ///
    /// No-op when tickless mode is off or the processor frequency is not
    /// yet calibrated. Called opportunistically from the wait loop and by
    /// any caller that needs the counter current right now.
    pub fn resync(&self) {
        self.tickless.with(|state| {
            if !state.enabled {
                return;
            }

            let cpu_mhz = self.platform.cpu_freq_mhz();
            if cpu_mhz == 0 {
                return;
            }

            let cur_cycles = self.cycles.read_cycles();
            let elapsed = cur_cycles.wrapping_sub(state.last_cycles);
            let diff_ticks = elapsed * self.tick_freq_hz / (1_000_000 * cpu_mhz);

            if diff_ticks > 0 {
                self.ticks.fetch_add(diff_ticks, Ordering::Release);
                state.last_cycles = cur_cycles;
                fence(Ordering::SeqCst);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::{ClockService, BOOT_CPU_ID, DEFAULT_TICK_HZ};
    use crate::hooks::mock::{RecordingPlatform, ScriptedCycles};

    fn tickless_clock(
        tick_hz: u64,
        cpu_mhz: u64,
    ) -> ClockService<ScriptedCycles, RecordingPlatform> {
        ClockService::new(
            tick_hz,
            BOOT_CPU_ID,
            ScriptedCycles::new(0, 0),
            RecordingPlatform::new(cpu_mhz, false),
        )
    }

    #[test]
    fn test_zero_elapsed_cycles_zero_ticks() {
        let clock = tickless_clock(DEFAULT_TICK_HZ, 2000);
        clock.start_tickless();
        clock.resync();
        assert_eq!(clock.current_tick(), 0);
    }

    #[test]
    fn test_resync_matches_scaling_formula() {
        // 2 GHz processor, 100 Hz tick: one tick per 20_000_000 cycles.
        let clock = tickless_clock(100, 2000);
        clock.start_tickless();

        clock.cycles.set(123_456_789);
        clock.resync();
        // floor(123456789 * 100 / 2_000_000_000) = 6
        assert_eq!(clock.current_tick(), 6);
    }

    #[test]
    fn test_resync_is_deterministic_for_exact_multiples() {
        let clock = tickless_clock(1000, 1);
        clock.start_tickless();

        // 1 MHz, 1 kHz tick: one tick per 1000 cycles.
        clock.cycles.set(5000);
        clock.resync();
        assert_eq!(clock.current_tick(), 5);

        clock.cycles.set(12_345);
        clock.resync();
        assert_eq!(clock.current_tick(), 12);
    }

    #[test]
    fn test_fractional_remainder_carries_forward() {
        let clock = tickless_clock(1000, 1);
        clock.start_tickless();

        // 1500 cycles is 1.5 ticks; the reference advances to 1500 and the
        // half tick is lost to flooring, as the formula dictates.
        clock.cycles.set(1500);
        clock.resync();
        assert_eq!(clock.current_tick(), 1);

        // 999 further cycles is still short of a whole tick, so neither
        // the counter nor the reference moves.
        clock.cycles.set(2499);
        clock.resync();
        assert_eq!(clock.current_tick(), 1);

        // One more cycle completes the second tick since the reference.
        clock.cycles.set(2500);
        clock.resync();
        assert_eq!(clock.current_tick(), 2);
    }

    #[test]
    fn test_repeated_resync_without_advance_is_stable() {
        let clock = tickless_clock(100, 2000);
        clock.start_tickless();
        clock.cycles.set(40_000_000);
        clock.resync();
        let after_first = clock.current_tick();
        assert_eq!(after_first, 2);

        for _ in 0..10 {
            clock.resync();
        }
        assert_eq!(clock.current_tick(), after_first);
    }

    #[test]
    fn test_cycle_counter_wrap_yields_small_delta() {
        let clock = tickless_clock(1000, 1);

        // Reference lands just below the wrap point.
        clock.cycles.set(u64::MAX - 1000);
        clock.start_tickless();

        // 10_001 cycles later the counter has wrapped to 9000.
        clock.cycles.set(9000);
        clock.resync();
        assert_eq!(clock.current_tick(), 10);
    }

    #[test]
    fn test_end_tickless_makes_resync_inert() {
        let clock = tickless_clock(1000, 1);
        clock.start_tickless();
        clock.end_tickless();

        clock.cycles.set(1_000_000_000);
        for _ in 0..5 {
            clock.resync();
        }
        assert_eq!(clock.current_tick(), 0);

        // Re-entering tickless mode resamples the reference, so the large
        // stale cycle value produces no spurious advance either.
        clock.start_tickless();
        clock.resync();
        assert_eq!(clock.current_tick(), 0);
    }

    #[test]
    fn test_resync_before_start_is_inert() {
        let clock = tickless_clock(1000, 1);
        clock.cycles.set(123_456);
        clock.resync();
        assert_eq!(clock.current_tick(), 0);
    }

    #[test]
    fn test_uncalibrated_frequency_is_inert() {
        let clock = tickless_clock(1000, 0);
        clock.start_tickless();
        clock.cycles.set(1_000_000);
        clock.resync();
        assert_eq!(clock.current_tick(), 0);
    }

    #[test]
    fn test_counter_monotonic_across_mode_switches() {
        let clock = tickless_clock(1000, 1);
        let mut last = clock.current_tick();

        clock.timer_tick(BOOT_CPU_ID);
        assert!(clock.current_tick() >= last);
        last = clock.current_tick();

        clock.cycles.set(10_000);
        clock.start_tickless();
        clock.cycles.set(20_000);
        clock.resync();
        assert!(clock.current_tick() >= last);
        last = clock.current_tick();

        clock.end_tickless();
        clock.timer_tick(BOOT_CPU_ID);
        assert!(clock.current_tick() >= last);
    }
}
