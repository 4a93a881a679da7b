// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! 8253/8254 PIT (Programmable Interval Timer)
//!
//! One-time boot configuration of the periodic interrupt source. Channel 0
//! is programmed as a rate generator whose divisor is chosen to get as
//! close as possible to the requested tick frequency.
//!
//! The divisor is delivered with the two-step low-byte/high-byte protocol,
//! and the chip needs real time between port writes to latch each byte, so
//! the writes are separated by a bounded busy-wait.

use bitflags::bitflags;
use x86_64::instructions::port::Port;

use crate::delay::busy_wait_cycles;
use crate::hooks::CycleSource;
use crate::types::Cycles;

/// Channel 0 counter register
const PIT_CHANNEL0: u16 = 0x40;

/// Mode/command register
const PIT_COMMAND: u16 = 0x43;

/// PIT input clock in Hz
pub const PIT_CLOCK_RATE: u64 = 1_193_182;

/// Vector the legacy PIC delivers channel 0 interrupts on
pub const PIT_VECTOR: u8 = 32;

/// Vector used for the local APIC timer configuration
///
/// Only one of the two vectors is ever live; which one depends on how the
/// interrupt controller was brought up.
pub const APIC_TIMER_VECTOR: u8 = 123;

/// Settling budget between register writes, in TSC cycles
const SETTLE_CYCLES: Cycles = 1_000_000;

bitflags! {
    /// Mode/command byte for the PIT.
    ///
    /// Channel 0 and binary (non-BCD) counting are the all-zero bits, so
    /// the full command is just the access mode plus the operating mode.
    pub struct PitCommand: u8 {
        /// Write the low counter byte
        const ACCESS_LOBYTE = 1 << 4;
        /// Write the high counter byte
        const ACCESS_HIBYTE = 1 << 5;
        /// Mode 2: rate generator / frequency divider
        const MODE_RATE_GENERATOR = 0b010 << 1;
    }
}

/// Compute the channel 0 divisor for a target frequency.
///
/// Rounds to the nearest integer divisor rather than truncating, which
/// halves the worst-case frequency error. The value is kept at full width
/// here; the chip sees only the low 16 bits, taken at the port writes.
pub const fn latch(target_freq: u64) -> u64 {
    (PIT_CLOCK_RATE + target_freq / 2) / target_freq
}

/// Program channel 0 to fire at `tick_freq_hz`.
///
/// `source` drives the settle delays between register writes.
///
/// # Safety
///
/// Writes I/O ports 0x40 and 0x43. Requires ring 0 and must not race with
/// other code touching the PIT.
pub unsafe fn program<C: CycleSource>(source: &C, tick_freq_hz: u64) {
    let mut command: Port<u8> = Port::new(PIT_COMMAND);
    let mut channel0: Port<u8> = Port::new(PIT_CHANNEL0);

    let mode = PitCommand::ACCESS_LOBYTE | PitCommand::ACCESS_HIBYTE | PitCommand::MODE_RATE_GENERATOR;
    let divisor = latch(tick_freq_hz);

    command.write(mode.bits());
    busy_wait_cycles(source, SETTLE_CYCLES);

    channel0.write((divisor & 0xff) as u8);
    busy_wait_cycles(source, SETTLE_CYCLES);

    channel0.write(((divisor >> 8) & 0xff) as u8);
}
