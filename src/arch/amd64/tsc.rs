// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! x86 TSC (Time Stamp Counter)
//!
//! The TSC is a 64-bit register incremented every processor cycle. It is
//! the cycle source backing tickless timekeeping on this architecture.
//!
//! `rdtscp` is preferred over `rdtsc` when the processor supports it,
//! because it waits for all prior instructions to execute before sampling
//! the counter. Support is probed once via CPUID and cached.

use crate::hooks::CycleSource;
use crate::types::Cycles;

/// Read the Time Stamp Counter.
#[inline]
pub fn rdtsc() -> u64 {
    unsafe {
        let (low, high): (u32, u32);
        core::arch::asm!("rdtsc", lateout("eax") low, lateout("edx") high, options(nomem, nostack));
        ((high as u64) << 32) | (low as u64)
    }
}

/// Read the Time Stamp Counter with serialization.
///
/// `rdtscp` also writes the processor ID to ECX, which is discarded here.
#[inline]
pub fn rdtscp() -> u64 {
    unsafe {
        let (low, high): (u32, u32);
        core::arch::asm!(
            "rdtscp",
            lateout("eax") low,
            lateout("edx") high,
            lateout("ecx") _,
            options(nomem, nostack)
        );
        ((high as u64) << 32) | (low as u64)
    }
}

/// Check for RDTSCP support.
///
/// CPUID.80000001H:EDX.RDTSCP[bit 27].
fn has_rdtscp() -> bool {
    unsafe {
        let max_extended = core::arch::x86_64::__cpuid(0x8000_0000).eax;
        if max_extended < 0x8000_0001 {
            return false;
        }
        core::arch::x86_64::__cpuid(0x8000_0001).edx & (1 << 27) != 0
    }
}

/// The TSC as a [`CycleSource`].
pub struct TscCycleSource {
    use_rdtscp: bool,
}

impl TscCycleSource {
    /// Probe the processor and build the source.
    pub fn probe() -> Self {
        Self {
            use_rdtscp: has_rdtscp(),
        }
    }
}

impl CycleSource for TscCycleSource {
    fn read_cycles(&self) -> Cycles {
        if self.use_rdtscp {
            rdtscp()
        } else {
            rdtsc()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsc_advances() {
        let source = TscCycleSource::probe();
        let a = source.read_cycles();
        let b = source.read_cycles();
        assert!(b > a);
    }
}
