// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Bounded Busy-Wait
//!
//! A calibration-free delay used only where real time must pass and no
//! interrupt source is available yet, such as between hardware register
//! writes at boot. Never used on the main timekeeping paths.

use crate::hooks::CycleSource;
use crate::types::Cycles;

/// Spin until `source` has advanced by at least `budget` cycles.
///
/// The comparison uses wrapping subtraction, so a counter wrap during the
/// wait does not extend it.
pub fn busy_wait_cycles<C: CycleSource>(source: &C, budget: Cycles) {
    if budget == 0 {
        return;
    }

    let start = source.read_cycles();
    while source.read_cycles().wrapping_sub(start) < budget {
        core::hint::spin_loop();
    }
}
