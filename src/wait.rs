// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Deadline Wait
//!
//! Waiting a number of ticks means computing an absolute deadline and then
//! doing one of two things, depending on who is asking:
//!
//! - The idle task has no other work to hand the core to, so it polls:
//!   drain the work queues, resync the clock, and halt until the next
//!   interrupt, around and around until the deadline is reached. The halt
//!   keeps the loop from burning the core between interrupts.
//! - Any other task yields the core instead. After one drain attempt it
//!   arms a one-shot wakeup for the deadline and reschedules. That is a
//!   single suspension, not a loop: a resumed caller re-checks the clock
//!   itself and issues a fresh wait for the remainder if it needs one,
//!   since any interrupt can make it runnable early.
//!
//! A deadline already in the past satisfies either branch immediately; it
//! is a zero-iteration fast path, never an error.

use crate::clock::ClockService;
use crate::hooks::{CycleSource, Platform};
use crate::types::Result;

impl<C: CycleSource, P: Platform> ClockService<C, P> {
    /// Wait until at least `ticks` logical ticks from now have elapsed.
    pub fn wait_ticks(&self, ticks: u64) -> Result {
        let deadline = self.current_tick().wrapping_add(ticks);

        if self.platform.is_idle_task() {
            while self.current_tick() < deadline {
                self.platform.check_workqueues();

                // Recheck with the counter brought current first; in
                // tickless mode nothing else is advancing it.
                self.resync();
                if self.current_tick() >= deadline {
                    break;
                }

                self.platform.halt();
            }
        } else if self.current_tick() < deadline {
            self.platform.check_workqueues();

            if self.current_tick() < deadline {
                self.platform.set_timer(deadline);
                self.platform.reschedule();
            }
        }

        Ok(())
    }
}
