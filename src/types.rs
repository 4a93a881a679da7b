// Copyright 2026 The Monotick Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Common type aliases used throughout the subsystem

/// Logical clock tick count
pub type Tick = u64;

/// Hardware cycle counter value
pub type Cycles = u64;

/// CPU ID type
pub type CpuId = u32;

/// Error code type (negative values indicate errors)
pub type Status = i32;

/// Result type for timekeeping operations
pub type Result<T = ()> = core::result::Result<T, Status>;
