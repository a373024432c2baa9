// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small numeric helpers.

/// Absolute value for finite inputs, without requiring `std` or `libm`.
#[inline]
pub(crate) fn abs(v: f64) -> f64 {
    v.max(-v)
}
