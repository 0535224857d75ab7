// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics, and the floating-point type shared by the whole
//! pipeline.


use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::AddAssign,
};

use num_traits::{Float, FloatConst};
use rand::Rng;
use rand_distr::{Distribution, Poisson, PoissonError};
use serde::{de::DeserializeOwned, Serialize};

use crate::constants::POISSON_INVERSION_LIMIT;

/// The floating-point type used for a painting run. Choosing `f32` roughly
/// halves the memory footprint of a source catalogue; every type downstream
/// of the model uses the same precision.
pub trait Real:
    Float
    + FloatConst
    + AddAssign
    + Sum
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Human-readable name of the precision.
    const PRECISION: &'static str;

    /// Convert from an `f64`. This may lose precision.
    fn cast(x: f64) -> Self;

    /// Convert to an `f64`.
    fn as_f64(self) -> f64;
}

impl Real for f32 {
    const PRECISION: &'static str = "single";

    #[inline]
    fn cast(x: f64) -> f32 {
        x as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const PRECISION: &'static str = "double";

    #[inline]
    fn cast(x: f64) -> f64 {
        x
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

/// Linearly interpolate `ys` (tabulated at `xs`) at `x`. `xs` must be
/// strictly increasing, and `x` must be within `[xs[0], xs[n-1]]`; `None` is
/// returned otherwise.
pub(crate) fn interp_increasing<T: Real>(xs: &[T], ys: &[T], x: T) -> Option<T> {
    let n = xs.len();
    if n < 2 || ys.len() != n || x.is_nan() || x < xs[0] || x > xs[n - 1] {
        return None;
    }

    // Index of the first element strictly greater than x.
    let upper = xs.partition_point(|&v| v <= x).clamp(1, n - 1);
    let lower = upper - 1;
    Some(lerp(xs[lower], xs[upper], ys[lower], ys[upper], x))
}

/// Like [`interp_increasing`], but `xs` is strictly decreasing.
pub(crate) fn interp_decreasing<T: Real>(xs: &[T], ys: &[T], x: T) -> Option<T> {
    let n = xs.len();
    if n < 2 || ys.len() != n || x.is_nan() || x > xs[0] || x < xs[n - 1] {
        return None;
    }

    let upper = xs.partition_point(|&v| v >= x).clamp(1, n - 1);
    let lower = upper - 1;
    Some(lerp(xs[lower], xs[upper], ys[lower], ys[upper], x))
}

#[inline]
fn lerp<T: Real>(x0: T, x1: T, y0: T, y1: T, x: T) -> T {
    let dx = x1 - x0;
    if dx == T::zero() {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / dx
}

/// Integrate `f` over `[a, b]` with Simpson's rule using `n` (even) intervals.
pub(crate) fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = if n % 2 == 1 { n + 1 } else { n.max(2) };
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 1 { 4.0 * f(x) } else { 2.0 * f(x) };
    }
    sum * h / 3.0
}

/// Find a root of `f` in `[lo, hi]` by bisection. `f(lo)` and `f(hi)` must
/// have opposite signs.
pub(crate) fn bisect<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64) -> Option<f64> {
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() || f_lo.signum() == f_hi.signum() {
        return None;
    }

    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) < 1e-15 * mid.abs().max(1.0) {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// The Euclidean norm of a 3-vector.
#[inline]
pub(crate) fn norm3<T: Real>(v: [T; 3]) -> T {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Draw a Poisson-distributed count with mean `mean`. Means that aren't
/// positive give 0. Small means are drawn by inverting the CDF, which uses
/// exactly one uniform deviate; large ones use `rand_distr`.
pub(crate) fn sample_poisson<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> Result<usize, PoissonError> {
    if !(mean > 0.0) {
        return Ok(0);
    }

    if mean < POISSON_INVERSION_LIMIT {
        // Sequential search of the CDF.
        let u: f64 = rng.gen();
        let mut p = (-mean).exp();
        let mut cdf = p;
        let mut k = 0;
        while u > cdf && p > 0.0 {
            k += 1;
            p *= mean / k as f64;
            cdf += p;
        }
        Ok(k)
    } else {
        let poisson = Poisson::new(mean)?;
        Ok(poisson.sample(rng) as usize)
    }
}
