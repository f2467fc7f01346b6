//! Utility functions and traits.

use crate::{consts::RTOL, precision::PrecisionMode};

use rand::prelude::*;
use rand_distr::StandardNormal;

use std::{
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign},
};

/// Utility trait that generalizes floating-point types in the suite and implements common
/// functionnalities needed by the oracle, the host kernels and the drivers.
///
/// Also provides a generic way of generating floating-point vectors in the wanted type.
pub trait StreamFloat:
    num::Float
    + Default
    + Add
    + AddAssign
    + Mul
    + MulAssign
    + Send
    + Sync
    + fmt::Debug
    + fmt::Display
    + 'static
{
    /// Precision implemented by this type.
    const PRECISION: PrecisionMode;

    /// Rounds a double-precision constant to this type.
    fn from_scalar(x: f64) -> Self;

    /// Widens a value of this type to double precision.
    fn widen(self) -> f64;

    /// Produces a vector of length `n` filled with independent draws from the standard normal
    /// distribution.
    fn randn_vector<R: Rng>(n: usize, rng: &mut R) -> Vec<Self>;
}

impl StreamFloat for f32 {
    const PRECISION: PrecisionMode = PrecisionMode::Single;

    fn from_scalar(x: f64) -> Self {
        x as f32
    }

    fn widen(self) -> f64 {
        self.into()
    }

    fn randn_vector<R: Rng>(n: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| rng.sample::<f32, _>(StandardNormal)).collect()
    }
}

impl StreamFloat for f64 {
    const PRECISION: PrecisionMode = PrecisionMode::Double;

    fn from_scalar(x: f64) -> Self {
        x
    }

    fn widen(self) -> f64 {
        self
    }

    fn randn_vector<R: Rng>(n: usize, rng: &mut R) -> Vec<Self> {
        (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
    }
}

/// Seeded RNG shared by every array of a benchmark case.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Element-wise tolerance check: `|expected - actual| <= atol + rtol * |expected|`.
///
/// Arrays of different lengths never match, and neither do NaNs.
pub fn allclose<T: StreamFloat>(expected: &[T], actual: &[T], atol: f64) -> bool {
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| {
            let (e, a) = (e.widen(), a.widen());
            (e - a).abs() <= atol + RTOL * e.abs()
        })
}
