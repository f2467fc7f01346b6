//! Kernel catalog.
//!
//! This module declares the five STREAM kernels (their argument slots, the output checked against
//! the oracle and their data-movement/flop counts) and provides host implementations of each of
//! them.

use crate::error::TuneError;

use std::{fmt, str::FromStr};

/// List of catalogued kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelKind {
    Copy,
    Mul,
    Add,
    Triad,
    Dot,
}

impl KernelKind {
    /// Every kernel, in tuning order.
    pub const ALL: [KernelKind; 5] = [Self::Copy, Self::Mul, Self::Add, Self::Triad, Self::Dot];

    /// Function name of the kernel in the directive-annotated source.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Returns the catalog entry of the kernel.
    pub fn spec(self) -> &'static KernelSpec {
        match self {
            Self::Copy => &COPY,
            Self::Mul => &MUL,
            Self::Add => &ADD,
            Self::Triad => &TRIAD,
            Self::Dot => &DOT,
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KernelKind {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TuneError::UnknownKernel(s.to_owned()))
    }
}

/// Role of a positional kernel argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Array read by the kernel.
    Input(&'static str),
    /// Array entirely overwritten by the kernel.
    Output(&'static str),
    /// Scalar reduction result.
    Accumulator(&'static str),
}

/// Catalog entry of a kernel.
#[derive(Debug, PartialEq)]
pub struct KernelSpec {
    pub kind: KernelKind,
    pub name: &'static str,
    /// Mathematical relation computed by the kernel.
    pub relation: &'static str,
    /// Positional arguments, in call order.
    pub slots: &'static [Slot],
    /// Output slot validated against the oracle, if any.
    pub checked: Option<&'static str>,
    /// Number of array elements touched per index.
    pub touches: usize,
    /// Number of floating-point operations per index. `None` for kernels doing no arithmetic.
    pub flops: Option<usize>,
}

impl KernelSpec {
    /// Number of positional arguments declared by the kernel.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }
}

pub static COPY: KernelSpec = KernelSpec {
    kind: KernelKind::Copy,
    name: "copy",
    relation: "c := a",
    slots: &[Slot::Input("a"), Slot::Output("c")],
    checked: Some("c"),
    touches: 2,
    flops: None,
};

pub static MUL: KernelSpec = KernelSpec {
    kind: KernelKind::Mul,
    name: "mul",
    relation: "b := scalar * c",
    slots: &[Slot::Output("b"), Slot::Input("c")],
    checked: Some("b"),
    touches: 2,
    flops: Some(1),
};

pub static ADD: KernelSpec = KernelSpec {
    kind: KernelKind::Add,
    name: "add",
    relation: "c := a + b",
    slots: &[Slot::Input("a"), Slot::Input("b"), Slot::Output("c")],
    checked: Some("c"),
    touches: 3,
    flops: Some(1),
};

pub static TRIAD: KernelSpec = KernelSpec {
    kind: KernelKind::Triad,
    name: "triad",
    relation: "a := b + scalar * c",
    slots: &[Slot::Output("a"), Slot::Input("b"), Slot::Input("c")],
    checked: Some("a"),
    touches: 3,
    flops: Some(2),
};

pub static DOT: KernelSpec = KernelSpec {
    kind: KernelKind::Dot,
    name: "dot",
    relation: "dotsum := sum(a[i] * b[i])",
    slots: &[Slot::Accumulator("dotsum"), Slot::Input("a"), Slot::Input("b")],
    checked: None,
    touches: 2,
    flops: Some(1),
};

pub mod host {
    //! Host kernel implementations.
    //!
    //! The sequential kernels double as the reference relation of the oracle. The parallel
    //! implementations rely on the [`rayon`][1] crate and take the minimum number of elements
    //! processed per task.
    //!
    //! [1]: https://crates.io/crates/rayon

    use rayon::prelude::*;

    use crate::StreamFloat;

    pub fn copy<T: StreamFloat>(a: &[T], c: &mut [T]) {
        for i in 0..c.len() {
            c[i] = a[i];
        }
    }

    pub fn mul<T: StreamFloat>(scalar: T, c: &[T], b: &mut [T]) {
        for i in 0..b.len() {
            b[i] = scalar * c[i];
        }
    }

    pub fn add<T: StreamFloat>(a: &[T], b: &[T], c: &mut [T]) {
        for i in 0..c.len() {
            c[i] = a[i] + b[i];
        }
    }

    pub fn triad<T: StreamFloat>(scalar: T, b: &[T], c: &[T], a: &mut [T]) {
        for i in 0..a.len() {
            a[i] = b[i] + scalar * c[i];
        }
    }

    pub fn dot<T: StreamFloat>(a: &[T], b: &[T]) -> T {
        let mut acc = T::default();
        for i in 0..a.len() {
            acc += a[i] * b[i];
        }
        acc
    }

    pub fn par_copy<T: StreamFloat>(a: &[T], c: &mut [T], min_len: usize) {
        c.par_iter_mut()
            .zip(a.par_iter())
            .with_min_len(min_len)
            .for_each(|(ci, ai)| *ci = *ai);
    }

    pub fn par_mul<T: StreamFloat>(scalar: T, c: &[T], b: &mut [T], min_len: usize) {
        b.par_iter_mut()
            .zip(c.par_iter())
            .with_min_len(min_len)
            .for_each(|(bi, ci)| *bi = scalar * *ci);
    }

    pub fn par_add<T: StreamFloat>(a: &[T], b: &[T], c: &mut [T], min_len: usize) {
        c.par_iter_mut()
            .zip(a.par_iter().zip(b.par_iter()))
            .with_min_len(min_len)
            .for_each(|(ci, (ai, bi))| *ci = *ai + *bi);
    }

    pub fn par_triad<T: StreamFloat>(scalar: T, b: &[T], c: &[T], a: &mut [T], min_len: usize) {
        a.par_iter_mut()
            .zip(b.par_iter().zip(c.par_iter()))
            .with_min_len(min_len)
            .for_each(|(ai, (bi, ci))| *ai = *bi + scalar * *ci);
    }

    pub fn par_dot<T: StreamFloat>(a: &[T], b: &[T], min_len: usize) -> T {
        a.par_iter()
            .zip(b.par_iter())
            .with_min_len(min_len)
            .map(|(ai, bi)| *ai * *bi)
            .reduce(T::default, |acc, e| acc + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_consistent() {
        for kind in KernelKind::ALL {
            let spec = kind.spec();
            assert_eq!(spec.kind, kind);
            if let Some(checked) = spec.checked {
                assert!(spec.slots.contains(&Slot::Output(checked)));
            }
            assert!(spec.slots.iter().any(|slot| matches!(slot, Slot::Input(_))));
        }
        assert_eq!(COPY.arity(), 2);
        assert_eq!(DOT.arity(), 3);
        assert!(DOT.checked.is_none());
        assert!(COPY.flops.is_none());
    }

    #[test]
    fn test_kernel_from_str() {
        for kind in KernelKind::ALL {
            assert_eq!(kind.name().parse::<KernelKind>().unwrap(), kind);
        }
        match "nstream".parse::<KernelKind>() {
            Err(TuneError::UnknownKernel(name)) => assert_eq!(name, "nstream"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_host_kernels() {
        let a = [1.0_f64, 2.0, 3.0, 4.0];
        let b = [0.5_f64, -1.0, 2.0, 0.0];

        let mut c = [0.0; 4];
        host::copy(&a, &mut c);
        assert_eq!(c, a);

        let mut out = [0.0; 4];
        host::mul(0.4, &a, &mut out);
        assert_eq!(out, [0.4 * 1.0, 0.4 * 2.0, 0.4 * 3.0, 0.4 * 4.0]);

        host::add(&a, &b, &mut out);
        assert_eq!(out, [1.5, 1.0, 5.0, 4.0]);

        host::triad(0.4, &b, &a, &mut out);
        assert_eq!(out, [0.5 + 0.4 * 1.0, -1.0 + 0.4 * 2.0, 2.0 + 0.4 * 3.0, 0.4 * 4.0]);

        assert_eq!(host::dot(&a, &b), 0.5 - 2.0 + 6.0);
    }

    #[test]
    fn test_parallel_kernels_match_sequential() {
        let a: Vec<f32> = (0..4096).map(|i| i as f32 * 0.25).collect();
        let b: Vec<f32> = (0..4096).map(|i| 1.0 - i as f32 * 0.5).collect();

        for min_len in [1, 32, 1024, 8192] {
            let (mut seq, mut par) = (vec![0.0; a.len()], vec![0.0; a.len()]);
            host::copy(&a, &mut seq);
            host::par_copy(&a, &mut par, min_len);
            assert_eq!(seq, par);

            host::mul(0.4, &a, &mut seq);
            host::par_mul(0.4, &a, &mut par, min_len);
            assert_eq!(seq, par);

            host::add(&a, &b, &mut seq);
            host::par_add(&a, &b, &mut par, min_len);
            assert_eq!(seq, par);

            host::triad(0.4, &a, &b, &mut seq);
            host::par_triad(0.4, &a, &b, &mut par, min_len);
            assert_eq!(seq, par);
        }

        // Small integers keep the reduction exact regardless of the summation order.
        let ones = vec![1.0_f64; 10_000];
        let twos = vec![2.0_f64; 10_000];
        assert_eq!(host::par_dot(&ones, &twos, 64), 20_000.0);
    }
}
