//! Metric definitions.
//!
//! Pure functions mapping a measured execution time to the throughput figures reported for each
//! kernel. Sizes use decimal units (1 GB = 10^9 bytes).

use crate::kernels::KernelKind;

/// Inputs of every metric function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricParams {
    /// Elapsed time of one kernel call, in milliseconds.
    pub elapsed_ms: f64,
    /// Number of elements per array.
    pub size: usize,
    /// Size of one element in bytes.
    pub element_bytes: usize,
}

/// Memory bandwidth in GB/s for a kernel touching `touches` arrays per index.
pub fn bandwidth_gbs(touches: usize, p: &MetricParams) -> f64 {
    ((touches * p.element_bytes * p.size) as f64 / 1e9) / (p.elapsed_ms / 1e3)
}

/// Computational throughput in GFLOP/s for a kernel doing `flops` operations per index.
pub fn throughput_gflops(flops: usize, p: &MetricParams) -> f64 {
    ((flops * p.size) as f64 / 1e9) / (p.elapsed_ms / 1e3)
}

/// A named metric of a kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// `GB/s`, with the number of array touches per index.
    Bandwidth(usize),
    /// `GFLOP/s`, with the number of floating-point operations per index.
    Throughput(usize),
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bandwidth(_) => "GB/s",
            Self::Throughput(_) => "GFLOP/s",
        }
    }

    pub fn evaluate(&self, p: &MetricParams) -> f64 {
        match *self {
            Self::Bandwidth(touches) => bandwidth_gbs(touches, p),
            Self::Throughput(flops) => throughput_gflops(flops, p),
        }
    }
}

/// Metrics reported for one kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricSet {
    metrics: Vec<Metric>,
}

impl MetricSet {
    /// Throughput (when the kernel does arithmetic) followed by bandwidth.
    pub fn for_kernel(kind: KernelKind) -> Self {
        let spec = kind.spec();
        let metrics = spec
            .flops
            .map(Metric::Throughput)
            .into_iter()
            .chain([Metric::Bandwidth(spec.touches)])
            .collect();
        Self { metrics }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name() == name)
    }

    /// Evaluates every metric at the given time.
    pub fn evaluate(&self, p: &MetricParams) -> Vec<(&'static str, f64)> {
        self.metrics
            .iter()
            .map(|m| (m.name(), m.evaluate(p)))
            .collect()
    }
}
