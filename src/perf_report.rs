//! Performance report related structures and functions.
//!
//! This module defines the data structures and functions needed to generate performance reports
//! out of the recorded execution times of each tuned configuration.

use crate::{
    error::Result,
    kernels::KernelKind,
    metrics::{MetricParams, MetricSet},
    precision::PrecisionMode,
    search_space::Configuration,
    toolchain::Backend,
};

use statistical::{mean, standard_deviation};

use std::{fmt, io::Write};

/// Performance information and statistics of one configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TuneReport {
    /// Directive family the kernel was built for.
    backend: Backend,
    /// Tuned kernel.
    kernel: KernelKind,
    /// Precision of the arrays.
    precision: PrecisionMode,
    /// Evaluated point of the search space.
    config: Configuration,
    /// Number of elements per array.
    size: usize,
    /// Whether every checked output matched the oracle.
    verified: bool,
    /// Minimum recorded runtime in milliseconds.
    min_time: f64,
    /// Median recorded runtime in milliseconds.
    median_time: f64,
    /// Maximum recorded runtime in milliseconds.
    max_time: f64,
    /// Average runtime in milliseconds.
    avg_time: f64,
    /// Runtime standard deviation in milliseconds.
    stddev_time: f64,
    /// Memory bandwidth in GB/s.
    bandwidth: Option<f64>,
    /// Computational performance in GFLOP/s.
    throughput: Option<f64>,
}

impl TuneReport {
    pub fn print_csv_header(output: &mut dyn Write) -> Result<()> {
        writeln!(
            output,
            "backend,kernel,precision,configuration,elems,verified,min_runtime,median_runtime,max_runtime,avg_runtime,stddev,GB/s,GFLOP/s"
        )?;
        Ok(())
    }

    /// Creates a new `TuneReport` from the recorded execution times (in seconds) of a
    /// configuration. Metrics are evaluated at the average runtime.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: Backend,
        kernel: KernelKind,
        precision: PrecisionMode,
        config: Configuration,
        size: usize,
        verified: bool,
        metrics: &MetricSet,
        durations: &[f64],
    ) -> Self {
        let mut millis: Vec<f64> = durations.iter().map(|d| d * 1e3).collect();
        // Sort durations to avoid having to do two passes to get both min and max elements
        millis.sort_by(|a, b| a.total_cmp(b));

        let min_time = millis.first().copied().unwrap_or(0.0);
        let median_time = millis.get(millis.len() / 2).copied().unwrap_or(0.0);
        let max_time = millis.last().copied().unwrap_or(0.0);
        let (avg_time, stddev_time) = match millis.len() {
            0 => (0.0, 0.0),
            1 => (millis[0], 0.0),
            _ => {
                let avg = mean(&millis);
                (avg, standard_deviation(&millis, Some(avg)))
            }
        };

        let params = MetricParams {
            elapsed_ms: avg_time,
            size,
            element_bytes: precision.element_bytes(),
        };
        let mut bandwidth = None;
        let mut throughput = None;
        for (name, value) in metrics.evaluate(&params) {
            match name {
                "GB/s" => bandwidth = Some(value),
                _ => throughput = Some(value),
            }
        }

        Self {
            backend,
            kernel,
            precision,
            config,
            size,
            verified,
            min_time,
            median_time,
            max_time,
            avg_time,
            stddev_time,
            bandwidth,
            throughput,
        }
    }

    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn avg_time(&self) -> f64 {
        self.avg_time
    }

    pub fn bandwidth(&self) -> Option<f64> {
        self.bandwidth
    }

    pub fn throughput(&self) -> Option<f64> {
        self.throughput
    }

    /// Fastest verified configuration of `reports`.
    pub fn best(reports: &[TuneReport]) -> Option<&TuneReport> {
        reports
            .iter()
            .filter(|r| r.verified)
            .min_by(|a, b| a.avg_time.total_cmp(&b.avg_time))
    }
}

impl fmt::Display for TuneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<f64>| v.map_or_else(String::new, |v| v.to_string());
        write!(
            f,
            "{},{},{},{},{},{},{:18.15},{:18.15},{:18.15},{:18.15},{},{},{}",
            self.backend,
            self.kernel,
            self.precision,
            self.config,
            self.size,
            self.verified,
            self.min_time,
            self.median_time,
            self.max_time,
            self.avg_time,
            self.stddev_time,
            opt(self.bandwidth),
            opt(self.throughput),
        )
    }
}
