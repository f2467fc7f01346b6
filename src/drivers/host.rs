//! Host execution engine.
//!
//! This module implements the engine that evaluates every configuration of a tuning job on the
//! host (CPU). Each configuration is mapped to the minimum number of elements a `rayon` task
//! processes: its `vlength`, or `nthreads * slength`.

use crate::{
    config::RunConfig,
    consts::SCALAR,
    error::{Result, TuneError},
    kernels::{host, KernelKind},
    oracle::{Answer, Argument, BenchmarkCase},
    perf_report::TuneReport,
    precision::PrecisionMode,
    tuning::{TuningEngine, TuningJob},
    utils::*,
};

use tracing::{debug, warn};

use std::time::Instant;

/// Host engine settings, taken from the run configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostEngine {
    precision: PrecisionMode,
    meta_reps: u8,
    tight_reps: u16,
    atol: f64,
}

impl HostEngine {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            precision: config.precision,
            meta_reps: config.meta_repetitions,
            tight_reps: config.tight_loop_repetitions.max(1),
            atol: config.atol,
        }
    }
}

impl<T: StreamFloat> TuningEngine<T> for HostEngine {
    fn tune(&mut self, job: &mut TuningJob<T>) -> Result<Vec<TuneReport>> {
        let kernel = job.kernel();
        let len = job.case.args.iter().find_map(|a| a.as_array()).map_or(0, <[T]>::len);
        let configs = job.search_space.configurations();
        let mut reports = Vec::with_capacity(configs.len());

        for config in configs {
            let min_len = config.block_len().max(1);

            // Run once on zeroed outputs to check the configuration against the oracle
            reset_outputs(&mut job.case);
            launch(kernel, &mut job.case.args, min_len)?;
            let verified = verify(&job.case, self.atol);
            if !verified {
                warn!(kernel = %kernel, config = %config, "output does not match the oracle");
            }

            // Measure execution time of the kernel
            let mut durations = Vec::with_capacity(self.meta_reps.into());
            for _ in 0..self.meta_reps {
                let dur = Instant::now();
                for _ in 0..self.tight_reps {
                    launch(kernel, &mut job.case.args, min_len)?;
                }
                durations.push((dur.elapsed() / self.tight_reps.into()).as_secs_f64());
            }

            let report = TuneReport::new(
                job.backend,
                kernel,
                self.precision,
                config,
                len,
                verified,
                &job.case.metrics,
                &durations,
            );
            debug!(
                kernel = %report.kernel(),
                config = %report.config(),
                avg_ms = report.avg_time(),
                gbs = ?report.bandwidth(),
                gflops = ?report.throughput(),
                verified,
                "evaluated configuration"
            );
            reports.push(report);
        }

        Ok(reports)
    }
}

/// Runs `kernel` once on its positional arguments.
fn launch<T: StreamFloat>(
    kernel: KernelKind,
    args: &mut [Argument<T>],
    min_len: usize,
) -> Result<()> {
    use crate::oracle::Argument::{Array, Scalar};

    let scalar = T::from_scalar(SCALAR);
    match (kernel, args) {
        (KernelKind::Copy, [Array(a), Array(c), ..]) => host::par_copy(a, c, min_len),
        (KernelKind::Mul, [Array(b), Array(c), ..]) => host::par_mul(scalar, c, b, min_len),
        (KernelKind::Add, [Array(a), Array(b), Array(c), ..]) => {
            host::par_add(a, b, c, min_len)
        }
        (KernelKind::Triad, [Array(a), Array(b), Array(c), ..]) => {
            host::par_triad(scalar, b, c, a, min_len)
        }
        (KernelKind::Dot, [Scalar(dotsum), Array(a), Array(b), ..]) => {
            *dotsum = std::hint::black_box(host::par_dot(a, b, min_len))
        }
        _ => return Err(TuneError::ArgumentLayout(kernel.name().to_owned())),
    }
    Ok(())
}

/// Zeroes every argument validated against the oracle.
fn reset_outputs<T: StreamFloat>(case: &mut BenchmarkCase<T>) {
    for i in case.checked_positions() {
        if let Some(Argument::Array(values)) = case.args.get_mut(i) {
            values.fill(T::zero());
        }
    }
}

/// Compares every checked argument against its expected value.
fn verify<T: StreamFloat>(case: &BenchmarkCase<T>, atol: f64) -> bool {
    let Some(answer) = &case.answer else {
        return true;
    };
    answer
        .iter()
        .zip(&case.args)
        .all(|(expected, actual)| match (expected, actual) {
            (Answer::Checked(expected), Argument::Array(actual)) => {
                allclose(expected, actual, atol)
            }
            (Answer::Checked(_), _) => false,
            (Answer::Unchecked, _) => true,
        })
}
