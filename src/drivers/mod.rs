//! Tuning drivers.
//!
//! This module provides the API for assembling the tuning job of each requested kernel, handing it
//! to an execution engine and post-processing the results.
//!
//! # High-level approach for kernel tuning
//! ## 1. Job assembly
//! For every kernel, the arguments and their oracle are generated, the search space of the kernel
//! under the chosen backend is declared and the preprocessor definitions and compiler flags are
//! collected (see [`crate::tuning`]).
//!
//! ## 2. Performance evaluation
//! Every configuration of the search space is checked against the oracle and timed in a "meta
//! repetitions loop", each repetition optionally calling the kernel several times in a tight loop
//! (see [`crate::consts`] for the defaults and [`crate::cli`] for overriding them from the
//! command-line).
//!
//! ## 3. Post-processing
//! The recorded execution times are turned into the metrics of the kernel (GB/s and GFLOP/s) and
//! the fastest verified configuration of each kernel is logged. The reports are outputted to
//! `stdout`, or a file if specified (see [`crate::cli`] for specifying an output file from the
//! command-line).

mod host;

pub use host::HostEngine;

use crate::{
    config::RunConfig,
    error::Result,
    perf_report::TuneReport,
    tuning::{TuningEngine, TuningJob},
    utils::*,
};

use tracing::{debug, info, warn};

use std::{
    fs::{self, OpenOptions},
    io::{stdout, Write},
    path::Path,
};

/// Tunes every kernel of `config` on the host and writes the reports to `output_file`, or
/// `stdout` if unspecified.
pub fn tune<T: StreamFloat>(config: &RunConfig, output_file: Option<&Path>) -> Result<()> {
    let mut output: Box<dyn Write> = match output_file {
        Some(name) => Box::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(name)?,
        ),
        None => Box::new(stdout()),
    };

    let mut engine = HostEngine::new(config);
    let reports = tune_with::<T, _>(&mut engine, config)?;

    TuneReport::print_csv_header(&mut output)?;
    for report in reports {
        writeln!(output, "{report}")?;
    }
    output.flush()?;
    Ok(())
}

/// Reads the kernel source of `config` and returns the preprocessor lines it contributes.
pub fn source_preprocessor(config: &RunConfig) -> Result<Vec<String>> {
    let Some(path) = &config.source else {
        return Ok(Vec::new());
    };
    let source = fs::read_to_string(path)?;
    let lines = config.backend.extract_preprocessor(&source);
    debug!(source = %path.display(), lines = lines.len(), "read kernel source");
    Ok(lines)
}

/// Tunes every kernel of `config` with `engine`, returning the reports of all configurations.
pub fn tune_with<T, E>(engine: &mut E, config: &RunConfig) -> Result<Vec<TuneReport>>
where
    T: StreamFloat,
    E: TuningEngine<T>,
{
    let extracted = source_preprocessor(config)?;
    let mut reports = Vec::new();

    for &kernel in &config.kernels {
        info!("Tuning {kernel}: {}", kernel.spec().relation);
        let mut job = TuningJob::<T>::new(kernel, config, &extracted)?;
        let kernel_reports = engine.tune(&mut job)?;

        match TuneReport::best(&kernel_reports) {
            Some(best) => info!(
                kernel = %kernel,
                config = %best.config(),
                avg_ms = best.avg_time(),
                gbs = ?best.bandwidth(),
                gflops = ?best.throughput(),
                "best configuration"
            ),
            None => warn!(kernel = %kernel, "no configuration matched the oracle"),
        }
        reports.extend(kernel_reports);
    }

    Ok(reports)
}
