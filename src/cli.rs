//! Command-Line Interface related code.
//!
//! This module handles the parsing of CLI arguments using the [`clap`][1] crate.
//! It defines the availables runtime options.
//!
//! [1]: https://crates.io/crates/clap

use crate::{consts, kernels::KernelKind, toolchain::Backend};

use clap::Parser;

use std::path::PathBuf;

/// Auto-tuning of directive-based STREAM kernels.
///
/// Builds the tuning jobs (arguments, oracle, search space and metrics) of the copy, mul, add,
/// triad and dot kernels for an OpenMP or OpenACC backend, and evaluates every configuration of
/// their search space.
#[derive(Clone, Debug, Parser)]
pub struct CliArgs {
    /// Size of the arrays.
    #[arg(
        long,
        value_name = "INT",
        default_value_t = consts::ARRAY_SIZE,
        allow_negative_numbers = true
    )]
    pub arraysize: i32,

    /// Use single precision.
    #[arg(long)]
    pub float: bool,

    /// Directive family of the kernels.
    #[arg(short, long, value_enum, default_value_t = Backend::OpenMp)]
    pub backend: Backend,

    /// Directive-annotated kernel source, defaults to `OMPStream.cpp` or `ACCStream.cpp` depending
    /// on the backend.
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Kernels to tune, defaults to all of them.
    #[arg(short, long, num_args = 1.., value_name = "KERNEL")]
    pub kernels: Vec<KernelKind>,

    /// Number of meta-repetitions for each configuration.
    #[arg(
        short,
        long,
        value_name = "META_REPS",
        default_value_t = consts::META_REPETITIONS,
        value_parser = clap::value_parser!(u8).range(2..u8::MAX.into()),
    )]
    pub meta_repetitions: u8,

    /// Number of repetitions of the tight loop.
    #[arg(
        short,
        long,
        value_name = "TIGHT_REPS",
        default_value_t = consts::TIGHT_LOOP_REPETITIONS,
        value_parser = clap::value_parser!(u16).range(1..u16::MAX.into()),
    )]
    pub tight_loop_repetitions: u16,

    /// Absolute tolerance of the correctness check.
    #[arg(long, default_value_t = consts::ATOL)]
    pub atol: f64,

    /// Output file, defaults to `stdout` if unspecified.
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Seed for the random number generator (RNG).
    #[arg(short, long, value_name = "SEED", default_value_t = consts::SEED)]
    pub seed: u64,
}
