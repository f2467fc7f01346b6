//! stream-tune - auto-tuning of directive-based STREAM kernels
//!
//! # About
//! stream-tune assembles the tuning jobs of the classic STREAM memory-bandwidth kernels written
//! with OpenMP target offloading or OpenACC directives, and evaluates every configuration of their
//! search space:
//! - copy: `c = a`
//! - mul: `b = scalar * c`
//! - add: `c = a + b`
//! - triad: `a = b + scalar * c`
//! - dot: `sum(a * b)`
//!
//! Each job carries the call arguments of the kernel (normally distributed inputs, zeroed
//! outputs), the oracle its outputs are checked against, its search space (vector length, or
//! thread count and sub-group length), its metrics (GB/s and GFLOP/s), the preprocessor
//! definitions spliced in front of the generated code and the compiler flags.
//!
//! Tuning can be done on both single-precision and double-precision floating-point formats (see
//! [IEEE 754][1]).
//!
//! # Quickstart
//! ## Build
//! ```sh
//! cargo build --release
//! ```
//!
//! ## Help
//! ```sh
//! cargo run -- --help
//! ```
//!
//! ## Example run
//! To tune the single-precision triad and add kernels of the OpenMP backend on 2^24 elements:
//! ```sh
//! RUST_LOG=info cargo run --release -- --float --arraysize 16777216 --kernels triad add
//! ```
//!
//! [1]: https://en.wikipedia.org/wiki/IEEE_754

pub mod cli;
pub mod config;
pub mod consts;
pub mod drivers;
pub mod error;
pub mod kernels;
pub mod metrics;
pub mod oracle;
pub mod perf_report;
pub mod precision;
pub mod search_space;
pub mod toolchain;
pub mod tuning;
pub mod utils;

use crate::{cli::CliArgs, config::RunConfig, precision::PrecisionMode};
use crate::utils::*;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();

    let args = CliArgs::parse();
    let config = RunConfig::from(&args);
    let policy = config.policy();
    info!(
        backend = %config.backend,
        precision = %policy.mode,
        real_type = policy.type_name,
        size = config.size,
        source = ?config.source,
        threads = rayon::current_num_threads(),
        "starting tuning run"
    );

    let res = match config.precision {
        PrecisionMode::Single => drivers::tune::<f32>(&config, args.output_file.as_deref()),
        PrecisionMode::Double => drivers::tune::<f64>(&config, args.output_file.as_deref()),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
