//! Run configuration.
//!
//! Every run-wide setting is resolved once from the command line into an immutable [`RunConfig`]
//! that is handed to each component.

use crate::{
    cli::CliArgs,
    kernels::KernelKind,
    precision::{PrecisionMode, PrecisionPolicy},
    toolchain::Backend,
};

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub precision: PrecisionMode,
    /// Number of elements per array.
    pub size: i32,
    pub backend: Backend,
    /// Kernel source whose preprocessor lines head the generated code. `None` reads nothing.
    pub source: Option<PathBuf>,
    /// Kernels to tune, in order.
    pub kernels: Vec<KernelKind>,
    pub seed: u64,
    pub meta_repetitions: u8,
    pub tight_loop_repetitions: u16,
    /// Absolute tolerance of the correctness check.
    pub atol: f64,
}

impl RunConfig {
    pub fn policy(&self) -> PrecisionPolicy {
        self.precision.policy()
    }

    /// Array length; non-positive sizes yield empty arrays.
    pub fn len(&self) -> usize {
        usize::try_from(self.size).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&CliArgs> for RunConfig {
    fn from(args: &CliArgs) -> Self {
        let kernels = if args.kernels.is_empty() {
            KernelKind::ALL.to_vec()
        } else {
            args.kernels.clone()
        };

        Self {
            precision: PrecisionMode::from_flag(args.float),
            size: args.arraysize,
            backend: args.backend,
            source: Some(
                args.source
                    .clone()
                    .unwrap_or_else(|| args.backend.default_source().into()),
            ),
            kernels,
            seed: args.seed,
            meta_repetitions: args.meta_repetitions,
            tight_loop_repetitions: args.tight_loop_repetitions,
            atol: args.atol,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config(precision: PrecisionMode, size: i32, backend: Backend) -> RunConfig {
    RunConfig {
        precision,
        size,
        backend,
        source: None,
        kernels: KernelKind::ALL.to_vec(),
        seed: 42,
        meta_repetitions: 2,
        tight_loop_repetitions: 1,
        atol: crate::consts::ATOL,
    }
}
