//! Crate-level constants.

/// Default number of elements per array (2^25).
pub const ARRAY_SIZE: i32 = 1 << 25;

/// Scalar constant used by the Mul and Triad kernels.
pub const SCALAR: f64 = 0.4;

/// Default number of meta repetitions performed when timing a configuration.
pub const META_REPETITIONS: u8 = 31;

/// Default number of tight loop repetitions performed when timing a configuration.
pub const TIGHT_LOOP_REPETITIONS: u16 = 1;

/// Default seed for the random number generator (RNG).
pub const SEED: u64 = 0;

/// Default absolute tolerance used when comparing kernel outputs against their oracle.
pub const ATOL: f64 = 1e-6;

/// Relative tolerance used when comparing kernel outputs against their oracle.
pub const RTOL: f64 = 1e-5;

/// Step (and lower bound) of the `vlength` and `nthreads` candidate values.
pub const WARP_SIZE: u32 = 32;

/// Upper bound of the `vlength` and `nthreads` candidate values.
pub const MAX_BLOCK_SIZE: u32 = 1024;

/// Largest exponent of the `slength` candidate values (`2^0..=2^4`).
pub const MAX_SUBGROUP_EXP: u32 = 4;
