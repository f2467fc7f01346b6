//! Search-space declaration.
//!
//! Every kernel is tuned over a small set of integer parameters. The declared space is the full
//! cross product of their candidate values; no pruning or inter-parameter constraint applies.

use crate::{
    consts::{MAX_BLOCK_SIZE, MAX_SUBGROUP_EXP, WARP_SIZE},
    error::{Result, TuneError},
};

use std::fmt;

/// Vector length (OpenACC `vector_length`, OpenMP `simdlen`).
pub const VLENGTH: &str = "vlength";

/// Number of threads per team.
pub const NTHREADS: &str = "nthreads";

/// Sub-group length.
pub const SLENGTH: &str = "slength";

/// Ordered mapping from tunable-parameter name to its candidate values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSpace {
    params: Vec<(&'static str, Vec<u32>)>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter with the given candidate values.
    pub fn with(mut self, name: &'static str, values: Vec<u32>) -> Self {
        self.params.push((name, values));
        self
    }

    /// Space of vector-style kernels: `vlength` over the multiples of 32 up to 1024.
    pub fn vector() -> Self {
        Self::new().with(VLENGTH, block_sizes())
    }

    /// Space of threaded kernels: `nthreads` over the multiples of 32 up to 1024, crossed with
    /// `slength` over the powers of two up to 16.
    pub fn threaded() -> Self {
        Self::new()
            .with(NTHREADS, block_sizes())
            .with(SLENGTH, (0..=MAX_SUBGROUP_EXP).map(|e| 1 << e).collect())
    }

    pub fn params(&self) -> impl Iterator<Item = (&'static str, &[u32])> {
        self.params.iter().map(|(name, values)| (*name, values.as_slice()))
    }

    pub fn get(&self, name: &str) -> Option<&[u32]> {
        self.params()
            .find(|(param, _)| *param == name)
            .map(|(_, values)| values)
    }

    /// Checks that every parameter has at least one candidate and that all of them are positive.
    pub fn validate(&self) -> Result<()> {
        for (name, values) in self.params() {
            if values.is_empty() {
                return Err(TuneError::EmptySearchSpace(name.to_owned()));
            }
            if let Some(&value) = values.iter().find(|v| **v == 0) {
                return Err(TuneError::NonPositiveValue {
                    param: name.to_owned(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Number of configurations in the cross product.
    pub fn len(&self) -> usize {
        self.params.iter().map(|(_, values)| values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates the cross product, the last parameter varying fastest.
    pub fn configurations(&self) -> Vec<Configuration> {
        let mut configs = vec![Configuration::default()];
        for (name, values) in self.params() {
            configs = configs
                .iter()
                .flat_map(|config| {
                    values.iter().map(move |&value| {
                        let mut next = config.clone();
                        next.values.push((name, value));
                        next
                    })
                })
                .collect();
        }
        configs
    }
}

/// One point of a [`SearchSpace`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    values: Vec<(&'static str, u32)>,
}

impl Configuration {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.values
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| *value)
    }

    /// Number of elements processed together under this configuration.
    pub fn block_len(&self) -> usize {
        self.values.iter().map(|(_, value)| *value as usize).product()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.values {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

fn block_sizes() -> Vec<u32> {
    (1..=MAX_BLOCK_SIZE / WARP_SIZE).map(|i| WARP_SIZE * i).collect()
}
