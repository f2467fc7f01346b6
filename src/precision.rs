//! Precision policy.
//!
//! Resolves the floating-point format of a run from the `--float` flag: the C type name spliced
//! into the generated source, the element width in bytes and the suffix appended to scalar
//! literals.

use std::fmt;

/// Floating-point format of the benchmarked arrays (see [IEEE 754][1]).
///
/// [1]: https://en.wikipedia.org/wiki/IEEE_754
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionMode {
    Single,
    Double,
}

impl PrecisionMode {
    /// Resolves the precision from the "use single precision" flag.
    pub fn from_flag(single: bool) -> Self {
        if single {
            Self::Single
        } else {
            Self::Double
        }
    }

    /// Returns the full policy associated with this precision.
    pub fn policy(self) -> PrecisionPolicy {
        match self {
            Self::Single => PrecisionPolicy {
                mode: self,
                type_name: "float",
                element_bytes: 4,
                literal_suffix: "f",
            },
            Self::Double => PrecisionPolicy {
                mode: self,
                type_name: "double",
                element_bytes: 8,
                literal_suffix: "",
            },
        }
    }

    pub fn type_name(self) -> &'static str {
        self.policy().type_name
    }

    pub fn element_bytes(self) -> usize {
        self.policy().element_bytes
    }

    /// Formats `value` as a source literal of this precision, e.g. `0.4f` or `0.4`.
    pub fn literal(self, value: f64) -> String {
        format!("{value}{}", self.policy().literal_suffix)
    }
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
        }
    }
}

/// Everything derived from the precision of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrecisionPolicy {
    pub mode: PrecisionMode,
    /// Name of the element type in the kernel source (`T`).
    pub type_name: &'static str,
    /// Size of one element in bytes.
    pub element_bytes: usize,
    /// Suffix of scalar literals embedded in the kernel source.
    pub literal_suffix: &'static str,
}
