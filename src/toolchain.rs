//! Backends and their compilation toolchains.
//!
//! The directive parser, the code generator and the compilers are external collaborators. This
//! module describes what is handed to them: the preprocessor definitions spliced in front of the
//! generated code (starting with the `#include`/`#define` lines of the kernel source), the
//! compiler and its flags, and lookups into the tables produced by the directive parser.

use crate::{
    consts::SCALAR,
    error::{Result, TuneError},
    kernels::KernelKind,
    precision::PrecisionMode,
};

use clap::ValueEnum;

use std::{collections::HashMap, fmt};

/// Directive family of the kernel source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// OpenMP target offloading.
    #[value(name = "openmp")]
    OpenMp,
    /// OpenACC.
    #[value(name = "openacc")]
    OpenAcc,
}

impl Backend {
    pub fn toolchain(self) -> Toolchain {
        match self {
            Self::OpenMp => Toolchain {
                compiler: "nvc++",
                options: &["-fast", "-mp=gpu", "-I.", "-I.."],
            },
            Self::OpenAcc => Toolchain {
                compiler: "nvfortran",
                options: &["-fast", "-acc=gpu"],
            },
        }
    }

    /// Whether kernels of this backend take the array size as a trailing call argument.
    pub fn passes_size(self) -> bool {
        matches!(self, Self::OpenAcc)
    }

    /// Kernel source read when none is given on the command line.
    pub fn default_source(self) -> &'static str {
        match self {
            Self::OpenMp => "OMPStream.cpp",
            Self::OpenAcc => "ACCStream.cpp",
        }
    }

    /// Preprocessor lines of `source` carried over into the generated code.
    ///
    /// Only OpenMP sources contribute; OpenACC kernels start from the element type alone.
    pub fn extract_preprocessor(self, source: &str) -> Vec<String> {
        match self {
            Self::OpenMp => extract_preprocessor(source),
            Self::OpenAcc => Vec::new(),
        }
    }

    /// Definitions specific to the backend, appended after the element type.
    fn extra_definitions(self) -> &'static [&'static str] {
        match self {
            Self::OpenMp => &["#define OMP_TARGET_GPU\n"],
            Self::OpenAcc => &[],
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMp => write!(f, "openmp"),
            Self::OpenAcc => write!(f, "openacc"),
        }
    }
}

/// Compiler executable and flags, passed through unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: &'static str,
    pub options: &'static [&'static str],
}

/// Returns the `#include` and `#define` lines of `source`, in order and newline-terminated.
pub fn extract_preprocessor(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("#include") || line.starts_with("#define"))
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Builds the preprocessor lines of a run.
///
/// `extracted` holds the lines taken from the kernel source; the element type, the backend
/// definitions and the `scalar` literal follow them.
pub fn preprocessor(
    extracted: &[String],
    backend: Backend,
    precision: PrecisionMode,
) -> Vec<String> {
    let mut lines = extracted.to_vec();
    lines.push(format!("#define T {}\n", precision.type_name()));
    lines.extend(backend.extra_definitions().iter().map(|l| l.to_string()));
    lines.push(format!("#define scalar {}\n", precision.literal(SCALAR)));
    lines
}

/// Directive tables of a kernel source, keyed by kernel name.
#[derive(Clone, Debug, Default)]
pub struct DirectiveTables {
    pub signatures: HashMap<String, String>,
    pub functions: HashMap<String, String>,
    pub data: HashMap<String, String>,
}

/// Everything the code generator needs for one kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelDirectives<'a> {
    pub signature: &'a str,
    pub body: &'a str,
    pub data: &'a str,
}

impl DirectiveTables {
    pub fn kernel(&self, kind: KernelKind) -> Result<KernelDirectives<'_>> {
        Ok(KernelDirectives {
            signature: lookup(&self.signatures, "signature", kind)?,
            body: lookup(&self.functions, "function", kind)?,
            data: lookup(&self.data, "data", kind)?,
        })
    }
}

fn lookup<'a>(
    entries: &'a HashMap<String, String>,
    table: &'static str,
    kind: KernelKind,
) -> Result<&'a str> {
    entries
        .get(kind.name())
        .map(String::as_str)
        .ok_or_else(|| TuneError::MissingDirective {
            table,
            kernel: kind.name().to_owned(),
        })
}

/// Directive code generator: turns one kernel's directives into compilable source.
pub trait CodeGenerator {
    fn generate(
        &self,
        preprocessor: &[String],
        directives: KernelDirectives<'_>,
        user_dimensions: &[(&'static str, i32)],
    ) -> String;
}
