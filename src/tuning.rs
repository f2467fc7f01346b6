//! Tuning jobs.
//!
//! A [`TuningJob`] bundles everything an execution engine needs to tune one kernel: the generated
//! code, the call arguments and their oracle, the search space, the metrics and the toolchain.

use crate::{
    config::RunConfig,
    error::Result,
    kernels::KernelKind,
    oracle::BenchmarkCase,
    perf_report::TuneReport,
    search_space::SearchSpace,
    toolchain::{self, Backend, CodeGenerator, DirectiveTables, Toolchain},
    StreamFloat,
};

use tracing::debug;

/// Input of a [`TuningEngine`] for one kernel.
#[derive(Clone, Debug)]
pub struct TuningJob<T> {
    pub case: BenchmarkCase<T>,
    pub backend: Backend,
    pub search_space: SearchSpace,
    pub toolchain: Toolchain,
    pub preprocessor: Vec<String>,
    pub user_dimensions: Vec<(&'static str, i32)>,
    /// Source produced by the code generator, if one was attached.
    pub code: Option<String>,
}

impl<T: StreamFloat> TuningJob<T> {
    /// Assembles the job of `kernel`. `extracted` holds the preprocessor lines of the kernel
    /// source.
    pub fn new(kernel: KernelKind, config: &RunConfig, extracted: &[String]) -> Result<Self> {
        let search_space = search_space(kernel, config.backend);
        search_space.validate()?;

        let job = Self {
            case: BenchmarkCase::generate(kernel, config)?,
            backend: config.backend,
            search_space,
            toolchain: config.backend.toolchain(),
            preprocessor: toolchain::preprocessor(extracted, config.backend, config.precision),
            user_dimensions: vec![("array_size", config.size)],
            code: None,
        };
        debug!(
            kernel = %kernel,
            compiler = job.toolchain.compiler,
            options = ?job.toolchain.options,
            preprocessor = ?job.preprocessor,
            configurations = job.search_space.len(),
            "assembled tuning job"
        );
        Ok(job)
    }

    pub fn kernel(&self) -> KernelKind {
        self.case.kernel
    }

    /// Generates the kernel source from the directive tables.
    pub fn attach_code(
        &mut self,
        tables: &DirectiveTables,
        generator: &dyn CodeGenerator,
    ) -> Result<()> {
        let directives = tables.kernel(self.kernel())?;
        self.code = Some(generator.generate(
            &self.preprocessor,
            directives,
            &self.user_dimensions,
        ));
        Ok(())
    }
}

/// Tunable-parameter domain of a kernel under a backend.
///
/// OpenMP tunes thread teams for `copy` and `mul` and the vector length for the other kernels;
/// OpenACC tunes the vector length everywhere.
pub fn search_space(kernel: KernelKind, backend: Backend) -> SearchSpace {
    match (backend, kernel) {
        (Backend::OpenMp, KernelKind::Copy | KernelKind::Mul) => SearchSpace::threaded(),
        _ => SearchSpace::vector(),
    }
}

/// Benchmarks every configuration of a job.
pub trait TuningEngine<T> {
    fn tune(&mut self, job: &mut TuningJob<T>) -> Result<Vec<TuneReport>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        config::test_config,
        error::TuneError,
        precision::PrecisionMode,
        search_space::{NTHREADS, SLENGTH, VLENGTH},
        toolchain::KernelDirectives,
    };

    struct Concat;

    impl CodeGenerator for Concat {
        fn generate(
            &self,
            preprocessor: &[String],
            directives: KernelDirectives<'_>,
            user_dimensions: &[(&'static str, i32)],
        ) -> String {
            let mut code = preprocessor.concat();
            for (name, value) in user_dimensions {
                code.push_str(&format!("#define {name} {value}\n"));
            }
            code.push_str(directives.signature);
            code.push_str(" {\n");
            code.push_str(directives.data);
            code.push('\n');
            code.push_str(directives.body);
            code.push_str("\n}\n");
            code
        }
    }

    fn tables(kernel: KernelKind) -> DirectiveTables {
        let mut tables = DirectiveTables::default();
        let name = kernel.name().to_owned();
        tables
            .signatures
            .insert(name.clone(), format!("void {name}(T *a, T *b, T *c)"));
        tables.functions.insert(
            name.clone(),
            "for (int i = 0; i < array_size; i++) c[i] = a[i] + b[i];".into(),
        );
        tables
            .data
            .insert(name, "#pragma omp target data map(to: a[:array_size])".into());
        tables
    }

    #[test]
    fn test_per_backend_search_spaces() {
        let omp = |k| search_space(k, Backend::OpenMp);
        assert!(omp(KernelKind::Copy).get(NTHREADS).is_some());
        assert!(omp(KernelKind::Mul).get(SLENGTH).is_some());
        assert!(omp(KernelKind::Add).get(VLENGTH).is_some());
        assert!(omp(KernelKind::Triad).get(VLENGTH).is_some());
        assert!(omp(KernelKind::Dot).get(VLENGTH).is_some());
        for kind in KernelKind::ALL {
            let acc = search_space(kind, Backend::OpenAcc);
            assert_eq!(acc, SearchSpace::vector());
        }
    }

    #[test]
    fn test_job_assembly() {
        let config = test_config(PrecisionMode::Single, 256, Backend::OpenMp);
        let job = TuningJob::<f32>::new(KernelKind::Triad, &config, &[]).unwrap();
        assert_eq!(job.kernel(), KernelKind::Triad);
        assert_eq!(job.toolchain.compiler, "nvc++");
        assert_eq!(job.user_dimensions, [("array_size", 256)]);
        assert!(job.preprocessor.contains(&"#define scalar 0.4f\n".to_owned()));
        assert!(job.code.is_none());
    }

    #[test]
    fn test_attach_code() {
        let config = test_config(PrecisionMode::Double, 16, Backend::OpenMp);
        let mut job = TuningJob::<f64>::new(KernelKind::Add, &config, &[]).unwrap();
        job.attach_code(&tables(KernelKind::Add), &Concat).unwrap();

        let code = job.code.unwrap();
        assert!(code.starts_with("#define T double\n#define OMP_TARGET_GPU\n#define scalar 0.4\n"));
        assert!(code.contains("#define array_size 16\n"));
        assert!(code.contains("void add(T *a, T *b, T *c) {"));
    }

    #[test]
    fn test_attach_code_missing_kernel() {
        let config = test_config(PrecisionMode::Double, 16, Backend::OpenMp);
        let mut job = TuningJob::<f64>::new(KernelKind::Dot, &config, &[]).unwrap();
        let res = job.attach_code(&tables(KernelKind::Add), &Concat);
        assert!(matches!(res, Err(TuneError::MissingDirective { table: "signature", .. })));
    }
}
