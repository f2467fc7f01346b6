//! Oracle generator.
//!
//! Builds the call arguments of a kernel and the answer its outputs are checked against. Inputs
//! are drawn from the standard normal distribution, outputs are zeroed and the expected values are
//! computed in the precision of the kernel under test.

use crate::{
    config::RunConfig,
    consts::SCALAR,
    error::{Result, TuneError},
    kernels::{host, KernelKind, Slot},
    metrics::MetricSet,
    utils::seeded_rng,
    StreamFloat,
};

/// Positional call argument of a kernel.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument<T> {
    Array(Vec<T>),
    Scalar(T),
    /// Element count, as a 32-bit integer.
    Size(i32),
}

impl<T> Argument<T> {
    pub fn as_array(&self) -> Option<&[T]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// Expected value of one argument after the kernel ran.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer<T> {
    Checked(Vec<T>),
    /// Don't-care: the argument is not validated.
    Unchecked,
}

/// Arguments, oracle and metrics of one kernel for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkCase<T> {
    pub kernel: KernelKind,
    pub size: i32,
    pub args: Vec<Argument<T>>,
    /// One entry per argument, `None` when the kernel has no correctness oracle.
    pub answer: Option<Vec<Answer<T>>>,
    pub metrics: MetricSet,
}

impl<T: StreamFloat> BenchmarkCase<T> {
    /// Generates the case of `kernel` under `config`.
    pub fn generate(kernel: KernelKind, config: &RunConfig) -> Result<Self> {
        debug_assert_eq!(T::PRECISION, config.precision);
        let spec = kernel.spec();
        let len = config.len();
        let mut rng = seeded_rng(config.seed);

        let passes_size = config.backend.passes_size();
        let mut args = Vec::with_capacity(spec.arity() + usize::from(passes_size));
        args.extend(spec.slots.iter().map(|slot| match slot {
            Slot::Input(_) => Argument::Array(T::randn_vector(len, &mut rng)),
            Slot::Output(_) => Argument::Array(vec![T::zero(); len]),
            Slot::Accumulator(_) => Argument::Scalar(T::zero()),
        }));
        if passes_size {
            args.push(Argument::Size(config.size));
        }

        let answer = match expected(kernel, &args)? {
            Some(expected) => {
                let mut expected = Some(expected);
                let mut answer: Vec<Answer<T>> = spec
                    .slots
                    .iter()
                    .map(|slot| match (slot, spec.checked) {
                        (Slot::Output(name), Some(checked)) if *name == checked => {
                            expected.take().map_or(Answer::Unchecked, Answer::Checked)
                        }
                        _ => Answer::Unchecked,
                    })
                    .collect();
                answer.resize(args.len(), Answer::Unchecked);
                Some(answer)
            }
            None => None,
        };

        Ok(Self {
            kernel,
            size: config.size,
            args,
            answer,
            metrics: MetricSet::for_kernel(kernel),
        })
    }

    /// Positions of the arguments validated against the oracle.
    pub fn checked_positions(&self) -> Vec<usize> {
        self.answer
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, a)| matches!(a, Answer::Checked(_)))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Applies the reference relation of `kernel` to the generated inputs.
fn expected<T: StreamFloat>(kernel: KernelKind, args: &[Argument<T>]) -> Result<Option<Vec<T>>> {
    let scalar = T::from_scalar(SCALAR);
    let arrays: Vec<&[T]> = args.iter().filter_map(Argument::as_array).collect();
    let mut out = vec![T::zero(); arrays.first().map_or(0, |a| a.len())];

    match (kernel, arrays.as_slice()) {
        (KernelKind::Copy, [a, _c]) => host::copy(a, &mut out),
        (KernelKind::Mul, [_b, c]) => host::mul(scalar, c, &mut out),
        (KernelKind::Add, [a, b, _c]) => host::add(a, b, &mut out),
        (KernelKind::Triad, [_a, b, c]) => host::triad(scalar, b, c, &mut out),
        (KernelKind::Dot, [_a, _b]) => return Ok(None),
        _ => return Err(TuneError::ArgumentLayout(kernel.name().to_owned())),
    }
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{config::test_config, precision::PrecisionMode, toolchain::Backend};

    fn array<T>(arg: &Argument<T>) -> &[T] {
        arg.as_array().expect("argument is not an array")
    }

    fn check_relations<T: StreamFloat>(precision: PrecisionMode) {
        let config = test_config(precision, 1000, Backend::OpenMp);
        let scalar = T::from_scalar(0.4);

        let copy = BenchmarkCase::<T>::generate(KernelKind::Copy, &config).unwrap();
        let answer = copy.answer.as_ref().unwrap();
        assert_eq!(answer[1], Answer::Checked(array(&copy.args[0]).to_vec()));

        let mul = BenchmarkCase::<T>::generate(KernelKind::Mul, &config).unwrap();
        let expected: Vec<T> = array(&mul.args[1]).iter().map(|c| *c * scalar).collect();
        assert_eq!(mul.answer.unwrap(), [Answer::Checked(expected), Answer::Unchecked]);

        let add = BenchmarkCase::<T>::generate(KernelKind::Add, &config).unwrap();
        let expected: Vec<T> = array(&add.args[0])
            .iter()
            .zip(array(&add.args[1]))
            .map(|(a, b)| *a + *b)
            .collect();
        assert_eq!(
            add.answer.unwrap(),
            [Answer::Unchecked, Answer::Unchecked, Answer::Checked(expected)]
        );

        let triad = BenchmarkCase::<T>::generate(KernelKind::Triad, &config).unwrap();
        let expected: Vec<T> = array(&triad.args[1])
            .iter()
            .zip(array(&triad.args[2]))
            .map(|(b, c)| *b + scalar * *c)
            .collect();
        assert_eq!(
            triad.answer.unwrap(),
            [Answer::Checked(expected), Answer::Unchecked, Answer::Unchecked]
        );
    }

    #[test]
    fn test_expected_matches_relation_double() {
        check_relations::<f64>(PrecisionMode::Double);
    }

    #[test]
    fn test_expected_matches_relation_single() {
        check_relations::<f32>(PrecisionMode::Single);
    }

    #[test]
    fn test_array_initialization() {
        let config = test_config(PrecisionMode::Double, 512, Backend::OpenMp);
        let triad = BenchmarkCase::<f64>::generate(KernelKind::Triad, &config).unwrap();
        assert!(array(&triad.args[0]).iter().all(|v| *v == 0.0));
        assert!(array(&triad.args[1]).iter().any(|v| *v != 0.0));
        assert!(array(&triad.args[2]).iter().any(|v| *v != 0.0));
        assert_ne!(array(&triad.args[1]), array(&triad.args[2]));
        assert!(triad.args.iter().all(|a| a.as_array().map_or(false, |v| v.len() == 512)));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = test_config(PrecisionMode::Single, 2048, Backend::OpenAcc);
        for kind in KernelKind::ALL {
            let first = BenchmarkCase::<f32>::generate(kind, &config).unwrap();
            let second = BenchmarkCase::<f32>::generate(kind, &config).unwrap();
            assert_eq!(first, second);
        }

        let reseeded = RunConfig { seed: 43, ..config.clone() };
        assert_ne!(
            BenchmarkCase::<f32>::generate(KernelKind::Add, &config).unwrap(),
            BenchmarkCase::<f32>::generate(KernelKind::Add, &reseeded).unwrap()
        );
    }

    #[test]
    fn test_copy_dont_care_slots() {
        let config = test_config(PrecisionMode::Double, 64, Backend::OpenAcc);
        let copy = BenchmarkCase::<f64>::generate(KernelKind::Copy, &config).unwrap();
        assert_eq!(copy.args.len(), 3);
        assert_eq!(copy.args[2], Argument::Size(64));

        let answer = copy.answer.as_ref().unwrap();
        assert_eq!(answer.len(), 3);
        assert_eq!(answer[0], Answer::Unchecked);
        assert_eq!(answer[1], Answer::Checked(array(&copy.args[0]).to_vec()));
        assert_eq!(answer[2], Answer::Unchecked);
        assert_eq!(copy.checked_positions(), [1]);
    }

    #[test]
    fn test_argument_count_follows_arity() {
        for backend in [Backend::OpenMp, Backend::OpenAcc] {
            let config = test_config(PrecisionMode::Double, 8, backend);
            for kind in KernelKind::ALL {
                let case = BenchmarkCase::<f64>::generate(kind, &config).unwrap();
                let trailing = usize::from(backend.passes_size());
                assert_eq!(case.args.len(), kind.spec().arity() + trailing);
            }
        }
    }

    #[test]
    fn test_dot_has_no_oracle() {
        for (precision, backend) in [
            (PrecisionMode::Double, Backend::OpenMp),
            (PrecisionMode::Double, Backend::OpenAcc),
        ] {
            let config = test_config(precision, 128, backend);
            let dot = BenchmarkCase::<f64>::generate(KernelKind::Dot, &config).unwrap();
            assert!(dot.answer.is_none());
            assert!(dot.checked_positions().is_empty());
            assert_eq!(dot.args[0], Argument::Scalar(0.0));
        }
    }

    #[test]
    fn test_non_positive_size() {
        let config = test_config(PrecisionMode::Double, 0, Backend::OpenMp);
        let add = BenchmarkCase::<f64>::generate(KernelKind::Add, &config).unwrap();
        assert!(add.args.iter().all(|a| a.as_array().unwrap().is_empty()));
        assert_eq!(add.answer.unwrap()[2], Answer::Checked(Vec::<f64>::new()));
    }
}
