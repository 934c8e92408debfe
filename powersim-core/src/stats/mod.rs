//! Test statistics.
//!
//! A test is anything that maps two arrays with matching row counts to a
//! real statistic where larger values mean stronger evidence against
//! independence. The power engine never inspects which test it is
//! holding; tests that need a different label layout say so through
//! `label_encoding`.

pub mod dcorr;
pub mod mean_diff;

use std::fmt;
use std::str::FromStr;

use powersim_linalg::DenseMatrix;

use crate::error::{PowerError, Result};
use crate::ksample::LabelEncoding;

pub use dcorr::Dcorr;
pub use mean_diff::MeanDifference;

/// An independence test statistic.
pub trait IndependenceTest: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Test statistic for `x` against `y`.
    fn statistic(&self, x: &DenseMatrix, y: &DenseMatrix) -> Result<f64>;

    /// Label layout this test expects from the k-sample transform.
    fn label_encoding(&self) -> LabelEncoding {
        LabelEncoding::OneHot
    }
}

/// Construction options passed to a test builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOptions {
    /// When false, inputs are precomputed distance matrices.
    pub compute_distance: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            compute_distance: true,
        }
    }
}

/// Builds a test instance for one power estimate.
pub trait TestBuilder: Send + Sync {
    fn build(&self, options: &TestOptions) -> Result<Box<dyn IndependenceTest>>;
}

impl<F> TestBuilder for F
where
    F: Fn(&TestOptions) -> Result<Box<dyn IndependenceTest>> + Send + Sync,
{
    fn build(&self, options: &TestOptions) -> Result<Box<dyn IndependenceTest>> {
        self(options)
    }
}

/// Built-in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Dcorr,
    MeanDifference,
}

impl TestKind {
    pub fn name(self) -> &'static str {
        match self {
            TestKind::Dcorr => "dcorr",
            TestKind::MeanDifference => "mean_difference",
        }
    }
}

impl TestBuilder for TestKind {
    fn build(&self, options: &TestOptions) -> Result<Box<dyn IndependenceTest>> {
        match self {
            TestKind::Dcorr => Ok(Box::new(Dcorr::new(options.compute_distance))),
            TestKind::MeanDifference => {
                if !options.compute_distance {
                    return Err(PowerError::InvalidParameter {
                        name: "compute_distance",
                        reason: "mean_difference needs raw observations, not distances".into(),
                    });
                }
                Ok(Box::new(MeanDifference))
            }
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestKind {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "dcorr" => Ok(TestKind::Dcorr),
            "mean_difference" | "meandiff" => Ok(TestKind::MeanDifference),
            _ => Err(PowerError::UnknownTest(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("dcorr".parse::<TestKind>().unwrap(), TestKind::Dcorr);
        assert_eq!(
            "Mean-Difference".parse::<TestKind>().unwrap(),
            TestKind::MeanDifference
        );
        assert!(matches!(
            "kmerf".parse::<TestKind>(),
            Err(PowerError::UnknownTest(_))
        ));
    }

    #[test]
    fn test_mean_difference_rejects_precomputed_distances() {
        let options = TestOptions {
            compute_distance: false,
        };
        assert!(TestKind::MeanDifference.build(&options).is_err());
        assert!(TestKind::Dcorr.build(&options).is_ok());
    }

    #[test]
    fn test_closure_builder() {
        let builder = |_: &TestOptions| -> Result<Box<dyn IndependenceTest>> {
            Ok(Box::new(MeanDifference))
        };
        let test = builder.build(&TestOptions::default()).unwrap();
        assert_eq!(test.name(), "mean_difference");
        assert_eq!(test.label_encoding(), LabelEncoding::OneHot);
    }
}
