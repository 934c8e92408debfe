//! End-to-end tests of the power entry points.
//!
//! Each module exercises one public entry point through the full
//! pipeline: stream derivation, generation, transform, statistics,
//! permutation and aggregation.

use powersim_core::error::{ErrorKind, PowerError, Stage};
use powersim_core::power::{
    power_2samp, power_2samp_estimate, power_4samp_2way_epsweight,
    power_4samp_2way_epsweight_estimate, simulate_power, FourSampleParams, PowerAggregation,
    PowerConfig, TwoSampleParams,
};
use powersim_core::rng::StreamRng;
use powersim_core::stats::{IndependenceTest, MeanDifference, TestKind, TestOptions};
use powersim_core::{LabelEncoding, Topology, Workers};
use powersim_linalg::DenseMatrix;

fn seeded(reps: usize, seed: u64) -> PowerConfig {
    PowerConfig {
        reps,
        seed: Some(seed),
        ..Default::default()
    }
}

mod reproducibility {
    use super::*;

    #[test]
    fn test_same_seed_same_estimate() {
        let params = TwoSampleParams {
            n: 20,
            ..Default::default()
        };
        let a = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(80, 17)).unwrap();
        let b = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(80, 17)).unwrap();
        assert_eq!(a, b);

        let c = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(80, 18)).unwrap();
        assert_ne!(a.alt_dist, c.alt_dist);
    }

    #[test]
    fn test_worker_count_does_not_change_distributions() {
        let params = TwoSampleParams {
            n: 15,
            p: 2,
            sim: "quadratic".parse().unwrap(),
            ..Default::default()
        };
        let sequential = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(100, 5)).unwrap();
        let parallel = power_2samp_estimate(
            &TestKind::Dcorr,
            &params,
            &PowerConfig {
                workers: Workers::from_count(4).unwrap(),
                ..seeded(100, 5)
            },
        )
        .unwrap();
        assert_eq!(sequential.alt_dist, parallel.alt_dist);
        assert_eq!(sequential.null_dist, parallel.null_dist);
        assert_eq!(sequential.power, parallel.power);
    }

    #[test]
    fn test_four_sample_worker_invariance_multiway() {
        let params = FourSampleParams {
            n: 8,
            epsilon1: 1.0,
            multiway: true,
            ..Default::default()
        };
        let sequential =
            power_4samp_2way_epsweight_estimate(&TestKind::Dcorr, &params, &seeded(40, 6))
                .unwrap();
        let parallel = power_4samp_2way_epsweight_estimate(
            &TestKind::Dcorr,
            &params,
            &PowerConfig {
                workers: Workers::All,
                ..seeded(40, 6)
            },
        )
        .unwrap();
        assert_eq!(sequential.alt_dist, parallel.alt_dist);
        assert_eq!(sequential.null_dist, parallel.null_dist);
    }
}

mod mean_shift {
    use super::*;
    use rand::distributions::Distribution;
    use statrs::distribution::Normal;

    fn power_at(delta: f64) -> f64 {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let generator = move |rng: &mut StreamRng| -> powersim_core::Result<Vec<DenseMatrix>> {
            let a: Vec<f64> = (0..20).map(|_| normal.sample(rng)).collect();
            let b: Vec<f64> = (0..20).map(|_| normal.sample(rng) + delta).collect();
            Ok(vec![DenseMatrix::from_col(&a), DenseMatrix::from_col(&b)])
        };
        simulate_power(
            &generator,
            &TestKind::MeanDifference,
            &TestOptions::default(),
            Topology::Standard,
            &seeded(500, 99),
            PowerAggregation::Smoothed,
        )
        .unwrap()
        .power
    }

    #[test]
    fn test_power_increases_with_effect_size() {
        let powers: Vec<f64> = [0.0, 0.5, 1.0, 1.5, 2.0].iter().map(|&d| power_at(d)).collect();
        for w in powers.windows(2) {
            assert!(w[1] >= w[0], "power not monotone: {:?}", powers);
        }
        assert!(powers[0] < powers[4], "{:?}", powers);
        // Size under the null stays near alpha; full power at the largest shift
        assert!(powers[0] < 0.15, "{:?}", powers);
        assert!(powers[4] > 0.9, "{:?}", powers);
    }
}

mod aggregation {
    use super::*;

    /// Larger mean differences give smaller statistics, so the observed
    /// statistic never reaches the permutation cutoff.
    struct NegatedMeanDifference;

    impl IndependenceTest for NegatedMeanDifference {
        fn name(&self) -> &str {
            "negated_mean_difference"
        }

        fn statistic(&self, x: &DenseMatrix, y: &DenseMatrix) -> powersim_core::Result<f64> {
            Ok(-MeanDifference.statistic(x, y)?)
        }
    }

    #[test]
    fn test_floored_power_when_nothing_rejects() {
        let builder = |_: &TestOptions| -> powersim_core::Result<Box<dyn IndependenceTest>> {
            Ok(Box::new(NegatedMeanDifference))
        };
        let params = FourSampleParams {
            n: 20,
            epsilon1: 5.0,
            epsilon2: 5.0,
            ..Default::default()
        };
        let est = power_4samp_2way_epsweight_estimate(&builder, &params, &seeded(50, 7)).unwrap();
        assert_eq!(est.aggregation, PowerAggregation::FlooredRaw);
        assert_eq!(est.count, 0);
        assert_eq!(est.power, 1.0 / 50.0);
    }

    #[test]
    fn test_default_cutoff_index() {
        let params = TwoSampleParams {
            n: 10,
            ..Default::default()
        };
        let est = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(1000, 1)).unwrap();
        assert_eq!(est.cutoff_index, 950);
        assert_eq!(est.alt_dist.len(), 1000);
        assert_eq!(est.null_dist.len(), 1000);
    }
}

mod errors {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_multilevel_structure_rejected() {
        let params = FourSampleParams {
            structure: "multilevel".parse().unwrap(),
            ..Default::default()
        };
        let err = power_4samp_2way_epsweight(&TestKind::Dcorr, &params, &seeded(10, 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(err, PowerError::UnsupportedStructure(_)));
    }

    /// Succeeds on the first call and fails on every later one.
    struct FailsAfterFirst(AtomicUsize);

    impl IndependenceTest for FailsAfterFirst {
        fn name(&self) -> &str {
            "fails_after_first"
        }

        fn statistic(&self, _: &DenseMatrix, _: &DenseMatrix) -> powersim_core::Result<f64> {
            if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(1.0)
            } else {
                Err(PowerError::Statistic {
                    test: self.name().to_string(),
                    reason: "second call".into(),
                })
            }
        }
    }

    #[test]
    fn test_failure_reports_index_and_stage() {
        let builder = |_: &TestOptions| -> powersim_core::Result<Box<dyn IndependenceTest>> {
            Ok(Box::new(FailsAfterFirst(AtomicUsize::new(0))))
        };
        let params = TwoSampleParams {
            n: 10,
            ..Default::default()
        };
        let err = power_2samp(&builder, &params, &seeded(10, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
        match err {
            PowerError::Repetition { index, stage, .. } => {
                assert_eq!(index, 0);
                assert_eq!(stage, Stage::Permute);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    struct Panics;

    impl IndependenceTest for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn statistic(&self, _: &DenseMatrix, _: &DenseMatrix) -> powersim_core::Result<f64> {
            panic!("statistic exploded")
        }
    }

    #[test]
    fn test_worker_panic_is_resource_error() {
        let builder = |_: &TestOptions| -> powersim_core::Result<Box<dyn IndependenceTest>> {
            Ok(Box::new(Panics))
        };
        let params = TwoSampleParams {
            n: 10,
            ..Default::default()
        };
        let config = PowerConfig {
            workers: Workers::from_count(2).unwrap(),
            ..seeded(8, 3)
        };
        let err = power_2samp(&builder, &params, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
        assert!(matches!(err, PowerError::WorkerPanic { index: 0, .. }));
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            "hhg".parse::<TestKind>(),
            Err(PowerError::UnknownTest(_))
        ));
        assert!("spiral".parse::<powersim_sims::IndepSim>().is_err());
    }
}

mod label_encoding {
    use super::*;

    /// Accepts only a single ordinal label column.
    struct OrdinalOnly;

    impl IndependenceTest for OrdinalOnly {
        fn name(&self) -> &str {
            "ordinal_only"
        }

        fn statistic(&self, x: &DenseMatrix, y: &DenseMatrix) -> powersim_core::Result<f64> {
            if y.ncols() != 1 {
                return Err(PowerError::Statistic {
                    test: self.name().to_string(),
                    reason: format!("expected 1 label column, got {}", y.ncols()),
                });
            }
            MeanDifference.statistic(x, y)
        }

        fn label_encoding(&self) -> LabelEncoding {
            LabelEncoding::Ordinal
        }
    }

    #[test]
    fn test_ordinal_tests_receive_ordinal_labels() {
        let builder = |_: &TestOptions| -> powersim_core::Result<Box<dyn IndependenceTest>> {
            Ok(Box::new(OrdinalOnly))
        };
        let params = TwoSampleParams {
            n: 12,
            ..Default::default()
        };
        let power = power_2samp(&builder, &params, &seeded(20, 4)).unwrap();
        assert!(power > 0.0 && power <= 1.0);
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_estimate_serializes_to_json() {
        let params = TwoSampleParams {
            n: 10,
            ..Default::default()
        };
        let est = power_2samp_estimate(&TestKind::Dcorr, &params, &seeded(25, 9)).unwrap();
        let json = serde_json::to_string_pretty(&est).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reps"], 25);
        assert_eq!(value["aggregation"], "smoothed");
        assert_eq!(value["alt_dist"].as_array().unwrap().len(), 25);
        assert_eq!(value["null_dist"].as_array().unwrap().len(), 25);
        assert_eq!(value["cutoff_index"], 24);
    }
}
