//! Property-based tests using proptest.
//!
//! These tests verify invariants that must hold for all valid inputs,
//! rather than checking specific numerical values:
//!   - power bounds for both aggregation strategies
//!   - the cutoff index formula
//!   - distribution lengths
//!   - symmetry of permuted label distance matrices

use proptest::prelude::*;
use rand::{Rng, SeedableRng};

use powersim_core::ksample::{k_sample_transform, LabelEncoding};
use powersim_core::permutation::{run_permutations, PermutationTask, Sequential, Topology};
use powersim_core::power::{cutoff_index, estimate_power, PowerAggregation};
use powersim_core::rng::{RandomStreams, StreamRng};
use powersim_core::stats::MeanDifference;
use powersim_linalg::{pairwise_distances, DenseMatrix, Metric};
use powersim_sims::FOUR_SAMPLE_WAYS;

fn random_vec(rng: &mut rand_chacha::ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect()
}

// ---------------------------------------------------------------------------
// 1. Power must lie in [0, 1]; smoothed power is strictly positive
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_power_in_unit_interval(
        reps in 1usize..300,
        alpha in 0.001f64..0.5,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let alt = random_vec(&mut rng, reps);
        let null = random_vec(&mut rng, reps);

        let smoothed =
            estimate_power(alt.clone(), null.clone(), alpha, PowerAggregation::Smoothed).unwrap();
        prop_assert!(smoothed.power > 0.0, "smoothed power = {}", smoothed.power);
        prop_assert!(smoothed.power <= 1.0, "smoothed power = {}", smoothed.power);
        prop_assert!(smoothed.cutoff_index < reps);

        let floored = estimate_power(alt, null, alpha, PowerAggregation::FlooredRaw).unwrap();
        prop_assert!(floored.power >= 1.0 / reps as f64);
        prop_assert!(floored.power <= 1.0);
        prop_assert_eq!(smoothed.count, floored.count);
    }
}

// ---------------------------------------------------------------------------
// 2. Floored power is exactly 1/reps when nothing rejects
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_floored_power_when_no_rejections(
        reps in 2usize..500,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let null: Vec<f64> = random_vec(&mut rng, reps);
        // Every alternate sits below the smallest null statistic
        let alt: Vec<f64> = random_vec(&mut rng, reps).iter().map(|v| v - 10.0).collect();

        let est = estimate_power(alt, null, 0.05, PowerAggregation::FlooredRaw).unwrap();
        prop_assert_eq!(est.count, 0);
        prop_assert_eq!(est.power, 1.0 / reps as f64);
    }
}

// ---------------------------------------------------------------------------
// 3. Cutoff index is ceil(reps * (1 - alpha))
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_cutoff_index_bounds(
        reps in 1usize..20_000,
        alpha in 0.001f64..0.999,
    ) {
        let idx = cutoff_index(reps, alpha);
        let exact = reps as f64 * (1.0 - alpha);
        prop_assert!(idx as f64 >= exact);
        prop_assert!((idx as f64) < exact + 1.0);
        prop_assert!(idx <= reps);
    }
}

// ---------------------------------------------------------------------------
// 4. Both distributions have exactly `reps` entries
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    #[test]
    fn prop_distribution_lengths_match_reps(
        reps in 1usize..40,
        n in 3usize..12,
        seed in 0u64..1000,
    ) {
        let generator = move |rng: &mut StreamRng| -> powersim_core::Result<Vec<DenseMatrix>> {
            let a: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
            let b: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() + 0.3).collect();
            Ok(vec![DenseMatrix::from_col(&a), DenseMatrix::from_col(&b)])
        };
        let task = PermutationTask {
            generator: &generator,
            test: &MeanDifference,
            topology: Topology::Standard,
            streams: RandomStreams::derive(Some(seed), reps),
        };
        let dists = run_permutations(&task, &Sequential).unwrap();
        prop_assert_eq!(dists.alternate.len(), reps);
        prop_assert_eq!(dists.null.len(), reps);
    }
}

// ---------------------------------------------------------------------------
// 5. A symmetric permutation of the label distances stays symmetric with a
//    zero diagonal
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_permuted_label_distances_symmetric(
        n in 2usize..15,
        seed in 0u64..1000,
    ) {
        use rand::seq::SliceRandom;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

        let groups: Vec<DenseMatrix> = (0..4)
            .map(|_| {
                let xs = random_vec(&mut rng, n * 2);
                DenseMatrix::from_row_major(n, 2, &xs)
            })
            .collect();
        let (_, v) =
            k_sample_transform(&groups, LabelEncoding::OneHot, Some(&FOUR_SAMPLE_WAYS[..]))
                .unwrap();
        let v_dist = pairwise_distances(&v, Metric::SqEuclidean);

        let mut order: Vec<usize> = (0..v_dist.nrows()).collect();
        order.shuffle(&mut rng);
        let permuted = v_dist.permute_symmetric(&order).unwrap();

        prop_assert!(permuted.is_symmetric(0.0));
        prop_assert!(permuted.diag().iter().all(|&d| d == 0.0));
        // Label distances between 2x2 factor levels are 0, 1 or 2
        for i in 0..permuted.nrows() {
            for j in 0..permuted.ncols() {
                let d = permuted.get(i, j);
                prop_assert!(d == 0.0 || d == 1.0 || d == 2.0, "d = {}", d);
            }
        }
    }
}
