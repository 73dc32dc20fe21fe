#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
// ============================================================================
// Curve Property Tests
// ============================================================================
//
// Randomized checks of the invariants every Uplift/Qini curve must satisfy,
// using seeded RNGs so failures are reproducible. Scores are drawn from a
// small set of values so that most samples contain tied blocks.
//
// ============================================================================

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uplift_core::{
    Average, Curve, TopK, auqc, auuc, qini_curve, rank_by_score, trapezoid, uplift_at_k,
    uplift_curve,
};

const NUM_TRIALS: u64 = 200;

struct Sample {
    outcome: Vec<f64>,
    score: Vec<f64>,
    treatment: Vec<u8>,
}

fn random_sample(rng: &mut StdRng, treated_share: f64) -> Sample {
    let n = rng.random_range(1..60);
    let mut sample = Sample {
        outcome: Vec::with_capacity(n),
        score: Vec::with_capacity(n),
        treatment: Vec::with_capacity(n),
    };
    for _ in 0..n {
        sample.outcome.push(f64::from(rng.random_range(0..2_u8)));
        sample.score.push(f64::from(rng.random_range(0..8_u8)) / 8.0);
        sample
            .treatment
            .push(u8::from(rng.random_bool(treated_share)));
    }
    sample
}

fn curves(sample: &Sample) -> [Curve; 2] {
    [
        uplift_curve(&sample.outcome, &sample.score, &sample.treatment).unwrap(),
        qini_curve(&sample.outcome, &sample.score, &sample.treatment).unwrap(),
    ]
}

#[test]
fn test_curves_start_at_origin() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        for curve in curves(&sample) {
            assert_eq!(curve.counts[0], 0, "{:?} does not start at 0", curve.kind);
            assert_eq!(curve.values[0], 0.0, "{:?} does not start at 0", curve.kind);
        }
    }
}

#[test]
fn test_counts_strictly_increase_to_population() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        for curve in curves(&sample) {
            assert_eq!(curve.counts.len(), curve.values.len());
            assert!(
                curve.counts.windows(2).all(|w| w[0] < w[1]),
                "counts not strictly increasing: {:?}",
                curve.counts
            );
            assert_eq!(curve.counts.last(), Some(&sample.outcome.len()));
        }
    }
}

#[test]
fn test_tied_blocks_are_never_split() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        let ranked = rank_by_score(&sample.outcome, &sample.score, &sample.treatment).unwrap();
        let distinct_scores = ranked.score.windows(2).filter(|w| w[0] != w[1]).count() + 1;
        for curve in curves(&sample) {
            // One point per distinct score plus the origin
            assert_eq!(curve.len(), distinct_scores + 1);
            for &count in &curve.counts[1..curve.len() - 1] {
                assert_ne!(
                    ranked.score[count - 1],
                    ranked.score[count],
                    "curve point at {count} splits a tie"
                );
            }
        }
    }
}

#[test]
fn test_single_group_never_produces_nan() {
    let mut rng = StdRng::seed_from_u64(4);
    for treated_share in [0.0, 1.0] {
        for _ in 0..NUM_TRIALS {
            let sample = random_sample(&mut rng, treated_share);
            for curve in curves(&sample) {
                assert!(
                    curve.values.iter().all(|v| v.is_finite()),
                    "non-finite value in {:?}: {:?}",
                    curve.kind,
                    curve.values
                );
            }
            assert!(auuc(&sample.outcome, &sample.score, &sample.treatment).unwrap().is_finite());
            assert!(auqc(&sample.outcome, &sample.score, &sample.treatment).unwrap().is_finite());
        }
    }
}

#[test]
fn test_final_points_match_whole_population() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        let (mut sum_treated, mut sum_control) = (0.0, 0.0);
        let (mut num_treated, mut num_control) = (0_usize, 0_usize);
        for (&y, &t) in sample.outcome.iter().zip(sample.treatment.iter()) {
            if t == 1 {
                sum_treated += y;
                num_treated += 1;
            } else {
                sum_control += y;
                num_control += 1;
            }
        }
        let rate = |sum: f64, count: usize| if count == 0 { 0.0 } else { sum / count as f64 };
        let expected_qini = sum_treated - sum_control * rate(num_treated as f64, num_control);
        let expected_uplift = (rate(sum_treated, num_treated) - rate(sum_control, num_control))
            * sample.outcome.len() as f64;

        let [uplift, qini] = curves(&sample);
        let uplift_last = *uplift.values.last().unwrap();
        let qini_last = *qini.values.last().unwrap();
        assert!(
            (uplift_last - expected_uplift).abs() < 1e-9,
            "uplift: {uplift_last} vs {expected_uplift}"
        );
        assert!(
            (qini_last - expected_qini).abs() < 1e-9,
            "qini: {qini_last} vs {expected_qini}"
        );
    }
}

#[test]
fn test_curves_are_permutation_invariant() {
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        let mut order: Vec<usize> = (0..sample.outcome.len()).collect();
        order.shuffle(&mut rng);
        let shuffled = Sample {
            outcome: order.iter().map(|&i| sample.outcome[i]).collect(),
            score: order.iter().map(|&i| sample.score[i]).collect(),
            treatment: order.iter().map(|&i| sample.treatment[i]).collect(),
        };
        // Outcomes are 0/1, so the running sums are exact regardless of order within ties
        assert_eq!(curves(&sample), curves(&shuffled));
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..NUM_TRIALS {
        let mut sample = random_sample(&mut rng, 0.5);
        // Real-valued outcomes make summation order observable
        for y in &mut sample.outcome {
            *y += rng.random_range(-1.0..1.0);
        }
        for (first, second) in curves(&sample).iter().zip(curves(&sample).iter()) {
            let first_bits: Vec<u64> = first.values.iter().map(|v| v.to_bits()).collect();
            let second_bits: Vec<u64> = second.values.iter().map(|v| v.to_bits()).collect();
            assert_eq!(first.counts, second.counts);
            assert_eq!(first_bits, second_bits);
        }
        if sample.outcome.len() > 2 {
            let k = TopK::Fraction(0.5);
            let a = uplift_at_k(&sample.outcome, &sample.score, &sample.treatment, k, Average::Group);
            let b = uplift_at_k(&sample.outcome, &sample.score, &sample.treatment, k, Average::Group);
            assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
        }
    }
}

#[test]
fn test_areas_integrate_the_curves() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..NUM_TRIALS {
        let sample = random_sample(&mut rng, 0.5);
        let [uplift, qini] = curves(&sample);
        let x: Vec<f64> = uplift.counts.iter().map(|&c| c as f64).collect();
        assert_eq!(
            auuc(&sample.outcome, &sample.score, &sample.treatment).unwrap(),
            trapezoid(&x, &uplift.values).unwrap()
        );
        let x: Vec<f64> = qini.counts.iter().map(|&c| c as f64).collect();
        assert_eq!(
            auqc(&sample.outcome, &sample.score, &sample.treatment).unwrap(),
            trapezoid(&x, &qini.values).unwrap()
        );
    }
}
