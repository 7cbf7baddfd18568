use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ifs_core::transform::TransformTable;

fn weighted_table(weights: &[f64]) -> TransformTable {
    let rows: Vec<Vec<f64>> = weights
        .iter()
        .map(|&w| vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0, w])
        .collect();
    TransformTable::from_rows(&rows).unwrap()
}

#[test]
fn test_selection_frequency_tracks_weights() {
    let table = weighted_table(&[0.2, 0.3, 0.5]);
    let mut rng = StdRng::seed_from_u64(20_240_817);
    let trials = 100_000usize;
    let mut hits = [0usize; 3];

    for _ in 0..trials {
        let k = rng.gen::<f64>();
        let index = table.select(k).expect("weights sum to 1");
        hits[index] += 1;
    }

    for (hit, expected) in hits.iter().zip([0.2, 0.3, 0.5]) {
        let observed = *hit as f64 / trials as f64;
        assert!(
            (observed - expected).abs() < 0.01,
            "observed {} for expected weight {}",
            observed,
            expected
        );
    }
}

#[test]
fn test_weight_one_override_always_wins() {
    let table = weighted_table(&[0.4, 1.0, 0.6]);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10_000 {
        let k = rng.gen::<f64>() * table.total_weight();
        assert_eq!(table.select(k), Some(1));
    }
    // Even a draw an earlier partial sum already covers.
    assert_eq!(table.select(0.0), Some(1));
    assert_eq!(table.select(0.2), Some(1));
}

#[test]
fn test_first_of_several_weight_one_entries_wins() {
    let table = weighted_table(&[0.4, 1.0, 1.0]);
    for k in [0.0, 0.3, 0.9, 1.7] {
        assert_eq!(table.select(k), Some(1));
    }
}

#[test]
fn test_shortfall_selects_nothing() {
    // Weights sum to 0.6: draws beyond that select no entry.
    let table = weighted_table(&[0.2, 0.4]);
    assert_eq!(table.select(0.61), None);
    assert_eq!(table.select(0.999), None);
    // The flame policy falls back to the last entry instead.
    assert_eq!(table.select_or_last(0.999), 1);
}
