//! Stratified train/test splitting.

use rand::prelude::*;

use crate::data::record::{Category, CleanedRecord};
use crate::error::{AegisError, Result};

/// A disjoint train/test partition of a dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<CleanedRecord>,
    pub test: Vec<CleanedRecord>,
}

/// Stratified split: within each label group the requested fraction is
/// assigned to the test side, the remainder to train.
///
/// Group shuffles use a `StdRng` seeded from `seed`, so a fixed seed
/// reproduces the same partition. The per-group test count is
/// `round(len * test_fraction)`, clamped so both sides stay non-empty;
/// each class therefore lands within one record of the requested
/// fraction. Every input record appears in exactly one side.
///
/// Fails with `InsufficientData` when a label group has fewer than two
/// records (nothing to stratify).
pub fn split(records: &[CleanedRecord], test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AegisError::invalid_operation(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let mut groups: [Vec<&CleanedRecord>; Category::COUNT] = Default::default();
    for record in records {
        groups[record.category.index()].push(record);
    }

    for category in Category::ALL {
        let count = groups[category.index()].len();
        if count < 2 {
            return Err(AegisError::insufficient_data(category.name(), count, 2));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for category in Category::ALL {
        let group = &mut groups[category.index()];
        group.shuffle(&mut rng);

        let len = group.len();
        let test_count = ((len as f64 * test_fraction).round() as usize).clamp(1, len - 1);

        test.extend(group[..test_count].iter().map(|r| (*r).clone()));
        train.extend(group[test_count..].iter().map(|r| (*r).clone()));
    }

    Ok(Split { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::io::label_distribution;

    fn records(per_class: usize) -> Vec<CleanedRecord> {
        let mut out = Vec::new();
        for category in Category::ALL {
            for i in 0..per_class {
                out.push(CleanedRecord {
                    clean_text: format!("{} text {i}", category.name().to_lowercase()),
                    category,
                });
            }
        }
        out
    }

    #[test]
    fn test_split_coverage_and_disjointness() {
        let input = records(25);
        let split = split(&input, 0.2, 42).unwrap();

        assert_eq!(split.train.len() + split.test.len(), input.len());
        for record in &split.test {
            assert!(
                !split.train.contains(record),
                "record in both sides: {record:?}"
            );
        }
    }

    #[test]
    fn test_split_preserves_class_fractions() {
        let input = records(25);
        let split = split(&input, 0.2, 42).unwrap();

        let test_counts = label_distribution(&split.test);
        for category in Category::ALL {
            let expected = 25.0 * 0.2;
            let actual = test_counts[category.index()] as f64;
            assert!(
                (actual - expected).abs() <= 1.0,
                "class {} test count {actual} too far from {expected}",
                category.name()
            );
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let input = records(20);
        let a = split(&input, 0.2, 9).unwrap();
        let b = split(&input, 0.2, 9).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_split_small_class_fails() {
        let mut input = records(10);
        input.retain(|r| r.category != Category::Positive);
        input.push(CleanedRecord {
            clean_text: "lonely".to_string(),
            category: Category::Positive,
        });

        let result = split(&input, 0.2, 42);
        match result {
            Err(AegisError::InsufficientData {
                class,
                count,
                required,
            }) => {
                assert_eq!(class, "Positive");
                assert_eq!(count, 1);
                assert_eq!(required, 2);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let input = records(10);
        assert!(split(&input, 0.0, 42).is_err());
        assert!(split(&input, 1.0, 42).is_err());
    }

    #[test]
    fn test_split_tiny_groups_keep_both_sides() {
        let input = records(2);
        let split = split(&input, 0.2, 42).unwrap();
        // round(2 * 0.2) = 0 but both sides must stay non-empty.
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 3);
    }
}
