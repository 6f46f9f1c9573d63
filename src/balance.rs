//! Class balancing by majority-class downsampling.

use rand::prelude::*;

use crate::data::record::{Category, CleanedRecord};
use crate::error::{AegisError, Result};

/// Downsample each label group to the size of the smallest group.
///
/// Each group is shuffled with a `StdRng` seeded from `seed` and sliced
/// without replacement, so the same seed reproduces the same subset.
/// The output concatenates groups in [`Category::ALL`] order: Negative,
/// then Neutral, then Positive.
///
/// Fails with `InsufficientData` when any label group is empty; a
/// degenerate empty dataset must never be produced silently.
pub fn balance(records: &[CleanedRecord], seed: u64) -> Result<Vec<CleanedRecord>> {
    let mut groups: [Vec<&CleanedRecord>; Category::COUNT] = Default::default();
    for record in records {
        groups[record.category.index()].push(record);
    }

    for category in Category::ALL {
        let count = groups[category.index()].len();
        if count == 0 {
            return Err(AegisError::insufficient_data(category.name(), count, 1));
        }
    }

    let target = groups.iter().map(Vec::len).min().unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut balanced = Vec::with_capacity(target * Category::COUNT);

    for category in Category::ALL {
        let group = &mut groups[category.index()];
        group.shuffle(&mut rng);
        balanced.extend(group.iter().take(target).map(|r| (*r).clone()));
    }

    Ok(balanced)
}
