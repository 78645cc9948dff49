use std::collections::BTreeMap;

use crate::models::{CategoryCount, Dataset, Medians, QuadrantCategory};
use crate::stats;

pub fn medians(dataset: &Dataset) -> Option<Medians> {
    Some(Medians {
        time_minutes: stats::median(&dataset.times())?,
        score: stats::median(&dataset.scores())?,
    })
}

/// Places one attempt relative to the medians. Ties on score count as high
/// achievers, ties on time count as slow.
pub fn categorize(time_minutes: f64, score: f64, medians: &Medians) -> QuadrantCategory {
    let high_score = score >= medians.score;
    let fast = time_minutes < medians.time_minutes;
    match (high_score, fast) {
        (true, true) => QuadrantCategory::FastHighAchiever,
        (true, false) => QuadrantCategory::DiligentHighAchiever,
        (false, true) => QuadrantCategory::Rusher,
        (false, false) => QuadrantCategory::Struggler,
    }
}

/// Categories parallel to `dataset.records`.
pub fn segment_by_quadrant(dataset: &Dataset, medians: &Medians) -> Vec<QuadrantCategory> {
    dataset
        .records
        .iter()
        .map(|r| categorize(r.time_minutes, r.score, medians))
        .collect()
}

/// Frequency of each category present, most common first. Equal counts keep
/// the enumeration order.
pub fn count_by_category(categories: &[QuadrantCategory]) -> Vec<CategoryCount> {
    let mut map: BTreeMap<QuadrantCategory, usize> = BTreeMap::new();
    for category in categories {
        *map.entry(*category).or_insert(0) += 1;
    }

    let mut counts: Vec<CategoryCount> = map
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            label: category.label(),
            count,
        })
        .collect();

    // stable sort keeps the BTreeMap (enumeration) order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
