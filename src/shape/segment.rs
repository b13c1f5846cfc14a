use std::ops::Range;

use crate::dataset::StartRecord;

pub const DEFAULT_GAP_THRESHOLD_SECS: f64 = 20.0;

/// What happens to the final record of the sorted sequence when it is
/// split into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BoundaryPolicy {
    /// Every record lands in exactly one segment.
    #[default]
    Inclusive,
    /// The last record overall is left out of the final segment, as in
    /// legacy report charts.
    DropLast,
}

impl BoundaryPolicy {
    pub fn label(self) -> &'static str {
        match self {
            BoundaryPolicy::Inclusive => "inclusive",
            BoundaryPolicy::DropLast => "drop-last",
        }
    }

    /// Config-file spelling. `None` for anything unrecognized.
    pub fn from_str_config(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inclusive" => Some(BoundaryPolicy::Inclusive),
            "drop-last" | "drop_last" | "droplast" | "legacy" => Some(BoundaryPolicy::DropLast),
            _ => None,
        }
    }
}

/// Sorts ascending by completion time. The sort is stable, so records with
/// equal completion times keep their insertion order.
pub fn sort_by_completion(records: &[StartRecord]) -> Vec<StartRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.completion_time.total_cmp(&b.completion_time));
    sorted
}

/// Indices `i` where the step from `items[i]` to `items[i + 1]` is strictly
/// larger than `threshold`. `items` must already be sorted by `key`.
pub fn break_points<T, F>(items: &[T], key: F, threshold: f64) -> Vec<usize>
where
    F: Fn(&T) -> f64,
{
    items
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| key(&pair[1]) - key(&pair[0]) > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Index ranges of the contiguous runs of `items`, split right after each
/// break point.
pub fn split_ranges<T, F>(
    items: &[T],
    key: F,
    threshold: f64,
    policy: BoundaryPolicy,
) -> Vec<Range<usize>>
where
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return Vec::new();
    }

    let end = match policy {
        BoundaryPolicy::Inclusive => items.len(),
        BoundaryPolicy::DropLast => items.len() - 1,
    };

    let breaks = break_points(items, key, threshold);
    let mut ranges = Vec::with_capacity(breaks.len() + 1);
    let mut begin = 0;
    for point in breaks {
        // point <= len - 2, so the split never passes `end`.
        let split = point + 1;
        ranges.push(begin..split);
        begin = split;
    }
    ranges.push(begin..end);
    ranges
}

/// Contiguous segments of start records already sorted by completion time.
pub fn split_segments(
    sorted: &[StartRecord],
    threshold: f64,
    policy: BoundaryPolicy,
) -> Vec<&[StartRecord]> {
    split_ranges(sorted, |r| r.completion_time, threshold, policy)
        .into_iter()
        .map(|range| &sorted[range])
        .collect()
}
