//! Pure data shaping: everything the chart needs, computed up front from a
//! loaded [`Dataset`]. Nothing in here knows about scales or SVG.

pub mod events;
pub mod segment;
pub mod series;

use std::ops::Range;

use crate::dataset::{Dataset, StartRecord};

pub use events::{TimelineEvent, event_label, timeline_events};
pub use segment::{
    BoundaryPolicy, DEFAULT_GAP_THRESHOLD_SECS, break_points, sort_by_completion, split_ranges,
    split_segments,
};
pub use series::{CpuSeries, cpu_series, filter_by_process};

#[derive(Debug, Clone)]
pub struct ShapeOptions {
    pub gap_threshold: f64,
    pub boundary_policy: BoundaryPolicy,
    pub cpu_processes: Vec<String>,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        ShapeOptions {
            gap_threshold: DEFAULT_GAP_THRESHOLD_SECS,
            boundary_policy: BoundaryPolicy::default(),
            cpu_processes: vec!["systemd".to_string(), "fleetd".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShapedData {
    pub sorted_starts: Vec<StartRecord>,
    segment_ranges: Vec<Range<usize>>,
    pub events: Vec<TimelineEvent>,
    pub cpu: Vec<CpuSeries>,
}

impl ShapedData {
    pub fn segments(&self) -> impl Iterator<Item = &[StartRecord]> {
        self.segment_ranges
            .iter()
            .map(|range| &self.sorted_starts[range.clone()])
    }

    pub fn segment_count(&self) -> usize {
        self.segment_ranges.len()
    }

    pub fn max_event_end(&self) -> Option<f64> {
        self.events.iter().map(|e| e.end).reduce(f64::max)
    }

    /// Latest timestamp of any kind, used when there is no event log.
    pub fn max_timestamp(&self) -> Option<f64> {
        let starts = self.sorted_starts.iter().map(|s| s.completion_time);
        let cpu = self.cpu.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        let events = self.events.iter().map(|e| e.end);
        starts.chain(cpu).chain(events).reduce(f64::max)
    }

    pub fn max_delay(&self) -> Option<f64> {
        self.sorted_starts.iter().map(|s| s.delay).reduce(f64::max)
    }

    pub fn max_unit_count(&self) -> Option<u32> {
        self.sorted_starts
            .iter()
            .map(|s| s.running_count.max(s.starting_count))
            .max()
    }
}

pub fn shape(dataset: &Dataset, options: &ShapeOptions) -> ShapedData {
    let _span = tracing::debug_span!("shape").entered();

    let sorted_starts = sort_by_completion(&dataset.start);
    let segment_ranges = split_ranges(
        &sorted_starts,
        |r| r.completion_time,
        options.gap_threshold,
        options.boundary_policy,
    );
    let events = timeline_events(&dataset.event_log);
    let cpu = cpu_series(&dataset.machine_stats, &options.cpu_processes);

    tracing::debug!(
        segments = segment_ranges.len(),
        policy = options.boundary_policy.label(),
        threshold = options.gap_threshold,
        cpu_series = cpu.len(),
        "shaped dataset"
    );

    ShapedData {
        sorted_starts,
        segment_ranges,
        events,
        cpu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EventRecord, ProcessStatsRecord};

    fn dataset() -> Dataset {
        let mut start = vec![
            StartRecord::new(32.0, 1.5),
            StartRecord::new(0.0, 0.5),
            StartRecord::new(30.0, 2.5),
            StartRecord::new(5.0, 1.0),
        ];
        start[0].running_count = 4;
        start[2].starting_count = 6;
        let mut data = Dataset {
            start,
            event_log: vec![EventRecord {
                cmd: "start".into(),
                args: Some(vec!["4".into(), "100".into()]),
                start_time: 0.0,
                end_time: 40.0,
            }],
            ..Dataset::default()
        };
        data.machine_stats.insert(
            "core-01".into(),
            vec![ProcessStatsRecord {
                timestamp: 45.0,
                process: "fleetd".into(),
                cpu_usage: 7.0,
                rss: None,
            }],
        );
        data
    }

    #[test]
    fn shape_splits_and_sorts() {
        let shaped = shape(&dataset(), &ShapeOptions::default());
        assert_eq!(shaped.segment_count(), 2);
        let lens: Vec<usize> = shaped.segments().map(|s| s.len()).collect();
        assert_eq!(lens, vec![2, 2]);
        assert_eq!(shaped.events[0].label, "start 4 100");
        assert_eq!(shaped.cpu.len(), 1);
    }

    #[test]
    fn maxima() {
        let shaped = shape(&dataset(), &ShapeOptions::default());
        assert_eq!(shaped.max_event_end(), Some(40.0));
        assert_eq!(shaped.max_timestamp(), Some(45.0));
        assert_eq!(shaped.max_delay(), Some(2.5));
        assert_eq!(shaped.max_unit_count(), Some(6));
    }

    #[test]
    fn empty_dataset() {
        let shaped = shape(&Dataset::default(), &ShapeOptions::default());
        assert_eq!(shaped.segment_count(), 0);
        assert_eq!(shaped.max_event_end(), None);
        assert_eq!(shaped.max_timestamp(), None);
        assert_eq!(shaped.max_unit_count(), None);
    }
}
