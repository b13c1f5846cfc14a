use std::collections::BTreeMap;

use crate::dataset::ProcessStatsRecord;

/// CPU samples of one process tag on one machine, as (timestamp, percent).
#[derive(Clone, Debug, PartialEq)]
pub struct CpuSeries {
    pub machine: String,
    pub process: String,
    pub points: Vec<(f64, f64)>,
}

pub fn filter_by_process<'a>(
    stats: &'a [ProcessStatsRecord],
    process: &str,
) -> Vec<&'a ProcessStatsRecord> {
    stats.iter().filter(|s| s.process == process).collect()
}

/// One series per machine and tag, machines in name order, tags in the
/// order given. Tags a machine never reported are skipped.
pub fn cpu_series(
    machine_stats: &BTreeMap<String, Vec<ProcessStatsRecord>>,
    processes: &[String],
) -> Vec<CpuSeries> {
    let mut out = Vec::new();
    for (machine, stats) in machine_stats {
        for process in processes {
            let mut points: Vec<(f64, f64)> = filter_by_process(stats, process)
                .into_iter()
                .map(|s| (s.timestamp, s.cpu_usage))
                .collect();
            if points.is_empty() {
                tracing::debug!(%machine, %process, "no cpu samples");
                continue;
            }
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            out.push(CpuSeries {
                machine: machine.clone(),
                process: process.clone(),
                points,
            });
        }
    }
    out
}
