use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Timing sample for one unit: when it was asked to start and when it
/// actually reported in. `Stop` records reuse the same shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartRecord {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    pub completion_time: f64,
    pub delay: f64,
    #[serde(default)]
    pub starting_count: u32,
    #[serde(default)]
    pub running_count: u32,
    #[serde(default)]
    pub stopping_count: u32,
    #[serde(default)]
    pub stopped_count: u32,
}

impl StartRecord {
    pub fn new(completion_time: f64, delay: f64) -> Self {
        Self {
            id: None,
            start_time: None,
            completion_time,
            delay,
            starting_count: 0,
            running_count: 0,
            stopping_count: 0,
            stopped_count: 0,
        }
    }
}

/// One logged benchmark instruction with its wall-clock span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    pub cmd: String,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessStatsRecord {
    #[serde(rename = "TimeStamp")]
    pub timestamp: f64,
    #[serde(rename = "Process")]
    pub process: String,
    #[serde(rename = "CPUUsage")]
    pub cpu_usage: f64,
    #[serde(rename = "RSS", default, skip_serializing_if = "Option::is_none")]
    pub rss: Option<u64>,
}

/// Everything a benchmark run hands over for rendering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dataset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: Vec<StartRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stop: Vec<StartRecord>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub script: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_log: Vec<EventRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub machine_stats: BTreeMap<String, Vec<ProcessStatsRecord>>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.event_log.is_empty() && self.machine_stats.is_empty()
    }
}

// Benchmark dumps write nil collections as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
