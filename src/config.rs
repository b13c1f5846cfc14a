use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::shape::{BoundaryPolicy, DEFAULT_GAP_THRESHOLD_SECS, ShapeOptions};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub shaping: ShapingConfig,
    pub histogram: HistogramConfig,
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub point_radius: f64,
    pub domain_headroom: f64,
    pub tick_count: usize,
    pub label_max_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 960.0,
            height: 500.0,
            margin_top: 20.0,
            margin_right: 50.0,
            margin_bottom: 30.0,
            margin_left: 30.0,
            point_radius: 2.0,
            domain_headroom: 1.01,
            tick_count: 10,
            label_max_width: 60,
        }
    }
}

impl ChartConfig {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin_left - self.margin_right).max(1.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin_top - self.margin_bottom).max(1.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    pub gap_threshold_secs: f64,
    pub boundary_policy: String,
    pub cpu_processes: Vec<String>,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        ShapingConfig {
            gap_threshold_secs: DEFAULT_GAP_THRESHOLD_SECS,
            boundary_policy: BoundaryPolicy::Inclusive.label().to_string(),
            cpu_processes: vec!["systemd".to_string(), "fleetd".to_string()],
        }
    }
}

impl ShapingConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.gap_threshold_secs;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(eyre!(
                "gap threshold must be a finite, non-negative number of seconds (got {threshold})"
            ));
        }
        Ok(())
    }

    pub fn to_options(&self) -> ShapeOptions {
        let boundary_policy = match BoundaryPolicy::from_str_config(&self.boundary_policy) {
            Some(policy) => policy,
            None => {
                tracing::warn!(
                    value = %self.boundary_policy,
                    "unknown boundary_policy, using inclusive"
                );
                BoundaryPolicy::Inclusive
            }
        };
        ShapeOptions {
            gap_threshold: self.gap_threshold_secs,
            boundary_policy,
            cpu_processes: self.cpu_processes.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub bins: usize,
    pub bar_width: usize,
}

impl HistogramConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(eyre!("histogram bins must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        HistogramConfig {
            bins: 10,
            bar_width: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub delay_point: String,
    pub running_count: String,
    pub starting_count: String,
    pub focus_band: String,
    pub grid: String,
    pub cpu_palette: Vec<String>,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            delay_point: "#1f77b4".to_string(),
            running_count: "#2ca02c".to_string(),
            starting_count: "#ff7f0e".to_string(),
            focus_band: "#9467bd".to_string(),
            grid: "#e0e0e0".to_string(),
            cpu_palette: vec!["#d62728".to_string(), "#8c564b".to_string()],
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fleetchart").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "config not readable, using defaults");
            return Config::default();
        }
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.chart.width, 960.0);
        assert_eq!(config.chart.inner_width(), 880.0);
        assert_eq!(config.chart.inner_height(), 450.0);
        assert_eq!(config.shaping.gap_threshold_secs, 20.0);
        assert_eq!(config.shaping.boundary_policy, "inclusive");
        assert_eq!(config.shaping.cpu_processes, vec!["systemd", "fleetd"]);
        assert_eq!(config.histogram.bins, 10);
        assert_eq!(config.colors.cpu_palette.len(), 2);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[shaping]
gap_threshold_secs = 5.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shaping.gap_threshold_secs, 5.0);
        // Other fields should be defaults
        assert_eq!(config.shaping.boundary_policy, "inclusive");
        assert_eq!(config.chart.height, 500.0);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r##"
[chart]
width = 1200.0
height = 600.0
point_radius = 3.0

[shaping]
boundary_policy = "drop-last"
cpu_processes = ["etcd"]

[histogram]
bins = 4
bar_width = 40

[colors]
delay_point = "#000000"
"##;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chart.width, 1200.0);
        assert_eq!(config.chart.point_radius, 3.0);
        let options = config.shaping.to_options();
        assert_eq!(options.boundary_policy, BoundaryPolicy::DropLast);
        assert_eq!(options.cpu_processes, vec!["etcd"]);
        assert_eq!(config.histogram.bins, 4);
        assert_eq!(config.colors.delay_point, "#000000");
        assert_eq!(config.colors.running_count, "#2ca02c");
    }

    #[test]
    fn unknown_config_policy_falls_back_to_inclusive() {
        let shaping = ShapingConfig {
            boundary_policy: "drop-lst".to_string(),
            ..ShapingConfig::default()
        };
        assert_eq!(shaping.to_options().boundary_policy, BoundaryPolicy::Inclusive);
    }

    #[test]
    fn gap_threshold_validation() {
        let with = |gap_threshold_secs| ShapingConfig {
            gap_threshold_secs,
            ..ShapingConfig::default()
        };
        assert!(with(f64::NAN).validate().is_err());
        assert!(with(f64::INFINITY).validate().is_err());
        assert!(with(f64::NEG_INFINITY).validate().is_err());
        assert!(with(-1.0).validate().is_err());
        assert!(with(0.0).validate().is_ok());
        assert!(with(20.0).validate().is_ok());
    }

    #[test]
    fn zero_bins_rejected() {
        let histogram = HistogramConfig {
            bins: 0,
            ..HistogramConfig::default()
        };
        let err = histogram.validate().unwrap_err();
        assert!(err.to_string().contains("bins must be greater than 0"));
        assert!(HistogramConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.chart.width, 960.0);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("fleetchart_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.histogram.bins, 10);
        let _ = std::fs::remove_file(&temp);
    }
}
