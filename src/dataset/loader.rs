use std::io::Read;
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;

use super::record::Dataset;

const SCRIPT_PREFIX: &str = "var allData =";

/// Load a dataset from `path`, or from stdin when `path` is `-`.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read dataset from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read dataset {}", path.display()))?
    };

    let dataset = parse_dataset(&contents)
        .wrap_err_with(|| format!("failed to parse dataset {}", path.display()))?;

    tracing::info!(
        starts = dataset.start.len(),
        stops = dataset.stop.len(),
        events = dataset.event_log.len(),
        machines = dataset.machine_stats.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse plain JSON or the `var allData = {...};` script wrapper that
/// report bundles ship as `data.js`.
pub fn parse_dataset(contents: &str) -> Result<Dataset> {
    let body = strip_script_wrapper(contents);
    let dataset = serde_json::from_str(body)?;
    Ok(dataset)
}

fn strip_script_wrapper(contents: &str) -> &str {
    let trimmed = contents.trim();
    let Some(rest) = trimmed.strip_prefix(SCRIPT_PREFIX) else {
        return trimmed;
    };
    rest.trim().trim_end_matches(';').trim_end()
}
