use std::fmt::Write;

use crate::config::ColorsConfig;

const FALLBACK_CPU_COLOR: &str = "#7f7f7f";

#[derive(Debug, Clone)]
pub struct Theme {
    pub delay_point: String,
    pub running_count: String,
    pub starting_count: String,
    pub focus_band: String,
    pub grid: String,
    cpu_palette: Vec<String>,
}

impl Theme {
    /// Colors that are neither `#hex` nor a plain CSS color name are
    /// replaced by the defaults, since they end up inside `<style>`.
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let defaults = ColorsConfig::default();
        Theme {
            delay_point: css_color("delay_point", &colors.delay_point, &defaults.delay_point),
            running_count: css_color("running_count", &colors.running_count, &defaults.running_count),
            starting_count: css_color(
                "starting_count",
                &colors.starting_count,
                &defaults.starting_count,
            ),
            focus_band: css_color("focus_band", &colors.focus_band, &defaults.focus_band),
            grid: css_color("grid", &colors.grid, &defaults.grid),
            cpu_palette: colors
                .cpu_palette
                .iter()
                .filter(|c| {
                    let ok = is_css_color(c);
                    if !ok {
                        tracing::warn!(color = %c, "ignoring invalid cpu_palette color");
                    }
                    ok
                })
                .cloned()
                .collect(),
        }
    }

    /// Palette entry for the `index`-th process tag, cycling when there are
    /// more tags than colors.
    pub fn cpu_color(&self, index: usize) -> &str {
        if self.cpu_palette.is_empty() {
            return FALLBACK_CPU_COLOR;
        }
        &self.cpu_palette[index % self.cpu_palette.len()]
    }

    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        let _ = writeln!(css, "body {{ font: 11px sans-serif; }}");
        let _ = writeln!(css, ".axis path, .axis line {{ fill: none; stroke: {}; shape-rendering: crispEdges; }}", self.grid);
        let _ = writeln!(css, ".axis.nogrid line {{ stroke: none; }}");
        let _ = writeln!(css, ".axis text {{ fill: #444; }}");
        let _ = writeln!(css, ".delaypoint {{ fill: {}; }}", self.delay_point);
        let _ = writeln!(css, ".delaypoint:hover {{ stroke: #000; stroke-width: 1; }}");
        let _ = writeln!(css, ".line-running-count {{ fill: none; stroke: {}; stroke-width: 1.5; }}", self.running_count);
        let _ = writeln!(css, ".line-starting-count {{ fill: none; stroke: {}; stroke-width: 1.5; }}", self.starting_count);
        let _ = writeln!(css, ".cpu-usage {{ fill: none; stroke-width: 1; stroke-dasharray: 3 2; opacity: 0.8; }}");
        let _ = writeln!(css, ".timeline-focus {{ fill: {}; opacity: 0.15; }}", self.focus_band);
        let _ = writeln!(css, ".legend text, .axis-label {{ fill: #222; }}");
        let _ = writeln!(css, ".event-text {{ margin-right: 1em; cursor: default; }}");
        let _ = writeln!(css, ".event-text:hover {{ text-decoration: underline; }}");
        css
    }
}

fn css_color(key: &str, value: &str, fallback: &str) -> String {
    if is_css_color(value) {
        value.to_string()
    } else {
        tracing::warn!(key, color = %value, "invalid color, using default");
        fallback.to_string()
    }
}

/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or a bare name like `steelblue`.
pub fn is_css_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => {
            !value.is_empty() && value.len() <= 32 && value.chars().all(|c| c.is_ascii_alphabetic())
        }
    }
}

/// Turns an arbitrary process tag into something usable as a CSS class.
pub fn class_fragment(tag: &str) -> String {
    tag.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}
