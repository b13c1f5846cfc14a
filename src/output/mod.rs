pub mod histogram;
pub mod html;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;

use crate::chart::svg::SvgSurface;
use crate::chart::theme::Theme;
use crate::chart::{self, EventBand};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::format::format_duration_secs;
use crate::shape::{ShapeOptions, shape};

pub use histogram::{Histogram, histogram, render_histogram};
pub use json::{data_script, dump_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Single self-contained HTML page
    #[default]
    Html,
    /// Bare SVG with an embedded stylesheet
    Svg,
    /// Directory with index.html, chart.svg and data.js
    Bundle,
}

impl OutputFormat {
    pub fn default_path(self) -> PathBuf {
        match self {
            OutputFormat::Html => PathBuf::from("report.html"),
            OutputFormat::Svg => PathBuf::from("report.svg"),
            OutputFormat::Bundle => PathBuf::from("report"),
        }
    }
}

/// A rendered chart plus everything the page around it needs.
pub struct Report {
    pub title: String,
    pub svg: String,
    pub stylesheet: String,
    pub bands: Vec<EventBand>,
    pub summary: String,
}

impl Report {
    pub fn to_html(&self) -> String {
        html::render_page(&html::Page {
            title: &self.title,
            stylesheet: &self.stylesheet,
            svg: &self.svg,
            bands: &self.bands,
            summary: &self.summary,
        })
    }
}

pub fn build_report(
    dataset: &Dataset,
    config: &Config,
    options: &ShapeOptions,
    title: &str,
    standalone_svg: bool,
) -> Report {
    let shaped = shape(dataset, options);
    let theme = Theme::from_config(&config.colors);
    let stylesheet = theme.stylesheet();

    let mut surface = SvgSurface::new(config.chart.width, config.chart.height);
    if standalone_svg {
        surface = surface.with_stylesheet(stylesheet.clone());
    }
    let bands = chart::render(
        &shaped,
        &config.chart,
        &theme,
        &options.cpu_processes,
        &mut surface,
    );

    let run_length = shaped.max_timestamp().unwrap_or(0.0);
    let summary = format!(
        "{} starts in {} segment(s) over {}, {} event(s), {} machine(s)",
        shaped.sorted_starts.len(),
        shaped.segment_count(),
        format_duration_secs(run_length),
        shaped.events.len(),
        dataset.machine_stats.len(),
    );

    Report {
        title: title.to_string(),
        svg: surface.finish(),
        stylesheet,
        bands,
        summary,
    }
}

pub fn write_report(
    report: &Report,
    dataset: &Dataset,
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    match format {
        OutputFormat::Html => write_file(path, &report.to_html()),
        OutputFormat::Svg => write_file(path, &report.svg),
        OutputFormat::Bundle => write_bundle(report, dataset, path),
    }
}

fn write_bundle(report: &Report, dataset: &Dataset, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create bundle directory {}", dir.display()))?;
    write_file(&dir.join("index.html"), &report.to_html())?;
    write_file(&dir.join("chart.svg"), &report.svg)?;
    write_file(&dir.join("data.js"), &data_script(dataset)?)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}
