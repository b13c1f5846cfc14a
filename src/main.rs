use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;

use fleetchart::config::{self, Config, load_config, load_config_from_path};
use fleetchart::dataset::load_dataset;
use fleetchart::logging::{LogFormat, init_logging};
use fleetchart::output::{
    OutputFormat, build_report, dump_json, histogram, render_histogram, write_report,
};
use fleetchart::shape::BoundaryPolicy;

const BUILD: &str = match option_env!("FLEETCHART_BUILD") {
    Some(build) => build,
    None => "not versioned",
};

#[derive(Parser)]
#[command(
    name = "fleetchart",
    about = "Render cluster start-up benchmark stats as an interactive chart"
)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the chart report
    Render(RenderArgs),
    /// Print the dataset as normalized JSON
    DumpJson {
        /// Dataset JSON (or data.js), `-` for stdin
        input: PathBuf,
    },
    /// Print a text histogram of unit delays
    Histogram {
        /// Dataset JSON (or data.js), `-` for stdin
        input: PathBuf,

        /// Number of bins
        #[arg(long)]
        bins: Option<usize>,

        /// Use stop delays instead of start delays
        #[arg(long, default_value_t = false)]
        stop: bool,
    },
    /// Show version
    Version,
}

#[derive(Args)]
struct RenderArgs {
    /// Dataset JSON (or data.js), `-` for stdin
    input: PathBuf,

    /// Output path (default: report.html, report.svg or report/)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Seconds between completions that split the starting-count line
    #[arg(long)]
    gap_threshold: Option<f64>,

    /// What happens to the last start in the final segment
    #[arg(long, value_enum)]
    boundary_policy: Option<BoundaryPolicy>,

    /// Page heading
    #[arg(long, default_value = "fleet start-up benchmark")]
    title: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format)?;
    let mut config = load_config_for_cli(&cli);

    match cli.command {
        Command::Render(args) => run_render(&mut config, args),
        Command::DumpJson { input } => {
            let dataset = load_dataset(&input)?;
            dump_json(&dataset, std::io::stdout().lock())
        }
        Command::Histogram { input, bins, stop } => run_histogram(&mut config, &input, bins, stop),
        Command::Version => {
            println!("fleetchart version {} (build {BUILD})", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => load_config_from_path(path),
        None => {
            tracing::debug!(path = ?config::config_path(), "looking for default config");
            load_config()
        }
    }
}

fn run_render(config: &mut Config, args: RenderArgs) -> Result<()> {
    if let Some(threshold) = args.gap_threshold {
        config.shaping.gap_threshold_secs = threshold;
    }
    if let Some(policy) = args.boundary_policy {
        config.shaping.boundary_policy = policy.label().to_string();
    }

    config.shaping.validate()?;
    let options = config.shaping.to_options();
    if options.boundary_policy == BoundaryPolicy::DropLast {
        tracing::info!("drop-last boundary policy: the final start is left out of the last segment");
    }

    let dataset = load_dataset(&args.input)?;
    if dataset.is_empty() {
        tracing::warn!(input = %args.input.display(), "dataset has no starts, events or machine stats");
    }

    let report = build_report(
        &dataset,
        config,
        &options,
        &args.title,
        args.format == OutputFormat::Svg,
    );
    let path = args.output.unwrap_or_else(|| args.format.default_path());
    write_report(&report, &dataset, args.format, &path)?;

    eprintln!("{}", report.summary);
    eprintln!("report written to {}", path.display());
    Ok(())
}

fn run_histogram(config: &mut Config, input: &Path, bins: Option<usize>, stop: bool) -> Result<()> {
    if let Some(bins) = bins {
        config.histogram.bins = bins;
    }
    config.histogram.validate()?;

    let dataset = load_dataset(input)?;
    let records = if stop { &dataset.stop } else { &dataset.start };
    let delays: Vec<f64> = records.iter().map(|r| r.delay).collect();

    let kind = if stop { "Stopping" } else { "Starting" };
    let hist = histogram(&delays, config.histogram.bins);
    let mut out = std::io::stdout().lock();
    writeln!(out, ">> Histogram {kind} Units Delay <<")?;
    write!(out, "{}", render_histogram(&hist, config.histogram.bar_width))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(extra: &[&str]) -> std::result::Result<Cli, clap::Error> {
        let mut argv = vec!["fleetchart", "render", "stats.json"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn boundary_policy_flag_parses() {
        let cli = render_args(&["--boundary-policy", "drop-last"]).unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.boundary_policy, Some(BoundaryPolicy::DropLast));
    }

    #[test]
    fn misspelled_boundary_policy_is_rejected() {
        let err = render_args(&["--boundary-policy", "drop-lst"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
