//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the pull pipeline
//! - prints the run summary and panel preview
//! - writes the optional panel CSV

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Command, PullArgs, SeriesSpec, ShowArgs};
use crate::domain::{KnownSeries, PullConfig, SeriesQuery, SeriesRequest, default_value_column};
use crate::error::PipelineError;

pub mod pipeline;

/// Entry point for the `fredpanel` binary.
pub fn run() -> Result<(), PipelineError> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Pull(args) => handle_pull(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_logging() {
    // Quiet by default so report output stays clean;
    // RUST_LOG=fred_panel=debug turns on per-request detail.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_pull(args: PullArgs) -> Result<(), PipelineError> {
    let config = pull_config_from_args(&args)?;
    let run = pipeline::run_pull(&config)?;

    println!("{}", crate::report::format_run_summary(&run));
    println!(
        "{}",
        crate::report::format_preview(&run.panel, config.preview_rows)
    );

    if let Some(path) = &config.out_path {
        crate::io::panel::write_panel_csv(path, &run.panel)?;
        println!("Wrote {} rows to {}", run.panel.n_rows(), path.display());
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), PipelineError> {
    let panel = crate::io::panel::read_panel_csv(&args.csv)?;
    println!("{}", crate::report::format_preview(&panel, args.rows));
    Ok(())
}

/// Turn CLI flags into a validated pipeline configuration.
///
/// Query validation happens here, so a bad range or blank series id fails
/// before the client is even constructed.
pub fn pull_config_from_args(args: &PullArgs) -> Result<PullConfig, PipelineError> {
    let specs: Vec<SeriesSpec> = if args.series.is_empty() {
        default_series()
    } else {
        args.series.clone()
    };

    let mut requests = Vec::with_capacity(specs.len());
    for spec in specs {
        let query = SeriesQuery::new(&spec.id, args.start, args.end)?;
        let value_column = spec
            .label
            .unwrap_or_else(|| default_value_column(&spec.id));
        requests.push(SeriesRequest::new(query, value_column));
    }

    Ok(PullConfig {
        requests,
        out_path: args.out.clone(),
        jobs: args.jobs,
        retries: args.retries,
        timeout_secs: args.timeout_secs,
        preview_rows: args.preview,
    })
}

/// The trio pulled when no `--series` flag is given.
fn default_series() -> Vec<SeriesSpec> {
    [KnownSeries::Payems, KnownSeries::Gdpc1, KnownSeries::Cpiaucsl]
        .into_iter()
        .map(|k| SeriesSpec {
            id: k.series_id().to_string(),
            label: None,
        })
        .collect()
}
