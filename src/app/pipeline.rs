//! Shared pull-pipeline logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (bounded pool) -> normalize (per series) -> align (fan-in) -> strip
//!
//! The CLI can then focus on presentation (summary, preview, CSV path).

use std::time::Duration;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::fred::{FredClient, RawSeriesResponse};
use crate::domain::{PullConfig, SeriesRequest};
use crate::error::PipelineError;
use crate::table::{Frame, REALTIME_END, REALTIME_START, align, normalize, strip};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Observation count for one fetched series, for the run summary.
#[derive(Debug, Clone)]
pub struct SeriesStats {
    pub series_id: String,
    pub value_column: String,
    pub n_obs: usize,
}

/// All computed outputs of a single `fredpanel pull` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The canonical panel: `date` plus one value column per series, in
    /// fetch order, with the realtime echo columns already stripped.
    pub panel: Frame,
    pub series: Vec<SeriesStats>,
}

/// Execute the full pull pipeline and return the canonical panel.
///
/// Credential resolution happens first, before any network traffic.
pub fn run_pull(config: &PullConfig) -> Result<RunOutput, PipelineError> {
    let client = FredClient::from_env(Duration::from_secs(config.timeout_secs))?;
    run_pull_with_client(config, &client)
}

/// Execute the pipeline with a pre-built client.
pub fn run_pull_with_client(
    config: &PullConfig,
    client: &FredClient,
) -> Result<RunOutput, PipelineError> {
    if config.requests.is_empty() {
        return Err(PipelineError::InvalidQuery {
            series: "<none>".to_string(),
            reason: "at least one series is required".to_string(),
        });
    }

    // 1) Fetch every series on a bounded worker pool. Results are collected
    //    in request order, so panel column order follows the caller's order
    //    rather than task completion order. The first failure aborts the
    //    run; no partial panel is produced.
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.jobs.max(1))
        .build()
        .map_err(|e| PipelineError::Io {
            context: format!("Failed to build fetch worker pool: {e}"),
        })?;

    let raws: Vec<RawSeriesResponse> = pool.install(|| {
        config
            .requests
            .par_iter()
            .map(|req| fetch_with_retry(client, req, config.retries))
            .collect::<Result<Vec<_>, _>>()
    })?;

    // 2) Normalize each response into a date-keyed frame.
    let mut tables = Vec::with_capacity(raws.len());
    let mut series = Vec::with_capacity(raws.len());
    for (raw, req) in raws.iter().zip(&config.requests) {
        let table = normalize(raw, &req.value_column)?;
        info!(
            series = raw.series_id(),
            rows = table.n_rows(),
            "normalized series"
        );
        series.push(SeriesStats {
            series_id: raw.series_id().to_string(),
            value_column: req.value_column.clone(),
            n_obs: table.n_rows(),
        });
        tables.push(table);
    }

    // 3) Align on the shared date axis, then drop the request-window echo
    //    columns from the combined table.
    let aligned = align(tables);
    let panel = strip(aligned, &[REALTIME_START, REALTIME_END]);

    info!(
        rows = panel.n_rows(),
        columns = panel.header().len(),
        "panel assembled"
    );
    Ok(RunOutput { panel, series })
}

fn fetch_with_retry(
    client: &FredClient,
    req: &SeriesRequest,
    retries: usize,
) -> Result<RawSeriesResponse, PipelineError> {
    debug!(
        series = req.query.series_id(),
        start = %req.query.start(),
        end = %req.query.end(),
        "fetching observations"
    );
    with_retry(retries, RETRY_BASE_DELAY, || client.fetch(&req.query))
}

/// Run `op`, retrying transient failures up to `retries` extra attempts with
/// doubling backoff. Non-transient errors abort immediately.
fn with_retry<T>(
    retries: usize,
    base_delay: Duration,
    mut op: impl FnMut() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    let mut delay = base_delay;
    let mut attempt = 0usize;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                warn!(error = %e, attempt, "transient failure, backing off");
                std::thread::sleep(delay);
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
