//! Shared domain types.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::PipelineError;

/// A request for one series' observations over a date range.
///
/// Immutable once constructed; validation happens here so a bad query never
/// reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    series_id: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl SeriesQuery {
    pub fn new(
        series_id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, PipelineError> {
        let series_id = series_id.into();
        if series_id.trim().is_empty() {
            return Err(PipelineError::InvalidQuery {
                series: "<empty>".to_string(),
                reason: "series id must be a non-empty token".to_string(),
            });
        }
        if start > end {
            return Err(PipelineError::InvalidQuery {
                series: series_id,
                reason: format!("start date {start} is later than end date {end}"),
            });
        }
        Ok(Self {
            series_id,
            start,
            end,
        })
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// FRED `file_type` parameter; only JSON responses are supported.
    pub fn file_type(&self) -> &'static str {
        "json"
    }
}

/// A query plus the column name its values will occupy in the panel.
#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub query: SeriesQuery,
    pub value_column: String,
}

impl SeriesRequest {
    pub fn new(query: SeriesQuery, value_column: impl Into<String>) -> Self {
        Self {
            query,
            value_column: value_column.into(),
        }
    }

    /// Build a request with the catalog label, or `"<ID> Value"` for series
    /// the catalog does not know.
    pub fn with_default_column(query: SeriesQuery) -> Self {
        let value_column = default_value_column(query.series_id());
        Self {
            query,
            value_column,
        }
    }
}

/// Panel column name conventionally used for a series id.
pub fn default_value_column(series_id: &str) -> String {
    match KnownSeries::from_series_id(series_id) {
        Some(known) => known.value_column().to_string(),
        None => format!("{series_id} Value"),
    }
}

/// Series the tool knows by name, with their conventional panel column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownSeries {
    /// Total nonfarm payrolls (monthly).
    Payems,
    /// Real gross domestic product (quarterly).
    Gdpc1,
    /// Consumer price index, all urban consumers (monthly).
    Cpiaucsl,
    /// Rail passenger miles (monthly).
    Railpmd11,
    /// Air revenue passenger miles (monthly).
    Airrpmtsid11,
}

impl KnownSeries {
    pub const ALL: [KnownSeries; 5] = [
        KnownSeries::Payems,
        KnownSeries::Gdpc1,
        KnownSeries::Cpiaucsl,
        KnownSeries::Railpmd11,
        KnownSeries::Airrpmtsid11,
    ];

    /// FRED series identifier.
    pub fn series_id(self) -> &'static str {
        match self {
            KnownSeries::Payems => "PAYEMS",
            KnownSeries::Gdpc1 => "GDPC1",
            KnownSeries::Cpiaucsl => "CPIAUCSL",
            KnownSeries::Railpmd11 => "RAILPMD11",
            KnownSeries::Airrpmtsid11 => "AIRRPMTSID11",
        }
    }

    /// Human-readable panel column name.
    pub fn value_column(self) -> &'static str {
        match self {
            KnownSeries::Payems => "Total Nonfarm Employment Value",
            KnownSeries::Gdpc1 => "Real Gross Domestic Product Value",
            KnownSeries::Cpiaucsl => "Consumer Price Index Value",
            KnownSeries::Railpmd11 => "Rail Passenger Miles",
            KnownSeries::Airrpmtsid11 => "Air Revenue Passenger Miles",
        }
    }

    pub fn from_series_id(id: &str) -> Option<Self> {
        KnownSeries::ALL
            .into_iter()
            .find(|k| k.series_id().eq_ignore_ascii_case(id))
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// Series to pull, in the order their columns appear in the panel.
    pub requests: Vec<SeriesRequest>,
    /// Where to write the panel CSV, if anywhere.
    pub out_path: Option<PathBuf>,
    /// Maximum concurrent fetches.
    pub jobs: usize,
    /// Extra attempts per fetch for transient failures.
    pub retries: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Rows to print in the terminal preview.
    pub preview_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn query_rejects_start_after_end_before_any_network_call() {
        let err = SeriesQuery::new("PAYEMS", date(2020, 12, 31), date(2000, 1, 1)).unwrap_err();
        match err {
            PipelineError::InvalidQuery { series, .. } => assert_eq!(series, "PAYEMS"),
            other => panic!("expected InvalidQuery, got {other:?}"),
        }
    }

    #[test]
    fn query_rejects_blank_series_id() {
        let err = SeriesQuery::new("  ", date(2000, 1, 1), date(2000, 12, 31)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidQuery { .. }));
    }

    #[test]
    fn query_accepts_single_day_range() {
        let q = SeriesQuery::new("GDPC1", date(2000, 1, 1), date(2000, 1, 1)).unwrap();
        assert_eq!(q.series_id(), "GDPC1");
        assert_eq!(q.file_type(), "json");
    }

    #[test]
    fn catalog_supplies_column_labels() {
        assert_eq!(
            default_value_column("CPIAUCSL"),
            "Consumer Price Index Value"
        );
        assert_eq!(default_value_column("payems"), "Total Nonfarm Employment Value");
        assert_eq!(default_value_column("UNRATE"), "UNRATE Value");
    }
}
