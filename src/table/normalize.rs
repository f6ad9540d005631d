//! Flatten one series' nested observation response into a frame.
//!
//! FRED wraps each series in a JSON document whose `observations` array holds
//! records `{realtime_start, realtime_end, date, value}`. Normalization keeps
//! one row per observation date, renames the generic `value` field to the
//! series' panel column, and carries the realtime echo columns through to
//! alignment: dedup during an outer join keys on all shared columns, so
//! dropping them earlier can silently change join cardinality. They are
//! removed after alignment by `strip`.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::data::fred::RawSeriesResponse;
use crate::error::PipelineError;
use crate::table::frame::{Cell, Column, Frame, REALTIME_END, REALTIME_START};

/// One record of FRED's `observations` array.
#[derive(Debug, Deserialize)]
struct Observation {
    realtime_start: String,
    realtime_end: String,
    date: String,
    value: String,
}

/// Flatten `raw` into a frame with columns `realtime_start`, `realtime_end`,
/// and `value_column`.
///
/// An empty `observations` array yields a zero-row frame: an all-missing
/// series is valid input to the aligner. A response without the field at all
/// is malformed. The `"."` no-data sentinel in `value` is preserved verbatim,
/// never coerced to a number or dropped.
pub fn normalize(raw: &RawSeriesResponse, value_column: &str) -> Result<Frame, PipelineError> {
    let series = raw.series_id();

    let list = raw
        .body()
        .get("observations")
        .ok_or_else(|| PipelineError::MalformedResponse {
            series: series.to_string(),
            detail: "response has no `observations` field".to_string(),
        })?;

    let observations: Vec<Observation> =
        serde_json::from_value(list.clone()).map_err(|e| PipelineError::MalformedResponse {
            series: series.to_string(),
            detail: format!("`observations` is not a list of observation records: {e}"),
        })?;

    let mut rows = Vec::with_capacity(observations.len());
    for obs in observations {
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
            PipelineError::MalformedResponse {
                series: series.to_string(),
                detail: format!("invalid observation date '{}': {e}", obs.date),
            }
        })?;
        rows.push((date, obs));
    }

    // Source order is not guaranteed; the frame invariant is sorted, unique
    // dates. A repeated date is surfaced rather than silently resolved.
    rows.sort_by_key(|(d, _)| *d);
    for pair in rows.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(PipelineError::DuplicateKey {
                column: value_column.to_string(),
                date: pair[0].0,
            });
        }
    }

    let mut dates = Vec::with_capacity(rows.len());
    let mut realtime_start: Vec<Cell> = Vec::with_capacity(rows.len());
    let mut realtime_end: Vec<Cell> = Vec::with_capacity(rows.len());
    let mut values: Vec<Cell> = Vec::with_capacity(rows.len());
    for (date, obs) in rows {
        dates.push(date);
        realtime_start.push(Some(obs.realtime_start));
        realtime_end.push(Some(obs.realtime_end));
        values.push(Some(obs.value));
    }

    Ok(Frame::from_parts(
        dates,
        vec![
            Column::new(REALTIME_START, realtime_start),
            Column::new(REALTIME_END, realtime_end),
            Column::new(value_column, values),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(series: &str, body: serde_json::Value) -> RawSeriesResponse {
        RawSeriesResponse::new(series, body)
    }

    fn observation(date: &str, value: &str) -> serde_json::Value {
        json!({
            "realtime_start": "2021-01-15",
            "realtime_end": "2021-01-15",
            "date": date,
            "value": value,
        })
    }

    #[test]
    fn flattens_observations_into_one_row_per_date() {
        let body = json!({
            "observation_start": "2000-01-01",
            "observations": [
                observation("2000-02-01", "104.6"),
                observation("2000-01-01", "104.1"),
            ],
        });
        let frame = normalize(&raw("CPIAUCSL", body), "Consumer Price Index Value").unwrap();

        assert_eq!(frame.n_rows(), 2);
        assert_eq!(
            frame.header(),
            vec![
                "date",
                "realtime_start",
                "realtime_end",
                "Consumer Price Index Value"
            ]
        );
        // Rows come out date-sorted regardless of source order.
        assert_eq!(frame.dates(), &[date(2000, 1, 1), date(2000, 2, 1)]);
        assert_eq!(
            frame.cell("Consumer Price Index Value", date(2000, 1, 1)),
            Some(&Some("104.1".to_string()))
        );
    }

    #[test]
    fn missing_data_sentinel_is_preserved_verbatim() {
        let body = json!({ "observations": [observation("2000-01-01", ".")] });
        let frame = normalize(&raw("GDPC1", body), "Real Gross Domestic Product Value").unwrap();
        assert_eq!(
            frame.cell("Real Gross Domestic Product Value", date(2000, 1, 1)),
            Some(&Some(".".to_string()))
        );
    }

    #[test]
    fn zero_observations_is_a_valid_empty_frame() {
        let body = json!({ "observations": [] });
        let frame = normalize(&raw("PAYEMS", body), "Total Nonfarm Employment Value").unwrap();
        assert_eq!(frame.n_rows(), 0);
        assert!(frame.has_column("Total Nonfarm Employment Value"));
    }

    #[test]
    fn absent_observations_field_is_malformed() {
        let body = json!({ "error_code": 500, "error_message": "oops" });
        let err = normalize(&raw("PAYEMS", body), "Total Nonfarm Employment Value").unwrap_err();
        match err {
            PipelineError::MalformedResponse { series, .. } => assert_eq!(series, "PAYEMS"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn non_record_observations_are_malformed() {
        let body = json!({ "observations": ["not a record"] });
        let err = normalize(&raw("PAYEMS", body), "Total Nonfarm Employment Value").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn unparseable_observation_date_is_malformed() {
        let body = json!({ "observations": [observation("01/02/2000", "1.0")] });
        let err = normalize(&raw("PAYEMS", body), "Total Nonfarm Employment Value").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn duplicate_observation_dates_are_rejected() {
        let body = json!({
            "observations": [
                observation("2000-01-01", "1.0"),
                observation("2000-01-01", "2.0"),
            ],
        });
        let err = normalize(&raw("PAYEMS", body), "Total Nonfarm Employment Value").unwrap_err();
        match err {
            PipelineError::DuplicateKey { column, date: d } => {
                assert_eq!(column, "Total Nonfarm Employment Value");
                assert_eq!(d, date(2000, 1, 1));
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }
}
