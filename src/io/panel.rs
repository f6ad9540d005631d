//! Panel CSV read/write.
//!
//! The CSV is the pipeline's externally visible artifact: a header row
//! naming every column (`date` first), one row per date, missing cells
//! written empty. Downstream consumers address columns by name, never by
//! position.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::table::{Cell, Column, DATE_COLUMN, Frame};

/// Write the canonical panel to a CSV file.
pub fn write_panel_csv(path: &Path, panel: &Frame) -> Result<(), PipelineError> {
    let mut file = File::create(path).map_err(|e| PipelineError::Io {
        context: format!("Failed to create panel CSV '{}': {e}", path.display()),
    })?;

    let header: Vec<String> = panel.header().iter().map(|n| csv_field(n)).collect();
    writeln!(file, "{}", header.join(",")).map_err(|e| PipelineError::Io {
        context: format!("Failed to write panel CSV header: {e}"),
    })?;

    for (row, date) in panel.dates().iter().enumerate() {
        let mut fields = Vec::with_capacity(panel.columns().len() + 1);
        fields.push(date.to_string());
        for col in panel.columns() {
            fields.push(col.cells()[row].as_deref().map(csv_field).unwrap_or_default());
        }
        writeln!(file, "{}", fields.join(",")).map_err(|e| PipelineError::Io {
            context: format!("Failed to write panel CSV row: {e}"),
        })?;
    }

    Ok(())
}

/// Quote a field only when it would break the delimited layout.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Read a panel CSV back into a frame.
///
/// The first column must be `date`; empty cells become the missing marker.
pub fn read_panel_csv(path: &Path) -> Result<Frame, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::Io {
        context: format!("Failed to open panel CSV '{}': {e}", path.display()),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Io {
            context: format!("Failed to read panel CSV headers: {e}"),
        })?
        .clone();

    if headers.get(0) != Some(DATE_COLUMN) {
        return Err(PipelineError::Io {
            context: format!(
                "Panel CSV '{}' must lead with a `{DATE_COLUMN}` column",
                path.display()
            ),
        });
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows: Vec<(NaiveDate, Vec<Cell>)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::Io {
            context: format!("Failed to read panel CSV row: {e}"),
        })?;

        let date_text = record.get(0).unwrap_or_default();
        let date =
            NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|e| PipelineError::Io {
                context: format!("Invalid date '{date_text}' in panel CSV: {e}"),
            })?;

        let cells: Vec<Cell> = (0..names.len())
            .map(|i| match record.get(i + 1) {
                Some("") | None => None,
                Some(value) => Some(value.to_string()),
            })
            .collect();
        rows.push((date, cells));
    }

    rows.sort_by_key(|(d, _)| *d);
    for pair in rows.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(PipelineError::DuplicateKey {
                column: DATE_COLUMN.to_string(),
                date: pair[0].0,
            });
        }
    }

    let mut dates = Vec::with_capacity(rows.len());
    let mut cells_by_column: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for (date, cells) in rows {
        dates.push(date);
        for (i, cell) in cells.into_iter().enumerate() {
            cells_by_column[i].push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells_by_column)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    Ok(Frame::from_parts(dates, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn panel() -> Frame {
        let dates = vec![date(2000, 1, 1), date(2000, 2, 1)];
        let cpi = Column::new(
            "Consumer Price Index Value",
            vec![Some("168.8".into()), Some(".".into())],
        );
        let gdp = Column::new(
            "Real Gross Domestic Product Value",
            vec![Some("13878.147".into()), None],
        );
        Frame::from_parts(dates, vec![cpi, gdp])
    }

    #[test]
    fn panel_round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");

        let original = panel();
        write_panel_csv(&path, &original).unwrap();
        let restored = read_panel_csv(&path).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn missing_cells_write_empty_and_read_back_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        write_panel_csv(&path, &panel()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,Consumer Price Index Value,Real Gross Domestic Product Value"
        );
        // The sentinel survives; the truly absent cell is empty.
        assert_eq!(lines[2], "2000-02-01,.,");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");

        let frame = Frame::from_parts(
            vec![date(2000, 1, 1)],
            vec![Column::new("Output, Total", vec![Some("1,234".into())])],
        );
        write_panel_csv(&path, &frame).unwrap();
        let restored = read_panel_csv(&path).unwrap();
        assert_eq!(restored, frame);
    }

    #[test]
    fn csv_without_a_date_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        std::fs::write(&path, "day,value\n2000-01-01,1\n").unwrap();

        assert!(matches!(
            read_panel_csv(&path),
            Err(PipelineError::Io { .. })
        ));
    }

    #[test]
    fn duplicate_dates_in_a_csv_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        std::fs::write(&path, "date,value\n2000-01-01,1\n2000-01-01,2\n").unwrap();

        assert!(matches!(
            read_panel_csv(&path),
            Err(PipelineError::DuplicateKey { .. })
        ));
    }
}
