//! Formatted terminal output for pull runs and panel previews.
//!
//! We keep formatting code in one place so:
//! - the table code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::table::Frame;

/// Format the run summary: per-series observation counts and panel shape.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== fredpanel - FRED series pull ===\n");
    for s in &run.series {
        out.push_str(&format!(
            "- {} -> '{}' ({} observations)\n",
            s.series_id, s.value_column, s.n_obs
        ));
    }
    out.push_str(&format!(
        "Panel: {} rows x {} columns\n",
        run.panel.n_rows(),
        run.panel.header().len()
    ));

    out
}

/// Render the first `rows` rows of a panel as a fixed-width table.
pub fn format_preview(panel: &Frame, rows: usize) -> String {
    let header = panel.header();
    let shown = rows.min(panel.n_rows());

    // Column widths from the header and the cells actually shown.
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in 0..shown {
        widths[0] = widths[0].max(panel.dates()[row].to_string().len());
        for (i, col) in panel.columns().iter().enumerate() {
            let len = col.cells()[row].as_deref().unwrap_or("").len();
            widths[i + 1] = widths[i + 1].max(len);
        }
    }

    let mut out = String::new();
    let mut line = Vec::with_capacity(header.len());
    for (name, &width) in header.iter().zip(&widths) {
        line.push(format!("{name:>width$}"));
    }
    out.push_str(&line.join("  "));
    out.push('\n');

    for row in 0..shown {
        let mut line = Vec::with_capacity(header.len());
        line.push(format!("{:>w$}", panel.dates()[row].to_string(), w = widths[0]));
        for (i, col) in panel.columns().iter().enumerate() {
            let cell = col.cells()[row].as_deref().unwrap_or("");
            line.push(format!("{cell:>w$}", w = widths[i + 1]));
        }
        out.push_str(&line.join("  "));
        out.push('\n');
    }

    if panel.n_rows() > shown {
        out.push_str(&format!("... ({} more rows)\n", panel.n_rows() - shown));
    }

    out
}
