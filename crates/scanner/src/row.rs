use serde::Serialize;

use crate::parser::parse;

/// What the page should show for a freshly discovered result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowScan {
    /// Nothing usable in the filename; the row gets a "could not detect title" marker
    /// and no lookup button.
    Undetected,
    Ready {
        title: String,
        year: Option<String>,
        /// `title` or `title (year)`.
        label: String,
        tooltip: String,
        year_undetected: bool,
    },
}

pub fn scan_row(filename: &str) -> RowScan {
    let parsed = parse(filename);
    let Some(title) = parsed.title else {
        return RowScan::Undetected;
    };

    let label = match &parsed.year {
        Some(year) => format!("{title} ({year})"),
        None => title.clone(),
    };

    RowScan::Ready {
        tooltip: format!("Get info for \"{label}\""),
        year_undetected: parsed.year.is_none(),
        title,
        year: parsed.year,
        label,
    }
}
