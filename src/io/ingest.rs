//! CSV ingest and validation.
//!
//! This module turns an annual panel CSV (`period` plus numeric columns) into an
//! `ObservationTable` that is safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** that reports every bad line, not just the first
//! - **Contiguous years**: the models assume no gaps, so a gap is an error
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::ObservationTable;
use crate::error::AppError;

/// Name of the year column.
pub const PERIOD_COLUMN: &str = "period";

/// How many row errors to quote in the failure message.
const MAX_REPORTED_ROW_ERRORS: usize = 5;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus where it came from.
#[derive(Debug, Clone)]
pub struct IngestedPanel {
    pub source: String,
    pub table: ObservationTable,
    pub rows_read: usize,
}

/// Load a panel CSV, keeping only the `required` value columns (in that order).
pub fn load_panel(path: &Path, required: &[String]) -> Result<IngestedPanel, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    load_panel_from_reader(file, &path.display().to_string(), required)
}

/// Same as [`load_panel`] but over any reader (used by tests).
pub fn load_panel_from_reader<R: Read>(
    reader: R,
    source: &str,
    required: &[String],
) -> Result<IngestedPanel, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{source}': {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    ensure_required_columns_exist(&header_map, required, source)?;

    let mut rows: Vec<(usize, i32, Vec<f64>)> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        match parse_row(&record, &header_map, required) {
            Ok((year, values)) => rows.push((line, year, values)),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        return Err(row_error_report(source, &row_errors));
    }
    if rows.is_empty() {
        return Err(AppError::new(3, format!("No data rows in '{source}'.")));
    }

    rows.sort_by_key(|(_, year, _)| *year);
    for pair in rows.windows(2) {
        let (line_a, year_a, _) = &pair[0];
        let (line_b, year_b, _) = &pair[1];
        if year_a == year_b {
            return Err(AppError::new(
                2,
                format!("Duplicate period {year_a} in '{source}' (lines {line_a} and {line_b})."),
            ));
        }
        if *year_b != year_a + 1 {
            return Err(AppError::new(
                3,
                format!("Missing years between {year_a} and {year_b} in '{source}'."),
            ));
        }
    }

    let years: Vec<i32> = rows.iter().map(|(_, year, _)| *year).collect();
    let columns = required
        .iter()
        .enumerate()
        .map(|(j, name)| (name.clone(), rows.iter().map(|(_, _, v)| v[j]).collect()))
        .collect();

    let table = ObservationTable::new(&years, columns)?;

    tracing::info!(
        source,
        rows = rows_read,
        first = table.first_year(),
        last = table.last_year(),
        "loaded panel"
    );

    Ok(IngestedPanel {
        source: source.to_string(),
        table,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(
    header_map: &HashMap<String, usize>,
    required: &[String],
    source: &str,
) -> Result<(), AppError> {
    if !header_map.contains_key(PERIOD_COLUMN) {
        return Err(AppError::new(
            2,
            format!("Missing required column `{PERIOD_COLUMN}` in '{source}'."),
        ));
    }
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| !header_map.contains_key(name.to_ascii_lowercase().as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Missing required column(s) in '{source}': {}", missing.join(", ")),
        ));
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    required: &[String],
) -> Result<(i32, Vec<f64>), String> {
    let raw_year = get_required(record, header_map, PERIOD_COLUMN)?;
    let year = raw_year
        .parse::<i32>()
        .map_err(|_| format!("Invalid `{PERIOD_COLUMN}` value '{raw_year}'."))?;

    let mut values = Vec::with_capacity(required.len());
    for name in required {
        let key = name.to_ascii_lowercase();
        let raw = get_required(record, header_map, &key)?;
        let v = raw
            .parse::<f64>()
            .map_err(|_| format!("Invalid `{name}` value '{raw}'."))?;
        if !v.is_finite() {
            return Err(format!("Non-finite `{name}` value '{raw}'."));
        }
        values.push(v);
    }
    Ok((year, values))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    key: &str,
) -> Result<&'a str, String> {
    header_map
        .get(key)
        .and_then(|&idx| record.get(idx))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{key}` value."))
}

fn row_error_report(source: &str, row_errors: &[RowError]) -> AppError {
    let mut msg = format!("{} invalid row(s) in '{source}':", row_errors.len());
    for err in row_errors.iter().take(MAX_REPORTED_ROW_ERRORS) {
        msg.push_str(&format!("\n  line {}: {}", err.line, err.message));
    }
    if row_errors.len() > MAX_REPORTED_ROW_ERRORS {
        msg.push_str(&format!("\n  ... and {} more", row_errors.len() - MAX_REPORTED_ROW_ERRORS));
    }
    AppError::new(2, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearRange;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn loads_and_orders_columns() {
        let csv = "\u{feff}Period,une,gdp,inf\n2001,5.0,2.0,1.0\n2000,6.0,3.0,1.5\n";
        let panel = load_panel_from_reader(csv.as_bytes(), "mem", &names(&["gdp", "une"])).unwrap();
        assert_eq!(panel.rows_read, 2);
        assert_eq!(panel.table.names(), &["gdp".to_string(), "une".to_string()]);
        assert_eq!(panel.table.coverage(), YearRange::new(2000, 2001));
        assert_eq!(panel.table.series("gdp").unwrap(), &[3.0, 2.0]);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let csv = "period,gdp\n2000,1.0\n";
        let err = load_panel_from_reader(csv.as_bytes(), "mem", &names(&["gdp", "inf"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("inf"));
    }

    #[test]
    fn gap_in_years_is_coverage_error() {
        let csv = "period,gdp\n2000,1.0\n2002,2.0\n";
        let err = load_panel_from_reader(csv.as_bytes(), "mem", &names(&["gdp"])).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bad_rows_are_all_reported() {
        let csv = "period,gdp\n2000,abc\n2001,\nxx,1.0\n";
        let err = load_panel_from_reader(csv.as_bytes(), "mem", &names(&["gdp"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("3 invalid row(s)"), "{msg}");
        assert!(msg.contains("line 2") && msg.contains("line 3") && msg.contains("line 4"));
    }

    #[test]
    fn duplicate_period_is_rejected() {
        let csv = "period,gdp\n2000,1.0\n2000,2.0\n";
        let err = load_panel_from_reader(csv.as_bytes(), "mem", &names(&["gdp"])).unwrap_err();
        assert!(err.to_string().contains("Duplicate period 2000"));
    }
}
