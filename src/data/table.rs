//! Year-indexed observation table.
//!
//! Every column shares one contiguous year index, so any two series sliced
//! over the same range are aligned by construction.

use crate::domain::YearRange;
use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    first_year: i32,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ObservationTable {
    /// Build a table from an ascending, contiguous year index and named columns.
    pub fn new(years: &[i32], columns: Vec<(String, Vec<f64>)>) -> ModelResult<Self> {
        let Some(&first_year) = years.first() else {
            return Err(ModelError::InsufficientData { needed: 1, got: 0 });
        };
        for pair in years.windows(2) {
            if pair[1] != pair[0] + 1 {
                return Err(ModelError::InvalidArgument(format!(
                    "years must be contiguous and ascending; found {} followed by {}",
                    pair[0], pair[1]
                )));
            }
        }

        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            if column.len() != years.len() {
                return Err(ModelError::InvalidArgument(format!(
                    "column `{name}` has {} values for {} years",
                    column.len(),
                    years.len()
                )));
            }
            if names.contains(&name) {
                return Err(ModelError::InvalidArgument(format!("duplicate column `{name}`")));
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            first_year,
            names,
            columns: values,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.len() as i32 - 1
    }

    pub fn coverage(&self) -> YearRange {
        YearRange::new(self.first_year(), self.last_year())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Full column for a named series.
    pub fn series(&self, name: &str) -> ModelResult<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| ModelError::MissingSeries(name.to_string()))
    }

    /// Values of `name` over `range`. Every year must be present.
    pub fn slice(&self, name: &str, range: YearRange) -> ModelResult<&[f64]> {
        let column = self.series(name)?;
        if range.is_empty() || range.start < self.first_year() || range.end > self.last_year() {
            return Err(self.missing_years(range));
        }
        let lo = (range.start - self.first_year) as usize;
        let hi = (range.end - self.first_year) as usize;
        Ok(&column[lo..=hi])
    }

    /// Values of `name` over the part of `range` the table covers.
    ///
    /// Returns the covered sub-range alongside the values; the slice is empty when
    /// nothing overlaps.
    pub fn slice_clipped(&self, name: &str, range: YearRange) -> ModelResult<(YearRange, &[f64])> {
        let column = self.series(name)?;
        let start = range.start.max(self.first_year());
        let end = range.end.min(self.last_year());
        let covered = YearRange::new(start, end);
        if covered.is_empty() {
            return Ok((covered, &column[0..0]));
        }
        let lo = (start - self.first_year) as usize;
        let hi = (end - self.first_year) as usize;
        Ok((covered, &column[lo..=hi]))
    }

    /// Several series over one range, in the order requested.
    pub fn columns(&self, names: &[String], range: YearRange) -> ModelResult<Vec<Vec<f64>>> {
        names
            .iter()
            .map(|name| self.slice(name, range).map(<[f64]>::to_vec))
            .collect()
    }

    fn missing_years(&self, range: YearRange) -> ModelError {
        ModelError::MissingYears {
            start: range.start,
            end: range.end,
            first: self.first_year(),
            last: self.last_year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ObservationTable {
        ObservationTable::new(
            &[2000, 2001, 2002, 2003],
            vec![
                ("gdp".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
                ("inf".to_string(), vec![10.0, 20.0, 30.0, 40.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn slice_returns_requested_years() {
        let t = table();
        assert_eq!(t.slice("inf", YearRange::new(2001, 2002)).unwrap(), &[20.0, 30.0]);
        assert_eq!(t.coverage(), YearRange::new(2000, 2003));
    }

    #[test]
    fn slice_rejects_uncovered_years() {
        let err = table().slice("gdp", YearRange::new(1999, 2001)).unwrap_err();
        assert!(matches!(err, ModelError::MissingYears { start: 1999, .. }));
    }

    #[test]
    fn slice_clipped_trims_to_coverage() {
        let t = table();
        let (covered, values) = t.slice_clipped("gdp", YearRange::new(2002, 2006)).unwrap();
        assert_eq!(covered, YearRange::new(2002, 2003));
        assert_eq!(values, &[3.0, 4.0]);

        let (covered, values) = t.slice_clipped("gdp", YearRange::new(2010, 2012)).unwrap();
        assert!(covered.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn rejects_gaps_and_unknown_series() {
        let err = ObservationTable::new(&[2000, 2002], vec![("x".to_string(), vec![1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArgument(_)));
        assert!(matches!(table().series("une"), Err(ModelError::MissingSeries(_))));
    }
}
