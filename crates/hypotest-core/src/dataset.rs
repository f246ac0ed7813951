//! Tabular input data
//!
//! A [`Dataset`] is an ordered list of named numeric [`Column`]s. Columns may
//! differ in length: each one holds only the values that were actually
//! present in the input, so a column per independent group is as natural
//! as a column per measured variable.
//!
//! # Input formats
//!
//! - **Delimited files** ([`Dataset::from_csv_reader`]): one record per line,
//!   a header row naming the columns (optional), a single-byte delimiter.
//! - **Pasted text** ([`Dataset::from_manual_text`]): one row per line, values
//!   separated by runs of spaces and commas, no header. Columns are named
//!   `Column_1..Column_N`.
//!
//! In both formats an empty cell (or `NA`, `N/A`, `NaN`, `null` in any case)
//! is missing and simply skipped. Rows shorter than the first row leave their
//! trailing cells missing; longer rows are rejected, as are infinite values.
//!
//! Each column remembers which data row every value came from, so two
//! columns can still be matched row by row ([`Column::paired_with`]).
//!
//! # Examples
//!
//! ```
//! use hypotest_core::dataset::Dataset;
//!
//! let dataset = Dataset::from_manual_text("1 2\n3, 4\n5").unwrap();
//! assert_eq!(dataset.column_names().collect::<Vec<_>>(), ["Column_1", "Column_2"]);
//! assert_eq!(dataset.column("Column_2").unwrap().values(), [2.0, 4.0]);
//! ```

use std::{cmp::Ordering, collections::HashSet, io::Read};

use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;

/// Cell spellings treated as missing values, compared ignoring ASCII case.
const MISSING_MARKERS: [&str; 5] = ["", "NA", "N/A", "NaN", "null"];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("input contains no data rows")]
    Empty,
    #[display("line {line}: expected {expected} fields, saw {actual}")]
    RaggedRow {
        line: u64,
        expected: usize,
        actual: usize,
    },
    #[display("line {line}, column '{column}': '{value}' is not a number")]
    NotANumber {
        line: u64,
        column: String,
        value: String,
    },
    #[display("duplicate column name '{name}'")]
    DuplicateColumn { name: String },
    #[display("malformed delimited input")]
    Csv(csv::Error),
}

/// A named sequence of observed numeric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    values: Vec<f64>,
    /// Zero-based data row of each value, strictly increasing.
    #[serde(skip)]
    rows: Vec<usize>,
}

impl Column {
    /// Creates a column without missing cells: value `i` sits in row `i`.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let rows = (0..values.len()).collect();
        Self {
            name: name.into(),
            values,
            rows,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Data row of each value.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Values of the rows where both columns are observed, as
    /// `(self, other)` in row order.
    ///
    /// ```
    /// use hypotest_core::dataset::Dataset;
    ///
    /// let input = "a,b\n1,1.5\n100,\n3,3.5\n,104\n";
    /// let dataset = Dataset::from_csv_reader(input.as_bytes(), b',', true).unwrap();
    /// let (a, b) = dataset.column("a").unwrap().paired_with(dataset.column("b").unwrap());
    /// assert_eq!(a, [1.0, 3.0]);
    /// assert_eq!(b, [1.5, 3.5]);
    /// ```
    #[must_use]
    pub fn paired_with(&self, other: &Self) -> (Vec<f64>, Vec<f64>) {
        let mut left = vec![];
        let mut right = vec![];
        let (mut i, mut j) = (0, 0);
        while i < self.rows.len() && j < other.rows.len() {
            match self.rows[i].cmp(&other.rows[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    left.push(self.values[i]);
                    right.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        (left, right)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of uniquely named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates a dataset, rejecting duplicate column names.
    pub fn new(columns: Vec<Column>) -> Result<Self, ParseError> {
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(ParseError::DuplicateColumn {
                name: dup.name.clone(),
            });
        }
        Ok(Self { columns })
    }

    /// Parses delimited data.
    ///
    /// With `has_header` the first record names the columns; otherwise they
    /// are named `Column_1..Column_N`.
    ///
    /// ```
    /// use hypotest_core::dataset::Dataset;
    ///
    /// let input = "before,after\n1.5,2.0\n2.5,\n3.0,4.5\n";
    /// let dataset = Dataset::from_csv_reader(input.as_bytes(), b',', true).unwrap();
    /// assert_eq!(dataset.column("before").unwrap().values(), [1.5, 2.5, 3.0]);
    /// assert_eq!(dataset.column("after").unwrap().values(), [2.0, 4.5]);
    /// ```
    pub fn from_csv_reader<R>(reader: R, delimiter: u8, has_header: bool) -> Result<Self, ParseError>
    where
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = if has_header {
            Some(
                reader
                    .headers()
                    .map_err(ParseError::Csv)?
                    .iter()
                    .map(str::to_owned)
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        let mut builder = ColumnsBuilder::new(header);
        for record in reader.records() {
            let record = record.map_err(ParseError::Csv)?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.iter().all(str::is_empty) {
                continue;
            }
            builder.push_row(line, record.iter())?;
        }
        builder.finish()
    }

    /// Parses freeform text: rows on separate lines, values separated by any
    /// run of spaces and commas.
    pub fn from_manual_text(text: &str) -> Result<Self, ParseError> {
        let mut builder = ColumnsBuilder::new(None);
        for (idx, line) in text.lines().enumerate() {
            let mut fields = line
                .split([' ', ','])
                .filter(|field| !field.is_empty())
                .peekable();
            if fields.peek().is_none() {
                continue;
            }
            builder.push_row(idx as u64 + 1, fields)?;
        }
        builder.finish()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AnalysisError::UnknownColumn {
                name: name.to_owned(),
            })
    }

    /// Looks up several columns by name, preserving the requested order.
    pub fn columns_by_name<S>(&self, names: &[S]) -> Result<Vec<&Column>, AnalysisError>
    where
        S: AsRef<str>,
    {
        names.iter().map(|name| self.column(name.as_ref())).collect()
    }
}

/// Accumulates rows into per-column value lists.
#[derive(Debug)]
struct ColumnsBuilder {
    names: Option<Vec<String>>,
    columns: Vec<(Vec<f64>, Vec<usize>)>,
    rows: usize,
}

impl ColumnsBuilder {
    fn new(names: Option<Vec<String>>) -> Self {
        let columns = names
            .as_ref()
            .map_or_else(Vec::new, |names| vec![(vec![], vec![]); names.len()]);
        Self {
            names,
            columns,
            rows: 0,
        }
    }

    fn push_row<'a, I>(&mut self, line: u64, fields: I) -> Result<(), ParseError>
    where
        I: Iterator<Item = &'a str>,
    {
        let fields = fields.collect::<Vec<_>>();
        let names = self.names.get_or_insert_with(|| {
            (1..=fields.len()).map(|i| format!("Column_{i}")).collect()
        });
        if self.columns.len() < names.len() {
            self.columns.resize_with(names.len(), Default::default);
        }
        if fields.len() > names.len() {
            return Err(ParseError::RaggedRow {
                line,
                expected: names.len(),
                actual: fields.len(),
            });
        }

        let cells = fields.iter().zip(names.iter()).zip(&mut self.columns);
        for ((field, name), (values, rows)) in cells {
            let field = field.trim();
            if MISSING_MARKERS
                .iter()
                .any(|marker| marker.eq_ignore_ascii_case(field))
            {
                continue;
            }
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseError::NotANumber {
                    line,
                    column: name.clone(),
                    value: field.to_owned(),
                })?;
            values.push(value);
            rows.push(self.rows);
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> Result<Dataset, ParseError> {
        if self.rows == 0 {
            return Err(ParseError::Empty);
        }
        let names = self.names.unwrap_or_default();
        debug!(rows = self.rows, columns = names.len(), "parsed dataset");
        Dataset::new(
            names
                .into_iter()
                .zip(self.columns)
                .map(|(name, (values, rows))| Column {
                    name,
                    values,
                    rows,
                })
                .collect(),
        )
    }
}
