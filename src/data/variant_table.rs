//! GWAS variant table with arbitrary pass-through columns.

use crate::error::{Result, SespError};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Name of the variant identifier column.
pub const VARIANT_COLUMN: &str = "variant";

/// Cell values read as missing in numeric columns.
const MISSING_VALUES: &[&str] = &["", "NA", "na", "NaN", "nan", "N/A"];

/// An ordered table of GWAS results, one row per variant.
///
/// Cells are kept verbatim so that columns the analysis does not touch are
/// written back exactly as they were read. Row order is preserved by every
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTable {
    /// Column names in file order.
    columns: Vec<String>,
    /// Rows of cells, each `columns.len()` long.
    rows: Vec<Vec<String>>,
}

impl VariantTable {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(SespError::DimensionMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load a variant table from a tab-separated file with a header row.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a variant table from any tab-separated source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
            return Err(SespError::EmptyData(
                "Variant table has no header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Self::new(columns, rows)
    }

    /// Write the table to a tab-separated file. Cells are never quoted.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    /// Write the table to any sink as tab-separated text.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .from_writer(writer);

        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows (variants).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one row.
    #[inline]
    pub fn row(&self, index: usize) -> &[String] {
        &self.rows[index]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, failing with `ColumnNotFound` when absent.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SespError::column_not_found(name, "variant", &self.columns))
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Variant identifiers, in row order.
    pub fn variant_ids(&self) -> Result<Vec<&str>> {
        self.column(VARIANT_COLUMN)
    }

    /// Parse a column as floating point values.
    ///
    /// Missing markers (`NA`, empty cells, ...) become NaN, which never
    /// passes a threshold comparison.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let raw = row[idx].trim();
                if MISSING_VALUES.contains(&raw) {
                    return Ok(f64::NAN);
                }
                raw.parse::<f64>().map_err(|_| SespError::InvalidNumber {
                    value: row[idx].clone(),
                    row: row_idx + 1,
                    column: name.to_string(),
                })
            })
            .collect()
    }

    /// Set a column's values, replacing it in place if it already exists
    /// and appending it otherwise.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(SespError::DimensionMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Keep only the given rows, in the order given.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        for &idx in indices {
            let row = self.rows.get(idx).ok_or_else(|| SespError::DimensionMismatch {
                expected: self.rows.len(),
                actual: idx + 1,
            })?;
            rows.push(row.clone());
        }
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const GWAS: &str = "variant\taf\tlrt-pvalue\tnotes\n\
                        group_1\t0.25\t0.001\tplasmid\n\
                        group_2\t0.5\tNA\t\n\
                        group_3\t0.75\t0.2\t\"quoted\"\n";

    fn load() -> VariantTable {
        VariantTable::from_reader(GWAS.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_variant_table() {
        let table = load();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.columns(), &["variant", "af", "lrt-pvalue", "notes"]);
        assert_eq!(table.variant_ids().unwrap(), vec!["group_1", "group_2", "group_3"]);
        // quoting is disabled, quotes are ordinary characters
        assert_eq!(table.row(2)[3], "\"quoted\"");
    }

    #[test]
    fn test_numeric_column_missing_is_nan() {
        let table = load();
        let pvals = table.numeric_column("lrt-pvalue").unwrap();
        assert_eq!(pvals[0], 0.001);
        assert!(pvals[1].is_nan());
        assert_eq!(pvals[2], 0.2);
    }

    #[test]
    fn test_numeric_column_invalid() {
        let table = load();
        let err = table.numeric_column("notes").unwrap_err();
        assert!(matches!(err, SespError::InvalidNumber { row: 1, .. }));
    }

    #[test]
    fn test_missing_column_lists_available() {
        let table = load();
        match table.require_column("beta").unwrap_err() {
            SespError::ColumnNotFound { column, table, available } => {
                assert_eq!(column, "beta");
                assert_eq!(table, "variant");
                assert_eq!(available.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut table = load();
        table
            .set_column("score", vec!["1".into(), "2".into(), "3".into()])
            .unwrap();
        assert_eq!(table.n_columns(), 5);
        assert_eq!(table.columns()[4], "score");

        table
            .set_column("score", vec!["4".into(), "5".into(), "6".into()])
            .unwrap();
        assert_eq!(table.n_columns(), 5);
        assert_eq!(table.column("score").unwrap(), vec!["4", "5", "6"]);

        assert!(table.set_column("bad", vec!["1".into()]).is_err());
    }

    #[test]
    fn test_subset_rows_keeps_order() {
        let table = load();
        let subset = table.subset_rows(&[0, 2]).unwrap();
        assert_eq!(subset.variant_ids().unwrap(), vec!["group_1", "group_3"]);
        assert!(table.subset_rows(&[5]).is_err());
    }

    #[test]
    fn test_tsv_roundtrip_is_verbatim() {
        let table = load();
        let file = NamedTempFile::new().unwrap();
        table.to_tsv(file.path()).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, GWAS);
    }

    #[test]
    fn test_header_only_table() {
        let table = VariantTable::from_reader("variant\tlrt-pvalue\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_columns(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            VariantTable::from_reader("".as_bytes()),
            Err(SespError::EmptyData(_))
        ));
    }
}
