//! Binary phenotype table keyed by sample identifier.

use crate::error::{Result, SespError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A phenotype value, interpreted by strict equality with 1 and 0.
#[derive(Debug, Clone, PartialEq)]
pub enum PhenotypeValue {
    /// Value equal to 1: sample belongs to the group of interest.
    Interest,
    /// Value equal to 0: sample belongs to the compared group.
    Compared,
    /// Any other value. The sample is left out of both groups.
    Other(String),
    /// Empty or `NA`.
    Missing,
}

impl PhenotypeValue {
    /// Interpret a raw cell.
    ///
    /// `1`, `1.0` and other spellings of one map to `Interest`, spellings of
    /// zero to `Compared`. Nothing is cast to a boolean: `2` or `yes` are
    /// `Other`.
    pub fn parse(raw: &str) -> Self {
        let v = raw.trim();
        if v.is_empty() || v == "NA" || v == "na" {
            return Self::Missing;
        }
        match v.parse::<f64>() {
            Ok(x) if x == 1.0 => Self::Interest,
            Ok(x) if x == 0.0 => Self::Compared,
            _ => Self::Other(v.to_string()),
        }
    }
}

/// Phenotype table: sample id -> column name -> value.
#[derive(Debug, Clone)]
pub struct PhenotypeTable {
    /// Sample IDs in file order.
    sample_ids: Vec<String>,
    /// Phenotype column names.
    column_names: Vec<String>,
    /// Values stored as sample_id -> column_name -> value.
    data: HashMap<String, HashMap<String, PhenotypeValue>>,
}

impl PhenotypeTable {
    /// Build a table from column names and `(sample_id, values)` rows.
    ///
    /// Rows shorter than the header are padded with missing values. A sample
    /// id that appears twice is rejected, since it could otherwise land in
    /// both groups.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut sample_ids = Vec::with_capacity(rows.len());
        let mut data = HashMap::with_capacity(rows.len());

        for (sample_id, values) in rows {
            if data.contains_key(&sample_id) {
                return Err(SespError::DuplicateSample(sample_id));
            }

            let sample_data: HashMap<String, PhenotypeValue> = column_names
                .iter()
                .enumerate()
                .map(|(col_idx, col_name)| {
                    let value = values
                        .get(col_idx)
                        .map(|raw| PhenotypeValue::parse(raw))
                        .unwrap_or(PhenotypeValue::Missing);
                    (col_name.clone(), value)
                })
                .collect();

            sample_ids.push(sample_id.clone());
            data.insert(sample_id, sample_data);
        }

        Ok(Self {
            sample_ids,
            column_names,
            data,
        })
    }

    /// Load a phenotype table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header (first column is the sample ID header)
    /// - Subsequent rows: sample ID followed by one value per phenotype
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a phenotype table from any buffered tab-separated source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| SespError::EmptyData("Empty phenotype file".to_string()))??;
        let header: Vec<&str> = header_line.split('\t').collect();
        let column_names: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();

        let mut rows = Vec::new();
        for line_result in lines {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let sample_id = fields[0].to_string();
            let values = fields[1..].iter().map(|s| s.to_string()).collect();
            rows.push((sample_id, values));
        }

        Self::from_rows(column_names, rows)
    }

    /// Sample IDs in order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// All `(sample_id, value)` pairs of a column, in sample order.
    pub fn column(&self, column: &str) -> Result<Vec<(&str, &PhenotypeValue)>> {
        if !self.has_column(column) {
            return Err(SespError::column_not_found(
                column,
                "phenotype",
                &self.column_names,
            ));
        }
        Ok(self
            .sample_ids
            .iter()
            .map(|sid| {
                let value = self
                    .data
                    .get(sid)
                    .and_then(|m| m.get(column))
                    .unwrap_or(&PhenotypeValue::Missing);
                (sid.as_str(), value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_tsv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sample\tbefore_2014\thost").unwrap();
        writeln!(file, "S1\t1\thuman").unwrap();
        writeln!(file, "S2\t0\tbovine").unwrap();
        writeln!(file, "S3\t1.0\thuman").unwrap();
        writeln!(file, "S4\tNA\tovine").unwrap();
        writeln!(file, "S5\t2").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_phenotypes() {
        let file = create_test_tsv();
        let pheno = PhenotypeTable::from_tsv(file.path()).unwrap();

        assert_eq!(pheno.n_samples(), 5);
        assert_eq!(pheno.column_names(), &["before_2014", "host"]);
        assert_eq!(pheno.sample_ids(), &["S1", "S2", "S3", "S4", "S5"]);
    }

    #[test]
    fn test_strict_equality() {
        let file = create_test_tsv();
        let pheno = PhenotypeTable::from_tsv(file.path()).unwrap();

        let values: Vec<PhenotypeValue> = pheno
            .column("before_2014")
            .unwrap()
            .into_iter()
            .map(|(_, v)| v.clone())
            .collect();
        assert_eq!(
            values,
            vec![
                PhenotypeValue::Interest,
                PhenotypeValue::Compared,
                PhenotypeValue::Interest,
                PhenotypeValue::Missing,
                PhenotypeValue::Other("2".to_string()),
            ]
        );

        // short row
        let host = pheno.column("host").unwrap();
        assert_eq!(host[4], ("S5", &PhenotypeValue::Missing));
    }

    #[test]
    fn test_missing_column() {
        let file = create_test_tsv();
        let pheno = PhenotypeTable::from_tsv(file.path()).unwrap();

        let err = pheno.column("resistance").unwrap_err();
        assert!(err.to_string().contains("resistance"));
        assert!(err.to_string().contains("before_2014"));
    }

    #[test]
    fn test_duplicate_sample_rejected() {
        let rows = vec![
            ("S1".to_string(), vec!["1".to_string()]),
            ("S1".to_string(), vec!["0".to_string()]),
        ];
        let err = PhenotypeTable::from_rows(vec!["pheno".to_string()], rows).unwrap_err();
        assert!(matches!(err, SespError::DuplicateSample(s) if s == "S1"));
    }
}
