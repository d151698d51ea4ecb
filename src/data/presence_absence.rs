//! Gene presence/absence matrix with sparse storage.

use crate::error::{Result, SespError};
use sprs::{CsMat, TriMat};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A sparse presence/absence matrix (e.g. a Roary `.Rtab`).
///
/// Rows are variants (genes), columns are samples. Row identifiers need not
/// be unique; every row sharing an identifier is kept.
#[derive(Debug, Clone)]
pub struct PresenceAbsenceMatrix {
    /// Sparse matrix in CSR format (variants × samples)
    data: CsMat<u32>,
    /// Variant identifiers (row names)
    variant_ids: Vec<String>,
    /// Sample identifiers (column names)
    sample_ids: Vec<String>,
    /// Variant id -> every row carrying it
    row_index: HashMap<String, Vec<usize>>,
    /// Sample id -> column
    sample_index: HashMap<String, usize>,
}

/// Cell counts of one variant restricted to one sample group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellCounts {
    /// Cells equal to 1.
    pub present: u64,
    /// Cells equal to 0.
    pub absent: u64,
}

impl PresenceAbsenceMatrix {
    /// Create a new matrix from a sparse matrix and identifiers.
    pub fn new(data: CsMat<u32>, variant_ids: Vec<String>, sample_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != variant_ids.len() {
            return Err(SespError::DimensionMismatch {
                expected: nrows,
                actual: variant_ids.len(),
            });
        }
        if ncols != sample_ids.len() {
            return Err(SespError::DimensionMismatch {
                expected: ncols,
                actual: sample_ids.len(),
            });
        }

        let mut row_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (row, id) in variant_ids.iter().enumerate() {
            row_index.entry(id.clone()).or_default().push(row);
        }
        let mut sample_index = HashMap::with_capacity(sample_ids.len());
        for (col, id) in sample_ids.iter().enumerate() {
            sample_index.entry(id.clone()).or_insert(col);
        }

        // CSR is required by row_counts
        let data = if data.is_csr() { data } else { data.to_csr() };

        Ok(Self {
            data,
            variant_ids,
            sample_ids,
            row_index,
            sample_index,
        })
    }

    /// Load a matrix from a TSV file.
    ///
    /// Expected format:
    /// - First row: header with sample IDs (first column is the variant ID header)
    /// - Subsequent rows: variant ID followed by one unsigned integer per sample
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a matrix from any buffered tab-separated source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| SespError::EmptyData("Empty presence/absence file".to_string()))??;
        let header: Vec<&str> = header_line.split('\t').collect();
        let sample_ids: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();
        let n_samples = sample_ids.len();

        let mut triplets: Vec<(usize, usize, u32)> = Vec::new();
        let mut variant_ids: Vec<String> = Vec::new();

        for line_result in lines {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != n_samples + 1 {
                return Err(SespError::DimensionMismatch {
                    expected: n_samples + 1,
                    actual: fields.len(),
                });
            }

            let row_idx = variant_ids.len();
            variant_ids.push(fields[0].to_string());

            for (col_idx, value_str) in fields[1..].iter().enumerate() {
                let value: u32 = value_str.trim().parse().map_err(|_| SespError::InvalidCell {
                    value: value_str.to_string(),
                    row: row_idx + 1,
                    column: sample_ids[col_idx].clone(),
                })?;
                if value > 0 {
                    triplets.push((row_idx, col_idx, value));
                }
            }
        }

        let mut tri_mat = TriMat::new((variant_ids.len(), n_samples));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), variant_ids, sample_ids)
    }

    /// Number of rows.
    #[inline]
    pub fn n_variants(&self) -> usize {
        self.data.rows()
    }

    /// Number of samples (columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.cols()
    }

    /// Variant identifiers, one per row.
    #[inline]
    pub fn variant_ids(&self) -> &[String] {
        &self.variant_ids
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Rows whose identifier equals `variant`. Empty when there is none.
    pub fn rows_for(&self, variant: &str) -> &[usize] {
        self.row_index.get(variant).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Column of a sample, if present.
    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_index.get(sample_id).copied()
    }

    /// Column mask selecting the given samples.
    ///
    /// Fails with `SampleNotFound` listing every sample without a column.
    pub fn sample_mask(&self, samples: &[String]) -> Result<Vec<bool>> {
        let mut mask = vec![false; self.n_samples()];
        let mut missing = Vec::new();
        for sample in samples {
            match self.sample_index(sample) {
                Some(col) => mask[col] = true,
                None => missing.push(sample.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(SespError::SampleNotFound { samples: missing });
        }
        Ok(mask)
    }

    /// Count cells equal to 1 and to 0 in one row, restricted to the masked
    /// columns. `group_size` is the number of `true` entries in `mask`.
    ///
    /// Values other than 0 and 1 are counted as neither.
    pub fn row_counts(&self, row: usize, mask: &[bool], group_size: usize) -> CellCounts {
        let mut present = 0u64;
        let mut nonzero = 0u64;
        if let Some(row_vec) = self.data.outer_view(row) {
            for (col, &val) in row_vec.iter() {
                if !mask[col] || val == 0 {
                    continue;
                }
                nonzero += 1;
                if val == 1 {
                    present += 1;
                }
            }
        }
        CellCounts {
            present,
            absent: group_size as u64 - nonzero,
        }
    }

    /// Sum of `row_counts` over every row identified by `variant`.
    pub fn variant_counts(&self, variant: &str, mask: &[bool], group_size: usize) -> CellCounts {
        self.rows_for(variant)
            .iter()
            .map(|&row| self.row_counts(row, mask, group_size))
            .fold(CellCounts::default(), |acc, c| CellCounts {
                present: acc.present + c.present,
                absent: acc.absent + c.absent,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RTAB: &str = "Gene\tA\tB\tC\tD\n\
                        geneX\t1\t1\t1\t0\n\
                        geneY\t0\t0\t1\t1\n\
                        geneX\t0\t1\t0\t0\n\
                        geneZ\t2\t0\t1\t0\n";

    fn create_test_matrix() -> PresenceAbsenceMatrix {
        PresenceAbsenceMatrix::from_reader(RTAB.as_bytes()).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.n_variants(), 4);
        assert_eq!(mat.n_samples(), 4);
        assert_eq!(mat.sample_ids(), &["A", "B", "C", "D"]);
    }

    #[test]
    fn test_duplicate_rows_indexed() {
        let mat = create_test_matrix();
        assert_eq!(mat.rows_for("geneX"), &[0, 2]);
        assert_eq!(mat.rows_for("geneY"), &[1]);
        assert!(mat.rows_for("geneW").is_empty());
    }

    #[test]
    fn test_row_counts() {
        let mat = create_test_matrix();
        let mask = mat.sample_mask(&["A".to_string(), "B".to_string()]).unwrap();

        let counts = mat.row_counts(0, &mask, 2);
        assert_eq!(counts, CellCounts { present: 2, absent: 0 });

        // value 2 is neither present nor absent
        let counts = mat.row_counts(3, &mask, 2);
        assert_eq!(counts, CellCounts { present: 0, absent: 1 });
    }

    #[test]
    fn test_variant_counts_sum_duplicate_rows() {
        let mat = create_test_matrix();
        let mask = mat.sample_mask(&["A".to_string(), "B".to_string()]).unwrap();

        let counts = mat.variant_counts("geneX", &mask, 2);
        assert_eq!(counts, CellCounts { present: 3, absent: 1 });

        let counts = mat.variant_counts("geneW", &mask, 2);
        assert_eq!(counts, CellCounts::default());
    }

    #[test]
    fn test_sample_mask_reports_missing() {
        let mat = create_test_matrix();
        let err = mat
            .sample_mask(&["A".to_string(), "E".to_string(), "F".to_string()])
            .unwrap_err();
        match err {
            SespError::SampleNotFound { samples } => assert_eq!(samples, vec!["E", "F"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_cell() {
        let err = PresenceAbsenceMatrix::from_reader("Gene\tA\ng1\tyes\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SespError::InvalidCell { row: 1, .. }));
    }

    #[test]
    fn test_short_row() {
        let err = PresenceAbsenceMatrix::from_reader("Gene\tA\tB\ng1\t1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SespError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }
}
