//! Per-variant sensitivity and specificity against a binary phenotype.
//!
//! For each variant the presence/absence matrix is restricted to the rows
//! carrying that variant and to the samples of each group, then cells equal
//! to 1 and to 0 are counted:
//!
//! | column | value |
//! |---|---|
//! | `sensi_1` | present in interest / \|interest\| |
//! | `sensi_0` | absent in interest / \|interest\| |
//! | `speci_1` | absent in compared / \|compared\| |
//! | `speci_0` | present in compared / \|compared\| |
//!
//! followed by the four raw counts.

use crate::data::{PhenotypeTable, PresenceAbsenceMatrix, VariantTable};
use crate::error::Result;
use crate::stats::partition::{GroupMasks, SamplePartition};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const SENSI_1: &str = "sensi_1";
pub const SENSI_0: &str = "sensi_0";
pub const SPECI_1: &str = "speci_1";
pub const SPECI_0: &str = "speci_0";
pub const MUTATION_IN_INTEREST: &str = "mutation_in_interest";
pub const MUTATION_NOT_IN_INTEREST: &str = "mutation_not_in_interest";
pub const MUTATION_IN_COMPARED: &str = "mutation_in_compared";
pub const MUTATION_NOT_IN_COMPARED: &str = "mutation_not_in_compared";

/// Derived columns in the order they are appended.
pub const DERIVED_COLUMNS: [&str; 8] = [
    SENSI_1,
    SENSI_0,
    SPECI_1,
    SPECI_0,
    MUTATION_IN_INTEREST,
    MUTATION_NOT_IN_INTEREST,
    MUTATION_IN_COMPARED,
    MUTATION_NOT_IN_COMPARED,
];

/// Raw cell counts of one variant in both groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCounts {
    /// Cells equal to 1 among interest samples.
    pub mutation_in_interest: u64,
    /// Cells equal to 0 among interest samples.
    pub mutation_not_in_interest: u64,
    /// Cells equal to 1 among compared samples.
    pub mutation_in_compared: u64,
    /// Cells equal to 0 among compared samples.
    pub mutation_not_in_compared: u64,
}

/// The four ratios of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensiSpeci {
    /// Sensitivity of presence.
    pub sensi_1: f64,
    /// Sensitivity of absence.
    pub sensi_0: f64,
    /// Specificity of presence.
    pub speci_1: f64,
    /// Specificity of absence.
    pub speci_0: f64,
}

impl VariantCounts {
    /// Ratios over the group sizes. Both sizes must be non-zero.
    pub fn ratios(&self, n_interest: usize, n_compared: usize) -> SensiSpeci {
        let ni = n_interest as f64;
        let nc = n_compared as f64;
        SensiSpeci {
            sensi_1: self.mutation_in_interest as f64 / ni,
            sensi_0: self.mutation_not_in_interest as f64 / ni,
            speci_1: self.mutation_not_in_compared as f64 / nc,
            speci_0: self.mutation_in_compared as f64 / nc,
        }
    }
}

/// Summary of one stats run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Rows in the variant table.
    pub n_variants: usize,
    /// Samples with phenotype 1.
    pub n_interest: usize,
    /// Samples with phenotype 0.
    pub n_compared: usize,
    /// Variants with at least one matrix row.
    pub n_matched: usize,
}

impl std::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sensitivity/Specificity")?;
        writeln!(f, "  Variants:        {}", self.n_variants)?;
        writeln!(f, "  In matrix:       {}", self.n_matched)?;
        writeln!(f, "  Interest (1):    {} samples", self.n_interest)?;
        writeln!(f, "  Compared (0):    {} samples", self.n_compared)?;
        Ok(())
    }
}

/// Count one variant in both groups.
pub fn count_variant(
    matrix: &PresenceAbsenceMatrix,
    variant: &str,
    masks: &GroupMasks,
    partition: &SamplePartition,
) -> VariantCounts {
    let interest = matrix.variant_counts(variant, &masks.interest, partition.n_interest());
    let compared = matrix.variant_counts(variant, &masks.compared, partition.n_compared());
    VariantCounts {
        mutation_in_interest: interest.present,
        mutation_not_in_interest: interest.absent,
        mutation_in_compared: compared.present,
        mutation_not_in_compared: compared.absent,
    }
}

/// Count every variant of `variants`, in row order.
pub fn compute_counts(
    variants: &VariantTable,
    matrix: &PresenceAbsenceMatrix,
    partition: &SamplePartition,
) -> Result<Vec<VariantCounts>> {
    let ids = variants.variant_ids()?;
    let masks = partition.masks(matrix)?;

    let counts = ids
        .par_iter()
        .map(|id| count_variant(matrix, id, &masks, partition))
        .collect();
    Ok(counts)
}

/// Compute sensitivity and specificity columns for every variant.
///
/// Returns a copy of `variants` with the eight derived columns appended (or
/// overwritten in place when already present). Row order and count are
/// unchanged; a variant without any matrix row gets zero counts.
///
/// # Errors
/// - `ColumnNotFound` when `phenotype_column` is not in `phenotypes`, or the
///   variant table has no `variant` column
/// - `EmptyGroup` when no sample has phenotype 1, or none has 0
/// - `SampleNotFound` when a partitioned sample is not a matrix column
pub fn compute_stats(
    variants: &VariantTable,
    phenotypes: &PhenotypeTable,
    matrix: &PresenceAbsenceMatrix,
    phenotype_column: &str,
) -> Result<VariantTable> {
    compute_stats_with_report(variants, phenotypes, matrix, phenotype_column).map(|(t, _)| t)
}

/// `compute_stats`, also returning a summary of the run.
pub fn compute_stats_with_report(
    variants: &VariantTable,
    phenotypes: &PhenotypeTable,
    matrix: &PresenceAbsenceMatrix,
    phenotype_column: &str,
) -> Result<(VariantTable, StatsReport)> {
    let partition = SamplePartition::from_phenotypes(phenotypes, phenotype_column)?;
    partition.require_non_empty(phenotype_column)?;
    info!(
        column = phenotype_column,
        interest = partition.n_interest(),
        compared = partition.n_compared(),
        "partitioned samples"
    );

    let counts = compute_counts(variants, matrix, &partition)?;
    let table = augment(variants, &counts, &partition)?;

    let ids = variants.variant_ids()?;
    let n_matched = ids.iter().filter(|id| !matrix.rows_for(id).is_empty()).count();
    if n_matched < ids.len() {
        warn!(
            missing = ids.len() - n_matched,
            "variants without a presence/absence row get zero counts"
        );
    }

    let report = StatsReport {
        n_variants: variants.n_rows(),
        n_interest: partition.n_interest(),
        n_compared: partition.n_compared(),
        n_matched,
    };
    debug!(?report, "stats computed");
    Ok((table, report))
}

fn augment(
    variants: &VariantTable,
    counts: &[VariantCounts],
    partition: &SamplePartition,
) -> Result<VariantTable> {
    let ratios: Vec<SensiSpeci> = counts
        .iter()
        .map(|c| c.ratios(partition.n_interest(), partition.n_compared()))
        .collect();

    let mut table = variants.clone();
    table.set_column(SENSI_1, ratios.iter().map(|r| format_ratio(r.sensi_1)).collect())?;
    table.set_column(SENSI_0, ratios.iter().map(|r| format_ratio(r.sensi_0)).collect())?;
    table.set_column(SPECI_1, ratios.iter().map(|r| format_ratio(r.speci_1)).collect())?;
    table.set_column(SPECI_0, ratios.iter().map(|r| format_ratio(r.speci_0)).collect())?;
    table.set_column(
        MUTATION_IN_INTEREST,
        counts.iter().map(|c| c.mutation_in_interest.to_string()).collect(),
    )?;
    table.set_column(
        MUTATION_NOT_IN_INTEREST,
        counts.iter().map(|c| c.mutation_not_in_interest.to_string()).collect(),
    )?;
    table.set_column(
        MUTATION_IN_COMPARED,
        counts.iter().map(|c| c.mutation_in_compared.to_string()).collect(),
    )?;
    table.set_column(
        MUTATION_NOT_IN_COMPARED,
        counts.iter().map(|c| c.mutation_not_in_compared.to_string()).collect(),
    )?;
    Ok(table)
}

/// Format a ratio the way tabular tools print floats: `1.0`, `0.5`,
/// `0.3333333333333333`.
pub fn format_ratio(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
