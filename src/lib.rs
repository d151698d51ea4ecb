//! Sensitivity and Specificity of GWAS-Associated Variants
//!
//! This library scores variants from a GWAS (for example pyseer output)
//! against a binary phenotype and a gene presence/absence matrix (for
//! example a Roary `.Rtab`), then keeps the variants whose presence or
//! absence discriminates the two phenotype groups.
//!
//! # Overview
//!
//! - **data**: Core data structures (VariantTable, PhenotypeTable, PresenceAbsenceMatrix)
//! - **stats**: Sample partitioning, per-variant counts and the four ratios
//! - **filter**: Threshold and p-value filtering into presence/absence subsets
//!
//! # Example
//!
//! ```no_run
//! use sensi_speci::prelude::*;
//!
//! let gwas = VariantTable::from_tsv("gwas.txt").unwrap();
//! let phenotypes = PhenotypeTable::from_tsv("phenotype.txt").unwrap();
//! let matrix = PresenceAbsenceMatrix::from_tsv("gene_presence_absence.Rtab").unwrap();
//!
//! let scored = compute_stats(&gwas, &phenotypes, &matrix, "resistant").unwrap();
//! let filtered = filter_variants(&scored, &FilterConfig::default()).unwrap();
//!
//! filtered.presence.to_tsv("presence_filtered_gwas.txt").unwrap();
//! filtered.absence.to_tsv("absence_filtered_gwas.txt").unwrap();
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod stats;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        CellCounts, PhenotypeTable, PhenotypeValue, PresenceAbsenceMatrix, VariantTable,
        VARIANT_COLUMN,
    };
    pub use crate::error::{Result, SespError};
    pub use crate::filter::{
        filter_variants, filter_variants_with_report, ColumnNames, FilterConfig, FilterReport,
        FilteredVariants, PValueFilter, Thresholds,
    };
    pub use crate::stats::{
        compute_counts, compute_stats, compute_stats_with_report, SamplePartition, SensiSpeci,
        StatsReport, VariantCounts, DERIVED_COLUMNS,
    };
}
