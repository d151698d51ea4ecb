//! Sensitivity and specificity of variants against a binary phenotype.

pub mod partition;
pub mod sensi_speci;

pub use partition::{GroupMasks, SamplePartition};
pub use sensi_speci::{
    compute_counts, compute_stats, compute_stats_with_report, count_variant, format_ratio,
    SensiSpeci, StatsReport, VariantCounts, DERIVED_COLUMNS,
};
