//! Filtering variants on sensitivity, specificity and p-value.

pub mod config;
pub mod threshold;

pub use config::{ColumnNames, FilterConfig, PValueFilter, Thresholds};
pub use threshold::{filter_variants, filter_variants_with_report, FilterReport, FilteredVariants};
