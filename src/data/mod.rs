//! Data structures for sensitivity/specificity analysis.

mod phenotype;
mod presence_absence;
mod variant_table;

pub use phenotype::{PhenotypeTable, PhenotypeValue};
pub use presence_absence::{CellCounts, PresenceAbsenceMatrix};
pub use variant_table::{VariantTable, VARIANT_COLUMN};
