//! Splitting samples into the group of interest and the compared group.

use crate::data::{PhenotypeTable, PhenotypeValue, PresenceAbsenceMatrix};
use crate::error::{Result, SespError};

/// Two disjoint sample groups derived from one binary phenotype column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePartition {
    /// Samples with phenotype 1.
    interest: Vec<String>,
    /// Samples with phenotype 0.
    compared: Vec<String>,
}

/// Matrix column masks for both groups.
#[derive(Debug, Clone)]
pub struct GroupMasks {
    pub interest: Vec<bool>,
    pub compared: Vec<bool>,
}

impl SamplePartition {
    /// Partition samples on one phenotype column.
    ///
    /// Samples equal to 1 go to `interest`, samples equal to 0 go to
    /// `compared`. Missing and other values are left out.
    pub fn from_phenotypes(phenotypes: &PhenotypeTable, column: &str) -> Result<Self> {
        let mut interest = Vec::new();
        let mut compared = Vec::new();

        for (sample_id, value) in phenotypes.column(column)? {
            match value {
                PhenotypeValue::Interest => interest.push(sample_id.to_string()),
                PhenotypeValue::Compared => compared.push(sample_id.to_string()),
                PhenotypeValue::Other(_) | PhenotypeValue::Missing => {}
            }
        }

        Ok(Self { interest, compared })
    }

    /// Samples in the group of interest.
    pub fn interest(&self) -> &[String] {
        &self.interest
    }

    /// Samples in the compared group.
    pub fn compared(&self) -> &[String] {
        &self.compared
    }

    /// Size of the group of interest.
    pub fn n_interest(&self) -> usize {
        self.interest.len()
    }

    /// Size of the compared group.
    pub fn n_compared(&self) -> usize {
        self.compared.len()
    }

    /// Fail with `EmptyGroup` if either group has no member.
    pub fn require_non_empty(&self, column: &str) -> Result<()> {
        if self.interest.is_empty() {
            return Err(SespError::EmptyGroup {
                group: "interest".to_string(),
                column: column.to_string(),
            });
        }
        if self.compared.is_empty() {
            return Err(SespError::EmptyGroup {
                group: "compared".to_string(),
                column: column.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve both groups to column masks of `matrix`.
    pub fn masks(&self, matrix: &PresenceAbsenceMatrix) -> Result<GroupMasks> {
        Ok(GroupMasks {
            interest: matrix.sample_mask(&self.interest)?,
            compared: matrix.sample_mask(&self.compared)?,
        })
    }
}
