//! Threshold filtering on sensitivity and specificity columns.

use crate::data::VariantTable;
use crate::error::{Result, SespError};
use crate::filter::config::FilterConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Rows passing the presence filter and rows passing the absence filter.
///
/// The two sets are computed independently and may overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredVariants {
    pub presence: VariantTable,
    pub absence: VariantTable,
}

/// Row counts at each filtering stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Rows in the input table.
    pub n_input: usize,
    /// Rows left after the p-value filter (equal to `n_input` when inactive).
    pub n_after_p_value: usize,
    /// Rows passing the presence filter.
    pub n_presence: usize,
    /// Rows passing the absence filter.
    pub n_absence: usize,
}

impl std::fmt::Display for FilterReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Filter Result")?;
        writeln!(f, "  Input:            {} variants", self.n_input)?;
        writeln!(f, "  After p-value:    {} variants", self.n_after_p_value)?;
        writeln!(f, "  Presence:         {} variants", self.n_presence)?;
        writeln!(f, "  Absence:          {} variants", self.n_absence)?;
        Ok(())
    }
}

/// Split a table into presence- and absence-associated variants.
///
/// When the p-value filter is active, only rows with a p-value strictly
/// below its threshold are considered. A row then passes the presence filter
/// when both its sensitivity and specificity of presence are strictly above
/// their thresholds, and likewise for absence. Missing values never pass.
///
/// # Errors
/// - `InvalidThreshold` when any threshold is outside `[0, 1]`
/// - `ColumnNotFound` listing every configured column absent from `table`
/// - `InvalidNumber` when a filtered column holds a non-numeric cell
pub fn filter_variants(table: &VariantTable, config: &FilterConfig) -> Result<FilteredVariants> {
    filter_variants_with_report(table, config).map(|(f, _)| f)
}

/// `filter_variants`, also returning row counts per stage.
pub fn filter_variants_with_report(
    table: &VariantTable,
    config: &FilterConfig,
) -> Result<(FilteredVariants, FilterReport)> {
    config.validate()?;
    require_columns(table, config)?;

    let cols = &config.columns;
    let th = &config.thresholds;

    let base: Vec<usize> = if config.p_value.is_active() {
        let pvals = table.numeric_column(&config.p_value.column)?;
        let kept: Vec<usize> = pvals
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p < config.p_value.threshold)
            .map(|(i, _)| i)
            .collect();
        info!(
            threshold = config.p_value.threshold,
            remaining = kept.len(),
            "filtered on p-value"
        );
        if kept.is_empty() && !table.is_empty() {
            warn!(column = %config.p_value.column, "no variant passes the p-value threshold");
        }
        kept
    } else {
        (0..table.n_rows()).collect()
    };

    let sensi_presence = table.numeric_column(&cols.sensi_presence)?;
    let speci_presence = table.numeric_column(&cols.speci_presence)?;
    let sensi_absence = table.numeric_column(&cols.sensi_absence)?;
    let speci_absence = table.numeric_column(&cols.speci_absence)?;

    let presence_rows: Vec<usize> = base
        .iter()
        .copied()
        .filter(|&i| {
            passes(
                sensi_presence[i],
                speci_presence[i],
                th.sensi_presence,
                th.speci_presence,
            )
        })
        .collect();
    let absence_rows: Vec<usize> = base
        .iter()
        .copied()
        .filter(|&i| {
            passes(
                sensi_absence[i],
                speci_absence[i],
                th.sensi_absence,
                th.speci_absence,
            )
        })
        .collect();

    let report = FilterReport {
        n_input: table.n_rows(),
        n_after_p_value: base.len(),
        n_presence: presence_rows.len(),
        n_absence: absence_rows.len(),
    };
    info!(
        presence = report.n_presence,
        absence = report.n_absence,
        "filtered on sensitivity/specificity"
    );
    debug!(?th, "thresholds applied");

    let filtered = FilteredVariants {
        presence: table.subset_rows(&presence_rows)?,
        absence: table.subset_rows(&absence_rows)?,
    };
    Ok((filtered, report))
}

/// Strictly above both thresholds. NaN fails.
#[inline]
fn passes(sensi: f64, speci: f64, sensi_thresh: f64, speci_thresh: f64) -> bool {
    sensi > sensi_thresh && speci > speci_thresh
}

fn require_columns(table: &VariantTable, config: &FilterConfig) -> Result<()> {
    let mut missing: Vec<&str> = Vec::new();
    let mut wanted: Vec<&str> = config.columns.all().to_vec();
    if config.p_value.is_active() {
        wanted.push(&config.p_value.column);
    }
    for name in wanted {
        if !table.has_column(name) && !missing.contains(&name) {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        return Ok(());
    }
    Err(SespError::ColumnNotFound {
        column: missing.join(", "),
        table: "variant".to_string(),
        available: table.columns().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::config::Thresholds;

    fn create_test_table() -> VariantTable {
        let gwas = "variant\tlrt-pvalue\tsensi_1\tsensi_0\tspeci_1\tspeci_0\n\
                    g1\t0.001\t0.5\t0.5\t0.99\t0.2\n\
                    g2\t0.05\t0.9\t0.1\t0.99\t0.01\n\
                    g3\t0.2\t0.0\t1.0\t0.1\t0.99\n\
                    g4\t0.01\t0.083\t0.9\t0.99\t0.99\n\
                    g5\tNA\t0.5\t0.5\tNA\t0.99\n";
        VariantTable::from_reader(gwas.as_bytes()).unwrap()
    }

    fn ids(table: &VariantTable) -> Vec<&str> {
        table.variant_ids().unwrap()
    }

    #[test]
    fn test_default_filter() {
        let table = create_test_table();
        let out = filter_variants(&table, &FilterConfig::default()).unwrap();

        // g4 sits exactly on the sensitivity threshold
        assert_eq!(ids(&out.presence), vec!["g1", "g2"]);
        // g5 has NA speci_1 but a valid absence pair
        assert_eq!(ids(&out.absence), vec!["g3", "g4", "g5"]);
    }

    #[test]
    fn test_subsets_can_overlap() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.thresholds.sensi_absence = 0.4;
        config.thresholds.speci_absence = 0.1;

        let out = filter_variants(&table, &config).unwrap();
        let presence = ids(&out.presence);
        let absence = ids(&out.absence);
        assert!(presence.contains(&"g1"));
        assert!(absence.contains(&"g1"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.thresholds = Thresholds {
            sensi_presence: 0.5,
            speci_presence: 0.0,
            sensi_absence: 1.0,
            speci_absence: 0.0,
        };
        let out = filter_variants(&table, &config).unwrap();
        assert_eq!(ids(&out.presence), vec!["g2"]);
        assert!(out.absence.is_empty());
    }

    #[test]
    fn test_specificity_threshold_is_exclusive() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.thresholds = Thresholds {
            sensi_presence: 0.0,
            speci_presence: 0.99,
            sensi_absence: 0.0,
            speci_absence: 0.99,
        };
        let out = filter_variants(&table, &config).unwrap();
        assert!(out.presence.is_empty());
        assert!(out.absence.is_empty());

        config.thresholds.speci_presence = 0.98;
        config.thresholds.speci_absence = 0.98;
        let out = filter_variants(&table, &config).unwrap();
        assert_eq!(ids(&out.presence), vec!["g1", "g2", "g4"]);
        assert_eq!(ids(&out.absence), vec!["g3", "g4", "g5"]);
    }

    #[test]
    fn test_p_value_filter_is_strict() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.p_value.threshold = 0.05;

        let (out, report) = filter_variants_with_report(&table, &config).unwrap();
        // g2 has p = 0.05 exactly, g5 has no p-value
        assert_eq!(report.n_after_p_value, 2);
        assert_eq!(ids(&out.presence), vec!["g1"]);
        assert_eq!(ids(&out.absence), vec!["g4"]);
        assert_eq!(out.presence.columns(), table.columns());
    }

    #[test]
    fn test_p_value_column_only_required_when_active() {
        let gwas = "variant\tsensi_1\tsensi_0\tspeci_1\tspeci_0\n\
                    g1\t0.5\t0.5\t0.99\t0.2\n";
        let table = VariantTable::from_reader(gwas.as_bytes()).unwrap();

        let out = filter_variants(&table, &FilterConfig::default()).unwrap();
        assert_eq!(out.presence.n_rows(), 1);

        let mut config = FilterConfig::default();
        config.p_value.threshold = 0.05;
        match filter_variants(&table, &config).unwrap_err() {
            SespError::ColumnNotFound { column, .. } => assert_eq!(column, "lrt-pvalue"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.columns.sensi_presence = "se1".to_string();
        config.columns.speci_absence = "sp0".to_string();

        let err = filter_variants(&table, &config).unwrap_err();
        match err {
            SespError::ColumnNotFound { column, available, .. } => {
                assert_eq!(column, "se1, sp0");
                assert!(available.contains(&"sensi_1".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_threshold_checked_first() {
        let table = create_test_table();
        let mut config = FilterConfig::default();
        config.thresholds.sensi_presence = 1.2;
        config.columns.sensi_presence = "missing".to_string();
        assert!(matches!(
            filter_variants(&table, &config),
            Err(SespError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = VariantTable::from_reader(
            "variant\tlrt-pvalue\tsensi_1\tsensi_0\tspeci_1\tspeci_0\n".as_bytes(),
        )
        .unwrap();
        let mut config = FilterConfig::default();
        config.p_value.threshold = 0.05;
        let (out, report) = filter_variants_with_report(&table, &config).unwrap();
        assert!(out.presence.is_empty());
        assert!(out.absence.is_empty());
        assert_eq!(report.n_input, 0);
    }
}
