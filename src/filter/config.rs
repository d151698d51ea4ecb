//! Column names and thresholds for sensitivity/specificity filtering.

use crate::error::{Result, SespError};
use crate::stats::sensi_speci::{SENSI_0, SENSI_1, SPECI_0, SPECI_1};
use serde::{Deserialize, Serialize};

/// Default sensitivity of presence threshold.
pub const DEFAULT_SENSI_PRESENCE_THRESH: f64 = 0.083;
/// Default specificity of presence threshold.
pub const DEFAULT_SPECI_PRESENCE_THRESH: f64 = 0.983;
/// Default sensitivity of absence threshold.
pub const DEFAULT_SENSI_ABSENCE_THRESH: f64 = 0.083;
/// Default specificity of absence threshold.
pub const DEFAULT_SPECI_ABSENCE_THRESH: f64 = 0.983;
/// Default p-value column, as written by pyseer.
pub const DEFAULT_P_VALUE_COLUMN: &str = "lrt-pvalue";

/// Names of the four columns the filter reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub sensi_presence: String,
    pub speci_presence: String,
    pub sensi_absence: String,
    pub speci_absence: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sensi_presence: SENSI_1.to_string(),
            speci_presence: SPECI_1.to_string(),
            sensi_absence: SENSI_0.to_string(),
            speci_absence: SPECI_0.to_string(),
        }
    }
}

impl ColumnNames {
    /// The four names, presence pair first.
    pub fn all(&self) -> [&str; 4] {
        [
            self.sensi_presence.as_str(),
            self.speci_presence.as_str(),
            self.sensi_absence.as_str(),
            self.speci_absence.as_str(),
        ]
    }
}

/// Lower bounds, each exclusive and in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub sensi_presence: f64,
    pub speci_presence: f64,
    pub sensi_absence: f64,
    pub speci_absence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sensi_presence: DEFAULT_SENSI_PRESENCE_THRESH,
            speci_presence: DEFAULT_SPECI_PRESENCE_THRESH,
            sensi_absence: DEFAULT_SENSI_ABSENCE_THRESH,
            speci_absence: DEFAULT_SPECI_ABSENCE_THRESH,
        }
    }
}

impl Thresholds {
    /// Fail with `InvalidThreshold` on the first value outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("sensi_presence", self.sensi_presence),
            ("speci_presence", self.speci_presence),
            ("sensi_absence", self.sensi_absence),
            ("speci_absence", self.speci_absence),
        ];
        for (name, value) in named {
            check_unit_interval(name, value)?;
        }
        Ok(())
    }
}

/// Optional pre-filter on a p-value column.
///
/// A threshold of 1.0 disables it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PValueFilter {
    pub column: String,
    pub threshold: f64,
}

impl Default for PValueFilter {
    fn default() -> Self {
        Self {
            column: DEFAULT_P_VALUE_COLUMN.to_string(),
            threshold: 1.0,
        }
    }
}

impl PValueFilter {
    /// Whether rows are restricted on p-value at all.
    pub fn is_active(&self) -> bool {
        self.threshold < 1.0
    }
}

/// Complete filter configuration.
///
/// Every field has a default, so a YAML file may set only what it changes:
///
/// ```yaml
/// thresholds:
///   speci_presence: 0.95
/// p_value:
///   threshold: 0.05
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub columns: ColumnNames,
    pub thresholds: Thresholds,
    pub p_value: PValueFilter,
}

impl FilterConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(SespError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(SespError::from)
    }

    /// Check every threshold, the p-value threshold included.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        check_unit_interval("p_value", self.p_value.threshold)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SespError::InvalidThreshold {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.columns.all(), ["sensi_1", "speci_1", "sensi_0", "speci_0"]);
        assert_eq!(config.thresholds.sensi_presence, 0.083);
        assert_eq!(config.thresholds.speci_presence, 0.983);
        assert_eq!(config.thresholds.sensi_absence, 0.083);
        assert_eq!(config.thresholds.speci_absence, 0.983);
        assert_eq!(config.p_value.column, "lrt-pvalue");
        assert!(!config.p_value.is_active());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "thresholds:\n  speci_presence: 0.95\np_value:\n  threshold: 0.05\n";
        let config = FilterConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.thresholds.speci_presence, 0.95);
        assert_eq!(config.thresholds.sensi_presence, 0.083);
        assert_eq!(config.p_value.threshold, 0.05);
        assert_eq!(config.p_value.column, "lrt-pvalue");
        assert!(config.p_value.is_active());
        assert_eq!(config.columns, ColumnNames::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = FilterConfig::default();
        config.columns.sensi_presence = "se1".to_string();
        config.thresholds.speci_absence = 0.9;

        let yaml = config.to_yaml().unwrap();
        assert_eq!(FilterConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = FilterConfig::default();
        config.thresholds.speci_absence = 1.5;
        match config.validate().unwrap_err() {
            SespError::InvalidThreshold { name, value } => {
                assert_eq!(name, "speci_absence");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut config = FilterConfig::default();
        config.thresholds.sensi_presence = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = FilterConfig::default();
        config.p_value.threshold = -0.01;
        assert!(matches!(
            config.validate(),
            Err(SespError::InvalidThreshold { ref name, .. }) if name == "p_value"
        ));
    }

    #[test]
    fn test_bounds_are_valid() {
        let mut config = FilterConfig::default();
        config.thresholds = Thresholds {
            sensi_presence: 0.0,
            speci_presence: 1.0,
            sensi_absence: 0.0,
            speci_absence: 1.0,
        };
        config.p_value.threshold = 0.0;
        assert!(config.validate().is_ok());
    }
}
