//! Resolver configuration
//!
//! Loaded from YAML. Every section and field has a default, so an empty
//! document yields the stock behavior:
//!
//! ```yaml
//! selection:
//!   forward_tolerance_days: 7
//! ads:
//!   sku_asin_conflict: prefer_sku
//! targets:
//!   campaign_scoped_fallback: true
//! logging:
//!   filter: "ads_resolver=info"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for the forward snapshot window
pub const MAX_FORWARD_TOLERANCE_DAYS: u32 = 31;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub selection: SelectionConfig,
    pub ads: AdConfig,
    pub targets: TargetConfig,
    pub logging: LoggingConfig,
}

/// Snapshot selection window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// How many days after the reference date a snapshot may be dated
    pub forward_tolerance_days: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            forward_tolerance_days: crate::selector::DEFAULT_FORWARD_TOLERANCE_DAYS,
        }
    }
}

/// What to do when a row's SKU and ASIN point at different ads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkuAsinConflict {
    /// Trust the SKU match and never consult the ASIN
    #[default]
    PreferSku,
    /// Report both ids as an ambiguous resolution
    Ambiguous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdConfig {
    pub sku_asin_conflict: SkuAsinConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Retry unmapped search-term targets under the campaign instead of the ad group
    pub campaign_scoped_fallback: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            campaign_scoped_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ads_resolver=info".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = if content.trim().is_empty() {
            ResolverConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.forward_tolerance_days > MAX_FORWARD_TOLERANCE_DAYS {
            return Err(ConfigError::Invalid {
                field: "selection.forward_tolerance_days",
                reason: format!(
                    "{} exceeds the maximum of {} days",
                    self.selection.forward_tolerance_days, MAX_FORWARD_TOLERANCE_DAYS
                ),
            });
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
selection:
  forward_tolerance_days: 3
ads:
  sku_asin_conflict: ambiguous
targets:
  campaign_scoped_fallback: false
logging:
  filter: "ads_resolver=debug"
"#;

        let config = ResolverConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.selection.forward_tolerance_days, 3);
        assert_eq!(config.ads.sku_asin_conflict, SkuAsinConflict::Ambiguous);
        assert!(!config.targets.campaign_scoped_fallback);
        assert_eq!(config.logging.filter, "ads_resolver=debug");
    }

    #[test]
    fn test_defaults_from_partial_yaml() {
        let config = ResolverConfig::from_yaml("ads:\n  sku_asin_conflict: prefer_sku\n").unwrap();
        assert_eq!(config.selection.forward_tolerance_days, 7);
        assert!(config.targets.campaign_scoped_fallback);

        let empty = ResolverConfig::from_yaml("").unwrap();
        assert_eq!(empty, ResolverConfig::default());
    }

    #[test]
    fn test_rejects_oversized_tolerance() {
        let err = ResolverConfig::from_yaml("selection:\n  forward_tolerance_days: 90\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "selection.forward_tolerance_days",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = ResolverConfig::from_yaml("ads:\n  sku_asin_conflict: prefer_asin\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "selection:\n  forward_tolerance_days: 5").unwrap();

        let config = ResolverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.selection.forward_tolerance_days, 5);

        let missing = ResolverConfig::from_file("/nonexistent/resolver.yaml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
