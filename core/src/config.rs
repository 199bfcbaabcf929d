//! Configuration types for the introspection engine

use crate::error::{MetamodelError, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for model assembly and validation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntrospectConfig {
    /// Cross-reference resolution configuration
    pub resolution: ResolutionConfig,

    /// Model validation configuration
    pub validation: ValidationConfig,
}

/// Cross-reference resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Allow a subtype to re-declare an inherited property to strengthen it
    pub allow_property_override: bool,

    /// Hard cap on super type chain length, on top of the declaration count bound
    pub max_inheritance_depth: Option<usize>,

    /// Require relationship targets to declare an identifier
    pub require_identified_relationships: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            allow_property_override: true,
            max_inheritance_depth: None,
            require_identified_relationships: true,
        }
    }
}

/// Model validation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check that default values are representable by the property type
    pub validate_default_values: bool,

    /// Check that validators are structurally compatible with the property type
    pub check_validator_compatibility: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_default_values: true,
            check_validator_compatibility: true,
        }
    }
}

impl IntrospectConfig {
    /// Check configuration values
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::ConfigError` if `max_inheritance_depth` is zero
    pub fn validate(&self) -> Result<()> {
        if self.resolution.max_inheritance_depth == Some(0) {
            return Err(MetamodelError::config(
                "resolution.max_inheritance_depth must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IntrospectConfig::default();
        assert!(config.resolution.allow_property_override);
        assert!(config.resolution.require_identified_relationships);
        assert_eq!(config.resolution.max_inheritance_depth, None);
        assert!(config.validation.validate_default_values);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let config: IntrospectConfig = serde_yaml::from_str(
            "resolution:\n  allow_property_override: false\n",
        )?;
        assert!(!config.resolution.allow_property_override);
        assert!(config.resolution.require_identified_relationships);
        assert!(config.validation.check_validator_compatibility);
        Ok(())
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut config = IntrospectConfig::default();
        config.resolution.max_inheritance_depth = Some(0);
        assert!(matches!(config.validate(), Err(MetamodelError::ConfigError(_))));
    }
}
