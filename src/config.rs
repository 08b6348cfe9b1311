use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DesignerError, DesignerResult};
use crate::resize::DEFAULT_MIN_DIMENSION;
use crate::validator::validate_color;

/// Designer settings, loadable from a YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    /// Base URL used for public links and embed snippets
    pub public_host: String,
    /// Resize floor for width and height
    pub min_dimension: u32,
    /// Height attribute of the generated iframe snippet
    pub embed_height: u32,
    /// Canvas width shown in page settings
    pub canvas_width: u32,
    pub background_swatches: Vec<String>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            public_host: "http://localhost:3000".to_string(),
            min_dimension: DEFAULT_MIN_DIMENSION,
            embed_height: 600,
            canvas_width: 1024,
            background_swatches: [
                "#ffffff", "#f8fafc", "#f1f5f9", "#fef3c7", "#ecfdf5", "#eff6ff", "#1e293b",
                "#000000",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl DesignerConfig {
    pub fn from_yaml(yaml: &str) -> DesignerResult<Self> {
        let config: DesignerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> DesignerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DesignerError::ValidationError(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded designer config");
        Ok(config)
    }

    pub fn validate(&self) -> DesignerResult<()> {
        if self.min_dimension == 0 {
            return Err(DesignerError::ValueOutOfRange {
                property: "minDimension".to_string(),
                value: "0".to_string(),
                range: "1 or more".to_string(),
            });
        }
        if !(self.public_host.starts_with("http://") || self.public_host.starts_with("https://")) {
            return Err(DesignerError::ValidationError(format!(
                "publicHost '{}' must start with http:// or https://",
                self.public_host
            )));
        }
        for swatch in &self.background_swatches {
            validate_color(swatch, "backgroundSwatches")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DesignerConfig::from_yaml("publicHost: https://lms.example.com\n").unwrap();
        assert_eq!(config.public_host, "https://lms.example.com");
        assert_eq!(config.min_dimension, 50);
        assert_eq!(config.embed_height, 600);
    }

    #[test]
    fn test_zero_floor_rejected() {
        assert!(DesignerConfig::from_yaml("minDimension: 0\n").is_err());
    }

    #[test]
    fn test_bad_swatch_rejected() {
        let yaml = "backgroundSwatches:\n  - \"#fff\"\n  - \"not-a-color\"\n";
        assert!(matches!(
            DesignerConfig::from_yaml(yaml),
            Err(DesignerError::InvalidColor { .. })
        ));
    }
}
