use serde::Deserialize;

use crate::error::ReviewError;
use crate::thresholds::Thresholds;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Review profile, usually loaded from a `.review.toml` file.
///
/// ```toml
/// name = "election-desk"
///
/// [thresholds]
/// auto_accept = 0.9
/// needs_review = 0.6
///
/// [export]
/// file_name = "verified_claims.json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub export: ExportConfig,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export target. Unset means the caller's own default applies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub file_name: Option<String>,
}

impl ReviewConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReviewError> {
        let config: ReviewConfig =
            toml::from_str(input).map_err(|e| ReviewError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReviewError> {
        self.thresholds.validate()?;

        if self.export.file_name.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ReviewError::ConfigValidation(
                "export.file_name must not be empty".into(),
            ));
        }

        Ok(())
    }
}
