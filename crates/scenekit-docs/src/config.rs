//! Documentation output configuration

use scenekit_core::{Result, SceneKitError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format for rendered documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

/// Settings for rendering documentation pages
///
/// ```toml
/// [docs]
/// format = "html"
/// title = "Entity reference"
/// heading_level = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub format: OutputFormat,
    pub title: String,
    pub include_descriptions: bool,
    /// HTML heading level of the page title (1-5); kind headings use the next level
    pub heading_level: u8,
    /// Append the schema fingerprint to registry output
    pub show_fingerprint: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            title: "Entity reference".to_string(),
            include_descriptions: true,
            heading_level: 2,
            show_fingerprint: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocsConfigFile {
    #[serde(default)]
    docs: DocsConfig,
}

impl DocsConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Parse the `[docs]` table of a TOML document; missing keys keep
    /// their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DocsConfigFile = toml::from_str(content)?;
        file.docs.validated()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validated(self) -> Result<Self> {
        // kind headings sit one level below the title and must stay within h6
        if !(1..=5).contains(&self.heading_level) {
            return Err(SceneKitError::InvalidConfig(format!(
                "heading_level must be between 1 and 5, got {}",
                self.heading_level
            )));
        }
        Ok(self)
    }
}
