use serde::{Deserialize, Serialize};

use super::entry::Category;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Prefix for cost labels
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Maximum note width (terminal cells) in list output
    #[serde(default = "default_note_width")]
    pub note_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency: default_currency(),
            note_width: default_note_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Category used when none is given on the command line
    #[serde(default = "default_category")]
    pub category: Category,
    /// Initial intensity slider position
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            category: default_category(),
            intensity: default_intensity(),
        }
    }
}

fn default_currency() -> String {
    "£".to_string()
}

fn default_note_width() -> usize {
    40
}

fn default_category() -> Category {
    Category::Vaping
}

fn default_intensity() -> u8 {
    crate::ops::labels::DEFAULT_INTENSITY
}
