use crate::config::serialize_config;
use crate::surface::{Rgb, TextStyle};
use crate::tip::DEFAULT_DURATION_MS;
use crate::{paths, PopupTipError, PopupTipResult};
use log::{trace, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Borders wider than this are clamped when the text style is built
pub const MAX_BORDER_WIDTH: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// How long a tip stays on screen when no duration is given, in milliseconds
    pub default_duration_ms: u64,
    /// Text color of the tip (RGB)
    pub foreground: Rgb,
    /// Background color of the tip (RGB)
    pub background: Rgb,
    /// Color of the line border around the tip (RGB)
    pub border_color: Rgb,
    /// Width of the line border in pixels (at most 16)
    pub border_width: u32,
}

impl Config {
    pub fn default_config_path() -> Option<PathBuf> {
        paths::default_config_path()
    }

    pub fn load(config_path: Option<&Path>, save: bool) -> PopupTipResult<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path().ok_or_else(|| {
                PopupTipError::Config("Could not determine default config directory".to_string())
            })?,
        };

        if !path.exists() {
            Self::create_default_config_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            PopupTipError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config: Config = serde_yaml::from_str(&contents).map_err(|e| {
            PopupTipError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.config_path = Some(path.clone());

        // Write back so any missing fields show up with their defaults
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    fn create_default_config_file(path: &Path) -> PopupTipResult<()> {
        Config::default().save_to_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> PopupTipResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        serialize_config(self, path)
    }

    /// Style of the shared text surface built from this config.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            foreground: self.foreground,
            background: self.background,
            border_color: self.border_color,
            border_width: self.border_width.min(MAX_BORDER_WIDTH),
            editable: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let style = TextStyle::default();
        Self {
            config_path: None,
            default_duration_ms: DEFAULT_DURATION_MS,
            foreground: style.foreground,
            background: style.background,
            border_color: style.border_color,
            border_width: style.border_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_text_style() {
        let config = Config::default();
        assert_eq!(config.default_duration_ms, 100);
        assert_eq!(config.text_style(), TextStyle::default());
    }

    #[test]
    fn test_text_style_clamps_border_width() {
        let config = Config {
            border_width: u32::MAX,
            ..Config::default()
        };
        assert_eq!(config.text_style().border_width, MAX_BORDER_WIDTH);

        let config = Config {
            border_width: 3,
            ..Config::default()
        };
        assert_eq!(config.text_style().border_width, 3);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config::load(Some(&path), false).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.default_duration_ms, DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_duration_ms: 750\nborder_width: 4\n").unwrap();

        let config = Config::load(Some(&path), true).unwrap();
        assert_eq!(config.default_duration_ms, 750);
        assert_eq!(config.border_width, 4);
        assert_eq!(config.background, (64, 64, 64));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("foreground"));
        assert!(written.contains("default_duration_ms: 750"));
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_duration_ms: [not, a, number]\n").unwrap();

        let result = Config::load(Some(&path), false);
        assert!(matches!(result, Err(PopupTipError::Config(_))));
    }
}
