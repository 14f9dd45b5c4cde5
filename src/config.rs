use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::heatmap::{AutoScale, Mode, RenderOptions, GITHUB_COLORS};

/// Upper bound for `cell_size`, `cell_padding` and `font_size`.
pub const MAX_PIXELS: u32 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Github,
    Halloween,
    Ocean,
    Amber,
}

impl Palette {
    pub fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Halloween => "Halloween",
            Self::Ocean => "Ocean",
            Self::Amber => "Amber",
        }
    }

    /// Five colors, lowest intensity first.
    pub fn colors(self) -> [&'static str; 5] {
        match self {
            Self::Github => GITHUB_COLORS,
            Self::Halloween => ["#ebedf0", "#ffee4a", "#ffc501", "#fe9600", "#03001c"],
            Self::Ocean => ["#e8f1f8", "#a5c8e4", "#5e9fd1", "#2b6aa6", "#123e6b"],
            Self::Amber => ["#f4efe6", "#f5d58a", "#eeb446", "#d5861c", "#8f4d0b"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    pub palette: Palette,
    /// Overrides the palette when set.
    pub colors: Option<Vec<String>>,
    pub value_ranges: Option<Vec<i64>>,
    pub auto_scale: AutoScale,
    pub cell_size: u32,
    pub cell_padding: u32,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            mode: options.mode,
            palette: Palette::Github,
            colors: None,
            value_ranges: None,
            auto_scale: options.auto_scale,
            cell_size: options.cell_size,
            cell_padding: options.cell_padding,
            font_size: options.font_size,
            font_family: options.font_family,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("heatmark").join("config.toml"))
    }

    /// Loads the user config, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Loads an explicitly named config file; any failure is reported.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| Error::InvalidConfig("no config directory on this platform".into()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn colors(&self) -> Vec<String> {
        match &self.colors {
            Some(colors) => colors.clone(),
            None => self.palette.colors().iter().map(|c| c.to_string()).collect(),
        }
    }

    /// A wrong-length `value_ranges` is accepted here; rendering falls back to
    /// auto-scaling for it.
    pub fn validate(&self) -> Result<()> {
        if self.colors().len() < 2 {
            return Err(Error::InvalidConfig("at least two colors are required".into()));
        }
        if self.cell_size == 0 {
            return Err(Error::InvalidConfig("cell_size must be positive".into()));
        }
        for (name, size) in [
            ("cell_size", self.cell_size),
            ("cell_padding", self.cell_padding),
            ("font_size", self.font_size),
        ] {
            if size > MAX_PIXELS {
                return Err(Error::InvalidConfig(format!(
                    "{} must be at most {}",
                    name, MAX_PIXELS
                )));
            }
        }
        if let Some(ref ranges) = self.value_ranges {
            if ranges.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::InvalidConfig(
                    "value_ranges must be strictly ascending".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.mode,
            cell_size: self.cell_size,
            cell_padding: self.cell_padding,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            colors: self.colors(),
            value_ranges: self.value_ranges.clone(),
            auto_scale: self.auto_scale,
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ─────────────────────────────────────────────────────────────────────────────
    // Palette tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn palette_default() {
        assert_eq!(Palette::default(), Palette::Github);
    }

    #[test]
    fn palette_labels_unique() {
        let labels: Vec<_> = Palette::value_variants().iter().map(|p| p.label()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
    }

    #[test]
    fn palette_colors_are_hex() {
        for &palette in Palette::value_variants() {
            for color in palette.colors() {
                assert!(color.starts_with('#'), "{:?} has {}", palette, color);
                assert_eq!(color.len(), 7);
            }
        }
    }

    #[test]
    fn github_palette_matches_engine_default() {
        assert_eq!(
            AppConfig::default().render_options().colors,
            RenderOptions::default().colors
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // AppConfig tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.mode, Mode::Yearly);
        assert_eq!(config.palette, Palette::Github);
        assert_eq!(config.auto_scale, AutoScale::ZeroReserved);
        assert_eq!(config.cell_size, 11);
        assert_eq!(config.cell_padding, 2);
        assert_eq!(config.font_size, 10);
        assert!(config.colors.is_none());
        assert!(config.value_ranges.is_none());
    }

    #[test]
    fn app_config_deserialize_with_missing_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            palette = "ocean"
            cell_size = 14
            auto_scale = "linear"
            mode = "weekly"
        "#,
        )
        .unwrap();
        assert_eq!(config.palette, Palette::Ocean);
        assert_eq!(config.cell_size, 14);
        assert_eq!(config.auto_scale, AutoScale::Linear);
        assert_eq!(config.mode, Mode::Weekly);
        assert_eq!(config.font_size, 10);
    }

    #[test]
    fn app_config_deserialize_empty_string() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn app_config_toml_roundtrip() {
        let config = AppConfig {
            palette: Palette::Amber,
            colors: Some(vec!["#fff".into(), "#000".into()]),
            value_ranges: Some(vec![3]),
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn explicit_colors_override_palette() {
        let config = AppConfig {
            palette: Palette::Halloween,
            colors: Some(vec!["#fff".into(), "#000".into()]),
            ..AppConfig::default()
        };
        assert_eq!(config.colors(), vec!["#fff".to_string(), "#000".to_string()]);
    }

    #[test]
    fn validate_rejects_single_color() {
        let config = AppConfig {
            colors: Some(vec!["#fff".into()]),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_unsorted_ranges() {
        let config = AppConfig {
            value_ranges: Some(vec![1, 5, 5, 9]),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_wrong_length_ranges() {
        let config = AppConfig {
            value_ranges: Some(vec![1, 2]),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_cell() {
        let config = AppConfig {
            cell_size: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_caps_pixel_sizes() {
        let huge_cell = AppConfig {
            cell_size: u32::MAX / 2,
            ..AppConfig::default()
        };
        assert!(matches!(
            huge_cell.validate(),
            Err(Error::InvalidConfig(ref m)) if m == "cell_size must be at most 1024"
        ));

        let huge_padding = AppConfig {
            cell_padding: MAX_PIXELS + 1,
            ..AppConfig::default()
        };
        assert!(huge_padding.validate().is_err());

        let huge_font = AppConfig {
            font_size: MAX_PIXELS + 1,
            ..AppConfig::default()
        };
        assert!(huge_font.validate().is_err());

        let at_limit = AppConfig {
            cell_size: MAX_PIXELS,
            cell_padding: MAX_PIXELS,
            font_size: MAX_PIXELS,
            ..AppConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn render_options_carry_config() {
        let config = AppConfig {
            mode: Mode::Daily,
            value_ranges: Some(vec![1, 2, 3, 4]),
            font_family: "monospace".into(),
            ..AppConfig::default()
        };
        let opts = config.render_options();
        assert_eq!(opts.mode, Mode::Daily);
        assert_eq!(opts.value_ranges, Some(vec![1, 2, 3, 4]));
        assert_eq!(opts.font_family, "monospace");
        assert!(opts.project_name.is_none());
        assert!(opts.from.is_none());
    }

    #[test]
    fn save_then_load_from() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("heatmark").join("config.toml");
        let config = AppConfig {
            palette: Palette::Ocean,
            cell_size: 9,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "cell_size = \"big\"").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = AppConfig::load_from(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
