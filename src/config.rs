//! TOML configuration for the orrery window, scene and works panel.
//!
//! Every section is optional: missing fields fall back to the defaults
//! below, so an empty `orrery.toml` is a valid config.

use crate::engine::geometry;
use crate::error::ConfigError;
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory at startup.
pub const DEFAULT_CONFIG_FILE: &str = "orrery.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub works: WorksConfig,
    pub footer: FooterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical size of the window on startup.
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pastel Orrery".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// The 3D backdrop. `enabled = false` behaves like a page without a
/// display container: nothing is built and nothing is rendered.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub enabled: bool,
    pub star_count: u32,
    /// Inertia of the orbit controller (valid range: (0.0, 1.0]).
    pub damping_factor: f32,
    /// 4x multisampling when the adapter supports it.
    pub msaa: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            star_count: geometry::STAR_COUNT as u32,
            damping_factor: 0.06,
            msaa: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorksConfig {
    /// Whether the card grid exists at all.
    pub enabled: bool,
    /// Show the works panel on startup (toggled with `W`).
    pub visible: bool,
    /// Write the rendered card markup to this file on startup.
    pub export_html: Option<PathBuf>,
    /// TTF/OTF with CJK coverage for card titles. The built-in fonts
    /// render those glyphs as boxes.
    pub card_font: Option<PathBuf>,
}

impl Default for WorksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            export_html: None,
            card_font: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub show_year: bool,
    pub owner: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            show_year: true,
            owner: "Orca76".into(),
        }
    }
}

/// Load config from a specific TOML file path.
///
/// Parse errors are returned. A config that parses but fails validation
/// is logged and replaced by the defaults.
pub fn load_from_path(path: &Path) -> Result<OrreryConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Parse(format!("failed to read {}: {e}", path.display()))
    })?;

    let config = parse(&content)?;

    if let Err(e) = validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(OrreryConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load `orrery.toml` from the working directory, or defaults when absent.
pub fn load_default() -> Result<OrreryConfig, ConfigError> {
    match load_from_path(Path::new(DEFAULT_CONFIG_FILE)) {
        Err(ConfigError::FileNotFound(_)) => {
            info!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(OrreryConfig::default())
        }
        other => other,
    }
}

pub fn parse(content: &str) -> Result<OrreryConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(format!("failed to parse TOML: {e}")))
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &OrreryConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.window.width == 0 || config.window.height == 0 {
        errors.push(format!(
            "window size must be non-zero, got {}x{}",
            config.window.width, config.window.height
        ));
    }

    if !(1..=100_000).contains(&config.scene.star_count) {
        errors.push(format!(
            "scene.star_count must be in 1..=100000, got {}",
            config.scene.star_count
        ));
    }

    let d = config.scene.damping_factor;
    if !(d > 0.0 && d <= 1.0) {
        errors.push(format!("scene.damping_factor must be in (0, 1], got {d}"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_site() {
        let config = OrreryConfig::default();
        assert!(config.scene.enabled);
        assert_eq!(config.scene.star_count, 800);
        assert!((config.scene.damping_factor - 0.06).abs() < f32::EPSILON);
        assert!(config.works.enabled);
        assert!(config.works.export_html.is_none());
        assert!(config.works.card_font.is_none());
        assert!(config.footer.show_year);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = parse("").unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.title, "Pastel Orrery");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = parse(
            r#"
[scene]
star_count = 1200

[works]
export_html = "works.html"
"#,
        )
        .unwrap();
        assert_eq!(config.scene.star_count, 1200);
        assert!((config.scene.damping_factor - 0.06).abs() < f32::EPSILON);
        assert_eq!(config.works.export_html, Some(PathBuf::from("works.html")));
        assert!(config.works.visible);
        assert!(config.footer.show_year);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse("[scene\nstar_count = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = OrreryConfig::default();
        config.window.height = 0;
        config.scene.star_count = 0;
        config.scene.damping_factor = 1.5;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("window size"));
        assert!(err.contains("star_count"));
        assert!(err.contains("damping_factor"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orrery.toml");
        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orrery.toml");
        std::fs::write(&path, "[scene]\ndamping_factor = 0.0\nstar_count = 10\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.scene.star_count, 800);
    }

    #[test]
    fn valid_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orrery.toml");
        std::fs::write(&path, "[footer]\nshow_year = false\n[scene]\nenabled = false\n").unwrap();
        let config = load_from_path(&path).unwrap();
        assert!(!config.footer.show_year);
        assert!(!config.scene.enabled);
    }
}
