//! Settings resolution: command-line flags layered over an optional TOML file.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use circle_dash_core::{PlayArea, DEFAULT_MAX_POINTS};
use serde::Deserialize;

/// Values that may be supplied through a TOML configuration file.
///
/// Every key mirrors the command-line flag of the same name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    pub(crate) points: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
    pub(crate) max_points: Option<u32>,
    pub(crate) vsync: Option<bool>,
    pub(crate) log_level: Option<String>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Overrides taken from the command line; `None` defers to the file or the default.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) points: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
    pub(crate) max_points: Option<u32>,
    pub(crate) vsync: Option<bool>,
    pub(crate) log_level: Option<String>,
}

/// Fully resolved settings the binary runs with.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Point count prefilled into the input field.
    pub(crate) points: Option<u32>,
    /// Seed for the layout random number generator.
    pub(crate) seed: u64,
    /// Region circles are scattered across.
    pub(crate) play_area: PlayArea,
    /// Largest accepted point count.
    pub(crate) max_points: u32,
    /// Whether presentation waits for the display refresh.
    pub(crate) vsync: bool,
    /// Explicit log filter directive, when one was configured.
    pub(crate) log_level: Option<String>,
}

impl Settings {
    /// Merges flags over file values, drawing a seed from `random_seed` when none is configured.
    pub(crate) fn resolve<R>(overrides: Overrides, file: FileConfig, random_seed: R) -> Result<Self>
    where
        R: FnOnce() -> u64,
    {
        let defaults = PlayArea::default();
        let width = overrides.width.or(file.width).unwrap_or(defaults.width());
        let height = overrides.height.or(file.height).unwrap_or(defaults.height());
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            bail!("play area must have positive dimensions (received {width}x{height})");
        }

        let max_points = overrides
            .max_points
            .or(file.max_points)
            .unwrap_or(DEFAULT_MAX_POINTS);
        if max_points == 0 {
            bail!("max-points must be at least 1");
        }

        Ok(Self {
            points: overrides.points.or(file.points),
            seed: overrides.seed.or(file.seed).unwrap_or_else(random_seed),
            play_area: PlayArea::new(width, height),
            max_points,
            vsync: overrides.vsync.or(file.vsync).unwrap_or(true),
            log_level: overrides.log_level.or(file.log_level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::resolve(Overrides::default(), FileConfig::default(), || 7)
            .expect("defaults are valid");

        assert_eq!(settings.seed, 7);
        assert_eq!(settings.play_area, PlayArea::default());
        assert_eq!(settings.max_points, DEFAULT_MAX_POINTS);
        assert!(settings.vsync);
        assert_eq!(settings.points, None);
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn file_values_fill_missing_flags() {
        let file = FileConfig::parse(
            r#"
points = 12
seed = 99
width = 640.0
height = 300.0
max-points = 50
vsync = false
log-level = "debug"
"#,
        )
        .expect("valid toml");

        let settings = Settings::resolve(Overrides::default(), file, || unreachable!())
            .expect("file values are valid");

        assert_eq!(settings.points, Some(12));
        assert_eq!(settings.seed, 99);
        assert_eq!(settings.play_area, PlayArea::new(640.0, 300.0));
        assert_eq!(settings.max_points, 50);
        assert!(!settings.vsync);
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            seed: Some(1),
            width: Some(640.0),
            max_points: Some(50),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            seed: Some(2),
            max_points: Some(10),
            ..Overrides::default()
        };

        let settings = Settings::resolve(overrides, file, || 0).expect("valid settings");

        assert_eq!(settings.seed, 2);
        assert_eq!(settings.max_points, 10);
        assert_eq!(settings.play_area.width(), 640.0);
        assert_eq!(settings.play_area.height(), PlayArea::default().height());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn degenerate_play_area_is_rejected() {
        let overrides = Overrides {
            width: Some(0.0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(overrides, FileConfig::default(), || 0).is_err());
    }

    #[test]
    fn zero_max_points_is_rejected() {
        let overrides = Overrides {
            max_points: Some(0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(overrides, FileConfig::default(), || 0).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = FileConfig::load(Path::new("/nonexistent/circle-dash.toml"))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("/nonexistent/circle-dash.toml"));
    }
}
