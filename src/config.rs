//! Runtime configuration.
//!
//! Defaults, then an optional JSON file (`$PIXMASK_CONFIG`, else `pixmask.json` in
//! the current directory), then `$PIXMASK_DIR`, then the first command-line
//! argument as the working directory.

use crate::error::Error;
use crate::geometry::DEFAULT_TOLERANCE;
use crate::types::Role;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PIXMASK_CONFIG";
pub const DIR_ENV: &str = "PIXMASK_DIR";
pub const CONFIG_FILE: &str = "pixmask.json";

/// Colors per drawing role, 0x00RRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub target: u32,
    pub distractor: u32,
    pub in_progress: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            target: 0x00_FF_00_00,      // red
            distractor: 0x00_FF_FF_FF,  // white
            in_progress: 0x00_00_00_FF, // blue
        }
    }
}

impl Palette {
    pub fn color(&self, role: Role) -> u32 {
        match role {
            Role::Target => self.target,
            Role::Distractor => self.distractor,
            Role::InProgress => self.in_progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where images are looked up and records are read from.
    pub work_dir: PathBuf,
    /// Boundary band for the point-in-polygon test, in pixels.
    pub tolerance: f64,
    /// Outline thickness in the annotated preview and the capture window.
    pub line_width: i32,
    pub palette: Palette,
    /// Show the three-panel review window after writing outputs.
    pub show_review: bool,
    /// Frame cap for the capture and review windows; must be at least 1.
    pub target_fps: usize,
    /// Open windows shrunk to fit the screen. Windows are resizable either way and
    /// clicks are mapped back to image pixels.
    pub fit_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            tolerance: DEFAULT_TOLERANCE,
            line_width: 2,
            palette: Palette::default(),
            show_review: true,
            target_fps: 60,
            fit_screen: true,
        }
    }
}

impl Config {
    /// Resolve from the process environment and arguments.
    pub fn from_env() -> Result<Self, Error> {
        let file = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(CONFIG_FILE)).filter(|p| p.is_file()));
        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DIR_ENV) {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::args_os().nth(1) {
            config.work_dir = PathBuf::from(dir);
        }
        config.validate()?;
        log::debug!("{config:?}");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.tolerance >= 0.0) || !self.tolerance.is_finite() {
            return Err(Error::Config(format!("tolerance must be a finite value >= 0, got {}", self.tolerance)));
        }
        if self.line_width < 1 {
            return Err(Error::Config(format!("line_width must be >= 1, got {}", self.line_width)));
        }
        if self.target_fps < 1 {
            return Err(Error::Config(format!("target_fps must be >= 1, got {}", self.target_fps)));
        }
        Ok(())
    }

    /// `<work_dir>/<name>.png`
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("{name}.png"))
    }

    /// `<work_dir>/<name>.json`
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(format!("{name}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.tolerance, 0.5);
        assert_eq!(c.palette.color(Role::Target), 0x00FF0000);
        assert_eq!(c.palette.color(Role::Distractor), 0x00FFFFFF);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let c = Config::from_json(r#"{"tolerance": 1.0, "palette": {"target": 65280}}"#).unwrap();
        assert_eq!(c.tolerance, 1.0);
        assert_eq!(c.palette.target, 0x00_00_FF_00);
        assert_eq!(c.palette.distractor, Palette::default().distractor);
        assert_eq!(c.line_width, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(Config::from_json(r#"{"tolerance": -1}"#), Err(Error::Config(_))));
        assert!(matches!(Config::from_json(r#"{"line_width": 0}"#), Err(Error::Config(_))));
        assert!(matches!(Config::from_json("{"), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let err = Config::from_json(r#"{"target_fps": 0}"#).unwrap_err();
        assert!(err.to_string().contains("target_fps"), "{err}");
        assert_eq!(Config::from_json(r#"{"target_fps": 1}"#).unwrap().target_fps, 1);
    }

    #[test]
    fn test_fit_screen_default_and_override() {
        assert!(Config::default().fit_screen);
        assert!(!Config::from_json(r#"{"fit_screen": false}"#).unwrap().fit_screen);
    }

    #[test]
    fn test_paths() {
        let c = Config { work_dir: PathBuf::from("/data/pix"), ..Config::default() };
        assert_eq!(c.image_path("cat"), PathBuf::from("/data/pix/cat.png"));
        assert_eq!(c.record_path("cat_annotations"), PathBuf::from("/data/pix/cat_annotations.json"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixmask.json");
        std::fs::write(&path, r#"{"show_review": false, "work_dir": "/tmp/imgs"}"#).unwrap();
        let c = Config::from_file(&path).unwrap();
        assert!(!c.show_review);
        assert_eq!(c.work_dir, PathBuf::from("/tmp/imgs"));
    }
}
