//! Configuration file
//!
//! `triton.ron` is read once at start-up, before any window exists. Missing
//! keys fall back to built-in defaults; anything present but unusable is an
//! error.
//!
//! ```ron
//! (
//!     loglevel: "debug",
//!     fullscreen: false,
//!     resolution: "800x600",
//!     assets: (
//!         images: { "board": "board.png" },
//!         fonts: { "main": "main.ttf" },
//!     ),
//! )
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use crate::engine::context::DEFAULT_PIXEL_PER_UNIT;
use crate::error::ConfigError;

/// Config file looked up in the working directory
pub const CONFIG_PATH: &str = "triton.ron";

/// The file as written, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawConfig {
    loglevel: String,
    fullscreen: bool,
    resolution: String,
    title: String,
    fps_cap: u32,
    pixel_per_unit: f32,
    assets: Assets,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            fullscreen: false,
            resolution: "800x600".to_string(),
            title: "Triple T".to_string(),
            fps_cap: 0,
            pixel_per_unit: DEFAULT_PIXEL_PER_UNIT,
            assets: Assets::default(),
        }
    }
}

/// Logical name → path, relative to `assets/images` and `assets/fonts`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub images: BTreeMap<String, String>,
    pub fonts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    /// `critical` has no counterpart in `log` and maps to Error.
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Verbose => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error | LogLevel::Critical => LevelFilter::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
    }
}

/// Window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = ConfigError;

    /// `"WIDTHxHEIGHT"`, both positive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());

        let (width, height) = s.split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LogLevel,
    pub fullscreen: bool,
    pub resolution: Resolution,
    pub title: String,
    /// Frames per second limit (None = uncapped)
    pub fps_cap: Option<u32>,
    pub pixel_per_unit: f32,
    pub assets: Assets,
}

impl Config {
    /// Parse and validate a config document.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = ron::from_str(source)?;
        Self::validate(raw)
    }

    /// Read, parse and validate the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("Loading configuration from {}", path.display());

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&source)?;
        log::debug!(
            "Configuration: {} {}, {} image(s), {} font(s)",
            config.resolution,
            if config.fullscreen { "fullscreen" } else { "windowed" },
            config.assets.images.len(),
            config.assets.fonts.len()
        );
        Ok(config)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let log_level: LogLevel = raw.loglevel.parse()?;
        let resolution: Resolution = raw.resolution.parse()?;
        if !(raw.pixel_per_unit.is_finite() && raw.pixel_per_unit > 0.0) {
            return Err(ConfigError::InvalidPixelPerUnit(raw.pixel_per_unit));
        }

        Ok(Self {
            log_level,
            fullscreen: raw.fullscreen,
            resolution,
            title: raw.title,
            fps_cap: (raw.fps_cap > 0).then_some(raw.fps_cap),
            pixel_per_unit: raw.pixel_per_unit,
            assets: raw.assets,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        // The defaults are valid by construction
        Self {
            log_level: LogLevel::Info,
            fullscreen: false,
            resolution: Resolution { width: 800, height: 600 },
            title: "Triple T".to_string(),
            fps_cap: None,
            pixel_per_unit: DEFAULT_PIXEL_PER_UNIT,
            assets: Assets::default(),
        }
    }
}
