//! Error types
//!
//! Every fallible step of start-up returns one of these; only `main` decides
//! to log and exit with [`EXIT_CODE_ERROR`].

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::ObjectId;

/// Process exit code for any start-up failure.
pub const EXIT_CODE_ERROR: u8 = 1;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid state transition: cannot {action} while {state}")]
    InvalidState { action: &'static str, state: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for 'loglevel': {0:?}. Valid levels are: verbose, debug, info, warn, error, critical")]
    InvalidLogLevel(String),

    #[error("invalid value for 'resolution': {0:?}, expected WIDTHxHEIGHT")]
    InvalidResolution(String),

    #[error("invalid value for 'pixel_per_unit': {0}, expected a positive number")]
    InvalidPixelPerUnit(f32),
}

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("unable to read {kind} '{name}' from {}: {source}", path.display())]
    Io {
        kind: &'static str,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode image '{name}' from {}: {source}", path.display())]
    Image {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{name}' is {width}x{height}, larger than a texture allows")]
    ImageTooLarge { name: String, width: u32, height: u32 },

    #[error("unable to load font '{name}' from {}: {message}", path.display())]
    Font { name: String, path: PathBuf, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("object {0} does not exist")]
    UnknownObject(ObjectId),

    #[error("object '{object}' already has a {component} component")]
    DuplicateComponent { object: String, component: &'static str },

    #[error("making {parent} the parent of {child} would create a cycle")]
    HierarchyCycle { child: ObjectId, parent: ObjectId },
}
