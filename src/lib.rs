//! Triton: a small component-based 2D engine on macroquad, and Triple T,
//! the tic-tac-toe game built with it.
//!
//! - [`engine`]: objects, components, the event bus, resources, input
//! - [`app`]: lifecycle state machine and main loop
//! - [`config`]: `triton.ron` loading and validation
//! - [`game`]: Triple T

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logging;
