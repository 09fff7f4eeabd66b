//! Logging setup
//!
//! The backend starts permissive so nothing is lost before the config is
//! read; the configured level is applied afterwards as the global maximum.
//! `RUST_LOG` still narrows individual modules.

use env_logger::{Builder, Env};

use crate::config::LogLevel;

pub fn init() {
    Builder::from_env(Env::default().default_filter_or("trace"))
        .format_timestamp_millis()
        .init();
    log::set_max_level(log::LevelFilter::Info);
}

pub fn set_level(level: LogLevel) {
    log::set_max_level(level.to_filter());
    log::debug!("Log level set to {:?}", level);
}
