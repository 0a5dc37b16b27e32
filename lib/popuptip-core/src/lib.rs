//! A single transient message box ("popup tip") anchored to screen
//! coordinates, hidden automatically after a timeout or on request.
//!
//! Rendering is delegated to a [`surface::SurfaceProvider`]; this crate owns
//! the lifecycle: at most one tip is alive, replacing a tip retires the old
//! one and its timeout, and the next close notifies a one-shot listener.

use thiserror::Error;

pub mod config;
pub mod paths;
pub mod surface;
pub mod tip;

pub use config::Config;
pub use tip::{CloseListener, PopupTip, DEFAULT_DURATION_MS};

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

#[derive(Error, Debug)]
pub enum PopupTipError {
    #[error("Scheduler error: {0}")]
    Scheduler(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type PopupTipResult<T> = Result<T, PopupTipError>;
