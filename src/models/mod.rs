//! Data models for the modpack manager.
//!
//! - [`Settings`]: User preferences loaded from `modpack_settings.yaml`
//! - [`is_blank`]: The single validity rule shared by modpack and mod names
//!
//! Modpack and mod names are plain `String`s. A name is valid when it is not
//! blank after trimming; every mutating operation silently ignores blank names.

pub mod names;
pub mod settings;

pub use names::is_blank;
pub use settings::{DEFAULT_DATA_FILE, Settings};
