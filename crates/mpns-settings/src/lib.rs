//! # mpns-settings
//!
//! Configuration for MPNS delivery, loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`MpnsSettings::default()`]
//! 2. **User file**: `~/.mpns/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `MPNS_*` overrides (highest priority)
//!
//! There is no global instance: callers load settings once and pass the
//! resulting [`mpns_core::TransportOptions`] into each send.
//!
//! # Usage
//!
//! ```no_run
//! let settings = mpns_settings::load_settings()?;
//! let options = settings.transport.load_options()?;
//! # Ok::<(), mpns_settings::SettingsError>(())
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_overrides, deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{LoggingSettings, MpnsSettings, TransportSettings};
