//! Configuration module for sqlmorph.
//!
//! Handles render limits, placeholder overrides and capability overrides.

mod settings;

pub use settings::{CapabilityOverride, RenderSettings, Settings, SettingsError};
