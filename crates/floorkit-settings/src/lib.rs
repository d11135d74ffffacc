//! Floorkit Settings Crate
//!
//! Handles editor configuration: scale, grid, gesture constants, history
//! depth, storage locations and default placement of synced positions.

pub mod config;

pub use config::{
    default_config_path, EditorConfig, GridSettings, HistorySettings, InteractionSettings,
    LeasingSettings, PlacementSettings, RotationLimit, StorageSettings, MAX_EXPIRING_SOON_DAYS,
};
