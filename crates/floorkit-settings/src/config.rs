//! Configuration and settings management for Floorkit
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Scale (millimetre to pixel factor)
//! - Grid (size, snapping, visibility)
//! - Interaction (resize floor, handle geometry, rotation limit)
//! - History (undo depth)
//! - Storage (layout file, sample-data bootstrap)
//! - Placement (default grid placement for synced positions)
//! - Leasing (expiry warning window)

pub use floorkit_core::units::Scale;
use floorkit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Grid cell size in layout pixels
    pub size_px: f64,
    /// Snap committed drags to the grid
    pub snap_enabled: bool,
    /// Draw the grid
    pub visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size_px: 20.0,
            snap_enabled: true,
            visible: true,
        }
    }
}

/// Rotation limit applied by the rotate gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RotationLimit {
    /// Any angle, normalized into (-180, 180]
    Unlimited,
    /// Clamp to +/- `max_degrees`
    Clamped {
        /// Largest allowed deflection from zero.
        max_degrees: f64,
    },
}

impl RotationLimit {
    /// Apply the limit to an angle in degrees
    pub fn apply(&self, degrees: f64) -> f64 {
        let normalized = floorkit_core::normalize_degrees(degrees);
        match self {
            RotationLimit::Unlimited => normalized,
            RotationLimit::Clamped { max_degrees } => {
                let max = max_degrees.abs();
                normalized.clamp(-max, max)
            }
        }
    }
}

impl Default for RotationLimit {
    fn default() -> Self {
        Self::Unlimited
    }
}

/// Pointer interaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Minimum element width reachable by resizing
    pub min_width: f64,
    /// Minimum element height reachable by resizing
    pub min_height: f64,
    /// Side length of the square corner handles
    pub handle_size: f64,
    /// Distance of the rotate handle above the element's top edge
    pub rotate_handle_offset: f64,
    /// Rotation limit
    pub rotation_limit: RotationLimit,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            min_height: 20.0,
            handle_size: 10.0,
            rotate_handle_offset: 24.0,
            rotation_limit: RotationLimit::default(),
        }
    }
}

/// Undo/redo history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo snapshots
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

/// Layout storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// File holding the persisted layout collection
    pub layouts_file: PathBuf,
    /// Seed the collection with bundled sample layouts on first load
    pub bootstrap_sample_data: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let layouts_file = dirs::data_dir()
            .map(|d| d.join("floorkit").join("layouts.json"))
            .unwrap_or_else(|| PathBuf::from("layouts.json"));
        Self {
            layouts_file,
            bootstrap_sample_data: true,
        }
    }
}

/// Default placement for positions synced onto a layout without coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Left edge of the first slot
    pub origin_x: f64,
    /// Top edge of the first slot
    pub origin_y: f64,
    /// Horizontal distance between slot origins
    pub spacing_x: f64,
    /// Vertical distance between slot origins
    pub spacing_y: f64,
    /// Slots per row
    pub columns: usize,
    /// Boundary width of layouts created on demand
    pub default_boundary_width: f64,
    /// Boundary height of layouts created on demand
    pub default_boundary_height: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            origin_x: 40.0,
            origin_y: 40.0,
            spacing_x: 220.0,
            spacing_y: 160.0,
            columns: 5,
            default_boundary_width: 1200.0,
            default_boundary_height: 800.0,
        }
    }
}

/// Longest accepted expiry warning window, in days
pub const MAX_EXPIRING_SOON_DAYS: i64 = 3650;

/// Leasing display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeasingSettings {
    /// Leases ending within this many days show as expiring soon
    pub expiring_soon_days: i64,
}

impl Default for LeasingSettings {
    fn default() -> Self {
        Self {
            expiring_soon_days: 30,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Millimetre to pixel scale
    pub scale: Scale,
    /// Grid settings
    pub grid: GridSettings,
    /// Interaction settings
    pub interaction: InteractionSettings,
    /// History settings
    pub history: HistorySettings,
    /// Storage settings
    pub storage: StorageSettings,
    /// Placement settings
    pub placement: PlacementSettings,
    /// Leasing settings
    pub leasing: LeasingSettings,
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using default editor config", e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
            }
        }

        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.px_per_mm.is_finite() && self.scale.px_per_mm > 0.0) {
            return Err(Error::config("Scale must be > 0"));
        }

        if !(self.grid.size_px.is_finite() && self.grid.size_px > 0.0) {
            return Err(Error::config("Grid size must be > 0"));
        }

        if self.interaction.min_width <= 0.0 || self.interaction.min_height <= 0.0 {
            return Err(Error::config("Minimum element size must be > 0"));
        }

        if self.interaction.handle_size <= 0.0 {
            return Err(Error::config("Handle size must be > 0"));
        }

        if let RotationLimit::Clamped { max_degrees } = self.interaction.rotation_limit {
            if !(max_degrees.is_finite() && max_degrees > 0.0 && max_degrees <= 180.0) {
                return Err(Error::config("Rotation clamp must be in (0, 180]"));
            }
        }

        if self.history.max_depth == 0 {
            return Err(Error::config("History depth must be > 0"));
        }

        if self.placement.columns == 0 {
            return Err(Error::config("Placement columns must be > 0"));
        }

        if self.placement.default_boundary_width <= 0.0
            || self.placement.default_boundary_height <= 0.0
        {
            return Err(Error::config("Default layout bounds must be > 0"));
        }

        if !(0..=MAX_EXPIRING_SOON_DAYS).contains(&self.leasing.expiring_soon_days) {
            return Err(Error::config(format!(
                "Expiry warning window must be between 0 and {} days",
                MAX_EXPIRING_SOON_DAYS
            )));
        }

        Ok(())
    }
}

/// Platform config file location (`<config dir>/floorkit/editor.toml`)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("floorkit").join("editor.toml"))
        .unwrap_or_else(|| PathBuf::from("editor.toml"))
}
