//! Configuration system
//!
//! World sizing and budget parameters are fixed at startup and loaded from
//! TOML or RON files. Budgets are deliberately not resizable at runtime:
//! exceeding one is a content bug, not a recoverable condition.

use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # World Configuration
///
/// Sizing of the chunk grid and the fixed memory/membership budgets that
/// bound worst-case cost per spatial region. All values are set once at
/// startup; the grid is never resized afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of chunks along each axis of the grid
    pub grid_dims: [u32; 3],
    /// Physical chunk edge length in meters
    pub chunk_size: f32,
    /// Storage arena byte budget per chunk
    pub chunk_arena_bytes: usize,
    /// Maximum entities recorded as visitors of one chunk
    pub max_visitors_per_chunk: usize,
    /// Maximum chunks one entity's bounding box may span
    pub max_chunks_per_entity: usize,
    /// Half-extent of the synthetic pick box placed around light sources
    pub light_pick_extent: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_dims: [8, 4, 8],
            chunk_size: 50.0,
            chunk_arena_bytes: 96 * 1024,
            max_visitors_per_chunk: 20,
            max_chunks_per_entity: 20,
            light_pick_extent: 0.5,
        }
    }
}

impl Config for WorldConfig {}

impl WorldConfig {
    /// Validate the configuration
    ///
    /// Rejects degenerate grids and zero budgets, both of which would make
    /// placement impossible rather than merely slow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_dims.iter().any(|&d| d == 0) {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be non-zero, got {:?}",
                self.grid_dims
            )));
        }
        if self.chunk_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "chunk size must be positive, got {}",
                self.chunk_size
            )));
        }
        if self.chunk_arena_bytes == 0 {
            return Err(ConfigError::Invalid(
                "chunk arena byte budget must be non-zero".to_string(),
            ));
        }
        if self.max_visitors_per_chunk == 0 || self.max_chunks_per_entity == 0 {
            return Err(ConfigError::Invalid(
                "visitor and chunk-span caps must be non-zero".to_string(),
            ));
        }
        if self.light_pick_extent <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "light pick extent must be positive, got {}",
                self.light_pick_extent
            )));
        }
        Ok(())
    }

    /// Total world extent along each axis, in meters
    pub fn world_extent(&self) -> [f32; 3] {
        [
            self.grid_dims[0] as f32 * self.chunk_size,
            self.grid_dims[1] as f32 * self.chunk_size,
            self.grid_dims[2] as f32 * self.chunk_size,
        ]
    }

    /// Total number of chunks in the grid
    pub fn chunk_count(&self) -> usize {
        self.grid_dims.iter().map(|&d| d as usize).product()
    }
}
