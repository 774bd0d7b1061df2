//! # Engine Error Types
//!
//! Gameplay guards (no ammo, already loaded, nothing in range) are not
//! errors. What is left are malformed chunk content and bad configuration.

use std::path::PathBuf;

use drylands_shared::ChunkCoord;
use thiserror::Error;

/// Errors raised while materializing a chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// A structure item or wanderer names a parent that is not an earlier
    /// structure in the same chunk.
    #[error("chunk {coord}: descriptor {index} references missing structure {parent}")]
    DanglingParent {
        /// Chunk being loaded.
        coord: ChunkCoord,
        /// Offending descriptor.
        index: usize,
        /// Parent index it names.
        parent: usize,
    },
}

/// Result type for chunk operations.
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Any error the engine can report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Chunk materialization failed.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
