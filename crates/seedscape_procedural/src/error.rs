//! # Procedural Error Types
//!
//! Sampling never fails. These errors come only from validating externally
//! supplied parameters and regions before they reach the samplers.

use thiserror::Error;

/// Errors that can occur while validating generation inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProceduralError {
    /// A noise parameter is outside its usable range.
    #[error("invalid noise parameter `{field}`: {reason}")]
    InvalidParams {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A region with zero width or height was requested.
    #[error("region is empty: {width}x{height}")]
    EmptyRegion {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },

    /// A region larger than the sampling limit was requested.
    #[error("region too large: {tiles} tiles, limit is {max}")]
    RegionTooLarge {
        /// Requested tile count.
        tiles: u64,
        /// Maximum tile count.
        max: u64,
    },
}

/// Result type for procedural operations.
pub type ProceduralResult<T> = Result<T, ProceduralError>;
