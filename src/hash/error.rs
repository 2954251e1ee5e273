//! BLAKE2b configuration error types

use thiserror::Error;

/// Errors raised while validating a [`Params`](super::Params) configuration.
///
/// Absorption and digest extraction never fail, so these are only produced
/// by [`Blake2b::new`](super::Blake2b::new) and [`Params::validate`](super::Params::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key longer than the parameter block can describe
    #[error("key too large: {len} bytes (max {max})")]
    KeyTooLarge {
        /// Supplied key length
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Salt longer than the parameter block salt field
    #[error("salt too large: {len} bytes (max {max})")]
    SaltTooLarge {
        /// Supplied salt length
        len: usize,
        /// Maximum allowed
        max: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
