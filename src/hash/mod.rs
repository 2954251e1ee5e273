//! BLAKE2b hash engine
//!
//! This module provides the parameter block, the compression function and the
//! incremental block state machine described by RFC 7693.

mod compress;
mod error;
mod params;
mod state;

pub use error::{Error, Result};
pub use params::Params;
pub use state::Blake2b;

/// Size of one message block in bytes
pub const BLOCK_SIZE: usize = 128;

/// Maximum (and default) digest size in bytes
pub const MAX_DIGEST_SIZE: usize = 64;

/// Maximum key length in bytes
pub const MAX_KEY_SIZE: usize = 64;

/// Maximum salt length in bytes
pub const MAX_SALT_SIZE: usize = 16;

/// Number of 64-bit words in the chain value
pub(crate) const CHAIN_WORDS: usize = 8;
