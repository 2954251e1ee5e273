//! BLAKE2b configuration and parameter block encoding

use super::compress::IV;
use super::{BLOCK_SIZE, CHAIN_WORDS, Error, MAX_DIGEST_SIZE, MAX_KEY_SIZE, MAX_SALT_SIZE, Result};
use core::fmt;
use tracing::debug;

const SALT_OFFSET: usize = 32;

/// Sequential mode: fanout 1, depth 1.
const FANOUT: u8 = 1;
const DEPTH: u8 = 1;

/// Configuration for a [`Blake2b`](super::Blake2b) instance.
///
/// All fields are optional in the sense that the defaults produce a plain
/// 64-byte unkeyed hash. A `digest_size` outside `1..=64` is replaced by 64
/// rather than rejected.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    /// Output length in bytes (1 to 64)
    pub digest_size: usize,
    /// MAC key (0 to 64 bytes); empty means unkeyed
    pub key: Vec<u8>,
    /// Salt for domain separation (0 to 16 bytes)
    pub salt: Vec<u8>,
}

impl Params {
    /// 512-bit unkeyed BLAKE2b.
    pub const BLAKE2B_512: Self = Self::new(MAX_DIGEST_SIZE);

    /// 256-bit unkeyed BLAKE2b.
    pub const BLAKE2B_256: Self = Self::new(32);

    /// Unkeyed, unsalted parameters with the given digest size.
    #[must_use]
    pub const fn new(digest_size: usize) -> Self {
        Self {
            digest_size,
            key: Vec::new(),
            salt: Vec::new(),
        }
    }

    /// Set the MAC key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the salt.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Check key and salt lengths and return the effective digest size.
    pub fn validate(&self) -> Result<usize> {
        if self.key.len() > MAX_KEY_SIZE {
            return Err(Error::KeyTooLarge {
                len: self.key.len(),
                max: MAX_KEY_SIZE,
            });
        }
        if self.salt.len() > MAX_SALT_SIZE {
            return Err(Error::SaltTooLarge {
                len: self.salt.len(),
                max: MAX_SALT_SIZE,
            });
        }
        if (1..=MAX_DIGEST_SIZE).contains(&self.digest_size) {
            Ok(self.digest_size)
        } else {
            debug!(
                requested = self.digest_size,
                clamped = MAX_DIGEST_SIZE,
                "digest size out of range"
            );
            Ok(MAX_DIGEST_SIZE)
        }
    }

    /// Encode the 128-byte parameter block. Lengths must already be validated.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn parameter_block(&self, digest_size: usize) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = digest_size as u8;
        block[1] = self.key.len() as u8;
        block[2] = FANOUT;
        block[3] = DEPTH;
        block[SALT_OFFSET..SALT_OFFSET + self.salt.len()].copy_from_slice(&self.salt);
        block
    }
}

/// XOR the parameter block, read as little-endian words, into the IV.
pub(crate) fn chain_seed(block: &[u8; BLOCK_SIZE]) -> [u64; CHAIN_WORDS] {
    let mut chain = IV;
    for (word, chunk) in chain.iter_mut().zip(block.chunks_exact(8)) {
        *word ^= u64::from_le_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]);
    }
    chain
}

impl Default for Params {
    fn default() -> Self {
        Self::BLAKE2B_512
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("digest_size", &self.digest_size)
            .field("key_len", &self.key.len())
            .field("salt", &self.salt)
            .finish()
    }
}
