//! BLAKE2b - keyed, salted, variable-length cryptographic hashing
//!
//! This library provides an incremental implementation of BLAKE2b as specified
//! in [RFC 7693](https://tools.ietf.org/html/rfc7693). Digests range from 1 to
//! 64 bytes, and a key of up to 64 bytes turns the hash into a MAC without an
//! HMAC construction.
//!
//! # Quick Start
//!
//! ```rust
//! use blake2b_mac::{Blake2b, Params};
//!
//! // Plain 256-bit digest
//! let mut hasher = Blake2b::new(&Params::BLAKE2B_256)?;
//! hasher.write(b"Hello, agent!");
//! let digest = hasher.sum();
//! assert_eq!(digest.len(), 32);
//!
//! // Keyed MAC with a salt
//! let params = Params::new(32).with_key(b"shared secret".to_vec()).with_salt(b"v1".to_vec());
//! let mut mac = Blake2b::new(&params)?;
//! mac.write(b"payload");
//! let tag = mac.sum();
//! # let _ = tag;
//! # Ok::<(), blake2b_mac::Error>(())
//! ```
//!
//! # Features
//!
//! - **Incremental hashing** - arbitrary write sizes, `std::io::Write` and `bytes::Buf` input
//! - **Non-destructive `sum`** - peek at the digest and keep writing
//! - **MAC mode** - native keying, re-applied on `reset`
//! - **`serde`** - optional (de)serialization of [`Params`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod hash;

pub use hash::{
    BLOCK_SIZE, Blake2b, Error, MAX_DIGEST_SIZE, MAX_KEY_SIZE, MAX_SALT_SIZE, Params, Result,
};
