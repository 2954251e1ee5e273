//! Incremental BLAKE2b state: block buffering, finalization and reset.

use super::compress::compress;
use super::params::chain_seed;
use super::{BLOCK_SIZE, CHAIN_WORDS, MAX_DIGEST_SIZE, Params, Result};
use bytes::{Buf, BufMut};
use core::fmt;
use std::io;
use tracing::{debug, trace};

/// Running BLAKE2b hash.
///
/// The state is a plain value: cloning it snapshots the hash, which is how
/// [`sum`](Self::sum) finalizes without disturbing further writes.
///
/// ```rust
/// use blake2b_mac::{Blake2b, Params};
///
/// let mut hasher = Blake2b::new(&Params::BLAKE2B_256)?;
/// hasher.write(b"hello ");
/// hasher.write(b"world");
/// assert_eq!(hasher.sum().len(), 32);
/// # Ok::<(), blake2b_mac::Error>(())
/// ```
#[derive(Clone)]
pub struct Blake2b {
    chain: [u64; CHAIN_WORDS],
    counter: [u64; 2],
    buffer: [u8; BLOCK_SIZE],
    // May equal BLOCK_SIZE: a full buffer is only compressed once more input arrives.
    offset: usize,

    initial_chain: [u64; CHAIN_WORDS],
    keyed: bool,
    key: [u8; BLOCK_SIZE],
    digest_size: usize,
}

impl Blake2b {
    /// Create a hasher, rejecting oversized keys and salts.
    pub fn new(params: &Params) -> Result<Self> {
        let digest_size = params.validate()?;
        let state = Self::seeded(params, digest_size);
        debug!(
            digest_size,
            keyed = state.keyed,
            salt_len = params.salt.len(),
            "blake2b initialized"
        );
        Ok(state)
    }

    fn seeded(params: &Params, digest_size: usize) -> Self {
        let chain = chain_seed(&params.parameter_block(digest_size));
        let mut state = Self {
            chain,
            counter: [0, 0],
            buffer: [0u8; BLOCK_SIZE],
            offset: 0,
            initial_chain: chain,
            keyed: !params.key.is_empty(),
            key: [0u8; BLOCK_SIZE],
            digest_size,
        };

        if state.keyed {
            state.key[..params.key.len()].copy_from_slice(&params.key);
            let key = state.key;
            state.write(&key);
            state.initial_chain = state.chain;
        }
        state
    }

    /// Block size in bytes (always 128).
    #[must_use]
    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Digest size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.digest_size
    }

    /// Whether the hasher runs in MAC mode.
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        self.keyed
    }

    /// Absorb `data`, returning the number of bytes consumed (always `data.len()`).
    ///
    /// Only blocks known to be followed by more input are compressed; the
    /// final block always stays buffered for [`sum`](Self::sum).
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len();
        let mut input = data;

        if self.offset > 0 {
            let take = (BLOCK_SIZE - self.offset).min(input.len());
            self.buffer[self.offset..self.offset + take].copy_from_slice(&input[..take]);
            self.offset += take;
            input = &input[take..];
            if input.is_empty() {
                return n;
            }
            self.advance(BLOCK_SIZE as u64);
            self.chain = compress(&self.chain, self.counter, &self.buffer, false);
            self.offset = 0;
        }

        while input.len() > BLOCK_SIZE {
            let Some((block, rest)) = input.split_first_chunk::<BLOCK_SIZE>() else {
                break;
            };
            self.advance(BLOCK_SIZE as u64);
            self.chain = compress(&self.chain, self.counter, block, false);
            input = rest;
        }

        self.buffer[..input.len()].copy_from_slice(input);
        self.offset = input.len();
        n
    }

    /// Absorb every remaining chunk of `buf`, returning the number of bytes consumed.
    pub fn write_buf<B: Buf>(&mut self, mut buf: B) -> usize {
        let mut n = 0;
        while buf.has_remaining() {
            let chunk = buf.chunk();
            let len = chunk.len();
            n += self.write(chunk);
            buf.advance(len);
        }
        n
    }

    /// Digest of everything written so far. The running state is untouched.
    #[must_use]
    pub fn sum(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.digest_size);
        self.sum_into(&mut out);
        out
    }

    /// Append the digest to `out`, e.g. a `Vec<u8>` prefix or a `BytesMut`.
    pub fn sum_into<B: BufMut>(&self, out: &mut B) {
        let digest = self.clone().finalize();
        out.put_slice(&digest[..self.digest_size]);
    }

    /// Return to the freshly initialized state, re-absorbing the key if keyed.
    pub fn reset(&mut self) {
        self.chain = self.initial_chain;
        self.counter = [0, 0];
        self.buffer = [0u8; BLOCK_SIZE];
        self.offset = 0;
        if self.keyed {
            let key = self.key;
            self.write(&key);
        }
        trace!(keyed = self.keyed, "blake2b reset");
    }

    fn advance(&mut self, len: u64) {
        let (low, carry) = self.counter[0].overflowing_add(len);
        self.counter[0] = low;
        if carry {
            self.counter[1] = self.counter[1].wrapping_add(1);
        }
    }

    fn retreat(&mut self, len: u64) {
        if self.counter[0] < len {
            self.counter[1] = self.counter[1].wrapping_sub(1);
        }
        self.counter[0] = self.counter[0].wrapping_sub(len);
    }

    fn finalize(mut self) -> [u8; MAX_DIGEST_SIZE] {
        // The last block advances the counter by a full block; only `offset` bytes are real.
        self.retreat((BLOCK_SIZE - self.offset) as u64);
        self.buffer[self.offset..].fill(0);
        self.advance(BLOCK_SIZE as u64);
        self.chain = compress(&self.chain, self.counter, &self.buffer, true);

        let mut out = [0u8; MAX_DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.chain.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

impl Default for Blake2b {
    fn default() -> Self {
        Self::seeded(&Params::BLAKE2B_512, MAX_DIGEST_SIZE)
    }
}

impl io::Write for Blake2b {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Blake2b::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for Blake2b {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blake2b")
            .field("digest_size", &self.digest_size)
            .field("keyed", &self.keyed)
            .field("counter", &self.counter)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Bytes, BytesMut};

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn digest_empty_512() {
        let expected = "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
                        d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce";
        assert_eq!(hex(&Blake2b::default().sum()), expected);
    }

    #[test]
    fn digest_empty_256() {
        let hasher = Blake2b::new(&Params::BLAKE2B_256).unwrap();
        let expected = "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8";
        assert_eq!(hex(&hasher.sum()), expected);
    }

    #[test]
    fn default_matches_new_512() {
        let built = Blake2b::new(&Params::BLAKE2B_512).unwrap();
        let mut a = Blake2b::default();
        let mut b = built;
        a.write(b"abc");
        b.write(b"abc");
        assert_eq!(a.sum(), b.sum());
    }

    #[test]
    fn full_block_stays_buffered() {
        let mut hasher = Blake2b::default();
        hasher.write(&[7u8; BLOCK_SIZE]);
        assert_eq!(hasher.offset, BLOCK_SIZE);
        assert_eq!(hasher.counter, [0, 0]);

        hasher.write(&[7u8; 1]);
        assert_eq!(hasher.offset, 1);
        assert_eq!(hasher.counter, [BLOCK_SIZE as u64, 0]);
    }

    #[test]
    fn exact_multiple_keeps_last_block() {
        let mut hasher = Blake2b::default();
        hasher.write(&[1u8; 3 * BLOCK_SIZE]);
        assert_eq!(hasher.offset, BLOCK_SIZE);
        assert_eq!(hasher.counter, [2 * BLOCK_SIZE as u64, 0]);
    }

    #[test]
    fn keyed_state_buffers_key_block() {
        let params = Params::new(32).with_key(vec![0x42u8; 10]);
        let hasher = Blake2b::new(&params).unwrap();
        assert!(hasher.is_keyed());
        assert_eq!(hasher.offset, BLOCK_SIZE);
        assert_eq!(hasher.counter, [0, 0]);
        assert_eq!(&hasher.key[..10], &[0x42u8; 10]);
        assert!(hasher.key[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn counter_carry_into_high_word() {
        let mut hasher = Blake2b::default();
        hasher.counter = [u64::MAX - 63, 0];
        hasher.advance(BLOCK_SIZE as u64);
        assert_eq!(hasher.counter, [64, 1]);
    }

    #[test]
    fn counter_borrow_from_high_word() {
        let mut hasher = Blake2b::default();
        hasher.counter = [10, 1];
        hasher.retreat(100);
        assert_eq!(hasher.counter, [u64::MAX - 89, 0]);
    }

    #[test]
    fn finalize_near_counter_wrap_is_consistent() {
        // Two states differing only in the high counter word must not collide.
        let mut low = Blake2b::default();
        let mut high = Blake2b::default();
        high.counter = [0, 1];
        low.write(b"x");
        high.write(b"x");
        assert_ne!(low.sum(), high.sum());
    }

    #[test]
    fn sum_does_not_mutate() {
        let mut hasher = Blake2b::default();
        hasher.write(b"hello ");
        let first = hasher.sum();
        assert_eq!(first, hasher.sum());

        hasher.write(b"world");
        let mut fresh = Blake2b::default();
        fresh.write(b"hello world");
        assert_eq!(hasher.sum(), fresh.sum());
    }

    #[test]
    fn sum_into_appends_to_prefix() {
        let mut hasher = Blake2b::new(&Params::new(20)).unwrap();
        hasher.write(b"payload");

        let mut out = b"prefix".to_vec();
        hasher.sum_into(&mut out);
        assert_eq!(&out[..6], b"prefix");
        assert_eq!(&out[6..], hasher.sum().as_slice());

        let mut buf = BytesMut::new();
        hasher.sum_into(&mut buf);
        assert_eq!(buf.as_ref(), hasher.sum().as_slice());
    }

    #[test]
    fn write_buf_matches_write() {
        let data = vec![0x5Au8; 300];
        let chained = Bytes::copy_from_slice(&data[..77]).chain(Bytes::copy_from_slice(&data[77..]));

        let mut a = Blake2b::default();
        assert_eq!(a.write_buf(chained), 300);
        let mut b = Blake2b::default();
        b.write(&data);
        assert_eq!(a.sum(), b.sum());
    }

    #[test]
    fn io_write_through_copy() {
        let data = vec![0xC3u8; 1000];
        let mut hasher = Blake2b::default();
        let copied = io::copy(&mut data.as_slice(), &mut hasher).unwrap();
        assert_eq!(copied, 1000);

        let mut direct = Blake2b::default();
        direct.write(&data);
        assert_eq!(hasher.sum(), direct.sum());
    }

    #[test]
    fn reset_restores_keyed_state() {
        let params = Params::new(32).with_key(b"key material".to_vec());
        let fresh = Blake2b::new(&params).unwrap();
        let mut hasher = fresh.clone();
        hasher.write(&[9u8; 500]);
        hasher.reset();
        assert_eq!(hasher.counter, fresh.counter);
        assert_eq!(hasher.offset, fresh.offset);
        assert_eq!(hasher.sum(), fresh.sum());
    }

    #[test]
    fn reset_restores_unkeyed_state() {
        let mut hasher = Blake2b::new(&Params::BLAKE2B_256).unwrap();
        hasher.write(b"discarded");
        hasher.reset();
        assert_eq!(
            hasher.sum(),
            Blake2b::new(&Params::BLAKE2B_256).unwrap().sum()
        );
    }

    #[test]
    fn debug_hides_key() {
        let params = Params::new(32).with_key(vec![0xEEu8; 8]);
        let rendered = format!("{:?}", Blake2b::new(&params).unwrap());
        assert!(rendered.contains("keyed: true"));
        assert!(!rendered.contains("238"));
    }
}
