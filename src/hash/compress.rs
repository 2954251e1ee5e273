//! BLAKE2b compression function (RFC 7693 section 3.2).

use super::{BLOCK_SIZE, CHAIN_WORDS};

const WORK_WORDS: usize = 16;
const ROUNDS: usize = 12;

/// Initialization vector, shared with SHA-512.
pub(crate) const IV: [u64; CHAIN_WORDS] = [
    0x6A09_E667_F3BC_C908,
    0xBB67_AE85_84CA_A73B,
    0x3C6E_F372_FE94_F82B,
    0xA54F_F53A_5F1D_36F1,
    0x510E_527F_ADE6_82D1,
    0x9B05_688C_2B3E_6C1F,
    0x1F83_D9AB_FB41_BD6B,
    0x5BE0_CD19_137E_2179,
];

// Rounds 10 and 11 reuse rows 0 and 1.
const SIGMA: [[usize; WORK_WORDS]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

/// Column quadruples followed by diagonal quadruples of the work vector.
const LANES: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

#[inline(always)]
fn mix(v: &mut [u64; WORK_WORDS], [a, b, c, d]: [usize; 4], x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);

    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Mix one 128-byte block into the chain value.
///
/// `counter` is the byte offset `(low, high)` at the end of this block and
/// `last` marks the final block of the message.
#[must_use]
pub(crate) fn compress(
    chain: &[u64; CHAIN_WORDS],
    counter: [u64; 2],
    block: &[u8; BLOCK_SIZE],
    last: bool,
) -> [u64; CHAIN_WORDS] {
    let mut m = [0u64; WORK_WORDS];
    for (word, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
        *word = u64::from_le_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]);
    }

    let mut v = [0u64; WORK_WORDS];
    v[..CHAIN_WORDS].copy_from_slice(chain);
    v[CHAIN_WORDS..].copy_from_slice(&IV);
    v[12] ^= counter[0];
    v[13] ^= counter[1];
    if last {
        v[14] = !v[14];
    }

    for round in 0..ROUNDS {
        let s = &SIGMA[round % SIGMA.len()];
        for (step, lane) in LANES.iter().enumerate() {
            mix(&mut v, *lane, m[s[2 * step]], m[s[2 * step + 1]]);
        }
    }

    let mut out = [0u64; CHAIN_WORDS];
    for (idx, word) in out.iter_mut().enumerate() {
        *word = chain[idx] ^ v[idx] ^ v[idx + CHAIN_WORDS];
    }
    out
}
