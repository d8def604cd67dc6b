use crate::{Block, StateWords, IV};
use arrayref::array_refs;

// The message schedule. Each round reads the sixteen message words in the
// order given by its row. There are only ten distinct permutations; rounds
// 10 and 11 repeat rounds 0 and 1.
const SIGMA: [[u8; 16]; 12] = [
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
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

// G is the quarter-round mixing function, called eight times per round. A,
// B, C, and D index into the 16-word working vector, first down its four
// columns and then along its four diagonals. X and Y are the two message
// words this call consumes, selected by SIGMA. Additions wrap mod 2^64, and
// the rotation counts (32, 24, 16, 63) are fixed by the algorithm.
#[cfg_attr(not(feature = "uninline_portable"), inline(always))]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

#[cfg_attr(not(feature = "uninline_portable"), inline(always))]
fn round(r: usize, m: &[u64; 16], v: &mut [u64; 16]) {
    let s = SIGMA[r];

    // Mix the columns.
    g(v, 0, 4, 8, 12, m[s[0] as usize], m[s[1] as usize]);
    g(v, 1, 5, 9, 13, m[s[2] as usize], m[s[3] as usize]);
    g(v, 2, 6, 10, 14, m[s[4] as usize], m[s[5] as usize]);
    g(v, 3, 7, 11, 15, m[s[6] as usize], m[s[7] as usize]);

    // Mix the diagonals.
    g(v, 0, 5, 10, 15, m[s[8] as usize], m[s[9] as usize]);
    g(v, 1, 6, 11, 12, m[s[10] as usize], m[s[11] as usize]);
    g(v, 2, 7, 8, 13, m[s[12] as usize], m[s[13] as usize]);
    g(v, 3, 4, 9, 14, m[s[14] as usize], m[s[15] as usize]);
}

// The compression function. `h` is the 8-word chaining state. `block` is
// BLOCKBYTES of input, zero-padded past the caller's data in the final call.
// `count` is the number of input bytes hashed so far, including this block
// but not its padding. `lastblock` is set only for the final call; it
// complements word 14 of the working vector before the rounds run.
pub fn compress(h: &mut StateWords, block: &Block, count: u128, lastblock: bool) {
    let flag: u64 = if lastblock { !0 } else { 0 };
    let mut v = [
        h[0],
        h[1],
        h[2],
        h[3],
        h[4],
        h[5],
        h[6],
        h[7],
        IV[0],
        IV[1],
        IV[2],
        IV[3],
        IV[4] ^ count as u64,
        IV[5] ^ (count >> 64) as u64,
        IV[6] ^ flag,
        IV[7],
    ];

    // The sixteen message words, little-endian regardless of the host.
    let refs = array_refs!(block, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8);
    let m = [
        u64::from_le_bytes(*refs.0),
        u64::from_le_bytes(*refs.1),
        u64::from_le_bytes(*refs.2),
        u64::from_le_bytes(*refs.3),
        u64::from_le_bytes(*refs.4),
        u64::from_le_bytes(*refs.5),
        u64::from_le_bytes(*refs.6),
        u64::from_le_bytes(*refs.7),
        u64::from_le_bytes(*refs.8),
        u64::from_le_bytes(*refs.9),
        u64::from_le_bytes(*refs.10),
        u64::from_le_bytes(*refs.11),
        u64::from_le_bytes(*refs.12),
        u64::from_le_bytes(*refs.13),
        u64::from_le_bytes(*refs.14),
        u64::from_le_bytes(*refs.15),
    ];

    round(0, &m, &mut v);
    round(1, &m, &mut v);
    round(2, &m, &mut v);
    round(3, &m, &mut v);
    round(4, &m, &mut v);
    round(5, &m, &mut v);
    round(6, &m, &mut v);
    round(7, &m, &mut v);
    round(8, &m, &mut v);
    round(9, &m, &mut v);
    round(10, &m, &mut v);
    round(11, &m, &mut v);

    h[0] ^= v[0] ^ v[8];
    h[1] ^= v[1] ^ v[9];
    h[2] ^= v[2] ^ v[10];
    h[3] ^= v[3] ^ v[11];
    h[4] ^= v[4] ^ v[12];
    h[5] ^= v[5] ^ v[13];
    h[6] ^= v[6] ^ v[14];
    h[7] ^= v[7] ^ v[15];
}
