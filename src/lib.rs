//! An implementation of BLAKE2b (RFC 7693) with the classic
//! init/update/finalize interface, a caller-chosen digest length of 1 to 64
//! bytes, and optional keying.
//!
//! The crate is `no_std`-compatible (disable the default `std` feature),
//! performs no heap allocation, and uses only the portable compression
//! function, so the same code runs on every target.
//!
//! # Example
//!
//! ```
//! let mut state = blake2b_portable::State::new(64)?;
//! state.update(b"ab");
//! state.update(b"c");
//! let digest = state.finalize();
//! assert_eq!(
//!     "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1\
//!      7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923",
//!     &digest.hex()[..],
//! );
//! # Ok::<(), blake2b_portable::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use arrayref::array_ref;
use arrayvec::ArrayString;
use byteorder::{ByteOrder, LittleEndian};
use core::cmp;
use core::fmt;

mod portable;


/// The number of bytes in a compression block, 128.
pub const BLOCKBYTES: usize = 128;
/// The maximum digest length, 64.
pub const OUTBYTES: usize = 64;
/// The maximum key length, 64.
pub const KEYBYTES: usize = 64;

const IV: [u64; 8] = [
    0x6A09E667F3BCC908,
    0xBB67AE8584CAA73B,
    0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1,
    0x510E527FADE682D1,
    0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B,
    0x5BE0CD19137E2179,
];

type StateWords = [u64; 8];
type Block = [u8; BLOCKBYTES];

/// Compute the unkeyed, full-length (64-byte) BLAKE2b hash of `input`.
pub fn blake2b(input: &[u8]) -> Digest {
    let mut state = State::init(OUTBYTES as u8, &[]);
    state.update(input);
    state.finalize()
}

/// Hash `input` in one shot, with a caller-chosen digest length and an
/// optional key. An empty key means unkeyed hashing. Fails only on the
/// parameter checks of [`State::with_key`].
pub fn hash(outlen: usize, key: &[u8], input: &[u8]) -> Result<Digest, Error> {
    let mut state = State::with_key(outlen, key)?;
    state.update(input);
    Ok(state.finalize())
}

/// The error returned when hashing parameters are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested digest length was outside `1..=OUTBYTES`, or a key was
    /// longer than `KEYBYTES`.
    InvalidParameter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidParameter => write!(f, "invalid digest or key length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// An incremental BLAKE2b hashing context.
///
/// A `State` absorbs any number of `update` calls and is consumed by
/// `finalize`. Hashing another message starts from a fresh `State`; there is
/// no reset.
#[derive(Clone)]
pub struct State {
    h: StateWords,
    buf: Block,
    buflen: usize,
    count: u128,
    outlen: u8,
}

impl State {
    /// Create an unkeyed state producing an `outlen`-byte digest.
    ///
    /// The digest length is associated data: the same input hashed at two
    /// different lengths gives unrelated digests, not truncations of one
    /// another. `outlen` must be in `1..=OUTBYTES`.
    pub fn new(outlen: usize) -> Result<Self, Error> {
        Self::with_key(outlen, &[])
    }

    /// Create a keyed state, making BLAKE2b act as a MAC. The key may be up
    /// to `KEYBYTES` long, and an empty key is equivalent to no key at all.
    pub fn with_key(outlen: usize, key: &[u8]) -> Result<Self, Error> {
        if outlen == 0 || outlen > OUTBYTES || key.len() > KEYBYTES {
            return Err(Error::InvalidParameter);
        }
        Ok(Self::init(outlen as u8, key))
    }

    // Callers have already range-checked `outlen` and `key`.
    fn init(outlen: u8, key: &[u8]) -> Self {
        let mut h = IV;
        // The parameter block, folded into the first word: digest length,
        // key length, fanout = 1, max depth = 1. Sequential hashing with no
        // salt or personalization leaves every other word zero.
        h[0] ^= outlen as u64;
        h[0] ^= (key.len() as u64) << 8;
        h[0] ^= 1 << 16;
        h[0] ^= 1 << 24;
        let mut state = Self {
            h,
            buf: [0; BLOCKBYTES],
            buflen: 0,
            count: 0,
            outlen,
        };
        if !key.is_empty() {
            // The key is absorbed as a full zero-padded block prepended to
            // the message. It stays buffered here; whether it is compressed
            // as a non-final or final block depends on what follows.
            let mut block = [0; BLOCKBYTES];
            block[..key.len()].copy_from_slice(key);
            state.update(&block);
        }
        state
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(BLOCKBYTES - self.buflen, input.len());
        self.buf[self.buflen..self.buflen + take].copy_from_slice(&input[..take]);
        self.buflen += take;
        self.count += take as u128;
        *input = &input[take..];
    }

    /// Absorb more input. Equivalent input gives an equivalent digest no
    /// matter how it is split across `update` calls.
    pub fn update(&mut self, mut input: &[u8]) {
        // Top up a partial buffer first. Compress it only if more input
        // follows; a full buffer with nothing behind it might be the
        // message's last block, which belongs to finalize.
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if !input.is_empty() {
                portable::compress(&mut self.h, &self.buf, self.count, false);
                self.buflen = 0;
            }
        }
        // Compress whole blocks straight out of the input, as long as at
        // least one byte remains behind them. The strict `>` keeps the
        // final block out of this loop even when the input length is a
        // multiple of BLOCKBYTES.
        while input.len() > BLOCKBYTES {
            self.count += BLOCKBYTES as u128;
            let block = array_ref!(input, 0, BLOCKBYTES);
            portable::compress(&mut self.h, block, self.count, false);
            input = &input[BLOCKBYTES..];
        }
        // Buffer the tail, to be compressed or finalized later.
        self.fill_buf(&mut input);
    }

    /// The total number of input bytes absorbed so far, as the 128-bit
    /// quantity the compression function sees. For a keyed state this
    /// includes the 128-byte key block.
    pub fn count(&self) -> u128 {
        self.count
    }

    /// The digest length this state was initialized with.
    pub fn outlen(&self) -> usize {
        self.outlen as usize
    }

    /// Finish hashing and return the digest, consuming the state.
    pub fn finalize(mut self) -> Digest {
        for i in self.buflen..BLOCKBYTES {
            self.buf[i] = 0;
        }
        portable::compress(&mut self.h, &self.buf, self.count, true);
        let mut digest = Digest {
            bytes: [0; OUTBYTES],
            len: self.outlen,
        };
        LittleEndian::write_u64_into(&self.h, &mut digest.bytes);
        digest
    }
}

#[cfg(feature = "std")]
impl std::io::Write for State {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A finalized BLAKE2b hash, between 1 and `OUTBYTES` bytes long.
///
/// `Digest` supports constant-time equality checks, for cases where a keyed
/// BLAKE2b is being used as a MAC.
#[derive(Clone)]
pub struct Digest {
    bytes: [u8; OUTBYTES],
    len: u8,
}

impl Digest {
    /// The digest bytes, truncated to the length the state was initialized
    /// with.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Render the digest as lowercase hexadecimal, without allocating.
    pub fn hex(&self) -> ArrayString<[u8; 2 * OUTBYTES]> {
        let mut s = ArrayString::new();
        let table = b"0123456789abcdef";
        for &b in self.bytes() {
            s.push(table[(b >> 4) as usize] as char);
            s.push(table[(b & 0xf) as usize] as char);
        }
        s
    }
}

/// This implementation is constant time, if the two digests are the same
/// length.
impl PartialEq for Digest {
    fn eq(&self, other: &Digest) -> bool {
        constant_time_eq::constant_time_eq(self.bytes(), other.bytes())
    }
}

impl Eq for Digest {}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Digest({})", self.hex())
    }
}
