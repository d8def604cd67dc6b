//! The grand self-test from RFC 7693 Appendix E, plus a chunking matrix,
//! both driven through the public API only.

use blake2b_portable::{hash, State};

// The Fibonacci-style generator the self-test uses for messages and keys.
fn selftest_seq(out: &mut [u8], seed: u32) {
    let mut a = 0xDEAD4BADu32.wrapping_mul(seed);
    let mut b = 1u32;
    for byte in out.iter_mut() {
        let t = a.wrapping_add(b);
        a = b;
        b = t;
        *byte = (t >> 24) as u8;
    }
}

// Every digest length in {20, 32, 48, 64} crossed with every input length
// in {0, 3, 128, 129, 255, 1024}, unkeyed and then keyed with a key as long
// as the digest. The resulting digests are folded, in order, into a 256-bit
// accumulator whose final value is fixed by the RFC.
#[test]
fn grand_hash_of_hashes() {
    let mut acc = State::new(32).unwrap();
    let mut msg = [0u8; 1024];
    let mut key = [0u8; 64];

    for &outlen in &[20usize, 32, 48, 64] {
        for &inlen in &[0usize, 3, 128, 129, 255, 1024] {
            selftest_seq(&mut msg[..inlen], inlen as u32);
            let unkeyed = hash(outlen, &[], &msg[..inlen]).unwrap();
            acc.update(unkeyed.bytes());

            selftest_seq(&mut key[..outlen], outlen as u32);
            let keyed = hash(outlen, &key[..outlen], &msg[..inlen]).unwrap();
            acc.update(keyed.bytes());
        }
    }

    assert_eq!(
        "c23a7800d98123bd10f506c61e29da5603d763b8bbad2e737f5e765a7bccd475",
        &acc.finalize().hex()[..],
    );
}

#[test]
fn chunking_is_invisible() {
    let mut input = [0u8; 1024];
    selftest_seq(&mut input, 1024);

    let whole = hash(64, &[], &input).unwrap();
    for &chunk_len in &[1usize, 127, 128, 129, 333] {
        let mut state = State::new(64).unwrap();
        for chunk in input.chunks(chunk_len) {
            state.update(chunk);
        }
        assert_eq!(whole, state.finalize(), "chunk size {}", chunk_len);
    }
}
