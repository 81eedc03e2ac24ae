//! Shared helpers over the arbitrary-precision integer backend.
//!
//! Centralizing these keeps the "mod on a negative number" convention (see
//! `spec.md` §9 Open Questions) in exactly one place instead of re-derived at
//! every call site.

use rand::{CryptoRng, RngCore};
use unknown_order::BigNumber;

/// Arbitrary-precision signed integer. Re-exported under a short alias because
/// every module in this crate touches it.
pub type Int = BigNumber;

/// Reduce `a` modulo `m`, returning a representative in `[0, m)` regardless of the
/// sign of `a`. `unknown_order::BigNumber`'s `%` can return a negative remainder for
/// a negative dividend (it follows truncating division like most native integer
/// types); this normalizes it to the mathematical convention the scheme assumes
/// everywhere a modular additive inverse is computed.
pub fn mod_nonneg(a: &Int, m: &Int) -> Int {
    let r = a % m;
    if r < Int::zero() {
        r + m
    } else {
        r
    }
}

/// Sample a uniformly random integer in `[lo, hi)`, using the supplied CSPRNG.
///
/// Panics if `hi <= lo`; callers only ever invoke this with statically-known-valid
/// ranges (message-space/blinding bounds derived from `p`/`n`).
pub fn uniform_range(rng: &mut (impl CryptoRng + RngCore), lo: &Int, hi: &Int) -> Int {
    assert!(hi > lo, "uniform_range: empty range");
    let span = hi - lo;
    lo + Int::random_with_rng(rng, &span)
}

/// Big-endian bits of `n`, most significant first, with no leading zero bits
/// (`n == 0` yields a single `false`). Used to drive square-and-multiply /
/// double-and-add loops without assuming the backend exposes integer division.
pub fn bits_be(n: &Int) -> Vec<bool> {
    if *n == Int::zero() {
        return vec![false];
    }
    let bytes = n.to_bytes();
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    let mut started = false;
    for byte in bytes {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 == 1;
            if !started {
                if !bit {
                    continue;
                }
                started = true;
            }
            bits.push(bit);
        }
    }
    if bits.is_empty() {
        bits.push(false);
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn mod_nonneg_handles_negative_dividend() {
        let m = Int::from(7);
        let a = Int::from(-3);
        assert_eq!(mod_nonneg(&a, &m), Int::from(4));
    }

    #[test]
    fn mod_nonneg_handles_positive_dividend() {
        let m = Int::from(7);
        let a = Int::from(10);
        assert_eq!(mod_nonneg(&a, &m), Int::from(3));
    }

    #[test]
    fn bits_be_matches_known_values() {
        assert_eq!(bits_be(&Int::from(0)), vec![false]);
        assert_eq!(bits_be(&Int::from(1)), vec![true]);
        assert_eq!(bits_be(&Int::from(5)), vec![true, false, true]);
        assert_eq!(bits_be(&Int::from(6)), vec![true, true, false]);
    }

    #[test]
    fn uniform_range_stays_in_bounds() {
        let mut rng = thread_rng();
        let lo = Int::from(4);
        let hi = Int::from(100);
        for _ in 0..64 {
            let v = uniform_range(&mut rng, &lo, &hi);
            assert!(v >= lo && v < hi);
        }
    }
}
