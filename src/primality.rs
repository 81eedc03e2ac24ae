//! Lucas pseudoprimality test. Component C of the attestation core (`spec.md` §4.C).
//!
//! Used as a probabilistic filter in [`crate::bgn::generate_prime`]'s search loop, not
//! exposed as a general-purpose primality oracle elsewhere in this crate.

use crate::numeric::{bits_be, mod_nonneg, Int};

/// Strip all factors of two from `a`, returning `(odd_part, count)`.
///
/// Built from [`bits_be`] rather than integer division/shift-right, since only
/// left-shift is evidenced for this backend (see `numeric::bits_be`'s own doc).
fn strip_factors_of_two(a: &Int) -> (Int, u32) {
    if *a == Int::zero() {
        return (Int::zero(), 0);
    }
    let bits = bits_be(a);
    let trailing_zeros = bits.iter().rev().take_while(|b| !**b).count() as u32;
    if trailing_zeros == 0 {
        return (a.clone(), 0);
    }
    let kept = &bits[..bits.len() - trailing_zeros as usize];
    let mut v = Int::zero();
    for &bit in kept {
        v = v << 1;
        if bit {
            v = v + Int::one();
        }
    }
    (v, trailing_zeros)
}

/// Jacobi symbol `(a|n)` for odd positive `n`, via the quadratic-reciprocity
/// recursion (does not require factoring `n`, unlike the two-prime-factor
/// Legendre-product shortcut used elsewhere for known-composite moduli).
fn jacobi_symbol(a: &Int, n: &Int) -> i32 {
    debug_assert!(*n > Int::zero());
    debug_assert!(mod_nonneg(n, &Int::from(2)) == Int::one(), "n must be odd");

    let mut a = mod_nonneg(a, n);
    let mut n = n.clone();
    let mut result = 1i32;

    loop {
        if a == Int::zero() {
            return if n == Int::one() { result } else { 0 };
        }
        let (odd_a, twos) = strip_factors_of_two(&a);
        if twos % 2 == 1 {
            let r = mod_nonneg(&n, &Int::from(8));
            if r == Int::from(3) || r == Int::from(5) {
                result = -result;
            }
        }
        a = odd_a;
        if mod_nonneg(&a, &Int::from(4)) == Int::from(3) && mod_nonneg(&n, &Int::from(4)) == Int::from(3) {
            result = -result;
        }
        std::mem::swap(&mut a, &mut n);
        a = mod_nonneg(&a, &n);
    }
}

/// Number of discriminant candidates tried before giving up (treating `m` as composite).
/// `m` would have to be a perfect square, or share a factor with every one of the first
/// 64 odd numbers from 5 upward, for this bound to bite in practice.
const MAX_DISCRIMINANT_TRIES: i64 = 64;

/// Selfridge's method A: find the first `D` in `5, -7, 9, -11, 13, ...` with Jacobi
/// symbol `(D|m) = -1`, and the matching `Q = (1-D)/4`. Returns `None` if `m` is
/// revealed composite along the way (`(D|m) = 0`) or the search is exhausted.
fn select_discriminant(m: &Int) -> Option<(Int, Int)> {
    let mut magnitude = 5i64;
    let mut sign = 1i64;
    for _ in 0..MAX_DISCRIMINANT_TRIES {
        let d_i64 = magnitude * sign;
        let d = Int::from(d_i64);
        match jacobi_symbol(&d, m) {
            -1 => {
                let q_i64 = (1 - d_i64) / 4;
                return Some((d, Int::from(q_i64)));
            }
            0 => return None,
            _ => {}
        }
        magnitude += 2;
        sign = -sign;
    }
    None
}

/// Lucas `U`, `V` sequences at index `delta`, parameters `(p=1, q, d)`, reduced mod `m`.
fn lucas_uv(m: &Int, q: &Int, d: &Int, delta: &Int) -> (Int, Int) {
    let inv2 = Int::from(2)
        .invert(m)
        .expect("m is odd, so 2 is invertible mod m");
    let bits = bits_be(delta);

    let mut u = Int::one();
    let mut v = Int::one(); // P = 1
    let mut qk = mod_nonneg(q, m);

    for &bit in bits.iter().skip(1) {
        let u2 = mod_nonneg(&(&u * &v), m);
        let v2 = mod_nonneg(&(&v * &v - &(Int::from(2) * &qk)), m);
        qk = mod_nonneg(&(&qk * &qk), m);
        u = u2;
        v = v2;

        if bit {
            let new_u = mod_nonneg(&((&u + &v) * &inv2), m);
            let new_v = mod_nonneg(&((d * &u + &v) * &inv2), m);
            u = new_u;
            v = new_v;
            qk = mod_nonneg(&(&qk * q), m);
        }
    }
    (u, v)
}

/// Decide Lucas pseudoprimality of odd `m > 3` relative to parameters `(P=1, Q)` with
/// `Q` chosen via Jacobi-symbol-based discriminant selection (`spec.md` §4.C).
///
/// `m` is a Lucas probable prime iff `U_{m - (D|m)} ≡ 0 (mod m)`; since the selected
/// `D` always has `(D|m) = -1`, this is `U_{m+1} ≡ 0 (mod m)`.
pub fn is_lucas_probable_prime(m: &Int) -> bool {
    if *m <= Int::from(3) {
        return false;
    }
    if mod_nonneg(m, &Int::from(2)) == Int::zero() {
        return false;
    }
    let (d, q) = match select_discriminant(m) {
        Some(pair) => pair,
        None => return false,
    };
    let delta = m + Int::one();
    let (u, _v) = lucas_uv(m, &q, &d, &delta);
    u == Int::zero()
}
