//! Arithmetic in `F_{p^2} = F_p[i] / (i^2 + 1)`, `p` prime with `p mod 3 == 2`.
//!
//! Elements are represented as `a + b*i` with `a, b` kept reduced in `[0, p)`.
//! This is component A of the attestation core (`spec.md` §4.A).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use tracing::error;
use zeroize::Zeroize;

use crate::error::{BgnResult, DomainError};
use crate::numeric::{bits_be, mod_nonneg, Int};

/// An element `a + b*i` of `F_{p^2}`, carrying its own modulus.
///
/// `p` varies per key, so (unlike a fixed-curve `Scalar` type) it travels with the
/// value rather than living behind a type parameter — mirroring how the original
/// implementation's `FP2Value(p, a, b)` carries `p` on the instance.
#[derive(Clone, Debug, Zeroize)]
pub struct FieldElement {
    p: Int,
    a: Int,
    b: Int,
}

impl FieldElement {
    pub fn new(p: &Int, a: Int, b: Int) -> Self {
        Self {
            a: mod_nonneg(&a, p),
            b: mod_nonneg(&b, p),
            p: p.clone(),
        }
    }

    pub fn zero(p: &Int) -> Self {
        Self::new(p, Int::zero(), Int::zero())
    }

    pub fn one(p: &Int) -> Self {
        Self::new(p, Int::one(), Int::zero())
    }

    pub fn modulus(&self) -> &Int {
        &self.p
    }

    pub fn real(&self) -> &Int {
        &self.a
    }

    pub fn imag(&self) -> &Int {
        &self.b
    }

    pub fn is_zero(&self) -> bool {
        self.a == Int::zero() && self.b == Int::zero()
    }

    fn same_field(&self, other: &Self) {
        debug_assert_eq!(self.p, other.p, "FieldElement operands from different fields");
    }

    pub fn add(&self, other: &Self) -> Self {
        self.same_field(other);
        Self::new(&self.p, &self.a + &other.a, &self.b + &other.b)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.same_field(other);
        Self::new(&self.p, &self.a - &other.a, &self.b - &other.b)
    }

    pub fn neg(&self) -> Self {
        Self::new(&self.p, -&self.a, -&self.b)
    }

    /// `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`
    pub fn mul(&self, other: &Self) -> Self {
        self.same_field(other);
        let ac = &self.a * &other.a;
        let bd = &self.b * &other.b;
        let ad = &self.a * &other.b;
        let bc = &self.b * &other.a;
        Self::new(&self.p, ac - bd, ad + bc)
    }

    /// Square-and-multiply exponentiation. Non-negative exponents only.
    ///
    /// `self^0 == (1, 0)` even when `self` is the zero element, per `spec.md` §4.A's
    /// "edge policy". The exponent is used exactly as given — it is *not* reduced
    /// mod `p^2 - 1`; callers that know `self != 0` and want that reduction should
    /// use [`FieldElement::pow_reduced_nonzero`].
    pub fn pow(&self, exponent: &Int) -> Self {
        if *exponent == Int::zero() {
            return Self::one(&self.p);
        }
        let mut result = Self::one(&self.p);
        for bit in bits_be(exponent) {
            result = result.mul(&result);
            if bit {
                result = result.mul(self);
            }
        }
        result
    }

    /// Like [`FieldElement::pow`], but first reduces `exponent` modulo `p^2 - 1`.
    /// Only valid when `self != 0` (the multiplicative group has order `p^2 - 1`).
    pub fn pow_reduced_nonzero(&self, exponent: &Int) -> Self {
        debug_assert!(!self.is_zero());
        let order = {
            let p2 = &self.p * &self.p;
            p2 - Int::one()
        };
        let e = mod_nonneg(exponent, &order);
        self.pow(&e)
    }

    /// `(a - bi) / (a^2 + b^2)`
    pub fn inverse(&self) -> BgnResult<Self> {
        if self.is_zero() {
            error!("attempted to invert the zero element of F_p^2");
            return Err(DomainError::InverseOfZero.into());
        }
        let norm = mod_nonneg(&(&self.a * &self.a + &self.b * &self.b), &self.p);
        let norm_inv = norm
            .invert(&self.p)
            .expect("norm of a non-zero F_p^2 element is invertible mod prime p");
        let conj = Self::new(&self.p, self.a.clone(), -&self.b);
        Ok(Self::new(&self.p, &conj.a * &norm_inv, &conj.b * &norm_inv))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p && self.a == other.a && self.b == other.b
    }
}
impl Eq for FieldElement {}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}i (mod {})", self.a, self.b, self.p)
    }
}

impl Add for &FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: Self) -> FieldElement {
        FieldElement::add(self, rhs)
    }
}

impl Sub for &FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: Self) -> FieldElement {
        FieldElement::sub(self, rhs)
    }
}

impl Mul for &FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: Self) -> FieldElement {
        FieldElement::mul(self, rhs)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        FieldElement::neg(self)
    }
}
