//! The supersingular curve `y^2 = x^3 + 1` over `F_{p^2}` and its Weil pairing.
//!
//! Component B of the attestation core (`spec.md` §4.B). Both field and curve are
//! plain value types — no parent/child object graph, per `spec.md` §9's
//! re-architecture guidance.

use tracing::debug;

use crate::field::FieldElement;
use crate::numeric::{bits_be, Int};

/// An affine point on `y^2 = x^3 + 1`, or the point at infinity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AffinePoint {
    Infinity,
    Point(FieldElement, FieldElement),
}

impl AffinePoint {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        AffinePoint::Point(x, y)
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, AffinePoint::Infinity)
    }

    pub fn negate(&self) -> Self {
        match self {
            AffinePoint::Infinity => AffinePoint::Infinity,
            AffinePoint::Point(x, y) => AffinePoint::Point(x.clone(), y.neg()),
        }
    }

    /// Chord-and-tangent addition (handles `self == other` as doubling).
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (AffinePoint::Infinity, _) => other.clone(),
            (_, AffinePoint::Infinity) => self.clone(),
            (AffinePoint::Point(x1, y1), AffinePoint::Point(x2, y2)) => {
                if x1 == x2 && y1.add(y2) == FieldElement::zero(x1.modulus()) {
                    return AffinePoint::Infinity;
                }
                let lambda = if x1 == x2 && y1 == y2 {
                    // tangent: (3x1^2) / (2y1)
                    let three_x1_sq = x1.mul(x1).mul(&fe(x1.modulus(), 3));
                    let two_y1 = y1.add(y1);
                    match two_y1.inverse() {
                        Ok(inv) => three_x1_sq.mul(&inv),
                        Err(_) => return AffinePoint::Infinity,
                    }
                } else {
                    // chord: (y2-y1) / (x2-x1)
                    let dy = y2.sub(y1);
                    let dx = x2.sub(x1);
                    match dx.inverse() {
                        Ok(inv) => dy.mul(&inv),
                        Err(_) => return AffinePoint::Infinity,
                    }
                };
                let x3 = lambda.mul(&lambda).sub(x1).sub(x2);
                let y3 = lambda.mul(&x1.sub(&x3)).sub(y1);
                AffinePoint::Point(x3, y3)
            }
        }
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }
}

fn fe(p: &Int, v: i64) -> FieldElement {
    FieldElement::new(p, Int::from(v), Int::zero())
}

/// Outcome of a pairing computation: the sentinel variant replaces the "raise an
/// exception on bad input" style of the reference with a nullable result, per
/// `spec.md` §9's re-architecture guidance for `BadPairing`.
#[derive(Clone, Debug)]
pub enum PairingOutcome {
    Good(FieldElement),
    Bad,
}

impl PairingOutcome {
    pub fn good(self) -> Option<FieldElement> {
        match self {
            PairingOutcome::Good(v) => Some(v),
            PairingOutcome::Bad => None,
        }
    }
}

/// Evaluate the line through `a` and `b` (or the tangent at `a`, if `a == b`) at
/// the point with coordinates `(qx, qy)`. Returns `None` if the line is vertical
/// in a way that makes the denominator of the full Miller ratio vanish, or if
/// either input point is the identity.
fn line_eval(a: &AffinePoint, b: &AffinePoint, qx: &FieldElement, qy: &FieldElement) -> Option<FieldElement> {
    let (ax, ay) = match a {
        AffinePoint::Point(x, y) => (x, y),
        AffinePoint::Infinity => return None,
    };
    let (bx, by) = match b {
        AffinePoint::Point(x, y) => (x, y),
        AffinePoint::Infinity => return None,
    };

    if ax == bx {
        if ay.add(by) == FieldElement::zero(ax.modulus()) {
            // vertical line x = ax (covers tangent-at-2-torsion and chord-to-infinity)
            return Some(qx.sub(ax));
        }
        // a == b: tangent
        let three_x1_sq = ax.mul(ax).mul(&fe(ax.modulus(), 3));
        let two_y1 = ay.add(ay);
        let lambda = three_x1_sq.mul(&two_y1.inverse().ok()?);
        return Some(qy.sub(ay).sub(&lambda.mul(&qx.sub(ax))));
    }
    let dy = by.sub(ay);
    let dx = bx.sub(ax);
    let lambda = dy.mul(&dx.inverse().ok()?);
    Some(qy.sub(ay).sub(&lambda.mul(&qx.sub(ax))))
}

/// Miller's algorithm: builds `f_{n,base}` via double-and-add over the binary
/// expansion of `n`, evaluated at `(qx, qy)`. Returns `None` on any degenerate
/// line evaluation or if an intermediate point hits the identity.
fn miller(p: &Int, base: &AffinePoint, n: &Int, qx: &FieldElement, qy: &FieldElement) -> Option<FieldElement> {
    let bits = bits_be(n);
    let mut t = base.clone();
    let mut f = FieldElement::one(p);

    for &bit in bits.iter().skip(1) {
        let line = line_eval(&t, &t, qx, qy)?;
        f = f.mul(&f).mul(&line);
        t = t.double();
        if t.is_infinity() {
            debug!("miller: intermediate point hit infinity");
            return None;
        }
        if bit {
            let line = line_eval(&t, base, qx, qy)?;
            f = f.mul(&line);
            t = t.add(base);
        }
    }
    Some(f)
}

/// Compute `e_n(P, Q)` using auxiliary point `S`, which must differ from `O`, `P`,
/// `Q` and `P - Q`. `spec.md` §4.B:
/// `e_n(P,Q) = [f_P(Q+S)/f_P(S)] / [f_Q(P-S)/f_Q(-S)]`.
pub fn weil_pairing(p: &Int, n: &Int, point_p: &AffinePoint, point_q: &AffinePoint, s: &AffinePoint) -> PairingOutcome {
    let q_plus_s = point_q.add(s);
    let neg_s = s.negate();
    let p_minus_s = point_p.add(&neg_s);

    let coords = |pt: &AffinePoint| -> Option<(FieldElement, FieldElement)> {
        match pt {
            AffinePoint::Point(x, y) => Some((x.clone(), y.clone())),
            AffinePoint::Infinity => None,
        }
    };

    let run = |base: &AffinePoint, at: &AffinePoint| -> Option<FieldElement> {
        let (qx, qy) = coords(at)?;
        miller(p, base, n, &qx, &qy)
    };

    let f_p_qs = run(point_p, &q_plus_s);
    let f_p_s = run(point_p, s);
    let f_q_pms = run(point_q, &p_minus_s);
    let f_q_ms = run(point_q, &neg_s);

    let (f_p_qs, f_p_s, f_q_pms, f_q_ms) = match (f_p_qs, f_p_s, f_q_pms, f_q_ms) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => {
            debug!("weil_pairing: degenerate Miller evaluation");
            return PairingOutcome::Bad;
        }
    };

    if f_p_s.is_zero() || f_q_ms.is_zero() {
        return PairingOutcome::Bad;
    }
    let numerator = f_p_qs.mul(&f_p_s.inverse().expect("checked non-zero above"));
    let denominator = f_q_pms.mul(&f_q_ms.inverse().expect("checked non-zero above"));

    if denominator.is_zero() {
        return PairingOutcome::Bad;
    }
    let result = numerator.mul(&denominator.inverse().expect("checked non-zero above"));
    if result.is_zero() {
        return PairingOutcome::Bad;
    }
    PairingOutcome::Good(result)
}

/// A pairing is "good" iff it is neither `0` nor `1` and its order divides `n`
/// (`spec.md` §4.B's suitability test).
pub fn is_good_pairing(n: &Int, wp: &FieldElement) -> bool {
    if wp.is_zero() {
        return false;
    }
    let one = FieldElement::one(wp.modulus());
    if *wp == one {
        return false;
    }
    let n_plus_1 = n + Int::one();
    wp.pow_reduced_nonzero(&n_plus_1) == *wp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_p() -> Int {
        // 23 mod 3 == 2, 23 mod 4 == 3: valid for this scheme's field construction.
        Int::from(23)
    }

    fn pt(x: i64, y: i64) -> AffinePoint {
        let p = toy_p();
        AffinePoint::new(fe(&p, x), fe(&p, y))
    }

    #[test]
    fn point_on_curve_satisfies_equation() {
        // 4^2 = 16, 2^3+1=9 -- not on curve, just exercising arithmetic below instead.
        // Find a real point on y^2=x^3+1 mod 23: x=0 -> y^2=1 -> y=1
        let p = toy_p();
        let x = fe(&p, 0);
        let y = fe(&p, 1);
        assert_eq!(y.mul(&y), x.mul(&x).mul(&x).add(&FieldElement::one(&p)));
    }

    #[test]
    fn add_identity_is_neutral() {
        let p = pt(0, 1);
        assert_eq!(p.add(&AffinePoint::Infinity), p);
        assert_eq!(AffinePoint::Infinity.add(&p), p);
    }

    #[test]
    fn add_point_and_negation_is_infinity() {
        let p = pt(0, 1);
        let neg = p.negate();
        assert_eq!(p.add(&neg), AffinePoint::Infinity);
    }

    #[test]
    fn double_then_check_still_produces_a_point_or_infinity() {
        let p = pt(0, 1);
        let d = p.double();
        // must not panic; either infinity (2-torsion) or a concrete point
        match d {
            AffinePoint::Infinity => {}
            AffinePoint::Point(x, y) => {
                assert_eq!(y.mul(&y), x.mul(&x).mul(&x).add(&FieldElement::one(&toy_p())));
            }
        }
    }
}
