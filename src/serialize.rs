//! Big-endian fixed-width (de)serialization for field elements, ciphertexts, and
//! attestations (`spec.md` §6 "Serialization"). Byte widths are derived from the
//! field modulus so two implementations serializing against the same key agree
//! byte-for-byte.

use crate::attestation::{Attestation, BitPairAttestation};
use crate::bgn::PublicKey;
use crate::field::FieldElement;
use crate::numeric::Int;

/// `ceil(log2(p) / 8)`: the width in bytes of one coordinate of an `F_{p^2}` element.
pub fn byte_width(p: &Int) -> usize {
    (p.bit_length() as usize).div_ceil(8)
}

fn pad_be(v: &Int, width: usize) -> Vec<u8> {
    let bytes = v.to_bytes();
    if bytes.len() >= width {
        bytes[bytes.len() - width..].to_vec()
    } else {
        let mut out = vec![0u8; width - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    }
}

/// Serialize a field element (or ciphertext — `spec.md` §3 defines `Ciphertext` as a
/// single `F_{p^2}` element) as two big-endian unsigned integers of `byte_width(p)`
/// bytes each: the real part, then the imaginary part.
pub fn field_element_to_bytes(fe: &FieldElement) -> Vec<u8> {
    let width = byte_width(fe.modulus());
    let mut out = pad_be(fe.real(), width);
    out.extend(pad_be(fe.imag(), width));
    out
}

/// Inverse of [`field_element_to_bytes`]. Returns `None` if `bytes` is not exactly
/// `2 * byte_width(p)` long.
pub fn field_element_from_bytes(p: &Int, bytes: &[u8]) -> Option<FieldElement> {
    let width = byte_width(p);
    if bytes.len() != width * 2 {
        return None;
    }
    let a = Int::from_slice(&bytes[..width]);
    let b = Int::from_slice(&bytes[width..]);
    Some(FieldElement::new(p, a, b))
}

/// Serialize a public key as `p . g . h . n`, each component a fixed-width
/// big-endian integer (`g`/`h` as two such integers, via [`field_element_to_bytes`]).
/// Total length is `6 * byte_width(p)`.
pub fn public_key_to_bytes(pk: &PublicKey) -> Vec<u8> {
    let width = byte_width(&pk.p);
    let mut out = pad_be(&pk.p, width);
    out.extend(field_element_to_bytes(&pk.g));
    out.extend(field_element_to_bytes(&pk.h));
    out.extend(pad_be(&pk.n, width));
    out
}

/// Inverse of [`public_key_to_bytes`]. `p_byte_width` is the width a caller expects
/// `p` to occupy; since `p`'s own byte width can't be known before it's parsed, this
/// must be agreed out of band (e.g. from the same `key_size` used at generation).
pub fn public_key_from_bytes(p_byte_width: usize, bytes: &[u8]) -> Option<PublicKey> {
    let w = p_byte_width;
    if bytes.len() != w * 6 {
        return None;
    }
    let p = Int::from_slice(&bytes[..w]);
    let g = field_element_from_bytes(&p, &bytes[w..w * 3])?;
    let h = field_element_from_bytes(&p, &bytes[w * 3..w * 5])?;
    let n = Int::from_slice(&bytes[w * 5..w * 6]);
    Some(PublicKey { p, g, h, n })
}

/// Serialize one bit-pair triple as `C_a . C_b . S`, `2 * byte_width(p)` bytes each.
fn bitpair_to_bytes(bp: &BitPairAttestation) -> Vec<u8> {
    let mut out = field_element_to_bytes(&bp.c_a);
    out.extend(field_element_to_bytes(&bp.c_b));
    out.extend(field_element_to_bytes(&bp.s));
    out
}

fn bitpair_from_bytes(p: &Int, bytes: &[u8]) -> Option<BitPairAttestation> {
    let width = byte_width(p);
    let unit = width * 2;
    if bytes.len() != unit * 3 {
        return None;
    }
    let c_a = field_element_from_bytes(p, &bytes[..unit])?;
    let c_b = field_element_from_bytes(p, &bytes[unit..unit * 2])?;
    let s = field_element_from_bytes(p, &bytes[unit * 2..unit * 3])?;
    Some(BitPairAttestation { c_a, c_b, s })
}

/// Serialize an attestation as the owning public key, a `u32` big-endian bit-pair
/// count, then that many bit-pair triples (`spec.md` §6 "Serialization").
pub fn attestation_to_bytes(att: &Attestation) -> Vec<u8> {
    let mut out = public_key_to_bytes(&att.public_key);
    out.extend((att.bitpairs.len() as u32).to_be_bytes());
    for bp in &att.bitpairs {
        out.extend(bitpair_to_bytes(bp));
    }
    out
}

/// Inverse of [`attestation_to_bytes`]. `p_byte_width` has the same out-of-band
/// requirement as [`public_key_from_bytes`].
pub fn attestation_from_bytes(p_byte_width: usize, bytes: &[u8]) -> Option<Attestation> {
    let w = p_byte_width;
    let pk_len = w * 6;
    if bytes.len() < pk_len + 4 {
        return None;
    }
    let public_key = public_key_from_bytes(w, &bytes[..pk_len])?;
    let count = u32::from_be_bytes(bytes[pk_len..pk_len + 4].try_into().ok()?) as usize;

    let unit = w * 6;
    let rest = &bytes[pk_len + 4..];
    if rest.len() != unit * count {
        return None;
    }
    let mut bitpairs = Vec::with_capacity(count);
    for chunk in rest.chunks_exact(unit) {
        bitpairs.push(bitpair_from_bytes(&public_key.p, chunk)?);
    }
    Some(Attestation { public_key, bitpairs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_element_round_trips() {
        let p = Int::from(10_007i64);
        let fe = FieldElement::new(&p, Int::from(123), Int::from(456));
        let bytes = field_element_to_bytes(&fe);
        assert_eq!(bytes.len(), byte_width(&p) * 2);
        let back = field_element_from_bytes(&p, &bytes).unwrap();
        assert_eq!(back, fe);
    }

    #[test]
    fn field_element_from_bytes_rejects_wrong_length() {
        let p = Int::from(10_007i64);
        assert!(field_element_from_bytes(&p, &[0u8; 3]).is_none());
    }

    #[test]
    fn byte_width_matches_expected_bit_lengths() {
        assert_eq!(byte_width(&Int::from(255)), 1);
        assert_eq!(byte_width(&Int::from(256)), 2);
        assert_eq!(byte_width(&Int::from(65_535)), 2);
    }

    #[test]
    fn public_key_round_trips() {
        let p = Int::from(10_007i64);
        let pk = PublicKey {
            p: p.clone(),
            g: FieldElement::new(&p, Int::from(2), Int::from(3)),
            h: FieldElement::new(&p, Int::from(5), Int::from(7)),
            n: Int::from(143),
        };
        let bytes = public_key_to_bytes(&pk);
        let back = public_key_from_bytes(byte_width(&p), &bytes).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn attestation_round_trips() {
        let p = Int::from(10_007i64);
        let pk = PublicKey {
            p: p.clone(),
            g: FieldElement::new(&p, Int::from(2), Int::from(3)),
            h: FieldElement::new(&p, Int::from(5), Int::from(7)),
            n: Int::from(143),
        };
        let bp = BitPairAttestation {
            c_a: FieldElement::new(&p, Int::from(11), Int::from(13)),
            c_b: FieldElement::new(&p, Int::from(17), Int::from(19)),
            s: FieldElement::new(&p, Int::from(23), Int::from(29)),
        };
        let att = Attestation {
            public_key: pk,
            bitpairs: vec![bp.clone(), bp],
        };
        let bytes = attestation_to_bytes(&att);
        let back = attestation_from_bytes(byte_width(&p), &bytes).unwrap();
        assert_eq!(back.bitpairs.len(), 2);
        assert_eq!(back.public_key, att.public_key);
    }
}
