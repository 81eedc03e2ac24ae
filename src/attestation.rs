//! Bit-pair attestation builder. Component E (`spec.md` §4.E).
//!
//! See `SPEC_FULL.md` §B.1 for the two-stage shuffle this module reproduces from
//! `original_source/attestation.py`, keyed by pair index rather than bit offset.

use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};

use crate::bgn::{encrypt, Ciphertext, PublicKey};
use crate::constants::{RELATIVITY_BUCKETS, SHA512_BITSPACE};
use crate::error::{BgnResult, DomainError};
use crate::hash::sha512_as_int;
use crate::numeric::{bits_be, mod_nonneg, uniform_range, Int};

/// Histogram of decoded bit-pair sums: index `0..=2` are sum buckets, index `3` is
/// "undecodable" (`spec.md` §3 "Relativity map").
pub type RelativityMap = [u64; RELATIVITY_BUCKETS];

pub fn empty_relativity_map() -> RelativityMap {
    [0; RELATIVITY_BUCKETS]
}

/// Three ciphertexts whose product decrypts to the sum of two committed bits
/// (`spec.md` §3 "BitPairAttestation").
#[derive(Clone, Debug)]
pub struct BitPairAttestation {
    pub c_a: Ciphertext,
    pub c_b: Ciphertext,
    pub s: Ciphertext,
}

impl BitPairAttestation {
    /// `C_a . C_b . S`, the compressed ciphertext a challenge re-randomizes
    /// (`spec.md` §4.F "Challenge construction").
    pub fn compress(&self) -> Ciphertext {
        self.c_a.mul(&self.c_b).mul(&self.s)
    }
}

/// The owning public key plus an ordered, shuffled sequence of bit-pair triples
/// (`spec.md` §3 "Attestation").
#[derive(Clone, Debug)]
pub struct Attestation {
    pub public_key: PublicKey,
    pub bitpairs: Vec<BitPairAttestation>,
}

/// Round an odd `bitspace` up to the next even number by padding in one extra
/// leading zero bit (`spec.md` §4.E "Odd-length policy"). Even inputs pass through.
fn even_bitspace(bitspace: usize) -> usize {
    bitspace + (bitspace % 2)
}

/// Zero-pad `value`'s big-endian bits out to `bitspace`, erroring if the value
/// doesn't fit.
fn value_bits(value: &Int, bitspace: usize) -> BgnResult<Vec<bool>> {
    let bits = bits_be(value);
    if bits.len() > bitspace {
        return Err(DomainError::BitspaceTooSmall {
            bitspace,
            value_bits: bits.len(),
        }
        .into());
    }
    let mut padded = vec![false; bitspace - bits.len()];
    padded.extend(bits);
    Ok(padded)
}

/// Draw a length-`bitspace` vector summing to `0 (mod p+1)`: `bitspace - 1` entries
/// uniform in `[1, p-1]`, a closing entry that balances the sum, then a full shuffle
/// of the vector (not just the closing element) — `spec.md` §4.E step 2 /
/// `SPEC_FULL.md` §B.2.
fn zero_sum_blinding_vector(rng: &mut (impl CryptoRng + RngCore), p: &Int, bitspace: usize) -> Vec<Int> {
    let p_plus_1 = p + Int::one();
    let mut r: Vec<Int> = (0..bitspace - 1).map(|_| uniform_range(rng, &Int::one(), p)).collect();
    let sum = r.iter().fold(Int::zero(), |acc, x| acc + x);
    r.push(mod_nonneg(&(-sum), &p_plus_1));
    r.shuffle(rng);
    r
}

/// Build an attestation for `value` over a bitspace of `bitspace` bits
/// (`spec.md` §4.E, §6 "Exposed": `attest`). An odd `bitspace` is rounded up to
/// the next even number by padding in one extra leading zero bit, per §4.E's
/// "Odd-length policy" — the caller gets `ceil(bitspace/2)` bit-pairs back, not
/// a truncated `bitspace/2`.
pub fn attest(
    rng: &mut (impl CryptoRng + RngCore),
    pk: &PublicKey,
    value: &Int,
    bitspace: usize,
) -> BgnResult<Attestation> {
    let bitspace = even_bitspace(bitspace);

    let bits = value_bits(value, bitspace)?;
    let blinds = zero_sum_blinding_vector(rng, &pk.p, bitspace);

    let public_terms: Vec<Ciphertext> = bits
        .iter()
        .zip(blinds.iter())
        .map(|(&bit, r)| {
            let a = if bit { Int::one() } else { Int::zero() };
            encrypt(rng, pk, &(a + r))
        })
        .collect();

    let p_plus_1 = &pk.p + Int::one();
    let private_sums: Vec<(usize, Ciphertext)> = (0..bitspace / 2)
        .map(|k| {
            let i = 2 * k;
            let neg_sum = mod_nonneg(&-(&blinds[i] + &blinds[i + 1]), &p_plus_1);
            (k, encrypt(rng, pk, &neg_sum))
        })
        .collect();

    let mut pairs: Vec<(usize, Ciphertext, Ciphertext)> = (0..bitspace / 2)
        .map(|k| (k, public_terms[2 * k].clone(), public_terms[2 * k + 1].clone()))
        .collect();
    pairs.shuffle(rng);

    let mut shuffle_map = vec![0usize; bitspace / 2];
    let mut out_public: Vec<Ciphertext> = Vec::with_capacity(bitspace);
    for (new_pos, (orig_k, v1, v2)) in pairs.into_iter().enumerate() {
        shuffle_map[orig_k] = new_pos;
        out_public.push(v1);
        out_public.push(v2);
    }

    let mut out_private: Vec<(usize, Ciphertext)> =
        private_sums.into_iter().map(|(orig_k, e)| (shuffle_map[orig_k], e)).collect();
    out_private.shuffle(rng);

    let bitpairs = out_private
        .into_iter()
        .map(|(pos, s)| BitPairAttestation {
            c_a: out_public[2 * pos].clone(),
            c_b: out_public[2 * pos + 1].clone(),
            s,
        })
        .collect();

    Ok(Attestation {
        public_key: pk.clone(),
        bitpairs,
    })
}

/// `attest` specialized to a SHA-512 digest of `value`, bitspace fixed at 512
/// (`spec.md` §6 "Exposed": `attest_sha512`).
pub fn attest_sha512(rng: &mut (impl CryptoRng + RngCore), pk: &PublicKey, value: impl AsRef<[u8]>) -> Attestation {
    let v = sha512_as_int(value);
    attest(rng, pk, &v, SHA512_BITSPACE).expect("a 512-bit digest always fits in a 512-bit bitspace")
}

/// The inter-bit-pair relativity map of `value` at `bitspace` bits: how many bit
/// pairs sum to 0, 1, or 2 (`spec.md` §6 "Exposed": `binary_relativity`).
pub fn binary_relativity(value: &Int, bitspace: usize) -> BgnResult<RelativityMap> {
    let bits = value_bits(value, even_bitspace(bitspace))?;
    let mut map = empty_relativity_map();
    for pair in bits.chunks_exact(2) {
        let sum = pair.iter().filter(|&&b| b).count();
        map[sum] += 1;
    }
    Ok(map)
}

/// `binary_relativity` specialized to a SHA-512 digest (`spec.md` §6 "Exposed":
/// `binary_relativity_sha512`).
pub fn binary_relativity_sha512(value: impl AsRef<[u8]>) -> RelativityMap {
    let v = sha512_as_int(value);
    binary_relativity(&v, SHA512_BITSPACE).expect("a 512-bit digest always fits in a 512-bit bitspace")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgn::decode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn toy_keys(rng: &mut (impl CryptoRng + RngCore)) -> (PublicKey, crate::bgn::PrivateKey) {
        crate::bgn::generate_keypair(rng, crate::constants::MIN_KEY_SIZE).unwrap()
    }

    #[test]
    fn binary_relativity_of_five_at_bitspace_eight() {
        // 5 = 0b00000101 -> pairs (0,0)(0,0)(0,1)(0,1) -> sums 0,0,1,1
        let map = binary_relativity(&Int::from(5), 8).unwrap();
        assert_eq!(map, [2, 2, 0, 0]);
    }

    #[test]
    fn binary_relativity_rejects_value_too_large_for_bitspace() {
        assert!(binary_relativity(&Int::from(256), 8).is_err());
    }

    #[test]
    fn odd_bitspace_is_padded_to_even_not_truncated() {
        // 5 = 0b101 at bitspace 7 pads to 0b0000101 at bitspace 8 (even_bitspace rounds
        // 7 up to 8), not 0b000101 at 6 (which would drop the leading bit).
        let odd = binary_relativity(&Int::from(5), 7).unwrap();
        let even = binary_relativity(&Int::from(5), 8).unwrap();
        assert_eq!(odd, even);
    }

    #[test]
    fn attest_with_odd_bitspace_yields_ceil_half_bitpairs() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let (pk, _sk) = toy_keys(&mut rng);
        let attestation = attest(&mut rng, &pk, &Int::from(5), 7).unwrap();
        assert_eq!(attestation.bitpairs.len(), 4);
    }

    #[test]
    fn zero_sum_blinding_vector_sums_to_zero_mod_p_plus_1() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let p = Int::from(10_000_019i64);
        let blinds = zero_sum_blinding_vector(&mut rng, &p, 16);
        assert_eq!(blinds.len(), 16);
        let sum = blinds.iter().fold(Int::zero(), |acc, x| acc + x);
        assert_eq!(mod_nonneg(&sum, &(&p + Int::one())), Int::zero());
    }

    #[test]
    fn attestation_bitpair_sums_decode_to_the_correct_value() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let (pk, sk) = toy_keys(&mut rng);
        let value = Int::from(5);
        let attestation = attest(&mut rng, &pk, &value, 8).unwrap();
        assert_eq!(attestation.bitpairs.len(), 4);

        let mut observed = empty_relativity_map();
        for bp in &attestation.bitpairs {
            let compressed = bp.compress();
            match decode(&sk, &[0, 1, 2], &compressed) {
                Some(sum) => observed[sum as usize] += 1,
                None => observed[3] += 1,
            }
        }
        assert_eq!(observed, binary_relativity(&value, 8).unwrap());
    }

    #[test]
    fn attest_sha512_produces_256_bitpairs() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let (pk, sk) = toy_keys(&mut rng);
        let attestation = attest_sha512(&mut rng, &pk, b"hello");
        assert_eq!(attestation.bitpairs.len(), 256);

        let mut observed = empty_relativity_map();
        for bp in &attestation.bitpairs {
            let compressed = bp.compress();
            match decode(&sk, &[0, 1, 2], &compressed) {
                Some(sum) => observed[sum as usize] += 1,
                None => observed[3] += 1,
            }
        }
        assert_eq!(observed, binary_relativity_sha512(b"hello"));
    }
}
