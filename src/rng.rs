//! CSPRNG access for the attestation core.
//!
//! `spec.md` §5 "Randomness" forbids falling back to a weak PRNG; this module is the
//! one place that constructs a default generator. [`crate::bgn::generate_keypair_with_default_rng`]
//! is its call site; an embedder who wants a different CSPRNG can ignore it and thread
//! their own `CryptoRng + RngCore` through the `generate_keypair`/`attest` entry points
//! directly instead.

use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A default cryptographically secure RNG, seeded from the OS entropy source.
pub fn default_rng() -> impl CryptoRng + RngCore {
    ChaCha20Rng::from_entropy()
}
