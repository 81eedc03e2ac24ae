//! Domain separation and size constants for the attestation core.

/// Minimum accepted `key_size` (in bits) passed to [`crate::bgn::generate_keypair`].
pub const MIN_KEY_SIZE: usize = 512;

/// Bitspace used by [`crate::attestation::attest_sha512`]: a SHA-512 digest is 512 bits.
pub const SHA512_BITSPACE: usize = 512;

/// Lower bound on the blinding exponent `r` sampled during encryption.
///
/// The reference implementation samples `r` from `[4, n)` rather than `[1, n)` as a
/// heuristic to avoid trivially small blinds; kept here rather than tightened so that
/// this implementation stays wire-compatible in spirit with the reference.
pub const ENCRYPT_RANDOMNESS_MIN: u64 = 4;

/// Number of buckets in a relativity map: sums `{0, 1, 2}` plus the "undecodable" bucket `3`.
pub const RELATIVITY_BUCKETS: usize = 4;
