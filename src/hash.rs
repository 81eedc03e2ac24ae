//! SHA-512 digest-to-integer conversion, the one hash primitive the attestation
//! core consumes (`spec.md` §6, external interface (iii)).

use sha2::{Digest, Sha512};

use crate::numeric::Int;

/// Hash `msg` with SHA-512 and interpret the 64-byte digest as a big-endian
/// unsigned integer. Used by [`crate::attestation::attest_sha512`] and
/// [`crate::attestation::binary_relativity_sha512`].
pub fn sha512_as_int(msg: impl AsRef<[u8]>) -> Int {
    let digest = Sha512::new().chain(msg).finalize();
    Int::from_slice(digest.as_slice())
}
