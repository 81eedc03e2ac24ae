//! Public front door for this crate, mirroring this codebase's own `sdk::api` as the
//! single surface external callers import from (`spec.md` §6 "Exposed").

pub use crate::attestation::{
    attest, attest_sha512, binary_relativity, binary_relativity_sha512, Attestation,
    BitPairAttestation, RelativityMap,
};
pub use crate::bgn::{generate_keypair, generate_keypair_with_default_rng, Ciphertext, PrivateKey, PublicKey};
pub use crate::challenge::{
    binary_relativity_certainty, binary_relativity_match, create_challenge,
    create_challenge_response, create_honesty_check, process_challenge_response,
    SharedRelativityMap,
};
pub use crate::error::{BgnResult, ConfigError, DomainError, Error};
pub use crate::numeric::Int;
pub use crate::serialize::{
    attestation_from_bytes, attestation_to_bytes, byte_width, field_element_from_bytes,
    field_element_to_bytes, public_key_from_bytes, public_key_to_bytes,
};
