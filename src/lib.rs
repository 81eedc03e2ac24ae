//! A Boneh-Goh-Nissim 2-DNF homomorphic cryptosystem and the bit-pair attestation
//! protocol built on top of it: commit to a secret integer, then answer repeated
//! challenges that let a verifier gain confidence some candidate value is close to
//! the committed one without ever learning the value itself.

pub mod api;
mod attestation;
mod bgn;
mod challenge;
mod constants;
mod curve;
mod error;
mod field;
mod hash;
mod numeric;
mod primality;
mod rng;
mod serialize;
