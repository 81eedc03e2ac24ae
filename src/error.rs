//! Error taxonomy for the attestation core.
//!
//! `Undecodable` is deliberately absent: it is not an error condition (see
//! [`crate::bgn::decode`], which returns `Option<u32>`), and `BadPairing` never escapes
//! [`crate::curve`] — it is an internal retry signal, not a variant here.

use std::fmt;

pub type BgnResult<T> = Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Domain(DomainError),
    Config(ConfigError),
    /// A post-keygen self-check failed (`h^q2 == 1` or `g` has the wrong order).
    /// Never returned to a caller of [`crate::bgn::generate_keypair`]: the loop that
    /// can produce it restarts from scratch instead.
    InvariantViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// Attempted to invert the zero element of `F_{p^2}`.
    InverseOfZero,
    /// A point was expected to lie on the curve (or be the point at infinity) and did not.
    InvalidCurvePoint,
    /// `bitspace` was smaller than the bit length of the value being attested.
    BitspaceTooSmall { bitspace: usize, value_bits: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `p mod 3 != 2`: the field modulus does not keep the curve supersingular
    /// in the form this scheme relies on.
    ModulusNotSupersingular,
    /// `key_size` fell below [`crate::constants::MIN_KEY_SIZE`].
    KeySizeTooSmall { requested: usize, minimum: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain(e) => write!(f, "domain error: {e}"),
            Error::Config(e) => write!(f, "config error: {e}"),
            Error::InvariantViolation => {
                write!(f, "cryptographic invariant violated during key generation")
            }
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InverseOfZero => write!(f, "cannot invert the zero field element"),
            DomainError::InvalidCurvePoint => write!(f, "point does not lie on the curve"),
            DomainError::BitspaceTooSmall {
                bitspace,
                value_bits,
            } => write!(
                f,
                "bitspace {bitspace} is smaller than the value's bit length {value_bits}"
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ModulusNotSupersingular => write!(f, "p mod 3 must equal 2"),
            ConfigError::KeySizeTooSmall { requested, minimum } => write!(
                f,
                "key_size {requested} is below the minimum of {minimum}"
            ),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for DomainError {}
impl std::error::Error for ConfigError {}

impl From<DomainError> for Error {
    fn from(e: DomainError) -> Self {
        Error::Domain(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}
