#![warn(missing_docs, unused_imports)]

//! _This is a part of **phcc**. For more information, head to the phcc crate._
//!
//! General traits for partially homomorphic cryptosystems, together with the randomness wrapper
//! and the error type that every phcc crate shares.

use rug::Integer;
use thiserror::Error;

/// Random number generation that is consistent with the dependencies' requirements.
pub mod randomness;

/// General notion of a cryptosystem
pub mod cryptosystems;

/// Homomorphic operations on ciphertexts
pub mod homomorphic;

/// Test doubles for the randomness seam, shared by the other phcc crates' tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Errors raised by key generation, encryption, decryption and the sampling they rely on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The plaintext does not lie in the plaintext space `[0, bound)`.
    #[error("{value} is out of allowed plaintext space [0, {bound})")]
    PlaintextOutOfRange {
        /// The rejected plaintext.
        value: Integer,
        /// The exclusive upper bound of the plaintext space.
        bound: Integer,
    },

    /// The plaintext must be a non-negative integer.
    #[error("plaintext {0} is negative")]
    NegativePlaintext(Integer),

    /// Caller-supplied encryption randomness is not a valid element for this scheme.
    #[error("encryption randomness is not a valid group element")]
    InvalidRandomness,

    /// The entropy source failed while sampling.
    #[error("random source exhausted: {0}")]
    RandomnessExhausted(String),

    /// Rejection sampling did not produce an acceptable value within the retry bound.
    #[error("rejection sampling gave up after {attempts} attempts")]
    SamplingExhausted {
        /// The number of candidates that were drawn and rejected.
        attempts: usize,
    },

    /// A modular inverse was required but does not exist.
    #[error("value is not invertible modulo the group order")]
    NotInvertible,

    /// Key generation parameters violate the scheme's preconditions.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<rand_core::Error> for CryptoError {
    fn from(error: rand_core::Error) -> Self {
        CryptoError::RandomnessExhausted(error.to_string())
    }
}
