#![warn(missing_docs, unused_imports)]

//! _This is a part of **phcc**. For more information, head to the phcc crate._
//!
//! Partially homomorphic cryptosystems: a multiplicatively homomorphic ElGamal variant over the
//! integers modulo a prime, and the additively homomorphic Paillier cryptosystem.

/// Standardized group parameters.
pub mod constants;

/// Partially homomorphic cryptosystems with one key.
pub mod cryptosystems;

pub use phcc_traits;
