#![warn(missing_docs, unused_imports)]

//! _This is a part of **phcc**. For more information, head to the phcc crate._
//!
//! A ledger that performs homomorphic operations on ElGamal and Paillier ciphertexts on behalf of
//! its callers. The ledger only holds public keys: it publishes the latest result as a serialized,
//! scheme-tagged ciphertext and keeps an RSA-OAEP encrypted log of the operations it performed.
//! The matching private keys are returned separately as [`LedgerKeys`].

/// Parameters from which a ledger generates its keys.
pub mod config;

/// Errors surfaced by ledger calls.
pub mod error;

/// The ledger and its private keys.
pub mod ledger;

/// The operation log and the primitive that keeps it confidential.
pub mod operations;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger::{Ledger, LedgerCiphertext, LedgerKeys, LedgerPlaintext};
pub use operations::Operation;
