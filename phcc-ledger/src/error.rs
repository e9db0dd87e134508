use phcc_traits::CryptoError;
use thiserror::Error;

/// Reasons a ledger call fails. A failed call leaves the ledger state untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A homomorphic primitive, key generation or decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A ciphertext snapshot could not be encoded or decoded.
    #[error("ciphertext serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// The RSA-OAEP primitive protecting the operation log failed.
    #[error("operation log encryption failed: {0}")]
    Confidentiality(#[from] rsa::Error),

    /// The operation log has outgrown what a single OAEP block under the log key can hold.
    #[error("operation log needs {required} bytes but the log key encrypts at most {capacity}")]
    LogCapacityExceeded {
        /// Length of the log plaintext that was rejected.
        required: usize,
        /// Maximum OAEP plaintext length for the log key.
        capacity: usize,
    },

    /// A snapshot was produced by the other cryptosystem than the caller expected.
    #[error("expected a {expected} ciphertext snapshot")]
    SchemeMismatch {
        /// The scheme the caller asked for.
        expected: &'static str,
    },

    /// A decrypted operation log does not parse.
    #[error("operation log is malformed")]
    MalformedLog,
}
