use crate::error::LedgerError;
use phcc_traits::randomness::{GeneralRng, SecureRng};
use phcc_traits::CryptoError;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Separator written in front of every record of the operation log.
pub const DELIMITER: u8 = b'|';

/// A homomorphic operation the ledger records.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Operation {
    /// Paillier addition of ciphertexts
    Add,
    /// ElGamal multiplication of ciphertexts
    Multiply,
}

impl Operation {
    /// The name of the operation as written in the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "Add",
            Operation::Multiply => "Multiply",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = LedgerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Add" => Ok(Operation::Add),
            "Multiply" => Ok(Operation::Multiply),
            _ => Err(LedgerError::MalformedLog),
        }
    }
}

/// Writes the plaintext log, e.g. `|Multiply|Add`.
pub fn encode_log(history: &[Operation]) -> Vec<u8> {
    let mut plaintext = Vec::new();
    for operation in history {
        plaintext.push(DELIMITER);
        plaintext.extend_from_slice(operation.as_str().as_bytes());
    }
    plaintext
}

/// Parses a plaintext log written by `encode_log`.
pub fn parse_log(plaintext: &[u8]) -> Result<Vec<Operation>, LedgerError> {
    if plaintext.is_empty() {
        return Ok(Vec::new());
    }

    let mut records = plaintext.split(|byte| *byte == DELIMITER);
    if records.next() != Some(&[][..]) {
        return Err(LedgerError::MalformedLog);
    }

    records
        .map(|record| {
            std::str::from_utf8(record)
                .map_err(|_| LedgerError::MalformedLog)?
                .parse()
        })
        .collect()
}

/// Seeds a ChaCha20 generator from 32 bytes of the caller's entropy source. `rsa` only reads
/// through the infallible `fill_bytes`, so it must never see the caller's source directly.
pub(crate) fn seeded_rng<R: SecureRng>(
    rng: &mut GeneralRng<R>,
) -> Result<ChaCha20Rng, LedgerError> {
    let mut seed = [0u8; 32];
    rng.try_fill_bytes(&mut seed).map_err(CryptoError::from)?;
    Ok(ChaCha20Rng::from_seed(seed))
}

/// Public half of the primitive that keeps the operation log confidential.
pub trait LogEncryptionKey {
    /// Longest plaintext a single encryption accepts.
    fn max_plaintext_len(&self) -> usize;

    /// Encrypts the complete log plaintext.
    fn encrypt_log<R: SecureRng>(
        &self,
        plaintext: &[u8],
        rng: &mut GeneralRng<R>,
    ) -> Result<Vec<u8>, LedgerError>;
}

/// Private half of the primitive that keeps the operation log confidential.
pub trait LogDecryptionKey {
    /// Recovers the complete log plaintext.
    fn decrypt_log(&self, ciphertext: &[u8]) -> Result<Vec<u8>, LedgerError>;
}

impl LogEncryptionKey for RsaPublicKey {
    /// OAEP with SHA-256 leaves $k - 2 \cdot 32 - 2$ bytes for a $k$-byte modulus.
    fn max_plaintext_len(&self) -> usize {
        self.size().saturating_sub(2 * Sha256::output_size() + 2)
    }

    fn encrypt_log<R: SecureRng>(
        &self,
        plaintext: &[u8],
        rng: &mut GeneralRng<R>,
    ) -> Result<Vec<u8>, LedgerError> {
        let mut seeded = seeded_rng(rng)?;
        Ok(self.encrypt(&mut seeded, Oaep::new::<Sha256>(), plaintext)?)
    }
}

impl LogDecryptionKey for RsaPrivateKey {
    fn decrypt_log(&self, ciphertext: &[u8]) -> Result<Vec<u8>, LedgerError> {
        Ok(self.decrypt(Oaep::new::<Sha256>(), ciphertext)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LedgerError;
    use crate::operations::{
        encode_log, parse_log, LogDecryptionKey, LogEncryptionKey, Operation,
    };
    use phcc_traits::randomness::GeneralRng;
    use rand_core::OsRng;
    use rsa::{RsaPrivateKey, RsaPublicKey};

    #[test]
    fn test_encode_log() {
        assert!(encode_log(&[]).is_empty());
        assert_eq!(
            b"|Multiply|Add".to_vec(),
            encode_log(&[Operation::Multiply, Operation::Add])
        );
    }

    #[test]
    fn test_parse_log() {
        assert_eq!(
            vec![Operation::Add, Operation::Add, Operation::Multiply],
            parse_log(b"|Add|Add|Multiply").unwrap()
        );
        assert!(parse_log(b"").unwrap().is_empty());

        for malformed in [&b"Add"[..], b"|Add|Sub", b"|Add|", b"||Add"].iter() {
            assert!(matches!(parse_log(malformed), Err(LedgerError::MalformedLog)));
        }
    }

    #[test]
    fn test_rsa_oaep_capacity() {
        let mut rng = GeneralRng::new(OsRng);
        let private_key = RsaPrivateKey::new(rng.rng(), 1024).unwrap();
        let public_key = RsaPublicKey::from(&private_key);

        assert_eq!(62, public_key.max_plaintext_len());

        let plaintext = vec![b'A'; 62];
        let ciphertext = public_key.encrypt_log(&plaintext, &mut rng).unwrap();
        assert_eq!(plaintext, private_key.decrypt_log(&ciphertext).unwrap());

        assert!(matches!(
            public_key.encrypt_log(&[b'A'; 63], &mut rng),
            Err(LedgerError::Confidentiality(_))
        ));
    }
}
