use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::operations::{
    encode_log, parse_log, seeded_rng, LogDecryptionKey, LogEncryptionKey, Operation,
};
use log::debug;
use phcc_he::cryptosystems::integer_el_gamal::{
    IntegerElGamal, IntegerElGamalCiphertext, IntegerElGamalPK, IntegerElGamalSK,
};
use phcc_he::cryptosystems::paillier::{Paillier, PaillierCiphertext, PaillierPK, PaillierSK};
use phcc_traits::cryptosystems::{AsymmetricCryptosystem, DecryptionKey};
use phcc_traits::homomorphic::{HomomorphicAddition, HomomorphicMultiplication};
use phcc_traits::randomness::{GeneralRng, SecureRng};
use rsa::{RsaPrivateKey, RsaPublicKey};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The ledger's latest homomorphic result, tagged with the scheme that produced it.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub enum LedgerCiphertext {
    /// Output of `Ledger::multiply`
    Multiplicative(IntegerElGamalCiphertext),
    /// Output of `Ledger::add` and `Ledger::sum`
    Additive(PaillierCiphertext),
}

impl LedgerCiphertext {
    /// Encodes the snapshot as published in the ledger's `ciphertext` field.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a snapshot published by a ledger.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A decrypted ledger snapshot.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum LedgerPlaintext {
    /// Product modulo $p$ of the multiplied plaintexts
    Product(Integer),
    /// Sum modulo $n$ of the added plaintexts
    Sum(Integer),
}

#[derive(Default)]
struct LedgerState {
    history: Vec<Operation>,
    operations: Vec<u8>,
    ciphertext: Option<Vec<u8>>,
}

/// Computes over ciphertexts of both cryptosystems without being able to decrypt them, while
/// keeping an RSA-OAEP encrypted record of every operation it performed.
///
/// Every call re-encrypts the complete log as a single OAEP plaintext, so the number of operations
/// a ledger can record is bounded by the log key size. Once the bound is reached, calls fail with
/// `LedgerError::LogCapacityExceeded`.
///
/// ```
/// # use phcc_ledger::{Ledger, LedgerConfig, LedgerPlaintext};
/// # use phcc_he::cryptosystems::integer_el_gamal::ElGamalParameters;
/// # use phcc_he::cryptosystems::paillier::PaillierParameters;
/// # use phcc_traits::cryptosystems::EncryptionKey;
/// # use phcc_traits::randomness::GeneralRng;
/// # use rand_core::OsRng;
/// # use rug::Integer;
/// let mut rng = GeneralRng::new(OsRng);
/// let mut config = LedgerConfig::new(
///     ElGamalParameters::rfc5114_1024().unwrap(),
///     PaillierParameters { p: Integer::from(17), q: Integer::from(13) },
/// );
/// config.log_key_bits = 1024;
/// let (keys, ledger) = Ledger::new(&config, &mut rng).unwrap();
///
/// let a = ledger.paillier_public_key().encrypt_raw(&Integer::from(4), &mut rng).unwrap();
/// let b = ledger.paillier_public_key().encrypt_raw(&Integer::from(2), &mut rng).unwrap();
/// ledger.add(&a, &b, &mut rng).unwrap();
///
/// let snapshot = ledger.ciphertext().unwrap();
/// assert_eq!(LedgerPlaintext::Sum(Integer::from(6)), keys.decrypt_ciphertext(&snapshot).unwrap());
/// ```
pub struct Ledger {
    el_gamal_pk: IntegerElGamalPK,
    paillier_pk: PaillierPK,
    log_key: RsaPublicKey,
    state: Mutex<LedgerState>,
}

/// The private keys matching a ledger's public keys. Held apart from the ledger, which can compute
/// over ciphertexts but cannot read them.
pub struct LedgerKeys {
    el_gamal_pk: IntegerElGamalPK,
    el_gamal_sk: IntegerElGamalSK,
    paillier_pk: PaillierPK,
    paillier_sk: PaillierSK,
    log_key: RsaPrivateKey,
}

impl Ledger {
    /// Generates the key pairs of both cryptosystems and of the log, returning the private keys
    /// separately from the ledger.
    pub fn new<R: SecureRng>(
        config: &LedgerConfig,
        rng: &mut GeneralRng<R>,
    ) -> Result<(LedgerKeys, Ledger), LedgerError> {
        let el_gamal = IntegerElGamal::setup(&config.el_gamal)?;
        let (el_gamal_pk, el_gamal_sk) = match &config.el_gamal_secret {
            Some(secret) => el_gamal.keys_from_secret(secret.clone())?,
            None => el_gamal.generate_keys(rng)?,
        };

        let paillier = Paillier::setup(&config.paillier)?;
        let (paillier_pk, paillier_sk) = paillier.generate_keys(rng)?;

        let log_private_key = RsaPrivateKey::new(&mut seeded_rng(rng)?, config.log_key_bits)?;
        let log_key = RsaPublicKey::from(&log_private_key);
        debug!(
            "created ledger with a {}-bit log key holding up to {} log bytes",
            config.log_key_bits,
            log_key.max_plaintext_len()
        );

        let keys = LedgerKeys {
            el_gamal_pk: el_gamal_pk.clone(),
            el_gamal_sk,
            paillier_pk: paillier_pk.clone(),
            paillier_sk,
            log_key: log_private_key,
        };

        let ledger = Ledger {
            el_gamal_pk,
            paillier_pk,
            log_key,
            state: Mutex::new(LedgerState::default()),
        };

        Ok((keys, ledger))
    }

    /// Key under which ciphertexts passed to `multiply` must be encrypted.
    pub fn el_gamal_public_key(&self) -> &IntegerElGamalPK {
        &self.el_gamal_pk
    }

    /// Key under which ciphertexts passed to `add` and `sum` must be encrypted.
    pub fn paillier_public_key(&self) -> &PaillierPK {
        &self.paillier_pk
    }

    /// Key that encrypts the operation log.
    pub fn log_public_key(&self) -> &RsaPublicKey {
        &self.log_key
    }

    /// The encrypted operation log; empty before the first operation.
    pub fn operations(&self) -> Vec<u8> {
        self.lock().operations.clone()
    }

    /// The serialized result of the latest operation, if any.
    pub fn ciphertext(&self) -> Option<Vec<u8>> {
        self.lock().ciphertext.clone()
    }

    /// Number of operations performed so far.
    pub fn operation_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Multiplies two ElGamal ciphertexts, publishes the product and logs `Multiply`.
    pub fn multiply<R: SecureRng>(
        &self,
        ciphertext_a: &IntegerElGamalCiphertext,
        ciphertext_b: &IntegerElGamalCiphertext,
        rng: &mut GeneralRng<R>,
    ) -> Result<LedgerCiphertext, LedgerError> {
        let product = HomomorphicMultiplication::mul(&self.el_gamal_pk, ciphertext_a, ciphertext_b);
        self.record(Operation::Multiply, LedgerCiphertext::Multiplicative(product), rng)
    }

    /// Adds two Paillier ciphertexts, publishes the sum and logs `Add`.
    pub fn add<R: SecureRng>(
        &self,
        ciphertext_a: &PaillierCiphertext,
        ciphertext_b: &PaillierCiphertext,
        rng: &mut GeneralRng<R>,
    ) -> Result<LedgerCiphertext, LedgerError> {
        let sum = HomomorphicAddition::add(&self.paillier_pk, ciphertext_a, ciphertext_b);
        self.record(Operation::Add, LedgerCiphertext::Additive(sum), rng)
    }

    /// Adds any number of Paillier ciphertexts as a single logged `Add`. Without inputs the
    /// published result is the encryption of zero.
    pub fn sum<R: SecureRng>(
        &self,
        ciphertexts: &[PaillierCiphertext],
        rng: &mut GeneralRng<R>,
    ) -> Result<LedgerCiphertext, LedgerError> {
        let sum = self.paillier_pk.sum(ciphertexts);
        self.record(Operation::Add, LedgerCiphertext::Additive(sum), rng)
    }

    /// Builds the next state completely before replacing the current one, so a failure anywhere
    /// leaves both published fields as they were.
    fn record<R: SecureRng>(
        &self,
        operation: Operation,
        result: LedgerCiphertext,
        rng: &mut GeneralRng<R>,
    ) -> Result<LedgerCiphertext, LedgerError> {
        let serialized = result.to_bytes()?;

        let mut state = self.lock();

        let mut history = state.history.clone();
        history.push(operation);
        let plaintext = encode_log(&history);

        let capacity = self.log_key.max_plaintext_len();
        if plaintext.len() > capacity {
            return Err(LedgerError::LogCapacityExceeded {
                required: plaintext.len(),
                capacity,
            });
        }

        let operations = self.log_key.encrypt_log(&plaintext, rng)?;

        state.history = history;
        state.operations = operations;
        state.ciphertext = Some(serialized);
        debug!("ledger performed {} (operation #{})", operation, state.history.len());

        Ok(result)
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // Fields are only assigned after every fallible step, so a poisoned state is consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedgerKeys {
    /// Decrypts a published snapshot with the secret key of the scheme named in its tag.
    pub fn decrypt_ciphertext(&self, bytes: &[u8]) -> Result<LedgerPlaintext, LedgerError> {
        Ok(match LedgerCiphertext::from_bytes(bytes)? {
            LedgerCiphertext::Multiplicative(ciphertext) => LedgerPlaintext::Product(
                self.el_gamal_sk.decrypt_raw(&self.el_gamal_pk, &ciphertext)?,
            ),
            LedgerCiphertext::Additive(ciphertext) => LedgerPlaintext::Sum(
                self.paillier_sk.decrypt_raw(&self.paillier_pk, &ciphertext)?,
            ),
        })
    }

    /// Decrypts a snapshot that must come from `Ledger::multiply`.
    pub fn decrypt_product(&self, bytes: &[u8]) -> Result<Integer, LedgerError> {
        match self.decrypt_ciphertext(bytes)? {
            LedgerPlaintext::Product(product) => Ok(product),
            LedgerPlaintext::Sum(_) => Err(LedgerError::SchemeMismatch {
                expected: "multiplicative",
            }),
        }
    }

    /// Decrypts a snapshot that must come from `Ledger::add` or `Ledger::sum`.
    pub fn decrypt_sum(&self, bytes: &[u8]) -> Result<Integer, LedgerError> {
        match self.decrypt_ciphertext(bytes)? {
            LedgerPlaintext::Sum(sum) => Ok(sum),
            LedgerPlaintext::Product(_) => Err(LedgerError::SchemeMismatch {
                expected: "additive",
            }),
        }
    }

    /// Decrypts the published operation log into the operations in the order they were performed.
    pub fn read_operations(&self, operations: &[u8]) -> Result<Vec<Operation>, LedgerError> {
        if operations.is_empty() {
            return Ok(Vec::new());
        }

        parse_log(&self.log_key.decrypt_log(operations)?)
    }

    /// Secret key of the multiplicative scheme.
    pub fn el_gamal_secret_key(&self) -> &IntegerElGamalSK {
        &self.el_gamal_sk
    }

    /// Secret key of the additive scheme.
    pub fn paillier_secret_key(&self) -> &PaillierSK {
        &self.paillier_sk
    }
}
