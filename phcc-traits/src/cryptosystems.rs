use crate::randomness::GeneralRng;
use crate::randomness::SecureRng;
use crate::CryptoError;
use std::fmt::Debug;

/// An asymmetric cryptosystem is a system of methods to encrypt plaintexts into ciphertexts, and
/// decrypt those ciphertexts back into plaintexts. Anyone who has access to the public key can
/// perform encryptions, but only those with the secret key can decrypt.
///
/// The struct that implements an `AsymmetricCryptosystem` holds the general parameters of that
/// cryptosystem, such as the group or the secret factors. These parameters decide the level of
/// security, so they are always supplied explicitly by the caller and validated in `setup`.
pub trait AsymmetricCryptosystem: Sized {
    /// The parameters from which an instance is set up.
    type Parameters;
    /// The public key, which encrypts and performs homomorphic operations.
    type PublicKey: EncryptionKey;
    /// The secret key, which decrypts.
    type SecretKey: DecryptionKey<Self::PublicKey>;

    /// Sets up an instance of this cryptosystem after checking the parameters' preconditions.
    fn setup(parameters: &Self::Parameters) -> Result<Self, CryptoError>;

    /// Generate a public and private key pair using a cryptographic RNG.
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(Self::PublicKey, Self::SecretKey), CryptoError>;
}

/// The encryption key.
pub trait EncryptionKey: Sized + Debug + PartialEq {
    /// Cleartext operand of homomorphic scalar operations.
    type Input;
    /// The type of the plaintexts to be encrypted.
    type Plaintext;
    /// The type of the encrypted plaintexts.
    type Ciphertext: Associable<Self>;
    /// The per-encryption randomness.
    type Randomness;

    /// Encrypt the plaintext using the public key and a cryptographic RNG and immediately associate it with the public key.
    fn encrypt<'pk, R: SecureRng>(
        &'pk self,
        plaintext: &Self::Plaintext,
        rng: &mut GeneralRng<R>,
    ) -> Result<AssociatedCiphertext<'pk, Self::Ciphertext, Self>, CryptoError> {
        Ok(self.encrypt_raw(plaintext, rng)?.associate(self))
    }

    /// Encrypt the plaintext using the public key and a cryptographic RNG.
    fn encrypt_raw<R: SecureRng>(
        &self,
        plaintext: &Self::Plaintext,
        rng: &mut GeneralRng<R>,
    ) -> Result<Self::Ciphertext, CryptoError> {
        let randomness = self.sample_randomness(rng)?;
        self.encrypt_with(plaintext, &randomness)
    }

    /// Draws fresh randomness for a single encryption.
    fn sample_randomness<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<Self::Randomness, CryptoError>;

    /// Encrypt the plaintext with caller-supplied randomness. Reusing randomness across
    /// encryptions breaks semantic security.
    fn encrypt_with(
        &self,
        plaintext: &Self::Plaintext,
        randomness: &Self::Randomness,
    ) -> Result<Self::Ciphertext, CryptoError>;
}

/// The decryption key.
pub trait DecryptionKey<PK: EncryptionKey> {
    /// Decrypt the associated ciphertext using the secret key.
    fn decrypt(
        &self,
        ciphertext: &AssociatedCiphertext<'_, PK::Ciphertext, PK>,
    ) -> Result<PK::Plaintext, CryptoError> {
        self.decrypt_raw(ciphertext.public_key, &ciphertext.ciphertext)
    }

    /// Decrypt the ciphertext using the secret key and its related public key.
    fn decrypt_raw(
        &self,
        public_key: &PK,
        ciphertext: &PK::Ciphertext,
    ) -> Result<PK::Plaintext, CryptoError>;
}

/// A ciphertext together with the public key it was created under. Homomorphic operations on
/// associated ciphertexts are available through operator overloading.
#[derive(PartialEq, Debug, Clone)]
pub struct AssociatedCiphertext<'pk, C, PK> {
    /// The raw ciphertext.
    pub ciphertext: C,
    /// The public key the ciphertext belongs to.
    pub public_key: &'pk PK,
}

/// Functionality to easily turn a ciphertext into an associated ciphertext
pub trait Associable<PK>: Sized {
    /// 'Enriches' a ciphertext by associating it with a corresponding public key. This allows to overload operators for homomorphic operations.
    fn associate(self, public_key: &PK) -> AssociatedCiphertext<'_, Self, PK> {
        AssociatedCiphertext {
            ciphertext: self,
            public_key,
        }
    }
}
