//! Here is an example of how to set up the cryptosystem, generate a key pair and encrypt a plaintext
//! integer using the ElGamal public key.
//! ```
//! use phcc_traits::randomness::GeneralRng;
//! use phcc_he::cryptosystems::integer_el_gamal::{ElGamalParameters, IntegerElGamal};
//! use phcc_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey};
//! use rand_core::OsRng;
//! use rug::Integer;
//!
//! let mut rng = GeneralRng::new(OsRng);
//! let el_gamal = IntegerElGamal::setup(&ElGamalParameters::rfc5114_1024().unwrap()).unwrap();
//! let (public_key, secret_key) = el_gamal.generate_keys(&mut rng).unwrap();
//! let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
//! ```

use crate::constants::{MIN_SECURE_MODULUS_BITS, RFC5114_GENERATOR_1024, RFC5114_PRIME_1024};
use log::{debug, warn};
use phcc_numbertheory::{is_probable_prime, mod_inverse, pow_mod, random_below};
use phcc_traits::cryptosystems::{
    Associable, AsymmetricCryptosystem, DecryptionKey, EncryptionKey,
};
use phcc_traits::homomorphic::HomomorphicMultiplication;
use phcc_traits::randomness::GeneralRng;
use phcc_traits::randomness::SecureRng;
use phcc_traits::CryptoError;
use rug::integer::Order;
use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};

/// The group an ElGamal instance works in: a generator $g$ and a prime modulus $p$.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ElGamalParameters {
    /// Generator $g$
    pub generator: Integer,
    /// Prime modulus $p$
    pub modulus: Integer,
}

impl ElGamalParameters {
    /// The 1024-bit MODP group from RFC 5114, section 2.1.
    pub fn rfc5114_1024() -> Result<Self, CryptoError> {
        Ok(ElGamalParameters {
            generator: parse_hex(RFC5114_GENERATOR_1024)?,
            modulus: parse_hex(RFC5114_PRIME_1024)?,
        })
    }
}

fn parse_hex(hex: &str) -> Result<Integer, CryptoError> {
    Integer::from_str_radix(hex, 16)
        .map_err(|e| CryptoError::InvalidParameters(format!("failed to parse hex number: {}", e)))
}

/// Multiplicatively homomorphic ElGamal over the integers modulo a prime.
///
/// As an example we compute the product between 4 and 6 using ElGamal's homomorphic property.
/// ```
/// # use phcc_traits::randomness::GeneralRng;
/// # use phcc_he::cryptosystems::integer_el_gamal::{ElGamalParameters, IntegerElGamal};
/// # use phcc_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey, DecryptionKey};
/// # use rug::Integer;
/// # use rand_core::OsRng;
/// let mut rng = GeneralRng::new(OsRng);
/// let el_gamal = IntegerElGamal::setup(&ElGamalParameters::rfc5114_1024().unwrap()).unwrap();
/// let (public_key, secret_key) = el_gamal.generate_keys(&mut rng).unwrap();
///
/// let ciphertext_1 = public_key.encrypt(&Integer::from(4), &mut rng).unwrap();
/// let ciphertext_2 = public_key.encrypt(&Integer::from(6), &mut rng).unwrap();
///
/// println!("[4] * [6] = [{}]", secret_key.decrypt(&(&ciphertext_1 * &ciphertext_2)).unwrap());
/// // Prints: "[4] * [6] = [24]".
/// ```
#[derive(Clone)]
pub struct IntegerElGamal {
    generator: Integer,
    modulus: Integer,
}

/// Public key containing the ElGamal encryption key and the group it lives in.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct IntegerElGamalPK {
    /// Generator of the group
    pub generator: Integer,
    /// Modulus of the group
    pub modulus: Integer,
    /// Public value $h = g^x \bmod p$
    pub h: Integer,
}

/// ElGamal ciphertext of integers.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct IntegerElGamalCiphertext {
    /// First part of ciphertext
    pub c1: Integer,
    /// Second part of ciphertext
    pub c2: Integer,
}

impl Associable<IntegerElGamalPK> for IntegerElGamalCiphertext {}

/// Decryption key for Integer-based ElGamal
#[derive(Clone)]
pub struct IntegerElGamalSK {
    pub(crate) key: Integer,
}

impl IntegerElGamal {
    /// Derives the key pair belonging to a given secret exponent $0 < x < p$. Meant for
    /// reproducible setups; `generate_keys` samples the exponent instead.
    pub fn keys_from_secret(
        &self,
        secret: Integer,
    ) -> Result<(IntegerElGamalPK, IntegerElGamalSK), CryptoError> {
        if secret <= 0 || secret >= self.modulus {
            return Err(CryptoError::InvalidParameters(
                "secret exponent must lie in (0, p)".to_string(),
            ));
        }

        let h = pow_mod(&self.generator, &secret, &self.modulus)?;

        Ok((
            IntegerElGamalPK {
                generator: self.generator.clone(),
                modulus: self.modulus.clone(),
                h,
            },
            IntegerElGamalSK { key: secret },
        ))
    }
}

impl AsymmetricCryptosystem for IntegerElGamal {
    type Parameters = ElGamalParameters;
    type PublicKey = IntegerElGamalPK;
    type SecretKey = IntegerElGamalSK;

    /// Checks that the modulus is a prime of at least 3 and that the generator is a unit modulo it.
    fn setup(parameters: &ElGamalParameters) -> Result<Self, CryptoError> {
        let modulus = &parameters.modulus;

        if *modulus < 3 || !is_probable_prime(modulus) {
            return Err(CryptoError::InvalidParameters(format!(
                "ElGamal modulus {} is not an odd prime",
                modulus
            )));
        }

        if parameters.generator.is_divisible(modulus) {
            return Err(CryptoError::InvalidParameters(
                "ElGamal generator is a multiple of the modulus".to_string(),
            ));
        }

        if (modulus.significant_bits() as u64) < MIN_SECURE_MODULUS_BITS {
            warn!(
                "ElGamal modulus has only {} bits; use it for testing only",
                modulus.significant_bits()
            );
        }

        Ok(IntegerElGamal {
            generator: parameters.generator.clone(),
            modulus: modulus.clone(),
        })
    }

    /// Generates a fresh ElGamal keypair.
    /// ```
    /// # use phcc_traits::randomness::GeneralRng;
    /// # use phcc_he::cryptosystems::integer_el_gamal::{ElGamalParameters, IntegerElGamal};
    /// # use phcc_traits::cryptosystems::AsymmetricCryptosystem;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// let el_gamal = IntegerElGamal::setup(&ElGamalParameters::rfc5114_1024().unwrap()).unwrap();
    /// let (public_key, secret_key) = el_gamal.generate_keys(&mut rng).unwrap();
    /// ```
    fn generate_keys<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<(IntegerElGamalPK, IntegerElGamalSK), CryptoError> {
        let secret_key = random_below(&Integer::from(&self.modulus - 1), rng)? + 1;
        debug!(
            "generated ElGamal key pair for a {}-bit modulus",
            self.modulus.significant_bits()
        );

        self.keys_from_secret(secret_key)
    }
}

impl IntegerElGamalPK {
    /// Encrypts a message given as big-endian bytes.
    pub fn encrypt_bytes<R: SecureRng>(
        &self,
        message: &[u8],
        rng: &mut GeneralRng<R>,
    ) -> Result<IntegerElGamalCiphertext, CryptoError> {
        self.encrypt_raw(&Integer::from_digits(message, Order::Msf), rng)
    }
}

impl EncryptionKey for IntegerElGamalPK {
    type Input = Integer;
    type Plaintext = Integer;
    type Ciphertext = IntegerElGamalCiphertext;
    type Randomness = Integer;

    fn sample_randomness<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<Integer, CryptoError> {
        random_below(&self.modulus, rng)
    }

    /// Encrypts $m$ as $(g^k, h^k m)$. Plaintexts of at least $p$ are not rejected, but alias to
    /// their residue modulo $p$.
    fn encrypt_with(
        &self,
        plaintext: &Integer,
        randomness: &Integer,
    ) -> Result<IntegerElGamalCiphertext, CryptoError> {
        if *plaintext < 0 {
            return Err(CryptoError::NegativePlaintext(plaintext.clone()));
        }

        let shared_secret = pow_mod(&self.h, randomness, &self.modulus)?;

        Ok(IntegerElGamalCiphertext {
            c1: pow_mod(&self.generator, randomness, &self.modulus)?,
            c2: (shared_secret * plaintext) % &self.modulus,
        })
    }
}

impl IntegerElGamalSK {
    /// Decrypts a ciphertext into the minimal big-endian byte representation of its plaintext.
    /// The plaintext zero decrypts to an empty vector.
    pub fn decrypt_bytes(
        &self,
        public_key: &IntegerElGamalPK,
        ciphertext: &IntegerElGamalCiphertext,
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(self
            .decrypt_raw(public_key, ciphertext)?
            .to_digits::<u8>(Order::Msf))
    }
}

impl DecryptionKey<IntegerElGamalPK> for IntegerElGamalSK {
    /// Decrypts an ElGamal ciphertext using the secret key. The ciphertext is not validated: a
    /// malformed ciphertext decrypts to an unrelated plaintext, and only fails when $c_1^x$ has
    /// no inverse.
    /// ```
    /// # use phcc_traits::randomness::GeneralRng;
    /// # use phcc_he::cryptosystems::integer_el_gamal::{ElGamalParameters, IntegerElGamal};
    /// # use phcc_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey, DecryptionKey};
    /// # use rug::Integer;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// # let el_gamal = IntegerElGamal::setup(&ElGamalParameters::rfc5114_1024().unwrap()).unwrap();
    /// # let (public_key, secret_key) = el_gamal.generate_keys(&mut rng).unwrap();
    /// # let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
    /// println!("The decrypted message is {}", secret_key.decrypt(&ciphertext).unwrap());
    /// // Prints: "The decrypted message is 5".
    /// ```
    fn decrypt_raw(
        &self,
        public_key: &IntegerElGamalPK,
        ciphertext: &IntegerElGamalCiphertext,
    ) -> Result<Integer, CryptoError> {
        let shared_secret = pow_mod(&ciphertext.c1, &self.key, &public_key.modulus)?;
        let inverse = mod_inverse(&shared_secret, &public_key.modulus)?;

        Ok((inverse * &ciphertext.c2).rem_euc(&public_key.modulus))
    }
}

impl HomomorphicMultiplication for IntegerElGamalPK {
    fn mul(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        IntegerElGamalCiphertext {
            c1: Integer::from(&ciphertext_a.c1 * &ciphertext_b.c1) % &self.modulus,
            c2: Integer::from(&ciphertext_a.c2 * &ciphertext_b.c2) % &self.modulus,
        }
    }

    fn pow(
        &self,
        ciphertext: &Self::Ciphertext,
        input: &Self::Input,
    ) -> Result<Self::Ciphertext, CryptoError> {
        Ok(IntegerElGamalCiphertext {
            c1: pow_mod(&ciphertext.c1, input, &self.modulus)?,
            c2: pow_mod(&ciphertext.c2, input, &self.modulus)?,
        })
    }
}
