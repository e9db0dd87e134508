use crate::constants::MIN_SECURE_MODULUS_BITS;
use log::{debug, warn};
use phcc_numbertheory::{gcd, gen_coprime, is_probable_prime, l_function, mod_inverse, pow_mod, totient};
use phcc_traits::cryptosystems::{
    Associable, AsymmetricCryptosystem, DecryptionKey, EncryptionKey,
};
use phcc_traits::homomorphic::HomomorphicAddition;
use phcc_traits::randomness::GeneralRng;
use phcc_traits::randomness::SecureRng;
use phcc_traits::CryptoError;
use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::ops::Rem;

/// The secret factors $p$ and $q$ of a Paillier modulus $n = pq$.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PaillierParameters {
    /// First prime factor
    pub p: Integer,
    /// Second prime factor
    pub q: Integer,
}

/// The Paillier cryptosystem.
///
/// The secret exponent is Euler's totient $\varphi(n) = (p - 1)(q - 1)$ rather than the least
/// common multiple of $p - 1$ and $q - 1$; both decrypt correctly for distinct primes.
#[derive(Clone)]
pub struct Paillier {
    p: Integer,
    q: Integer,
}

/// Public key for the Paillier cryptosystem.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PaillierPK {
    /// Public modulus n for encryption
    pub n: Integer,
}

/// Decryption key for the Paillier cryptosystem.
#[derive(Clone)]
pub struct PaillierSK {
    lambda: Integer,
    mu: Integer,
}

/// Ciphertext of the Paillier cryptosystem, which is additively homomorphic.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PaillierCiphertext {
    /// Encrypted message (Ciphertext)
    pub c: Integer,
}

impl Associable<PaillierPK> for PaillierCiphertext {}

impl AsymmetricCryptosystem for Paillier {
    type Parameters = PaillierParameters;
    type PublicKey = PaillierPK;
    type SecretKey = PaillierSK;

    /// Requires $p$ and $q$ to be distinct primes with $\gcd(pq, (p - 1)(q - 1)) = 1$.
    fn setup(parameters: &PaillierParameters) -> Result<Self, CryptoError> {
        let PaillierParameters { p, q } = parameters;

        if p == q {
            return Err(CryptoError::InvalidParameters(
                "Paillier factors must be distinct".to_string(),
            ));
        }

        for factor in [p, q].iter() {
            if !is_probable_prime(factor) {
                return Err(CryptoError::InvalidParameters(format!(
                    "Paillier factor {} is not prime",
                    factor
                )));
            }
        }

        let n = Integer::from(p * q);
        if gcd(&n, &totient(p, q)) != 1 {
            return Err(CryptoError::InvalidParameters(
                "Paillier modulus shares a factor with its totient".to_string(),
            ));
        }

        if (n.significant_bits() as u64) < MIN_SECURE_MODULUS_BITS {
            warn!(
                "Paillier modulus has only {} bits; use it for testing only",
                n.significant_bits()
            );
        }

        Ok(Paillier {
            p: p.clone(),
            q: q.clone(),
        })
    }

    /// Derives the Paillier keypair from the factors. No randomness is consumed.
    /// ```
    /// # use phcc_traits::randomness::GeneralRng;
    /// # use phcc_he::cryptosystems::paillier::{Paillier, PaillierParameters};
    /// # use phcc_traits::cryptosystems::AsymmetricCryptosystem;
    /// # use rand_core::OsRng;
    /// # use rug::Integer;
    /// let mut rng = GeneralRng::new(OsRng);
    /// let paillier = Paillier::setup(&PaillierParameters {
    ///     p: Integer::from(463),
    ///     q: Integer::from(631),
    /// })
    /// .unwrap();
    /// let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// assert_eq!(Integer::from(292153), public_key.n);
    /// ```
    fn generate_keys<R: SecureRng>(
        &self,
        _rng: &mut GeneralRng<R>,
    ) -> Result<(PaillierPK, PaillierSK), CryptoError> {
        let n = Integer::from(&self.p * &self.q);
        let lambda = totient(&self.p, &self.q);

        let mu = mod_inverse(&lambda, &n)?;
        debug!("derived Paillier key pair for a {}-bit modulus", n.significant_bits());

        Ok((PaillierPK { n }, PaillierSK { lambda, mu }))
    }
}

impl PaillierPK {
    /// The generator $g = n + 1$, derived from the modulus rather than stored, so a key received
    /// from elsewhere cannot carry a generator that disagrees with it.
    pub fn g(&self) -> Integer {
        Integer::from(&self.n + 1)
    }

    fn n_squared(&self) -> Integer {
        Integer::from(self.n.square_ref())
    }
}

impl PaillierSK {
    /// The secret exponent $\lambda = (p - 1)(q - 1)$.
    pub fn lambda(&self) -> &Integer {
        &self.lambda
    }
}

impl EncryptionKey for PaillierPK {
    type Input = Integer;
    type Plaintext = Integer;
    type Ciphertext = PaillierCiphertext;
    type Randomness = Integer;

    /// Samples $r$ from the multiplicative group modulo $n$.
    fn sample_randomness<R: SecureRng>(
        &self,
        rng: &mut GeneralRng<R>,
    ) -> Result<Integer, CryptoError> {
        gen_coprime(&self.n, rng)
    }

    /// Encrypts a plaintext $0 \le m < n$ as $g^m r^n \bmod n^2$.
    /// ```
    /// # use phcc_traits::randomness::GeneralRng;
    /// # use phcc_he::cryptosystems::paillier::{Paillier, PaillierParameters};
    /// # use phcc_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey};
    /// # use rug::Integer;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// # let paillier = Paillier::setup(&PaillierParameters { p: Integer::from(13), q: Integer::from(11) }).unwrap();
    /// # let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
    /// assert!(public_key.encrypt(&Integer::from(143), &mut rng).is_err());
    /// ```
    fn encrypt_with(
        &self,
        plaintext: &Integer,
        randomness: &Integer,
    ) -> Result<PaillierCiphertext, CryptoError> {
        if *plaintext < 0 || *plaintext >= self.n {
            return Err(CryptoError::PlaintextOutOfRange {
                value: plaintext.clone(),
                bound: self.n.clone(),
            });
        }

        if *randomness <= 0 || *randomness >= self.n || gcd(randomness, &self.n) != 1 {
            return Err(CryptoError::InvalidRandomness);
        }

        let n_squared = self.n_squared();

        let first = pow_mod(&self.g(), plaintext, &n_squared)?;
        let second = pow_mod(randomness, &self.n, &n_squared)?;

        Ok(PaillierCiphertext {
            c: (first * second).rem(&n_squared),
        })
    }
}

impl DecryptionKey<PaillierPK> for PaillierSK {
    /// Decrypts a Paillier ciphertext using the secret key.
    /// ```
    /// # use phcc_traits::randomness::GeneralRng;
    /// # use phcc_he::cryptosystems::paillier::{Paillier, PaillierParameters};
    /// # use phcc_traits::cryptosystems::{AsymmetricCryptosystem, EncryptionKey, DecryptionKey};
    /// # use rug::Integer;
    /// # use rand_core::OsRng;
    /// # let mut rng = GeneralRng::new(OsRng);
    /// # let paillier = Paillier::setup(&PaillierParameters { p: Integer::from(17), q: Integer::from(13) }).unwrap();
    /// # let (public_key, secret_key) = paillier.generate_keys(&mut rng).unwrap();
    /// # let ciphertext = public_key.encrypt(&Integer::from(5), &mut rng).unwrap();
    /// println!("The decrypted message is {}", secret_key.decrypt(&ciphertext).unwrap());
    /// // Prints: "The decrypted message is 5".
    /// ```
    fn decrypt_raw(
        &self,
        public_key: &PaillierPK,
        ciphertext: &PaillierCiphertext,
    ) -> Result<Integer, CryptoError> {
        let inner = pow_mod(&ciphertext.c, &self.lambda, &public_key.n_squared())?;

        Ok((l_function(&inner, &public_key.n) * &self.mu).rem_euc(&public_key.n))
    }
}

impl HomomorphicAddition for PaillierPK {
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext {
        PaillierCiphertext {
            c: Integer::from(&ciphertext_a.c * &ciphertext_b.c).rem(self.n_squared()),
        }
    }

    fn mul(
        &self,
        ciphertext: &Self::Ciphertext,
        input: &Self::Input,
    ) -> Result<Self::Ciphertext, CryptoError> {
        Ok(PaillierCiphertext {
            c: pow_mod(&ciphertext.c, input, &self.n_squared())?,
        })
    }

    fn sum<'c, I>(&self, ciphertexts: I) -> Self::Ciphertext
    where
        I: IntoIterator<Item = &'c Self::Ciphertext>,
    {
        let n_squared = self.n_squared();

        PaillierCiphertext {
            c: ciphertexts
                .into_iter()
                .fold(Integer::from(1), |accumulator, ciphertext| {
                    (accumulator * &ciphertext.c).rem(&n_squared)
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cryptosystems::paillier::{
        Paillier, PaillierCiphertext, PaillierPK, PaillierParameters,
    };
    use phcc_traits::cryptosystems::{AsymmetricCryptosystem, DecryptionKey, EncryptionKey};
    use phcc_traits::homomorphic::HomomorphicAddition;
    use phcc_traits::randomness::GeneralRng;
    use phcc_traits::testing::DepletedRng;
    use phcc_traits::CryptoError;
    use rand_core::OsRng;
    use rug::Integer;

    fn paillier(p: u32, q: u32) -> Paillier {
        Paillier::setup(&PaillierParameters {
            p: Integer::from(p),
            q: Integer::from(q),
        })
        .unwrap()
    }

    #[test]
    fn test_create_private_key() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(463, 631).generate_keys(&mut rng).unwrap();

        assert_eq!(Integer::from(292153), pk.n);
        assert_eq!(Integer::from(292154), pk.g());
        assert_eq!(Integer::from(291060), *sk.lambda());
    }

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(463, 631).generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt(&Integer::from(15), &mut rng).unwrap();

        assert_eq!(Integer::from(15), sk.decrypt(&ciphertext).unwrap());
    }

    #[test]
    fn test_check_plaintext_space() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(13, 11).generate_keys(&mut rng).unwrap();

        for value in [-1, 143, 144].iter() {
            let error = pk.encrypt(&Integer::from(*value), &mut rng).unwrap_err();
            assert_eq!(
                CryptoError::PlaintextOutOfRange {
                    value: Integer::from(*value),
                    bound: Integer::from(143),
                },
                error
            );
            assert_eq!(
                format!("{} is out of allowed plaintext space [0, 143)", value),
                error.to_string()
            );
        }

        for value in [0, 1, 142].iter() {
            let ciphertext = pk.encrypt(&Integer::from(*value), &mut rng).unwrap();
            assert_eq!(Integer::from(*value), sk.decrypt(&ciphertext).unwrap());
        }
    }

    #[test]
    fn test_homomorphic_add() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(17, 13).generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt(&Integer::from(4), &mut rng).unwrap();
        let ciphertext_b = pk.encrypt(&Integer::from(2), &mut rng).unwrap();
        let ciphertext_sum = &ciphertext_a + &ciphertext_b;

        assert_eq!(Integer::from(6), sk.decrypt(&ciphertext_sum).unwrap());
    }

    #[test]
    fn test_homomorphic_add_wraps_modulo_n() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(17, 13).generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt_raw(&Integer::from(200), &mut rng).unwrap();
        let ciphertext_b = pk.encrypt_raw(&Integer::from(30), &mut rng).unwrap();
        let sum = pk.add(&ciphertext_a, &ciphertext_b);

        assert_eq!(Integer::from(9), sk.decrypt_raw(&pk, &sum).unwrap());
    }

    #[test]
    fn test_homomorphic_sum() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(17, 13).generate_keys(&mut rng).unwrap();

        let ciphertexts: Vec<PaillierCiphertext> = [5, 6, 7, 8]
            .iter()
            .map(|m| pk.encrypt_raw(&Integer::from(*m), &mut rng).unwrap())
            .collect();
        let sum = pk.sum(&ciphertexts);

        assert_eq!(Integer::from(26), sk.decrypt_raw(&pk, &sum).unwrap());
    }

    #[test]
    fn test_empty_sum_is_identity() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(17, 13).generate_keys(&mut rng).unwrap();

        let identity = pk.sum(&[]);

        assert_eq!(Integer::from(1), identity.c);
        assert_eq!(Integer::from(0), sk.decrypt_raw(&pk, &identity).unwrap());
    }

    #[test]
    fn test_homomorphic_scalar_mul() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(7, 5).generate_keys(&mut rng).unwrap();

        let ciphertext = pk.encrypt(&Integer::from(30), &mut rng).unwrap();
        let ciphertext_scaled = ciphertext.mul_scalar(&Integer::from(93)).unwrap();

        assert_eq!(Integer::from(25), sk.decrypt(&ciphertext_scaled).unwrap());
    }

    #[test]
    fn test_encrypt_with_given_randomness() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, sk) = paillier(7, 5).generate_keys(&mut rng).unwrap();

        let ciphertext_a = pk.encrypt_with(&Integer::from(12), &Integer::from(2)).unwrap();
        let ciphertext_b = pk.encrypt_with(&Integer::from(12), &Integer::from(2)).unwrap();

        assert_eq!(ciphertext_a, ciphertext_b);
        assert_eq!(Integer::from(12), sk.decrypt_raw(&pk, &ciphertext_a).unwrap());

        for randomness in [0, 5, 7, 35].iter() {
            assert_eq!(
                Err(CryptoError::InvalidRandomness),
                pk.encrypt_with(&Integer::from(12), &Integer::from(*randomness))
            );
        }
    }

    #[test]
    fn test_public_key_from_modulus_alone() {
        let mut rng = GeneralRng::new(OsRng);
        let (_, sk) = paillier(7, 5).generate_keys(&mut rng).unwrap();

        // A key received from a peer carries only the modulus; the generator is always n + 1.
        let pk = PaillierPK { n: Integer::from(35) };
        assert_eq!(Integer::from(36), pk.g());

        let ciphertext = pk.encrypt_with(&Integer::from(12), &Integer::from(2)).unwrap();
        assert_eq!(Integer::from(228), ciphertext.c);
        assert_eq!(Integer::from(12), sk.decrypt_raw(&pk, &ciphertext).unwrap());
    }

    #[test]
    fn test_setup_rejects_invalid_factors() {
        for (p, q) in [(13, 13), (15, 11), (13, 1)].iter() {
            assert!(matches!(
                Paillier::setup(&PaillierParameters {
                    p: Integer::from(*p),
                    q: Integer::from(*q),
                }),
                Err(CryptoError::InvalidParameters(_))
            ));
        }

        // 3 divides (7 - 1), so gcd(21, 12) = 3
        assert!(Paillier::setup(&PaillierParameters {
            p: Integer::from(7),
            q: Integer::from(3),
        })
        .is_err());
    }

    #[test]
    fn test_depleted_rng() {
        let mut rng = GeneralRng::new(OsRng);
        let (pk, _) = paillier(17, 13).generate_keys(&mut rng).unwrap();

        let mut depleted = GeneralRng::new(DepletedRng);
        assert!(matches!(
            pk.encrypt(&Integer::from(4), &mut depleted),
            Err(CryptoError::RandomnessExhausted(_))
        ));
    }
}
