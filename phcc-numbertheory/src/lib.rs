#![warn(missing_docs, unused_imports)]

//! _This is a part of **phcc**. For more information, head to the phcc crate._
//!
//! Modular arithmetic shared by the phcc cryptosystems: exponentiation, inverses, uniform
//! sampling below a bound and rejection sampling from the multiplicative group modulo $n$.

use phcc_traits::randomness::{GeneralRng, SecureRng};
use phcc_traits::CryptoError;
use rug::integer::{IsPrime, Order};
use rug::Integer;

const REPS: u32 = 25;

/// Upper bound on the number of candidates drawn by the rejection samplers in this crate. Every
/// candidate is accepted with probability above one half for the moduli used in practice, so
/// reaching this bound means the modulus or the RNG is broken.
pub const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// Computes $b^e \bmod m$. Negative exponents require $b$ to be invertible modulo $m$.
pub fn pow_mod(base: &Integer, exponent: &Integer, modulus: &Integer) -> Result<Integer, CryptoError> {
    match base.pow_mod_ref(exponent, modulus) {
        Some(result) => Ok(Integer::from(result)),
        None => Err(CryptoError::NotInvertible),
    }
}

/// Computes the modular multiplicative inverse of `value` modulo `modulus`.
pub fn mod_inverse(value: &Integer, modulus: &Integer) -> Result<Integer, CryptoError> {
    match value.invert_ref(modulus) {
        Some(inverse) => Ok(Integer::from(inverse)),
        None => Err(CryptoError::NotInvertible),
    }
}

/// Computes the greatest common divisor of `a` and `b`.
pub fn gcd(a: &Integer, b: &Integer) -> Integer {
    Integer::from(a.gcd_ref(b))
}

/// Returns true when `candidate` is prime with overwhelming probability.
pub fn is_probable_prime(candidate: &Integer) -> bool {
    candidate.is_probably_prime(REPS) != IsPrime::No
}

/// Paillier's $L$ function, $L(u) = (u - 1) / n$. The division is exact whenever
/// $u \equiv 1 \pmod n$.
pub fn l_function(u: &Integer, n: &Integer) -> Integer {
    let mut result = Integer::from(u - 1);
    result /= n;
    result
}

/// Euler's totient of $pq$ for distinct primes $p$ and $q$: $(p - 1)(q - 1)$.
pub fn totient(p: &Integer, q: &Integer) -> Integer {
    Integer::from(p - 1) * Integer::from(q - 1)
}

/// Samples a uniformly random integer in $[0, \text{bound})$.
///
/// Candidates are built from raw bytes of the RNG, truncated to the bit length of `bound` and
/// rejected when they exceed it. A failing RNG yields `RandomnessExhausted`.
pub fn random_below<R: SecureRng>(
    bound: &Integer,
    rng: &mut GeneralRng<R>,
) -> Result<Integer, CryptoError> {
    if *bound <= 0 {
        return Err(CryptoError::InvalidParameters(format!(
            "sampling bound {} must be positive",
            bound
        )));
    }

    let bits = bound.significant_bits();
    let mut bytes = vec![0u8; (bits as usize + 7) / 8];

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        rng.try_fill_bytes(&mut bytes)?;

        let mut candidate = Integer::from_digits(&bytes[..], Order::Msf);
        candidate.keep_bits_mut(bits);

        if candidate < *bound {
            return Ok(candidate);
        }
    }

    Err(CryptoError::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

/// Generates a uniformly random element of the multiplicative group modulo `other`, i.e. a
/// nonzero $x < n$ with $\gcd(x, n) = 1$.
pub fn gen_coprime<R: SecureRng>(
    other: &Integer,
    rng: &mut GeneralRng<R>,
) -> Result<Integer, CryptoError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = random_below(other, rng)?;

        if candidate != 0 && gcd(&candidate, other) == 1 {
            return Ok(candidate);
        }
    }

    Err(CryptoError::SamplingExhausted {
        attempts: MAX_SAMPLING_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        gcd, gen_coprime, is_probable_prime, l_function, mod_inverse, pow_mod, random_below,
        totient,
    };
    use phcc_traits::randomness::GeneralRng;
    use phcc_traits::testing::DepletedRng;
    use phcc_traits::CryptoError;
    use rand_core::OsRng;
    use rug::Integer;

    #[test]
    fn test_l_function() {
        assert_eq!(Integer::from(6), l_function(&Integer::from(21), &Integer::from(3)));
    }

    #[test]
    fn test_totient() {
        assert_eq!(Integer::from(24), totient(&Integer::from(5), &Integer::from(7)));
    }

    #[test]
    fn test_inverse_and_gcd() {
        let modulus = Integer::from(71);
        let inverse = mod_inverse(&Integer::from(8), &modulus).unwrap();
        assert_eq!(Integer::from(1), Integer::from(&inverse * 8u32) % &modulus);

        assert_eq!(Integer::from(13), gcd(&Integer::from(221), &Integer::from(39)));
        assert_eq!(
            Err(CryptoError::NotInvertible),
            mod_inverse(&Integer::from(13), &Integer::from(221))
        );
    }

    #[test]
    fn test_pow_mod() {
        let result = pow_mod(&Integer::from(3), &Integer::from(5), &Integer::from(7)).unwrap();
        assert_eq!(Integer::from(5), result);

        let negative = pow_mod(&Integer::from(3), &Integer::from(-1), &Integer::from(7)).unwrap();
        assert_eq!(Integer::from(5), negative);

        assert_eq!(
            Err(CryptoError::NotInvertible),
            pow_mod(&Integer::from(2), &Integer::from(-1), &Integer::from(4))
        );
    }

    #[test]
    fn test_primality() {
        assert!(is_probable_prime(&Integer::from(631)));
        assert!(!is_probable_prime(&Integer::from(221)));
    }

    #[test]
    fn test_random_below_stays_in_range() {
        let mut rng = GeneralRng::new(OsRng);
        let bound = Integer::from(71);

        for _ in 0..1_000 {
            let sample = random_below(&bound, &mut rng).unwrap();
            assert!(sample >= 0 && sample < bound);
        }
    }

    #[test]
    fn test_random_below_rejects_empty_range() {
        let mut rng = GeneralRng::new(OsRng);

        assert!(matches!(
            random_below(&Integer::from(0), &mut rng),
            Err(CryptoError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_gen_coprime() {
        let mut rng = GeneralRng::new(OsRng);
        let n = Integer::from(221);

        for _ in 0..1_000 {
            let r = gen_coprime(&n, &mut rng).unwrap();
            assert!(r > 0 && r < n);
            assert_eq!(Integer::from(1), gcd(&r, &n));
        }
    }

    #[test]
    fn test_gen_coprime_gives_up_on_trivial_group() {
        let mut rng = GeneralRng::new(OsRng);

        assert!(matches!(
            gen_coprime(&Integer::from(1), &mut rng),
            Err(CryptoError::SamplingExhausted { .. })
        ));
    }

    #[test]
    fn test_depleted_rng() {
        let mut rng = GeneralRng::new(DepletedRng);

        assert!(matches!(
            random_below(&Integer::from(71), &mut rng),
            Err(CryptoError::RandomnessExhausted(_))
        ));
    }
}
