use std::ops::{Add, Mul};

use crate::cryptosystems::{Associable, AssociatedCiphertext, EncryptionKey};
use crate::CryptoError;

/// Public keys whose ciphertexts can be combined into an encryption of the plaintexts' sum.
pub trait HomomorphicAddition: EncryptionKey {
    /// Combines two ciphertexts into an encryption of the sum of their plaintexts.
    fn add(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext;

    /// Computes an encryption of the plaintext multiplied by a cleartext scalar.
    fn mul(
        &self,
        ciphertext: &Self::Ciphertext,
        input: &Self::Input,
    ) -> Result<Self::Ciphertext, CryptoError>;

    /// Combines any number of ciphertexts into an encryption of their sum. An empty iterator
    /// yields the identity, an encryption of zero.
    fn sum<'c, I>(&self, ciphertexts: I) -> Self::Ciphertext
    where
        I: IntoIterator<Item = &'c Self::Ciphertext>,
        Self::Ciphertext: 'c;
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicAddition> Add
    for &AssociatedCiphertext<'pk, C, PK>
{
    type Output = AssociatedCiphertext<'pk, C, PK>;

    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.public_key, rhs.public_key);
        AssociatedCiphertext {
            ciphertext: HomomorphicAddition::add(self.public_key, &self.ciphertext, &rhs.ciphertext),
            public_key: self.public_key,
        }
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicAddition>
    AssociatedCiphertext<'pk, C, PK>
{
    /// Computes an encryption of the plaintext multiplied by `rhs`.
    pub fn mul_scalar(&self, rhs: &PK::Input) -> Result<AssociatedCiphertext<'pk, C, PK>, CryptoError> {
        Ok(AssociatedCiphertext {
            ciphertext: HomomorphicAddition::mul(self.public_key, &self.ciphertext, rhs)?,
            public_key: self.public_key,
        })
    }
}

/// Public keys whose ciphertexts can be combined into an encryption of the plaintexts' product.
pub trait HomomorphicMultiplication: EncryptionKey {
    /// Combines two ciphertexts into an encryption of the product of their plaintexts.
    fn mul(
        &self,
        ciphertext_a: &Self::Ciphertext,
        ciphertext_b: &Self::Ciphertext,
    ) -> Self::Ciphertext;

    /// Computes an encryption of the plaintext raised to a cleartext power.
    fn pow(
        &self,
        ciphertext: &Self::Ciphertext,
        input: &Self::Input,
    ) -> Result<Self::Ciphertext, CryptoError>;
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicMultiplication> Mul
    for &AssociatedCiphertext<'pk, C, PK>
{
    type Output = AssociatedCiphertext<'pk, C, PK>;

    fn mul(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.public_key, rhs.public_key);
        AssociatedCiphertext {
            ciphertext: HomomorphicMultiplication::mul(
                self.public_key,
                &self.ciphertext,
                &rhs.ciphertext,
            ),
            public_key: self.public_key,
        }
    }
}

impl<'pk, C: Associable<PK>, PK: EncryptionKey<Ciphertext = C> + HomomorphicMultiplication>
    AssociatedCiphertext<'pk, C, PK>
{
    /// Computes an encryption of the plaintext raised to the power `rhs`.
    pub fn pow(&self, rhs: &PK::Input) -> Result<AssociatedCiphertext<'pk, C, PK>, CryptoError> {
        Ok(AssociatedCiphertext {
            ciphertext: self.public_key.pow(&self.ciphertext, rhs)?,
            public_key: self.public_key,
        })
    }
}
