/// Implementation of the ElGamal cryptosystem over the integers modulo a prime.
pub mod integer_el_gamal;
/// Implementation of the Paillier cryptosystem.
pub mod paillier;
