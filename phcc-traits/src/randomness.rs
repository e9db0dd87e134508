use rand_core::{CryptoRng, RngCore};

/// A cryptographically secure random number generator. Blanket-implemented for every RNG that
/// implements both `RngCore` and `CryptoRng`.
pub trait SecureRng: RngCore + CryptoRng {}

impl<R: RngCore + CryptoRng> SecureRng for R {}

/// General RNG that can be used for all dependencies.
pub struct GeneralRng<R: SecureRng> {
    rng: R,
}

impl<R: SecureRng> GeneralRng<R> {
    /// Creates a new `GeneralRng` based on an RNG that implements both `RngCore` and `CryptoRng` to
    /// ensure that the underlying RNG is indeed cryptographically secure.
    pub fn new(rng: R) -> Self {
        GeneralRng { rng }
    }

    /// Exposes the underlying RNG.
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Fills `dest` with random bytes, reporting a failing entropy source instead of panicking.
    pub fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
