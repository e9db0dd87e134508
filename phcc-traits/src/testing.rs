use rand_core::{CryptoRng, RngCore};

/// An RNG whose entropy source is permanently unavailable. `try_fill_bytes` reports the failure,
/// while the infallible methods panic the way `OsRng` does, so any caller that bypasses
/// `try_fill_bytes` aborts the test instead of silently passing.
pub struct DepletedRng;

impl RngCore for DepletedRng {
    fn next_u32(&mut self) -> u32 {
        panic!("Error: entropy source unavailable")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("Error: entropy source unavailable")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("Error: entropy source unavailable")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy source unavailable"))
    }
}

impl CryptoRng for DepletedRng {}
