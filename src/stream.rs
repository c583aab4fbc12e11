use mersenne::Mt19937;
use rand::RngCore;

use crate::error::Result;
use crate::seed::Seed;

/// Deterministic source of uniform reals for one variant.
///
/// Every sampling operation in this crate is built on [`next_uniform`](Self::next_uniform),
/// so the same seed and the same sequence of calls always regenerate the same variant.
#[derive(Debug, Clone)]
pub struct SeededRandomStream {
    seed: Seed,
    mt: Mt19937,
}

impl SeededRandomStream {
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        Self {
            seed,
            mt: Mt19937::with_seed(seed.value()),
        }
    }

    /// Stream seeded from the wall clock; use only when the variant need not be regenerated.
    pub fn from_clock() -> Self {
        Self::new(Seed::from_clock())
    }

    pub fn from_base36(text: &str) -> Result<Self> {
        Ok(Self::new(Seed::from_base36(text)?))
    }

    /// The seed this stream was created from.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Next uniform real in [0, 1).
    pub fn next_uniform(&mut self) -> f64 {
        self.mt.unifrand()
    }
}

impl RngCore for SeededRandomStream {
    fn next_u32(&mut self) -> u32 {
        self.mt.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.mt.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.mt.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.mt.try_fill_bytes(dest)
    }
}
