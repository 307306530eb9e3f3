//! Permuted congruential generator (PCG32, XSH-RR variant).
//!
//! A small, fast and fully reproducible generator: 64 bits of state, 32 bits
//! of output per draw. Two generators built with the same `(init_state,
//! init_seq)` produce the same sequence on every platform, which the
//! renderer relies on for reproducible images.

use rand::{Error, RngCore};

const MULTIPLIER: u64 = 6364136223846793005;

/// PCG uniform pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg {
    state: u64,
    inc: u64,
}

impl Default for Pcg {
    /// Same as `Pcg::new(42, 54)`.
    fn default() -> Self {
        Self::new(42, 54)
    }
}

impl Pcg {
    /// Seed a generator. `init_seq` selects one of 2^63 independent streams.
    pub fn new(init_state: u64, init_seq: u64) -> Self {
        let mut pcg = Self {
            state: 0,
            inc: (init_seq << 1) | 1,
        };

        // Both draws are discarded; they mix the seed into the state.
        pcg.random();
        pcg.state = pcg.state.wrapping_add(init_state);
        pcg.random();

        pcg
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn inc(&self) -> u64 {
        self.inc
    }

    /// Return a new 32-bit random number and advance the state.
    #[inline]
    pub fn random(&mut self) -> u32 {
        let oldstate = self.state;
        self.state = oldstate.wrapping_mul(MULTIPLIER).wrapping_add(self.inc);

        let xorshifted = (((oldstate >> 18) ^ oldstate) >> 27) as u32;
        let rot = (oldstate >> 59) as u32;

        xorshifted.rotate_right(rot)
    }

    /// Return a random number uniformly distributed over `[0, 1]`.
    ///
    /// Both endpoints are reachable.
    #[inline]
    pub fn random_float(&mut self) -> f64 {
        self.random() as f64 / u32::MAX as f64
    }
}

impl RngCore for Pcg {
    fn next_u32(&mut self) -> u32 {
        self.random()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.random() as u64;
        let hi = self.random() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.random().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
