// Copyright @yucwang 2026

use crate::core::sequence::{ radical_inverse_bits, SequenceGenerator,
                             DEFAULT_MAX_SAMPLES, PRIMES };

/// Halton sequence: dimension `d` is the radical inverse in the `d`-th prime.
#[derive(Debug, Clone, Copy)]
pub struct Halton {
    max_samples: u32,
}

impl Default for Halton {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

impl Halton {
    pub fn new(max_samples: u32) -> Self {
        Self { max_samples: max_samples.max(1) }
    }
}

impl SequenceGenerator for Halton {
    fn max_samples(&self) -> u32 {
        self.max_samples
    }

    fn dimensions(&self) -> usize {
        PRIMES.len()
    }

    fn sample_bits(&self, dimension: usize, index: u32) -> u32 {
        assert!(dimension < self.dimensions(),
                "Halton dimension {} out of range", dimension);
        radical_inverse_bits(PRIMES[dimension], self.clamp_index(index))
    }
}
