// Copyright @yucwang 2026

use crate::core::sequence::{ radical_inverse_bits, SequenceGenerator,
                             DEFAULT_MAX_SAMPLES, PRIMES };

/// Hammersley point set over `max_samples` points. Dimension 0 is `i / N`,
/// dimension `d >= 1` is the radical inverse in the `d`-th prime base.
#[derive(Debug, Clone, Copy)]
pub struct Hammersley {
    max_samples: u32,
}

impl Default for Hammersley {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

impl Hammersley {
    pub fn new(max_samples: u32) -> Self {
        Self { max_samples: max_samples.max(1) }
    }
}

impl SequenceGenerator for Hammersley {
    fn max_samples(&self) -> u32 {
        self.max_samples
    }

    fn dimensions(&self) -> usize {
        PRIMES.len() + 1
    }

    fn sample_bits(&self, dimension: usize, index: u32) -> u32 {
        assert!(dimension < self.dimensions(),
                "Hammersley dimension {} out of range", dimension);
        let index = self.clamp_index(index);
        if dimension == 0 {
            ((index as u64) << 32).checked_div(self.max_samples as u64)
                .unwrap_or(0) as u32
        } else {
            radical_inverse_bits(PRIMES[dimension - 1], index)
        }
    }
}
