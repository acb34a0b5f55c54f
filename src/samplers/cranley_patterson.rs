// Copyright @yucwang 2026

use crate::core::sequence::SequenceGenerator;

/// Bijective 32-bit integer hash.
pub fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Cranley-Patterson rotation over any base sequence.
///
/// Each (seed, dimension) pair gets its own toroidal shift applied in 0.32
/// fixed point. For a fixed dimension the shift is a bijection of the seed,
/// so two pixels never share a scrambled value for the same index.
#[derive(Debug, Clone)]
pub struct CranleyPatterson<S> {
    base: S,
}

impl<S: SequenceGenerator> CranleyPatterson<S> {
    pub fn new(base: S) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    pub fn offset(seed: u32, dimension: usize) -> u32 {
        let key = mix32((dimension as u32).wrapping_mul(0x9e37_79b9).wrapping_add(0x632b_e5ab));
        mix32(seed ^ key)
    }

    /// Inverts the rotation applied by `sample_scrambled_bits`.
    pub fn unscramble_bits(&self, bits: u32, dimension: usize, seed: u32) -> u32 {
        bits.wrapping_sub(Self::offset(seed, dimension))
    }
}

impl<S: SequenceGenerator> SequenceGenerator for CranleyPatterson<S> {
    fn max_samples(&self) -> u32 {
        self.base.max_samples()
    }

    fn dimensions(&self) -> usize {
        self.base.dimensions()
    }

    fn sample_bits(&self, dimension: usize, index: u32) -> u32 {
        self.base.sample_bits(dimension, index)
    }

    fn sample_scrambled_bits(&self, dimension: usize, index: u32, seed: u32) -> u32 {
        self.base.sample_bits(dimension, index)
            .wrapping_add(Self::offset(seed, dimension))
    }
}
