// Copyright @yucwang 2026

use crate::math::constants::Float;

/// First primes, one radical inverse base per dimension.
pub const PRIMES: [u32; 32] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53,
    59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131,
];

/// Index bound used when none is configured.
pub const DEFAULT_MAX_SAMPLES: u32 = 1 << 16;

/// Converts a 0.32 fixed point value to a float strictly below one.
pub fn bits_to_float(bits: u32) -> Float {
    (bits >> 8) as Float * (1.0 / (1u32 << 24) as Float)
}

/// Radical inverse of `index` in `base`, as 0.32 fixed point.
pub fn radical_inverse_bits(base: u32, mut index: u32) -> u32 {
    if base == 2 {
        return index.reverse_bits();
    }

    let inv_base = 1.0 / base as f64;
    let mut inv_base_n = 1.0f64;
    let mut reversed = 0u64;
    while index > 0 {
        let next = index / base;
        let digit = index - next * base;
        reversed = reversed * base as u64 + digit as u64;
        inv_base_n *= inv_base;
        index = next;
    }

    let value = reversed as f64 * inv_base_n;
    ((value * 4294967296.0) as u64).min(u32::MAX as u64) as u32
}

/// Deterministic low-discrepancy sample source.
///
/// Implementations produce 0.32 fixed point values through `sample_bits`;
/// the float accessors are derived from it. Indices at or beyond
/// `max_samples` are clamped to `max_samples - 1`.
pub trait SequenceGenerator: Send + Sync {
    fn max_samples(&self) -> u32;

    /// Number of dimensions this generator can serve.
    fn dimensions(&self) -> usize;

    fn sample_bits(&self, dimension: usize, index: u32) -> u32;

    fn sample(&self, dimension: usize, index: u32) -> Float {
        bits_to_float(self.sample_bits(dimension, index))
    }

    /// Seeded variant. Generators without a scrambler ignore the seed.
    fn sample_scrambled_bits(&self, dimension: usize, index: u32, _seed: u32) -> u32 {
        self.sample_bits(dimension, index)
    }

    fn sample_scrambled(&self, dimension: usize, index: u32, seed: u32) -> Float {
        bits_to_float(self.sample_scrambled_bits(dimension, index, seed))
    }

    fn clamp_index(&self, index: u32) -> u32 {
        index.min(self.max_samples().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_to_float_stays_below_one() {
        assert_eq!(bits_to_float(0), 0.0);
        assert!(bits_to_float(u32::MAX) < 1.0);
        assert_eq!(bits_to_float(0x8000_0000), 0.5);
    }

    #[test]
    fn test_radical_inverse() {
        assert_eq!(bits_to_float(radical_inverse_bits(2, 1)), 0.5);
        assert_eq!(bits_to_float(radical_inverse_bits(2, 3)), 0.75);
        let third = bits_to_float(radical_inverse_bits(3, 1));
        assert!((third - 1.0 / 3.0).abs() < 1e-6);
        let seven_ninths = bits_to_float(radical_inverse_bits(3, 5));
        assert!((seven_ninths - 7.0 / 9.0).abs() < 1e-6);
    }
}
