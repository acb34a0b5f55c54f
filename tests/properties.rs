// Copyright @yucwang 2026

use proptest::prelude::*;

use lumiere::core::sequence::SequenceGenerator;
use lumiere::core::tonemapper::Tonemapper;
use lumiere::samplers::cranley_patterson::CranleyPatterson;
use lumiere::samplers::halton::Halton;
use lumiere::samplers::hammersley::Hammersley;
use lumiere::tonemappers::aces::AcesFilmic;
use lumiere::tonemappers::reinhard::Reinhard;

proptest! {
    #[test]
    fn halton_is_deterministic_and_in_unit_range(dim in 0usize..16, index in 0u32..100_000) {
        let halton = Halton::new(1 << 16);
        let a = halton.sample(dim, index);
        prop_assert_eq!(a, halton.sample(dim, index));
        prop_assert!((0.0..1.0).contains(&a));
    }

    #[test]
    fn hammersley_is_in_unit_range(dim in 0usize..16, index in 0u32..5000) {
        let hammersley = Hammersley::new(4096);
        let a = hammersley.sample(dim, index);
        prop_assert!((0.0..1.0).contains(&a));
    }

    #[test]
    fn scrambling_is_invertible(dim in 0usize..16, index in 0u32..4096, seed: u32) {
        let scrambled = CranleyPatterson::new(Halton::new(4096));
        let bits = scrambled.sample_scrambled_bits(dim, index, seed);
        prop_assert_eq!(scrambled.unscramble_bits(bits, dim, seed), scrambled.base().sample_bits(dim, index));
        let x = scrambled.sample_scrambled(dim, index, seed);
        prop_assert!((0.0..1.0).contains(&x));
    }

    #[test]
    fn tonemappers_are_monotone_and_below_one(a in 0.0f32..100.0, b in 0.0f32..100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for tm in [&AcesFilmic as &dyn Tonemapper, &Reinhard] {
            prop_assert!(tm.map(lo) <= tm.map(hi));
            prop_assert!(tm.map(hi) < 1.0);
            prop_assert!(tm.map(lo) >= 0.0);
        }
    }
}

#[test]
fn tonemappers_fix_zero_and_reject_bad_input() {
    for tm in [&AcesFilmic as &dyn Tonemapper, &Reinhard] {
        assert_eq!(tm.map(0.0), 0.0);
        assert_eq!(tm.map(-1.0), 0.0);
        assert_eq!(tm.map(f32::NAN), 0.0);
        assert!(tm.map(f32::MAX) < 1.0);
    }
}

#[test]
fn distinct_seeds_rarely_collide() {
    let scrambled = CranleyPatterson::new(Halton::new(1024));
    let mut values: Vec<u32> = (0..1000u32).map(|seed| scrambled.sample_scrambled_bits(0, 7, seed)).collect();
    values.sort_unstable();
    values.dedup();
    assert!(values.len() > 990);
}
