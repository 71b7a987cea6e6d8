//! Cross-strategy scalar multiplication tests on the toy curve and
//! secp256k1.

use ecmult::{Curve, Error, MulConfig, Multiplier, PrecomputeKey, Strategy, dev};
use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;
use std::sync::Arc;

fn multiplier(strategy: Strategy) -> Multiplier {
    Multiplier::new(MulConfig {
        strategy,
        ..MulConfig::secret_scalar()
    })
}

fn strategies_for(curve: &Arc<Curve>) -> Vec<Strategy> {
    let mut out = vec![Strategy::Binary, Strategy::WNaf, Strategy::FixedComb];
    if curve.endomorphism().is_some() {
        out.push(Strategy::Endomorphism);
    }
    out
}

#[test]
fn boundary_scalars() {
    let toy = dev::toy_curve();
    let toy_g = dev::toy_generator(&toy);
    let k256 = dev::secp256k1();
    let k256_g = dev::secp256k1_generator(&k256).unwrap();

    for (curve, g) in [(toy, toy_g), (k256, k256_g)] {
        let order = BigInt::from(curve.order().clone());
        let two_g = g.double();
        let minus_g = g.neg();

        for strategy in strategies_for(&curve) {
            let m = multiplier(strategy);

            assert!(m.multiply(&g, &BigInt::ZERO).unwrap().is_infinity());
            assert_eq!(m.multiply(&g, &BigInt::from(1)).unwrap(), g);
            assert_eq!(m.multiply(&g, &BigInt::from(2)).unwrap(), two_g);
            assert_eq!(m.multiply(&g, &(&order - 1)).unwrap(), minus_g);
            assert!(m.multiply(&g, &order).unwrap().is_infinity());
        }
    }
}

#[test]
fn known_vector_secp256k1_double_base() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();

    let expected = curve
        .create_point(
            dev::hex_uint("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"),
            dev::hex_uint("1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a"),
        )
        .unwrap();

    for strategy in strategies_for(&curve) {
        let result = multiplier(strategy).multiply(&g, &BigInt::from(2)).unwrap();
        assert_eq!(result, expected, "strategy {strategy:?}");
    }
}

#[test]
fn negative_scalars_negate() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let k = BigInt::from(0x1234_5678_9abc_def0u64);

    for strategy in strategies_for(&curve) {
        let m = multiplier(strategy);
        let pos = m.multiply(&g, &k).unwrap();
        let neg = m.multiply(&g, &(-&k)).unwrap();
        assert_eq!(neg, pos.neg(), "strategy {strategy:?}");
    }
}

#[test]
fn infinity_times_anything_is_infinity() {
    let curve = dev::secp256k1();
    let inf = curve.infinity();

    for strategy in strategies_for(&curve) {
        let result = multiplier(strategy)
            .multiply(&inf, &BigInt::from(12345))
            .unwrap();
        assert!(result.is_infinity(), "strategy {strategy:?}");
    }
}

#[test]
fn wnaf_cache_is_reused_and_keyed_by_width() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let k = BigInt::from(999u32);

    assert!(g.precompute_cache().get(PrecomputeKey::WNaf { width: 5 }).is_none());
    multiplier(Strategy::WNaf).multiply(&g, &k).unwrap();
    assert!(g.precompute_cache().get(PrecomputeKey::WNaf { width: 5 }).is_some());
    assert!(g.precompute_cache().get(PrecomputeKey::WNaf { width: 4 }).is_none());

    let m4 = Multiplier::new(MulConfig {
        window_width: 4,
        ..MulConfig::secret_scalar()
    });
    m4.multiply(&g, &k).unwrap();
    assert!(g.precompute_cache().get(PrecomputeKey::WNaf { width: 4 }).is_some());

    // Normalized and re-randomized copies share the same cache.
    let mut rng = dev::TestRng::default();
    assert!(
        g.rerandomize(&mut rng)
            .precompute_cache()
            .get(PrecomputeKey::WNaf { width: 5 })
            .is_some()
    );
    assert!(
        g.normalize()
            .precompute_cache()
            .get(PrecomputeKey::WNaf { width: 4 })
            .is_some()
    );
}

#[test]
fn comb_rejects_scalar_wider_than_the_order() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let m = multiplier(Strategy::FixedComb);

    let too_wide = BigInt::from(BigUint::from(1u32) << 256);
    assert_eq!(m.multiply(&g, &too_wide), Err(Error::InvalidScalar));

    let order = BigInt::from(curve.order().clone());
    assert!(m.multiply(&g, &order).unwrap().is_infinity());
}

#[test]
fn blinded_multiplication_matches_plain() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let k = BigInt::from(0xfeed_f00d_dead_beefu64);
    let mut rng = dev::TestRng::default();

    for strategy in strategies_for(&curve) {
        let m = multiplier(strategy);
        let plain = m.multiply(&g, &k).unwrap();
        let blinded = m.multiply_blinded(&g, &k, &mut rng).unwrap();
        assert_eq!(blinded, plain, "strategy {strategy:?}");
    }
}

#[test]
fn default_multiplier_through_the_point_api() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let k = BigInt::from(31337u32);

    let via_point = g.multiply(&k).unwrap();
    let via_binary = multiplier(Strategy::Binary).multiply(&g, &k).unwrap();
    assert_eq!(via_point, via_binary);
}

#[test]
fn concurrent_multiplications_agree() {
    let curve = dev::secp256k1();
    let g = dev::secp256k1_generator(&curve).unwrap();
    let m = multiplier(Strategy::WNaf);

    let k = BigInt::from(0xdead_beefu64);
    let expected = m.multiply(&g, &k).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                // Same point, shared cache, all threads race the first build.
                assert_eq!(m.multiply(&g, &k).unwrap(), expected);
            });
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn strategies_agree_on_random_scalars(bytes in any::<[u8; 32]>()) {
        let curve = dev::secp256k1();
        let g = dev::secp256k1_generator(&curve).unwrap();
        let k = BigInt::from(BigUint::from_bytes_be(&bytes) % curve.order());

        let reference = multiplier(Strategy::Binary).multiply(&g, &k).unwrap();
        for strategy in [Strategy::WNaf, Strategy::FixedComb, Strategy::Endomorphism] {
            let result = multiplier(strategy).multiply(&g, &k).unwrap();
            prop_assert_eq!(&result, &reference, "strategy {:?}", strategy);
        }
    }

    #[test]
    fn variable_time_lookup_matches_constant_time(k in 1u64..u64::MAX) {
        let curve = dev::secp256k1();
        let g = dev::secp256k1_generator(&curve).unwrap();
        let k = BigInt::from(k);

        let ct = multiplier(Strategy::WNaf).multiply(&g, &k).unwrap();
        let vt = Multiplier::new(MulConfig {
            strategy: Strategy::WNaf,
            constant_time: false,
            ..MulConfig::secret_scalar()
        })
        .multiply(&g, &k)
        .unwrap();
        prop_assert_eq!(ct, vt);
    }
}
