//! Curve parameter sets and helpers for tests, benches and examples.
//!
//! Two parameter sets: a hand-checkable 13-point toy curve over F₁₁, and
//! secp256k1 with its GLV endomorphism descriptor as a full-size curve with
//! published test vectors.

use crate::{Curve, EndomorphismParams, FiniteField, ProjectivePoint, Result};
use num_bigint::{BigInt, BigUint, Sign};
use rand_core::RngCore;
use std::sync::Arc;

/// The textbook curve `y² = x³ + x + 6` over F₁₁: 13 points, cofactor 1,
/// generator `(2, 7)`. Small enough to verify every multiple by hand.
pub fn toy_curve() -> Arc<Curve> {
    Curve::new(
        FiniteField::prime(BigUint::from(11u32)),
        BigUint::from(1u32),
        BigUint::from(6u32),
        BigUint::from(13u32),
        BigUint::from(1u32),
    )
}

/// The generator `(2, 7)` of [`toy_curve`].
pub fn toy_generator(curve: &Arc<Curve>) -> ProjectivePoint {
    curve
        .create_point(BigUint::from(2u32), BigUint::from(7u32))
        .expect("(2, 7) is on the toy curve")
}

/// secp256k1 (SEC 2 v2, §2.4.1), carrying the GLV endomorphism constants
/// from the standard lattice basis for its λ.
pub fn secp256k1() -> Arc<Curve> {
    let p = hex_uint("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
    let n = hex_uint("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

    let endo = EndomorphismParams::new(
        hex_uint("7ae96a2b657c07106e64479eac3434e99cf0497512f58995c1396c28719501ee"),
        hex_uint("5363ad4cc05c30e0a5261c028812645a122e22ea20816678df02967c1b23bd72"),
        (
            hex_int("3086d221a7d46bcde86c90e49284eb15"),
            -hex_int("e4437ed6010e88286f547fa90abfe4c3"),
        ),
        (
            hex_int("114ca50f7a8e2f3f657c1108d9d44cfd8"),
            hex_int("3086d221a7d46bcde86c90e49284eb15"),
        ),
    );

    Curve::with_endomorphism(
        FiniteField::prime(p),
        BigUint::ZERO,
        BigUint::from(7u32),
        n,
        BigUint::from(1u32),
        endo,
    )
}

/// The secp256k1 base point.
pub fn secp256k1_generator(curve: &Arc<Curve>) -> Result<ProjectivePoint> {
    curve.create_point(
        hex_uint("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        hex_uint("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
    )
}

/// Parse a hex string into a [`BigUint`].
///
/// # Panics
///
/// On non-hex input; constants in tests are written inline.
pub fn hex_uint(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("valid hex literal")
}

/// Parse a hex string into a non-negative [`BigInt`].
pub fn hex_int(s: &str) -> BigInt {
    BigInt::from_biguint(Sign::Plus, hex_uint(s))
}

/// Small deterministic xorshift generator for tests that need an
/// [`RngCore`] source without pulling in a full RNG crate.
#[derive(Clone, Debug)]
pub struct TestRng {
    state: u64,
}

impl TestRng {
    /// Construct from an explicit seed (zero is remapped; xorshift has a
    /// fixed point at zero).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed },
        }
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::from_seed(0x853c_49e6_748f_ea9b)
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
