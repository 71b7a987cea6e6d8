//! GLV endomorphism support.
//!
//! Curves with an efficiently computable endomorphism `ψ(x, y) = (βx, y)`
//! (where `ψ(P) = λ·P` on the prime-order subgroup) allow a scalar to be
//! split into two half-length components, roughly halving the doublings a
//! multiplication processes. The constants β, λ and the lattice basis are
//! curve metadata derived offline (lattice reduction on `(order, λ)`) and
//! supplied with the curve parameters, never computed here.

use crate::{lookup::LookupTable, point::ProjectivePoint};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;

/// Descriptor of a curve's GLV endomorphism.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndomorphismParams {
    beta: BigUint,
    lambda: BigUint,
    v1: (BigInt, BigInt),
    v2: (BigInt, BigInt),
}

impl EndomorphismParams {
    /// Construct a descriptor from curve metadata.
    ///
    /// `v1 = (a1, b1)` and `v2 = (a2, b2)` must be a short basis of the
    /// lattice `{(x, y) : x + y·λ ≡ 0 (mod order)}` with determinant
    /// `±order`; this is a property of the published constants, not
    /// something validated at run time.
    pub fn new(
        beta: BigUint,
        lambda: BigUint,
        v1: (BigInt, BigInt),
        v2: (BigInt, BigInt),
    ) -> Self {
        Self {
            beta,
            lambda,
            v1,
            v2,
        }
    }

    /// The field constant β with `ψ(x, y) = (βx, y)`.
    pub fn beta(&self) -> &BigUint {
        &self.beta
    }

    /// The scalar eigenvalue λ with `ψ(P) = λ·P`.
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    /// Apply the endomorphism to a point.
    ///
    /// One field multiplication — far cheaper than the scalar
    /// multiplication by λ it is equivalent to.
    pub fn map_point(&self, p: &ProjectivePoint) -> ProjectivePoint {
        let beta = p.curve().field().element(self.beta.clone());
        ProjectivePoint::new(
            p.curve().clone(),
            &p.x * &beta,
            p.y.clone(),
            p.z.clone(),
        )
    }

    /// Decompose `k` (reduced mod `order`) into `(k1, k2)` with
    /// `k ≡ k1 + k2·λ (mod order)` and both components roughly half the
    /// bit length of the order.
    ///
    /// Exact rounded-division form of the Hankerson-Menezes-Vanstone
    /// decomposition (Algorithm 3.74): `c1 = round(b2·k / n)`,
    /// `c2 = round(-b1·k / n)`, then subtract `c1·v1 + c2·v2` from `(k, 0)`.
    pub fn decompose_scalar(&self, k: &BigUint, order: &BigUint) -> (BigInt, BigInt) {
        let n = BigInt::from(order.clone());
        let k = BigInt::from(k.clone());
        let (a1, b1) = &self.v1;
        let (a2, b2) = &self.v2;

        let c1 = round_div(&(b2 * &k), &n);
        let c2 = round_div(&(-b1 * &k), &n);

        let k1 = &k - &c1 * a1 - &c2 * a2;
        let k2 = -(&c1 * b1) - &c2 * b2;
        (k1, k2)
    }
}

/// Precomputed endomorphism data for one point: the mapped image point and
/// the odd-multiple tables for both multi-scalar components.
#[derive(Debug)]
pub struct EndoPrecomp {
    pub(crate) mapped: ProjectivePoint,
    pub(crate) table: LookupTable,
    pub(crate) mapped_table: LookupTable,
}

impl EndoPrecomp {
    /// The cached image `ψ(P)` of the point this entry belongs to.
    pub fn mapped(&self) -> &ProjectivePoint {
        &self.mapped
    }
}

/// Nearest-integer division for `d > 0` (ties round up).
fn round_div(n: &BigInt, d: &BigInt) -> BigInt {
    debug_assert_eq!(d.sign(), Sign::Plus);
    (n * 2u32 + d).div_floor(&(d * 2u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev;
    use num_integer::Integer;
    use num_traits::Signed;

    #[test]
    fn round_division() {
        let cases = [(7, 2, 4), (-7, 2, -3), (9, 3, 3), (10, 4, 3), (-10, 4, -2)];
        for (n, d, expected) in cases {
            assert_eq!(
                round_div(&BigInt::from(n), &BigInt::from(d)),
                BigInt::from(expected)
            );
        }
    }

    #[test]
    fn decomposition_recombines() {
        let curve = dev::secp256k1();
        let endo = curve.endomorphism().unwrap();
        let n = BigInt::from(curve.order().clone());
        let lambda = BigInt::from(endo.lambda().clone());

        for seed in [1u64, 2, 97, u64::MAX] {
            let k = (curve.order() - 1u32) / seed + 1u32;
            let (k1, k2) = endo.decompose_scalar(&k, curve.order());

            let recombined = (&k1 + &k2 * &lambda).mod_floor(&n);
            assert_eq!(recombined, BigInt::from(k.clone()));

            // Half-length components: at most a couple of bits over 128.
            assert!(k1.abs().bits() <= 130, "k1 too wide: {} bits", k1.abs().bits());
            assert!(k2.abs().bits() <= 130, "k2 too wide: {} bits", k2.abs().bits());
        }
    }

    #[test]
    fn map_point_is_multiplication_by_lambda() {
        let curve = dev::secp256k1();
        let endo = curve.endomorphism().unwrap();
        let g = dev::secp256k1_generator(&curve).unwrap();

        let mapped = endo.map_point(&g);
        let by_lambda = g
            .multiply(&BigInt::from(endo.lambda().clone()))
            .unwrap();
        assert_eq!(mapped, by_lambda);
    }
}
