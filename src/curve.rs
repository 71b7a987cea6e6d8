//! Runtime-parameterized short Weierstrass curves.

use crate::{
    Error, Result,
    endo::EndomorphismParams,
    field::{FieldElement, FiniteField},
    point::ProjectivePoint,
};
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;

/// A short Weierstrass curve `y² = x³ + ax + b` over a prime field,
/// together with its subgroup order and cofactor.
///
/// Curves are immutable after construction and shared read-only (via
/// [`Arc`]) by all points and multipliers referencing them.
#[derive(Debug, Eq, PartialEq)]
pub struct Curve {
    field: Arc<FiniteField>,
    a: FieldElement,
    b: FieldElement,
    b3: FieldElement,
    order: BigUint,
    cofactor: BigUint,
    endomorphism: Option<EndomorphismParams>,
}

impl Curve {
    /// Construct a curve from raw parameters.
    ///
    /// Coefficients are reduced into `field`. The order must be the order of
    /// the prime-order subgroup scalar multiplication operates in;
    /// consistency (`order·P = infinity`) is the parameter source's
    /// responsibility and is exercised by this crate's test suite for the
    /// bundled parameter sets.
    ///
    /// # Panics
    ///
    /// If `order` or `cofactor` is zero (construction-time parameter error).
    pub fn new(
        field: Arc<FiniteField>,
        a: BigUint,
        b: BigUint,
        order: BigUint,
        cofactor: BigUint,
    ) -> Arc<Self> {
        Self::build(field, a, b, order, cofactor, None)
    }

    /// Construct a curve carrying a GLV endomorphism descriptor.
    ///
    /// The descriptor's constants (β, λ, lattice basis) are curve metadata
    /// supplied by the parameter source, not derived here.
    pub fn with_endomorphism(
        field: Arc<FiniteField>,
        a: BigUint,
        b: BigUint,
        order: BigUint,
        cofactor: BigUint,
        endomorphism: EndomorphismParams,
    ) -> Arc<Self> {
        Self::build(field, a, b, order, cofactor, Some(endomorphism))
    }

    fn build(
        field: Arc<FiniteField>,
        a: BigUint,
        b: BigUint,
        order: BigUint,
        cofactor: BigUint,
        endomorphism: Option<EndomorphismParams>,
    ) -> Arc<Self> {
        assert!(!order.is_zero(), "curve order must be nonzero");
        assert!(!cofactor.is_zero(), "curve cofactor must be nonzero");

        let a = field.element(a);
        let b = field.element(b);
        let b3 = b.double().add(&b);

        Arc::new(Self {
            field,
            a,
            b,
            b3,
            order,
            cofactor,
            endomorphism,
        })
    }

    /// Base field of the curve.
    pub fn field(&self) -> &Arc<FiniteField> {
        &self.field
    }

    /// The `a` coefficient.
    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    /// The `b` coefficient.
    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    /// `3·b`, precomputed for the complete addition formulas.
    pub(crate) fn b3(&self) -> &FieldElement {
        &self.b3
    }

    /// Order of the subgroup scalar multiplication operates in.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Cofactor of the subgroup.
    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }

    /// GLV endomorphism descriptor, if this curve carries one.
    pub fn endomorphism(&self) -> Option<&EndomorphismParams> {
        self.endomorphism.as_ref()
    }

    /// The point at infinity (the group identity).
    pub fn infinity(self: &Arc<Self>) -> ProjectivePoint {
        ProjectivePoint::identity(self)
    }

    /// Validate affine coordinates and construct the corresponding point.
    ///
    /// Fails with [`Error::InvalidPoint`] when the coordinates do not
    /// satisfy the curve equation; callers decoding untrusted input must
    /// treat that as "reject the input".
    pub fn create_point(self: &Arc<Self>, x: BigUint, y: BigUint) -> Result<ProjectivePoint> {
        let x = self.field.element(x);
        let y = self.field.element(y);

        if !self.is_on_curve(&x, &y) {
            return Err(Error::InvalidPoint);
        }

        let one = self.field.one();
        Ok(ProjectivePoint::new(self.clone(), x, y, one))
    }

    /// Does `(x, y)` satisfy `y² = x³ + ax + b`?
    pub fn is_on_curve(&self, x: &FieldElement, y: &FieldElement) -> bool {
        let x3 = x.square().mul(x);
        let rhs = x3.add(&self.a.mul(x)).add(&self.b);
        y.square() == rhs
    }
}

#[cfg(test)]
mod tests {
    use crate::dev;
    use num_bigint::BigUint;

    #[test]
    fn create_point_validates_curve_equation() {
        let curve = dev::toy_curve();

        // (2, 7) is on y² = x³ + x + 6 over F_11; (2, 8) is not.
        assert!(curve.create_point(2u32.into(), 7u32.into()).is_ok());
        assert_eq!(
            curve.create_point(2u32.into(), 8u32.into()),
            Err(crate::Error::InvalidPoint)
        );
    }

    #[test]
    fn created_point_round_trips_through_normalization() {
        let curve = dev::toy_curve();
        let p = curve.create_point(2u32.into(), 7u32.into()).unwrap();
        let affine = p.to_affine();

        assert_eq!(affine.x().value(), &BigUint::from(2u32));
        assert_eq!(affine.y().value(), &BigUint::from(7u32));
        assert_eq!(affine.to_projective(), p);
    }

    #[test]
    fn infinity_is_the_identity() {
        let curve = dev::toy_curve();
        let inf = curve.infinity();
        assert!(inf.is_infinity());
        assert_eq!(inf.double(), inf);
    }
}
