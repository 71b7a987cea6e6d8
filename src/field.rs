//! Finite field descriptors and prime-field element arithmetic.
//!
//! [`FiniteField`] and [`ExtensionField`] describe the scalar domain curve
//! coordinates live in (characteristic, dimension, optional tower
//! structure). Arithmetic is defined for prime fields (`dimension == 1`);
//! extension fields are structural descriptors shared with the surrounding
//! key-handling code.

use core::ops::{Add, Mul, Neg, Sub};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::sync::Arc;

/// Prime finite field descriptor.
///
/// Immutable; constructed once per curve and shared by all elements and
/// points referencing it.
#[derive(Debug, Eq, PartialEq)]
pub struct FiniteField {
    characteristic: BigUint,
    dimension: u32,
}

impl FiniteField {
    /// Construct the prime field of the given characteristic.
    ///
    /// The characteristic must be an odd prime; primality is the caller's
    /// responsibility (curve parameters come from trusted parameter sets),
    /// but trivially unusable moduli are rejected outright.
    ///
    /// # Panics
    ///
    /// If the characteristic is smaller than 3 or even. Violating this is a
    /// construction-time parameter error, never a runtime condition.
    pub fn prime(characteristic: BigUint) -> Arc<Self> {
        assert!(
            characteristic > BigUint::from(2u32) && characteristic.bit(0),
            "field characteristic must be an odd prime"
        );

        Arc::new(Self {
            characteristic,
            dimension: 1,
        })
    }

    /// Field characteristic.
    pub fn characteristic(&self) -> &BigUint {
        &self.characteristic
    }

    /// Dimension over the prime subfield; 1 for a prime field.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Width of the canonical fixed-length big-endian element encoding.
    pub fn element_byte_len(&self) -> usize {
        self.characteristic.bits().div_ceil(8) as usize
    }

    /// Reduce `value` into this field.
    pub fn element(self: &Arc<Self>, value: BigUint) -> FieldElement {
        FieldElement {
            value: value % &self.characteristic,
            field: self.clone(),
        }
    }

    /// The additive identity.
    pub fn zero(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            value: BigUint::zero(),
            field: self.clone(),
        }
    }

    /// The multiplicative identity.
    pub fn one(self: &Arc<Self>) -> FieldElement {
        FieldElement {
            value: BigUint::one(),
            field: self.clone(),
        }
    }
}

/// Extension field descriptor: a tower step of `degree` over a subfield.
///
/// Structural only — exposes the tower shape (used for binary/composite
/// fields elsewhere in the stack); no element arithmetic is defined here.
#[derive(Debug, Eq, PartialEq)]
pub struct ExtensionField {
    subfield: Arc<FiniteField>,
    degree: u32,
    dimension: u32,
}

impl ExtensionField {
    /// Construct the degree-`degree` extension of `subfield`.
    ///
    /// # Panics
    ///
    /// If `degree < 2`. As with [`FiniteField::prime`], this is rejected at
    /// construction and never surfaces as a runtime error.
    pub fn new(subfield: Arc<FiniteField>, degree: u32) -> Self {
        assert!(degree >= 2, "extension degree must be at least 2");
        let dimension = subfield.dimension() * degree;

        Self {
            subfield,
            degree,
            dimension,
        }
    }

    /// Characteristic of the underlying prime field.
    pub fn characteristic(&self) -> &BigUint {
        self.subfield.characteristic()
    }

    /// Dimension over the prime subfield: `subfield.dimension() * degree`.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// The field this extension is built over.
    pub fn subfield(&self) -> &Arc<FiniteField> {
        &self.subfield
    }

    /// Extension degree over the subfield.
    pub fn degree(&self) -> u32 {
        self.degree
    }
}

/// Element of a prime [`FiniteField`], held in canonical reduced form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldElement {
    value: BigUint,
    field: Arc<FiniteField>,
}

impl FieldElement {
    /// Field this element belongs to.
    pub fn field(&self) -> &Arc<FiniteField> {
        &self.field
    }

    /// Canonical value in `[0, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Is this the additive identity?
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Fixed-width big-endian encoding, [`FiniteField::element_byte_len`]
    /// bytes long.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.field.element_byte_len();
        let raw = self.value.to_bytes_be();
        let mut out = vec![0u8; len];
        out[len - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Returns `self + rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field.characteristic(), rhs.field.characteristic());
        self.field
            .element(&self.value + &rhs.value)
    }

    /// Returns `self - rhs`.
    pub fn sub(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field.characteristic(), rhs.field.characteristic());
        self.field
            .element(self.field.characteristic() + &self.value - &rhs.value)
    }

    /// Returns `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.field.characteristic(), rhs.field.characteristic());
        self.field.element(&self.value * &rhs.value)
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns `self + self`.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        self.field
            .element(self.field.characteristic() - &self.value)
    }

    /// Returns the multiplicative inverse, or `None` for zero.
    ///
    /// Fermat inversion: `self^(p-2) mod p`.
    pub fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        let p = self.field.characteristic();
        Some(self.field.element(self.value.modpow(&(p - 2u32), p)))
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::add(self, rhs)
    }
}

impl Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: FieldElement) -> FieldElement {
        FieldElement::add(&self, &rhs)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::sub(self, rhs)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: FieldElement) -> FieldElement {
        FieldElement::sub(&self, &rhs)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &FieldElement) -> FieldElement {
        FieldElement::mul(self, rhs)
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement::mul(&self, &rhs)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement::neg(self)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement::neg(&self)
    }
}
