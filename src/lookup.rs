//! Fixed-size tables of precomputed point multiples.
//!
//! The two access modes are a security contract, not a style choice: call
//! sites must state their secrecy assumption by picking
//! [`LookupTable::lookup`] (variable-time) or
//! [`LookupTable::lookup_const_time`] (data-independent access pattern).
//! Both return identical results for the same index.

use crate::{
    Curve,
    point::{AffinePoint, ProjectivePoint},
};
use num_bigint::BigUint;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Fixed-size, random-accessible table of precomputed points.
///
/// Entries are stored normalized (one batch inversion at construction) and
/// additionally as fixed-width byte encodings so the constant-time access
/// mode can combine every entry with data-independent masks.
#[derive(Debug)]
pub struct LookupTable {
    curve: Arc<Curve>,
    entries: Vec<AffinePoint>,
    encoded: Vec<u8>,
    stride: usize,
}

impl LookupTable {
    /// Build a table from the given points. Size is fixed from here on.
    ///
    /// # Panics
    ///
    /// If `points` is empty (table builders always supply at least one
    /// entry).
    pub fn new(points: &[ProjectivePoint]) -> Self {
        assert!(!points.is_empty(), "lookup table must be non-empty");

        let curve = points[0].curve().clone();
        let entries = ProjectivePoint::batch_normalize(points);

        let coord_len = curve.field().element_byte_len();
        let stride = 2 * coord_len + 1;
        let mut encoded = Vec::with_capacity(stride * entries.len());
        for entry in &entries {
            encoded.push(entry.is_infinity() as u8);
            encoded.extend_from_slice(&entry.x().to_bytes());
            encoded.extend_from_slice(&entry.y().to_bytes());
        }

        Self {
            curve,
            entries,
            encoded,
            stride,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the table empty? (Never true for a constructed table.)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the entry at `index`.
    ///
    /// Variable-time: the access pattern depends on `index`. Only for
    /// contexts where the index is not secret (e.g. verification).
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn lookup(&self, index: usize) -> AffinePoint {
        self.entries[index].clone()
    }

    /// Return the entry at `index`, reading every entry of the table.
    ///
    /// Each entry's encoding is combined into the result under a mask
    /// derived from a constant-time index comparison, so the memory access
    /// pattern is independent of `index`. Required whenever the index
    /// depends on a secret scalar.
    pub fn lookup_const_time(&self, index: usize) -> AffinePoint {
        debug_assert!(index < self.entries.len());

        let mut acc = vec![0u8; self.stride];
        for (j, chunk) in self.encoded.chunks_exact(self.stride).enumerate() {
            let choice = (j as u64).ct_eq(&(index as u64));
            let mask = 0u8.wrapping_sub(choice.unwrap_u8());
            for (out, byte) in acc.iter_mut().zip(chunk) {
                *out |= byte & mask;
            }
        }

        // Decode unconditionally; the masked infinity flag travels into the
        // result rather than selecting a shorter code path here. Identity
        // entries decode to their canonical (0, 0) coordinates.
        let coord_len = (self.stride - 1) / 2;
        let x = BigUint::from_bytes_be(&acc[1..1 + coord_len]);
        let y = BigUint::from_bytes_be(&acc[1 + coord_len..]);
        AffinePoint::from_parts(
            self.curve.clone(),
            self.curve.field().element(x),
            self.curve.field().element(y),
            acc[0] == 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MulConfig, Multiplier, dev};
    use num_bigint::BigInt;
    use proptest::prelude::*;

    #[test]
    fn access_modes_agree() {
        let curve = dev::toy_curve();
        let g = dev::toy_generator(&curve);

        // Multiples of g, with an identity entry mixed in as the comb
        // tables have.
        let mut points = vec![curve.infinity(), g.clone()];
        for _ in 0..6 {
            let next = points.last().unwrap().add(&g);
            points.push(next);
        }

        let table = LookupTable::new(&points);
        assert_eq!(table.len(), points.len());

        for i in 0..table.len() {
            assert_eq!(table.lookup(i), table.lookup_const_time(i));
            assert_eq!(table.lookup(i).to_projective(), points[i]);
        }
    }

    #[test]
    fn agreement_on_full_size_curve() {
        let curve = dev::secp256k1();
        let g = dev::secp256k1_generator(&curve).unwrap();

        let points = [g.clone(), g.double(), g.double().add(&g)];
        let table = LookupTable::new(&points);

        for i in 0..table.len() {
            assert_eq!(table.lookup(i), table.lookup_const_time(i));
        }
    }

    #[test]
    fn const_time_identity_passes_through_mixed_addition() {
        let curve = dev::toy_curve();
        let g = dev::toy_generator(&curve);

        let table = LookupTable::new(&[curve.infinity(), g.clone()]);
        let entry = table.lookup_const_time(0);
        assert!(entry.is_infinity());

        let h = g.double();
        assert_eq!(h.add_mixed(&entry), h);
        assert_eq!(h.add_mixed(&table.lookup_const_time(1)), h.add(&g));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn access_modes_agree_on_randomized_points(
            seeds in proptest::collection::vec(any::<[u8; 32]>(), 1..6)
        ) {
            let curve = dev::secp256k1();
            let g = dev::secp256k1_generator(&curve).unwrap();
            let m = Multiplier::new(MulConfig::public_scalar());

            let points: Vec<_> = seeds
                .iter()
                .map(|bytes| {
                    let k = BigUint::from_bytes_be(bytes) % curve.order();
                    m.multiply(&g, &BigInt::from(k)).unwrap()
                })
                .collect();
            let table = LookupTable::new(&points);

            for i in 0..table.len() {
                prop_assert_eq!(table.lookup(i), table.lookup_const_time(i));
            }
        }
    }
}
