//! Scalar multiplication strategies.
//!
//! One [`Multiplier`] front end dispatches over four interchangeable
//! strategies: plain binary double-and-add, windowed NAF, a fixed-point
//! comb, and a GLV endomorphism split for curves that carry a descriptor.
//! All of them return the same group element for the same inputs; they
//! differ in precomputation cost, per-call cost and table shape.
//!
//! Every result is validated against the curve equation before it is
//! returned. A failed check aborts with [`Error::FaultDetected`] and is
//! never retried.

use crate::{
    Curve, Error, Result,
    endo::EndoPrecomp,
    lookup::LookupTable,
    point::{AffinePoint, ProjectivePoint},
    precompute::{PrecomputeData, PrecomputeKey},
};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rand_core::RngCore;
use std::sync::Arc;

/// Smallest supported window width.
pub const MIN_WINDOW_WIDTH: u32 = 2;

/// Largest supported window width (tables grow exponentially past this
/// point for no practical gain).
pub const MAX_WINDOW_WIDTH: u32 = 8;

const DEFAULT_WINDOW_WIDTH: u32 = 5;

/// Scalar multiplication algorithm selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Binary double-and-add. No precomputation, no table; the baseline the
    /// other strategies are tested against.
    Binary,
    /// Windowed non-adjacent form over a per-point odd-multiple table.
    WNaf,
    /// Fixed-point comb: bits are read in columns spaced across the scalar,
    /// trading a larger table for fewer doublings. Best for points that are
    /// multiplied many times (generators).
    FixedComb,
    /// GLV split via the curve's endomorphism descriptor; fails on curves
    /// without one.
    Endomorphism,
}

/// Multiplier configuration: strategy, window width and lookup secrecy mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MulConfig {
    /// Selected algorithm.
    pub strategy: Strategy,
    /// Window width for the table-driven strategies, in
    /// [`MIN_WINDOW_WIDTH`]..=[`MAX_WINDOW_WIDTH`].
    pub window_width: u32,
    /// Use the data-independent table access mode
    /// ([`LookupTable::lookup_const_time`]) for every table read.
    pub constant_time: bool,
}

impl MulConfig {
    /// Configuration for secret scalars: windowed NAF with constant-time
    /// table access.
    ///
    /// Each table read is data-independent, but windowed NAF performs an
    /// addition only at nonzero digits, so the double/add sequence still
    /// reflects the digit pattern. Callers that need the table read and
    /// accumulated on every iteration regardless of the scalar should
    /// select [`Strategy::FixedComb`] instead.
    pub fn secret_scalar() -> Self {
        Self {
            strategy: Strategy::WNaf,
            window_width: DEFAULT_WINDOW_WIDTH,
            constant_time: true,
        }
    }

    /// Configuration for public scalars (e.g. signature verification):
    /// variable-time, no table requirement.
    pub fn public_scalar() -> Self {
        Self {
            strategy: Strategy::Binary,
            window_width: DEFAULT_WINDOW_WIDTH,
            constant_time: false,
        }
    }

    /// Default configuration for a curve: the endomorphism split when the
    /// curve carries a descriptor, otherwise [`Self::secret_scalar`].
    pub fn for_curve(curve: &Arc<Curve>) -> Self {
        if curve.endomorphism().is_some() {
            Self {
                strategy: Strategy::Endomorphism,
                ..Self::secret_scalar()
            }
        } else {
            Self::secret_scalar()
        }
    }
}

impl Default for MulConfig {
    fn default() -> Self {
        Self::secret_scalar()
    }
}

/// Scalar multiplication engine.
///
/// Stateless apart from its configuration; all per-point state lives in the
/// point's [`PrecomputeCache`](crate::PrecomputeCache), so one multiplier
/// can serve any number of points and threads.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier {
    config: MulConfig,
}

impl Multiplier {
    /// Construct a multiplier with the given configuration.
    ///
    /// # Panics
    ///
    /// If the window width is outside
    /// [`MIN_WINDOW_WIDTH`]..=[`MAX_WINDOW_WIDTH`].
    pub fn new(config: MulConfig) -> Self {
        assert!(
            (MIN_WINDOW_WIDTH..=MAX_WINDOW_WIDTH).contains(&config.window_width),
            "window width {} outside {MIN_WINDOW_WIDTH}..={MAX_WINDOW_WIDTH}",
            config.window_width
        );
        Self { config }
    }

    /// The configuration this multiplier runs with.
    pub fn config(&self) -> &MulConfig {
        &self.config
    }

    /// Compute `k·p`.
    ///
    /// Negative scalars multiply by the magnitude and negate the result.
    /// The result is validated against the curve equation and returned
    /// normalized; validation failure is [`Error::FaultDetected`].
    pub fn multiply(&self, p: &ProjectivePoint, k: &BigInt) -> Result<ProjectivePoint> {
        if k.is_zero() || p.is_infinity() {
            return Ok(p.curve().infinity());
        }

        let raw = self.multiply_positive(p, k.magnitude())?;
        let raw = if k.sign() == Sign::Minus {
            raw.neg()
        } else {
            raw
        };
        check_result(raw)
    }

    /// Compute `k·p` after re-randomizing the projective representation of
    /// `p`, masking the intermediate values of this one multiplication.
    pub fn multiply_blinded<R: RngCore + ?Sized>(
        &self,
        p: &ProjectivePoint,
        k: &BigInt,
        rng: &mut R,
    ) -> Result<ProjectivePoint> {
        self.multiply(&p.rerandomize(rng), k)
    }

    fn multiply_positive(&self, p: &ProjectivePoint, k: &BigUint) -> Result<ProjectivePoint> {
        match self.config.strategy {
            Strategy::Binary => Ok(self.mul_binary(p, k)),
            Strategy::WNaf => self.mul_wnaf(p, k),
            Strategy::FixedComb => self.mul_comb(p, k),
            Strategy::Endomorphism => self.mul_glv(p, k),
        }
    }

    /// Left-to-right binary double-and-add.
    fn mul_binary(&self, p: &ProjectivePoint, k: &BigUint) -> ProjectivePoint {
        let mut acc = p.curve().infinity();
        for i in (0..k.bits()).rev() {
            acc = acc.double();
            if k.bit(i) {
                acc = acc.add_complete(p);
            }
        }
        acc
    }

    /// Windowed NAF over the point's cached odd-multiple table.
    fn mul_wnaf(&self, p: &ProjectivePoint, k: &BigUint) -> Result<ProjectivePoint> {
        let width = self.config.window_width;
        let data = p
            .precompute_cache()
            .get_or_compute(PrecomputeKey::WNaf { width }, || {
                Ok(PrecomputeData::WNaf(odd_multiples_table(p, width)))
            })?;
        let PrecomputeData::WNaf(table) = &*data else {
            return Err(Error::PrecomputationBuild("cache entry kind mismatch"));
        };

        let digits = wnaf_digits(k, width);
        let mut acc = p.curve().infinity();
        for &d in digits.iter().rev() {
            acc = acc.double();
            if d != 0 {
                let entry = self.table_entry(table, (d.unsigned_abs() as usize - 1) / 2);
                let entry = if d < 0 { entry.neg() } else { entry };
                acc = acc.add_mixed(&entry);
            }
        }
        Ok(acc)
    }

    /// Fixed-point comb over the point's cached comb table.
    fn mul_comb(&self, p: &ProjectivePoint, k: &BigUint) -> Result<ProjectivePoint> {
        let comb_size = p.curve().order().bits();
        if k.bits() > comb_size {
            return Err(Error::InvalidScalar);
        }

        let width = self.config.window_width;
        let data = p
            .precompute_cache()
            .get_or_compute(PrecomputeKey::Comb { width }, || {
                Ok(PrecomputeData::Comb(comb_table(p, width, comb_size)))
            })?;
        let PrecomputeData::Comb(comb) = &*data else {
            return Err(Error::PrecomputationBuild("cache entry kind mismatch"));
        };

        let mut acc = p.curve().infinity();
        for t in (0..comb.spacing).rev() {
            acc = acc.double();

            let mut index = 0usize;
            for j in 0..width {
                if k.bit(u64::from(j) * comb.spacing + t) {
                    index |= 1 << j;
                }
            }
            // Index 0 selects the identity entry, so the table is read on
            // every iteration regardless of the scalar's bits.
            let entry = self.table_entry(&comb.table, index);
            acc = acc.add_mixed(&entry);
        }
        Ok(acc)
    }

    /// GLV split: `k·P = k1·P + k2·ψ(P)` with half-length `k1`, `k2`,
    /// processed with interleaved windowed NAF over two cached tables.
    fn mul_glv(&self, p: &ProjectivePoint, k: &BigUint) -> Result<ProjectivePoint> {
        let curve = p.curve().clone();
        let endo = curve
            .endomorphism()
            .ok_or(Error::PrecomputationBuild("curve has no endomorphism descriptor"))?;

        let k = k % curve.order();
        if k.is_zero() {
            return Ok(curve.infinity());
        }

        let width = self.config.window_width;
        let data = p
            .precompute_cache()
            .get_or_compute(PrecomputeKey::Endomorphism { width }, || {
                let mapped = endo.map_point(p);
                let mapped_table = odd_multiples_table(&mapped, width);
                Ok(PrecomputeData::Endomorphism(EndoPrecomp {
                    mapped,
                    table: odd_multiples_table(p, width),
                    mapped_table,
                }))
            })?;
        let PrecomputeData::Endomorphism(precomp) = &*data else {
            return Err(Error::PrecomputationBuild("cache entry kind mismatch"));
        };

        let (k1, k2) = endo.decompose_scalar(&k, curve.order());
        let (neg1, d1) = (k1.sign() == Sign::Minus, wnaf_digits(k1.magnitude(), width));
        let (neg2, d2) = (k2.sign() == Sign::Minus, wnaf_digits(k2.magnitude(), width));

        let mut acc = curve.infinity();
        for i in (0..d1.len().max(d2.len())).rev() {
            acc = acc.double();
            for (digits, negated, table) in [
                (&d1, neg1, &precomp.table),
                (&d2, neg2, &precomp.mapped_table),
            ] {
                let d = digits.get(i).copied().unwrap_or(0);
                if d != 0 {
                    let entry = self.table_entry(table, (d.unsigned_abs() as usize - 1) / 2);
                    let entry = if (d < 0) != negated { entry.neg() } else { entry };
                    acc = acc.add_mixed(&entry);
                }
            }
        }
        Ok(acc)
    }

    fn table_entry(&self, table: &LookupTable, index: usize) -> AffinePoint {
        if self.config.constant_time {
            table.lookup_const_time(index)
        } else {
            table.lookup(index)
        }
    }
}

/// Validate a multiplier result against the curve equation, returning it
/// normalized. Infinity is always valid.
fn check_result(p: ProjectivePoint) -> Result<ProjectivePoint> {
    let normalized = p.normalize();
    if normalized.is_infinity() {
        return Ok(normalized);
    }
    if !p.curve().is_on_curve(&normalized.x, &normalized.y) {
        return Err(Error::FaultDetected);
    }
    Ok(normalized)
}

/// Table of the odd multiples `1P, 3P, …, (2^(width-1) - 1)P`.
pub(crate) fn odd_multiples_table(p: &ProjectivePoint, width: u32) -> LookupTable {
    let size = 1usize << (width - 2);
    let twice = p.double();

    let mut entries = Vec::with_capacity(size);
    entries.push(p.clone());
    for i in 1..size {
        let next = entries[i - 1].add_complete(&twice);
        entries.push(next);
    }
    LookupTable::new(&entries)
}

/// Precomputed comb table: every combination of the comb's spaced bit
/// positions, plus the spacing it was built with.
#[derive(Debug)]
pub struct CombTable {
    pub(crate) table: LookupTable,
    pub(crate) spacing: u64,
    comb_size: u64,
}

impl CombTable {
    /// The combination table itself; entry `i` is `Σ_j bit_j(i)·2^(j·d)·P`.
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Distance `d` between the bit positions one comb column reads.
    pub fn spacing(&self) -> u64 {
        self.spacing
    }

    /// Scalar bit capacity the comb was sized for (the order's bit length).
    pub fn comb_size(&self) -> u64 {
        self.comb_size
    }
}

fn comb_table(p: &ProjectivePoint, width: u32, comb_size: u64) -> CombTable {
    let spacing = comb_size.div_ceil(u64::from(width));

    // powers[j] = 2^(j·spacing)·P
    let mut powers = Vec::with_capacity(width as usize);
    powers.push(p.clone());
    for j in 1..width as usize {
        let mut next = powers[j - 1].clone();
        for _ in 0..spacing {
            next = next.double();
        }
        powers.push(next);
    }

    let len = 1usize << width;
    let mut entries = Vec::with_capacity(len);
    entries.push(p.curve().infinity());
    for i in 1..len {
        let j = i.trailing_zeros() as usize;
        let entry = entries[i - (1 << j)].add_complete(&powers[j]);
        entries.push(entry);
    }

    CombTable {
        table: LookupTable::new(&entries),
        spacing,
        comb_size,
    }
}

/// Width-`width` NAF digits of `k`, least significant first. Nonzero digits
/// are odd with `|d| < 2^(width-1)`, and no two nonzero digits are closer
/// than `width` positions.
fn wnaf_digits(k: &BigUint, width: u32) -> Vec<i8> {
    let window = 1u64 << width;
    let half = (window / 2) as i64;

    let mut k = k.clone();
    let mut digits = Vec::with_capacity(k.bits() as usize + 1);
    while !k.is_zero() {
        if k.bit(0) {
            let m = (k.iter_u64_digits().next().unwrap_or(0) & (window - 1)) as i64;
            let d = if m > half { m - window as i64 } else { m };
            if d < 0 {
                k += d.unsigned_abs();
            } else {
                k -= d as u64;
            }
            digits.push(d as i8);
        } else {
            digits.push(0);
        }
        k >>= 1u32;
    }
    digits
}
