//! Elliptic curve group arithmetic and scalar multiplication for
//! runtime-parameterized short Weierstrass curves `y² = x³ + ax + b`.
//!
//! Curve parameters are supplied at run time (e.g. after decoding key
//! material); points are validated against the curve equation on
//! construction, and every multiplier result is re-validated before it is
//! returned as a defense against fault-injection attacks.
//!
//! # Usage
//!
//! ```
//! use ecmult::{Multiplier, MulConfig, dev};
//! use num_bigint::BigInt;
//!
//! let curve = dev::secp256k1();
//! let g = dev::secp256k1_generator(&curve)?;
//!
//! let multiplier = Multiplier::new(MulConfig::for_curve(&curve));
//! let k = BigInt::from(123456789u64);
//! let p = multiplier.multiply(&g, &k)?;
//! assert!(!p.is_infinity());
//! # Ok::<(), ecmult::Error>(())
//! ```
//!
//! # Constant-time caveat
//!
//! Arithmetic is performed on arbitrary-precision integers, which cannot be
//! made constant-time. The contract enforced here is narrower: with
//! `constant_time` configured, the lookup-table *access pattern* is
//! independent of the scalar (see [`LookupTable::lookup_const_time`]).

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![allow(clippy::op_ref)]

mod curve;
mod endo;
mod field;
mod lookup;
mod mul;
mod point;
mod precompute;

pub mod dev;

pub use crate::{
    curve::Curve,
    endo::{EndoPrecomp, EndomorphismParams},
    field::{ExtensionField, FieldElement, FiniteField},
    lookup::LookupTable,
    mul::{CombTable, MAX_WINDOW_WIDTH, MIN_WINDOW_WIDTH, MulConfig, Multiplier, Strategy},
    point::{AffinePoint, ProjectivePoint},
    precompute::{PrecomputeCache, PrecomputeData, PrecomputeKey},
};

use core::fmt;

/// Elliptic curve engine errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Coordinates do not satisfy the curve equation.
    ///
    /// Raised by [`Curve::create_point`] for untrusted input; callers should
    /// reject the input rather than treat this as an internal failure.
    InvalidPoint,

    /// Scalar outside the range a strategy supports, e.g. a fixed-comb
    /// multiplication with a scalar wider than the comb.
    InvalidScalar,

    /// Post-multiplication validation failed: the result does not lie on the
    /// curve. The operation must be aborted; the unvalidated point is never
    /// returned, and the engine does not retry (a retry could mask an active
    /// fault-injection attack).
    FaultDetected,

    /// A dependency failed while building precomputed data.
    PrecomputationBuild(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPoint => f.write_str("point is not on the curve"),
            Error::InvalidScalar => f.write_str("scalar out of range for this multiplier"),
            Error::FaultDetected => f.write_str("computation fault detected"),
            Error::PrecomputationBuild(reason) => {
                write!(f, "precomputation failed: {reason}")
            }
        }
    }
}

impl core::error::Error for Error {}

/// Result type with the engine's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
