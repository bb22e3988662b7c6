#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

pub mod arithmetic;
pub mod curve;
pub mod curves;
pub mod field;
pub mod multiplier;
pub mod point;

pub use bigint::U256;
pub use curve::{CoordinateSystem, Curve, CurveParams};
pub use curves::NamedCurve;
pub use field::PrimeField;
pub use multiplier::{DoubleAndAddMultiplier, FixedWindowMultiplier, PrecompSlot, ScalarMultiplier};
pub use num_bigint::{BigInt, BigUint};
pub use point::Point;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("unsupported coordinate system: {0:?}")]
    UnsupportedOperation(CoordinateSystem),
}
