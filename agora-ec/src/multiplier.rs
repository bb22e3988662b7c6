use crate::field::PrimeField;
use crate::point::Point;
use crate::PointError;

use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use tracing::trace;

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Strategy computing `k * P` out of the point's group law primitives.
pub trait ScalarMultiplier<F: PrimeField>: Send + Sync {
    fn multiply(&self, point: &Point<F>, k: &BigInt) -> Result<Point<F>, PointError>;
}

type Precomputed = Arc<dyn Any + Send + Sync>;

/// Opaque per-point storage owned by whichever multiplier fills it first.
///
/// Clones of a point share the slot. Points produced by group operations
/// start with an empty one.
#[derive(Clone, Default)]
pub struct PrecompSlot(Arc<OnceLock<Precomputed>>);

impl fmt::Debug for PrecompSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrecompSlot({})", if self.is_filled() { "filled" } else { "empty" })
    }
}

impl PrecompSlot {
    pub fn is_filled(&self) -> bool {
        self.0.get().is_some()
    }

    /// Stored value, if there is one and it has type `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0
            .get()
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Returns the stored `T`, running `init` if the slot is empty. When two
    /// threads race, both compute and the first write wins.
    pub fn get_or_try_init<T, E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
    {
        if let Some(value) = self.get::<T>() {
            return Ok(value);
        }
        let value = Arc::new(init()?);
        // a failed set means another writer got there first
        let _ = self.0.set(Arc::clone(&value) as Precomputed);
        Ok(self.get::<T>().unwrap_or(value))
    }
}

const WINDOW_BITS: i32 = 4;
const WINDOW_SIZE: usize = 1 << WINDOW_BITS;

/// Multiples `0 * P ..= 15 * P` of a base point, in normal form.
struct WindowTable<F: PrimeField> {
    multiples: Vec<Point<F>>,
}

impl<F: PrimeField> WindowTable<F> {
    fn build(point: &Point<F>) -> Result<Self, PointError> {
        let curve = point.require_curve()?;
        // the table must not reference the slot it is stored in
        let base = point.without_precomp();
        let mut multiples = Vec::with_capacity(WINDOW_SIZE);
        multiples.push(curve.infinity());
        multiples.push(base.clone());
        for i in 2..WINDOW_SIZE {
            let next = multiples[i - 1].add(&base)?;
            multiples.push(next);
        }
        curve.normalize_all(&mut multiples)?;
        trace!(size = multiples.len(), "built window table");
        Ok(Self { multiples })
    }
}

/// Left-to-right fixed 4-bit window multiplication with a per-point cached
/// table.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedWindowMultiplier;

impl<F: PrimeField> ScalarMultiplier<F> for FixedWindowMultiplier {
    fn multiply(&self, point: &Point<F>, k: &BigInt) -> Result<Point<F>, PointError> {
        let curve = point.require_curve()?;
        if k.is_zero() || point.is_infinity() {
            return Ok(curve.infinity());
        }

        let table = point
            .precomp()
            .get_or_try_init(|| WindowTable::build(point))?;

        let mut q = curve.infinity();
        for byte in k.magnitude().to_bytes_be() {
            for digit in [byte >> 4, byte & 0x0f] {
                // 16 * q + table[digit]
                q = q
                    .times_pow2(WINDOW_BITS - 1)?
                    .twice_plus(&table.multiples[digit as usize])?;
            }
        }

        let result = match k.sign() {
            Sign::Minus => q.negate(),
            _ => q,
        };
        check_result(result)
    }
}

/// Plain double-and-add over the bits of `k`, without precomputation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleAndAddMultiplier;

impl<F: PrimeField> ScalarMultiplier<F> for DoubleAndAddMultiplier {
    fn multiply(&self, point: &Point<F>, k: &BigInt) -> Result<Point<F>, PointError> {
        let curve = point.require_curve()?;
        if k.is_zero() || point.is_infinity() {
            return Ok(curve.infinity());
        }

        let magnitude = k.magnitude();
        let mut q = curve.infinity();
        for i in (0..magnitude.bits()).rev() {
            q = if magnitude.bit(i) {
                q.twice_plus(point)?
            } else {
                q.twice()?
            };
        }

        let result = match k.sign() {
            Sign::Minus => q.negate(),
            _ => q,
        };
        check_result(result)
    }
}

fn check_result<F: PrimeField>(point: Point<F>) -> Result<Point<F>, PointError> {
    if point.is_on_curve() {
        Ok(point)
    } else {
        Err(PointError::InvalidState(
            "scalar multiplication left the curve".to_string(),
        ))
    }
}
