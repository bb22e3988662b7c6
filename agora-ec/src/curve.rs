use crate::field::PrimeField;
use crate::multiplier::{FixedWindowMultiplier, ScalarMultiplier};
use crate::point::Point;
use crate::PointError;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// How a point's coordinates relate to its affine `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSystem {
    Affine,
    /// `x = X / Z`, `y = Y / Z`
    Homogeneous,
    /// `x = X / Z^2`, `y = Y / Z^3`
    Jacobian,
    JacobianChudnovsky,
    /// Jacobian with the cached auxiliary term `a * Z^4`.
    #[default]
    JacobianModified,
    LambdaAffine,
    LambdaProjective,
}

impl CoordinateSystem {
    pub fn is_affine_family(self) -> bool {
        matches!(self, Self::Affine | Self::LambdaAffine)
    }

    /// Number of extra coordinates stored next to `x` and `y`.
    pub fn extra_coordinates(self) -> usize {
        match self {
            Self::Affine | Self::LambdaAffine => 0,
            Self::Homogeneous | Self::Jacobian | Self::JacobianModified | Self::LambdaProjective => {
                1
            }
            Self::JacobianChudnovsky => 3,
        }
    }
}

/// Curve parameters as they appear in configuration, with the coefficients
/// given as big-endian hex strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    pub a: String,
    pub b: String,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

struct CurveInner<F: PrimeField> {
    a: F,
    b: F,
    coordinate_system: CoordinateSystem,
    multiplier: Arc<dyn ScalarMultiplier<F>>,
}

/// Shared handle to a short Weierstrass curve `y^2 = x^3 + a*x + b`.
///
/// Cloning is cheap. Equality and hashing only look at the field and the
/// coefficients, so handles that differ in coordinate system or
/// multiplication strategy still describe the same curve.
pub struct Curve<F: PrimeField>(Arc<CurveInner<F>>);

impl<F: PrimeField> Clone for Curve<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: PrimeField> fmt::Debug for Curve<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Curve")
            .field("a", &self.0.a)
            .field("b", &self.0.b)
            .field("coordinate_system", &self.0.coordinate_system)
            .finish()
    }
}

impl<F: PrimeField> PartialEq for Curve<F> {
    fn eq(&self, other: &Self) -> bool {
        // the field is fixed by `F`, so only the coefficients can differ
        Arc::ptr_eq(&self.0, &other.0) || (self.0.a == other.0.a && self.0.b == other.0.b)
    }
}

impl<F: PrimeField> Eq for Curve<F> {}

impl<F: PrimeField> Hash for Curve<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<F: PrimeField> Curve<F> {
    pub fn new(a: F, b: F, coordinate_system: CoordinateSystem) -> Self {
        Self::with_parts(a, b, coordinate_system, Arc::new(FixedWindowMultiplier))
    }

    fn with_parts(
        a: F,
        b: F,
        coordinate_system: CoordinateSystem,
        multiplier: Arc<dyn ScalarMultiplier<F>>,
    ) -> Self {
        debug!(?coordinate_system, "constructing curve");
        Self(Arc::new(CurveInner {
            a,
            b,
            coordinate_system,
            multiplier,
        }))
    }

    pub fn from_params(params: &CurveParams) -> Result<Self, PointError> {
        let a = parse_coefficient::<F>("a", &params.a)?;
        let b = parse_coefficient::<F>("b", &params.b)?;
        Ok(Self::new(a, b, params.coordinate_system))
    }

    /// Same curve, different coordinate system. Keeps the multiplier.
    pub fn with_coordinate_system(&self, coordinate_system: CoordinateSystem) -> Self {
        Self::with_parts(
            self.0.a,
            self.0.b,
            coordinate_system,
            Arc::clone(&self.0.multiplier),
        )
    }

    pub fn with_multiplier(&self, multiplier: Arc<dyn ScalarMultiplier<F>>) -> Self {
        Self::with_parts(self.0.a, self.0.b, self.0.coordinate_system, multiplier)
    }

    pub fn a(&self) -> &F {
        &self.0.a
    }

    pub fn b(&self) -> &F {
        &self.0.b
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.0.coordinate_system
    }

    pub fn multiplier(&self) -> &Arc<dyn ScalarMultiplier<F>> {
        &self.0.multiplier
    }

    pub fn infinity(&self) -> Point<F> {
        Point::infinity_on(self.clone())
    }

    /// Creates a point from affine coordinates without checking the curve
    /// equation.
    pub fn create_point(&self, x: F, y: F) -> Point<F> {
        self.create_raw_point(x, y, false)
    }

    pub fn create_raw_point(&self, x: F, y: F, compressed: bool) -> Point<F> {
        Point::affine_on(self.clone(), x, y, compressed)
    }

    /// Re-expresses `point` on this curve and in this curve's coordinate
    /// system.
    pub fn import_point(&self, point: &Point<F>) -> Result<Point<F>, PointError> {
        if let Some(curve) = point.curve() {
            if Arc::ptr_eq(&self.0, &curve.0) {
                return Ok(point.clone());
            }
        }
        if point.is_infinity() {
            return Ok(self.infinity());
        }
        let normalized = point.normalize()?;
        let (x, y) = normalized.finite_coords()?;
        Ok(self.create_raw_point(x, y, point.is_compressed()))
    }

    /// Checks `y^2 = x^3 + a*x + b`.
    pub fn satisfies_equation(&self, x: &F, y: &F) -> bool {
        let lhs = y.square();
        let rhs = (x.square() + self.0.a) * *x + self.0.b;
        lhs == rhs
    }

    /// Brings every non-normalized point in `points` to affine form using a
    /// single field inversion. Infinity and already normalized points are
    /// left as they are.
    pub fn normalize_all(&self, points: &mut [Point<F>]) -> Result<(), PointError> {
        if points.iter().any(|p| p.curve().is_some_and(|c| c != self)) {
            return Err(PointError::InvalidArgument(
                "every point must belong to this curve".to_string(),
            ));
        }
        let indices = points
            .iter()
            .enumerate()
            .filter(|(_, point)| !point.is_normalized())
            .map(|(index, _)| index)
            .collect::<Vec<usize>>();
        if indices.is_empty() {
            return Ok(());
        }
        trace!(count = indices.len(), "batch normalizing points");

        let mut z_inverses = indices
            .iter()
            .map(|&index| points[index].z0())
            .collect::<Vec<F>>();
        batch_invert(&mut z_inverses)?;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let scaled = indices
                .par_iter()
                .zip(z_inverses.par_iter())
                .map(|(&index, z_inv)| points[index].normalize_with(z_inv))
                .collect::<Result<Vec<Point<F>>, PointError>>()?;
            for (index, point) in indices.into_iter().zip(scaled) {
                points[index] = point;
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (index, z_inv) in indices.into_iter().zip(z_inverses.iter()) {
                points[index] = points[index].normalize_with(z_inv)?;
            }
        }
        Ok(())
    }

    pub(crate) fn hash_code(&self) -> u64 {
        hash_of(&F::modulus().to_bytes_be())
            ^ hash_of(&self.0.a).rotate_left(8)
            ^ hash_of(&self.0.b).rotate_left(16)
    }
}

pub(crate) fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Replaces every element by its inverse (Montgomery's trick).
fn batch_invert<F: PrimeField>(values: &mut [F]) -> Result<(), PointError> {
    if values.is_empty() {
        return Ok(());
    }
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for value in values.iter() {
        acc = acc * *value;
        prefix.push(acc);
    }

    let mut inverse = acc.invert().ok_or_else(|| {
        PointError::InvalidState("cannot normalize a point with a zero Z coordinate".to_string())
    })?;
    for i in (1..values.len()).rev() {
        let current = inverse * prefix[i - 1];
        inverse = inverse * values[i];
        values[i] = current;
    }
    values[0] = inverse;
    Ok(())
}

fn parse_coefficient<F: PrimeField>(name: &str, value: &str) -> Result<F, PointError> {
    let digits = value.trim().trim_start_matches("0x");
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&padded).map_err(|e| {
        PointError::InvalidArgument(format!("coefficient {} is not valid hex: {}", name, e))
    })?;
    let number = BigUint::from_bytes_be(&bytes);
    if number >= F::modulus() {
        return Err(PointError::InvalidArgument(format!(
            "coefficient {} is not reduced modulo the field prime",
            name
        )));
    }
    Ok(F::from_biguint(&number))
}
