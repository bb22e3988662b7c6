mod encoding;
mod group_law;

use crate::curve::{hash_of, CoordinateSystem, Curve};
use crate::field::PrimeField;
use crate::multiplier::PrecompSlot;
use crate::PointError;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// An immutable point on a short Weierstrass curve over a prime field.
///
/// The meaning of `x`, `y` and the extra `zs` coordinates is fixed by the
/// coordinate system of the owning curve. A point without a curve is
/// "detached": always affine and always normalized.
#[derive(Debug, Clone)]
pub struct Point<F: PrimeField> {
    curve: Option<Curve<F>>,
    x: Option<F>,
    y: Option<F>,
    zs: Vec<F>,
    // Jacobian-modified `a * Z^4`, derived from `zs[0]` on first use
    w: OnceLock<F>,
    compressed: bool,
    precomp: PrecompSlot,
}

impl<F: PrimeField> Point<F> {
    /// Creates a point from affine coordinates, or the point at infinity when
    /// both coordinates are absent.
    pub fn new(
        curve: Option<Curve<F>>,
        x: Option<F>,
        y: Option<F>,
        compressed: bool,
    ) -> Result<Self, PointError> {
        match (x, y) {
            (Some(x), Some(y)) => Ok(match curve {
                Some(curve) => Self::affine_on(curve, x, y, compressed),
                None => Self {
                    compressed,
                    ..Self::detached_from(x, y)
                },
            }),
            (None, None) => Ok(Self {
                compressed,
                ..Self::infinity_with(curve)
            }),
            _ => Err(PointError::InvalidArgument(
                "exactly one of the affine coordinates is missing".to_string(),
            )),
        }
    }

    pub(crate) fn infinity_on(curve: Curve<F>) -> Self {
        Self::infinity_with(Some(curve))
    }

    fn infinity_with(curve: Option<Curve<F>>) -> Self {
        Self {
            curve,
            x: None,
            y: None,
            zs: Vec::new(),
            w: OnceLock::new(),
            compressed: false,
            precomp: PrecompSlot::default(),
        }
    }

    /// Affine input with the initial extra coordinates of the curve's system.
    pub(crate) fn affine_on(curve: Curve<F>, x: F, y: F, compressed: bool) -> Self {
        let system = curve.coordinate_system();
        let zs = vec![F::one(); system.extra_coordinates()];
        let w = match system {
            CoordinateSystem::JacobianModified => OnceLock::from(*curve.a()),
            _ => OnceLock::new(),
        };
        Self {
            curve: Some(curve),
            x: Some(x),
            y: Some(y),
            zs,
            w,
            compressed,
            precomp: PrecompSlot::default(),
        }
    }

    pub(crate) fn projective_on(
        curve: &Curve<F>,
        x: F,
        y: F,
        zs: Vec<F>,
        w: Option<F>,
        compressed: bool,
    ) -> Self {
        Self {
            curve: Some(curve.clone()),
            x: Some(x),
            y: Some(y),
            zs,
            w: w.map_or_else(OnceLock::new, OnceLock::from),
            compressed,
            precomp: PrecompSlot::default(),
        }
    }

    fn detached_from(x: F, y: F) -> Self {
        Self {
            curve: None,
            x: Some(x),
            y: Some(y),
            zs: Vec::new(),
            w: OnceLock::new(),
            compressed: false,
            precomp: PrecompSlot::default(),
        }
    }

    pub fn curve(&self) -> Option<&Curve<F>> {
        self.curve.as_ref()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.curve
            .as_ref()
            .map_or(CoordinateSystem::Affine, Curve::coordinate_system)
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_none()
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Stored x, not normalized.
    pub fn raw_x(&self) -> Option<&F> {
        self.x.as_ref()
    }

    /// Stored y, not normalized.
    pub fn raw_y(&self) -> Option<&F> {
        self.y.as_ref()
    }

    /// The `index`-th extra coordinate. For Jacobian-modified points index 1
    /// is the auxiliary `a * Z^4` term, computed on first access.
    pub fn raw_z(&self, index: usize) -> Option<F> {
        match (self.coordinate_system(), index) {
            (CoordinateSystem::JacobianModified, 1) if !self.is_infinity() => {
                self.curve.as_ref().map(|c| self.jacobian_modified_w(c.a()))
            }
            _ => self.zs.get(index).copied(),
        }
    }

    pub fn z_coords(&self) -> &[F] {
        &self.zs
    }

    pub fn precomp(&self) -> &PrecompSlot {
        &self.precomp
    }

    pub fn affine_x(&self) -> Result<F, PointError> {
        self.check_normalized()?;
        self.finite_coords().map(|(x, _)| x)
    }

    pub fn affine_y(&self) -> Result<F, PointError> {
        self.check_normalized()?;
        self.finite_coords().map(|(_, y)| y)
    }

    fn check_normalized(&self) -> Result<(), PointError> {
        if self.is_normalized() {
            Ok(())
        } else {
            Err(PointError::InvalidState("point not in normal form".to_string()))
        }
    }

    pub(crate) fn finite_coords(&self) -> Result<(F, F), PointError> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(PointError::InvalidState(
                "the point at infinity has no affine coordinates".to_string(),
            )),
        }
    }

    pub(crate) fn z0(&self) -> F {
        self.zs.first().copied().unwrap_or_else(F::one)
    }

    pub(crate) fn jacobian_modified_w(&self, a: &F) -> F {
        *self
            .w
            .get_or_init(|| group_law::jacobian_modified_w(a, &self.z0(), None))
    }

    pub(crate) fn require_curve(&self) -> Result<&Curve<F>, PointError> {
        self.curve
            .as_ref()
            .ok_or_else(|| PointError::InvalidState("detached point has no curve".to_string()))
    }

    /// Same coordinates, fresh precomputation slot.
    pub(crate) fn without_precomp(&self) -> Self {
        Self {
            precomp: PrecompSlot::default(),
            ..self.clone()
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.coordinate_system().is_affine_family() || self.is_infinity() || self.z0().is_one()
    }

    /// The same point with its first extra coordinate scaled to one.
    pub fn normalize(&self) -> Result<Self, PointError> {
        if self.is_normalized() {
            return Ok(self.clone());
        }
        let z_inv = self.z0().invert().ok_or_else(|| {
            PointError::InvalidState("cannot normalize a point with a zero Z coordinate".to_string())
        })?;
        self.normalize_with(&z_inv)
    }

    pub(crate) fn normalize_with(&self, z_inv: &F) -> Result<Self, PointError> {
        match self.coordinate_system() {
            CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
                self.scaled(z_inv, z_inv)
            }
            CoordinateSystem::Jacobian
            | CoordinateSystem::JacobianChudnovsky
            | CoordinateSystem::JacobianModified => {
                let z_inv2 = z_inv.square();
                self.scaled(&z_inv2, &(z_inv2 * *z_inv))
            }
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => Err(
                PointError::InvalidState("not a projective coordinate system".to_string()),
            ),
        }
    }

    fn scaled(&self, sx: &F, sy: &F) -> Result<Self, PointError> {
        let curve = self.require_curve()?;
        let (x, y) = self.finite_coords()?;
        Ok(curve.create_raw_point(x * *sx, y * *sy, self.compressed))
    }

    /// Normalized copy with the curve stripped, comparable and hashable
    /// independently of the originating curve handle.
    pub fn detached(&self) -> Result<Self, PointError> {
        let normalized = self.normalize()?;
        Ok(match (normalized.x, normalized.y) {
            (Some(x), Some(y)) => Self::detached_from(x, y),
            _ => Self::infinity_with(None),
        })
    }

    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }
        let curve = match &self.curve {
            Some(curve) => curve,
            None => return false,
        };
        match self.normalize().and_then(|p| p.finite_coords()) {
            Ok((x, y)) => curve.satisfies_equation(&x, &y),
            Err(_) => false,
        }
    }

    /// Group equality: same affine point on equal curves, whatever the
    /// coordinate systems involved.
    pub fn equals(&self, other: &Self) -> bool {
        let (no_curve1, no_curve2) = (self.curve.is_none(), other.curve.is_none());
        let (inf1, inf2) = (self.is_infinity(), other.is_infinity());
        if inf1 || inf2 {
            return inf1 && inf2 && (no_curve1 || no_curve2 || self.curve == other.curve);
        }

        let comparable = match (&self.curve, &other.curve) {
            (None, None) => Ok((self.clone(), other.clone())),
            (None, Some(_)) => other.normalize().map(|p| (self.clone(), p)),
            (Some(_), None) => self.normalize().map(|p| (p, other.clone())),
            (Some(c1), Some(c2)) => {
                if c1 != c2 {
                    return false;
                }
                c1.import_point(other).and_then(|imported| {
                    let mut points = [self.clone(), imported];
                    c1.normalize_all(&mut points)?;
                    let [p1, p2] = points;
                    Ok((p1, p2))
                })
            }
        };

        match comparable {
            Ok((p1, p2)) => p1.x == p2.x && p1.y == p2.y,
            Err(_) => false,
        }
    }

    /// Combines the curve hash with the normalized coordinates, so that
    /// points on curve handles that compare equal hash alike.
    ///
    /// A detached point contributes no curve hash, so an attached point and
    /// its detached copy differ here. The `Hash` impl ignores the curve and
    /// agrees with `equals` across both kinds.
    pub fn hash_code(&self) -> u64 {
        let mut hc = self.curve.as_ref().map_or(0, |c| !c.hash_code());
        if !self.is_infinity() {
            if let Ok((x, y)) = self.normalize().and_then(|p| p.finite_coords()) {
                hc ^= hash_of(&x).wrapping_mul(17);
                hc ^= hash_of(&y).wrapping_mul(257);
            }
        }
        hc
    }

    /// Raw-coordinate identity, used to route `P + P` to doubling.
    pub(crate) fn same_coordinates(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.x == other.x && self.y == other.y && self.zs == other.zs)
    }
}

impl<F: PrimeField> PartialEq for Point<F> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<F: PrimeField> Eq for Point<F> {}

// Equal curves share `F`, so the normalized coordinates alone are
// consistent with `equals`, detached points included.
impl<F: PrimeField> Hash for Point<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.normalize().and_then(|p| p.finite_coords()) {
            Ok((x, y)) => {
                state.write_u8(1);
                x.hash(state);
                y.hash(state);
            }
            Err(_) => state.write_u8(0),
        }
    }
}

impl<F: PrimeField> fmt::Display for Point<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => {
                write!(f, "({},{}", x, y)?;
                for z in &self.zs {
                    write!(f, ",{}", z)?;
                }
                write!(f, ")")
            }
            _ => write!(f, "INF"),
        }
    }
}
