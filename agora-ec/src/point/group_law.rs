use super::Point;
use crate::curve::{CoordinateSystem, Curve};
use crate::field::PrimeField;
use crate::PointError;

use num_bigint::BigInt;
use tracing::debug;

use std::borrow::Cow;

fn two<F: PrimeField>(x: F) -> F {
    x + x
}

fn three<F: PrimeField>(x: F) -> F {
    two(x) + x
}

fn four<F: PrimeField>(x: F) -> F {
    two(two(x))
}

fn eight<F: PrimeField>(x: F) -> F {
    four(two(x))
}

fn is_minus_three<F: PrimeField>(a: &F) -> bool {
    -*a == F::from_u64(3)
}

fn inverse_of<F: PrimeField>(value: &F) -> Result<F, PointError> {
    value
        .invert()
        .ok_or_else(|| PointError::InvalidState("attempted to invert zero".to_string()))
}

/// `a * Z^4`, reusing `Z^2` when the caller already has it.
pub(crate) fn jacobian_modified_w<F: PrimeField>(a: &F, z: &F, z_squared: Option<F>) -> F {
    if a.is_zero() || z.is_one() {
        return *a;
    }
    let z_squared = z_squared.unwrap_or_else(|| z.square());
    z_squared.square() * *a
}

fn unsupported<F: PrimeField>(system: CoordinateSystem) -> Result<Point<F>, PointError> {
    debug!(?system, "no group law formula for coordinate system");
    Err(PointError::UnsupportedOperation(system))
}

impl<F: PrimeField> Point<F> {
    /// Brings `other` onto `curve` in the same coordinate system, borrowing
    /// it when that is already the case.
    fn operand<'a>(&self, curve: &Curve<F>, other: &'a Self) -> Result<Cow<'a, Self>, PointError> {
        match other.curve() {
            Some(c) if c != curve => Err(PointError::InvalidArgument(
                "points belong to different curves".to_string(),
            )),
            Some(c) if c.coordinate_system() == curve.coordinate_system() => {
                Ok(Cow::Borrowed(other))
            }
            _ => curve.import_point(other).map(Cow::Owned),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, PointError> {
        let curve = self.require_curve()?;
        let other = self.operand(curve, other)?;
        if self.is_infinity() {
            return Ok(other.into_owned());
        }
        if other.is_infinity() {
            return Ok(self.clone());
        }
        if self.same_coordinates(&other) {
            return self.twice();
        }

        let (x1, y1) = self.finite_coords()?;
        let (x2, y2) = other.finite_coords()?;
        match curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let dx = x2 - x1;
                let dy = y2 - y1;
                if dx.is_zero() {
                    if dy.is_zero() {
                        return self.twice();
                    }
                    return Ok(curve.infinity());
                }
                let gamma = dy * inverse_of(&dx)?;
                let x3 = gamma.square() - x1 - x2;
                let y3 = gamma * (x1 - x3) - y1;
                Ok(curve.create_raw_point(x3, y3, self.compressed))
            }
            CoordinateSystem::Homogeneous => {
                let z1 = self.z0();
                let z2 = other.z0();
                let z1_is_one = z1.is_one();
                let z2_is_one = z2.is_one();

                let u1 = if z1_is_one { y2 } else { y2 * z1 };
                let u2 = if z2_is_one { y1 } else { y1 * z2 };
                let u = u1 - u2;
                let v1 = if z1_is_one { x2 } else { x2 * z1 };
                let v2 = if z2_is_one { x1 } else { x1 * z2 };
                let v = v1 - v2;

                if v.is_zero() {
                    if u.is_zero() {
                        return self.twice();
                    }
                    return Ok(curve.infinity());
                }

                let w = match (z1_is_one, z2_is_one) {
                    (true, _) => z2,
                    (false, true) => z1,
                    (false, false) => z1 * z2,
                };
                let v_squared = v.square();
                let v_cubed = v_squared * v;
                let v_squared_v2 = v_squared * v2;
                let a = u.square() * w - v_cubed - two(v_squared_v2);

                let x3 = v * a;
                let y3 = (v_squared_v2 - a) * u - v_cubed * u2;
                let z3 = v_cubed * w;
                Ok(Self::projective_on(
                    curve,
                    x3,
                    y3,
                    vec![z3],
                    None,
                    self.compressed,
                ))
            }
            system @ (CoordinateSystem::Jacobian | CoordinateSystem::JacobianModified) => {
                let z1 = self.z0();
                let z2 = other.z0();
                let z1_is_one = z1.is_one();

                let (x3, y3, z3, z3_squared) = if !z1_is_one && z1 == z2 {
                    // co-Z addition
                    let dx = x1 - x2;
                    let dy = y1 - y2;
                    if dx.is_zero() {
                        if dy.is_zero() {
                            return self.twice();
                        }
                        return Ok(curve.infinity());
                    }

                    let c = dx.square();
                    let w1 = x1 * c;
                    let w2 = x2 * c;
                    let a1 = (w1 - w2) * y1;

                    let x3 = dy.square() - w1 - w2;
                    let y3 = (w1 - x3) * dy - a1;
                    (x3, y3, dx * z1, None)
                } else {
                    let (u2, s2) = if z1_is_one {
                        (x2, y2)
                    } else {
                        let z1_squared = z1.square();
                        (z1_squared * x2, z1_squared * z1 * y2)
                    };
                    let z2_is_one = z2.is_one();
                    let (u1, s1) = if z2_is_one {
                        (x1, y1)
                    } else {
                        let z2_squared = z2.square();
                        (z2_squared * x1, z2_squared * z2 * y1)
                    };

                    let h = u1 - u2;
                    let r = s1 - s2;
                    if h.is_zero() {
                        if r.is_zero() {
                            return self.twice();
                        }
                        return Ok(curve.infinity());
                    }

                    let h_squared = h.square();
                    let g = h_squared * h;
                    let v = h_squared * u1;

                    let x3 = r.square() + g - two(v);
                    let y3 = (v - x3) * r - s1 * g;

                    let mut z3 = h;
                    if !z1_is_one {
                        z3 = z3 * z1;
                    }
                    if !z2_is_one {
                        z3 = z3 * z2;
                    }
                    let z3_squared = if z3 == h { Some(h_squared) } else { None };
                    (x3, y3, z3, z3_squared)
                };

                let w3 = match system {
                    CoordinateSystem::JacobianModified => {
                        Some(jacobian_modified_w(curve.a(), &z3, z3_squared))
                    }
                    _ => None,
                };
                Ok(Self::projective_on(
                    curve,
                    x3,
                    y3,
                    vec![z3],
                    w3,
                    self.compressed,
                ))
            }
            system => unsupported(system),
        }
    }

    pub fn twice(&self) -> Result<Self, PointError> {
        let curve = self.require_curve()?;
        let (x1, y1) = match (self.x, self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => return Ok(self.clone()),
        };
        if y1.is_zero() {
            return Ok(curve.infinity());
        }

        let a = *curve.a();
        match curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let gamma = (three(x1.square()) + a) * inverse_of(&two(y1))?;
                let x3 = gamma.square() - two(x1);
                let y3 = gamma * (x1 - x3) - y1;
                Ok(curve.create_raw_point(x3, y3, self.compressed))
            }
            CoordinateSystem::Homogeneous => {
                let z1 = self.z0();
                let z1_is_one = z1.is_one();

                let w = if z1_is_one {
                    three(x1.square()) + a
                } else if is_minus_three(&a) {
                    three((x1 - z1) * (x1 + z1))
                } else if a.is_zero() {
                    three(x1.square())
                } else {
                    a * z1.square() + three(x1.square())
                };

                let s = if z1_is_one { y1 } else { y1 * z1 };
                let t = if z1_is_one { y1.square() } else { s * y1 };
                let b = x1 * t;
                let four_b = four(b);
                let h = w.square() - two(four_b);
                let two_s = two(s);
                let x3 = h * two_s;
                let two_t = two(t);
                let y3 = (four_b - h) * w - two(two_t.square());
                let four_s_squared = if z1_is_one {
                    two(two_t)
                } else {
                    two_s.square()
                };
                let z3 = two(four_s_squared) * s;
                Ok(Self::projective_on(
                    curve,
                    x3,
                    y3,
                    vec![z3],
                    None,
                    self.compressed,
                ))
            }
            CoordinateSystem::Jacobian => {
                let z1 = self.z0();
                let z1_is_one = z1.is_one();

                let y1_squared = y1.square();
                let t = y1_squared.square();

                let m = if is_minus_three(&a) {
                    let z1_squared = if z1_is_one { z1 } else { z1.square() };
                    three((x1 + z1_squared) * (x1 - z1_squared))
                } else {
                    let m = three(x1.square());
                    if z1_is_one {
                        m + a
                    } else if a.is_zero() {
                        m
                    } else {
                        m + z1.square().square() * a
                    }
                };
                let s = four(x1 * y1_squared);

                let x3 = m.square() - two(s);
                let y3 = (s - x3) * m - eight(t);
                let z3 = if z1_is_one { two(y1) } else { two(y1) * z1 };
                Ok(Self::projective_on(
                    curve,
                    x3,
                    y3,
                    vec![z3],
                    None,
                    self.compressed,
                ))
            }
            CoordinateSystem::JacobianModified => Ok(self.twice_jacobian_modified(curve, true)),
            system => unsupported(system),
        }
    }

    /// Jacobian-modified doubling. The auxiliary term of the result is left
    /// to be derived lazily when `calculate_w` is false.
    fn twice_jacobian_modified(&self, curve: &Curve<F>, calculate_w: bool) -> Self {
        // callers rule out infinity
        let (x1, y1) = (self.x.unwrap_or_else(F::zero), self.y.unwrap_or_else(F::zero));
        let z1 = self.z0();
        let w1 = self.jacobian_modified_w(curve.a());

        let m = three(x1.square()) + w1;
        let two_y1 = two(y1);
        let two_y1_squared = two_y1 * y1;
        let s = two(x1 * two_y1_squared);
        let x3 = m.square() - two(s);
        let four_t = two_y1_squared.square();
        let eight_t = two(four_t);
        let y3 = m * (s - x3) - eight_t;
        let w3 = if calculate_w {
            Some(two(eight_t * w1))
        } else {
            None
        };
        let z3 = if z1.is_one() { two_y1 } else { two_y1 * z1 };
        Self::projective_on(curve, x3, y3, vec![z3], w3, self.compressed)
    }

    /// `2 * self + other`.
    pub fn twice_plus(&self, other: &Self) -> Result<Self, PointError> {
        let curve = self.require_curve()?;
        let other = self.operand(curve, other)?;
        if self.same_coordinates(&other) {
            return self.three_times();
        }
        if self.is_infinity() {
            return Ok(other.into_owned());
        }
        if other.is_infinity() {
            return self.twice();
        }
        let (x1, y1) = self.finite_coords()?;
        if y1.is_zero() {
            return Ok(other.into_owned());
        }

        match curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let (x2, y2) = other.finite_coords()?;
                let dx = x2 - x1;
                let dy = y2 - y1;
                if dx.is_zero() {
                    if dy.is_zero() {
                        return self.three_times();
                    }
                    // other is -self
                    return Ok(self.clone());
                }

                // a single inversion covers both slopes
                let xx = dx.square();
                let yy = dy.square();
                let d = xx * (two(x1) + x2) - yy;
                if d.is_zero() {
                    return Ok(curve.infinity());
                }
                let i = inverse_of(&(d * dx))?;
                let l1 = d * i * dy;
                let l2 = two(y1) * xx * dx * i - l1;
                let x4 = (l2 - l1) * (l1 + l2) + x2;
                let y4 = (x1 - x4) * l2 - y1;
                Ok(curve.create_raw_point(x4, y4, self.compressed))
            }
            CoordinateSystem::JacobianModified => {
                self.twice_jacobian_modified(curve, false).add(&other)
            }
            _ => self.twice()?.add(&other),
        }
    }

    pub fn three_times(&self) -> Result<Self, PointError> {
        let curve = self.require_curve()?;
        let (x1, y1) = match (self.x, self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => return Ok(self.clone()),
        };
        if y1.is_zero() {
            return Ok(self.clone());
        }

        match curve.coordinate_system() {
            CoordinateSystem::Affine => {
                let two_y1 = two(y1);
                let xx = two_y1.square();
                let z = three(x1.square()) + *curve.a();
                let zz = z.square();
                let d = three(x1) * xx - zz;
                if d.is_zero() {
                    return Ok(curve.infinity());
                }
                let i = inverse_of(&(d * two_y1))?;
                let l1 = d * i * z;
                let l2 = xx.square() * i - l1;
                let x4 = (l2 - l1) * (l1 + l2) + x1;
                let y4 = (x1 - x4) * l2 - y1;
                Ok(curve.create_raw_point(x4, y4, self.compressed))
            }
            CoordinateSystem::JacobianModified => {
                self.twice_jacobian_modified(curve, false).add(self)
            }
            _ => self.twice()?.add(self),
        }
    }

    /// Mirrors `y`. Extra coordinates, including the Jacobian-modified
    /// auxiliary term, carry over unchanged.
    pub fn negate(&self) -> Self {
        match self.y {
            Some(y) => Self {
                y: Some(-y),
                precomp: Default::default(),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    pub fn subtract(&self, other: &Self) -> Result<Self, PointError> {
        if other.is_infinity() {
            return Ok(self.clone());
        }
        self.add(&other.negate())
    }

    /// `2^e * self` through a run of Jacobian-modified doublings, whatever the
    /// coordinate system of the input.
    pub fn times_pow2(&self, e: i32) -> Result<Self, PointError> {
        if e < 0 {
            return Err(PointError::InvalidArgument(format!(
                "doubling count cannot be negative, got {}",
                e
            )));
        }
        if e == 0 || self.is_infinity() {
            return Ok(self.clone());
        }
        if e == 1 {
            return self.twice();
        }

        let curve = self.require_curve()?;
        let system = curve.coordinate_system();
        if !matches!(
            system,
            CoordinateSystem::Affine
                | CoordinateSystem::Homogeneous
                | CoordinateSystem::Jacobian
                | CoordinateSystem::JacobianModified
        ) {
            return unsupported(system);
        }

        let (mut x1, mut y1) = self.finite_coords()?;
        if y1.is_zero() {
            return Ok(curve.infinity());
        }

        let a = *curve.a();
        let mut z1 = self.z0();
        let mut w1 = a;
        if !z1.is_one() {
            match system {
                CoordinateSystem::Homogeneous => {
                    let z1_squared = z1.square();
                    x1 = x1 * z1;
                    y1 = y1 * z1_squared;
                    w1 = jacobian_modified_w(&a, &z1, Some(z1_squared));
                }
                CoordinateSystem::Jacobian => w1 = jacobian_modified_w(&a, &z1, None),
                CoordinateSystem::JacobianModified => w1 = self.jacobian_modified_w(&a),
                _ => {}
            }
        }

        for _ in 0..e {
            if y1.is_zero() {
                return Ok(curve.infinity());
            }
            let mut m = three(x1.square());
            let two_y1 = two(y1);
            let two_y1_squared = two_y1 * y1;
            let s = two(x1 * two_y1_squared);
            let four_t = two_y1_squared.square();
            let eight_t = two(four_t);

            if !w1.is_zero() {
                m = m + w1;
                w1 = two(eight_t * w1);
            }

            x1 = m.square() - two(s);
            y1 = m * (s - x1) - eight_t;
            z1 = if z1.is_one() { two_y1 } else { two_y1 * z1 };
        }

        match system {
            CoordinateSystem::Affine => {
                let z_inv = inverse_of(&z1)?;
                let z_inv2 = z_inv.square();
                let z_inv3 = z_inv2 * z_inv;
                Ok(curve.create_raw_point(x1 * z_inv2, y1 * z_inv3, self.compressed))
            }
            CoordinateSystem::Homogeneous => Ok(Self::projective_on(
                curve,
                x1 * z1,
                y1,
                vec![z1 * z1.square()],
                None,
                self.compressed,
            )),
            CoordinateSystem::Jacobian => Ok(Self::projective_on(
                curve,
                x1,
                y1,
                vec![z1],
                None,
                self.compressed,
            )),
            _ => Ok(Self::projective_on(
                curve,
                x1,
                y1,
                vec![z1],
                Some(w1),
                self.compressed,
            )),
        }
    }

    /// Hands the work to the curve's scalar multiplier.
    pub fn multiply(&self, k: &BigInt) -> Result<Self, PointError> {
        self.require_curve()?.multiplier().multiply(self, k)
    }
}

impl<F: PrimeField> std::ops::Neg for Point<F> {
    type Output = Self;
    fn neg(self) -> Self {
        self.negate()
    }
}

impl<F: PrimeField> std::ops::Neg for &Point<F> {
    type Output = Point<F>;
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arithmetic::{FieldElement, Modulus};
    use bigint::U256;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Mod23;

    impl Modulus for Mod23 {
        const PRIME_MODULUS: U256 = U256::from_u32(23);
    }

    type Fe = FieldElement<Mod23>;

    fn fe(n: u64) -> Fe {
        Fe::from_u64(n)
    }

    fn curve(system: CoordinateSystem) -> Curve<Fe> {
        Curve::new(fe(1), fe(1), system)
    }

    fn affine(point: &Point<Fe>) -> (Fe, Fe) {
        let n = point.normalize().unwrap();
        (n.affine_x().unwrap(), n.affine_y().unwrap())
    }

    const IMPLEMENTED: [CoordinateSystem; 4] = [
        CoordinateSystem::Affine,
        CoordinateSystem::Homogeneous,
        CoordinateSystem::Jacobian,
        CoordinateSystem::JacobianModified,
    ];

    #[test]
    fn small_curve_multiples() {
        for system in IMPLEMENTED {
            let p = curve(system).create_point(fe(3), fe(10));
            let p2 = p.twice().unwrap();
            let p3 = p2.add(&p).unwrap();
            let p4 = p.times_pow2(2).unwrap();
            let p5 = p4.add(&p).unwrap();

            assert_eq!(affine(&p2), (fe(7), fe(12)), "{:?}", system);
            assert_eq!(affine(&p3), (fe(19), fe(5)), "{:?}", system);
            assert_eq!(affine(&p.three_times().unwrap()), (fe(19), fe(5)));
            assert_eq!(affine(&p4), (fe(17), fe(3)), "{:?}", system);
            assert_eq!(affine(&p2.twice_plus(&p).unwrap()), (fe(9), fe(16)));
            assert_eq!(affine(&p.twice_plus(&p2).unwrap()), (fe(17), fe(3)));
            // 2P + (-2P)
            assert!(p.twice_plus(&p2.negate()).unwrap().is_infinity(), "{:?}", system);
            assert_eq!(affine(&p5), (fe(9), fe(16)), "{:?}", system);
            assert_eq!(affine(&p.negate()), (fe(3), fe(13)));
            assert_eq!(p.add(&p.negate()).unwrap(), p.curve().unwrap().infinity());
            assert!(p5.is_on_curve());
        }
    }

    #[test]
    fn co_z_addition() {
        let c = curve(CoordinateSystem::Jacobian);
        // P = (3, 10) and 2P = (7, 12), both scaled by Z = 2
        let p = Point::projective_on(&c, fe(12), fe(11), vec![fe(2)], None, false);
        let p2 = Point::projective_on(&c, fe(5), fe(4), vec![fe(2)], None, false);
        assert_eq!(affine(&p), (fe(3), fe(10)));
        assert_eq!(affine(&p2), (fe(7), fe(12)));

        let p3 = p.add(&p2).unwrap();
        assert_eq!(affine(&p3), (fe(19), fe(5)));
        assert_eq!(p3.z_coords(), &[fe(2) * (fe(12) - fe(5))]);

        // -P = (3, 13) scaled by Z = 2
        let minus_p = Point::projective_on(&c, fe(12), fe(12), vec![fe(2)], None, false);
        assert!(p.add(&minus_p).unwrap().is_infinity());
        assert_eq!(minus_p, p.negate());
    }

    #[test]
    fn a_minus_three_doubling() {
        // y^2 = x^3 - 3x + 3 through (1, 1)
        let a = -fe(3);
        for system in IMPLEMENTED {
            let c = Curve::new(a, fe(3), system);
            let p = c.create_point(fe(1), fe(1));
            assert!(p.is_on_curve());
            let mut expected =
                Curve::new(a, fe(3), CoordinateSystem::Affine).create_point(fe(1), fe(1));

            let mut current = p;
            for _ in 0..4 {
                current = current.twice().unwrap();
                expected = expected.twice().unwrap();
                assert_eq!(current, expected, "{:?}", system);
                assert!(current.is_on_curve());
            }
        }
    }

    #[test]
    fn two_torsion() {
        // x^3 + 1 vanishes at x = -1
        for system in IMPLEMENTED {
            let c = Curve::new(fe(0), fe(1), system);
            let t = c.create_point(-fe(1), fe(0));
            assert!(t.is_on_curve());
            assert!(t.twice().unwrap().is_infinity());
            assert_eq!(t.three_times().unwrap(), t);
            assert!(t.times_pow2(3).unwrap().is_infinity());
            let q = c.create_point(fe(0), fe(1));
            assert_eq!(t.twice_plus(&q).unwrap(), q);
        }
    }

    #[test]
    fn infinity_edge_cases() {
        for system in IMPLEMENTED {
            let c = curve(system);
            let inf = c.infinity();
            let p = c.create_point(fe(3), fe(10));
            assert_eq!(inf.add(&p).unwrap(), p);
            assert_eq!(p.add(&inf).unwrap(), p);
            assert!(inf.twice().unwrap().is_infinity());
            assert!(inf.three_times().unwrap().is_infinity());
            assert!(inf.negate().is_infinity());
            assert!(inf.times_pow2(5).unwrap().is_infinity());
            assert_eq!(inf.twice_plus(&p).unwrap(), p);
            assert_eq!(p.twice_plus(&inf).unwrap(), p.twice().unwrap());
            assert_eq!(p.subtract(&inf).unwrap(), p);
            assert!(p.subtract(&p).unwrap().is_infinity());
        }
    }

    #[test]
    fn times_pow2_matches_repeated_doubling() {
        for system in IMPLEMENTED {
            let p = curve(system).create_point(fe(3), fe(10));
            let mut expected = p.clone();
            for e in 0..8 {
                assert_eq!(p.times_pow2(e).unwrap(), expected, "{:?} e = {}", system, e);
                expected = expected.twice().unwrap();
            }
            assert_eq!(p.times_pow2(0).unwrap().raw_x(), p.raw_x());
            assert!(matches!(
                p.times_pow2(-1),
                Err(PointError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn jacobian_modified_aux_term_follows_z() {
        let c = curve(CoordinateSystem::JacobianModified);
        let mut p = c.create_point(fe(3), fe(10));
        for _ in 0..5 {
            p = p.twice().unwrap();
            let z = p.raw_z(0).unwrap();
            assert_eq!(p.raw_z(1), Some(z.square().square()));
        }
        let sum = p.add(&c.create_point(fe(3), fe(10))).unwrap();
        let z = sum.raw_z(0).unwrap();
        assert_eq!(sum.raw_z(1), Some(z.square().square()));
    }

    #[test]
    fn unsupported_systems() {
        for system in [
            CoordinateSystem::JacobianChudnovsky,
            CoordinateSystem::LambdaAffine,
            CoordinateSystem::LambdaProjective,
        ] {
            let c = curve(system);
            let p = c.create_point(fe(3), fe(10));
            let q = c.create_point(fe(7), fe(12));
            assert_eq!(p.add(&q), Err(PointError::UnsupportedOperation(system)));
            assert_eq!(p.twice(), Err(PointError::UnsupportedOperation(system)));
            assert_eq!(p.times_pow2(2), Err(PointError::UnsupportedOperation(system)));
            assert_eq!(p.three_times(), Err(PointError::UnsupportedOperation(system)));

            // negation and normalization need no group law
            assert_eq!(p.negate().raw_y(), Some(&fe(13)));
            assert_eq!(p.negate().negate().raw_y(), Some(&fe(10)));
            assert!(p.normalize().unwrap().is_normalized());
            // infinity and identity shortcuts still apply
            assert_eq!(c.infinity().add(&q).unwrap().raw_x(), Some(&fe(7)));
        }
    }

    #[test]
    fn mixed_coordinate_systems() {
        let jacobian = curve(CoordinateSystem::Jacobian).create_point(fe(3), fe(10));
        let homogeneous = curve(CoordinateSystem::Homogeneous)
            .create_point(fe(3), fe(10))
            .twice()
            .unwrap();
        let sum = jacobian.add(&homogeneous).unwrap();
        assert_eq!(
            sum.curve().unwrap().coordinate_system(),
            CoordinateSystem::Jacobian
        );
        assert_eq!(affine(&sum), (fe(19), fe(5)));

        let foreign = Curve::new(fe(2), fe(1), CoordinateSystem::Jacobian).create_point(fe(1), fe(2));
        assert!(matches!(
            jacobian.add(&foreign),
            Err(PointError::InvalidArgument(_))
        ));
    }

    #[test]
    fn detached_points_have_no_group_law() {
        let d = curve(CoordinateSystem::Affine)
            .create_point(fe(3), fe(10))
            .detached()
            .unwrap();
        assert!(matches!(d.twice(), Err(PointError::InvalidState(_))));
        assert!(matches!(d.add(&d), Err(PointError::InvalidState(_))));
        assert_eq!(d.negate().raw_y(), Some(&fe(13)));
        assert_eq!((-&d).raw_y(), Some(&fe(13)));
    }
}
