use crate::arithmetic::{FieldElement, Modular, Modulus, P256Base, Secp256k1Base, Tom256k1Base};
use crate::curve::{CoordinateSystem, Curve};
use crate::field::PrimeField;
use crate::point::Point;
use crate::PointError;

use bigint::{Encoding, U256};
use num_bigint::BigUint;

pub type Secp256k1Field = FieldElement<Secp256k1Base>;
pub type Tom256k1Field = FieldElement<Tom256k1Base>;
pub type P256Field = FieldElement<P256Base>;

const SECP256K1_ORDER: U256 =
    U256::from_be_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
const SECP256K1_GENERATOR_X: U256 =
    U256::from_be_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
const SECP256K1_GENERATOR_Y: U256 =
    U256::from_be_hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");

// tom256k1 is defined over the scalar field of secp256k1 and its group order
// is the secp256k1 base field prime
const TOM256K1_ORDER: U256 =
    U256::from_be_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
const TOM256K1_GENERATOR_X: U256 =
    U256::from_be_hex("ac81a9587b8da43a9519bd50d96191fd8f2c4f66b8f1550e366e3c7f9ed18897");
const TOM256K1_GENERATOR_Y: U256 =
    U256::from_be_hex("6ad7d16db13c428e5dce61c8bfe2b3860a306d201f059826120e7ac684ee209f");

const P256_COEFF_B: U256 =
    U256::from_be_hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
const P256_ORDER: U256 =
    U256::from_be_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
const P256_GENERATOR_X: U256 =
    U256::from_be_hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
const P256_GENERATOR_Y: U256 =
    U256::from_be_hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");

/// A curve together with a base point of known prime order.
#[derive(Clone, Debug)]
pub struct NamedCurve<F: PrimeField> {
    pub name: &'static str,
    pub curve: Curve<F>,
    pub generator: Point<F>,
    pub order: BigUint,
}

impl<F: PrimeField> NamedCurve<F> {
    /// The same curve under another coordinate system.
    pub fn with_coordinate_system(
        &self,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self, PointError> {
        let curve = self.curve.with_coordinate_system(coordinate_system);
        let generator = curve.import_point(&self.generator)?;
        Ok(Self {
            name: self.name,
            curve,
            generator,
            order: self.order.clone(),
        })
    }
}

fn named<M: Modulus>(
    name: &'static str,
    a: FieldElement<M>,
    b: FieldElement<M>,
    generator: (U256, U256),
    order: U256,
    coordinate_system: CoordinateSystem,
) -> NamedCurve<FieldElement<M>> {
    let curve = Curve::new(a, b, coordinate_system);
    let generator = curve.create_point(
        FieldElement::new(generator.0),
        FieldElement::new(generator.1),
    );
    NamedCurve {
        name,
        curve,
        generator,
        order: BigUint::from_bytes_be(&order.to_be_bytes()),
    }
}

pub fn secp256k1(coordinate_system: CoordinateSystem) -> NamedCurve<Secp256k1Field> {
    named(
        "secp256k1",
        FieldElement::ZERO,
        FieldElement::from_u64(7),
        (SECP256K1_GENERATOR_X, SECP256K1_GENERATOR_Y),
        SECP256K1_ORDER,
        coordinate_system,
    )
}

pub fn tom256k1(coordinate_system: CoordinateSystem) -> NamedCurve<Tom256k1Field> {
    named(
        "tom256k1",
        FieldElement::ZERO,
        FieldElement::from_u64(7),
        (TOM256K1_GENERATOR_X, TOM256K1_GENERATOR_Y),
        TOM256K1_ORDER,
        coordinate_system,
    )
}

/// NIST P-256, an `a = -3` curve.
pub fn p256(coordinate_system: CoordinateSystem) -> NamedCurve<P256Field> {
    named(
        "P-256",
        -FieldElement::from_u64(3),
        FieldElement::new(P256_COEFF_B),
        (P256_GENERATOR_X, P256_GENERATOR_Y),
        P256_ORDER,
        coordinate_system,
    )
}
