use super::Point;
use crate::curve::Curve;
use crate::field::PrimeField;
use crate::PointError;

use serde::{Deserializer, Serialize, Serializer};

const INFINITY: u8 = 0x00;
const COMPRESSED_EVEN: u8 = 0x02;
const COMPRESSED_ODD: u8 = 0x03;
const UNCOMPRESSED: u8 = 0x04;

impl<F: PrimeField> Point<F> {
    /// SEC1 octet string of the point, compressed or not as the point was
    /// created.
    pub fn encode(&self) -> Result<Vec<u8>, PointError> {
        self.encoded(self.compressed)
    }

    pub fn encoded(&self, compressed: bool) -> Result<Vec<u8>, PointError> {
        if self.is_infinity() {
            return Ok(vec![INFINITY]);
        }

        let (x, y) = self.normalize()?.finite_coords()?;
        let x_bytes = x.to_be_bytes();
        let mut encoded = Vec::with_capacity(1 + 2 * x_bytes.len());
        if compressed {
            encoded.push(if y.test_bit_zero() {
                COMPRESSED_ODD
            } else {
                COMPRESSED_EVEN
            });
            encoded.extend_from_slice(&x_bytes);
        } else {
            encoded.push(UNCOMPRESSED);
            encoded.extend_from_slice(&x_bytes);
            encoded.extend_from_slice(&y.to_be_bytes());
        }
        Ok(encoded)
    }
}

impl<F: PrimeField> Serialize for Point<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serdect::slice::serialize_hex_lower_or_bin(&encoded, serializer)
    }
}

fn invalid(reason: &str) -> PointError {
    PointError::InvalidArgument(format!("invalid point encoding: {}", reason))
}

impl<F: PrimeField> Curve<F> {
    /// Inverse of [`Point::encoded`]. Finite points must satisfy the curve
    /// equation.
    pub fn decode_point(&self, bytes: &[u8]) -> Result<Point<F>, PointError> {
        let (&prefix, body) = bytes.split_first().ok_or_else(|| invalid("empty input"))?;
        let len = F::encoded_len();

        let point = match prefix {
            INFINITY => {
                if !body.is_empty() {
                    return Err(invalid("trailing bytes after the infinity marker"));
                }
                return Ok(self.infinity());
            }
            COMPRESSED_EVEN | COMPRESSED_ODD => {
                if body.len() != len {
                    return Err(invalid("wrong length for a compressed point"));
                }
                let x = F::from_be_bytes(body).ok_or_else(|| invalid("x is out of range"))?;
                let rhs = (x.square() + *self.a()) * x + *self.b();
                let mut y = rhs
                    .sqrt()
                    .ok_or_else(|| invalid("x is not the abscissa of a curve point"))?;
                if y.test_bit_zero() != (prefix == COMPRESSED_ODD) {
                    y = -y;
                }
                self.create_raw_point(x, y, true)
            }
            UNCOMPRESSED => {
                if body.len() != 2 * len {
                    return Err(invalid("wrong length for an uncompressed point"));
                }
                let (x_bytes, y_bytes) = body.split_at(len);
                let x = F::from_be_bytes(x_bytes).ok_or_else(|| invalid("x is out of range"))?;
                let y = F::from_be_bytes(y_bytes).ok_or_else(|| invalid("y is out of range"))?;
                self.create_raw_point(x, y, false)
            }
            other => return Err(invalid(&format!("unknown prefix {:#04x}", other))),
        };

        if !point.is_on_curve() {
            return Err(invalid("point is not on the curve"));
        }
        Ok(point)
    }

    /// Reads a point written by the `Serialize` impl of [`Point`].
    pub fn deserialize_point<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Point<F>, D::Error> {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        self.decode_point(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use crate::arithmetic::{FieldElement, Modulus};
    use crate::curve::{CoordinateSystem, Curve};
    use crate::field::PrimeField;
    use crate::PointError;
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

    #[test]
    fn known_encodings() {
        let c = curve(CoordinateSystem::Jacobian);
        let p = c.create_point(fe(3), fe(10));
        assert_eq!(p.encoded(false).unwrap(), vec![0x04, 0x03, 0x0a]);
        assert_eq!(p.encoded(true).unwrap(), vec![0x02, 0x03]);
        assert_eq!(c.infinity().encoded(true).unwrap(), vec![0x00]);
        assert_eq!(c.infinity().encoded(false).unwrap(), vec![0x00]);

        // 3P = (19, 5) has odd y, reached in non-normal form
        let p3 = p.three_times().unwrap();
        assert!(!p3.is_normalized());
        assert_eq!(p3.encoded(true).unwrap(), vec![0x03, 0x13]);
        assert_eq!(p3.encoded(false).unwrap(), vec![0x04, 0x13, 0x05]);
    }

    #[test]
    fn decoding_inverts_encoding() {
        let c = curve(CoordinateSystem::JacobianModified);
        let g = c.create_point(fe(3), fe(10));
        let mut p = g.clone();
        // covers P, ..., 28P = O, including the 2-torsion point 14P
        for _ in 0..28 {
            for compressed in [true, false] {
                let decoded = c.decode_point(&p.encoded(compressed).unwrap()).unwrap();
                assert_eq!(decoded, p);
                assert_eq!(decoded.is_compressed(), compressed && !p.is_infinity());
            }
            p = p.add(&g).unwrap();
        }
        assert_eq!(p, g);
    }

    #[test]
    fn decompression_picks_the_right_root() {
        let c = curve(CoordinateSystem::Affine);
        let even = c.decode_point(&[0x02, 0x03]).unwrap();
        let odd = c.decode_point(&[0x03, 0x03]).unwrap();
        assert_eq!(even.affine_y().unwrap(), fe(10));
        assert_eq!(odd.affine_y().unwrap(), fe(13));
        assert!(even.is_compressed());
        assert_eq!(even.encode().unwrap(), vec![0x02, 0x03]);
    }

    #[test]
    fn malformed_encodings() {
        let c = curve(CoordinateSystem::Affine);
        let cases: [&[u8]; 8] = [
            &[],
            &[0x00, 0x00],
            &[0x02],
            &[0x02, 0x03, 0x00],
            &[0x04, 0x03],
            &[0x05, 0x03, 0x0a],
            // 23 is not a field element
            &[0x04, 0x17, 0x0a],
            // (3, 11) is off the curve
            &[0x04, 0x03, 0x0b],
        ];
        for bytes in cases {
            assert!(
                matches!(c.decode_point(bytes), Err(PointError::InvalidArgument(_))),
                "{:?}",
                bytes
            );
        }

        // some x has no point above it
        let non_residue_x = (0..23)
            .find(|&x| {
                let x = fe(x);
                (x.square() * x + x + fe(1)).sqrt().is_none()
            })
            .unwrap();
        assert!(c.decode_point(&[0x02, non_residue_x as u8]).is_err());
    }

    #[test]
    fn serde_round_trip() {
        let c = curve(CoordinateSystem::Jacobian);
        let p = c.create_point(fe(3), fe(10)).twice().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"04070c\"");

        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let decoded = c.deserialize_point(&mut deserializer).unwrap();
        assert_eq!(decoded, p);

        let compressed = c.decode_point(&[0x02, 0x03]).unwrap();
        assert_eq!(serde_json::to_string(&compressed).unwrap(), "\"0203\"");
    }
}
