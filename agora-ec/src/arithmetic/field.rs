use super::modular::Modular;
use crate::field::PrimeField;

use bigint::{Encoding, NonZero, U256};
use num_bigint::BigUint;
use num_integer::Integer;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A prime of at most 256 bits selecting the field a `FieldElement` lives in.
pub trait Modulus: Clone + Copy + fmt::Debug + PartialEq + Eq + Send + Sync + 'static {
    const PRIME_MODULUS: U256;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1Base;

impl Modulus for Secp256k1Base {
    const PRIME_MODULUS: U256 =
        U256::from_be_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
}

/// The base field of tom256k1 is the scalar field of secp256k1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tom256k1Base;

impl Modulus for Tom256k1Base {
    const PRIME_MODULUS: U256 =
        U256::from_be_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct P256Base;

impl Modulus for P256Base {
    const PRIME_MODULUS: U256 =
        U256::from_be_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldElement<M: Modulus>(pub(crate) U256, pub(crate) PhantomData<M>);

impl<M: Modulus> FieldElement<M> {
    pub const ONE: Self = Self(U256::ONE, PhantomData);
    pub const ZERO: Self = Self(U256::ZERO, PhantomData);
}

impl<M: Modulus> Modular for FieldElement<M> {
    const MODULUS: U256 = M::PRIME_MODULUS;

    fn new(number: U256) -> Self {
        let reduced = if number < Self::MODULUS {
            number
        } else {
            // NOTE unwrap is fine here because the modulus
            // can be safely assumed to be nonzero
            number % NonZero::new(Self::MODULUS).unwrap()
        };

        Self(reduced, PhantomData)
    }

    fn inner(&self) -> &U256 {
        &self.0
    }
}

impl<M: Modulus> FieldElement<M> {
    fn pow_biguint(&self, exponent: &BigUint) -> Self {
        let power = self.to_biguint().modpow(exponent, &Self::modulus());
        Self(u256_from_biguint(&power), PhantomData)
    }

    // Tonelli-Shanks; only reached for primes that are 1 mod 4
    fn tonelli_shanks(&self, p: &BigUint) -> Option<Self> {
        let one = BigUint::from(1u8);
        let p_minus_one = p - &one;
        let mut q = p_minus_one.clone();
        let mut s = 0u32;
        while q.is_even() {
            q >>= 1;
            s += 1;
        }

        let legendre_exp = &p_minus_one >> 1;
        let minus_one = -Self::ONE;
        let mut z = Self::from_u64(2);
        while z.pow_biguint(&legendre_exp) != minus_one {
            z = z + Self::ONE;
        }

        let mut m = s;
        let mut c = z.pow_biguint(&q);
        let mut t = self.pow_biguint(&q);
        let mut r = self.pow_biguint(&((&q + &one) >> 1));
        while !t.is_one() {
            let mut i = 0u32;
            let mut t_pow = t;
            while !t_pow.is_one() {
                t_pow = t_pow.square();
                i += 1;
                if i == m {
                    return None;
                }
            }
            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = b.square();
            }
            m = i;
            c = b.square();
            t = t * c;
            r = r * b;
        }
        Some(r)
    }
}

pub(crate) fn u256_from_biguint(number: &BigUint) -> U256 {
    let bytes = number.to_bytes_be();
    let mut padded = [0u8; 32];
    let take = bytes.len().min(32);
    padded[32 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    U256::from_be_slice(&padded)
}

impl<M: Modulus> PrimeField for FieldElement<M> {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn from_u64(number: u64) -> Self {
        Self::new(U256::from_u64(number))
    }

    fn from_biguint(number: &BigUint) -> Self {
        let reduced = number % Self::modulus();
        Self::new(u256_from_biguint(&reduced))
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0.to_be_bytes())
    }

    fn modulus() -> BigUint {
        BigUint::from_bytes_be(&M::PRIME_MODULUS.to_be_bytes())
    }

    fn is_zero(&self) -> bool {
        self.0 == U256::ZERO
    }

    fn is_one(&self) -> bool {
        self.0 == U256::ONE
    }

    fn test_bit_zero(&self) -> bool {
        self.0.to_be_bytes()[31] & 1 == 1
    }

    fn square(&self) -> Self {
        Modular::mul(self, self)
    }

    fn invert(&self) -> Option<Self> {
        Modular::inverse(self)
    }

    fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(*self);
        }
        let p = Self::modulus();
        let root = if (&p % 4u32) == BigUint::from(3u8) {
            self.pow_biguint(&((&p + 1u32) >> 2))
        } else {
            self.tonelli_shanks(&p)?
        };
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    fn to_be_bytes(&self) -> Vec<u8> {
        let bytes = self.0.to_be_bytes();
        bytes[32 - Self::encoded_len()..].to_vec()
    }

    fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::encoded_len() {
            return None;
        }
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(bytes);
        let number = U256::from_be_slice(&padded);
        if number < M::PRIME_MODULUS {
            Some(Self(number, PhantomData))
        } else {
            None
        }
    }
}

impl<M: Modulus> Hash for FieldElement<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_be_bytes().hash(state);
    }
}

impl<M: Modulus> fmt::Display for FieldElement<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:x}", self.to_biguint())
    }
}

impl<'a, 'b, M: Modulus> std::ops::Add<&'b FieldElement<M>> for &'a FieldElement<M> {
    type Output = FieldElement<M>;
    fn add(self, rhs: &'b FieldElement<M>) -> Self::Output {
        Modular::add(self, rhs)
    }
}

impl<M: Modulus> std::ops::Add for FieldElement<M> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Modular::add(&self, &rhs)
    }
}

impl<M: Modulus> std::ops::Sub for FieldElement<M> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Modular::sub(&self, &rhs)
    }
}

impl<'a, 'b, M: Modulus> std::ops::Sub<&'b FieldElement<M>> for &'a FieldElement<M> {
    type Output = FieldElement<M>;
    fn sub(self, rhs: &FieldElement<M>) -> Self::Output {
        Modular::sub(self, rhs)
    }
}

impl<M: Modulus> std::ops::Neg for FieldElement<M> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Modular::neg(&self)
    }
}

impl<M: Modulus> std::ops::Mul for FieldElement<M> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Modular::mul(&self, &rhs)
    }
}

impl<'a, 'b, M: Modulus> std::ops::Mul<&'b FieldElement<M>> for &'a FieldElement<M> {
    type Output = FieldElement<M>;
    fn mul(self, rhs: &FieldElement<M>) -> Self::Output {
        Modular::mul(self, rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct SmallMod;

    impl Modulus for SmallMod {
        const PRIME_MODULUS: U256 = U256::from_u32(17);
    }

    type FeSmall = FieldElement<SmallMod>;
    type FeLarge = FieldElement<Secp256k1Base>;

    #[test]
    fn operations_with_small_modulus() {
        let a = FeSmall::new(U256::from_u32(15));
        let b = FeSmall::new(U256::from_u32(9));
        assert_eq!(&a + &b, FeSmall::new(U256::from_u32(7)));
        assert_eq!(a * b, FeSmall::new(U256::from_u32(16)));
        assert_eq!(a + b, FeSmall::new(U256::from_u32(7)));
        assert_eq!(a - b, FeSmall::new(U256::from_u32(6)));
        assert_eq!(b - a, FeSmall::new(U256::from_u32(11)));
        assert_eq!(-a, FeSmall::new(U256::from_u32(2)));
        assert_eq!(FeSmall::new(U256::from_u32(40)), FeSmall::from_u64(6));
    }

    #[test]
    fn inversion_and_division() {
        for n in 1..17u64 {
            let a = FeSmall::from_u64(n);
            let inv = a.invert().unwrap();
            assert!((a * inv).is_one());
        }
        assert!(FeSmall::ZERO.invert().is_none());
        // 5 / 3 = 5 * 6 = 30 = 13 (mod 17)
        let q = FeSmall::from_u64(5).divide(&FeSmall::from_u64(3)).unwrap();
        assert_eq!(q, FeSmall::from_u64(13));
    }

    #[test]
    fn exponentiation_paths_agree() {
        let a = FeLarge::from_u64(0xdead_beef);
        let e = U256::from_be_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        let exponent = BigUint::from_bytes_be(&e.to_be_bytes());
        assert_eq!(a.pow_biguint(&exponent), Modular::pow(&a, &e));
        assert_eq!(a.pow_biguint(&BigUint::from(0u8)), FeLarge::ONE);
        // Fermat: a^(p - 1) = 1
        let p_minus_one = FeLarge::modulus() - 1u32;
        assert!(a.pow_biguint(&p_minus_one).is_one());
    }

    #[test]
    fn square_roots() {
        // 17 = 1 mod 4 exercises Tonelli-Shanks
        let mut residues = 0;
        for n in 0..17u64 {
            let a = FeSmall::from_u64(n);
            if let Some(root) = a.sqrt() {
                assert_eq!(root.square(), a);
                residues += 1;
            }
        }
        // zero plus (p - 1) / 2 quadratic residues
        assert_eq!(residues, 9);

        let gx = FeLarge::new(U256::from_be_hex(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        ));
        let rhs = gx * gx * gx + FeLarge::from_u64(7);
        let root = rhs.sqrt().unwrap();
        assert_eq!(root.square(), rhs);
    }

    #[test]
    fn byte_encoding() {
        let a = FeSmall::from_u64(16);
        assert_eq!(FeSmall::encoded_len(), 1);
        assert_eq!(a.to_be_bytes(), vec![0x10]);
        assert_eq!(FeSmall::from_be_bytes(&[0x10]), Some(a));
        assert_eq!(FeSmall::from_be_bytes(&[0x11]), None);
        assert_eq!(FeSmall::from_be_bytes(&[0x00, 0x01]), None);

        assert_eq!(FeLarge::encoded_len(), 32);
        assert_eq!(FeLarge::ONE.to_be_bytes().len(), 32);
        assert!(FeLarge::from_u64(3).test_bit_zero());
        assert!(!FeLarge::from_u64(4).test_bit_zero());
        assert_eq!(FeLarge::from_u64(5).bit_length(), 3);
    }

    #[test]
    fn biguint_conversion() {
        let p = FeLarge::modulus();
        assert_eq!(FeLarge::field_size(), 256);
        assert!(FeLarge::from_biguint(&p).is_zero());
        let big = &p + BigUint::from(5u8);
        assert_eq!(FeLarge::from_biguint(&big), FeLarge::from_u64(5));
        assert_eq!(FeLarge::from_u64(5).to_biguint(), BigUint::from(5u8));
    }

    #[test]
    fn operations_with_large_modulus() {
        let a = FeLarge::new(U256::from_be_hex(
            "000000000000000000000000000000000000000ffffaaaabbbb123456789eeee",
        ));
        let b = FeLarge::new(U256::from_be_hex(
            "000000000000000000000000000012345678901234567890ffffddddeeee7890",
        ));
        let sum = a + b;
        assert_eq!(
            sum,
            FeLarge::new(U256::from_be_hex(
                "00000000000000000000000000001234567890223451233cbbb101235678677e"
            ))
        );
        let prod = a * b;
        assert_eq!(
            prod,
            FeLarge::new(U256::from_be_hex(
                "000123450671f20a8b0a93d71f37ba2ec0d166be8a54889e735d97664ad9f5e0"
            ))
        );

        let a_min_b = a - b;
        let b_min_a = b - a;
        assert_eq!(a_min_b, -b_min_a);
        assert!((prod * prod.invert().unwrap()).is_one());
    }
}
