use num_bigint::BigUint;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Mul, Neg, Sub};

/// Arithmetic the group law needs from the coordinates' underlying prime
/// field.
///
/// Every operation is expected to return a fully reduced element, so derived
/// equality and hashing are meaningful.
pub trait PrimeField:
    Copy
    + Debug
    + Display
    + PartialEq
    + Eq
    + Hash
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;

    fn one() -> Self;

    fn from_u64(number: u64) -> Self;

    /// Reduces `number` modulo the field prime.
    fn from_biguint(number: &BigUint) -> Self;

    fn to_biguint(&self) -> BigUint;

    fn modulus() -> BigUint;

    /// Bit length of the field prime.
    fn field_size() -> usize {
        Self::modulus().bits() as usize
    }

    /// Width in bytes of the fixed-length big-endian encoding.
    fn encoded_len() -> usize {
        (Self::field_size() + 7) / 8
    }

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool;

    /// Lowest bit of the canonical integer representative.
    fn test_bit_zero(&self) -> bool;

    fn bit_length(&self) -> usize {
        self.to_biguint().bits() as usize
    }

    fn square(&self) -> Self {
        *self * *self
    }

    /// Returns `None` for zero.
    fn invert(&self) -> Option<Self>;

    fn divide(&self, rhs: &Self) -> Option<Self> {
        rhs.invert().map(|inv| *self * inv)
    }

    /// Returns one of the square roots, or `None` for a non-residue.
    fn sqrt(&self) -> Option<Self>;

    /// Big-endian, left padded to `encoded_len` bytes.
    fn to_be_bytes(&self) -> Vec<u8>;

    /// Inverse of `to_be_bytes`; rejects inputs of the wrong width and
    /// non-canonical values.
    fn from_be_bytes(bytes: &[u8]) -> Option<Self>;
}
