use bigint::{Encoding, NonZero, U256, U512};

pub trait Modular: Sized {
    const MODULUS: U256;

    fn new(number: U256) -> Self;

    fn inner(&self) -> &U256;

    fn add(&self, other: &Self) -> Self {
        Self::new(self.inner().add_mod(other.inner(), &Self::MODULUS))
    }

    fn neg(&self) -> Self {
        Self::new(self.inner().neg_mod(&Self::MODULUS))
    }

    fn sub(&self, other: &Self) -> Self {
        Self::new(self.inner().sub_mod(other.inner(), &Self::MODULUS))
    }

    fn mul(&self, other: &Self) -> Self {
        Self::new(mul_mod_u256(self.inner(), other.inner(), &Self::MODULUS))
    }

    /// Left-to-right square and multiply over the big-endian exponent bits.
    fn pow(&self, exponent: &U256) -> Self {
        let mut result = Self::new(U256::ONE);
        for byte in exponent.to_be_bytes() {
            for shift in (0..8).rev() {
                result = result.mul(&result);
                if (byte >> shift) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    /// Fermat inversion, `a^(p - 2)`. Requires a prime modulus.
    fn inverse(&self) -> Option<Self> {
        if self.inner() == &U256::ZERO {
            return None;
        }
        Some(self.pow(&Self::MODULUS.wrapping_sub(&U256::from_u8(2))))
    }
}

pub fn mul_mod_u256(lhs: &U256, rhs: &U256, modulus: &U256) -> U256 {
    // both operands are below 2^256, so the widened product cannot wrap
    let product = widen(lhs).wrapping_mul(&widen(rhs));
    // NOTE modulus is never zero, so unwrap is fine here
    let mod512 = NonZero::new(widen(modulus)).unwrap();
    narrow(&(product % mod512))
}

fn widen(number: &U256) -> U512 {
    let mut bytes = [0u8; 64];
    bytes[32..].copy_from_slice(&number.to_be_bytes());
    U512::from_be_slice(&bytes)
}

// the upper half is always zero after reduction by a 256-bit modulus
fn narrow(number: &U512) -> U256 {
    U256::from_be_slice(&number.to_be_bytes()[32..])
}
