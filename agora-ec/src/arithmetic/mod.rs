mod field;
mod modular;

pub use field::{FieldElement, Modulus, P256Base, Secp256k1Base, Tom256k1Base};
pub use modular::{mul_mod_u256, Modular};
