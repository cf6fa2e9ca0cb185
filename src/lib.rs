//! Fixed-width numeric primitives: per-width bit operations, base-2 math,
//! a two-limb 128-bit unsigned integer, overflow-safe modular arithmetic
//! and deterministic primality testing.

pub mod base2;
pub mod bits;
pub mod modular;
pub mod prime;
pub mod uint128;

pub use base2::Base2;
pub use bits::BitOps;
pub use modular::{AbsU, ModPow, MulMod};
pub use prime::{Gcd, Primality};
pub use uint128::{TryFromU128Error, U128};
