//! Modular arithmetic that cannot overflow on the way to the answer.
//!
//! Native `(a * b) % m` overflows once the product outgrows the type, so
//! [`MulMod`] computes the product one width up (through [`U128`] at 64
//! bits) before reducing, and [`ModPow`] square-and-multiplies with every
//! intermediate held below the modulus. [`AbsU`] rounds out the signed
//! story: magnitude as the unsigned counterpart type, exact for `MIN`.

use crate::uint128::U128;

/// absolute value returned as the unsigned type of the same width
pub trait AbsU {
    type Unsigned;

    fn abs_u(self) -> Self::Unsigned;
}

/// `(self * other) % modulus` without intermediate overflow
pub trait MulMod {
    fn mul_mod(self, other: Self, modulus: Self) -> Self;
}

/// `self ^ exponent % modulus` by binary exponentiation
pub trait ModPow {
    fn mod_pow(self, exponent: Self, modulus: Self) -> Self;
}

macro_rules! abs_u {
    ($(($s:ty, $u:ty)),+) => {$(
        impl AbsU for $s {
            type Unsigned = $u;

            #[inline]
            fn abs_u(self) -> $u {
                // branch-free: the mask is all ones exactly for negatives,
                // and MIN comes through at its true magnitude
                let mask = self >> (<$s>::BITS - 1);
                (self.wrapping_add(mask) ^ mask) as $u
            }
        }
    )+};
}

abs_u!((i8, u8), (i16, u16), (i32, u32), (i64, u64));

// the product fits the next width up, so one native widened multiply
// and remainder suffice
macro_rules! unsigned_mul_mod {
    ($(($t:ty, $w:ty)),+) => {$(
        impl MulMod for $t {
            #[inline]
            fn mul_mod(self, other: $t, modulus: $t) -> $t {
                ((self as $w * other as $w) % modulus as $w) as $t
            }
        }
    )+};
}

unsigned_mul_mod!((u8, u16), (u16, u32), (u32, u64));

impl MulMod for u64 {
    #[inline]
    fn mul_mod(self, other: u64, modulus: u64) -> u64 {
        U128::widening_mul(self, other) % modulus
    }
}

// truncated division semantics: a nonzero result takes the sign of the
// product, and a non-positive modulus yields 0 instead of panicking
macro_rules! signed_mul_mod {
    ($(($s:ty, $u:ty)),+) => {$(
        impl MulMod for $s {
            #[inline]
            fn mul_mod(self, other: $s, modulus: $s) -> $s {
                if modulus <= 0 {
                    return 0;
                }
                let rem = self.abs_u().mul_mod(other.abs_u(), modulus as $u);
                (1 | ((self ^ other) >> (<$s>::BITS - 1))) * rem as $s
            }
        }
    )+};
}

signed_mul_mod!((i8, u8), (i16, u16), (i32, u32), (i64, u64));

// modulus and base both below 2^32; the square and the product fit u64
fn pow_mod_narrow(mut base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1;
    loop {
        if exponent & 1 != 0 {
            result = (result * base) % modulus;
            if exponent == 1 {
                return result;
            }
        }
        exponent >>= 1;
        base = (base * base) % modulus;
    }
}

fn pow_mod_wide(mut base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1;
    loop {
        if exponent & 1 != 0 {
            result = result.mul_mod(base, modulus);
            if exponent == 1 {
                return result;
            }
        }
        exponent >>= 1;
        base = U128::widening_square(base) % modulus;
    }
}

impl ModPow for u64 {
    fn mod_pow(self, exponent: u64, modulus: u64) -> u64 {
        if modulus == 0 {
            return 0;
        }
        if exponent == 0 {
            // b^0 is 1 under any nonzero modulus, 1 included
            return 1;
        }
        let base = self % modulus;
        if base == 0 {
            return 0;
        }
        match exponent {
            1 => base,
            2 => base.mul_mod(base, modulus),
            // base < modulus, so one width test picks the loop
            _ if modulus <= u32::MAX as u64 => pow_mod_narrow(base, exponent, modulus),
            _ => pow_mod_wide(base, exponent, modulus),
        }
    }
}

impl ModPow for u32 {
    fn mod_pow(self, exponent: u32, modulus: u32) -> u32 {
        if modulus == 0 {
            return 0;
        }
        if exponent == 0 {
            // b^0 is 1 under any nonzero modulus, 1 included
            return 1;
        }
        let base = self % modulus;
        if base == 0 {
            return 0;
        }
        match exponent {
            1 => base,
            2 => base.mul_mod(base, modulus),
            _ => pow_mod_narrow(base as u64, exponent as u64, modulus as u64) as u32,
        }
    }
}

macro_rules! mod_pow_narrow {
    ($($t:ty),+) => {$(
        impl ModPow for $t {
            #[inline]
            fn mod_pow(self, exponent: $t, modulus: $t) -> $t {
                (self as u32).mod_pow(exponent as u32, modulus as u32) as $t
            }
        }
    )+};
}

mod_pow_narrow!(u8, u16);
