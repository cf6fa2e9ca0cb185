//! GCD, coprimality and primality for the native widths and [`U128`].
//!
//! [`is_prime`](Primality::is_prime) is deterministic over the whole u64
//! range: small values fall to a prime table and odd trial division, and
//! everything above runs Miller-Rabin against witness sets exhaustively
//! verified for their bounds, so no "probably" is left in the answer.

use crate::bits::BitOps;
use crate::modular::{AbsU, ModPow, MulMod};
use crate::uint128::U128;

/// Greatest common divisor and the searches built on it.
pub trait Gcd: Copy {
    /// returns the greatest common divisor of `self` and `other`
    fn gcd(self, other: Self) -> Self;

    /// true when `self` and `other` share no factor above 1
    fn is_coprime(self, other: Self) -> bool;

    /// nearest value at or below `self` coprime to `other`, or 0 when the
    /// search exhausts the type
    fn nearest_coprime_floor(self, other: Self) -> Self;

    /// nearest value at or above `self` coprime to `other`, or 0 when the
    /// search exhausts the type
    fn nearest_coprime_ceiling(self, other: Self) -> Self;
}

/// Primality tests and nearest-prime searches.
pub trait Primality: Copy {
    fn is_prime(self) -> bool;

    /// nearest prime at or below `self`, or 0 when none exists
    fn nearest_prime_floor(self) -> Self;

    /// nearest prime at or above `self`, or 0 when none fits the type
    fn nearest_prime_ceiling(self) -> Self;
}

const LARGEST_PRIME_U32: u32 = 4_294_967_291;
const LARGEST_PRIME_U64: u64 = 18_446_744_073_709_551_557;
// i32::MAX is itself prime, so only i64 needs a ceiling bound
const LARGEST_PRIME_I64: i64 = 9_223_372_036_854_775_783;

/// odd primes below 150, the quick divisibility filter
const SMALL_PRIMES: [u64; 34] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149,
];

/// below this, odd trial division beats the Miller-Rabin setup cost
const TRIAL_DIVISION_BOUND: u64 = 1_000_003;

struct WitnessSet {
    bound: u64,
    witnesses: &'static [u64],
}

// smallest witness sets proven sufficient for every value below their
// bound; the fallback set covers the full 64-bit range
const WITNESS_SETS: [WitnessSet; 6] = [
    WitnessSet { bound: 341_531, witnesses: &[9_345_883_071_009_581_737] },
    WitnessSet {
        bound: 1_050_535_501,
        witnesses: &[336_781_006_125, 9_639_812_373_923_155],
    },
    WitnessSet {
        bound: 350_269_456_337,
        witnesses: &[
            4_230_279_247_111_683_200,
            14_694_767_155_120_705_706,
            16_641_139_526_367_750_375,
        ],
    },
    WitnessSet {
        bound: 55_245_642_489_451,
        witnesses: &[
            2,
            141_889_084_524_735,
            1_199_124_725_622_454_117,
            11_096_072_698_276_303_650,
        ],
    },
    WitnessSet {
        bound: 7_999_252_175_582_851,
        witnesses: &[
            2,
            4_130_806_001_517,
            149_795_463_772_692_060,
            186_635_894_390_467_037,
            3_967_304_179_347_715_805,
        ],
    },
    WitnessSet {
        bound: 585_226_005_592_931_977,
        witnesses: &[
            2,
            123_635_709_730_000,
            9_233_062_284_813_009,
            43_835_965_440_333_360,
            761_179_012_939_631_437,
            1_263_739_024_124_850_375,
        ],
    },
];

const DEFAULT_WITNESSES: [u64; 7] = [2, 325, 9375, 28178, 450775, 9780504, 1795265022];

fn witnesses_for(value: u64) -> &'static [u64] {
    for set in &WITNESS_SETS {
        if value < set.bound {
            return set.witnesses;
        }
    }
    &DEFAULT_WITNESSES
}

// One Miller-Rabin round for an odd value >= 3. Writes value - 1 as
// d * 2^s with d odd, then checks the square chain of witness^d.
fn is_strong_probable_prime(value: u64, witness: u64) -> bool {
    let witness = witness % value;
    if witness <= 1 {
        return true;
    }
    let shift = (value - 1).trailing_zero_bits();
    let odd_part = (value - 1) >> shift;
    let mut x = witness.mod_pow(odd_part, value);
    if x == 1 || x == value - 1 {
        return true;
    }
    for _ in 1..shift {
        x = x.mul_mod(x, value);
        if x == value - 1 {
            return true;
        }
        if x == 1 {
            // a nontrivial square root of 1 only exists for composites
            return false;
        }
    }
    false
}

fn is_prime_u64(value: u64) -> bool {
    if value < 2 {
        return false;
    }
    if value & 1 == 0 {
        return value == 2;
    }
    for &prime in &SMALL_PRIMES {
        if value == prime {
            return true;
        }
        if value % prime == 0 {
            return false;
        }
    }
    if value < TRIAL_DIVISION_BOUND {
        let mut divisor = 151;
        while divisor * divisor <= value {
            if value % divisor == 0 {
                return false;
            }
            divisor += 2;
        }
        true
    } else {
        witnesses_for(value)
            .iter()
            .all(|&witness| is_strong_probable_prime(value, witness))
    }
}

fn gcd_u32(mut a: u32, mut b: u32) -> u32 {
    while a >= 2 {
        let t = a;
        a = b % a;
        b = t;
    }
    if a == 0 { b } else { 1 }
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while a >= 2 {
        // drop to 32-bit arithmetic as soon as both operands allow
        if (a | b) >> 32 == 0 {
            return gcd_u32(a as u32, b as u32) as u64;
        }
        let t = a;
        a = b % a;
        b = t;
    }
    if a == 0 { b } else { 1 }
}

macro_rules! unsigned_gcd {
    ($(($t:ty, $gcd:ident)),+) => {$(
        impl Gcd for $t {
            #[inline]
            fn gcd(self, other: $t) -> $t {
                $gcd(self, other)
            }

            #[inline]
            fn is_coprime(self, other: $t) -> bool {
                // two even values can never be coprime
                (self | other) & 1 != 0 && $gcd(self, other) == 1
            }

            fn nearest_coprime_floor(self, other: $t) -> $t {
                if self == 0 {
                    return 0;
                }
                // 1 is the only value coprime to 0
                if other == 0 {
                    return 1;
                }
                let mut candidate = self;
                while candidate > 0 {
                    if candidate.is_coprime(other) {
                        return candidate;
                    }
                    candidate -= 1;
                }
                0
            }

            fn nearest_coprime_ceiling(self, other: $t) -> $t {
                if other == 0 && self > 1 {
                    return 0;
                }
                let mut candidate = self;
                loop {
                    if candidate.is_coprime(other) {
                        return candidate;
                    }
                    match candidate.checked_add(1) {
                        Some(next) => candidate = next,
                        None => return 0,
                    }
                }
            }
        }
    )+};
}

unsigned_gcd!((u32, gcd_u32), (u64, gcd_u64));

macro_rules! signed_gcd {
    ($(($s:ty, $gcd:ident)),+) => {$(
        impl Gcd for $s {
            #[inline]
            fn gcd(self, other: $s) -> $s {
                $gcd(self.abs_u(), other.abs_u()) as $s
            }

            #[inline]
            fn is_coprime(self, other: $s) -> bool {
                (self | other) & 1 != 0 && self.gcd(other) == 1
            }

            fn nearest_coprime_floor(self, other: $s) -> $s {
                // 1 and -1 are the only values coprime to 0; a start
                // between them still walks and lands on -1
                if other == 0 {
                    if self >= 1 {
                        return 1;
                    }
                    if self < -1 {
                        return 0;
                    }
                }
                let mut candidate = self;
                loop {
                    if candidate.is_coprime(other) {
                        return candidate;
                    }
                    match candidate.checked_sub(1) {
                        Some(next) => candidate = next,
                        None => return 0,
                    }
                }
            }

            fn nearest_coprime_ceiling(self, other: $s) -> $s {
                if other == 0 {
                    if self <= -1 {
                        return -1;
                    }
                    if self > 1 {
                        return 0;
                    }
                }
                let mut candidate = self;
                loop {
                    if candidate.is_coprime(other) {
                        return candidate;
                    }
                    match candidate.checked_add(1) {
                        Some(next) => candidate = next,
                        None => return 0,
                    }
                }
            }
        }
    )+};
}

signed_gcd!((i32, gcd_u32), (i64, gcd_u64));

impl Gcd for U128 {
    fn gcd(self, other: U128) -> U128 {
        let mut a = self;
        let mut b = other;
        while a >= U128::new(0, 2) {
            if a.fits_u64() && b.fits_u64() {
                return U128::from(gcd_u64(a.low(), b.low()));
            }
            // once one side is narrow a single wide remainder collapses
            // the other, so at most one 128-by-64 division runs
            let r = if a.fits_u64() { U128::from(b % a.low()) } else { b % a };
            b = a;
            a = r;
        }
        if a == U128::ZERO { b } else { U128::ONE }
    }

    #[inline]
    fn is_coprime(self, other: U128) -> bool {
        (self.low() | other.low()) & 1 != 0 && self.gcd(other) == U128::ONE
    }

    fn nearest_coprime_floor(self, other: U128) -> U128 {
        if self == U128::ZERO {
            return U128::ZERO;
        }
        if other == U128::ZERO {
            return U128::ONE;
        }
        let mut candidate = self;
        while candidate != U128::ZERO {
            if candidate.is_coprime(other) {
                return candidate;
            }
            candidate = candidate - U128::ONE;
        }
        U128::ZERO
    }

    fn nearest_coprime_ceiling(self, other: U128) -> U128 {
        if other == U128::ZERO && self > U128::ONE {
            return U128::ZERO;
        }
        let mut candidate = self;
        loop {
            if candidate.is_coprime(other) {
                return candidate;
            }
            candidate = candidate + U128::ONE;
            if candidate == U128::ZERO {
                return U128::ZERO;
            }
        }
    }
}

impl Primality for u64 {
    #[inline]
    fn is_prime(self) -> bool {
        is_prime_u64(self)
    }

    fn nearest_prime_floor(self) -> u64 {
        if self < 2 {
            return 0;
        }
        if self == 2 {
            return 2;
        }
        // walk odd candidates down; the walk bottoms out at 3
        let mut candidate = if self & 1 == 0 { self - 1 } else { self };
        while !is_prime_u64(candidate) {
            candidate -= 2;
        }
        candidate
    }

    fn nearest_prime_ceiling(self) -> u64 {
        if self <= 2 {
            return 2;
        }
        if self > LARGEST_PRIME_U64 {
            return 0;
        }
        let mut candidate = self | 1;
        while !is_prime_u64(candidate) {
            candidate += 2;
        }
        candidate
    }
}

impl Primality for u32 {
    #[inline]
    fn is_prime(self) -> bool {
        is_prime_u64(self as u64)
    }

    fn nearest_prime_floor(self) -> u32 {
        (self as u64).nearest_prime_floor() as u32
    }

    fn nearest_prime_ceiling(self) -> u32 {
        if self > LARGEST_PRIME_U32 {
            return 0;
        }
        (self as u64).nearest_prime_ceiling() as u32
    }
}

impl Primality for i64 {
    #[inline]
    fn is_prime(self) -> bool {
        self > 1 && is_prime_u64(self as u64)
    }

    fn nearest_prime_floor(self) -> i64 {
        if self < 2 {
            return 0;
        }
        (self as u64).nearest_prime_floor() as i64
    }

    fn nearest_prime_ceiling(self) -> i64 {
        if self > LARGEST_PRIME_I64 {
            return 0;
        }
        (self.max(0) as u64).nearest_prime_ceiling() as i64
    }
}

impl Primality for i32 {
    #[inline]
    fn is_prime(self) -> bool {
        self > 1 && is_prime_u64(self as u64)
    }

    fn nearest_prime_floor(self) -> i32 {
        if self < 2 {
            return 0;
        }
        (self as u64).nearest_prime_floor() as i32
    }

    fn nearest_prime_ceiling(self) -> i32 {
        (self.max(0) as u64).nearest_prime_ceiling() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn is_prime_naive(value: u64) -> bool {
        if value < 2 {
            return false;
        }
        let mut divisor = 2;
        while divisor * divisor <= value {
            if value % divisor == 0 {
                return false;
            }
            divisor += 1;
        }
        true
    }

    #[test]
    fn test_gcd() {
        assert_eq!(0u32.gcd(0), 0);
        assert_eq!(0u32.gcd(9), 9);
        assert_eq!(9u32.gcd(0), 9);
        assert_eq!(12u32.gcd(18), 6);
        assert_eq!(17u32.gcd(31), 1);
        assert_eq!(1u64.gcd(u64::MAX), 1);
        assert_eq!((1u64 << 61).gcd(1 << 48), 1 << 48);
        assert_eq!(
            18_446_744_073_709_551_557u64.gcd(9_223_372_036_854_775_783),
            1
        );
        assert_eq!((-12i32).gcd(18), 6);
        assert_eq!((-12i64).gcd(-18), 6);
        assert_eq!(i64::MIN.gcd(2), 2);
        // the one magnitude with no positive representation wraps
        assert_eq!(i64::MIN.gcd(i64::MIN), i64::MIN);
        assert_eq!(i32::MIN.gcd(i32::MIN), i32::MIN);
    }

    #[test]
    fn test_gcd_random() {
        let mut rng = rand::rng();
        for _ in 0..5000 {
            let a: u64 = rng.random();
            let b: u64 = rng.random();
            let g = a.gcd(b);
            assert_eq!(g, b.gcd(a), "{a} {b}");
            assert!(g > 0);
            assert_eq!(a % g, 0, "{g} divides {a}");
            assert_eq!(b % g, 0, "{g} divides {b}");
            assert_eq!((a / g).gcd(b / g), 1, "{a} {b} reduced");
        }
    }

    #[test]
    fn test_gcd_u128() {
        assert_eq!(U128::ZERO.gcd(U128::ZERO), U128::ZERO);
        let b = U128::from(105u128 << 64);
        assert_eq!(U128::ZERO.gcd(b), b);
        assert_eq!(U128::from(3u128 << 70).gcd(b), U128::from(3u128 << 64));
        assert_eq!(
            U128::new(1, 0).gcd(U128::from(1u64 << 32)),
            U128::from(1u64 << 32)
        );
        let mut rng = rand::rng();
        for _ in 0..500 {
            let a = U128::new(rng.random::<u32>() as u64, rng.random());
            let b = U128::new(rng.random::<u32>() as u64, rng.random());
            let g = a.gcd(b);
            assert_eq!(g, b.gcd(a));
            assert_eq!(u128::from(a) % u128::from(g), 0, "{a:?} {b:?}");
            assert_eq!(u128::from(b) % u128::from(g), 0, "{a:?} {b:?}");
            assert_eq!((a / g).gcd(b / g), U128::ONE, "{a:?} {b:?} reduced");
        }
    }

    #[test]
    fn test_is_coprime() {
        assert!(!10u32.is_coprime(15));
        assert!(9u32.is_coprime(16));
        assert!(!4u32.is_coprime(6));
        assert!(1u32.is_coprime(0));
        assert!(!0u32.is_coprime(0));
        assert!(35u64.is_coprime(64));
        assert!((-9i32).is_coprime(16));
        assert!(!(-9i64).is_coprime(-15));
        assert!(U128::new(1, 1).is_coprime(U128::from(2u64)));
        assert!(!U128::new(1, 0).is_coprime(U128::from(2u64)));
    }

    #[test]
    fn test_is_prime_small_oracle() {
        for value in 0..10_000u32 {
            assert_eq!(value.is_prime(), is_prime_naive(value as u64), "{value}");
        }
    }

    #[test]
    fn test_is_prime_trial_boundary() {
        assert!(999_983u64.is_prime());
        assert!(!999_999u64.is_prime());
        assert!(1_000_003u64.is_prime());
        assert!(!1_000_001u64.is_prime());
    }

    #[test]
    fn test_is_prime_pseudoprimes() {
        // Carmichael numbers and strong pseudoprimes to small bases
        for value in [561u64, 1105, 1729, 2465, 41041, 3_215_031_751, 3_825_123_056_546_413_051] {
            assert!(!value.is_prime(), "{value}");
        }
    }

    #[test]
    fn test_is_prime_large() {
        assert!(2_147_483_647u64.is_prime());
        assert!(1_000_000_007u64.is_prime());
        assert!(2_305_843_009_213_693_951u64.is_prime());
        assert!(18_446_744_073_709_551_557u64.is_prime());
        assert!(9_223_372_036_854_775_783u64.is_prime());
        assert!(!u64::MAX.is_prime());
        // product of the two largest 32-bit primes
        assert!(!(4_294_967_291u64 * 4_294_967_279).is_prime());
        assert!(!i64::MAX.is_prime());
        assert!(9_223_372_036_854_775_783i64.is_prime());
        assert!(!(-7i64).is_prime());
        assert!(!0i32.is_prime());
        assert!(!1i32.is_prime());
        assert!(i32::MAX.is_prime());
    }

    #[test]
    fn test_is_prime_random_oracle() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let value: u32 = rng.random();
            assert_eq!(
                value.is_prime(),
                is_prime_naive(value as u64),
                "{value}"
            );
        }
    }

    #[test]
    fn test_prime_products_composite() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = ((rng.random::<u32>() >> 1) as u64).nearest_prime_ceiling();
            let b = ((rng.random::<u32>() >> 1) as u64).nearest_prime_ceiling();
            assert!(!(a * b).is_prime(), "{a} * {b}");
        }
    }

    #[test]
    fn test_nearest_prime() {
        assert_eq!(10u32.nearest_prime_floor(), 7);
        assert_eq!(10u32.nearest_prime_ceiling(), 11);
        assert_eq!(7u32.nearest_prime_floor(), 7);
        assert_eq!(7u32.nearest_prime_ceiling(), 7);
        assert_eq!(2u32.nearest_prime_floor(), 2);
        assert_eq!(1u32.nearest_prime_floor(), 0);
        assert_eq!(0u32.nearest_prime_floor(), 0);
        assert_eq!(0u32.nearest_prime_ceiling(), 2);
        assert_eq!(14u64.nearest_prime_ceiling(), 17);
        assert_eq!(90u64.nearest_prime_floor(), 89);
    }

    #[test]
    fn test_nearest_prime_bounds() {
        assert_eq!(u32::MAX.nearest_prime_floor(), LARGEST_PRIME_U32);
        assert_eq!(u32::MAX.nearest_prime_ceiling(), 0);
        assert_eq!(LARGEST_PRIME_U32.nearest_prime_ceiling(), LARGEST_PRIME_U32);
        assert_eq!(u64::MAX.nearest_prime_floor(), LARGEST_PRIME_U64);
        assert_eq!(u64::MAX.nearest_prime_ceiling(), 0);
        assert_eq!(LARGEST_PRIME_U64.nearest_prime_ceiling(), LARGEST_PRIME_U64);
        assert_eq!(i32::MAX.nearest_prime_ceiling(), i32::MAX);
        assert_eq!(i64::MAX.nearest_prime_floor(), LARGEST_PRIME_I64);
        assert_eq!(i64::MAX.nearest_prime_ceiling(), 0);
        assert_eq!((-5i32).nearest_prime_floor(), 0);
        assert_eq!((-5i64).nearest_prime_ceiling(), 2);
    }

    #[test]
    fn test_nearest_coprime() {
        assert_eq!(10u32.nearest_coprime_floor(15), 8);
        assert_eq!(10u32.nearest_coprime_ceiling(15), 11);
        assert_eq!(11u64.nearest_coprime_floor(22), 9);
        assert_eq!(9u64.nearest_coprime_ceiling(6), 11);
        assert_eq!((-4i32).nearest_coprime_floor(8), -5);
        assert_eq!((-4i64).nearest_coprime_ceiling(8), -3);
        assert_eq!(
            2_147_483_648i64.nearest_coprime_ceiling(2_147_483_648),
            2_147_483_649
        );
        // a coprime start at the top of the type is its own ceiling
        assert_eq!(i32::MAX.nearest_coprime_ceiling(2), i32::MAX);
        assert_eq!(u64::MAX.nearest_coprime_ceiling(7), u64::MAX);
        assert_eq!(u32::MAX.nearest_coprime_ceiling(u32::MAX), 0);
        assert_eq!(
            U128::from(10u64).nearest_coprime_floor(U128::from(15u64)),
            U128::from(8u64)
        );
        assert_eq!(
            U128::from(10u64).nearest_coprime_ceiling(U128::from(15u64)),
            U128::from(11u64)
        );
    }

    #[test]
    fn test_nearest_coprime_to_zero() {
        // the only coprimes of 0 are 1 and -1, so every search against 0
        // resolves without a walk, including from the extremes
        assert_eq!(0u32.nearest_coprime_floor(0), 0);
        assert_eq!(5u32.nearest_coprime_floor(0), 1);
        assert_eq!((1u64 << 40).nearest_coprime_floor(0), 1);
        assert_eq!(u64::MAX.nearest_coprime_floor(0), 1);
        assert_eq!(0u32.nearest_coprime_ceiling(0), 1);
        assert_eq!(1u64.nearest_coprime_ceiling(0), 1);
        assert_eq!(2u32.nearest_coprime_ceiling(0), 0);
        assert_eq!(u64::MAX.nearest_coprime_ceiling(0), 0);
        assert_eq!(5i32.nearest_coprime_floor(0), 1);
        assert_eq!(0i32.nearest_coprime_floor(0), -1);
        assert_eq!((-1i64).nearest_coprime_floor(0), -1);
        assert_eq!((-2i32).nearest_coprime_floor(0), 0);
        assert_eq!(i64::MIN.nearest_coprime_floor(0), 0);
        assert_eq!((-5i64).nearest_coprime_ceiling(0), -1);
        assert_eq!(0i64.nearest_coprime_ceiling(0), 1);
        assert_eq!(1i32.nearest_coprime_ceiling(0), 1);
        assert_eq!(2i64.nearest_coprime_ceiling(0), 0);
        assert_eq!(i64::MAX.nearest_coprime_ceiling(0), 0);
        assert_eq!(U128::ZERO.nearest_coprime_floor(U128::ZERO), U128::ZERO);
        assert_eq!(U128::MAX.nearest_coprime_floor(U128::ZERO), U128::ONE);
        assert_eq!(U128::ZERO.nearest_coprime_ceiling(U128::ZERO), U128::ONE);
        assert_eq!(
            U128::from(2u64).nearest_coprime_ceiling(U128::ZERO),
            U128::ZERO
        );
        assert_eq!(U128::MAX.nearest_coprime_ceiling(U128::ZERO), U128::ZERO);
    }
}
