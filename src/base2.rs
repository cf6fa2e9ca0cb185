//! Power-of-2 helpers built on the bit primitives.
//!
//! Undefined cases return per-type sentinels rather than failing: `log2`
//! of 0 is the unsigned type's MAX (-1 on signed, which also covers
//! negatives), and `power_of_2_ceiling` returns 0 when no representable
//! power of 2 exists.

use crate::bits::BitOps;

pub trait Base2: Copy {
    /// floor of the base-2 logarithm. 0 gives MAX on unsigned types and
    /// -1 on signed types; negative values give -1.
    fn log2(self) -> Self;
    /// true when exactly one bit is set (signed: positive values only)
    fn is_power_of_2(self) -> bool;
    /// largest power of 2 <= self, or 0 when there is none
    fn power_of_2_floor(self) -> Self;
    /// smallest power of 2 >= self, 1 for values <= 1, or 0 when the
    /// next power of 2 is not representable
    fn power_of_2_ceiling(self) -> Self;
}

macro_rules! unsigned_base2 {
    ($($t:ty),*) => {$(
        impl Base2 for $t {
            #[inline]
            fn log2(self) -> $t {
                if self == 0 { <$t>::MAX } else { self.high_bit_position() }
            }

            #[inline]
            fn is_power_of_2(self) -> bool {
                self.is_power_of_two()
            }

            #[inline]
            fn power_of_2_floor(self) -> $t {
                self.high_bit()
            }

            #[inline]
            fn power_of_2_ceiling(self) -> $t {
                self.checked_next_power_of_two().unwrap_or(0)
            }
        }
    )*};
}

unsigned_base2!(u8, u16, u32, u64);

macro_rules! signed_base2 {
    ($(($s:ty, $u:ty)),*) => {$(
        impl Base2 for $s {
            #[inline]
            fn log2(self) -> $s {
                if self <= 0 { -1 } else { (self as $u).high_bit_position() as $s }
            }

            #[inline]
            fn is_power_of_2(self) -> bool {
                self > 0 && (self as $u).is_power_of_two()
            }

            #[inline]
            fn power_of_2_floor(self) -> $s {
                if self <= 0 { 0 } else { (self as $u).high_bit() as $s }
            }

            #[inline]
            fn power_of_2_ceiling(self) -> $s {
                if self <= 1 {
                    return 1;
                }
                match (self as $u).checked_next_power_of_two() {
                    Some(p) if p <= <$s>::MAX as $u => p as $s,
                    _ => 0,
                }
            }
        }
    )*};
}

signed_base2!((i8, u8), (i16, u16), (i32, u32), (i64, u64));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(10u8.log2(), 3);
        assert_eq!(10u64.log2(), 3);
        assert_eq!(10i16.log2(), 3);
        assert_eq!(1u32.log2(), 0);
        assert_eq!(2u32.log2(), 1);
        assert_eq!(u8::MAX.log2(), 7);
        assert_eq!(u64::MAX.log2(), 63);
        assert_eq!(i64::MAX.log2(), 62);
    }

    #[test]
    fn test_log2_sentinels() {
        assert_eq!(0u8.log2(), u8::MAX);
        assert_eq!(0u16.log2(), u16::MAX);
        assert_eq!(0u32.log2(), u32::MAX);
        assert_eq!(0u64.log2(), u64::MAX);
        assert_eq!(0i8.log2(), -1);
        assert_eq!(0i64.log2(), -1);
        assert_eq!((-10i32).log2(), -1);
        assert_eq!(i64::MIN.log2(), -1);
    }

    #[test]
    fn test_is_power_of_2() {
        assert!(!0u8.is_power_of_2());
        assert!(1u8.is_power_of_2());
        assert!(2u64.is_power_of_2());
        assert!(!10u32.is_power_of_2());
        assert!((1u64 << 63).is_power_of_2());
        assert!(64i8.is_power_of_2());
        assert!(!i8::MIN.is_power_of_2());
        assert!(!(-4i32).is_power_of_2());
        for p in 0..16 {
            assert!((1u16 << p).is_power_of_2());
        }
    }

    #[test]
    fn test_power_of_2_floor() {
        assert_eq!(0u8.power_of_2_floor(), 0);
        assert_eq!(10u8.power_of_2_floor(), 8);
        assert_eq!(10u64.power_of_2_floor(), 8);
        assert_eq!(u8::MAX.power_of_2_floor(), 0x80);
        assert_eq!(u64::MAX.power_of_2_floor(), 1 << 63);
        assert_eq!(16u32.power_of_2_floor(), 16);
        assert_eq!((-10i16).power_of_2_floor(), 0);
        assert_eq!(0i32.power_of_2_floor(), 0);
        assert_eq!(i8::MAX.power_of_2_floor(), 64);
    }

    #[test]
    fn test_power_of_2_ceiling() {
        assert_eq!(0u8.power_of_2_ceiling(), 1);
        assert_eq!(1u8.power_of_2_ceiling(), 1);
        assert_eq!(10u8.power_of_2_ceiling(), 16);
        assert_eq!(10u64.power_of_2_ceiling(), 16);
        assert_eq!(16u32.power_of_2_ceiling(), 16);
        assert_eq!((-10i16).power_of_2_ceiling(), 1);
        assert_eq!(0i32.power_of_2_ceiling(), 1);
        assert_eq!(100i8.power_of_2_ceiling(), 0);
        assert_eq!(64i8.power_of_2_ceiling(), 64);
    }

    #[test]
    fn test_power_of_2_ceiling_overflow() {
        assert_eq!(u8::MAX.power_of_2_ceiling(), 0);
        assert_eq!(u16::MAX.power_of_2_ceiling(), 0);
        assert_eq!(u32::MAX.power_of_2_ceiling(), 0);
        assert_eq!(u64::MAX.power_of_2_ceiling(), 0);
        assert_eq!(i8::MAX.power_of_2_ceiling(), 0);
        assert_eq!(i64::MAX.power_of_2_ceiling(), 0);
        assert_eq!(((1u32 << 31) + 1).power_of_2_ceiling(), 0);
        assert_eq!((1u32 << 31).power_of_2_ceiling(), 1 << 31);
    }

    // floor and ceiling bracket every byte value
    #[test]
    fn test_floor_ceiling_bracket() {
        for v in 1..=u8::MAX {
            let floor = v.power_of_2_floor();
            assert!(floor.is_power_of_2() && floor <= v);
            assert!((v as u16) < 2 * (floor as u16));
            let ceiling = v.power_of_2_ceiling();
            if ceiling != 0 {
                assert!(ceiling.is_power_of_2() && ceiling >= v);
                assert!((ceiling as u16) < 2 * (v as u16));
            } else {
                assert!(v > 0x80);
            }
        }
    }
}
