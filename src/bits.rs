//! Per-width bit primitives.
//!
//! One trait, implemented for every fixed-width integer (and for
//! [`U128`](crate::uint128::U128) in its own module). Position queries use
//! the type's bit width as the zero sentinel on unsigned types and -1 on
//! signed types; count queries are plain counts on both. Signed
//! implementations operate on the two's-complement bit pattern, so
//! `(-1i8).high_bit_position() == 7`.

/// Bit position of the most significant set bit of a byte, with 8 as the
/// sentinel entry for 0 (so `1 << MSB_POS_256[0]` truncates back to 0).
pub(crate) const MSB_POS_256: [u8; 256] = {
    let mut t = [0u8; 256];
    t[0] = 8; // no set bits
    let mut i = 2;
    while i < 256 {
        t[i] = 1 + t[i / 2];
        i += 1;
    }
    t
};

pub trait BitOps: Copy {
    /// returns the lowest set bit of self, or 0 when self is 0
    fn low_bit(self) -> Self;
    /// returns the highest set bit of self, or 0 when self is 0
    fn high_bit(self) -> Self;
    /// index of the lowest set bit (0 is the least significant position)
    fn low_bit_position(self) -> Self;
    /// index of the highest set bit
    fn high_bit_position(self) -> Self;
    /// how many bits self takes, 0 for 0
    fn significant_bits(self) -> Self;
    /// count of zero bits above the highest set bit
    fn leading_zero_bits(self) -> Self;
    /// count of zero bits below the lowest set bit
    fn trailing_zero_bits(self) -> Self;
    /// count of set bits
    fn bit_count(self) -> Self;
    /// self with its bit order exactly reversed
    fn reverse_bits(self) -> Self;
}

// The byte width goes through the lookup table; a single indexed load and
// the 8 sentinel cover the zero case without branching.
impl BitOps for u8 {
    #[inline]
    fn low_bit(self) -> u8 {
        self & self.wrapping_neg()
    }

    #[inline]
    fn high_bit(self) -> u8 {
        (1u16 << MSB_POS_256[self as usize]) as u8
    }

    #[inline]
    fn low_bit_position(self) -> u8 {
        MSB_POS_256[self.low_bit() as usize]
    }

    #[inline]
    fn high_bit_position(self) -> u8 {
        MSB_POS_256[self as usize]
    }

    #[inline]
    fn significant_bits(self) -> u8 {
        (8 - self.leading_zeros()) as u8
    }

    #[inline]
    fn leading_zero_bits(self) -> u8 {
        self.leading_zeros() as u8
    }

    #[inline]
    fn trailing_zero_bits(self) -> u8 {
        self.trailing_zeros() as u8
    }

    #[inline]
    fn bit_count(self) -> u8 {
        self.count_ones() as u8
    }

    #[inline]
    fn reverse_bits(self) -> u8 {
        u8::reverse_bits(self)
    }
}

macro_rules! unsigned_bit_ops {
    ($($t:ty),*) => {$(
        impl BitOps for $t {
            #[inline]
            fn low_bit(self) -> $t {
                self & self.wrapping_neg()
            }

            #[inline]
            fn high_bit(self) -> $t {
                if self == 0 { 0 } else { 1 << (<$t>::BITS - 1 - self.leading_zeros()) }
            }

            #[inline]
            fn low_bit_position(self) -> $t {
                // trailing_zeros is the width for 0, which is the sentinel
                self.trailing_zeros() as $t
            }

            #[inline]
            fn high_bit_position(self) -> $t {
                if self == 0 {
                    <$t>::BITS as $t
                } else {
                    (<$t>::BITS - 1 - self.leading_zeros()) as $t
                }
            }

            #[inline]
            fn significant_bits(self) -> $t {
                (<$t>::BITS - self.leading_zeros()) as $t
            }

            #[inline]
            fn leading_zero_bits(self) -> $t {
                self.leading_zeros() as $t
            }

            #[inline]
            fn trailing_zero_bits(self) -> $t {
                self.trailing_zeros() as $t
            }

            #[inline]
            fn bit_count(self) -> $t {
                self.count_ones() as $t
            }

            #[inline]
            fn reverse_bits(self) -> $t {
                <$t>::reverse_bits(self)
            }
        }
    )*};
}

unsigned_bit_ops!(u16, u32, u64);

macro_rules! signed_bit_ops {
    ($(($s:ty, $u:ty)),*) => {$(
        impl BitOps for $s {
            #[inline]
            fn low_bit(self) -> $s {
                (self as $u).low_bit() as $s
            }

            #[inline]
            fn high_bit(self) -> $s {
                (self as $u).high_bit() as $s
            }

            #[inline]
            fn low_bit_position(self) -> $s {
                if self == 0 { -1 } else { (self as $u).low_bit_position() as $s }
            }

            #[inline]
            fn high_bit_position(self) -> $s {
                if self == 0 { -1 } else { (self as $u).high_bit_position() as $s }
            }

            #[inline]
            fn significant_bits(self) -> $s {
                (self as $u).significant_bits() as $s
            }

            #[inline]
            fn leading_zero_bits(self) -> $s {
                (self as $u).leading_zero_bits() as $s
            }

            #[inline]
            fn trailing_zero_bits(self) -> $s {
                (self as $u).trailing_zero_bits() as $s
            }

            #[inline]
            fn bit_count(self) -> $s {
                (self as $u).bit_count() as $s
            }

            #[inline]
            fn reverse_bits(self) -> $s {
                (self as $u).reverse_bits() as $s
            }
        }
    )*};
}

signed_bit_ops!((i8, u8), (i16, u16), (i32, u32), (i64, u64));
