//! Unsigned 128-bit integer built from two 64-bit limbs.
//!
//! Add, subtract and multiply wrap modulo 2^128. Multiplication works in
//! 32-bit half-words so no intermediate product can overflow a limb, and
//! division picks one of three routines by divisor width: 32-bit schoolbook
//! long division, 64-bit normalized two-digit division (Knuth's algorithm D
//! with quotient-digit correction), or an estimate-and-refine loop for full
//! 128-bit divisors. Every division routine produces quotient and remainder
//! together; the `/` and `%` operators project one side.

use crate::base2::Base2;
use crate::bits::BitOps;
use core::cmp::Ordering;
use core::fmt;
use core::ops;
use thiserror::Error;

/// a narrowing conversion from [`U128`] lost significant bits
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("value does not fit in the target integer width")]
pub struct TryFromU128Error;

/// Unsigned 128-bit integer as a high and a low 64-bit limb.
///
/// Field order makes the derived comparison order the numeric order.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U128 {
    hi: u64,
    lo: u64,
}

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (sum, c0) = a.overflowing_add(b);
    let (sum, c1) = sum.overflowing_add(carry as u64);
    (sum, c0 | c1)
}

/// Computes `a - (b + borrow)`, returning the result along with the new
/// borrow. The returned borrow is set if `a < b + borrow`.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (diff, b0) = a.overflowing_sub(b);
    let (diff, b1) = diff.overflowing_sub(borrow as u64);
    (diff, b0 | b1)
}

impl U128 {
    pub const ZERO: U128 = U128::new(0, 0);
    pub const ONE: U128 = U128::new(0, 1);
    pub const MIN: U128 = U128::ZERO;
    pub const MAX: U128 = U128::new(u64::MAX, u64::MAX);

    #[inline]
    pub const fn new(hi: u64, lo: u64) -> Self {
        U128 { hi, lo }
    }

    /// returns the low 64 bits; converting down through this truncates
    #[inline]
    pub const fn low(self) -> u64 {
        self.lo
    }

    /// returns the high 64 bits
    #[inline]
    pub const fn high(self) -> u64 {
        self.hi
    }

    /// true when the value fits in a u64
    #[inline]
    pub const fn fits_u64(self) -> bool {
        self.hi == 0
    }

    /// Computes the full 128-bit product of two 64-bit values by 32-bit
    /// half-word schoolbook multiplication.
    pub const fn widening_mul(left: u64, right: u64) -> U128 {
        let left_hi = left >> 32;
        let right_hi = right >> 32;
        // both fit 32 bits, the native product cannot overflow
        if left_hi | right_hi == 0 {
            return U128::new(0, left * right);
        }
        let left_lo = left & 0xffff_ffff;
        let right_lo = right & 0xffff_ffff;
        let mut hi = left_hi * right_hi;
        let lo = left_lo * right_lo;
        let mut mid = left_lo * right_hi;
        let mid2 = left_hi * right_lo;
        mid = mid.wrapping_add(mid2);
        hi += mid >> 32;
        if mid < mid2 {
            // the middle partial sum carried
            hi += 1 << 32;
        }
        let mid = mid << 32;
        let lo = lo.wrapping_add(mid);
        if lo < mid {
            hi += 1;
        }
        U128::new(hi, lo)
    }

    /// Computes the full 128-bit square of a 64-bit value. Same shape as
    /// [`widening_mul`](U128::widening_mul) but with the one repeated
    /// partial product computed once.
    pub const fn widening_square(value: u64) -> U128 {
        if value <= u32::MAX as u64 {
            return U128::new(0, value * value);
        }
        let hi_half = value >> 32;
        let lo_half = value & 0xffff_ffff;
        let mid = lo_half * hi_half;
        let mut hi = hi_half * hi_half;
        let lo = lo_half * lo_half;
        // mid counts twice; the off-by-one shifts below fold the doubling
        // in without shifting a bit off the top
        hi += mid >> 31;
        let mid = mid << 33;
        let lo = lo.wrapping_add(mid);
        if lo < mid {
            hi += 1;
        }
        U128::new(hi, lo)
    }

    /// Returns the quotient and remainder of `self / rhs` together.
    ///
    /// Panics when `rhs` is zero.
    pub fn div_rem(self, rhs: U128) -> (U128, U128) {
        if rhs.hi == 0 {
            let (quot, rem) = self.div_rem_u64(rhs.lo);
            return (quot, U128::from(rem));
        }
        if self < rhs {
            return (U128::ZERO, self);
        }
        if rhs.is_power_of_2() {
            let shift = 64 + rhs.hi.high_bit_position() as u32;
            return (self >> shift, self & (rhs - U128::ONE));
        }
        let (quot, rem) = self.div_rem_wide(rhs);
        (U128::from(quot), rem)
    }

    /// Returns the quotient and the 64-bit remainder of `self / rhs`.
    ///
    /// Panics when `rhs` is zero.
    pub fn div_rem_u64(self, rhs: u64) -> (U128, u64) {
        if rhs <= u32::MAX as u64 {
            let (quot, rem) = self.div_rem_u32(rhs as u32);
            return (quot, rem as u64);
        }
        if self.hi == 0 && self.lo < rhs {
            return (U128::ZERO, self.lo);
        }
        if rhs.is_power_of_2() {
            let pos = rhs.high_bit_position() as u32;
            return (self >> pos, self.lo & (rhs - 1));
        }
        let mut res_hi = 0;
        let mut rem_hi = self.hi;
        // bring the high limb under the divisor so the narrow division's
        // quotient fits a single limb
        if rem_hi >= rhs {
            res_hi = rem_hi / rhs;
            rem_hi -= res_hi * rhs;
        }
        if rem_hi == 0 {
            return (U128::new(res_hi, self.lo / rhs), self.lo % rhs);
        }
        let (quot, rem) = div_2x1(rem_hi, self.lo, rhs);
        (U128::new(res_hi, quot), rem)
    }

    pub fn checked_div(self, rhs: U128) -> Option<U128> {
        if rhs == U128::ZERO { None } else { Some(self.div_rem(rhs).0) }
    }

    pub fn checked_rem(self, rhs: U128) -> Option<U128> {
        if rhs == U128::ZERO { None } else { Some(self.div_rem(rhs).1) }
    }

    // Schoolbook long division in 32-bit digits. The sole divide-by-zero
    // check lives here: every zero divisor fits in 32 bits, so all public
    // entry points funnel down to it.
    fn div_rem_u32(self, rhs: u32) -> (U128, u32) {
        if rhs == 0 {
            panic!("attempt to divide by zero");
        }
        let den = rhs as u64;
        let hihi = (self.hi >> 32) as u32;
        let quot3 = if hihi == 0 { 0 } else { hihi / rhs };
        let mut rem: u64 = if hihi == 0 {
            self.hi
        } else {
            (((hihi % rhs) as u64) << 32) | (self.hi & 0xffff_ffff)
        };
        let quot2 = (rem / den) as u32;
        rem = ((rem % den) << 32) | (self.lo >> 32);
        let quot1 = (rem / den) as u32;
        rem = ((rem % den) << 32) | (self.lo & 0xffff_ffff);
        let quot0 = (rem / den) as u32;
        (
            U128::new(
                ((quot3 as u64) << 32) | quot2 as u64,
                ((quot1 as u64) << 32) | quot0 as u64,
            ),
            (rem % den) as u32,
        )
    }

    // Estimate-and-refine division for full-width divisors; rhs.hi != 0 and
    // self >= rhs, so the quotient fits a u64. Each pass underestimates a
    // chunk of the quotient and the remainder strictly decreases.
    fn div_rem_wide(self, rhs: U128) -> (u64, U128) {
        let mut remainder = self;
        let mut result: u64 = 0;
        let den_hi_bit = rhs.hi.high_bit_position() as u32;
        loop {
            let rem_hi_bit = remainder.hi.high_bit_position() as u32;
            let diff = rem_hi_bit - den_hi_bit;
            if diff <= 3 {
                // close enough to finish by subtraction
                loop {
                    result += 1;
                    remainder = remainder - rhs;
                    if remainder < rhs {
                        return (result, remainder);
                    }
                }
            }
            let estimate = if den_hi_bit >= 18 && diff <= 24 {
                // estimate from the high limbs alone. rhs.hi + 1 cannot
                // overflow, a MAX high limb always lands in the
                // subtraction arm above
                remainder.hi / (rhs.hi + 1)
            } else {
                // collapse the divisor into one limb, rounded up so the
                // estimate errs low
                let mut den_shift = den_hi_bit + 1;
                let mut den = (rhs >> den_shift).lo;
                match den.checked_add(1) {
                    Some(v) => den = v,
                    None => {
                        // rounding up wrapped; one more shift makes the
                        // rounded divisor exactly 1 << 63
                        den_shift += 1;
                        den = 1 << 63;
                    }
                }
                if den > remainder.hi {
                    // the narrow quotient already fits a u64
                    let (quot, _) = div_2x1(remainder.hi, remainder.lo, den);
                    quot >> den_shift
                } else {
                    let res_hi = remainder.hi / den;
                    let rem_hi = remainder.hi % den;
                    let (quot, _) = div_2x1(rem_hi, remainder.lo, den);
                    (U128::new(res_hi, quot) >> den_shift).lo
                }
            };
            result += estimate;
            remainder = remainder - rhs * estimate;
            if remainder < rhs {
                return (result, remainder);
            }
        }
    }
}

// Divides the two-limb value (high, low) by denominator, returning quotient
// and remainder. Knuth algorithm D on 32-bit digits: normalize the divisor
// so its top bit is set, estimate each quotient digit from the leading
// digits, correct the estimate downward (at most twice), and denormalize
// the remainder at the end. Requires denominator > u32::MAX and
// high < denominator, which makes the quotient fit in 64 bits.
fn div_2x1(high: u64, low: u64, denominator: u64) -> (u64, u64) {
    debug_assert!(denominator > u32::MAX as u64);
    debug_assert!(high < denominator);

    let mut den = denominator;
    let mid;
    let sh_lo;
    let shift;
    if den >> 63 != 0 {
        mid = high;
        sh_lo = low;
        shift = 0;
    } else {
        // test the 4 most significant bit positions directly before paying
        // for a full leading-zero count; that covers about 94% of possible
        // denominator values
        shift = if den >> 62 != 0 {
            1
        } else if den >> 61 != 0 {
            2
        } else if den >> 60 != 0 {
            3
        } else {
            ((den >> 32) as u32).leading_zero_bits()
        };
        den <<= shift;
        mid = (high << shift) | (low >> (64 - shift));
        sh_lo = low << shift;
    }
    let hi_sh_lo = sh_lo >> 32;
    let mut win = (mid << 32) + hi_sh_lo;
    let den_lo = den & 0xffff_ffff;
    let den_hi = den >> 32;
    let mut quot_hi = mid / den_hi;
    if quot_hi != 0 {
        let mut rhat = mid % den_hi;
        let mut right = (rhat << 32) | hi_sh_lo;
        let mut left = quot_hi * den_lo;
        while quot_hi > u32::MAX as u64 || left > right {
            quot_hi -= 1;
            rhat += den_hi;
            if rhat > u32::MAX as u64 {
                break;
            }
            right = (rhat << 32) | hi_sh_lo;
            left -= den_lo;
        }
        win = win.wrapping_sub(quot_hi.wrapping_mul(den));
    }
    let mut quot_lo = win / den_hi;
    let mut rhat = win % den_hi;
    let mut right = (rhat << 32) | (sh_lo & 0xffff_ffff);
    let mut left = quot_lo * den_lo;
    while quot_lo > u32::MAX as u64 || left > right {
        quot_lo -= 1;
        rhat += den_hi;
        if rhat > u32::MAX as u64 {
            break;
        }
        right = (rhat << 32) | (sh_lo & 0xffff_ffff);
        left -= den_lo;
    }
    let rem = (win << 32)
        .wrapping_add((sh_lo & 0xffff_ffff).wrapping_sub(quot_lo.wrapping_mul(den)))
        >> shift;
    ((quot_hi << 32) | quot_lo, rem)
}

impl ops::Add for U128 {
    type Output = U128;

    #[inline]
    fn add(self, rhs: U128) -> U128 {
        let (lo, carry) = adc(self.lo, rhs.lo, false);
        let (hi, _) = adc(self.hi, rhs.hi, carry);
        U128::new(hi, lo)
    }
}

impl ops::Add<u64> for U128 {
    type Output = U128;

    #[inline]
    fn add(self, rhs: u64) -> U128 {
        let (lo, carry) = adc(self.lo, rhs, false);
        U128::new(self.hi.wrapping_add(carry as u64), lo)
    }
}

impl ops::Sub for U128 {
    type Output = U128;

    #[inline]
    fn sub(self, rhs: U128) -> U128 {
        let (lo, borrow) = sbb(self.lo, rhs.lo, false);
        let (hi, _) = sbb(self.hi, rhs.hi, borrow);
        U128::new(hi, lo)
    }
}

impl ops::Sub<u64> for U128 {
    type Output = U128;

    #[inline]
    fn sub(self, rhs: u64) -> U128 {
        let (lo, borrow) = sbb(self.lo, rhs, false);
        U128::new(self.hi.wrapping_sub(borrow as u64), lo)
    }
}

impl ops::AddAssign for U128 {
    #[inline]
    fn add_assign(&mut self, rhs: U128) {
        *self = *self + rhs;
    }
}

impl ops::SubAssign for U128 {
    #[inline]
    fn sub_assign(&mut self, rhs: U128) {
        *self = *self - rhs;
    }
}

impl ops::Mul for U128 {
    type Output = U128;

    #[inline]
    fn mul(self, rhs: U128) -> U128 {
        // truncating product: the cross terms land on the high limb only
        let result = U128::widening_mul(self.lo, rhs.lo);
        U128::new(
            result
                .hi
                .wrapping_add(self.lo.wrapping_mul(rhs.hi))
                .wrapping_add(self.hi.wrapping_mul(rhs.lo)),
            result.lo,
        )
    }
}

impl ops::Mul<u64> for U128 {
    type Output = U128;

    #[inline]
    fn mul(self, rhs: u64) -> U128 {
        let result = U128::widening_mul(self.lo, rhs);
        U128::new(result.hi.wrapping_add(self.hi.wrapping_mul(rhs)), result.lo)
    }
}

impl ops::Div for U128 {
    type Output = U128;

    fn div(self, rhs: U128) -> U128 {
        self.div_rem(rhs).0
    }
}

impl ops::Div<u64> for U128 {
    type Output = U128;

    fn div(self, rhs: u64) -> U128 {
        self.div_rem_u64(rhs).0
    }
}

impl ops::Rem for U128 {
    type Output = U128;

    fn rem(self, rhs: U128) -> U128 {
        self.div_rem(rhs).1
    }
}

impl ops::Rem<u64> for U128 {
    type Output = u64;

    fn rem(self, rhs: u64) -> u64 {
        self.div_rem_u64(rhs).1
    }
}

impl ops::Shl<u32> for U128 {
    type Output = U128;

    #[inline]
    fn shl(self, shift: u32) -> U128 {
        if shift == 0 {
            return self;
        }
        if shift >= 64 {
            // amounts past the limb boundary mask like native shifts
            U128::new(self.lo.wrapping_shl(shift - 64), 0)
        } else {
            U128::new((self.hi << shift) | (self.lo >> (64 - shift)), self.lo << shift)
        }
    }
}

impl ops::Shr<u32> for U128 {
    type Output = U128;

    #[inline]
    fn shr(self, shift: u32) -> U128 {
        if shift == 0 {
            return self;
        }
        if shift >= 64 {
            U128::new(0, self.hi.wrapping_shr(shift - 64))
        } else {
            U128::new(self.hi >> shift, (self.lo >> shift) | (self.hi << (64 - shift)))
        }
    }
}

impl ops::ShlAssign<u32> for U128 {
    #[inline]
    fn shl_assign(&mut self, shift: u32) {
        *self = *self << shift;
    }
}

impl ops::ShrAssign<u32> for U128 {
    #[inline]
    fn shr_assign(&mut self, shift: u32) {
        *self = *self >> shift;
    }
}

impl ops::Not for U128 {
    type Output = U128;

    #[inline]
    fn not(self) -> U128 {
        U128::new(!self.hi, !self.lo)
    }
}

impl ops::BitAnd for U128 {
    type Output = U128;

    #[inline]
    fn bitand(self, rhs: U128) -> U128 {
        U128::new(self.hi & rhs.hi, self.lo & rhs.lo)
    }
}

impl ops::BitAnd<u64> for U128 {
    type Output = U128;

    #[inline]
    fn bitand(self, rhs: u64) -> U128 {
        U128::new(0, self.lo & rhs)
    }
}

impl ops::BitOr for U128 {
    type Output = U128;

    #[inline]
    fn bitor(self, rhs: U128) -> U128 {
        U128::new(self.hi | rhs.hi, self.lo | rhs.lo)
    }
}

impl ops::BitOr<u64> for U128 {
    type Output = U128;

    #[inline]
    fn bitor(self, rhs: u64) -> U128 {
        U128::new(self.hi, self.lo | rhs)
    }
}

impl ops::BitXor for U128 {
    type Output = U128;

    #[inline]
    fn bitxor(self, rhs: U128) -> U128 {
        U128::new(self.hi ^ rhs.hi, self.lo ^ rhs.lo)
    }
}

impl PartialEq<u64> for U128 {
    #[inline]
    fn eq(&self, other: &u64) -> bool {
        self.hi == 0 && self.lo == *other
    }
}

impl PartialOrd<u64> for U128 {
    #[inline]
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        if self.hi != 0 {
            Some(Ordering::Greater)
        } else {
            self.lo.partial_cmp(other)
        }
    }
}

impl BitOps for U128 {
    #[inline]
    fn low_bit(self) -> U128 {
        if self.lo != 0 {
            U128::new(0, self.lo.low_bit())
        } else {
            U128::new(self.hi.low_bit(), 0)
        }
    }

    #[inline]
    fn high_bit(self) -> U128 {
        if self.hi != 0 {
            U128::new(self.hi.high_bit(), 0)
        } else {
            U128::new(0, self.lo.high_bit())
        }
    }

    #[inline]
    fn low_bit_position(self) -> U128 {
        // the zero case falls through to 64 + 64
        U128::from(if self.lo != 0 {
            self.lo.low_bit_position()
        } else {
            64 + self.hi.low_bit_position()
        })
    }

    #[inline]
    fn high_bit_position(self) -> U128 {
        U128::from(if self.hi != 0 {
            64 + self.hi.high_bit_position()
        } else if self.lo != 0 {
            self.lo.high_bit_position()
        } else {
            128
        })
    }

    #[inline]
    fn significant_bits(self) -> U128 {
        U128::from(if self.hi != 0 {
            64 + self.hi.significant_bits()
        } else {
            self.lo.significant_bits()
        })
    }

    #[inline]
    fn leading_zero_bits(self) -> U128 {
        U128::from(if self.hi != 0 {
            self.hi.leading_zero_bits()
        } else {
            64 + self.lo.leading_zero_bits()
        })
    }

    #[inline]
    fn trailing_zero_bits(self) -> U128 {
        U128::from(if self.lo != 0 {
            self.lo.trailing_zero_bits()
        } else {
            64 + self.hi.trailing_zero_bits()
        })
    }

    #[inline]
    fn bit_count(self) -> U128 {
        U128::from(self.hi.bit_count() + self.lo.bit_count())
    }

    #[inline]
    fn reverse_bits(self) -> U128 {
        U128::new(self.lo.reverse_bits(), self.hi.reverse_bits())
    }
}

impl Base2 for U128 {
    #[inline]
    fn log2(self) -> U128 {
        if self == U128::ZERO { U128::MAX } else { self.high_bit_position() }
    }

    #[inline]
    fn is_power_of_2(self) -> bool {
        self != U128::ZERO && (self & (self - U128::ONE)) == U128::ZERO
    }

    #[inline]
    fn power_of_2_floor(self) -> U128 {
        self.high_bit()
    }

    fn power_of_2_ceiling(self) -> U128 {
        if self <= U128::ONE {
            return U128::ONE;
        }
        // smear the high bit down, then step to the next power; the
        // wrapping add turns the unrepresentable case into 0
        let mut v = self - U128::ONE;
        v = v | (v >> 1);
        v = v | (v >> 2);
        v = v | (v >> 4);
        v = v | (v >> 8);
        v = v | (v >> 16);
        v = v | (v >> 32);
        v = v | (v >> 64);
        v + U128::ONE
    }
}

impl From<u32> for U128 {
    #[inline]
    fn from(value: u32) -> U128 {
        U128::new(0, value as u64)
    }
}

impl From<u64> for U128 {
    #[inline]
    fn from(value: u64) -> U128 {
        U128::new(0, value)
    }
}

impl From<u128> for U128 {
    #[inline]
    fn from(value: u128) -> U128 {
        U128::new((value >> 64) as u64, value as u64)
    }
}

impl From<U128> for u128 {
    #[inline]
    fn from(value: U128) -> u128 {
        ((value.hi as u128) << 64) | value.lo as u128
    }
}

impl TryFrom<U128> for u64 {
    type Error = TryFromU128Error;

    fn try_from(value: U128) -> Result<u64, TryFromU128Error> {
        if value.hi == 0 { Ok(value.lo) } else { Err(TryFromU128Error) }
    }
}

impl TryFrom<U128> for u32 {
    type Error = TryFromU128Error;

    fn try_from(value: U128) -> Result<u32, TryFromU128Error> {
        if value.hi == 0 && value.lo <= u32::MAX as u64 {
            Ok(value.lo as u32)
        } else {
            Err(TryFromU128Error)
        }
    }
}

impl fmt::Debug for U128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hi == 0 {
            write!(f, "{:#x}", self.lo)
        } else {
            write!(f, "{:#x}{:016x}", self.hi, self.lo)
        }
    }
}
