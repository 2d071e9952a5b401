//! Fixed-point currency for deterministic settlement.
//!
//! The treasury is denominated in ten-thousands of taels. With a scale of
//! 10000 one raw unit is exactly one tael, so per-head costs (15 taels of
//! upkeep, 2 taels of recruitment) never need fractional storage.
//! Floats only appear at the parse and display boundary.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Fixed-point value with scale 10000.
///
/// `Fixed::ONE` is ten thousand taels; `Fixed(1)` is one tael.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Fixed(pub i64);

impl Fixed {
    /// Scale factor: 10000 = 1.0
    pub const SCALE: i64 = 10000;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(10000);
    pub const HALF: Fixed = Fixed(5000);

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// Create from integer (e.g., 5 → 50_000). Saturates at the i64 range.
    #[inline]
    pub const fn from_int(v: i64) -> Self {
        Fixed(v.saturating_mul(Self::SCALE))
    }

    /// Convert from f32 (parse layer only, not in sim logic).
    ///
    /// Uses `.round()` for cross-platform determinism. NaN and infinities map
    /// to zero; out-of-range values saturate.
    pub fn from_f32(v: f32) -> Self {
        if !v.is_finite() {
            return Fixed::ZERO;
        }
        let scaled = v as f64 * Self::SCALE as f64;
        if scaled >= i64::MAX as f64 {
            return Fixed(i64::MAX);
        }
        if scaled <= i64::MIN as f64 {
            return Fixed(i64::MIN);
        }
        Fixed(scaled.round() as i64)
    }

    /// Display only.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Truncate toward zero.
    #[inline]
    pub const fn to_int(self) -> i64 {
        self.0 / Self::SCALE
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn saturating_add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }

    #[inline]
    pub fn saturating_sub(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(other.0))
    }

    /// Multiply by a plain integer count (e.g. heads of troops), saturating.
    #[inline]
    pub fn mul_int(self, n: i64) -> Fixed {
        Fixed(self.0.saturating_mul(n))
    }

    /// Multiply by a plain integer count, `None` on overflow.
    #[inline]
    pub fn checked_mul_int(self, n: i64) -> Option<Fixed> {
        self.0.checked_mul(n).map(Fixed)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0 + other.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, other: Fixed) {
        self.0 += other.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0 - other.0)
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, other: Fixed) {
        self.0 -= other.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, other: Fixed) -> Fixed {
        Fixed((self.0 as i128 * other.0 as i128 / Fixed::SCALE as i128) as i64)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, other: Fixed) -> Fixed {
        if other.0 == 0 {
            return Fixed::ZERO;
        }
        Fixed((self.0 as i128 * Fixed::SCALE as i128 / other.0 as i128) as i64)
    }
}

impl std::iter::Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, x| acc + x)
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({} = {})", self.0, self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

/// Splits annual amounts into monthly installments without drift.
///
/// The sub-tael remainder of each division by twelve is carried into the next
/// installment, so twelve consecutive installments of a constant annual
/// amount always sum to exactly that amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonthlyAccrual {
    /// Carried remainder in raw units, always in `0..months`.
    remainder: i64,
}

impl MonthlyAccrual {
    pub const MONTHS: i64 = nanming_data::defines::economy::MONTHS_PER_YEAR;

    pub fn remainder(&self) -> i64 {
        self.remainder
    }

    /// Returns this month's share of `annual` and updates the carry.
    pub fn installment(&mut self, annual: Fixed) -> Fixed {
        let total = annual.0.saturating_add(self.remainder);
        self.remainder = total.rem_euclid(Self::MONTHS);
        Fixed(total.div_euclid(Self::MONTHS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Fixed::ZERO.0, 0);
        assert_eq!(Fixed::ONE.0, 10000);
        assert_eq!(Fixed::HALF.0, 5000);
    }

    #[test]
    fn test_one_raw_unit_is_one_tael() {
        // 50,000 recruits at 2 taels a head is ten treasury units.
        assert_eq!(Fixed::from_raw(2).mul_int(50_000), Fixed::from_int(10));
    }

    #[test]
    fn test_mul_int_overflow() {
        let cost = Fixed::from_raw(2);
        assert_eq!(cost.checked_mul_int(i64::MAX), None);
        assert_eq!(cost.checked_mul_int((1 << 62) + 1), None);
        assert_eq!(cost.checked_mul_int(1 << 61), Some(Fixed(1 << 62)));
        assert_eq!(cost.mul_int(i64::MAX), Fixed(i64::MAX));
        assert_eq!(cost.mul_int(i64::MIN), Fixed(i64::MIN));
        assert_eq!((-cost).mul_int(i64::MAX), Fixed(i64::MIN));
    }

    #[test]
    fn test_from_int_saturates() {
        assert_eq!(Fixed::from_int(1_000_000_000_000_000), Fixed(i64::MAX));
        assert_eq!(Fixed::from_int(-1_000_000_000_000_000), Fixed(i64::MIN));
    }

    #[test]
    fn test_from_f32() {
        assert_eq!(Fixed::from_f32(0.25), Fixed(2500));
        assert_eq!(Fixed::from_f32(1.0), Fixed::ONE);
        assert_eq!(Fixed::from_f32(0.7), Fixed(7000));
        assert_eq!(Fixed::from_f32(f32::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f32(f32::INFINITY), Fixed::ZERO);
        assert_eq!(Fixed::from_f32(1e20), Fixed(i64::MAX));
        assert_eq!(Fixed::from_f32(-1e20), Fixed(i64::MIN));
    }

    #[test]
    fn test_multiply_and_divide() {
        assert_eq!(Fixed::from_int(2) * Fixed::from_int(3), Fixed::from_int(6));
        assert_eq!(Fixed::HALF * Fixed::HALF, Fixed(2500));
        assert_eq!(Fixed::from_int(6) / Fixed::from_int(2), Fixed::from_int(3));
        assert_eq!(Fixed::from_int(6) / Fixed::ZERO, Fixed::ZERO);
    }

    #[test]
    fn test_display_four_decimals() {
        assert_eq!(Fixed::from_raw(12_345).to_string(), "1.2345");
        assert_eq!((-Fixed::HALF).to_string(), "-0.5000");
    }

    #[test]
    fn test_accrual_carries_remainder() {
        let mut accrual = MonthlyAccrual::default();
        // 25 taels a year: 2, 2, 2, ... with the odd tael released in month 12.
        let installments: Vec<i64> = (0..12)
            .map(|_| accrual.installment(Fixed::from_raw(25)).raw())
            .collect();
        assert_eq!(installments.iter().sum::<i64>(), 25);
        assert_eq!(accrual.remainder(), 0);
    }

    #[test]
    fn test_accrual_handles_deficits() {
        let mut accrual = MonthlyAccrual::default();
        let first = accrual.installment(Fixed::from_raw(-25));
        assert_eq!(first, Fixed::from_raw(-3));
        assert_eq!(accrual.remainder(), 11);
        let rest: i64 = (0..11)
            .map(|_| accrual.installment(Fixed::from_raw(-25)).raw())
            .sum();
        assert_eq!(first.raw() + rest, -25);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn game_value() -> impl Strategy<Value = i64> {
            -1_000_000..=1_000_000i64
        }

        proptest! {
            #[test]
            fn mul_is_commutative(a in game_value(), b in game_value()) {
                let x = Fixed::from_int(a);
                let y = Fixed::from_int(b);
                prop_assert_eq!(x * y, y * x);
            }

            #[test]
            fn mul_one_is_identity(a in game_value()) {
                prop_assert_eq!(Fixed::from_int(a) * Fixed::ONE, Fixed::from_int(a));
            }

            #[test]
            fn div_never_panics(a in game_value(), b in game_value()) {
                let _ = Fixed::from_int(a) / Fixed::from_int(b);
            }

            #[test]
            fn from_f32_never_panics(f in proptest::num::f32::ANY) {
                let _ = Fixed::from_f32(f);
            }

            /// Twelve installments of a constant annual amount sum to it exactly,
            /// whatever carry the accrual starts with.
            #[test]
            fn accrual_year_is_exact(
                annual in -10_000_000_000i64..=10_000_000_000i64,
                warmup in proptest::collection::vec(-1_000_000i64..=1_000_000, 0..24),
            ) {
                let mut accrual = MonthlyAccrual::default();
                for w in warmup {
                    accrual.installment(Fixed::from_raw(w));
                }
                let start = accrual.remainder();
                let year: i64 = (0..12)
                    .map(|_| accrual.installment(Fixed::from_raw(annual)).raw())
                    .sum();
                prop_assert_eq!(year, annual);
                prop_assert_eq!(accrual.remainder(), start);
            }
        }
    }
}
