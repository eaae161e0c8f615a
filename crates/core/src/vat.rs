//! VAT-inclusive amount calculation.
//!
//! Amounts are rounded in two stages: first to cents (fixed-point money),
//! then up to the next whole currency unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// VAT rates accepted by the bookkeeping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VatRate {
    /// 0% (exempt).
    Zero,
    /// 6% (books, passenger transport).
    Six,
    /// 12% (food, hotels).
    Twelve,
    /// 25% (standard rate).
    TwentyFive,
}

/// A VAT rate outside the fixed enumeration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported VAT rate {0}; expected one of 0, 0.06, 0.12, 0.25")]
pub struct UnsupportedVatRate(pub Decimal);

impl VatRate {
    /// All supported rates.
    pub const ALL: [Self; 4] = [Self::Zero, Self::Six, Self::Twelve, Self::TwentyFive];

    /// The rate as a fraction (0.06 for 6%).
    #[must_use]
    pub const fn rate(self) -> Decimal {
        match self {
            Self::Zero => Decimal::ZERO,
            Self::Six => Decimal::from_parts(6, 0, 0, false, 2),
            Self::Twelve => Decimal::from_parts(12, 0, 0, false, 2),
            Self::TwentyFive => Decimal::from_parts(25, 0, 0, false, 2),
        }
    }
}

impl TryFrom<Decimal> for VatRate {
    type Error = UnsupportedVatRate;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.rate() == value)
            .ok_or(UnsupportedVatRate(value))
    }
}

/// Computes the amount including VAT, rounded up to a whole unit.
///
/// `amount_ex_vat * (1 + rate)` is rounded to two decimals (midpoint away
/// from zero) and then ceiled. Amounts outside the `i64` range saturate.
#[must_use]
pub fn compute_amount_including_vat(amount_ex_vat: Decimal, rate: VatRate) -> i64 {
    let factor = Decimal::ONE + rate.rate();
    let gross = amount_ex_vat.checked_mul(factor).unwrap_or(if amount_ex_vat.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });

    let cents = gross.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = cents.ceil();

    whole.to_i64().unwrap_or(if whole.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), VatRate::Zero, 100)]
    #[case(dec!(100), VatRate::Six, 106)]
    #[case(dec!(100), VatRate::Twelve, 112)]
    #[case(dec!(100), VatRate::TwentyFive, 125)]
    #[case(dec!(50000), VatRate::Zero, 50000)]
    #[case(dec!(50000), VatRate::Six, 53000)]
    #[case(dec!(50000), VatRate::Twelve, 56000)]
    #[case(dec!(50000), VatRate::TwentyFive, 62500)]
    #[case(dec!(1256.12), VatRate::Zero, 1257)]
    #[case(dec!(1256.12), VatRate::Six, 1332)]
    #[case(dec!(1256.12), VatRate::Twelve, 1407)]
    #[case(dec!(1256.12), VatRate::TwentyFive, 1571)]
    fn test_amount_including_vat(
        #[case] amount: Decimal,
        #[case] rate: VatRate,
        #[case] expected: i64,
    ) {
        assert_eq!(compute_amount_including_vat(amount, rate), expected);
    }

    #[test]
    fn test_rounds_to_cents_before_ceiling() {
        // 100.004 -> 100.00 at cent precision, so no extra unit is added.
        assert_eq!(compute_amount_including_vat(dec!(100.004), VatRate::Zero), 100);
        // 100.005 -> 100.01, which ceils to 101.
        assert_eq!(compute_amount_including_vat(dec!(100.005), VatRate::Zero), 101);
    }

    #[test]
    fn test_zero_amount() {
        for rate in VatRate::ALL {
            assert_eq!(compute_amount_including_vat(Decimal::ZERO, rate), 0);
        }
    }

    #[test]
    fn test_huge_amount_saturates() {
        assert_eq!(
            compute_amount_including_vat(Decimal::MAX, VatRate::TwentyFive),
            i64::MAX
        );
    }

    #[test]
    fn test_rate_from_decimal() {
        assert_eq!(VatRate::try_from(dec!(0)), Ok(VatRate::Zero));
        assert_eq!(VatRate::try_from(dec!(0.06)), Ok(VatRate::Six));
        assert_eq!(VatRate::try_from(dec!(0.120)), Ok(VatRate::Twelve));
        assert_eq!(VatRate::try_from(dec!(0.25)), Ok(VatRate::TwentyFive));
        assert!(VatRate::try_from(dec!(0.07)).is_err());
        assert!(VatRate::try_from(dec!(25)).is_err());
    }

    fn rate_strategy() -> impl Strategy<Value = VatRate> {
        prop_oneof![
            Just(VatRate::Zero),
            Just(VatRate::Six),
            Just(VatRate::Twelve),
            Just(VatRate::TwentyFive),
        ]
    }

    proptest! {
        /// The result is the smallest whole unit not below the cent-rounded gross.
        #[test]
        fn prop_result_is_ceiling_of_cent_rounded_gross(
            cents in 0i64..10_000_000_000,
            rate in rate_strategy(),
        ) {
            let amount = Decimal::new(cents, 2);
            let gross = (amount * (Decimal::ONE + rate.rate()))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let result = Decimal::from(compute_amount_including_vat(amount, rate));

            prop_assert!(result >= gross);
            prop_assert!(result - gross < Decimal::ONE);
        }

        /// Whole amounts at 0% pass through unchanged.
        #[test]
        fn prop_zero_rate_passthrough(amount in 0i64..1_000_000_000_000) {
            prop_assert_eq!(
                compute_amount_including_vat(Decimal::from(amount), VatRate::Zero),
                amount
            );
        }

        /// A larger net amount never produces a smaller gross amount.
        #[test]
        fn prop_monotonic(
            a in 0i64..1_000_000_000,
            b in 0i64..1_000_000_000,
            rate in rate_strategy(),
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                compute_amount_including_vat(Decimal::new(low, 2), rate)
                    <= compute_amount_including_vat(Decimal::new(high, 2), rate)
            );
        }
    }
}
