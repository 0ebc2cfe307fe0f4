// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::error::AppError;

/// Two decimal places, half-up. The result always carries scale 2 so that
/// `5000` serializes as `"5000.00"`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Clamps a percentage edit into `[0, 100]`.
pub fn clamp_percentage(pct: Decimal) -> Decimal {
    pct.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

/// `round2(total * pct / 100)`, or `0.00` when the total is not positive.
pub fn amount_from_percentage(total: Decimal, pct: Decimal) -> Result<Decimal, AppError> {
    if total <= Decimal::ZERO {
        return Ok(round2(Decimal::ZERO));
    }
    total
        .checked_mul(pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(round2)
        .ok_or(AppError::AmountOutOfRange)
}

/// `round2(amount / total * 100)`, or `0` when the total is not positive.
pub fn percentage_from_amount(total: Decimal, amount: Decimal) -> Result<Decimal, AppError> {
    if total <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(total)
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
        .map(round2)
        .ok_or(AppError::AmountOutOfRange)
}

pub fn checked_sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(AppError::AmountOutOfRange)
}

pub fn checked_sub(lhs: Decimal, rhs: Decimal) -> Result<Decimal, AppError> {
    lhs.checked_sub(rhs).ok_or(AppError::AmountOutOfRange)
}

/// "AED 10000.00"
pub fn format_money(currency: &str, value: Decimal) -> String {
    format!("{} {}", currency, round2(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn round2_is_half_up_and_keeps_two_places() {
        assert_eq!(round2(d("1.005")).to_string(), "1.01");
        assert_eq!(round2(d("1.004")).to_string(), "1.00");
        assert_eq!(round2(d("5000")).to_string(), "5000.00");
        assert_eq!(round2(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn percentage_conversions_handle_zero_total() {
        assert_eq!(amount_from_percentage(Decimal::ZERO, d("50")).unwrap().to_string(), "0.00");
        assert_eq!(percentage_from_amount(Decimal::ZERO, d("50")).unwrap(), Decimal::ZERO);
        assert_eq!(amount_from_percentage(d("10000"), d("12.5")).unwrap().to_string(), "1250.00");
        assert_eq!(percentage_from_amount(d("3000"), d("1000")).unwrap().to_string(), "33.33");
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert!(matches!(
            amount_from_percentage(Decimal::MAX, d("50")),
            Err(AppError::AmountOutOfRange)
        ));
        assert!(matches!(
            percentage_from_amount(d("0.01"), d("1000000000000000000000000000")),
            Err(AppError::AmountOutOfRange)
        ));
        assert!(matches!(
            checked_sum([Decimal::MAX, Decimal::MAX]),
            Err(AppError::AmountOutOfRange)
        ));
        assert!(matches!(checked_sub(Decimal::MIN, Decimal::MAX), Err(AppError::AmountOutOfRange)));
        assert_eq!(checked_sum([d("1.50"), d("2.25")]).unwrap(), d("3.75"));
    }

    #[test]
    fn clamp_keeps_percentages_in_range() {
        assert_eq!(clamp_percentage(d("-3")), Decimal::ZERO);
        assert_eq!(clamp_percentage(d("140")), d("100"));
        assert_eq!(clamp_percentage(d("42.5")), d("42.5"));
    }

    #[test]
    fn formats_with_currency_code() {
        assert_eq!(format_money("AED", d("9000")), "AED 9000.00");
    }
}
