use soroban_sdk::{Env, I256};

use crate::HcxnError;

/// 18-decimal fixed-point scale shared by token amounts, collateral and prices.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

pub const BPS_DENOMINATOR: i128 = 10_000;

/// `a * b / denom`, truncated toward zero, with a 256-bit intermediate product.
///
/// Products of two 18-decimal quantities overflow `i128` well inside the
/// realistic range (0.125e18 * 3200e18 is already 4e38), so the
/// multiplication runs on host `I256` values and only the quotient has to
/// fit back into `i128`.
pub fn mul_div(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, HcxnError> {
    if denom == 0 {
        return Err(HcxnError::ArithmeticOverflow);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denom);
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, denom))
        .to_i128()
        .ok_or(HcxnError::ArithmeticOverflow)
}

/// Scale an amount by a basis-point factor, truncated toward zero.
pub fn apply_bps(amount: i128, bps: i128) -> Result<i128, HcxnError> {
    amount
        .checked_mul(bps)
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(HcxnError::ArithmeticOverflow)
}

pub fn checked_add(a: i128, b: i128) -> Result<i128, HcxnError> {
    a.checked_add(b).ok_or(HcxnError::ArithmeticOverflow)
}

pub fn checked_sub(a: i128, b: i128) -> Result<i128, HcxnError> {
    a.checked_sub(b).ok_or(HcxnError::ArithmeticOverflow)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mul_div_small_values_stay_native() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 3, 4), Ok(7));
        assert_eq!(mul_div(&env, -10, 3, 4), Ok(-7));
    }

    #[test]
    fn test_mul_div_wide_product() {
        let env = Env::default();
        // 0.125 collateral at 3200 per unit is worth 400 tokens.
        let collateral = SCALE / 8;
        let price = 3_200 * SCALE;
        assert_eq!(mul_div(&env, collateral, price, SCALE), Ok(400 * SCALE));
    }

    #[test]
    fn test_mul_div_quotient_overflow() {
        let env = Env::default();
        assert_eq!(
            mul_div(&env, i128::MAX, i128::MAX, 1),
            Err(HcxnError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 1, 1, 0), Err(HcxnError::ArithmeticOverflow));
    }

    #[test]
    fn test_apply_bps_truncates_toward_zero() {
        assert_eq!(apply_bps(300 * SCALE, 1_000), Ok(30 * SCALE));
        assert_eq!(apply_bps(-15, 1_000), Ok(-1));
        assert_eq!(apply_bps(15, 1_000), Ok(1));
    }
}
