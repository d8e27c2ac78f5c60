use soroban_sdk::{log, Env, Symbol};
use stellar_tokens::fungible::Base;

use crate::{ledger, math, oracle, swap, Config, DataKey, HcxnError};

/// Relative gap between target and actual reserve tokens that must be
/// exceeded before an adjustment happens: 100 bps = 1%.
pub const ADJUSTMENT_THRESHOLD_BPS: u32 = 100;

/// Share of the gap applied per adjustment: 1000 bps = 10%.
pub const CORRECTION_BPS: u32 = 1_000;

/// Adjustment interval used by the reference deployment (6 hours).
pub const DEFAULT_ADJUSTMENT_INTERVAL: u64 = 6 * 60 * 60;

/// What a single check-and-adjust pass did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Adjustment {
    /// Interval not elapsed; the oracle was not read.
    Idle,
    /// Oracle read, deviation within the band (or a zero correction).
    WithinBand,
    Minted(i128),
    Burned(i128),
    /// Contraction required more tokens than the reserve holds.
    Skipped(i128),
}

pub fn last_adjustment(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::LastAdjustment)
        .unwrap_or(0)
}

pub fn set_last_adjustment(env: &Env, timestamp: u64) {
    env.storage()
        .instance()
        .set(&DataKey::LastAdjustment, &timestamp);
}

pub fn next_adjustment(env: &Env, config: &Config) -> u64 {
    last_adjustment(env).saturating_add(config.adjustment_interval)
}

/// Reserve tokens the reserve collateral is worth at `price`, at a peg of
/// one token per unit of account.
pub fn target_reserve_tokens(
    env: &Env,
    reserve_collateral: i128,
    price: i128,
) -> Result<i128, HcxnError> {
    math::mul_div(env, reserve_collateral, price, math::SCALE)
}

/// Signed correction toward `target`, or zero when `target` lies inside
/// the threshold band around `actual`. A deviation of exactly the
/// threshold does not count.
pub fn correction(target: i128, actual: i128, config: &Config) -> Result<i128, HcxnError> {
    let threshold = config.threshold_bps as i128;
    let scaled_target = target
        .checked_mul(math::BPS_DENOMINATOR)
        .ok_or(HcxnError::ArithmeticOverflow)?;
    let upper = actual
        .checked_mul(math::BPS_DENOMINATOR + threshold)
        .ok_or(HcxnError::ArithmeticOverflow)?;
    let lower = actual
        .checked_mul(math::BPS_DENOMINATOR - threshold)
        .ok_or(HcxnError::ArithmeticOverflow)?;

    if scaled_target <= upper && scaled_target >= lower {
        return Ok(0);
    }
    let gap = math::checked_sub(target, actual)?;
    math::apply_bps(gap, config.correction_bps as i128)
}

/// Run the interval-gated reserve correction at time `now`.
///
/// Only the reserve's token balance and the total supply can change. The
/// gate resets on every eligible pass, whether or not anything was minted
/// or burned, and missed intervals are not caught up.
pub fn check_and_adjust(env: &Env, config: &Config, now: u64) -> Result<Adjustment, HcxnError> {
    if now.saturating_sub(last_adjustment(env)) < config.adjustment_interval {
        return Ok(Adjustment::Idle);
    }

    let price = oracle::current_price(env, &config.oracle)?;
    let reserve = ledger::reserve_address(env);
    let actual = ledger::balance(env, &reserve);
    let target = target_reserve_tokens(env, swap::reserve_collateral(env), price)?;
    let delta = correction(target, actual, config)?;

    let outcome = if delta > 0 {
        ledger::mint(env, &reserve, delta)?;
        Adjustment::Minted(delta)
    } else if delta < 0 {
        let amount = -delta;
        if actual < amount {
            Adjustment::Skipped(amount)
        } else {
            ledger::burn(env, &reserve, amount)?;
            Adjustment::Burned(amount)
        }
    } else {
        Adjustment::WithinBand
    };

    set_last_adjustment(env, now);

    log!(
        env,
        "rebalance: price={} target={} actual={} correction={} supply={}",
        price,
        target,
        actual,
        delta,
        Base::total_supply(env)
    );
    env.events().publish(
        (Symbol::new(env, "rebalance"),),
        (price, target, actual, delta),
    );

    Ok(outcome)
}
