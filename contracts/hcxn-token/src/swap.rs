use soroban_sdk::{contracttype, log, token::TokenClient, Address, Env, Symbol};

use crate::{ledger, math, Config, DataKey, HcxnError};

/// Fixed exchange ratio, applied as `amount * numerator / denominator`.
///
/// The buy rate is tokens per collateral unit and the sell rate is
/// collateral per token. The two are configured independently and are not
/// expected to be reciprocal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rate {
    pub numerator: i128,
    pub denominator: i128,
}

impl Rate {
    pub fn is_valid(&self) -> bool {
        self.numerator >= 0 && self.denominator > 0
    }

    pub fn apply(&self, env: &Env, amount: i128) -> Result<i128, HcxnError> {
        math::mul_div(env, amount, self.numerator, self.denominator)
    }
}

// ─── Reserve collateral ─────────────────────────────────────────

pub fn reserve_collateral(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::ReserveCollateral)
        .unwrap_or(0)
}

pub fn set_reserve_collateral(env: &Env, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::ReserveCollateral, &amount);
}

// ─── Swaps ──────────────────────────────────────────────────────

/// Pull `amount_in` collateral from `buyer` and mint tokens at the buy rate.
pub fn buy(
    env: &Env,
    config: &Config,
    buyer: &Address,
    amount_in: i128,
) -> Result<i128, HcxnError> {
    if amount_in <= 0 {
        return Err(HcxnError::InvalidAmount);
    }
    let minted = config.buy_rate.apply(env, amount_in)?;
    let collateral = math::checked_add(reserve_collateral(env), amount_in)?;

    TokenClient::new(env, &config.collateral).transfer(
        buyer,
        &env.current_contract_address(),
        &amount_in,
    );
    set_reserve_collateral(env, collateral);
    ledger::mint(env, buyer, minted)?;

    log!(env, "buy: {} collateral -> {} HCXN", amount_in, minted);
    env.events()
        .publish((Symbol::new(env, "buy"), buyer.clone()), (amount_in, minted));

    Ok(minted)
}

/// Move `amount` tokens into the reserve and pay the seller collateral at
/// the sell rate. The tokens stay in circulation as reserve-owned supply.
pub fn sell(env: &Env, config: &Config, seller: &Address, amount: i128) -> Result<i128, HcxnError> {
    ledger::require_non_negative(amount)?;
    if ledger::balance(env, seller) < amount {
        return Err(HcxnError::InsufficientBalance);
    }
    let payout = config.sell_rate.apply(env, amount)?;
    let collateral = reserve_collateral(env);
    if collateral < payout {
        return Err(HcxnError::InsufficientReserve);
    }

    ledger::move_balance(env, seller, &ledger::reserve_address(env), amount)?;
    set_reserve_collateral(env, collateral - payout);
    if payout > 0 {
        TokenClient::new(env, &config.collateral).transfer(
            &env.current_contract_address(),
            seller,
            &payout,
        );
    }

    log!(env, "sell: {} HCXN -> {} collateral", amount, payout);
    env.events()
        .publish((Symbol::new(env, "sell"), seller.clone()), (amount, payout));

    Ok(payout)
}
