use soroban_sdk::{Address, Env, Symbol};
use stellar_tokens::fungible::Base;

use crate::HcxnError;

/// All-zero ed25519 account, the conventional Stellar burn address.
/// Stands in for the missing side of mint/burn transfer events and is
/// never a valid transfer recipient.
const NULL_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

pub fn null_address(env: &Env) -> Address {
    Address::from_str(env, NULL_ACCOUNT)
}

/// The reserve is the contract's own ledger entry.
pub fn reserve_address(env: &Env) -> Address {
    env.current_contract_address()
}

pub fn balance(env: &Env, id: &Address) -> i128 {
    Base::balance(env, id)
}

pub fn require_non_negative(amount: i128) -> Result<(), HcxnError> {
    if amount < 0 {
        return Err(HcxnError::InvalidAmount);
    }
    Ok(())
}

fn require_balance(env: &Env, owner: &Address, amount: i128) -> Result<(), HcxnError> {
    require_non_negative(amount)?;
    if balance(env, owner) < amount {
        return Err(HcxnError::InsufficientBalance);
    }
    Ok(())
}

/// Move `amount` between two holders. Zero-amount moves still notify.
pub fn move_balance(
    env: &Env,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), HcxnError> {
    if *to == null_address(env) {
        return Err(HcxnError::InvalidRecipient);
    }
    require_balance(env, from, amount)?;
    Base::update(env, Some(from), Some(to), amount);
    emit_transfer(env, from, to, amount);
    Ok(())
}

pub fn mint(env: &Env, to: &Address, amount: i128) -> Result<(), HcxnError> {
    require_non_negative(amount)?;
    Base::total_supply(env)
        .checked_add(amount)
        .ok_or(HcxnError::ArithmeticOverflow)?;
    Base::update(env, None, Some(to), amount);
    emit_transfer(env, &null_address(env), to, amount);
    Ok(())
}

pub fn burn(env: &Env, from: &Address, amount: i128) -> Result<(), HcxnError> {
    require_balance(env, from, amount)?;
    Base::update(env, Some(from), None, amount);
    emit_transfer(env, from, &null_address(env), amount);
    Ok(())
}

/// Consume `amount` of the allowance `owner` granted to `spender`.
pub fn spend_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), HcxnError> {
    require_non_negative(amount)?;
    if Base::allowance(env, owner, spender) < amount {
        return Err(HcxnError::InsufficientAllowance);
    }
    Base::spend_allowance(env, owner, spender, amount);
    Ok(())
}

// ─── Notifications ──────────────────────────────────────────────

pub fn emit_transfer(env: &Env, from: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "transfer"), from.clone(), to.clone()),
        amount,
    );
}
