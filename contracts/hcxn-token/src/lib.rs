#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, token::TokenClient,
    token::TokenInterface, Address, Env, MuxedAddress, String, Symbol,
};
use stellar_tokens::fungible::{burnable::emit_burn, Base};

mod ledger;
mod math;
mod oracle;
mod rebalance;
mod swap;

pub use oracle::{PriceOracle, PriceOracleClient};
pub use rebalance::{
    Adjustment, ADJUSTMENT_THRESHOLD_BPS, CORRECTION_BPS, DEFAULT_ADJUSTMENT_INTERVAL,
};
pub use swap::Rate;

// TTL constants: extend instance storage proactively to prevent archival
const TTL_THRESHOLD: u32 = 17_280; // ~1 day at 5s/ledger
const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

const DECIMALS: u32 = 18;
const NAME: &str = "HimalayaStableCoin";
const SYMBOL: &str = "HCXN";

// ─── Storage Keys ────────────────────────────────────────────────

#[contracttype]
pub enum DataKey {
    Config,
    ReserveCollateral,
    LastAdjustment,
}

// ─── Errors ──────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum HcxnError {
    InvalidRecipient = 1,
    InsufficientBalance = 2,
    InsufficientAllowance = 3,
    InsufficientReserve = 4,
    InvalidAmount = 5,
    OracleUnavailable = 6,
    ArithmeticOverflow = 7,
    AlreadyInitialized = 8,
    NotInitialized = 9,
    InvalidRate = 10,
}

// ─── Config / status types ──────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub oracle: Address,
    pub collateral: Address,
    pub adjustment_interval: u64,
    /// Tokens per collateral unit, fixed by the initial funding.
    pub buy_rate: Rate,
    /// Collateral per token.
    pub sell_rate: Rate,
    pub threshold_bps: u32,
    pub correction_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RebalanceStatus {
    pub reserve_tokens: i128,
    pub reserve_collateral: i128,
    pub total_supply: i128,
    pub last_adjustment: u64,
    pub next_adjustment: u64,
}

// ─── Helpers ─────────────────────────────────────────────────────

fn read_config(env: &Env) -> Result<Config, HcxnError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(HcxnError::NotInitialized)
}

/// Prologue of every ledger-mutating call: load config, keep the instance
/// alive, and give the rebalancer its chance to run before the caller's
/// own effect is applied.
fn begin_mutation(env: &Env) -> Result<Config, HcxnError> {
    let config = read_config(env)?;
    env.storage().instance().extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    rebalance::check_and_adjust(env, &config, env.ledger().timestamp())?;
    Ok(config)
}

fn or_abort<T>(env: &Env, result: Result<T, HcxnError>) -> T {
    result.unwrap_or_else(|err| panic_with_error!(env, err))
}

/// Where a token movement is headed. Sending tokens to the contract
/// itself is a sale to the reserve, not a plain credit.
enum Destination {
    Reserve,
    Holder(Address),
}

impl Destination {
    fn of(env: &Env, to: Address) -> Self {
        if to == ledger::reserve_address(env) {
            Destination::Reserve
        } else {
            Destination::Holder(to)
        }
    }
}

fn route_transfer(
    env: &Env,
    config: &Config,
    from: &Address,
    to: Address,
    amount: i128,
) -> Result<(), HcxnError> {
    match Destination::of(env, to) {
        Destination::Reserve => swap::sell(env, config, from, amount).map(|_| ()),
        Destination::Holder(to) => ledger::move_balance(env, from, &to, amount),
    }
}

// ─── Contract ────────────────────────────────────────────────────

#[contract]
pub struct HcxnToken;

// ─── SEP-41 Token Interface ─────────────────────────────────────

#[contractimpl]
impl TokenInterface for HcxnToken {
    fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        Base::allowance(&env, &from, &spender)
    }

    /// Unconditional set of the allowance.
    fn approve(env: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        or_abort(&env, ledger::require_non_negative(amount));
        or_abort(&env, begin_mutation(&env));
        Base::approve(&env, &from, &spender, amount, expiration_ledger);
    }

    fn balance(env: Env, id: Address) -> i128 {
        ledger::balance(&env, &id)
    }

    fn transfer(env: Env, from: Address, to: MuxedAddress, amount: i128) {
        from.require_auth();
        let result = begin_mutation(&env)
            .and_then(|config| route_transfer(&env, &config, &from, to.address(), amount));
        or_abort(&env, result);
    }

    fn transfer_from(env: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        let result = begin_mutation(&env).and_then(|config| {
            ledger::spend_allowance(&env, &from, &spender, amount)?;
            route_transfer(&env, &config, &from, to, amount)
        });
        or_abort(&env, result);
    }

    fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        let result = begin_mutation(&env).and_then(|_| ledger::burn(&env, &from, amount));
        or_abort(&env, result);
        emit_burn(&env, &from, amount);
    }

    fn burn_from(env: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        let result = begin_mutation(&env).and_then(|_| {
            ledger::spend_allowance(&env, &from, &spender, amount)?;
            ledger::burn(&env, &from, amount)
        });
        or_abort(&env, result);
        emit_burn(&env, &from, amount);
    }

    fn decimals(env: Env) -> u32 {
        Base::decimals(&env)
    }

    fn name(env: Env) -> String {
        Base::name(&env)
    }

    fn symbol(env: Env) -> String {
        Base::symbol(&env)
    }
}

// ─── HCXN-Specific Functions ────────────────────────────────────

#[contractimpl]
impl HcxnToken {
    /// Seed the reserve: pull `deposit` collateral from `funder`, fix the
    /// buy rate at `reserve_mint / deposit`, and mint `reserve_mint` tokens
    /// to the reserve.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        funder: Address,
        oracle: Address,
        collateral: Address,
        adjustment_interval: u64,
        deposit: i128,
        reserve_mint: i128,
        sell_rate: Rate,
    ) -> Result<(), HcxnError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(HcxnError::AlreadyInitialized);
        }
        funder.require_auth();
        if deposit <= 0 || reserve_mint <= 0 {
            return Err(HcxnError::InvalidAmount);
        }
        if !sell_rate.is_valid() {
            return Err(HcxnError::InvalidRate);
        }

        let config = Config {
            oracle: oracle.clone(),
            collateral: collateral.clone(),
            adjustment_interval,
            buy_rate: Rate {
                numerator: reserve_mint,
                denominator: deposit,
            },
            sell_rate,
            threshold_bps: ADJUSTMENT_THRESHOLD_BPS,
            correction_bps: CORRECTION_BPS,
        };

        Base::set_metadata(
            &env,
            DECIMALS,
            String::from_str(&env, NAME),
            String::from_str(&env, SYMBOL),
        );
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        TokenClient::new(&env, &collateral).transfer(
            &funder,
            &env.current_contract_address(),
            &deposit,
        );
        swap::set_reserve_collateral(&env, deposit);
        ledger::mint(&env, &ledger::reserve_address(&env), reserve_mint)?;
        rebalance::set_last_adjustment(&env, env.ledger().timestamp());

        env.events().publish(
            (Symbol::new(&env, "initialized"),),
            (oracle, collateral, deposit, reserve_mint),
        );

        Ok(())
    }

    /// Total token supply (not part of TokenInterface but commonly expected).
    pub fn total_supply(env: Env) -> i128 {
        Base::total_supply(&env)
    }

    /// Swap `amount_in` collateral for tokens at the fixed buy rate.
    pub fn buy(env: Env, buyer: Address, amount_in: i128) -> Result<i128, HcxnError> {
        buyer.require_auth();
        let config = begin_mutation(&env)?;
        swap::buy(&env, &config, &buyer, amount_in)
    }

    /// Swap `amount` tokens for collateral at the fixed sell rate.
    /// Equivalent to transferring the tokens to the contract address.
    pub fn sell(env: Env, seller: Address, amount: i128) -> Result<i128, HcxnError> {
        seller.require_auth();
        let config = begin_mutation(&env)?;
        swap::sell(&env, &config, &seller, amount)
    }

    pub fn get_hcxn(env: Env, buyer: Address, amount_in: i128) -> Result<i128, HcxnError> {
        Self::buy(env, buyer, amount_in)
    }

    pub fn get_ether(env: Env, seller: Address, amount: i128) -> Result<i128, HcxnError> {
        Self::sell(env, seller, amount)
    }

    /// Tokens a buy of `amount_in` would mint right now.
    pub fn quote_buy(env: Env, amount_in: i128) -> Result<i128, HcxnError> {
        read_config(&env)?.buy_rate.apply(&env, amount_in)
    }

    /// Collateral a sale of `amount` tokens would pay right now.
    pub fn quote_sell(env: Env, amount: i128) -> Result<i128, HcxnError> {
        read_config(&env)?.sell_rate.apply(&env, amount)
    }

    pub fn reserve_address(env: Env) -> Address {
        ledger::reserve_address(&env)
    }

    pub fn reserve_collateral(env: Env) -> i128 {
        swap::reserve_collateral(&env)
    }

    pub fn last_adjustment(env: Env) -> u64 {
        rebalance::last_adjustment(&env)
    }

    /// Reserve and gate state as of the last committed call. Does not read
    /// the oracle.
    pub fn rebalance_status(env: Env) -> Result<RebalanceStatus, HcxnError> {
        let config = read_config(&env)?;
        Ok(RebalanceStatus {
            reserve_tokens: ledger::balance(&env, &ledger::reserve_address(&env)),
            reserve_collateral: swap::reserve_collateral(&env),
            total_supply: Base::total_supply(&env),
            last_adjustment: rebalance::last_adjustment(&env),
            next_adjustment: rebalance::next_adjustment(&env, &config),
        })
    }

    pub fn get_config(env: Env) -> Result<Config, HcxnError> {
        read_config(&env)
    }
}
