use soroban_sdk::{contractclient, Address, Env};

use crate::HcxnError;

/// Price feed consumed by the rebalancer.
///
/// `current_price` is the value of one collateral unit in the unit of
/// account, 18-decimal fixed-point (3200 * 10^18 = $3200 per collateral unit).
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn current_price(env: Env) -> i128;
}

/// Fresh oracle read. Any failure of the feed, or a non-positive price,
/// aborts the enclosing call.
pub fn current_price(env: &Env, oracle: &Address) -> Result<i128, HcxnError> {
    match PriceOracleClient::new(env, oracle).try_current_price() {
        Ok(Ok(price)) if price > 0 => Ok(price),
        _ => Err(HcxnError::OracleUnavailable),
    }
}
