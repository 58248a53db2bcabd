//! Marketplace fee: the payout total scaled by the fee rate, per asset class,
//! rounded up so truncation never underpays the marketplace.

use crate::config::FeeRate;
use crate::error::MarketError;
use crate::ledger::ValueSum;

pub fn required_fee(payout_total: &ValueSum, rate: FeeRate) -> Result<ValueSum, MarketError> {
    let numerator = u128::from(rate.numerator());
    let denominator = u128::from(rate.denominator());
    if denominator == 0 {
        return Err(MarketError::InvalidFeeRate);
    }
    payout_total.try_map(|qty| {
        let scaled = qty
            .checked_mul(numerator)
            .ok_or(MarketError::ArithmeticOverflow)?;
        Ok(div_ceil(scaled, denominator))
    })
}

#[inline]
fn div_ceil(n: u128, d: u128) -> u128 {
    let q = n / d;
    if n % d == 0 {
        q
    } else {
        q + 1
    }
}
