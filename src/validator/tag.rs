//! Double-satisfaction guard.
//!
//! Several listings can be spent by one transaction. Each listing demands a fee
//! output whose inline datum is the tag of its *own* spent reference, so one
//! fee output can never be counted for two listings.

use bitcoin_hashes::{sha256, Hash};

use crate::error::MarketError;
use crate::ledger::{Address, OutputReference, TxOut, ValueSum};

pub const TAG_SIZE: usize = 32;

/// SHA-256 of the canonical serialization of `spent`.
pub fn spend_tag(spent: &OutputReference) -> [u8; TAG_SIZE] {
    sha256::Hash::hash(&spent.canonical_bytes()).to_byte_array()
}

/// Checks the fee candidate: marketplace address, fee covered per asset class,
/// and an inline datum equal to `spend_tag(spent)`.
pub fn check_fee_output(
    fee_output: &TxOut,
    market_address: &Address,
    required_fee: &ValueSum,
    spent: &OutputReference,
) -> Result<(), MarketError> {
    if fee_output.address != *market_address {
        return Err(MarketError::FeeAddressMismatch);
    }
    if !required_fee.is_covered_by(&fee_output.value) {
        return Err(MarketError::FeeUnderpaid);
    }
    match fee_output.datum.inline_bytes() {
        Some(bytes) if bytes == spend_tag(spent).as_slice() => Ok(()),
        _ => Err(MarketError::TagMismatch),
    }
}
