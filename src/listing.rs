//! The locked listing record (datum) and the caller's declared action (redeemer).

use alloc::vec::Vec;

use crate::ledger::{Address, Credential, Value};

/// One entry of the payout schedule: who is paid, and at least how much.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub address: Address,
    pub amount: Value,
}

impl Payout {
    pub fn new(address: Address, amount: Value) -> Self {
        Self { address, amount }
    }
}

/// Listing locked alongside the asset.
/// `payouts` never includes the marketplace cut; that is always computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub payouts: Vec<Payout>,
    pub owner: Credential,
}

/// Redeemer tag bytes (wire format).
pub const REDEEMER_PURCHASE: u8 = 0x00;
pub const REDEEMER_WITHDRAW_OR_UPDATE: u8 = 0x01;

/// Declared action for the spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redeemer {
    /// Buy the listed asset. Outputs from `payout_outputs_offset` are the fee
    /// output followed by one output per payout, in schedule order.
    Purchase { payout_outputs_offset: u64 },
    /// Cancel or re-list. Authorized by the owner alone.
    WithdrawOrUpdate,
}

impl Redeemer {
    pub const fn tag(&self) -> u8 {
        match self {
            Redeemer::Purchase { .. } => REDEEMER_PURCHASE,
            Redeemer::WithdrawOrUpdate => REDEEMER_WITHDRAW_OR_UPDATE,
        }
    }
}
