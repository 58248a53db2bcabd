//! Marketplace configuration and hard limits.

use crate::error::MarketError;
use crate::ledger::Address;

/// Default marketplace fee: 2%.
pub const DEFAULT_FEE_BASIS_POINTS: u64 = 200;

pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Hard Limits (DoS Protection) applied by the envelope reader.
pub const MAX_PAYLOAD_SIZE: u32 = 1_048_576; // 1MB Hard Cap
pub const MAX_INPUTS: u32 = 512;
pub const MAX_OUTPUTS: u32 = 512;
pub const MAX_PAYOUTS: u32 = 64;
pub const MAX_ASSETS_PER_VALUE: u32 = 256;
pub const MAX_ASSET_NAME_LEN: u32 = 32;
pub const MAX_INLINE_DATUM_LEN: u32 = 16_384;

/// Fee as an exact fraction of the payout total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    numerator: u64,
    denominator: u64,
}

impl FeeRate {
    pub const fn new(numerator: u64, denominator: u64) -> Result<Self, MarketError> {
        if denominator == 0 {
            return Err(MarketError::InvalidFeeRate);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub const fn from_basis_points(bps: u64) -> Self {
        Self {
            numerator: bps,
            denominator: BASIS_POINTS_DENOMINATOR,
        }
    }

    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    pub const fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::from_basis_points(DEFAULT_FEE_BASIS_POINTS)
    }
}

/// Where the marketplace is paid and how much it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    pub address: Address,
    pub fee_rate: FeeRate,
}

impl MarketConfig {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            fee_rate: FeeRate::default(),
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: FeeRate) -> Self {
        self.fee_rate = fee_rate;
        self
    }
}
