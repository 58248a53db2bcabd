//! Spend authorization for marketplace listings.
//!
//! One evaluation decides whether a transaction may consume one locked listing.
//! Every failure is a returned [`MarketError`]; [`SpendValidator::evaluate`]
//! collapses all of them to a `false` verdict.

use alloc::vec::Vec;

use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::ledger::{OutputReference, Transaction};
use crate::listing::{Listing, Redeemer};

pub mod fee;
pub mod ownership;
pub mod payout;
pub mod tag;

pub use fee::required_fee;
pub use ownership::signed_by_owner;
pub use payout::{correlate_payouts, Correlation};
pub use tag::{check_fee_output, spend_tag, TAG_SIZE};

// -----------------------------------------------------------------------------
// SpendValidator
// -----------------------------------------------------------------------------

/// Decision function for spending one script-locked output.
pub trait SpendValidator {
    /// Authorize spending `spent` (locked with `listing`) by `tx` under `redeemer`.
    fn validate(
        &self,
        listing: &Listing,
        redeemer: &Redeemer,
        tx: &Transaction,
        spent: &OutputReference,
    ) -> Result<(), MarketError>;

    /// Boolean verdict. Default: validate, log the cause of any rejection, fail closed.
    fn evaluate(
        &self,
        listing: &Listing,
        redeemer: &Redeemer,
        tx: &Transaction,
        spent: &OutputReference,
    ) -> bool {
        match self.validate(listing, redeemer, tx, spent) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(spent = %spent, reason = %err, "spend rejected");
                false
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Marketplace
// -----------------------------------------------------------------------------

/// The listing validator, parameterized by marketplace address and fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marketplace {
    config: MarketConfig,
}

/// One listing consumed by a transaction, for [`Marketplace::validate_spends`].
#[derive(Debug, Clone, Copy)]
pub struct ListingSpend<'a> {
    pub spent: OutputReference,
    pub listing: &'a Listing,
    pub redeemer: Redeemer,
}

impl Marketplace {
    pub const fn new(config: MarketConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &MarketConfig {
        &self.config
    }

    fn purchase(
        &self,
        listing: &Listing,
        tx: &Transaction,
        spent: &OutputReference,
        payout_outputs_offset: u64,
    ) -> Result<(), MarketError> {
        let Correlation {
            fee_output,
            payout_total,
        } = correlate_payouts(&tx.outputs, payout_outputs_offset, &listing.payouts)?;
        let fee = required_fee(&payout_total, self.config.fee_rate)?;
        check_fee_output(fee_output, &self.config.address, &fee, spent)
    }

    /// Validates every listing spent by `tx`. Each spend is independent; the
    /// first failure is returned with its position in `spends`.
    pub fn validate_spends(
        &self,
        tx: &Transaction,
        spends: &[ListingSpend<'_>],
    ) -> Result<(), (usize, MarketError)> {
        for (i, spend) in spends.iter().enumerate() {
            self.validate(spend.listing, &spend.redeemer, tx, &spend.spent)
                .map_err(|err| (i, err))?;
        }
        Ok(())
    }

    /// Per-spend verdicts, in `spends` order.
    pub fn evaluate_spends(&self, tx: &Transaction, spends: &[ListingSpend<'_>]) -> Vec<bool> {
        spends
            .iter()
            .map(|spend| self.evaluate(spend.listing, &spend.redeemer, tx, &spend.spent))
            .collect()
    }
}

impl SpendValidator for Marketplace {
    fn validate(
        &self,
        listing: &Listing,
        redeemer: &Redeemer,
        tx: &Transaction,
        spent: &OutputReference,
    ) -> Result<(), MarketError> {
        match redeemer {
            Redeemer::Purchase {
                payout_outputs_offset,
            } => self.purchase(listing, tx, spent, *payout_outputs_offset),
            Redeemer::WithdrawOrUpdate => signed_by_owner(&tx.inputs, &listing.owner),
        }
    }
}
