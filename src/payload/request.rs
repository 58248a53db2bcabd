use crate::error::MarketError;
use crate::ledger::{OutputReference, Transaction};
use crate::listing::{Listing, Redeemer};
use crate::validator::SpendValidator;

/// Everything one evaluation reads: the spent reference, its listing datum,
/// the declared redeemer and the transaction view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub spent: OutputReference,
    pub listing: Listing,
    pub redeemer: Redeemer,
    pub transaction: Transaction,
}

impl EvaluationRequest {
    pub fn validate<V: SpendValidator>(&self, validator: &V) -> Result<(), MarketError> {
        validator.validate(&self.listing, &self.redeemer, &self.transaction, &self.spent)
    }

    pub fn evaluate<V: SpendValidator>(&self, validator: &V) -> bool {
        validator.evaluate(&self.listing, &self.redeemer, &self.transaction, &self.spent)
    }
}
