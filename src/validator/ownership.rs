//! Withdraw/update authorization by input membership.
//!
//! The ledger only admits an input into a valid transaction when the owner of
//! that input's address authorized it. So the owner's payment credential
//! appearing on any spent input stands in for the owner's signature. This is
//! only sound under those UTXO spending rules.

use crate::error::MarketError;
use crate::ledger::{Credential, TxIn};

pub fn signed_by_owner(inputs: &[TxIn], owner: &Credential) -> Result<(), MarketError> {
    if inputs
        .iter()
        .any(|input| input.output.address.payment == *owner)
    {
        Ok(())
    } else {
        Err(MarketError::NotSignedByOwner)
    }
}
