#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Needed for Vec
extern crate alloc;

pub mod config;
pub mod error;
pub mod header;
pub mod ledger;
pub mod listing;
pub mod pack;
pub mod payload;
pub mod validator;

#[cfg(feature = "adapter")]
pub mod adapter;

pub use config::{FeeRate, MarketConfig};
pub use error::{MarketError, PayoutFault};
pub use ledger::{Address, Credential, Datum, OutputReference, Transaction, TxIn, TxOut, Value};
pub use listing::{Listing, Payout, Redeemer};
pub use payload::request::EvaluationRequest;
pub use validator::{spend_tag, ListingSpend, Marketplace, SpendValidator};

/// Decodes an envelope and validates the request it carries against `config`.
pub fn verify(bytes: &[u8], config: &MarketConfig) -> Result<(), MarketError> {
    let (_header, request) = pack::unpack(bytes)?;
    request.validate(&Marketplace::new(*config))
}

/// Boolean verdict over an envelope. Malformed bytes are a rejection.
pub fn evaluate_bytes(bytes: &[u8], config: &MarketConfig) -> bool {
    match verify(bytes, config) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(reason = %err, "envelope rejected");
            false
        }
    }
}
