//! Shared test fixtures: addresses, listings and purchase transactions.

#![allow(dead_code)]

use market_validator::ledger::{TxIn, TxOut};
use market_validator::{
    spend_tag, Address, Credential, Datum, EvaluationRequest, Listing, MarketConfig,
    OutputReference, Payout, Redeemer, Transaction, Value,
};

pub const MARKET: Address = Address::new(Credential::Script([0x4d; 28]));
pub const LOCK: Address = Address::new(Credential::Script([0x10; 28]));

pub const SELLER_KEY: Credential = Credential::VerificationKey([0x5e; 28]);
pub const SELLER: Address = Address::with_stake(SELLER_KEY, Credential::VerificationKey([0x5f; 28]));
pub const ARTIST: Address = Address::new(Credential::VerificationKey([0xa7; 28]));
pub const BUYER: Address = Address::new(Credential::VerificationKey([0xb0; 28]));

pub const NFT_POLICY: [u8; 28] = [0x4e; 28];
pub const HOSKY: [u8; 28] = [0x48; 28];
pub const SNEK: [u8; 28] = [0x53; 28];

pub fn config() -> MarketConfig {
    MarketConfig::new(MARKET)
}

pub fn reference(tx_byte: u8, index: u64) -> OutputReference {
    OutputReference::new([tx_byte; 32], index)
}

pub fn ada(lovelace: u64) -> Value {
    Value::from_lovelace(lovelace)
}

/// Seller gets `seller`, artist gets `royalty`.
pub fn listing(seller: Value, royalty: Value) -> Listing {
    Listing {
        payouts: vec![Payout::new(SELLER, seller), Payout::new(ARTIST, royalty)],
        owner: SELLER_KEY,
    }
}

pub fn locked_input(spent: OutputReference) -> TxIn {
    TxIn {
        output_reference: spent,
        output: TxOut::new(LOCK, ada(2_000_000).with_asset(NFT_POLICY, b"pixel-0042", 1))
            .with_datum(Datum::Hash([0xd7; 32])),
    }
}

pub fn buyer_input(index: u64) -> TxIn {
    TxIn {
        output_reference: reference(0xb1, index),
        output: TxOut::new(BUYER, ada(500_000_000)),
    }
}

pub fn fee_output(spent: &OutputReference, fee: Value) -> TxOut {
    TxOut::new(MARKET, fee).with_datum(Datum::Inline(spend_tag(spent).to_vec()))
}

/// Outputs for `listing` as the schedule demands: fee output, then payouts in order.
pub fn settlement(spent: &OutputReference, listing: &Listing, fee: Value) -> Vec<TxOut> {
    let mut outputs = vec![fee_output(spent, fee)];
    outputs.extend(
        listing
            .payouts
            .iter()
            .map(|p| TxOut::new(p.address, p.amount.clone())),
    );
    outputs
}

/// Purchase of a single listing: buyer change first, then the settlement block.
pub fn purchase_request(listing: Listing, fee: Value) -> EvaluationRequest {
    let spent = reference(0x01, 0);
    let mut outputs = vec![TxOut::new(BUYER, ada(3_000_000).with_asset(NFT_POLICY, b"pixel-0042", 1))];
    outputs.extend(settlement(&spent, &listing, fee));
    EvaluationRequest {
        spent,
        listing,
        redeemer: Redeemer::Purchase {
            payout_outputs_offset: 1,
        },
        transaction: Transaction {
            inputs: vec![locked_input(spent), buyer_input(0)],
            outputs,
        },
    }
}
