// src/payload/reader.rs

use crate::config::{
    MAX_ASSETS_PER_VALUE, MAX_ASSET_NAME_LEN, MAX_INLINE_DATUM_LEN, MAX_INPUTS, MAX_OUTPUTS,
    MAX_PAYOUTS,
};
use crate::error::MarketError;
use crate::header::Header;
use crate::ledger::{Address, AssetClass, Credential, Datum, OutputReference, Transaction, TxIn, TxOut, Value};
use crate::listing::{Listing, Payout, Redeemer, REDEEMER_PURCHASE, REDEEMER_WITHDRAW_OR_UPDATE};
use crate::payload::check_limit;
use crate::payload::request::EvaluationRequest;
use alloc::vec::Vec;
use borsh::BorshDeserialize;

const DATUM_NONE: u8 = 0;
const DATUM_HASH: u8 = 1;
const DATUM_INLINE: u8 = 2;

/// The Bounded Reader.
/// Parses a payload into an EvaluationRequest, enforcing every hard limit
/// before allocating and rejecting non-canonical values.
pub struct BoundedReader;

impl BoundedReader {
    pub fn parse(header: &Header, mut data: &[u8]) -> Result<EvaluationRequest, MarketError> {
        if data.len() != header.payload_len as usize {
            return Err(MarketError::IncompleteData);
        }

        // 1. Spent reference
        let spent = OutputReference::deserialize(&mut data).map_err(|_| MarketError::IncompleteData)?;

        // 2. Listing
        let payout_count = read_u32(&mut data)?;
        check_limit(payout_count, MAX_PAYOUTS)?;
        let mut payouts = Vec::with_capacity(payout_count as usize);
        for _ in 0..payout_count {
            let address = read_address(&mut data)?;
            let amount = read_value(&mut data)?;
            payouts.push(Payout { address, amount });
        }
        let owner = Credential::deserialize(&mut data).map_err(|_| MarketError::EncodingError)?;

        // 3. Redeemer
        let redeemer = match read_u8(&mut data)? {
            REDEEMER_PURCHASE => Redeemer::Purchase {
                payout_outputs_offset: read_u64(&mut data)?,
            },
            REDEEMER_WITHDRAW_OR_UPDATE => Redeemer::WithdrawOrUpdate,
            other => return Err(MarketError::UnknownRedeemer(other)),
        };

        // 4. Transaction
        let input_count = read_u32(&mut data)?;
        check_limit(input_count, MAX_INPUTS)?;
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            let output_reference =
                OutputReference::deserialize(&mut data).map_err(|_| MarketError::IncompleteData)?;
            let output = read_txout(&mut data)?;
            inputs.push(TxIn {
                output_reference,
                output,
            });
        }

        let output_count = read_u32(&mut data)?;
        check_limit(output_count, MAX_OUTPUTS)?;
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(read_txout(&mut data)?);
        }

        if !data.is_empty() {
            return Err(MarketError::TrailingData(data.len()));
        }

        Ok(EvaluationRequest {
            spent,
            listing: Listing { payouts, owner },
            redeemer,
            transaction: Transaction { inputs, outputs },
        })
    }
}

fn read_u8(data: &mut &[u8]) -> Result<u8, MarketError> {
    u8::deserialize(data).map_err(|_| MarketError::IncompleteData)
}

fn read_u32(data: &mut &[u8]) -> Result<u32, MarketError> {
    u32::deserialize(data).map_err(|_| MarketError::IncompleteData)
}

fn read_u64(data: &mut &[u8]) -> Result<u64, MarketError> {
    u64::deserialize(data).map_err(|_| MarketError::IncompleteData)
}

/// Borsh-style length-prefixed bytes, with the length checked against `limit` first.
fn read_bytes<'a>(data: &mut &'a [u8], limit: u32) -> Result<&'a [u8], MarketError> {
    let len = read_u32(data)?;
    check_limit(len, limit)?;
    let len = len as usize;
    if data.len() < len {
        return Err(MarketError::IncompleteData);
    }
    let (bytes, rest) = data.split_at(len);
    *data = rest;
    Ok(bytes)
}

fn read_address(data: &mut &[u8]) -> Result<Address, MarketError> {
    Address::deserialize(data).map_err(|_| MarketError::EncodingError)
}

/// Value: lovelace (u64), asset count (u32), then (policy, name, quantity) in
/// strictly ascending class order with non-zero quantities.
fn read_value(data: &mut &[u8]) -> Result<Value, MarketError> {
    let mut value = Value::from_lovelace(read_u64(data)?);
    let asset_count = read_u32(data)?;
    check_limit(asset_count, MAX_ASSETS_PER_VALUE)?;

    let mut previous: Option<AssetClass> = None;
    for _ in 0..asset_count {
        let policy_id = <[u8; 28]>::deserialize(data).map_err(|_| MarketError::IncompleteData)?;
        let asset_name = read_bytes(data, MAX_ASSET_NAME_LEN)?;
        let quantity = read_u64(data)?;
        let class = AssetClass::new(policy_id, asset_name);

        if quantity == 0 || previous.as_ref().is_some_and(|prev| *prev >= class) {
            return Err(MarketError::NonCanonicalValue);
        }
        value.insert_asset(class.clone(), quantity);
        previous = Some(class);
    }
    Ok(value)
}

fn read_datum(data: &mut &[u8]) -> Result<Datum, MarketError> {
    match read_u8(data)? {
        DATUM_NONE => Ok(Datum::None),
        DATUM_HASH => {
            let hash = <[u8; 32]>::deserialize(data).map_err(|_| MarketError::IncompleteData)?;
            Ok(Datum::Hash(hash))
        }
        DATUM_INLINE => Ok(Datum::Inline(read_bytes(data, MAX_INLINE_DATUM_LEN)?.to_vec())),
        _ => Err(MarketError::EncodingError),
    }
}

fn read_txout(data: &mut &[u8]) -> Result<TxOut, MarketError> {
    let address = read_address(data)?;
    let value = read_value(data)?;
    let datum = read_datum(data)?;
    Ok(TxOut {
        address,
        value,
        datum,
    })
}
