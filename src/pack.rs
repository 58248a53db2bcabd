//! Envelope serialization (pack) and its inverse (unpack).
//! Symmetric to payload::reader; used by hosts, the JSON adapter and tests.

use alloc::vec::Vec;

use borsh::BorshSerialize;

use crate::config::{
    MAX_ASSETS_PER_VALUE, MAX_ASSET_NAME_LEN, MAX_INLINE_DATUM_LEN, MAX_INPUTS, MAX_OUTPUTS,
    MAX_PAYLOAD_SIZE, MAX_PAYOUTS,
};
use crate::error::MarketError;
use crate::header::{Header, HEADER_SIZE};
use crate::ledger::{Datum, TxOut, Value};
use crate::listing::Redeemer;
use crate::payload::reader::BoundedReader;
use crate::payload::request::EvaluationRequest;
use crate::payload::wire_len;

/// Packs a request into a complete envelope (header + payload) with no flags set.
pub fn pack(request: &EvaluationRequest) -> Result<Vec<u8>, MarketError> {
    pack_with_flags(0, request)
}

/// Packs a request with the given header flags.
/// Checksum is computed over bytes 0..12 of the header + payload.
pub fn pack_with_flags(flags: u8, request: &EvaluationRequest) -> Result<Vec<u8>, MarketError> {
    let payload = serialize_payload(request)?;
    if payload.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(MarketError::PayloadTooLarge(
            u32::try_from(payload.len()).unwrap_or(u32::MAX),
        ));
    }
    let header = Header::for_payload(flags, &payload)?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parses and integrity-checks an envelope: header, CRC32, then the bounded payload.
pub fn unpack(bytes: &[u8]) -> Result<(Header, EvaluationRequest), MarketError> {
    let header = Header::from_bytes(bytes)?;
    let payload = &bytes[HEADER_SIZE..];
    header.verify_checksum(payload)?;
    let request = BoundedReader::parse(&header, payload)?;
    Ok((header, request))
}

/// Payload bytes in reader order: spent, listing, redeemer, transaction.
pub fn serialize_payload(request: &EvaluationRequest) -> Result<Vec<u8>, MarketError> {
    let mut out = Vec::new();

    // Spent reference (40 bytes)
    out.extend_from_slice(&request.spent.canonical_bytes());

    // Listing
    let listing = &request.listing;
    write(&wire_len(listing.payouts.len(), MAX_PAYOUTS)?, &mut out)?;
    for payout in &listing.payouts {
        write(&payout.address, &mut out)?;
        encode_value(&payout.amount, &mut out)?;
    }
    write(&listing.owner, &mut out)?;

    // Redeemer
    out.push(request.redeemer.tag());
    if let Redeemer::Purchase {
        payout_outputs_offset,
    } = request.redeemer
    {
        write(&payout_outputs_offset, &mut out)?;
    }

    // Transaction
    let tx = &request.transaction;
    write(&wire_len(tx.inputs.len(), MAX_INPUTS)?, &mut out)?;
    for input in &tx.inputs {
        out.extend_from_slice(&input.output_reference.canonical_bytes());
        encode_txout(&input.output, &mut out)?;
    }
    write(&wire_len(tx.outputs.len(), MAX_OUTPUTS)?, &mut out)?;
    for output in &tx.outputs {
        encode_txout(output, &mut out)?;
    }

    Ok(out)
}

fn write<T: BorshSerialize>(item: &T, out: &mut Vec<u8>) -> Result<(), MarketError> {
    item.serialize(out).map_err(|_| MarketError::EncodingError)
}

fn write_bytes(bytes: &[u8], limit: u32, out: &mut Vec<u8>) -> Result<(), MarketError> {
    write(&wire_len(bytes.len(), limit)?, out)?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Canonical value encoding: lovelace, asset count, then assets in ascending order.
fn encode_value(value: &Value, out: &mut Vec<u8>) -> Result<(), MarketError> {
    write(&value.lovelace(), out)?;
    write(&wire_len(value.asset_count(), MAX_ASSETS_PER_VALUE)?, out)?;
    for (class, quantity) in value.assets() {
        out.extend_from_slice(&class.policy_id);
        write_bytes(&class.asset_name, MAX_ASSET_NAME_LEN, out)?;
        write(&quantity, out)?;
    }
    Ok(())
}

fn encode_txout(txout: &TxOut, out: &mut Vec<u8>) -> Result<(), MarketError> {
    write(&txout.address, out)?;
    encode_value(&txout.value, out)?;
    match &txout.datum {
        Datum::None => out.push(0),
        Datum::Hash(hash) => {
            out.push(1);
            out.extend_from_slice(hash);
        }
        Datum::Inline(bytes) => {
            out.push(2);
            write_bytes(bytes, MAX_INLINE_DATUM_LEN, out)?;
        }
    }
    Ok(())
}
