//! JSON adapter: builds an EvaluationRequest (and MarketConfig) from a JSON
//! document and back. Used by wasm-market and by tests.
//!
//! Shape:
//! ```json
//! {
//!   "spent": "<64 hex>#<index>",
//!   "listing": { "payouts": [{ "address": ADDRESS, "amount": VALUE }], "owner": CREDENTIAL },
//!   "redeemer": { "purchase": { "payout_outputs_offset": 0 } } | "withdraw_or_update",
//!   "transaction": {
//!     "inputs": [{ "output_reference": "<64 hex>#<index>", "output": OUTPUT }],
//!     "outputs": [OUTPUT]
//!   }
//! }
//! CREDENTIAL = { "key": "<56 hex>" } | { "script": "<56 hex>" }
//! ADDRESS    = { "payment": CREDENTIAL, "stake": CREDENTIAL | null }
//! VALUE      = { "lovelace": N, "assets": [{ "policy_id": hex, "asset_name": hex, "quantity": N }] }
//! OUTPUT     = { "address": ADDRESS, "value": VALUE, "datum": null | { "hash": hex } | { "inline": hex } }
//! ```
//! Quantities are JSON numbers or decimal strings (for values above 2^53).

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use serde_json::{json, Map, Value as Json};

use crate::config::{FeeRate, MarketConfig, MAX_ASSET_NAME_LEN};
use crate::error::MarketError;
use crate::ledger::{Address, AssetClass, Credential, Datum, OutputReference, Transaction, TxIn, TxOut, Value};
use crate::listing::{Listing, Payout, Redeemer};
use crate::payload::request::EvaluationRequest;

// -----------------------------------------------------------------------------
// JSON -> request
// -----------------------------------------------------------------------------

pub fn request_from_json(json: &Json) -> Result<EvaluationRequest, MarketError> {
    let spent = reference_from_json(&json["spent"])?;

    let listing_json = &json["listing"];
    let payouts = array(&listing_json["payouts"])?
        .iter()
        .map(|p| {
            Ok(Payout {
                address: address_from_json(&p["address"])?,
                amount: value_from_json(&p["amount"])?,
            })
        })
        .collect::<Result<Vec<_>, MarketError>>()?;
    let owner = credential_from_json(&listing_json["owner"])?;

    let redeemer = redeemer_from_json(&json["redeemer"])?;

    let tx_json = &json["transaction"];
    let inputs = array(&tx_json["inputs"])?
        .iter()
        .map(|i| {
            Ok(TxIn {
                output_reference: reference_from_json(&i["output_reference"])?,
                output: txout_from_json(&i["output"])?,
            })
        })
        .collect::<Result<Vec<_>, MarketError>>()?;
    let outputs = array(&tx_json["outputs"])?
        .iter()
        .map(txout_from_json)
        .collect::<Result<Vec<_>, MarketError>>()?;

    Ok(EvaluationRequest {
        spent,
        listing: Listing { payouts, owner },
        redeemer,
        transaction: Transaction { inputs, outputs },
    })
}

/// `{ "address": ADDRESS, "fee_rate": { "numerator": N, "denominator": N } }`.
/// `fee_rate` may be omitted (default rate) or given as `{ "basis_points": N }`.
pub fn config_from_json(json: &Json) -> Result<MarketConfig, MarketError> {
    let address = address_from_json(&json["address"])?;
    let rate_json = &json["fee_rate"];
    let fee_rate = if rate_json.is_null() {
        FeeRate::default()
    } else if !rate_json["basis_points"].is_null() {
        FeeRate::from_basis_points(quantity(&rate_json["basis_points"])?)
    } else {
        FeeRate::new(
            quantity(&rate_json["numerator"])?,
            quantity(&rate_json["denominator"])?,
        )?
    };
    Ok(MarketConfig::new(address).with_fee_rate(fee_rate))
}

fn array(json: &Json) -> Result<&Vec<Json>, MarketError> {
    json.as_array().ok_or(MarketError::EncodingError)
}

fn reference_from_json(json: &Json) -> Result<OutputReference, MarketError> {
    let s = json.as_str().ok_or(MarketError::InvalidReferenceFormat)?;
    OutputReference::from_str(s)
}

fn quantity(json: &Json) -> Result<u64, MarketError> {
    if let Some(n) = json.as_u64() {
        return Ok(n);
    }
    json.as_str()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or(MarketError::EncodingError)
}

fn hex_array<const N: usize>(json: &Json) -> Result<[u8; N], MarketError> {
    let s = json.as_str().ok_or(MarketError::EncodingError)?;
    let bytes = hex::decode(s).map_err(|_| MarketError::EncodingError)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| MarketError::EncodingError)
}

fn hex_bytes(json: &Json) -> Result<Vec<u8>, MarketError> {
    let s = json.as_str().ok_or(MarketError::EncodingError)?;
    hex::decode(s).map_err(|_| MarketError::EncodingError)
}

fn credential_from_json(json: &Json) -> Result<Credential, MarketError> {
    if !json["key"].is_null() {
        Ok(Credential::VerificationKey(hex_array(&json["key"])?))
    } else if !json["script"].is_null() {
        Ok(Credential::Script(hex_array(&json["script"])?))
    } else {
        Err(MarketError::EncodingError)
    }
}

fn address_from_json(json: &Json) -> Result<Address, MarketError> {
    let payment = credential_from_json(&json["payment"])?;
    let stake = match &json["stake"] {
        Json::Null => None,
        other => Some(credential_from_json(other)?),
    };
    Ok(Address { payment, stake })
}

fn value_from_json(json: &Json) -> Result<Value, MarketError> {
    let mut value = Value::from_lovelace(quantity(&json["lovelace"])?);
    if let Some(assets) = json["assets"].as_array() {
        for asset in assets {
            let policy_id = hex_array::<28>(&asset["policy_id"])?;
            let asset_name = match &asset["asset_name"] {
                Json::Null => Vec::new(),
                other => hex_bytes(other)?,
            };
            if asset_name.len() > MAX_ASSET_NAME_LEN as usize {
                return Err(MarketError::LimitExceeded(asset_name.len() as u32, MAX_ASSET_NAME_LEN));
            }
            let class = AssetClass {
                policy_id,
                asset_name,
            };
            if value.quantity_of(&class) != 0 {
                return Err(MarketError::NonCanonicalValue);
            }
            value.insert_asset(class, quantity(&asset["quantity"])?);
        }
    }
    Ok(value)
}

fn datum_from_json(json: &Json) -> Result<Datum, MarketError> {
    if json.is_null() {
        Ok(Datum::None)
    } else if !json["hash"].is_null() {
        Ok(Datum::Hash(hex_array(&json["hash"])?))
    } else if !json["inline"].is_null() {
        Ok(Datum::Inline(hex_bytes(&json["inline"])?))
    } else {
        Err(MarketError::EncodingError)
    }
}

fn txout_from_json(json: &Json) -> Result<TxOut, MarketError> {
    Ok(TxOut {
        address: address_from_json(&json["address"])?,
        value: value_from_json(&json["value"])?,
        datum: datum_from_json(&json["datum"])?,
    })
}

fn redeemer_from_json(json: &Json) -> Result<Redeemer, MarketError> {
    if json.as_str() == Some("withdraw_or_update") {
        return Ok(Redeemer::WithdrawOrUpdate);
    }
    let purchase = json
        .get("purchase")
        .ok_or(MarketError::EncodingError)?;
    Ok(Redeemer::Purchase {
        payout_outputs_offset: quantity(&purchase["payout_outputs_offset"])?,
    })
}

// -----------------------------------------------------------------------------
// request -> JSON
// -----------------------------------------------------------------------------

pub fn request_to_json(request: &EvaluationRequest) -> Json {
    let payouts: Vec<Json> = request
        .listing
        .payouts
        .iter()
        .map(|p| json!({ "address": address_to_json(&p.address), "amount": value_to_json(&p.amount) }))
        .collect();
    let inputs: Vec<Json> = request
        .transaction
        .inputs
        .iter()
        .map(|i| {
            json!({
                "output_reference": i.output_reference.to_string(),
                "output": txout_to_json(&i.output),
            })
        })
        .collect();
    let outputs: Vec<Json> = request.transaction.outputs.iter().map(txout_to_json).collect();
    let redeemer = match request.redeemer {
        Redeemer::Purchase {
            payout_outputs_offset,
        } => json!({ "purchase": { "payout_outputs_offset": payout_outputs_offset } }),
        Redeemer::WithdrawOrUpdate => Json::String(String::from("withdraw_or_update")),
    };
    json!({
        "spent": request.spent.to_string(),
        "listing": {
            "payouts": payouts,
            "owner": credential_to_json(&request.listing.owner),
        },
        "redeemer": redeemer,
        "transaction": { "inputs": inputs, "outputs": outputs },
    })
}

fn credential_to_json(credential: &Credential) -> Json {
    let mut map = Map::new();
    let (key, hash) = match credential {
        Credential::VerificationKey(h) => ("key", h),
        Credential::Script(h) => ("script", h),
    };
    map.insert(String::from(key), Json::String(hex::encode(hash)));
    Json::Object(map)
}

fn address_to_json(address: &Address) -> Json {
    json!({
        "payment": credential_to_json(&address.payment),
        "stake": address.stake.as_ref().map(credential_to_json).unwrap_or(Json::Null),
    })
}

/// Quantities above 2^53 are emitted as decimal strings.
fn quantity_to_json(n: u64) -> Json {
    if n <= (1u64 << 53) {
        json!(n)
    } else {
        Json::String(n.to_string())
    }
}

fn value_to_json(value: &Value) -> Json {
    let assets: Vec<Json> = value
        .assets()
        .map(|(class, qty)| {
            json!({
                "policy_id": hex::encode(class.policy_id),
                "asset_name": hex::encode(&class.asset_name),
                "quantity": quantity_to_json(qty),
            })
        })
        .collect();
    json!({ "lovelace": quantity_to_json(value.lovelace()), "assets": assets })
}

fn txout_to_json(txout: &TxOut) -> Json {
    let datum = match &txout.datum {
        Datum::None => Json::Null,
        Datum::Hash(h) => json!({ "hash": hex::encode(h) }),
        Datum::Inline(bytes) => json!({ "inline": hex::encode(bytes) }),
    };
    json!({
        "address": address_to_json(&txout.address),
        "value": value_to_json(&txout.value),
        "datum": datum,
    })
}
