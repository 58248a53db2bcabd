//! WASM wrapper for listing-spend evaluation: JSON requests, binary envelopes and spend tags.

use core::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use market_validator::adapter::{config_from_json, request_from_json, request_to_json};
use market_validator::header::{Header, HEADER_SIZE, MAGIC_BYTES};
use market_validator::pack::{pack_with_flags, unpack};
use market_validator::{
    spend_tag, EvaluationRequest, MarketConfig, MarketError, Marketplace, OutputReference,
    Redeemer,
};

/// Set the panic hook so Rust panics show up as readable errors in the browser console.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
struct WasmEvaluateResult {
    /// "purchase" or "withdraw_or_update".
    redeemer: String,
    spent: String,
    authorized: bool,
    /// Rejection cause; empty when authorized.
    reason: String,
    /// Hex tag the fee output must carry for this spend.
    expected_tag: String,
}

#[derive(Serialize)]
struct WasmParseHeaderResult {
    version: u8,
    flags: u8,
    is_testnet: bool,
    payload_len: u32,
    checksum: u32,
}

fn js_err(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_json(input: &str) -> Result<serde_json::Value, JsValue> {
    serde_json::from_str(input).map_err(js_err)
}

fn redeemer_name(redeemer: &Redeemer) -> &'static str {
    match redeemer {
        Redeemer::Purchase { .. } => "purchase",
        Redeemer::WithdrawOrUpdate => "withdraw_or_update",
    }
}

fn evaluation_result(request: &EvaluationRequest, config: MarketConfig) -> WasmEvaluateResult {
    let outcome = request.validate(&Marketplace::new(config));
    WasmEvaluateResult {
        redeemer: redeemer_name(&request.redeemer).to_string(),
        spent: request.spent.to_string(),
        authorized: outcome.is_ok(),
        reason: outcome.err().map(|e| e.to_string()).unwrap_or_default(),
        expected_tag: hex::encode(spend_tag(&request.spent)),
    }
}

/// Rejects anything that does not start with the envelope magic before decoding.
fn check_magic(bytes: &[u8]) -> Result<(), JsValue> {
    if bytes.len() < HEADER_SIZE || bytes[0..3] != MAGIC_BYTES {
        return Err(JsValue::from_str(
            "Error: Not a valid market envelope. Expected 'MKT' magic bytes.",
        ));
    }
    Ok(())
}

/// Evaluates a JSON request: `{ "config": CONFIG, "request": REQUEST }`.
/// A rejected spend is a successful call with `authorized: false`.
#[wasm_bindgen]
pub fn wasm_evaluate(json_input: &str) -> Result<JsValue, JsValue> {
    let value = parse_json(json_input)?;
    let config = config_from_json(
        value
            .get("config")
            .ok_or_else(|| JsValue::from_str("missing config"))?,
    )
    .map_err(js_err)?;
    let request = request_from_json(
        value
            .get("request")
            .ok_or_else(|| JsValue::from_str("missing request"))?,
    )
    .map_err(js_err)?;

    Ok(serde_wasm_bindgen::to_value(&evaluation_result(&request, config))?)
}

/// Evaluates a binary envelope against a JSON marketplace config.
#[wasm_bindgen]
pub fn wasm_verify_binary(envelope: Vec<u8>, config_json: &str) -> Result<JsValue, JsValue> {
    check_magic(&envelope)?;
    let config = config_from_json(&parse_json(config_json)?).map_err(js_err)?;
    let (_header, request) = unpack(&envelope)
        .map_err(|e| JsValue::from_str(&format!("Error: Not a valid market envelope. {}.", e)))?;

    Ok(serde_wasm_bindgen::to_value(&evaluation_result(&request, config))?)
}

/// Packs a JSON request into a binary envelope. `testnet` sets the header flag.
#[wasm_bindgen]
pub fn wasm_pack_request(json_input: &str, testnet: bool) -> Result<Vec<u8>, JsValue> {
    let request = request_from_json(&parse_json(json_input)?).map_err(js_err)?;
    let flags = if testnet {
        market_validator::header::FLAG_TESTNET
    } else {
        0
    };
    pack_with_flags(flags, &request).map_err(js_err)
}

/// Decodes a binary envelope back to its JSON request.
#[wasm_bindgen]
pub fn wasm_unpack_to_json(envelope: Vec<u8>) -> Result<String, JsValue> {
    check_magic(&envelope)?;
    let (_header, request) = unpack(&envelope)
        .map_err(|e| JsValue::from_str(&format!("Error: Not a valid market envelope. {}.", e)))?;
    serde_json::to_string_pretty(&request_to_json(&request)).map_err(js_err)
}

/// Header fields of an envelope, without decoding the payload.
#[wasm_bindgen]
pub fn wasm_parse_header(envelope: Vec<u8>) -> Result<JsValue, JsValue> {
    check_magic(&envelope)?;
    let header = Header::from_bytes(&envelope).map_err(js_err)?;
    Ok(serde_wasm_bindgen::to_value(&WasmParseHeaderResult {
        version: header.version,
        flags: header.flags,
        is_testnet: header.is_testnet(),
        payload_len: header.payload_len,
        checksum: header.checksum,
    })?)
}

/// Hex spend tag for an output reference given as `"<64 hex>#<index>"`.
#[wasm_bindgen]
pub fn wasm_spend_tag(output_reference: &str) -> Result<String, JsValue> {
    let reference = OutputReference::from_str(output_reference)
        .map_err(|e: MarketError| JsValue::from_str(&e.to_string()))?;
    Ok(hex::encode(spend_tag(&reference)))
}
