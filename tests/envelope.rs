//! Envelope decoding through the public entry points: `verify` and `evaluate_bytes`.

mod common;

use borsh::BorshSerialize;
use common::*;
use market_validator::config::{MAX_ASSET_NAME_LEN, MAX_INPUTS, MAX_PAYOUTS};
use market_validator::header::{Header, CURRENT_VERSION, FLAG_TESTNET, HEADER_SIZE};
use market_validator::pack::{pack, pack_with_flags, serialize_payload, unpack};
use market_validator::{evaluate_bytes, verify, Listing, MarketError, Redeemer};

/// Wraps raw payload bytes in a correctly checksummed header.
fn seal(payload: &[u8]) -> Vec<u8> {
    let header = Header::for_payload(0, payload).expect("header");
    let mut out = header.to_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

fn encode<T: BorshSerialize>(item: &T) -> Vec<u8> {
    borsh::to_vec(item).expect("borsh")
}

/// Spent reference, empty payout schedule and the owner credential.
fn empty_listing_prefix() -> Vec<u8> {
    let mut out = encode(&reference(0x01, 0));
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&encode(&SELLER_KEY));
    out
}

#[test]
fn packed_purchase_verifies() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(200_000));
    let bytes = pack(&request).expect("pack");
    assert_eq!(verify(&bytes, &config()), Ok(()));
    assert!(evaluate_bytes(&bytes, &config()));
}

#[test]
fn packed_underpayment_is_rejected_with_cause() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(100_000));
    let bytes = pack(&request).expect("pack");
    assert_eq!(verify(&bytes, &config()), Err(MarketError::FeeUnderpaid));
    assert!(!evaluate_bytes(&bytes, &config()));
}

#[test]
fn testnet_flag_survives_the_envelope() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(200_000));
    let bytes = pack_with_flags(FLAG_TESTNET, &request).expect("pack");
    let (header, parsed) = unpack(&bytes).expect("unpack");
    assert!(header.is_testnet());
    assert_eq!(header.version, CURRENT_VERSION);
    assert_eq!(parsed, request);
}

#[test]
fn unknown_redeemer_byte_is_rejected() {
    let mut payload = empty_listing_prefix();
    payload.push(0x07);
    assert_eq!(
        verify(&seal(&payload), &config()),
        Err(MarketError::UnknownRedeemer(0x07))
    );
}

#[test]
fn withdraw_envelope_without_owner_input_is_rejected() {
    let mut payload = empty_listing_prefix();
    payload.push(0x01);
    payload.extend_from_slice(&0u32.to_le_bytes()); // inputs
    payload.extend_from_slice(&0u32.to_le_bytes()); // outputs
    let bytes = seal(&payload);
    let (_, request) = unpack(&bytes).expect("unpack");
    assert_eq!(request.redeemer, Redeemer::WithdrawOrUpdate);
    assert_eq!(
        request.listing,
        Listing {
            payouts: vec![],
            owner: SELLER_KEY
        }
    );
    assert_eq!(verify(&bytes, &config()), Err(MarketError::NotSignedByOwner));
}

#[test]
fn trailing_bytes_are_rejected() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(200_000));
    let mut payload = serialize_payload(&request).expect("payload");
    payload.extend_from_slice(&[0xaa, 0xbb]);
    assert_eq!(verify(&seal(&payload), &config()), Err(MarketError::TrailingData(2)));
}

#[test]
fn truncated_payload_is_rejected() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(200_000));
    let payload = serialize_payload(&request).expect("payload");
    let cut = &payload[..payload.len() - 1];
    assert_eq!(verify(&seal(cut), &config()), Err(MarketError::IncompleteData));

    // Header claims more than is present.
    let bytes = pack(&request).expect("pack");
    assert_eq!(
        verify(&bytes[..bytes.len() - 1], &config()),
        Err(MarketError::IncompleteData)
    );
}

#[test]
fn oversized_counts_fail_before_allocation() {
    let mut payload = encode(&reference(0x01, 0));
    payload.extend_from_slice(&(MAX_PAYOUTS + 1).to_le_bytes());
    assert_eq!(
        verify(&seal(&payload), &config()),
        Err(MarketError::LimitExceeded(MAX_PAYOUTS + 1, MAX_PAYOUTS))
    );

    let mut payload = empty_listing_prefix();
    payload.push(0x01);
    payload.extend_from_slice(&u32::MAX.to_le_bytes());
    assert_eq!(
        verify(&seal(&payload), &config()),
        Err(MarketError::LimitExceeded(u32::MAX, MAX_INPUTS))
    );
}

/// One output to SELLER with the given raw asset entries.
fn single_output_payload(assets: &[([u8; 28], &str, u64)]) -> Vec<u8> {
    let mut payload = empty_listing_prefix();
    payload.push(0x01);
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload.extend_from_slice(&1u32.to_le_bytes());
    payload.extend_from_slice(&encode(&SELLER));
    payload.extend_from_slice(&2_000_000u64.to_le_bytes());
    payload.extend_from_slice(&(assets.len() as u32).to_le_bytes());
    for (policy, name, quantity) in assets {
        payload.extend_from_slice(policy);
        payload.extend_from_slice(&(name.len() as u32).to_le_bytes());
        payload.extend_from_slice(name.as_bytes());
        payload.extend_from_slice(&quantity.to_le_bytes());
    }
    payload.push(0x00);
    payload
}

#[test]
fn canonical_hand_built_value_decodes() {
    let payload = single_output_payload(&[(HOSKY, "HOSKY", 5), (SNEK, "snek", 1)]);
    let (_, request) = unpack(&seal(&payload)).expect("unpack");
    let value = &request.transaction.outputs[0].value;
    assert_eq!(*value, ada(2_000_000).with_asset(HOSKY, b"HOSKY", 5).with_asset(SNEK, b"snek", 1));
}

#[test]
fn non_canonical_values_are_rejected() {
    let cases: [&[([u8; 28], &str, u64)]; 3] = [
        &[(SNEK, "snek", 1), (HOSKY, "HOSKY", 5)],
        &[(HOSKY, "HOSKY", 5), (HOSKY, "HOSKY", 5)],
        &[(HOSKY, "HOSKY", 0)],
    ];
    for assets in cases {
        let payload = single_output_payload(assets);
        assert_eq!(
            verify(&seal(&payload), &config()),
            Err(MarketError::NonCanonicalValue)
        );
    }
}

#[test]
fn long_asset_names_are_rejected() {
    let name = "a".repeat(MAX_ASSET_NAME_LEN as usize + 1);
    let payload = single_output_payload(&[(HOSKY, name.as_str(), 1)]);
    assert_eq!(
        verify(&seal(&payload), &config()),
        Err(MarketError::LimitExceeded(MAX_ASSET_NAME_LEN + 1, MAX_ASSET_NAME_LEN))
    );
}

#[test]
fn header_faults_are_rejections() {
    let request = purchase_request(listing(ada(9_000_000), ada(1_000_000)), ada(200_000));
    let bytes = pack(&request).expect("pack");

    let mut bad_magic = bytes.clone();
    bad_magic[0] = b'X';
    assert_eq!(verify(&bad_magic, &config()), Err(MarketError::InvalidMagic));

    let mut bad_version = bytes.clone();
    bad_version[4] = 9;
    assert_eq!(verify(&bad_version, &config()), Err(MarketError::UnsupportedVersion(9)));

    let mut flipped = bytes.clone();
    flipped[HEADER_SIZE + 3] ^= 0x01;
    assert!(matches!(
        verify(&flipped, &config()),
        Err(MarketError::ChecksumMismatch { .. })
    ));

    assert!(!evaluate_bytes(&[], &config()));
    assert!(!evaluate_bytes(&bytes[..HEADER_SIZE], &config()));
}
