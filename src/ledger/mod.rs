//! Ledger-side data model consumed by the validator.
//!
//! These mirror the observable contract of the ledger's own transaction types:
//! credentials, addresses, outputs with optional datums, and the output
//! reference that identifies the locked asset being spent.

use core::fmt;
use core::str::FromStr;

use alloc::vec::Vec;

use borsh::{BorshDeserialize, BorshSerialize};
use byteorder::{ByteOrder, LittleEndian};

use crate::error::MarketError;

pub mod value;

pub use value::{AssetClass, PolicyId, Value, ValueSum};

/// 28-byte key or script hash.
pub type Hash28 = [u8; 28];

/// 32-byte transaction id.
pub type TxId = [u8; 32];

/// Size of [`OutputReference::canonical_bytes`].
pub const OUTPUT_REFERENCE_SIZE: usize = 40;

// -----------------------------------------------------------------------------
// Credentials and addresses
// -----------------------------------------------------------------------------

/// Payment or stake credential: the hash that controls spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub enum Credential {
    VerificationKey(Hash28),
    Script(Hash28),
}

impl Credential {
    pub const fn hash(&self) -> &Hash28 {
        match self {
            Credential::VerificationKey(h) | Credential::Script(h) => h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct Address {
    pub payment: Credential,
    pub stake: Option<Credential>,
}

impl Address {
    /// Enterprise address (no stake part).
    pub const fn new(payment: Credential) -> Self {
        Self {
            payment,
            stake: None,
        }
    }

    pub const fn with_stake(payment: Credential, stake: Credential) -> Self {
        Self {
            payment,
            stake: Some(stake),
        }
    }
}

// -----------------------------------------------------------------------------
// Outputs
// -----------------------------------------------------------------------------

/// Data attached to an output.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Datum {
    None,
    /// Hash-only datum; the payload is not visible to the validator.
    Hash([u8; 32]),
    /// Inline datum bytes, directly checkable.
    Inline(Vec<u8>),
}

impl Datum {
    pub const fn is_none(&self) -> bool {
        matches!(self, Datum::None)
    }

    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match self {
            Datum::Inline(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    pub address: Address,
    pub value: Value,
    pub datum: Datum,
}

impl TxOut {
    /// Output without a datum.
    pub fn new(address: Address, value: Value) -> Self {
        Self {
            address,
            value,
            datum: Datum::None,
        }
    }

    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = datum;
        self
    }
}

/// A resolved input: the reference being spent and the output it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    pub output_reference: OutputReference,
    pub output: TxOut,
}

/// The transaction view under evaluation. Order of both sequences is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

// -----------------------------------------------------------------------------
// OutputReference
// -----------------------------------------------------------------------------

/// Identity of a ledger output: producing transaction id plus output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct OutputReference {
    pub transaction_id: TxId,
    pub output_index: u64,
}

impl OutputReference {
    pub const fn new(transaction_id: TxId, output_index: u64) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    /// Canonical serialization: 32-byte txid followed by the index as u64 LE.
    /// Byte-identical to the Borsh encoding of this struct.
    pub fn canonical_bytes(&self) -> [u8; OUTPUT_REFERENCE_SIZE] {
        let mut buf = [0u8; OUTPUT_REFERENCE_SIZE];
        buf[0..32].copy_from_slice(&self.transaction_id);
        LittleEndian::write_u64(&mut buf[32..40], self.output_index);
        buf
    }
}

impl fmt::Display for OutputReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.transaction_id.iter() {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "#{}", self.output_index)
    }
}

impl FromStr for OutputReference {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash_part, index_part) = s
            .trim()
            .split_once('#')
            .ok_or(MarketError::InvalidReferenceFormat)?;
        let transaction_id = decode_hex_32(hash_part)?;
        let output_index = index_part
            .parse::<u64>()
            .map_err(|_| MarketError::InvalidReferenceFormat)?;
        Ok(OutputReference {
            transaction_id,
            output_index,
        })
    }
}

/// Decode exactly 64 hex chars into 32 bytes. No leading 0x. Fails on wrong length or non-hex.
fn decode_hex_32(s: &str) -> Result<[u8; 32], MarketError> {
    if s.len() != 64 {
        return Err(MarketError::InvalidReferenceFormat);
    }
    let mut out = [0u8; 32];
    let mut chars = s.chars();
    for byte in out.iter_mut() {
        let hi = chars.next().and_then(hex_digit).ok_or(MarketError::InvalidReferenceFormat)?;
        let lo = chars.next().and_then(hex_digit).ok_or(MarketError::InvalidReferenceFormat)?;
        *byte = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        'A'..='F' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}
