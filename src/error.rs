// src/error.rs

/// Why a paired payout output failed to satisfy its schedule entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayoutFault {
    /// Fewer outputs remain after the fee output than there are payouts.
    Missing,
    /// Output address differs from the payout address.
    Address,
    /// Output value does not cover the payout amount for some asset class.
    Value,
    /// Output carries a datum (payout outputs must carry none).
    Datum,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarketError {
    // --- Authorization (validator) ---
    /// `payout_outputs_offset` does not index into the transaction outputs.
    OffsetOutOfBounds { offset: u64, outputs: usize },

    /// Output paired with payout `index` does not satisfy it.
    PayoutMismatch { index: usize, fault: PayoutFault },

    /// The fee output is not paid to the marketplace address.
    FeeAddressMismatch,

    /// The fee output does not cover the required marketplace fee.
    FeeUnderpaid,

    /// The fee output's inline datum is missing or is not the tag of the spent reference.
    TagMismatch,

    /// No transaction input is locked by the listing owner's payment credential.
    NotSignedByOwner,

    /// Checked multi-asset arithmetic overflowed.
    ArithmeticOverflow,

    /// Fee rate with a zero denominator.
    InvalidFeeRate,

    // --- Envelope (decoding) ---
    /// The data stream ended before the header or payload could be fully read.
    IncompleteData,

    /// The Magic Bytes were not 'MKT'.
    InvalidMagic,

    /// The Header Version is not supported by this library (currently only V1).
    UnsupportedVersion(u8),

    /// Flags or reserved header bytes carried bits this version does not define.
    ReservedBitsSet,

    /// The Payload length was 0.
    EmptyPayload,

    /// The Payload length exceeded the software limit (1MB).
    PayloadTooLarge(u32),

    /// Checksum verification failed (CRC32 mismatch).
    ChecksumMismatch { expected: u32, found: u32 },

    /// Generic encoding/decoding error (Borsh failure).
    EncodingError,

    /// A length prefix exceeded its hard limit. (Claimed, Limit)
    LimitExceeded(u32, u32),

    /// Value assets were unsorted, duplicated or carried a zero quantity.
    NonCanonicalValue,

    /// Redeemer tag byte did not name a known action.
    UnknownRedeemer(u8),

    /// Output reference string could not be parsed (expected "<64 hex>#<index>").
    InvalidReferenceFormat,

    /// Payload had trailing bytes after the full request parse.
    TrailingData(usize),
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for MarketError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OffsetOutOfBounds { offset, outputs } => write!(
                f,
                "Payout offset {} out of bounds for {} outputs",
                offset, outputs
            ),
            Self::PayoutMismatch { index, fault } => {
                let what = match fault {
                    PayoutFault::Missing => "missing output",
                    PayoutFault::Address => "address mismatch",
                    PayoutFault::Value => "insufficient value",
                    PayoutFault::Datum => "unexpected datum",
                };
                write!(f, "Payout {} not satisfied: {}", index, what)
            }
            Self::FeeAddressMismatch => write!(f, "Fee output not paid to marketplace address"),
            Self::FeeUnderpaid => write!(f, "Marketplace fee underpaid"),
            Self::TagMismatch => write!(f, "Fee output datum does not match spent reference tag"),
            Self::NotSignedByOwner => write!(f, "Listing owner is not a party to the inputs"),
            Self::ArithmeticOverflow => write!(f, "Arithmetic overflow in value computation"),
            Self::InvalidFeeRate => write!(f, "Invalid fee rate (zero denominator)"),
            Self::IncompleteData => write!(f, "Incomplete request data"),
            Self::InvalidMagic => write!(f, "Invalid Magic Bytes"),
            Self::UnsupportedVersion(v) => write!(f, "Unsupported Envelope Version: {}", v),
            Self::ReservedBitsSet => write!(f, "Reserved header bits set"),
            Self::EmptyPayload => write!(f, "Payload is empty"),
            Self::PayloadTooLarge(s) => write!(f, "Payload too large: {} bytes", s),
            Self::ChecksumMismatch { expected, found } => write!(
                f,
                "Checksum mismatch: expected {:08x}, found {:08x}",
                expected, found
            ),
            Self::EncodingError => write!(f, "Binary encoding/decoding error"),
            Self::LimitExceeded(count, limit) => {
                write!(f, "Length {} exceeds limit {}", count, limit)
            }
            Self::NonCanonicalValue => write!(f, "Value assets are not in canonical form"),
            Self::UnknownRedeemer(tag) => write!(f, "Unknown redeemer tag: 0x{:02x}", tag),
            Self::InvalidReferenceFormat => write!(
                f,
                "Invalid output reference format (expected 64-char hex#index)"
            ),
            Self::TrailingData(n) => write!(f, "Trailing data: {} bytes left after parse", n),
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for MarketError {}
