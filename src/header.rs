// src/header.rs
use crate::config::MAX_PAYLOAD_SIZE;
use crate::error::MarketError;
use byteorder::{ByteOrder, LittleEndian};

/// The request envelope Magic Bytes ("MKT")
pub const MAGIC_BYTES: [u8; 3] = [0x4D, 0x4B, 0x54];

pub const HEADER_SIZE: usize = 16;
pub const CURRENT_VERSION: u8 = 1;

/// Header Flags
pub const FLAG_TESTNET: u8 = 0x01;
const KNOWN_FLAGS: u8 = FLAG_TESTNET;

/// The envelope header.
///
/// Wire layout (16 bytes):
/// `[0..3]` magic, `[3]` flags, `[4]` version, `[5..8]` reserved (zero),
/// `[8..12]` payload length (u32 LE), `[12..16]` CRC32 of bytes 0..12 + payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub flags: u8,
    pub version: u8,
    pub payload_len: u32,
    pub checksum: u32,
}

impl Header {
    /// Builds a header for `payload`, computing length and checksum.
    pub fn for_payload(flags: u8, payload: &[u8]) -> Result<Self, MarketError> {
        let payload_len = u32::try_from(payload.len())
            .map_err(|_| MarketError::PayloadTooLarge(u32::MAX))?;
        let mut header = Self {
            flags,
            version: CURRENT_VERSION,
            payload_len,
            checksum: 0,
        };
        header.validate()?;
        header.checksum = header.compute_checksum(payload);
        Ok(header)
    }

    /// Zero-Allocation parsing: Reads the header from the first 16 bytes of a slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarketError> {
        if bytes.len() < HEADER_SIZE {
            return Err(MarketError::IncompleteData);
        }

        // 1. Check Magic Bytes
        if bytes[0..3] != MAGIC_BYTES {
            return Err(MarketError::InvalidMagic);
        }

        // 2. Reserved bytes must be zero
        if bytes[5..8] != [0u8; 3] {
            return Err(MarketError::ReservedBitsSet);
        }

        // 3. Parse Fields manually (Little-Endian)
        let header = Self {
            flags: bytes[3],
            version: bytes[4],
            payload_len: LittleEndian::read_u32(&bytes[8..12]),
            checksum: LittleEndian::read_u32(&bytes[12..16]),
        };

        // 4. Validate logical consistency
        header.validate()?;

        Ok(header)
    }

    /// Serializes the header to a 16-byte array.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.write_unchecked_prefix(&mut buf);
        LittleEndian::write_u32(&mut buf[12..16], self.checksum);
        buf
    }

    /// Structural validation of the header fields.
    pub fn validate(&self) -> Result<(), MarketError> {
        // Version Lock
        if self.version != CURRENT_VERSION {
            return Err(MarketError::UnsupportedVersion(self.version));
        }

        if self.flags & !KNOWN_FLAGS != 0 {
            return Err(MarketError::ReservedBitsSet);
        }

        // Sanity Check: Payload Size
        if self.payload_len == 0 {
            return Err(MarketError::EmptyPayload);
        }
        if self.payload_len > MAX_PAYLOAD_SIZE {
            return Err(MarketError::PayloadTooLarge(self.payload_len));
        }

        Ok(())
    }

    /// Verifies the integrity of the envelope using CRC32.
    pub fn verify_checksum(&self, payload: &[u8]) -> Result<(), MarketError> {
        if payload.len() != self.payload_len as usize {
            return Err(MarketError::IncompleteData);
        }

        let calculated = self.compute_checksum(payload);
        if calculated != self.checksum {
            return Err(MarketError::ChecksumMismatch {
                expected: self.checksum,
                found: calculated,
            });
        }

        Ok(())
    }

    pub const fn is_testnet(&self) -> bool {
        (self.flags & FLAG_TESTNET) != 0
    }

    fn compute_checksum(&self, payload: &[u8]) -> u32 {
        let mut prefix = [0u8; HEADER_SIZE];
        self.write_unchecked_prefix(&mut prefix);
        // Checksum field (bytes 12-15) is explicitly EXCLUDED
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&prefix[0..12]);
        hasher.update(payload);
        hasher.finalize()
    }

    fn write_unchecked_prefix(&self, buf: &mut [u8; HEADER_SIZE]) {
        buf[0..3].copy_from_slice(&MAGIC_BYTES);
        buf[3] = self.flags;
        buf[4] = self.version;
        LittleEndian::write_u32(&mut buf[8..12], self.payload_len);
    }
}
