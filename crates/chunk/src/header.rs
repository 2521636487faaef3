//! Chunk header layout and validation.
//!
//! ```text
//!  signature  1B 4C 75 61
//!  version    53
//!  format     00
//!  data       19 93 0D 0A 1A 0A
//!  sizes      int, size_t, Instruction, lua_Integer, lua_Number
//!  int probe  0x5678 as an 8-byte integer
//!  num probe  370.5 as an 8-byte float
//! ```
//! The integer probe fixes the byte order for the rest of the chunk.

use tracing::debug;

use crate::error::UndumpError;
use crate::reader::Reader;

pub const SIGNATURE: &[u8; 4] = b"\x1bLua";
pub const VERSION: u8 = 0x53;
pub const FORMAT: u8 = 0;
pub const DATA: &[u8; 6] = b"\x19\x93\r\n\x1a\n";
pub const CINT_SIZE: u8 = 4;
pub const CSIZET_SIZE: u8 = 8;
pub const INSTRUCTION_SIZE: u8 = 4;
pub const INTEGER_SIZE: u8 = 8;
pub const NUMBER_SIZE: u8 = 8;
pub const INT_PROBE: u64 = 0x5678;
pub const NUM_PROBE: f64 = 370.5;

/// Size fields in header order, with the names used in mismatch errors.
pub const SIZE_FIELDS: [(&str, u8); 5] = [
    ("int", CINT_SIZE),
    ("size_t", CSIZET_SIZE),
    ("Instruction", INSTRUCTION_SIZE),
    ("lua_Integer", INTEGER_SIZE),
    ("lua_Number", NUMBER_SIZE),
];

// Constant tags.
pub const TAG_NIL: u8 = 0x00;
pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_NUMFLT: u8 = 0x03;
pub const TAG_NUMINT: u8 = 0x13;
pub const TAG_SHRSTR: u8 = 0x04;
pub const TAG_LNGSTR: u8 = 0x14;

/// Longest string written with the short-string tag.
pub const MAX_SHORT_LEN: usize = 40;

/// Deepest function nesting accepted, counting the main function as 0.
pub const MAX_NESTING: usize = 200;

/// Byte order of multi-byte words in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// The byte order of the host.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    pub fn u64_from(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        }
    }

    pub fn u32_bytes(self, n: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => n.to_le_bytes(),
            ByteOrder::Big => n.to_be_bytes(),
        }
    }

    pub fn u64_bytes(self, n: u64) -> [u8; 8] {
        match self {
            ByteOrder::Little => n.to_le_bytes(),
            ByteOrder::Big => n.to_be_bytes(),
        }
    }
}

/// Validate the header and return the chunk's byte order.
pub(crate) fn check_header(r: &mut Reader<'_>) -> Result<ByteOrder, UndumpError> {
    if r.read_bytes(SIGNATURE.len())? != SIGNATURE {
        return Err(UndumpError::NotAChunk);
    }
    if r.read_byte()? != VERSION {
        return Err(UndumpError::VersionMismatch);
    }
    if r.read_byte()? != FORMAT {
        return Err(UndumpError::FormatMismatch);
    }
    if r.read_bytes(DATA.len())? != DATA {
        return Err(UndumpError::Corrupted);
    }
    for (field, size) in SIZE_FIELDS {
        if r.read_byte()? != size {
            return Err(UndumpError::SizeMismatch { field });
        }
    }

    let probe = r.read_array::<8>()?;
    let order = if u64::from_le_bytes(probe) == INT_PROBE {
        ByteOrder::Little
    } else if u64::from_be_bytes(probe) == INT_PROBE {
        ByteOrder::Big
    } else {
        return Err(UndumpError::BadByteOrder);
    };
    r.set_order(order);

    if r.read_number()? != NUM_PROBE {
        return Err(UndumpError::FloatFormatMismatch);
    }
    debug!(?order, "chunk header accepted");
    Ok(order)
}

/// Append a header in `order` to `out`.
pub(crate) fn write_header(out: &mut Vec<u8>, order: ByteOrder) {
    out.extend_from_slice(SIGNATURE);
    out.push(VERSION);
    out.push(FORMAT);
    out.extend_from_slice(DATA);
    out.extend(SIZE_FIELDS.iter().map(|&(_, size)| size));
    out.extend_from_slice(&order.u64_bytes(INT_PROBE));
    out.extend_from_slice(&order.u64_bytes(NUM_PROBE.to_bits()));
}
