// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed-width instruction record.
//!
//! Every command encodes to exactly [`RECORD_BYTES`] bytes: one flags byte, [`ARG_SLOTS`]
//! argument slot bytes right-padded with [`SLOT_NONE`], and one output slot byte. Slot
//! numbers `0x00..=0xFD` address the state array; `0xFE` and `0xFF` are reserved
//! sentinels. The normative layout lives in `docs/format.md`.

use alloc::vec::Vec;
use core::fmt;

use crate::tag::CommandTag;

/// Size of one encoded instruction record in bytes.
pub const RECORD_BYTES: usize = 8;

/// Number of argument slot bytes in a record.
pub const ARG_SLOTS: usize = 6;

/// Slot sentinel meaning "the entire current state array".
pub const SLOT_STATE: u8 = 0xFE;

/// Slot sentinel for unused argument positions and discarded outputs.
pub const SLOT_NONE: u8 = 0xFF;

/// Flags bit permitting the command to revert without aborting the program.
pub const ALLOW_REVERT: u8 = 0x80;

/// Number of addressable state slots. `0xFE` and `0xFF` never address a slot.
pub const MAX_SLOTS: usize = 254;

/// One decoded instruction record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Command tag decoded from the low seven flag bits.
    pub tag: CommandTag,
    /// Whether the revert bit is set.
    pub allow_revert: bool,
    /// Argument slot bytes, right-padded with [`SLOT_NONE`].
    pub args: [u8; ARG_SLOTS],
    /// Output slot byte.
    pub output: u8,
}

impl Record {
    /// Encodes the record to its fixed-width form.
    #[must_use]
    pub fn encode(&self) -> [u8; RECORD_BYTES] {
        let mut out = [0_u8; RECORD_BYTES];
        out[0] = self.tag.flag_byte() | if self.allow_revert { ALLOW_REVERT } else { 0 };
        out[1..1 + ARG_SLOTS].copy_from_slice(&self.args);
        out[RECORD_BYTES - 1] = self.output;
        out
    }

    /// Decodes one record from exactly [`RECORD_BYTES`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != RECORD_BYTES {
            return Err(DecodeError::BadLength { len: bytes.len() });
        }
        let flags = bytes[0];
        let Some(tag) = CommandTag::from_byte(flags & !ALLOW_REVERT) else {
            return Err(DecodeError::UnknownTag {
                byte: flags & !ALLOW_REVERT,
            });
        };
        let mut args = [0_u8; ARG_SLOTS];
        args.copy_from_slice(&bytes[1..1 + ARG_SLOTS]);
        Ok(Self {
            tag,
            allow_revert: flags & ALLOW_REVERT != 0,
            args,
            output: bytes[RECORD_BYTES - 1],
        })
    }

    /// Argument slots without the trailing padding.
    #[must_use]
    pub fn arg_slots(&self) -> &[u8] {
        &self.args[..self.tag.inputs().len()]
    }
}

/// Decodes a command byte string into its records.
pub fn decode_records(commands: &[u8]) -> Result<Vec<Record>, DecodeError> {
    if !commands.len().is_multiple_of(RECORD_BYTES) {
        return Err(DecodeError::Truncated {
            len: commands.len(),
        });
    }
    commands
        .chunks_exact(RECORD_BYTES)
        .map(Record::decode)
        .collect()
}

/// Errors when decoding instruction records.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A single record was not exactly [`RECORD_BYTES`] bytes long.
    BadLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// A command byte string was not a whole number of records.
    Truncated {
        /// Length of the rejected input.
        len: usize,
    },
    /// The dispatch bits did not name a known tag.
    UnknownTag {
        /// The offending base flag byte.
        byte: u8,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { len } => {
                write!(f, "record must be exactly {RECORD_BYTES} bytes, got {len}")
            }
            Self::Truncated { len } => write!(
                f,
                "command bytes length {len} is not a multiple of {RECORD_BYTES}"
            ),
            Self::UnknownTag { byte } => write!(f, "unknown command tag byte 0x{byte:02x}"),
        }
    }
}

impl core::error::Error for DecodeError {}
