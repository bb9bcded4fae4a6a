// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The static command catalog.
//!
//! Each tag fixes everything the planner needs to know about a command kind: the base flag
//! byte (which doubles as the interpreter's dispatch byte), the canonical input kinds, the
//! output kind if any, whether the revert flag may be set, and the dispatch class. The
//! catalog is closed; record encoding depends on these values staying put.

use core::fmt;

use crate::kind::ParamKind;

/// How the interpreter treats a command's returned bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Any return value is written into a single state slot.
    Normal,
    /// The call returns raw `bytes[]`; left unconsumed, it replaces the whole state array.
    Raw,
    /// The command runs an embedded program; unconsumed output replaces the state array.
    Subplan,
}

/// A command tag. The discriminant is the base flag byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandTag {
    /// Move an amount between two accounts.
    Transfer = 0x01,
    /// Read an account balance.
    Balance = 0x02,
    /// Add two `uint256` words.
    Add = 0x03,
    /// Sum the elements of a `uint256[]` array.
    Sum = 0x04,
    /// Greater-than-or-equal comparison.
    Gte = 0x05,
    /// Abort the program unless the argument is true.
    Assert = 0x06,
    /// Hash a byte string to a `bytes32` digest.
    Digest = 0x07,
    /// Cancel the order identified by a digest.
    Cancel = 0x08,
    /// Emit a log message.
    Emit = 0x09,
    /// Invoke an external contract with an encoded payload.
    Call = 0x0A,
    /// Read-only external call.
    StaticCall = 0x0B,
    /// External call returning raw `bytes[]`.
    RawCall = 0x0C,
    /// Run an embedded command program against the current state.
    Subplan = 0x0D,
    /// Run an embedded command program and discard its state changes.
    SubplanDiscard = 0x0E,
}

impl CommandTag {
    /// Every tag, in flag-byte order.
    pub const ALL: [Self; 14] = [
        Self::Transfer,
        Self::Balance,
        Self::Add,
        Self::Sum,
        Self::Gte,
        Self::Assert,
        Self::Digest,
        Self::Cancel,
        Self::Emit,
        Self::Call,
        Self::StaticCall,
        Self::RawCall,
        Self::Subplan,
        Self::SubplanDiscard,
    ];

    /// Base flag byte; the low seven bits of an encoded record's first byte.
    #[must_use]
    pub const fn flag_byte(self) -> u8 {
        self as u8
    }

    /// Looks up the tag for a base flag byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Transfer),
            0x02 => Some(Self::Balance),
            0x03 => Some(Self::Add),
            0x04 => Some(Self::Sum),
            0x05 => Some(Self::Gte),
            0x06 => Some(Self::Assert),
            0x07 => Some(Self::Digest),
            0x08 => Some(Self::Cancel),
            0x09 => Some(Self::Emit),
            0x0A => Some(Self::Call),
            0x0B => Some(Self::StaticCall),
            0x0C => Some(Self::RawCall),
            0x0D => Some(Self::Subplan),
            0x0E => Some(Self::SubplanDiscard),
            _ => None,
        }
    }

    /// Canonical input kinds, in positional order.
    #[must_use]
    pub fn inputs(self) -> &'static [ParamKind] {
        match self {
            Self::Transfer => &[ParamKind::Address, ParamKind::Address, ParamKind::Uint256],
            Self::Balance => &[ParamKind::Address],
            Self::Add | Self::Gte => &[ParamKind::Uint256, ParamKind::Uint256],
            Self::Sum => &[ParamKind::Uint256Array],
            Self::Assert => &[ParamKind::Bool],
            Self::Digest => &[ParamKind::Bytes],
            Self::Cancel => &[ParamKind::Bytes32],
            Self::Emit => &[ParamKind::Str],
            Self::Call | Self::StaticCall | Self::RawCall => {
                &[ParamKind::Address, ParamKind::Bytes]
            }
            Self::Subplan | Self::SubplanDiscard => {
                &[ParamKind::BytesArray, ParamKind::BytesArray]
            }
        }
    }

    /// Kind of the single return value, if the tag declares one.
    #[must_use]
    pub const fn output(self) -> Option<ParamKind> {
        match self {
            Self::Transfer
            | Self::Assert
            | Self::Cancel
            | Self::Emit
            | Self::SubplanDiscard => None,
            Self::Balance | Self::Add | Self::Sum => Some(ParamKind::Uint256),
            Self::Gte => Some(ParamKind::Bool),
            Self::Digest => Some(ParamKind::Bytes32),
            Self::Call | Self::StaticCall => Some(ParamKind::Bytes),
            Self::RawCall | Self::Subplan => Some(ParamKind::BytesArray),
        }
    }

    /// Whether [`Command::allow_revert`](crate::command::Command::allow_revert) is permitted.
    #[must_use]
    pub const fn is_revertable(self) -> bool {
        matches!(
            self,
            Self::Cancel | Self::Call | Self::RawCall | Self::Subplan | Self::SubplanDiscard
        )
    }

    /// Dispatch class.
    #[must_use]
    pub const fn class(self) -> TagClass {
        match self {
            Self::RawCall => TagClass::Raw,
            Self::Subplan | Self::SubplanDiscard => TagClass::Subplan,
            _ => TagClass::Normal,
        }
    }

    /// Stable lowercase name, used by the disassembler.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Balance => "balance",
            Self::Add => "add",
            Self::Sum => "sum",
            Self::Gte => "gte",
            Self::Assert => "assert",
            Self::Digest => "digest",
            Self::Cancel => "cancel",
            Self::Emit => "emit",
            Self::Call => "call",
            Self::StaticCall => "static_call",
            Self::RawCall => "raw_call",
            Self::Subplan => "subplan",
            Self::SubplanDiscard => "subplan_discard",
        }
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
