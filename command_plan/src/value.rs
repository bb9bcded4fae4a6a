// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Argument values.
//!
//! A [`Value`] fills one argument position of a command: an ABI-encoded literal, the
//! return value of an earlier command, the whole-state sentinel, or an embedded subplan.
//! Return and subplan values are handles into the [`Planner`](crate::planner::Planner)
//! that created them; any other planner rejects them.

use alloc::vec::Vec;

use crate::abi::{self, Address, Word};
use crate::kind::ParamKind;
use crate::planner::{CommandId, PlannerId};

/// One argument position of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// An ABI-encoded constant.
    Literal(LiteralValue),
    /// The single return value of an earlier command.
    Return(ReturnValue),
    /// The entire current state array.
    State,
    /// The encoded records of a nested planner scope.
    Subplan(SubplanValue),
}

impl Value {
    /// The value's canonical kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Literal(literal) => literal.kind,
            Self::Return(ret) => ret.kind,
            Self::State | Self::Subplan(_) => ParamKind::BytesArray,
        }
    }

    /// A `uint256` literal from a full-width word.
    #[must_use]
    pub fn uint256(word: Word) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Uint256,
            bytes: abi::encode_uint256(word),
        })
    }

    /// A `bytes32` literal.
    #[must_use]
    pub fn bytes32(word: Word) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Bytes32,
            bytes: abi::encode_bytes32(word),
        })
    }

    /// A `uint256[]` literal from element values.
    #[must_use]
    pub fn uint256_array<I: IntoIterator<Item = u128>>(values: I) -> Self {
        let words: Vec<Word> = values.into_iter().map(abi::uint256_word).collect();
        Self::Literal(LiteralValue {
            kind: ParamKind::Uint256Array,
            bytes: abi::encode_uint256_array(&words),
        })
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Bool,
            bytes: abi::encode_bool(value),
        })
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Self::uint256(abi::uint256_word(value))
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Address,
            bytes: abi::encode_address(address),
        })
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Bytes,
            bytes: abi::encode_bytes(data),
        })
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Self::from(data.as_slice())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Literal(LiteralValue {
            kind: ParamKind::Str,
            bytes: abi::encode_str(text),
        })
    }
}

impl From<ReturnValue> for Value {
    fn from(ret: ReturnValue) -> Self {
        Self::Return(ret)
    }
}

/// An ABI-encoded constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralValue {
    pub(crate) kind: ParamKind,
    pub(crate) bytes: Vec<u8>,
}

impl LiteralValue {
    /// The literal's kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The encoded slot contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Handle to the return value of a previously added command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReturnValue {
    pub(crate) kind: ParamKind,
    pub(crate) command: CommandId,
    pub(crate) instance: u64,
}

impl ReturnValue {
    /// The return value's kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The command that produces this value.
    #[must_use]
    pub fn command(&self) -> CommandId {
        self.command
    }
}

/// Handle to a nested scope, consumed by subplan commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubplanValue {
    pub(crate) scope: PlannerId,
    pub(crate) instance: u64,
}

impl SubplanValue {
    /// The scope this value embeds.
    #[must_use]
    pub fn scope(&self) -> PlannerId {
        self.scope
    }
}
