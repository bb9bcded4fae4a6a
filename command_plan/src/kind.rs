// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical argument and return kinds.
//!
//! Every value carried by a plan has exactly one [`ParamKind`]. Kinds are compared for equality
//! with no coercion: a command signature expecting `uint256` accepts only `uint256` values.

use core::fmt;

/// The canonical kind of an argument or return value.
///
/// The kind decides whether the slot encoding is *static* (a single 32-byte word) or *dynamic*
/// (a length word followed by word-padded payload), see [`crate::abi`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// 256-bit unsigned integer.
    Uint256,
    /// Boolean, stored as a full word holding 0 or 1.
    Bool,
    /// 160-bit account address, left-padded to a word.
    Address,
    /// Fixed 32-byte word.
    Bytes32,
    /// Variable-length byte string.
    Bytes,
    /// UTF-8 string, encoded like [`ParamKind::Bytes`].
    Str,
    /// Array of 256-bit unsigned integers.
    Uint256Array,
    /// Array of byte strings.
    ///
    /// This is also the kind of the state sentinel and of subplan values; there is no literal
    /// constructor for it.
    BytesArray,
}

impl ParamKind {
    /// Returns `true` if the kind has a variable-length slot encoding.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(
            self,
            Self::Bytes | Self::Str | Self::Uint256Array | Self::BytesArray
        )
    }

    /// Canonical type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uint256 => "uint256",
            Self::Bool => "bool",
            Self::Address => "address",
            Self::Bytes32 => "bytes32",
            Self::Bytes => "bytes",
            Self::Str => "string",
            Self::Uint256Array => "uint256[]",
            Self::BytesArray => "bytes[]",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(ParamKind::Uint256.as_str(), "uint256");
        assert_eq!(ParamKind::Bool.as_str(), "bool");
        assert_eq!(ParamKind::Address.as_str(), "address");
        assert_eq!(ParamKind::Bytes32.as_str(), "bytes32");
        assert_eq!(ParamKind::Bytes.as_str(), "bytes");
        assert_eq!(ParamKind::Str.as_str(), "string");
        assert_eq!(ParamKind::Uint256Array.as_str(), "uint256[]");
        assert_eq!(ParamKind::BytesArray.as_str(), "bytes[]");
    }

    #[test]
    fn dynamic_kinds_are_exactly_the_length_prefixed_ones() {
        for kind in [
            ParamKind::Uint256,
            ParamKind::Bool,
            ParamKind::Address,
            ParamKind::Bytes32,
        ] {
            assert!(!kind.is_dynamic(), "{kind} must be static");
        }
        for kind in [
            ParamKind::Bytes,
            ParamKind::Str,
            ParamKind::Uint256Array,
            ParamKind::BytesArray,
        ] {
            assert!(kind.is_dynamic(), "{kind} must be dynamic");
        }
    }
}
