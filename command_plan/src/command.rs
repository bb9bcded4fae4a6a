// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command construction and validation.
//!
//! A [`Command`] is a tag plus a positional argument list. Arity and kinds are checked
//! against the tag's canonical signature when the command is built, so a planner only
//! ever holds well-formed commands.

use alloc::vec::Vec;
use core::fmt;

use crate::kind::ParamKind;
use crate::planner::PlannerId;
use crate::record::ALLOW_REVERT;
use crate::tag::{CommandTag, TagClass};
use crate::value::Value;

/// A validated command: tag, flags byte, and arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    tag: CommandTag,
    flags: u8,
    args: Vec<Value>,
}

impl Command {
    /// Builds a command, checking `args` against the tag's canonical signature.
    ///
    /// Subplan tags additionally require exactly one [`Value::Subplan`] and exactly one
    /// [`Value::State`] argument.
    pub fn new(tag: CommandTag, args: Vec<Value>) -> Result<Self, CommandError> {
        let inputs = tag.inputs();
        if args.len() != inputs.len() {
            return Err(CommandError::ArgCount {
                tag,
                expected: inputs.len(),
                got: args.len(),
            });
        }
        for (index, (value, &expected)) in args.iter().zip(inputs).enumerate() {
            if value.kind() != expected {
                return Err(CommandError::TypeMismatch {
                    tag,
                    index,
                    expected,
                    got: value.kind(),
                });
            }
        }
        if tag.class() == TagClass::Subplan {
            let subplans = args
                .iter()
                .filter(|value| matches!(value, Value::Subplan(_)))
                .count();
            let states = args
                .iter()
                .filter(|value| matches!(value, Value::State))
                .count();
            if subplans != 1 || states != 1 {
                return Err(CommandError::MalformedSubplan {
                    tag,
                    subplans,
                    states,
                });
            }
        }
        Ok(Self {
            tag,
            flags: tag.flag_byte(),
            args,
        })
    }

    /// Sets the revert bit. Fails for tags outside the revertable set.
    pub fn allow_revert(mut self) -> Result<Self, CommandError> {
        if !self.tag.is_revertable() {
            return Err(CommandError::NotRevertable { tag: self.tag });
        }
        self.flags |= ALLOW_REVERT;
        Ok(self)
    }

    /// The command's tag.
    #[must_use]
    pub fn tag(&self) -> CommandTag {
        self.tag
    }

    /// The encoded flags byte: the base flag byte, plus the revert bit when set.
    #[must_use]
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Whether the revert bit is set.
    #[must_use]
    pub fn allows_revert(&self) -> bool {
        self.flags & ALLOW_REVERT != 0
    }

    /// The positional arguments.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The scope embedded by this command's subplan argument, if it has one.
    pub(crate) fn subplan_scope(&self) -> Option<PlannerId> {
        self.args.iter().find_map(|value| match value {
            Value::Subplan(subplan) => Some(subplan.scope),
            _ => None,
        })
    }
}

/// Errors when building a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Wrong number of positional arguments for the tag's signature.
    ArgCount {
        /// The command tag.
        tag: CommandTag,
        /// Arity of the canonical signature.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },
    /// An argument's kind does not equal the expected kind at its position.
    TypeMismatch {
        /// The command tag.
        tag: CommandTag,
        /// Zero-based argument position.
        index: usize,
        /// Kind the signature expects.
        expected: ParamKind,
        /// Kind the argument carries.
        got: ParamKind,
    },
    /// A subplan command without exactly one subplan and one state argument.
    MalformedSubplan {
        /// The command tag.
        tag: CommandTag,
        /// Number of subplan arguments supplied.
        subplans: usize,
        /// Number of state arguments supplied.
        states: usize,
    },
    /// The revert bit was requested on a tag outside the revertable set.
    NotRevertable {
        /// The command tag.
        tag: CommandTag,
    },
    /// A return or subplan handle minted by a different planner.
    ForeignValue {
        /// The command tag.
        tag: CommandTag,
        /// Zero-based argument position.
        index: usize,
    },
    /// A scope id this planner never created.
    UnknownScope {
        /// The offending scope id.
        scope: PlannerId,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgCount { tag, expected, got } => {
                write!(f, "'{tag}' takes {expected} argument(s), got {got}")
            }
            Self::TypeMismatch {
                tag,
                index,
                expected,
                got,
            } => write!(
                f,
                "argument {index} of '{tag}' expects {expected}, got {got}"
            ),
            Self::MalformedSubplan {
                tag,
                subplans,
                states,
            } => write!(
                f,
                "'{tag}' needs exactly one subplan and one state argument, \
                 got {subplans} subplan(s) and {states} state(s)"
            ),
            Self::NotRevertable { tag } => write!(f, "'{tag}' may not set the revert flag"),
            Self::ForeignValue { tag, index } => write!(
                f,
                "argument {index} of '{tag}' was created by a different planner"
            ),
            Self::UnknownScope { scope } => {
                write!(f, "scope {} was never created by this planner", scope.0)
            }
        }
    }
}

impl core::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::abi::Address;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    #[test]
    fn builds_a_well_formed_command() {
        let command = Command::new(
            CommandTag::Transfer,
            vec![addr(1).into(), addr(2).into(), 55_u64.into()],
        )
        .unwrap();
        assert_eq!(command.tag(), CommandTag::Transfer);
        assert_eq!(command.flags(), 0x01);
        assert!(!command.allows_revert());
        assert_eq!(command.args().len(), 3);
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = Command::new(CommandTag::Transfer, vec![addr(1).into()]).unwrap_err();
        assert_eq!(
            err,
            CommandError::ArgCount {
                tag: CommandTag::Transfer,
                expected: 3,
                got: 1,
            }
        );
    }

    #[test]
    fn rejects_kind_mismatch_naming_both_kinds() {
        let err = Command::new(
            CommandTag::Transfer,
            vec![addr(1).into(), 9_u64.into(), 55_u64.into()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CommandError::TypeMismatch {
                tag: CommandTag::Transfer,
                index: 1,
                expected: ParamKind::Address,
                got: ParamKind::Uint256,
            }
        );
    }

    #[test]
    fn rejects_subplan_shape_violations() {
        // Two state sentinels pass the kind check but not the shape check.
        let err = Command::new(
            CommandTag::SubplanDiscard,
            vec![Value::State, Value::State],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CommandError::MalformedSubplan {
                tag: CommandTag::SubplanDiscard,
                subplans: 0,
                states: 2,
            }
        );
    }

    #[test]
    fn revert_bit_is_gated_by_the_tag() {
        let ok = Command::new(CommandTag::Cancel, vec![Value::bytes32([0xAB; 32])])
            .unwrap()
            .allow_revert()
            .unwrap();
        assert_eq!(ok.flags(), 0x88);
        assert!(ok.allows_revert());

        let err = Command::new(CommandTag::Balance, vec![addr(1).into()])
            .unwrap()
            .allow_revert()
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::NotRevertable {
                tag: CommandTag::Balance,
            }
        );
    }

    #[test]
    fn error_messages_name_the_tag() {
        use alloc::string::ToString;

        let err = Command::new(CommandTag::Balance, vec![]).unwrap_err();
        assert_eq!(err.to_string(), "'balance' takes 1 argument(s), got 0");
    }
}
