// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The planner: a command arena organized into nestable scopes.
//!
//! A [`Planner`] owns every command of a program, including the commands of nested
//! subplan scopes, in two append-only arenas addressed by the integer handles
//! [`CommandId`] and [`PlannerId`]. Scope 0 is the root program; further scopes are
//! created with [`Planner::subplanner`] and embedded through subplan commands.
//!
//! Handles returned by [`Planner::add`] and [`Planner::subplan_value`] carry a
//! process-unique planner instance id, so a handle minted by one planner is rejected
//! when added to another instead of silently aliasing an unrelated command.
//!
//! [`Planner::plan`] turns the whole tree into bytes. It borrows the planner
//! immutably and is deterministic: planning the same planner twice yields identical
//! output, and more commands may be added afterwards.

use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::command::{Command, CommandError};
use crate::plan::{self, Plan, PlanError};
use crate::tag::CommandTag;
use crate::value::{ReturnValue, SubplanValue, Value};
use crate::visibility;

/// Identifies a command (index into its planner's command arena).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(pub u32);

/// Identifies a scope (index into its planner's scope arena).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlannerId(pub u32);

impl CommandId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl PlannerId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// Collects commands and plans them into a byte program.
#[derive(Debug)]
pub struct Planner {
    instance: u64,
    commands: Vec<Command>,
    scopes: Vec<Vec<CommandId>>,
}

impl Planner {
    /// The root scope. [`Self::plan`] encodes this scope's commands as the
    /// top-level instruction stream.
    pub const ROOT: PlannerId = PlannerId(0);

    /// Creates an empty planner with a fresh instance id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            commands: Vec::new(),
            scopes: vec![Vec::new()],
        }
    }

    /// Creates an empty nested scope.
    ///
    /// The scope's commands are planned only where [`Self::subplan_value`]
    /// embeds it; a scope never embedded is dead and contributes nothing.
    pub fn subplanner(&mut self) -> PlannerId {
        let id = PlannerId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Vec::new());
        id
    }

    /// The whole-state sentinel, required once in every subplan command's
    /// argument list.
    #[must_use]
    pub fn state_value(&self) -> Value {
        Value::State
    }

    /// A value embedding `scope`, required once in every subplan command's
    /// argument list. The id should come from this planner's
    /// [`Self::subplanner`]; ids from other planners are rejected by
    /// [`Self::add`].
    #[must_use]
    pub fn subplan_value(&self, scope: PlannerId) -> Value {
        Value::Subplan(SubplanValue {
            scope,
            instance: self.instance,
        })
    }

    /// Appends `command` to the root scope.
    ///
    /// Returns a [`ReturnValue`] handle when the command's tag declares an
    /// output, `None` otherwise.
    pub fn add(&mut self, command: Command) -> Result<Option<ReturnValue>, CommandError> {
        self.add_to(Self::ROOT, command)
    }

    /// Appends `command` to `scope`.
    pub fn add_to(
        &mut self,
        scope: PlannerId,
        command: Command,
    ) -> Result<Option<ReturnValue>, CommandError> {
        if scope.index() >= self.scopes.len() {
            return Err(CommandError::UnknownScope { scope });
        }
        for (index, value) in command.args().iter().enumerate() {
            if self.is_foreign(value) {
                return Err(CommandError::ForeignValue {
                    tag: command.tag(),
                    index,
                });
            }
        }
        let id = CommandId(u32::try_from(self.commands.len()).unwrap_or(u32::MAX));
        let output = command.tag().output().map(|kind| ReturnValue {
            kind,
            command: id,
            instance: self.instance,
        });
        self.commands.push(command);
        self.scopes[scope.index()].push(id);
        Ok(output)
    }

    /// Builds and appends a subplan command embedding `scope`, paired with the
    /// state sentinel.
    pub fn add_subplan(
        &mut self,
        tag: CommandTag,
        scope: PlannerId,
    ) -> Result<Option<ReturnValue>, CommandError> {
        let command = Command::new(tag, vec![self.subplan_value(scope), self.state_value()])?;
        self.add(command)
    }

    /// Total number of commands across every scope.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Plans the root scope into instruction bytes and an initial state array.
    ///
    /// Runs the visibility pass over the reachable scope tree, then allocates
    /// state slots and encodes one fixed-width record per command. The output
    /// is a pure function of the command graph.
    pub fn plan(&self) -> Result<Plan, PlanError> {
        let preplan = visibility::preplan(self)?;
        plan::encode_plan(self, &preplan)
    }

    fn is_foreign(&self, value: &Value) -> bool {
        match value {
            Value::Return(ret) => ret.instance != self.instance,
            Value::Subplan(subplan) => {
                subplan.instance != self.instance || subplan.scope.index() >= self.scopes.len()
            }
            Value::Literal(_) | Value::State => false,
        }
    }

    pub(crate) fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.index()]
    }

    pub(crate) fn scope_commands(&self, scope: PlannerId) -> &[CommandId] {
        &self.scopes[scope.index()]
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::abi::Address;
    use crate::kind::ParamKind;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    fn transfer(from: u8, to: u8, amount: u64) -> Command {
        Command::new(
            CommandTag::Transfer,
            vec![addr(from).into(), addr(to).into(), amount.into()],
        )
        .unwrap()
    }

    fn balance(byte: u8) -> Command {
        Command::new(CommandTag::Balance, vec![addr(byte).into()]).unwrap()
    }

    #[test]
    fn add_returns_a_handle_only_for_tags_with_output() {
        let mut planner = Planner::new();
        assert!(planner.add(transfer(1, 2, 5)).unwrap().is_none());

        let ret = planner.add(balance(1)).unwrap().unwrap();
        assert_eq!(ret.kind(), ParamKind::Uint256);
        assert_eq!(ret.command(), CommandId(1));
        assert_eq!(planner.command_count(), 2);
    }

    #[test]
    fn rejects_return_values_from_another_planner() {
        let mut first = Planner::new();
        let ret = first.add(balance(1)).unwrap().unwrap();

        let mut second = Planner::new();
        let command = Command::new(CommandTag::Add, vec![ret.into(), 1_u64.into()]).unwrap();
        let err = second.add(command).unwrap_err();
        assert_eq!(
            err,
            CommandError::ForeignValue {
                tag: CommandTag::Add,
                index: 0,
            }
        );

        // The planner that minted the handle still accepts it.
        let command = Command::new(CommandTag::Add, vec![ret.into(), 1_u64.into()]).unwrap();
        assert!(first.add(command).is_ok());
    }

    #[test]
    fn rejects_subplan_values_from_another_planner() {
        let mut first = Planner::new();
        let scope = first.subplanner();
        let foreign = first.subplan_value(scope);

        let mut second = Planner::new();
        let command =
            Command::new(CommandTag::SubplanDiscard, vec![foreign, Value::State]).unwrap();
        let err = second.add(command).unwrap_err();
        assert_eq!(
            err,
            CommandError::ForeignValue {
                tag: CommandTag::SubplanDiscard,
                index: 0,
            }
        );
    }

    #[test]
    fn add_to_rejects_unknown_scopes() {
        let mut planner = Planner::new();
        let err = planner.add_to(PlannerId(9), transfer(1, 2, 5)).unwrap_err();
        assert_eq!(err, CommandError::UnknownScope { scope: PlannerId(9) });
    }

    #[test]
    fn add_subplan_builds_the_canonical_shape() {
        let mut planner = Planner::new();
        let scope = planner.subplanner();
        planner.add_to(scope, transfer(1, 2, 5)).unwrap();

        let ret = planner
            .add_subplan(CommandTag::Subplan, scope)
            .unwrap()
            .unwrap();
        assert_eq!(ret.kind(), ParamKind::BytesArray);

        let none = planner
            .add_subplan(CommandTag::SubplanDiscard, scope)
            .unwrap();
        assert!(none.is_none());
        assert_eq!(planner.command_count(), 3);
    }

    #[test]
    fn planner_instances_never_share_ids() {
        let first = Planner::new();
        let second = Planner::new();
        assert_ne!(first.instance, second.instance);
    }
}
