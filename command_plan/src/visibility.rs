// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility and liveness analysis.
//!
//! A single forward pass over the reachable scope tree checks that every return
//! argument names a command already visible at its point of use, detects scopes that
//! embed themselves, and computes two expiry maps: the last consumer of each
//! command's return value and the last consumer of each distinct literal. The slot
//! allocator in [`crate::plan`] drives slot reuse from those maps, so the visit
//! order here and the encode order there must stay identical.
//!
//! Visibility follows the state flow. A subplan command that replaces the state
//! shares the caller's visible set, so bindings made inside it remain referenceable
//! afterwards. A subplan command without an output runs against a copy: its
//! bindings are sealed when the scope ends.

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

use crate::plan::PlanError;
use crate::planner::{CommandId, Planner, PlannerId};
use crate::value::Value;

/// Expiry maps computed by the visibility pass.
#[derive(Debug)]
pub(crate) struct Preplan {
    /// Last consumer of each command's return value, dense by command index.
    /// `None` when the command has no output or nothing consumes it.
    pub(crate) return_expiry: Vec<Option<CommandId>>,
    /// Distinct literals in first-encounter order.
    pub(crate) literals: Vec<LiteralUse>,
}

/// One distinct literal and the last command that consumes it.
#[derive(Debug)]
pub(crate) struct LiteralUse {
    /// Encoded slot contents; also the dedup key.
    pub(crate) bytes: Vec<u8>,
    /// Last consumer in visit order.
    pub(crate) expiry: CommandId,
}

/// Runs the visibility pass from `planner`'s root scope.
pub(crate) fn preplan(planner: &Planner) -> Result<Preplan, PlanError> {
    let mut pass = Pass {
        planner,
        return_expiry: vec![None; planner.command_count()],
        literal_index: HashMap::new(),
        literals: Vec::new(),
        path: HashSet::new(),
    };
    let mut visited = HashSet::new();
    pass.scope(Planner::ROOT, &mut visited)?;
    Ok(Preplan {
        return_expiry: pass.return_expiry,
        literals: pass.literals,
    })
}

struct Pass<'a> {
    planner: &'a Planner,
    return_expiry: Vec<Option<CommandId>>,
    /// Encoded literal bytes to index into `literals`.
    literal_index: HashMap<Vec<u8>, usize>,
    literals: Vec<LiteralUse>,
    /// Scopes on the current traversal path; a repeat is self-containment.
    path: HashSet<PlannerId>,
}

impl Pass<'_> {
    fn scope(
        &mut self,
        scope: PlannerId,
        visited: &mut HashSet<CommandId>,
    ) -> Result<(), PlanError> {
        if !self.path.insert(scope) {
            return Err(PlanError::SelfContainment { scope });
        }
        for &id in self.planner.scope_commands(scope) {
            let command = self.planner.command(id);
            if let Some(nested) = command.subplan_scope() {
                if command.tag().output().is_some() {
                    self.scope(nested, visited)?;
                } else {
                    let mut sealed = visited.clone();
                    self.scope(nested, &mut sealed)?;
                }
            }
            for value in command.args() {
                self.argument(value, id, visited)?;
            }
            visited.insert(id);
        }
        self.path.remove(&scope);
        Ok(())
    }

    fn argument(
        &mut self,
        value: &Value,
        consumer: CommandId,
        visited: &HashSet<CommandId>,
    ) -> Result<(), PlanError> {
        match value {
            Value::Return(ret) => {
                if !visited.contains(&ret.command) {
                    return Err(PlanError::ReturnNotVisible {
                        tag: self.planner.command(ret.command).tag(),
                    });
                }
                self.return_expiry[ret.command.index()] = Some(consumer);
            }
            Value::Literal(literal) => match self.literal_index.get(literal.bytes()) {
                Some(&index) => self.literals[index].expiry = consumer,
                None => {
                    self.literal_index
                        .insert(literal.bytes().to_vec(), self.literals.len());
                    self.literals.push(LiteralUse {
                        bytes: literal.bytes().to_vec(),
                        expiry: consumer,
                    });
                }
            },
            // The state sentinel needs no slot; nested scopes are walked above.
            Value::State | Value::Subplan(_) => {}
        }
        Ok(())
    }
}
