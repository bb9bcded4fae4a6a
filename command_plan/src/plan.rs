// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot allocation and record encoding.
//!
//! Turns a planner and its expiry maps into the final [`Plan`]: one fixed-width
//! record per command plus the initial state array. The state is prepopulated with
//! every distinct literal in first-encounter order; slots whose contents expire are
//! returned to a LIFO free pool and handed out again for later outputs. The pool
//! discipline is part of the byte-exact output contract, not an internal detail.
//!
//! Nested scopes encode inline: a subplan command's records are produced first,
//! wrapped as one dynamic slot (length word, raw records, zero padding), and the
//! slot is appended to the state. One allocation context threads through the whole
//! scope tree, so nested commands draw from and feed the same pool.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use hashbrown::HashMap;

use crate::abi::{self, WORD_BYTES};
use crate::planner::{Planner, PlannerId};
use crate::record::{ARG_SLOTS, MAX_SLOTS, RECORD_BYTES, Record, SLOT_NONE, SLOT_STATE};
use crate::tag::{CommandTag, TagClass};
use crate::value::Value;
use crate::visibility::Preplan;

/// A planned program: instruction bytes plus the initial state array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    commands: Vec<u8>,
    state: Vec<Vec<u8>>,
}

impl Plan {
    /// The encoded instruction stream, [`RECORD_BYTES`] per command.
    #[must_use]
    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    /// Number of records in the root stream.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.commands.len() / RECORD_BYTES
    }

    /// The initial state array, one byte string per slot.
    #[must_use]
    pub fn state(&self) -> &[Vec<u8>] {
        &self.state
    }

    /// Hex rendering of the instruction stream.
    #[must_use]
    pub fn commands_hex(&self) -> String {
        abi::hex(&self.commands)
    }

    /// Hex rendering of each state slot.
    #[must_use]
    pub fn state_hex(&self) -> Vec<String> {
        self.state.iter().map(|slot| abi::hex(slot)).collect()
    }
}

/// Errors when planning a command program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// A return value used before, or outside the scope of, its producer.
    ReturnNotVisible {
        /// Tag of the producing command.
        tag: CommandTag,
    },
    /// A scope that embeds itself, directly or through deeper subplans.
    SelfContainment {
        /// The repeated scope.
        scope: PlannerId,
    },
    /// The plan needs more state slots than slot numbers exist.
    SlotSpaceExhausted,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReturnNotVisible { tag } => {
                write!(f, "return value from '{tag}' is not visible here")
            }
            Self::SelfContainment { scope } => {
                write!(f, "subplan scope {} contains itself", scope.0)
            }
            Self::SlotSpaceExhausted => write!(
                f,
                "slot space exhausted: a plan can address at most {MAX_SLOTS} state slots"
            ),
        }
    }
}

impl core::error::Error for PlanError {}

/// Encodes `planner`'s root scope using the `preplan` expiry maps.
pub(crate) fn encode_plan(planner: &Planner, preplan: &Preplan) -> Result<Plan, PlanError> {
    let mut alloc = AllocState::new(planner.command_count());
    for literal in &preplan.literals {
        let slot = alloc.append(literal.bytes.clone())?;
        alloc.literal_slots.insert(literal.bytes.as_slice(), slot);
        alloc.expiries[literal.expiry.index()].push(slot);
    }
    let commands = encode_scope(planner, Planner::ROOT, preplan, &mut alloc)?;
    Ok(Plan {
        commands,
        state: alloc.state,
    })
}

/// Allocation context shared by every scope of one plan.
struct AllocState<'a> {
    state: Vec<Vec<u8>>,
    /// Freed slot numbers, most recently freed last.
    free: Vec<u8>,
    /// Slot holding each distinct literal, keyed by encoded bytes.
    literal_slots: HashMap<&'a [u8], u8>,
    /// Slot bound to each command's return value, dense by command index.
    return_slots: Vec<Option<u8>>,
    /// Slots to release when the indexed command executes, in scheduling order.
    expiries: Vec<Vec<u8>>,
}

impl AllocState<'_> {
    fn new(command_count: usize) -> Self {
        Self {
            state: Vec::new(),
            free: Vec::new(),
            literal_slots: HashMap::new(),
            return_slots: vec![None; command_count],
            expiries: vec![Vec::new(); command_count],
        }
    }

    /// Appends a new slot holding `contents`, ignoring the free pool.
    fn append(&mut self, contents: Vec<u8>) -> Result<u8, PlanError> {
        if self.state.len() >= MAX_SLOTS {
            return Err(PlanError::SlotSpaceExhausted);
        }
        let slot = u8::try_from(self.state.len()).unwrap_or(SLOT_NONE);
        self.state.push(contents);
        Ok(slot)
    }

    /// Pops the most recently freed slot, or appends an empty one. Reused
    /// slots keep their stale contents.
    fn allocate(&mut self) -> Result<u8, PlanError> {
        match self.free.pop() {
            Some(slot) => Ok(slot),
            None => self.append(Vec::new()),
        }
    }
}

fn encode_scope(
    planner: &Planner,
    scope: PlannerId,
    preplan: &Preplan,
    alloc: &mut AllocState<'_>,
) -> Result<Vec<u8>, PlanError> {
    let ids = planner.scope_commands(scope);
    let mut out = Vec::with_capacity(ids.len() * RECORD_BYTES);
    for &id in ids {
        let command = planner.command(id);

        let mut args = [SLOT_NONE; ARG_SLOTS];
        for (position, value) in command.args().iter().enumerate() {
            args[position] = match value {
                Value::Literal(literal) => {
                    // The visibility pass tabled every reachable literal.
                    alloc
                        .literal_slots
                        .get(literal.bytes())
                        .copied()
                        .unwrap_or(SLOT_NONE)
                }
                Value::Return(ret) => {
                    alloc.return_slots[ret.command.index()].unwrap_or(SLOT_NONE)
                }
                Value::State => SLOT_STATE,
                Value::Subplan(subplan) => {
                    let records = encode_scope(planner, subplan.scope, preplan, alloc)?;
                    let slot = alloc.append(subplan_slot(&records))?;
                    alloc.expiries[id.index()].push(slot);
                    slot
                }
            };
        }

        // Release everything expiring here before taking the output slot, so
        // an output may land in a slot this command just read.
        let freed = mem::take(&mut alloc.expiries[id.index()]);
        alloc.free.extend(freed);

        let output = if let Some(expiry) = preplan.return_expiry[id.index()] {
            let slot = alloc.allocate()?;
            alloc.return_slots[id.index()] = Some(slot);
            alloc.expiries[expiry.index()].push(slot);
            slot
        } else if command.tag().output().is_some() && command.tag().class() != TagClass::Normal {
            SLOT_STATE
        } else {
            SLOT_NONE
        };

        let record = Record {
            tag: command.tag(),
            allow_revert: command.allows_revert(),
            args,
            output,
        };
        out.extend_from_slice(&record.encode());
    }
    Ok(out)
}

/// Wraps nested records as one dynamic slot: a length word holding the record
/// count, the raw records, zero padding to a word boundary.
fn subplan_slot(records: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD_BYTES + records.len().next_multiple_of(WORD_BYTES));
    out.extend_from_slice(&abi::length_word(records.len() / RECORD_BYTES));
    out.extend_from_slice(records);
    abi::pad_to_word(&mut out);
    out
}
