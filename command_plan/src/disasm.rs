// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable rendering of planned programs.
//!
//! [`disassemble`] decodes a [`Plan`] back into records and renders them one per
//! line, with argument and output slots named `s0`, `s1`, .. and the sentinels
//! spelled out. Subplan records are followed, best-effort, into the state slot
//! they embed, so nested programs print indented under their command. Slots that
//! do not parse as an embedded program are left alone; the disassembler never
//! fails on them.
//!
//! The rendering is stable and intended for debugging, logs, and golden tests.

use alloc::vec::Vec;
use core::fmt;

use crate::abi::{self, WORD_BYTES};
use crate::plan::Plan;
use crate::record::{DecodeError, RECORD_BYTES, Record, SLOT_NONE, SLOT_STATE, decode_records};
use crate::tag::TagClass;

/// Decodes `plan` into a structured, printable view.
pub fn disassemble(plan: &Plan) -> Result<PlanDisassembly<'_>, DecodeError> {
    let records = decode_records(plan.commands())?;
    Ok(PlanDisassembly {
        plan,
        records: view_records(&records, plan.state()),
    })
}

/// A decoded view of a whole plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanDisassembly<'a> {
    plan: &'a Plan,
    records: Vec<RecordView>,
}

impl<'a> PlanDisassembly<'a> {
    /// The plan this view decodes.
    #[must_use]
    pub fn plan(&self) -> &'a Plan {
        self.plan
    }

    /// Decoded root records, in command order.
    #[must_use]
    pub fn records(&self) -> &[RecordView] {
        &self.records
    }
}

/// One decoded record, plus the program it embeds when it has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordView {
    /// The decoded record.
    pub record: Record,
    /// The embedded program, for subplan-class records whose slot parses.
    pub subplan: Option<SubplanView>,
}

/// An embedded program decoded from a state slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubplanView {
    /// The state slot the program was decoded from.
    pub slot: u8,
    /// The embedded records.
    pub records: Vec<RecordView>,
}

fn view_records(records: &[Record], state: &[Vec<u8>]) -> Vec<RecordView> {
    records
        .iter()
        .map(|&record| RecordView {
            record,
            subplan: decode_subplan(&record, state),
        })
        .collect()
}

fn decode_subplan(record: &Record, state: &[Vec<u8>]) -> Option<SubplanView> {
    if record.tag.class() != TagClass::Subplan {
        return None;
    }
    let slot = record
        .arg_slots()
        .iter()
        .copied()
        .find(|&slot| slot < SLOT_STATE)?;
    let records = parse_embedded(state.get(usize::from(slot))?)?;
    Some(SubplanView {
        slot,
        records: view_records(&records, state),
    })
}

/// Parses a subplan slot: a length word holding the record count, the raw
/// records, zero padding to a word boundary.
fn parse_embedded(slot: &[u8]) -> Option<Vec<Record>> {
    if slot.len() < WORD_BYTES || !slot.len().is_multiple_of(WORD_BYTES) {
        return None;
    }
    let (length, rest) = slot.split_at(WORD_BYTES);
    if length[..WORD_BYTES - 8].iter().any(|&byte| byte != 0) {
        return None;
    }
    let word: [u8; 8] = length[WORD_BYTES - 8..].try_into().ok()?;
    let count = usize::try_from(u64::from_be_bytes(word)).ok()?;
    let bytes = count.checked_mul(RECORD_BYTES)?;
    if rest.len() < bytes || rest.len() - bytes >= WORD_BYTES {
        return None;
    }
    let (records, padding) = rest.split_at(bytes);
    if padding.iter().any(|&byte| byte != 0) {
        return None;
    }
    decode_records(records).ok()
}

impl fmt::Display for PlanDisassembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "plan: {} command(s), {} state slot(s)",
            self.records.len(),
            self.plan.state().len()
        )?;
        fmt_records(f, &self.records, 1)?;
        writeln!(f, "state:")?;
        for (index, slot) in self.plan.state().iter().enumerate() {
            fmt_indent(f, 1)?;
            if slot.is_empty() {
                writeln!(f, "s{index}: (empty)")?;
            } else {
                writeln!(f, "s{index}: {}", abi::hex(slot))?;
            }
        }
        Ok(())
    }
}

fn fmt_records(f: &mut fmt::Formatter<'_>, records: &[RecordView], depth: usize) -> fmt::Result {
    for (index, view) in records.iter().enumerate() {
        fmt_indent(f, depth)?;
        write!(f, "{index:03}: ")?;
        fmt_record(f, &view.record)?;
        writeln!(f)?;
        if let Some(subplan) = &view.subplan {
            fmt_indent(f, depth + 1)?;
            writeln!(f, "; s{}: {} command(s)", subplan.slot, subplan.records.len())?;
            fmt_records(f, &subplan.records, depth + 1)?;
        }
    }
    Ok(())
}

fn fmt_record(f: &mut fmt::Formatter<'_>, record: &Record) -> fmt::Result {
    write!(f, "{} [", record.tag)?;
    for (index, &slot) in record.arg_slots().iter().enumerate() {
        if index != 0 {
            f.write_str(", ")?;
        }
        fmt_slot(f, slot)?;
    }
    f.write_str("] -> ")?;
    fmt_slot(f, record.output)?;
    if record.allow_revert {
        f.write_str(" ; allow_revert")?;
    }
    Ok(())
}

fn fmt_slot(f: &mut fmt::Formatter<'_>, slot: u8) -> fmt::Result {
    match slot {
        SLOT_NONE => f.write_str("none"),
        SLOT_STATE => f.write_str("state"),
        slot => write!(f, "s{slot}"),
    }
}

fn fmt_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("  ")?;
    }
    Ok(())
}
