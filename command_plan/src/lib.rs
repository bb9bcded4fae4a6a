// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `command_plan`: a typed command planner that compiles to fixed-width instruction
//! records.
//!
//! A [`Planner`](planner::Planner) collects validated [`Command`](command::Command)s,
//! possibly across nested subplan scopes, and [`plan`](planner::Planner::plan) turns
//! the whole tree into a byte-exact program: one 8-byte record per command plus an
//! initial state array whose slots hold the literals, intermediate values, and
//! embedded subplans the program touches. The byte-level format is specified in
//! `docs/format.md`.
//!
//! ## Example
//!
//! ```
//! extern crate alloc;
//!
//! use alloc::vec;
//!
//! use command_plan::abi::Address;
//! use command_plan::command::Command;
//! use command_plan::planner::Planner;
//! use command_plan::tag::CommandTag;
//!
//! let payer = Address([0xEE; 20]);
//! let payee = Address([0xFF; 20]);
//!
//! let mut planner = Planner::new();
//! let balance = planner
//!     .add(Command::new(CommandTag::Balance, vec![payer.into()])?)?
//!     .expect("balance declares an output");
//! let enough = planner
//!     .add(Command::new(CommandTag::Gte, vec![balance.into(), 55_u64.into()])?)?
//!     .expect("gte declares an output");
//! planner.add(Command::new(CommandTag::Assert, vec![enough.into()])?)?;
//! planner.add(Command::new(
//!     CommandTag::Transfer,
//!     vec![payer.into(), payee.into(), 55_u64.into()],
//! )?)?;
//!
//! let plan = planner.plan().unwrap();
//! assert_eq!(plan.record_count(), 4);
//! assert_eq!(plan.state().len(), 4);
//! assert_eq!(
//!     &plan.commands()[24..],
//!     [0x01, 0x00, 0x02, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]
//! );
//! # Ok::<(), command_plan::command::CommandError>(())
//! ```

#![no_std]

extern crate alloc;

pub mod abi;
pub mod command;
pub mod disasm;
pub mod kind;
pub mod plan;
pub mod planner;
pub mod record;
pub mod tag;
pub mod value;
pub(crate) mod visibility;
