// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small runnable `command_plan` example.
//!
//! Shows:
//! - Building a guarded settlement batch out of typed commands
//! - Wrapping a risky sweep in a revert-contained subplan
//! - The binding rules a planner enforces at plan time

use command_plan::abi::Address;
use command_plan::command::Command;
use command_plan::disasm::disassemble;
use command_plan::plan::PlanError;
use command_plan::planner::Planner;
use command_plan::tag::CommandTag;
use command_plan::value::ReturnValue;

const PAYER: Address = Address([0xEE; 20]);
const ALICE: Address = Address([0xA1; 20]);
const BOB: Address = Address([0xB0; 20]);
const TREASURY: Address = Address([0x77; 20]);

fn transfer(from: Address, to: Address, amount: u64) -> Command {
    Command::new(
        CommandTag::Transfer,
        vec![from.into(), to.into(), amount.into()],
    )
    .unwrap()
}

fn balance(account: Address) -> Command {
    Command::new(CommandTag::Balance, vec![account.into()]).unwrap()
}

fn emit(message: &str) -> Command {
    Command::new(CommandTag::Emit, vec![message.into()]).unwrap()
}

fn main() -> Result<(), PlanError> {
    // A settlement batch: check the payer can cover the total, then pay out.
    println!("🟦 settlement batch");
    let mut planner = Planner::new();
    let bal = planner.add(balance(PAYER)).unwrap().unwrap();

    // assert balance(payer) >= 250
    let funded = planner
        .add(Command::new(CommandTag::Gte, vec![bal.into(), 250_u64.into()]).unwrap())
        .unwrap()
        .unwrap();
    planner
        .add(Command::new(CommandTag::Assert, vec![funded.into()]).unwrap())
        .unwrap();

    planner.add(transfer(PAYER, ALICE, 100)).unwrap();
    planner.add(transfer(PAYER, BOB, 150)).unwrap();
    planner.add(emit("settled")).unwrap();

    let plan = planner.plan()?;
    println!("🟩 commands: {}", plan.commands_hex());
    println!();
    println!("{}", disassemble(&plan).unwrap());

    // A risky sweep, contained: if anything inside the subplan reverts, the
    // outer program keeps going.
    println!();
    println!("🟦 revert-contained sweep");
    let mut planner = Planner::new();
    let sweep = planner.subplanner();
    planner
        .add_to(
            sweep,
            Command::new(
                CommandTag::RawCall,
                vec![TREASURY.into(), b"sweep()".as_slice().into()],
            )
            .unwrap(),
        )
        .unwrap();
    planner.add_to(sweep, transfer(TREASURY, PAYER, 25)).unwrap();

    let guarded = Command::new(
        CommandTag::SubplanDiscard,
        vec![planner.subplan_value(sweep), planner.state_value()],
    )
    .unwrap()
    .allow_revert()
    .unwrap();
    planner.add(guarded).unwrap();
    planner.add(emit("sweep submitted")).unwrap();

    let plan = planner.plan()?;
    println!("{}", disassemble(&plan).unwrap());

    // Discarding a subplan seals everything bound inside it. Consuming one of
    // those returns afterwards is a plan-time error, not a bad program.
    println!();
    println!("🟦 discarded subplans seal their returns");
    let mut planner = Planner::new();
    let scope = planner.subplanner();
    let inner: ReturnValue = planner.add_to(scope, balance(PAYER)).unwrap().unwrap();
    planner
        .add_subplan(CommandTag::SubplanDiscard, scope)
        .unwrap();
    planner
        .add(Command::new(CommandTag::Add, vec![inner.into(), 1_u64.into()]).unwrap())
        .unwrap();

    match planner.plan() {
        Err(err) => println!("🟧 rejected as expected: {err}"),
        Ok(_) => println!("unexpected: the plan was accepted"),
    }

    Ok(())
}
