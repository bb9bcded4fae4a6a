// Copyright 2026 the Command Plan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use command_plan::abi::Address;
use command_plan::command::Command;
use command_plan::disasm::disassemble;
use command_plan::planner::Planner;
use command_plan::tag::CommandTag;
use command_plan::value::ReturnValue;

fn bench_plan(c: &mut Criterion) {
    bench_transfer_batch(c);
    bench_return_chain(c);
    bench_literal_dedup(c);
    bench_nested_subplans(c);
    bench_disassemble(c);
}

fn bench_transfer_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_batch");
    for &transfers in &[10_u32, 50, 200, 1000] {
        let p = build_transfer_batch(transfers, 16);
        group.bench_with_input(BenchmarkId::from_parameter(transfers), &p, |b, p| {
            b.iter(|| {
                let plan = p.plan().unwrap();
                black_box(plan);
            });
        });
    }
    group.finish();
}

fn bench_return_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("return_chain");
    for &adds in &[10_u32, 50, 200, 1000] {
        let p = build_return_chain(adds);
        group.bench_with_input(BenchmarkId::from_parameter(adds), &p, |b, p| {
            b.iter(|| {
                let plan = p.plan().unwrap();
                black_box(plan);
            });
        });
    }
    group.finish();
}

fn bench_literal_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal_dedup");
    for &pool in &[4_u32, 16, 64] {
        let p = build_transfer_batch(200, pool);
        group.bench_with_input(BenchmarkId::from_parameter(pool), &p, |b, p| {
            b.iter(|| {
                let plan = p.plan().unwrap();
                black_box(plan);
            });
        });
    }
    group.finish();
}

fn bench_nested_subplans(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_subplans");
    for &depth in &[2_u32, 8, 32] {
        let p = build_nested_subplans(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &p, |b, p| {
            b.iter(|| {
                let plan = p.plan().unwrap();
                black_box(plan);
            });
        });
    }
    group.finish();
}

fn bench_disassemble(c: &mut Criterion) {
    let plan = build_transfer_batch(200, 16).plan().unwrap();

    c.bench_function("disassemble_transfer_batch_200", |b| {
        b.iter(|| {
            let text = disassemble(&plan).unwrap().to_string();
            black_box(text);
        });
    });
}

fn transfer(from: u8, to: u8, amount: u64) -> Command {
    Command::new(
        CommandTag::Transfer,
        vec![
            Address([from; 20]).into(),
            Address([to; 20]).into(),
            amount.into(),
        ],
    )
    .unwrap()
}

fn balance(byte: u8) -> Command {
    Command::new(CommandTag::Balance, vec![Address([byte; 20]).into()]).unwrap()
}

fn add(ret: ReturnValue, amount: u64) -> Command {
    Command::new(CommandTag::Add, vec![ret.into(), amount.into()]).unwrap()
}

/// Cycles the parties over `pool` addresses so the distinct literal count stays
/// well under the slot cap while the command count grows.
fn build_transfer_batch(transfers: u32, pool: u32) -> Planner {
    let mut planner = Planner::new();
    for i in 0..transfers {
        let from = u8::try_from(i % pool).unwrap();
        let to = u8::try_from((i + 1) % pool).unwrap();
        let amount = u64::from(i % 8 + 1);
        planner.add(transfer(from, to, amount)).unwrap();
    }
    planner
}

fn build_return_chain(adds: u32) -> Planner {
    let mut planner = Planner::new();
    let mut ret = planner.add(balance(0xAA)).unwrap().unwrap();
    for _ in 0..adds {
        ret = planner.add(add(ret, 1)).unwrap().unwrap();
    }
    planner
}

/// A linear chain of scopes, each embedding the next, with one transfer at the
/// innermost level.
fn build_nested_subplans(depth: u32) -> Planner {
    let mut planner = Planner::new();
    let scopes: Vec<_> = (0..depth).map(|_| planner.subplanner()).collect();
    planner
        .add_to(*scopes.last().unwrap(), transfer(0xAA, 0xBB, 5))
        .unwrap();
    for pair in scopes.windows(2) {
        let embed = Command::new(
            CommandTag::SubplanDiscard,
            vec![planner.subplan_value(pair[1]), planner.state_value()],
        )
        .unwrap();
        planner.add_to(pair[0], embed).unwrap();
    }
    planner
        .add_subplan(CommandTag::SubplanDiscard, scopes[0])
        .unwrap();
    planner
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(std::time::Duration::from_millis(300))
        .measurement_time(std::time::Duration::from_millis(1200))
        .sample_size(60);
    targets = bench_plan
}
criterion_main!(benches);
