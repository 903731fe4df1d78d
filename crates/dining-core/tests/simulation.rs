//! End-to-end tests for the simulation driver and the acquisition protocol.
//!
//! These run real threads against real sticks. Timing-sensitive assertions
//! use generous margins so they hold on a loaded machine.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use dining_core::agent::Pacing;
use dining_core::config::SimulationConfig;
use dining_core::runner::run_simulation;
use dining_core::shutdown::StopSignal;
use dining_core::sink::MemorySink;
use dining_core::table::Table;
use dining_types::{
    AgentId, AgentStatus, PhilosopherState, ResourceId, TableSnapshot, TerminationReason,
};

fn config(agents: usize, duration_secs: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.table.agents = agents;
    config.timing.duration_secs = duration_secs;
    config.timing.report_period_ms = 5;
    config
}

/// Held ids must be a prefix of `[left, right]` that matches the state.
fn assert_consistent(status: &AgentStatus, size: usize) {
    let i = status.agent_id.index();
    let left = ResourceId::new(i);
    let right = ResourceId::new((i + 1) % size);
    match status.state {
        PhilosopherState::Thinking => assert!(status.held.is_empty(), "{status:?}"),
        PhilosopherState::Hungry => {
            assert!(
                status.held.is_empty() || status.held == vec![left],
                "{status:?}"
            );
        }
        PhilosopherState::Eating => assert_eq!(status.held, vec![left, right], "{status:?}"),
    }
}

/// No stick may be claimed by two philosophers in one snapshot.
fn assert_exclusive(snapshot: &TableSnapshot) {
    for r in 0..snapshot.len() {
        let holders = snapshot.holders_of(ResourceId::new(r));
        assert!(holders.len() <= 1, "stick {r} claimed by {holders:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_second_run_shows_someone_eating() {
    let mut config = config(5, 1);
    config.table.think_min_ms = 1;
    config.table.think_max_ms = 5;
    config.table.eat_ms = 10;
    let sink = Arc::new(MemorySink::new());

    let result = run_simulation(&config, sink.clone(), std::future::pending())
        .await
        .unwrap();

    assert_eq!(result.reason, TerminationReason::Completed);
    let recorded = sink.recorded();
    assert_eq!(recorded.start.as_ref().map(|s| s.agent_count), Some(5));
    assert!(!recorded.statuses.is_empty());
    assert_eq!(
        u64::try_from(recorded.statuses.len()).unwrap(),
        result.status_records
    );

    let mut saw_eating = false;
    for status in &recorded.statuses {
        assert_eq!(status.snapshot.len(), 5);
        assert_exclusive(&status.snapshot);
        for agent in &status.snapshot.agents {
            assert_consistent(agent, 5);
        }
        for eater in status.snapshot.eating() {
            let i = eater.agent_id.index();
            assert_eq!(
                eater.held,
                vec![ResourceId::new(i), ResourceId::new((i + 1) % 5)]
            );
            saw_eating = true;
        }
    }
    assert!(saw_eating, "no status record showed an eating philosopher");

    let termination = recorded.termination.unwrap();
    assert_eq!(termination.reason, TerminationReason::Completed);
    assert_eq!(termination.reason.as_str(), "completed");
    assert!(termination.elapsed >= Duration::from_secs(1));
    assert_eq!(termination.duration, Duration::from_secs(1));
    assert!(result.stats.total_meals() > 0);
}

/// More seats than tokio's default blocking pool (512 threads).
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_seat_of_a_large_table_takes_part() {
    const SIZE: usize = 600;
    let mut config = config(SIZE, 1);
    config.table.think_min_ms = 1;
    config.table.think_max_ms = 3;
    config.table.eat_ms = 1;
    let sink = Arc::new(MemorySink::new());

    let result = run_simulation(&config, sink.clone(), std::future::pending())
        .await
        .unwrap();

    let recorded = sink.recorded();
    let mut active = vec![false; SIZE];
    for snapshot in recorded
        .statuses
        .iter()
        .map(|s| &s.snapshot)
        .chain(std::iter::once(&result.final_snapshot))
    {
        for agent in &snapshot.agents {
            if agent.state != PhilosopherState::Thinking {
                active[agent.agent_id.index()] = true;
            }
        }
    }
    let idle: Vec<usize> = (0..SIZE)
        .filter(|&i| !active[i] && result.stats.meals[i] == 0)
        .collect();
    assert!(idle.is_empty(), "{} seats never took part, first {:?}", idle.len(), idle.first());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn interrupt_ends_run_early() {
    let config = config(5, 5);
    let sink = Arc::new(MemorySink::new());
    let started = Instant::now();

    let result = run_simulation(
        &config,
        sink.clone(),
        tokio::time::sleep(Duration::from_millis(100)),
    )
    .await
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(result.reason, TerminationReason::Interrupted);
    let termination = sink.recorded().termination.unwrap();
    assert_eq!(termination.reason.as_str(), "interrupted");
    assert!(termination.elapsed >= Duration::from_millis(100));
    assert!(termination.elapsed < Duration::from_secs(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_releases_every_philosopher() {
    // No pauses at all: the table usually locks up well within the window.
    let config = config(5, 1);
    let sink = Arc::new(MemorySink::new());

    let result = run_simulation(&config, sink, std::future::pending())
        .await
        .unwrap();

    assert_eq!(result.stats.detached, 0);
    assert!(!result.stats.reporter_detached);
    assert_eq!(result.stats.meals.len(), 5);
    assert_exclusive(&result.final_snapshot);
    for agent in &result.final_snapshot.agents {
        assert_consistent(agent, 5);
    }
}

#[test]
fn left_first_protocol_reaches_circular_wait() {
    const SIZE: usize = 5;
    let table = Table::new(SIZE);
    let registry = table.registry();
    let everyone_has_left = Arc::new(Barrier::new(SIZE));
    let (ate_tx, ate_rx) = mpsc::channel::<AgentId>();

    let workers: Vec<_> = table
        .seat(Pacing::default())
        .into_iter()
        .map(|p| {
            let barrier = Arc::clone(&everyone_has_left);
            let ate_tx = ate_tx.clone();
            thread::spawn(move || {
                p.think(&StopSignal::new()).unwrap();
                p.become_hungry().unwrap();
                p.take_left().unwrap();
                barrier.wait();
                let right = p.take_right();
                if right.is_ok() {
                    ate_tx.send(p.id()).unwrap();
                }
                right
            })
        })
        .collect();
    drop(ate_tx);

    // Nobody can get a right stick: each is some neighbour's left stick.
    assert!(ate_rx.recv_timeout(Duration::from_millis(300)).is_err());

    let snapshot = registry.snapshot();
    for (i, status) in snapshot.agents.iter().enumerate() {
        assert_eq!(status.state, PhilosopherState::Hungry);
        assert_eq!(status.held, vec![ResourceId::new(i)]);
    }
    assert_eq!(snapshot.eating().count(), 0);
    for (i, stick) in table.sticks().iter().enumerate() {
        assert_eq!(stick.holder(), Some(AgentId::new(i)));
    }

    table.clear();
    for worker in workers {
        let outcome = worker.join().unwrap();
        assert!(outcome.unwrap_err().is_closed());
    }
}

#[test]
fn sequential_cycles_around_the_table() {
    let table = Table::new(3);
    let registry = table.registry();
    let seats = table.seat(Pacing::default());

    for p in &seats {
        p.cycle(&StopSignal::new()).unwrap();
    }

    let snapshot = registry.snapshot();
    assert!(
        snapshot
            .agents
            .iter()
            .all(|a| a.state == PhilosopherState::Thinking && a.held.is_empty())
    );
    assert!(table.sticks().iter().all(|s| s.holder().is_none()));
    assert!(
        seats
            .iter()
            .all(|p| p.meals().load(std::sync::atomic::Ordering::Relaxed) == 1)
    );
}
