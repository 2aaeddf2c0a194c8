// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for the watcher protocol
//!
//! Three watchers run as tasks against one table while the test plays the
//! agent and the smokers through the public API.

use smk_core::{
    Actor, Ingredient, MemoryRecorder, Signal, SmokerId, Table, Watcher, WatcherReport,
    WatcherStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const DEADLINE: Duration = Duration::from_secs(5);

fn spawn_watchers(table: &Arc<Table>) -> Vec<JoinHandle<WatcherReport>> {
    Ingredient::ALL
        .into_iter()
        .map(|kind| {
            let watcher = Watcher::new(kind, Arc::clone(table));
            tokio::spawn(async move { watcher.run().await.unwrap() })
        })
        .collect()
}

/// Put a pair on the table the way the agent does
async fn offer(table: &Table, first: Ingredient, second: Ingredient) {
    let mut cs = table.enter().await.unwrap();
    cs.put(first);
    cs.put(second);
    cs.leave();
    table.raise(Signal::IngredientReady(first)).unwrap();
    table.raise(Signal::IngredientReady(second)).unwrap();
}

/// Wait as `smoker` for its proceed signal, then take its pair
async fn collect(table: &Table, smoker: SmokerId) {
    tokio::time::timeout(DEADLINE, table.wait(Signal::Proceed(smoker)))
        .await
        .expect("smoker never informed")
        .unwrap();
    let mut cs = table.enter().await.unwrap();
    let (first, second) = smoker.needs();
    cs.take(first).unwrap();
    cs.take(second).unwrap();
}

async fn close(table: &Table) {
    let mut cs = table.enter().await.unwrap();
    assert!(cs.close());
    cs.leave();
    for kind in Ingredient::ALL {
        table.raise(Signal::IngredientReady(kind)).unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_pair_wakes_the_smoker_that_needs_it() {
    let recorder = MemoryRecorder::new();
    let table = Arc::new(Table::new(Arc::new(recorder.clone())));
    let watchers = spawn_watchers(&table);

    let rounds = [
        (Ingredient::Tobacco, Ingredient::Paper, Ingredient::Matches),
        (Ingredient::Tobacco, Ingredient::Matches, Ingredient::Paper),
        (Ingredient::Matches, Ingredient::Paper, Ingredient::Tobacco),
        (Ingredient::Paper, Ingredient::Tobacco, Ingredient::Matches),
    ];
    for (first, second, winner) in rounds {
        offer(&table, first, second).await;
        collect(&table, SmokerId(winner)).await;
    }

    close(&table).await;
    let mut informed = 0;
    let mut units = 0;
    for handle in watchers {
        let report = tokio::time::timeout(DEADLINE, handle).await.unwrap().unwrap();
        informed += report.informed;
        units += report.units;
    }
    assert_eq!(informed, 4);
    assert_eq!(units, 8);

    // Closing forwarded exactly one wake to every smoker
    for id in SmokerId::ALL {
        assert_eq!(table.signals().pending(Signal::Proceed(id)), 1, "{}", id);
    }

    let state = table.snapshot().await;
    assert_eq!(state.available.total(), 0);
    assert_eq!(state.reserved.total(), 0);
    for kind in Ingredient::ALL {
        assert_eq!(state.watcher_status[kind], WatcherStatus::Closing);
        let last = recorder.states_of(Actor::Watcher(kind)).pop().unwrap();
        assert_eq!(last.watcher_status[kind], WatcherStatus::Closing);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn close_with_queued_pairs_informs_each_pair() {
    let table = Arc::new(Table::new(Arc::new(MemoryRecorder::new())));

    // Everything is queued before any watcher runs
    offer(&table, Ingredient::Tobacco, Ingredient::Paper).await;
    offer(&table, Ingredient::Paper, Ingredient::Tobacco).await;
    close(&table).await;
    let watchers = spawn_watchers(&table);

    let mut units = 0;
    let mut informed = 0;
    for handle in watchers {
        let report = tokio::time::timeout(DEADLINE, handle).await.unwrap().unwrap();
        units += report.units;
        informed += report.informed;
    }
    assert_eq!(units, 4);
    assert_eq!(informed, 2);

    // Two pair wakes plus the closing wake from its own watcher
    let signals = table.signals();
    assert_eq!(signals.pending(Signal::Proceed(SmokerId(Ingredient::Matches))), 3);
    assert_eq!(signals.pending(Signal::Proceed(SmokerId(Ingredient::Tobacco))), 1);
    assert_eq!(signals.pending(Signal::Proceed(SmokerId(Ingredient::Paper))), 1);
    for kind in Ingredient::ALL {
        assert_eq!(signals.pending(Signal::IngredientReady(kind)), 0);
    }
    assert_eq!(table.snapshot().await.reserved.total(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn close_with_mixed_pairs_queued_loses_no_unit() {
    let table = Arc::new(Table::new(Arc::new(MemoryRecorder::new())));
    let watchers = spawn_watchers(&table);

    offer(&table, Ingredient::Tobacco, Ingredient::Paper).await;
    offer(&table, Ingredient::Tobacco, Ingredient::Matches).await;
    offer(&table, Ingredient::Matches, Ingredient::Paper).await;
    close(&table).await;

    let mut informed = 0;
    for handle in watchers {
        let report = tokio::time::timeout(DEADLINE, handle).await.unwrap().unwrap();
        assert_eq!(report.units, 2);
        informed += report.informed;
    }

    // Which pairs complete depends on the interleaving, but every unit is
    // either still reserved or part of exactly one committed pair
    let state = table.snapshot().await;
    assert!(state.reservations_consistent());
    assert_eq!(u64::from(state.reserved.total()) + 2 * informed, 6);

    let mut pair_wakes = 0;
    for id in SmokerId::ALL {
        let pending = table.signals().pending(Signal::Proceed(id));
        assert!(pending >= 1, "{} was never released", id);
        pair_wakes += pending as u64 - 1;
    }
    assert_eq!(pair_wakes, informed);
    for kind in Ingredient::ALL {
        assert_eq!(state.watcher_status[kind], WatcherStatus::Closing);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn closing_with_no_rounds_releases_every_smoker() {
    let table = Arc::new(Table::new(Arc::new(MemoryRecorder::new())));
    let watchers = spawn_watchers(&table);

    close(&table).await;
    for handle in watchers {
        let report = tokio::time::timeout(DEADLINE, handle).await.unwrap().unwrap();
        assert_eq!(report, WatcherReport::default());
    }
    for id in SmokerId::ALL {
        tokio::time::timeout(DEADLINE, table.wait(Signal::Proceed(id)))
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn teardown_stops_blocked_watchers() {
    let table = Arc::new(Table::new(Arc::new(MemoryRecorder::new())));
    let handles: Vec<_> = Ingredient::ALL
        .into_iter()
        .map(|kind| {
            let watcher = Watcher::new(kind, Arc::clone(&table));
            tokio::spawn(watcher.run())
        })
        .collect();

    // Let the watchers block on their ingredient signals
    tokio::time::sleep(Duration::from_millis(20)).await;
    table.tear_down();

    for handle in handles {
        let result = tokio::time::timeout(DEADLINE, handle).await.unwrap().unwrap();
        assert!(result.is_err());
    }
}
