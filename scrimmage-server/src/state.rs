//! Server state and round persistence
//!
//! Generated rounds are persisted one record per round. The bundled store
//! keeps them in memory; anything durable plugs in through `RoundStore`.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use scrimmage_core::Round;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// One persisted round of an event's schedule
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub event_id: String,
    /// Seed of the generation that produced this round
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    pub round: Round,
}

/// Persistence for generated rounds
pub trait RoundStore: Send + Sync {
    /// Remove every round stored for `event_id`, returning how many went
    fn delete_rounds(&self, event_id: &str) -> anyhow::Result<usize>;

    fn store_round(&self, record: RoundRecord) -> anyhow::Result<()>;

    /// Rounds for `event_id` in round order
    fn load_rounds(&self, event_id: &str) -> anyhow::Result<Vec<RoundRecord>>;

    /// Replace an event's rounds with `records`
    fn replace_rounds(&self, event_id: &str, records: Vec<RoundRecord>) -> anyhow::Result<()> {
        let removed = self.delete_rounds(event_id)?;
        if removed > 0 {
            tracing::debug!("Removed {} stale rounds for event {}", removed, event_id);
        }
        for record in records {
            self.store_round(record)?;
        }
        Ok(())
    }
}

/// `RoundStore` backed by a map
#[derive(Default)]
pub struct InMemoryRoundStore {
    events: RwLock<HashMap<String, Vec<RoundRecord>>>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("round store lock poisoned")
}

impl RoundStore for InMemoryRoundStore {
    fn delete_rounds(&self, event_id: &str) -> anyhow::Result<usize> {
        let mut events = self.events.write().map_err(poisoned)?;
        Ok(events.remove(event_id).map_or(0, |rounds| rounds.len()))
    }

    fn store_round(&self, record: RoundRecord) -> anyhow::Result<()> {
        let mut events = self.events.write().map_err(poisoned)?;
        let rounds = events.entry(record.event_id.clone()).or_default();
        rounds.retain(|r| r.round.round_number != record.round.round_number);
        rounds.push(record);
        rounds.sort_by_key(|r| r.round.round_number);
        Ok(())
    }

    fn load_rounds(&self, event_id: &str) -> anyhow::Result<Vec<RoundRecord>> {
        let events = self.events.read().map_err(poisoned)?;
        Ok(events.get(event_id).cloned().unwrap_or_default())
    }

    /// Swaps the whole schedule under one write lock, so readers and other
    /// writers never see a mix of two generations
    fn replace_rounds(&self, event_id: &str, mut records: Vec<RoundRecord>) -> anyhow::Result<()> {
        records.sort_by_key(|r| r.round.round_number);

        let mut events = self.events.write().map_err(poisoned)?;
        if let Some(stale) = events.insert(event_id.to_string(), records) {
            tracing::debug!("Replaced {} stale rounds for event {}", stale.len(), event_id);
        }
        Ok(())
    }
}

/// Server-wide shared state
pub struct ServerState {
    pub store: Arc<dyn RoundStore>,
    pub generation_timeout: Duration,
}

impl ServerState {
    pub fn new(generation_timeout: Duration) -> Self {
        Self::with_store(Arc::new(InMemoryRoundStore::new()), generation_timeout)
    }

    pub fn with_store(store: Arc<dyn RoundStore>, generation_timeout: Duration) -> Self {
        Self {
            store,
            generation_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_id: &str, round_number: usize, seed: u64) -> RoundRecord {
        RoundRecord {
            event_id: event_id.to_string(),
            seed,
            generated_at: Utc::now(),
            round: Round {
                round_number,
                matchups: Vec::new(),
                sitting_out: Vec::new(),
            },
        }
    }

    #[test]
    fn test_store_and_load_in_round_order() {
        let store = InMemoryRoundStore::new();
        store.store_round(record("e1", 2, 7)).unwrap();
        store.store_round(record("e1", 1, 7)).unwrap();
        store.store_round(record("e2", 1, 8)).unwrap();

        let rounds = store.load_rounds("e1").unwrap();
        let numbers: Vec<usize> = rounds.iter().map(|r| r.round.round_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(store.load_rounds("missing").unwrap().is_empty());
    }

    #[test]
    fn test_replace_drops_previous_schedule() {
        let store = InMemoryRoundStore::new();
        for n in 1..=3 {
            store.store_round(record("e1", n, 1)).unwrap();
        }

        store
            .replace_rounds("e1", vec![record("e1", 1, 2), record("e1", 2, 2)])
            .unwrap();

        let rounds = store.load_rounds("e1").unwrap();
        assert_eq!(rounds.len(), 2);
        assert!(rounds.iter().all(|r| r.seed == 2));
    }

    #[test]
    fn test_concurrent_replaces_never_mix_generations() {
        let store = InMemoryRoundStore::new();

        std::thread::scope(|scope| {
            for seed in 0..8u64 {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..50 {
                        let records = (1..=4).map(|n| record("e1", n, seed)).collect();
                        store.replace_rounds("e1", records).unwrap();
                    }
                });
            }

            let store = &store;
            scope.spawn(move || {
                for _ in 0..200 {
                    let rounds = store.load_rounds("e1").unwrap();
                    if let Some(first) = rounds.first() {
                        assert_eq!(rounds.len(), 4);
                        assert!(rounds.iter().all(|r| r.seed == first.seed));
                    }
                }
            });
        });

        let rounds = store.load_rounds("e1").unwrap();
        let numbers: Vec<usize> = rounds.iter().map(|r| r.round.round_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(rounds.iter().all(|r| r.seed == rounds[0].seed));
    }

    #[test]
    fn test_delete_counts_removed_rounds() {
        let store = InMemoryRoundStore::new();
        store.store_round(record("e1", 1, 1)).unwrap();
        store.store_round(record("e1", 2, 1)).unwrap();

        assert_eq!(store.delete_rounds("e1").unwrap(), 2);
        assert_eq!(store.delete_rounds("e1").unwrap(), 0);
    }
}
