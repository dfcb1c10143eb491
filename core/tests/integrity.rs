//! Cross-cutting guarantees: referential integrity, identity
//! uniqueness, atomic rollback, and the error taxonomy.

use finforge_core::{
    error::LoadResult,
    model::{Account, Customer, Transaction},
    synth::Synthesize,
    DataStore, FieldSynthesizer, GenConfig, LoadEngine, LoadError, LoadMode, TargetShape,
};
use std::collections::HashSet;

fn fresh_store() -> DataStore {
    let store = DataStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn engine(seed: u64) -> LoadEngine<FieldSynthesizer> {
    LoadEngine::new(
        fresh_store(),
        FieldSynthesizer::new(seed, GenConfig::default()),
    )
}

/// Wraps the real synthesizer and fails on the nth transaction draw.
/// Exercises mid-plan rollback without touching the store code.
struct FailingSynth {
    inner: FieldSynthesizer,
    transactions_left: u32,
}

impl FailingSynth {
    fn failing_after(transactions: u32, seed: u64) -> Self {
        Self {
            inner: FieldSynthesizer::new(seed, GenConfig::default()),
            transactions_left: transactions,
        }
    }
}

impl Synthesize for FailingSynth {
    fn customer(&mut self) -> LoadResult<Customer> {
        self.inner.customer()
    }

    fn account(&mut self, customer_id: &String) -> LoadResult<Account> {
        self.inner.account(customer_id)
    }

    fn transaction(&mut self, account_id: &String) -> LoadResult<Transaction> {
        if self.transactions_left == 0 {
            return Err(LoadError::Synthesis {
                entity: "transaction",
                reason: "injected failure".to_string(),
            });
        }
        self.transactions_left -= 1;
        self.inner.transaction(account_id)
    }
}

/// Returns an account carrying the wrong parent, violating the
/// synthesizer contract the engine enforces.
struct MisparentingSynth {
    inner: FieldSynthesizer,
}

impl Synthesize for MisparentingSynth {
    fn customer(&mut self) -> LoadResult<Customer> {
        self.inner.customer()
    }

    fn account(&mut self, _customer_id: &String) -> LoadResult<Account> {
        self.inner.account(&"someone-else".to_string())
    }

    fn transaction(&mut self, account_id: &String) -> LoadResult<Transaction> {
        self.inner.transaction(account_id)
    }
}

#[test]
fn referential_integrity_holds_after_every_mode() {
    let mut engine = engine(20);
    let runs = [
        (LoadMode::Insert, TargetShape::new(4, 2, 3)),
        (LoadMode::Merge, TargetShape::new(2, 3, 1)),
        (LoadMode::Insert, TargetShape::new(1, 1, 5)),
        (LoadMode::Merge, TargetShape::new(5, 1, 2)),
        (LoadMode::Replace, TargetShape::new(3, 2, 2)),
    ];
    for (mode, target) in runs {
        engine.run(mode, target).unwrap();
        assert_eq!(engine.store().orphan_account_count().unwrap(), 0);
        assert_eq!(engine.store().orphan_transaction_count().unwrap(), 0);
    }
}

#[test]
fn identities_never_repeat_across_a_run_sequence() {
    let mut engine = engine(21);
    let mut seen: HashSet<String> = HashSet::new();
    let mut live: HashSet<String> = HashSet::new();

    let runs = [
        (LoadMode::Insert, TargetShape::new(3, 2, 2)),
        (LoadMode::Insert, TargetShape::new(3, 2, 2)),
        (LoadMode::Merge, TargetShape::new(8, 3, 1)),
        (LoadMode::Replace, TargetShape::new(4, 1, 1)),
    ];
    for (mode, target) in runs {
        engine.run(mode, target).unwrap();
        let mut current: HashSet<String> = HashSet::new();
        current.extend(engine.store().customer_ids().unwrap());
        current.extend(engine.store().account_ids().unwrap());
        current.extend(engine.store().transaction_ids().unwrap());

        for id in current.difference(&live) {
            assert!(
                seen.insert(id.clone()),
                "identity {id} was reissued after deletion"
            );
        }
        live = current;
    }
}

#[test]
fn no_identity_is_shared_within_a_tier() {
    let mut engine = engine(22);
    engine.run(LoadMode::Insert, TargetShape::new(10, 3, 5)).unwrap();
    engine.run(LoadMode::Insert, TargetShape::new(10, 3, 5)).unwrap();

    let txn_ids = engine.store().transaction_ids().unwrap();
    let unique: HashSet<&String> = txn_ids.iter().collect();
    assert_eq!(unique.len(), txn_ids.len());
}

#[test]
fn synthesis_failure_rolls_back_the_whole_run() {
    // Seed through a reliable synthesizer first.
    let mut engine = engine(23);
    engine.run(LoadMode::Insert, TargetShape::new(2, 1, 2)).unwrap();
    let before = engine.store().snapshot().unwrap();

    // Re-arm with a synthesizer that dies on its third transaction.
    let mut engine = LoadEngine::new(engine.into_store(), FailingSynth::failing_after(2, 23));
    let err = engine
        .run(LoadMode::Insert, TargetShape::new(3, 2, 4))
        .unwrap_err();
    assert!(matches!(err, LoadError::Synthesis { .. }), "got: {err}");

    assert_eq!(
        engine.store().snapshot().unwrap(),
        before,
        "a failed run must leave the store exactly as it was"
    );
}

#[test]
fn failure_during_merge_shrink_rolls_back_deletions_too() {
    let mut engine = engine(24);
    engine.run(LoadMode::Insert, TargetShape::new(4, 2, 3)).unwrap();
    let before = engine.store().snapshot().unwrap();

    // Shrinking customers while growing transactions forces both
    // deletes and creates into one plan; the failure lands mid-create.
    let mut engine = LoadEngine::new(engine.into_store(), FailingSynth::failing_after(1, 24));
    engine
        .run(LoadMode::Merge, TargetShape::new(2, 2, 9))
        .unwrap_err();

    assert_eq!(engine.store().snapshot().unwrap(), before);
}

#[test]
fn misparented_synthesis_is_rejected_and_rolled_back() {
    let mut engine = LoadEngine::new(
        fresh_store(),
        MisparentingSynth {
            inner: FieldSynthesizer::new(25, GenConfig::default()),
        },
    );
    let err = engine
        .run(LoadMode::Insert, TargetShape::new(1, 1, 0))
        .unwrap_err();
    assert!(matches!(err, LoadError::Synthesis { .. }), "got: {err}");
    assert_eq!(engine.store().counts().unwrap().customers, 0);
}

#[test]
fn unreachable_database_path_is_store_unavailable() {
    let err = DataStore::open("/nonexistent-dir/finforge/finance.db").unwrap_err();
    assert!(matches!(err, LoadError::StoreUnavailable(_)), "got: {err}");
}
