//! Merge mode: exact-target reconciliation in both directions.

use finforge_core::{
    DataStore, FieldSynthesizer, GenConfig, LoadEngine, LoadMode, TargetShape,
};

fn engine(seed: u64) -> LoadEngine<FieldSynthesizer> {
    let store = DataStore::in_memory().unwrap();
    store.migrate().unwrap();
    LoadEngine::new(store, FieldSynthesizer::new(seed, GenConfig::default()))
}

fn assert_exact_shape(engine: &LoadEngine<FieldSynthesizer>, target: &TargetShape) {
    let snapshot = engine.store().snapshot().unwrap();
    assert_eq!(
        snapshot.first_deviation_from(target),
        None,
        "store deviates from {target:?}"
    );
}

#[test]
fn merge_into_empty_store_builds_full_complement() {
    let mut engine = engine(10);
    let target = TargetShape::new(4, 3, 2);
    engine.run(LoadMode::Merge, target).unwrap();
    assert_exact_shape(&engine, &target);
}

#[test]
fn merge_shrinks_every_tier_to_exact_target() {
    let mut engine = engine(11);
    engine.run(LoadMode::Insert, TargetShape::new(5, 4, 6)).unwrap();

    let target = TargetShape::new(3, 2, 2);
    let report = engine.run(LoadMode::Merge, target).unwrap();
    assert_exact_shape(&engine, &target);
    assert_eq!(report.deleted.customers, 2);
    // The two deleted customers cascade their 4 accounts each; the
    // three survivors each shed 2 of 4.
    assert_eq!(report.deleted.accounts, 2 * 4 + 3 * 2);
}

#[test]
fn merge_grows_existing_customers_in_place() {
    let mut engine = engine(12);
    engine.run(LoadMode::Insert, TargetShape::new(3, 1, 1)).unwrap();
    let original = engine.store().customer_ids().unwrap();

    let target = TargetShape::new(3, 3, 4);
    engine.run(LoadMode::Merge, target).unwrap();
    assert_exact_shape(&engine, &target);
    assert_eq!(
        engine.store().customer_ids().unwrap(),
        original,
        "no customer should be created or destroyed"
    );
}

#[test]
fn merge_on_matching_shape_changes_nothing() {
    let mut engine = engine(13);
    let target = TargetShape::new(3, 2, 2);
    engine.run(LoadMode::Insert, target).unwrap();
    let before = engine.store().snapshot().unwrap();

    let report = engine.run(LoadMode::Merge, target).unwrap();
    assert_eq!(report.created.transactions, 0);
    assert_eq!(report.deleted.transactions, 0);
    assert_eq!(engine.store().snapshot().unwrap(), before);
}

/// The documented shrink selection rule: most-recently-created
/// entities are deleted first, so the oldest seed data survives.
#[test]
fn merge_shrink_preserves_oldest_customers() {
    let mut engine = engine(14);
    // Three separate inserts give a known creation order.
    for _ in 0..3 {
        engine.run(LoadMode::Insert, TargetShape::new(2, 0, 0)).unwrap();
    }
    let in_creation_order = engine.store().customer_ids().unwrap();
    assert_eq!(in_creation_order.len(), 6);

    engine.run(LoadMode::Merge, TargetShape::new(4, 0, 0)).unwrap();
    assert_eq!(
        engine.store().customer_ids().unwrap(),
        in_creation_order[..4].to_vec(),
        "the four oldest customers must survive, in order"
    );
}

#[test]
fn merge_shrink_preserves_oldest_transactions_per_account() {
    let mut engine = engine(15);
    engine.run(LoadMode::Insert, TargetShape::new(1, 1, 5)).unwrap();
    let before = engine.store().transaction_ids().unwrap();

    engine.run(LoadMode::Merge, TargetShape::new(1, 1, 2)).unwrap();
    assert_eq!(
        engine.store().transaction_ids().unwrap(),
        before[..2].to_vec()
    );
}

#[test]
fn merge_to_zero_customers_empties_the_store() {
    let mut engine = engine(16);
    engine.run(LoadMode::Insert, TargetShape::new(3, 2, 2)).unwrap();
    engine.run(LoadMode::Merge, TargetShape::new(0, 0, 0)).unwrap();

    let counts = engine.store().counts().unwrap();
    assert_eq!(counts.customers, 0);
    assert_eq!(counts.accounts, 0);
    assert_eq!(counts.transactions, 0);
}

#[test]
fn merge_handles_uneven_starting_shape() {
    let mut engine = engine(17);
    // Build an uneven store: two inserts with different complements.
    engine.run(LoadMode::Insert, TargetShape::new(2, 1, 3)).unwrap();
    engine.run(LoadMode::Insert, TargetShape::new(1, 4, 1)).unwrap();

    let target = TargetShape::new(3, 2, 2);
    engine.run(LoadMode::Merge, target).unwrap();
    assert_exact_shape(&engine, &target);
}
