//! Reconciler tests against the mock store.

use std::time::Duration;

use tablewright_types::{
    GlobalIndex, KeySchemaElement, Projection, ProvisionedThroughput, StreamSpecification,
    StreamViewType,
};

use super::*;
use crate::{Mutation, ReconcileError, Reconciler, Table};

#[test]
fn test_creates_missing_table() {
    let store = MockStore::new().settling_after(3);
    let reconciler = Reconciler::new(&store, fast_config());

    let report = reconciler.reconcile(&users_schema()).unwrap();

    assert!(report.created);
    assert_eq!(report.table_name, "Users");
    assert_eq!(report.mutations.len(), 1);
    assert!(matches!(report.mutations[0], Mutation::CreateTable(_)));
    assert_eq!(store.mutating_calls(), vec!["create_table Users"]);

    let live = store.live("Users");
    assert_eq!(live.table_status, TableStatus::Active);
    assert_eq!(live.global_secondary_indexes.len(), 1);
    assert!(live.global_secondary_indexes[0].is_active());
}

#[test]
fn test_reconcile_is_idempotent() {
    let store = MockStore::new().settling_after(2);
    let reconciler = Reconciler::new(&store, fast_config());
    let schema = users_schema();

    reconciler.reconcile(&schema).unwrap();
    store.clear_calls();

    let report = reconciler.reconcile(&schema).unwrap();
    assert!(!report.created);
    assert!(report.is_noop());
    assert!(store.mutating_calls().is_empty());
}

#[test]
fn test_created_table_invisible_at_first_keeps_polling() {
    let store = MockStore::new().invisible_after_create(3);
    let reconciler = Reconciler::new(&store, fast_config());

    let report = reconciler.reconcile(&users_schema()).unwrap();
    assert!(report.created);
    assert_eq!(store.live("Users").table_status, TableStatus::Active);
}

#[test]
fn test_throughput_change_applied() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.provisioned_throughput = ProvisionedThroughput::new(1, 1);
    let store = MockStore::new().with_table(live).settling_after(1);

    let report = Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap();

    assert_eq!(
        report.mutations,
        vec![Mutation::UpdateThroughput(ProvisionedThroughput::new(5, 1))]
    );
    assert_eq!(
        store.mutating_calls(),
        vec!["update_table throughput read=5 write=1"]
    );
    assert_eq!(
        store.live("Users").provisioned_throughput,
        ProvisionedThroughput::new(5, 1)
    );
}

#[test]
fn test_changes_applied_in_order() {
    let mut schema = users_schema();
    schema.provisioned_throughput = ProvisionedThroughput::new(20, 10);
    schema.stream_specification = Some(StreamSpecification::enabled(StreamViewType::NewImage));
    schema.global_indexes[0].provisioned_throughput = ProvisionedThroughput::new(7, 7);
    schema.global_indexes.push(GlobalIndex {
        index_name: "ByAge".to_string(),
        key_schema: vec![KeySchemaElement::hash("Age")],
        projection: Projection::keys_only(),
        provisioned_throughput: ProvisionedThroughput::default(),
    });

    let mut live = live_from(&users_schema());
    live.global_secondary_indexes.push(GlobalIndexDescription::new(
        GlobalIndex {
            index_name: "Legacy".to_string(),
            key_schema: vec![KeySchemaElement::hash("Name")],
            projection: Projection::all(),
            provisioned_throughput: ProvisionedThroughput::default(),
        },
        IndexStatus::Active,
    ));
    let store = MockStore::new().with_table(live).settling_after(2);

    let report = Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap();

    assert_eq!(report.mutations.len(), 5);
    assert_eq!(
        store.mutating_calls(),
        vec![
            "update_table throughput read=20 write=10",
            "update_table stream enabled=true",
            "update_table update ByOrg",
            "update_table delete Legacy",
            "update_table create ByAge",
        ]
    );

    let live = store.live("Users");
    let names: Vec<&str> = live
        .global_secondary_indexes
        .iter()
        .map(GlobalIndexDescription::index_name)
        .collect();
    assert_eq!(names, vec!["ByOrg", "ByAge"]);
    assert!(live.global_secondary_indexes.iter().all(|i| i.is_active()));
    assert_eq!(
        live.global_index("ByOrg").unwrap().definition.provisioned_throughput,
        ProvisionedThroughput::new(7, 7)
    );

    // Converged: nothing left to do.
    store.clear_calls();
    let again = Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap();
    assert!(again.is_noop());
    assert!(store.mutating_calls().is_empty());
}

#[test]
fn test_disabled_live_stream_matches_absent_desired_stream() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.stream_specification = Some(StreamSpecification::disabled());
    let store = MockStore::new().with_table(live);

    let report = Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap();
    assert!(report.is_noop());
}

#[test]
fn test_enabled_live_stream_gets_disabled() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.stream_specification = Some(StreamSpecification::enabled(StreamViewType::KeysOnly));
    let store = MockStore::new().with_table(live);

    Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap();
    assert_eq!(
        store.mutating_calls(),
        vec!["update_table stream enabled=false"]
    );
}

#[test]
fn test_times_out_when_table_never_converges() {
    let store = MockStore::new().stuck();
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::from_millis(20));

    let err = Reconciler::new(&store, config)
        .reconcile(&users_schema())
        .unwrap_err();

    match err {
        ReconcileError::ConvergenceTimeout {
            table,
            target,
            state,
            waited,
        } => {
            assert_eq!(table, "Users");
            assert_eq!(target, "table");
            assert_eq!(state, "active");
            assert!(waited >= Duration::from_millis(20));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn test_times_out_when_index_never_converges() {
    let mut schema = users_schema();
    schema.global_indexes[0].provisioned_throughput = ProvisionedThroughput::new(9, 9);
    let store = MockStore::new().with_table(live_from(&users_schema())).stuck();
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::from_millis(10));

    let err = Reconciler::new(&store, config)
        .reconcile(&schema)
        .unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::ConvergenceTimeout { ref target, .. } if target == "index ByOrg"
    ));
}

#[test]
fn test_index_without_reported_status_counts_as_active() {
    let mut schema = users_schema();
    schema.global_indexes[0].provisioned_throughput = ProvisionedThroughput::new(9, 9);
    let store = MockStore::new()
        .with_table(live_from(&users_schema()))
        .omitting_index_status();
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::from_millis(200));

    Reconciler::new(&store, config).reconcile(&schema).unwrap();

    assert_eq!(store.mutating_calls(), vec!["update_table update ByOrg"]);
    let live = store.live("Users");
    let index = live.global_index("ByOrg").unwrap();
    assert_eq!(index.index_status, None);
    assert!(index.is_active());
}

#[test]
fn test_unbounded_timeout_still_converges() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.provisioned_throughput = ProvisionedThroughput::new(1, 1);
    let store = MockStore::new().with_table(live).settling_after(2);
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::from_secs(u64::MAX));

    let report = Reconciler::new(&store, config).reconcile(&schema).unwrap();

    assert_eq!(report.mutations.len(), 1);
    assert_eq!(store.live("Users").table_status, TableStatus::Active);
}

#[test]
fn test_zero_timeout_accepts_table_already_active() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.provisioned_throughput = ProvisionedThroughput::new(1, 1);
    let store = MockStore::new().with_table(live);
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::ZERO);

    let report = Reconciler::new(&store, config).reconcile(&schema).unwrap();
    assert_eq!(
        report.mutations,
        vec![Mutation::UpdateThroughput(ProvisionedThroughput::new(5, 1))]
    );
}

#[test]
fn test_zero_timeout_fails_while_still_updating() {
    let schema = users_schema();
    let mut live = live_from(&schema);
    live.provisioned_throughput = ProvisionedThroughput::new(1, 1);
    let store = MockStore::new().with_table(live).settling_after(3);
    let config = ReconcilerConfig::new(Duration::from_millis(1), Duration::ZERO);

    let err = Reconciler::new(&store, config)
        .reconcile(&schema)
        .unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::ConvergenceTimeout { ref target, .. } if target == "table"
    ));
}

#[test]
fn test_describe_failure_is_surfaced() {
    let store = MockStore::new().failing_describe("AccessDeniedException");

    let err = Reconciler::new(&store, fast_config())
        .reconcile(&users_schema())
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Describe { .. }));
    assert!(err.to_string().contains("AccessDeniedException"));
    assert!(store.mutating_calls().is_empty());
}

#[test]
fn test_rejected_update_aborts_remaining_changes() {
    let mut schema = users_schema();
    schema.provisioned_throughput = ProvisionedThroughput::new(8, 8);
    schema.stream_specification = Some(StreamSpecification::enabled(StreamViewType::NewImage));
    let store = MockStore::new()
        .with_table(live_from(&users_schema()))
        .rejecting_updates();

    let err = Reconciler::new(&store, fast_config())
        .reconcile(&schema)
        .unwrap_err();

    assert!(matches!(err, ReconcileError::Mutation { .. }));
    assert_eq!(store.mutating_calls().len(), 1);
}

#[test]
fn test_table_ensure_reconciles() {
    let store = MockStore::new();
    let table = Table::new(&store, users_schema());

    let report = table.ensure(&fast_config()).unwrap();
    assert!(report.created);
    assert!(table.ensure(&fast_config()).unwrap().is_noop());
}
