// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for flink-operator.
//!
//! Uses proptest to generate random inputs and verify validation invariants.

#[path = "../common/fixtures.rs"]
mod fixtures;

use proptest::prelude::*;

use fixtures::FlinkClusterBuilder;
use flink_operator::crd::FlinkClusterSpec;
use flink_operator::{ValidationError, validate_create, validate_update};

/// Strategy for ports inside the reserved range.
fn reserved_port() -> impl Strategy<Value = i32> {
    i32::MIN..=1024i32
}

/// Strategy for ports above the reserved range.
fn open_port() -> impl Strategy<Value = i32> {
    1025..=i32::MAX
}

/// Number of port fields across JobManager and TaskManager.
const PORT_FIELDS: usize = 7;

/// Set one of the seven port fields, selected by index.
fn set_port(spec: &mut FlinkClusterSpec, field: usize, port: i32) {
    let slot = match field {
        0 => &mut spec.job_manager.ports.rpc,
        1 => &mut spec.job_manager.ports.blob,
        2 => &mut spec.job_manager.ports.query,
        3 => &mut spec.job_manager.ports.ui,
        4 => &mut spec.task_manager.ports.rpc,
        5 => &mut spec.task_manager.ports.data,
        _ => &mut spec.task_manager.ports.query,
    };
    *slot = Some(port);
}

proptest! {
    /// Property: any port at or below 1024 in any port field fails creation.
    #[test]
    fn test_reserved_ports_rejected(port in reserved_port(), field in 0..PORT_FIELDS) {
        let cluster = FlinkClusterBuilder::default()
            .with_spec(|spec| set_port(spec, field, port))
            .build();
        prop_assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidPort(_))
        ));
    }

    /// Property: any port above 1024 passes in any port field.
    #[test]
    fn test_open_ports_accepted(port in open_port(), field in 0..PORT_FIELDS) {
        let cluster = FlinkClusterBuilder::default()
            .with_spec(|spec| set_port(spec, field, port))
            .build();
        prop_assert_eq!(validate_create(&cluster), Ok(()));
    }

    /// Property: off-heap ratio passes exactly within [0, 100].
    #[test]
    fn test_off_heap_ratio_range(ratio in any::<i32>()) {
        let cluster = FlinkClusterBuilder::default()
            .off_heap_ratio(Some(ratio))
            .build();
        let result = validate_create(&cluster);
        if (0..=100).contains(&ratio) {
            prop_assert_eq!(result, Ok(()));
        } else {
            prop_assert!(matches!(result, Err(ValidationError::InvalidManagerSpec(_))));
        }
    }

    /// Property: the JobManager must have exactly one replica.
    #[test]
    fn test_job_manager_replicas(replicas in any::<i32>()) {
        let cluster = FlinkClusterBuilder::default()
            .job_manager_replicas(Some(replicas))
            .build();
        prop_assert_eq!(validate_create(&cluster).is_ok(), replicas == 1);
    }

    /// Property: TaskManagers pass with one or more replicas.
    #[test]
    fn test_task_manager_replicas(replicas in any::<i32>()) {
        let cluster = FlinkClusterBuilder::default()
            .task_manager_replicas(replicas)
            .build();
        prop_assert_eq!(validate_create(&cluster).is_ok(), replicas >= 1);
    }

    /// Property: off-heap minimum passes exactly when it fits the limit in MiB.
    #[test]
    fn test_off_heap_min_vs_limit(limit_mib in 0..=65536i32, min in 0..=65536i32) {
        let cluster = FlinkClusterBuilder::default()
            .job_manager_memory_limit(&format!("{}Mi", limit_mib))
            .off_heap_min(Some(min))
            .build();
        prop_assert_eq!(validate_create(&cluster).is_ok(), min <= limit_mib);
    }

    /// Property: creating a job that is already cancelled always fails.
    #[test]
    fn test_cancelled_job_never_created(parallelism in 1..=512i32, replicas in 1..=64i32) {
        let cluster = FlinkClusterBuilder::default()
            .task_manager_replicas(replicas)
            .with_job()
            .with_spec(|spec| spec.job.as_mut().unwrap().parallelism = Some(parallelism))
            .cancel_requested(Some(true))
            .build();
        prop_assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::PrematureCancelFlag(_))
        ));
    }

    /// Property: validation has no hidden state.
    #[test]
    fn test_create_deterministic(replicas in -2..=4i32, port in 1000..=1100i32) {
        let cluster = FlinkClusterBuilder::default()
            .task_manager_replicas(replicas)
            .with_spec(|spec| spec.job_manager.ports.ui = Some(port))
            .build();
        prop_assert_eq!(validate_create(&cluster), validate_create(&cluster));
    }

    /// Property: an update that changes nothing is always accepted.
    #[test]
    fn test_identical_update_accepted(
        replicas in any::<i32>(),
        cancel in proptest::option::of(any::<bool>())
    ) {
        let cluster = FlinkClusterBuilder::default()
            .task_manager_replicas(replicas)
            .cancel_requested(cancel)
            .build();
        prop_assert_eq!(validate_update(&cluster, &cluster.clone()), Ok(()));
    }

    /// Property: any TaskManager scaling is rejected, with or without a cancel request.
    #[test]
    fn test_scaling_rejected(
        old_replicas in 1..=64i32,
        new_replicas in 1..=64i32,
        cancel in any::<bool>()
    ) {
        prop_assume!(old_replicas != new_replicas);
        let old = FlinkClusterBuilder::default()
            .task_manager_replicas(old_replicas)
            .with_job()
            .build();
        let new = FlinkClusterBuilder::default()
            .task_manager_replicas(new_replicas)
            .cancel_requested(Some(cancel))
            .build();
        prop_assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::SpecImmutable(_))
        ));
    }

    /// Property: a set cancel flag can never be cleared, whatever else changes.
    #[test]
    fn test_cancel_irreversible(new_flag in proptest::option::of(Just(false)), replicas in 1..=64i32) {
        let old = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .build();
        let new = FlinkClusterBuilder::default()
            .task_manager_replicas(replicas)
            .cancel_requested(new_flag)
            .build();
        prop_assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::IrreversibleCancel(_))
        ));
    }
}
