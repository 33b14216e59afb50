// Test code is allowed to panic on failure
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

//! Unit tests for flink-operator.
//!
//! These tests run without a Kubernetes cluster and exercise the public
//! validation API end to end.

#[path = "../common/fixtures.rs"]
mod fixtures;

mod create_tests {
    use super::fixtures::{FlinkClusterBuilder, job_cluster, session_cluster};
    use flink_operator::crd::{AccessScope, CleanupAction, ImagePullPolicy, JobRestartPolicy};
    use flink_operator::{ValidationError, validate_create};

    #[test]
    fn test_valid_session_cluster() {
        assert_eq!(validate_create(&session_cluster("session")), Ok(()));
    }

    #[test]
    fn test_valid_job_cluster() {
        assert_eq!(validate_create(&job_cluster("wordcount")), Ok(()));
    }

    #[test]
    fn test_every_enum_value_accepted() {
        for pull_policy in ImagePullPolicy::ALL {
            let cluster = FlinkClusterBuilder::default()
                .pull_policy(Some(pull_policy))
                .build();
            assert!(validate_create(&cluster).is_ok());
        }

        for scope in AccessScope::ALL {
            let cluster = FlinkClusterBuilder::default()
                .with_spec(|spec| spec.job_manager.access_scope = Some(scope))
                .build();
            assert!(validate_create(&cluster).is_ok());
        }

        for restart_policy in JobRestartPolicy::ALL {
            for succeeded in CleanupAction::ALL {
                for failed in CleanupAction::ALL {
                    let cluster = FlinkClusterBuilder::default()
                        .with_job()
                        .with_spec(|spec| {
                            let job = spec.job.as_mut().unwrap();
                            job.restart_policy = Some(restart_policy);
                            let cleanup = job.cleanup_policy.as_mut().unwrap();
                            cleanup.after_job_succeeds = Some(succeeded);
                            cleanup.after_job_fails = Some(failed);
                        })
                        .build();
                    assert!(validate_create(&cluster).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_empty_identity_rejected() {
        let cluster = FlinkClusterBuilder::new("").build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidIdentity(_))
        ));

        let cluster = FlinkClusterBuilder::default().namespace("").build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidIdentity(_))
        ));

        let cluster = FlinkClusterBuilder::default().without_namespace().build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_missing_pull_policy_rejected() {
        let cluster = FlinkClusterBuilder::default().pull_policy(None).build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidImageSpec(_))
        ));
    }

    #[test]
    fn test_job_manager_replicas_must_be_one() {
        for replicas in [None, Some(0), Some(2)] {
            let cluster = FlinkClusterBuilder::default()
                .job_manager_replicas(replicas)
                .build();
            assert!(
                matches!(
                    validate_create(&cluster),
                    Err(ValidationError::InvalidManagerSpec(_))
                ),
                "replicas {:?} should be rejected",
                replicas
            );
        }
    }

    #[test]
    fn test_off_heap_ratio_boundaries() {
        for ratio in [0, 100] {
            let cluster = FlinkClusterBuilder::default()
                .off_heap_ratio(Some(ratio))
                .build();
            assert!(validate_create(&cluster).is_ok());
        }
        for ratio in [-1, 101] {
            let cluster = FlinkClusterBuilder::default()
                .off_heap_ratio(Some(ratio))
                .build();
            assert!(validate_create(&cluster).is_err());
        }
    }

    #[test]
    fn test_off_heap_min_must_fit_memory_limit() {
        let cluster = FlinkClusterBuilder::default()
            .job_manager_memory_limit("512Mi")
            .off_heap_min(Some(600))
            .build();
        let err = validate_create(&cluster).unwrap_err();
        assert_eq!(err.reason(), "InvalidMemoryConfig");
        assert!(err.to_string().contains("512Mi"));

        let cluster = FlinkClusterBuilder::default()
            .job_manager_memory_limit("512Mi")
            .off_heap_min(Some(512))
            .build();
        assert!(validate_create(&cluster).is_ok());
    }

    #[test]
    fn test_off_heap_min_required() {
        let cluster = FlinkClusterBuilder::default().off_heap_min(None).build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidMemoryConfig(_))
        ));
    }

    #[test]
    fn test_task_manager_needs_a_replica() {
        let cluster = FlinkClusterBuilder::default()
            .task_manager_replicas(0)
            .build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::InvalidWorkerSpec(_))
        ));
    }

    #[test]
    fn test_cancel_requested_rejected_on_create() {
        let cluster = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .build();
        assert!(matches!(
            validate_create(&cluster),
            Err(ValidationError::PrematureCancelFlag(_))
        ));
    }

    #[test]
    fn test_create_is_idempotent() {
        let valid = job_cluster("wordcount");
        assert_eq!(validate_create(&valid), validate_create(&valid));

        let invalid = FlinkClusterBuilder::default()
            .task_manager_replicas(0)
            .build();
        assert_eq!(validate_create(&invalid), validate_create(&invalid));
    }
}

mod update_tests {
    use super::fixtures::{FlinkClusterBuilder, job_cluster, session_cluster};
    use flink_operator::{ValidationError, validate_update};

    /// Old cancelled, new un-cancelled, nothing else differs.
    #[test]
    fn test_scenario_a_uncancel_rejected() {
        let old = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .build();
        let new = FlinkClusterBuilder::default()
            .cancel_requested(Some(false))
            .build();
        assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::IrreversibleCancel(_))
        ));
    }

    /// Old unset, new cancelled, nothing else differs.
    #[test]
    fn test_scenario_b_cancel_accepted() {
        let old = FlinkClusterBuilder::default().with_job().build();
        let new = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .build();
        assert_eq!(validate_update(&old, &new), Ok(()));
    }

    /// Cancel request bundled with a replica change.
    #[test]
    fn test_scenario_c_cancel_with_other_change_rejected() {
        let old = FlinkClusterBuilder::default().with_job().build();
        let new = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .task_manager_replicas(5)
            .build();
        assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::SpecImmutable(_))
        ));
    }

    /// Identical snapshots.
    #[test]
    fn test_scenario_d_identical_accepted() {
        let old = job_cluster("wordcount");
        let new = job_cluster("wordcount");
        assert_eq!(validate_update(&old, &new), Ok(()));

        let old = session_cluster("session");
        assert_eq!(validate_update(&old, &old.clone()), Ok(()));
    }

    /// Image change without any cancel involvement.
    #[test]
    fn test_scenario_e_image_change_rejected() {
        let old = session_cluster("session");
        let new = FlinkClusterBuilder::new("session")
            .image("flink:1.9.0")
            .build();
        assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::SpecImmutable(_))
        ));
    }

    #[test]
    fn test_flink_properties_are_immutable() {
        let old = session_cluster("session");
        let new = FlinkClusterBuilder::new("session")
            .with_spec(|spec| {
                spec.flink_properties
                    .insert("taskmanager.numberOfTaskSlots".to_string(), "4".to_string());
            })
            .build();
        assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::SpecImmutable(_))
        ));
    }

    #[test]
    fn test_removing_job_rejected() {
        let old = job_cluster("wordcount");
        let new = session_cluster("wordcount");
        assert!(matches!(
            validate_update(&old, &new),
            Err(ValidationError::SpecImmutable(_))
        ));
    }

    #[test]
    fn test_cancelled_job_can_be_reapplied() {
        let cancelled = FlinkClusterBuilder::default()
            .cancel_requested(Some(true))
            .build();
        assert_eq!(validate_update(&cancelled, &cancelled.clone()), Ok(()));
    }
}

mod error_tests {
    use flink_operator::ValidationError;

    #[test]
    fn test_reason_matches_variant() {
        let cases = [
            (ValidationError::InvalidIdentity(String::new()), "InvalidIdentity"),
            (
                ValidationError::InvalidManagerSpec(String::new()),
                "InvalidManagerSpec",
            ),
            (
                ValidationError::InvalidWorkerSpec(String::new()),
                "InvalidWorkerSpec",
            ),
            (ValidationError::SpecImmutable(String::new()), "SpecImmutable"),
            (
                ValidationError::IrreversibleCancel(String::new()),
                "IrreversibleCancel",
            ),
            (
                ValidationError::PrematureCancelFlag(String::new()),
                "PrematureCancelFlag",
            ),
        ];
        for (error, reason) in cases {
            assert_eq!(error.reason(), reason);
        }
    }
}
