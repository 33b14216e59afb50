//! FlinkCluster Custom Resource Definition.
//!
//! Describes a Flink session or job cluster: one JobManager, a scaled set of
//! TaskManagers, and an optional batch job submitted to it. The spec is a
//! plain value tree so that update admission can compare old and new
//! snapshots structurally.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::core::v1::{LocalObjectReference, ResourceRequirements};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// FlinkCluster is a custom resource for running Flink clusters.
///
/// Example:
/// ```yaml
/// apiVersion: flinkoperator.k8s.io/v1alpha1
/// kind: FlinkCluster
/// metadata:
///   name: wordcount
///   namespace: default
/// spec:
///   image:
///     name: flink:1.8.1
///     pullPolicy: IfNotPresent
///   jobManager:
///     replicas: 1
///     accessScope: Cluster
///     ports: { rpc: 6123, blob: 6124, query: 6125, ui: 8081 }
///     memoryOffHeapRatio: 25
///     memoryOffHeapMin: 600
///     resources:
///       limits:
///         memory: 1Gi
///   taskManager:
///     replicas: 2
///     ports: { rpc: 6122, data: 6121, query: 6125 }
///   job:
///     jarFile: ./examples/streaming/WordCount.jar
///     parallelism: 2
///     restartPolicy: Never
///     cleanupPolicy:
///       afterJobSucceeds: DeleteCluster
///       afterJobFails: KeepCluster
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "flinkoperator.k8s.io",
    version = "v1alpha1",
    kind = "FlinkCluster",
    plural = "flinkclusters",
    shortname = "fc",
    namespaced,
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".spec.image.name"}"#,
    printcolumn = r#"{"name":"TaskManagers", "type":"integer", "jsonPath":".spec.taskManager.replicas"}"#,
    printcolumn = r#"{"name":"Jar", "type":"string", "jsonPath":".spec.job.jarFile"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct FlinkClusterSpec {
    /// Flink container image.
    pub image: ImageSpec,

    /// JobManager (coordinator) configuration.
    pub job_manager: JobManagerSpec,

    /// TaskManager (worker) configuration.
    pub task_manager: TaskManagerSpec,

    /// Optional batch job. When absent the cluster runs as a session cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobSpec>,

    /// Extra entries for flink-conf.yaml.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flink_properties: BTreeMap<String, String>,
}

/// Container image specification.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    /// Image reference, e.g. `flink:1.8.1`.
    #[serde(default)]
    pub name: String,

    /// Image pull policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<ImagePullPolicy>,

    /// Secrets used to pull the image from a private registry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull_secrets: Vec<LocalObjectReference>,
}

/// Image pull policy, mirroring the core/v1 container field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ImagePullPolicy {
    Always,
    IfNotPresent,
    Never,
}

impl ImagePullPolicy {
    pub const ALL: [ImagePullPolicy; 3] = [Self::Always, Self::IfNotPresent, Self::Never];
}

impl fmt::Display for ImagePullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagePullPolicy::Always => write!(f, "Always"),
            ImagePullPolicy::IfNotPresent => write!(f, "IfNotPresent"),
            ImagePullPolicy::Never => write!(f, "Never"),
        }
    }
}

/// JobManager specification.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobManagerSpec {
    /// Number of JobManager replicas. Only a single JobManager is supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Where the JobManager service is reachable from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_scope: Option<AccessScope>,

    /// JobManager ports.
    #[serde(default)]
    pub ports: JobManagerPorts,

    /// Compute resources for the JobManager container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    /// Percentage of container memory reserved for off-heap use (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_off_heap_ratio: Option<i32>,

    /// Minimum off-heap memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_off_heap_min: Option<i32>,
}

/// Access scope of the JobManager service.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum AccessScope {
    /// Reachable only from within the Kubernetes cluster.
    Cluster,
    /// Reachable from the VPC through an internal load balancer.
    #[serde(rename = "VPC")]
    Vpc,
    /// Reachable from the internet through an external load balancer.
    External,
}

impl AccessScope {
    pub const ALL: [AccessScope; 3] = [Self::Cluster, Self::Vpc, Self::External];
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessScope::Cluster => write!(f, "Cluster"),
            AccessScope::Vpc => write!(f, "VPC"),
            AccessScope::External => write!(f, "External"),
        }
    }
}

/// JobManager ports.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobManagerPorts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<i32>,
}

/// TaskManager specification.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerSpec {
    /// Number of TaskManager replicas (at least 1).
    #[serde(default)]
    pub replicas: i32,

    /// TaskManager ports.
    #[serde(default)]
    pub ports: TaskManagerPorts,

    /// Compute resources for each TaskManager container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

/// TaskManager ports.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerPorts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<i32>,
}

/// Batch job submitted to the cluster.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Path to the job jar inside the image.
    #[serde(default)]
    pub jar_file: String,

    /// Fully qualified entry class, if the jar manifest does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Arguments passed to the job's main method.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Savepoint to restore the job from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_savepoint: Option<String>,

    /// Allow restoring from a savepoint with state that no longer maps to an operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_non_restored_state: Option<bool>,

    /// Job parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<i32>,

    /// Restart policy of the job submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<JobRestartPolicy>,

    /// What to do with cluster resources once the job finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_policy: Option<CleanupPolicy>,

    /// Request graceful cancellation of the running job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_requested: Option<bool>,
}

impl JobSpec {
    /// Whether cancellation has been requested. Absent means not requested.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.unwrap_or(false)
    }
}

/// Restart policy for the job submitter pod.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum JobRestartPolicy {
    Never,
    OnFailure,
}

impl JobRestartPolicy {
    pub const ALL: [JobRestartPolicy; 2] = [Self::Never, Self::OnFailure];
}

impl fmt::Display for JobRestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRestartPolicy::Never => write!(f, "Never"),
            JobRestartPolicy::OnFailure => write!(f, "OnFailure"),
        }
    }
}

/// Cleanup actions applied after the job succeeds or fails.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_job_succeeds: Option<CleanupAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_job_fails: Option<CleanupAction>,
}

/// Disposal of cluster resources after the job finishes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum CleanupAction {
    /// Delete the whole cluster.
    DeleteCluster,
    /// Delete the TaskManagers only, keeping the JobManager for inspection.
    DeleteTaskManager,
    /// Keep every cluster resource.
    KeepCluster,
}

impl CleanupAction {
    pub const ALL: [CleanupAction; 3] = [
        Self::DeleteCluster,
        Self::DeleteTaskManager,
        Self::KeepCluster,
    ];
}

impl fmt::Display for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupAction::DeleteCluster => write!(f, "DeleteCluster"),
            CleanupAction::DeleteTaskManager => write!(f, "DeleteTaskManager"),
            CleanupAction::KeepCluster => write!(f, "KeepCluster"),
        }
    }
}

/// Ports at or below this value are reserved and rejected.
pub const RESERVED_PORT_MAX: i32 = 1024;

/// Format an enumeration's allowed values as `A, B, C`.
pub fn allowed_values<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
