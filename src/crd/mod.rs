//! Custom Resource Definitions (CRDs) for flink-operator.
//!
//! - `FlinkCluster`: A Flink cluster with an optional batch job

mod flink_cluster;

pub use flink_cluster::*;
