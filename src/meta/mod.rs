//! Cluster metadata consumed by the write path
//!
//! The metadata service itself (replication, persistence, leadership) lives
//! elsewhere in the cluster; this module carries the value types plus the
//! [`MetaStore`] seam the coordinator consumes them through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::Result;

/// Unique identifier for a data node.
pub type NodeId = u64;

/// Unique identifier for a shard.
pub type ShardId = u64;

/// Nanoseconds since the Unix epoch.
pub type Timestamp = i64;

/// Database descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    pub default_retention_policy: String,
}

/// Retention policy descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicyInfo {
    pub name: String,
    /// Number of owners each shard in this policy is replicated to.
    pub replication: usize,
    /// Width of one shard-group window. Always positive.
    pub shard_group_duration: Duration,
}

/// A node holding one replica of a shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardOwner {
    pub node_id: NodeId,
}

/// Shard descriptor: id plus the ordered, non-empty owner list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardInfo {
    pub id: ShardId,
    pub owners: Vec<ShardOwner>,
}

impl ShardInfo {
    /// The replication factor equals the number of owners.
    pub fn replication_factor(&self) -> usize {
        self.owners.len()
    }

    pub fn owned_by(&self, node_id: NodeId) -> bool {
        self.owners.iter().any(|o| o.node_id == node_id)
    }
}

/// A time-bounded bucket of shards covering one shard-group window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardGroupInfo {
    pub id: u64,
    /// Window start, truncated to the policy's shard-group duration.
    pub start_time: Timestamp,
    /// Window end (exclusive).
    pub end_time: Timestamp,
    pub shards: Vec<ShardInfo>,
}

impl ShardGroupInfo {
    /// Select the shard within this group for a series hash.
    ///
    /// Pure in `hash` and the group's shard list, so every coordinator maps
    /// a series to the same shard.
    pub fn shard_for(&self, hash: u64) -> &ShardInfo {
        &self.shards[(hash % self.shards.len() as u64) as usize]
    }

    pub fn covers(&self, timestamp: Timestamp) -> bool {
        self.start_time <= timestamp && timestamp < self.end_time
    }
}

/// Floor a timestamp to the start of its shard-group window.
///
/// Truncation is floor-toward-negative-infinity, so pre-epoch timestamps
/// land in the window below them rather than rounding toward zero.
pub fn truncate(timestamp: Timestamp, window: Duration) -> Timestamp {
    let window = window.as_nanos() as i64;
    timestamp.div_euclid(window) * window
}

/// Interface to the cluster metadata store.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// This coordinator's node identity. Stable for the process lifetime.
    fn node_id(&self) -> NodeId;

    /// Look up a database. `Ok(None)` when it does not exist.
    async fn database(&self, name: &str) -> Result<Option<DatabaseInfo>>;

    /// Look up a retention policy. `Ok(None)` when it does not exist.
    async fn retention_policy(
        &self,
        database: &str,
        policy: &str,
    ) -> Result<Option<RetentionPolicyInfo>>;

    /// Return the shard group covering `timestamp`, creating it first if
    /// needed. Idempotent: concurrent callers for the same window observe
    /// the same group.
    async fn create_shard_group_if_not_exists(
        &self,
        database: &str,
        policy: &str,
        timestamp: Timestamp,
    ) -> Result<ShardGroupInfo>;

    /// Reverse lookup for diagnostics: which (database, policy, group) owns
    /// a shard id.
    async fn shard_owner(&self, shard_id: ShardId) -> Option<(String, String, ShardGroupInfo)>;
}
