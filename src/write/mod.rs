//! The write coordinator
//!
//! The write path is responsible for:
//! - Retention-policy resolution (including the database default)
//! - Mapping points to shards, creating shard groups as needed
//! - Fanning each shard's batch out to every owning replica
//! - Accounting acknowledgements against the consistency level
//! - Diverting writes for unreachable peers into hinted handoff

use async_trait::async_trait;

use crate::common::Result;
use crate::meta::{NodeId, ShardId};
use crate::model::Point;

pub mod consistency;
pub mod mapping;
mod replica;
pub mod writer;

pub use consistency::ConsistencyLevel;
pub use mapping::{map_shards, ShardMapping};
pub use writer::PointsWriter;

/// Local storage engine, as seen by the write path.
#[async_trait]
pub trait TsdbStore: Send + Sync {
    /// Create a shard on this node. Idempotent.
    async fn create_shard(
        &self,
        database: &str,
        retention_policy: &str,
        shard_id: ShardId,
    ) -> Result<()>;

    /// Write a batch into a local shard.
    ///
    /// Returns the `Error::ShardNotFound` sentinel exactly when the shard
    /// has never been created on this node.
    async fn write_to_shard(&self, shard_id: ShardId, points: &[Point]) -> Result<()>;
}

/// Transport for writing a batch to a shard replica on a peer node.
///
/// Errors must be classifiable by `Error::is_retryable`.
#[async_trait]
pub trait ShardWriter: Send + Sync {
    async fn write_shard(&self, shard_id: ShardId, owner: NodeId, points: &[Point]) -> Result<()>;
}

/// Durable queue for writes whose owner is temporarily unreachable.
///
/// A successful enqueue means delivery will be retried later without any
/// further caller involvement.
#[async_trait]
pub trait HintedHandoff: Send + Sync {
    async fn write_shard(&self, shard_id: ShardId, owner: NodeId, points: &[Point]) -> Result<()>;
}
