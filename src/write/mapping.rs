//! Shard mapping: grouping a request's points by target shard

use std::collections::HashMap;

use crate::common::{Error, Result};
use crate::meta::{truncate, MetaStore, ShardGroupInfo, ShardId, ShardInfo, Timestamp};
use crate::model::Point;

/// Per-request grouping of points by target shard, plus the shard
/// descriptors needed to fan out. Discarded when the request returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardMapping {
    /// Points destined for each shard, input order preserved.
    pub points: HashMap<ShardId, Vec<Point>>,
    /// Shard descriptors, keyed by shard id.
    pub shards: HashMap<ShardId, ShardInfo>,
}

impl ShardMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point to a shard's list, recording the shard descriptor.
    pub fn map_point(&mut self, shard: &ShardInfo, point: &Point) {
        self.points.entry(shard.id).or_default().push(point.clone());
        self.shards
            .entry(shard.id)
            .or_insert_with(|| shard.clone());
    }

    /// Number of distinct shards mapped.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Map a batch of points onto shards.
///
/// Resolves the retention policy, creates any shard group covering a point's
/// timestamp that does not exist yet, and assigns each point to exactly one
/// shard within its group by series hash. Any metadata error aborts the
/// mapping; no partial mapping is returned.
pub async fn map_shards(
    meta: &dyn MetaStore,
    database: &str,
    retention_policy: &str,
    points: &[Point],
) -> Result<ShardMapping> {
    let rp = meta
        .retention_policy(database, retention_policy)
        .await?
        .ok_or_else(|| Error::RetentionPolicyNotFound(retention_policy.to_string()))?;

    // One create-if-not-exists per distinct shard-group window
    let mut groups: HashMap<Timestamp, ShardGroupInfo> = HashMap::new();
    for point in points {
        let window = truncate(point.time(), rp.shard_group_duration);
        if !groups.contains_key(&window) {
            let group = meta
                .create_shard_group_if_not_exists(database, retention_policy, window)
                .await?;
            groups.insert(window, group);
        }
    }

    let mut mapping = ShardMapping::new();
    for point in points {
        let window = truncate(point.time(), rp.shard_group_duration);
        let group = &groups[&window];
        mapping.map_point(group.shard_for(point.hash_id()), point);
    }

    Ok(mapping)
}
