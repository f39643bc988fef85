//! Time-series data model for the write path

use serde::{Deserialize, Serialize};

use crate::meta::Timestamp;
use crate::write::ConsistencyLevel;

/// A single timestamped sample.
///
/// The field set is carried as an opaque encoded payload; the write path
/// only needs the timestamp (for shard-group selection) and a stable series
/// hash (for shard selection within a group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Series key (measurement plus tag set, canonically encoded).
    pub series: String,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: Timestamp,
    /// Encoded field set.
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Point {
    pub fn new(series: impl Into<String>, timestamp: Timestamp, payload: Vec<u8>) -> Self {
        Self {
            series: series.into(),
            timestamp,
            payload,
        }
    }

    pub fn time(&self) -> Timestamp {
        self.timestamp
    }

    /// Stable 64-bit hash of the series key.
    ///
    /// Every node computes the same hash for the same series, which is what
    /// makes in-group shard selection deterministic cluster-wide.
    pub fn hash_id(&self) -> u64 {
        let hash = blake3::hash(self.series.as_bytes());
        u64::from_le_bytes(hash.as_bytes()[0..8].try_into().unwrap())
    }
}

/// A batch of points bound for one database and retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub database: String,
    /// Empty means "use the database's default retention policy".
    #[serde(default)]
    pub retention_policy: String,
    #[serde(default)]
    pub consistency: ConsistencyLevel,
    pub points: Vec<Point>,
}

impl WriteRequest {
    pub fn new(database: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            database: database.into(),
            retention_policy: String::new(),
            consistency: ConsistencyLevel::default(),
            points,
        }
    }

    pub fn with_retention_policy(mut self, policy: impl Into<String>) -> Self {
        self.retention_policy = policy.into();
        self
    }

    pub fn with_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.consistency = level;
        self
    }
}
