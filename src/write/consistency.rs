//! Write consistency levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// How many replica acknowledgements a write needs before it is reported
/// successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyLevel {
    /// One acknowledgement, where a durable hinted-handoff enqueue counts:
    /// potentially no replica has the write yet.
    Any,
    /// At least one replica acknowledged.
    #[default]
    One,
    /// A majority of replicas acknowledged.
    Quorum,
    /// Every replica acknowledged.
    All,
}

impl ConsistencyLevel {
    /// Acknowledgements required for a shard with `owners` replicas.
    pub fn required_acks(&self, owners: usize) -> usize {
        match self {
            ConsistencyLevel::Any | ConsistencyLevel::One => 1,
            ConsistencyLevel::Quorum => owners / 2 + 1,
            ConsistencyLevel::All => owners,
        }
    }
}

impl FromStr for ConsistencyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(ConsistencyLevel::Any),
            "one" => Ok(ConsistencyLevel::One),
            "quorum" => Ok(ConsistencyLevel::Quorum),
            "all" => Ok(ConsistencyLevel::All),
            _ => Err(Error::InvalidConsistencyLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyLevel::Any => write!(f, "any"),
            ConsistencyLevel::One => write!(f, "one"),
            ConsistencyLevel::Quorum => write!(f, "quorum"),
            ConsistencyLevel::All => write!(f, "all"),
        }
    }
}
