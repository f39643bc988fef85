//! # cumulus
//!
//! The cluster write path of a distributed time-series store:
//! - maps each point in a batch to its storage shard
//! - fans writes out to every replica of each shard
//! - enforces a caller-selected consistency level (any / one / quorum / all)
//! - diverts writes for unreachable peers into a durable hinted-handoff queue
//!
//! ## Architecture
//!
//! ```text
//!          WriteRequest (db, policy, consistency, points)
//!                           │
//!                    ┌──────▼───────┐
//!                    │ PointsWriter │  shard mapping, then
//!                    └──────┬───────┘  one task per shard
//!           ┌───────────────┼───────────────┐
//!     ┌─────▼─────┐   ┌─────▼─────┐   ┌─────▼─────┐
//!     │ shard 12  │   │ shard 13  │   │ shard 14  │  one task per owner
//!     └─────┬─────┘   └───────────┘   └───────────┘
//!           │
//!    ┌──────┼──────────────┐
//! ┌──▼───┐ ┌▼─────┐  ┌─────▼────┐
//! │local │ │remote│  │ remote   │──unreachable──▶ hinted handoff
//! │engine│ │peer  │  │ peer     │
//! └──────┘ └──────┘  └──────────┘
//! ```
//!
//! The metadata store, local storage engine, remote shard writer and
//! hinted-handoff queue are collaborators consumed through traits; see
//! [`meta::MetaStore`], [`write::TsdbStore`], [`write::ShardWriter`] and
//! [`write::HintedHandoff`].

pub mod common;
pub mod meta;
pub mod model;
pub mod write;

// Re-export commonly used types
pub use common::{Error, Result, WriteConfig};
pub use model::{Point, WriteRequest};
pub use write::{ConsistencyLevel, PointsWriter};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
