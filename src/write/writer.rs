//! The `PointsWriter` façade: lifecycle and per-request orchestration

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::common::metrics::{Counter, CounterMap, MetricsRegistry};
use crate::common::{Error, Result, WriteConfig};
use crate::meta::MetaStore;
use crate::model::WriteRequest;
use crate::write::mapping::{self, ShardMapping};
use crate::write::{HintedHandoff, ShardWriter, TsdbStore};

// The statistics generated by the "write" subsystem
pub(crate) const STAT_WRITE_REQ: &str = "req";
pub(crate) const STAT_POINT_REQ: &str = "point_req";
pub(crate) const STAT_POINT_REQ_LOCAL: &str = "point_req_local";
pub(crate) const STAT_POINT_REQ_REMOTE: &str = "point_req_remote";
pub(crate) const STAT_POINT_REQ_HH: &str = "point_req_hh";
pub(crate) const STAT_WRITE_OK: &str = "write_ok";
pub(crate) const STAT_WRITE_PARTIAL: &str = "write_partial";
pub(crate) const STAT_WRITE_TIMEOUT: &str = "write_timeout";
pub(crate) const STAT_WRITE_ERR: &str = "write_error";

/// Typed handles into the "write" counter map.
#[derive(Debug, Clone)]
pub(crate) struct WriteStats {
    pub req: Arc<Counter>,
    pub point_req: Arc<Counter>,
    pub point_req_local: Arc<Counter>,
    pub point_req_remote: Arc<Counter>,
    pub point_req_hh: Arc<Counter>,
    pub write_ok: Arc<Counter>,
    pub write_partial: Arc<Counter>,
    pub write_timeout: Arc<Counter>,
    pub write_error: Arc<Counter>,
}

impl WriteStats {
    fn new(map: &CounterMap) -> Self {
        Self {
            req: map.counter(STAT_WRITE_REQ),
            point_req: map.counter(STAT_POINT_REQ),
            point_req_local: map.counter(STAT_POINT_REQ_LOCAL),
            point_req_remote: map.counter(STAT_POINT_REQ_REMOTE),
            point_req_hh: map.counter(STAT_POINT_REQ_HH),
            write_ok: map.counter(STAT_WRITE_OK),
            write_partial: map.counter(STAT_WRITE_PARTIAL),
            write_timeout: map.counter(STAT_WRITE_TIMEOUT),
            write_error: map.counter(STAT_WRITE_ERR),
        }
    }
}

/// Coordinates a write batch across local and remote shard replicas.
///
/// Cheap to clone: every field is shared, so a clone is just another handle
/// onto the same coordinator. Collaborators are injected at construction and
/// never change afterwards.
#[derive(Clone)]
pub struct PointsWriter {
    pub(crate) write_timeout: Duration,
    closing: Arc<Mutex<watch::Sender<bool>>>,
    pub(crate) meta: Arc<dyn MetaStore>,
    pub(crate) store: Arc<dyn TsdbStore>,
    pub(crate) remote: Arc<dyn ShardWriter>,
    pub(crate) handoff: Arc<dyn HintedHandoff>,
    pub(crate) stats: WriteStats,
}

impl PointsWriter {
    /// Build a writer over the four collaborators.
    ///
    /// The metrics registry is a parameter (rather than the process global)
    /// so tests can observe counters in isolation; production callers pass
    /// [`crate::common::METRICS`].
    pub fn new(
        config: WriteConfig,
        meta: Arc<dyn MetaStore>,
        store: Arc<dyn TsdbStore>,
        remote: Arc<dyn ShardWriter>,
        handoff: Arc<dyn HintedHandoff>,
        registry: &MetricsRegistry,
    ) -> Self {
        let stats = WriteStats::new(&registry.counter_map("write"));
        let (closing, _) = watch::channel(false);
        Self {
            write_timeout: config.write_timeout(),
            closing: Arc::new(Mutex::new(closing)),
            meta,
            store,
            remote,
            handoff,
            stats,
        }
    }

    /// Arm the closing signal. Idempotent; re-arms after a [`close`](Self::close).
    pub fn open(&self) {
        let mut closing = self.closing.lock().unwrap();
        if *closing.borrow() {
            let (armed, _) = watch::channel(false);
            *closing = armed;
        }
    }

    /// Fire the closing signal. Idempotent: the signal fires exactly once
    /// per armed lifecycle, and every in-flight write observing it abandons
    /// with `WriteFailed`.
    pub fn close(&self) {
        let closing = self.closing.lock().unwrap();
        if !*closing.borrow() {
            closing.send_replace(true);
        }
    }

    pub(crate) fn closing_signal(&self) -> watch::Receiver<bool> {
        self.closing.lock().unwrap().subscribe()
    }

    /// Write a batch across the shards its points map to, honouring the
    /// request's consistency level.
    ///
    /// Returns the first per-shard error observed; remaining shard outcomes
    /// are discarded. The request itself is never mutated.
    pub async fn write_points(&self, request: &WriteRequest) -> Result<()> {
        self.stats.req.inc();
        self.stats.point_req.add(request.points.len() as u64);

        let retention_policy = if request.retention_policy.is_empty() {
            let db = self
                .meta
                .database(&request.database)
                .await?
                .ok_or_else(|| Error::DatabaseNotFound(request.database.clone()))?;
            db.default_retention_policy
        } else {
            request.retention_policy.clone()
        };

        let mapping = mapping::map_shards(
            self.meta.as_ref(),
            &request.database,
            &retention_policy,
            &request.points,
        )
        .await?;

        // One task per shard; the channel is sized so every shard can report
        // even after this request has already returned
        let ShardMapping { points, mut shards } = mapping;
        let shard_count = points.len();
        let (tx, mut rx) = mpsc::channel::<Result<()>>(shard_count.max(1));
        for (shard_id, shard_points) in points {
            // map_point records a descriptor for every mapped shard id
            let shard = shards.remove(&shard_id).unwrap();
            let writer = self.clone();
            let database = request.database.clone();
            let retention_policy = retention_policy.clone();
            let consistency = request.consistency;
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = writer
                    .write_to_shard(
                        &shard,
                        &database,
                        &retention_policy,
                        consistency,
                        Arc::new(shard_points),
                    )
                    .await;
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut closing = self.closing_signal();
        for _ in 0..shard_count {
            tokio::select! {
                biased;
                _ = closed(&mut closing) => {
                    return Err(Error::WriteFailed("coordinator closing".into()));
                }
                outcome = rx.recv() => match outcome {
                    Some(Err(err)) => return Err(err),
                    Some(Ok(())) => {}
                    None => break,
                },
            }
        }
        Ok(())
    }
}

/// Resolves once the coordinator begins shutting down.
pub(crate) async fn closed(signal: &mut watch::Receiver<bool>) {
    let _ = signal.wait_for(|closing| *closing).await;
}
