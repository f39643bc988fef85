//! Replica fan-out for a single shard
//!
//! One task per owner, each reporting exactly once. The accumulator drains
//! outcomes against the required acknowledgement count, with the coordinator
//! closing signal and the per-shard deadline taking priority over results.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::common::{Error, Result};
use crate::meta::{NodeId, ShardId, ShardInfo};
use crate::model::Point;
use crate::write::consistency::ConsistencyLevel;
use crate::write::writer::{closed, PointsWriter};

/// Outcome of one replica attempt. Produced exactly once per owner.
struct OwnerResult {
    owner: NodeId,
    result: Result<()>,
}

impl PointsWriter {
    /// Write a shard's point batch to every owner, returning once the
    /// consistency level's required acknowledgement count is met.
    ///
    /// Stragglers keep running after an early return or timeout; their
    /// outcomes are discarded and never change the caller's result.
    pub(crate) async fn write_to_shard(
        &self,
        shard: &ShardInfo,
        database: &str,
        retention_policy: &str,
        consistency: ConsistencyLevel,
        points: Arc<Vec<Point>>,
    ) -> Result<()> {
        let required = consistency.required_acks(shard.owners.len());

        // Sized to the owner count so no replica task ever blocks on send
        let (tx, mut rx) = mpsc::channel::<OwnerResult>(shard.owners.len().max(1));
        for owner in &shard.owners {
            let writer = self.clone();
            let owner = *owner;
            let shard_id = shard.id;
            let database = database.to_string();
            let retention_policy = retention_policy.to_string();
            let points = Arc::clone(&points);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = writer
                    .write_to_owner(
                        shard_id,
                        &database,
                        &retention_policy,
                        consistency,
                        owner.node_id,
                        &points,
                    )
                    .await;
                let _ = tx.send(OwnerResult {
                    owner: owner.node_id,
                    result,
                })
                .await;
            });
        }
        drop(tx);

        let deadline = Instant::now() + self.write_timeout;
        let mut closing = self.closing_signal();
        let mut wrote = 0usize;
        let mut first_error: Option<Error> = None;

        for _ in 0..shard.owners.len() {
            tokio::select! {
                biased;
                _ = closed(&mut closing) => {
                    return Err(Error::WriteFailed("coordinator closing".into()));
                }
                _ = sleep_until(deadline) => {
                    self.stats.write_timeout.inc();
                    return Err(Error::Timeout);
                }
                outcome = rx.recv() => {
                    let Some(OwnerResult { owner, result }) = outcome else { break };
                    match result {
                        Err(err) => {
                            self.stats.write_error.inc();
                            tracing::warn!(
                                shard = shard.id,
                                owner,
                                error = %err,
                                "replica write failed"
                            );
                            if first_error.is_none() {
                                first_error = Some(err);
                            }
                        }
                        Ok(()) => {
                            wrote += 1;
                            if wrote >= required {
                                self.stats.write_ok.inc();
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }

        if wrote > 0 {
            self.stats.write_partial.inc();
            return Err(Error::PartialWrite);
        }

        if let Some((database, policy, group)) = self.meta.shard_owner(shard.id).await {
            tracing::debug!(
                shard = shard.id,
                database = %database,
                policy = %policy,
                group = group.id,
                "no replica acknowledged"
            );
        }

        match first_error {
            Some(err) => Err(Error::WriteFailed(err.to_string())),
            None => Err(Error::WriteFailed("no replica acknowledged the write".into())),
        }
    }

    /// One replica attempt: the local engine, a remote peer, or (for a
    /// retryable remote failure) the hinted-handoff queue.
    async fn write_to_owner(
        &self,
        shard_id: ShardId,
        database: &str,
        retention_policy: &str,
        consistency: ConsistencyLevel,
        owner: NodeId,
        points: &[Point],
    ) -> Result<()> {
        if self.meta.node_id() == owner {
            self.stats.point_req_local.add(points.len() as u64);

            match self.store.write_to_shard(shard_id, points).await {
                // The shard maps here but the engine has never created it:
                // create it and retry the write exactly once
                Err(Error::ShardNotFound(_)) => {
                    self.store
                        .create_shard(database, retention_policy, shard_id)
                        .await?;
                    self.store.write_to_shard(shard_id, points).await
                }
                result => result,
            }
        } else {
            self.stats.point_req_remote.add(points.len() as u64);

            match self.remote.write_shard(shard_id, owner, points).await {
                Err(err) if err.is_retryable() => {
                    // Peer unreachable: queue the batch for later delivery
                    self.stats.point_req_hh.add(points.len() as u64);
                    let enqueued = self.handoff.write_shard(shard_id, owner, points).await;

                    // A durable enqueue counts as an acknowledgement only
                    // under ANY; every other level reports the original
                    // remote error regardless of the handoff outcome
                    if enqueued.is_ok() && consistency == ConsistencyLevel::Any {
                        Ok(())
                    } else {
                        Err(err)
                    }
                }
                result => result,
            }
        }
    }
}
