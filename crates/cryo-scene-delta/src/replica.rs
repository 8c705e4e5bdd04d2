// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Consumer-side holder of the latest scene.
//!
//! `SceneReplica` owns one scene and advances it through [`apply_delta`]. It
//! adds no merge rules of its own; it only tracks whether the consumer has
//! fallen out of sync and needs a fresh snapshot.

use cryo_protocol::{ProtocolPayload, ProtocolResponse, ResponseError, Scene, SceneDelta};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{apply_delta, DeltaError};

/// Error type for replica updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicaError {
    /// A delta arrived before any snapshot.
    #[error("no snapshot loaded")]
    NoSnapshot,
    /// Delta application failed.
    #[error(transparent)]
    Delta(#[from] DeltaError),
    /// The producer's response could not be used.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// Live scene advanced by snapshots and in-order deltas.
#[derive(Debug, Default)]
pub struct SceneReplica {
    scene: Option<Scene>,
    needs_resync: bool,
    applied_deltas: u64,
}

impl SceneReplica {
    /// Create an empty replica awaiting its first snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a replica seeded with a snapshot.
    pub fn from_snapshot(scene: Scene) -> Self {
        Self {
            scene: Some(scene),
            ..Self::default()
        }
    }

    /// Current scene, if a snapshot has been loaded.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Timestamp of the current scene.
    pub fn timestamp(&self) -> Option<u64> {
        self.scene.as_ref().map(|s| s.timestamp)
    }

    /// True once a stale delta was seen and no snapshot has replaced the scene
    /// since, or when no snapshot was ever loaded.
    pub fn needs_resync(&self) -> bool {
        self.needs_resync || self.scene.is_none()
    }

    /// Number of deltas applied since the last snapshot.
    pub fn applied_deltas(&self) -> u64 {
        self.applied_deltas
    }

    /// Replace the scene with a full snapshot.
    pub fn load_snapshot(&mut self, scene: Scene) -> &Scene {
        debug!(scene = %scene.id, timestamp = scene.timestamp, "loaded scene snapshot");
        self.needs_resync = false;
        self.applied_deltas = 0;
        self.scene.insert(scene)
    }

    /// Apply a delta to the current scene.
    ///
    /// On any error the current scene is left untouched. A stale delta also
    /// raises [`needs_resync`](Self::needs_resync).
    pub fn apply(&mut self, delta: &SceneDelta, applied_at: u64) -> Result<&Scene, ReplicaError> {
        let base = self.scene.as_ref().ok_or(ReplicaError::NoSnapshot)?;
        match apply_delta(base, delta, applied_at) {
            Ok(next) => {
                debug!(
                    scene = %next.id,
                    from = delta.since_timestamp,
                    to = next.timestamp,
                    "applied scene delta"
                );
                self.needs_resync = false;
                self.applied_deltas += 1;
                Ok(self.scene.insert(next))
            }
            Err(err) => {
                if err.requires_resync() {
                    self.needs_resync = true;
                }
                warn!(%err, "rejected scene delta");
                Err(err.into())
            }
        }
    }

    /// Feed a producer response: snapshots replace, deltas advance, errors
    /// are returned as-is.
    pub fn ingest(
        &mut self,
        response: ProtocolResponse,
        applied_at: u64,
    ) -> Result<&Scene, ReplicaError> {
        match response.into_payload()? {
            ProtocolPayload::Snapshot(scene) => Ok(self.load_snapshot(scene)),
            ProtocolPayload::Delta(delta) => self.apply(&delta, applied_at),
        }
    }
}
