// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Response envelope returned by a scene producer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::{Scene, SceneDelta};

/// Envelope carrying either a snapshot, a delta, or an error string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolResponse {
    /// Full snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    /// Incremental update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<SceneDelta>,
    /// Producer-side failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Classified content of a [`ProtocolResponse`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProtocolPayload {
    /// Replace local state with this snapshot.
    Snapshot(Scene),
    /// Advance local state with this delta.
    Delta(SceneDelta),
}

/// A response that did not carry exactly one usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// The producer reported an error.
    #[error("producer error: {0}")]
    Remote(String),
    /// Nothing was set.
    #[error("response carries no scene, delta or error")]
    Empty,
    /// More than one of `scene`, `delta`, `error` was set.
    #[error("response carries more than one of scene, delta and error")]
    Ambiguous,
}

impl ProtocolResponse {
    /// Wrap a snapshot.
    pub fn snapshot(scene: Scene) -> Self {
        Self {
            scene: Some(scene),
            ..Self::default()
        }
    }

    /// Wrap a delta.
    pub fn delta(delta: SceneDelta) -> Self {
        Self {
            delta: Some(delta),
            ..Self::default()
        }
    }

    /// Wrap a producer error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Classify the envelope.
    pub fn into_payload(self) -> Result<ProtocolPayload, ResponseError> {
        match (self.scene, self.delta, self.error) {
            (Some(scene), None, None) => Ok(ProtocolPayload::Snapshot(scene)),
            (None, Some(delta), None) => Ok(ProtocolPayload::Delta(delta)),
            (None, None, Some(message)) => Err(ResponseError::Remote(message)),
            (None, None, None) => Err(ResponseError::Empty),
            _ => Err(ResponseError::Ambiguous),
        }
    }
}
