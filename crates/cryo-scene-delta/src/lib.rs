// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delta application and uniform patching for Cryo scenes.
//!
//! # Design Principles
//!
//! - **Stateless core**: [`apply_delta`] and [`patch_uniform`] are pure
//!   functions from borrowed inputs to new records. The base scene is never
//!   mutated.
//! - **Strict ordering**: a delta applies only to the scene whose
//!   `timestamp` equals its `since_timestamp`. Anything else is stale and the
//!   caller must fetch a fresh snapshot.
//! - **Wholesale upserts**: entities and shaders are replaced as whole
//!   records. Only [`patch_uniform`] merges fields.
//!
//! [`SceneReplica`] wraps the pure core for consumers that keep one live scene.

use cryo_protocol::{UniformKind, ValidationError};
use thiserror::Error;

mod apply;
mod patch;
mod replica;

pub use apply::{apply_delta, upsert, Keyed};
pub use patch::{patch_uniform, UniformPatch};
pub use replica::{ReplicaError, SceneReplica};

/// Error type for scene delta application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    /// The delta was produced against a different scene timestamp.
    #[error("stale delta: scene is at {scene_timestamp}, delta expects {since_timestamp}")]
    Stale {
        /// Timestamp of the scene the delta was offered to.
        scene_timestamp: u64,
        /// Timestamp the delta was produced against.
        since_timestamp: u64,
    },
    /// The delta carries a malformed record.
    #[error("invalid delta: {0}")]
    Invalid(#[from] ValidationError),
}

impl DeltaError {
    /// True when the caller must re-request a full snapshot.
    pub const fn requires_resync(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// Error type for uniform patching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The program declares no uniform with the requested name.
    #[error("shader `{shader}` has no uniform named `{name}`")]
    UniformNotFound {
        /// Shader program id.
        shader: String,
        /// Requested uniform name.
        name: String,
    },
    /// The patch carried more than one `value_*` field.
    #[error("patch for uniform `{name}` carries {fields} value fields, expected at most one")]
    Ambiguous {
        /// Uniform name.
        name: String,
        /// Number of value fields present.
        fields: usize,
    },
    /// The patched value does not match the declared kind.
    #[error("uniform `{name}` is {declared}, patch supplies a {found} value")]
    KindMismatch {
        /// Uniform name.
        name: String,
        /// Kind the uniform will be declared as after the patch.
        declared: UniformKind,
        /// Kind of the supplied value.
        found: UniformKind,
    },
    /// The patch changes the kind without supplying a value for it.
    #[error("patch retypes uniform `{name}` to {declared} without a value")]
    MissingValue {
        /// Uniform name.
        name: String,
        /// Requested kind.
        declared: UniformKind,
    },
    /// The patch renames a uniform onto a name another uniform already uses.
    #[error("cannot rename uniform `{name}` to `{rename}`: shader `{shader}` already declares it")]
    NameConflict {
        /// Shader program id.
        shader: String,
        /// Uniform being patched.
        name: String,
        /// Requested new name.
        rename: String,
    },
}
