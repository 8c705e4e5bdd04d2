// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the Cryo WebGL scene/shader protocol.
//!
//! Every record here is plain data that round-trips through JSON (the interop
//! encoding) and CBOR. Field names are snake_case on the wire and must stay
//! that way for existing producers and consumers.
//!
//! # Design Principles
//!
//! - **Unset is not zero**: optional fields are `Option<T>` and are omitted
//!   on encode when absent, so "use renderer default" survives a round trip.
//! - **One value per uniform**: the wire's `type` + `value_*` tagged union is
//!   decoded into [`UniformValue`], one variant per kind.
//! - **Reject, never coerce**: malformed records fail decoding or
//!   [`Validate::validate`] with a [`ValidationError`].

use thiserror::Error;

pub mod codec;
mod material;
mod math;
mod response;
mod scene;
mod shader;
mod validate;

pub use material::{AlphaMode, BlendMode, Material, PbrMaterial, TextureInfo};
pub use math::{Color, Matrix4, Vector2, Vector3, Vector4};
pub use response::{ProtocolPayload, ProtocolResponse, ResponseError};
pub use scene::{
    Camera, Entity, Environment, InlineGeometry, Light, LightKind, Mesh, PrimitiveType,
    Projection, Rotation, Scene, SceneDelta, Surface, Transform,
};
pub use shader::{
    AttributeType, CullSide, ShaderAttribute, ShaderBlendMode, ShaderMaterial, ShaderProgram,
    ShaderType, ShaderUniform, UniformKind, UniformValue, UniformValueFields,
};
pub use validate::Validate;

/// Structural error for a malformed protocol record.
///
/// Records that fail these checks are rejected before use; nothing in this
/// crate attempts to repair them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A matrix did not carry exactly 16 elements.
    #[error("Matrix4 expects 16 elements, got {len}")]
    MatrixLength {
        /// Number of elements received.
        len: usize,
    },
    /// A uniform carried zero or several `value_*` fields.
    #[error("uniform `{name}` must carry exactly one value field, found {count}")]
    UniformValueCount {
        /// Uniform name.
        name: String,
        /// Number of `value_*` fields present.
        count: usize,
    },
    /// A uniform's value does not match its declared `type`.
    #[error("uniform `{name}` is declared {declared} but carries a {found} value")]
    UniformKindMismatch {
        /// Uniform name.
        name: String,
        /// Kind named by the `type` tag.
        declared: UniformKind,
        /// Kind of the value actually present.
        found: UniformKind,
    },
    /// A mesh named both a glTF URL and inline geometry.
    #[error("mesh carries both gltf_url and inline_geometry")]
    MeshSourceConflict,
    /// A mesh named neither a glTF URL nor inline geometry.
    #[error("mesh carries neither gltf_url nor inline_geometry")]
    MeshSourceMissing,
    /// An entity carried both a PBR material and a shader material.
    #[error("entity `{entity}` carries both material and shader_material")]
    SurfaceConflict {
        /// Entity id.
        entity: String,
    },
    /// A record that requires an identifier had an empty one.
    #[error("{record} id must not be empty")]
    EmptyId {
        /// Record kind ("entity", "shader", ...).
        record: &'static str,
    },
    /// Two records of the same kind share an id inside one container.
    #[error("duplicate {record} id `{id}`")]
    DuplicateId {
        /// Record kind ("entity", "shader", "light").
        record: &'static str,
        /// The repeated id.
        id: String,
    },
    /// Two attributes of one program bind the same location.
    #[error("shader `{shader}` binds attribute location {location} more than once")]
    DuplicateAttributeLocation {
        /// Shader program id.
        shader: String,
        /// The repeated location.
        location: u32,
    },
    /// Two uniforms of one program (or override list) share a name.
    #[error("`{owner}` declares uniform `{name}` more than once")]
    DuplicateUniformName {
        /// Shader program id, or shader id of a shader material.
        owner: String,
        /// The repeated uniform name.
        name: String,
    },
    /// A geometry buffer has a length inconsistent with the vertex count.
    #[error("inline geometry {buffer} has {len} floats, expected {expected}")]
    GeometryLength {
        /// Buffer name (`positions`, `normals`, `uvs`).
        buffer: &'static str,
        /// Actual float count.
        len: usize,
        /// Expected float count (or a multiple of it for `positions`).
        expected: usize,
    },
    /// An index references a vertex past the end of the position buffer.
    #[error("inline geometry index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of vertices in the geometry.
        vertex_count: usize,
    },
}
