// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene records: entities, cameras, lights, environment, snapshots and deltas.

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::math::{Vector3, Vector4};
use crate::shader::{ShaderMaterial, ShaderProgram};
use crate::ValidationError;

/// Orientation of a [`Transform`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rotation {
    /// Euler angles in degrees (wire field `rotation`).
    Euler(Vector3),
    /// Unit quaternion `(x, y, z, w)` (wire field `quaternion`).
    Quaternion(Vector4),
}

/// Placement of an entity.
///
/// When a producer sends both `rotation` and `quaternion`, the quaternion is
/// authoritative and the Euler angles are dropped while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformWire", into = "TransformWire")]
pub struct Transform {
    /// Translation.
    pub position: Option<Vector3>,
    /// Orientation.
    pub rotation: Option<Rotation>,
    /// Per-axis scale.
    pub scale: Option<Vector3>,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct TransformWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<Vector3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quaternion: Option<Vector4>,
}

impl From<TransformWire> for Transform {
    fn from(wire: TransformWire) -> Self {
        let rotation = wire
            .quaternion
            .map(Rotation::Quaternion)
            .or_else(|| wire.rotation.map(Rotation::Euler));
        Self {
            position: wire.position,
            rotation,
            scale: wire.scale,
        }
    }
}

impl From<Transform> for TransformWire {
    fn from(t: Transform) -> Self {
        let (rotation, quaternion) = match t.rotation {
            Some(Rotation::Euler(e)) => (Some(e), None),
            Some(Rotation::Quaternion(q)) => (None, Some(q)),
            None => (None, None),
        };
        Self {
            position: t.position,
            rotation,
            scale: t.scale,
            quaternion,
        }
    }
}

/// Topology of inline geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Triangle list.
    Triangles,
    /// Line list.
    Lines,
    /// Point list.
    Points,
}

/// Geometry carried inside the protocol message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineGeometry {
    /// Packed `xyz` positions.
    pub positions: Vec<f32>,
    /// Packed `xyz` normals, one per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
    /// Packed `uv` coordinates, one pair per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<f32>>,
    /// Vertex indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
    /// Topology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive_type: Option<PrimitiveType>,
}

impl InlineGeometry {
    /// Number of whole vertices in `positions`.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Where an entity's geometry comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshWire", into = "MeshWire")]
pub enum Mesh {
    /// External glTF asset (wire field `gltf_url`).
    Gltf(String),
    /// Geometry embedded in the message (wire field `inline_geometry`).
    Inline(InlineGeometry),
}

#[derive(Serialize, Deserialize)]
struct MeshWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gltf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_geometry: Option<InlineGeometry>,
}

impl TryFrom<MeshWire> for Mesh {
    type Error = ValidationError;

    fn try_from(wire: MeshWire) -> Result<Self, Self::Error> {
        match (wire.gltf_url, wire.inline_geometry) {
            (Some(url), None) => Ok(Self::Gltf(url)),
            (None, Some(geometry)) => Ok(Self::Inline(geometry)),
            (Some(_), Some(_)) => Err(ValidationError::MeshSourceConflict),
            (None, None) => Err(ValidationError::MeshSourceMissing),
        }
    }
}

impl From<Mesh> for MeshWire {
    fn from(mesh: Mesh) -> Self {
        match mesh {
            Mesh::Gltf(url) => Self {
                gltf_url: Some(url),
                inline_geometry: None,
            },
            Mesh::Inline(geometry) => Self {
                gltf_url: None,
                inline_geometry: Some(geometry),
            },
        }
    }
}

/// How an entity is shaded.
#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    /// Material-driven shading (wire field `material`).
    Material(Material),
    /// Custom shader program (wire field `shader_material`).
    Shader(ShaderMaterial),
}

/// A placeable object in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntityWire", into = "EntityWire")]
pub struct Entity {
    /// Stable identifier; never changes for the lifetime of the entity.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Placement.
    pub transform: Option<Transform>,
    /// Geometry source.
    pub mesh: Option<Mesh>,
    /// Shading.
    pub surface: Option<Surface>,
    /// Visibility; absent means visible.
    pub visible: Option<bool>,
    /// Free-form tags.
    pub tags: Option<Vec<String>>,
}

impl Entity {
    /// An entity with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            transform: None,
            mesh: None,
            surface: None,
            visible: None,
            tags: None,
        }
    }

    /// Effective visibility (`visible` defaults to true).
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// The shader material, if this entity is shaded by a program.
    pub fn shader_material(&self) -> Option<&ShaderMaterial> {
        match &self.surface {
            Some(Surface::Shader(s)) => Some(s),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct EntityWire {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mesh: Option<Mesh>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shader_material: Option<ShaderMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

impl TryFrom<EntityWire> for Entity {
    type Error = ValidationError;

    fn try_from(wire: EntityWire) -> Result<Self, Self::Error> {
        let surface = match (wire.material, wire.shader_material) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::SurfaceConflict { entity: wire.id })
            }
            (Some(m), None) => Some(Surface::Material(m)),
            (None, Some(s)) => Some(Surface::Shader(s)),
            (None, None) => None,
        };
        Ok(Self {
            id: wire.id,
            name: wire.name,
            transform: wire.transform,
            mesh: wire.mesh,
            surface,
            visible: wire.visible,
            tags: wire.tags,
        })
    }
}

impl From<Entity> for EntityWire {
    fn from(e: Entity) -> Self {
        let (material, shader_material) = match e.surface {
            Some(Surface::Material(m)) => (Some(m), None),
            Some(Surface::Shader(s)) => (None, Some(s)),
            None => (None, None),
        };
        Self {
            id: e.id,
            name: e.name,
            transform: e.transform,
            mesh: e.mesh,
            material,
            shader_material,
            visible: e.visible,
            tags: e.tags,
        }
    }
}

/// Camera projection type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Perspective projection.
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// Scene camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Projection type.
    #[serde(rename = "type")]
    pub projection: Projection,
    /// Eye position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    /// Look-at target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vector3>,
    /// Vertical field of view in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
    /// Near clip plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near: Option<f32>,
    /// Far clip plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f32>,
    /// Viewport aspect ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<f32>,
}

impl Camera {
    /// A camera of the given projection with every parameter unset.
    pub const fn new(projection: Projection) -> Self {
        Self {
            projection,
            position: None,
            target: None,
            fov: None,
            near: None,
            far: None,
            aspect: None,
        }
    }
}

/// Light source type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Infinitely distant light.
    Directional,
    /// Omnidirectional point light.
    Point,
    /// Cone light.
    Spot,
    /// Uniform ambient term.
    Ambient,
}

/// Scene light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Stable identifier.
    pub id: String,
    /// Light type.
    #[serde(rename = "type")]
    pub kind: LightKind,
    /// World position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    /// Emission direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Vector3>,
    /// Linear RGB color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vector3>,
    /// Intensity multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    /// Attenuation range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    /// Spot inner cone angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_cone_angle: Option<f32>,
    /// Spot outer cone angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_cone_angle: Option<f32>,
}

/// Global environment settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Ambient light color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_color: Option<Vector3>,
    /// Ambient light intensity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_intensity: Option<f32>,
    /// Skybox location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skybox_url: Option<String>,
    /// CSS color string for the clear color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Enable distance fog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog_enabled: Option<bool>,
    /// Fog start distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog_near: Option<f32>,
    /// Fog end distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog_far: Option<f32>,
    /// Fog color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog_color: Option<Vector3>,
}

/// Full scene snapshot.
///
/// A scene is sent once in full and afterwards advanced only by
/// [`SceneDelta`]s whose `since_timestamp` equals `timestamp`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier.
    pub id: String,
    /// Producer-defined schema/content version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Entities in draw order.
    pub entities: Vec<Entity>,
    /// Active camera.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    /// Lights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lights: Option<Vec<Light>>,
    /// Environment settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Monotonic logical time of this snapshot (absent on the wire = 0).
    #[serde(default)]
    pub timestamp: u64,
    /// Shader programs referenced by entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaders: Option<Vec<ShaderProgram>>,
}

impl Scene {
    /// An empty scene at the given timestamp.
    pub fn new(id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            version: None,
            entities: Vec::new(),
            camera: None,
            lights: None,
            environment: None,
            timestamp,
            shaders: None,
        }
    }

    /// Entity by id.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Shader program by id.
    pub fn shader(&self, id: &str) -> Option<&ShaderProgram> {
        self.shaders.as_deref()?.iter().find(|s| s.id == id)
    }
}

/// Incremental update against a prior snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDelta {
    /// Timestamp of the scene this delta applies to.
    pub since_timestamp: u64,
    /// Entities to insert or replace wholesale, by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_entities: Option<Vec<Entity>>,
    /// Entity ids to remove.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_entity_ids: Option<Vec<String>>,
    /// Replacement camera.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    /// Shader programs to insert or replace wholesale, by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_shaders: Option<Vec<ShaderProgram>>,
}

impl SceneDelta {
    /// An empty delta against `since_timestamp`.
    pub fn since(since_timestamp: u64) -> Self {
        Self {
            since_timestamp,
            ..Self::default()
        }
    }

    /// True when the delta carries no changes.
    pub fn is_empty(&self) -> bool {
        self.updated_entities.as_ref().is_none_or(Vec::is_empty)
            && self.removed_entity_ids.as_ref().is_none_or(Vec::is_empty)
            && self.camera.is_none()
            && self.updated_shaders.as_ref().is_none_or(Vec::is_empty)
    }
}
