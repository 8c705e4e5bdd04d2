// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shader programs, uniforms and attributes.
//!
//! On the wire a uniform is a tagged union: a `type` string plus one of
//! several `value_*` fields. In memory it is [`ShaderUniform`] holding a
//! [`UniformValue`], so a uniform whose payload disagrees with its tag cannot
//! exist after decoding.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::{Matrix4, Vector2, Vector3, Vector4};
use crate::ValidationError;

/// Declared kind of a uniform (the wire `type` tag).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniformKind {
    /// `float`
    #[serde(rename = "float")]
    Float,
    /// `vec2`
    #[serde(rename = "vec2")]
    Vec2,
    /// `vec3`
    #[serde(rename = "vec3")]
    Vec3,
    /// `vec4`
    #[serde(rename = "vec4")]
    Vec4,
    /// `mat4`
    #[serde(rename = "mat4")]
    Mat4,
    /// `sampler2D`
    #[serde(rename = "sampler2D")]
    Sampler2D,
}

impl UniformKind {
    /// Wire spelling of the tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat4 => "mat4",
            Self::Sampler2D => "sampler2D",
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed uniform payload.
///
/// The array variants are extensions of the base tags: a `float` uniform may
/// carry `value_float_array`, a `vec3` uniform may carry `value_vec3_array`.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    /// Scalar.
    Float(f32),
    /// Two-component vector.
    Vec2(Vector2),
    /// Three-component vector.
    Vec3(Vector3),
    /// Four-component vector.
    Vec4(Vector4),
    /// 4x4 matrix.
    Mat4(Matrix4),
    /// Texture bound to a sampler, by location.
    Sampler2D(String),
    /// `float[]`
    FloatArray(Vec<f32>),
    /// `vec3[]`
    Vec3Array(Vec<Vector3>),
}

impl UniformValue {
    /// The `type` tag this value is encoded under.
    pub const fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) | Self::FloatArray(_) => UniformKind::Float,
            Self::Vec2(_) => UniformKind::Vec2,
            Self::Vec3(_) | Self::Vec3Array(_) => UniformKind::Vec3,
            Self::Vec4(_) => UniformKind::Vec4,
            Self::Mat4(_) => UniformKind::Mat4,
            Self::Sampler2D(_) => UniformKind::Sampler2D,
        }
    }

    /// Wire field that carries this value.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "value_float",
            Self::Vec2(_) => "value_vec2",
            Self::Vec3(_) => "value_vec3",
            Self::Vec4(_) => "value_vec4",
            Self::Mat4(_) => "value_mat4",
            Self::Sampler2D(_) => "value_texture_url",
            Self::FloatArray(_) => "value_float_array",
            Self::Vec3Array(_) => "value_vec3_array",
        }
    }
}

/// The `value_*` fields of a uniform, all optional.
///
/// This is the wire half of a uniform that carries its payload. It is used to
/// decode full uniforms and partial uniform patches alike.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformValueFields {
    /// Scalar payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_float: Option<f32>,
    /// `vec2` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_vec2: Option<Vector2>,
    /// `vec3` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_vec3: Option<Vector3>,
    /// `vec4` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_vec4: Option<Vector4>,
    /// `mat4` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_mat4: Option<Matrix4>,
    /// `sampler2D` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_texture_url: Option<String>,
    /// `float[]` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_float_array: Option<Vec<f32>>,
    /// `vec3[]` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_vec3_array: Option<Vec<Vector3>>,
}

impl UniformValueFields {
    /// Number of `value_*` fields present.
    pub fn count(&self) -> usize {
        [
            self.value_float.is_some(),
            self.value_vec2.is_some(),
            self.value_vec3.is_some(),
            self.value_vec4.is_some(),
            self.value_mat4.is_some(),
            self.value_texture_url.is_some(),
            self.value_float_array.is_some(),
            self.value_vec3_array.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Extract the single present value.
    ///
    /// Returns `Ok(None)` when no field is present and `Err(count)` when more
    /// than one is.
    pub fn into_single(self) -> Result<Option<UniformValue>, usize> {
        let count = self.count();
        if count > 1 {
            return Err(count);
        }
        let value = if let Some(v) = self.value_float {
            UniformValue::Float(v)
        } else if let Some(v) = self.value_vec2 {
            UniformValue::Vec2(v)
        } else if let Some(v) = self.value_vec3 {
            UniformValue::Vec3(v)
        } else if let Some(v) = self.value_vec4 {
            UniformValue::Vec4(v)
        } else if let Some(v) = self.value_mat4 {
            UniformValue::Mat4(v)
        } else if let Some(v) = self.value_texture_url {
            UniformValue::Sampler2D(v)
        } else if let Some(v) = self.value_float_array {
            UniformValue::FloatArray(v)
        } else if let Some(v) = self.value_vec3_array {
            UniformValue::Vec3Array(v)
        } else {
            return Ok(None);
        };
        Ok(Some(value))
    }

    /// Resolve the fields against a declared kind.
    ///
    /// Exactly one field must be present and it must match `declared`.
    pub fn into_value(
        self,
        name: &str,
        declared: UniformKind,
    ) -> Result<UniformValue, ValidationError> {
        let value = match self.into_single() {
            Ok(Some(value)) => value,
            Ok(None) => {
                return Err(ValidationError::UniformValueCount {
                    name: name.to_owned(),
                    count: 0,
                })
            }
            Err(count) => {
                return Err(ValidationError::UniformValueCount {
                    name: name.to_owned(),
                    count,
                })
            }
        };
        if value.kind() != declared {
            return Err(ValidationError::UniformKindMismatch {
                name: name.to_owned(),
                declared,
                found: value.kind(),
            });
        }
        Ok(value)
    }
}

impl From<UniformValue> for UniformValueFields {
    fn from(value: UniformValue) -> Self {
        let mut fields = Self::default();
        match value {
            UniformValue::Float(v) => fields.value_float = Some(v),
            UniformValue::Vec2(v) => fields.value_vec2 = Some(v),
            UniformValue::Vec3(v) => fields.value_vec3 = Some(v),
            UniformValue::Vec4(v) => fields.value_vec4 = Some(v),
            UniformValue::Mat4(v) => fields.value_mat4 = Some(v),
            UniformValue::Sampler2D(v) => fields.value_texture_url = Some(v),
            UniformValue::FloatArray(v) => fields.value_float_array = Some(v),
            UniformValue::Vec3Array(v) => fields.value_vec3_array = Some(v),
        }
        fields
    }
}

/// Named, typed shader input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniformWire", into = "UniformWire")]
pub struct ShaderUniform {
    /// Uniform name as declared in the shader source.
    pub name: String,
    /// Typed payload.
    pub value: UniformValue,
}

impl ShaderUniform {
    /// Build a uniform.
    pub fn new(name: impl Into<String>, value: UniformValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Declared kind (the wire `type`).
    pub const fn kind(&self) -> UniformKind {
        self.value.kind()
    }
}

#[derive(Serialize, Deserialize)]
struct UniformWire {
    name: String,
    #[serde(rename = "type")]
    kind: UniformKind,
    #[serde(flatten)]
    values: UniformValueFields,
}

impl TryFrom<UniformWire> for ShaderUniform {
    type Error = ValidationError;

    fn try_from(wire: UniformWire) -> Result<Self, Self::Error> {
        let value = wire.values.into_value(&wire.name, wire.kind)?;
        Ok(Self {
            name: wire.name,
            value,
        })
    }
}

impl From<ShaderUniform> for UniformWire {
    fn from(u: ShaderUniform) -> Self {
        Self {
            name: u.name,
            kind: u.value.kind(),
            values: u.value.into(),
        }
    }
}

/// Vertex attribute vector type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// `vec2`
    Vec2,
    /// `vec3`
    Vec3,
    /// `vec4`
    Vec4,
}

/// Vertex attribute binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderAttribute {
    /// Attribute name as declared in the vertex shader.
    pub name: String,
    /// Vector type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Binding location; unique within a program.
    pub location: u32,
}

/// Shading model family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderType {
    /// Built-in standard shading.
    Standard,
    /// Built-in PBR shading.
    Pbr,
    /// Built-in toon shading.
    Toon,
    /// User-supplied sources.
    Custom,
}

/// A compiled-on-the-client shader program.
///
/// `id` is the stable identity used when programs are upserted by a
/// [`SceneDelta`](crate::SceneDelta).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaderProgram {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// GLSL vertex source.
    pub vertex_shader: String,
    /// GLSL fragment source.
    pub fragment_shader: String,
    /// Uniform declarations with initial values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniforms: Option<Vec<ShaderUniform>>,
    /// Vertex attribute bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<ShaderAttribute>>,
    /// Preprocessor defines (name → replacement text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defines: Option<BTreeMap<String, String>>,
    /// Required GPU extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// Shading model family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader_type: Option<ShaderType>,
}

impl ShaderProgram {
    /// Uniform list, empty when unset.
    pub fn uniforms(&self) -> &[ShaderUniform] {
        self.uniforms.as_deref().unwrap_or_default()
    }

    /// Attribute list, empty when unset.
    pub fn attributes(&self) -> &[ShaderAttribute] {
        self.attributes.as_deref().unwrap_or_default()
    }

    /// First uniform with the given name.
    pub fn uniform(&self, name: &str) -> Option<&ShaderUniform> {
        self.uniforms().iter().find(|u| u.name == name)
    }
}

/// Blend equation available to shader materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderBlendMode {
    /// Standard over blending.
    Normal,
    /// Additive blending.
    Additive,
    /// Multiplicative blending.
    Multiply,
}

/// Faces rendered by a shader material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullSide {
    /// Front faces only.
    Front,
    /// Back faces only.
    Back,
    /// Both faces.
    Double,
}

/// Binds an entity to a [`ShaderProgram`] by id, with per-entity overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaderMaterial {
    /// Id of the program in [`Scene::shaders`](crate::Scene::shaders).
    pub shader_id: String,
    /// Uniform values that shadow the program's defaults for this entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform_overrides: Option<Vec<ShaderUniform>>,
    /// Render in the transparent pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    /// Enable depth testing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_test: Option<bool>,
    /// Enable depth writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_write: Option<bool>,
    /// Blend equation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<ShaderBlendMode>,
    /// Rendered faces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<CullSide>,
}
