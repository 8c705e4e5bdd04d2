// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record-level structural checks.
//!
//! Decoding already rejects per-field shape errors (matrix length, uniform
//! tag/value pairing, exclusive mesh and surface fields). The checks here span
//! several fields or several records: unique ids, unique attribute locations,
//! geometry buffer lengths.

use std::collections::HashSet;

use crate::scene::{Entity, InlineGeometry, Mesh, Scene, SceneDelta};
use crate::shader::{ShaderMaterial, ShaderProgram, ShaderUniform};
use crate::ValidationError;

/// A record that can check its own structural invariants.
pub trait Validate {
    /// Return the first violated invariant, if any.
    fn validate(&self) -> Result<(), ValidationError>;
}

fn unique_ids<'a>(
    record: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(ValidationError::EmptyId { record });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                record,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn unique_uniform_names(owner: &str, uniforms: &[ShaderUniform]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for u in uniforms {
        if !seen.insert(u.name.as_str()) {
            return Err(ValidationError::DuplicateUniformName {
                owner: owner.to_owned(),
                name: u.name.clone(),
            });
        }
    }
    Ok(())
}

impl Validate for ShaderProgram {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { record: "shader" });
        }
        let mut locations = HashSet::new();
        for attr in self.attributes() {
            if !locations.insert(attr.location) {
                return Err(ValidationError::DuplicateAttributeLocation {
                    shader: self.id.clone(),
                    location: attr.location,
                });
            }
        }
        unique_uniform_names(&self.id, self.uniforms())
    }
}

impl Validate for ShaderMaterial {
    fn validate(&self) -> Result<(), ValidationError> {
        unique_uniform_names(
            &self.shader_id,
            self.uniform_overrides.as_deref().unwrap_or_default(),
        )
    }
}

impl Validate for InlineGeometry {
    fn validate(&self) -> Result<(), ValidationError> {
        let len = self.positions.len();
        if len % 3 != 0 {
            return Err(ValidationError::GeometryLength {
                buffer: "positions",
                len,
                expected: len - len % 3,
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(normals) = &self.normals {
            if normals.len() != len {
                return Err(ValidationError::GeometryLength {
                    buffer: "normals",
                    len: normals.len(),
                    expected: len,
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count * 2 {
                return Err(ValidationError::GeometryLength {
                    buffer: "uvs",
                    len: uvs.len(),
                    expected: vertex_count * 2,
                });
            }
        }
        if let Some(&index) = self
            .indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(ValidationError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

impl Validate for Entity {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { record: "entity" });
        }
        if let Some(Mesh::Inline(geometry)) = &self.mesh {
            geometry.validate()?;
        }
        if let Some(shader) = self.shader_material() {
            shader.validate()?;
        }
        Ok(())
    }
}

impl Validate for Scene {
    fn validate(&self) -> Result<(), ValidationError> {
        unique_ids("entity", self.entities.iter().map(|e| e.id.as_str()))?;
        let shaders = self.shaders.as_deref().unwrap_or_default();
        unique_ids("shader", shaders.iter().map(|s| s.id.as_str()))?;
        let lights = self.lights.as_deref().unwrap_or_default();
        unique_ids("light", lights.iter().map(|l| l.id.as_str()))?;
        for entity in &self.entities {
            entity.validate()?;
        }
        for shader in shaders {
            shader.validate()?;
        }
        Ok(())
    }
}

impl Validate for SceneDelta {
    fn validate(&self) -> Result<(), ValidationError> {
        for entity in self.updated_entities.iter().flatten() {
            entity.validate()?;
        }
        for shader in self.updated_shaders.iter().flatten() {
            shader.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{AttributeType, ShaderAttribute, UniformValue};

    fn program() -> ShaderProgram {
        ShaderProgram {
            id: "p".into(),
            name: None,
            vertex_shader: String::new(),
            fragment_shader: String::new(),
            uniforms: Some(vec![
                ShaderUniform::new("uTime", UniformValue::Float(0.0)),
                ShaderUniform::new("uTex", UniformValue::Sampler2D("/t.png".into())),
            ]),
            attributes: Some(vec![
                ShaderAttribute {
                    name: "aPosition".into(),
                    kind: AttributeType::Vec3,
                    location: 0,
                },
                ShaderAttribute {
                    name: "aUV".into(),
                    kind: AttributeType::Vec2,
                    location: 1,
                },
            ]),
            defines: None,
            extensions: None,
            shader_type: None,
        }
    }

    #[test]
    fn accepts_well_formed_program() {
        assert_eq!(program().validate(), Ok(()));
    }

    #[test]
    fn rejects_duplicate_attribute_location() {
        let mut p = program();
        if let Some(attrs) = p.attributes.as_mut() {
            attrs[1].location = 0;
        }
        assert_eq!(
            p.validate(),
            Err(ValidationError::DuplicateAttributeLocation {
                shader: "p".into(),
                location: 0
            })
        );
    }

    #[test]
    fn rejects_duplicate_uniform_name() {
        let mut p = program();
        if let Some(uniforms) = p.uniforms.as_mut() {
            uniforms.push(ShaderUniform::new("uTime", UniformValue::Float(1.0)));
        }
        assert!(matches!(
            p.validate(),
            Err(ValidationError::DuplicateUniformName { ref name, .. }) if name == "uTime"
        ));
    }

    #[test]
    fn geometry_lengths_are_checked() {
        let mut g = InlineGeometry {
            positions: vec![0.0; 9],
            normals: Some(vec![0.0; 9]),
            uvs: Some(vec![0.0; 6]),
            indices: Some(vec![0, 1, 2]),
            primitive_type: None,
        };
        assert_eq!(g.validate(), Ok(()));

        g.indices = Some(vec![0, 1, 3]);
        assert_eq!(
            g.validate(),
            Err(ValidationError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );

        g.indices = None;
        g.uvs = Some(vec![0.0; 5]);
        assert!(matches!(
            g.validate(),
            Err(ValidationError::GeometryLength { buffer: "uvs", .. })
        ));

        g.uvs = None;
        g.positions.push(1.0);
        assert!(matches!(
            g.validate(),
            Err(ValidationError::GeometryLength {
                buffer: "positions",
                ..
            })
        ));
    }

    #[test]
    fn scene_rejects_duplicate_entity_ids() {
        let mut scene = Scene::new("s", 0);
        scene.entities = vec![Entity::new("a"), Entity::new("a")];
        assert_eq!(
            scene.validate(),
            Err(ValidationError::DuplicateId {
                record: "entity",
                id: "a".into()
            })
        );
    }

    #[test]
    fn delta_validates_its_payload() {
        let mut bad = program();
        bad.id.clear();
        let delta = SceneDelta {
            updated_shaders: Some(vec![bad]),
            ..SceneDelta::since(0)
        };
        assert_eq!(
            delta.validate(),
            Err(ValidationError::EmptyId { record: "shader" })
        );
    }
}
