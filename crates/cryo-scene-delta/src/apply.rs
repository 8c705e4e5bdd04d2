// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure delta application.

use std::collections::HashSet;

use cryo_protocol::{Entity, Light, Scene, SceneDelta, ShaderProgram, Validate};

use crate::DeltaError;

/// A record with a stable string identity.
pub trait Keyed {
    /// The identity used for upserts.
    fn key(&self) -> &str;
}

impl Keyed for Entity {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ShaderProgram {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Light {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Replace the record with the same key, or append it.
///
/// Replacement is wholesale and keeps the record's position in the list.
/// [`apply_delta`] uses it for entities and shaders. Deltas carry no light
/// updates, so the `Light` impl of [`Keyed`] serves consumers that maintain
/// `Scene::lights` themselves.
pub fn upsert<T: Keyed>(items: &mut Vec<T>, item: T) {
    if let Some(slot) = items.iter_mut().find(|existing| existing.key() == item.key()) {
        *slot = item;
    } else {
        items.push(item);
    }
}

/// Apply `delta` to `base`, producing the next scene.
///
/// Order of operations: staleness check, structural validation, removals,
/// entity upserts, camera replacement, shader upserts. Removals run first so
/// an id that is both removed and updated ends up present with the delta's
/// record. The result's timestamp is `max(base.timestamp, applied_at)`.
pub fn apply_delta(base: &Scene, delta: &SceneDelta, applied_at: u64) -> Result<Scene, DeltaError> {
    if delta.since_timestamp != base.timestamp {
        return Err(DeltaError::Stale {
            scene_timestamp: base.timestamp,
            since_timestamp: delta.since_timestamp,
        });
    }
    delta.validate()?;

    let mut next = base.clone();

    if let Some(removed) = &delta.removed_entity_ids {
        let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
        next.entities.retain(|e| !removed.contains(e.id.as_str()));
    }

    for entity in delta.updated_entities.iter().flatten() {
        upsert(&mut next.entities, entity.clone());
    }

    if let Some(camera) = delta.camera {
        next.camera = Some(camera);
    }

    if let Some(shaders) = delta.updated_shaders.as_ref().filter(|s| !s.is_empty()) {
        let list = next.shaders.get_or_insert_with(Vec::new);
        for shader in shaders {
            upsert(list, shader.clone());
        }
    }

    next.timestamp = base.timestamp.max(applied_at);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryo_protocol::{Camera, Mesh, Projection, ValidationError};

    fn entity(id: &str, url: &str) -> Entity {
        Entity {
            mesh: Some(Mesh::Gltf(url.into())),
            ..Entity::new(id)
        }
    }

    fn shader(id: &str, fragment: &str) -> ShaderProgram {
        ShaderProgram {
            id: id.into(),
            name: None,
            vertex_shader: "void main() {}".into(),
            fragment_shader: fragment.into(),
            uniforms: None,
            attributes: None,
            defines: None,
            extensions: None,
            shader_type: None,
        }
    }

    fn base() -> Scene {
        let mut scene = Scene::new("s", 10);
        scene.entities = vec![entity("a", "/a.glb"), entity("b", "/b.glb"), entity("c", "/c.glb")];
        scene.camera = Some(Camera::new(Projection::Perspective));
        scene
    }

    fn ids(scene: &Scene) -> Vec<&str> {
        scene.entities.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new() {
        let delta = SceneDelta {
            updated_entities: Some(vec![entity("b", "/b2.glb"), entity("d", "/d.glb")]),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&base(), &delta, 11).unwrap();
        assert_eq!(ids(&next), ["a", "b", "c", "d"]);
        assert_eq!(next.entity("b").unwrap().mesh, Some(Mesh::Gltf("/b2.glb".into())));
    }

    #[test]
    fn upsert_is_wholesale_not_field_merge() {
        let mut scene = base();
        scene.entities[0].tags = Some(vec!["keep?".into()]);
        let delta = SceneDelta {
            updated_entities: Some(vec![Entity::new("a")]),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&scene, &delta, 11).unwrap();
        assert_eq!(next.entity("a"), Some(&Entity::new("a")));
    }

    #[test]
    fn stale_delta_is_rejected() {
        let scene = base();
        let delta = SceneDelta {
            removed_entity_ids: Some(vec!["a".into()]),
            ..SceneDelta::since(9)
        };
        let err = apply_delta(&scene, &delta, 11).unwrap_err();
        assert_eq!(
            err,
            DeltaError::Stale {
                scene_timestamp: 10,
                since_timestamp: 9
            }
        );
        assert!(err.requires_resync());
        assert_eq!(scene, base());
    }

    #[test]
    fn removing_unknown_id_is_a_noop() {
        let delta = SceneDelta {
            removed_entity_ids: Some(vec!["ghost".into()]),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&base(), &delta, 10).unwrap();
        assert_eq!(next.entities, base().entities);
    }

    #[test]
    fn removed_and_updated_id_ends_present() {
        let delta = SceneDelta {
            removed_entity_ids: Some(vec!["a".into(), "b".into()]),
            updated_entities: Some(vec![entity("a", "/a2.glb")]),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&base(), &delta, 11).unwrap();
        assert_eq!(ids(&next), ["c", "a"]);
    }

    #[test]
    fn repeated_ids_in_one_delta_keep_last_write() {
        let delta = SceneDelta {
            updated_entities: Some(vec![entity("x", "/1.glb"), entity("x", "/2.glb")]),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&base(), &delta, 11).unwrap();
        assert_eq!(next.entities.iter().filter(|e| e.id == "x").count(), 1);
        assert_eq!(next.entity("x").unwrap().mesh, Some(Mesh::Gltf("/2.glb".into())));
    }

    #[test]
    fn camera_is_replaced_only_when_present() {
        let keep = apply_delta(&base(), &SceneDelta::since(10), 11).unwrap();
        assert_eq!(keep.camera, base().camera);

        let delta = SceneDelta {
            camera: Some(Camera::new(Projection::Orthographic)),
            ..SceneDelta::since(10)
        };
        let next = apply_delta(&base(), &delta, 11).unwrap();
        assert_eq!(next.camera.map(|c| c.projection), Some(Projection::Orthographic));
    }

    #[test]
    fn shaders_are_upserted_by_id() {
        let first = SceneDelta {
            updated_shaders: Some(vec![shader("p", "v1")]),
            ..SceneDelta::since(10)
        };
        let s1 = apply_delta(&base(), &first, 20).unwrap();
        assert_eq!(s1.shaders.as_ref().map(Vec::len), Some(1));

        let second = SceneDelta {
            updated_shaders: Some(vec![shader("p", "v2"), shader("q", "v1")]),
            ..SceneDelta::since(20)
        };
        let s2 = apply_delta(&s1, &second, 30).unwrap();
        assert_eq!(s2.shaders.as_ref().map(Vec::len), Some(2));
        assert_eq!(s2.shader("p").unwrap().fragment_shader, "v2");
    }

    #[test]
    fn timestamp_never_moves_backwards() {
        assert_eq!(apply_delta(&base(), &SceneDelta::since(10), 25).unwrap().timestamp, 25);
        assert_eq!(apply_delta(&base(), &SceneDelta::since(10), 3).unwrap().timestamp, 10);
    }

    #[test]
    fn malformed_delta_is_rejected_before_use() {
        let delta = SceneDelta {
            updated_entities: Some(vec![Entity::new("")]),
            ..SceneDelta::since(10)
        };
        assert_eq!(
            apply_delta(&base(), &delta, 11),
            Err(DeltaError::Invalid(ValidationError::EmptyId { record: "entity" }))
        );
    }

    #[test]
    fn upsert_helper_covers_lights() {
        let light = |id: &str, intensity: f32| Light {
            id: id.into(),
            kind: cryo_protocol::LightKind::Point,
            position: None,
            direction: None,
            color: None,
            intensity: Some(intensity),
            range: None,
            inner_cone_angle: None,
            outer_cone_angle: None,
        };
        let mut lights = vec![light("l", 1.0)];
        upsert(&mut lights, light("l", 2.0));
        upsert(&mut lights, light("m", 1.0));
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].intensity, Some(2.0));
    }
}
