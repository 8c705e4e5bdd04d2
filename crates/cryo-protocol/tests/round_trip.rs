// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Encode/decode fidelity for full scenes.

use cryo_protocol::codec::{from_cbor, from_json, to_cbor, to_json};
use cryo_protocol::{
    Projection, Rotation, Scene, Surface, UniformValue, Validate, Vector3, Vector4,
};

const SCENE: &str = r##"{
  "id": "lobby",
  "version": "1.2",
  "timestamp": 1700000000123,
  "entities": [
    {
      "id": "logo",
      "name": "Cryo Logo",
      "transform": {
        "position": {"x": 0, "y": 1.5, "z": -2},
        "quaternion": {"x": 0, "y": 0.7071, "z": 0, "w": 0.7071},
        "scale": {"x": 1, "y": 1, "z": 1}
      },
      "mesh": {
        "inline_geometry": {
          "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0],
          "uvs": [0, 0, 1, 0, 0, 1],
          "indices": [0, 1, 2],
          "primitive_type": "triangles"
        }
      },
      "shader_material": {
        "shader_id": "cryo-logo-ice",
        "uniform_overrides": [
          {"name": "uGlowIntensity", "type": "float", "value_float": 0.7}
        ],
        "transparent": true,
        "blend_mode": "additive",
        "side": "double"
      },
      "tags": ["branding"]
    },
    {
      "id": "floor",
      "mesh": {"gltf_url": "/models/floor.glb"},
      "material": {
        "alpha_mode": "OPAQUE",
        "pbr": {"base_color_factor": {"x": 0.2, "y": 0.2, "z": 0.25}, "roughness_factor": 0.9}
      },
      "visible": false
    }
  ],
  "camera": {"type": "perspective", "position": {"x": 0, "y": 2, "z": 6}, "fov": 50, "near": 0.1, "far": 100},
  "lights": [
    {"id": "sun", "type": "directional", "direction": {"x": -1, "y": -1, "z": 0}, "intensity": 2.5},
    {"id": "fill", "type": "ambient", "color": {"x": 0.4, "y": 0.8, "z": 1}}
  ],
  "environment": {"background_color": "#0b1020", "fog_enabled": true, "fog_near": 5, "fog_far": 40},
  "shaders": [
    {
      "id": "cryo-logo-ice",
      "vertex_shader": "void main() {}",
      "fragment_shader": "void main() {}",
      "uniforms": [
        {"name": "uCryoTexture", "type": "sampler2D", "value_texture_url": "/textures/cryo.png"},
        {"name": "uGlowColor", "type": "vec3", "value_vec3": {"x": 0.4, "y": 0.8, "z": 1.0}},
        {"name": "uKernel", "type": "float", "value_float_array": [0.25, 0.5, 0.25]}
      ],
      "attributes": [{"name": "aPosition", "type": "vec3", "location": 0}],
      "defines": {"USE_GLOW": "1"},
      "extensions": ["OES_standard_derivatives"],
      "shader_type": "custom"
    }
  ]
}"##;

#[test]
fn decodes_reference_scene() {
    let scene: Scene = from_json(SCENE).expect("decode");
    assert_eq!(scene.timestamp, 1_700_000_000_123);
    assert_eq!(scene.entities.len(), 2);
    assert_eq!(scene.validate(), Ok(()));

    let logo = scene.entity("logo").expect("logo");
    let transform = logo.transform.expect("transform");
    assert_eq!(
        transform.rotation,
        Some(Rotation::Quaternion(Vector4::new(0.0, 0.7071, 0.0, 0.7071)))
    );
    assert!(matches!(logo.surface, Some(Surface::Shader(_))));

    let floor = scene.entity("floor").expect("floor");
    assert!(!floor.is_visible());
    assert!(matches!(floor.surface, Some(Surface::Material(_))));

    assert_eq!(
        scene.camera.map(|c| c.projection),
        Some(Projection::Perspective)
    );

    let shader = scene.shader("cryo-logo-ice").expect("shader");
    assert_eq!(
        shader.uniform("uGlowColor").map(|u| u.value.clone()),
        Some(UniformValue::Vec3(Vector3::new(0.4, 0.8, 1.0)))
    );
    assert_eq!(
        shader.uniform("uKernel").map(|u| u.value.clone()),
        Some(UniformValue::FloatArray(vec![0.25, 0.5, 0.25]))
    );
}

#[test]
fn json_round_trip_is_field_for_field() {
    let scene: Scene = from_json(SCENE).expect("decode");
    let encoded = to_json(&scene).expect("encode");
    let back: Scene = from_json(&encoded).expect("decode again");
    assert_eq!(back, scene);
}

#[test]
fn cbor_round_trip_is_field_for_field() {
    let scene: Scene = from_json(SCENE).expect("decode");
    let bytes = to_cbor(&scene).expect("encode");
    let back: Scene = from_cbor(&bytes).expect("decode cbor");
    assert_eq!(back, scene);
}

#[test]
fn unset_fields_are_not_invented_on_encode() {
    let scene: Scene = from_json(r#"{"id":"s","entities":[{"id":"e"}]}"#).expect("decode");
    let value: serde_json::Value = serde_json::from_str(&to_json(&scene).expect("encode"))
        .expect("reparse");
    assert_eq!(
        value,
        serde_json::json!({"id": "s", "entities": [{"id": "e"}], "timestamp": 0})
    );
}
