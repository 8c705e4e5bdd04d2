// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! PBR material records.
//!
//! Every parameter is optional. An absent field means "use the renderer's
//! default", which is not the same as zero: a material with
//! `metallic_factor: None` must not be treated as non-metallic.

use serde::{Deserialize, Serialize};

use crate::math::{Vector2, Vector3};

/// Alpha handling for a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    /// Alpha ignored.
    Opaque,
    /// Alpha compared against `alpha_cutoff`.
    Mask,
    /// Alpha blended.
    Blend,
}

/// Framebuffer blend equation for a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard over blending.
    Normal,
    /// Additive blending.
    Additive,
    /// Multiplicative blending.
    Multiply,
    /// Renderer-specific blending.
    Custom,
}

/// Physically-based rendering parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PbrMaterial {
    /// Linear base color multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<Vector3>,
    /// Metalness multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic_factor: Option<f32>,
    /// Roughness multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_factor: Option<f32>,
    /// Base color texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color_texture_url: Option<String>,
    /// Packed metallic (B) / roughness (G) texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture_url: Option<String>,
    /// Tangent-space normal map location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_texture_url: Option<String>,
    /// Ambient occlusion texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusion_texture_url: Option<String>,
    /// Emissive texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_texture_url: Option<String>,
    /// Emissive color multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_factor: Option<Vector3>,
    /// Normal map strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_scale: Option<f32>,
    /// Occlusion strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occlusion_strength: Option<f32>,
    /// Clearcoat layer intensity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    /// Clearcoat layer roughness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness: Option<f32>,
    /// Clearcoat intensity texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat_texture_url: Option<String>,
    /// Clearcoat normal map location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat_normal_texture_url: Option<String>,
    /// Transmission factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f32>,
    /// Transmission texture location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission_texture_url: Option<String>,
    /// Sheen tint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheen_color: Option<Vector3>,
    /// Sheen roughness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheen_roughness: Option<f32>,
    /// Index of refraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ior: Option<f32>,
}

/// Surface material for an entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// PBR parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pbr: Option<PbrMaterial>,
    /// Render both faces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_sided: Option<bool>,
    /// Cutoff used when `alpha_mode` is [`AlphaMode::Mask`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,
    /// Alpha handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<AlphaMode>,
    /// Render in the transparent pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    /// Global opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Enable depth testing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_test: Option<bool>,
    /// Enable depth writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_write: Option<bool>,
    /// Blend equation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

/// Texture reference with UV transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Texture location.
    pub url: String,
    /// UV set index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tex_coord: Option<u32>,
    /// UV scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector2>,
    /// UV offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector2>,
    /// UV rotation in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_stay_unset() {
        let m: Material = serde_json::from_str(r#"{"pbr":{"metallic_factor":0}}"#).unwrap();
        let pbr = m.pbr.as_ref().unwrap();
        assert_eq!(pbr.metallic_factor, Some(0.0));
        assert_eq!(pbr.roughness_factor, None);

        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"pbr":{"metallic_factor":0.0}}"#);
    }

    #[test]
    fn enum_spellings_match_wire() {
        let m: Material =
            serde_json::from_str(r#"{"alpha_mode":"MASK","blend_mode":"additive"}"#).unwrap();
        assert_eq!(m.alpha_mode, Some(AlphaMode::Mask));
        assert_eq!(m.blend_mode, Some(BlendMode::Additive));
        assert!(serde_json::from_str::<Material>(r#"{"alpha_mode":"mask"}"#).is_err());
    }
}
