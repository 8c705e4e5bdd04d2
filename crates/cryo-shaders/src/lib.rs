// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cryo logo shader presets and source loading.
//!
//! The presets carry their full uniform and attribute layout but only
//! placeholder GLSL. [`create_cryo_logo_shader`] fills in the real sources
//! through any [`ShaderSourceLoader`].

use core::fmt;
use core::str::FromStr;

use cryo_protocol::{
    AttributeType, Matrix4, ShaderAttribute, ShaderProgram, ShaderType, ShaderUniform,
    UniformValue, Vector3,
};
use thiserror::Error;

mod loader;

pub use loader::{FsSourceLoader, HttpSourceLoader, LoadError, ShaderSourceLoader};

/// Vertex shader shared by every logo variant.
pub const VERTEX_FILE: &str = "cryo-logo.vert";
/// Base path the logo shaders are served from by default.
pub const DEFAULT_BASE_PATH: &str = "/shaders/cryo-logo";
/// Public CDN mirror of the logo shaders.
pub const CDN_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/chevp/cryo-web-assets@main/shaders/cryo-logo";
/// Texture sampled by both variants.
pub const LOGO_TEXTURE_URL: &str = "/textures/cryo.png";

/// Logo shader flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LogoVariant {
    /// Textured logo with optional animation.
    #[default]
    Simple,
    /// Logo with glow and shimmer effects.
    Ice,
}

impl LogoVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 2] = [Self::Simple, Self::Ice];

    /// Short name used on the command line and in file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Ice => "ice",
        }
    }

    /// Fragment shader file name for this variant.
    pub const fn fragment_file(self) -> &'static str {
        match self {
            Self::Simple => "cryo-logo-simple.frag",
            Self::Ice => "cryo-logo-ice.frag",
        }
    }

    /// Preset program with placeholder sources.
    pub fn preset(self) -> ShaderProgram {
        match self {
            Self::Simple => cryo_logo_simple(),
            Self::Ice => cryo_logo_ice(),
        }
    }
}

impl fmt::Display for LogoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized logo variant name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown logo variant `{0}` (expected `simple` or `ice`)")]
pub struct UnknownVariant(pub String);

impl FromStr for LogoVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

fn placeholder(file: &str) -> String {
    format!("\n// Load from: shaders/cryo-logo/{file}\n// Or fetch from CDN: {CDN_BASE_URL}/{file}\n")
}

fn logo_attributes() -> Vec<ShaderAttribute> {
    [
        ("aPosition", AttributeType::Vec3),
        ("aUV", AttributeType::Vec2),
        ("aColor", AttributeType::Vec4),
    ]
    .into_iter()
    .zip(0u32..)
    .map(|((name, kind), location)| ShaderAttribute {
        name: name.to_owned(),
        kind,
        location,
    })
    .collect()
}

fn base_uniforms(animation_enabled: f32) -> Vec<ShaderUniform> {
    vec![
        ShaderUniform::new(
            "uCryoTexture",
            UniformValue::Sampler2D(LOGO_TEXTURE_URL.to_owned()),
        ),
        ShaderUniform::new("uModelViewProjection", UniformValue::Mat4(Matrix4::IDENTITY)),
        ShaderUniform::new("uTime", UniformValue::Float(0.0)),
        ShaderUniform::new("uAnimationEnabled", UniformValue::Float(animation_enabled)),
    ]
}

fn logo_program(id: &str, name: &str, variant: LogoVariant, uniforms: Vec<ShaderUniform>) -> ShaderProgram {
    ShaderProgram {
        id: id.to_owned(),
        name: Some(name.to_owned()),
        vertex_shader: placeholder(VERTEX_FILE),
        fragment_shader: placeholder(variant.fragment_file()),
        uniforms: Some(uniforms),
        attributes: Some(logo_attributes()),
        defines: None,
        extensions: None,
        shader_type: Some(ShaderType::Custom),
    }
}

/// Plain textured logo; animation disabled.
pub fn cryo_logo_simple() -> ShaderProgram {
    logo_program(
        "cryo-logo-simple",
        "Cryo Logo - Simple",
        LogoVariant::Simple,
        base_uniforms(0.0),
    )
}

/// Logo with ice glow and shimmer; animation enabled.
pub fn cryo_logo_ice() -> ShaderProgram {
    let mut uniforms = base_uniforms(1.0);
    uniforms.extend([
        ShaderUniform::new("uGlowIntensity", UniformValue::Float(0.3)),
        ShaderUniform::new("uIceOpacity", UniformValue::Float(1.0)),
        ShaderUniform::new("uGlowColor", UniformValue::Vec3(Vector3::new(0.4, 0.8, 1.0))),
        ShaderUniform::new("uShimmerSpeed", UniformValue::Float(2.0)),
        ShaderUniform::new("uShimmerIntensity", UniformValue::Float(0.5)),
    ]);
    logo_program(
        "cryo-logo-ice",
        "Cryo Logo - Ice Effects",
        LogoVariant::Ice,
        uniforms,
    )
}

/// Load the vertex and fragment sources for `variant` from `base_path` and
/// return the preset with those sources in place.
///
/// Sources are fetched one after the other; the first failure is returned.
pub async fn create_cryo_logo_shader<L>(
    loader: &L,
    variant: LogoVariant,
    base_path: &str,
) -> Result<ShaderProgram, LoadError>
where
    L: ShaderSourceLoader,
{
    let base = base_path.trim_end_matches('/');
    let vertex_shader = loader.load(&format!("{base}/{VERTEX_FILE}")).await?;
    let fragment_shader = loader
        .load(&format!("{base}/{}", variant.fragment_file()))
        .await?;
    Ok(ShaderProgram {
        vertex_shader,
        fragment_shader,
        ..variant.preset()
    })
}
