// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shallow uniform patching.

use cryo_protocol::{ShaderProgram, ShaderUniform, UniformKind, UniformValueFields};
use serde::{Deserialize, Serialize};

use crate::PatchError;

/// Partial uniform: any subset of `name`, `type` and one `value_*` field.
///
/// Deserializes from the same wire shape as a uniform, e.g.
/// `{"value_float": 0.7}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformPatch {
    /// New name for the uniform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New declared kind.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<UniformKind>,
    /// Replacement payload.
    #[serde(flatten)]
    pub values: UniformValueFields,
}

impl UniformPatch {
    /// Patch that only sets `value_float`.
    pub fn float(value: f32) -> Self {
        Self {
            values: UniformValueFields {
                value_float: Some(value),
                ..UniformValueFields::default()
            },
            ..Self::default()
        }
    }
}

/// Merge `patch` onto the first uniform of `program` named `name`.
///
/// Returns a new program; the uniform list keeps its length and order, and
/// every other uniform and program field is unchanged. A missing uniform is an
/// error rather than a silent no-op, and a rename may not collide with another
/// uniform of the program.
pub fn patch_uniform(
    program: &ShaderProgram,
    name: &str,
    patch: &UniformPatch,
) -> Result<ShaderProgram, PatchError> {
    let index = program
        .uniforms()
        .iter()
        .position(|u| u.name == name)
        .ok_or_else(|| PatchError::UniformNotFound {
            shader: program.id.clone(),
            name: name.to_owned(),
        })?;
    let current = &program.uniforms()[index];
    let declared = patch.kind.unwrap_or_else(|| current.kind());

    let value = match patch.values.clone().into_single() {
        Err(fields) => {
            return Err(PatchError::Ambiguous {
                name: name.to_owned(),
                fields,
            })
        }
        Ok(None) if declared == current.kind() => current.value.clone(),
        Ok(None) => {
            return Err(PatchError::MissingValue {
                name: name.to_owned(),
                declared,
            })
        }
        Ok(Some(value)) if value.kind() == declared => value,
        Ok(Some(value)) => {
            return Err(PatchError::KindMismatch {
                name: name.to_owned(),
                declared,
                found: value.kind(),
            })
        }
    };

    if let Some(rename) = patch.name.as_deref() {
        let taken = program
            .uniforms()
            .iter()
            .enumerate()
            .any(|(i, u)| i != index && u.name == rename);
        if taken {
            return Err(PatchError::NameConflict {
                shader: program.id.clone(),
                name: name.to_owned(),
                rename: rename.to_owned(),
            });
        }
    }

    let patched = ShaderUniform {
        name: patch.name.clone().unwrap_or_else(|| current.name.clone()),
        value,
    };
    let mut next = program.clone();
    if let Some(uniforms) = next.uniforms.as_mut() {
        uniforms[index] = patched;
    }
    Ok(next)
}
