// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vector, matrix and color primitives.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Two-component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

/// Three-component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

/// Four-component vector (also used for quaternions, `w` last).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Vector2 {
    /// Build a vector from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vector3 {
    /// Build a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vector4 {
    /// Build a vector from components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// 4x4 matrix as 16 floats.
///
/// Element order is a contract with the consumer: the elements are kept in
/// exactly the order the producer sent them and are never transposed. The
/// bundled presets use WebGL's column-major layout.
///
/// On the wire this is `{"elements": [..16 floats..]}`; any other length is
/// rejected while decoding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Matrix4Wire", into = "Matrix4Wire")]
pub struct Matrix4 {
    elements: [f32; 16],
}

#[derive(Serialize, Deserialize)]
struct Matrix4Wire {
    elements: Vec<f32>,
}

impl Matrix4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Wrap 16 elements as-is.
    pub const fn new(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Copy a slice into a matrix, failing unless it holds exactly 16 floats.
    pub fn from_slice(elements: &[f32]) -> Result<Self, ValidationError> {
        let elements: [f32; 16] = elements
            .try_into()
            .map_err(|_| ValidationError::MatrixLength {
                len: elements.len(),
            })?;
        Ok(Self { elements })
    }

    /// The raw elements in producer order.
    pub const fn elements(&self) -> &[f32; 16] {
        &self.elements
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<Matrix4Wire> for Matrix4 {
    type Error = ValidationError;

    fn try_from(wire: Matrix4Wire) -> Result<Self, Self::Error> {
        Self::from_slice(&wire.elements)
    }
}

impl From<Matrix4> for Matrix4Wire {
    fn from(m: Matrix4) -> Self {
        Self {
            elements: m.elements.to_vec(),
        }
    }
}

/// RGBA color.
///
/// Channels are conventionally in `[0, 1]`; the type does not enforce it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Build a color from channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// True when every channel lies in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_requires_sixteen_elements() {
        assert_eq!(
            Matrix4::from_slice(&[0.0; 15]),
            Err(ValidationError::MatrixLength { len: 15 })
        );
        assert_eq!(
            Matrix4::from_slice(&[0.0; 17]),
            Err(ValidationError::MatrixLength { len: 17 })
        );
        assert!(Matrix4::from_slice(&[0.0; 16]).is_ok());
    }

    #[test]
    fn matrix_decode_rejects_wrong_length() {
        let short = r#"{"elements":[1,0,0,0,0,1,0,0,0,0,1,0,0,0,0]}"#;
        let err = serde_json::from_str::<Matrix4>(short).unwrap_err();
        assert!(err.to_string().contains("16 elements"), "{err}");

        let ok = r#"{"elements":[1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1]}"#;
        let m: Matrix4 = serde_json::from_str(ok).unwrap();
        assert_eq!(m, Matrix4::IDENTITY);
    }

    #[test]
    fn matrix_preserves_element_order() {
        let raw: Vec<f32> = (0..16u8).map(f32::from).collect();
        let m = Matrix4::from_slice(&raw).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Matrix4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back.elements().to_vec(), raw);
    }

    #[test]
    fn color_range_is_reported_not_enforced() {
        assert!(Color::WHITE.is_normalized());
        let hdr = Color::new(4.0, 0.5, 0.5, 1.0);
        assert!(!hdr.is_normalized());
        let json = serde_json::to_string(&hdr).unwrap();
        assert_eq!(serde_json::from_str::<Color>(&json).unwrap(), hdr);
    }
}
