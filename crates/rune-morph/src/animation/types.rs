//! Core value types driven by animators.
//!
//! - `AnimatableTransform`: translate / scale / rotate applied on top of an element's frame
//! - `AnimatableProperty`: the element properties an animator can drive
//! - `AnimatableValue`: a value for one of those properties
//! - `AnimationState`: state of a single property track

use serde::{Deserialize, Serialize};

/// 2D transform applied around an element's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatableTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation in radians.
    pub rotate: f32,
}

impl Default for AnimatableTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AnimatableTransform {
    pub const IDENTITY: AnimatableTransform = AnimatableTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotate: 0.0,
    };

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(x: f32, y: f32) -> Self {
        Self {
            scale_x: x,
            scale_y: y,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(radians: f32) -> Self {
        Self {
            rotate: radians,
            ..Self::IDENTITY
        }
    }

    /// Component-wise composition: translations and rotations add, scales multiply.
    pub fn then(&self, other: &AnimatableTransform) -> Self {
        Self {
            translate_x: self.translate_x + other.translate_x,
            translate_y: self.translate_y + other.translate_y,
            scale_x: self.scale_x * other.scale_x,
            scale_y: self.scale_y * other.scale_y,
            rotate: self.rotate + other.rotate,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Element properties an animator can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatableProperty {
    Opacity,
    Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimatableValue {
    F32 {
        value: f32,
    },
    Transform {
        #[serde(flatten)]
        transform: AnimatableTransform,
    },
}

impl AnimatableValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32 { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<AnimatableTransform> {
        match self {
            Self::Transform { transform } => Some(*transform),
            _ => None,
        }
    }
}

impl From<f32> for AnimatableValue {
    fn from(value: f32) -> Self {
        Self::F32 { value }
    }
}

impl From<AnimatableTransform> for AnimatableValue {
    fn from(transform: AnimatableTransform) -> Self {
        Self::Transform { transform }
    }
}

/// State of one property track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Inside the track's delay.
    Pending,
    Running,
    Finished,
    Cancelled,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_composition() {
        let t = AnimatableTransform::translate(10.0, 5.0)
            .then(&AnimatableTransform::scale(2.0, 0.5))
            .then(&AnimatableTransform::translate(1.0, 1.0));
        assert_eq!(t.translate_x, 11.0);
        assert_eq!(t.translate_y, 6.0);
        assert_eq!(t.scale_x, 2.0);
        assert_eq!(t.scale_y, 0.5);
        assert!(!t.is_identity());
        assert!(AnimatableTransform::default().is_identity());
    }

    #[test]
    fn test_value_accessors() {
        let v = AnimatableValue::from(0.5);
        assert_eq!(v.as_f32(), Some(0.5));
        assert_eq!(v.as_transform(), None);
    }
}
