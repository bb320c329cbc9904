//! Interpolation between animatable values.

use super::types::{AnimatableTransform, AnimatableValue};

/// Types that can be blended between two values.
///
/// `t = 0.0` yields `self`, `t = 1.0` yields `to`; eased curves may overshoot.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for AnimatableTransform {
    /// Each component is interpolated independently.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
            rotate: lerp(self.rotate, to.rotate, t),
        }
    }
}

impl Interpolate for AnimatableValue {
    /// Mismatched variants snap to `to` once halfway.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::F32 { value: a }, Self::F32 { value: b }) => Self::F32 {
                value: a.interpolate(b, t),
            },
            (Self::Transform { transform: a }, Self::Transform { transform: b }) => {
                Self::Transform {
                    transform: a.interpolate(b, t),
                }
            }
            _ if t < 0.5 => self.clone(),
            _ => to.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_midpoint() {
        let from = AnimatableTransform::IDENTITY;
        let to = AnimatableTransform {
            translate_x: 100.0,
            translate_y: -50.0,
            scale_x: 2.0,
            scale_y: 0.0,
            rotate: 1.0,
        };
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid.translate_x, 50.0);
        assert_eq!(mid.translate_y, -25.0);
        assert_eq!(mid.scale_x, 1.5);
        assert_eq!(mid.scale_y, 0.5);
        assert_eq!(mid.rotate, 0.5);
    }

    #[test]
    fn test_mismatched_variants_snap() {
        let a = AnimatableValue::from(1.0);
        let b = AnimatableValue::from(AnimatableTransform::IDENTITY);
        assert_eq!(a.interpolate(&b, 0.2), a);
        assert_eq!(a.interpolate(&b, 0.8), b);
    }
}
