//! Timing curves for element animations.
//!
//! Besides the CSS keyword curves, the material curves used by the default
//! whole-scene animations are provided (`standard`, `deceleration`,
//! `acceleration`, `sharp`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Easing function for animation timing.
///
/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// `cubic-bezier(0.4, 0, 0.2, 1)`
    Standard,
    /// `cubic-bezier(0, 0, 0.2, 1)`
    Deceleration,
    /// `cubic-bezier(0.4, 0, 1, 1)`
    Acceleration,
    /// `cubic-bezier(0.4, 0, 0.6, 1)`
    Sharp,
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the curve at `t`; input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::Standard => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Self::Deceleration => cubic_bezier(0.0, 0.0, 0.2, 1.0, t),
            Self::Acceleration => cubic_bezier(0.4, 0.0, 1.0, 1.0, t),
            Self::Sharp => cubic_bezier(0.4, 0.0, 0.6, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Custom cubic bezier curve.
    ///
    /// # Panics
    /// Panics if `x1` or `x2` are outside `[0, 1]`.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }
}

/// Parses the keyword names accepted in `rune.toml`.
impl FromStr for EasingFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(Self::Linear),
            "ease" => Ok(Self::Ease),
            "ease-in" => Ok(Self::EaseIn),
            "ease-out" => Ok(Self::EaseOut),
            "ease-in-out" => Ok(Self::EaseInOut),
            "standard" => Ok(Self::Standard),
            "deceleration" => Ok(Self::Deceleration),
            "acceleration" => Ok(Self::Acceleration),
            "sharp" => Ok(Self::Sharp),
            other => Err(format!("unknown easing function '{other}'")),
        }
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_x(x1, x2, progress);
    sample(y1, y2, t)
}

/// Newton-Raphson on x(t), falling back to bisection when the slope is flat.
fn solve_x(x1: f32, x2: f32, target: f32) -> f32 {
    let mut t = target;
    for _ in 0..8 {
        let err = sample(x1, x2, t) - target;
        if err.abs() < 1e-6 {
            return t;
        }
        let slope = slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = target;
    for _ in 0..32 {
        let x = sample(x1, x2, t);
        if (x - target).abs() < 1e-6 {
            break;
        }
        if x < target {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}

/// One coordinate of the curve: 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn sample(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn slope(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
