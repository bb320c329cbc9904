//! Per-element animation modifiers.
//!
//! Modifiers are attached to elements by the host and folded into a
//! [`TargetState`](super::TargetState) when the transition context is built.
//! Processors append further modifiers or edit the target state directly.
//!
//! # Example
//!
//! ```
//! use rune_morph::scene::{CascadeDirection, Modifier};
//!
//! let modifiers = vec![
//!     Modifier::Fade,
//!     Modifier::Translate { x: 0.0, y: 40.0 },
//!     Modifier::cascade(20.0, CascadeDirection::TopToBottom),
//! ];
//! assert_eq!(modifiers.len(), 3);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::animation::EasingFunction;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    /// Shorthand for `Opacity { value: 0.0 }`.
    Fade,
    Opacity { value: f32 },
    /// Container-space center.
    Position { x: f32, y: f32 },
    Size { w: f32, h: f32 },
    Translate { x: f32, y: f32 },
    Scale { x: f32, y: f32 },
    Rotate { radians: f32 },
    Duration { ms: f32 },
    /// Resolve to the longest duration computed for the transition.
    DurationMatchLongest,
    Delay { ms: f32 },
    Easing { easing: EasingFunction },
    /// Morph from/to the element with this matching identifier.
    Source { id: String },
    Cascade(Cascade),
    IgnoreSubviewModifiers { recursive: bool },
    /// Claim the element for animation even without a visual change.
    ForceAnimate,
    /// Never crossfade when matched.
    ForceNonFade,
    UseGlobalCoordinateSpace,
}

impl Modifier {
    /// Cascade with unmatched-only delays.
    pub fn cascade(delta_ms: f32, direction: CascadeDirection) -> Self {
        Self::Cascade(Cascade {
            delta_ms,
            direction,
            delay_matched: false,
        })
    }
}

/// Staggered delays applied to an element's children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    pub delta_ms: f32,
    pub direction: CascadeDirection,
    /// Matched pairs start after the whole cascade instead of joining it.
    pub delay_matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CascadeDirection {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
    Radial { center: Point },
    InverseRadial { center: Point },
}

impl CascadeDirection {
    /// Ordering of two sibling frames, earliest first.
    pub fn compare(&self, a: &Rect, b: &Rect) -> Ordering {
        let cmp = |x: f32, y: f32| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match self {
            Self::TopToBottom => cmp(a.y, b.y),
            Self::BottomToTop => cmp(b.y + b.h, a.y + a.h),
            Self::LeftToRight => cmp(a.x, b.x),
            Self::RightToLeft => cmp(b.x + b.w, a.x + a.w),
            Self::Radial { center } => cmp(a.center().distance(*center), b.center().distance(*center)),
            Self::InverseRadial { center } => {
                cmp(b.center().distance(*center), a.center().distance(*center))
            }
        }
    }
}
