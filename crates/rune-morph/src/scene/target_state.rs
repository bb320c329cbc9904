//! Accumulated per-element annotation read by animators.
//!
//! For appearing elements the target state is where the element animates
//! *from*; for disappearing elements it is where the element animates *to*.

use serde::{Deserialize, Serialize};

use super::modifier::{Cascade, Modifier};
use crate::animation::{AnimatableTransform, EasingFunction};
use crate::geometry::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetDuration {
    Fixed { ms: f32 },
    MatchLongest,
}

impl TargetDuration {
    pub fn fixed_ms(&self) -> Option<f32> {
        match self {
            Self::Fixed { ms } => Some(*ms),
            Self::MatchLongest => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    #[default]
    Local,
    /// Position values are container-space coordinates.
    Global,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub opacity: Option<f32>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub transform: Option<AnimatableTransform>,
    pub duration: Option<TargetDuration>,
    pub delay_ms: f32,
    pub easing: Option<EasingFunction>,
    pub source: Option<String>,
    pub cascade: Option<Cascade>,
    /// `Some(recursive)` when subview modifiers should be dropped.
    pub ignore_subview_modifiers: Option<bool>,
    pub force_animate: bool,
    pub non_fade: bool,
    pub coordinate_space: CoordinateSpace,
}

impl TargetState {
    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> Self {
        let mut state = Self::default();
        for modifier in modifiers {
            state.apply(modifier);
        }
        state
    }

    pub fn apply(&mut self, modifier: &Modifier) {
        match modifier {
            Modifier::Fade => self.opacity = Some(0.0),
            Modifier::Opacity { value } => self.opacity = Some(*value),
            Modifier::Position { x, y } => self.position = Some(Point::new(*x, *y)),
            Modifier::Size { w, h } => self.size = Some(Size::new(*w, *h)),
            Modifier::Translate { x, y } => self.compose(AnimatableTransform::translate(*x, *y)),
            Modifier::Scale { x, y } => self.compose(AnimatableTransform::scale(*x, *y)),
            Modifier::Rotate { radians } => self.compose(AnimatableTransform::rotate(*radians)),
            Modifier::Duration { ms } => self.duration = Some(TargetDuration::Fixed { ms: *ms }),
            Modifier::DurationMatchLongest => self.duration = Some(TargetDuration::MatchLongest),
            Modifier::Delay { ms } => self.delay_ms = *ms,
            Modifier::Easing { easing } => self.easing = Some(*easing),
            Modifier::Source { id } => self.source = Some(id.clone()),
            Modifier::Cascade(cascade) => self.cascade = Some(*cascade),
            Modifier::IgnoreSubviewModifiers { recursive } => {
                self.ignore_subview_modifiers = Some(*recursive)
            }
            Modifier::ForceAnimate => self.force_animate = true,
            Modifier::ForceNonFade => self.non_fade = true,
            Modifier::UseGlobalCoordinateSpace => self.coordinate_space = CoordinateSpace::Global,
        }
    }

    pub fn append(&mut self, modifiers: impl IntoIterator<Item = Modifier>) {
        for modifier in modifiers {
            self.apply(&modifier);
        }
    }

    /// Carries anything an animator could interpolate.
    pub fn has_visual_change(&self) -> bool {
        self.opacity.is_some()
            || self.position.is_some()
            || self.size.is_some()
            || self.transform.is_some()
    }

    fn compose(&mut self, next: AnimatableTransform) {
        let current = self.transform.unwrap_or(AnimatableTransform::IDENTITY);
        self.transform = Some(current.then(&next));
    }
}
