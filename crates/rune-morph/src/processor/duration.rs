//! Resolves element durations.
//!
//! Elements without an explicit duration get one derived from how far they
//! travel; `MatchLongest` is then pinned to the longest duration seen.

use tracing::trace;

use super::Processor;
use crate::animation::AnimatableTransform;
use crate::context::TransitionContext;
use crate::geometry::{Point, Size};
use crate::scene::{ElementId, SceneGraph, TargetDuration, TargetState};

/// Travel beyond this many points no longer lengthens the animation.
const MAX_MOVEMENT: f32 = 500.0;

#[derive(Debug)]
pub struct DurationProcessor {
    base_duration_ms: f32,
}

impl DurationProcessor {
    pub fn new(base_duration_ms: f32) -> Self {
        Self { base_duration_ms: base_duration_ms.max(0.0) }
    }

    /// `base + movement / 3` with movement clamped to [`MAX_MOVEMENT`].
    pub fn optimized_duration(&self, movement: f32) -> f32 {
        self.base_duration_ms + movement.clamp(0.0, MAX_MOVEMENT) / 3.0
    }

    fn movement(
        ctx: &TransitionContext,
        graph: &SceneGraph,
        id: ElementId,
        state: &TargetState,
    ) -> f32 {
        let frame = ctx.frame_in_space(graph, id, state.coordinate_space);
        let (Some(element), Some(center)) = (graph.get(id), frame.map(|f| f.center())) else {
            return 0.0;
        };
        let own = element.transform;
        let target = state.transform.unwrap_or(AnimatableTransform::IDENTITY);

        let from_pos = Point::new(center.x + own.translate_x, center.y + own.translate_y);
        let to_base = state.position.unwrap_or(center);
        let to_pos = Point::new(to_base.x + target.translate_x, to_base.y + target.translate_y);

        let size = element.frame.size();
        let from_size = Size::new(size.w * own.scale_x, size.h * own.scale_y);
        let to_size = state.size.unwrap_or(size);
        let to_size = Size::new(to_size.w * target.scale_x, to_size.h * target.scale_y);

        from_pos.distance(to_pos) + from_size.as_point().distance(to_size.as_point())
    }
}

impl Processor for DurationProcessor {
    fn name(&self) -> &str {
        "duration"
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) {
        let mut longest: f32 = 0.0;
        let mut match_longest = Vec::new();

        for &id in from.iter().chain(to) {
            let Some(state) = ctx.state(id) else {
                continue;
            };
            let (current, movement) = (state.duration, Self::movement(ctx, graph, id, state));
            let duration = match current {
                Some(TargetDuration::Fixed { ms }) => ms,
                Some(TargetDuration::MatchLongest) => {
                    match_longest.push(id);
                    self.optimized_duration(movement)
                }
                None => {
                    let ms = self.optimized_duration(movement);
                    trace!(element = %id, ms, "derived duration");
                    if let Some(state) = ctx.state_mut(id) {
                        state.duration = Some(TargetDuration::Fixed { ms });
                    }
                    ms
                }
            };
            longest = longest.max(duration);
        }

        for id in match_longest {
            if let Some(state) = ctx.state_mut(id) {
                state.duration = Some(TargetDuration::Fixed { ms: longest });
            }
        }
    }
}
