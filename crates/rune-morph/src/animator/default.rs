//! Built-in animator for opacity and transform.
//!
//! Position and size in a target state become a translation and a scale on
//! top of the element's own transform, so the frame itself is never
//! touched. Positions are parent-space centers unless the state asks for
//! the container's space. Appearing elements run from the target state to their own
//! values; disappearing elements run the other way.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::Animator;
use crate::animation::{
    AnimatableProperty, AnimatableTransform, AnimatableValue, EasingFunction, PropertyTrack,
    TrackTiming,
};
use crate::context::{Role, TransitionContext};
use crate::scene::{ElementId, SceneGraph, TargetDuration, TargetState};

/// Values an element had before the animator touched it.
#[derive(Debug, Clone, Copy)]
struct Original {
    alpha: f32,
    transform: AnimatableTransform,
}

#[derive(Debug)]
pub struct DefaultAnimator {
    default_easing: EasingFunction,
    base_duration_ms: f32,
    tracks: Vec<PropertyTrack>,
    originals: HashMap<ElementId, Original>,
}

impl DefaultAnimator {
    pub fn new(default_easing: EasingFunction, base_duration_ms: f32) -> Self {
        Self {
            default_easing,
            base_duration_ms,
            tracks: Vec::new(),
            originals: HashMap::new(),
        }
    }

    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    fn timing(&self, state: &TargetState) -> TrackTiming {
        let duration_ms = match state.duration {
            Some(TargetDuration::Fixed { ms }) => ms,
            Some(TargetDuration::MatchLongest) | None => self.base_duration_ms,
        };
        TrackTiming::new(duration_ms.max(0.0))
            .with_delay(state.delay_ms.max(0.0))
            .with_easing(state.easing.unwrap_or(self.default_easing))
    }

    /// Own transform with the state's position, size and transform applied.
    fn target_transform(
        ctx: &TransitionContext,
        graph: &SceneGraph,
        id: ElementId,
        own: AnimatableTransform,
        state: &TargetState,
    ) -> AnimatableTransform {
        let mut target = own;
        let center = ctx
            .frame_in_space(graph, id, state.coordinate_space)
            .map(|frame| frame.center());
        if let (Some(position), Some(center)) = (state.position, center) {
            target = target.then(&AnimatableTransform::translate(
                position.x - center.x,
                position.y - center.y,
            ));
        }
        if let (Some(size), Some(element)) = (state.size, graph.get(id)) {
            let frame = element.frame;
            if frame.w > 0.0 && frame.h > 0.0 {
                target = target.then(&AnimatableTransform::scale(size.w / frame.w, size.h / frame.h));
            }
        }
        target.then(&state.transform.unwrap_or(AnimatableTransform::IDENTITY))
    }

    /// Build the tracks for one element and return when they end.
    fn animate_element(
        &mut self,
        ctx: &TransitionContext,
        graph: &SceneGraph,
        id: ElementId,
        role: Role,
    ) -> f32 {
        let (Some(element), Some(state)) = (graph.get(id), ctx.state(id)) else {
            return 0.0;
        };
        let own = Original {
            alpha: ctx.original_alpha(id).unwrap_or(element.alpha),
            transform: element.transform,
        };
        self.originals.entry(id).or_insert(own);

        let timing = self.timing(state);
        let appearing = role == Role::Appearing;
        let ordered = |own: AnimatableValue, target: AnimatableValue| {
            if appearing { (target, own) } else { (own, target) }
        };

        if let Some(opacity) = state.opacity {
            let (from, to) = ordered(own.alpha.into(), opacity.into());
            self.tracks
                .push(PropertyTrack::new(id, AnimatableProperty::Opacity, from, to, timing));
        }

        let target = Self::target_transform(ctx, graph, id, own.transform, state);
        if target != own.transform {
            let (from, to) = ordered(own.transform.into(), target.into());
            self.tracks
                .push(PropertyTrack::new(id, AnimatableProperty::Transform, from, to, timing));
        }

        trace!(element = %id, ?role, end_ms = timing.end_ms(), "default animator tracks");
        timing.end_ms()
    }

    fn restore(&mut self, graph: &mut SceneGraph) {
        for (id, original) in self.originals.drain() {
            if let Some(element) = graph.get_mut(id) {
                element.alpha = original.alpha;
                element.transform = original.transform;
            }
        }
        self.tracks.clear();
    }
}

fn write(graph: &mut SceneGraph, track: &PropertyTrack, value: &AnimatableValue) {
    let Some(element) = graph.get_mut(track.element) else {
        return;
    };
    match (track.property, value) {
        (AnimatableProperty::Opacity, AnimatableValue::F32 { value }) => element.alpha = *value,
        (AnimatableProperty::Transform, AnimatableValue::Transform { transform }) => {
            element.transform = *transform
        }
        _ => {}
    }
}

impl Animator for DefaultAnimator {
    fn name(&self) -> &str {
        "default"
    }

    fn can_animate(
        &self,
        ctx: &TransitionContext,
        _graph: &SceneGraph,
        element: ElementId,
        _role: Role,
    ) -> bool {
        ctx.state(element)
            .is_some_and(|state| state.has_visual_change() || state.force_animate)
    }

    fn animate(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &mut SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) -> f32 {
        let mut longest: f32 = 0.0;
        for &id in from {
            longest = longest.max(self.animate_element(ctx, graph, id, Role::Disappearing));
        }
        for &id in to {
            longest = longest.max(self.animate_element(ctx, graph, id, Role::Appearing));
        }
        debug!(tracks = self.tracks.len(), duration_ms = longest, "default animator ready");
        longest
    }

    fn seek(&mut self, graph: &mut SceneGraph, elapsed_ms: f32) {
        for track in &mut self.tracks {
            let value = track.seek(elapsed_ms);
            write(graph, track, &value);
        }
    }

    fn cancel(&mut self, graph: &mut SceneGraph) {
        for track in &mut self.tracks {
            track.cancel();
        }
        self.restore(graph);
    }

    fn clean(&mut self, graph: &mut SceneGraph) {
        self.restore(graph);
    }
}
