//! Resolves `source` annotations into container-space geometry.
//!
//! An element whose state names a source identifier takes the position,
//! size and transform of the element carrying that identifier on the other
//! side of the transition.

use tracing::trace;

use super::Processor;
use crate::context::TransitionContext;
use crate::scene::{CoordinateSpace, ElementId, SceneGraph};

#[derive(Debug, Default)]
pub struct SourceProcessor;

impl SourceProcessor {
    fn prepare(ctx: &mut TransitionContext, graph: &SceneGraph, id: ElementId, target: ElementId) {
        let container = ctx.container();
        let (Some(element), Some(target_frame)) = (graph.get(id), graph.frame_in(container, target))
        else {
            return;
        };
        let target_transform = graph.get(target).map(|e| e.transform).unwrap_or_default();

        let state = ctx.state_entry(id);
        state.coordinate_space = CoordinateSpace::Global;
        state.position = Some(target_frame.center());
        state.size = (element.frame.size() != target_frame.size()).then(|| target_frame.size());
        state.transform = (!target_transform.is_identity()).then_some(target_transform);
        trace!(element = %id, target = %target, "source geometry resolved");
    }
}

impl Processor for SourceProcessor {
    fn name(&self) -> &str {
        "source"
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) {
        for &id in from.iter().chain(to) {
            let Some(source) = ctx.state(id).and_then(|s| s.source.clone()) else {
                continue;
            };
            if let Some(target) = ctx.counterpart_for(id, &source) {
                Self::prepare(ctx, graph, id, target);
            }
        }
    }
}
