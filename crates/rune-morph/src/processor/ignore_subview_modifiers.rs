//! Drops annotations below elements marked `IgnoreSubviewModifiers`.

use tracing::trace;

use super::Processor;
use crate::context::TransitionContext;
use crate::scene::{flatten, ElementId, SceneGraph};

#[derive(Debug, Default)]
pub struct IgnoreSubviewModifiersProcessor;

impl IgnoreSubviewModifiersProcessor {
    fn process_side(ctx: &mut TransitionContext, graph: &SceneGraph, elements: &[ElementId]) {
        for &id in elements {
            // Checked per element: an earlier ancestor may already have cleared it.
            let Some(recursive) = ctx.state(id).and_then(|s| s.ignore_subview_modifiers) else {
                continue;
            };
            let cleared: Vec<ElementId> = if recursive {
                flatten(graph, id).into_iter().skip(1).collect()
            } else {
                graph.children(id).to_vec()
            };
            trace!(element = %id, recursive, cleared = cleared.len(), "ignoring subview modifiers");
            for child in cleared {
                ctx.clear_state(child);
            }
        }
    }
}

impl Processor for IgnoreSubviewModifiersProcessor {
    fn name(&self) -> &str {
        "ignore_subview_modifiers"
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) {
        Self::process_side(ctx, graph, from);
        Self::process_side(ctx, graph, to);
    }
}
