//! Staggers delays down a parent's children.
//!
//! Children are ordered by the cascade direction; the i-th child subtree is
//! delayed by `initial + i * delta`. Matched elements keep their own delay
//! unless `delay_matched` is set, in which case both sides of the pair start
//! once the whole cascade has started. Only elements that already carry a
//! target state are affected.

use tracing::trace;

use super::Processor;
use crate::context::TransitionContext;
use crate::scene::{flatten, ElementId, SceneGraph};

#[derive(Debug, Default)]
pub struct CascadeProcessor;

impl CascadeProcessor {
    fn process_side(ctx: &mut TransitionContext, graph: &SceneGraph, elements: &[ElementId]) {
        for &id in elements {
            let Some((cascade, initial_delay)) = ctx
                .state(id)
                .and_then(|s| s.cascade.map(|cascade| (cascade, s.delay_ms)))
            else {
                continue;
            };

            let frame_of = |id: &ElementId| graph.get(*id).map(|e| e.frame).unwrap_or_default();
            let mut children = graph.children(id).to_vec();
            children.sort_by(|a, b| cascade.direction.compare(&frame_of(a), &frame_of(b)));

            let final_delay = initial_delay + children.len() as f32 * cascade.delta_ms;
            trace!(element = %id, children = children.len(), final_delay, "cascading delays");

            for (i, child) in children.into_iter().enumerate() {
                let delay = initial_delay + i as f32 * cascade.delta_ms;
                for element in flatten(graph, child) {
                    match ctx.paired_element(element) {
                        None => {
                            if let Some(state) = ctx.state_mut(element) {
                                state.delay_ms = delay;
                            }
                        }
                        Some(paired) if cascade.delay_matched => {
                            for side in [element, paired] {
                                if let Some(state) = ctx.state_mut(side) {
                                    state.delay_ms = final_delay;
                                }
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
        }
    }
}

impl Processor for CascadeProcessor {
    fn name(&self) -> &str {
        "cascade"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::processor::test_support::Scenes;
    use crate::processor::MatchProcessor;
    use crate::scene::{Cascade, CascadeDirection, Element, Modifier};

    fn row(y: f32) -> Element {
        Element::new(Rect::new(0.0, y, 320.0, 40.0)).with_modifiers([Modifier::Fade])
    }

    #[test]
    fn test_top_to_bottom_stagger() {
        let mut s = Scenes::new();
        let list = s.add(
            s.to_root,
            Element::new(Rect::new(0.0, 0.0, 320.0, 480.0)).with_modifiers([
                Modifier::Delay { ms: 100.0 },
                Modifier::cascade(20.0, CascadeDirection::TopToBottom),
            ]),
        );
        // Inserted out of visual order on purpose.
        let third = s.add(list, row(80.0));
        let first = s.add(list, row(0.0));
        let second = s.add(list, row(40.0));
        let icon = s.add(second, row(0.0));
        let bare = s.add(first, Element::new(Rect::new(0.0, 0.0, 4.0, 4.0)));

        let mut ctx = s.context(false);
        s.run(&mut CascadeProcessor, &mut ctx);

        assert_eq!(ctx.state(first).unwrap().delay_ms, 100.0);
        assert_eq!(ctx.state(second).unwrap().delay_ms, 120.0);
        assert_eq!(ctx.state(icon).unwrap().delay_ms, 120.0);
        assert_eq!(ctx.state(third).unwrap().delay_ms, 140.0);
        assert!(ctx.state(bare).is_none());
    }

    #[test]
    fn test_matched_children_wait_for_cascade_when_requested() {
        let mut s = Scenes::new();
        let list = s.add(
            s.to_root,
            Element::new(Rect::new(0.0, 0.0, 320.0, 480.0)).with_modifiers([Modifier::Cascade(
                Cascade {
                    delta_ms: 10.0,
                    direction: CascadeDirection::TopToBottom,
                    delay_matched: true,
                },
            )]),
        );
        s.add(list, row(0.0));
        let matched_to = s.add(list, row(40.0).with_morph_id("title"));
        let matched_from = s.add(s.from_root, row(0.0).with_morph_id("title"));

        let mut ctx = s.context(false);
        s.run(&mut MatchProcessor, &mut ctx);
        s.run(&mut CascadeProcessor, &mut ctx);

        assert_eq!(ctx.state(matched_to).unwrap().delay_ms, 20.0);
        assert_eq!(ctx.state(matched_from).unwrap().delay_ms, 20.0);
    }

    #[test]
    fn test_matched_children_keep_delay_by_default() {
        let mut s = Scenes::new();
        let list = s.add(
            s.to_root,
            Element::new(Rect::new(0.0, 0.0, 320.0, 480.0))
                .with_modifiers([Modifier::cascade(10.0, CascadeDirection::BottomToTop)]),
        );
        s.add(list, row(0.0));
        let matched = s.add(list, row(40.0).with_morph_id("title"));
        s.add(s.from_root, row(0.0).with_morph_id("title"));

        let mut ctx = s.context(false);
        s.run(&mut CascadeProcessor, &mut ctx);
        assert_eq!(ctx.state(matched).unwrap().delay_ms, 0.0);
    }
}
