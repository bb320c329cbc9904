//! Pairs from/to elements that share a matching identifier.
//!
//! A match is a two-way source: both sides get `source = id`, the source
//! side adopts the destination's timing, and opacity is arranged so the
//! element on top fades while the one below stays put. Non-opaque pairs
//! crossfade unless either side forces non-fade.

use tracing::trace;

use super::Processor;
use crate::context::TransitionContext;
use crate::scene::{ElementId, SceneGraph};

#[derive(Debug, Default)]
pub struct MatchProcessor;

fn is_opaque(ctx: &TransitionContext, graph: &SceneGraph, id: ElementId) -> bool {
    graph.get(id).is_some_and(|element| {
        let alpha = ctx.original_alpha(id).unwrap_or(element.alpha);
        element.opaque && alpha >= 1.0
    })
}

impl Processor for MatchProcessor {
    fn name(&self) -> &str {
        "match"
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        _from: &[ElementId],
        to: &[ElementId],
    ) {
        for &to_id in to {
            let Some(morph_id) = ctx.morph_id(to_id).map(str::to_owned) else {
                continue;
            };
            let Some(from_id) = ctx.source_element(&morph_id) else {
                continue;
            };

            let mut to_state = ctx.state(to_id).cloned().unwrap_or_default();
            let mut from_state = ctx.state(from_id).cloned().unwrap_or_default();

            to_state.source = Some(morph_id.clone());
            from_state.source = Some(morph_id.clone());
            from_state.duration = to_state.duration;
            from_state.delay_ms = to_state.delay_ms;
            from_state.easing = to_state.easing;

            let crossfade = !(to_state.non_fade || from_state.non_fade)
                && !(is_opaque(ctx, graph, from_id) && is_opaque(ctx, graph, to_id));

            if ctx.insert_to_first() {
                from_state.opacity = Some(0.0);
                to_state.opacity = crossfade.then_some(0.0);
            } else {
                to_state.opacity = Some(0.0);
                from_state.opacity = crossfade.then_some(0.0);
            }

            trace!(%morph_id, from = %from_id, to = %to_id, crossfade, "matched elements");
            ctx.set_state(to_id, to_state);
            ctx.set_state(from_id, from_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::processor::test_support::Scenes;
    use crate::scene::{Element, Modifier, TargetDuration};

    fn card() -> Element {
        Element::new(Rect::new(0.0, 0.0, 50.0, 50.0)).with_morph_id("card")
    }

    #[test]
    fn test_opaque_pair_fades_only_the_top_element() {
        let mut s = Scenes::new();
        let from = s.add(s.from_root, card());
        let to = s.add(
            s.to_root,
            card().with_modifiers([Modifier::Duration { ms: 450.0 }, Modifier::Delay { ms: 30.0 }]),
        );

        let mut ctx = s.context(false);
        s.run(&mut MatchProcessor, &mut ctx);

        let to_state = ctx.state(to).unwrap();
        let from_state = ctx.state(from).unwrap();
        assert_eq!(to_state.source.as_deref(), Some("card"));
        assert_eq!(from_state.source.as_deref(), Some("card"));
        assert_eq!(to_state.opacity, Some(0.0));
        assert_eq!(from_state.opacity, None);
        assert_eq!(from_state.duration, Some(TargetDuration::Fixed { ms: 450.0 }));
        assert_eq!(from_state.delay_ms, 30.0);
    }

    #[test]
    fn test_insert_to_first_fades_the_source() {
        let mut s = Scenes::new();
        let from = s.add(s.from_root, card());
        let to = s.add(s.to_root, card());

        let mut ctx = s.context(true);
        s.run(&mut MatchProcessor, &mut ctx);

        assert_eq!(ctx.state(from).unwrap().opacity, Some(0.0));
        assert_eq!(ctx.state(to).unwrap().opacity, None);
    }

    #[test]
    fn test_non_opaque_pair_crossfades_unless_forced() {
        let mut s = Scenes::new();
        let from = s.add(s.from_root, card().with_alpha(0.5));
        let to = s.add(s.to_root, card());

        let mut ctx = s.context(false);
        s.run(&mut MatchProcessor, &mut ctx);
        assert_eq!(ctx.state(from).unwrap().opacity, Some(0.0));
        assert_eq!(ctx.state(to).unwrap().opacity, Some(0.0));

        let mut s = Scenes::new();
        let from = s.add(s.from_root, card().with_opaque(false));
        s.add(s.to_root, card().with_modifiers([Modifier::ForceNonFade]));

        let mut ctx = s.context(false);
        s.run(&mut MatchProcessor, &mut ctx);
        assert_eq!(ctx.state(from).unwrap().opacity, None);
    }

    #[test]
    fn test_unmatched_elements_are_untouched() {
        let mut s = Scenes::new();
        let lonely = s.add(s.to_root, card());
        let other = s.add(
            s.from_root,
            Element::new(Rect::new(0.0, 0.0, 5.0, 5.0)).with_morph_id("other"),
        );

        let mut ctx = s.context(false);
        s.run(&mut MatchProcessor, &mut ctx);
        assert!(ctx.state(lonely).is_none());
        assert!(ctx.state(other).is_none());
    }
}
