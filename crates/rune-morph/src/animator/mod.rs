//! Animator pipeline.
//!
//! After processing, each element is offered to the animators in order and
//! the first one whose [`Animator::can_animate`] returns `true` owns it for
//! the rest of the transition. Elements nobody claims stay still.

pub mod default;

pub use default::DefaultAnimator;

use tracing::trace;

use crate::context::{Role, TransitionContext};
use crate::scene::{ElementId, SceneGraph};

pub trait Animator {
    fn name(&self) -> &str;

    fn can_animate(
        &self,
        ctx: &TransitionContext,
        graph: &SceneGraph,
        element: ElementId,
        role: Role,
    ) -> bool;

    /// Prepare tracks for the claimed elements and return how long they
    /// run in milliseconds, delays included.
    fn animate(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &mut SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) -> f32;

    /// Write the values at `elapsed_ms` into the graph.
    fn seek(&mut self, _graph: &mut SceneGraph, _elapsed_ms: f32) {}

    /// Stop and put every touched element back the way it was.
    fn cancel(&mut self, _graph: &mut SceneGraph) {}

    /// Release per-transition state after completion.
    fn clean(&mut self, _graph: &mut SceneGraph) {}
}

/// Elements owned by one animator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claim {
    pub from: Vec<ElementId>,
    pub to: Vec<ElementId>,
}

impl Claim {
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

/// Assign each element to the first animator that claims it.
///
/// Returns one [`Claim`] per animator, in animator order.
pub fn claim(
    animators: &[Box<dyn Animator>],
    ctx: &TransitionContext,
    graph: &SceneGraph,
    from: &[ElementId],
    to: &[ElementId],
) -> Vec<Claim> {
    let mut claims = vec![Claim::default(); animators.len()];
    let sides = [(Role::Disappearing, from), (Role::Appearing, to)];
    for (role, elements) in sides {
        for &id in elements {
            let Some(index) = animators
                .iter()
                .position(|animator| animator.can_animate(ctx, graph, id, role))
            else {
                continue;
            };
            trace!(element = %id, ?role, animator = animators[index].name(), "claimed");
            let claim = &mut claims[index];
            match role {
                Role::Disappearing => claim.from.push(id),
                Role::Appearing => claim.to.push(id),
            }
        }
    }
    claims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::processor::test_support::Scenes;
    use crate::scene::Element;

    /// Claims whatever `accept` says and records nothing.
    struct Picky {
        name: &'static str,
        accept: fn(ElementId, Role) -> bool,
    }

    impl Animator for Picky {
        fn name(&self) -> &str {
            self.name
        }

        fn can_animate(&self, _: &TransitionContext, _: &SceneGraph, id: ElementId, role: Role) -> bool {
            (self.accept)(id, role)
        }

        fn animate(
            &mut self,
            _: &mut TransitionContext,
            _: &mut SceneGraph,
            _: &[ElementId],
            _: &[ElementId],
        ) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_first_claim_wins() {
        let mut s = Scenes::new();
        s.add(s.to_root, Element::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let ctx = s.context(false);

        let animators: Vec<Box<dyn Animator>> = vec![
            Box::new(Picky { name: "appearing", accept: |_, role| role == Role::Appearing }),
            Box::new(Picky { name: "all", accept: |_, _| true }),
        ];
        let claims = claim(
            &animators,
            &ctx,
            &s.host.graph,
            ctx.from_elements(),
            ctx.to_elements(),
        );

        assert_eq!(claims[0].from, Vec::<ElementId>::new());
        assert_eq!(claims[0].to, ctx.to_elements());
        assert_eq!(claims[1].from, vec![s.from_root]);
        assert!(claims[1].to.is_empty());
    }

    #[test]
    fn test_unclaimed_elements_are_dropped() {
        let mut s = Scenes::new();
        let ctx = s.context(false);
        let animators: Vec<Box<dyn Animator>> =
            vec![Box::new(Picky { name: "never", accept: |_, _| false })];
        let claims = claim(&animators, &ctx, &s.host.graph, ctx.from_elements(), ctx.to_elements());
        assert!(claims.iter().all(Claim::is_empty));
    }
}
