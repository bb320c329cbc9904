//! Whole-scene animation for the two roots.
//!
//! Roots that already carry an explicit visual change are left alone. The
//! chosen animation may flip the insertion order, but only while the
//! ordering strategy is [`ViewOrderingStrategy::Auto`].

use tracing::debug;

use super::Processor;
use crate::animation::EasingFunction;
use crate::context::TransitionContext;
use crate::geometry::Size;
use crate::options::{DefaultAnimation, Direction, Presentation, ViewOrderingStrategy};
use crate::scene::{ElementId, Modifier, SceneGraph};

const ZOOM_IN: f32 = 1.3;
const ZOOM_OUT: f32 = 0.7;

#[derive(Debug)]
pub struct DefaultAnimationProcessor {
    animation: DefaultAnimation,
    ordering: ViewOrderingStrategy,
    presentation: Presentation,
}

/// Modifiers for both roots plus the insertion order the animation wants.
#[derive(Debug, Default, PartialEq)]
struct Plan {
    to: Vec<Modifier>,
    from: Vec<Modifier>,
    insert_to_first: Option<bool>,
}

/// Offset that moves an element fully out of view towards `direction`.
fn shift(direction: Direction, appearing: bool, size: Size) -> (f32, f32) {
    match direction {
        Direction::Left | Direction::Right => {
            let x = if (direction == Direction::Right) == appearing { -size.w } else { size.w };
            (x, 0.0)
        }
        Direction::Up | Direction::Down => {
            let y = if (direction == Direction::Down) == appearing { -size.h } else { size.h };
            (0.0, y)
        }
    }
}

fn translate((x, y): (f32, f32), factor: f32) -> Modifier {
    Modifier::Translate { x: x * factor, y: y * factor }
}

fn scale(factor: f32) -> Modifier {
    Modifier::Scale { x: factor, y: factor }
}

fn easing(easing: EasingFunction) -> Modifier {
    Modifier::Easing { easing }
}

impl DefaultAnimationProcessor {
    pub fn new(
        animation: DefaultAnimation,
        ordering: ViewOrderingStrategy,
        presentation: Presentation,
    ) -> Self {
        Self { animation, ordering, presentation }
    }

    /// Resolve `Auto` against the presentation.
    fn resolved(&self) -> DefaultAnimation {
        match self.animation {
            DefaultAnimation::Auto if self.presentation.in_navigation => {
                if self.presentation.presenting {
                    DefaultAnimation::Push(Direction::Left)
                } else {
                    DefaultAnimation::Pull(Direction::Right)
                }
            }
            DefaultAnimation::Auto if self.presentation.embedded_in_tab_container => {
                if self.presentation.presenting {
                    DefaultAnimation::Slide(Direction::Left)
                } else {
                    DefaultAnimation::Slide(Direction::Right)
                }
            }
            DefaultAnimation::Auto => DefaultAnimation::Fade,
            other => other,
        }
    }

    fn plan(&self, size: Size) -> Plan {
        match self.resolved() {
            DefaultAnimation::Push(dir) => Plan {
                to: vec![translate(shift(dir, true, size), 1.0), easing(EasingFunction::Deceleration)],
                from: vec![
                    translate(shift(dir, false, size), 1.0 / 3.0),
                    easing(EasingFunction::Deceleration),
                ],
                insert_to_first: Some(false),
            },
            DefaultAnimation::Pull(dir) => Plan {
                to: vec![translate(shift(dir, true, size), 1.0 / 3.0)],
                from: vec![translate(shift(dir, false, size), 1.0)],
                insert_to_first: Some(true),
            },
            DefaultAnimation::Cover(dir) => Plan {
                to: vec![translate(shift(dir, true, size), 1.0)],
                from: Vec::new(),
                insert_to_first: Some(false),
            },
            DefaultAnimation::Uncover(dir) => Plan {
                to: Vec::new(),
                from: vec![translate(shift(dir, false, size), 1.0)],
                insert_to_first: Some(true),
            },
            DefaultAnimation::Slide(dir) => Plan {
                to: vec![translate(shift(dir, true, size), 1.0), easing(EasingFunction::Standard)],
                from: vec![translate(shift(dir, false, size), 1.0), easing(EasingFunction::Standard)],
                insert_to_first: Some(false),
            },
            DefaultAnimation::Zoom => Plan {
                to: vec![scale(ZOOM_IN), Modifier::Fade],
                from: vec![scale(ZOOM_OUT)],
                insert_to_first: Some(false),
            },
            DefaultAnimation::ZoomOut => Plan {
                to: vec![scale(ZOOM_OUT)],
                from: vec![scale(ZOOM_IN), Modifier::Fade],
                insert_to_first: Some(true),
            },
            DefaultAnimation::Fade => Plan {
                to: vec![Modifier::Fade],
                from: vec![Modifier::Fade],
                insert_to_first: None,
            },
            DefaultAnimation::None | DefaultAnimation::Auto => Plan::default(),
        }
    }

    fn apply(ctx: &mut TransitionContext, root: ElementId, mut modifiers: Vec<Modifier>) {
        if modifiers.is_empty() || ctx.state(root).is_some_and(|s| s.has_visual_change()) {
            return;
        }
        modifiers.push(Modifier::DurationMatchLongest);
        ctx.state_entry(root).append(modifiers);
    }
}

impl Processor for DefaultAnimationProcessor {
    fn name(&self) -> &str {
        "default_animation"
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        _from: &[ElementId],
        _to: &[ElementId],
    ) {
        let size = graph
            .get(ctx.to_root())
            .map(|root| root.frame.size())
            .unwrap_or_default();
        let plan = self.plan(size);
        debug!(animation = ?self.resolved(), ?size, "applying default animation");

        if self.ordering == ViewOrderingStrategy::Auto {
            if let Some(insert_to_first) = plan.insert_to_first {
                ctx.set_insert_to_first(insert_to_first);
            }
        }

        let (from_root, to_root) = (ctx.from_root(), ctx.to_root());
        Self::apply(ctx, to_root, plan.to);
        Self::apply(ctx, from_root, plan.from);
    }
}
