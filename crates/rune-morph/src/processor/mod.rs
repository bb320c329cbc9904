//! Processor pipeline.
//!
//! Processors run once, in a fixed order, after the context is built and
//! before any animator is consulted. Each one sees the full from/to element
//! lists and may only edit annotations in the context; the lists themselves
//! are never shortened.
//!
//! ```text
//! ignore_subview_modifiers → match → source → cascade → default_animation → duration → plugins…
//! ```

pub mod cascade;
pub mod default_animation;
pub mod duration;
pub mod ignore_subview_modifiers;
pub mod matching;
pub mod source;

pub use cascade::CascadeProcessor;
pub use default_animation::DefaultAnimationProcessor;
pub use duration::DurationProcessor;
pub use ignore_subview_modifiers::IgnoreSubviewModifiersProcessor;
pub use matching::MatchProcessor;
pub use source::SourceProcessor;

use crate::context::TransitionContext;
use crate::options::{Presentation, TransitionOptions};
use crate::scene::{ElementId, SceneGraph};

pub trait Processor {
    fn name(&self) -> &str;

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    );
}

/// The built-in processors in pipeline order.
pub fn builtin_processors(
    options: &TransitionOptions,
    presentation: Presentation,
) -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(IgnoreSubviewModifiersProcessor),
        Box::new(MatchProcessor),
        Box::new(SourceProcessor),
        Box::new(CascadeProcessor),
        Box::new(DefaultAnimationProcessor::new(
            options.default_animation,
            options.ordering,
            presentation,
        )),
        Box::new(DurationProcessor::new(options.base_duration_ms)),
    ]
}
