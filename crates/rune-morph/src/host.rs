//! Boundary with the host UI framework.
//!
//! The host owns the [`SceneGraph`], performs layout and snapshot rendering,
//! and drives the deferred kickoff by calling
//! [`Transition::run_scheduled`](crate::Transition::run_scheduled) on the
//! next turn of its main loop after [`TransitionHost::schedule_next_turn`].

use crate::scene::{ElementId, SceneGraph, SnapshotHandle};

pub trait TransitionHost {
    fn graph(&self) -> &SceneGraph;

    fn graph_mut(&mut self) -> &mut SceneGraph;

    /// Run one synchronous layout pass for the subtree at `root`.
    fn layout(&mut self, _root: ElementId) {}

    /// Window element hosting the scenes, if any.
    fn window(&self) -> Option<ElementId> {
        None
    }

    /// Render an opaque snapshot of `subject`. `None` when unavailable.
    fn render_snapshot(&mut self, _subject: ElementId) -> Option<SnapshotHandle> {
        None
    }

    /// Request one call to `Transition::run_scheduled` after pending
    /// layout and render work has flushed.
    fn schedule_next_turn(&mut self);

    /// Called once when the transition reaches a terminal state.
    fn transition_completed(&mut self, _finished: bool) {}
}

/// Lifecycle hooks for a scene taking part in a transition.
///
/// `counterpart` is the root element of the other scene.
pub trait SceneDelegate {
    fn transition_will_start(&mut self) {}

    /// Outgoing scene: about to animate to `counterpart`.
    fn will_animate_to(&mut self, _counterpart: ElementId) {}

    /// Incoming scene: about to animate from `counterpart`.
    fn will_animate_from(&mut self, _counterpart: ElementId) {}

    fn transition_did_end(&mut self) {}

    fn transition_did_cancel(&mut self) {}
}

/// One side of a transition.
pub struct Scene {
    pub root: ElementId,
    /// Hiding snapshot installed by a transition that has not yet kicked off.
    pub stored_snapshot: Option<ElementId>,
    pub delegate: Option<Box<dyn SceneDelegate>>,
}

impl Scene {
    pub fn new(root: ElementId) -> Self {
        Self {
            root,
            stored_snapshot: None,
            delegate: None,
        }
    }

    pub fn with_delegate(mut self, delegate: impl SceneDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("stored_snapshot", &self.stored_snapshot)
            .field("delegate", &self.delegate.is_some())
            .finish()
    }
}
