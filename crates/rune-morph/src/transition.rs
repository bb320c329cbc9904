//! The transition state machine.
//!
//! ```text
//! Notified ─start─▶ Starting ─run_scheduled─▶ Animating ─tick/finish─▶ Completing ─▶ Completed
//!                                                 │
//!                                                 └─cancel─▶ Completing ─▶ Cancelled
//! ```
//!
//! `start` does all setup synchronously and asks the host for one callback
//! on its next turn; `run_scheduled` is that callback. Between the two the
//! source scene is covered by a snapshot overlay so the user never sees the
//! reparented scenes before animators have written their start values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::animator::{claim, Animator, Claim, DefaultAnimator};
use crate::context::{ContextSpec, TransitionContext};
use crate::events::{EventQueue, TransitionEvent};
use crate::host::{Scene, TransitionHost};
use crate::options::{Presentation, TransitionOptions};
use crate::plugin::{self, PluginRegistry};
use crate::processor::{builtin_processors, Processor};
use crate::scene::{Element, ElementId, SceneGraph, SnapshotHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    Notified,
    Starting,
    Animating,
    Completing,
    Completed,
    Cancelled,
}

/// Everything needed to transition from one scene to another.
#[derive(Debug)]
pub struct TransitionRequest {
    pub from: Scene,
    pub to: Scene,
    /// Element that hosts the transition container.
    pub area: ElementId,
    pub presentation: Presentation,
    pub options: TransitionOptions,
}

impl TransitionRequest {
    pub fn new(from: Scene, to: Scene, area: ElementId) -> Self {
        Self {
            from,
            to,
            area,
            presentation: Presentation::default(),
            options: TransitionOptions::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_options(mut self, options: TransitionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Where a scene root sat before the transition moved it.
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    parent: Option<ElementId>,
    index: Option<usize>,
}

impl Slot {
    fn of(graph: &SceneGraph, id: ElementId) -> Self {
        let parent = graph.parent(id);
        Self {
            parent,
            index: parent.and_then(|p| graph.child_index(p, id)),
        }
    }

    /// Put `id` into this slot, or append it to `fallback` when the slot was empty.
    fn place(&self, graph: &mut SceneGraph, id: ElementId, fallback: Option<ElementId>) {
        let result = match (self.parent, self.index, fallback) {
            (Some(parent), Some(index), _) => graph.insert_child_at(parent, id, index),
            (_, _, Some(fallback)) => graph.add_child(fallback, id),
            _ => graph.remove_from_parent(id),
        };
        if let Err(err) = result {
            warn!(%err, element = %id, "failed to restore scene root");
        }
    }
}

/// Registry consulted for plugins once the transition starts.
#[derive(Debug)]
enum PluginSource {
    Global,
    Owned(PluginRegistry),
}

pub struct Transition {
    state: TransitionState,
    from: Scene,
    to: Scene,
    area: ElementId,
    presentation: Presentation,
    options: TransitionOptions,
    plugins: PluginSource,
    processors: Vec<Box<dyn Processor>>,
    animators: Vec<Box<dyn Animator>>,
    claims: Vec<Claim>,
    context: Option<TransitionContext>,
    overlay: Option<ElementId>,
    from_slot: Slot,
    to_slot: Slot,
    animating_from: Vec<ElementId>,
    animating_to: Vec<ElementId>,
    elapsed_ms: f32,
    total_duration_ms: f32,
    interactive: bool,
    events: EventQueue,
}

impl Transition {
    /// Create a transition using the plugins enabled in the process-wide
    /// registry when `start` runs.
    pub fn new(request: TransitionRequest) -> Self {
        Self::build(request, PluginSource::Global)
    }

    /// Create a transition whose plugins come from `registry` instead of
    /// the process-wide one.
    pub fn with_registry(request: TransitionRequest, registry: &PluginRegistry) -> Self {
        Self::build(request, PluginSource::Owned(registry.clone()))
    }

    fn build(request: TransitionRequest, plugins: PluginSource) -> Self {
        let TransitionRequest {
            from,
            to,
            area,
            presentation,
            options,
        } = request;

        Self {
            state: TransitionState::Notified,
            from,
            to,
            area,
            presentation,
            options,
            plugins,
            processors: Vec::new(),
            animators: Vec::new(),
            claims: Vec::new(),
            context: None,
            overlay: None,
            from_slot: Slot::default(),
            to_slot: Slot::default(),
            animating_from: Vec::new(),
            animating_to: Vec::new(),
            elapsed_ms: 0.0,
            total_duration_ms: 0.0,
            interactive: false,
            events: EventQueue::new(),
        }
    }

    /// Built-in processors and the default animator, followed by one
    /// instance of every enabled plugin shared between both lists.
    fn build_pipelines(&mut self) {
        let registry = match &self.plugins {
            PluginSource::Global => plugin::global_snapshot(),
            PluginSource::Owned(registry) => registry.clone(),
        };
        let mut processors = builtin_processors(&self.options, self.presentation);
        let mut animators: Vec<Box<dyn Animator>> = vec![Box::new(DefaultAnimator::new(
            self.options.default_easing,
            self.options.base_duration_ms,
        ))];
        for plugin in registry.instantiate() {
            processors.push(Box::new(plugin.clone()));
            animators.push(Box::new(plugin));
        }
        debug!(
            processors = processors.len(),
            animators = animators.len(),
            "pipelines built"
        );
        self.processors = processors;
        self.animators = animators;
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.total_duration_ms
    }

    /// Fraction of the total duration played, `1.0` once completed.
    pub fn progress(&self) -> f32 {
        if self.total_duration_ms > 0.0 {
            (self.elapsed_ms / self.total_duration_ms).clamp(0.0, 1.0)
        } else if self.state == TransitionState::Completed {
            1.0
        } else {
            0.0
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn animating_from(&self) -> &[ElementId] {
        &self.animating_from
    }

    pub fn animating_to(&self) -> &[ElementId] {
        &self.animating_to
    }

    /// Pipeline names in run order. Empty until `start`.
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn animator_names(&self) -> Vec<&str> {
        self.animators.iter().map(|a| a.name()).collect()
    }

    pub fn context(&self) -> Option<&TransitionContext> {
        self.context.as_ref()
    }

    pub fn overlay(&self) -> Option<ElementId> {
        self.overlay
    }

    pub fn scenes(&self) -> (&Scene, &Scene) {
        (&self.from, &self.to)
    }

    pub fn into_scenes(self) -> (Scene, Scene) {
        (self.from, self.to)
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain()
    }

    fn set_state(&mut self, state: TransitionState) {
        debug!(from = ?self.state, to = ?state, "transition state");
        self.state = state;
    }

    /// Set up both scenes, run the processors and schedule the kickoff.
    ///
    /// Returns `false` without side effects unless the transition is still
    /// `Notified`.
    pub fn start(&mut self, host: &mut dyn TransitionHost) -> bool {
        if self.state != TransitionState::Notified {
            debug!(state = ?self.state, "start ignored");
            return false;
        }
        self.set_state(TransitionState::Starting);
        self.build_pipelines();
        let (from_root, to_root) = (self.from.root, self.to.root);

        for scene in [&mut self.from, &mut self.to] {
            if let Some(stale) = scene.stored_snapshot.take() {
                debug!(overlay = %stale, "discarding stale snapshot");
                if let Err(err) = host.graph_mut().remove_subtree(stale) {
                    warn!(%err, "failed to remove stale snapshot");
                }
            }
        }

        let graph = host.graph_mut();
        if let Some(frame) = graph.get(from_root).map(|root| root.frame) {
            if let Err(err) = graph.set_frame(to_root, frame) {
                warn!(%err, "destination root missing");
            }
        }
        host.layout(to_root);

        for scene in [&mut self.from, &mut self.to] {
            if let Some(delegate) = scene.delegate.as_mut() {
                delegate.transition_will_start();
            }
        }
        if let Some(delegate) = self.from.delegate.as_mut() {
            delegate.will_animate_to(to_root);
        }
        if let Some(delegate) = self.to.delegate.as_mut() {
            delegate.will_animate_from(from_root);
        }

        let snapshot = if self.options.snapshot_overlay {
            Self::capture(host, from_root)
        } else {
            None
        };

        self.from_slot = Slot::of(host.graph(), from_root);
        self.to_slot = Slot::of(host.graph(), to_root);

        let insert_to_first = self.options.ordering.insert_to_first(
            self.presentation.presenting,
            self.presentation.embedded_in_tab_container,
        );
        let mut ctx = TransitionContext::build(
            host,
            ContextSpec {
                area: self.area,
                from_root,
                to_root,
                insert_to_first,
            },
        );

        if let Some(snapshot) = snapshot {
            self.install_overlay(host, snapshot);
        }

        let graph = host.graph();
        let from = ctx.from_elements().to_vec();
        let to = ctx.to_elements().to_vec();
        for processor in &mut self.processors {
            trace!(processor = processor.name(), "running processor");
            processor.process(&mut ctx, graph, &from, &to);
        }

        self.claims = claim(&self.animators, &ctx, graph, &from, &to);
        let claimed_from: HashSet<_> = self.claims.iter().flat_map(|c| c.from.iter()).collect();
        let claimed_to: HashSet<_> = self.claims.iter().flat_map(|c| c.to.iter()).collect();
        self.animating_from = from.iter().copied().filter(|id| claimed_from.contains(id)).collect();
        self.animating_to = to.iter().copied().filter(|id| claimed_to.contains(id)).collect();

        debug!(
            from = self.animating_from.len(),
            to = self.animating_to.len(),
            insert_to_first = ctx.insert_to_first(),
            "transition prepared"
        );
        self.context = Some(ctx);
        host.schedule_next_turn();
        true
    }

    /// Full-window snapshot, falling back to the source root.
    fn capture(host: &mut dyn TransitionHost, from_root: ElementId) -> Option<SnapshotHandle> {
        let window = host.window();
        let snapshot = window
            .and_then(|window| host.render_snapshot(window))
            .or_else(|| host.render_snapshot(from_root));
        if snapshot.is_none() {
            warn!("no snapshot available, continuing without overlay");
        }
        snapshot
    }

    fn install_overlay(&mut self, host: &mut dyn TransitionHost, snapshot: SnapshotHandle) {
        let parent = host.window().unwrap_or(self.area);
        let graph = host.graph_mut();
        let bounds = graph
            .get(parent)
            .map(|p| p.frame.bounds())
            .unwrap_or_default();
        match graph.insert_child(parent, Element::new(bounds).with_snapshot(snapshot)) {
            Ok(overlay) => {
                debug!(%overlay, %parent, "snapshot overlay installed");
                self.overlay = Some(overlay);
                self.from.stored_snapshot = Some(overlay);
            }
            Err(err) => warn!(%err, "failed to install snapshot overlay"),
        }
    }

    fn remove_overlay(&mut self, graph: &mut SceneGraph) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        if self.from.stored_snapshot == Some(overlay) {
            self.from.stored_snapshot = None;
        }
        if let Err(err) = graph.remove_subtree(overlay) {
            warn!(%err, "failed to remove snapshot overlay");
        }
    }

    /// Deferred kickoff. Call once after [`TransitionHost::schedule_next_turn`].
    pub fn run_scheduled(&mut self, host: &mut dyn TransitionHost) {
        if self.state != TransitionState::Starting {
            debug!(state = ?self.state, "kickoff ignored");
            return;
        }
        self.remove_overlay(host.graph_mut());
        let Some(mut ctx) = self.context.take() else {
            return;
        };

        let graph = host.graph_mut();
        ctx.apply_insertion_order(graph);
        let to_root = ctx.to_root();
        ctx.unhide(graph, to_root);

        let mut total: f32 = 0.0;
        for (animator, claim) in self.animators.iter_mut().zip(&self.claims) {
            if claim.is_empty() {
                continue;
            }
            let duration = animator.animate(&mut ctx, graph, &claim.from, &claim.to);
            trace!(animator = animator.name(), duration_ms = duration, "animator started");
            total = total.max(duration);
        }
        for animator in &mut self.animators {
            animator.seek(graph, 0.0);
        }
        self.context = Some(ctx);

        self.elapsed_ms = 0.0;
        self.total_duration_ms = total;
        self.set_state(TransitionState::Animating);
        self.events.push(TransitionEvent::Started {
            total_duration_ms: total,
            animating_from: self.animating_from.len(),
            animating_to: self.animating_to.len(),
        });

        if total <= 0.0 {
            self.complete(host, true);
        }
    }

    fn seek(&mut self, graph: &mut SceneGraph) {
        for animator in &mut self.animators {
            animator.seek(graph, self.elapsed_ms);
        }
    }

    /// Advance a running, non-interactive transition by `delta_ms`.
    pub fn tick(&mut self, host: &mut dyn TransitionHost, delta_ms: f32) {
        if self.state != TransitionState::Animating || self.interactive {
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + delta_ms.max(0.0)).min(self.total_duration_ms);
        self.seek(host.graph_mut());
        if self.elapsed_ms >= self.total_duration_ms {
            self.complete(host, true);
        }
    }

    /// Scrub to `progress` in `[0, 1]`. The transition stays interactive
    /// until [`finish`](Self::finish) or [`cancel`](Self::cancel).
    /// Non-finite progress is ignored.
    pub fn update(&mut self, host: &mut dyn TransitionHost, progress: f32) {
        if self.state != TransitionState::Animating || !progress.is_finite() {
            return;
        }
        self.interactive = true;
        self.elapsed_ms = progress.clamp(0.0, 1.0) * self.total_duration_ms;
        self.seek(host.graph_mut());
    }

    /// Jump to the end and commit the destination scene.
    pub fn finish(&mut self, host: &mut dyn TransitionHost) -> bool {
        if self.state != TransitionState::Animating {
            debug!(state = ?self.state, "finish ignored");
            return false;
        }
        self.elapsed_ms = self.total_duration_ms;
        self.seek(host.graph_mut());
        self.complete(host, true);
        true
    }

    /// Stop animating and put the source scene back.
    pub fn cancel(&mut self, host: &mut dyn TransitionHost) -> bool {
        if self.state != TransitionState::Animating {
            debug!(state = ?self.state, "cancel ignored");
            return false;
        }
        let graph = host.graph_mut();
        for animator in &mut self.animators {
            animator.cancel(graph);
        }
        self.complete(host, false);
        true
    }

    fn complete(&mut self, host: &mut dyn TransitionHost, finished: bool) {
        self.set_state(TransitionState::Completing);
        let graph = host.graph_mut();
        for animator in &mut self.animators {
            animator.clean(graph);
        }
        self.remove_overlay(graph);

        if let Some(mut ctx) = self.context.take() {
            ctx.restore_alphas(graph);
            let (from_root, to_root) = (self.from.root, self.to.root);
            if finished {
                self.from_slot.place(graph, to_root, Some(self.area));
                Slot::default().place(graph, from_root, None);
            } else {
                self.from_slot.place(graph, from_root, None);
                Slot::default().place(graph, to_root, None);
            }
            if let Err(err) = graph.remove_subtree(ctx.container()) {
                warn!(%err, "failed to remove transition container");
            }
            if let Some(area) = graph.get_mut(ctx.area()) {
                area.interaction_enabled = ctx.area_interaction();
            }
        }

        for scene in [&mut self.from, &mut self.to] {
            if let Some(delegate) = scene.delegate.as_mut() {
                if finished {
                    delegate.transition_did_end();
                } else {
                    delegate.transition_did_cancel();
                }
            }
        }
        host.transition_completed(finished);

        let progress = self.progress();
        self.events.push(if finished {
            TransitionEvent::Ended {
                elapsed_ms: self.elapsed_ms,
            }
        } else {
            TransitionEvent::Cancelled {
                elapsed_ms: self.elapsed_ms,
                progress,
            }
        });
        self.set_state(if finished {
            TransitionState::Completed
        } else {
            TransitionState::Cancelled
        });

        self.processors.clear();
        self.animators.clear();
        self.claims.clear();
        self.animating_from.clear();
        self.animating_to.clear();
        self.interactive = false;
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("state", &self.state)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("area", &self.area)
            .field("processors", &self.processor_names())
            .field("animators", &self.animator_names())
            .field("elapsed_ms", &self.elapsed_ms)
            .field("total_duration_ms", &self.total_duration_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::options::DefaultAnimation;
    use crate::scene::Modifier;

    #[derive(Default)]
    struct Host {
        graph: SceneGraph,
        window: Option<ElementId>,
        scheduled: usize,
        completed: Vec<bool>,
    }

    impl TransitionHost for Host {
        fn graph(&self) -> &SceneGraph {
            &self.graph
        }

        fn graph_mut(&mut self) -> &mut SceneGraph {
            &mut self.graph
        }

        fn window(&self) -> Option<ElementId> {
            self.window
        }

        fn render_snapshot(&mut self, _subject: ElementId) -> Option<SnapshotHandle> {
            Some(SnapshotHandle(1))
        }

        fn schedule_next_turn(&mut self) {
            self.scheduled += 1;
        }

        fn transition_completed(&mut self, finished: bool) {
            self.completed.push(finished);
        }
    }

    fn setup(animation: DefaultAnimation) -> (Host, Transition) {
        let mut host = Host::default();
        let frame = Rect::new(0.0, 0.0, 320.0, 480.0);
        let window = host.graph.insert(Element::new(frame));
        let area = host.graph.insert_child(window, Element::new(frame)).unwrap();
        let from = host.graph.insert_child(area, Element::new(frame)).unwrap();
        let to = host.graph.insert(Element::new(frame));
        host.graph
            .insert_child(to, Element::new(Rect::new(10.0, 10.0, 50.0, 50.0)).with_modifiers([Modifier::Fade]))
            .unwrap();
        host.window = Some(window);

        let request = TransitionRequest::new(Scene::new(from), Scene::new(to), area).with_options(
            TransitionOptions::default().with_default_animation(animation),
        );
        (host, Transition::with_registry(request, &PluginRegistry::new()))
    }

    #[test]
    fn test_start_only_once() {
        let (mut host, mut transition) = setup(DefaultAnimation::Fade);
        assert!(transition.start(&mut host));
        assert_eq!(transition.state(), TransitionState::Starting);
        assert!(!transition.start(&mut host));
        assert_eq!(host.scheduled, 1);
    }

    #[test]
    fn test_kickoff_requires_start() {
        let (mut host, mut transition) = setup(DefaultAnimation::Fade);
        transition.run_scheduled(&mut host);
        assert_eq!(transition.state(), TransitionState::Notified);
        assert!(!transition.cancel(&mut host));
    }

    #[test]
    fn test_tick_to_completion() {
        let (mut host, mut transition) = setup(DefaultAnimation::Fade);
        transition.start(&mut host);
        let overlay = transition.overlay().unwrap();
        assert_eq!(host.graph.children(host.window.unwrap()).last(), Some(&overlay));

        transition.run_scheduled(&mut host);
        assert_eq!(transition.state(), TransitionState::Animating);
        assert!(!host.graph.contains(overlay));
        let total = transition.total_duration_ms();
        assert!(total > 0.0);

        transition.tick(&mut host, total / 2.0);
        assert!((transition.progress() - 0.5).abs() < 1e-4);
        transition.tick(&mut host, total);
        assert_eq!(transition.state(), TransitionState::Completed);
        assert_eq!(transition.progress(), 1.0);
        assert_eq!(host.completed, vec![true]);

        let events: Vec<_> = transition.drain_events().collect();
        assert!(matches!(events[0], TransitionEvent::Started { .. }));
        assert!(matches!(events[1], TransitionEvent::Ended { .. }));
    }

    #[test]
    fn test_interactive_update_ignores_ticks() {
        let (mut host, mut transition) = setup(DefaultAnimation::Fade);
        transition.start(&mut host);
        transition.run_scheduled(&mut host);

        transition.update(&mut host, 0.25);
        assert!(transition.is_interactive());
        transition.tick(&mut host, 10_000.0);
        assert!((transition.progress() - 0.25).abs() < 1e-4);

        assert!(transition.finish(&mut host));
        assert_eq!(transition.state(), TransitionState::Completed);
    }

    #[test]
    fn test_update_ignores_non_finite_progress() {
        let (mut host, mut transition) = setup(DefaultAnimation::Fade);
        transition.start(&mut host);
        transition.run_scheduled(&mut host);

        transition.update(&mut host, 0.25);
        transition.update(&mut host, f32::NAN);
        assert!((transition.progress() - 0.25).abs() < 1e-4);
        transition.update(&mut host, f32::INFINITY);
        assert!((transition.progress() - 0.25).abs() < 1e-4);
        assert!(transition.elapsed_ms().is_finite());
    }

    #[test]
    fn test_nothing_to_animate_completes_at_kickoff() {
        let (mut host, mut transition) = setup(DefaultAnimation::None);
        let (from, to) = (transition.scenes().0.root, transition.scenes().1.root);
        host.graph.children(to).to_vec().into_iter().for_each(|child| {
            host.graph.remove_subtree(child).unwrap();
        });

        transition.start(&mut host);
        assert!(transition.animating_from().is_empty());
        assert!(transition.animating_to().is_empty());
        transition.run_scheduled(&mut host);

        assert_eq!(transition.state(), TransitionState::Completed);
        assert_eq!(host.graph.parent(from), None);
        assert!(host.graph.parent(to).is_some());
    }
}
