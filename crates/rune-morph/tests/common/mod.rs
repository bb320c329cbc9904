#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rune_morph::geometry::Rect;
use rune_morph::scene::{Element, ElementId, SceneGraph, SnapshotHandle};
use rune_morph::{
    Presentation, Scene, SceneDelegate, TransitionHost, TransitionOptions, TransitionRequest,
};

pub const SCREEN: Rect = Rect { x: 0.0, y: 0.0, w: 320.0, h: 480.0 };

pub struct TestHost {
    pub graph: SceneGraph,
    pub window: Option<ElementId>,
    pub snapshots: bool,
    pub scheduled: usize,
    pub layouts: Vec<ElementId>,
    pub completed: Vec<bool>,
}

impl TransitionHost for TestHost {
    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn layout(&mut self, root: ElementId) {
        self.layouts.push(root);
    }

    fn window(&self) -> Option<ElementId> {
        self.window
    }

    fn render_snapshot(&mut self, subject: ElementId) -> Option<SnapshotHandle> {
        self.snapshots.then_some(SnapshotHandle(subject.0))
    }

    fn schedule_next_turn(&mut self) {
        self.scheduled += 1;
    }

    fn transition_completed(&mut self, finished: bool) {
        self.completed.push(finished);
    }
}

impl TestHost {
    /// Elements currently displaying a snapshot.
    pub fn snapshot_elements(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<ElementId> = self.window.into_iter().collect();
        while let Some(id) = stack.pop() {
            if self.graph.get(id).is_some_and(|e| e.snapshot.is_some()) {
                count += 1;
            }
            stack.extend_from_slice(self.graph.children(id));
        }
        count
    }
}

/// A window holding a transition area that shows the source scene. The
/// destination scene is built detached.
pub struct Fixture {
    pub host: TestHost,
    pub window: ElementId,
    pub area: ElementId,
    pub from_root: ElementId,
    pub to_root: ElementId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let window = graph.insert(Element::new(SCREEN));
        let area = graph.insert(Element::new(SCREEN));
        let from_root = graph.insert(Element::new(SCREEN));
        let to_root = graph.insert(Element::new(SCREEN));
        let mut fixture = Self {
            host: TestHost {
                graph,
                window: Some(window),
                snapshots: true,
                scheduled: 0,
                layouts: Vec::new(),
                completed: Vec::new(),
            },
            window,
            area,
            from_root,
            to_root,
        };
        fixture.attach(window, area);
        fixture.attach(area, from_root);
        fixture
    }

    pub fn without_window(mut self) -> Self {
        self.host.window = None;
        self
    }

    pub fn without_snapshots(mut self) -> Self {
        self.host.snapshots = false;
        self
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        self.host
            .graph
            .add_child(parent, child)
            .expect("fixture elements exist");
    }

    pub fn add(&mut self, parent: ElementId, element: Element) -> ElementId {
        self.host
            .graph
            .insert_child(parent, element)
            .expect("parent exists")
    }

    pub fn request(&self, presentation: Presentation, options: TransitionOptions) -> TransitionRequest {
        TransitionRequest::new(Scene::new(self.from_root), Scene::new(self.to_root), self.area)
            .with_presentation(presentation)
            .with_options(options)
    }

    pub fn request_with_log(
        &self,
        presentation: Presentation,
        options: TransitionOptions,
        log: &CallLog,
    ) -> TransitionRequest {
        TransitionRequest::new(
            Scene::new(self.from_root).with_delegate(log.delegate("from")),
            Scene::new(self.to_root).with_delegate(log.delegate("to")),
            self.area,
        )
        .with_presentation(presentation)
        .with_options(options)
    }
}

/// Shared record of delegate callbacks, e.g. `"from:did_end"`.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn delegate(&self, label: &'static str) -> LoggingDelegate {
        LoggingDelegate { label, log: self.clone() }
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.borrow().iter().filter(|c| c.as_str() == call).count()
    }

    fn push(&self, label: &str, call: &str) {
        self.0.borrow_mut().push(format!("{label}:{call}"));
    }
}

pub struct LoggingDelegate {
    label: &'static str,
    log: CallLog,
}

impl SceneDelegate for LoggingDelegate {
    fn transition_will_start(&mut self) {
        self.log.push(self.label, "will_start");
    }

    fn will_animate_to(&mut self, _counterpart: ElementId) {
        self.log.push(self.label, "will_animate_to");
    }

    fn will_animate_from(&mut self, _counterpart: ElementId) {
        self.log.push(self.label, "will_animate_from");
    }

    fn transition_did_end(&mut self) {
        self.log.push(self.label, "did_end");
    }

    fn transition_did_cancel(&mut self) {
        self.log.push(self.label, "did_cancel");
    }
}
