//! Shared, mutable state for one transition.
//!
//! The context is built once per transition, before any processor runs, and
//! is handed by `&mut` to every processor and animator in turn. Its element
//! lists are never reassigned; pipeline stages only edit annotations.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::Rect;
use crate::host::TransitionHost;
use crate::scene::{flatten, CoordinateSpace, Element, ElementId, SceneGraph, TargetState};

/// Which side of the transition an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Destination-scene element.
    Appearing,
    /// Source-scene element.
    Disappearing,
}

/// Inputs for building a context.
#[derive(Debug, Clone, Copy)]
pub struct ContextSpec {
    /// Element hosting the transition; the container fills its bounds.
    pub area: ElementId,
    pub from_root: ElementId,
    pub to_root: ElementId,
    pub insert_to_first: bool,
}

#[derive(Debug)]
pub struct TransitionContext {
    container: ElementId,
    area: ElementId,
    area_interaction: bool,
    from_root: ElementId,
    to_root: ElementId,
    from_elements: Vec<ElementId>,
    to_elements: Vec<ElementId>,
    from_set: HashSet<ElementId>,
    to_set: HashSet<ElementId>,
    insert_to_first: bool,
    alphas: HashMap<ElementId, f32>,
    hidden: HashSet<ElementId>,
    states: HashMap<ElementId, TargetState>,
    from_ids: HashMap<String, ElementId>,
    to_ids: HashMap<String, ElementId>,
    morph_ids: HashMap<ElementId, String>,
}

impl TransitionContext {
    /// Create the container, move both scenes into it and index their elements.
    ///
    /// Graph errors are logged and skipped; the resulting context may then
    /// list fewer elements but is always usable.
    pub fn build(host: &mut dyn TransitionHost, spec: ContextSpec) -> Self {
        let graph = host.graph_mut();

        let area_bounds = graph
            .get(spec.area)
            .map(|area| area.frame.bounds())
            .unwrap_or_default();
        let container = graph
            .insert_child(spec.area, Element::new(area_bounds))
            .unwrap_or_else(|err| {
                warn!(%err, area = %spec.area, "transition area missing, container left detached");
                graph.insert(Element::new(area_bounds))
            });

        let area_interaction = match graph.get_mut(spec.area) {
            Some(area) => std::mem::replace(&mut area.interaction_enabled, false),
            None => true,
        };

        let mut ctx = Self {
            container,
            area: spec.area,
            area_interaction,
            from_root: spec.from_root,
            to_root: spec.to_root,
            from_elements: Vec::new(),
            to_elements: Vec::new(),
            from_set: HashSet::new(),
            to_set: HashSet::new(),
            insert_to_first: spec.insert_to_first,
            alphas: HashMap::new(),
            hidden: HashSet::new(),
            states: HashMap::new(),
            from_ids: HashMap::new(),
            to_ids: HashMap::new(),
            morph_ids: HashMap::new(),
        };

        ctx.record_alphas(graph, spec.to_root);
        ctx.record_alphas(graph, spec.from_root);
        ctx.apply_insertion_order(graph);

        // Constraints may depend on container membership.
        host.layout(spec.to_root);

        let graph = host.graph_mut();
        ctx.from_elements = flatten(graph, spec.from_root);
        ctx.to_elements = flatten(graph, spec.to_root);
        ctx.from_set = ctx.from_elements.iter().copied().collect();
        ctx.to_set = ctx.to_elements.iter().copied().collect();
        ctx.index(graph);
        ctx.hide(graph, spec.to_root);

        debug!(
            container = %container,
            from = ctx.from_elements.len(),
            to = ctx.to_elements.len(),
            insert_to_first = ctx.insert_to_first,
            "transition context built"
        );
        ctx
    }

    fn index(&mut self, graph: &SceneGraph) {
        let sides = [
            (Role::Disappearing, self.from_elements.clone()),
            (Role::Appearing, self.to_elements.clone()),
        ];
        for (side, elements) in sides {
            for id in elements {
                let Some(element) = graph.get(id) else {
                    continue;
                };
                if !element.modifiers.is_empty() {
                    self.states
                        .insert(id, TargetState::from_modifiers(&element.modifiers));
                }
                if let Some(morph_id) = &element.morph_id {
                    let ids = match side {
                        Role::Disappearing => &mut self.from_ids,
                        Role::Appearing => &mut self.to_ids,
                    };
                    ids.entry(morph_id.clone()).or_insert(id);
                    self.morph_ids.insert(id, morph_id.clone());
                }
            }
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn area(&self) -> ElementId {
        self.area
    }

    /// Interaction flag the area had before the transition disabled it.
    pub fn area_interaction(&self) -> bool {
        self.area_interaction
    }

    pub fn from_root(&self) -> ElementId {
        self.from_root
    }

    pub fn to_root(&self) -> ElementId {
        self.to_root
    }

    pub fn from_elements(&self) -> &[ElementId] {
        &self.from_elements
    }

    pub fn to_elements(&self) -> &[ElementId] {
        &self.to_elements
    }

    pub fn role_of(&self, id: ElementId) -> Option<Role> {
        if self.to_set.contains(&id) {
            Some(Role::Appearing)
        } else if self.from_set.contains(&id) {
            Some(Role::Disappearing)
        } else {
            None
        }
    }

    pub fn insert_to_first(&self) -> bool {
        self.insert_to_first
    }

    /// Takes effect on the next [`apply_insertion_order`](Self::apply_insertion_order).
    pub fn set_insert_to_first(&mut self, insert_to_first: bool) {
        self.insert_to_first = insert_to_first;
    }

    /// Order the two scene roots inside the container per `insert_to_first`.
    pub fn apply_insertion_order(&self, graph: &mut SceneGraph) {
        let (below, above) = if self.insert_to_first {
            (self.to_root, self.from_root)
        } else {
            (self.from_root, self.to_root)
        };
        for root in [below, above] {
            if let Err(err) = graph.add_child(self.container, root) {
                warn!(%err, root = %root, "failed to move scene root into container");
            }
        }
    }

    // ------------------------------------------------------------------
    // Alpha bookkeeping
    // ------------------------------------------------------------------

    /// Record the alpha of `root` and every descendant; first record wins.
    pub fn record_alphas(&mut self, graph: &SceneGraph, root: ElementId) {
        for id in flatten(graph, root) {
            if let Some(alpha) = graph.alpha(id) {
                self.alphas.entry(id).or_insert(alpha);
            }
        }
    }

    pub fn original_alpha(&self, id: ElementId) -> Option<f32> {
        self.alphas.get(&id).copied()
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.hidden.contains(&id)
    }

    /// Drop the element to alpha 0, remembering its alpha if not yet recorded.
    pub fn hide(&mut self, graph: &mut SceneGraph, id: ElementId) {
        let Some(alpha) = graph.alpha(id) else {
            return;
        };
        if self.hidden.insert(id) {
            self.alphas.entry(id).or_insert(alpha);
            write_alpha(graph, id, 0.0);
        }
    }

    /// Restore a hidden element to its recorded alpha.
    pub fn unhide(&mut self, graph: &mut SceneGraph, id: ElementId) {
        if self.hidden.remove(&id) {
            let alpha = self.original_alpha(id).unwrap_or(1.0);
            write_alpha(graph, id, alpha);
        }
    }

    /// Put every recorded element back at its recorded alpha.
    pub fn restore_alphas(&mut self, graph: &mut SceneGraph) {
        for (&id, &alpha) in &self.alphas {
            write_alpha(graph, id, alpha);
        }
        self.hidden.clear();
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Frame of `id` in `space`: its parent's space for `Local`, the
    /// container's for `Global`.
    pub fn frame_in_space(
        &self,
        graph: &SceneGraph,
        id: ElementId,
        space: CoordinateSpace,
    ) -> Option<Rect> {
        match space {
            CoordinateSpace::Local => graph.get(id).map(|element| element.frame),
            CoordinateSpace::Global => graph.frame_in(self.container, id),
        }
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    pub fn state(&self, id: ElementId) -> Option<&TargetState> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: ElementId) -> Option<&mut TargetState> {
        self.states.get_mut(&id)
    }

    /// Target state for `id`, created empty if missing.
    pub fn state_entry(&mut self, id: ElementId) -> &mut TargetState {
        self.states.entry(id).or_default()
    }

    pub fn set_state(&mut self, id: ElementId, state: TargetState) {
        self.states.insert(id, state);
    }

    pub fn clear_state(&mut self, id: ElementId) -> Option<TargetState> {
        self.states.remove(&id)
    }

    pub fn morph_id(&self, id: ElementId) -> Option<&str> {
        self.morph_ids.get(&id).map(String::as_str)
    }

    /// Source-scene element carrying `morph_id`.
    pub fn source_element(&self, morph_id: &str) -> Option<ElementId> {
        self.from_ids.get(morph_id).copied()
    }

    /// Destination-scene element carrying `morph_id`.
    pub fn destination_element(&self, morph_id: &str) -> Option<ElementId> {
        self.to_ids.get(morph_id).copied()
    }

    /// Element on the other side sharing this element's matching identifier.
    pub fn paired_element(&self, id: ElementId) -> Option<ElementId> {
        let morph_id = self.morph_ids.get(&id)?;
        match self.role_of(id)? {
            Role::Disappearing => self.destination_element(morph_id),
            Role::Appearing => self.source_element(morph_id),
        }
    }

    /// Counterpart on the opposite side for an arbitrary identifier.
    pub fn counterpart_for(&self, id: ElementId, morph_id: &str) -> Option<ElementId> {
        match self.role_of(id)? {
            Role::Disappearing => self.destination_element(morph_id),
            Role::Appearing => self.source_element(morph_id),
        }
    }
}

fn write_alpha(graph: &mut SceneGraph, id: ElementId, alpha: f32) {
    if let Err(err) = graph.set_alpha(id, alpha) {
        warn!(%err, "failed to write alpha");
    }
}
