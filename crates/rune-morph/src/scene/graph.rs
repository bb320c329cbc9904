//! Arena-backed element tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::modifier::Modifier;
use crate::animation::AnimatableTransform;
use crate::error::{MorphError, Result};
use crate::geometry::{Point, Rect};

/// Process-unique element identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a host-rendered snapshot image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotHandle(pub u64);

/// One node of the visual hierarchy.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    /// Frame relative to the parent element.
    pub frame: Rect,
    pub alpha: f32,
    pub transform: AnimatableTransform,
    /// Fully covers its frame; non-opaque matched pairs crossfade.
    pub opaque: bool,
    pub interaction_enabled: bool,
    /// Identifier used to match elements across scenes.
    pub morph_id: Option<String>,
    pub modifiers: Vec<Modifier>,
    /// Set on elements that display a captured snapshot.
    pub snapshot: Option<SnapshotHandle>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(frame: Rect) -> Self {
        Self {
            id: ElementId::new(),
            frame,
            alpha: 1.0,
            transform: AnimatableTransform::IDENTITY,
            opaque: true,
            interaction_enabled: true,
            morph_id: None,
            modifiers: Vec::new(),
            snapshot: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_morph_id(mut self, id: impl Into<String>) -> Self {
        self.morph_id = Some(id.into());
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn with_snapshot(mut self, handle: SnapshotHandle) -> Self {
        self.snapshot = Some(handle);
        self
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Element arena with parent/child links.
#[derive(Debug, Default)]
pub struct SceneGraph {
    elements: HashMap<ElementId, Element>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached element. Any links it carries are dropped.
    pub fn insert(&mut self, mut element: Element) -> ElementId {
        element.parent = None;
        element.children.clear();
        let id = element.id;
        self.elements.insert(id, element);
        id
    }

    /// Insert an element and append it to `parent`.
    pub fn insert_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId> {
        if !self.contains(parent) {
            return Err(MorphError::ElementNotFound(parent));
        }
        let id = self.insert(element);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Children in paint order; empty for unknown elements.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_index(&self, parent: ElementId, child: ElementId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// True when `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Append `child` to `parent`, detaching it from its current parent first.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        let index = self.children(parent).len();
        self.insert_child_at(parent, child, index)
    }

    /// Insert `child` into `parent` directly below `sibling` in paint order.
    pub fn insert_child_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        sibling: ElementId,
    ) -> Result<()> {
        let not_a_child = MorphError::NotAChild {
            parent,
            child: sibling,
        };
        if child == sibling || self.parent(sibling) != Some(parent) {
            return Err(not_a_child);
        }
        if !self.contains(child) {
            return Err(MorphError::ElementNotFound(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(MorphError::CycleDetected { parent, child });
        }
        self.detach(child)?;
        let index = self.child_index(parent, sibling).ok_or(not_a_child)?;
        self.link(parent, child, index)
    }

    /// Insert `child` at `index` (clamped) among `parent`'s children.
    pub fn insert_child_at(&mut self, parent: ElementId, child: ElementId, index: usize) -> Result<()> {
        if !self.contains(parent) {
            return Err(MorphError::ElementNotFound(parent));
        }
        if !self.contains(child) {
            return Err(MorphError::ElementNotFound(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(MorphError::CycleDetected { parent, child });
        }
        self.detach(child)?;
        self.link(parent, child, index)
    }

    /// Detach `id` from its parent; detached elements stay in the arena.
    pub fn remove_from_parent(&mut self, id: ElementId) -> Result<()> {
        self.detach(id)
    }

    /// Remove `id` and all its descendants from the arena.
    pub fn remove_subtree(&mut self, id: ElementId) -> Result<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.remove(&current) {
                stack.extend(element.children);
            }
        }
        Ok(())
    }

    /// Frame in the coordinate space of the topmost ancestor.
    pub fn absolute_frame(&self, id: ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        let mut frame = element.frame;
        let mut cursor = element.parent;
        while let Some(parent) = cursor.and_then(|p| self.get(p)) {
            frame = frame.offset(parent.frame.origin());
            cursor = parent.parent;
        }
        Some(frame)
    }

    /// Center in the coordinate space of the topmost ancestor.
    pub fn absolute_center(&self, id: ElementId) -> Option<Point> {
        self.absolute_frame(id).map(|f| f.center())
    }

    /// Frame in the coordinate space of `ancestor`. `None` unless `ancestor`
    /// is a proper ancestor of `id`.
    pub fn frame_in(&self, ancestor: ElementId, id: ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        let mut frame = element.frame;
        let mut cursor = element.parent;
        while let Some(parent) = cursor {
            if parent == ancestor {
                return Some(frame);
            }
            let parent = self.get(parent)?;
            frame = frame.offset(parent.frame.origin());
            cursor = parent.parent;
        }
        None
    }

    pub fn alpha(&self, id: ElementId) -> Option<f32> {
        self.get(id).map(|e| e.alpha)
    }

    pub fn set_alpha(&mut self, id: ElementId, alpha: f32) -> Result<()> {
        let element = self.get_mut(id).ok_or(MorphError::ElementNotFound(id))?;
        element.alpha = alpha;
        Ok(())
    }

    pub fn set_frame(&mut self, id: ElementId, frame: Rect) -> Result<()> {
        let element = self.get_mut(id).ok_or(MorphError::ElementNotFound(id))?;
        element.frame = frame;
        Ok(())
    }

    pub fn set_transform(&mut self, id: ElementId, transform: AnimatableTransform) -> Result<()> {
        let element = self.get_mut(id).ok_or(MorphError::ElementNotFound(id))?;
        element.transform = transform;
        Ok(())
    }

    fn detach(&mut self, id: ElementId) -> Result<()> {
        let element = self.get_mut(id).ok_or(MorphError::ElementNotFound(id))?;
        if let Some(parent) = element.parent.take() {
            if let Some(parent) = self.get_mut(parent) {
                parent.children.retain(|c| *c != id);
            }
        }
        Ok(())
    }

    fn link(&mut self, parent: ElementId, child: ElementId, index: usize) -> Result<()> {
        let parent_element = self
            .get_mut(parent)
            .ok_or(MorphError::ElementNotFound(parent))?;
        let index = index.min(parent_element.children.len());
        parent_element.children.insert(index, child);
        let child_element = self.get_mut(child).ok_or(MorphError::ElementNotFound(child))?;
        child_element.parent = Some(parent);
        Ok(())
    }
}
