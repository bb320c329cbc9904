//! Root-inclusive pre-order flattening of an element tree.

use super::graph::{ElementId, SceneGraph};

/// The root followed by all of its descendants, depth first, children in
/// paint order. Unknown roots flatten to an empty list.
pub fn flatten(graph: &SceneGraph, root: ElementId) -> Vec<ElementId> {
    if !graph.contains(root) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(graph.children(id).iter().rev());
    }
    out
}
