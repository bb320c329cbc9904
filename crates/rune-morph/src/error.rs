//! Error types for scene graph and plugin registry operations.
//!
//! Transition lifecycle operations never return these; they log and degrade
//! instead so the host UI is never left half-transitioned.

use thiserror::Error;

use crate::scene::ElementId;

/// Result type for fallible engine operations.
pub type Result<T> = std::result::Result<T, MorphError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MorphError {
    /// The element is not present in the scene graph.
    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    /// Reparenting would make an element its own ancestor.
    #[error("cannot add {child} under {parent}: would create a cycle")]
    CycleDetected { parent: ElementId, child: ElementId },

    /// A sibling reference does not belong to the given parent.
    #[error("element {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },

    /// A plugin with this name is already registered.
    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    /// No plugin with this name is registered.
    #[error("plugin '{0}' is not registered")]
    UnknownPlugin(String),
}
