//! Host-side model of the visual hierarchy.
//!
//! The host owns a [`SceneGraph`]; the engine reads and mutates it through
//! [`TransitionHost`](crate::host::TransitionHost) for the duration of a
//! transition.

pub mod flatten;
pub mod graph;
pub mod modifier;
pub mod target_state;

pub use flatten::flatten;
pub use graph::{Element, ElementId, SceneGraph, SnapshotHandle};
pub use modifier::{Cascade, CascadeDirection, Modifier};
pub use target_state::{CoordinateSpace, TargetDuration, TargetState};
