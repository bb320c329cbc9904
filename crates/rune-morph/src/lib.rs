//! Scene transition engine for Rune.
//!
//! A [`Transition`] moves the UI from one scene to another inside a host
//! element. Both scenes are reparented into a temporary container, a
//! pipeline of processors annotates their elements with target states,
//! and animators drive the annotated elements until the destination scene
//! is committed or the source scene is restored.
//!
//! ```text
//! TransitionRequest ─▶ Transition::start ─▶ context ─▶ processors ─▶ claim
//!                                                                      │
//!            host next turn ─▶ Transition::run_scheduled ─▶ animators ─┘ ─▶ tick … complete
//! ```
//!
//! The host owns the [`SceneGraph`](scene::SceneGraph) and talks to the
//! engine through [`TransitionHost`]. Plugins registered with the
//! [`PluginRegistry`] add both a processor and an animator.

pub mod animation;
pub mod animator;
pub mod context;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod options;
pub mod plugin;
pub mod processor;
pub mod scene;
pub mod transition;

pub use animator::Animator;
pub use context::{Role, TransitionContext};
pub use error::{MorphError, Result};
pub use events::TransitionEvent;
pub use host::{Scene, SceneDelegate, TransitionHost};
pub use options::{
    DefaultAnimation, Direction, Presentation, TransitionOptions, ViewOrderingStrategy,
};
pub use plugin::{Plugin, PluginFactory, PluginRegistry};
pub use processor::Processor;
pub use transition::{Transition, TransitionRequest, TransitionState};
