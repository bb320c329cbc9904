//! Animation primitives used by animators.
//!
//! ```text
//! PropertyTrack (element, property, from → to, TrackTiming)
//!   └── EasingFunction + Interpolate produce the value at a seek time
//! ```

pub mod easing;
pub mod interpolate;
pub mod track;
pub mod types;

pub use easing::EasingFunction;
pub use interpolate::Interpolate;
pub use track::{PropertyTrack, TrackTiming};
pub use types::{AnimatableProperty, AnimatableTransform, AnimatableValue, AnimationState};
