//! Seekable property tracks.
//!
//! A track interpolates one property of one element between two values.
//! Tracks are driven by absolute elapsed time (`seek`) rather than deltas so
//! that interactive transitions can scrub backwards as well as forwards.

use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;
use super::interpolate::Interpolate;
use super::types::{AnimatableProperty, AnimatableValue, AnimationState};
use crate::scene::ElementId;

/// Timing for a single track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackTiming {
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub easing: EasingFunction,
}

impl Default for TrackTiming {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            delay_ms: 0.0,
            easing: EasingFunction::Ease,
        }
    }
}

impl TrackTiming {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Time at which the track reaches its end value.
    pub fn end_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }
}

#[derive(Debug, Clone)]
pub struct PropertyTrack {
    pub element: ElementId,
    pub property: AnimatableProperty,
    pub from_value: AnimatableValue,
    pub to_value: AnimatableValue,
    pub timing: TrackTiming,
    pub state: AnimationState,
}

impl PropertyTrack {
    pub fn new(
        element: ElementId,
        property: AnimatableProperty,
        from_value: AnimatableValue,
        to_value: AnimatableValue,
        timing: TrackTiming,
    ) -> Self {
        Self {
            element,
            property,
            from_value,
            to_value,
            timing,
            state: if timing.delay_ms > 0.0 {
                AnimationState::Pending
            } else {
                AnimationState::Running
            },
        }
    }

    /// Linear progress at `elapsed_ms`, before easing.
    pub fn progress_at(&self, elapsed_ms: f32) -> f32 {
        let active = elapsed_ms - self.timing.delay_ms;
        if active <= 0.0 {
            0.0
        } else if self.timing.duration_ms > 0.0 {
            (active / self.timing.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Move the track to `elapsed_ms` and return the value to apply.
    ///
    /// A cancelled track stays at its start value.
    pub fn seek(&mut self, elapsed_ms: f32) -> AnimatableValue {
        if self.state == AnimationState::Cancelled {
            return self.from_value.clone();
        }

        self.state = if elapsed_ms < self.timing.delay_ms {
            AnimationState::Pending
        } else if elapsed_ms >= self.timing.end_ms() {
            AnimationState::Finished
        } else {
            AnimationState::Running
        };

        match self.state {
            AnimationState::Pending => self.from_value.clone(),
            AnimationState::Finished => self.to_value.clone(),
            _ => {
                let eased = self.timing.easing.evaluate(self.progress_at(elapsed_ms));
                self.from_value.interpolate(&self.to_value, eased)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = AnimationState::Cancelled;
    }

    pub fn is_finished(&self) -> bool {
        self.state == AnimationState::Finished
    }
}
