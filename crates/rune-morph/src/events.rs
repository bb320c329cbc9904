//! Transition lifecycle events.
//!
//! Events are queued as the state machine advances and can be polled by the
//! host after each call:
//!
//! ```ignore
//! transition.tick(&mut host, 16.67);
//! for event in transition.drain_events() {
//!     if let TransitionEvent::Ended { .. } = event {
//!         // scene change committed
//!     }
//! }
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// Animators are running.
    Started {
        total_duration_ms: f32,
        animating_from: usize,
        animating_to: usize,
    },
    /// The destination scene is in place.
    Ended { elapsed_ms: f32 },
    /// The source scene was restored.
    Cancelled { elapsed_ms: f32, progress: f32 },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.push(TransitionEvent::Started {
            total_duration_ms: 300.0,
            animating_from: 1,
            animating_to: 2,
        });
        queue.push(TransitionEvent::Ended { elapsed_ms: 300.0 });
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert!(matches!(drained[0], TransitionEvent::Started { .. }));
        assert!(matches!(drained[1], TransitionEvent::Ended { .. }));
        assert!(queue.is_empty());
    }
}
