//! Per-transition options, optionally derived from `rune.toml`.

use std::str::FromStr;

use rune_config::TransitionConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::EasingFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Whole-scene animation applied to the two scene roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "direction", rename_all = "snake_case")]
pub enum DefaultAnimation {
    /// Push/pull in navigation stacks, slide in tab containers, fade otherwise.
    #[default]
    Auto,
    None,
    Fade,
    Push(Direction),
    Pull(Direction),
    Cover(Direction),
    Uncover(Direction),
    Slide(Direction),
    Zoom,
    ZoomOut,
}

impl FromStr for DefaultAnimation {
    type Err = String;

    /// Accepts `auto`, `none`, `fade`, `zoom`, `zoom-out` and
    /// `<push|pull|cover|uncover|slide>-<left|right|up|down>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "auto" => return Ok(Self::Auto),
            "none" => return Ok(Self::None),
            "fade" => return Ok(Self::Fade),
            "zoom" => return Ok(Self::Zoom),
            "zoom-out" => return Ok(Self::ZoomOut),
            _ => {}
        }

        let unknown = || format!("unknown default animation '{s}'");
        let (kind, direction) = normalized.split_once('-').ok_or_else(unknown)?;
        let direction = match direction {
            "left" => Direction::Left,
            "right" => Direction::Right,
            "up" => Direction::Up,
            "down" => Direction::Down,
            _ => return Err(unknown()),
        };
        match kind {
            "push" => Ok(Self::Push(direction)),
            "pull" => Ok(Self::Pull(direction)),
            "cover" => Ok(Self::Cover(direction)),
            "uncover" => Ok(Self::Uncover(direction)),
            "slide" => Ok(Self::Slide(direction)),
            _ => Err(unknown()),
        }
    }
}

/// Child order of the two scene roots inside the transition container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOrderingStrategy {
    /// Destination below the source when dismissing outside a tab container;
    /// the default animation may adjust it.
    #[default]
    Auto,
    SourceOnTop,
    DestinationOnTop,
}

impl ViewOrderingStrategy {
    /// Whether the destination root is inserted below the source root.
    pub fn insert_to_first(&self, presenting: bool, embedded_in_tab_container: bool) -> bool {
        match self {
            Self::Auto => !presenting && !embedded_in_tab_container,
            Self::SourceOnTop => true,
            Self::DestinationOnTop => false,
        }
    }
}

impl FromStr for ViewOrderingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "auto" => Ok(Self::Auto),
            "source-on-top" => Ok(Self::SourceOnTop),
            "destination-on-top" => Ok(Self::DestinationOnTop),
            other => Err(format!("unknown view ordering '{other}'")),
        }
    }
}

/// How the scene change is being presented by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// `false` when dismissing back to an earlier scene.
    pub presenting: bool,
    /// Both scenes live inside a tab container.
    pub embedded_in_tab_container: bool,
    /// Both scenes live inside a navigation stack.
    pub in_navigation: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::present()
    }
}

impl Presentation {
    pub fn present() -> Self {
        Self {
            presenting: true,
            embedded_in_tab_container: false,
            in_navigation: false,
        }
    }

    pub fn dismiss() -> Self {
        Self {
            presenting: false,
            ..Self::present()
        }
    }

    pub fn in_tab_container(mut self) -> Self {
        self.embedded_in_tab_container = true;
        self
    }

    pub fn in_navigation(mut self) -> Self {
        self.in_navigation = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOptions {
    pub default_animation: DefaultAnimation,
    pub ordering: ViewOrderingStrategy,
    /// Cover the window with a snapshot between start and kickoff.
    pub snapshot_overlay: bool,
    pub default_easing: EasingFunction,
    pub base_duration_ms: f32,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}

impl TransitionOptions {
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_config(config: &TransitionConfig) -> Self {
        let default_animation = config.default_animation.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to auto default animation");
            DefaultAnimation::Auto
        });
        let ordering = config.ordering.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to auto view ordering");
            ViewOrderingStrategy::Auto
        });
        let default_easing = config.default_easing.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to ease");
            EasingFunction::Ease
        });
        Self {
            default_animation,
            ordering,
            snapshot_overlay: config.snapshot_overlay,
            default_easing,
            base_duration_ms: config.base_duration_ms.max(0.0),
        }
    }

    pub fn with_default_animation(mut self, animation: DefaultAnimation) -> Self {
        self.default_animation = animation;
        self
    }

    pub fn with_ordering(mut self, ordering: ViewOrderingStrategy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_snapshot_overlay(mut self, enabled: bool) -> Self {
        self.snapshot_overlay = enabled;
        self
    }
}
