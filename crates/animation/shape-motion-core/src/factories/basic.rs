//! Single-descriptor animations over one or more targets.

use serde::{Deserialize, Serialize};

use super::build;
use crate::data::{AnimationConfig, AnimationDescriptor, AnimationKind, Direction, LoopSetting, Props};
use crate::ids::ShapeId;
use crate::interp::EasingFunction;

pub const DEFAULT_SLIDE_DISTANCE: f64 = 100.0;
pub const DEFAULT_ROTATION_DEGREES: f64 = 360.0;
pub const DEFAULT_BOUNCE_HEIGHT: f64 = 20.0;
pub const DEFAULT_PULSE_SCALE: f64 = 1.1;
pub const DEFAULT_SHAKE_INTENSITY: f64 = 10.0;

/// Side a slide comes in from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    /// `(x, y)` offset for a slide of `distance`.
    pub fn offset(&self, distance: f64) -> (f64, f64) {
        match self {
            Self::Left => (distance, 0.0),
            Self::Right => (-distance, 0.0),
            Self::Up => (0.0, distance),
            Self::Down => (0.0, -distance),
        }
    }
}

pub fn fade_in(targets: &[ShapeId], config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Fade,
        targets.to_vec(),
        Props::new().with("opacity", 1.0),
        AnimationConfig::new(),
        config,
    )
}

pub fn fade_out(targets: &[ShapeId], config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Fade,
        targets.to_vec(),
        Props::new().with("opacity", 0.0),
        AnimationConfig::new(),
        config,
    )
}

pub fn slide_in(
    targets: &[ShapeId],
    direction: SlideDirection,
    distance: f64,
    config: &AnimationConfig,
) -> AnimationDescriptor {
    let (x, y) = direction.offset(distance);
    build(
        AnimationKind::Slide,
        targets.to_vec(),
        Props::new().with("x", x).with("y", y),
        AnimationConfig::new(),
        config,
    )
}

/// Scale uniformly to `to`, starting from the shape's live scale.
pub fn scale_in(targets: &[ShapeId], to: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Scale,
        targets.to_vec(),
        Props::new().with("scale", (to, to)),
        AnimationConfig::new(),
        config,
    )
}

/// Rotate to `degrees`, stored as radians.
pub fn rotate(targets: &[ShapeId], degrees: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Rotate,
        targets.to_vec(),
        Props::new().with("rotation", degrees.to_radians()),
        AnimationConfig::new(),
        config,
    )
}

pub fn move_to(targets: &[ShapeId], x: f64, y: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Custom,
        targets.to_vec(),
        Props::new().with("x", x).with("y", y),
        AnimationConfig::new(),
        config,
    )
}

pub fn bounce(targets: &[ShapeId], height: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Bounce,
        targets.to_vec(),
        Props::new().with("y", -height),
        AnimationConfig::new()
            .easing(EasingFunction::EaseOutBounce)
            .direction(Direction::Alternate)
            .looping(LoopSetting::Count(3)),
        config,
    )
}

pub fn pulse(targets: &[ShapeId], scale: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Pulse,
        targets.to_vec(),
        Props::new().with("scale", (scale, scale)),
        AnimationConfig::new()
            .duration(600.0)
            .direction(Direction::Alternate)
            .looping(LoopSetting::Flag(true)),
        config,
    )
}

pub fn shake(targets: &[ShapeId], intensity: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Shake,
        targets.to_vec(),
        Props::new().with("x", intensity),
        AnimationConfig::new()
            .duration(100.0)
            .direction(Direction::Alternate)
            .looping(LoopSetting::Count(6)),
        config,
    )
}
