//! Choreographed effects. Fan-out factories return one descriptor per target,
//! with geometry or delay derived from the target's index.

use std::f64::consts::TAU;

use super::{build, step_delay};
use crate::data::{AnimationConfig, AnimationDescriptor, AnimationKind, Direction, LoopSetting, Props};
use crate::ids::ShapeId;
use crate::interp::EasingFunction;

pub const DEFAULT_EXPLODE_FORCE: f64 = 100.0;
pub const DEFAULT_RIPPLE_WAVE_MS: f64 = 50.0;
pub const DEFAULT_SPIRAL_RADIUS: f64 = 100.0;
pub const DEFAULT_GLOW_INTENSITY: f64 = 1.5;

/// Fly outward: target `i` of `n` moves `force` along angle `2π·i/n`.
pub fn explode(targets: &[ShapeId], force: f64, config: &AnimationConfig) -> Vec<AnimationDescriptor> {
    let n = targets.len() as f64;
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let angle = i as f64 / n * TAU;
            build(
                AnimationKind::Custom,
                vec![shape.clone()],
                Props::new()
                    .with("x", angle.cos() * force)
                    .with("y", angle.sin() * force)
                    .with("rotation", angle),
                AnimationConfig::new()
                    .duration(1000.0)
                    .easing(EasingFunction::EaseOutQuad),
                config,
            )
        })
        .collect()
}

/// Converge on `(cx, cy)` while shrinking to nothing.
pub fn implode(
    targets: &[ShapeId],
    cx: f64,
    cy: f64,
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    targets
        .iter()
        .map(|shape| {
            build(
                AnimationKind::Custom,
                vec![shape.clone()],
                Props::new()
                    .with("x", cx)
                    .with("y", cy)
                    .with("scale", (0.0, 0.0)),
                AnimationConfig::new()
                    .duration(800.0)
                    .easing(EasingFunction::EaseInQuad),
                config,
            )
        })
        .collect()
}

pub fn ripple(targets: &[ShapeId], wave_ms: f64, config: &AnimationConfig) -> Vec<AnimationDescriptor> {
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            build(
                AnimationKind::Custom,
                vec![shape.clone()],
                Props::new().with("scale", (1.2, 1.2)),
                AnimationConfig::new()
                    .delay(step_delay(i, wave_ms))
                    .duration(400.0)
                    .direction(Direction::Alternate),
                config,
            )
        })
        .collect()
}

/// Two turns around `(cx, cy)`: target `i` of `n` sits at angle `4π·i/n`.
pub fn spiral(
    targets: &[ShapeId],
    cx: f64,
    cy: f64,
    radius: f64,
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    let n = targets.len() as f64;
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let angle = i as f64 / n * 2.0 * TAU;
            build(
                AnimationKind::Custom,
                vec![shape.clone()],
                Props::new()
                    .with("x", cx + angle.cos() * radius)
                    .with("y", cy + angle.sin() * radius)
                    .with("rotation", angle),
                AnimationConfig::new()
                    .duration(2000.0)
                    .delay(step_delay(i, 100.0))
                    .easing(EasingFunction::EaseInOutQuad),
                config,
            )
        })
        .collect()
}

pub fn trail(target: &ShapeId, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Custom,
        vec![target.clone()],
        Props::new().with("opacity", 0.5),
        AnimationConfig::new().duration(500.0),
        config,
    )
}

pub fn glow(targets: &[ShapeId], intensity: f64, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Custom,
        targets.to_vec(),
        Props::new().with("scale", (intensity, intensity)),
        AnimationConfig::new()
            .duration(800.0)
            .direction(Direction::Alternate)
            .looping(LoopSetting::Flag(true)),
        config,
    )
}

/// Animate toward an arbitrary property set.
pub fn morph(target: &ShapeId, to: Props, config: &AnimationConfig) -> AnimationDescriptor {
    build(
        AnimationKind::Custom,
        vec![target.clone()],
        to,
        AnimationConfig::new()
            .duration(1500.0)
            .easing(EasingFunction::EaseInOutCubic),
        config,
    )
}
