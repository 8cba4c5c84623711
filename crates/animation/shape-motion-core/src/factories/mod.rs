//! Descriptor factories.
//!
//! Pure functions from intent to descriptors. Each factory carries its own
//! defaults as an [`AnimationConfig`] layer, and the caller's config is laid
//! on top with [`AnimationConfig::overlay`]. Fields neither layer sets are
//! left to the scheduler's defaults at admission. Every descriptor gets a
//! fresh generated id.

pub mod basic;
pub mod effects;
pub mod transitions;

use crate::data::{AnimationConfig, AnimationDescriptor, AnimationKind, Props};
use crate::ids::ShapeId;

pub use basic::SlideDirection;
pub use transitions::{CascadeOrientation, TransitionConfig, TransitionType};

fn build(
    kind: AnimationKind,
    targets: Vec<ShapeId>,
    properties: Props,
    defaults: AnimationConfig,
    config: &AnimationConfig,
) -> AnimationDescriptor {
    AnimationDescriptor::new(kind, targets, properties).with_config(defaults.overlay(config))
}

/// `index * step` as a delay in milliseconds.
#[inline]
fn step_delay(index: usize, step: f64) -> f64 {
    index as f64 * step
}
