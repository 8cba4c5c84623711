//! Enter/exit transitions and staggered choreographies.
//!
//! All functions return one descriptor per target in target order.

use std::f64::consts::TAU;

use rand::RngExt;
use serde::{Deserialize, Serialize};

use super::{build, step_delay};
use crate::data::{AnimationConfig, AnimationDescriptor, AnimationKind, Props};
use crate::ids::ShapeId;
use crate::interp::EasingFunction;

pub const DEFAULT_SEQUENCE_INTERVAL_MS: f64 = 200.0;
pub const DEFAULT_WAVE_SPEED_MS: f64 = 100.0;
pub const DEFAULT_CASCADE_INTERVAL_MS: f64 = 150.0;
/// Random delays are drawn from `[0, RANDOM_DELAY_SPAN_MS)`.
pub const RANDOM_DELAY_SPAN_MS: f64 = 1000.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    #[default]
    Fade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Scale,
    Rotate,
    Flip,
}

impl TransitionType {
    pub const RANDOM_DEFAULTS: [TransitionType; 3] = [Self::Fade, Self::Scale, Self::SlideUp];

    fn enter_kind(&self) -> AnimationKind {
        match self {
            Self::Fade => AnimationKind::Fade,
            Self::SlideLeft | Self::SlideRight | Self::SlideUp | Self::SlideDown => {
                AnimationKind::Slide
            }
            Self::Scale => AnimationKind::Scale,
            Self::Rotate => AnimationKind::Rotate,
            Self::Flip => AnimationKind::Custom,
        }
    }

    fn enter_props(&self) -> Props {
        let props = Props::new();
        let props = match self {
            Self::Fade => props,
            Self::SlideLeft | Self::SlideRight => props.with("x", 0.0),
            Self::SlideUp | Self::SlideDown => props.with("y", 0.0),
            Self::Scale | Self::Flip => props.with("scale", (1.0, 1.0)),
            Self::Rotate => props.with("rotation", 0.0),
        };
        props.with("opacity", 1.0)
    }

    fn exit_props(&self) -> Props {
        let props = Props::new();
        let props = match self {
            Self::Fade => props,
            Self::SlideLeft => props.with("x", -100.0),
            Self::SlideRight => props.with("x", 100.0),
            Self::SlideUp => props.with("y", -100.0),
            Self::SlideDown => props.with("y", 100.0),
            Self::Scale => props.with("scale", (0.0, 0.0)),
            Self::Rotate => props.with("rotation", TAU),
            Self::Flip => props.with("scale", (0.0, 1.0)),
        };
        props.with("opacity", 0.0)
    }
}

/// Caller options for enter/exit transitions. `config.stagger` spaces targets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(flatten)]
    pub config: AnimationConfig,
    /// Exit only: stagger from the last target back to the first.
    #[serde(default)]
    pub reverse: bool,
}

impl From<AnimationConfig> for TransitionConfig {
    fn from(config: AnimationConfig) -> Self {
        Self {
            config,
            reverse: false,
        }
    }
}

impl TransitionConfig {
    fn stagger(&self) -> f64 {
        self.config.stagger.unwrap_or(0.0)
    }

    fn caller_layer(&self) -> AnimationConfig {
        AnimationConfig {
            stagger: None,
            ..self.config.clone()
        }
    }
}

pub fn enter(
    targets: &[ShapeId],
    kind: TransitionType,
    options: &TransitionConfig,
) -> Vec<AnimationDescriptor> {
    let stagger = options.stagger();
    let caller = options.caller_layer();
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            build(
                kind.enter_kind(),
                vec![shape.clone()],
                kind.enter_props(),
                AnimationConfig::new()
                    .duration(800.0)
                    .delay(step_delay(i, stagger))
                    .easing(EasingFunction::EaseOutQuad),
                &caller,
            )
        })
        .collect()
}

pub fn exit(
    targets: &[ShapeId],
    kind: TransitionType,
    options: &TransitionConfig,
) -> Vec<AnimationDescriptor> {
    let stagger = options.stagger();
    let caller = options.caller_layer();
    let n = targets.len();
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let slot = if options.reverse { n - 1 - i } else { i };
            build(
                kind.enter_kind(),
                vec![shape.clone()],
                kind.exit_props(),
                AnimationConfig::new()
                    .duration(600.0)
                    .delay(step_delay(slot, stagger))
                    .easing(EasingFunction::EaseInQuad),
                &caller,
            )
        })
        .collect()
}

/// Fade targets in one after another.
pub fn sequential(
    targets: &[ShapeId],
    interval_ms: f64,
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            build(
                AnimationKind::Fade,
                vec![shape.clone()],
                Props::new().with("opacity", 1.0),
                AnimationConfig::new()
                    .delay(step_delay(i, interval_ms))
                    .duration(600.0),
                config,
            )
        })
        .collect()
}

/// Grow targets outward from `center`; delay grows with index distance.
pub fn wave(
    targets: &[ShapeId],
    center: usize,
    speed_ms: f64,
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            build(
                AnimationKind::Scale,
                vec![shape.clone()],
                Props::new().with("scale", (1.0, 1.0)).with("opacity", 1.0),
                AnimationConfig::new()
                    .delay(step_delay(i.abs_diff(center), speed_ms))
                    .duration(800.0)
                    .easing(EasingFunction::EaseOutBack),
                config,
            )
        })
        .collect()
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeOrientation {
    #[default]
    Vertical,
    Horizontal,
}

pub fn cascade(
    targets: &[ShapeId],
    orientation: CascadeOrientation,
    interval_ms: f64,
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    let axis = match orientation {
        CascadeOrientation::Vertical => "y",
        CascadeOrientation::Horizontal => "x",
    };
    targets
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            build(
                AnimationKind::Slide,
                vec![shape.clone()],
                Props::new().with(axis, 0.0).with("opacity", 1.0),
                AnimationConfig::new()
                    .delay(step_delay(i, interval_ms))
                    .duration(1000.0)
                    .easing(EasingFunction::EaseOutCubic),
                config,
            )
        })
        .collect()
}

/// Enter each target with a type drawn from `kinds` (defaults when empty)
/// and a uniform delay in `[0, RANDOM_DELAY_SPAN_MS)`, using `rng`.
pub fn random_with<R: RngExt + ?Sized>(
    rng: &mut R,
    targets: &[ShapeId],
    kinds: &[TransitionType],
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    let kinds = if kinds.is_empty() {
        &TransitionType::RANDOM_DEFAULTS[..]
    } else {
        kinds
    };
    targets
        .iter()
        .flat_map(|shape| {
            let kind = kinds[rng.random_range(0..kinds.len())];
            let delay = rng.random_range(0.0..RANDOM_DELAY_SPAN_MS);
            let options = TransitionConfig::from(config.clone().delay(delay));
            enter(std::slice::from_ref(shape), kind, &options)
        })
        .collect()
}

/// [`random_with`] on the thread-local generator.
pub fn random(
    targets: &[ShapeId],
    kinds: &[TransitionType],
    config: &AnimationConfig,
) -> Vec<AnimationDescriptor> {
    random_with(&mut rand::rng(), targets, kinds, config)
}
