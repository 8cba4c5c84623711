//! Animation descriptor model.
//!
//! Descriptors are value objects: factories and callers build them, the
//! scheduler copies them into its registry on admission and never hands them
//! back for mutation. Timing fields are optional so that scheduler defaults,
//! group config and per-descriptor config can be layered with
//! [`AnimationConfig::merge`].

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SchedulerConfig;
use crate::ids::{AnimationId, GroupId, ShapeId};
use crate::interp::Easing;

/// Property keys that must hold plain numbers.
pub const NUMERIC_KEYS: [&str; 6] = ["x", "y", "rotation", "opacity", "width", "height"];
/// Property key holding an `{x, y}` pair.
pub const SCALE_KEY: &str = "scale";

/// One animated property value.
///
/// `Other` keeps anything else a caller or fixture supplied; validation and
/// interpolation decide what to do with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Pair { x: Box<PropValue>, y: Box<PropValue> },
    Other(serde_json::Value),
}

impl PropValue {
    pub fn pair(x: f64, y: f64) -> Self {
        Self::Pair {
            x: Box::new(Self::Number(x)),
            y: Box::new(Self::Number(y)),
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Both axes, when both are numeric.
    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            Self::Pair { x, y } => Some((x.as_number()?, y.as_number()?)),
            _ => None,
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<(f64, f64)> for PropValue {
    fn from((x, y): (f64, f64)) -> Self {
        Self::pair(x, y)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Other(serde_json::Value::String(s.to_string()))
    }
}

/// Ordered property map (name → target value).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(IndexMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropValue::as_number)
    }

    pub fn pair(&self, key: &str) -> Option<(f64, f64)> {
        self.get(key).and_then(PropValue::as_pair)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PropValue)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, PropValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Informational tag; processing is identical for every kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Fade,
    Slide,
    Scale,
    Rotate,
    Bounce,
    Pulse,
    Shake,
    #[default]
    Custom,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
}

/// `loop` accepts a flag or a repeat count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoopSetting {
    Flag(bool),
    Count(u32),
}

impl LoopSetting {
    /// Total passes; `None` repeats forever.
    pub fn passes(&self) -> Option<u32> {
        match self {
            Self::Flag(false) => Some(1),
            Self::Flag(true) => None,
            Self::Count(n) => Some((*n).max(1)),
        }
    }
}

impl Default for LoopSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Partial timing configuration. `None` means "not set at this layer".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_setting: Option<LoopSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Per-member delay step; only read from group config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer configs left to right; a field set in a later layer wins.
    pub fn merge(layers: &[&AnimationConfig]) -> AnimationConfig {
        layers
            .iter()
            .fold(AnimationConfig::default(), |acc, layer| acc.overlay(layer))
    }

    /// `self` with every field that `top` sets replaced.
    pub fn overlay(&self, top: &AnimationConfig) -> AnimationConfig {
        AnimationConfig {
            duration: top.duration.or(self.duration),
            delay: top.delay.or(self.delay),
            easing: top.easing.clone().or_else(|| self.easing.clone()),
            direction: top.direction.or(self.direction),
            loop_setting: top.loop_setting.or(self.loop_setting),
            autoplay: top.autoplay.or(self.autoplay),
            stagger: top.stagger.or(self.stagger),
        }
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn delay(mut self, ms: f64) -> Self {
        self.delay = Some(ms);
        self
    }

    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn looping(mut self, setting: LoopSetting) -> Self {
        self.loop_setting = Some(setting);
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    pub fn stagger(mut self, ms: f64) -> Self {
        self.stagger = Some(ms);
        self
    }

    /// Fill unset fields from scheduler defaults.
    pub fn resolve(&self, defaults: &SchedulerConfig) -> Timing {
        Timing {
            duration: self.duration.unwrap_or(defaults.default_duration_ms),
            delay: self.delay.unwrap_or(defaults.default_delay_ms),
            easing: self
                .easing
                .clone()
                .unwrap_or(Easing::Curve(defaults.default_easing)),
            direction: self.direction.unwrap_or_default(),
            passes: self.loop_setting.unwrap_or_default().passes(),
            autoplay: self.autoplay.unwrap_or(true),
        }
    }
}

/// Fully resolved timing for one admitted descriptor.
#[derive(Clone, Debug)]
pub struct Timing {
    pub duration: f64,
    pub delay: f64,
    pub easing: Easing,
    pub direction: Direction,
    /// `None` repeats forever.
    pub passes: Option<u32>,
    pub autoplay: bool,
}

pub type Callback = Rc<dyn Fn(&AnimationDescriptor)>;
pub type ProgressCallback = Rc<dyn Fn(&AnimationDescriptor, f64)>;

/// Per-descriptor lifecycle hooks, invoked alongside the event bus.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_start: Option<Callback>,
    pub on_update: Option<ProgressCallback>,
    pub on_complete: Option<Callback>,
    pub on_pause: Option<Callback>,
    pub on_resume: Option<Callback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_pause", &self.on_pause.is_some())
            .field("on_resume", &self.on_resume.is_some())
            .finish()
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ShapeId>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ShapeId),
        Many(Vec<ShapeId>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(id) => vec![id],
        OneOrMany::Many(ids) => ids,
    })
}

/// The unit of scheduled work.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDescriptor {
    /// Empty ids are replaced with a generated one on admission.
    #[serde(default)]
    pub id: AnimationId,
    #[serde(rename = "type", default)]
    pub kind: AnimationKind,
    /// Accepts `"target": "a"` or `"targets": ["a", "b"]` in JSON.
    #[serde(alias = "target", deserialize_with = "one_or_many")]
    pub targets: Vec<ShapeId>,
    pub properties: Props,
    #[serde(flatten)]
    pub config: AnimationConfig,
    /// Set by the scheduler on admission (`now + delay`).
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    scheduled_start: Option<f64>,
    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl AnimationDescriptor {
    /// Descriptor with a generated id and no timing overrides.
    pub fn new(kind: AnimationKind, targets: Vec<ShapeId>, properties: Props) -> Self {
        Self {
            id: AnimationId::generate(),
            kind,
            targets,
            properties,
            config: AnimationConfig::default(),
            scheduled_start: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = AnimationId::new(id);
        self
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_start(mut self, f: impl Fn(&AnimationDescriptor) + 'static) -> Self {
        self.callbacks.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn(&AnimationDescriptor, f64) + 'static) -> Self {
        self.callbacks.on_update = Some(Rc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(&AnimationDescriptor) + 'static) -> Self {
        self.callbacks.on_complete = Some(Rc::new(f));
        self
    }

    pub fn on_pause(mut self, f: impl Fn(&AnimationDescriptor) + 'static) -> Self {
        self.callbacks.on_pause = Some(Rc::new(f));
        self
    }

    pub fn on_resume(mut self, f: impl Fn(&AnimationDescriptor) + 'static) -> Self {
        self.callbacks.on_resume = Some(Rc::new(f));
        self
    }

    /// Admission-time start (`now + delay`); `None` until admitted.
    pub fn scheduled_start(&self) -> Option<f64> {
        self.scheduled_start
    }

    pub(crate) fn set_scheduled_start(&mut self, at: f64) {
        self.scheduled_start = Some(at);
    }

    pub fn targets_shape(&self, shape: &ShapeId) -> bool {
        self.targets.iter().any(|t| t == shape)
    }
}

/// Coordinated set of descriptors sharing optional default config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimationGroup {
    #[serde(default)]
    pub id: GroupId,
    pub animations: Vec<AnimationDescriptor>,
    #[serde(default)]
    pub config: Option<AnimationConfig>,
}

impl AnimationGroup {
    pub fn new(animations: Vec<AnimationDescriptor>) -> Self {
        Self {
            id: GroupId::generate(),
            animations,
            config: None,
        }
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_later_layer_wins_field_by_field() {
        let defaults = AnimationConfig::new().duration(1000.0).delay(0.0);
        let group = AnimationConfig::new().duration(500.0).stagger(100.0);
        let caller = AnimationConfig::new().delay(250.0);
        let merged = AnimationConfig::merge(&[&defaults, &group, &caller]);
        assert_eq!(merged.duration, Some(500.0));
        assert_eq!(merged.delay, Some(250.0));
        assert_eq!(merged.stagger, Some(100.0));
        assert!(merged.easing.is_none());
    }

    #[test]
    fn resolve_fills_scheduler_defaults() {
        let timing = AnimationConfig::new()
            .looping(LoopSetting::Count(3))
            .resolve(&SchedulerConfig::default());
        assert_eq!(timing.duration, 1000.0);
        assert_eq!(timing.delay, 0.0);
        assert_eq!(timing.passes, Some(3));
        assert_eq!(timing.direction, Direction::Normal);
        assert!(timing.autoplay);
        assert!((timing.easing.apply(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn loop_setting_passes() {
        assert_eq!(LoopSetting::Flag(false).passes(), Some(1));
        assert_eq!(LoopSetting::Flag(true).passes(), None);
        assert_eq!(LoopSetting::Count(0).passes(), Some(1));
        assert_eq!(LoopSetting::Count(6).passes(), Some(6));
    }

    #[test]
    fn descriptor_json_accepts_single_target_and_flat_timing() {
        let d: AnimationDescriptor = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "type": "fade",
            "target": "shape:1",
            "properties": { "opacity": 1, "scale": { "x": 2, "y": 2 } },
            "duration": 300,
            "easing": "linear",
            "loop": 2
        }))
        .unwrap();
        assert_eq!(d.id.as_str(), "a1");
        assert_eq!(d.kind, AnimationKind::Fade);
        assert_eq!(d.targets, vec![ShapeId::from("shape:1")]);
        assert_eq!(d.properties.number("opacity"), Some(1.0));
        assert_eq!(d.properties.pair("scale"), Some((2.0, 2.0)));
        assert_eq!(d.config.duration, Some(300.0));
        assert_eq!(d.config.loop_setting, Some(LoopSetting::Count(2)));
        assert!(d.scheduled_start().is_none());
    }

    #[test]
    fn pair_with_text_axis_is_not_numeric() {
        let v: PropValue = serde_json::from_value(serde_json::json!({ "x": 1, "y": "b" })).unwrap();
        assert!(matches!(v, PropValue::Pair { .. }));
        assert_eq!(v.as_pair(), None);
    }
}
