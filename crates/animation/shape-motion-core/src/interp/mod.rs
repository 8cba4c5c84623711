//! Easing providers and numeric interpolation.
//!
//! An [`Easing`] is either a named curve (resolved to an [`EasingFunction`]) or a
//! caller-supplied `t -> t'` function. Unknown names fall back to `easeOutQuad`.

pub mod functions;
pub mod validate;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use functions::{interpolate, lerp_pair};
pub use validate::{check_descriptor, check_properties, validate};

/// Built-in easing curves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    #[default]
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

#[derive(Copy, Clone)]
enum Phase {
    In,
    Out,
    InOut,
}

impl EasingFunction {
    /// Evaluate the curve at `t`, clamped to [0, 1] first.
    pub fn apply(&self, t: f64) -> f64 {
        use functions::*;
        let t = clamp01(t);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => ease_in_quad(t),
            Self::EaseOutQuad => ease_out_quad(t),
            Self::EaseInOutQuad => ease_in_out_quad(t),
            Self::EaseInCubic => ease_in_cubic(t),
            Self::EaseOutCubic => ease_out_cubic(t),
            Self::EaseInOutCubic => ease_in_out_cubic(t),
            Self::EaseInQuart => ease_in_quart(t),
            Self::EaseOutQuart => ease_out_quart(t),
            Self::EaseInOutQuart => ease_in_out_quart(t),
            Self::EaseInQuint => ease_in_quint(t),
            Self::EaseOutQuint => ease_out_quint(t),
            Self::EaseInOutQuint => ease_in_out_quint(t),
            Self::EaseInSine => ease_in_sine(t),
            Self::EaseOutSine => ease_out_sine(t),
            Self::EaseInOutSine => ease_in_out_sine(t),
            Self::EaseInCirc => ease_in_circ(t),
            Self::EaseOutCirc => ease_out_circ(t),
            Self::EaseInOutCirc => ease_in_out_circ(t),
            Self::EaseInExpo => ease_in_expo(t),
            Self::EaseOutExpo => ease_out_expo(t),
            Self::EaseInOutExpo => ease_in_out_expo(t),
            Self::EaseInBack => ease_in_back(t),
            Self::EaseOutBack => ease_out_back(t),
            Self::EaseInOutBack => ease_in_out_back(t),
            Self::EaseInElastic => ease_in_elastic(t),
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseInOutElastic => ease_in_out_elastic(t),
            Self::EaseInBounce => ease_in_bounce(t),
            Self::EaseOutBounce => ease_out_bounce(t),
            Self::EaseInOutBounce => ease_in_out_bounce(t),
        }
    }

    /// Resolve a curve name.
    ///
    /// Accepts the camelCase names (`easeOutQuad`), the short forms
    /// (`outQuad`, `inOutBack`) and the CSS-style aliases `ease`, `ease-in`,
    /// `ease-out`, `ease-in-out`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => return Some(Self::Linear),
            "ease" | "ease-in-out" => return Some(Self::EaseInOutQuad),
            "ease-in" => return Some(Self::EaseInQuad),
            "ease-out" => return Some(Self::EaseOutQuad),
            _ => {}
        }
        let body = name.strip_prefix("ease").unwrap_or(name).to_ascii_lowercase();
        let (phase, family) = if let Some(rest) = body.strip_prefix("inout") {
            (Phase::InOut, rest)
        } else if let Some(rest) = body.strip_prefix("in") {
            (Phase::In, rest)
        } else if let Some(rest) = body.strip_prefix("out") {
            (Phase::Out, rest)
        } else {
            return None;
        };
        let triple = match family {
            "quad" => [Self::EaseInQuad, Self::EaseOutQuad, Self::EaseInOutQuad],
            "cubic" => [Self::EaseInCubic, Self::EaseOutCubic, Self::EaseInOutCubic],
            "quart" => [Self::EaseInQuart, Self::EaseOutQuart, Self::EaseInOutQuart],
            "quint" => [Self::EaseInQuint, Self::EaseOutQuint, Self::EaseInOutQuint],
            "sine" => [Self::EaseInSine, Self::EaseOutSine, Self::EaseInOutSine],
            "circ" => [Self::EaseInCirc, Self::EaseOutCirc, Self::EaseInOutCirc],
            "expo" => [Self::EaseInExpo, Self::EaseOutExpo, Self::EaseInOutExpo],
            "back" => [Self::EaseInBack, Self::EaseOutBack, Self::EaseInOutBack],
            "elastic" => [
                Self::EaseInElastic,
                Self::EaseOutElastic,
                Self::EaseInOutElastic,
            ],
            "bounce" => [
                Self::EaseInBounce,
                Self::EaseOutBounce,
                Self::EaseInOutBounce,
            ],
            _ => return None,
        };
        Some(match phase {
            Phase::In => triple[0],
            Phase::Out => triple[1],
            Phase::InOut => triple[2],
        })
    }

    /// Canonical camelCase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseOutQuart => "easeOutQuart",
            Self::EaseInOutQuart => "easeInOutQuart",
            Self::EaseInQuint => "easeInQuint",
            Self::EaseOutQuint => "easeOutQuint",
            Self::EaseInOutQuint => "easeInOutQuint",
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseInCirc => "easeInCirc",
            Self::EaseOutCirc => "easeOutCirc",
            Self::EaseInOutCirc => "easeInOutCirc",
            Self::EaseInExpo => "easeInExpo",
            Self::EaseOutExpo => "easeOutExpo",
            Self::EaseInOutExpo => "easeInOutExpo",
            Self::EaseInBack => "easeInBack",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseInOutBack => "easeInOutBack",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
            Self::EaseInBounce => "easeInBounce",
            Self::EaseOutBounce => "easeOutBounce",
            Self::EaseInOutBounce => "easeInOutBounce",
        }
    }
}

/// Caller-supplied easing function.
pub type EasingFn = Rc<dyn Fn(f64) -> f64>;

/// Pluggable easing provider.
#[derive(Clone)]
pub enum Easing {
    Curve(EasingFunction),
    Custom(EasingFn),
}

impl Easing {
    /// Named curve; unknown names fall back to `easeOutQuad`.
    pub fn named(name: &str) -> Self {
        match EasingFunction::from_name(name) {
            Some(f) => Self::Curve(f),
            None => {
                log::debug!("unknown easing '{name}', falling back to easeOutQuad");
                Self::Curve(EasingFunction::EaseOutQuad)
            }
        }
    }

    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Eased progress for linear progress `t`.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Curve(f) => f.apply(t),
            Self::Custom(f) => f(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Curve(EasingFunction::default())
    }
}

impl From<EasingFunction> for Easing {
    fn from(f: EasingFunction) -> Self {
        Self::Curve(f)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curve(c) => f.debug_tuple("Curve").field(c).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

// Easing travels as a bare name. Custom functions serialize as "custom",
// which reads back as the default curve.
impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Curve(c) => serializer.serialize_str(c.name()),
            Self::Custom(_) => serializer.serialize_str("custom"),
        }
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::named(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for f in [
            EasingFunction::Linear,
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseOutBack,
            EasingFunction::EaseInElastic,
            EasingFunction::EaseOutBounce,
        ] {
            assert_eq!(EasingFunction::from_name(f.name()), Some(f));
        }
    }

    #[test]
    fn short_and_css_aliases_resolve() {
        assert_eq!(
            EasingFunction::from_name("outQuad"),
            Some(EasingFunction::EaseOutQuad)
        );
        assert_eq!(
            EasingFunction::from_name("inOutCubic"),
            Some(EasingFunction::EaseInOutCubic)
        );
        assert_eq!(
            EasingFunction::from_name("ease-in"),
            Some(EasingFunction::EaseInQuad)
        );
        assert_eq!(
            EasingFunction::from_name("ease"),
            Some(EasingFunction::EaseInOutQuad)
        );
        assert_eq!(EasingFunction::from_name("wobble"), None);
    }

    #[test]
    fn unknown_name_falls_back_to_ease_out_quad() {
        let e = Easing::named("definitelyNotACurve");
        assert!((e.apply(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn custom_function_is_used_verbatim() {
        let e = Easing::custom(|t| t * t * t);
        assert!((e.apply(0.5) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn easing_serializes_as_name() {
        let e = Easing::Curve(EasingFunction::EaseInOutSine);
        assert_eq!(serde_json::to_string(&e).unwrap(), "\"easeInOutSine\"");
        let back: Easing = serde_json::from_str("\"linear\"").unwrap();
        assert!((back.apply(0.3) - 0.3).abs() < 1e-12);
    }
}
