//! Descriptor validation.

use crate::data::{AnimationDescriptor, PropValue, Props, Timing, NUMERIC_KEYS, SCALE_KEY};
use crate::error::AnimationError;

/// Check a property map, naming the first offending key.
///
/// Empty maps fail. Recognized numeric keys must hold numbers, `scale` must be
/// an `{x, y}` pair of numbers. Unknown keys pass untouched.
pub fn check_properties(props: &Props) -> Result<(), AnimationError> {
    if props.is_empty() {
        return Err(AnimationError::EmptyProperties);
    }
    for key in NUMERIC_KEYS {
        if let Some(value) = props.get(key) {
            if value.as_number().is_none() {
                return Err(AnimationError::NonNumericProperty {
                    key: key.to_string(),
                });
            }
        }
    }
    if let Some(value) = props.get(SCALE_KEY) {
        if !matches!(value, PropValue::Pair { .. }) || value.as_pair().is_none() {
            return Err(AnimationError::InvalidPair {
                key: SCALE_KEY.to_string(),
            });
        }
    }
    Ok(())
}

/// Boolean form of [`check_properties`].
pub fn validate(props: &Props) -> bool {
    check_properties(props).is_ok()
}

/// Full admission check: properties, targets and resolved timing.
pub fn check_descriptor(desc: &AnimationDescriptor, timing: &Timing) -> Result<(), AnimationError> {
    check_properties(&desc.properties)?;
    if desc.targets.is_empty() {
        return Err(AnimationError::NoTargets {
            id: desc.id.to_string(),
        });
    }
    if !timing.duration.is_finite() || timing.duration <= 0.0 {
        return Err(AnimationError::InvalidDuration {
            duration: timing.duration,
        });
    }
    if !timing.delay.is_finite() || timing.delay < 0.0 {
        return Err(AnimationError::InvalidDelay {
            delay: timing.delay,
        });
    }
    Ok(())
}
