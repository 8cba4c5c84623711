//! Per-tick sampling: pass/time math and property blending.
//!
//! Model:
//! - `elapsed` is measured from the effective start (scheduled start plus any
//!   frozen pause time) in milliseconds.
//! - Single pass: `raw = clamp(elapsed / duration, 0, 1)`, finished at `raw >= 1`.
//!   Loop and direction flags are ignored.
//! - Honored passes: pass index is `floor(elapsed / duration)`; the local time
//!   within the pass is reversed for `Reverse`, and on odd passes for
//!   `Alternate`. A finite pass count finishes on the last pass at local 1.
//!
//! API:
//! - `single_pass`, `honored_pass` produce a [`PassSample`]
//! - `blend_properties` interpolates a target map from a start map

use crate::data::{Direction, PropValue, Props, SCALE_KEY};
use crate::interp::{interpolate, lerp_pair, Easing};

/// Where one animation is within its timeline on this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PassSample {
    /// Normalized time within the current pass, in [0, 1].
    pub local: f64,
    /// Zero-based pass index.
    pub pass: u32,
    pub reversed: bool,
    pub finished: bool,
}

impl PassSample {
    /// Eased progress toward the target values.
    #[inline]
    pub fn progress(&self, easing: &Easing) -> f64 {
        if self.reversed {
            easing.apply(1.0 - self.local)
        } else {
            easing.apply(self.local)
        }
    }
}

pub fn single_pass(elapsed: f64, duration: f64) -> PassSample {
    let local = (elapsed / duration).clamp(0.0, 1.0);
    PassSample {
        local,
        pass: 0,
        reversed: false,
        finished: local >= 1.0,
    }
}

/// `passes == None` repeats forever.
pub fn honored_pass(
    elapsed: f64,
    duration: f64,
    passes: Option<u32>,
    direction: Direction,
) -> PassSample {
    let t = (elapsed / duration).max(0.0);
    let whole = t.floor();
    let (pass, local, finished) = match passes {
        Some(n) if whole >= f64::from(n) => (n.saturating_sub(1), 1.0, true),
        _ => (whole.min(f64::from(u32::MAX)) as u32, t - whole, false),
    };
    let reversed = match direction {
        Direction::Normal => false,
        Direction::Reverse => true,
        Direction::Alternate => pass % 2 == 1,
    };
    PassSample {
        local,
        pass,
        reversed,
        finished,
    }
}

/// Interpolate every supported entry of `target` from `from` at `progress`.
///
/// Numbers missing from `from` start at 0; a missing `scale` starts at 1×1
/// (other pairs at 0×0). Pairs blend per axis. Entries that are neither a
/// number nor a numeric pair are skipped.
pub fn blend_properties(target: &Props, from: &Props, progress: f64) -> Props {
    let mut out = Props::new();
    for (key, value) in target.iter() {
        match value {
            PropValue::Number(to) => {
                let start = from.number(key).unwrap_or(0.0);
                out.insert(key.clone(), interpolate(start, *to, progress));
            }
            PropValue::Pair { .. } => {
                let Some(to) = value.as_pair() else {
                    continue;
                };
                let rest = if key == SCALE_KEY { (1.0, 1.0) } else { (0.0, 0.0) };
                let start = from.pair(key).unwrap_or(rest);
                out.insert(key.clone(), lerp_pair(start, to, progress));
            }
            PropValue::Other(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::EasingFunction;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_pass_clamps_and_finishes() {
        assert!(approx(single_pass(-10.0, 100.0).local, 0.0));
        assert!(approx(single_pass(50.0, 100.0).local, 0.5));
        let end = single_pass(150.0, 100.0);
        assert!(approx(end.local, 1.0));
        assert!(end.finished);
    }

    #[test]
    fn alternate_reverses_odd_passes() {
        let s = honored_pass(150.0, 100.0, Some(3), Direction::Alternate);
        assert_eq!(s.pass, 1);
        assert!(s.reversed);
        assert!(approx(s.local, 0.5));
        assert!(!s.finished);

        let last = honored_pass(400.0, 100.0, Some(3), Direction::Alternate);
        assert_eq!(last.pass, 2);
        assert!(last.finished);
        assert!(!last.reversed);
        assert!(approx(last.progress(&Easing::Curve(EasingFunction::Linear)), 1.0));
    }

    #[test]
    fn infinite_passes_never_finish() {
        let s = honored_pass(1.0e7, 100.0, None, Direction::Normal);
        assert!(!s.finished);
        assert!(approx(s.local, 0.0));
    }

    #[test]
    fn reverse_runs_target_to_start() {
        let linear = Easing::Curve(EasingFunction::Linear);
        let s = honored_pass(25.0, 100.0, Some(1), Direction::Reverse);
        assert!(approx(s.progress(&linear), 0.75));
    }

    #[test]
    fn blend_uses_rest_values_for_missing_props() {
        let target = Props::new()
            .with("x", 100.0)
            .with("scale", (2.0, 3.0))
            .with("fill", "red");
        let out = blend_properties(&target, &Props::new(), 0.5);
        assert_eq!(out.number("x"), Some(50.0));
        assert_eq!(out.pair("scale"), Some((1.5, 2.0)));
        assert!(!out.contains_key("fill"));
    }

    #[test]
    fn blend_reads_live_values() {
        let target = Props::new().with("opacity", 1.0);
        let live = Props::new().with("opacity", 0.2);
        let out = blend_properties(&target, &live, 0.5);
        assert!(approx(out.number("opacity").unwrap(), 0.6));
    }
}
