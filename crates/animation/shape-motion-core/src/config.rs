//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::interp::EasingFunction;

/// How a global pause treats time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseMode {
    /// Time keeps running while paused; on resume in-flight animations jump
    /// to where the clock says they should be.
    #[default]
    Advance,
    /// Paused intervals are excluded from every running animation's elapsed time.
    Freeze,
}

/// Whether the tick loop interprets `loop` and `direction` on descriptors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPolicy {
    /// Every descriptor completes after one pass, whatever its loop/direction flags.
    #[default]
    SinglePass,
    /// Repeat for `loop` passes, reversing on alternate passes.
    Honor,
}

/// Configuration for scheduler defaults and behavior switches.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Duration applied when neither descriptor nor group sets one (ms).
    pub default_duration_ms: f64,
    /// Delay applied when neither descriptor nor group sets one (ms).
    pub default_delay_ms: f64,
    /// Easing applied when neither descriptor nor group sets one.
    pub default_easing: EasingFunction,

    pub pause_mode: PauseMode,
    pub loop_policy: LoopPolicy,

    /// Maximum timers fired in one tick; the rest wait for the next tick.
    pub max_timers_per_tick: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 1000.0,
            default_delay_ms: 0.0,
            default_easing: EasingFunction::EaseOutQuad,
            pause_mode: PauseMode::Advance,
            loop_policy: LoopPolicy::SinglePass,
            max_timers_per_tick: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SchedulerConfig =
            serde_json::from_str(r#"{ "pause_mode": "freeze" }"#).unwrap();
        assert_eq!(cfg.pause_mode, PauseMode::Freeze);
        assert_eq!(cfg.loop_policy, LoopPolicy::SinglePass);
        assert_eq!(cfg.default_duration_ms, 1000.0);
        assert_eq!(cfg.default_easing, EasingFunction::EaseOutQuad);
    }
}
