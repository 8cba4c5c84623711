//! Shape Motion Core (host-agnostic)
//!
//! Animation descriptors for canvas shapes plus the scheduler that plays them.
//! This crate defines the descriptor model and its factories, easing and
//! validation, a typed event bus, and an [`AnimationScheduler`] that samples
//! active descriptors once per frame and patches shapes through the
//! [`ShapeStore`] trait. The host drives frames through [`FrameClock`] and
//! `AnimationScheduler::tick`.

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod factories;
pub mod host;
pub mod ids;
pub mod interp;
pub mod sampling;
pub mod scheduler;
pub mod timers;

// Re-exports for consumers (host adapters)
pub use config::{LoopPolicy, PauseMode, SchedulerConfig};
pub use data::{
    AnimationConfig, AnimationDescriptor, AnimationGroup, AnimationKind, Direction, LoopSetting,
    PropValue, Props, Timing,
};
pub use error::AnimationError;
pub use events::{EventBus, EventKind, SchedulerEvent, Subscription};
pub use host::{FrameClock, FreeRunningClock, ShapePatch, ShapeSnapshot, ShapeStore};
pub use ids::{AnimationId, FrameRequest, GroupId, ListenerId, ShapeId, TimerId};
pub use interp::{interpolate, validate, Easing, EasingFunction};
pub use scheduler::{AnimationScheduler, AnimationState};
pub use timers::TimerAction;
