//! Host contracts: shape storage and the frame clock.
//!
//! The host editor owns shapes and the display refresh. Adapters implement
//! [`ShapeStore`] and pass it into `AnimationScheduler::tick`, and hand a
//! [`FrameClock`] to the scheduler so it can register for the next frame.

use serde::{Deserialize, Serialize};

use crate::data::Props;
use crate::ids::{FrameRequest, ShapeId};

/// Current values of one shape as read from the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub id: ShapeId,
    /// Host type tag, echoed back on patches.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub props: Props,
}

impl ShapeSnapshot {
    pub fn new(id: impl Into<ShapeId>, kind: impl Into<String>, props: Props) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props,
        }
    }

    /// Numeric property; missing or non-numeric reads as `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.props.number(key)
    }

    pub fn pair(&self, key: &str) -> Option<(f64, f64)> {
        self.props.pair(key)
    }
}

/// Partial update: only the fields that changed this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    pub id: ShapeId,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub props: Props,
}

/// Read/patch access to host-owned shapes.
pub trait ShapeStore {
    fn get_shape(&self, id: &ShapeId) -> Option<ShapeSnapshot>;
    /// Fire-and-forget. Must be a no-op for shapes the host has deleted.
    fn update_shape(&mut self, patch: ShapePatch);
}

/// "Call me on the next frame" registration.
///
/// The host fires the request by calling `AnimationScheduler::tick` with the
/// frame timestamp.
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Clock for hosts that call `tick` unconditionally every frame.
#[derive(Debug, Default)]
pub struct FreeRunningClock {
    next: u64,
}

impl FrameClock for FreeRunningClock {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next);
        self.next = self.next.wrapping_add(1);
        request
    }

    fn cancel_frame(&mut self, _request: FrameRequest) {}
}
