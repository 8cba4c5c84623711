//! Identifiers and simple allocators for scheduler entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a shape owned by the host editor. The scheduler only ever
/// holds ids, never shape state.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one animation descriptor. The empty id is the failure
/// sentinel returned when admission is rejected.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(pub String);

impl AnimationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh `anim-<uuid>` id.
    pub fn generate() -> Self {
        Self(format!("anim-{}", uuid::Uuid::new_v4().simple()))
    }

    /// The failure sentinel.
    pub fn empty() -> Self {
        Self(String::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnimationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an animation group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("group-{}", uuid::Uuid::new_v4().simple()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Handle returned by a [`crate::host::FrameClock`] for one pending frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameRequest(pub u64);

/// Monotonic allocator for ListenerId and TimerId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_listener: u64,
    next_timer: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_listener(), ListenerId(0));
        assert_eq!(alloc.alloc_listener(), ListenerId(1));
        assert_eq!(alloc.alloc_timer(), TimerId(0));
        assert_eq!(alloc.alloc_timer(), TimerId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_timer(), TimerId(0));
    }

    #[test]
    fn generated_animation_ids_are_prefixed_and_distinct() {
        let a = AnimationId::generate();
        let b = AnimationId::generate();
        assert!(a.as_str().starts_with("anim-"));
        assert_ne!(a, b);
        assert!(AnimationId::empty().is_empty());
    }
}
