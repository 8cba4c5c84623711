//! Typed publish/subscribe for scheduler lifecycle events.
//!
//! Listeners are kept per event kind in subscription order and are called
//! synchronously. Emission walks a snapshot of the channel, so a handler may
//! unsubscribe itself (or others) mid-dispatch: removal is by listener id,
//! and a listener removed during dispatch is not called afterwards.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::data::AnimationDescriptor;
use crate::ids::{IdAllocator, ListenerId};

/// An event that knows which channel it is published on.
pub trait BusEvent: 'static {
    type Kind: Copy + Eq + Hash + fmt::Debug + 'static;
    fn kind(&self) -> Self::Kind;
}

type Handler<E> = Rc<dyn Fn(&E)>;

struct Channels<E: BusEvent> {
    ids: IdAllocator,
    listeners: HashMap<E::Kind, Vec<(ListenerId, Handler<E>)>>,
}

impl<E: BusEvent> Channels<E> {
    fn contains(&self, kind: E::Kind, id: ListenerId) -> bool {
        self.listeners
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(lid, _)| *lid == id))
    }
}

trait Unsubscribe {
    fn remove(&mut self, id: ListenerId) -> bool;
}

impl<E: BusEvent> Unsubscribe for Channels<E> {
    fn remove(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }
}

/// Handle returned by [`EventBus::on`]. Dropping it keeps the listener;
/// call [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: ListenerId,
    bus: Weak<RefCell<dyn Unsubscribe>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. False if it was already gone or the bus is dropped.
    pub fn unsubscribe(self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.borrow_mut().remove(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Ordered, synchronous publish/subscribe keyed by event kind.
pub struct EventBus<E: BusEvent> {
    inner: Rc<RefCell<Channels<E>>>,
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Channels {
                ids: IdAllocator::new(),
                listeners: HashMap::new(),
            })),
        }
    }

    /// Append a listener to the `kind` channel.
    pub fn on(&self, kind: E::Kind, handler: impl Fn(&E) + 'static) -> Subscription {
        let mut channels = self.inner.borrow_mut();
        let id = channels.ids.alloc_listener();
        channels
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        let bus: Weak<RefCell<dyn Unsubscribe>> = Rc::downgrade(&self.inner) as _;
        Subscription { id, bus }
    }

    /// Remove a listener by id.
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().remove(id)
    }

    /// Dispatch to every listener of the event's kind, in subscription order.
    pub fn emit(&self, event: &E) {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, Handler<E>)> = match self.inner.borrow().listeners.get(&kind) {
            Some(list) => list.clone(),
            None => return,
        };
        for (id, handler) in snapshot {
            if self.inner.borrow().contains(kind, id) {
                handler(event);
            }
        }
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Drop every listener on every channel.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }
}

/// Scheduler event channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    AnimationStart,
    AnimationUpdate,
    AnimationComplete,
    AnimationPause,
    AnimationResume,
    SystemPause,
    SystemResume,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        Self::AnimationStart,
        Self::AnimationUpdate,
        Self::AnimationComplete,
        Self::AnimationPause,
        Self::AnimationResume,
        Self::SystemPause,
        Self::SystemResume,
    ];

    /// Wire name of this channel.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnimationStart => "animationStart",
            Self::AnimationUpdate => "animationUpdate",
            Self::AnimationComplete => "animationComplete",
            Self::AnimationPause => "animationPause",
            Self::AnimationResume => "animationResume",
            Self::SystemPause => "systemPause",
            Self::SystemResume => "systemResume",
        }
    }

    #[inline]
    pub fn is_system_event(&self) -> bool {
        matches!(self, Self::SystemPause | Self::SystemResume)
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown event name '{s}'"))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle notifications emitted by the scheduler.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum SchedulerEvent {
    AnimationStart {
        animation: Rc<AnimationDescriptor>,
    },
    AnimationUpdate {
        animation: Rc<AnimationDescriptor>,
        progress: f64,
    },
    AnimationComplete {
        animation: Rc<AnimationDescriptor>,
    },
    AnimationPause {
        animation: Rc<AnimationDescriptor>,
    },
    AnimationResume {
        animation: Rc<AnimationDescriptor>,
    },
    SystemPause,
    SystemResume,
}

impl SchedulerEvent {
    /// The descriptor this event concerns, if any.
    pub fn animation(&self) -> Option<&AnimationDescriptor> {
        match self {
            Self::AnimationStart { animation }
            | Self::AnimationUpdate { animation, .. }
            | Self::AnimationComplete { animation }
            | Self::AnimationPause { animation }
            | Self::AnimationResume { animation } => Some(animation),
            Self::SystemPause | Self::SystemResume => None,
        }
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::AnimationUpdate { progress, .. } => Some(*progress),
            _ => None,
        }
    }
}

impl BusEvent for SchedulerEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::AnimationStart { .. } => EventKind::AnimationStart,
            Self::AnimationUpdate { .. } => EventKind::AnimationUpdate,
            Self::AnimationComplete { .. } => EventKind::AnimationComplete,
            Self::AnimationPause { .. } => EventKind::AnimationPause,
            Self::AnimationResume { .. } => EventKind::AnimationResume,
            Self::SystemPause => EventKind::SystemPause,
            Self::SystemResume => EventKind::SystemResume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn listeners_run_in_subscription_order() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let log = log.clone();
            bus.on(EventKind::SystemPause, move |_| log.borrow_mut().push(n));
        }
        bus.emit(&SchedulerEvent::SystemPause);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn channels_are_independent() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        bus.on(EventKind::SystemResume, move |_| h.set(h.get() + 1));
        bus.emit(&SchedulerEvent::SystemPause);
        assert_eq!(hits.get(), 0);
        bus.emit(&SchedulerEvent::SystemResume);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unsubscribe_removes_by_identity() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h0 = hits.clone();
        let first = bus.on(EventKind::SystemPause, move |_| h0.borrow_mut().push("a"));
        let h1 = hits.clone();
        let _second = bus.on(EventKind::SystemPause, move |_| h1.borrow_mut().push("b"));
        assert!(first.unsubscribe());
        bus.emit(&SchedulerEvent::SystemPause);
        assert_eq!(*hits.borrow(), vec!["b"]);
        assert_eq!(bus.listener_count(EventKind::SystemPause), 1);
    }

    #[test]
    fn self_unsubscribe_during_emit_does_not_skip_neighbours() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let (h, s) = (hits.clone(), slot.clone());
        let sub = bus.on(EventKind::SystemPause, move |_| {
            h.borrow_mut().push("once");
            if let Some(sub) = s.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        *slot.borrow_mut() = Some(sub);
        let h = hits.clone();
        bus.on(EventKind::SystemPause, move |_| h.borrow_mut().push("always"));

        bus.emit(&SchedulerEvent::SystemPause);
        bus.emit(&SchedulerEvent::SystemPause);
        assert_eq!(*hits.borrow(), vec!["once", "always", "always"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_not_called() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let victim: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let bus = Rc::new(bus);

        let (b, v) = (Rc::downgrade(&bus), victim.clone());
        bus.on(EventKind::SystemResume, move |_| {
            if let (Some(bus), Some(id)) = (b.upgrade(), v.get()) {
                bus.off(id);
            }
        });
        let h = hits.clone();
        let second = bus.on(EventKind::SystemResume, move |_| h.set(h.get() + 1));
        victim.set(Some(second.id()));

        bus.emit(&SchedulerEvent::SystemResume);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn event_names_parse() {
        for kind in EventKind::ALL {
            assert_eq!(kind.name().parse::<EventKind>(), Ok(kind));
        }
        assert!("animationExplode".parse::<EventKind>().is_err());
    }

    #[test]
    fn clear_drops_everything() {
        let bus: EventBus<SchedulerEvent> = EventBus::new();
        bus.on(EventKind::SystemPause, |_| {});
        bus.on(EventKind::AnimationUpdate, |_| {});
        bus.clear();
        assert_eq!(bus.listener_count(EventKind::SystemPause), 0);
        assert_eq!(bus.listener_count(EventKind::AnimationUpdate), 0);
    }
}
