#![allow(dead_code)]
use std::cell::RefCell;
use std::rc::Rc;

use shape_motion_core::{
    AnimationConfig, AnimationDescriptor, AnimationKind, AnimationScheduler, EasingFunction,
    EventKind, Props, SchedulerConfig, ShapeId, ShapeSnapshot,
};
use shape_motion_test_fixtures::{ManualFrameClock, MemoryShapeStore};

pub fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn ids(list: &[&str]) -> Vec<ShapeId> {
    list.iter().map(|s| ShapeId::from(*s)).collect()
}

/// Linear easing over `ms`.
pub fn linear(ms: f64) -> AnimationConfig {
    AnimationConfig::new()
        .duration(ms)
        .easing(EasingFunction::Linear)
}

pub fn fade(id: &str, target: &str, to: f64, config: AnimationConfig) -> AnimationDescriptor {
    AnimationDescriptor::new(
        AnimationKind::Fade,
        ids(&[target]),
        Props::new().with("opacity", to),
    )
    .with_id(id)
    .with_config(config)
}

/// Scheduler + in-memory canvas with shapes `a`, `b`, `c`, ticked once at t=0.
pub struct Rig {
    pub sched: AnimationScheduler,
    pub store: MemoryShapeStore,
    pub clock: ManualFrameClock,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(cfg: SchedulerConfig) -> Self {
        let clock = ManualFrameClock::new();
        let sched = AnimationScheduler::new(cfg, Box::new(clock.clone()));
        let store = MemoryShapeStore::from_shapes(["a", "b", "c"].into_iter().map(|id| {
            ShapeSnapshot::new(
                id,
                "geo",
                Props::new()
                    .with("x", 0.0)
                    .with("y", 0.0)
                    .with("opacity", 0.0)
                    .with("scale", (1.0, 1.0)),
            )
        }));
        let mut rig = Self {
            sched,
            store,
            clock,
        };
        rig.tick(0.0);
        rig
    }

    pub fn tick(&mut self, now: f64) {
        self.sched.tick(now, &mut self.store);
    }

    pub fn opacity(&self, shape: &str) -> f64 {
        self.store.number(shape, "opacity").unwrap_or(f64::NAN)
    }

    pub fn x(&self, shape: &str) -> f64 {
        self.store.number(shape, "x").unwrap_or(f64::NAN)
    }
}

/// One recorded event: descriptor id (empty for system events) and progress.
pub type Log = Rc<RefCell<Vec<(String, Option<f64>)>>>;

pub fn record(sched: &AnimationScheduler, kind: EventKind) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    sched.on(kind, move |event| {
        let id = event
            .animation()
            .map(|a| a.id.to_string())
            .unwrap_or_default();
        sink.borrow_mut().push((id, event.progress()));
    });
    log
}
