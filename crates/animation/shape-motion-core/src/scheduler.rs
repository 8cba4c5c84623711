//! Scheduler: registry ownership, admission, control and the tick loop.
//!
//! Methods:
//! - new, animate / try_animate, animate_group, play
//! - stop, stop_for_shapes, stop_all, pause, resume, pause_animation, resume_animation
//! - schedule, cancel_timer, play_sequence
//! - queries, on, destroy, tick (timers → sample → patch → events → prune)
//!
//! Start times are measured against the timestamp of the most recent tick, so
//! hosts should tick once before admitting work.

use std::rc::Rc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::{LoopPolicy, PauseMode, SchedulerConfig};
use crate::data::{AnimationConfig, AnimationDescriptor, AnimationGroup, Props, Timing};
use crate::error::AnimationError;
use crate::events::{EventBus, EventKind, SchedulerEvent, Subscription};
use crate::host::{FrameClock, ShapePatch, ShapeStore};
use crate::ids::{AnimationId, FrameRequest, GroupId, IdAllocator, ShapeId, TimerId};
use crate::interp::check_descriptor;
use crate::sampling::{blend_properties, honored_pass, single_pass};
use crate::timers::{TimerAction, TimerQueue};

/// Lifecycle state of a registered descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Registered with `autoplay == false`; waits for `play`.
    Held,
    /// Admitted, start time not reached yet.
    Scheduled,
    /// Sampled at least once.
    Running,
}

#[derive(Debug)]
struct ActiveAnimation {
    descriptor: Rc<AnimationDescriptor>,
    timing: Timing,
    state: AnimationState,
    /// Paused time excluded from elapsed (freeze mode only).
    frozen_ms: f64,
    /// Start values per target, captured on the first running tick (honored loops only).
    origins: HashMap<ShapeId, Props>,
}

impl ActiveAnimation {
    fn new(descriptor: AnimationDescriptor, timing: Timing, state: AnimationState) -> Self {
        Self {
            descriptor: Rc::new(descriptor),
            timing,
            state,
            frozen_ms: 0.0,
            origins: HashMap::new(),
        }
    }

    fn effective_start(&self) -> Option<f64> {
        self.descriptor
            .scheduled_start()
            .map(|start| start + self.frozen_ms)
    }
}

/// Owns every registry of one animation session.
pub struct AnimationScheduler {
    cfg: SchedulerConfig,
    clock: Box<dyn FrameClock>,
    pending_frame: Option<FrameRequest>,

    // Registries
    active: IndexMap<AnimationId, ActiveAnimation>,
    groups: HashMap<GroupId, AnimationGroup>,
    events: EventBus<SchedulerEvent>,
    timers: TimerQueue,
    ids: IdAllocator,

    running: bool,
    destroyed: bool,
    current_time: f64,
    last_tick: Option<f64>,
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("active", &self.active.len())
            .field("groups", &self.groups.len())
            .field("timers", &self.timers.len())
            .field("running", &self.running)
            .field("destroyed", &self.destroyed)
            .field("current_time", &self.current_time)
            .finish()
    }
}

impl AnimationScheduler {
    /// Create a scheduler and register for the first frame.
    pub fn new(cfg: SchedulerConfig, clock: Box<dyn FrameClock>) -> Self {
        let mut scheduler = Self {
            cfg,
            clock,
            pending_frame: None,
            active: IndexMap::new(),
            groups: HashMap::new(),
            events: EventBus::new(),
            timers: TimerQueue::new(),
            ids: IdAllocator::new(),
            running: true,
            destroyed: false,
            current_time: 0.0,
            last_tick: None,
        };
        scheduler.request_frame();
        debug!("animation scheduler initialized");
        scheduler
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    // ---------- Admission ----------

    /// Admit a descriptor. Rejections are logged and yield the empty id.
    pub fn animate(&mut self, descriptor: AnimationDescriptor) -> AnimationId {
        match self.try_animate(descriptor) {
            Ok(id) => id,
            Err(err) => {
                warn!("animation rejected ({}): {err}", err.category());
                AnimationId::empty()
            }
        }
    }

    /// Admit a descriptor, reporting why it was rejected.
    pub fn try_animate(
        &mut self,
        mut descriptor: AnimationDescriptor,
    ) -> Result<AnimationId, AnimationError> {
        if self.destroyed {
            return Err(AnimationError::Destroyed);
        }
        if descriptor.id.is_empty() {
            descriptor.id = AnimationId::generate();
        }
        let timing = descriptor.config.resolve(&self.cfg);
        check_descriptor(&descriptor, &timing)?;
        if self.active.contains_key(&descriptor.id) {
            return Err(AnimationError::DuplicateId {
                id: descriptor.id.to_string(),
            });
        }

        let id = descriptor.id.clone();
        if !timing.autoplay {
            debug!("holding animation {id} until play");
            self.active.insert(
                id.clone(),
                ActiveAnimation::new(descriptor, timing, AnimationState::Held),
            );
            return Ok(id);
        }

        descriptor.set_scheduled_start(self.current_time + timing.delay);
        debug!(
            "starting animation {id} for {} shape(s)",
            descriptor.targets.len()
        );
        let entry = ActiveAnimation::new(descriptor, timing, AnimationState::Scheduled);
        let started = entry.descriptor.clone();
        self.active.insert(id.clone(), entry);
        self.notify_start(&started);
        Ok(id)
    }

    /// Admit every member with the group config as defaults.
    ///
    /// Member `i` gets `i * stagger` added to its resolved delay. Invalid
    /// members are skipped; the group keeps the admitted ones.
    pub fn animate_group(&mut self, group: AnimationGroup) -> GroupId {
        if self.destroyed {
            debug!("animate_group ignored: scheduler destroyed");
            return GroupId::default();
        }
        let AnimationGroup {
            id,
            animations,
            config,
        } = group;
        let id = if id.is_empty() { GroupId::generate() } else { id };
        let config = config.unwrap_or_default();
        let stagger = config.stagger.unwrap_or(0.0);
        let defaults = AnimationConfig {
            stagger: None,
            ..config.clone()
        };

        let total = animations.len();
        let mut members = Vec::with_capacity(total);
        for (index, mut member) in animations.into_iter().enumerate() {
            let mut merged = defaults.overlay(&member.config);
            if stagger != 0.0 {
                let base = merged.delay.unwrap_or(self.cfg.default_delay_ms);
                merged.delay = Some(base + index as f64 * stagger);
            }
            member.config = merged;
            match self.try_animate(member) {
                Ok(aid) => {
                    if let Some(entry) = self.active.get(&aid) {
                        members.push((*entry.descriptor).clone());
                    }
                }
                Err(err) => warn!("group {id}: member {index} rejected: {err}"),
            }
        }

        debug!(
            "starting animation group {id} with {}/{total} animations",
            members.len()
        );
        self.groups.insert(
            id.clone(),
            AnimationGroup {
                id: id.clone(),
                animations: members,
                config: Some(config),
            },
        );
        id
    }

    /// Start a descriptor held by `autoplay == false`.
    pub fn play(&mut self, id: &AnimationId) -> bool {
        let now = self.current_time;
        let Some(entry) = self.active.get_mut(id) else {
            return false;
        };
        if entry.state != AnimationState::Held {
            return false;
        }
        Rc::make_mut(&mut entry.descriptor).set_scheduled_start(now + entry.timing.delay);
        entry.state = AnimationState::Scheduled;
        let started = entry.descriptor.clone();
        debug!("playing held animation {id}");
        self.notify_start(&started);
        true
    }

    fn notify_start(&self, descriptor: &Rc<AnimationDescriptor>) {
        self.events.emit(&SchedulerEvent::AnimationStart {
            animation: descriptor.clone(),
        });
        if let Some(cb) = &descriptor.callbacks.on_start {
            cb(descriptor);
        }
    }

    // ---------- Control ----------

    /// Remove one descriptor. False if it is not registered.
    pub fn stop(&mut self, id: &AnimationId) -> bool {
        if self.active.shift_remove(id).is_some() {
            self.prune_groups();
            debug!("stopped animation {id}");
            true
        } else {
            false
        }
    }

    /// Remove every descriptor targeting any of `shapes`; returns how many.
    pub fn stop_for_shapes(&mut self, shapes: &[ShapeId]) -> usize {
        let before = self.active.len();
        self.active.retain(|_, entry| {
            !shapes
                .iter()
                .any(|shape| entry.descriptor.targets_shape(shape))
        });
        let stopped = before - self.active.len();
        if stopped > 0 {
            self.prune_groups();
        }
        debug!("stopped {stopped} animation(s) for {} shape(s)", shapes.len());
        stopped
    }

    /// Clear descriptors, groups and pending timers.
    pub fn stop_all(&mut self) {
        let count = self.active.len();
        self.active.clear();
        self.groups.clear();
        self.timers.clear();
        debug!("stopped all {count} animation(s)");
    }

    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.running = false;
        self.events.emit(&SchedulerEvent::SystemPause);
        debug!("animation scheduler paused");
    }

    pub fn resume(&mut self) {
        if self.destroyed {
            return;
        }
        self.running = true;
        self.events.emit(&SchedulerEvent::SystemResume);
        debug!("animation scheduler resumed");
    }

    /// Emit `animationPause` for a registered descriptor. Sampling is unaffected.
    pub fn pause_animation(&mut self, id: &AnimationId) -> bool {
        let Some(entry) = self.active.get(id) else {
            return false;
        };
        let animation = entry.descriptor.clone();
        self.events.emit(&SchedulerEvent::AnimationPause {
            animation: animation.clone(),
        });
        if let Some(cb) = &animation.callbacks.on_pause {
            cb(&animation);
        }
        true
    }

    /// Emit `animationResume` for a registered descriptor.
    pub fn resume_animation(&mut self, id: &AnimationId) -> bool {
        let Some(entry) = self.active.get(id) else {
            return false;
        };
        let animation = entry.descriptor.clone();
        self.events.emit(&SchedulerEvent::AnimationResume {
            animation: animation.clone(),
        });
        if let Some(cb) = &animation.callbacks.on_resume {
            cb(&animation);
        }
        true
    }

    /// Tear down: cancel the frame request, drop registries, listeners and
    /// timers. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            debug!("destroy ignored: already destroyed");
            return;
        }
        if let Some(request) = self.pending_frame.take() {
            self.clock.cancel_frame(request);
        }
        self.stop_all();
        self.events.clear();
        self.destroyed = true;
        debug!("animation scheduler destroyed");
    }

    // ---------- Timers ----------

    /// Run `action` once, `delay_ms` after the current frame time.
    pub fn schedule(&mut self, delay_ms: f64, action: TimerAction) -> TimerId {
        let id = self.ids.alloc_timer();
        if self.destroyed {
            debug!("timer {id:?} dropped: scheduler destroyed");
            return id;
        }
        let due = self.current_time + delay_ms.max(0.0);
        self.timers.schedule(id, due, action);
        id
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Admit `steps` one after another, step `k` at `k * gap_ms`.
    pub fn play_sequence(&mut self, steps: Vec<AnimationDescriptor>, gap_ms: f64) -> Vec<TimerId> {
        steps
            .into_iter()
            .enumerate()
            .map(|(k, step)| self.schedule(k as f64 * gap_ms, TimerAction::Animate(step)))
            .collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ---------- Queries ----------

    /// Registered descriptors in admission order.
    pub fn active_animations(&self) -> Vec<Rc<AnimationDescriptor>> {
        self.active
            .values()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn animations_for_shape(&self, shape: &ShapeId) -> Vec<Rc<AnimationDescriptor>> {
        self.active
            .values()
            .filter(|entry| entry.descriptor.targets_shape(shape))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Any registered descriptor, or any targeting `shape`.
    pub fn is_animating(&self, shape: Option<&ShapeId>) -> bool {
        match shape {
            None => !self.active.is_empty(),
            Some(shape) => self
                .active
                .values()
                .any(|entry| entry.descriptor.targets_shape(shape)),
        }
    }

    #[inline]
    pub fn animation_count(&self) -> usize {
        self.active.len()
    }

    pub fn state(&self, id: &AnimationId) -> Option<AnimationState> {
        self.active.get(id).map(|entry| entry.state)
    }

    pub fn group(&self, id: &GroupId) -> Option<&AnimationGroup> {
        self.groups.get(id)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        !self.running
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Timestamp of the most recent tick.
    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Subscribe to one event channel.
    pub fn on(
        &self,
        kind: EventKind,
        handler: impl Fn(&SchedulerEvent) + 'static,
    ) -> Subscription {
        self.events.on(kind, handler)
    }

    // ---------- Tick ----------

    /// One frame: fire due timers, sample running descriptors, patch shapes,
    /// emit events, prune finished work, then request the next frame.
    pub fn tick(&mut self, now: f64, store: &mut dyn ShapeStore) {
        if self.destroyed {
            return;
        }
        self.pending_frame = None;
        let gap = self.last_tick.map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick = Some(now);
        self.current_time = now;

        self.fire_timers(now);

        if self.running {
            self.update_animations(now, store);
        } else if self.cfg.pause_mode == PauseMode::Freeze {
            for entry in self.active.values_mut() {
                if entry.state != AnimationState::Held {
                    entry.frozen_ms += gap;
                }
            }
        }

        self.request_frame();
    }

    fn fire_timers(&mut self, now: f64) {
        let cap = self.cfg.max_timers_per_tick;
        let due = self.timers.take_due(now, cap);
        if due.len() == cap && !self.timers.is_empty() {
            debug!("timer cap reached; {} timer(s) deferred", self.timers.len());
        }
        for (id, action) in due {
            trace!("timer {id:?} fired at {now}");
            match action {
                TimerAction::Animate(descriptor) => {
                    self.animate(descriptor);
                }
                TimerAction::AnimateGroup(group) => {
                    self.animate_group(group);
                }
            }
        }
    }

    fn update_animations(&mut self, now: f64, store: &mut dyn ShapeStore) {
        let policy = self.cfg.loop_policy;
        let mut completed = Vec::new();

        for (id, entry) in self.active.iter_mut() {
            let Some(start) = entry.effective_start() else {
                continue;
            };
            if now < start {
                continue;
            }
            entry.state = AnimationState::Running;

            let elapsed = now - start;
            let sample = match policy {
                LoopPolicy::SinglePass => single_pass(elapsed, entry.timing.duration),
                LoopPolicy::Honor => honored_pass(
                    elapsed,
                    entry.timing.duration,
                    entry.timing.passes,
                    entry.timing.direction,
                ),
            };
            let progress = sample.progress(&entry.timing.easing);
            let descriptor = entry.descriptor.clone();

            for target in &descriptor.targets {
                let Some(shape) = store.get_shape(target) else {
                    continue;
                };
                let from: &Props = match policy {
                    LoopPolicy::SinglePass => &shape.props,
                    LoopPolicy::Honor => &*entry
                        .origins
                        .entry(target.clone())
                        .or_insert_with(|| shape.props.clone()),
                };
                let props = blend_properties(&descriptor.properties, from, progress);
                if props.is_empty() {
                    continue;
                }
                store.update_shape(ShapePatch {
                    id: target.clone(),
                    kind: shape.kind.clone(),
                    props,
                });
            }

            self.events.emit(&SchedulerEvent::AnimationUpdate {
                animation: descriptor.clone(),
                progress,
            });
            if let Some(cb) = &descriptor.callbacks.on_update {
                cb(&descriptor, progress);
            }

            if sample.finished {
                self.events.emit(&SchedulerEvent::AnimationComplete {
                    animation: descriptor.clone(),
                });
                if let Some(cb) = &descriptor.callbacks.on_complete {
                    cb(&descriptor);
                }
                completed.push(id.clone());
            }
        }

        for id in &completed {
            self.active.shift_remove(id);
            trace!("animation {id} completed");
        }
        if !completed.is_empty() {
            self.prune_groups();
        }
    }

    /// Forget groups with no registered member left.
    fn prune_groups(&mut self) {
        let active = &self.active;
        self.groups.retain(|_, group| {
            group
                .animations
                .iter()
                .any(|member| active.contains_key(&member.id))
        });
    }

    fn request_frame(&mut self) {
        if let Some(previous) = self.pending_frame.take() {
            self.clock.cancel_frame(previous);
        }
        self.pending_frame = Some(self.clock.request_frame());
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        if let Some(request) = self.pending_frame.take() {
            self.clock.cancel_frame(request);
        }
    }
}
