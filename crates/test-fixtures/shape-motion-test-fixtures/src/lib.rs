//! Shared test support: JSON fixtures plus in-memory host doubles.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shape_motion_core::{
    FrameClock, FrameRequest, ShapeId, ShapePatch, ShapeSnapshot, ShapeStore,
};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, String>,
    descriptors: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Canvas scenes: `{ "shapes": [ShapeSnapshot, ...] }`.
pub mod scenes {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Scene {
        shapes: Vec<ShapeSnapshot>,
    }

    pub fn keys() -> Vec<String> {
        MANIFEST.scenes.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.scenes, "scene", name)?)
    }

    /// Fresh store populated with the scene's shapes.
    pub fn store(name: &str) -> Result<MemoryShapeStore> {
        let scene: Scene = load_json(lookup(&MANIFEST.scenes, "scene", name)?)?;
        Ok(MemoryShapeStore::from_shapes(scene.shapes))
    }
}

/// Serialized animation descriptors and groups.
pub mod descriptors {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.descriptors.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.descriptors, "descriptor", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::load_json(lookup(&MANIFEST.descriptors, "descriptor", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&MANIFEST.descriptors, "descriptor", name)?))
    }
}

/// Shape store that keeps shapes in memory and records every patch.
#[derive(Debug, Default)]
pub struct MemoryShapeStore {
    shapes: HashMap<ShapeId, ShapeSnapshot>,
    patches: Vec<ShapePatch>,
}

impl MemoryShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: impl IntoIterator<Item = ShapeSnapshot>) -> Self {
        let mut store = Self::new();
        for shape in shapes {
            store.insert(shape);
        }
        store
    }

    pub fn insert(&mut self, shape: ShapeSnapshot) {
        self.shapes.insert(shape.id.clone(), shape);
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<ShapeSnapshot> {
        self.shapes.remove(id)
    }

    pub fn shape(&self, id: &str) -> Option<&ShapeSnapshot> {
        self.shapes.get(&ShapeId::from(id))
    }

    pub fn number(&self, id: &str, key: &str) -> Option<f64> {
        self.shape(id).and_then(|s| s.number(key))
    }

    pub fn pair(&self, id: &str, key: &str) -> Option<(f64, f64)> {
        self.shape(id).and_then(|s| s.pair(key))
    }

    /// Every patch applied so far, including ones for deleted shapes.
    pub fn patches(&self) -> &[ShapePatch] {
        &self.patches
    }

    pub fn patches_for(&self, id: &str) -> Vec<&ShapePatch> {
        self.patches.iter().filter(|p| p.id.as_str() == id).collect()
    }

    pub fn clear_patches(&mut self) {
        self.patches.clear();
    }
}

impl ShapeStore for MemoryShapeStore {
    fn get_shape(&self, id: &ShapeId) -> Option<ShapeSnapshot> {
        self.shapes.get(id).cloned()
    }

    fn update_shape(&mut self, patch: ShapePatch) {
        if let Some(shape) = self.shapes.get_mut(&patch.id) {
            for (key, value) in patch.props.iter() {
                shape.props.insert(key.clone(), value.clone());
            }
        }
        self.patches.push(patch);
    }
}

#[derive(Debug, Default)]
struct ClockState {
    next: Cell<u64>,
    pending: RefCell<Vec<FrameRequest>>,
    cancelled: RefCell<Vec<FrameRequest>>,
}

/// Frame clock whose state stays observable after the scheduler takes it.
/// Clone it before boxing; clones share state.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameClock {
    state: Rc<ClockState>,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests. Issuing a new request retires the previous one
    /// as fired, like a display loop that only ever has one frame queued.
    pub fn pending(&self) -> Vec<FrameRequest> {
        self.state.pending.borrow().clone()
    }

    pub fn cancelled(&self) -> Vec<FrameRequest> {
        self.state.cancelled.borrow().clone()
    }

    pub fn requested(&self) -> u64 {
        self.state.next.get()
    }
}

impl FrameClock for ManualFrameClock {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.state.next.get());
        self.state.next.set(request.0 + 1);
        let mut pending = self.state.pending.borrow_mut();
        pending.clear();
        pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut pending = self.state.pending.borrow_mut();
        if let Some(pos) = pending.iter().position(|r| *r == request) {
            pending.remove(pos);
        }
        self.state.cancelled.borrow_mut().push(request);
    }
}
