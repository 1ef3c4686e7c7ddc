//! Model loading seam
//!
//! Decoding assets is someone else's job: a [`ModelLoader`] turns a url into
//! a [`LoadedModel`]. The scene hands every load a [`LoadToken`]; starting a
//! newer load cancels the older token, and the scene compares generations
//! before applying a result, so a late answer from a superseded load is
//! dropped without touching state.

use crate::animation::AnimationClip;
use orbitframe_core::{Error, Result, SceneGraph};
use std::cell::Cell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

/// A decoded model ready to be placed in a scene
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub graph: SceneGraph,
    pub animations: Vec<AnimationClip>,
}

impl LoadedModel {
    pub fn new(graph: SceneGraph) -> Self {
        Self {
            graph,
            animations: Vec::new(),
        }
    }

    pub fn with_animations(mut self, animations: Vec<AnimationClip>) -> Self {
        self.animations = animations;
        self
    }

    /// Release the model's resources
    pub fn dispose(self) {
        log::trace!("disposing model with {} nodes", self.graph.len());
    }
}

/// Identity of one load request
#[derive(Debug, Clone)]
pub struct LoadToken {
    generation: u64,
    cancelled: Rc<Cell<bool>>,
}

impl LoadToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loaders may poll this to abandon superseded work early
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }
}

/// What became of a source change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The model was installed and framed
    Applied,
    /// A newer load took over; nothing was changed
    Superseded,
    /// The url was empty or already current
    Unchanged,
}

/// Asynchronous asset loader
pub trait ModelLoader {
    /// Load `url`, reporting progress in [0, 1]. Returning
    /// [`Error::LoadCancelled`] is treated as a silent cancellation.
    fn load(
        &self,
        url: &str,
        token: &LoadToken,
        progress: &mut dyn FnMut(f32),
    ) -> impl Future<Output = Result<LoadedModel>>;
}

/// Serves models that were decoded ahead of time, keyed by url
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    models: HashMap<String, LoadedModel>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, model: LoadedModel) {
        self.models.insert(url.into(), model);
    }

    /// Resolve immediately, without going through a future
    pub fn fetch(&self, url: &str, token: &LoadToken, progress: &mut dyn FnMut(f32)) -> Result<LoadedModel> {
        if token.is_cancelled() {
            return Err(Error::LoadCancelled);
        }
        progress(0.0);
        let model = self.models.get(url).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no model registered for {url}"),
            ))
        })?;
        progress(1.0);
        Ok(model)
    }
}

impl ModelLoader for MemoryLoader {
    async fn load(&self, url: &str, token: &LoadToken, progress: &mut dyn FnMut(f32)) -> Result<LoadedModel> {
        self.fetch(url, token, progress)
    }
}
