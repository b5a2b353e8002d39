//! Window context
//!
//! Owns one element tree together with its interaction state and render
//! backend, and drives the per-frame cycle: hit-test, release bubbling,
//! tick and draw, present.

use std::path::Path;
use std::time::Duration;

use super::backend::{RenderBackend, TextureHandle};
use super::builders::BuilderRegistry;
use super::input::{FrameInput, InputSource, InteractionState};
use super::markup::MarkupParser;
use super::rendering;
use super::tree::{ElementId, ElementTree};
use super::UiError;
use crate::config::RguiConfig;
use crate::events::{CallbackHandle, EventKind};

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Innermost element under the pointer after the hit-test
    pub occupant: Option<ElementId>,
    /// The input asked to quit, or a handler deleted the root
    pub quit_requested: bool,
}

/// A UI tree bound to a render backend
pub struct UiWindow<B: RenderBackend> {
    title: String,
    tree: ElementTree,
    interaction: InteractionState,
    backend: B,
    frames: u64,
}

impl<B: RenderBackend> UiWindow<B> {
    /// Bind `tree` to `backend`
    ///
    /// The surface is sized to the root element and titled with its name.
    /// Texture failures are logged and leave the element untextured.
    pub fn new(tree: ElementTree, mut backend: B, config: &RguiConfig) -> Result<Self, UiError> {
        let root = tree.root().and_then(|root| tree.get(root)).ok_or(UiError::NoRoot)?;
        let title = root.name().to_string();
        backend.create_surface(&title, root.size)?;

        let mut window = Self {
            title,
            tree,
            interaction: InteractionState::new(config.hover_transitions),
            backend,
            frames: 0,
        };
        match window.load_textures() {
            Ok(loaded) => log::info!("Window '{}' ready, {} texture(s) loaded", window.title, loaded),
            Err(e) => log::warn!("Window '{}' has missing textures: {}", window.title, e),
        }
        Ok(window)
    }

    /// Parse `source`, apply the stock builders and open a window on it
    pub fn from_markup_str(source: &str, backend: B, config: &RguiConfig) -> Result<Self, UiError> {
        let mut tree = MarkupParser::from_config(config).parse_str(source)?;
        BuilderRegistry::default().apply(&mut tree);
        Self::new(tree, backend, config)
    }

    /// Like [`Self::from_markup_str`], reading the markup from `path`
    pub fn from_markup_file<P: AsRef<Path>>(path: P, backend: B, config: &RguiConfig) -> Result<Self, UiError> {
        let mut tree = MarkupParser::from_config(config).parse_file(path)?;
        BuilderRegistry::default().apply(&mut tree);
        Self::new(tree, backend, config)
    }

    /// Load the texture of every element that names one and has none yet
    ///
    /// Every element is attempted; the first failure is returned after the
    /// rest have loaded.
    pub fn load_textures(&mut self) -> Result<usize, UiError> {
        let pending: Vec<(ElementId, std::path::PathBuf)> = self
            .tree
            .iter()
            .filter(|(_, element)| element.texture().is_none())
            .filter_map(|(id, element)| element.texture_path().map(|path| (id, path.to_path_buf())))
            .collect();

        let mut loaded = 0;
        let mut first_error = None;
        for (id, path) in pending {
            match self.backend.load_texture(&path) {
                Ok(texture) => {
                    if let Some(element) = self.tree.get_mut(id) {
                        element.set_texture(Some(texture));
                    }
                    loaded += 1;
                }
                Err(e) => {
                    log::warn!("Failed to load texture {}: {}", path.display(), e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(loaded),
        }
    }

    /// Run one frame
    pub fn frame(&mut self, input: FrameInput) -> Result<FrameOutcome, UiError> {
        self.interaction.prune(&self.tree);
        self.interaction.update(&mut self.tree, input.pointer);
        if input.primary_released() {
            self.interaction.release_primary(&mut self.tree);
            self.interaction.prune(&self.tree);
        }

        self.backend.clear();
        rendering::draw(&mut self.tree, &mut self.backend);
        self.interaction.prune(&self.tree);
        self.release_orphaned_textures();
        self.backend.present()?;
        self.frames += 1;

        Ok(FrameOutcome {
            occupant: self.interaction.current(),
            quit_requested: input.quit_requested() || self.tree.root().is_none(),
        })
    }

    /// Drive frames from `input` until it runs dry, a quit is requested or
    /// `max_frames` have run
    ///
    /// Sleeps `interval` between frames. Returns the number of frames run.
    pub fn run<I: InputSource + ?Sized>(
        &mut self,
        input: &mut I,
        max_frames: u32,
        interval: Duration,
    ) -> Result<u32, UiError> {
        let mut count = 0;
        while count < max_frames {
            let Some(frame_input) = input.poll() else {
                log::debug!("Input exhausted after {} frames", count);
                break;
            };
            let outcome = self.frame(frame_input)?;
            count += 1;
            if outcome.quit_requested {
                log::info!("Quit requested after {} frames", count);
                break;
            }
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        Ok(count)
    }

    /// Register `handler` on the element named `name`
    pub fn add_callback(&mut self, name: &str, kind: EventKind, handler: CallbackHandle) -> bool {
        match self.tree.root() {
            Some(root) => self.tree.add_callback(root, name, kind, handler),
            None => false,
        }
    }

    /// Remove one registration of `handler` from the element named `name`
    pub fn remove_callback(&mut self, name: &str, kind: EventKind, handler: &CallbackHandle) -> bool {
        match self.tree.root() {
            Some(root) => self.tree.remove_callback(root, name, kind, handler),
            None => false,
        }
    }

    /// Element named `name` under the root
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.tree.find(name)
    }

    /// Delete `id` with its subtree and release their textures
    pub fn delete_element(&mut self, id: ElementId) -> usize {
        let destroyed = self.tree.delete(id);
        self.interaction.prune(&self.tree);
        self.release_orphaned_textures();
        destroyed
    }

    fn release_orphaned_textures(&mut self) {
        for texture in self.tree.take_orphaned_textures() {
            self.destroy_texture(texture);
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        log::trace!("Releasing texture {:?}", texture);
        self.backend.destroy_texture(texture);
    }

    /// Window title, taken from the root element's name
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The element tree
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable access to the element tree
    ///
    /// Textures of elements deleted through this reference are released at
    /// the end of the next frame.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// Current pointer occupants
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Frames presented by this window
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<B: RenderBackend> Drop for UiWindow<B> {
    fn drop(&mut self) {
        // Detached elements are owned by the tree too
        let ids: Vec<ElementId> = self.tree.iter().map(|(id, _)| id).collect();
        let destroyed: usize = ids.into_iter().map(|id| self.tree.delete(id)).sum();
        self.release_orphaned_textures();
        log::debug!("Window '{}' closed, {} element(s) destroyed", self.title, destroyed);
    }
}

impl<B: RenderBackend> std::fmt::Debug for UiWindow<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiWindow")
            .field("title", &self.title)
            .field("tree", &self.tree)
            .field("interaction", &self.interaction)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
