//! Test doubles shared by the UI unit tests

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use slotmap::SlotMap;

use super::backend::{BackendError, RenderBackend, TextureHandle};
use super::element::Color;
use crate::assets::AssetError;
use crate::foundation::math::{Rect, Vec2};

/// One call made on a [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Surface(String, Vec2),
    Clear,
    Fill(Rect, Color),
    Load(PathBuf),
    Blit(TextureHandle, Rect),
    Destroy(TextureHandle),
    Present,
}

#[derive(Default)]
struct Recording {
    calls: Vec<DrawCall>,
    textures: SlotMap<TextureHandle, PathBuf>,
}

/// Backend that records every call; clones share the same recording
///
/// Loading a path containing `missing` fails.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    recording: Rc<RefCell<Recording>>,
}

impl RecordingBackend {
    /// Fill and blit calls only
    pub fn calls(&self) -> Vec<DrawCall> {
        self.all_calls()
            .into_iter()
            .filter(|call| matches!(call, DrawCall::Fill(..) | DrawCall::Blit(..)))
            .collect()
    }

    pub fn all_calls(&self) -> Vec<DrawCall> {
        self.recording.borrow().calls.clone()
    }

    pub fn forget_calls(&self) {
        self.recording.borrow_mut().calls.clear();
    }

    pub fn destroyed(&self) -> Vec<TextureHandle> {
        self.all_calls()
            .into_iter()
            .filter_map(|call| match call {
                DrawCall::Destroy(texture) => Some(texture),
                _ => None,
            })
            .collect()
    }

    pub fn live_textures(&self) -> usize {
        self.recording.borrow().textures.len()
    }

    fn record(&self, call: DrawCall) {
        self.recording.borrow_mut().calls.push(call);
    }
}

impl RenderBackend for RecordingBackend {
    fn create_surface(&mut self, title: &str, size: Vec2) -> Result<(), BackendError> {
        self.record(DrawCall::Surface(title.to_string(), size));
        Ok(())
    }

    fn clear(&mut self) {
        self.record(DrawCall::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCall::Fill(rect, color));
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, BackendError> {
        self.record(DrawCall::Load(path.to_path_buf()));
        if path.to_string_lossy().contains("missing") {
            return Err(AssetError::NotFound(path.display().to_string()).into());
        }
        Ok(self.recording.borrow_mut().textures.insert(path.to_path_buf()))
    }

    fn blit(&mut self, texture: TextureHandle, rect: Rect) {
        self.record(DrawCall::Blit(texture, rect));
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.record(DrawCall::Destroy(texture));
        self.recording.borrow_mut().textures.remove(texture);
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.record(DrawCall::Present);
        Ok(())
    }
}
