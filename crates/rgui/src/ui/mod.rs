//! UI System Module
//!
//! Element trees, event dispatch and the per-window frame cycle, kept apart
//! from any concrete windowing library.
//!
//! Architecture:
//! - tree/element: arena of elements linked by parent, first child and next sibling
//! - dispatch: callback registration and event firing on the tree
//! - input/: per-frame input samples and the hit-test state machine
//! - markup/: indentation markup parser
//! - rendering/: draw traversal and the software canvas backend
//! - builders: default behaviour per element type
//! - window: ties a tree to a backend and runs frames

pub mod backend;
pub mod builders;
mod dispatch;
pub mod element;
pub mod input;
pub mod markup;
pub mod rendering;
pub mod tree;
pub mod window;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, RenderBackend, TextureHandle};
pub use builders::BuilderRegistry;
pub use element::{Color, Element};
pub use input::{FrameInput, InputSignals, InputSource, InteractionState, ScriptedInput};
pub use markup::{MarkupError, MarkupParser};
pub use rendering::SoftwareCanvas;
pub use tree::{ElementId, ElementTree, TreeError};
pub use window::{FrameOutcome, UiWindow};

use crate::assets::AssetError;
use crate::config::ConfigError;

/// Errors surfaced by the window context
#[derive(thiserror::Error, Debug)]
pub enum UiError {
    /// The markup could not be parsed
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// A tree operation failed
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// An image could not be decoded
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// The render backend failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tree has no root element to open a window on
    #[error("Tree has no root element")]
    NoRoot,
}
