//! # RGUI
//!
//! A small retained-mode UI layer: a tree of rectangular elements described
//! by indentation markup, per-element event callbacks, pointer hit-testing
//! and a draw pass over a pluggable render backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rgui::prelude::*;
//!
//! fn main() -> Result<(), UiError> {
//!     let config = RguiConfig::default();
//!     let source = "<\"Div\" \"main\" \"0 0\" \"400 300\" \"0 0 0 255\" \"\" \"\">\n>\n";
//!     let mut window = UiWindow::from_markup_str(source, SoftwareCanvas::new(), &config)?;
//!
//!     window.add_callback("main", EventKind::PrimaryUp, callback(|tree, id| {
//!         tree.delete(id);
//!     }));
//!
//!     let mut input = ScriptedInput::sweep(Vec2::new(0, 0), Vec2::new(100, 100), 20);
//!     window.run(&mut input, config.max_frames, std::time::Duration::ZERO)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod events;
pub mod foundation;
pub mod ui;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ImageData},
        config::{Config, ConfigError, HoverTransitions, RguiConfig},
        events::{callback, CallbackHandle, EventHandler, EventKind},
        foundation::math::{Rect, Vec2},
        ui::{
            BuilderRegistry, Color, Element, ElementId, ElementTree, FrameInput, FrameOutcome,
            InputSignals, InputSource, MarkupError, MarkupParser, RenderBackend, ScriptedInput,
            SoftwareCanvas, UiError, UiWindow,
        },
    };
}
