//! Draw traversal
//!
//! Walks the tree once per frame, firing `Tick` on every element before
//! painting it. An element is visited before its later siblings and before
//! its children, so every parent is painted underneath its children.

pub mod canvas;

pub use canvas::SoftwareCanvas;

use super::backend::RenderBackend;
use super::tree::{ElementId, ElementTree};
use crate::events::EventKind;

/// Draw the whole tree, starting at the root
pub fn draw<B: RenderBackend + ?Sized>(tree: &mut ElementTree, backend: &mut B) {
    if let Some(root) = tree.root() {
        draw_chain(tree, root, backend);
    }
}

fn draw_chain<B: RenderBackend + ?Sized>(tree: &mut ElementTree, id: ElementId, backend: &mut B) {
    tree.trigger_event(id, EventKind::Tick);

    // A tick handler may have deleted the element
    let Some(element) = tree.get(id) else {
        return;
    };
    let rect = element.rect();
    if !element.color.is_transparent() {
        backend.fill_rect(rect, element.color);
    }
    if let Some(texture) = element.texture() {
        backend.blit(texture, rect);
    }

    let (sibling, child) = (element.next_sibling(), element.first_child());
    if let Some(sibling) = sibling {
        draw_chain(tree, sibling, backend);
    }
    if let Some(child) = child {
        draw_chain(tree, child, backend);
    }
}
