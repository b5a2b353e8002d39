//! Element builders keyed by the markup type tag
//!
//! After parsing, each element is handed to the builder registered for its
//! type tag so it can attach its default behaviour.

use std::collections::HashMap;

use crate::events::{callback, EventKind};
use crate::ui::tree::{ElementId, ElementTree};

/// Sets up default behaviour for one element
pub type BuilderFn = fn(&mut ElementTree, ElementId);

/// Type tag to builder lookup
#[derive(Clone)]
pub struct BuilderRegistry {
    builders: HashMap<String, BuilderFn>,
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.builders.keys()).finish()
    }
}

impl Default for BuilderRegistry {
    /// Registry with the stock `Div` and `Button` builders
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("Div", build_div);
        registry.register("Button", build_button);
        registry
    }
}

impl BuilderRegistry {
    /// Registry with no builders at all
    pub fn empty() -> Self {
        Self { builders: HashMap::new() }
    }

    /// Register `builder` for `element_type`, replacing any previous one
    pub fn register(&mut self, element_type: impl Into<String>, builder: BuilderFn) {
        self.builders.insert(element_type.into(), builder);
    }

    /// Builder for `element_type`
    pub fn get(&self, element_type: &str) -> Option<BuilderFn> {
        self.builders.get(element_type).copied()
    }

    /// Run the matching builder on every element of `tree`
    ///
    /// Returns how many elements had a builder.
    pub fn apply(&self, tree: &mut ElementTree) -> usize {
        let targets: Vec<(ElementId, BuilderFn)> = tree
            .iter()
            .filter_map(|(id, element)| self.get(&element.element_type).map(|builder| (id, builder)))
            .collect();

        for (id, builder) in &targets {
            builder(tree, *id);
        }
        log::debug!("Applied builders to {} of {} elements", targets.len(), tree.len());
        targets.len()
    }
}

/// Plain container; nothing to attach
fn build_div(_tree: &mut ElementTree, _id: ElementId) {}

fn build_button(tree: &mut ElementTree, id: ElementId) {
    tree.add_handler(id, EventKind::MouseEnter, callback(invert_color));
    tree.add_handler(id, EventKind::MouseLeave, callback(invert_color));
}

/// Flip the RGB channels of the element's fill colour, keeping alpha
pub fn invert_color(tree: &mut ElementTree, id: ElementId) {
    if let Some(element) = tree.get_mut(id) {
        element.color = element.color.inverted();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::ui::element::{Color, Element};

    fn typed(tree: &mut ElementTree, name: &str, element_type: &str) -> ElementId {
        let element = Element::new(Vec2::zeros(), Vec2::new(10, 10), "", Color::from_rgba(255, 0, 0, 255), name)
            .unwrap()
            .with_type(element_type);
        tree.insert(element).unwrap()
    }

    #[test]
    fn test_button_inverts_on_enter_and_leave() {
        let mut tree = ElementTree::new(4);
        let button = typed(&mut tree, "ok", "Button");

        assert_eq!(BuilderRegistry::default().apply(&mut tree), 1);

        tree.trigger_event(button, EventKind::MouseEnter);
        assert_eq!(tree.get(button).unwrap().color, Color::from_rgba(0, 255, 255, 255));
        tree.trigger_event(button, EventKind::MouseLeave);
        assert_eq!(tree.get(button).unwrap().color, Color::from_rgba(255, 0, 0, 255));
    }

    #[test]
    fn test_div_attaches_nothing() {
        let mut tree = ElementTree::new(4);
        let div = typed(&mut tree, "box", "Div");

        assert_eq!(BuilderRegistry::default().apply(&mut tree), 1);
        assert!(tree.get(div).unwrap().callbacks().is_empty());
    }

    #[test]
    fn test_unknown_type_left_alone() {
        let mut tree = ElementTree::new(4);
        let slider = typed(&mut tree, "vol", "Slider");

        assert_eq!(BuilderRegistry::default().apply(&mut tree), 0);
        assert!(tree.get(slider).unwrap().callbacks().is_empty());
    }

    #[test]
    fn test_custom_builder_replaces_stock() {
        fn mark(tree: &mut ElementTree, id: ElementId) {
            if let Some(element) = tree.get_mut(id) {
                element.color = Color::TRANSPARENT;
            }
        }

        let mut tree = ElementTree::new(4);
        let button = typed(&mut tree, "ok", "Button");
        let mut registry = BuilderRegistry::default();
        registry.register("Button", mark);

        registry.apply(&mut tree);

        assert!(tree.get(button).unwrap().color.is_transparent());
        assert!(tree.get(button).unwrap().callbacks().is_empty());
        assert!(BuilderRegistry::empty().get("Div").is_none());
    }
}
