//! UI Input Processing
//!
//! Hit-testing and the occupant state machine. The occupant is the innermost
//! element under the pointer; each frame the pass walks down from the root,
//! fires `MouseHover` on every element containing the pointer and reports
//! enter/leave when the occupant changes.
//!
//! Siblings are assumed not to overlap and children to lie inside their
//! parent, so the first matching child ends the search at each level.

use crate::config::HoverTransitions;
use crate::events::EventKind;
use crate::foundation::math::Vec2;
use crate::ui::tree::{ElementId, ElementTree};

/// Current and previous occupant of one window
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    current: Option<ElementId>,
    previous: Option<ElementId>,
    transitions: HoverTransitions,
}

impl InteractionState {
    /// Create an empty state using `transitions` for unrelated jumps
    pub fn new(transitions: HoverTransitions) -> Self {
        Self { current: None, previous: None, transitions }
    }

    /// Element currently under the pointer
    pub fn current(&self) -> Option<ElementId> {
        self.current
    }

    /// Element occupied before the current one
    pub fn previous(&self) -> Option<ElementId> {
        self.previous
    }

    /// Run the hit-test pass from the root of `tree`
    ///
    /// Returns `false` when the pointer is outside the root; the occupant is
    /// then left unchanged.
    pub fn update(&mut self, tree: &mut ElementTree, pointer: Vec2) -> bool {
        match tree.root() {
            Some(root) => self.hit_test(tree, root, pointer),
            None => false,
        }
    }

    /// Hit-test `element` and its subtree against `pointer`
    pub fn hit_test(&mut self, tree: &mut ElementTree, element: ElementId, pointer: Vec2) -> bool {
        let Some(rect) = tree.get(element).map(|node| node.rect()) else {
            return false;
        };
        if !rect.contains_point(pointer) {
            return false;
        }

        tree.trigger_event(element, EventKind::MouseHover);
        if !tree.contains(element) {
            // Deleted by its own hover handler
            return false;
        }

        let children: Vec<ElementId> = tree.children(element).collect();
        for child in children {
            if self.hit_test(tree, child, pointer) {
                return true;
            }
        }

        if self.current == Some(element) {
            return true;
        }

        self.previous = self.current.replace(element);
        self.fire_transition(tree, element);
        true
    }

    fn fire_transition(&self, tree: &mut ElementTree, entered: ElementId) {
        let Some(left) = self.previous else {
            // First occupancy: everything counts as entered from outside
            tree.trigger_event(entered, EventKind::MouseEnter);
            return;
        };

        if tree.is_ancestor_of(entered, left) {
            log::trace!("Pointer moved out to a container");
            tree.trigger_event(left, EventKind::MouseLeave);
        } else if tree.is_ancestor_of(left, entered) {
            log::trace!("Pointer moved into a descendant");
            tree.trigger_event(entered, EventKind::MouseEnter);
        } else {
            match self.transitions {
                HoverTransitions::Direct => {
                    tree.trigger_event(entered, EventKind::MouseEnter);
                    tree.trigger_event(left, EventKind::MouseLeave);
                }
                HoverTransitions::CommonAncestor => {
                    Self::transition_through_common_ancestor(tree, left, entered);
                }
            }
        }
    }

    fn transition_through_common_ancestor(tree: &mut ElementTree, left: ElementId, entered: ElementId) {
        let common = tree.ancestors(left).find(|&ancestor| tree.is_ancestor_of(ancestor, entered));

        let leaving: Vec<ElementId> = std::iter::once(left)
            .chain(tree.ancestors(left).take_while(|&ancestor| Some(ancestor) != common))
            .collect();
        let mut entering: Vec<ElementId> = std::iter::once(entered)
            .chain(tree.ancestors(entered).take_while(|&ancestor| Some(ancestor) != common))
            .collect();
        entering.reverse();

        for id in leaving {
            tree.trigger_event(id, EventKind::MouseLeave);
        }
        for id in entering {
            tree.trigger_event(id, EventKind::MouseEnter);
        }
    }

    /// Bubble `PrimaryUp` from the current occupant to the root
    pub fn release_primary(&self, tree: &mut ElementTree) {
        if let Some(current) = self.current {
            tree.bubble_event(current, EventKind::PrimaryUp);
        }
    }

    /// Forget occupants that no longer exist in `tree`
    pub fn prune(&mut self, tree: &ElementTree) {
        if self.current.is_some_and(|id| !tree.contains(id)) {
            self.current = None;
        }
        if self.previous.is_some_and(|id| !tree.contains(id)) {
            self.previous = None;
        }
    }
}
