//! Per-element event registry
//!
//! Key principles:
//! - Nine fixed event kinds, one handler list per kind
//! - Most recently registered handler fires first (LIFO)
//! - Delivery is immediate and synchronous; handlers get mutable access to
//!   the tree, so a handler's side effects are visible to the next one

use crate::ui::tree::{ElementId, ElementTree};
use std::fmt;
use std::rc::Rc;

/// Event kind identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer became the element's occupant
    MouseEnter,
    /// Pointer stopped occupying the element
    MouseLeave,
    /// Pointer is inside the element this frame
    MouseHover,
    /// Primary button pressed
    PrimaryDown,
    /// Primary button released (bubbles to the root)
    PrimaryUp,
    /// Scroll wheel moved
    Scroll,
    /// Drag gesture started
    DragStart,
    /// Dragged payload dropped
    Drop,
    /// Fired for every element on every draw
    Tick,
}

impl EventKind {
    /// Number of event kinds
    pub const COUNT: usize = 9;

    /// All event kinds in registry order
    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::MouseEnter,
        EventKind::MouseLeave,
        EventKind::MouseHover,
        EventKind::PrimaryDown,
        EventKind::PrimaryUp,
        EventKind::Scroll,
        EventKind::DragStart,
        EventKind::Drop,
        EventKind::Tick,
    ];

    /// Slot of this kind in a [`CallbackRegistry`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Event handler trait
///
/// Implemented for every `Fn(&mut ElementTree, ElementId)` closure, which is
/// what most callers register.
pub trait EventHandler {
    /// Handle an event fired on `element`
    fn on_event(&self, tree: &mut ElementTree, element: ElementId);
}

impl<F> EventHandler for F
where
    F: Fn(&mut ElementTree, ElementId),
{
    fn on_event(&self, tree: &mut ElementTree, element: ElementId) {
        self(tree, element);
    }
}

/// Shared handle to a registered handler
///
/// The same handle may be registered on several elements or kinds; removal
/// matches by handle identity.
pub type CallbackHandle = Rc<dyn EventHandler>;

/// Wrap a closure into a [`CallbackHandle`]
pub fn callback<F>(handler: F) -> CallbackHandle
where
    F: Fn(&mut ElementTree, ElementId) + 'static,
{
    Rc::new(handler)
}

/// Whether two handles refer to the same registered handler
pub fn same_callback(a: &CallbackHandle, b: &CallbackHandle) -> bool {
    // Compare data addresses only; vtable pointers are not unique
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

/// Handler lists of one element, one list per [`EventKind`]
#[derive(Default, Clone)]
pub struct CallbackRegistry {
    // Stored oldest first; firing order is the reverse
    lists: [Vec<CallbackHandle>; EventKind::COUNT],
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it will fire before every handler already present
    pub fn push(&mut self, kind: EventKind, handler: CallbackHandle) {
        self.lists[kind.index()].push(handler);
    }

    /// Remove the first entry, in firing order, that is `handler`
    ///
    /// Returns whether an entry was removed. The remaining entries keep their
    /// order.
    pub fn remove(&mut self, kind: EventKind, handler: &CallbackHandle) -> bool {
        let list = &mut self.lists[kind.index()];
        match list.iter().rposition(|h| same_callback(h, handler)) {
            Some(position) => {
                list.remove(position);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the handlers for `kind`, in firing order
    pub fn handlers(&self, kind: EventKind) -> Vec<CallbackHandle> {
        self.lists[kind.index()].iter().rev().cloned().collect()
    }

    /// Number of handlers registered for `kind`
    pub fn len(&self, kind: EventKind) -> usize {
        self.lists[kind.index()].len()
    }

    /// Whether no handler is registered for any kind
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Drop every handler of every kind
    pub fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in EventKind::ALL {
            let count = self.len(kind);
            if count > 0 {
                map.entry(&kind, &count);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::ui::element::Color;
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> CallbackHandle {
        let log = Rc::clone(log);
        callback(move |_, _| log.borrow_mut().push(label))
    }

    fn fire(registry: &CallbackRegistry, kind: EventKind) {
        let mut tree = ElementTree::new(4);
        let id = tree
            .init(Vec2::zeros(), Vec2::zeros(), "", Color::TRANSPARENT, "target")
            .unwrap();
        for handler in registry.handlers(kind) {
            handler.on_event(&mut tree, id);
        }
    }

    #[test]
    fn test_lifo_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::Tick, recorder(&log, "first"));
        registry.push(EventKind::Tick, recorder(&log, "second"));

        fire(&registry, EventKind::Tick);

        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn test_remove_sole_entry() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let handler = recorder(&log, "only");
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::MouseEnter, Rc::clone(&handler));

        assert!(registry.remove(EventKind::MouseEnter, &handler));
        assert_eq!(registry.len(EventKind::MouseEnter), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_head_keeps_rest_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let c = recorder(&log, "c");
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::Tick, Rc::clone(&a));
        registry.push(EventKind::Tick, Rc::clone(&b));
        registry.push(EventKind::Tick, Rc::clone(&c));

        // c is the head: it fires first
        assert!(registry.remove(EventKind::Tick, &c));
        fire(&registry, EventKind::Tick);

        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_duplicate_removes_most_recent_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::Tick, Rc::clone(&a));
        registry.push(EventKind::Tick, Rc::clone(&b));
        registry.push(EventKind::Tick, Rc::clone(&a));

        assert!(registry.remove(EventKind::Tick, &a));
        fire(&registry, EventKind::Tick);

        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_absent_handler_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registered = recorder(&log, "registered");
        let stranger = recorder(&log, "stranger");
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::Scroll, Rc::clone(&registered));

        assert!(!registry.remove(EventKind::Scroll, &stranger));
        assert!(!registry.remove(EventKind::Drop, &registered));
        assert_eq!(registry.len(EventKind::Scroll), 1);
    }

    #[test]
    fn test_same_callback() {
        let a = callback(|_, _| {});
        let b = callback(|_, _| {});
        assert!(same_callback(&a, &Rc::clone(&a)));
        assert!(!same_callback(&a, &b));
    }

    #[test]
    fn test_kinds_are_independent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CallbackRegistry::new();
        registry.push(EventKind::MouseEnter, recorder(&log, "enter"));
        registry.push(EventKind::MouseLeave, recorder(&log, "leave"));

        fire(&registry, EventKind::MouseLeave);
        assert_eq!(*log.borrow(), vec!["leave"]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
