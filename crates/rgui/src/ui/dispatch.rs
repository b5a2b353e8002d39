//! Callback registration and event delivery on the element tree

use super::tree::{ElementId, ElementTree};
use crate::events::{CallbackHandle, EventKind};

impl ElementTree {
    /// Register `handler` for `kind` on the element named `name` under `subtree_root`
    ///
    /// Returns `false`, without registering anything, when no such element
    /// exists.
    pub fn add_callback(
        &mut self,
        subtree_root: ElementId,
        name: &str,
        kind: EventKind,
        handler: CallbackHandle,
    ) -> bool {
        match self.find_by_name(name, subtree_root) {
            Some(id) => self.add_handler(id, kind, handler),
            None => {
                log::debug!("No element named '{}' to attach a {} handler to", name, kind);
                false
            }
        }
    }

    /// Register `handler` for `kind` directly on `id`
    pub fn add_handler(&mut self, id: ElementId, kind: EventKind, handler: CallbackHandle) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.callbacks.push(kind, handler);
                true
            }
            None => false,
        }
    }

    /// Remove one registration of `handler` for `kind` from the element named `name`
    ///
    /// Returns whether something was removed; a missing element or handler is
    /// not an error.
    pub fn remove_callback(
        &mut self,
        subtree_root: ElementId,
        name: &str,
        kind: EventKind,
        handler: &CallbackHandle,
    ) -> bool {
        self.find_by_name(name, subtree_root)
            .and_then(|id| self.get_mut(id))
            .is_some_and(|element| element.callbacks.remove(kind, handler))
    }

    /// Drop every handler of every kind registered on `id`
    pub fn remove_callbacks(&mut self, id: ElementId) {
        if let Some(element) = self.get_mut(id) {
            element.callbacks.clear();
        }
    }

    /// Invoke the handlers for `kind` on `id`, most recently registered first
    ///
    /// The handler list is snapshotted before the first call, so handlers
    /// registered or removed while firing take effect from the next trigger.
    pub fn trigger_event(&mut self, id: ElementId, kind: EventKind) {
        let handlers = match self.get(id) {
            Some(element) => element.callbacks.handlers(kind),
            None => return,
        };
        for handler in handlers {
            handler.on_event(self, id);
        }
    }

    /// Fire `kind` on `id`, then on each of its ancestors up to the root
    ///
    /// The parent is read before firing, so a handler deleting its own
    /// element does not cut the chain. Ancestors deleted by a handler are
    /// skipped along with everything above them.
    pub fn bubble_event(&mut self, id: ElementId, kind: EventKind) {
        let mut cursor = Some(id);
        while let Some(current) = cursor.filter(|&next| self.contains(next)) {
            let parent = self.get(current).and_then(|element| element.parent());
            self.trigger_event(current, kind);
            cursor = parent;
        }
    }
}
