//! Element tree
//!
//! All elements live in one arena and refer to each other by [`ElementId`].
//! A child list is a singly linked chain: the parent points at its first
//! child, each child at its next sibling, and every child back at the parent.
//! New children are linked in at the head, so the list runs from the most
//! recently added child to the oldest.

use slotmap::SlotMap;

use super::backend::TextureHandle;
use super::element::{Color, Element};
use crate::foundation::math::Vec2;

slotmap::new_key_type! {
    /// Stable handle to an element in an [`ElementTree`]
    pub struct ElementId;
}

/// Element tree errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The arena is full
    #[error("element limit of {limit} reached")]
    CapacityExhausted {
        /// Configured maximum number of live elements
        limit: usize,
    },

    /// Element name longer than the lookup buffer
    #[error("element name '{name}' exceeds {max} bytes")]
    NameTooLong {
        /// Offending name
        name: String,
        /// Maximum length
        max: usize,
    },

    /// Texture path longer than the path buffer
    #[error("texture path '{path}' exceeds {max} bytes")]
    TexturePathTooLong {
        /// Offending path
        path: String,
        /// Maximum length
        max: usize,
    },

    /// The id does not name a live element
    #[error("element {0:?} does not exist")]
    StaleElement(ElementId),

    /// Attaching would make an element its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent
        parent: ElementId,
        /// Requested child
        child: ElementId,
    },
}

/// Arena-backed tree of [`Element`]s with a single root
pub struct ElementTree {
    nodes: SlotMap<ElementId, Element>,
    root: Option<ElementId>,
    capacity_limit: usize,
    orphaned_textures: Vec<TextureHandle>,
}

impl ElementTree {
    /// Create an empty tree holding at most `capacity_limit` live elements
    pub fn new(capacity_limit: usize) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            capacity_limit,
            orphaned_textures: Vec::new(),
        }
    }

    /// Create a detached element and return its id
    pub fn init(
        &mut self,
        relative_position: Vec2,
        size: Vec2,
        texture_path: &str,
        color: Color,
        name: &str,
    ) -> Result<ElementId, TreeError> {
        let element = Element::new(relative_position, size, texture_path, color, name)?;
        self.insert(element)
    }

    /// Move a detached element into the arena
    ///
    /// Hierarchy links on `element` are reset; use [`Self::add_child`] to
    /// attach it.
    pub fn insert(&mut self, mut element: Element) -> Result<ElementId, TreeError> {
        if self.nodes.len() >= self.capacity_limit {
            log::error!("Element limit of {} reached", self.capacity_limit);
            return Err(TreeError::CapacityExhausted { limit: self.capacity_limit });
        }
        element.parent = None;
        element.first_child = None;
        element.next_sibling = None;
        element.absolute_position = element.relative_position;
        Ok(self.nodes.insert(element))
    }

    /// The root element, if one has been set
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Make `id` the root of the tree
    ///
    /// The element is detached from any parent first and its absolute
    /// position is recomputed.
    pub fn set_root(&mut self, id: ElementId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::StaleElement(id));
        }
        self.remove_from_parent(id);
        self.root = Some(id);
        self.update(id);
        Ok(())
    }

    /// Number of live elements, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no element
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a live element
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow an element
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Mutably borrow an element
    ///
    /// Changing `relative_position` through this borrow requires a call to
    /// [`Self::update`] afterwards.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    /// Iterate over every live element, in arena order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.nodes.iter()
    }

    /// Insert `child` at the head of `parent`'s child list
    ///
    /// `child` is detached from its current parent first. The absolute
    /// positions of `child` and its subtree are recomputed; other children of
    /// `parent` are not touched.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::StaleElement(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(TreeError::StaleElement(child));
        }
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        self.remove_from_parent(child);
        if self.root == Some(child) {
            self.root = None;
        }

        let old_head = self.nodes[parent].first_child.replace(child);
        let node = &mut self.nodes[child];
        node.next_sibling = old_head;
        node.parent = Some(parent);
        self.update(child);

        #[cfg(debug_assertions)]
        self.warn_if_escaping(parent, child);

        Ok(())
    }

    /// Unlink `id` from its parent's child list
    ///
    /// Does nothing for a root or detached element. Remaining siblings keep
    /// their order.
    pub fn remove_from_parent(&mut self, id: ElementId) {
        let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) else {
            return;
        };
        let next = self.nodes[id].next_sibling;

        if self.nodes[parent].first_child == Some(id) {
            self.nodes[parent].first_child = next;
        } else {
            let mut cursor = self.nodes[parent].first_child;
            while let Some(sibling) = cursor {
                if self.nodes[sibling].next_sibling == Some(id) {
                    self.nodes[sibling].next_sibling = next;
                    break;
                }
                cursor = self.nodes[sibling].next_sibling;
            }
        }

        let node = &mut self.nodes[id];
        node.parent = None;
        node.next_sibling = None;
    }

    /// Detach `id` and destroy it together with its whole subtree
    ///
    /// Callback lists and payloads are dropped with their elements; loaded
    /// textures are queued for release (see [`Self::take_orphaned_textures`]).
    /// Deleting the root empties the tree. Returns the number of elements
    /// destroyed.
    pub fn delete(&mut self, id: ElementId) -> usize {
        if !self.nodes.contains_key(id) {
            return 0;
        }
        self.remove_from_parent(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut destroyed = 0;
        self.delete_chain(id, &mut destroyed);
        log::debug!("Deleted {} element(s)", destroyed);
        destroyed
    }

    /// Post-order: later siblings first, then children, then the node itself
    fn delete_chain(&mut self, id: ElementId, destroyed: &mut usize) {
        let (sibling, child) = match self.nodes.get(id) {
            Some(node) => (node.next_sibling, node.first_child),
            None => return,
        };
        if let Some(sibling) = sibling {
            self.delete_chain(sibling, destroyed);
        }
        if let Some(child) = child {
            self.delete_chain(child, destroyed);
        }

        if let Some(mut element) = self.nodes.remove(id) {
            element.callbacks.clear();
            if let Some(texture) = element.set_texture(None) {
                self.orphaned_textures.push(texture);
            }
            *destroyed += 1;
        }
    }

    /// Drain the textures of deleted elements
    ///
    /// Each handle is returned exactly once; the owner of the render backend
    /// must destroy them.
    pub fn take_orphaned_textures(&mut self) -> Vec<TextureHandle> {
        std::mem::take(&mut self.orphaned_textures)
    }

    /// Recompute the absolute position of `id` and propagate to its subtree
    ///
    /// A root or detached element takes its relative position as absolute.
    /// Propagation skips the subtree of any child whose position did not
    /// change, but always carries on with that child's siblings.
    pub fn update(&mut self, id: ElementId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map_or_else(Vec2::zeros, |parent| parent.absolute_position);
        let absolute = base + node.relative_position;

        self.nodes[id].absolute_position = absolute;
        self.update_children(id);
    }

    fn update_children(&mut self, parent: ElementId) {
        let parent_position = self.nodes[parent].absolute_position;
        let mut cursor = self.nodes[parent].first_child;

        while let Some(child) = cursor {
            let node = &mut self.nodes[child];
            cursor = node.next_sibling;

            let position = parent_position + node.relative_position;
            if node.absolute_position == position {
                continue;
            }
            node.absolute_position = position;
            self.update_children(child);
        }
    }

    /// Move `id` relative to its parent and propagate
    pub fn set_relative_position(&mut self, id: ElementId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.relative_position = position;
            self.update(id);
        }
    }

    /// Find the first element named `name` in the subtree rooted at `subtree_root`
    ///
    /// Pre-order: an element, then its children, then its later siblings.
    pub fn find_by_name(&self, name: &str, subtree_root: ElementId) -> Option<ElementId> {
        let node = self.nodes.get(subtree_root)?;
        if node.name() == name {
            return Some(subtree_root);
        }
        node.first_child.and_then(|child| self.find_in_chain(name, child))
    }

    fn find_in_chain(&self, name: &str, id: ElementId) -> Option<ElementId> {
        let node = self.nodes.get(id)?;
        if node.name() == name {
            return Some(id);
        }
        node.first_child
            .and_then(|child| self.find_in_chain(name, child))
            .or_else(|| node.next_sibling.and_then(|sibling| self.find_in_chain(name, sibling)))
    }

    /// Find an element by name anywhere under the root
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.root.and_then(|root| self.find_by_name(name, root))
    }

    /// Whether `ancestor` is a strict ancestor of `id`
    pub fn is_ancestor_of(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|parent| parent == ancestor)
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(id).and_then(|node| node.parent),
        }
    }

    /// Children of `id`, in list order
    pub fn children(&self, id: ElementId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes.get(id).and_then(|node| node.first_child),
        }
    }

    /// Elements under `id` whose rectangle is not inside their parent's
    pub fn check_containment(&self, id: ElementId) -> Vec<ElementId> {
        let mut escaping = Vec::new();
        self.collect_escaping(id, &mut escaping);
        escaping
    }

    fn collect_escaping(&self, id: ElementId, escaping: &mut Vec<ElementId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let rect = node.rect();
        for child in self.children(id) {
            if !rect.contains_rect(&self.nodes[child].rect()) {
                escaping.push(child);
            }
            self.collect_escaping(child, escaping);
        }
    }

    #[cfg(debug_assertions)]
    fn warn_if_escaping(&self, parent: ElementId, child: ElementId) {
        let (parent, child) = (&self.nodes[parent], &self.nodes[child]);
        if !parent.rect().contains_rect(&child.rect()) {
            log::warn!(
                "Element '{}' is not contained in its parent '{}'",
                child.name(),
                parent.name()
            );
        }
    }
}

impl std::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTree")
            .field("root", &self.root)
            .field("len", &self.nodes.len())
            .field("capacity_limit", &self.capacity_limit)
            .finish_non_exhaustive()
    }
}

/// Iterator over the parent chain of an element
pub struct Ancestors<'a> {
    tree: &'a ElementTree,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.tree.nodes.get(current).and_then(|node| node.parent);
        Some(current)
    }
}

/// Iterator over the child list of an element
pub struct Children<'a> {
    tree: &'a ElementTree,
    next: Option<ElementId>,
}

impl Iterator for Children<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.tree.nodes.get(current).and_then(|node| node.next_sibling);
        Some(current)
    }
}
