//! Arena-based element storage.
//!
//! The tree stores every [`UIElement`] of a layer in one dense `Vec`, with a
//! sparse map from stable [`ElementId`]s to dense slots.
//!
//! ## Key Features
//!
//! - **Generational Indices**: `ElementId` contains index + generation so a
//!   stale id never resolves to an element that reused its slot.
//!
//! - **Dense Storage**: Elements are stored contiguously; no per-node boxing.
//!
//! - **Swap-Remove**: O(1) removal without holes in dense storage.
//!
//! - **Ownership**: A parent owns its children. Removing an element removes
//!   its whole subtree. Child order is insertion order, which is also paint
//!   order and (reversed) hit-test order.

use crate::scene::UIElement;

/// Unique identifier for an element in a layer.
///
/// Uses a generational index design:
/// - `index`: Position in the sparse array (reusable after removal)
/// - `generation`: Version counter that increments when a slot is reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Entry in the sparse map, pointing to a dense array slot.
struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

struct Node {
    element: UIElement,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Back-pointer to sparse array index (for swap-remove fixup)
    sparse_index: u32,
}

pub struct ElementTree {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
    /// Last generation handed out per sparse slot
    generations: Vec<u32>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
            generations: Vec::new(),
        }
    }

    /// Store an element without a parent and return its id.
    pub fn insert(&mut self, element: UIElement) -> ElementId {
        let (sparse_index, generation) = if let Some(idx) = self.free_indices.pop() {
            // Reuse a freed slot with the next generation
            let old_gen = self.generations.get(idx as usize).copied().unwrap_or(0);
            (idx, old_gen.wrapping_add(1))
        } else {
            let idx = self.sparse.len() as u32;
            self.sparse.push(None);
            self.generations.push(0);
            (idx, 0)
        };

        let dense_index = self.dense.len();
        let id = ElementId::new(sparse_index, generation);

        self.dense.push(Node {
            element,
            parent: None,
            children: Vec::new(),
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });
        self.generations[sparse_index as usize] = generation;

        id
    }

    /// Make `child` the last child of `parent`.
    ///
    /// A child that already has a parent is moved. Returns `false` if either
    /// id is stale or the move would create a cycle.
    pub fn attach(&mut self, child: ElementId, parent: ElementId) -> bool {
        if !self.contains(child) || !self.contains(parent) || self.is_ancestor(child, parent) {
            return false;
        }

        self.detach(child);

        if let Some(child_dense) = self.dense_index(child) {
            self.dense[child_dense].parent = Some(parent);
        }
        if let Some(parent_dense) = self.dense_index(parent) {
            self.dense[parent_dense].children.push(child);
        }
        true
    }

    /// Remove `id` from its parent's child list, keeping the element stored.
    pub fn detach(&mut self, id: ElementId) {
        let Some(dense_index) = self.dense_index(id) else {
            return;
        };
        if let Some(parent_id) = self.dense[dense_index].parent.take() {
            if let Some(parent_dense) = self.dense_index(parent_id) {
                self.dense[parent_dense].children.retain(|&c| c != id);
            }
        }
    }

    /// Remove an element and its whole subtree. Returns the number of
    /// elements removed (zero for a stale id).
    pub fn remove(&mut self, id: ElementId) -> usize {
        if !self.contains(id) {
            return 0;
        }

        self.detach(id);

        let mut doomed = vec![id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let next = doomed[cursor];
            doomed.extend_from_slice(self.children(next));
            cursor += 1;
        }

        for &doomed_id in &doomed {
            self.swap_remove(doomed_id);
        }
        doomed.len()
    }

    fn swap_remove(&mut self, id: ElementId) {
        let Some(dense_index) = self.dense_index(id) else {
            return;
        };
        let last_dense_index = self.dense.len() - 1;

        self.dense.swap_remove(dense_index);

        // Fix up the moved node's sparse entry
        if dense_index != last_dense_index {
            let moved_sparse_idx = self.dense[dense_index].sparse_index;
            if let Some(ref mut entry) = self.sparse[moved_sparse_idx as usize] {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = None;
        self.free_indices.push(id.index);
    }

    fn dense_index(&self, id: ElementId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation)
            .map(|e| e.dense_index)
    }

    fn is_ancestor(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&UIElement> {
        self.dense_index(id).map(|idx| &self.dense[idx].element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut UIElement> {
        self.dense_index(id).map(|idx| &mut self.dense[idx].element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.dense_index(id).and_then(|idx| self.dense[idx].parent)
    }

    /// Children of `id` in insertion order. Empty for a stale id.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.dense_index(id)
            .map(|idx| self.dense[idx].children.as_slice())
            .unwrap_or(&[])
    }

    /// Remove every element. Slot generations survive so ids handed out
    /// before stay stale.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.free_indices.clear();
        for (index, entry) in self.sparse.iter_mut().enumerate().rev() {
            *entry = None;
            self.free_indices.push(index as u32);
        }
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}
