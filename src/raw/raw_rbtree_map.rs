use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// The core red-black tree backing `RBTreeMap`.
///
/// All nodes live in the `nodes` arena, with slot 0 permanently holding the
/// shared sentinel; values live in a separate arena addressed through each
/// node's value handle. Between any two operations the tree satisfies the
/// red-black invariants: every node is red or black, the root and the
/// sentinel are black, a red node never has a red child, and every path from
/// a node down to the sentinel crosses the same number of black nodes.
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing the sentinel and all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values (separate from nodes, so mutable value
    /// access never aliases the link structure).
    values: Arena<V>,
    /// Handle to the root node; the sentinel when the tree is empty.
    root: Handle,
    /// Handle to the minimum node, for O(1) iteration from the front.
    first: Handle,
    /// Handle to the maximum node, for O(1) iteration back from the end.
    last: Handle,
    /// Number of key-value pairs in the tree.
    len: usize,
}

/// Outcome of a raw insertion attempt.
pub(crate) enum InsertResult<K, V> {
    /// The key was new; this is the node now holding it.
    Inserted(Handle),
    /// An equal key was already present. The tree is untouched and the
    /// rejected key and value are handed back to the caller.
    Duplicate { node: Handle, key: K, value: V },
}

/// Work stack for the structural clone: (source node, cloned parent,
/// attaches-as-left-child). Inline capacity covers the depth of any tree
/// that fits the test-width handle space without spilling.
type CloneStack = SmallVec<[(Handle, Handle, bool); 32]>;

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree. Allocates the sentinel into arena slot 0.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new, empty tree with room for `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        // One extra node slot for the sentinel.
        let mut nodes = Arena::with_capacity(capacity + 1);
        let nil = nodes.alloc(Node::sentinel());
        debug_assert!(nil.is_nil());
        Self {
            nodes,
            values: Arena::with_capacity(capacity),
            root: Handle::NIL,
            first: Handle::NIL,
            last: Handle::NIL,
            len: 0,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Removes every element. The sentinel is re-seeded into slot 0 of the
    /// emptied arena, so its handle identity survives the reset.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        let nil = self.nodes.alloc(Node::sentinel());
        debug_assert!(nil.is_nil());
        self.root = Handle::NIL;
        self.first = Handle::NIL;
        self.last = Handle::NIL;
        self.len = 0;
    }

    /// Handle to the minimum node (sentinel when empty).
    pub(crate) const fn first(&self) -> Handle {
        self.first
    }

    /// Handle to the maximum node (sentinel when empty).
    pub(crate) const fn last(&self) -> Handle {
        self.last
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a reference to a value by handle.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns a mutable reference to a value by handle.
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(handle)
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: Only the `nodes` field is touched, never `values`.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at
    ///   `handle`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: Only the `values` field is touched, never `nodes`.
        unsafe { Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).values), handle) }
    }

    /// Swaps in a new value for a live node, returning the old value.
    pub(crate) fn replace_value(&mut self, node: Handle, value: V) -> V {
        let handle = self.nodes.get(node).value();
        core::mem::replace(self.values.get_mut(handle), value)
    }

    // ─── Link plumbing ──────────────────────────────────────────────────────

    fn color(&self, handle: Handle) -> Color {
        self.nodes.get(handle).color()
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        // The sentinel must stay black; fixups may harmlessly re-blacken it.
        debug_assert!(!handle.is_nil() || color == Color::Black);
        self.nodes.get_mut(handle).set_color(color);
    }

    fn parent(&self, handle: Handle) -> Handle {
        self.nodes.get(handle).parent()
    }

    fn left(&self, handle: Handle) -> Handle {
        self.nodes.get(handle).left()
    }

    fn right(&self, handle: Handle) -> Handle {
        self.nodes.get(handle).right()
    }

    /// Leftmost node of the subtree rooted at `handle`.
    fn leftmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while !self.left(current).is_nil() {
            current = self.left(current);
        }
        current
    }

    /// Rightmost node of the subtree rooted at `handle`.
    fn rightmost(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while !self.right(current).is_nil() {
            current = self.right(current);
        }
        current
    }

    /// Recomputes the cached minimum and maximum by edge descent. Runs after
    /// every successful mutation; skipping it silently breaks iteration from
    /// either end.
    fn refresh_ends(&mut self) {
        debug_assert_eq!(self.nodes.len(), self.len + 1);
        debug_assert_eq!(self.values.len(), self.len);
        if self.root.is_nil() {
            self.first = Handle::NIL;
            self.last = Handle::NIL;
        } else {
            self.first = self.leftmost(self.root);
            self.last = self.rightmost(self.root);
        }
    }

    // ─── Traversal ──────────────────────────────────────────────────────────

    /// In-order successor: the next node in ascending key order, or the
    /// sentinel when stepping past the maximum.
    pub(crate) fn successor(&self, handle: Handle) -> Handle {
        let right = self.right(handle);
        if !right.is_nil() {
            return self.leftmost(right);
        }
        // No right subtree: climb until the link comes in from the left.
        let mut current = handle;
        let mut parent = self.parent(current);
        while !parent.is_nil() && current == self.right(parent) {
            current = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order predecessor. Stepping back from the end position lands on
    /// the cached maximum in O(1).
    pub(crate) fn predecessor(&self, handle: Handle) -> Handle {
        if handle.is_nil() {
            return self.last;
        }
        let left = self.left(handle);
        if !left.is_nil() {
            return self.rightmost(left);
        }
        let mut current = handle;
        let mut parent = self.parent(current);
        while !parent.is_nil() && current == self.left(parent) {
            current = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order successor through a raw pointer, for the mutable iterators.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Handle {
        // SAFETY: Only the nodes arena is read; values stay untouched.
        unsafe {
            let right = Self::node_ptr(ptr, handle).right();
            if !right.is_nil() {
                let mut current = right;
                while !Self::node_ptr(ptr, current).left().is_nil() {
                    current = Self::node_ptr(ptr, current).left();
                }
                return current;
            }
            let mut current = handle;
            let mut parent = Self::node_ptr(ptr, current).parent();
            while !parent.is_nil() && current == Self::node_ptr(ptr, parent).right() {
                current = parent;
                parent = Self::node_ptr(ptr, parent).parent();
            }
            parent
        }
    }

    /// In-order predecessor through a raw pointer, for the mutable
    /// iterators. `handle` must be a real node; the iterators never step
    /// back from the end position.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn predecessor_ptr(ptr: *const Self, handle: Handle) -> Handle {
        debug_assert!(!handle.is_nil());
        // SAFETY: Only the nodes arena is read; values stay untouched.
        unsafe {
            let left = Self::node_ptr(ptr, handle).left();
            if !left.is_nil() {
                let mut current = left;
                while !Self::node_ptr(ptr, current).right().is_nil() {
                    current = Self::node_ptr(ptr, current).right();
                }
                return current;
            }
            let mut current = handle;
            let mut parent = Self::node_ptr(ptr, current).parent();
            while !parent.is_nil() && current == Self::node_ptr(ptr, parent).left() {
                current = parent;
                parent = Self::node_ptr(ptr, parent).parent();
            }
            parent
        }
    }

    /// Drains every pair in ascending key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut drained = Vec::with_capacity(self.len);
        let mut current = self.first;
        while !current.is_nil() {
            // Taking the key leaves a hull whose links the successor walk
            // can still read.
            let next = self.successor(current);
            let node = self.nodes.get_mut(current);
            let key = node.take_key();
            let value_handle = node.value();
            drained.push((key, self.values.take(value_handle)));
            current = next;
        }
        self.clear();
        drained
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    // ─── Queries ────────────────────────────────────────────────────────────

    /// BST descent for `key`. Returns the sentinel when the key is absent.
    pub(crate) fn find<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.nodes.get(current);
            current = match key.cmp(node.key().borrow()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return current,
            };
        }
        Handle::NIL
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.find(key);
        if node.is_nil() {
            return None;
        }
        Some(self.values.get(self.nodes.get(node).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.find(key);
        if node.is_nil() {
            return None;
        }
        let value = self.nodes.get(node).value();
        Some(self.values.get_mut(value))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.find(key);
        if node.is_nil() {
            return None;
        }
        let node = self.nodes.get(node);
        Some((node.key(), self.values.get(node.value())))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        !self.find(key).is_nil()
    }

    /// Returns the minimum key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        if self.first.is_nil() {
            return None;
        }
        let node = self.nodes.get(self.first);
        Some((node.key(), self.values.get(node.value())))
    }

    /// Returns the maximum key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        if self.last.is_nil() {
            return None;
        }
        let node = self.nodes.get(self.last);
        Some((node.key(), self.values.get(node.value())))
    }

    /// First node with a key not less than `key`, or the sentinel.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut bound = Handle::NIL;
        while !current.is_nil() {
            let node = self.nodes.get(current);
            if key.cmp(node.key().borrow()) == Greater {
                current = node.right();
            } else {
                bound = current;
                current = node.left();
            }
        }
        bound
    }

    /// First node with a key strictly greater than `key`, or the sentinel.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut bound = Handle::NIL;
        while !current.is_nil() {
            let node = self.nodes.get(current);
            if key.cmp(node.key().borrow()) == Less {
                bound = current;
                current = node.left();
            } else {
                current = node.right();
            }
        }
        bound
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts `key`/`value`, descending from the root or from a validated
    /// `hint` (pass the sentinel for no hint). An equal key aborts before
    /// anything is allocated or linked.
    pub(crate) fn insert(&mut self, key: K, value: V, hint: Handle) -> InsertResult<K, V> {
        if self.len == 0 {
            let value = self.values.alloc(value);
            let node = self.nodes.alloc(Node::new(key, value));
            self.nodes.get_mut(node).set_color(Color::Black);
            self.root = node;
            self.first = node;
            self.last = node;
            self.len = 1;
            return InsertResult::Inserted(node);
        }

        let mut position = if hint.is_nil() { self.root } else { self.check_hint(&key, hint) };

        // Descend to the attachment point.
        let attach_left;
        loop {
            let node = self.nodes.get(position);
            match key.cmp(node.key()) {
                Less => {
                    if node.left().is_nil() {
                        attach_left = true;
                        break;
                    }
                    position = node.left();
                }
                Greater => {
                    if node.right().is_nil() {
                        attach_left = false;
                        break;
                    }
                    position = node.right();
                }
                Equal => return InsertResult::Duplicate { node: position, key, value },
            }
        }

        let value_handle = self.values.alloc(value);
        let node = self.nodes.alloc(Node::new(key, value_handle));
        self.nodes.get_mut(node).set_parent(position);
        if attach_left {
            self.nodes.get_mut(position).set_left(node);
        } else {
            self.nodes.get_mut(position).set_right(node);
        }

        self.insert_fixup(node);
        self.len += 1;
        self.refresh_ends();
        InsertResult::Inserted(node)
    }

    /// Accepts `hint` as the descent origin only when the hint/root/key
    /// ordering proves that a hint-first descent reaches the same attachment
    /// point as a root-first descent; every other comparison outcome falls
    /// back to the root.
    fn check_hint(&self, key: &K, hint: Handle) -> Handle {
        if hint == self.root {
            return self.root;
        }
        let hint_key = self.nodes.get(hint).key();
        let root_key = self.nodes.get(self.root).key();
        match (hint_key.cmp(root_key), key.cmp(hint_key)) {
            (Less, Less) | (Greater, Greater) => hint,
            _ => self.root,
        }
    }

    /// Restores the red-black invariants after attaching the red `node`.
    ///
    /// Climbs red parent / uncle pairs: a red uncle recolors and ascends
    /// two levels, a black uncle straightens a zig-zag with one rotation and
    /// finishes with a rotation at the grandparent.
    fn insert_fixup(&mut self, mut node: Handle) {
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            // A red parent is never the root, so the grandparent is real.
            let grandparent = self.parent(parent);
            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.right(parent) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.parent(node);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.parent(node);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    // ─── Rotation ───────────────────────────────────────────────────────────

    /// Left rotation about `node`: its right child takes its place, `node`
    /// becomes that child's left child, and the child's former left subtree
    /// moves under `node`. Colors are untouched.
    fn rotate_left(&mut self, node: Handle) {
        let child = self.right(node);
        let parent = self.parent(node);
        let grandchild = self.left(child);

        // The sentinel's parent link must not be clobbered mid-fixup.
        if !grandchild.is_nil() {
            self.nodes.get_mut(grandchild).set_parent(node);
        }
        {
            let n = self.nodes.get_mut(node);
            n.set_right(grandchild);
            n.set_parent(child);
        }
        {
            let c = self.nodes.get_mut(child);
            c.set_left(node);
            c.set_parent(parent);
        }
        if parent.is_nil() {
            self.root = child;
        } else if self.left(parent) == node {
            self.nodes.get_mut(parent).set_left(child);
        } else {
            self.nodes.get_mut(parent).set_right(child);
        }
    }

    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, node: Handle) {
        let child = self.left(node);
        let parent = self.parent(node);
        let grandchild = self.right(child);

        if !grandchild.is_nil() {
            self.nodes.get_mut(grandchild).set_parent(node);
        }
        {
            let n = self.nodes.get_mut(node);
            n.set_left(grandchild);
            n.set_parent(child);
        }
        {
            let c = self.nodes.get_mut(child);
            c.set_right(node);
            c.set_parent(parent);
        }
        if parent.is_nil() {
            self.root = child;
        } else if self.right(parent) == node {
            self.nodes.get_mut(parent).set_right(child);
        } else {
            self.nodes.get_mut(parent).set_left(child);
        }
    }

    // ─── Erasure ────────────────────────────────────────────────────────────

    /// Unlinks and destroys `node`, returning its key and value. Erasing the
    /// sentinel is a no-op returning `None`, which is how "key not found"
    /// comes back through find-then-erase callers.
    pub(crate) fn erase(&mut self, node: Handle) -> Option<(K, V)> {
        if node.is_nil() {
            return None;
        }

        // A node with two real children first trades places (and colors)
        // with its in-order predecessor, so the node unlinked below always
        // has at most one real child. Swapping positions instead of moving
        // the predecessor's key keeps every surviving node's handle attached
        // to the key it was created for.
        if !self.left(node).is_nil() && !self.right(node).is_nil() {
            self.swap_with_predecessor(node);
        }

        let child = if self.right(node).is_nil() { self.left(node) } else { self.right(node) };

        // Splice `node` out by pointing its parent at `child`. The sentinel
        // takes a parent link here too: the deletion fixup navigates upward
        // from `child` even when `child` is the sentinel.
        let parent = self.parent(node);
        self.nodes.get_mut(child).set_parent(parent);
        if parent.is_nil() {
            self.root = child;
        } else if self.left(parent) == node {
            self.nodes.get_mut(parent).set_left(child);
        } else {
            self.nodes.get_mut(parent).set_right(child);
        }

        if self.color(node) == Color::Black {
            if self.color(child) == Color::Red {
                // Re-blackening the lone red child restores the black count.
                self.set_color(child, Color::Black);
            } else {
                self.delete_fixup(child);
            }
        }

        // Restore the sentinel's self-link.
        self.nodes.get_mut(Handle::NIL).set_parent(Handle::NIL);

        let removed = self.nodes.take(node);
        let value = self.values.take(removed.value());
        self.len -= 1;
        self.refresh_ends();
        Some((removed.into_key(), value))
    }

    /// Exchanges `node` with the maximum of its left subtree: parent/child
    /// links, root slot, and colors. Afterwards `node` sits where its
    /// predecessor was, holding at most one real (left) child. The key
    /// ordering around `node` is temporarily wrong; the caller unlinks it
    /// immediately.
    fn swap_with_predecessor(&mut self, node: Handle) {
        let pred = self.rightmost(self.left(node));

        let parent = self.parent(node);
        let left = self.left(node);
        let right = self.right(node);
        let node_color = self.color(node);
        let pred_parent = self.parent(pred);
        let pred_left = self.left(pred);
        let pred_color = self.color(pred);

        // The predecessor takes node's place under node's parent.
        self.nodes.get_mut(pred).set_parent(parent);
        if parent.is_nil() {
            self.root = pred;
        } else if self.left(parent) == node {
            self.nodes.get_mut(parent).set_left(pred);
        } else {
            self.nodes.get_mut(parent).set_right(pred);
        }

        // Node adopts the predecessor's left subtree; the predecessor has no
        // right child by construction.
        self.nodes.get_mut(node).set_left(pred_left);
        if !pred_left.is_nil() {
            self.nodes.get_mut(pred_left).set_parent(node);
        }
        self.nodes.get_mut(node).set_right(Handle::NIL);

        // Node's right subtree moves under the predecessor unchanged.
        self.nodes.get_mut(pred).set_right(right);
        self.nodes.get_mut(right).set_parent(pred);

        if pred == left {
            // The predecessor was node's left child; they swap directly.
            self.nodes.get_mut(pred).set_left(node);
            self.nodes.get_mut(node).set_parent(pred);
        } else {
            // Distant predecessor: it was the right child of some deeper
            // node, which now adopts `node` there.
            self.nodes.get_mut(pred).set_left(left);
            self.nodes.get_mut(left).set_parent(pred);
            self.nodes.get_mut(node).set_parent(pred_parent);
            self.nodes.get_mut(pred_parent).set_right(node);
        }

        self.set_color(pred, node_color);
        self.set_color(node, pred_color);
    }

    /// Resolves the "extra black" carried by `node` after a black node was
    /// unlinked above it.
    ///
    /// Keyed on the sibling: a red sibling is rotated into a black one, a
    /// black sibling with two black children recolors and pushes the deficit
    /// up, a red near child straightens the sibling, and a red far child
    /// finishes with one rotation at the parent.
    fn delete_fixup(&mut self, mut node: Handle) {
        while node != self.root && self.color(node) == Color::Black {
            let parent = self.parent(node);
            if node == self.left(parent) {
                let mut sibling = self.right(parent);
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }
                if self.color(self.left(sibling)) == Color::Black
                    && self.color(self.right(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        let near = self.left(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }
                    let parent_color = self.color(parent);
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.right(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    node = self.root;
                }
            } else {
                let mut sibling = self.left(parent);
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }
                if self.color(self.right(sibling)) == Color::Black
                    && self.color(self.left(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        let near = self.right(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }
                    let parent_color = self.color(parent);
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.left(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    node = self.root;
                }
            }
        }
        self.set_color(node, Color::Black);
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTreeMap<K, V> {
    /// Structural deep copy: identical shape and colors, fresh handles.
    fn clone(&self) -> Self {
        let mut new = Self::with_capacity(self.len);
        if self.root.is_nil() {
            return new;
        }

        let mut stack: CloneStack = SmallVec::new();
        stack.push((self.root, Handle::NIL, false));
        while let Some((source, cloned_parent, is_left)) = stack.pop() {
            let source_node = self.nodes.get(source);
            let value = new.values.alloc(self.values.get(source_node.value()).clone());
            let cloned = new.nodes.alloc(Node::new(source_node.key().clone(), value));
            {
                let cloned_node = new.nodes.get_mut(cloned);
                cloned_node.set_color(source_node.color());
                cloned_node.set_parent(cloned_parent);
            }
            if cloned_parent.is_nil() {
                new.root = cloned;
            } else if is_left {
                new.nodes.get_mut(cloned_parent).set_left(cloned);
            } else {
                new.nodes.get_mut(cloned_parent).set_right(cloned);
            }
            if !source_node.left().is_nil() {
                stack.push((source_node.left(), cloned, true));
            }
            if !source_node.right().is_nil() {
                stack.push((source_node.right(), cloned, false));
            }
        }

        new.len = self.len;
        new.refresh_ends();
        new
    }
}

#[cfg(test)]
impl<K: Ord + Clone + core::fmt::Debug, V> RawRBTreeMap<K, V> {
    /// Checks every structural invariant, panicking with a description of
    /// the violations found. Intended for use in tests after each mutation.
    pub(crate) fn validate_invariants(&self) {
        use alloc::format;
        use alloc::string::String;
        use alloc::vec::Vec;

        let mut errors: Vec<String> = Vec::new();

        let nil = self.nodes.get(Handle::NIL);
        if nil.color() != Color::Black {
            errors.push(String::from("sentinel is not black"));
        }
        if !nil.parent().is_nil() || !nil.left().is_nil() || !nil.right().is_nil() {
            errors.push(String::from("sentinel links do not point at the sentinel"));
        }

        if self.root.is_nil() {
            if self.len != 0 {
                errors.push(format!("empty tree has len {}", self.len));
            }
            if !self.first.is_nil() || !self.last.is_nil() {
                errors.push(String::from("empty tree caches a first or last node"));
            }
        } else {
            if self.color(self.root) != Color::Black {
                errors.push(String::from("root is not black"));
            }
            if !self.parent(self.root).is_nil() {
                errors.push(String::from("root has a parent"));
            }

            let mut count = 0usize;
            self.validate_node(self.root, &mut count, &mut errors);
            if count != self.len {
                errors.push(format!("len mismatch: len={}, reachable={}", self.len, count));
            }
            if self.first != self.leftmost(self.root) {
                errors.push(String::from("cached first is not the leftmost node"));
            }
            if self.last != self.rightmost(self.root) {
                errors.push(String::from("cached last is not the rightmost node"));
            }

            // In-order traversal must be strictly ascending.
            let mut current = self.first;
            let mut previous: Option<&K> = None;
            let mut steps = 0usize;
            while !current.is_nil() {
                let key = self.nodes.get(current).key();
                if let Some(previous) = previous
                    && previous >= key
                {
                    errors.push(format!("in-order keys not strictly ascending at {key:?}"));
                }
                previous = Some(key);
                current = self.successor(current);
                steps += 1;
                assert!(steps <= self.len, "successor walk does not terminate");
            }
            if steps != self.len {
                errors.push(format!("successor walk visited {steps} nodes, len is {}", self.len));
            }
        }

        assert!(errors.is_empty(), "tree invariant violations:\n{}", errors.join("\n"));
    }

    /// Returns the black height of the subtree at `handle`. Recursion depth
    /// is logarithmic for any tree that passes the color checks.
    fn validate_node(
        &self,
        handle: Handle,
        count: &mut usize,
        errors: &mut alloc::vec::Vec<alloc::string::String>,
    ) -> usize {
        use alloc::format;

        if handle.is_nil() {
            return 1;
        }
        *count += 1;

        let node = self.nodes.get(handle);
        if node.color() == Color::Red
            && (self.color(node.left()) == Color::Red || self.color(node.right()) == Color::Red)
        {
            errors.push(format!("red node {:?} has a red child", node.key()));
        }
        for (child, side) in [(node.left(), "left"), (node.right(), "right")] {
            if !child.is_nil() && self.parent(child) != handle {
                errors.push(format!("{side} child of {:?} has a stale parent link", node.key()));
            }
        }
        if !node.left().is_nil() && self.nodes.get(node.left()).key() >= node.key() {
            errors.push(format!("left child of {:?} is not smaller", node.key()));
        }
        if !node.right().is_nil() && self.nodes.get(node.right()).key() <= node.key() {
            errors.push(format!("right child of {:?} is not larger", node.key()));
        }

        let left_black = self.validate_node(node.left(), count, errors);
        let right_black = self.validate_node(node.right(), count, errors);
        if left_black != right_black {
            errors.push(format!(
                "black-height mismatch under {:?}: {left_black} vs {right_black}",
                node.key()
            ));
        }
        left_black + usize::from(node.color() == Color::Black)
    }

    /// Pre-order (key, color) snapshot. For a search tree the pre-order key
    /// sequence pins down the exact shape, so equal snapshots mean equal
    /// structure and coloring.
    pub(crate) fn structure(&self) -> alloc::vec::Vec<(K, Color)> {
        let mut snapshot = alloc::vec::Vec::with_capacity(self.len);
        if self.root.is_nil() {
            return snapshot;
        }
        let mut stack = alloc::vec![self.root];
        while let Some(handle) = stack.pop() {
            let node = self.nodes.get(handle);
            snapshot.push((node.key().clone(), node.color()));
            if !node.right().is_nil() {
                stack.push(node.right());
            }
            if !node.left().is_nil() {
                stack.push(node.left());
            }
        }
        snapshot
    }
}
