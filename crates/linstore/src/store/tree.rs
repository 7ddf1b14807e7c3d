//! Red-black tree keyed by `u64`, backing the sparse store.
//!
//! Nodes live in an arena `Vec` addressed by `u32` ids, with `NIL` as an
//! out-of-band sentinel. Removal compacts the arena by moving the last node
//! into the freed slot, so memory stays proportional to the number of live
//! entries.

const NIL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node<V> {
    key: u64,
    value: V,
    left: u32,
    right: u32,
    parent: u32,
    color: Color,
}

/// Self-balancing search tree mapping `u64` keys to values.
///
/// Lookup, insert and remove are O(log n) in the number of live entries,
/// independent of the key range.
#[derive(Debug, Clone)]
pub struct RbTree<V> {
    nodes: Vec<Node<V>>,
    root: u32,
}

impl<V> Default for RbTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RbTree<V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: u64) -> Option<&V> {
        let id = self.find(key)?;
        Some(&self.nodes[id as usize].value)
    }

    /// In-order iterator over `(key, &value)` pairs.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut stack = Vec::new();
        let mut id = self.root;
        while id != NIL {
            stack.push(id);
            id = self.nodes[id as usize].left;
        }
        Iter { tree: self, stack }
    }

    fn find(&self, key: u64) -> Option<u32> {
        let mut id = self.root;
        while id != NIL {
            let node = &self.nodes[id as usize];
            id = match key.cmp(&node.key) {
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Insert `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: u64, value: V) -> Option<V> {
        let mut parent = NIL;
        let mut id = self.root;
        while id != NIL {
            parent = id;
            let node = &mut self.nodes[id as usize];
            id = match key.cmp(&node.key) {
                std::cmp::Ordering::Equal => {
                    return Some(std::mem::replace(&mut node.value, value));
                }
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }

        let fresh = self.nodes.len() as u32;
        self.nodes.push(Node {
            key,
            value,
            left: NIL,
            right: NIL,
            parent,
            color: Color::Red,
        });

        if parent == NIL {
            self.root = fresh;
        } else if key < self.nodes[parent as usize].key {
            self.nodes[parent as usize].left = fresh;
        } else {
            self.nodes[parent as usize].right = fresh;
        }

        self.insert_fixup(fresh);
        None
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&mut self, key: u64) -> Option<V> {
        let z = self.find(key)?;

        let mut removed_color = self.color_of(z);
        let fix_child: u32;
        let fix_parent: u32;

        let z_left = self.nodes[z as usize].left;
        let z_right = self.nodes[z as usize].right;

        if z_left == NIL {
            fix_child = z_right;
            fix_parent = self.nodes[z as usize].parent;
            self.transplant(z, z_right);
        } else if z_right == NIL {
            fix_child = z_left;
            fix_parent = self.nodes[z as usize].parent;
            self.transplant(z, z_left);
        } else {
            // Two children: the in-order successor y takes z's place.
            let y = self.minimum(z_right);
            removed_color = self.color_of(y);
            fix_child = self.nodes[y as usize].right;
            if self.nodes[y as usize].parent == z {
                fix_parent = y;
            } else {
                fix_parent = self.nodes[y as usize].parent;
                let y_right = self.nodes[y as usize].right;
                self.transplant(y, y_right);
                self.nodes[y as usize].right = z_right;
                self.nodes[z_right as usize].parent = y;
            }
            self.transplant(z, y);
            self.nodes[y as usize].left = z_left;
            self.nodes[z_left as usize].parent = y;
            self.nodes[y as usize].color = self.color_of(z);
        }

        if removed_color == Color::Black {
            self.remove_fixup(fix_child, fix_parent);
        }

        Some(self.arena_remove(z))
    }

    /// Replace `old`'s position under its parent with `new` (either may be NIL).
    fn transplant(&mut self, old: u32, new: u32) {
        let parent = self.nodes[old as usize].parent;
        if parent == NIL {
            self.root = new;
        } else if self.nodes[parent as usize].left == old {
            self.nodes[parent as usize].left = new;
        } else {
            self.nodes[parent as usize].right = new;
        }
        if new != NIL {
            self.nodes[new as usize].parent = parent;
        }
    }

    fn minimum(&self, mut id: u32) -> u32 {
        while self.nodes[id as usize].left != NIL {
            id = self.nodes[id as usize].left;
        }
        id
    }

    #[inline]
    fn color_of(&self, id: u32) -> Color {
        if id == NIL {
            Color::Black
        } else {
            self.nodes[id as usize].color
        }
    }

    #[inline]
    fn set_color(&mut self, id: u32, color: Color) {
        if id != NIL {
            self.nodes[id as usize].color = color;
        }
    }

    #[inline]
    fn left_of(&self, id: u32) -> u32 {
        if id == NIL {
            NIL
        } else {
            self.nodes[id as usize].left
        }
    }

    #[inline]
    fn right_of(&self, id: u32) -> u32 {
        if id == NIL {
            NIL
        } else {
            self.nodes[id as usize].right
        }
    }

    #[inline]
    fn parent_of(&self, id: u32) -> u32 {
        if id == NIL {
            NIL
        } else {
            self.nodes[id as usize].parent
        }
    }

    fn rotate_left(&mut self, x: u32) {
        let y = self.nodes[x as usize].right;
        let y_left = self.nodes[y as usize].left;

        self.nodes[x as usize].right = y_left;
        if y_left != NIL {
            self.nodes[y_left as usize].parent = x;
        }

        let x_parent = self.nodes[x as usize].parent;
        self.nodes[y as usize].parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if self.nodes[x_parent as usize].left == x {
            self.nodes[x_parent as usize].left = y;
        } else {
            self.nodes[x_parent as usize].right = y;
        }

        self.nodes[y as usize].left = x;
        self.nodes[x as usize].parent = y;
    }

    fn rotate_right(&mut self, x: u32) {
        let y = self.nodes[x as usize].left;
        let y_right = self.nodes[y as usize].right;

        self.nodes[x as usize].left = y_right;
        if y_right != NIL {
            self.nodes[y_right as usize].parent = x;
        }

        let x_parent = self.nodes[x as usize].parent;
        self.nodes[y as usize].parent = x_parent;
        if x_parent == NIL {
            self.root = y;
        } else if self.nodes[x_parent as usize].left == x {
            self.nodes[x_parent as usize].left = y;
        } else {
            self.nodes[x_parent as usize].right = y;
        }

        self.nodes[y as usize].right = x;
        self.nodes[x as usize].parent = y;
    }

    fn insert_fixup(&mut self, mut z: u32) {
        while self.color_of(self.parent_of(z)) == Color::Red {
            let parent = self.parent_of(z);
            let grandparent = self.parent_of(parent);
            if parent == self.left_of(grandparent) {
                let uncle = self.right_of(grandparent);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    z = grandparent;
                } else {
                    if z == self.right_of(parent) {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.parent_of(z);
                    let grandparent = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left_of(grandparent);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    z = grandparent;
                } else {
                    if z == self.left_of(parent) {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.parent_of(z);
                    let grandparent = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restore the black-height invariant after removing a black node.
    ///
    /// `x` may be NIL, so its parent is threaded through explicitly.
    fn remove_fixup(&mut self, mut x: u32, mut x_parent: u32) {
        while x != self.root && self.color_of(x) == Color::Black && x_parent != NIL {
            if x == self.left_of(x_parent) {
                let mut sibling = self.right_of(x_parent);
                if self.color_of(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(x_parent, Color::Red);
                    self.rotate_left(x_parent);
                    sibling = self.right_of(x_parent);
                }
                if self.color_of(self.left_of(sibling)) == Color::Black
                    && self.color_of(self.right_of(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    x = x_parent;
                    x_parent = self.parent_of(x);
                } else {
                    if self.color_of(self.right_of(sibling)) == Color::Black {
                        self.set_color(self.left_of(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right_of(x_parent);
                    }
                    self.set_color(sibling, self.color_of(x_parent));
                    self.set_color(x_parent, Color::Black);
                    let sibling_right = self.right_of(sibling);
                    self.set_color(sibling_right, Color::Black);
                    self.rotate_left(x_parent);
                    x = self.root;
                    x_parent = NIL;
                }
            } else {
                let mut sibling = self.left_of(x_parent);
                if self.color_of(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(x_parent, Color::Red);
                    self.rotate_right(x_parent);
                    sibling = self.left_of(x_parent);
                }
                if self.color_of(self.right_of(sibling)) == Color::Black
                    && self.color_of(self.left_of(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    x = x_parent;
                    x_parent = self.parent_of(x);
                } else {
                    if self.color_of(self.left_of(sibling)) == Color::Black {
                        self.set_color(self.right_of(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left_of(x_parent);
                    }
                    self.set_color(sibling, self.color_of(x_parent));
                    self.set_color(x_parent, Color::Black);
                    let sibling_left = self.left_of(sibling);
                    self.set_color(sibling_left, Color::Black);
                    self.rotate_right(x_parent);
                    x = self.root;
                    x_parent = NIL;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    /// Reclaim the arena slot of an unlinked node and return its value.
    ///
    /// The last arena node is moved into the freed slot so the arena stays
    /// dense; every pointer to the moved node is patched first.
    fn arena_remove(&mut self, id: u32) -> V {
        let last = (self.nodes.len() - 1) as u32;
        if id != last {
            let parent = self.nodes[last as usize].parent;
            let left = self.nodes[last as usize].left;
            let right = self.nodes[last as usize].right;

            if parent == NIL {
                self.root = id;
            } else if self.nodes[parent as usize].left == last {
                self.nodes[parent as usize].left = id;
            } else {
                self.nodes[parent as usize].right = id;
            }
            if left != NIL {
                self.nodes[left as usize].parent = id;
            }
            if right != NIL {
                self.nodes[right as usize].parent = id;
            }

            self.nodes.swap(id as usize, last as usize);
        }
        self.nodes.pop().map(|node| node.value).unwrap_or_else(|| {
            unreachable!("arena_remove called on empty arena")
        })
    }
}

/// In-order iterator over tree entries.
pub struct Iter<'a, V> {
    tree: &'a RbTree<V>,
    stack: Vec<u32>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id as usize];
        let mut descend = node.right;
        while descend != NIL {
            self.stack.push(descend);
            descend = self.tree.nodes[descend as usize].left;
        }
        Some((node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the tree verifying the search-tree ordering, red-red exclusion
    /// and uniform black height; returns the black height of `id`.
    fn check_invariants<V>(tree: &RbTree<V>, id: u32, low: Option<u64>, high: Option<u64>) -> usize {
        if id == NIL {
            return 1;
        }
        let node = &tree.nodes[id as usize];
        if let Some(low) = low {
            assert!(node.key > low, "ordering violated at key {}", node.key);
        }
        if let Some(high) = high {
            assert!(node.key < high, "ordering violated at key {}", node.key);
        }
        if node.color == Color::Red {
            assert_eq!(tree.color_of(node.left), Color::Black, "red-red violation");
            assert_eq!(tree.color_of(node.right), Color::Black, "red-red violation");
        }
        let left_height = check_invariants(tree, node.left, low, Some(node.key));
        let right_height = check_invariants(tree, node.right, Some(node.key), high);
        assert_eq!(left_height, right_height, "black height mismatch");
        left_height + usize::from(node.color == Color::Black)
    }

    fn assert_valid<V>(tree: &RbTree<V>) {
        assert_eq!(tree.color_of(tree.root), Color::Black);
        check_invariants(tree, tree.root, None, None);
        if tree.root != NIL {
            assert_eq!(tree.nodes[tree.root as usize].parent, NIL);
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut tree = RbTree::new();
        for key in [5u64, 3, 8, 1, 4, 7, 9] {
            tree.insert(key, key * 10);
        }
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.get(4), Some(&40));
        assert_eq!(tree.get(6), None);
        assert_valid(&tree);
    }

    #[test]
    fn test_insert_replaces() {
        let mut tree = RbTree::new();
        assert_eq!(tree.insert(1, "a"), None);
        assert_eq!(tree.insert(1, "b"), Some("a"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(1), Some(&"b"));
    }

    #[test]
    fn test_remove() {
        let mut tree = RbTree::new();
        for key in 0u64..32 {
            tree.insert(key, key);
        }
        for key in [0u64, 31, 15, 16, 7] {
            assert_eq!(tree.remove(key), Some(key));
            assert_eq!(tree.get(key), None);
            assert_valid(&tree);
        }
        assert_eq!(tree.remove(15), None);
        assert_eq!(tree.len(), 27);
    }

    #[test]
    fn test_remove_to_empty() {
        let mut tree = RbTree::new();
        for key in [2u64, 1, 3] {
            tree.insert(key, ());
        }
        for key in [1u64, 3, 2] {
            assert_eq!(tree.remove(key), Some(()));
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root, NIL);
    }

    #[test]
    fn test_iter_in_order() {
        let mut tree = RbTree::new();
        for key in [9u64, 2, 7, 4, 11, 0] {
            tree.insert(key, ());
        }
        let keys: Vec<u64> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![0, 2, 4, 7, 9, 11]);
    }

    #[test]
    fn test_sparse_key_range() {
        let mut tree = RbTree::new();
        tree.insert(0, 'a');
        tree.insert(u64::MAX / 2, 'b');
        tree.insert(u64::MAX - 1, 'c');
        assert_eq!(tree.get(u64::MAX / 2), Some(&'b'));
        assert_valid(&tree);
    }

    #[test]
    fn test_randomized_against_model() {
        use rand::Rng;
        use std::collections::BTreeMap;

        let mut rng = rand::rng();
        let mut tree = RbTree::new();
        let mut model: BTreeMap<u64, u32> = BTreeMap::new();

        for step in 0u32..4000 {
            let key = rng.random_range(0..256u64);
            if rng.random_bool(0.4) {
                assert_eq!(tree.remove(key), model.remove(&key));
            } else {
                assert_eq!(tree.insert(key, step), model.insert(key, step));
            }
            if step % 64 == 0 {
                assert_valid(&tree);
                assert_eq!(tree.len(), model.len());
            }
        }

        assert_valid(&tree);
        let tree_pairs: Vec<(u64, u32)> = tree.iter().map(|(k, v)| (k, *v)).collect();
        let model_pairs: Vec<(u64, u32)> = model.into_iter().collect();
        assert_eq!(tree_pairs, model_pairs);
    }
}
