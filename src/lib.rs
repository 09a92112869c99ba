//! An ordered, height-balanced binary search tree with duplicate counting.
//!
//! Nodes live in a flat arena and refer to their parent and children by index, so rotations are
//! plain index rewrites. The ordering of values is decided by a [`Comparator`] chosen when the
//! tree is built.
//!
//! The tree maintains the following invariants between calls:
//! 1. Every value in a node's left subtree compares less than the node's value, and every value
//!    in its right subtree compares greater.
//! 2. Every non-root node's parent link points at the node that holds it, on the correct side.
//! 3. At every node, the depths of the two subtrees differ by at most one. An absent subtree has
//!    depth 0 and a leaf has depth 1.

use core::fmt;

use thiserror::Error;
use tracing::debug;

mod compare;
mod dot;
mod iter;
mod node;
mod rebalance;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use compare::{Comparator, Comparison, Natural, Structured, ThreeWay};
pub use iter::Iter;

use node::{Arena, Dir, Link, Node, NodeId};

/// Errors returned by [`OrderedTree`] operations.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The value could not be ordered relative to a value already in the tree.
    #[error("value is incomparable with an element of the tree")]
    Incomparable,

    /// The operation requires at least one element.
    #[error("tree is empty")]
    Empty,
}

/// An ordered multiset backed by a height-balanced binary search tree.
///
/// Equal values share a single node which counts its occurrences.
#[derive(Clone)]
pub struct OrderedTree<T, C = Natural> {
    nodes: Arena<T>,
    root: Link,
    len: usize,
    occurrences: usize,
    cmp: C,
}

impl<T: PartialOrd> OrderedTree<T> {
    /// Returns a new tree containing `seed`, ordered by `T`'s [`PartialOrd`] implementation.
    pub fn new(seed: T) -> Self {
        OrderedTree::with_comparator(seed, Natural)
    }
}

impl<T: ThreeWay> OrderedTree<T, Structured> {
    /// Returns a new tree containing `seed`, ordered by `T`'s [`ThreeWay`] implementation.
    pub fn structured(seed: T) -> Self {
        OrderedTree::with_comparator(seed, Structured)
    }
}

impl<T, C> OrderedTree<T, C>
where
    C: Comparator<T>,
{
    /// Returns a new tree containing `seed`, ordered by `cmp`.
    pub fn with_comparator(seed: T, cmp: C) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(seed, None));

        OrderedTree {
            nodes,
            root: Some(root),
            len: 1,
            occurrences: 1,
            cmp,
        }
    }

    /// Returns `true` if the tree contains no elements.
    ///
    /// A tree is only ever empty after its last element has been removed.
    pub fn is_empty(&self) -> bool {
        let empty = self.len == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of distinct values in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of values in the tree, counting duplicates.
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Returns the comparator used to order the tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0);
            assert_eq!(self.occurrences, 0);
            assert_eq!(self.nodes.live(), 0);
            return;
        };

        assert_eq!(self.nodes.get(root).parent(), None, "root has a parent");

        let mut occurrences = 0;
        self.assert_invariants_at(root, &mut occurrences);
        assert_eq!(occurrences, self.occurrences);
        assert_eq!(self.nodes.live(), self.len);
        assert_eq!(self.iter().count(), self.len);

        // In-order traversal must be strictly increasing.
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for cur in iter {
                assert_eq!(self.cmp.compare(prev, cur), Comparison::Less);
                prev = cur;
            }
        }
    }

    // Returns the structural depth of the subtree at `node`.
    fn assert_invariants_at(&self, node: NodeId, occurrences: &mut usize) -> usize {
        let n = self.nodes.get(node);
        assert!(n.count >= 1);
        *occurrences += n.count;

        let mut depths = [0; 2];
        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = n.child(dir) {
                // Ensure child's parent link points to this node.
                let parent = self
                    .nodes
                    .get(child)
                    .parent()
                    .expect("child parent pointer not set");
                assert_eq!(node, parent);

                let expected = match dir {
                    Dir::Left => Comparison::Less,
                    Dir::Right => Comparison::Greater,
                };
                assert_eq!(
                    self.cmp.compare(&self.nodes.get(child).value, &n.value),
                    expected
                );

                depths[dir as usize] = self.assert_invariants_at(child, occurrences);
            }
        }

        assert!(depths[0].abs_diff(depths[1]) <= 1, "subtree is unbalanced");

        let depth = 1 + depths[0].max(depths[1]);
        assert_eq!(n.height(), depth, "cached height is stale");
        depth
    }

    fn find(&self, value: &T) -> Result<Link, TreeError> {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            let node = self.nodes.get(cur);

            opt_cur = match self.cmp.compare(value, &node.value) {
                Comparison::Less => node.left(),
                Comparison::Equal => return Ok(Some(cur)),
                Comparison::Greater => node.right(),
                Comparison::Incomparable => return Err(TreeError::Incomparable),
            };
        }

        Ok(None)
    }

    /// Returns `true` if the tree contains `value`.
    ///
    /// Values which cannot be compared with the tree's elements are never contained in it.
    pub fn exists(&self, value: &T) -> bool {
        matches!(self.find(value), Ok(Some(_)))
    }

    /// Returns the number of occurrences of `value` in the tree.
    pub fn count(&self, value: &T) -> usize {
        match self.find(value) {
            Ok(Some(id)) => self.nodes.get(id).count,
            _ => 0,
        }
    }

    /// Returns the minimum element of the tree.
    pub fn min(&self) -> Result<&T, TreeError> {
        let root = self.root.ok_or(TreeError::Empty)?;
        let (min, _) = self.min_in_subtree(root);
        Ok(&self.nodes.get(min).value)
    }

    /// Returns the maximum element of the tree.
    pub fn max(&self) -> Result<&T, TreeError> {
        let mut cur = self.root.ok_or(TreeError::Empty)?;

        while let Some(right) = self.nodes.get(cur).right() {
            cur = right;
        }

        Ok(&self.nodes.get(cur).value)
    }

    /// Adds an occurrence of `value` to the tree, returning its new number of occurrences.
    ///
    /// If the value is already present only its count changes. Otherwise it is linked in as a
    /// new leaf and the tree is rebalanced.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn add(&mut self, value: T) -> Result<usize, TreeError> {
        let Some(root) = self.root else {
            // Tree is empty. Set `value` as the root and return.
            self.root = Some(self.nodes.alloc(Node::new(value, None)));
            self.len += 1;
            self.occurrences += 1;
            return Ok(1);
        };

        let mut parent = root;

        // Descend the tree, looking for a suitable leaf.
        loop {
            let node = self.nodes.get(parent);

            let dir = match self.cmp.compare(&value, &node.value) {
                Comparison::Less => Dir::Left,
                Comparison::Greater => Dir::Right,
                Comparison::Equal => {
                    let node = self.nodes.get_mut(parent);
                    node.count += 1;
                    self.occurrences += 1;
                    return Ok(node.count);
                }
                Comparison::Incomparable => return Err(TreeError::Incomparable),
            };

            match node.child(dir) {
                // Descend.
                Some(child) => parent = child,

                // Set `value` as child.
                None => {
                    let leaf = self.nodes.alloc(Node::new(value, Some(parent)));
                    self.nodes.get_mut(parent).set_child(dir, Some(leaf));
                    break;
                }
            }
        }

        self.len += 1;
        self.occurrences += 1;
        debug!(len = self.len, "linked new leaf");

        self.rebalance_from(Some(parent));
        Ok(1)
    }

    /// Removes one occurrence of `value` from the tree.
    ///
    /// Returns `Ok(false)` if the value was not present. When the last occurrence of a value is
    /// removed, its node is unlinked and the tree is rebalanced.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove(&mut self, value: &T) -> Result<bool, TreeError> {
        let Some(id) = self.find(value)? else {
            return Ok(false);
        };

        self.occurrences -= 1;

        let node = self.nodes.get_mut(id);
        if node.count > 1 {
            node.count -= 1;
            return Ok(true);
        }

        let lowest = self.unlink(id);
        self.len -= 1;
        debug!(len = self.len, "unlinked node");

        self.rebalance_from(lowest);
        Ok(true)
    }

    // Removes the value held by `node` from the tree structure.
    //
    // Returns the lowest node whose subtree changed shape, from which rebalancing must start.
    fn unlink(&mut self, node: NodeId) -> Link {
        let n = self.nodes.get(node);
        let parent = n.parent();
        let left = n.left();
        let right = n.right();

        match (left, right) {
            // The successor is removed from the tree and its value moves into `node`. The
            // successor has no left child, so its right child is elevated to replace it.
            (Some(_), Some(right)) => {
                let (successor, successor_parent) = self.min_in_subtree(right);
                let successor_right = self.nodes.get(successor).right();
                let successor_parent = successor_parent.unwrap_or(node);

                self.replace_child(successor_parent, successor, successor_right);

                let Node { value, count, .. } = self.nodes.free(successor);
                let n = self.nodes.get_mut(node);
                n.value = value;
                n.count = count;

                Some(successor_parent)
            }

            (Some(child), None) | (None, Some(child)) => {
                self.replace_child_or_set_root(parent, node, Some(child));
                self.nodes.free(node);
                parent
            }

            (None, None) => {
                self.replace_child_or_set_root(parent, node, None);
                self.nodes.free(node);
                parent
            }
        }
    }

    // Returns the minimum node in the subtree.
    //
    // If the subtree root is not the minimum, also returns the minimum node's parent.
    #[inline]
    fn min_in_subtree(&self, root: NodeId) -> (NodeId, Link) {
        let mut parent = None;
        let mut cur = root;

        while let Some(left) = self.nodes.get(cur).left() {
            parent = Some(cur);
            cur = left;
        }

        (cur, parent)
    }

    /// Returns the depth of the tree. An empty tree has depth 0 and a single node has depth 1.
    pub fn depth(&self) -> usize {
        self.height(self.root)
    }

    /// Returns `true` if every node has either zero or two children.
    pub fn is_complete(&self) -> bool {
        self.root.map_or(true, |root| self.is_complete_at(root))
    }

    fn is_complete_at(&self, node: NodeId) -> bool {
        let n = self.nodes.get(node);

        match (n.left(), n.right()) {
            (None, None) => true,
            (Some(left), Some(right)) => self.is_complete_at(left) && self.is_complete_at(right),
            _ => false,
        }
    }

    /// Returns an iterator over the distinct values of the tree, in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    // Support methods ========================================================

    fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        self.nodes.get_mut(node).set_parent(parent);
    }

    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeId, new_child: Link) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => {
                self.root = new_child;
                self.maybe_set_parent(new_child, None);
            }
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with `new_child`, and points
    // `new_child`'s parent link at `parent`.
    //
    // The caller must ensure that `old_child` is a child of `parent` and that `new_child` is not.
    fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: Link) {
        let dir = self.which_child(parent, old_child);

        debug_assert_eq!(self.nodes.get(parent).child(dir), Some(old_child));
        debug_assert!(
            new_child.is_none() || self.nodes.get(parent).child(!dir) != new_child,
            "`new_child` must not be a child of `parent`"
        );

        self.nodes.get_mut(parent).set_child(dir, new_child);
        self.maybe_set_parent(new_child, Some(parent));
    }

    #[inline]
    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.nodes.get(parent).left() == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }
}

impl<'tree, T, C> IntoIterator for &'tree OrderedTree<T, C>
where
    C: Comparator<T>,
{
    type Item = &'tree T;
    type IntoIter = Iter<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writes the tree as `value` for a leaf and `value->(left,right)` for an inner node.
///
/// A missing child is written as an empty string, and an empty tree writes nothing.
impl<T, C> fmt::Display for OrderedTree<T, C>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_subtree(root, f),
            None => Ok(()),
        }
    }
}

impl<T, C> OrderedTree<T, C>
where
    T: fmt::Display,
{
    fn fmt_subtree(&self, node: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.nodes.get(node);
        write!(f, "{}", n.value)?;

        if n.is_leaf() {
            return Ok(());
        }

        f.write_str("->(")?;
        if let Some(left) = n.left() {
            self.fmt_subtree(left, f)?;
        }
        f.write_str(",")?;
        if let Some(right) = n.right() {
            self.fmt_subtree(right, f)?;
        }
        f.write_str(")")
    }
}

impl<T, C> fmt::Debug for OrderedTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Iter::new(&self.nodes, self.root, self.len))
            .finish()
    }
}
