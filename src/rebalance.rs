//! Height-balance maintenance.
//!
//! After a structural change, the heights cached on every node between the change and the root
//! may be stale, and any of those nodes may have subtrees whose depths differ by two. The repair
//! walks parent links from the lowest changed node up to the root, refreshing heights and
//! rotating wherever the difference exceeds one.
//!
//! A node is left-heavy when its left subtree is deeper than its right. Given a left-heavy node
//! `n` with left child `l`:
//!
//! - If `l`'s left subtree is at least as deep as its right subtree, `l` is rotated up over `n`.
//! - Otherwise `l`'s right child `m` is first rotated up over `l`, and then over `n`. Rotating `l`
//!   alone would make `n` right-heavy by the same amount.
//!
//! The right-heavy cases are symmetric.

use tracing::{debug, trace};

use crate::{
    node::{Dir, Link, NodeId},
    Comparator, OrderedTree,
};

impl<T, C> OrderedTree<T, C>
where
    C: Comparator<T>,
{
    /// Returns `true` if, at every node, the depths of the left and right subtrees differ by at
    /// most one.
    ///
    /// This walks the whole tree and does not rely on cached heights.
    pub fn is_balanced(&self) -> bool {
        self.balanced_depth(self.root).is_some()
    }

    // Returns the depth of the subtree at `link` if it is balanced.
    fn balanced_depth(&self, link: Link) -> Option<usize> {
        let Some(node) = link else {
            return Some(0);
        };

        let n = self.nodes.get(node);
        let left = self.balanced_depth(n.left())?;
        let right = self.balanced_depth(n.right())?;

        (left.abs_diff(right) <= 1).then_some(1 + left.max(right))
    }

    /// Returns the cached height of the pointed-to node, or 0 for a missing node.
    #[inline]
    pub(crate) fn height(&self, link: Link) -> usize {
        link.map_or(0, |n| self.nodes.get(n).height())
    }

    fn update_height(&mut self, node: NodeId) {
        let n = self.nodes.get(node);
        let height = 1 + self.height(n.left()).max(self.height(n.right()));
        self.nodes.get_mut(node).set_height(height);
    }

    // Returns the direction of the deeper subtree of `node`, if the depths differ by more than one.
    fn heavy_side(&self, node: NodeId) -> Option<Dir> {
        let n = self.nodes.get(node);
        let left = self.height(n.left());
        let right = self.height(n.right());

        if left > right + 1 {
            Some(Dir::Left)
        } else if right > left + 1 {
            Some(Dir::Right)
        } else {
            None
        }
    }

    // Restores the balance invariant on the path from `start` to the root.
    pub(crate) fn rebalance_from(&mut self, start: Link) {
        let mut rotations = 0;
        let mut opt_cur = start;

        while let Some(cur) = opt_cur {
            self.update_height(cur);

            let top = match self.heavy_side(cur) {
                Some(heavy) => {
                    let (top, performed) = self.rotate_heavy(cur, heavy);
                    rotations += performed;
                    top
                }
                None => cur,
            };

            debug_assert!(self.heavy_side(top).is_none(), "rotation failed to balance");

            // Ascend one level.
            opt_cur = self.nodes.get(top).parent();
        }

        if rotations > 0 {
            debug!(rotations, depth = self.depth(), "rebalanced");
        }
    }

    // Rotates the subtree at `node`, whose `heavy` subtree is too deep, into balance.
    //
    // Returns the new subtree root and the number of rotations performed.
    fn rotate_heavy(&mut self, node: NodeId, heavy: Dir) -> (NodeId, usize) {
        let child = self
            .nodes
            .get(node)
            .child(heavy)
            .expect("heavy subtree must not be empty");

        let c = self.nodes.get(child);
        let inner = c.child(!heavy);
        let outer = c.child(heavy);

        if self.height(inner) > self.height(outer) {
            let grandchild = inner.expect("inner subtree must not be empty");
            self.rotate_at(child, grandchild);
            self.rotate_at(node, grandchild);
            (grandchild, 2)
        } else {
            self.rotate_at(node, child);
            (child, 1)
        }
    }

    // Performs a rotation, moving `up` up and its parent `down` down.
    //
    // The heights of `down` and `up` are refreshed; the heights of their ancestors are not.
    pub(crate) fn rotate_at(&mut self, down: NodeId, up: NodeId) {
        // - `down` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
        let dir = if self.nodes.get(down).right() == Some(up) {
            Dir::Left
        } else {
            Dir::Right
        };

        debug_assert_eq!(self.nodes.get(up).parent(), Some(down));
        trace!(?dir, "rotating");

        let across = self.nodes.get(up).child(dir);
        self.nodes.get_mut(down).set_child(!dir, across);
        self.maybe_set_parent(across, Some(down));

        self.nodes.get_mut(up).set_child(dir, Some(down));
        let parent = self.nodes.get_mut(down).set_parent(Some(up));
        self.nodes.get_mut(up).set_parent(parent);

        match parent {
            Some(parent) => {
                let which = self.which_child(parent, down);
                self.nodes.get_mut(parent).set_child(which, Some(up));
            }
            None => self.root = Some(up),
        }

        self.update_height(down);
        self.update_height(up);
    }
}
