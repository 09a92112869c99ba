use core::iter::FusedIterator;

use crate::node::{Arena, Link};

enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the distinct values of an [`OrderedTree`](crate::OrderedTree).
pub struct Iter<'tree, T> {
    nodes: &'tree Arena<T>,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'tree, T> Iter<'tree, T> {
    pub(crate) fn new(nodes: &'tree Arena<T>, root: Link, len: usize) -> Self {
        Iter {
            nodes,

            front_cur: root,
            front_from: CameFrom::Parent,
            len,
        }
    }
}

impl<'tree, T> Iterator for Iter<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    while let Some(left) = self.nodes.get(cur).left() {
                        cur = left;
                    }

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    return Some(&self.nodes.get(cur).value);
                }

                CameFrom::Here => {
                    let node = self.nodes.get(cur);

                    if let Some(right) = node.right() {
                        // If the right subtree is not empty, go there.
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    } else if let Some(parent) = node.parent() {
                        // Otherwise, ascend one level.
                        self.front_from = if self.nodes.get(parent).left() == Some(cur) {
                            CameFrom::LeftChild
                        } else {
                            CameFrom::RightChild
                        };
                        cur = parent;
                    } else {
                        unreachable!("iterator outlived the last element")
                    }
                }

                CameFrom::RightChild => {
                    // Ascend until we find the successor element.
                    while let Some(parent) = self.nodes.get(cur).parent() {
                        let from_left = self.nodes.get(parent).left() == Some(cur);
                        cur = parent;

                        if from_left {
                            break;
                        }
                    }

                    self.front_from = CameFrom::LeftChild;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
