//! Depth-first traversal of the implicit suffix tree.
//!
//! The tree is never materialized, so the iterator is a small state machine
//! over first-child / sibling / parent moves. Internal nodes are yielded
//! twice, once on the way down and once on the way up; leaves are yielded a
//! single time.

use crate::csa::CsaIndex;
use crate::lcp::LcpArray;
use crate::npr::NprSupport;

use super::{Cst, Node};

/// Whether a node is being entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsOrder {
    /// First visit, before any descendant.
    Pre,
    /// Second visit of an internal node, after all descendants.
    Post,
}

/// One step of a depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsVisit {
    /// The node being visited.
    pub node: Node,
    /// Entering or leaving.
    pub order: DfsOrder,
}

/// Pull-style DFS iterator over a subtree.
#[derive(Debug)]
pub struct DfsIter<'a, C, L, N> {
    cst: &'a Cst<C, L, N>,
    top: Node,
    next: Option<DfsVisit>,
}

impl<'a, C: CsaIndex, L: LcpArray, N: NprSupport> DfsIter<'a, C, L, N> {
    pub(super) fn new(cst: &'a Cst<C, L, N>, top: Node) -> Self {
        Self {
            cst,
            top,
            next: Some(DfsVisit {
                node: top,
                order: DfsOrder::Pre,
            }),
        }
    }

    /// Successor of a fully visited node: its next sibling, or the parent's
    /// exit visit.
    fn after(&self, node: Node) -> Option<DfsVisit> {
        if node == self.top {
            return None;
        }
        let sibling = self.cst.sibling(node);
        if sibling != self.cst.root() {
            return Some(DfsVisit {
                node: sibling,
                order: DfsOrder::Pre,
            });
        }
        Some(DfsVisit {
            node: self.cst.parent(node),
            order: DfsOrder::Post,
        })
    }
}

impl<'a, C: CsaIndex, L: LcpArray, N: NprSupport> Iterator for DfsIter<'a, C, L, N> {
    type Item = DfsVisit;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.order {
            DfsOrder::Pre if !current.node.is_leaf() => Some(DfsVisit {
                node: self.cst.first_child(current.node),
                order: DfsOrder::Pre,
            }),
            _ => self.after(current.node),
        };
        Some(current)
    }
}
