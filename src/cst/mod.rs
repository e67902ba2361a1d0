//! Suffix-tree navigation over SA-intervals.
//!
//! Nodes are never materialized: a node is the closed interval `[lb, rb]`
//! of suffix-array ranks sharing its path label, the root is `[0, n-1]` and
//! a leaf is a singleton. Every operation reduces to NSV/PSV/RMQ queries on
//! the LCP array plus CSA lookups, following Canovas and Navarro,
//! "Practical Compressed Suffix Trees" (SEA 2010).

mod iter;

pub use iter::{DfsIter, DfsOrder, DfsVisit};

use std::io::{self, Read, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::csa::{CsaBuildError, CsaIndex, SimpleCsa};
use crate::lcp::{LcpArray, PackedLcp};
use crate::npr::{NprBuildError, NprCn, NprCnr, NprSupport};

/// A suffix tree node: the SA-interval of the suffixes below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    /// Left boundary (rank of the leftmost leaf).
    pub lb: usize,
    /// Right boundary (rank of the rightmost leaf), inclusive.
    pub rb: usize,
}

impl Node {
    /// Create a node from its interval boundaries.
    pub fn new(lb: usize, rb: usize) -> Self {
        debug_assert!(lb <= rb);
        Self { lb, rb }
    }

    /// A node is a leaf exactly when its interval is a singleton.
    pub fn is_leaf(self) -> bool {
        self.lb == self.rb
    }

    /// Number of leaves below this node.
    pub fn size(self) -> usize {
        self.rb - self.lb + 1
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lb, self.rb)
    }
}

/// Error type for suffix tree construction.
#[derive(Debug, Error)]
pub enum CstError {
    /// CSA construction failed.
    #[error(transparent)]
    Csa(#[from] CsaBuildError),

    /// NPR construction failed.
    #[error(transparent)]
    Npr(#[from] NprBuildError),

    /// The three component indexes disagree on the text length.
    #[error("component length mismatch: csa {csa}, lcp {lcp}, npr {npr}")]
    LengthMismatch {
        /// Length reported by the CSA.
        csa: usize,
        /// Length reported by the LCP.
        lcp: usize,
        /// Length reported by the NPR.
        npr: usize,
    },
}

/// Compressed suffix tree assembled from a CSA, an LCP array and an NPR
/// index. The LCP is shared with the NPR through an [`Arc`].
#[derive(Debug)]
pub struct Cst<C, L, N> {
    csa: C,
    lcp: Arc<L>,
    npr: N,
}

/// Suffix tree over the plain reference providers with the uniform NPR.
pub type CstCn = Cst<SimpleCsa, PackedLcp, NprCn<PackedLcp>>;
/// Suffix tree over the plain reference providers with the two-tier NPR.
pub type CstCnr = Cst<SimpleCsa, PackedLcp, NprCnr<PackedLcp>>;

impl<C: CsaIndex, L: LcpArray, N: NprSupport> Cst<C, L, N> {
    /// Assemble a suffix tree from prebuilt components.
    pub fn from_parts(csa: C, lcp: Arc<L>, npr: N) -> Result<Self, CstError> {
        if csa.len() != lcp.len() || lcp.len() != npr.len() {
            return Err(CstError::LengthMismatch {
                csa: csa.len(),
                lcp: lcp.len(),
                npr: npr.len(),
            });
        }
        Ok(Self { csa, lcp, npr })
    }

    /// Number of leaves (the text length).
    pub fn size(&self) -> usize {
        self.csa.len()
    }

    /// The CSA component.
    pub fn csa(&self) -> &C {
        &self.csa
    }

    /// The LCP component.
    pub fn lcp(&self) -> &L {
        &self.lcp
    }

    /// The NPR component.
    pub fn npr(&self) -> &N {
        &self.npr
    }

    /// The root node `[0, n-1]`.
    pub fn root(&self) -> Node {
        Node::new(0, self.csa.len() - 1)
    }

    /// Returns `true` iff `v` is a leaf.
    pub fn is_leaf(&self, v: Node) -> bool {
        v.is_leaf()
    }

    /// The `i`-th leaf in left-to-right order, 1-based.
    ///
    /// # Panics
    /// Panics if `i` is 0 or larger than the number of leaves.
    pub fn select_leaf(&self, i: usize) -> Node {
        assert!(
            i >= 1 && i <= self.csa.len(),
            "leaf index {i} out of range 1..={}",
            self.csa.len()
        );
        Node::new(i - 1, i - 1)
    }

    /// Leftmost leaf below `v`.
    pub fn leftmost_leaf(&self, v: Node) -> Node {
        Node::new(v.lb, v.lb)
    }

    /// Rightmost leaf below `v`.
    pub fn rightmost_leaf(&self, v: Node) -> Node {
        Node::new(v.rb, v.rb)
    }

    /// Text position of the suffix at leaf `v`.
    ///
    /// # Panics
    /// Panics if `v` is not a leaf.
    pub fn sn(&self, v: Node) -> usize {
        assert!(v.is_leaf(), "sn is defined on leaves only");
        self.csa.sa(v.lb)
    }

    /// String depth: length of the path label from the root to `v`.
    pub fn depth(&self, v: Node) -> usize {
        if v.is_leaf() {
            return self.size() - self.csa.sa(v.lb);
        }
        if v == self.root() {
            return 0;
        }
        self.npr.rmq(v.lb + 1, v.rb).1
    }

    /// Number of edges between the root and `v`.
    pub fn node_depth(&self, v: Node) -> usize {
        let root = self.root();
        let mut d = 0;
        let mut v = v;
        while v != root {
            d += 1;
            v = self.parent(v);
        }
        d
    }

    /// Expand the node whose parent is represented by LCP position `pos`.
    fn node_at_lcp(&self, pos: usize) -> Node {
        let n = self.lcp.len();
        let (l, _) = self.npr.psv(pos);
        let (r, _) = self.npr.nsv(pos);
        let lb = if l == n { 0 } else { l };
        Node::new(lb, r - 1)
    }

    /// Parent of `v`; the root is its own parent.
    pub fn parent(&self, v: Node) -> Node {
        let n = self.lcp.len();
        // the boundary with the larger LCP value represents the parent
        let pos = if v.rb == n - 1 || self.lcp.get(v.lb) > self.lcp.get(v.rb + 1) {
            v.lb
        } else {
            v.rb + 1
        };
        self.node_at_lcp(pos)
    }

    /// Next sibling of `v`, or the root when `v` is the last child.
    pub fn sibling(&self, v: Node) -> Node {
        let p = self.parent(v);
        if v.rb >= p.rb {
            return self.root();
        }
        let left = v.rb + 1;
        if left == p.rb {
            // last sibling is a single leaf
            return Node::new(p.rb, p.rb);
        }
        let (pos, _) = self.npr.fwd_nsv(left + 1, self.lcp.get(left) + 1);
        Node::new(left, pos - 1)
    }

    /// The `i`-th child of `v` (1-based), or the root when `v` has fewer
    /// than `i` children.
    pub fn select_child(&self, v: Node, i: usize) -> Node {
        assert!(i >= 1, "children are numbered from 1");
        if v.is_leaf() {
            return self.root();
        }
        let (margin, head) = self.npr.rmq(v.lb + 1, v.rb);
        let mut child = Node::new(v.lb, margin - 1);
        for _ in 1..i {
            if child.rb >= v.rb {
                return self.root();
            }
            let left = child.rb + 1;
            let right = if left == v.rb {
                left
            } else {
                self.npr.fwd_nsv(left + 1, head + 1).0 - 1
            };
            child = Node::new(left, right);
        }
        child
    }

    /// First child of an internal node `v`.
    pub fn first_child(&self, v: Node) -> Node {
        self.select_child(v, 1)
    }

    /// Last child of an internal node `v`.
    pub fn last_child(&self, v: Node) -> Node {
        if v.is_leaf() {
            return self.root();
        }
        let (_, head) = self.npr.rmq(v.lb + 1, v.rb);
        let (lb, _) = self.npr.bwd_psv(v.rb, head + 1);
        Node::new(lb, v.rb)
    }

    /// Iterate over the children of `v`, left to right. Empty for leaves.
    pub fn children(&self, v: Node) -> impl Iterator<Item = Node> + '_ {
        let first = if v.is_leaf() {
            None
        } else {
            Some(self.first_child(v))
        };
        std::iter::successors(first, move |&c| {
            if c.rb >= v.rb {
                None
            } else {
                Some(self.sibling(c))
            }
        })
    }

    /// Number of children of `v`.
    pub fn degree(&self, v: Node) -> usize {
        if v.is_leaf() {
            return 0;
        }
        let (margin, head) = self.npr.rmq(v.lb + 1, v.rb);
        let mut child = Node::new(v.lb, margin - 1);
        let mut count = 1;
        while child.rb < v.rb {
            let left = child.rb + 1;
            let right = if left == v.rb {
                left
            } else {
                self.npr.fwd_nsv(left + 1, head + 1).0 - 1
            };
            child = Node::new(left, right);
            count += 1;
        }
        count
    }

    /// Child of `v` whose edge label starts with `c`, along with the
    /// first-column position probed last. The root signals "no such child".
    pub fn child_with_pos(&self, v: Node, c: u8) -> (Node, usize) {
        if v.is_leaf() {
            return (self.root(), 0);
        }
        let Some(cc) = self.csa.char_to_comp(c) else {
            return (self.root(), 0);
        };
        let lo = self.csa.cum_count(cc);
        let hi = self.csa.cum_count(cc + 1);
        let d = self.depth(v);
        let (margin, head) = self.npr.rmq(v.lb + 1, v.rb);

        // probe the first child
        let mut char_pos = self.csa.char_pos(v.lb, d);
        if char_pos >= hi {
            return (self.root(), char_pos);
        }
        let first = Node::new(v.lb, margin - 1);
        if char_pos >= lo {
            return (first, char_pos);
        }

        // probe the last child
        char_pos = self.csa.char_pos(v.rb, d);
        if char_pos < lo {
            return (self.root(), char_pos);
        }
        let (last_lb, _) = self.npr.bwd_psv(v.rb, head + 1);
        let last = Node::new(last_lb, v.rb);
        if char_pos < hi {
            return (last, char_pos);
        }

        // binary search over the children strictly between first and last
        let stop = last.lb - 1;
        let mut middle = Vec::new();
        let mut child = first;
        while child.rb != stop {
            let left = child.rb + 1;
            let right = if left == stop {
                stop
            } else {
                self.npr.fwd_nsv(left + 1, head + 1).0 - 1
            };
            child = Node::new(left, right);
            middle.push(child);
        }
        let (mut lo_idx, mut hi_idx) = (0usize, middle.len());
        while lo_idx < hi_idx {
            let mid = (lo_idx + hi_idx) >> 1;
            char_pos = self.csa.char_pos(middle[mid].lb, d);
            if lo > char_pos {
                lo_idx = mid + 1;
            } else if hi <= char_pos {
                hi_idx = mid;
            } else {
                return (middle[mid], char_pos);
            }
        }
        (self.root(), char_pos)
    }

    /// Child of `v` whose edge label starts with `c`, or the root when
    /// there is none.
    pub fn child(&self, v: Node, c: u8) -> Node {
        self.child_with_pos(v, c).0
    }

    /// The `d`-th character (1-based) of the path label leading to `v`.
    ///
    /// Requires `1 <= d <= depth(v)`.
    pub fn edge(&self, v: Node, d: usize) -> u8 {
        debug_assert!(d >= 1 && d <= self.depth(v));
        let char_pos = self.csa.char_pos(v.lb, d - 1);
        self.csa.f_char(char_pos)
    }

    /// Returns `true` iff `v` is an ancestor of `w` (nodes are their own
    /// ancestors).
    pub fn ancestor(&self, v: Node, w: Node) -> bool {
        v.lb <= w.lb && w.rb <= v.rb
    }

    /// Lowest common ancestor of `v` and `w`.
    pub fn lca(&self, v: Node, w: Node) -> Node {
        if self.ancestor(v, w) {
            return v;
        }
        if self.ancestor(w, v) {
            return w;
        }
        let (pos, _) = if v.rb < w.lb {
            self.npr.rmq(v.rb + 1, w.lb)
        } else {
            self.npr.rmq(w.rb + 1, v.lb)
        };
        self.node_at_lcp(pos)
    }

    /// Suffix link: the node whose path label is `v`'s without its first
    /// character.
    pub fn sl(&self, v: Node) -> Node {
        if v == self.root() {
            return self.root();
        }
        if v.is_leaf() {
            let x = self.csa.psi(v.lb);
            return Node::new(x, x);
        }
        let x = self.csa.psi(v.lb);
        let y = self.csa.psi(v.rb);
        let (pos, _) = if x < y {
            self.npr.rmq(x + 1, y)
        } else {
            self.npr.rmq(y + 1, x)
        };
        self.node_at_lcp(pos)
    }

    /// Weiner link: the node reached by prepending `c` to `v`'s path label,
    /// or the root when no suffix continues that way.
    pub fn wl(&self, v: Node, c: u8) -> Node {
        match self.csa.backward_search(v.lb, v.rb, c) {
            Some((lb, rb)) => Node::new(lb, rb),
            None => self.root(),
        }
    }

    /// Shallowest ancestor of `v` whose string depth still exceeds `d`,
    /// i.e. the child of the string-depth level ancestor along the path to
    /// `v` (`v` itself when `parent(v)` is already shallow enough). This is
    /// the PSV/NSV interval expansion; both level-ancestor queries build on
    /// it.
    fn shallowest_above(&self, v: Node, d: usize) -> Node {
        if self.depth(v) <= d {
            return v;
        }
        let n = self.lcp.len();
        let (l, _) = self.npr.bwd_psv(v.lb, d + 1);
        let lb = if l == n { 0 } else { l };
        let (r, _) = self.npr.fwd_nsv(v.rb + 1, d + 1);
        Node::new(lb, r - 1)
    }

    /// Level ancestor by string depth: the lowest ancestor `w` of `v` with
    /// `depth(w) <= d` (`v` itself when `depth(v) <= d`).
    pub fn laqs(&self, v: Node, d: usize) -> Node {
        if d == 0 {
            return self.root();
        }
        if self.depth(v) <= d {
            return v;
        }
        self.parent(self.shallowest_above(v, d))
    }

    /// Level ancestor by node depth: the lowest ancestor `w` of `v` with
    /// `node_depth(w) <= d`.
    ///
    /// String depth bounds node depth from above, so the string-depth
    /// expansion is used as a probe: each round jumps down to the ancestor
    /// just below `depth(res) + diff` characters, which can overshoot the
    /// node-depth budget by at most one level per round.
    pub fn laqt(&self, v: Node, d: usize) -> Node {
        if d == 0 {
            return self.root();
        }
        let mut res = self.shallowest_above(v, d);
        let mut node_d = self.node_depth(res);
        while node_d > d {
            res = self.parent(res);
            node_d -= 1;
        }
        loop {
            let diff = d - node_d;
            if diff == 0 || res == v {
                break;
            }
            let guess = self.depth(res) + diff;
            let cand = self.shallowest_above(v, guess);
            let mut steps = 0;
            let mut w = cand;
            while w != res {
                w = self.parent(w);
                steps += 1;
            }
            if steps == 0 {
                break;
            }
            let mut cand = cand;
            let mut cand_depth = node_d + steps;
            while cand_depth > d {
                cand = self.parent(cand);
                cand_depth -= 1;
            }
            if cand == res {
                break;
            }
            res = cand;
            node_d = cand_depth;
        }
        res
    }

    /// Unique identifier in which leaves map to their rank and internal
    /// nodes encode one of their boundary LCP positions plus a
    /// disambiguation bit.
    pub fn id(&self, v: Node) -> usize {
        let n = self.lcp.len();
        if v.is_leaf() {
            return v.lb;
        }
        if v == self.root() {
            return n + (n - 1);
        }
        let (p, tag) = if v.rb != n - 1 && self.lcp.get(v.lb) < self.lcp.get(v.rb + 1) {
            (v.rb, 1)
        } else {
            (v.lb, 0)
        };
        n + (((n + p) << 1) | tag)
    }

    /// Inverse of [`Cst::id`].
    pub fn inv_id(&self, id: usize) -> Node {
        let n = self.lcp.len();
        if id < n {
            return Node::new(id, id);
        }
        let x = id - n;
        if x == n - 1 {
            return self.root();
        }
        let tag = x & 1;
        let p = (x >> 1) - n;
        if tag == 1 {
            let rb = p;
            let (l, _) = self.npr.bwd_psv(rb, self.lcp.get(rb + 1) + 1);
            let lb = if l == n { 0 } else { l };
            Node::new(lb, rb)
        } else {
            let lb = p;
            let (r, _) = self.npr.fwd_nsv(lb + 1, self.lcp.get(lb) + 1);
            Node::new(lb, r - 1)
        }
    }

    /// Depth-first traversal of the whole tree. Internal nodes are yielded
    /// on entry and on exit, leaves once.
    pub fn dfs(&self) -> DfsIter<'_, C, L, N> {
        DfsIter::new(self, self.root())
    }

    /// Depth-first traversal of the subtree rooted at `v`.
    pub fn dfs_from(&self, v: Node) -> DfsIter<'_, C, L, N> {
        DfsIter::new(self, v)
    }
}

impl CstCn {
    /// Build the suffix tree for `text` with the uniform NPR variant.
    pub fn build(text: &[u8], block_size: usize) -> Result<Self, CstError> {
        let csa = SimpleCsa::from_text(text)?;
        let sa = csa.sa_values();
        let lcp = Arc::new(PackedLcp::from_text_and_sa(text, &sa));
        let npr = NprCn::new(Arc::clone(&lcp), block_size)?;
        Cst::from_parts(csa, lcp, npr)
    }

    /// Serialize as CSA, LCP, NPR, in that order. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut written = self.csa.serialize(out)?;
        written += self.lcp.serialize(out)?;
        written += self.npr.serialize(out)?;
        Ok(written)
    }

    /// Load a tree written by [`CstCn::serialize`]. The block size is not
    /// stored in the file and must match the one used at build time.
    pub fn load<R: Read>(input: &mut R, block_size: usize) -> io::Result<Self> {
        let csa = SimpleCsa::load(input)?;
        let lcp = Arc::new(PackedLcp::load(input)?);
        let npr = NprCn::load(input, Arc::clone(&lcp), block_size)?;
        Cst::from_parts(csa, lcp, npr)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl CstCnr {
    /// Build the suffix tree for `text` with the two-tier NPR variant.
    pub fn build(
        text: &[u8],
        block_size: usize,
        small_block: usize,
    ) -> Result<Self, CstError> {
        let csa = SimpleCsa::from_text(text)?;
        let sa = csa.sa_values();
        let lcp = Arc::new(PackedLcp::from_text_and_sa(text, &sa));
        let npr = NprCnr::new(Arc::clone(&lcp), block_size, small_block)?;
        Cst::from_parts(csa, lcp, npr)
    }

    /// Serialize as CSA, LCP, NPR, in that order. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut written = self.csa.serialize(out)?;
        written += self.lcp.serialize(out)?;
        written += self.npr.serialize(out)?;
        Ok(written)
    }

    /// Load a tree written by [`CstCnr::serialize`]. Block sizes must match
    /// the ones used at build time.
    pub fn load<R: Read>(
        input: &mut R,
        block_size: usize,
        small_block: usize,
    ) -> io::Result<Self> {
        let csa = SimpleCsa::load(input)?;
        let lcp = Arc::new(PackedLcp::load(input)?);
        let npr = NprCnr::load(input, Arc::clone(&lcp), block_size, small_block)?;
        Cst::from_parts(csa, lcp, npr)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
