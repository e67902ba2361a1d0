//! # Compressed Suffix Tree with NPR navigation
//!
//! This library implements the Canovas-Navarro compressed suffix tree: the
//! tree is never materialized, and every navigation operation is answered
//! from three indexes built over the text.
//!
//! ## Components
//!
//! 1. **CSA**: suffix array access, Psi, first column and backward search
//! 2. **LCP**: the longest-common-prefix array, random access only
//! 3. **NPR**: next-smaller-value, previous-smaller-value and
//!    range-minimum queries over the LCP, answered through a hierarchy of
//!    block minima
//!
//! Nodes are SA-intervals `[lb, rb]`; parent, children, LCA, suffix links
//! and the rest of the classical suffix-tree interface reduce to NSV/PSV/
//! RMQ on the LCP plus CSA lookups.
//!
//! ## Usage Example
//!
//! ```
//! use cstds::CstCn;
//!
//! let cst = CstCn::build(b"banana$", 32).unwrap();
//! let root = cst.root();
//! let a = cst.child(root, b'a');
//! assert_eq!(cst.depth(a), 1);
//! assert_eq!((a.lb, a.rb), (1, 3));
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod csa;
pub mod cst;
pub mod int_vec;
pub mod lcp;
pub mod npr;

// Re-exports for convenience
pub use csa::{CsaBuildError, CsaIndex, SimpleCsa};
pub use cst::{Cst, CstCn, CstCnr, CstError, DfsIter, DfsOrder, DfsVisit, Node};
pub use int_vec::IntVector;
pub use lcp::{LcpArray, PackedLcp};
pub use npr::{NprBuildError, NprCn, NprCnr, NprSupport};
