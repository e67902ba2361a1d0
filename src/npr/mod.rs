//! NSV/PSV/RMQ support over a read-only LCP array.
//!
//! Both implementations index the LCP with a hierarchy of block minima:
//! [`NprCn`] stores a minimum value and its local position for every block
//! of every level, while [`NprCnr`] saves space at the bottom by storing
//! only the *position* of each small block's minimum and reading the value
//! from the LCP on demand.
//!
//! All queries answer with a `(position, value)` pair and are total: a
//! position equal to the LCP length is the not-found sentinel (the value is
//! then the LCP length as well). Ties always break toward the smaller
//! position.

mod cn;
mod cnr;

pub use cn::NprCn;
pub use cnr::NprCnr;

use thiserror::Error;

/// Block sizes accepted for the upper levels of either variant.
pub const BLOCK_SIZES: [usize; 3] = [8, 16, 32];
/// Small block sizes accepted for the bottom level of the two-tier variant.
pub const SMALL_BLOCK_SIZES: [usize; 2] = [4, 8];

/// Error type returned when constructing an NPR index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NprBuildError {
    /// Block size outside the supported set.
    #[error("block size {0} not supported (expected one of 8, 16, 32)")]
    InvalidBlockSize(usize),

    /// Small block size outside the supported set.
    #[error("small block size {0} not supported (expected 4 or 8)")]
    InvalidSmallBlockSize(usize),
}

pub(crate) fn check_block_size(block_size: usize) -> Result<(), NprBuildError> {
    if BLOCK_SIZES.contains(&block_size) {
        Ok(())
    } else {
        Err(NprBuildError::InvalidBlockSize(block_size))
    }
}

pub(crate) fn check_small_block_size(small_block: usize) -> Result<(), NprBuildError> {
    if SMALL_BLOCK_SIZES.contains(&small_block) {
        Ok(())
    } else {
        Err(NprBuildError::InvalidSmallBlockSize(small_block))
    }
}

/// Next-smaller-value, previous-smaller-value and range-minimum queries
/// over the LCP array backing a suffix tree.
pub trait NprSupport {
    /// Length of the underlying LCP array.
    fn len(&self) -> usize;

    /// Leftmost position `p >= i` with `LCP[p] < d`, together with the value
    /// found. Not found (including `d == 0` or `i >= len`) yields
    /// `(len, len)`.
    fn fwd_nsv(&self, i: usize, d: usize) -> (usize, usize);

    /// Rightmost position `p <= i` with `LCP[p] < d`, together with the
    /// value found. Not found yields `(len, len)`.
    fn bwd_psv(&self, i: usize, d: usize) -> (usize, usize);

    /// Leftmost position of the minimum value in `[i, j]` and that value.
    /// Requires `i <= j < len`.
    fn rmq(&self, i: usize, j: usize) -> (usize, usize);

    /// Position of the next value smaller than `LCP[i]` within `[i+1, len)`.
    fn nsv(&self, i: usize) -> (usize, usize);

    /// Position of the previous value smaller than `LCP[i]` within `[0, i)`.
    fn psv(&self, i: usize) -> (usize, usize);

    /// Returns `true` when the underlying LCP array is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
