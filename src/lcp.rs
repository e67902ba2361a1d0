//! The longest-common-prefix array and its provider contract.
//!
//! `LCP[i]` is the length of the longest common prefix of the suffixes at
//! suffix-array ranks `i-1` and `i`; `LCP[0] == 0` by convention. The rest
//! of the crate only ever needs random access and a length, so the contract
//! is deliberately small and any compressed representation can slot in.

use std::io::{self, Read, Write};

use crate::int_vec::{bits_for, IntVector};

/// Random-access read-only view of an LCP array.
pub trait LcpArray {
    /// Number of entries (equals the text length).
    fn len(&self) -> usize;

    /// Read `LCP[idx]`.
    fn get(&self, idx: usize) -> usize;

    /// Returns `true` when the array is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LcpArray for Vec<usize> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, idx: usize) -> usize {
        self[idx]
    }
}

/// LCP array packed into a fixed-width [`IntVector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLcp {
    data: IntVector,
}

impl PackedLcp {
    /// Build the LCP array for `text` under the suffix array `sa` using
    /// Kasai's algorithm.
    ///
    /// # Panics
    /// Panics if `sa` is not a permutation of `0..text.len()` of the right
    /// length.
    pub fn from_text_and_sa(text: &[u8], sa: &[usize]) -> Self {
        let n = text.len();
        assert_eq!(sa.len(), n, "suffix array length must match the text");
        let mut rank = vec![0usize; n];
        for (i, &s) in sa.iter().enumerate() {
            rank[s] = i;
        }
        let mut data = IntVector::with_len(n, bits_for(n as u64));
        let mut h = 0usize;
        for i in 0..n {
            if rank[i] == 0 {
                h = 0;
                continue;
            }
            let j = sa[rank[i] - 1];
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            data.set(rank[i], h as u64);
            h = h.saturating_sub(1);
        }
        Self { data }
    }

    /// Pack an already-computed LCP array (used by tests and benches).
    pub fn from_values(values: &[usize]) -> Self {
        let width = bits_for(values.len() as u64);
        let mut data = IntVector::with_len(values.len(), width);
        for (i, &v) in values.iter().enumerate() {
            data.set(i, v as u64);
        }
        Self { data }
    }

    /// Serialize as a single [`IntVector`]. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        self.data.serialize(out)
    }

    /// Load an array previously written by [`PackedLcp::serialize`].
    pub fn load<R: Read>(input: &mut R) -> io::Result<Self> {
        Ok(Self {
            data: IntVector::load(input)?,
        })
    }
}

impl LcpArray for PackedLcp {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn get(&self, idx: usize) -> usize {
        self.data.get(idx) as usize
    }
}
