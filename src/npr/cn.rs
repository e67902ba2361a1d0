//! Uniform hierarchical block-minima index.
//!
//! Level 0 summarizes the LCP in blocks of `block_size` entries; every
//! further level summarizes the previous one the same way until a level
//! fits in a single block. Each level keeps the minimum of every block and
//! the local offset of its leftmost occurrence, so a query touches at most
//! two partial blocks per level plus the stored summaries in between.

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::int_vec::{bits_for, read_u64, write_u64, IntVector};
use crate::lcp::LcpArray;
use crate::npr::{check_block_size, NprBuildError, NprSupport};

/// Block-minima NPR with a uniform block size on every level.
#[derive(Debug, Clone)]
pub struct NprCn<L> {
    lcp: Arc<L>,
    block_size: usize,
    /// `min_array[level][k]`: minimum LCP value covered by block `k`.
    min_array: Vec<IntVector>,
    /// `pos_array[level][k]`: local offset of the leftmost minimum.
    pos_array: Vec<IntVector>,
}

impl<L: LcpArray> NprCn<L> {
    /// Build the index over `lcp` with the given block size.
    pub fn new(lcp: Arc<L>, block_size: usize) -> Result<Self, NprBuildError> {
        check_block_size(block_size)?;
        let n = lcp.len();
        let mut npr = Self {
            lcp,
            block_size,
            min_array: Vec::new(),
            pos_array: Vec::new(),
        };
        if n == 0 {
            return Ok(npr);
        }

        let bits_min = bits_for(n as u64);
        let bits_pos = bits_for(block_size as u64);

        // level 0 over the LCP itself
        let mut level_len = (n + block_size - 1) / block_size;
        let mut mins = IntVector::with_len(level_len, bits_min);
        let mut poss = IntVector::with_len(level_len, bits_pos);
        for k in 0..level_len {
            let start = k * block_size;
            let end = (start + block_size).min(n);
            let (mut min, mut pos) = (n, 0);
            for j in start..end {
                let v = npr.lcp.get(j);
                if v < min {
                    min = v;
                    pos = j - start;
                }
            }
            mins.set(k, min as u64);
            poss.set(k, pos as u64);
        }
        npr.min_array.push(mins);
        npr.pos_array.push(poss);

        // summarize until one block suffices
        while level_len > 1 {
            let prev = npr.min_array.len() - 1;
            let next_len = (level_len + block_size - 1) / block_size;
            let mut mins = IntVector::with_len(next_len, bits_min);
            let mut poss = IntVector::with_len(next_len, bits_pos);
            for k in 0..next_len {
                let start = k * block_size;
                let end = (start + block_size).min(level_len);
                let (mut min, mut pos) = (n, 0);
                for j in start..end {
                    let v = npr.min_array[prev].get(j) as usize;
                    if v < min {
                        min = v;
                        pos = j - start;
                    }
                }
                mins.set(k, min as u64);
                poss.set(k, pos as u64);
            }
            npr.min_array.push(mins);
            npr.pos_array.push(poss);
            level_len = next_len;
        }
        Ok(npr)
    }

    /// Configured block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of summary levels.
    pub fn levels(&self) -> usize {
        self.min_array.len()
    }

    /// Write `u64 levels` followed by the min and pos vectors of every
    /// level. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut written = 8usize;
        write_u64(out, self.min_array.len() as u64)?;
        for level in 0..self.min_array.len() {
            written += self.min_array[level].serialize(out)?;
            written += self.pos_array[level].serialize(out)?;
        }
        Ok(written)
    }

    /// Load an index previously written by [`NprCn::serialize`], rebinding
    /// it to the already-loaded LCP.
    pub fn load<R: Read>(
        input: &mut R,
        lcp: Arc<L>,
        block_size: usize,
    ) -> io::Result<Self> {
        check_block_size(block_size)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let levels = read_u64(input)? as usize;
        let mut min_array = Vec::with_capacity(levels);
        let mut pos_array = Vec::with_capacity(levels);
        for _ in 0..levels {
            min_array.push(IntVector::load(input)?);
            pos_array.push(IntVector::load(input)?);
        }
        Ok(Self {
            lcp,
            block_size,
            min_array,
            pos_array,
        })
    }

    #[inline]
    fn lcp_at(&self, i: usize) -> usize {
        self.lcp.get(i)
    }

    #[inline]
    fn level_min(&self, level: usize, idx: usize) -> usize {
        self.min_array[level].get(idx) as usize
    }

    #[inline]
    fn level_pos(&self, level: usize, idx: usize) -> usize {
        self.pos_array[level].get(idx) as usize
    }

    /// First block of `min_array[level]` at or after `b` containing a value
    /// smaller than `d`. Returns `(block, value)`, with `block` equal to the
    /// level length when there is none.
    fn find_nsv_block(&self, d: usize, b: usize, level: usize) -> (usize, usize) {
        let len = self.min_array[level].len();
        let not_found = (len, self.lcp.len());
        if b >= len {
            return not_found;
        }
        let bs = self.block_size;
        let parent = level + 1;
        if parent >= self.min_array.len() {
            // topmost level: nothing summarizes it, scan directly
            for j in b..len {
                let v = self.level_min(level, j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / bs;
        let mut until = 0;
        if self.level_min(parent, block) < d {
            until = (bs * (block + 1)).min(len);
            for j in b..until {
                let v = self.level_min(level, j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if until == len {
            return not_found;
        }
        let (pblk, value) = self.find_nsv_block(d, block + 1, parent);
        if pblk == self.min_array[parent].len() {
            return not_found;
        }
        let target = pblk * bs + self.level_pos(parent, pblk);
        if value + 1 == d {
            // the minimum is the only possible value below d, and the stored
            // position is its leftmost occurrence
            return (target, value);
        }
        for j in (pblk * bs)..target {
            let v = self.level_min(level, j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    /// Last block of `min_array[level]` at or before `b` containing a value
    /// smaller than `d`.
    fn find_psv_block(&self, d: usize, b: usize, level: usize) -> (usize, usize) {
        let len = self.min_array[level].len();
        let not_found = (len, self.lcp.len());
        if b >= len {
            return not_found;
        }
        let bs = self.block_size;
        let parent = level + 1;
        if parent >= self.min_array.len() {
            for j in (0..=b).rev() {
                let v = self.level_min(level, j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / bs;
        if self.level_min(parent, block) < d {
            let until = bs * block;
            for j in (until..=b).rev() {
                let v = self.level_min(level, j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if block == 0 {
            return not_found;
        }
        let (pblk, value) = self.find_psv_block(d, block - 1, parent);
        if pblk == self.min_array[parent].len() {
            return not_found;
        }
        let target = pblk * bs + self.level_pos(parent, pblk);
        for j in ((target + 1)..(pblk + 1) * bs).rev() {
            let v = self.level_min(level, j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    /// Leftmost minimum among the blocks `i..=j` of `min_array[level]`.
    fn find_rmq_block(&self, i: usize, j: usize, level: usize) -> (usize, usize) {
        let n = self.lcp.len();
        let bs = self.block_size;
        let parent = level + 1;
        if parent >= self.min_array.len() {
            let (mut min, mut pos) = (n, i);
            for r in i..=j {
                let v = self.level_min(level, r);
                if v < min {
                    min = v;
                    pos = r;
                    if min == 0 {
                        break;
                    }
                }
            }
            return (pos, min);
        }

        let l_block = i / bs;
        let r_block = j / bs;
        let (mut min, mut pos) = (n, i);

        // left partial block
        let until = ((l_block + 1) * bs - 1).min(j);
        let min_bpos = l_block * bs + self.level_pos(parent, l_block);
        if min_bpos >= i && min_bpos <= until {
            min = self.level_min(parent, l_block);
            pos = min_bpos;
        } else {
            for r in i..=until {
                let v = self.level_min(level, r);
                if v < min {
                    min = v;
                    pos = r;
                    if min == 0 {
                        break;
                    }
                }
            }
        }
        if until == j || min == 0 {
            return (pos, min);
        }

        // whole blocks in between
        let l_block = l_block + 1;
        if l_block < r_block {
            let (blk, aux) = self.find_rmq_block(l_block, r_block - 1, parent);
            if aux < min {
                min = aux;
                pos = blk * bs + self.level_pos(parent, blk);
                if min == 0 {
                    return (pos, min);
                }
            }
        }

        // right partial block
        let min_bpos = r_block * bs + self.level_pos(parent, r_block);
        if self.level_min(parent, r_block) < min {
            if min_bpos <= j {
                return (min_bpos, self.level_min(parent, r_block));
            }
            for r in (r_block * bs)..=j {
                let v = self.level_min(level, r);
                if v < min {
                    min = v;
                    pos = r;
                    if min == 0 {
                        break;
                    }
                }
            }
        }
        (pos, min)
    }
}

impl<L: LcpArray> NprSupport for NprCn<L> {
    fn len(&self) -> usize {
        self.lcp.len()
    }

    fn fwd_nsv(&self, i: usize, d: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if d == 0 || i >= n {
            return (n, n);
        }
        let bs = self.block_size;
        let block = i / bs;
        let mut until = 0;
        if self.level_min(0, block) < d {
            until = (bs * (block + 1)).min(n);
            for j in i..until {
                let v = self.lcp_at(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if until == n {
            return (n, n);
        }
        let (blk, value) = self.find_nsv_block(d, block + 1, 0);
        if blk == self.min_array[0].len() {
            return (n, n);
        }
        let target = blk * bs + self.level_pos(0, blk);
        if value + 1 == d {
            return (target, value);
        }
        for j in (blk * bs)..target {
            let v = self.lcp_at(j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    fn bwd_psv(&self, i: usize, d: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if d == 0 || i >= n {
            return (n, n);
        }
        let bs = self.block_size;
        let block = i / bs;
        if self.level_min(0, block) < d {
            let until = bs * block;
            for j in (until..=i).rev() {
                let v = self.lcp_at(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if block == 0 {
            return (n, n);
        }
        let (blk, value) = self.find_psv_block(d, block - 1, 0);
        if blk == self.min_array[0].len() {
            return (n, n);
        }
        let target = blk * bs + self.level_pos(0, blk);
        for j in ((target + 1)..(blk + 1) * bs).rev() {
            let v = self.lcp_at(j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    fn rmq(&self, i: usize, j: usize) -> (usize, usize) {
        let n = self.lcp.len();
        debug_assert!(i <= j && j < n, "rmq range [{i}, {j}] out of bounds");
        let bs = self.block_size;
        let l_block = i / bs;
        let r_block = j / bs;
        let (mut min, mut pos) = (n, i);

        // left partial block
        let until = ((l_block + 1) * bs - 1).min(j);
        let min_bpos = l_block * bs + self.level_pos(0, l_block);
        if min_bpos >= i && min_bpos <= until {
            min = self.level_min(0, l_block);
            pos = min_bpos;
        } else {
            for r in i..=until {
                let v = self.lcp_at(r);
                if v < min {
                    min = v;
                    pos = r;
                    if min == 0 {
                        break;
                    }
                }
            }
        }
        if until == j || min == 0 {
            return (pos, min);
        }

        // whole blocks in between
        let l_block = l_block + 1;
        if l_block < r_block {
            let (blk, aux) = self.find_rmq_block(l_block, r_block - 1, 0);
            if aux < min {
                min = aux;
                pos = blk * bs + self.level_pos(0, blk);
                if min == 0 {
                    return (pos, min);
                }
            }
        }

        // right partial block
        let min_bpos = r_block * bs + self.level_pos(0, r_block);
        if self.level_min(0, r_block) < min {
            if min_bpos <= j {
                return (min_bpos, self.level_min(0, r_block));
            }
            for r in (r_block * bs)..=j {
                let v = self.lcp_at(r);
                if v < min {
                    min = v;
                    pos = r;
                    if min == 0 {
                        break;
                    }
                }
            }
        }
        (pos, min)
    }

    fn nsv(&self, i: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if i >= n {
            return (n, n);
        }
        self.fwd_nsv(i + 1, self.lcp_at(i))
    }

    fn psv(&self, i: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if i == 0 || i >= n {
            return (n, n);
        }
        self.bwd_psv(i - 1, self.lcp_at(i))
    }
}
