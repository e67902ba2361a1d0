//! Two-tier hierarchical block-minima index.
//!
//! The bottom level partitions the LCP into *small* blocks and stores only
//! the local position of each block's minimum; the value is read from the
//! LCP when needed. Level 1 summarizes those minima with the small block
//! size and stores values as well; every level above uses the regular block
//! size. Compared to [`NprCn`](crate::npr::NprCn) this trades one extra LCP
//! access per bottom-level probe for not storing any leaf minima.

use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::int_vec::{bits_for, read_u64, write_u64, IntVector};
use crate::lcp::LcpArray;
use crate::npr::{check_block_size, check_small_block_size, NprBuildError, NprSupport};

/// Block-minima NPR storing only positions at the bottom level.
#[derive(Debug, Clone)]
pub struct NprCnr<L> {
    lcp: Arc<L>,
    block_size: usize,
    small_block: usize,
    /// `min_array[k]` holds the minima of level `k + 1`; the bottom level
    /// has no stored minima.
    min_array: Vec<IntVector>,
    /// `pos_array[k]`: local offset of the leftmost minimum per block of
    /// level `k`.
    pos_array: Vec<IntVector>,
}

impl<L: LcpArray> NprCnr<L> {
    /// Build the index over `lcp` with the given block sizes.
    pub fn new(
        lcp: Arc<L>,
        block_size: usize,
        small_block: usize,
    ) -> Result<Self, NprBuildError> {
        check_block_size(block_size)?;
        check_small_block_size(small_block)?;
        let n = lcp.len();
        let mut npr = Self {
            lcp,
            block_size,
            small_block,
            min_array: Vec::new(),
            pos_array: Vec::new(),
        };
        if n == 0 {
            return Ok(npr);
        }

        let bits_min = bits_for(n as u64);
        let sbs = small_block;

        // bottom level: positions only
        let len0 = (n + sbs - 1) / sbs;
        let mut poss = IntVector::with_len(len0, bits_for(sbs as u64));
        for k in 0..len0 {
            let start = k * sbs;
            let end = (start + sbs).min(n);
            let (mut min, mut pos) = (n, 0);
            for j in start..end {
                let v = npr.lcp.get(j);
                if v < min {
                    min = v;
                    pos = j - start;
                }
            }
            poss.set(k, pos as u64);
        }
        npr.pos_array.push(poss);
        if len0 <= 1 {
            return Ok(npr);
        }

        // level 1 summarizes the bottom minima, still with the small block
        let len1 = (len0 + sbs - 1) / sbs;
        let mut mins = IntVector::with_len(len1, bits_min);
        let mut poss = IntVector::with_len(len1, bits_for(sbs as u64));
        for k in 0..len1 {
            let start = k * sbs;
            let end = (start + sbs).min(len0);
            let (mut min, mut pos) = (n, 0);
            for j in start..end {
                let v = npr.bottom_value(j);
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

        // regular blocks from level 2 upward
        let bs = block_size;
        let mut level_len = len1;
        while level_len > 1 {
            let prev = npr.min_array.len() - 1;
            let next_len = (level_len + bs - 1) / bs;
            let mut mins = IntVector::with_len(next_len, bits_min);
            let mut poss = IntVector::with_len(next_len, bits_for(bs as u64));
            for k in 0..next_len {
                let start = k * bs;
                let end = (start + bs).min(level_len);
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

    /// Configured block size of the upper levels.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Configured small block size of the two bottom levels.
    pub fn small_block(&self) -> usize {
        self.small_block
    }

    /// Number of levels (bottom positions plus stored summaries).
    pub fn levels(&self) -> usize {
        self.pos_array.len()
    }

    /// Write `u64 levels`, then the bottom position vector followed by the
    /// min/pos pairs of the upper levels. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let levels = self.pos_array.len();
        let mut written = 8usize;
        write_u64(out, levels as u64)?;
        if levels > 0 {
            written += self.pos_array[0].serialize(out)?;
            for level in 1..levels {
                written += self.min_array[level - 1].serialize(out)?;
                written += self.pos_array[level].serialize(out)?;
            }
        }
        Ok(written)
    }

    /// Load an index previously written by [`NprCnr::serialize`], rebinding
    /// it to the already-loaded LCP.
    pub fn load<R: Read>(
        input: &mut R,
        lcp: Arc<L>,
        block_size: usize,
        small_block: usize,
    ) -> io::Result<Self> {
        check_block_size(block_size)
            .and_then(|_| check_small_block_size(small_block))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let levels = read_u64(input)? as usize;
        let mut min_array = Vec::new();
        let mut pos_array = Vec::new();
        if levels > 0 {
            pos_array.push(IntVector::load(input)?);
            for _ in 1..levels {
                min_array.push(IntVector::load(input)?);
                pos_array.push(IntVector::load(input)?);
            }
        }
        Ok(Self {
            lcp,
            block_size,
            small_block,
            min_array,
            pos_array,
        })
    }

    /// Minimum of small block `k`, read from the LCP through the stored
    /// position.
    #[inline]
    fn bottom_value(&self, k: usize) -> usize {
        let pos = self.pos_array[0].get(k) as usize;
        self.lcp.get(k * self.small_block + pos)
    }

    #[inline]
    fn upper_value(&self, level: usize, idx: usize) -> usize {
        self.min_array[level - 1].get(idx) as usize
    }

    #[inline]
    fn level_pos(&self, level: usize, idx: usize) -> usize {
        self.pos_array[level].get(idx) as usize
    }

    /// First bottom-level entry at or after `b` whose minimum is smaller
    /// than `d`. Returns `(entry, value)`; `entry` equals the bottom length
    /// when there is none.
    fn find_nsv_bottom(&self, d: usize, b: usize) -> (usize, usize) {
        let len0 = self.pos_array[0].len();
        let not_found = (len0, self.lcp.len());
        if b >= len0 {
            return not_found;
        }
        let sbs = self.small_block;
        if self.min_array.is_empty() {
            for j in b..len0 {
                let v = self.bottom_value(j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / sbs;
        let mut until = 0;
        if self.upper_value(1, block) < d {
            until = (sbs * (block + 1)).min(len0);
            for j in b..until {
                let v = self.bottom_value(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if until == len0 {
            return not_found;
        }
        let (blk, value) = self.find_nsv_upper(d, block + 1, 1);
        if blk == self.pos_array[1].len() {
            return not_found;
        }
        let target = blk * sbs + self.level_pos(1, blk);
        if value + 1 == d {
            return (target, value);
        }
        for j in (blk * sbs)..target {
            let v = self.bottom_value(j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    /// Same search over the stored levels (`level >= 1`).
    fn find_nsv_upper(&self, d: usize, b: usize, level: usize) -> (usize, usize) {
        let len = self.pos_array[level].len();
        let not_found = (len, self.lcp.len());
        if b >= len {
            return not_found;
        }
        let bs = self.block_size;
        if level >= self.min_array.len() {
            for j in b..len {
                let v = self.upper_value(level, j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / bs;
        let mut until = 0;
        if self.upper_value(level + 1, block) < d {
            until = (bs * (block + 1)).min(len);
            for j in b..until {
                let v = self.upper_value(level, j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if until == len {
            return not_found;
        }
        let (blk, value) = self.find_nsv_upper(d, block + 1, level + 1);
        if blk == self.pos_array[level + 1].len() {
            return not_found;
        }
        let target = blk * bs + self.level_pos(level + 1, blk);
        if value + 1 == d {
            return (target, value);
        }
        for j in (blk * bs)..target {
            let v = self.upper_value(level, j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    /// Last bottom-level entry at or before `b` whose minimum is smaller
    /// than `d`.
    fn find_psv_bottom(&self, d: usize, b: usize) -> (usize, usize) {
        let len0 = self.pos_array[0].len();
        let not_found = (len0, self.lcp.len());
        if b >= len0 {
            return not_found;
        }
        let sbs = self.small_block;
        if self.min_array.is_empty() {
            for j in (0..=b).rev() {
                let v = self.bottom_value(j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / sbs;
        if self.upper_value(1, block) < d {
            let until = sbs * block;
            for j in (until..=b).rev() {
                let v = self.bottom_value(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if block == 0 {
            return not_found;
        }
        let (blk, value) = self.find_psv_upper(d, block - 1, 1);
        if blk == self.pos_array[1].len() {
            return not_found;
        }
        let target = blk * sbs + self.level_pos(1, blk);
        for j in ((target + 1)..(blk + 1) * sbs).rev() {
            let v = self.bottom_value(j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    fn find_psv_upper(&self, d: usize, b: usize, level: usize) -> (usize, usize) {
        let len = self.pos_array[level].len();
        let not_found = (len, self.lcp.len());
        if b >= len {
            return not_found;
        }
        let bs = self.block_size;
        if level >= self.min_array.len() {
            for j in (0..=b).rev() {
                let v = self.upper_value(level, j);
                if v < d {
                    return (j, v);
                }
            }
            return not_found;
        }
        let block = b / bs;
        if self.upper_value(level + 1, block) < d {
            let until = bs * block;
            for j in (until..=b).rev() {
                let v = self.upper_value(level, j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if block == 0 {
            return not_found;
        }
        let (blk, value) = self.find_psv_upper(d, block - 1, level + 1);
        if blk == self.pos_array[level + 1].len() {
            return not_found;
        }
        let target = blk * bs + self.level_pos(level + 1, blk);
        for j in ((target + 1)..(blk + 1) * bs).rev() {
            let v = self.upper_value(level, j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    /// Leftmost minimum among the bottom-level entries `i..=j`.
    fn find_rmq_bottom(&self, i: usize, j: usize) -> (usize, usize) {
        let n = self.lcp.len();
        let sbs = self.small_block;
        if self.min_array.is_empty() {
            let (mut min, mut pos) = (n, i);
            for r in i..=j {
                let v = self.bottom_value(r);
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

        let l_block = i / sbs;
        let r_block = j / sbs;
        let (mut min, mut pos) = (n, i);

        let until = ((l_block + 1) * sbs - 1).min(j);
        let min_bpos = l_block * sbs + self.level_pos(1, l_block);
        if min_bpos >= i && min_bpos <= until {
            min = self.upper_value(1, l_block);
            pos = min_bpos;
        } else {
            for r in i..=until {
                let v = self.bottom_value(r);
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

        let l_block = l_block + 1;
        if l_block < r_block {
            let (blk, aux) = self.find_rmq_upper(l_block, r_block - 1, 1);
            if aux < min {
                min = aux;
                pos = blk * sbs + self.level_pos(1, blk);
                if min == 0 {
                    return (pos, min);
                }
            }
        }

        let min_bpos = r_block * sbs + self.level_pos(1, r_block);
        if self.upper_value(1, r_block) < min {
            if min_bpos <= j {
                return (min_bpos, self.upper_value(1, r_block));
            }
            for r in (r_block * sbs)..=j {
                let v = self.bottom_value(r);
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

    fn find_rmq_upper(&self, i: usize, j: usize, level: usize) -> (usize, usize) {
        let n = self.lcp.len();
        let bs = self.block_size;
        if level >= self.min_array.len() {
            let (mut min, mut pos) = (n, i);
            for r in i..=j {
                let v = self.upper_value(level, r);
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

        let until = ((l_block + 1) * bs - 1).min(j);
        let min_bpos = l_block * bs + self.level_pos(level + 1, l_block);
        if min_bpos >= i && min_bpos <= until {
            min = self.upper_value(level + 1, l_block);
            pos = min_bpos;
        } else {
            for r in i..=until {
                let v = self.upper_value(level, r);
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

        let l_block = l_block + 1;
        if l_block < r_block {
            let (blk, aux) = self.find_rmq_upper(l_block, r_block - 1, level + 1);
            if aux < min {
                min = aux;
                pos = blk * bs + self.level_pos(level + 1, blk);
                if min == 0 {
                    return (pos, min);
                }
            }
        }

        let min_bpos = r_block * bs + self.level_pos(level + 1, r_block);
        if self.upper_value(level + 1, r_block) < min {
            if min_bpos <= j {
                return (min_bpos, self.upper_value(level + 1, r_block));
            }
            for r in (r_block * bs)..=j {
                let v = self.upper_value(level, r);
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

impl<L: LcpArray> NprSupport for NprCnr<L> {
    fn len(&self) -> usize {
        self.lcp.len()
    }

    fn fwd_nsv(&self, i: usize, d: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if d == 0 || i >= n {
            return (n, n);
        }
        let sbs = self.small_block;
        let block = i / sbs;
        let mut until = 0;
        if self.bottom_value(block) < d {
            until = (sbs * (block + 1)).min(n);
            for j in i..until {
                let v = self.lcp.get(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if until == n {
            return (n, n);
        }
        let (blk, value) = self.find_nsv_bottom(d, block + 1);
        if blk == self.pos_array[0].len() {
            return (n, n);
        }
        let target = blk * sbs + self.level_pos(0, blk);
        if value + 1 == d {
            return (target, value);
        }
        for j in (blk * sbs)..target {
            let v = self.lcp.get(j);
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
        let sbs = self.small_block;
        let block = i / sbs;
        if self.bottom_value(block) < d {
            let until = sbs * block;
            for j in (until..=i).rev() {
                let v = self.lcp.get(j);
                if v < d {
                    return (j, v);
                }
            }
        }
        if block == 0 {
            return (n, n);
        }
        let (blk, value) = self.find_psv_bottom(d, block - 1);
        if blk == self.pos_array[0].len() {
            return (n, n);
        }
        let target = blk * sbs + self.level_pos(0, blk);
        for j in ((target + 1)..(blk + 1) * sbs).rev() {
            let v = self.lcp.get(j);
            if v < d {
                return (j, v);
            }
        }
        (target, value)
    }

    fn rmq(&self, i: usize, j: usize) -> (usize, usize) {
        let n = self.lcp.len();
        debug_assert!(i <= j && j < n, "rmq range [{i}, {j}] out of bounds");
        let sbs = self.small_block;
        let l_block = i / sbs;
        let r_block = j / sbs;
        let (mut min, mut pos) = (n, i);

        // left partial small block
        let until = ((l_block + 1) * sbs - 1).min(j);
        let min_bpos = l_block * sbs + self.level_pos(0, l_block);
        if min_bpos >= i && min_bpos <= until {
            min = self.lcp.get(min_bpos);
            pos = min_bpos;
        } else {
            for r in i..=until {
                let v = self.lcp.get(r);
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

        // whole small blocks in between
        let l_block = l_block + 1;
        if l_block < r_block {
            let (blk, aux) = self.find_rmq_bottom(l_block, r_block - 1);
            if aux < min {
                min = aux;
                pos = blk * sbs + self.level_pos(0, blk);
                if min == 0 {
                    return (pos, min);
                }
            }
        }

        // right partial small block
        let min_bpos = r_block * sbs + self.level_pos(0, r_block);
        let bot = self.lcp.get(min_bpos);
        if bot < min {
            if min_bpos <= j {
                return (min_bpos, bot);
            }
            for r in (r_block * sbs)..=j {
                let v = self.lcp.get(r);
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
        self.fwd_nsv(i + 1, self.lcp.get(i))
    }

    fn psv(&self, i: usize) -> (usize, usize) {
        let n = self.lcp.len();
        if i == 0 || i >= n {
            return (n, n);
        }
        self.bwd_psv(i - 1, self.lcp.get(i))
    }
}
