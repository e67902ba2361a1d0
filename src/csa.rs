//! The compressed-suffix-array provider contract and a plain reference
//! implementation.
//!
//! The navigator consumes suffix arrays exclusively through [`CsaIndex`]:
//! suffix-array and inverse access, Psi, the first column, the cumulative
//! count table over the compact alphabet, and backward search. [`SimpleCsa`]
//! implements the contract with bit-packed SA/ISA/Psi vectors and a BWT with
//! checkpointed occurrence counts; a genuinely compressed CSA can replace it
//! without touching the navigation code.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::int_vec::{bits_for, read_u64, write_u64, IntVector};

/// Number of BWT positions between occurrence checkpoints.
const CHECKPOINT_STRIDE: usize = 256;

/// Error type returned by [`SimpleCsa`] construction.
#[derive(Debug, Error)]
pub enum CsaBuildError {
    /// The input text was empty.
    #[error("text must be non-empty")]
    EmptyText,
}

/// Suffix-array capabilities the suffix-tree navigator relies on.
pub trait CsaIndex {
    /// Text length (number of suffixes).
    fn len(&self) -> usize;

    /// `SA[i]`: starting position of the suffix with lexicographic rank `i`.
    fn sa(&self, i: usize) -> usize;

    /// `ISA[p]`: lexicographic rank of the suffix starting at `p`.
    fn isa(&self, p: usize) -> usize;

    /// `Psi[i]`: rank of the suffix that starts one position after `SA[i]`.
    fn psi(&self, i: usize) -> usize;

    /// Character of the Burrows-Wheeler transform at rank `i`.
    fn bwt(&self, i: usize) -> u8;

    /// First-column character at rank `p`.
    fn f_char(&self, p: usize) -> u8;

    /// Compact code of byte `c`, or `None` if `c` does not occur in the text.
    fn char_to_comp(&self, c: u8) -> Option<usize>;

    /// Byte for compact code `cc`.
    fn comp_to_char(&self, cc: usize) -> u8;

    /// Size of the compact alphabet.
    fn sigma(&self) -> usize;

    /// `C[cc]`: number of suffixes starting with a symbol of compact code
    /// smaller than `cc`. Defined for `cc` in `0..=sigma`, with
    /// `C[sigma] == len`.
    fn cum_count(&self, cc: usize) -> usize;

    /// One backward-search step: restrict the SA-interval `[lb, rb]` to the
    /// suffixes preceded by `c` in the text. `None` when the result is empty.
    fn backward_search(&self, lb: usize, rb: usize, c: u8) -> Option<(usize, usize)>;

    /// Lexicographic rank of the suffix starting `d` positions after suffix
    /// `SA[i]` (positions wrap at the text end).
    fn char_pos(&self, i: usize, d: usize) -> usize {
        if d == 0 {
            i
        } else {
            self.isa((self.sa(i) + d) % self.len())
        }
    }

    /// Returns `true` when the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-symbol occurrence counts over the BWT, sampled every
/// [`CHECKPOINT_STRIDE`] positions. Counts between checkpoints are recovered
/// by a bounded scan.
#[derive(Debug, Clone)]
struct OccCheckpoints {
    stride: usize,
    sigma: usize,
    /// Flattened `[checkpoint][symbol]` prefix counts.
    counts: Vec<u32>,
}

impl OccCheckpoints {
    fn build(bwt: &[u8], sigma: usize, stride: usize) -> Self {
        // one checkpoint per started block plus one at the very end, so
        // `pos / stride` stays in bounds for pos == bwt.len()
        let blocks = bwt.len() / stride + 1;
        let mut counts = vec![0u32; blocks * sigma];
        let mut running = vec![0u32; sigma];
        for (i, &code) in bwt.iter().enumerate() {
            if i % stride == 0 {
                counts[(i / stride) * sigma..(i / stride + 1) * sigma]
                    .copy_from_slice(&running);
            }
            running[code as usize] += 1;
        }
        if bwt.len() % stride == 0 {
            let last = bwt.len() / stride;
            counts[last * sigma..(last + 1) * sigma].copy_from_slice(&running);
        }
        Self {
            stride,
            sigma,
            counts,
        }
    }

    /// Occurrences of compact code `cc` in `bwt[..pos]`.
    fn rank(&self, bwt: &[u8], cc: usize, pos: usize) -> usize {
        let block = pos / self.stride;
        let mut count = self.counts[block * self.sigma + cc] as usize;
        for &code in &bwt[block * self.stride..pos] {
            if code as usize == cc {
                count += 1;
            }
        }
        count
    }
}

/// Plain sampled CSA over a byte text.
#[derive(Debug, Clone)]
pub struct SimpleCsa {
    n: usize,
    sigma: usize,
    comp_of: [u8; 256],
    present: [bool; 256],
    comp2char: Vec<u8>,
    c_table: Vec<usize>,
    sa: IntVector,
    isa: IntVector,
    psi: IntVector,
    /// BWT as compact codes.
    bwt: Vec<u8>,
    occ: OccCheckpoints,
}

impl SimpleCsa {
    /// Build the index over `text`.
    pub fn from_text(text: &[u8]) -> Result<Self, CsaBuildError> {
        if text.is_empty() {
            return Err(CsaBuildError::EmptyText);
        }
        let n = text.len();
        let sa_plain = build_suffix_array(text);

        let mut isa_plain = vec![0usize; n];
        for (i, &s) in sa_plain.iter().enumerate() {
            isa_plain[s] = i;
        }

        // compact alphabet in byte order
        let mut present = [false; 256];
        for &b in text {
            present[b as usize] = true;
        }
        let mut comp_of = [0u8; 256];
        let mut comp2char = Vec::new();
        for b in 0..256usize {
            if present[b] {
                comp_of[b] = comp2char.len() as u8;
                comp2char.push(b as u8);
            }
        }
        let sigma = comp2char.len();

        let mut c_table = vec![0usize; sigma + 1];
        for &b in text {
            c_table[comp_of[b as usize] as usize + 1] += 1;
        }
        for cc in 0..sigma {
            c_table[cc + 1] += c_table[cc];
        }

        let bwt: Vec<u8> = sa_plain
            .iter()
            .map(|&s| comp_of[text[(s + n - 1) % n] as usize])
            .collect();
        let occ = OccCheckpoints::build(&bwt, sigma, CHECKPOINT_STRIDE);

        let width = bits_for(n as u64);
        let mut sa = IntVector::with_len(n, width);
        let mut isa = IntVector::with_len(n, width);
        let mut psi = IntVector::with_len(n, width);
        for i in 0..n {
            sa.set(i, sa_plain[i] as u64);
            isa.set(i, isa_plain[i] as u64);
            psi.set(i, isa_plain[(sa_plain[i] + 1) % n] as u64);
        }

        Ok(Self {
            n,
            sigma,
            comp_of,
            present,
            comp2char,
            c_table,
            sa,
            isa,
            psi,
            bwt,
            occ,
        })
    }

    /// Collect the plain suffix array entries (used while building the LCP).
    pub fn sa_values(&self) -> Vec<usize> {
        self.sa.iter().map(|v| v as usize).collect()
    }

    /// Serialize the index. Returns bytes written.
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut written = 0usize;
        write_u64(out, self.n as u64)?;
        written += 8;
        out.write_all(&(self.sigma as u16).to_le_bytes())?;
        written += 2;
        out.write_all(&self.comp2char)?;
        written += self.comp2char.len();
        for &c in &self.c_table {
            write_u64(out, c as u64)?;
            written += 8;
        }
        written += self.sa.serialize(out)?;
        written += self.isa.serialize(out)?;
        written += self.psi.serialize(out)?;
        out.write_all(&self.bwt)?;
        written += self.bwt.len();
        Ok(written)
    }

    /// Load an index previously written by [`SimpleCsa::serialize`].
    /// Occurrence checkpoints and the alphabet maps are rebuilt.
    pub fn load<R: Read>(input: &mut R) -> io::Result<Self> {
        let n = read_u64(input)? as usize;
        let mut buf = [0u8; 2];
        input.read_exact(&mut buf)?;
        let sigma = u16::from_le_bytes(buf) as usize;
        if sigma == 0 || sigma > 256 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid alphabet size {sigma}"),
            ));
        }
        let mut comp2char = vec![0u8; sigma];
        input.read_exact(&mut comp2char)?;
        let mut c_table = vec![0usize; sigma + 1];
        for c in c_table.iter_mut() {
            *c = read_u64(input)? as usize;
        }
        let sa = IntVector::load(input)?;
        let isa = IntVector::load(input)?;
        let psi = IntVector::load(input)?;
        let mut bwt = vec![0u8; n];
        input.read_exact(&mut bwt)?;

        let mut present = [false; 256];
        let mut comp_of = [0u8; 256];
        for (cc, &b) in comp2char.iter().enumerate() {
            present[b as usize] = true;
            comp_of[b as usize] = cc as u8;
        }
        let occ = OccCheckpoints::build(&bwt, sigma, CHECKPOINT_STRIDE);

        Ok(Self {
            n,
            sigma,
            comp_of,
            present,
            comp2char,
            c_table,
            sa,
            isa,
            psi,
            bwt,
            occ,
        })
    }
}

impl CsaIndex for SimpleCsa {
    fn len(&self) -> usize {
        self.n
    }

    fn sa(&self, i: usize) -> usize {
        self.sa.get(i) as usize
    }

    fn isa(&self, p: usize) -> usize {
        self.isa.get(p) as usize
    }

    fn psi(&self, i: usize) -> usize {
        self.psi.get(i) as usize
    }

    fn bwt(&self, i: usize) -> u8 {
        self.comp2char[self.bwt[i] as usize]
    }

    fn f_char(&self, p: usize) -> u8 {
        debug_assert!(p < self.n);
        let cc = self.c_table.partition_point(|&c| c <= p) - 1;
        self.comp2char[cc]
    }

    fn char_to_comp(&self, c: u8) -> Option<usize> {
        if self.present[c as usize] {
            Some(self.comp_of[c as usize] as usize)
        } else {
            None
        }
    }

    fn comp_to_char(&self, cc: usize) -> u8 {
        self.comp2char[cc]
    }

    fn sigma(&self) -> usize {
        self.sigma
    }

    fn cum_count(&self, cc: usize) -> usize {
        self.c_table[cc]
    }

    fn backward_search(&self, lb: usize, rb: usize, c: u8) -> Option<(usize, usize)> {
        if lb > rb || rb >= self.n {
            return None;
        }
        let cc = self.char_to_comp(c)?;
        let occ_lb = self.occ.rank(&self.bwt, cc, lb);
        let occ_rb = self.occ.rank(&self.bwt, cc, rb + 1);
        if occ_lb == occ_rb {
            return None;
        }
        let base = self.c_table[cc];
        Some((base + occ_lb, base + occ_rb - 1))
    }
}

/// Suffix array by prefix doubling over the rank pairs.
fn build_suffix_array(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| b as i64).collect();
    let mut tmp = vec![0i64; n];

    fn key(i: usize, k: usize, rank: &[i64]) -> (i64, i64) {
        let second = if i + k < rank.len() { rank[i + k] } else { -1 };
        (rank[i], second)
    }

    let mut k = 1;
    while k < n {
        sa.sort_by(|&a, &b| key(a, k, &rank).cmp(&key(b, k, &rank)));
        tmp[sa[0]] = 0;
        for i in 1..n {
            let bump = (key(sa[i - 1], k, &rank) < key(sa[i], k, &rank)) as i64;
            tmp[sa[i]] = tmp[sa[i - 1]] + bump;
        }
        std::mem::swap(&mut rank, &mut tmp);
        if rank[sa[n - 1]] as usize == n - 1 {
            break;
        }
        k *= 2;
    }
    sa
}
