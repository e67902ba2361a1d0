//! Shared oracles for the integration suites: naive suffix-array, LCP and
//! NSV/PSV/RMQ computations to compare the indexes against.

#![allow(dead_code)]

/// Small texts exercising runs, repeats and near-trivial alphabets.
pub const TEXTS: &[&[u8]] = &[
    b"banana$",
    b"aaaa$",
    b"abab$",
    b"mississippi$",
    b"abracadabra$",
    b"aabaab$",
    b"abcabcabcabcabc$",
    b"tobeornottobe$",
    b"x$",
];

pub fn naive_suffix_array(text: &[u8]) -> Vec<usize> {
    let mut sa: Vec<usize> = (0..text.len()).collect();
    sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    sa
}

pub fn naive_lcp(text: &[u8], sa: &[usize]) -> Vec<usize> {
    let mut lcp = vec![0usize; sa.len()];
    for i in 1..sa.len() {
        let (a, b) = (&text[sa[i - 1]..], &text[sa[i]..]);
        lcp[i] = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    }
    lcp
}

/// Leftmost `p >= i` with `lcp[p] < d`, or `(n, n)`.
pub fn naive_fwd_nsv(lcp: &[usize], i: usize, d: usize) -> (usize, usize) {
    let n = lcp.len();
    if d == 0 {
        return (n, n);
    }
    for p in i..n {
        if lcp[p] < d {
            return (p, lcp[p]);
        }
    }
    (n, n)
}

/// Rightmost `p <= i` with `lcp[p] < d`, or `(n, n)`.
pub fn naive_bwd_psv(lcp: &[usize], i: usize, d: usize) -> (usize, usize) {
    let n = lcp.len();
    if d == 0 || i >= n {
        return (n, n);
    }
    for p in (0..=i).rev() {
        if lcp[p] < d {
            return (p, lcp[p]);
        }
    }
    (n, n)
}

/// Leftmost position of the minimum in `lcp[i..=j]`.
pub fn naive_rmq(lcp: &[usize], i: usize, j: usize) -> (usize, usize) {
    let (mut min, mut pos) = (usize::MAX, i);
    for p in i..=j {
        if lcp[p] < min {
            min = lcp[p];
            pos = p;
        }
    }
    (pos, min)
}
