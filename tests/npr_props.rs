use std::sync::Arc;

use proptest::prelude::*;

use cstds::{NprCn, NprCnr, NprSupport};

mod common;

const BLOCK_SIZES: [usize; 3] = [8, 16, 32];
const SMALL_BLOCKS: [usize; 2] = [4, 8];

proptest! {
    /// Directional queries agree with a linear scan for every supported
    /// block-size combination, on both variants.
    #[test]
    fn nsv_psv_match_linear_scan(
        lcp in proptest::collection::vec(0usize..8, 1..64),
    ) {
        let n = lcp.len();
        let shared = Arc::new(lcp.clone());
        for &bs in &BLOCK_SIZES {
            let cn = NprCn::new(Arc::clone(&shared), bs).expect("cn build");
            for &sbs in &SMALL_BLOCKS {
                let cnr = NprCnr::new(Arc::clone(&shared), bs, sbs).expect("cnr build");
                for i in 0..n {
                    for d in 0..9 {
                        let expected = common::naive_fwd_nsv(&lcp, i, d);
                        prop_assert_eq!(cn.fwd_nsv(i, d), expected, "cn fwd i={} d={}", i, d);
                        prop_assert_eq!(cnr.fwd_nsv(i, d), expected, "cnr fwd i={} d={}", i, d);
                        let expected = common::naive_bwd_psv(&lcp, i, d);
                        prop_assert_eq!(cn.bwd_psv(i, d), expected, "cn bwd i={} d={}", i, d);
                        prop_assert_eq!(cnr.bwd_psv(i, d), expected, "cnr bwd i={} d={}", i, d);
                    }
                }
            }
        }
    }

    /// RMQ returns the leftmost minimum for every supported block-size
    /// combination, on both variants.
    #[test]
    fn rmq_matches_linear_scan(
        lcp in proptest::collection::vec(0usize..8, 1..64),
    ) {
        let n = lcp.len();
        let shared = Arc::new(lcp.clone());
        for &bs in &BLOCK_SIZES {
            let cn = NprCn::new(Arc::clone(&shared), bs).expect("cn build");
            for &sbs in &SMALL_BLOCKS {
                let cnr = NprCnr::new(Arc::clone(&shared), bs, sbs).expect("cnr build");
                for i in 0..n {
                    for j in i..n {
                        let expected = common::naive_rmq(&lcp, i, j);
                        prop_assert_eq!(cn.rmq(i, j), expected, "cn rmq [{}, {}]", i, j);
                        prop_assert_eq!(cnr.rmq(i, j), expected, "cnr rmq [{}, {}]", i, j);
                    }
                }
            }
        }
    }

    /// nsv/psv are the documented reductions to the directional queries.
    #[test]
    fn nsv_psv_reductions(
        lcp in proptest::collection::vec(0usize..8, 1..64),
    ) {
        let n = lcp.len();
        let npr = NprCn::new(Arc::new(lcp.clone()), 32).expect("build");
        for i in 0..n {
            prop_assert_eq!(npr.nsv(i), common::naive_fwd_nsv(&lcp, i + 1, lcp[i]));
            let expected = if i == 0 {
                (n, n)
            } else {
                common::naive_bwd_psv(&lcp, i - 1, lcp[i])
            };
            prop_assert_eq!(npr.psv(i), expected);
        }
    }
}

#[test]
fn boundary_sentinels() {
    let lcp: Vec<usize> = vec![0, 2, 4, 1, 0, 3, 5, 2];
    let n = lcp.len();
    let cn = NprCn::new(Arc::new(lcp.clone()), 8).unwrap();
    let cnr = NprCnr::new(Arc::new(lcp.clone()), 8, 4).unwrap();

    // d == 0 is never found
    assert_eq!(cn.fwd_nsv(3, 0), (n, n));
    assert_eq!(cn.bwd_psv(3, 0), (n, n));
    assert_eq!(cnr.fwd_nsv(3, 0), (n, n));
    assert_eq!(cnr.bwd_psv(3, 0), (n, n));

    // psv at the left edge, nsv at the right edge
    assert_eq!(cn.psv(0), (n, n));
    assert_eq!(cnr.psv(0), (n, n));
    assert_eq!(cn.nsv(n - 1), common::naive_fwd_nsv(&lcp, n, lcp[n - 1]));

    // a single-position range is its own minimum
    for i in 0..n {
        assert_eq!(cn.rmq(i, i), (i, lcp[i]));
        assert_eq!(cnr.rmq(i, i), (i, lcp[i]));
    }

    // queries starting past the end are not found
    assert_eq!(cn.fwd_nsv(n, 3), (n, n));
    assert_eq!(cnr.fwd_nsv(n + 5, 3), (n, n));
}

#[test]
fn deep_hierarchies_need_several_levels() {
    // long enough that B = 8 yields four summary levels
    let lcp: Vec<usize> = (0..2500).map(|i| (i * 7 + 3) % 11).collect();
    let shared = Arc::new(lcp.clone());
    let cn = NprCn::new(Arc::clone(&shared), 8).unwrap();
    let cnr = NprCnr::new(Arc::clone(&shared), 8, 4).unwrap();
    for i in (0..2500).step_by(41) {
        for d in [1, 5, 10, 11] {
            assert_eq!(cn.fwd_nsv(i, d), common::naive_fwd_nsv(&lcp, i, d));
            assert_eq!(cn.bwd_psv(i, d), common::naive_bwd_psv(&lcp, i, d));
            assert_eq!(cnr.fwd_nsv(i, d), common::naive_fwd_nsv(&lcp, i, d));
            assert_eq!(cnr.bwd_psv(i, d), common::naive_bwd_psv(&lcp, i, d));
        }
        for j in [i, (i + 63).min(2499), 2499] {
            assert_eq!(cn.rmq(i, j), common::naive_rmq(&lcp, i, j));
            assert_eq!(cnr.rmq(i, j), common::naive_rmq(&lcp, i, j));
        }
    }
}
