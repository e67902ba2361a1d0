use cstds::{CsaIndex, CstCn, CstCnr, DfsOrder, Node, NprSupport};

mod common;

/// Every node of the tree, collected from the DFS entry visits.
fn all_nodes(cst: &CstCn) -> Vec<Node> {
    cst.dfs()
        .filter(|v| v.order == DfsOrder::Pre)
        .map(|v| v.node)
        .collect()
}

/// All children of an internal node, via first-child plus the sibling chain.
fn children_of(cst: &CstCn, v: Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut child = cst.first_child(v);
    loop {
        out.push(child);
        if child.rb >= v.rb {
            break;
        }
        child = cst.sibling(child);
    }
    out
}

#[test]
fn string_depth_is_the_interval_minimum() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        let sa = common::naive_suffix_array(text);
        let lcp = common::naive_lcp(text, &sa);
        for v in all_nodes(&cst) {
            if v == cst.root() {
                assert_eq!(cst.depth(v), 0);
            } else if v.is_leaf() {
                assert_eq!(cst.depth(v), text.len() - sa[v.lb]);
            } else {
                let expected = lcp[v.lb + 1..=v.rb].iter().min().copied().unwrap();
                assert_eq!(cst.depth(v), expected, "depth of {v} in {text:?}");
            }
        }
    }
}

#[test]
fn parent_is_a_strictly_shallower_ancestor() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 16).unwrap();
        for v in all_nodes(&cst) {
            if v == cst.root() {
                continue;
            }
            let p = cst.parent(v);
            assert!(cst.ancestor(p, v), "{p} should contain {v}");
            assert!(p != v);
            assert!(
                cst.depth(p) < cst.depth(v),
                "depth({p}) < depth({v}) in {text:?}"
            );
        }
    }
}

#[test]
fn children_partition_their_parent() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        for v in all_nodes(&cst) {
            if v.is_leaf() {
                assert_eq!(cst.degree(v), 0);
                continue;
            }
            let children = children_of(&cst, v);
            assert_eq!(children.len(), cst.degree(v));
            assert!(children.len() >= 2, "internal {v} must branch in {text:?}");
            assert_eq!(children[0].lb, v.lb);
            assert_eq!(children.last().unwrap().rb, v.rb);
            for pair in children.windows(2) {
                assert_eq!(pair[0].rb + 1, pair[1].lb, "gap below {v} in {text:?}");
            }
            let total: usize = children.iter().map(|c| c.size()).sum();
            assert_eq!(total, v.size());
            for (i, &c) in children.iter().enumerate() {
                assert_eq!(cst.select_child(v, i + 1), c);
            }
            assert_eq!(cst.select_child(v, children.len() + 1), cst.root());
        }
    }
}

#[test]
fn lca_is_the_deepest_common_ancestor() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        let nodes = all_nodes(&cst);
        for &v in &nodes {
            for &w in &nodes {
                let u = cst.lca(v, w);
                assert!(cst.ancestor(u, v) && cst.ancestor(u, w));
                // no deeper node contains both
                for &x in &nodes {
                    if cst.ancestor(x, v) && cst.ancestor(x, w) && x != u {
                        assert!(cst.depth(x) < cst.depth(u));
                    }
                }
            }
        }
        assert_eq!(cst.lca(cst.root(), nodes[1]), cst.root());
        assert_eq!(cst.lca(nodes[1], nodes[1]), nodes[1]);
    }
}

#[test]
fn node_ids_roundtrip_and_stay_unique() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        let mut seen = std::collections::HashSet::new();
        for v in all_nodes(&cst) {
            let id = cst.id(v);
            assert!(seen.insert(id), "id {id} reused in {text:?}");
            assert_eq!(cst.inv_id(id), v, "roundtrip of {v} in {text:?}");
        }
    }
}

#[test]
fn weiner_links_on_leaves_follow_the_bwt() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        let csa = cst.csa();
        let n = cst.size();
        let alphabet: Vec<u8> = (0..csa.sigma()).map(|cc| csa.comp_to_char(cc)).collect();
        for i in 0..n {
            let leaf = Node::new(i, i);
            for &c in &alphabet {
                let linked = cst.wl(leaf, c);
                if c == csa.bwt(i) {
                    assert!(linked.is_leaf());
                    assert_eq!(
                        csa.sa(linked.lb),
                        (csa.sa(i) + n - 1) % n,
                        "wl should prepend {c:?} in {text:?}"
                    );
                } else {
                    assert_eq!(linked, cst.root(), "no weiner link for {c:?} at {i}");
                }
            }
        }
    }
}

#[test]
fn suffix_links_drop_the_first_character() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        for v in all_nodes(&cst) {
            if v == cst.root() {
                assert_eq!(cst.sl(v), cst.root());
                continue;
            }
            let s = cst.sl(v);
            if v.is_leaf() {
                // leaf suffix link moves one position forward in the text
                let n = cst.size();
                assert_eq!(cst.csa().sa(s.lb), (cst.csa().sa(v.lb) + 1) % n);
            } else {
                assert_eq!(cst.depth(s) + 1, cst.depth(v), "sl depth of {v} in {text:?}");
            }
        }
    }
}

#[test]
fn child_lookup_agrees_with_edge_labels() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        let csa = cst.csa();
        let alphabet: Vec<u8> = (0..csa.sigma()).map(|cc| csa.comp_to_char(cc)).collect();
        for v in all_nodes(&cst) {
            if v.is_leaf() {
                continue;
            }
            let d = cst.depth(v);
            let children = children_of(&cst, v);
            for &c in &alphabet {
                let found = cst.child(v, c);
                let expected = children
                    .iter()
                    .copied()
                    .find(|&w| cst.edge(w, d + 1) == c);
                match expected {
                    Some(w) => assert_eq!(found, w, "child({v}, {c:?}) in {text:?}"),
                    None => assert_eq!(found, cst.root(), "child({v}, {c:?}) in {text:?}"),
                }
            }
            assert_eq!(cst.child(v, b'~'), cst.root());
        }
    }
}

#[test]
fn banana_end_to_end() {
    let cst = CstCn::build(b"banana$", 32).unwrap();
    let root = cst.root();
    assert_eq!(root, Node::new(0, 6));
    assert_eq!(cst.depth(root), 0);
    assert_eq!(root.size(), 7);

    assert_eq!(cst.npr().rmq(1, 6), (1, 0));

    // children of the root, left to right
    let c1 = cst.first_child(root);
    assert_eq!(c1, Node::new(0, 0));
    let c2 = cst.sibling(c1);
    assert_eq!(c2, Node::new(1, 3));
    assert_eq!(cst.depth(c2), 1);
    let c3 = cst.sibling(c2);
    assert_eq!(c3, Node::new(4, 4));
    let c4 = cst.sibling(c3);
    assert_eq!(c4, Node::new(5, 6));
    assert_eq!(cst.depth(c4), 2);

    assert_eq!(cst.parent(Node::new(2, 3)), Node::new(1, 3));
    assert_eq!(cst.lca(cst.select_leaf(3), cst.select_leaf(6)), Node::new(1, 3));
}

#[test]
fn run_text_end_to_end() {
    let cst = CstCn::build(b"aaaa$", 32).unwrap();
    let root = cst.root();
    let children = children_of(&cst, root);
    assert_eq!(children, vec![Node::new(0, 0), Node::new(1, 4)]);

    // the "a" subtree is an unbalanced spine of singleton splits
    let mut v = Node::new(1, 4);
    let mut expected_first = 1;
    while !v.is_leaf() {
        let first = cst.first_child(v);
        assert_eq!(first, Node::new(expected_first, expected_first));
        v = cst.select_child(v, 2);
        expected_first += 1;
    }
    assert_eq!(v, Node::new(4, 4));

    assert_eq!(cst.sl(Node::new(1, 4)), root);
}

#[test]
fn level_ancestors_agree_with_the_parent_chain() {
    for &text in common::TEXTS {
        let cst = CstCn::build(text, 8).unwrap();
        for v in all_nodes(&cst) {
            // ancestors of v from v up to the root
            let mut chain = vec![v];
            let mut w = v;
            while w != cst.root() {
                w = cst.parent(w);
                chain.push(w);
            }
            for d in 0..=cst.depth(v) + 1 {
                let expected = chain
                    .iter()
                    .copied()
                    .find(|&a| cst.depth(a) <= d)
                    .unwrap();
                assert_eq!(cst.laqs(v, d), expected, "laqs({v}, {d}) in {text:?}");
            }
            for d in 0..chain.len() + 1 {
                let expected = chain
                    .iter()
                    .copied()
                    .find(|&a| cst.node_depth(a) <= d)
                    .unwrap();
                assert_eq!(cst.laqt(v, d), expected, "laqt({v}, {d}) in {text:?}");
            }
        }
    }
}

#[test]
fn both_variants_navigate_identically() {
    for &text in common::TEXTS {
        let cn = CstCn::build(text, 8).unwrap();
        let cnr = CstCnr::build(text, 8, 4).unwrap();
        for v in all_nodes(&cn) {
            assert_eq!(cn.depth(v), cnr.depth(v));
            if v != cn.root() {
                assert_eq!(cn.parent(v), cnr.parent(v));
            }
            if !v.is_leaf() {
                assert_eq!(cn.first_child(v), cnr.first_child(v));
                assert_eq!(cn.degree(v), cnr.degree(v));
            }
            assert_eq!(cn.sl(v), cnr.sl(v));
            assert_eq!(cn.id(v), cnr.id(v));
            assert_eq!(cn.inv_id(cn.id(v)), cnr.inv_id(cnr.id(v)));
        }
    }
}
