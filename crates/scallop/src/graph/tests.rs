use super::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

fn diamond() -> SpliceGraph {
    SpliceGraph::from_edges(
        4,
        &[
            (0, 1, 5.0, 1.0),
            (0, 2, 5.0, 1.0),
            (1, 3, 5.0, 1.0),
            (2, 3, 5.0, 1.0),
        ],
    )
}

/// Three bubbles in series: 0 ⇉ 1 ⇉ 2 ⇉ 3.
fn bubble_chain() -> SpliceGraph {
    SpliceGraph::from_edges(
        4,
        &[
            (0, 1, 3.0, 0.0),
            (0, 1, 7.0, 0.0),
            (1, 2, 4.0, 0.0),
            (1, 2, 6.0, 0.0),
            (2, 3, 3.0, 0.0),
            (2, 3, 7.0, 0.0),
        ],
    )
}

#[test]
fn retired_ids_are_tombstoned_not_reused() {
    let mut g = diamond();
    assert_eq!(g.num_edges(), 4);
    g.remove_edge(EdgeId(1));
    assert!(g.edge(EdgeId(1)).is_none());
    assert!(!g.is_live(EdgeId(1)));
    let e = g.add_edge(0, 3);
    assert_eq!(e, EdgeId(4));
    assert_eq!(g.num_edges(), 4);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![EdgeId(0), EdgeId(2), EdgeId(3), EdgeId(4)]);
    assert!(g.check_index());
}

#[test]
#[should_panic(expected = "stale edge id")]
fn stale_lookup_is_fatal() {
    let mut g = diamond();
    g.remove_edge(EdgeId(0));
    let _ = g.weight(EdgeId(0));
}

#[test]
fn clear_vertex_isolates() {
    let mut g = diamond();
    let gone = g.clear_vertex(1);
    assert_eq!(gone.len(), 2);
    assert_eq!(g.degree(1), 0);
    assert_eq!(g.num_edges(), 2);
    assert!(g.check_index());
}

#[test]
fn reachability_and_counts() {
    let g = diamond();
    assert_eq!(g.topological_order(), vec![0, 1, 2, 3]);
    assert!(g.check_path(EdgeId(0), EdgeId(2)));
    assert!(!g.check_path(EdgeId(0), EdgeId(3)));
    assert_eq!(g.compute_num_paths(), 2);
    assert_eq!(g.compute_decomp_paths(), 2);
    assert_eq!(g.bfs_edges(1), BTreeSet::from([EdgeId(2)]));
    assert_eq!(g.bfs_reverse_edges(3).len(), 4);
    assert!((g.vertex_weight(0) - 10.0).abs() < 1e-12);
}

#[test]
fn bfs_respects_forbidden_edges() {
    let g = diamond();
    let forbid = BTreeSet::from([EdgeId(2)]);
    assert!(!g.bfs_avoiding(&[1], 3, &forbid));
    assert!(g.bfs_avoiding(&[1, 2], 3, &forbid));
    assert!(g.bfs_reverse_avoiding(&[2], 0, &forbid));
    assert!(!g.bfs_reverse_avoiding(&[3], 0, &BTreeSet::from([EdgeId(2), EdgeId(3)])));
}

#[test]
fn shortest_path_honors_weight_floor() {
    let g = SpliceGraph::from_edges(
        4,
        &[
            (0, 1, 2.0, 0.0),
            (1, 3, 2.0, 0.0),
            (0, 2, 9.0, 0.0),
            (2, 3, 9.0, 0.0),
        ],
    );
    let p = g.compute_shortest_path_w(0, 3, 5.0).unwrap();
    assert_eq!(p, vec![EdgeId(2), EdgeId(3)]);
    assert!(g.compute_shortest_path_w(0, 3, 10.0).is_none());
    assert_eq!(g.compute_shortest_path_w(1, 1, 100.0), Some(vec![]));
}

#[test]
fn widest_path_maximizes_bottleneck() {
    let g = SpliceGraph::from_edges(
        4,
        &[
            (0, 1, 8.0, 0.0),
            (1, 3, 3.0, 0.0),
            (0, 2, 5.0, 0.0),
            (2, 3, 6.0, 0.0),
        ],
    );
    let (w, p) = g.compute_maximum_path_w().unwrap();
    assert!((w - 5.0).abs() < 1e-12);
    assert_eq!(p, vec![EdgeId(2), EdgeId(3)]);
    let empty = SpliceGraph::with_vertices(3);
    assert!(empty.compute_maximum_path_w().is_none());
}

#[test]
fn partners_of_bubble_chain() {
    let g = bubble_chain();
    assert_eq!(g.compute_in_partner(1), Some(0));
    assert_eq!(g.compute_out_partner(1), Some(2));
    assert_eq!(g.compute_in_partner(2), Some(1));
    assert_eq!(g.compute_out_partner(2), Some(3));
    assert_eq!(g.compute_in_partner(0), None);
    assert_eq!(g.compute_out_partner(3), None);
}

#[test]
fn partner_fails_on_open_region() {
    // 1 -> 2 -> 4 and 1 -> 3 -> 4, but 0 -> 3 enters the region from outside.
    let g = SpliceGraph::from_edges(
        5,
        &[
            (0, 1, 1.0, 0.0),
            (1, 2, 1.0, 0.0),
            (1, 3, 1.0, 0.0),
            (0, 3, 1.0, 0.0),
            (2, 4, 1.0, 0.0),
            (3, 4, 1.0, 0.0),
        ],
    );
    assert_eq!(g.compute_out_partner(1), None);
}

#[test]
fn exchange_swaps_series_blocks() {
    let mut g = bubble_chain();
    let paths_before = g.compute_num_paths();
    g.exchange(0, 1, 2);
    assert!(g.check_index());
    // first bubble now sits between 1 and 2, second between 0 and 1
    assert_eq!(g.endpoints(EdgeId(0)), (1, 2));
    assert_eq!(g.endpoints(EdgeId(1)), (1, 2));
    assert_eq!(g.endpoints(EdgeId(2)), (0, 1));
    assert_eq!(g.endpoints(EdgeId(3)), (0, 1));
    assert_eq!(g.compute_num_paths(), paths_before);
    assert!((g.weight(EdgeId(0)) - 3.0).abs() < 1e-12);
}

#[test]
fn exchange_with_interior_vertices() {
    // A = 0 -> {1, 2} -> 3, B = 3 -> {4, 5} -> 6
    let mut g = SpliceGraph::from_edges(
        7,
        &[
            (0, 1, 1.0, 0.0),
            (0, 2, 1.0, 0.0),
            (1, 3, 1.0, 0.0),
            (2, 3, 1.0, 0.0),
            (3, 4, 1.0, 0.0),
            (3, 5, 1.0, 0.0),
            (4, 6, 1.0, 0.0),
            (5, 6, 1.0, 0.0),
        ],
    );
    g.exchange(0, 3, 6);
    assert!(g.check_index());
    assert_eq!(g.endpoints(EdgeId(0)), (3, 1));
    assert_eq!(g.endpoints(EdgeId(2)), (1, 6));
    assert_eq!(g.endpoints(EdgeId(4)), (0, 4));
    assert_eq!(g.endpoints(EdgeId(6)), (4, 3));
    assert_eq!(g.compute_num_paths(), 4);
    let order = g.topological_order();
    let pos = |v: usize| order.iter().position(|&x| x == v).unwrap();
    assert!(pos(4) < pos(3) && pos(3) < pos(1));
}

#[test]
fn draw_writes_tikz_with_labels() {
    let g = diamond();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("diamond.tex");
    let edge_labels = HashMap::from([(EdgeId(0), "first".to_string())]);
    g.draw(&file, &HashMap::new(), &edge_labels, 2.0).unwrap();
    let doc = std::fs::read_to_string(&file).unwrap();
    assert!(doc.starts_with("\\documentclass[tikz]{standalone}"));
    assert!(doc.trim_end().ends_with("\\end{document}"));
    assert_eq!(doc.matches("\\node").count(), 4);
    assert_eq!(doc.matches("\\draw[->]").count(), 4);
    assert!(doc.contains("{first} (v1)"));
    assert!(doc.contains("(v3) at (6.00, 0) {3:10}"));
}

proptest! {
    #[test]
    fn index_stays_consistent(ops in proptest::collection::vec((0usize..6, 0usize..6, any::<bool>()), 1..60)) {
        let mut g = SpliceGraph::with_vertices(6);
        for (a, b, remove) in ops {
            let live: Vec<EdgeId> = g.edges().collect();
            if remove && !live.is_empty() {
                g.remove_edge(live[(a * 7 + b) % live.len()]);
            } else if a < b {
                g.add_weighted_edge(a, b, (a + b) as f64, 0.0);
            }
            prop_assert!(g.check_index());
        }
        for e in g.edges() {
            let (s, t) = g.endpoints(e);
            prop_assert!(g.out_edges(s).contains(&e));
            prop_assert!(g.in_edges(t).contains(&e));
        }
        for k in 0..g.id_bound() {
            let id = EdgeId(k);
            prop_assert_eq!(g.edge(id).is_some(), g.edges().any(|e| e == id));
        }
    }
}
