//! Whole-call integration tests for the concrete scenarios worked through
//! by the design: known linkage trees and distance matrices with a known
//! optimal adjacent-sum cost.

use olo::{build_tree, optimal_leaf_ordering, DistanceMatrix, LinkageRow};

fn row(left: u32, right: u32, height: f64, size: u32) -> LinkageRow {
    LinkageRow { left, right, height, size }
}

fn cost(order: &[u32], d: &[f64], n: usize) -> f64 {
    order.windows(2).map(|pair| d[pair[0] as usize * n + pair[1] as usize]).sum()
}

#[test]
fn path_metric_n4_orders_leaves_by_position() {
    let n = 4;
    let d: Vec<f64> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i as isize - j as isize).unsigned_abs() as f64))
        .collect();
    let z = vec![row(0, 1, 1.0, 2), row(2, 3, 1.0, 2), row(4, 5, 2.0, 4)];

    let z2 = optimal_leaf_ordering(z, DistanceMatrix::Square(d.clone())).unwrap();
    let order = build_tree(z2, n).unwrap().in_order_leaves();

    assert_eq!(cost(&order, &d, n), 3.0);
    insta::assert_debug_snapshot!(order.first().unwrap().min(order.last().unwrap()), @"0");
}

#[test]
fn swapped_pairs_prefer_the_matching_neighbor() {
    // n = 4: D[0][3] = D[1][2] = 0, everything else off-diagonal is 10.
    let n = 4;
    let mut d = vec![10.0; n * n];
    for i in 0..n {
        d[i * n + i] = 0.0;
    }
    d[0 * n + 3] = 0.0;
    d[3 * n + 0] = 0.0;
    d[1 * n + 2] = 0.0;
    d[2 * n + 1] = 0.0;
    let z = vec![row(0, 1, 1.0, 2), row(2, 3, 1.0, 2), row(4, 5, 2.0, 4)];

    let z2 = optimal_leaf_ordering(z, DistanceMatrix::Square(d.clone())).unwrap();
    let order = build_tree(z2, n).unwrap().in_order_leaves();

    assert_eq!(cost(&order, &d, n), 10.0);
}

#[test]
fn two_well_separated_clusters_stay_contiguous() {
    // Points at x = 0, 1, 2, 10, 11, 12; the linkage already groups
    // {0,1,2} and {3,4,5} before the root, so only the in-group order is
    // up for grabs.
    let n = 6;
    let xs = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
    let mut d = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            d[i * n + j] = (xs[i] - xs[j]).abs();
        }
    }
    let z = vec![
        row(0, 1, 1.0, 2),
        row(3, 4, 1.0, 2),
        row(2, 6, 2.0, 3),
        row(5, 7, 2.0, 3),
        row(8, 9, 10.0, 6),
    ];

    let z2 = optimal_leaf_ordering(z, DistanceMatrix::Square(d.clone())).unwrap();
    let order = build_tree(z2, n).unwrap().in_order_leaves();

    assert_eq!(cost(&order, &d, n), 12.0);
    let first_half_in_low_cluster = order[..3].iter().all(|&v| v < 3) || order[3..].iter().all(|&v| v < 3);
    assert!(first_half_in_low_cluster, "clusters must stay contiguous, got {order:?}");
}

#[test]
fn idempotent_across_repeated_calls() {
    let n = 6;
    let xs = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
    let mut d = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            d[i * n + j] = (xs[i] - xs[j]).abs();
        }
    }
    let z = vec![
        row(0, 1, 1.0, 2),
        row(3, 4, 1.0, 2),
        row(2, 6, 2.0, 3),
        row(5, 7, 2.0, 3),
        row(8, 9, 10.0, 6),
    ];

    let once = optimal_leaf_ordering(z, DistanceMatrix::Square(d.clone())).unwrap();
    let twice = optimal_leaf_ordering(once.clone(), DistanceMatrix::Square(d)).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn rejects_a_root_that_references_itself() {
    let n = 4;
    let z = vec![row(0, 1, 1.0, 2), row(2, 3, 1.0, 2), row(4, 6, 2.0, 4)];
    let err = optimal_leaf_ordering(z, DistanceMatrix::Square(vec![0.0; n * n])).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"malformed linkage tree: internal node 6 references child 6, which is not yet defined"
    );
}

#[test]
fn n_equals_two_either_order_is_fine() {
    let z = vec![row(0, 1, 1.0, 2)];
    let d = vec![0.0, 5.0, 5.0, 0.0];
    let z2 = optimal_leaf_ordering(z, DistanceMatrix::Square(d)).unwrap();
    let order = build_tree(z2, 2).unwrap().in_order_leaves();
    assert!(order == vec![0, 1] || order == vec![1, 0]);
}
