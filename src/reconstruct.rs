//! Top-down reconstruction: walks the filled M-table from the global
//! optimum at the root down to the leaves, deciding at each internal node
//! whether its children should be swapped so the induced leaf order
//! realizes that optimum.
//!
//! Per §9's "recursion -> iteration" note, the walk uses an explicit stack
//! of `(node, u, w)` boundary triples rather than a recursive function, so
//! stack depth is bounded by heap allocation rather than call-stack depth.

use crate::linkage::{NodeId, Tree};
use crate::mtable::MTable;

/// `swaps[i]` is `true` when internal node `n_leaves + i`'s children should
/// be emitted in reverse (right, then left) order relative to the input
/// linkage matrix.
pub fn reconstruct(tree: &Tree, mtable: &MTable) -> Vec<bool> {
    let n = tree.n_leaves();
    let mut swaps = vec![false; tree.rows().len()];

    let root = tree.root();
    let (u0, w0, _cost) = mtable.table(root, n).argmin();

    let mut stack: Vec<(NodeId, NodeId, NodeId)> = vec![(root, u0, w0)];
    while let Some((v, u, w)) = stack.pop() {
        if tree.is_leaf(v) {
            continue;
        }

        let row = tree.row(v);
        let table = mtable.table(v, n);
        let (_cost, join_u_side, join_w_side) = table.get(u, w);

        let u_on_row_side = table.is_row_side(u);
        let (u_child, w_child) =
            if u_on_row_side { (row.left, row.right) } else { (row.right, row.left) };
        swaps[v as usize - n] = !u_on_row_side;

        stack.push((u_child, u, join_u_side));
        stack.push((w_child, join_w_side, w));
    }

    swaps
}
