//! Bottom-up fill of the M-table.
//!
//! Nodes are filled in strictly increasing internal-node-index order
//! (`n_leaves .. 2*n_leaves - 1`), which a linkage matrix always makes a
//! valid topological order: row `i` (internal node `n_leaves + i`) may only
//! reference children with a smaller index. The fill is therefore a single
//! loop, never a recursive tree walk, so stack depth never scales with `n`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::distance::Distances;
use crate::error::{Error, Result};
use crate::linkage::{NodeId, Tree};
use crate::mtable::{CostTable, MTable};
use crate::parallelism::{Parallelism, Progress};

/// Fill the whole M-table for `tree` against `dist`.
pub fn fill(
    tree: &Tree,
    dist: &Distances,
    parallelism: Parallelism,
    cancel: Option<&AtomicBool>,
    mut progress: Option<&mut dyn FnMut(Progress)>,
) -> Result<MTable> {
    let n = tree.n_leaves();
    let mut mtable = MTable::alloc(tree)?;
    let nodes_total = tree.rows().len();

    match parallelism {
        Parallelism::Sequential => {
            for (done, row_idx) in (0..nodes_total).enumerate() {
                let v = (n + row_idx) as NodeId;
                check_cancel(cancel)?;
                trace!(node = v, "filling node");
                let table = compute_node(tree, dist, &mtable, v)?;
                mtable.set_table(v, n, table);
                report(&mut progress, done + 1, nodes_total);
            }
        }
        Parallelism::Rayon { min_subtree_leaves } => {
            let waves = group_by_height(tree);
            let mut done = 0usize;
            for wave in waves {
                check_cancel(cancel)?;
                let total_leaves: usize =
                    wave.iter().map(|&v| subtree_leaf_count(tree, v)).sum();
                debug!(wave_size = wave.len(), total_leaves, "filling wave");

                let results: Vec<(NodeId, CostTable)> =
                    if wave.len() > 1 && total_leaves >= min_subtree_leaves {
                        wave.par_iter()
                            .map(|&v| compute_node(tree, dist, &mtable, v).map(|t| (v, t)))
                            .collect::<Result<Vec<_>>>()?
                    } else {
                        wave.iter()
                            .map(|&v| compute_node(tree, dist, &mtable, v).map(|t| (v, t)))
                            .collect::<Result<Vec<_>>>()?
                    };

                for (v, table) in results {
                    mtable.set_table(v, n, table);
                    done += 1;
                    report(&mut progress, done, nodes_total);
                }
            }
        }
    }

    Ok(mtable)
}

fn check_cancel(cancel: Option<&AtomicBool>) -> Result<()> {
    if let Some(flag) = cancel {
        if flag.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }
    }
    Ok(())
}

fn report(progress: &mut Option<&mut dyn FnMut(Progress)>, nodes_done: usize, nodes_total: usize) {
    if let Some(cb) = progress.as_mut() {
        cb(Progress { nodes_done, nodes_total });
    }
}

fn subtree_leaf_count(tree: &Tree, v: NodeId) -> usize {
    tree.leaves_of(v).len()
}

/// Group internal nodes into "waves" by tree height (longest path to a
/// leaf): `height(leaf) = 0`, `height(v) = 1 + max(height(left),
/// height(right))`. Any two nodes of equal height can never be in an
/// ancestor/descendant relationship (height strictly decreases along any
/// root-to-leaf path), so every wave is internally independent and safe to
/// fill concurrently once all earlier (shorter) waves are done.
fn group_by_height(tree: &Tree) -> Vec<Vec<NodeId>> {
    let n = tree.n_leaves();
    let mut height = vec![0u32; 2 * n - 1];
    let mut by_height: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
    for (i, row) in tree.rows().iter().enumerate() {
        let v = (n + i) as NodeId;
        let h = 1 + height[row.left as usize].max(height[row.right as usize]);
        height[v as usize] = h;
        by_height.entry(h).or_default().push(v);
    }
    by_height.into_values().collect()
}

/// Compute the fully-filled [`CostTable`] for internal node `v`, reading
/// only already-finalized children tables out of `mtable`.
fn compute_node(tree: &Tree, dist: &Distances, mtable: &MTable, v: NodeId) -> Result<CostTable> {
    let n = tree.n_leaves();
    let row = tree.row(v);
    let (left, right) = (row.left, row.right);
    let leaves_l = tree.leaves_of(left);
    let leaves_r = tree.leaves_of(right);
    let mut out = CostTable::new(leaves_l.to_vec(), leaves_r.to_vec())?;

    match (tree.is_leaf(left), tree.is_leaf(right)) {
        (true, true) => {
            out.set(left, right, dist.d(left, right), left, right);
        }
        (true, false) => fill_one_leaf_child(&mut out, dist, mtable.table(right, n), left, leaves_r),
        (false, true) => fill_one_leaf_child_mirrored(&mut out, dist, mtable.table(left, n), right, leaves_l),
        (false, false) => {
            let l_table = mtable.table(left, n);
            let r_table = mtable.table(right, n);
            fill_both_internal(&mut out, dist, l_table, r_table, leaves_l, leaves_r);
        }
    }

    Ok(out)
}

/// `left` is a single leaf `u0`; `right` is internal with leaves `leaves_r`.
/// For each final right boundary `w`, find the leaf `k` of `right` that
/// should end up adjacent to `u0`.
fn fill_one_leaf_child(out: &mut CostTable, dist: &Distances, r_table: &CostTable, u0: NodeId, leaves_r: &[NodeId]) {
    for &w in leaves_r {
        let mut best = (f64::INFINITY, u0, NodeId::MAX);
        for &k in leaves_r {
            if k == w {
                continue;
            }
            let (cost_kw, _, _) = r_table.get(k, w);
            if !cost_kw.is_finite() {
                continue;
            }
            let total = dist.d(u0, k) + cost_kw;
            if total < best.0 || (total == best.0 && k < best.2) {
                best = (total, u0, k);
            }
        }
        out.set(u0, w, best.0, best.1, best.2);
    }
}

/// Mirror of [`fill_one_leaf_child`] for `right` being the single leaf
/// `w0` and `left` internal.
fn fill_one_leaf_child_mirrored(out: &mut CostTable, dist: &Distances, l_table: &CostTable, w0: NodeId, leaves_l: &[NodeId]) {
    for &u in leaves_l {
        let mut best = (f64::INFINITY, NodeId::MAX, w0);
        for &m in leaves_l {
            if m == u {
                continue;
            }
            let (cost_um, _, _) = l_table.get(u, m);
            if !cost_um.is_finite() {
                continue;
            }
            let total = cost_um + dist.d(m, w0);
            if total < best.0 || (total == best.0 && m < best.1) {
                best = (total, m, w0);
            }
        }
        out.set(u, w0, best.0, best.1, best.2);
    }
}

/// The general recursive case: both children are internal. Per node this is
/// `O(|L| * |R| * (|L| + |R|))`, which summed over the tree is `O(n^3)`.
///
/// For each `u`, first builds `C(u, k) = min over m in leaves(L) \ {u} of
/// M[L][u][m] + D[m][k]` for every `k` in `leaves(R)`, then combines each
/// `C(u, k)` with `M[R][k][w]` for every `w`.
fn fill_both_internal(
    out: &mut CostTable,
    dist: &Distances,
    l_table: &CostTable,
    r_table: &CostTable,
    leaves_l: &[NodeId],
    leaves_r: &[NodeId],
) {
    let mut c = vec![(f64::INFINITY, NodeId::MAX); leaves_r.len()];
    for &u in leaves_l {
        for slot in c.iter_mut() {
            *slot = (f64::INFINITY, NodeId::MAX);
        }
        for &m in leaves_l {
            if m == u {
                continue;
            }
            let (cost_um, _, _) = l_table.get(u, m);
            if !cost_um.is_finite() {
                continue;
            }
            for (k_idx, &k) in leaves_r.iter().enumerate() {
                let total = cost_um + dist.d(m, k);
                if total < c[k_idx].0 || (total == c[k_idx].0 && m < c[k_idx].1) {
                    c[k_idx] = (total, m);
                }
            }
        }

        for &w in leaves_r {
            let mut best = (f64::INFINITY, NodeId::MAX, NodeId::MAX);
            for (k_idx, &k) in leaves_r.iter().enumerate() {
                if k == w {
                    continue;
                }
                let (c_uk, m_star) = c[k_idx];
                if !c_uk.is_finite() {
                    continue;
                }
                let (cost_kw, _, _) = r_table.get(k, w);
                if !cost_kw.is_finite() {
                    continue;
                }
                let total = c_uk + cost_kw;
                if total < best.0 || (total == best.0 && (m_star, k) < (best.1, best.2)) {
                    best = (total, m_star, k);
                }
            }
            out.set(u, w, best.0, best.1, best.2);
        }
    }
}
