//! The memoized cost table `M[v][u][w]`.
//!
//! Storage is per-node and rectangular rather than a flat `n x n x (2n-1)`
//! cube: `M[v][u][w]` is only ever meaningful for `u` and `w` straddling
//! `v`'s two children, so each internal node gets its own
//! `|leaves(left)| x |leaves(right)|` buffer. Summed over the tree this is
//! `Theta(n^2)`, since every unordered leaf pair crosses exactly one
//! internal node's children.
//!
//! Costs and argmin pointers are kept in separate flat buffers
//! (struct-of-arrays) so the hot inner DP loop, which only ever touches
//! costs, stays cache-dense; the argmin buffer is read only during
//! reconstruction.

use std::collections::HashMap;
use std::mem::size_of;

use crate::error::{Error, Result};
use crate::linkage::{NodeId, Tree};

/// The rectangular cost (and argmin) table for a single internal node.
#[derive(Debug)]
pub struct CostTable {
    rows: Vec<NodeId>,
    cols: Vec<NodeId>,
    row_index: HashMap<NodeId, u32>,
    col_index: HashMap<NodeId, u32>,
    costs: Vec<f64>,
    // join[idx] = [m*, k*]: the leaf that was adjacent to the row-side
    // boundary and the leaf adjacent to the column-side boundary, at the
    // optimum for that cell.
    join: Vec<[NodeId; 2]>,
}

impl CostTable {
    /// Allocate a fresh `|rows| x |cols|` buffer, falling back to
    /// [`Error::OutOfMemory`] instead of aborting the process when the
    /// allocation can't be satisfied.
    fn new(rows: Vec<NodeId>, cols: Vec<NodeId>) -> Result<CostTable> {
        let row_index = rows.iter().enumerate().map(|(i, &v)| (v, i as u32)).collect();
        let col_index = cols.iter().enumerate().map(|(i, &v)| (v, i as u32)).collect();
        let size = rows.len() * cols.len();

        let mut costs = Vec::new();
        costs
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { bytes: size * size_of::<f64>() })?;
        costs.resize(size, f64::INFINITY);

        let mut join = Vec::new();
        join.try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { bytes: size * size_of::<[NodeId; 2]>() })?;
        join.resize(size, [NodeId::MAX; 2]);

        Ok(CostTable { rows, cols, row_index, col_index, costs, join })
    }

    #[inline]
    fn flat(&self, r: u32, c: u32) -> usize {
        r as usize * self.cols.len() + c as usize
    }

    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn cols(&self) -> &[NodeId] {
        &self.cols
    }

    /// Whether `leaf` is a boundary of the row side (`leaves(left)`) of this
    /// node, as opposed to the column side (`leaves(right)`). Used during
    /// reconstruction to tell which child a boundary leaf belongs to
    /// without re-scanning `leaves_of`.
    pub fn is_row_side(&self, leaf: NodeId) -> bool {
        self.row_index.contains_key(&leaf)
    }

    /// Write `M[v][u][w] = cost`, with `u` on the row side (`leaves(left)`)
    /// and `w` on the column side (`leaves(right)`). `join_u_side` and
    /// `join_w_side` are the leaves that achieved this cost, continuing
    /// recursion into `u`'s and `w`'s respective children.
    pub fn set(&mut self, u: NodeId, w: NodeId, cost: f64, join_u_side: NodeId, join_w_side: NodeId) {
        let r = self.row_index[&u];
        let c = self.col_index[&w];
        let idx = self.flat(r, c);
        self.costs[idx] = cost;
        self.join[idx] = [join_u_side, join_w_side];
    }

    /// Read `M[v][u][w]` for `u, w` in either orientation, returning
    /// `(cost, join_on_u_side, join_on_w_side)` — the join leaf to carry on
    /// recursing into whichever child `u` (resp. `w`) belongs to.
    ///
    /// `u` and `w` are only a valid boundary pair of this node when they lie
    /// in opposite children; any other pair (including `u == w`, or both on
    /// the same side) is undefined per the data model and reported back as
    /// the sentinel `f64::INFINITY`, which a `min` over candidates then
    /// harmlessly discards.
    pub fn get(&self, u: NodeId, w: NodeId) -> (f64, NodeId, NodeId) {
        if let (Some(&r), Some(&c)) = (self.row_index.get(&u), self.col_index.get(&w)) {
            let idx = self.flat(r, c);
            let [m, k] = self.join[idx];
            (self.costs[idx], m, k)
        } else if let (Some(&r), Some(&c)) = (self.row_index.get(&w), self.col_index.get(&u)) {
            let idx = self.flat(r, c);
            let [m, k] = self.join[idx];
            // Stored orientation has `w` on the row side and `u` on the
            // column side; by M[v][u][w] = M[v][w][u], swap the join pair
            // back so the first element still continues on `u`'s side.
            (self.costs[idx], k, m)
        } else {
            (f64::INFINITY, NodeId::MAX, NodeId::MAX)
        }
    }

    /// The `(u, w)` pair minimizing this table, with `u` on the row side.
    pub fn argmin(&self) -> (NodeId, NodeId, f64) {
        let mut best = (self.rows[0], self.cols[0], f64::INFINITY);
        for (r, &u) in self.rows.iter().enumerate() {
            for (c, &w) in self.cols.iter().enumerate() {
                let cost = self.costs[self.flat(r as u32, c as u32)];
                if cost < best.2 || (cost == best.2 && (u, w) < (best.0, best.1)) {
                    best = (u, w, cost);
                }
            }
        }
        best
    }
}

/// The full memoized table, one [`CostTable`] per internal node.
#[derive(Debug)]
pub struct MTable {
    tables: Vec<CostTable>,
}

impl MTable {
    /// Allocate one rectangular buffer per internal node of `tree`.
    pub fn alloc(tree: &Tree) -> Result<MTable> {
        let mut tables = Vec::new();
        tables
            .try_reserve_exact(tree.rows().len())
            .map_err(|_| Error::OutOfMemory { bytes: tree.rows().len() * size_of::<CostTable>() })?;
        for row in tree.rows() {
            tables.push(CostTable::new(
                tree.leaves_of(row.left).to_vec(),
                tree.leaves_of(row.right).to_vec(),
            )?);
        }
        Ok(MTable { tables })
    }

    pub fn table(&self, v: NodeId, n_leaves: usize) -> &CostTable {
        &self.tables[v as usize - n_leaves]
    }

    /// Replace the buffer for internal node `v` with a fully computed one.
    pub fn set_table(&mut self, v: NodeId, n_leaves: usize, table: CostTable) {
        self.tables[v as usize - n_leaves] = table;
    }

}
