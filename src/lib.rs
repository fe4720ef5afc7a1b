//! Optimal leaf ordering (OLO) for binary hierarchical clustering trees.
//!
//! Given a binary linkage tree whose leaves are in an arbitrary order and a
//! pairwise distance matrix over those leaves, [`optimal_leaf_ordering`]
//! produces a topologically equivalent tree — the same merges, the same
//! heights and cluster sizes — whose leaves are arranged left to right so
//! that the sum of distances between adjacent leaves is minimized.
//!
//! This is the Bar-Joseph / Gifford / Jaakkola dynamic-programming
//! algorithm: a naive search over the `2^(n-1)` topology-preserving
//! orderings is infeasible past tiny trees, so the crate instead fills a
//! memoized cost table bottom-up in `O(n^3)` time and `O(n^2)` memory, then
//! reconstructs the optimal ordering top-down.
//!
//! Clustering itself, distance computation, and plotting are out of scope:
//! this crate consumes a linkage tree and a distance matrix and hands back
//! a reordered linkage tree.

mod distance;
mod dp;
mod error;
mod linkage;
mod mtable;
mod output;
mod parallelism;
mod reconstruct;
mod request;

pub use distance::DistanceMatrix;
pub use error::{Error, Result};
pub use linkage::{build_tree, LinkageMatrix, LinkageRow, NodeId, Tree};
pub use parallelism::{Parallelism, Progress};
pub use request::OloRequest;

/// Compute the optimal leaf ordering of `z` against `d`, using the default
/// [`OloRequest`] settings (parallel fill above a small size threshold, no
/// cancellation, no progress reporting).
///
/// `z` is an `(n - 1) x 4` linkage matrix: row `i` describes internal node
/// `n + i`, whose children are either leaf indices (`< n`) or earlier
/// internal node indices. `d` is the pairwise distance matrix over the `n`
/// leaves, in either square or condensed form; `n` is inferred from `d`'s
/// length.
///
/// Returns a linkage matrix of the same shape, with the same heights and
/// cluster sizes, and children swapped at whichever internal nodes realize
/// the minimal adjacent-leaf-distance leaf order.
pub fn optimal_leaf_ordering(z: LinkageMatrix, d: DistanceMatrix) -> Result<LinkageMatrix> {
    OloRequest::new(z, d).run()
}
