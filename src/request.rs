//! The builder-style entry point: a plain data struct carrying the inputs
//! and optional ambient knobs (parallelism, cancellation, progress), mirrors
//! how a configurable, low-ceremony call is exposed elsewhere in this
//! ecosystem as a builder over a plain call.

use std::sync::atomic::AtomicBool;

use tracing::{debug, info_span};

use crate::distance::{DistanceMatrix, Distances};
use crate::error::{Error, Result};
use crate::linkage::{build_tree, LinkageMatrix};
use crate::parallelism::{Parallelism, Progress};
use crate::{dp, output, reconstruct};

/// A single `optimal_leaf_ordering` call, with its ambient knobs.
///
/// `z` and `d` are required; everything else defaults to the sequential-
/// unless-large, no-cancellation, no-progress behavior that
/// [`crate::optimal_leaf_ordering`] uses.
pub struct OloRequest<'a> {
    z: LinkageMatrix,
    d: DistanceMatrix,
    parallelism: Parallelism,
    cancel: Option<&'a AtomicBool>,
    progress: Option<&'a mut dyn FnMut(Progress)>,
}

impl<'a> OloRequest<'a> {
    pub fn new(z: LinkageMatrix, d: DistanceMatrix) -> OloRequest<'a> {
        OloRequest { z, d, parallelism: Parallelism::default(), cancel: None, progress: None }
    }

    /// Override the default [`Parallelism`].
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Check `flag` once per internal-node fill; when set, the call aborts
    /// with [`Error::Cancelled`] instead of completing.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Invoke `callback` after each internal node's M-table fill completes.
    /// Purely observational; never affects the result.
    pub fn progress(mut self, callback: &'a mut dyn FnMut(Progress)) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Run the call, consuming the request.
    pub fn run(self) -> Result<LinkageMatrix> {
        let n = self.d.infer_n()?;
        let span = info_span!("optimal_leaf_ordering", n);
        let _enter = span.enter();

        if n == 0 {
            return Err(Error::EmptyInput { n: 0 });
        }
        if n == 1 {
            if !self.z.is_empty() {
                return Err(Error::MalformedTree {
                    reason: format!("expected 0 rows for 1 leaf, got {}", self.z.len()),
                });
            }
            debug!("single leaf, returning input unchanged");
            return Ok(self.z);
        }

        let dist = Distances::new(self.d, n)?;
        let tree = build_tree(self.z, n)?;
        debug!(n, "tree built, filling cost table");

        let mtable = dp::fill(&tree, &dist, self.parallelism, self.cancel, self.progress)?;
        debug!("cost table filled, reconstructing optimal order");

        let swaps = reconstruct::reconstruct(&tree, &mtable);
        Ok(output::apply_swaps(&tree, &swaps))
    }
}
