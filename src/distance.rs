//! The read-only, symmetric, zero-diagonal distance oracle `d(i, j)`.

use crate::error::{Error, Result};

/// A pairwise distance matrix over `n` leaves, supplied in either layout.
#[derive(Debug, Clone)]
pub enum DistanceMatrix {
    /// Row-major, symmetric, zero-diagonal, length `n * n`.
    Square(Vec<f64>),
    /// Upper-triangle, row-major, length `n * (n - 1) / 2`.
    Condensed(Vec<f64>),
}

/// A validated distance oracle: `d(i, j)` in O(1), addressed internally as
/// square regardless of the layout the caller supplied.
#[derive(Debug, Clone)]
pub struct Distances {
    n: usize,
    form: ValidatedForm,
}

#[derive(Debug, Clone)]
enum ValidatedForm {
    Square(Vec<f64>),
    Condensed(Vec<f64>),
}

impl DistanceMatrix {
    /// The leaf count implied by this matrix's length alone, before any
    /// value validation: square lengths must be a perfect square; condensed
    /// lengths must be a triangular number `n * (n - 1) / 2`.
    ///
    /// A condensed array of length zero encodes both `n = 0` and `n = 1`
    /// (neither has any off-diagonal entries); this resolves the ambiguity
    /// in favor of `n = 1`, since that is the only one of the two with a
    /// linkage tree shape to speak of, and a caller that genuinely means
    /// "zero leaves" can say so unambiguously with `Square(vec![])`.
    pub fn infer_n(&self) -> Result<usize> {
        match self {
            DistanceMatrix::Square(data) => {
                let len = data.len();
                let n = (len as f64).sqrt().round() as usize;
                if n * n == len {
                    Ok(n)
                } else {
                    Err(Error::DistanceShapeMismatch {
                        n,
                        reason: format!("{len} entries is not a perfect square (square form)"),
                    })
                }
            }
            DistanceMatrix::Condensed(data) => {
                let len = data.len();
                if len == 0 {
                    return Ok(1);
                }
                let n = (((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round()) as usize;
                if n >= 1 && n * (n - 1) / 2 == len {
                    Ok(n)
                } else {
                    Err(Error::DistanceShapeMismatch {
                        n,
                        reason: format!("{len} entries is not a triangular number (condensed form)"),
                    })
                }
            }
        }
    }
}

impl Distances {
    /// Validate `matrix` against `n` leaves: the shape must match exactly
    /// one of the two accepted layouts, and every entry must be finite and
    /// nonnegative (symmetry and a zero diagonal are assumed, per contract,
    /// not rechecked).
    pub fn new(matrix: DistanceMatrix, n: usize) -> Result<Distances> {
        match matrix {
            DistanceMatrix::Square(data) => {
                if data.len() != n * n {
                    return Err(Error::DistanceShapeMismatch {
                        n,
                        reason: format!(
                            "square form needs {} entries, got {}",
                            n * n,
                            data.len()
                        ),
                    });
                }
                scan(&data, n, true)?;
                Ok(Distances { n, form: ValidatedForm::Square(data) })
            }
            DistanceMatrix::Condensed(data) => {
                let expected = n * n.saturating_sub(1) / 2;
                if data.len() != expected {
                    return Err(Error::DistanceShapeMismatch {
                        n,
                        reason: format!(
                            "condensed form needs {expected} entries, got {}",
                            data.len()
                        ),
                    });
                }
                scan(&data, n, false)?;
                Ok(Distances { n, form: ValidatedForm::Condensed(data) })
            }
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// `D[i][j]`, `i, j` in `[0, n)`.
    #[inline]
    pub fn d(&self, i: u32, j: u32) -> f64 {
        let (i, j) = (i as usize, j as usize);
        debug_assert!(i < self.n && j < self.n);
        if i == j {
            return 0.0;
        }
        match &self.form {
            ValidatedForm::Square(data) => data[i * self.n + j],
            ValidatedForm::Condensed(data) => data[condensed_index(i, j, self.n)],
        }
    }
}

/// Maps `(i, j)`, `i != j`, to the offset of the corresponding entry in a
/// condensed (upper-triangle, row-major) distance array.
fn condensed_index(i: usize, j: usize, n: usize) -> usize {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    lo * (2 * n - lo - 1) / 2 + (hi - lo - 1)
}

/// Single pre-scan for NaN, infinite, or negative entries. For the square
/// form, the diagonal is skipped (it is defined to be zero by contract, not
/// re-derived from the supplied data).
fn scan(data: &[f64], n: usize, square: bool) -> Result<()> {
    if square {
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let v = data[i * n + j];
                check(v, i, j)?;
            }
        }
    } else {
        let mut idx = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                check(data[idx], i, j)?;
                idx += 1;
            }
        }
    }
    Ok(())
}

#[inline]
fn check(v: f64, i: usize, j: usize) -> Result<()> {
    if v.is_nan() || v.is_infinite() || v < 0.0 {
        return Err(Error::InvalidDistance { i, j, value: v });
    }
    Ok(())
}
