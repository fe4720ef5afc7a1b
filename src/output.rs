//! Writes the reconstruction's per-node swap decisions back out as a
//! linkage matrix in the same shape as the input: same row count, same
//! heights and sizes, children possibly swapped.

use crate::linkage::{LinkageMatrix, LinkageRow, Tree};

/// Produce `Z'` from `tree`'s original rows and `swaps` (one bool per
/// internal node, in row order).
pub fn apply_swaps(tree: &Tree, swaps: &[bool]) -> LinkageMatrix {
    debug_assert_eq!(swaps.len(), tree.rows().len());
    tree.rows()
        .iter()
        .zip(swaps)
        .map(|(row, &swap)| {
            if swap {
                LinkageRow {
                    left: row.right,
                    right: row.left,
                    height: row.height,
                    size: row.size,
                }
            } else {
                *row
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkage::build_tree;

    fn row(left: u32, right: u32, height: f64, size: u32) -> LinkageRow {
        LinkageRow { left, right, height, size }
    }

    #[test]
    fn swaps_only_the_flagged_rows() {
        let z = vec![row(0, 1, 1.0, 2), row(2, 3, 1.0, 2), row(4, 5, 2.0, 4)];
        let tree = build_tree(z, 4).unwrap();
        let out = apply_swaps(&tree, &[false, true, false]);
        assert_eq!(out[0], row(0, 1, 1.0, 2));
        assert_eq!(out[1], row(3, 2, 1.0, 2));
        assert_eq!(out[2], row(4, 5, 2.0, 4));
    }

    #[test]
    fn preserves_heights_and_sizes() {
        let z = vec![row(0, 1, 0.5, 2), row(2, 3, 1.5, 2), row(4, 5, 3.0, 4)];
        let tree = build_tree(z.clone(), 4).unwrap();
        let out = apply_swaps(&tree, &[true, true, true]);
        for (orig, swapped) in z.iter().zip(&out) {
            assert_eq!(orig.height, swapped.height);
            assert_eq!(orig.size, swapped.size);
        }
    }
}
