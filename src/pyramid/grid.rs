//! 2-D cascade over shrinking square grids
//!
//! Layer `l` is `(N - l) x (N - l)`. Cell `(i, j)` reads its parent at
//! `(i, j)` together with the neighbours below `(i + 1, j)` and to the
//! right `(i, j + 1)`, and takes the larger of the two differences.

use super::cascade::Cascade;
use super::cell::{Cell, LayerSize};

#[derive(Debug, Clone, Copy, Default)]
pub struct GridCascade;

impl Cascade for GridCascade {
    fn layer_size(&self, top_size: usize, layer: usize) -> LayerSize {
        let side = top_size - layer;
        LayerSize { rows: side, cols: side }
    }

    fn derive_layer(&self, parent: &[Cell], parent_size: LayerSize) -> Vec<Cell> {
        let n = parent_size.cols;
        let m = n.saturating_sub(1);
        let mut out = Vec::with_capacity(m * m);
        for i in 0..m {
            for j in 0..m {
                let here = parent[i * n + j];
                let down = parent[(i + 1) * n + j];
                let right = parent[i * n + j + 1];
                out.push(grid_cell(here, down, right));
            }
        }
        out
    }
}

/// `max(|here - down|, |here - right|)`; unset unless all three are defined
fn grid_cell(here: Cell, down: Cell, right: Cell) -> Cell {
    match (here.abs_diff(down), here.abs_diff(right)) {
        (Cell::Defined(a), Cell::Defined(b)) => Cell::Defined(a.max(b)),
        _ => Cell::Unset,
    }
}
