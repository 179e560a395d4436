//! Cascade rules: deriving each layer from the one above it
//!
//! Every layer below the top is a pure function of its parent layer. A cell
//! whose parents are not all defined stays unset; nothing is ever guessed.

use super::cell::{Cell, LayerSize};
use super::grid::GridCascade;
use crate::config::Shape;

/// A difference rule plus the geometry it runs on
pub trait Cascade {
    /// Size of `layer` for a top of width `top_size`
    fn layer_size(&self, top_size: usize, layer: usize) -> LayerSize;

    /// Compute one layer from its parent (row-major cells)
    fn derive_layer(&self, parent: &[Cell], parent_size: LayerSize) -> Vec<Cell>;
}

/// The 1-D triangle: `child[i] = |parent[i] - parent[i + 1]|`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearCascade;

impl Cascade for LinearCascade {
    fn layer_size(&self, top_size: usize, layer: usize) -> LayerSize {
        LayerSize {
            rows: 1,
            cols: top_size - layer,
        }
    }

    fn derive_layer(&self, parent: &[Cell], _parent_size: LayerSize) -> Vec<Cell> {
        parent.windows(2).map(|w| w[0].abs_diff(w[1])).collect()
    }
}

/// Rule for the given shape
pub fn cascade_for(shape: Shape) -> &'static dyn Cascade {
    match shape {
        Shape::Triangle => &LinearCascade,
        Shape::Grid => &GridCascade,
    }
}

/// Derive every layer below `top`, returning all layers including `top`
pub fn derive_all(cascade: &dyn Cascade, top_size: usize, top: Vec<Cell>) -> Vec<Vec<Cell>> {
    let mut layers = Vec::with_capacity(top_size);
    layers.push(top);
    for layer in 1..top_size {
        let parent_size = cascade.layer_size(top_size, layer - 1);
        let next = cascade.derive_layer(&layers[layer - 1], parent_size);
        layers.push(next);
    }
    layers
}
