//! Pyramid model: layer geometry and cell storage
//!
//! Layer 0 is the only writable layer. Every write re-derives all layers
//! below it from scratch; the cell count is small enough that incremental
//! updates are never needed.

use serde::{Deserialize, Serialize};

use super::cascade::{cascade_for, derive_all};
use super::cell::{Cell, CellCoord, LayerSize};
use crate::config::Shape;
use crate::consts::MAX_TOP_SIZE;
use crate::error::{PyramidError, Result};

/// All layers of one puzzle, top (widest) first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PyramidRepr")]
pub struct Pyramid {
    shape: Shape,
    top_size: usize,
    max_value: u32,
    /// Row-major cells per layer
    layers: Vec<Vec<Cell>>,
}

impl Pyramid {
    /// Create an empty pyramid (every cell unset)
    pub fn new(shape: Shape, top_size: usize, max_value: u32) -> Self {
        let cascade = cascade_for(shape);
        let layers = (0..top_size)
            .map(|l| vec![Cell::Unset; cascade.layer_size(top_size, l).cells()])
            .collect();
        Self {
            shape,
            top_size,
            max_value,
            layers,
        }
    }

    /// Build a triangle from a fully specified top row
    pub fn from_top_row(values: &[u32], max_value: u32) -> Result<Self> {
        let mut pyramid = Self::new(Shape::Triangle, values.len(), max_value);
        pyramid.set_top_row(values)?;
        Ok(pyramid)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn top_size(&self) -> usize {
        self.top_size
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_size(&self, layer: usize) -> Result<LayerSize> {
        self.check_layer(layer)?;
        Ok(cascade_for(self.shape).layer_size(self.top_size, layer))
    }

    /// Read a cell by flat row-major index within its layer
    pub fn get(&self, layer: usize, index: usize) -> Result<Cell> {
        let cells = self.layer(layer)?;
        cells
            .get(index)
            .copied()
            .ok_or_else(|| PyramidError::out_of_range("index", index, cells.len()))
    }

    /// Read a cell by row and column
    pub fn get_at(&self, layer: usize, row: usize, col: usize) -> Result<Cell> {
        let index = self.flat_index(layer, row, col)?;
        Ok(self.layers[layer][index])
    }

    /// Cells of one layer, row-major
    pub fn layer(&self, layer: usize) -> Result<&[Cell]> {
        self.check_layer(layer)?;
        Ok(&self.layers[layer])
    }

    /// The writable layer
    pub fn top_row(&self) -> &[Cell] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every cell with its coordinate, top layer first
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let cascade = cascade_for(self.shape);
        let top_size = self.top_size;
        self.layers.iter().enumerate().flat_map(move |(l, cells)| {
            let cols = cascade.layer_size(top_size, l).cols;
            cells
                .iter()
                .enumerate()
                .map(move |(i, &cell)| (CellCoord::new(l, i / cols, i % cols), cell))
        })
    }

    /// Cells below the top layer
    pub fn derived_cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        self.cells().filter(|(coord, _)| coord.layer > 0)
    }

    pub fn derived_cell_count(&self) -> usize {
        self.layers.iter().skip(1).map(Vec::len).sum()
    }

    /// Write one top cell by flat index and re-derive. Rejected writes leave
    /// the pyramid untouched.
    pub fn set_top_value(&mut self, index: usize, value: i64) -> Result<()> {
        let value = self.check_value(value)?;
        let width = self.top_row().len();
        if index >= width {
            return Err(PyramidError::out_of_range("top index", index, width));
        }
        self.layers[0][index] = Cell::Defined(value);
        self.rederive();
        Ok(())
    }

    /// Write one top cell by row and column and re-derive
    pub fn set_top_at(&mut self, row: usize, col: usize, value: i64) -> Result<()> {
        let value = self.check_value(value)?;
        let index = self.flat_index(0, row, col)?;
        self.layers[0][index] = Cell::Defined(value);
        self.rederive();
        Ok(())
    }

    /// Replace the whole top layer at once and re-derive
    pub fn set_top_row(&mut self, values: &[u32]) -> Result<()> {
        let width = self.top_row().len();
        if values.len() != width {
            return Err(PyramidError::out_of_range("top row length", values.len(), width));
        }
        let top = values
            .iter()
            .map(|&v| self.check_value(i64::from(v)).map(Cell::Defined))
            .collect::<Result<Vec<_>>>()?;
        if let Some(first) = self.layers.first_mut() {
            *first = top;
            self.rederive();
        }
        Ok(())
    }

    /// Unset every cell in every layer
    pub fn clear(&mut self) {
        for cells in &mut self.layers {
            cells.fill(Cell::Unset);
        }
    }

    /// Recompute layers 1.. from the top layer
    fn rederive(&mut self) {
        let top = std::mem::take(&mut self.layers[0]);
        self.layers = derive_all(cascade_for(self.shape), self.top_size, top);
    }

    fn check_value(&self, value: i64) -> Result<u32> {
        if value < 1 || value > i64::from(self.max_value) {
            return Err(PyramidError::InvalidValue {
                value: value as f64,
                max: self.max_value,
            });
        }
        Ok(value as u32)
    }

    fn check_layer(&self, layer: usize) -> Result<()> {
        if layer >= self.layers.len() {
            return Err(PyramidError::out_of_range("layer", layer, self.layers.len()));
        }
        Ok(())
    }

    fn flat_index(&self, layer: usize, row: usize, col: usize) -> Result<usize> {
        let size = self.layer_size(layer)?;
        if row >= size.rows {
            return Err(PyramidError::out_of_range("row", row, size.rows));
        }
        if col >= size.cols {
            return Err(PyramidError::out_of_range("col", col, size.cols));
        }
        Ok(row * size.cols + col)
    }
}

/// Unchecked wire form; geometry and derived layers are verified on the way in
#[derive(Deserialize)]
struct PyramidRepr {
    shape: Shape,
    top_size: usize,
    max_value: u32,
    layers: Vec<Vec<Cell>>,
}

impl TryFrom<PyramidRepr> for Pyramid {
    type Error = PyramidError;

    fn try_from(repr: PyramidRepr) -> Result<Self> {
        if repr.top_size > MAX_TOP_SIZE {
            return Err(PyramidError::out_of_range("top size", repr.top_size, MAX_TOP_SIZE));
        }
        let cascade = cascade_for(repr.shape);
        if repr.layers.len() != repr.top_size {
            return Err(PyramidError::out_of_range("layer count", repr.layers.len(), repr.top_size));
        }
        for (l, cells) in repr.layers.iter().enumerate() {
            let expected = cascade.layer_size(repr.top_size, l).cells();
            if cells.len() != expected {
                return Err(PyramidError::out_of_range("layer length", cells.len(), expected));
            }
        }
        let top = repr.layers.first().cloned().unwrap_or_default();
        let derived = derive_all(cascade, repr.top_size, top);
        if repr.top_size > 0 && derived != repr.layers {
            return Err(PyramidError::InvalidConfig(
                "derived layers do not follow from the top layer".into(),
            ));
        }
        Ok(Self {
            shape: repr.shape,
            top_size: repr.top_size,
            max_value: repr.max_value,
            layers: repr.layers,
        })
    }
}
