//! Square canvas of paintable cells.
//!
//! A [`Grid`] holds `resolution * resolution` cells in row-major order, where
//! index `i` is the cell at row `i / resolution`, column `i % resolution`, with
//! (0, 0) at the top-left. The cell count never changes after creation; a new
//! resolution always means a new `Grid`.

use image::Rgba;
use thiserror::Error;

use crate::color::TRANSPARENT;

/// Largest side length accepted unless configured otherwise.
pub const DEFAULT_MAX_RESOLUTION: u32 = 64;

/// Side length of the canvas at startup.
pub const DEFAULT_RESOLUTION: u32 = 22;

/// Hard cap on any side length, whatever the configured limit.
pub const MAX_CONFIGURABLE_RESOLUTION: u32 = 4096;

/// Bounds applied when creating or resizing a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLimits {
    /// Largest allowed side length (inclusive). The smallest is always 1.
    pub max_resolution: u32,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self { max_resolution: DEFAULT_MAX_RESOLUTION }
    }
}

impl GridLimits {
    /// Whether `resolution` is within `1..=max_resolution`.
    pub fn allows(&self, resolution: i64) -> bool {
        resolution >= 1 && resolution <= i64::from(self.max_resolution)
    }
}

/// Error type for grid operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Requested side length is outside `1..=max`
    #[error("invalid resolution {resolution}, expected 1-{max}")]
    InvalidResolution { resolution: i64, max: u32 },
    /// Cell index is negative or not below `resolution * resolution`
    #[error("cell index {index} out of range for {resolution}x{resolution} grid")]
    IndexOutOfRange { index: i64, resolution: u32 },
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintState {
    /// Never painted, or erased. Exported as transparent.
    #[default]
    Unset,
    /// Painted with a color.
    Painted(Rgba<u8>),
}

impl PaintState {
    /// Effective color: the painted color, or transparent for unset cells.
    pub fn color(self) -> Rgba<u8> {
        match self {
            PaintState::Unset => TRANSPARENT,
            PaintState::Painted(color) => color,
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, PaintState::Painted(_))
    }
}

/// A square grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    resolution: u32,
    cells: Vec<PaintState>,
}

impl Grid {
    /// Create a grid with `resolution * resolution` unset cells.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidResolution` if `resolution` is 0 or larger
    /// than `limits.max_resolution` or [`MAX_CONFIGURABLE_RESOLUTION`].
    pub fn new(resolution: u32, limits: GridLimits) -> Result<Self, GridError> {
        let count = usize::try_from(resolution)
            .ok()
            .and_then(|n| n.checked_mul(n))
            .filter(|_| resolution <= MAX_CONFIGURABLE_RESOLUTION);
        match count {
            Some(count) if limits.allows(i64::from(resolution)) => {
                Ok(Self { resolution, cells: vec![PaintState::Unset; count] })
            }
            _ => Err(GridError::InvalidResolution {
                resolution: i64::from(resolution),
                max: limits.max_resolution.min(MAX_CONFIGURABLE_RESOLUTION),
            }),
        }
    }

    /// Side length of the grid.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Number of cells, always `resolution * resolution`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[PaintState] {
        &self.cells
    }

    /// Number of painted cells.
    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_set()).count()
    }

    /// Convert an index coming from outside the crate (possibly negative) into
    /// a valid cell index.
    pub fn checked_index(&self, index: i64) -> Result<usize, GridError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or(GridError::IndexOutOfRange { index, resolution: self.resolution })
    }

    /// Flat index of the cell at (`row`, `col`).
    pub fn index_of(&self, row: u32, col: u32) -> Result<usize, GridError> {
        if row >= self.resolution || col >= self.resolution {
            let index = i64::from(row) * i64::from(self.resolution) + i64::from(col);
            return Err(GridError::IndexOutOfRange { index, resolution: self.resolution });
        }
        Ok(row as usize * self.resolution as usize + col as usize)
    }

    /// (row, col) of a flat index. Does not check bounds.
    pub fn row_col(&self, index: usize) -> (u32, u32) {
        let n = self.resolution as usize;
        ((index / n) as u32, (index % n) as u32)
    }

    /// State of the cell at `index`.
    pub fn state(&self, index: usize) -> Result<PaintState, GridError> {
        self.cells.get(index).copied().ok_or_else(|| self.out_of_range(index))
    }

    /// Paint the cell at `index` with `color`.
    pub fn paint(&mut self, index: usize, color: Rgba<u8>) -> Result<(), GridError> {
        self.set(index, PaintState::Painted(color))
    }

    /// Reset the cell at `index` to unset.
    pub fn erase(&mut self, index: usize) -> Result<(), GridError> {
        self.set(index, PaintState::Unset)
    }

    /// Reset every cell to unset. The resolution is kept.
    pub fn clear(&mut self) {
        self.cells.fill(PaintState::Unset);
    }

    /// Effective color of the cell at `index`; unset cells are transparent.
    pub fn resolve(&self, index: usize) -> Result<Rgba<u8>, GridError> {
        self.state(index).map(PaintState::color)
    }

    fn set(&mut self, index: usize, state: PaintState) -> Result<(), GridError> {
        if index >= self.cells.len() {
            return Err(self.out_of_range(index));
        }
        self.cells[index] = state;
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> GridError {
        GridError::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            resolution: self.resolution,
        }
    }
}
