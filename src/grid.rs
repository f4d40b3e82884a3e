// Static board geometry

use serde::Serialize;

use crate::types::Cell;

/// Square board of `cell_count` x `cell_count` cells, each `cell_size` pixels wide.
/// Created once per session and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grid {
    cell_size: u32,
    cell_count: i32,
}

impl Grid {
    /// Both arguments must be non-zero; `Config::validate` enforces it for loaded configs.
    pub fn new(cell_size: u32, cell_count: u32) -> Self {
        Grid {
            cell_size: cell_size.max(1),
            cell_count: cell_count.clamp(1, i32::MAX as u32) as i32,
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn cell_count(&self) -> i32 {
        self.cell_count
    }

    /// Board side in pixels
    pub fn side_length(&self) -> u32 {
        self.cell_size.saturating_mul(self.cell_count as u32)
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cell_count && cell.y < self.cell_count
    }

    /// Top-left pixel of a cell
    pub fn cell_to_pixel(&self, cell: &Cell) -> (i64, i64) {
        let size = self.cell_size as i64;
        (cell.x as i64 * size, cell.y as i64 * size)
    }

    /// Cell containing a pixel, if it lies on the board
    pub fn pixel_to_cell(&self, px: i64, py: i64) -> Option<Cell> {
        if px < 0 || py < 0 {
            return None;
        }
        let size = self.cell_size as i64;
        let cell = Cell::new((px / size) as i32, (py / size) as i32);
        self.in_bounds(&cell).then_some(cell)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count).flat_map(move |y| (0..self.cell_count).map(move |x| Cell::new(x, y)))
    }

    pub fn area(&self) -> usize {
        (self.cell_count as usize) * (self.cell_count as usize)
    }
}
