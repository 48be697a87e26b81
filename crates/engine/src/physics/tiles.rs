use thiserror::Error;

use crate::geom::Rect;

use super::SolidQuery;

pub const EMPTY_TILE: i32 = 0;
/// Tile values in `1..SOLID_TILE_LIMIT` block movement; larger values are decoration.
pub const SOLID_TILE_LIMIT: i32 = 16;

/// Room tile grid.
///
/// - Cells are row-major, row 0 is the bottom row.
/// - Cell (x, y) covers world box `[x, x+1) x [y, y+1)`.
/// - Lookups outside the grid read as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileGridError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

impl TileGrid {
    pub fn new(width: u32, height: u32, cells: Vec<i32>) -> Result<Self, TileGridError> {
        let expected = width as usize * height as usize;
        let actual = cells.len();
        if expected != actual {
            return Err(TileGridError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_TILE; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<i32> {
        self.index_of(x, y)
            .and_then(|index| self.cells.get(index).copied())
    }

    pub fn set_tile(&mut self, x: u32, y: u32, value: i32) {
        if let Some(index) = self.index_of(x, y) {
            self.cells[index] = value;
        }
    }

    /// Non-empty cells as `(x, y, value)`, bottom row first.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, i32)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != EMPTY_TILE)
            .map(move |(index, value)| (index as u32 % width, index as u32 / width, *value))
    }

    pub fn is_solid_tile(value: i32) -> bool {
        value > EMPTY_TILE && value < SOLID_TILE_LIMIT
    }

    /// True when any solid cell intersects `rect`.
    pub fn is_box_solid(&self, rect: Rect) -> bool {
        let col_start = rect.pos.x.floor() as i64;
        let col_end = rect.right().ceil() as i64;
        let row_start = rect.pos.y.floor() as i64;
        let row_end = rect.top().ceil() as i64;

        let col_start = col_start.max(0);
        let row_start = row_start.max(0);
        let col_end = col_end.min(self.width as i64);
        let row_end = row_end.min(self.height as i64);

        for row in row_start..row_end {
            for col in col_start..col_end {
                let value = self.tile_at(col as u32, row as u32).unwrap_or(EMPTY_TILE);
                if Self::is_solid_tile(value) {
                    return true;
                }
            }
        }
        false
    }
}

impl SolidQuery for TileGrid {
    fn is_solid(&self, rect: Rect) -> bool {
        self.is_box_solid(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Size2, Vec2};

    fn floor_grid() -> TileGrid {
        let mut grid = TileGrid::empty(4, 3);
        for x in 0..4 {
            grid.set_tile(x, 0, 1);
        }
        grid.set_tile(3, 1, 20);
        grid
    }

    #[test]
    fn rejects_mismatched_cell_count() {
        let result = TileGrid::new(2, 2, vec![0; 3]);
        assert_eq!(
            result,
            Err(TileGridError::TileCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn solidity_uses_tile_value_range() {
        assert!(!TileGrid::is_solid_tile(0));
        assert!(TileGrid::is_solid_tile(1));
        assert!(TileGrid::is_solid_tile(15));
        assert!(!TileGrid::is_solid_tile(16));
        assert!(!TileGrid::is_solid_tile(-1));
    }

    #[test]
    fn box_resting_on_floor_edge_is_free() {
        let grid = floor_grid();
        let standing = Rect::new(Vec2::new(0.5, 1.0), Size2::new(0.7, 1.9));
        assert!(!grid.is_box_solid(standing));
        assert!(grid.is_box_solid(standing.translated(Vec2::new(0.0, -0.05))));
    }

    #[test]
    fn decorative_tiles_do_not_block() {
        let grid = floor_grid();
        let beside = Rect::new(Vec2::new(3.1, 1.2), Size2::new(0.5, 0.5));
        assert!(!grid.is_box_solid(beside));
    }

    #[test]
    fn outside_grid_reads_empty() {
        let grid = floor_grid();
        let below = Rect::new(Vec2::new(-5.0, -5.0), Size2::square(1.0));
        assert!(!grid.is_box_solid(below));
        assert_eq!(grid.tile_at(9, 9), None);
    }

    #[test]
    fn occupied_lists_non_empty_cells() {
        let cells: Vec<_> = floor_grid().occupied().collect();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], (0, 0, 1));
        assert_eq!(cells[4], (3, 1, 20));
    }
}
