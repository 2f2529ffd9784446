//! Read-only occupancy grid for one dimension.
//!
//! The grid is never stored. It is regenerated from the free counts with a
//! left-packing rule: in every slot row, the first `capacity - free` cells are
//! occupied and the rest are free. Occupied cells therefore always form a
//! prefix of the row.

use std::collections::VecDeque;
use std::fmt;

/// State of a single unit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Free,
    Occupied,
}

impl Cell {
    /// Grayscale value used by image exporters.
    pub fn luma(self) -> u8 {
        match self {
            Cell::Free => 255,
            Cell::Occupied => 0,
        }
    }
}

/// A borrowed view over one dimension's free counts, shaped as a
/// `horizon x capacity` grid of cells.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyGrid<'a> {
    capacity: u32,
    free: &'a VecDeque<u32>,
}

impl<'a> OccupancyGrid<'a> {
    pub(crate) fn new(capacity: u32, free: &'a VecDeque<u32>) -> Self {
        Self { capacity, free }
    }

    /// Number of slot rows.
    pub fn horizon(&self) -> usize {
        self.free.len()
    }

    /// Number of cells per row.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Occupied cells in slot `t`.
    pub fn occupied(&self, t: usize) -> Option<u32> {
        self.free.get(t).map(|free| self.capacity - free)
    }

    pub fn cell(&self, t: usize, c: u32) -> Option<Cell> {
        if c >= self.capacity {
            return None;
        }
        let occupied = self.occupied(t)?;
        Some(if c < occupied { Cell::Occupied } else { Cell::Free })
    }

    pub fn row(&self, t: usize) -> Option<Vec<Cell>> {
        let occupied = self.occupied(t)?;
        Some(
            (0..self.capacity)
                .map(|c| if c < occupied { Cell::Occupied } else { Cell::Free })
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        (0..self.horizon()).filter_map(move |t| self.row(t))
    }

    /// Row-major grayscale buffer (`horizon` rows of `capacity` bytes).
    pub fn to_luma_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.horizon() * self.capacity as usize);
        for row in self.rows() {
            out.extend(row.into_iter().map(Cell::luma));
        }
        out
    }
}

impl fmt::Display for OccupancyGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let ch = match cell {
                    Cell::Occupied => '#',
                    Cell::Free => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(values: &[u32]) -> VecDeque<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn occupied_cells_are_left_packed() {
        let counts = free(&[4, 1, 0]);
        let grid = OccupancyGrid::new(4, &counts);

        assert_eq!(grid.row(0).unwrap(), vec![Cell::Free; 4]);
        assert_eq!(
            grid.row(1).unwrap(),
            vec![Cell::Occupied, Cell::Occupied, Cell::Occupied, Cell::Free]
        );
        assert_eq!(grid.row(2).unwrap(), vec![Cell::Occupied; 4]);
        assert_eq!(grid.occupied(1), Some(3));
    }

    #[test]
    fn out_of_range_lookups() {
        let counts = free(&[2]);
        let grid = OccupancyGrid::new(2, &counts);
        assert_eq!(grid.cell(0, 2), None);
        assert_eq!(grid.cell(1, 0), None);
        assert!(grid.row(1).is_none());
    }

    #[test]
    fn luma_and_display() {
        let counts = free(&[1, 2]);
        let grid = OccupancyGrid::new(2, &counts);
        assert_eq!(grid.to_luma_bytes(), vec![0, 255, 255, 255]);
        assert_eq!(grid.to_string(), "#.\n..\n");
    }
}
