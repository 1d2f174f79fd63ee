use std::fmt;

use glam::UVec2;

use crate::error::GridError;

/// Stable handle to an occupant registered in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(pub u32);

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-size grid of cells, each empty or referencing the occupant that blocks it.
///
/// Cells are addressed `(x, y)` = (column, row) and stored row-major.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<OccupantId>>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Option<OccupantId>, GridError> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Place `occupant` in an empty cell. Occupied cells are never overwritten.
    pub fn set(&mut self, x: u32, y: u32, occupant: OccupantId) -> Result<(), GridError> {
        let idx = self.checked_index(x, y)?;
        if let Some(existing) = self.cells[idx] {
            return Err(GridError::AlreadyOccupied {
                x,
                y,
                occupant: existing,
            });
        }
        self.cells[idx] = Some(occupant);
        Ok(())
    }

    /// Empty a cell, returning whatever occupied it.
    pub fn clear(&mut self, x: u32, y: u32) -> Result<Option<OccupantId>, GridError> {
        let idx = self.checked_index(x, y)?;
        Ok(self.cells[idx].take())
    }

    pub fn is_blocking(&self, x: u32, y: u32) -> Result<bool, GridError> {
        Ok(self.get(x, y)?.is_some())
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (UVec2, OccupantId)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|id| (UVec2::new((idx % width) as u32, (idx / width) as u32), id))
        })
    }

    /// Lookup for callers that already bounds-checked the cell.
    #[inline]
    pub(crate) fn occupant_at(&self, x: usize, y: usize) -> Option<OccupantId> {
        if x >= self.width as usize {
            return None;
        }
        self.cells
            .get(y * (self.width as usize) + x)
            .copied()
            .flatten()
    }

    fn checked_index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let grid = OccupancyGrid::new(4, 3);
        assert_eq!(grid.size(), UVec2::new(4, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.get(x, y), Ok(None));
                assert_eq!(grid.is_blocking(x, y), Ok(false));
            }
        }
        assert_eq!(grid.occupied().count(), 0);
    }

    #[test]
    fn set_then_get() {
        let mut grid = OccupancyGrid::new(4, 3);
        grid.set(3, 2, OccupantId(7)).unwrap();
        assert_eq!(grid.get(3, 2), Ok(Some(OccupantId(7))));
        assert_eq!(grid.is_blocking(3, 2), Ok(true));
        assert_eq!(grid.occupant_at(3, 2), Some(OccupantId(7)));
        assert_eq!(
            grid.occupied().collect::<Vec<_>>(),
            vec![(UVec2::new(3, 2), OccupantId(7))]
        );
    }

    #[test]
    fn set_refuses_overwrite() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.set(1, 0, OccupantId(1)).unwrap();
        let err = grid.set(1, 0, OccupantId(2)).unwrap_err();
        assert_eq!(
            err,
            GridError::AlreadyOccupied {
                x: 1,
                y: 0,
                occupant: OccupantId(1)
            }
        );
        assert_eq!(grid.get(1, 0), Ok(Some(OccupantId(1))));
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut grid = OccupancyGrid::new(2, 2);
        assert!(matches!(grid.get(2, 0), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(grid.get(0, 2), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(
            grid.set(5, 5, OccupantId(0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(grid.is_blocking(9, 0).is_err());
        assert_eq!(grid.occupant_at(2, 0), None);
    }

    #[test]
    fn clear_frees_cell() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.set(0, 1, OccupantId(3)).unwrap();
        assert_eq!(grid.clear(0, 1), Ok(Some(OccupantId(3))));
        assert_eq!(grid.get(0, 1), Ok(None));
        grid.set(0, 1, OccupantId(4)).unwrap();
    }
}
