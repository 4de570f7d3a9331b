//! Arena-backed island grid.

use forbidden_island_core::{Cell, CellCoord, GridView, HeightMap};

/// Owns every cell of the island in row-major order.
///
/// Neighbor links are never stored: [`GridView::neighbor`] derives them from
/// coordinates, clamping at the edges so boundary cells point at themselves.
#[derive(Clone, Debug)]
pub struct Grid {
    side: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from a height map, flooding every cell at or below sea level.
    #[must_use]
    pub fn build(heights: &HeightMap) -> Self {
        let cells = heights
            .iter()
            .map(|(coord, height)| Cell::new(coord, height))
            .collect();
        Self {
            side: heights.side(),
            cells,
        }
    }

    /// Read-only view used for neighbor walks and queries.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.side)
    }

    /// Floods a cell, returning `true` when it was previously dry.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the grid.
    pub(crate) fn flood(&mut self, cell: CellCoord) -> bool {
        let index = self.view().index_of(cell);
        self.cells[index].mark_flooded()
    }
}
