#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system that chooses where entities appear on the island.
//!
//! Random placement uses rejection sampling over the flattened grid: a
//! uniformly random index is drawn and redrawn until it lands on dry land.
//! The goal is placed deterministically on the highest cell.

use forbidden_island_core::{CellCoord, GridView};
use rand::Rng;

/// Chooses starting cells for the player, the items and the goal.
#[derive(Debug, Default)]
pub struct EntityPlacer;

impl EntityPlacer {
    /// Draws uniformly random cells until one is dry.
    ///
    /// Returns `None` when every cell is already flooded, so the sampling
    /// loop always terminates.
    pub fn place_random<R: Rng + ?Sized>(
        &self,
        grid: GridView<'_>,
        rng: &mut R,
    ) -> Option<CellCoord> {
        if grid.dry_count() == 0 {
            return None;
        }

        loop {
            let index = rng.gen_range(0..grid.cell_count());
            let cell = grid.cell_at_index(index);
            if !cell.is_flooded() {
                return Some(cell.coord());
            }
        }
    }

    /// Finds the highest cell, resolving ties to the first one in grid order.
    ///
    /// # Panics
    ///
    /// Panics when the grid contains no cells.
    #[must_use]
    pub fn place_highest(&self, grid: GridView<'_>) -> CellCoord {
        let mut cells = grid.cells();
        let first = cells.next().expect("grid contains at least one cell");
        cells
            .fold(first, |highest, cell| {
                if cell.height() > highest.height() {
                    cell
                } else {
                    highest
                }
            })
            .coord()
    }

    /// Places up to `count` entities on pairwise distinct dry cells.
    ///
    /// Draws that collide with an already placed entity are resampled. Fewer
    /// than `count` cells are returned only when the island has fewer dry
    /// cells than requested.
    pub fn place_distinct<R: Rng + ?Sized>(
        &self,
        grid: GridView<'_>,
        rng: &mut R,
        count: usize,
    ) -> Vec<CellCoord> {
        let target = count.min(grid.dry_count());
        let mut placed: Vec<CellCoord> = Vec::with_capacity(target);
        while placed.len() < target {
            let Some(candidate) = self.place_random(grid, rng) else {
                break;
            };
            if !placed.contains(&candidate) {
                placed.push(candidate);
            }
        }
        placed
    }
}
