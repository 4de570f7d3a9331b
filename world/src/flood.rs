//! Water level clock and coastal flood propagation.

use forbidden_island_core::{CellCoord, GridView};

use crate::grid::Grid;

/// Raises the ocean on a fixed cadence and spreads it inland from the coast.
#[derive(Clone, Debug)]
pub struct FloodEngine {
    cadence: u32,
    tick_counter: u32,
    water_level: u32,
    frontier: Vec<CellCoord>,
}

impl FloodEngine {
    /// Creates an engine that raises the water once every `cadence` ticks.
    ///
    /// A cadence of zero is treated as one.
    #[must_use]
    pub fn new(cadence: u32) -> Self {
        Self {
            cadence: cadence.max(1),
            tick_counter: 0,
            water_level: 0,
            frontier: Vec::new(),
        }
    }

    /// Current height of the ocean in feet.
    #[must_use]
    pub const fn water_level(&self) -> u32 {
        self.water_level
    }

    /// Ticks elapsed since the last rise.
    #[must_use]
    pub const fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// Ticks between successive rises.
    #[must_use]
    pub const fn cadence(&self) -> u32 {
        self.cadence
    }

    /// Advances the clock by one tick, flooding the grid when the water rises.
    ///
    /// Returns the new water level when this tick raised it. Every cell that
    /// flooded during the pass is appended to `flooded` in transition order.
    pub fn advance(&mut self, grid: &mut Grid, flooded: &mut Vec<CellCoord>) -> Option<u32> {
        self.tick_counter += 1;
        if self.tick_counter < self.cadence {
            return None;
        }

        self.tick_counter = 0;
        self.water_level += 1;
        self.propagate(grid, flooded);
        Some(self.water_level)
    }

    /// Sweeps every cell once, spreading the ocean transitively from the coast.
    ///
    /// A dry cell floods when it sits at or below the water level and touches
    /// a flooded neighbor. Each newly flooded cell re-examines its neighbors
    /// before the sweep moves on, so a single pass reaches every cell the
    /// current level can reach.
    pub fn propagate(&mut self, grid: &mut Grid, flooded: &mut Vec<CellCoord>) {
        let level = f64::from(self.water_level);
        let cell_count = grid.view().cell_count();

        for index in 0..cell_count {
            let origin = grid.view().cell_at_index(index);
            if origin.is_flooded() {
                continue;
            }
            self.frontier.push(origin.coord());

            while let Some(cell) = self.frontier.pop() {
                if !submerges(grid.view(), cell, level) {
                    continue;
                }
                if grid.flood(cell) {
                    log::trace!("cell ({}, {}) flooded at level {level}", cell.x(), cell.y());
                    flooded.push(cell);
                    self.frontier.extend(grid.view().neighbors(cell));
                }
            }
        }
    }
}

fn submerges(grid: GridView<'_>, cell: CellCoord, level: f64) -> bool {
    let candidate = grid.cell(cell);
    !candidate.is_flooded() && candidate.height() <= level && grid.is_coastal(cell)
}
