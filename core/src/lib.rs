#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Forbidden Island engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Terrain and placement systems only ever see the
//! island through the read-only [`GridView`] and [`HeightMap`] contracts
//! defined here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str =
    "Collect three pieces and return to the helicopter to win. Watch out for floods!";

/// Height assigned to the single summit of a fractal island.
pub const FRACTAL_PEAK_HEIGHT: f64 = 32.0;

/// Terrain generation strategies available when resetting the island.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainStrategy {
    /// Deterministic diamond whose height falls off with Manhattan distance.
    Pyramid,
    /// Diamond footprint filled with uniformly random heights.
    Random,
    /// Midpoint-displacement island with a single central summit.
    Fractal,
}

impl TerrainStrategy {
    /// Every strategy in declaration order.
    pub const ALL: [TerrainStrategy; 3] = [Self::Pyramid, Self::Random, Self::Fractal];

    /// Human readable name of the strategy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pyramid => "pyramid",
            Self::Random => "random",
            Self::Fractal => "fractal",
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current island and builds a new one.
    Reset {
        /// Terrain generator used for the new island.
        strategy: TerrainStrategy,
        /// Seed feeding every random decision made for the new island.
        seed: u64,
    },
    /// Advances the simulation by one logical time step.
    Tick,
    /// Requests that the player step onto a neighboring cell.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh island replaced the previous one.
    WorldReset {
        /// Terrain generator that produced the island.
        strategy: TerrainStrategy,
        /// Seed used while generating the island.
        seed: u64,
    },
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Value of the flood cadence counter after the tick.
        tick_counter: u32,
    },
    /// Reports that the ocean rose by one foot.
    WaterRose {
        /// Water level reached after the rise.
        level: u32,
    },
    /// Confirms that a cell was swallowed by the ocean.
    CellFlooded {
        /// Cell that transitioned to flooded.
        cell: CellCoord,
    },
    /// Confirms that the player stepped between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Confirms that the player picked up an item.
    ItemCollected {
        /// Identifier of the collected item.
        item: ItemId,
        /// Cell where the item was collected.
        cell: CellCoord,
    },
    /// Announces that the game reached a terminal outcome.
    OutcomeDecided {
        /// Outcome that ended the game.
        outcome: Outcome,
    },
}

/// Cardinal movement directions across the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward the `top` neighbor, decreasing the row index.
    Up,
    /// Movement toward the `bottom` neighbor, increasing the row index.
    Down,
    /// Movement toward the `left` neighbor, decreasing the column index.
    Left,
    /// Movement toward the `right` neighbor, increasing the column index.
    Right,
}

impl Direction {
    /// Neighbor directions in `left, top, right, bottom` order.
    pub const ALL: [Direction; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// Direction that leads back to the origin of a step taken this way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Unique identifier assigned to a collectible item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Terminal state of a game, if one was reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player is still on dry land and has not escaped.
    #[default]
    InProgress,
    /// The ocean reached the player.
    Lost,
    /// The player reached the helicopter carrying enough items.
    Won {
        /// Final score awarded for the escape.
        score: i64,
    },
}

impl Outcome {
    /// Reports whether the game reached a terminal outcome.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Square matrix of terrain heights measured in feet.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    side: u32,
    heights: Vec<f64>,
}

impl HeightMap {
    /// Creates a flat height map where every cell sits at sea level.
    #[must_use]
    pub fn flat(side: u32) -> Self {
        let count = side as usize * side as usize;
        Self {
            side,
            heights: vec![0.0; count],
        }
    }

    /// Builds a height map by evaluating `height` for every coordinate.
    #[must_use]
    pub fn from_fn(side: u32, mut height: impl FnMut(CellCoord) -> f64) -> Self {
        let mut map = Self::flat(side);
        for y in 0..side {
            for x in 0..side {
                let cell = CellCoord::new(x, y);
                map.set(cell, height(cell));
            }
        }
        map
    }

    /// Builds a height map from row-major rows of equal length.
    ///
    /// # Panics
    ///
    /// Panics when the rows do not form a square matrix.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let side = rows.len();
        assert!(
            rows.iter().all(|row| row.len() == side),
            "height rows must form a square matrix"
        );
        Self {
            side: side as u32,
            heights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Number of cells along each edge of the map.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Height recorded for the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the map.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> f64 {
        self.heights[self.index_of(cell)]
    }

    /// Overwrites the height recorded for the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the map.
    pub fn set(&mut self, cell: CellCoord, height: f64) {
        let index = self.index_of(cell);
        self.heights[index] = height;
    }

    /// Iterates every `(cell, height)` pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, f64)> + '_ {
        let side = self.side as usize;
        self.heights.iter().enumerate().map(move |(index, height)| {
            (
                CellCoord::new((index % side) as u32, (index / side) as u32),
                *height,
            )
        })
    }

    fn index_of(&self, cell: CellCoord) -> usize {
        assert!(
            cell.x() < self.side && cell.y() < self.side,
            "cell {cell:?} lies outside the {side}x{side} height map",
            side = self.side
        );
        cell.y() as usize * self.side as usize + cell.x() as usize
    }
}

/// Atomic unit of the island grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    coord: CellCoord,
    height: f64,
    flooded: bool,
}

impl Cell {
    /// Creates a cell, flooding it immediately when it sits at or below sea level.
    #[must_use]
    pub fn new(coord: CellCoord, height: f64) -> Self {
        Self {
            coord,
            height,
            flooded: height <= 0.0,
        }
    }

    /// Coordinate of the cell within the grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Absolute height of the cell in feet.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Reports whether the ocean covers the cell.
    #[must_use]
    pub const fn is_flooded(&self) -> bool {
        self.flooded
    }

    /// Floods the cell, returning `true` when it was previously dry.
    ///
    /// Flooding is permanent; no operation ever dries a cell again.
    pub fn mark_flooded(&mut self) -> bool {
        let was_dry = !self.flooded;
        self.flooded = true;
        was_dry
    }
}

/// Read-only view over the island grid.
///
/// Neighbors are derived from coordinates: stepping off an edge clamps back
/// onto the same cell, so every cell has exactly four neighbors and the
/// `left`/`right` and `top`/`bottom` relations are always mutually consistent.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    side: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], side: u32) -> Self {
        debug_assert_eq!(cells.len(), side as usize * side as usize);
        Self { cells, side }
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterates every cell exactly once in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() < self.side && cell.y() < self.side
    }

    /// Flattened row-major index of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> usize {
        assert!(
            self.contains(cell),
            "cell {cell:?} lies outside the {side}x{side} grid",
            side = self.side
        );
        cell.y() as usize * self.side as usize + cell.x() as usize
    }

    /// Cell stored at the flattened row-major index.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.cell_count()`.
    #[must_use]
    pub fn cell_at_index(&self, index: usize) -> &'a Cell {
        assert!(
            index < self.cells.len(),
            "cell index {index} outside [0, {})",
            self.cells.len()
        );
        &self.cells[index]
    }

    /// Cell located at the provided coordinate.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> &'a Cell {
        &self.cells[self.index_of(cell)]
    }

    /// Neighbor reached by stepping once in `direction`, clamped at the edges.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        let last = self.side.saturating_sub(1);
        let (x, y) = (cell.x(), cell.y());
        match direction {
            Direction::Up => CellCoord::new(x, y.saturating_sub(1)),
            Direction::Down => CellCoord::new(x, y.saturating_add(1).min(last)),
            Direction::Left => CellCoord::new(x.saturating_sub(1), y),
            Direction::Right => CellCoord::new(x.saturating_add(1).min(last), y),
        }
    }

    /// The four neighbors of a cell in `left, top, right, bottom` order.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> [CellCoord; 4] {
        Direction::ALL.map(|direction| self.neighbor(cell, direction))
    }

    /// Reports whether any of the four neighbors is flooded.
    #[must_use]
    pub fn is_coastal(&self, cell: CellCoord) -> bool {
        self.neighbors(cell)
            .into_iter()
            .any(|neighbor| self.cell(neighbor).is_flooded())
    }

    /// Number of cells the ocean has not yet reached.
    #[must_use]
    pub fn dry_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_flooded()).count()
    }
}

/// Smallest island size accepted by [`SimulationConfig::validate`].
pub const MIN_ISLAND_SIZE: u32 = 4;

/// Largest island size accepted by [`SimulationConfig::validate`].
pub const MAX_ISLAND_SIZE: u32 = 4096;

/// Tunable constants governing a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Island size `S`; the grid spans `S + 1` cells per side.
    pub island_size: u32,
    /// Ticks that elapse between successive water level increments.
    pub flood_cadence: u32,
    /// Number of collectible items scattered across the island.
    pub item_count: u32,
    /// Items the player must carry to escape on the helicopter.
    pub inventory_to_win: u32,
    /// Starting score budget from which elapsed ticks are subtracted.
    pub score_budget: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            island_size: 64,
            flood_cadence: 10,
            item_count: 4,
            inventory_to_win: 3,
            score_budget: 600,
        }
    }
}

impl SimulationConfig {
    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn grid_side(&self) -> u32 {
        self.island_size.saturating_add(1)
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        let side = self.grid_side() as u64;
        side * side
    }

    /// Checks that the configuration describes a playable island.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.island_size < MIN_ISLAND_SIZE {
            return Err(ConfigError::IslandTooSmall {
                island_size: self.island_size,
            });
        }
        if self.island_size > MAX_ISLAND_SIZE {
            return Err(ConfigError::IslandTooLarge {
                island_size: self.island_size,
            });
        }
        if self.flood_cadence == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        if self.inventory_to_win > self.item_count {
            return Err(ConfigError::UnreachableWinThreshold {
                required: self.inventory_to_win,
                available: self.item_count,
            });
        }
        if u64::from(self.item_count) >= self.cell_count() {
            return Err(ConfigError::TooManyItems {
                items: self.item_count,
                cells: self.cell_count(),
            });
        }
        Ok(())
    }
}

/// Reasons a [`SimulationConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The island is too small to hold a summit and its slopes.
    #[error("island size {island_size} is below the minimum of {min}", min = MIN_ISLAND_SIZE)]
    IslandTooSmall {
        /// Island size that was requested.
        island_size: u32,
    },
    /// The grid would be too large to allocate.
    #[error("island size {island_size} exceeds the maximum of {max}", max = MAX_ISLAND_SIZE)]
    IslandTooLarge {
        /// Island size that was requested.
        island_size: u32,
    },
    /// A scenario entity lies outside its height map.
    #[error("scenario entity at ({x}, {y}) lies outside the {side}x{side} grid")]
    EntityOutsideGrid {
        /// Column of the misplaced entity.
        x: u32,
        /// Row of the misplaced entity.
        y: u32,
        /// Cells along each edge of the grid.
        side: u32,
    },
    /// The water would never rise.
    #[error("flood cadence must be at least one tick")]
    ZeroCadence,
    /// More items are required to win than exist on the island.
    #[error("winning requires {required} items but only {available} are placed")]
    UnreachableWinThreshold {
        /// Items required to win.
        required: u32,
        /// Items placed on the island.
        available: u32,
    },
    /// The grid cannot hold every item on a distinct cell.
    #[error("{items} items do not fit on a grid of {cells} cells")]
    TooManyItems {
        /// Items requested.
        items: u32,
        /// Cells available in the grid.
        cells: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        Cell, CellCoord, ConfigError, Direction, GridView, HeightMap, ItemId, Outcome,
        SimulationConfig, TerrainStrategy, MAX_ISLAND_SIZE,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn grid(side: u32) -> Vec<Cell> {
        HeightMap::from_fn(side, |_| 1.0)
            .iter()
            .map(|(cell, height)| Cell::new(cell, height))
            .collect()
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
        assert_round_trip(&ItemId::new(3));
        assert_round_trip(&TerrainStrategy::Fractal);
        assert_round_trip(&Outcome::Won { score: -40 });
        assert_round_trip(&SimulationConfig::default());
    }

    #[test]
    fn cells_at_or_below_sea_level_start_flooded() {
        assert!(Cell::new(CellCoord::new(0, 0), 0.0).is_flooded());
        assert!(Cell::new(CellCoord::new(0, 0), -2.5).is_flooded());
        assert!(!Cell::new(CellCoord::new(0, 0), 0.5).is_flooded());
    }

    #[test]
    fn flooding_is_reported_once() {
        let mut cell = Cell::new(CellCoord::new(2, 2), 3.0);
        assert!(cell.mark_flooded());
        assert!(!cell.mark_flooded());
        assert!(cell.is_flooded());
    }

    #[test]
    fn edge_neighbors_clamp_onto_the_cell_itself() {
        let cells = grid(3);
        let view = GridView::new(&cells, 3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(view.neighbor(corner, Direction::Up), corner);
        assert_eq!(view.neighbor(corner, Direction::Left), corner);
        assert_eq!(view.neighbor(corner, Direction::Right), CellCoord::new(1, 0));

        let far = CellCoord::new(2, 2);
        assert_eq!(view.neighbor(far, Direction::Down), far);
        assert_eq!(view.neighbor(far, Direction::Right), far);
    }

    #[test]
    fn neighbor_relations_are_mutually_consistent() {
        let cells = grid(4);
        let view = GridView::new(&cells, 4);
        for cell in view.cells() {
            let coord = cell.coord();
            for direction in Direction::ALL {
                let neighbor = view.neighbor(coord, direction);
                let back = view.neighbor(neighbor, direction.opposite());
                if neighbor == coord {
                    assert_eq!(back, view.neighbor(coord, direction.opposite()));
                } else {
                    assert_eq!(back, coord, "{direction:?} of {coord:?}");
                }
            }
        }
    }

    #[test]
    fn flattened_index_matches_row_major_layout() {
        let cells = grid(5);
        let view = GridView::new(&cells, 5);
        let coord = CellCoord::new(3, 2);
        let index = view.index_of(coord);
        assert_eq!(index, 13);
        assert_eq!(view.cell_at_index(index).coord(), coord);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn indexing_past_the_grid_panics() {
        let cells = grid(2);
        let view = GridView::new(&cells, 2);
        let _ = view.cell_at_index(4);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.grid_side(), 65);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn config_rejects_unreachable_threshold() {
        let config = SimulationConfig {
            inventory_to_win: 5,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnreachableWinThreshold {
                required: 5,
                available: 4,
            })
        );
    }

    #[test]
    fn config_rejects_tiny_islands_and_zero_cadence() {
        let tiny = SimulationConfig {
            island_size: 2,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::IslandTooSmall { island_size: 2 })
        ));

        let frozen = SimulationConfig {
            flood_cadence: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(frozen.validate(), Err(ConfigError::ZeroCadence));
    }

    #[test]
    fn config_rejects_islands_too_large_to_allocate() {
        let huge = SimulationConfig {
            island_size: u32::MAX,
            ..SimulationConfig::default()
        };
        assert_eq!(huge.grid_side(), u32::MAX);
        assert_eq!(
            huge.validate(),
            Err(ConfigError::IslandTooLarge {
                island_size: u32::MAX
            })
        );

        let oversized = SimulationConfig {
            island_size: 200_000,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            oversized.validate(),
            Err(ConfigError::IslandTooLarge { .. })
        ));

        let largest = SimulationConfig {
            island_size: MAX_ISLAND_SIZE,
            ..SimulationConfig::default()
        };
        assert_eq!(largest.validate(), Ok(()));
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let config: SimulationConfig =
            toml::from_str("island_size = 16\nflood_cadence = 4\n").expect("parse");
        assert_eq!(config.island_size, 16);
        assert_eq!(config.flood_cadence, 4);
        assert_eq!(config.item_count, 4);
        assert_eq!(config.score_budget, 600);
    }
}
