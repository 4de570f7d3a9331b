#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Forbidden Island.

mod flood;
mod grid;

pub use flood::FloodEngine;
pub use grid::Grid;

use forbidden_island_core::{
    CellCoord, Command, ConfigError, Direction, Event, HeightMap, ItemId, Outcome,
    SimulationConfig, TerrainStrategy, WELCOME_BANNER,
};
use forbidden_island_system_placement::EntityPlacer;
use forbidden_island_system_terrain::TerrainGenerator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 0x0f0b_1dd3_4157_a4d5;
const DEFAULT_STRATEGY: TerrainStrategy = TerrainStrategy::Fractal;

/// Collectible item resting on the island.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    /// Identifier assigned to the item when the island was populated.
    pub id: ItemId,
    /// Cell the item rests on.
    pub cell: CellCoord,
}

/// Hand-authored island used instead of generated terrain.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Terrain heights; the island size is derived from its side.
    pub heights: HeightMap,
    /// Starting cell of the player.
    pub player: CellCoord,
    /// Cells holding one item each; the item count is derived from its length.
    pub items: Vec<CellCoord>,
    /// Cell where the helicopter waits.
    pub goal: CellCoord,
}

#[derive(Clone, Debug)]
struct Player {
    cell: CellCoord,
    inventory: Vec<ItemId>,
}

impl Player {
    fn at(cell: CellCoord) -> Self {
        Self {
            cell,
            inventory: Vec::new(),
        }
    }
}

/// Represents the authoritative Forbidden Island world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    strategy: Option<TerrainStrategy>,
    seed: u64,
    grid: Grid,
    flood: FloodEngine,
    player: Player,
    items: Vec<Item>,
    goal: CellCoord,
    outcome: Outcome,
}

impl World {
    /// Creates a new world using the default configuration and a fractal island.
    #[must_use]
    pub fn new() -> Self {
        Self::generate(SimulationConfig::default(), DEFAULT_STRATEGY, DEFAULT_SEED)
    }

    /// Creates a world from an explicit configuration, strategy and seed.
    pub fn try_new(
        config: SimulationConfig,
        strategy: TerrainStrategy,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::generate(config, strategy, seed))
    }

    /// Creates a world from a hand-authored island.
    ///
    /// The island size and item count of `config` are replaced by the ones
    /// implied by the scenario before validation. Entities placed outside
    /// the height map are rejected.
    pub fn from_scenario(
        config: SimulationConfig,
        scenario: Scenario,
    ) -> Result<Self, ConfigError> {
        let config = SimulationConfig {
            island_size: scenario.heights.side().saturating_sub(1),
            item_count: scenario.items.len() as u32,
            ..config
        };
        config.validate()?;

        let grid = Grid::build(&scenario.heights);
        let view = grid.view();
        let entities = [scenario.player, scenario.goal];
        if let Some(stray) = entities
            .iter()
            .chain(&scenario.items)
            .find(|cell| !view.contains(**cell))
        {
            return Err(ConfigError::EntityOutsideGrid {
                x: stray.x(),
                y: stray.y(),
                side: view.side(),
            });
        }
        let items = scenario
            .items
            .iter()
            .enumerate()
            .map(|(index, cell)| Item {
                id: ItemId::new(index as u32),
                cell: *cell,
            })
            .collect();

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            strategy: None,
            seed: 0,
            flood: FloodEngine::new(config.flood_cadence),
            player: Player::at(scenario.player),
            items,
            goal: scenario.goal,
            grid,
            outcome: Outcome::InProgress,
        })
    }

    fn generate(config: SimulationConfig, strategy: TerrainStrategy, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let heights = TerrainGenerator::new(config.island_size).generate(strategy, &mut rng);
        let grid = Grid::build(&heights);

        let placer = EntityPlacer;
        let view = grid.view();
        let goal = placer.place_highest(view);
        let player = placer.place_random(view, &mut rng).unwrap_or(goal);
        let items = placer
            .place_distinct(view, &mut rng, config.item_count as usize)
            .into_iter()
            .enumerate()
            .map(|(index, cell)| Item {
                id: ItemId::new(index as u32),
                cell,
            })
            .collect();

        log::debug!(
            "generated {} island with seed {seed:#x}: {} of {} cells dry",
            strategy.name(),
            view.dry_count(),
            view.cell_count()
        );

        Self {
            banner: WELCOME_BANNER,
            config,
            strategy: Some(strategy),
            seed,
            flood: FloodEngine::new(config.flood_cadence),
            player: Player::at(player),
            items,
            goal,
            grid,
            outcome: Outcome::InProgress,
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_decided() {
            return;
        }

        self.collect_items(out_events);

        let mut flooded = Vec::new();
        let raised = self.flood.advance(&mut self.grid, &mut flooded);
        out_events.push(Event::TimeAdvanced {
            tick_counter: self.flood.tick_counter(),
        });
        if let Some(level) = raised {
            log::debug!("water rose to {level}, {} cells flooded", flooded.len());
            out_events.push(Event::WaterRose { level });
            out_events.extend(flooded.into_iter().map(|cell| Event::CellFlooded { cell }));
        }

        self.evaluate_outcome(out_events);
    }

    fn collect_items(&mut self, out_events: &mut Vec<Event>) {
        let player_cell = self.player.cell;
        let (collected, remaining): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.cell == player_cell);
        self.items = remaining;

        for item in collected {
            self.player.inventory.push(item.id);
            out_events.push(Event::ItemCollected {
                item: item.id,
                cell: item.cell,
            });
        }
    }

    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        let outcome = if self.grid.view().cell(self.player.cell).is_flooded() {
            Outcome::Lost
        } else if self.player.cell == self.goal
            && self.player.inventory.len() >= self.config.inventory_to_win as usize
        {
            Outcome::Won {
                score: self.score(),
            }
        } else {
            return;
        };

        log::info!(
            "game decided at water level {}: {outcome:?}",
            self.flood.water_level()
        );
        self.outcome = outcome;
        out_events.push(Event::OutcomeDecided { outcome });
    }

    fn score(&self) -> i64 {
        let elapsed = i64::from(self.flood.water_level()) * i64::from(self.flood.cadence())
            + i64::from(self.flood.tick_counter());
        (self.config.score_budget - elapsed) * self.player.inventory.len() as i64
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.outcome.is_decided() {
            return;
        }

        let view = self.grid.view();
        let from = self.player.cell;
        let to = view.neighbor(from, direction);
        if to == from || view.cell(to).is_flooded() {
            return;
        }

        self.player.cell = to;
        out_events.push(Event::PlayerMoved { from, to });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Reset { strategy, seed } => {
            *world = World::generate(world.config, strategy, seed);
            out_events.push(Event::WorldReset { strategy, seed });
        }
        Command::Tick => world.tick(out_events),
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use forbidden_island_core::{
        CellCoord, GridView, ItemId, Outcome, SimulationConfig, TerrainStrategy,
    };

    use super::{Item, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Exposes every cell's coordinates, height and flood state.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player.cell
    }

    /// Items the player has collected, in pickup order.
    #[must_use]
    pub fn inventory(world: &World) -> &[ItemId] {
        &world.player.inventory
    }

    /// Items still waiting to be collected.
    #[must_use]
    pub fn items(world: &World) -> &[Item] {
        &world.items
    }

    /// Cell where the helicopter waits.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.goal
    }

    /// Current height of the ocean.
    #[must_use]
    pub fn water_level(world: &World) -> u32 {
        world.flood.water_level()
    }

    /// Ticks elapsed since the last water rise.
    #[must_use]
    pub fn tick_counter(world: &World) -> u32 {
        world.flood.tick_counter()
    }

    /// Terminal outcome of the game, if reached.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Terrain strategy that generated the island; `None` for scenarios.
    #[must_use]
    pub fn strategy(world: &World) -> Option<TerrainStrategy> {
        world.strategy
    }

    /// Seed that generated the island.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }
}
