use std::collections::HashSet;

use forbidden_island_core::{Cell, CellCoord, GridView, HeightMap};
use forbidden_island_system_placement::EntityPlacer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Diamond island on a 9x9 grid surrounded by ocean.
fn diamond() -> (Vec<Cell>, u32) {
    let center = CellCoord::new(4, 4);
    let map = HeightMap::from_fn(9, |cell| {
        let distance = cell.manhattan_distance(center);
        if distance < 4 {
            f64::from(4 - distance)
        } else {
            0.0
        }
    });
    let cells = map
        .iter()
        .map(|(coord, height)| Cell::new(coord, height))
        .collect();
    (cells, map.side())
}

#[test]
fn random_placement_never_lands_in_the_ocean() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed);

    for _ in 0..500 {
        let cell = EntityPlacer
            .place_random(grid, &mut rng)
            .expect("diamond has dry land");
        assert!(!grid.cell(cell).is_flooded(), "{cell:?} is flooded");
    }
}

#[test]
fn random_placement_eventually_reaches_every_dry_cell() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    let mut seen = HashSet::new();
    for _ in 0..5_000 {
        if let Some(cell) = EntityPlacer.place_random(grid, &mut rng) {
            let _ = seen.insert(cell);
        }
    }
    assert_eq!(seen.len(), grid.dry_count());
}

#[test]
fn distinct_placement_yields_pairwise_distinct_cells() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);

    for seed in 0..100 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let placed = EntityPlacer.place_distinct(grid, &mut rng, 4);
        assert_eq!(placed.len(), 4);
        let unique: HashSet<_> = placed.iter().copied().collect();
        assert_eq!(unique.len(), placed.len(), "seed {seed} stacked items");
        assert!(placed.iter().all(|cell| !grid.cell(*cell).is_flooded()));
    }
}

#[test]
fn distinct_placement_is_capped_by_dry_land() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let placed = EntityPlacer.place_distinct(grid, &mut rng, 1_000);
    assert_eq!(placed.len(), grid.dry_count());
}

#[test]
fn highest_placement_finds_the_summit() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);
    assert_eq!(EntityPlacer.place_highest(grid), CellCoord::new(4, 4));
}

#[test]
fn placement_is_reproducible_for_a_seed() {
    let (cells, side) = diamond();
    let grid = GridView::new(&cells, side);
    let first = EntityPlacer.place_distinct(grid, &mut ChaCha8Rng::seed_from_u64(8), 4);
    let second = EntityPlacer.place_distinct(grid, &mut ChaCha8Rng::seed_from_u64(8), 4);
    assert_eq!(first, second);
}
