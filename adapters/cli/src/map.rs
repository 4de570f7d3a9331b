//! ASCII rendering of the island.

use forbidden_island_core::CellCoord;
use forbidden_island_world::{query, World};

const WATER: char = '~';
const LOWLAND: char = '.';
const HILLS: char = ':';
const PEAKS: char = '^';
const PLAYER: char = '@';
const ITEM: char = '*';
const GOAL: char = 'H';

/// Renders one character per cell, one row per line.
///
/// Dry land is banded into thirds of the tallest cell's height. Entities
/// are drawn over terrain with the player on top.
pub(crate) fn render(world: &World) -> String {
    let view = query::grid_view(world);
    let summit = view
        .cells()
        .map(|cell| cell.height())
        .fold(0.0_f64, f64::max);
    let player = query::player(world);
    let goal = query::goal(world);
    let items = query::items(world);

    let side = view.side();
    let mut map = String::with_capacity(((side + 1) * side) as usize);
    for y in 0..side {
        for x in 0..side {
            let coord = CellCoord::new(x, y);
            let cell = view.cell(coord);
            let glyph = if coord == player {
                PLAYER
            } else if coord == goal {
                GOAL
            } else if items.iter().any(|item| item.cell == coord) {
                ITEM
            } else if cell.is_flooded() {
                WATER
            } else if cell.height() * 3.0 < summit {
                LOWLAND
            } else if cell.height() * 3.0 < summit * 2.0 {
                HILLS
            } else {
                PEAKS
            };
            map.push(glyph);
        }
        map.push('\n');
    }
    map
}
