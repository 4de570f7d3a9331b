#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure terrain generation system that turns a strategy into a height map.
//!
//! Generators never touch global state: every random decision is drawn from
//! the caller-provided [`Rng`], so a seeded generator reproduces the same
//! island bit for bit.

use forbidden_island_core::{CellCoord, HeightMap, TerrainStrategy, FRACTAL_PEAK_HEIGHT};
use rand::Rng;

const RANDOM_HEIGHT_MIN: u32 = 1;
const RANDOM_HEIGHT_MAX: u32 = 31;
const EDGE_SEED_HEIGHT: f64 = 1.0;
const DISPLACEMENT_SCALE: f64 = 0.1;
/// Depth of the band below the summit into which taller ridges are compressed.
const RIDGE_BAND: f64 = 4.0;

/// Produces `(S + 1) x (S + 1)` height maps for an island of size `S`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainGenerator {
    island_size: u32,
}

impl TerrainGenerator {
    /// Creates a generator for islands of the provided size.
    #[must_use]
    pub const fn new(island_size: u32) -> Self {
        Self { island_size }
    }

    /// Number of cells along each edge of generated maps.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.island_size + 1
    }

    /// Central cell of the island, where every strategy places its summit.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        let half = self.island_size / 2;
        CellCoord::new(half, half)
    }

    /// Generates a height map using the requested strategy.
    pub fn generate<R: Rng + ?Sized>(&self, strategy: TerrainStrategy, rng: &mut R) -> HeightMap {
        match strategy {
            TerrainStrategy::Pyramid => self.pyramid(),
            TerrainStrategy::Random => self.uniform_random(rng),
            TerrainStrategy::Fractal => self.fractal(rng),
        }
    }

    /// Diamond-shaped island whose height drops one foot per step from the center.
    #[must_use]
    pub fn pyramid(&self) -> HeightMap {
        let half = self.island_size / 2;
        HeightMap::from_fn(self.side(), |cell| match self.footprint_distance(cell) {
            Some(distance) => f64::from(half - distance),
            None => 0.0,
        })
    }

    /// Pyramid footprint filled with whole-foot heights drawn uniformly from `[1, 31]`.
    pub fn uniform_random<R: Rng + ?Sized>(&self, rng: &mut R) -> HeightMap {
        HeightMap::from_fn(self.side(), |cell| {
            if self.footprint_distance(cell).is_some() {
                f64::from(rng.gen_range(RANDOM_HEIGHT_MIN..=RANDOM_HEIGHT_MAX))
            } else {
                0.0
            }
        })
    }

    /// Midpoint-displacement island with exactly one summit at the center.
    ///
    /// Heights below sea level are raised to zero. Ridges that would reach
    /// the summit are compressed into the band just below it, keeping their
    /// relative order.
    pub fn fractal<R: Rng + ?Sized>(&self, rng: &mut R) -> HeightMap {
        let center = self.center();
        let mut map = self.displaced_surface(rng).into_height_map();
        for y in 0..self.side() {
            for x in 0..self.side() {
                let cell = CellCoord::new(x, y);
                if cell != center {
                    map.set(cell, below_summit(map.get(cell)));
                }
            }
        }
        map
    }

    fn displaced_surface<R: Rng + ?Sized>(&self, rng: &mut R) -> Surface {
        let last = self.island_size;
        let center = self.center();
        let mid = center.x();

        let mut surface = Surface::new(self.side());
        for corner in [
            CellCoord::new(0, 0),
            CellCoord::new(last, 0),
            CellCoord::new(0, last),
            CellCoord::new(last, last),
        ] {
            surface.assign(corner, 0.0);
        }
        surface.assign(center, FRACTAL_PEAK_HEIGHT);
        surface.assign(CellCoord::new(mid, 0), EDGE_SEED_HEIGHT);
        surface.assign(CellCoord::new(mid, last), EDGE_SEED_HEIGHT);
        surface.assign(CellCoord::new(0, mid), EDGE_SEED_HEIGHT);
        surface.assign(CellCoord::new(last, mid), EDGE_SEED_HEIGHT);

        surface.subdivide(Quadrant::new(0, 0, mid, mid), rng);
        surface.subdivide(Quadrant::new(mid, 0, last, mid), rng);
        surface.subdivide(Quadrant::new(0, mid, mid, last), rng);
        surface.subdivide(Quadrant::new(mid, mid, last, last), rng);
        surface.fill_gaps();
        surface
    }

    fn footprint_distance(&self, cell: CellCoord) -> Option<u32> {
        let distance = cell.manhattan_distance(self.center());
        (distance <= self.island_size / 2).then_some(distance)
    }
}

#[derive(Clone, Copy, Debug)]
struct Quadrant {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl Quadrant {
    const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    const fn is_base_case(&self) -> bool {
        self.x2 - self.x1 <= 1 || self.y2 - self.y1 <= 1
    }

    fn area(&self) -> f64 {
        f64::from(self.x2 - self.x1) * f64::from(self.y2 - self.y1)
    }

    const fn mid_x(&self) -> u32 {
        (self.x1 + self.x2) / 2
    }

    const fn mid_y(&self) -> u32 {
        (self.y1 + self.y2) / 2
    }
}

/// Height map under construction that remembers which cells were written.
#[derive(Debug)]
struct Surface {
    map: HeightMap,
    assigned: Vec<bool>,
}

impl Surface {
    fn new(side: u32) -> Self {
        Self {
            map: HeightMap::flat(side),
            assigned: vec![false; side as usize * side as usize],
        }
    }

    fn slot(&self, cell: CellCoord) -> usize {
        cell.y() as usize * self.map.side() as usize + cell.x() as usize
    }

    fn is_assigned(&self, cell: CellCoord) -> bool {
        self.assigned[self.slot(cell)]
    }

    fn assign(&mut self, cell: CellCoord, height: f64) {
        let slot = self.slot(cell);
        self.assigned[slot] = true;
        self.map.set(cell, height);
    }

    /// Writes `height` unless an earlier quadrant already settled the cell.
    fn assign_once(&mut self, cell: CellCoord, height: f64) {
        if !self.is_assigned(cell) {
            self.assign(cell, height);
        }
    }

    fn subdivide<R: Rng + ?Sized>(&mut self, quadrant: Quadrant, rng: &mut R) {
        if quadrant.is_base_case() {
            return;
        }

        let Quadrant { x1, y1, x2, y2 } = quadrant;
        let (mx, my) = (quadrant.mid_x(), quadrant.mid_y());
        let top_left = self.map.get(CellCoord::new(x1, y1));
        let top_right = self.map.get(CellCoord::new(x2, y1));
        let bottom_left = self.map.get(CellCoord::new(x1, y2));
        let bottom_right = self.map.get(CellCoord::new(x2, y2));
        let area = quadrant.area();

        let top = (top_left + top_right) / 2.0 + displacement(area, rng);
        self.assign_once(CellCoord::new(mx, y1), top);
        let left = (top_left + bottom_left) / 2.0 + displacement(area, rng);
        self.assign_once(CellCoord::new(x1, my), left);
        let right = (top_right + bottom_right) / 2.0 + displacement(area, rng);
        self.assign_once(CellCoord::new(x2, my), right);
        let bottom = (bottom_left + bottom_right) / 2.0 + displacement(area, rng);
        self.assign_once(CellCoord::new(mx, y2), bottom);
        let middle = (top_left + top_right + bottom_left + bottom_right) / 4.0
            + displacement(area, rng);
        self.assign_once(CellCoord::new(mx, my), middle);

        self.subdivide(Quadrant::new(x1, y1, mx, my), rng);
        self.subdivide(Quadrant::new(mx, y1, x2, my), rng);
        self.subdivide(Quadrant::new(x1, my, mx, y2), rng);
        self.subdivide(Quadrant::new(mx, my, x2, y2), rng);
    }

    /// Settles cells skipped by uneven subdivision from their settled neighbors.
    ///
    /// Island sizes that are powers of two never leave gaps.
    fn fill_gaps(&mut self) {
        let side = self.map.side();
        let last = side.saturating_sub(1);
        loop {
            let mut pending = false;
            for y in 0..side {
                for x in 0..side {
                    let cell = CellCoord::new(x, y);
                    if self.is_assigned(cell) {
                        continue;
                    }
                    let settled: Vec<f64> = [
                        (x.checked_sub(1), Some(y)),
                        (Some(x), y.checked_sub(1)),
                        ((x < last).then_some(x + 1), Some(y)),
                        (Some(x), (y < last).then_some(y + 1)),
                    ]
                    .into_iter()
                    .filter_map(|(nx, ny)| Some(CellCoord::new(nx?, ny?)))
                    .filter(|neighbor| self.is_assigned(*neighbor))
                    .map(|neighbor| self.map.get(neighbor))
                    .collect();

                    if settled.is_empty() {
                        pending = true;
                    } else {
                        let average = settled.iter().sum::<f64>() / settled.len() as f64;
                        self.assign(cell, average);
                    }
                }
            }
            if !pending {
                break;
            }
        }
    }

    fn into_height_map(self) -> HeightMap {
        self.map
    }
}

fn below_summit(height: f64) -> f64 {
    let knee = FRACTAL_PEAK_HEIGHT - RIDGE_BAND;
    if height <= knee {
        return height.max(0.0);
    }
    let excess = height - knee;
    let compressed = knee + RIDGE_BAND * excess / (excess + RIDGE_BAND);
    compressed.min(f64::from_bits(FRACTAL_PEAK_HEIGHT.to_bits() - 1))
}

fn displacement<R: Rng + ?Sized>(area: f64, rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) * area * DISPLACEMENT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pyramid_peaks_at_half_the_island_size() {
        let generator = TerrainGenerator::new(64);
        let map = generator.pyramid();
        assert_eq!(map.side(), 65);
        assert_eq!(map.get(CellCoord::new(32, 32)), 32.0);
        assert_eq!(map.get(CellCoord::new(31, 32)), 31.0);
        assert_eq!(map.get(CellCoord::new(0, 32)), 0.0);
        assert_eq!(map.get(CellCoord::new(0, 0)), 0.0);
    }

    #[test]
    fn quadrant_base_case_triggers_on_either_axis() {
        assert!(Quadrant::new(0, 0, 1, 8).is_base_case());
        assert!(Quadrant::new(0, 0, 8, 1).is_base_case());
        assert!(!Quadrant::new(0, 0, 2, 2).is_base_case());
    }

    #[test]
    fn uneven_island_sizes_leave_no_gaps() {
        for island_size in [5, 6, 10, 13] {
            let generator = TerrainGenerator::new(island_size);
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            let surface = generator.displaced_surface(&mut rng);
            assert!(
                surface.assigned.iter().all(|settled| *settled),
                "island size {island_size} left unsettled cells"
            );
        }
    }

    #[test]
    fn ridges_are_compressed_below_the_summit_in_order() {
        assert_eq!(below_summit(-3.0), 0.0);
        assert_eq!(below_summit(12.5), 12.5);
        assert_eq!(below_summit(28.0), 28.0);

        let heights = [29.0, 31.0, 32.0, 40.0, 90.0, 1.0e300];
        let compressed: Vec<f64> = heights.iter().map(|h| below_summit(*h)).collect();
        assert!(compressed.iter().all(|h| *h < FRACTAL_PEAK_HEIGHT));
        assert!(compressed.windows(2).take(4).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn displacement_shrinks_with_quadrant_area() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(displacement(4.0, &mut rng).abs() <= 0.2);
        }
    }
}
