#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that summarises a flooding run.

use forbidden_island_core::{Event, Outcome};

/// Snapshot of the running totals observed since the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FloodReport {
    ticks: u64,
    water_level: u32,
    rises: u32,
    cells_flooded: u64,
    items_collected: u32,
    outcome: Outcome,
}

impl FloodReport {
    /// Ticks observed since the last reset.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Most recent water level reported by the world.
    #[must_use]
    pub const fn water_level(&self) -> u32 {
        self.water_level
    }

    /// Number of times the water rose.
    #[must_use]
    pub const fn rises(&self) -> u32 {
        self.rises
    }

    /// Cells that transitioned from dry to flooded.
    #[must_use]
    pub const fn cells_flooded(&self) -> u64 {
        self.cells_flooded
    }

    /// Items picked up by the player.
    #[must_use]
    pub const fn items_collected(&self) -> u32 {
        self.items_collected
    }

    /// Outcome of the run, `InProgress` until decided.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }
}

/// Pure analytics system that folds world events into flood reports.
#[derive(Debug, Default)]
pub struct Analytics {
    totals: FloodReport,
}

impl Analytics {
    /// Creates a new analytics system with empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the totals accumulated so far.
    #[must_use]
    pub fn summary(&self) -> FloodReport {
        self.totals
    }

    /// Consumes world events and publishes a report whenever the water rises
    /// or the outcome is decided.
    ///
    /// A rise is reported once the cells it flooded have been counted, so the
    /// published report always reflects the whole propagation pass.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<FloodReport>) {
        let mut rise_pending = false;

        for event in events {
            match event {
                Event::WorldReset { .. } => {
                    self.flush_rise(&mut rise_pending, out);
                    self.totals = FloodReport::default();
                }
                Event::TimeAdvanced { .. } => {
                    self.flush_rise(&mut rise_pending, out);
                    self.totals.ticks += 1;
                }
                Event::WaterRose { level } => {
                    self.flush_rise(&mut rise_pending, out);
                    self.totals.water_level = *level;
                    self.totals.rises += 1;
                    rise_pending = true;
                }
                Event::CellFlooded { .. } => self.totals.cells_flooded += 1,
                Event::ItemCollected { .. } => self.totals.items_collected += 1,
                Event::OutcomeDecided { outcome } => {
                    self.flush_rise(&mut rise_pending, out);
                    self.totals.outcome = *outcome;
                    out.push(self.totals);
                }
                Event::PlayerMoved { .. } => {}
            }
        }

        self.flush_rise(&mut rise_pending, out);
    }

    fn flush_rise(&self, pending: &mut bool, out: &mut Vec<FloodReport>) {
        if std::mem::take(pending) {
            out.push(self.totals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forbidden_island_core::{CellCoord, ItemId, TerrainStrategy};

    #[test]
    fn rise_report_counts_the_whole_pass() {
        let mut analytics = Analytics::new();
        let mut reports = Vec::new();
        analytics.handle(
            &[
                Event::TimeAdvanced { tick_counter: 0 },
                Event::WaterRose { level: 1 },
                Event::CellFlooded {
                    cell: CellCoord::new(1, 0),
                },
                Event::CellFlooded {
                    cell: CellCoord::new(2, 0),
                },
            ],
            &mut reports,
        );

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].water_level(), 1);
        assert_eq!(reports[0].cells_flooded(), 2);
        assert_eq!(reports[0].ticks(), 1);
    }

    #[test]
    fn quiet_ticks_publish_nothing() {
        let mut analytics = Analytics::new();
        let mut reports = Vec::new();
        analytics.handle(&[Event::TimeAdvanced { tick_counter: 1 }], &mut reports);
        analytics.handle(
            &[Event::ItemCollected {
                item: ItemId::new(0),
                cell: CellCoord::new(3, 3),
            }],
            &mut reports,
        );

        assert!(reports.is_empty());
        assert_eq!(analytics.summary().ticks(), 1);
        assert_eq!(analytics.summary().items_collected(), 1);
    }

    #[test]
    fn reset_clears_totals() {
        let mut analytics = Analytics::new();
        let mut reports = Vec::new();
        analytics.handle(
            &[
                Event::TimeAdvanced { tick_counter: 0 },
                Event::OutcomeDecided {
                    outcome: Outcome::Lost,
                },
            ],
            &mut reports,
        );
        assert_eq!(reports.last().map(FloodReport::outcome), Some(Outcome::Lost));

        analytics.handle(
            &[Event::WorldReset {
                strategy: TerrainStrategy::Pyramid,
                seed: 4,
            }],
            &mut reports,
        );
        assert_eq!(analytics.summary(), FloodReport::default());
    }
}
