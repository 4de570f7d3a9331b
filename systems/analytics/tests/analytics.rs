use forbidden_island_core::{
    CellCoord, Command, Event, HeightMap, Outcome, SimulationConfig, TerrainStrategy,
};
use forbidden_island_system_analytics::{Analytics, FloodReport};
use forbidden_island_world::{self as world, query, Scenario, World};

fn drive(world: &mut World, analytics: &mut Analytics, commands: &[Command]) -> Vec<FloodReport> {
    let mut reports = Vec::new();
    for command in commands {
        let mut events = Vec::new();
        world::apply(world, *command, &mut events);
        analytics.handle(&events, &mut reports);
    }
    reports
}

#[test]
fn reports_follow_every_rise_until_the_island_drowns() {
    let heights = HeightMap::from_rows(&[
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 1.0, 1.0, 0.0],
        vec![0.0, 1.0, 2.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
    ]);
    let mut world = World::from_scenario(
        SimulationConfig {
            flood_cadence: 2,
            inventory_to_win: 1,
            ..SimulationConfig::default()
        },
        Scenario {
            heights,
            player: CellCoord::new(2, 2),
            items: vec![CellCoord::new(2, 2)],
            goal: CellCoord::new(0, 0),
        },
    )
    .expect("scenario is valid");
    let mut analytics = Analytics::new();

    let reports = drive(&mut world, &mut analytics, &[Command::Tick; 10]);
    assert_eq!(query::outcome(&world), Outcome::Lost);

    let levels: Vec<u32> = reports.iter().map(FloodReport::water_level).collect();
    assert_eq!(levels, vec![1, 2, 2]);
    assert_eq!(reports[0].cells_flooded(), 8);
    assert_eq!(reports[1].cells_flooded(), 9);
    assert_eq!(reports[2].outcome(), Outcome::Lost);

    let summary = analytics.summary();
    assert_eq!(summary.ticks(), 4);
    assert_eq!(summary.rises(), 2);
    assert_eq!(summary.items_collected(), 1);
    assert_eq!(summary, reports[2]);
}

#[test]
fn world_reset_starts_a_fresh_summary() {
    let config = SimulationConfig {
        island_size: 8,
        ..SimulationConfig::default()
    };
    let mut world = World::try_new(config, TerrainStrategy::Pyramid, 1).expect("config is valid");
    let mut analytics = Analytics::new();

    let _ = drive(&mut world, &mut analytics, &[Command::Tick; 2]);
    assert_eq!(analytics.summary().ticks(), 2);

    let _ = drive(
        &mut world,
        &mut analytics,
        &[Command::Reset {
            strategy: TerrainStrategy::Random,
            seed: 2,
        }],
    );
    assert_eq!(analytics.summary(), FloodReport::default());
}
