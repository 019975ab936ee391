//! Scanner output fed into the planner.
//!
//! Run with: cargo test -p sensor-scan --test scan_and_plan

#![allow(clippy::unwrap_used)]

use grid_spatial::{CellCoord, Connectivity};
use plan_dstar::DStarLite;
use plan_types::{DistanceMetric, PlannerConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sensor_scan::{LocalScanner, RescanSource, SensorConfig, World};

fn walk(world: World, config: PlannerConfig, view_range: u32) -> (usize, DStarLite, LocalScanner) {
    let start = CellCoord::origin();
    let goal = CellCoord::new(world.width() as i32 - 1, world.height() as i32 - 1);
    let sensor_config = SensorConfig::new()
        .with_view_range(view_range)
        .with_metric(config.metric());

    let mut planner = DStarLite::new(world.width(), world.height(), start, goal, config).unwrap();
    let mut scanner = LocalScanner::new(world, sensor_config).unwrap();

    let mut position = start;
    let mut steps = 0;
    while position != goal {
        planner.queue_rescan(scanner.rescan(position).unwrap());
        let plan = planner.move_and_replan(position).unwrap();
        assert_eq!(planner.sensed_map(), scanner.sensed_map());

        position = plan.path().next_step().unwrap();
        assert!(scanner.world().is_unoccupied(position).unwrap());
        steps += 1;
        assert!(steps < 10_000);
    }
    (steps, planner, scanner)
}

#[test]
fn agent_reaches_goal_in_random_world() {
    let keep = [CellCoord::new(0, 0), CellCoord::new(29, 19)];
    let world = World::random(30, 20, 0.15, &mut StdRng::seed_from_u64(42), &keep).unwrap();
    let truth = world.grid().clone();

    let oracle = DStarLite::with_map(truth, keep[0], keep[1], PlannerConfig::default())
        .unwrap()
        .move_and_replan(keep[0]);
    if oracle.is_err() {
        // Seeded world happened to wall off the goal
        return;
    }

    let (steps, planner, scanner) = walk(world, PlannerConfig::default(), 4);
    assert!(steps >= 29);
    assert!(planner.k_m() > 0.0);
    assert!(scanner.sensed_map().obstacle_count() <= scanner.world().obstacle_count());
}

#[test]
fn four_connected_manhattan_agent() {
    let rows = [
        "..........",
        "..#####...",
        "......#...",
        "####..#.##",
        ".......#..",
        "..#.......",
    ];
    let world = World::from_grid(grid_spatial::OccupancyGrid::from_rows(&rows).unwrap());
    let config = PlannerConfig::new()
        .with_connectivity(Connectivity::Four)
        .with_metric(DistanceMetric::Manhattan);

    let (steps, _, scanner) = walk(world, config, 2);
    // Manhattan distance is a lower bound on any 4-connected walk
    assert!(steps >= 14);
    assert!(scanner.sensed_map().obstacle_count() > 0);
}

#[test]
fn world_edits_between_ticks_are_reported() {
    let mut scanner = LocalScanner::new(World::new(8, 8).unwrap(), SensorConfig::new()).unwrap();
    let mut planner = DStarLite::new(
        8,
        8,
        CellCoord::new(0, 0),
        CellCoord::new(7, 7),
        PlannerConfig::default(),
    )
    .unwrap();

    planner.queue_rescan(scanner.rescan(CellCoord::new(0, 0)).unwrap());
    let before = planner.move_and_replan(CellCoord::new(0, 0)).unwrap();
    assert!(before.path().contains(CellCoord::new(3, 3)));

    scanner.world_mut().place_obstacle(CellCoord::new(3, 3)).unwrap();
    planner.queue_rescan(scanner.rescan(CellCoord::new(1, 1)).unwrap());
    let after = planner.move_and_replan(CellCoord::new(1, 1)).unwrap();
    assert!(!after.path().contains(CellCoord::new(3, 3)));
    assert_eq!(planner.sensed_map(), scanner.sensed_map());
}
