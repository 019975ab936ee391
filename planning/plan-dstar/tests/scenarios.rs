//! End-to-end replanning scenarios.
//!
//! Each scenario drives a planner through moves and sensor rescans and
//! checks the result against a planner built from scratch on the same
//! sensed map.
//!
//! Run with: cargo test -p plan-dstar --test scenarios

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use grid_spatial::{CellCoord, Connectivity, Occupancy, OccupancyGrid};
use plan_dstar::DStarLite;
use plan_types::{ChangedEdge, DistanceMetric, LocalPatch, PlannerConfig, PlanningError, Rescan};

// =============================================================================
// Helpers
// =============================================================================

fn c(x: i32, y: i32) -> CellCoord {
    CellCoord::new(x, y)
}

/// Reports every cell within `radius` of `center` whose true occupancy
/// differs from what the planner believes, with the edges touching it.
fn sense(planner: &DStarLite, truth: &OccupancyGrid, center: CellCoord, radius: u32) -> Rescan {
    let patch = LocalPatch::capture(truth, center, radius).unwrap();
    let mut edges: Vec<ChangedEdge> = Vec::new();
    for (cell, state) in patch.iter() {
        if planner.sensed_map().get(cell) == Some(state) {
            continue;
        }
        for n in truth.successors(cell, Connectivity::Eight, false).unwrap() {
            let edge = ChangedEdge::new(cell, n, planner.cost(cell, n));
            if !edges.iter().any(|e| e.key() == edge.key()) {
                edges.push(edge);
            }
        }
    }
    Rescan::new(center, edges, patch)
}

/// Cost of the best path on `planner`'s sensed map, computed from scratch.
fn scratch_cost(planner: &DStarLite, start: CellCoord) -> Result<f64, PlanningError> {
    let mut fresh = DStarLite::with_map(
        planner.sensed_map().clone(),
        start,
        planner.goal(),
        planner.config().clone(),
    )?;
    Ok(fresh.move_and_replan(start)?.path().cost())
}

fn assert_visits_bounded_by_start_key(planner: &DStarLite) {
    let bound = planner.calculate_key(planner.start()).k1;
    for visit in planner.visited() {
        assert!(
            visit.key.k1 <= bound + 1e-9,
            "expanded {} with key {} above the start key {bound}",
            visit.cell,
            visit.key
        );
    }
}

// =============================================================================
// Static maps
// =============================================================================

#[test]
fn three_by_three_four_connected() {
    let config = PlannerConfig::new()
        .with_connectivity(Connectivity::Four)
        .with_metric(DistanceMetric::Manhattan);
    let mut planner = DStarLite::new(3, 3, c(0, 0), c(2, 2), config).unwrap();

    let plan = planner.move_and_replan(c(0, 0)).unwrap();
    assert_eq!(plan.path().len(), 5);
    assert_eq!(plan.path().cost(), 4.0);
    assert_eq!(planner.g(c(0, 0)), 4.0);
    assert_eq!(planner.g(c(2, 2)), 0.0);
}

#[test]
fn quiescent_after_convergence() {
    let map = OccupancyGrid::from_rows(&[
        "............",
        ".#########..",
        "...........#",
        "##########..",
        "............",
    ])
    .unwrap();
    let mut planner =
        DStarLite::with_map(map, c(0, 0), c(0, 4), PlannerConfig::default()).unwrap();

    let first = planner.move_and_replan(c(0, 0)).unwrap();
    assert!(first.stats().expansions() > 0);
    assert_eq!(planner.compute_shortest_path().unwrap(), 0);

    let again = planner.move_and_replan(c(0, 0)).unwrap();
    assert_eq!(again.stats().expansions(), 0);
    assert_eq!(first.path(), again.path());
}

#[test]
fn identical_inputs_give_identical_paths() {
    let run = || {
        let mut planner = DStarLite::new(9, 9, c(0, 4), c(8, 4), PlannerConfig::default()).unwrap();
        planner.move_and_replan(c(0, 4)).unwrap().into_path()
    };
    assert_eq!(run(), run());
}

// =============================================================================
// Discovered obstacles
// =============================================================================

#[test]
fn obstacle_on_diagonal_raises_cost() {
    let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), PlannerConfig::default()).unwrap();
    let before = planner.move_and_replan(c(0, 0)).unwrap();
    assert_relative_eq!(before.path().cost(), 4.0 * std::f64::consts::SQRT_2, epsilon = 1e-9);

    let mut truth = OccupancyGrid::new(5, 5);
    truth.set(c(2, 2), Occupancy::Obstacle).unwrap();
    let rescan = sense(&planner, &truth, c(0, 0), 2);
    assert_eq!(rescan.changed_edges().len(), 8);
    planner.queue_rescan(rescan);

    let after = planner.move_and_replan(c(0, 0)).unwrap();
    assert!(!after.path().contains(c(2, 2)));
    assert!(after.path().cost() >= before.path().cost());
    assert_relative_eq!(after.path().cost(), scratch_cost(&planner, c(0, 0)).unwrap(), epsilon = 1e-9);
    assert_visits_bounded_by_start_key(&planner);
}

/// Both neighbors of the goal next to the obstacle at (3, 3) give the same
/// cost `2 + 3√2`. Blocking either one leaves the other as the only route,
/// and its keys tie the start key up to rounding.
#[test]
fn blocked_goal_neighbor_with_irrational_costs() {
    let expected = 2.0 + 3.0 * std::f64::consts::SQRT_2;
    for metric in [DistanceMetric::Octile, DistanceMetric::Euclidean] {
        for (blocked, detour) in [(c(3, 4), c(4, 3)), (c(4, 3), c(3, 4))] {
            let config = PlannerConfig::new()
                .with_connectivity(Connectivity::Eight)
                .with_metric(metric);
            let mut map = OccupancyGrid::new(5, 5);
            map.set(c(3, 3), Occupancy::Obstacle).unwrap();
            let mut truth = map.clone();
            truth.set(blocked, Occupancy::Obstacle).unwrap();

            let mut planner = DStarLite::with_map(map, c(0, 0), c(4, 4), config).unwrap();
            let before = planner.move_and_replan(c(0, 0)).unwrap();
            assert_relative_eq!(before.path().cost(), expected, epsilon = 1e-9);

            planner.queue_rescan(sense(&planner, &truth, blocked, 0));
            let after = planner.move_and_replan(c(0, 0)).unwrap();

            assert!(after.path().contains(detour), "{metric:?} blocked {blocked}");
            assert!(!after.path().contains(blocked));
            assert!(after.path().is_contiguous(Connectivity::Eight));
            assert_relative_eq!(after.path().cost(), expected, epsilon = 1e-9);
            assert_relative_eq!(after.path().cost(), scratch_cost(&planner, c(0, 0)).unwrap(), epsilon = 1e-9);
            assert!(planner.consistency(c(0, 0)).is_consistent());
        }
    }
}

#[test]
fn walking_agent_matches_scratch_planner() {
    let truth = OccupancyGrid::from_rows(&[
        "...............",
        "......#........",
        "......#..####..",
        "..###.#.....#..",
        "......#.....#..",
        "......####..#..",
        "............#..",
        "..#######...#..",
        "...............",
    ])
    .unwrap();
    let start = c(0, 0);
    let goal = c(14, 8);
    let mut planner =
        DStarLite::with_map(OccupancyGrid::new(15, 9), start, goal, PlannerConfig::default())
            .unwrap();

    let mut position = start;
    let mut steps = 0;
    while position != goal {
        let rescan = sense(&planner, &truth, position, 2);
        planner.queue_rescan(rescan);

        let plan = planner.move_and_replan(position).unwrap();
        assert_relative_eq!(
            plan.path().cost(),
            scratch_cost(&planner, position).unwrap(),
            epsilon = 1e-9
        );
        assert_visits_bounded_by_start_key(&planner);
        assert!(
            plan.path()
                .iter()
                .all(|&cell| planner.sensed_map().is_unoccupied(cell).unwrap())
        );

        position = plan.path().next_step().unwrap_or(goal);
        assert!(truth.is_unoccupied(position).unwrap());
        steps += 1;
        assert!(steps < 200, "agent did not reach the goal");
    }
    assert!(planner.k_m() > 0.0);
}

#[test]
fn enclosed_goal_reports_no_path() {
    let mut planner = DStarLite::new(7, 7, c(0, 0), c(3, 3), PlannerConfig::default()).unwrap();
    planner.move_and_replan(c(0, 0)).unwrap();

    let mut truth = OccupancyGrid::new(7, 7);
    for x in 2..=4 {
        for y in 2..=4 {
            if (x, y) != (3, 3) {
                truth.set(c(x, y), Occupancy::Obstacle).unwrap();
            }
        }
    }
    planner.queue_rescan(sense(&planner, &truth, c(3, 3), 1));

    let error = planner.move_and_replan(c(1, 1)).unwrap_err();
    assert_eq!(
        error,
        PlanningError::NoPath {
            start: c(1, 1),
            goal: c(3, 3),
        }
    );
    assert!(planner.rhs(c(1, 1)).is_infinite());
    assert!(planner.g(c(1, 1)).is_infinite());
}

#[test]
fn cleared_obstacle_reopens_shortcut() {
    let truth = OccupancyGrid::new(9, 3);
    let believed = OccupancyGrid::from_rows(&[".........", "....#....", "........."]).unwrap();
    let config = PlannerConfig::new()
        .with_connectivity(Connectivity::Four)
        .with_metric(DistanceMetric::Manhattan);
    let mut planner = DStarLite::with_map(believed, c(0, 1), c(8, 1), config).unwrap();

    let detour = planner.move_and_replan(c(0, 1)).unwrap();
    assert_eq!(detour.path().cost(), 10.0);

    planner.queue_rescan(sense(&planner, &truth, c(3, 1), 1));
    let plan = planner.move_and_replan(c(1, 1)).unwrap();
    assert_eq!(plan.path().cost(), 7.0);
    assert!(plan.path().contains(c(4, 1)));
}

// =============================================================================
// Error handling
// =============================================================================

#[test]
fn malformed_rescan_is_rejected_without_side_effects() {
    let mut planner = DStarLite::new(6, 6, c(0, 0), c(5, 5), PlannerConfig::default()).unwrap();
    planner.move_and_replan(c(0, 0)).unwrap();
    let snapshot = planner.clone();

    // (2,2) is free so the edge costs 1, not infinity
    let mut truth = OccupancyGrid::new(6, 6);
    truth.set(c(2, 2), Occupancy::Obstacle).unwrap();
    let bogus = Rescan::new(
        c(0, 0),
        vec![ChangedEdge::new(c(2, 2), c(3, 2), f64::INFINITY)],
        LocalPatch::capture(&truth, c(2, 2), 1).unwrap(),
    );

    let error = planner.absorb_rescan(&bogus).unwrap_err();
    assert!(matches!(error, PlanningError::MalformedRescan(_)));
    assert_eq!(planner.sensed_map(), snapshot.sensed_map());
    assert_eq!(planner.g_table(), snapshot.g_table());
    assert_eq!(planner.rhs_table(), snapshot.rhs_table());
    assert_eq!(planner.open_len(), snapshot.open_len());
}

#[test]
fn timeout_leaves_planner_resumable() {
    let config = PlannerConfig::new().with_max_iterations(5);
    let mut planner = DStarLite::new(12, 12, c(0, 0), c(11, 11), config).unwrap();

    let error = planner.move_and_replan(c(0, 0)).unwrap_err();
    assert!(error.is_timeout());

    let mut attempts = 0;
    let plan = loop {
        attempts += 1;
        match planner.move_and_replan(c(0, 0)) {
            Ok(plan) => break plan,
            Err(e) if e.is_timeout() => assert!(attempts < 500),
            Err(e) => panic!("unexpected error: {e}"),
        }
    };
    assert_relative_eq!(plan.path().cost(), 11.0 * std::f64::consts::SQRT_2, epsilon = 1e-9);
}
