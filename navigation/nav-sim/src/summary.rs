//! End-of-run counters.

use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The agent stands on the goal.
    Reached,
    /// Replanning failed on too many consecutive ticks.
    Stalled,
    /// The tick limit ran out first.
    #[default]
    TickLimit,
}

/// Counters describing one navigation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Number of grid vertices.
    pub node_count: usize,
    /// Obstacles in the ground truth.
    pub world_obstacles: usize,
    /// Obstacles the agent discovered.
    pub sensed_obstacles: usize,
    /// Vertices travelled, including the start.
    pub path_length: usize,
    /// Metric length of the travelled trajectory.
    pub path_cost: f64,
    /// Successful replans.
    pub replans: usize,
    /// Replans that failed with a recoverable error.
    pub failed_replans: usize,
    /// Ticks executed.
    pub ticks: usize,
    /// Vertex expansions summed over all replans.
    pub expansions: usize,
    /// Changed edges absorbed over all replans.
    pub absorbed_edges: usize,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Returns `true` if the agent reached the goal.
    #[must_use]
    pub fn reached(&self) -> bool {
        self.outcome == RunOutcome::Reached
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_outcome_in_snake_case() {
        let summary = RunSummary {
            outcome: RunOutcome::TickLimit,
            ticks: 7,
            ..RunSummary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outcome"], "tick_limit");
        assert_eq!(json["ticks"], 7);
        assert!(!summary.reached());
    }
}
