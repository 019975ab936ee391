//! Output surfaces for the navigation loop.
//!
//! The navigator hands a [`Frame`] to its [`Presentation`] once per tick.
//! Presentations only read frames; nothing they do feeds back into planning.

use std::io::Write;

use grid_spatial::{CellCoord, OccupancyGrid};
use plan_types::{CellPath, PlanStats, Visit};

use crate::error::Result;
use crate::summary::RunSummary;

/// Snapshot of one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Tick number, starting at 0.
    pub tick: usize,
    /// Agent position at the start of the tick.
    pub position: CellCoord,
    /// Goal cell.
    pub goal: CellCoord,
    /// The planner's sensed map after absorbing this tick's scan.
    pub sensed_map: &'a OccupancyGrid,
    /// Planned path, if replanning succeeded.
    pub path: Option<&'a CellPath>,
    /// Vertices expanded during this tick's replan.
    pub visited: &'a [Visit],
    /// Replan diagnostics, if replanning succeeded.
    pub stats: Option<&'a PlanStats>,
}

/// Receives frames from the navigator.
pub trait Presentation {
    /// Shows one tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Shows the end-of-run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        let _ = summary;
        Ok(())
    }
}

impl<P: Presentation + ?Sized> Presentation for &mut P {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).render(frame)
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        (**self).finish(summary)
    }
}

/// Discards every frame. Used for headless runs and benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}

/// Draws each frame as ASCII art.
///
/// | Marker | Meaning |
/// |---|---|
/// | `@` | agent |
/// | `G` | goal |
/// | `#` | sensed obstacle |
/// | `*` | planned path |
/// | `+` | expanded this tick |
/// | `.` | free |
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, OccupancyGrid};
/// use nav_sim::{Frame, Presentation, TerminalPresentation};
///
/// let map = OccupancyGrid::from_rows(&["...", ".#.", "..."]).unwrap();
/// let mut out = Vec::new();
/// let mut presentation = TerminalPresentation::new(&mut out);
/// presentation
///     .render(&Frame {
///         tick: 0,
///         position: CellCoord::new(0, 0),
///         goal: CellCoord::new(2, 2),
///         sensed_map: &map,
///         path: None,
///         visited: &[],
///         stats: None,
///     })
///     .unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("@..\n.#.\n..G\n"));
/// ```
#[derive(Debug)]
pub struct TerminalPresentation<W: Write> {
    out: W,
    every: usize,
}

impl<W: Write> TerminalPresentation<W> {
    /// Creates a presentation that draws every tick to `out`.
    pub const fn new(out: W) -> Self {
        Self { out, every: 1 }
    }

    /// Draws only every `n`th tick. `0` is treated as `1`.
    #[must_use]
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn marker(frame: &Frame<'_>, cell: CellCoord) -> char {
        if cell == frame.position {
            '@'
        } else if cell == frame.goal {
            'G'
        } else if frame
            .sensed_map
            .get(cell)
            .is_some_and(grid_spatial::Occupancy::is_obstacle)
        {
            '#'
        } else if frame.path.is_some_and(|p| p.contains(cell)) {
            '*'
        } else if frame.visited.iter().any(|v| v.cell == cell) {
            '+'
        } else {
            '.'
        }
    }
}

impl<W: Write> Presentation for TerminalPresentation<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        if frame.tick % self.every != 0 {
            return Ok(());
        }

        match (frame.path, frame.stats) {
            (Some(path), Some(stats)) => writeln!(
                self.out,
                "tick {} at {}: {} steps, cost {:.2}, {} expansions",
                frame.tick,
                frame.position,
                path.step_count(),
                path.cost(),
                stats.expansions()
            )?,
            _ => writeln!(
                self.out,
                "tick {} at {}: no path",
                frame.tick, frame.position
            )?,
        }

        let bounds = frame.sensed_map.bounds();
        for y in bounds.min.y..=bounds.max.y {
            let line: String = (bounds.min.x..=bounds.max.x)
                .map(|x| Self::marker(frame, CellCoord::new(x, y)))
                .collect();
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(
            self.out,
            "{:?} after {} ticks: travelled {} cells, {} replans",
            summary.outcome, summary.ticks, summary.path_length, summary.replans
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use plan_types::Priority;

    fn frame<'a>(map: &'a OccupancyGrid, path: Option<&'a CellPath>, visited: &'a [Visit], tick: usize) -> Frame<'a> {
        Frame {
            tick,
            position: CellCoord::new(0, 1),
            goal: CellCoord::new(3, 1),
            sensed_map: map,
            path,
            visited,
            stats: None,
        }
    }

    #[test]
    fn test_markers() {
        let map = OccupancyGrid::from_rows(&["..#.", "....", "...."]).unwrap();
        let path = CellPath::new(
            vec![CellCoord::new(0, 1), CellCoord::new(1, 1), CellCoord::new(2, 1), CellCoord::new(3, 1)],
            3.0,
        );
        let visited = [Visit::new(CellCoord::new(1, 2), Priority::new(1.0, 1.0))];

        let mut presentation = TerminalPresentation::new(Vec::new());
        presentation.render(&frame(&map, Some(&path), &visited, 0)).unwrap();
        let text = String::from_utf8(presentation.into_inner()).unwrap();

        assert!(text.contains("..#.\n@**G\n.+..\n"));
        assert!(text.contains("no path"));
    }

    #[test]
    fn test_every_skips_ticks() {
        let map = OccupancyGrid::new(2, 2);
        let mut presentation = TerminalPresentation::new(Vec::new()).every(3);
        for tick in 0..6 {
            presentation.render(&frame(&map, None, &[], tick)).unwrap();
        }
        let text = String::from_utf8(presentation.into_inner()).unwrap();
        assert_eq!(text.matches("tick").count(), 2);
    }

    #[test]
    fn test_null_presentation_accepts_everything() {
        let map = OccupancyGrid::new(1, 1);
        let mut presentation = NullPresentation;
        assert!(presentation.render(&frame(&map, None, &[], 0)).is_ok());
        assert!(presentation.finish(&RunSummary::default()).is_ok());
    }
}
