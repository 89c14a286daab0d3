//! The A* expansion loop.

use gridstar_core::{Grid, Pos};

use crate::frontier::{Frontier, Push};
use crate::heuristic::manhattan;
use crate::outcome::{Outcome, Path, Report, SearchError, SearchStats};
use crate::reconstruct::{reconstruct, CameFrom};
use crate::step::{CancelToken, StepEvent, StepSink};

/// Cost of an unreached cell.
const UNREACHED: usize = usize::MAX;

/// Per-run scores and links. Nothing outlives a single call.
struct SearchState {
    g: Vec<usize>,
    f: Vec<usize>,
    came_from: CameFrom,
}

impl SearchState {
    fn new(grid: &Grid) -> Self {
        Self {
            g: vec![UNREACHED; grid.len()],
            f: vec![UNREACHED; grid.len()],
            came_from: CameFrom::new(grid.rows()),
        }
    }
}

/// Runs A* searches and reports their progress.
///
/// The engine holds no per-run state, so one value can serve any number of
/// sequential searches.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    cancel: Option<CancelToken>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop runs once `token` is cancelled. The token is polled once per
    /// expansion, before the next cell is popped.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Find a shortest path from `start` to `end`, feeding `sink` every step.
    ///
    /// `grid.refresh_adjacency()` must have been called since the last
    /// barrier edit; the engine trusts the cached neighbour lists.
    pub fn search<S>(
        &self,
        grid: &Grid,
        start: Pos,
        end: Pos,
        sink: &mut S,
    ) -> Result<Outcome, SearchError>
    where
        S: StepSink + ?Sized,
    {
        self.run(grid, start, end, sink).map(|report| report.outcome)
    }

    /// Like [`search`](Self::search), also returning run counters.
    pub fn run<S>(
        &self,
        grid: &Grid,
        start: Pos,
        end: Pos,
        sink: &mut S,
    ) -> Result<Report, SearchError>
    where
        S: StepSink + ?Sized,
    {
        let start_idx = passable_index(grid, start).ok_or(SearchError::InvalidStart(start))?;
        passable_index(grid, end).ok_or(SearchError::InvalidEnd(end))?;

        log::debug!("search {start} -> {end} on {0}x{0} grid", grid.rows());

        let mut stats = SearchStats::default();

        if start == end {
            return Ok(Report {
                outcome: Outcome::Found(Path::single(start)),
                stats,
            });
        }

        let mut state = SearchState::new(grid);
        let mut frontier = Frontier::new(grid.len());

        state.g[start_idx] = 0;
        state.f[start_idx] = manhattan(start, end);
        frontier.push(start_idx, start, state.f[start_idx]);
        stats.pushed = 1;

        let mut stop = false;

        let outcome = loop {
            if stop || self.cancel_requested() {
                break Outcome::Cancelled;
            }

            let Some((ci, current)) = frontier.pop() else {
                break Outcome::NotFound;
            };
            debug_assert!(!frontier.contains(ci));

            if current == end {
                let path = reconstruct(&state.came_from, end);
                // The path is complete; a late Break has nothing to stop.
                for &p in path.intermediate().iter().rev() {
                    let _ = sink.on_step(StepEvent::PathMember(p));
                }
                break Outcome::Found(path);
            }

            stats.expanded += 1;
            let current_g = state.g[ci];
            log::trace!(
                "expand {current} g={current_g} f={} frontier={}",
                state.f[ci],
                frontier.len()
            );

            for &np in grid.neighbors(current) {
                let Some(ni) = grid.index(np) else {
                    continue;
                };
                let tentative = current_g + 1;
                if tentative >= state.g[ni] {
                    continue;
                }

                state.came_from.set(np, current);
                state.g[ni] = tentative;
                state.f[ni] = tentative + manhattan(np, end);

                match frontier.push(ni, np, state.f[ni]) {
                    Push::Inserted => {
                        stats.pushed += 1;
                        if sink.on_step(StepEvent::OpenedFrontier(np)).is_break() {
                            stop = true;
                        }
                    }
                    Push::Rekeyed => stats.rekeyed += 1,
                    Push::Unchanged => {}
                }
            }

            if current != start && sink.on_step(StepEvent::Closed(current)).is_break() {
                stop = true;
            }
        };

        log::debug!(
            "search {start} -> {end}: {} after {} expansions",
            match &outcome {
                Outcome::Found(path) => format!("found {} moves", path.moves()),
                Outcome::NotFound => "no path".to_string(),
                Outcome::Cancelled => "cancelled".to_string(),
            },
            stats.expanded
        );

        Ok(Report { outcome, stats })
    }
}

/// Flat index of `p` if it is in bounds and not a barrier.
fn passable_index(grid: &Grid, p: Pos) -> Option<usize> {
    let cell = grid.cell(p)?;
    if cell.is_barrier() {
        return None;
    }
    grid.index(p)
}

/// Run a search with a default [`SearchEngine`].
pub fn search<S: StepSink>(
    grid: &Grid,
    start: Pos,
    end: Pos,
    mut on_step: S,
) -> Result<Outcome, SearchError> {
    SearchEngine::new().search(grid, start, end, &mut on_step)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::mpsc;

    use gridstar_core::CellState;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    use super::*;
    use crate::step::{Flow, StepLog};

    fn p(row: usize, col: usize) -> Pos {
        Pos::new(row, col)
    }

    fn grid_with(rows: usize, barriers: &[Pos]) -> Grid {
        let mut g = Grid::build(rows, rows * 10);
        for &b in barriers {
            g.set_barrier(b).unwrap();
        }
        g.refresh_adjacency();
        g
    }

    fn logged(grid: &Grid, start: Pos, end: Pos) -> (Result<Outcome, SearchError>, StepLog) {
        let mut log = StepLog::new();
        let res = SearchEngine::new().search(grid, start, end, &mut log);
        (res, log)
    }

    /// Breadth-first distances from `start` over the cached adjacency.
    fn bfs(grid: &Grid, start: Pos) -> HashMap<Pos, usize> {
        let mut dist = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(c) = queue.pop_front() {
            for &n in grid.neighbors(c) {
                if !dist.contains_key(&n) {
                    dist.insert(n, dist[&c] + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    #[test]
    fn start_equals_end_is_zero_move_path() {
        let g = grid_with(4, &[]);
        let (res, log) = logged(&g, p(2, 1), p(2, 1));
        let path = res.unwrap().into_path().unwrap();
        assert_eq!(path.moves(), 0);
        assert!(path.intermediate().is_empty());
        assert!(log.events().is_empty());
    }

    #[test]
    fn open_five_by_five() {
        let g = grid_with(5, &[]);
        let (res, log) = logged(&g, p(0, 0), p(4, 4));
        let path = res.unwrap().into_path().unwrap();
        assert_eq!(path.moves(), 8);
        assert_eq!(
            path.cells(),
            &[
                p(0, 0),
                p(1, 0),
                p(2, 0),
                p(3, 0),
                p(4, 0),
                p(4, 1),
                p(4, 2),
                p(4, 3),
                p(4, 4)
            ]
        );
        assert_eq!(
            &log.events()[..5],
            &[
                StepEvent::OpenedFrontier(p(1, 0)),
                StepEvent::OpenedFrontier(p(0, 1)),
                StepEvent::OpenedFrontier(p(2, 0)),
                StepEvent::OpenedFrontier(p(1, 1)),
                StepEvent::Closed(p(1, 0)),
            ]
        );
        // Path members run from the end's predecessor back toward the start.
        assert_eq!(
            log.cells(|e| matches!(e, StepEvent::PathMember(_))),
            vec![p(4, 3), p(4, 2), p(4, 1), p(4, 0), p(3, 0), p(2, 0), p(1, 0)]
        );
        assert!(!log.events().contains(&StepEvent::PathMember(p(4, 4))));
        assert!(!log.events().contains(&StepEvent::PathMember(p(0, 0))));
        assert!(!log.events().contains(&StepEvent::Closed(p(4, 4))));
    }

    #[test]
    fn full_wall_blocks_three_by_three() {
        let g = grid_with(3, &[p(0, 1), p(1, 1), p(2, 1)]);
        let mut log = StepLog::new();
        let report = SearchEngine::new().run(&g, p(0, 0), p(0, 2), &mut log).unwrap();
        assert_eq!(report.outcome, Outcome::NotFound);
        assert_eq!(
            log.events(),
            &[
                StepEvent::OpenedFrontier(p(1, 0)),
                StepEvent::OpenedFrontier(p(2, 0)),
                StepEvent::Closed(p(1, 0)),
                StepEvent::Closed(p(2, 0)),
            ]
        );
        assert_eq!(
            report.stats,
            SearchStats {
                expanded: 3,
                pushed: 3,
                rekeyed: 0
            }
        );
    }

    #[test]
    fn isolated_end_closes_every_reachable_cell_once() {
        let end = p(3, 3);
        let g = grid_with(6, &[p(2, 3), p(4, 3), p(3, 2), p(3, 4)]);
        let (res, log) = logged(&g, p(0, 0), end);
        assert_eq!(res, Ok(Outcome::NotFound));

        let closed = log.cells(|e| matches!(e, StepEvent::Closed(_)));
        let unique: HashSet<_> = closed.iter().copied().collect();
        assert_eq!(closed.len(), unique.len());

        let mut reachable: HashSet<_> = bfs(&g, p(0, 0)).into_keys().collect();
        reachable.remove(&p(0, 0));
        assert_eq!(unique, reachable);
        assert_eq!(unique.len(), 36 - 4 - 1 - 1);
    }

    /// .......
    /// .##S...
    /// .##...#
    /// ...##.#
    /// ......#
    /// ..##.#.
    /// .....#E
    ///
    /// Cells around the left loop are reached first by long routes and
    /// improved while still in the frontier. Without lowering their keys in
    /// place, (6, 0) surfaces late and is closed twice.
    #[test]
    fn improved_frontier_cells_are_rekeyed_not_reopened() {
        let barriers = [
            p(1, 1),
            p(1, 2),
            p(2, 1),
            p(2, 2),
            p(2, 6),
            p(3, 3),
            p(3, 4),
            p(3, 6),
            p(4, 6),
            p(5, 2),
            p(5, 3),
            p(5, 5),
            p(6, 5),
        ];
        let g = grid_with(7, &barriers);
        let (start, end) = (p(1, 3), p(6, 6));
        let mut log = StepLog::new();
        let report = SearchEngine::new().run(&g, start, end, &mut log).unwrap();
        assert_eq!(report.outcome, Outcome::NotFound);
        assert_eq!(
            report.stats,
            SearchStats {
                expanded: 34,
                pushed: 34,
                rekeyed: 4
            }
        );

        let opened = log.cells(|e| matches!(e, StepEvent::OpenedFrontier(_)));
        let closed = log.cells(|e| matches!(e, StepEvent::Closed(_)));
        let mut reachable: HashSet<_> = bfs(&g, start).into_keys().collect();
        reachable.remove(&start);
        assert_eq!(reachable.len(), 33);
        for cells in [&opened, &closed] {
            assert_eq!(cells.len(), 33);
            assert_eq!(cells.iter().copied().collect::<HashSet<_>>(), reachable);
        }
        assert_eq!(log.events().last(), Some(&StepEvent::Closed(p(6, 0))));
    }

    #[test]
    fn barrier_endpoints_are_rejected() {
        let g = grid_with(3, &[p(1, 1)]);
        let mut log = StepLog::new();
        let engine = SearchEngine::new();
        assert_eq!(
            engine.search(&g, p(1, 1), p(0, 0), &mut log),
            Err(SearchError::InvalidStart(p(1, 1)))
        );
        assert_eq!(
            engine.search(&g, p(0, 0), p(1, 1), &mut log),
            Err(SearchError::InvalidEnd(p(1, 1)))
        );
        assert!(log.events().is_empty());
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected() {
        let g = grid_with(3, &[]);
        let none = |_: StepEvent| Flow::Continue(());
        assert_eq!(
            search(&g, p(3, 0), p(0, 0), none),
            Err(SearchError::InvalidStart(p(3, 0)))
        );
        assert_eq!(
            search(&g, p(0, 0), p(0, 7), none),
            Err(SearchError::InvalidEnd(p(0, 7)))
        );
    }

    #[test]
    fn start_end_roles_do_not_block() {
        let mut g = grid_with(3, &[]);
        g.set_state(p(0, 0), CellState::Start).unwrap();
        g.set_state(p(2, 2), CellState::End).unwrap();
        g.refresh_adjacency();
        let res = search(&g, p(0, 0), p(2, 2), |_: StepEvent| Flow::Continue(())).unwrap();
        assert_eq!(res.path().map(Path::moves), Some(4));
    }

    #[test]
    fn detour_around_wall_is_shortest() {
        // . . . . .
        // . # # # .
        // . . S # E
        // . # # # .
        // . . . . .
        let walls = [p(1, 1), p(1, 2), p(1, 3), p(2, 3), p(3, 1), p(3, 2), p(3, 3)];
        let g = grid_with(5, &walls);
        let res = search(&g, p(2, 2), p(2, 4), |_: StepEvent| Flow::Continue(())).unwrap();
        let path = res.into_path().unwrap();
        assert_eq!(path.moves(), 10);
        assert_eq!(path.moves(), bfs(&g, p(2, 2))[&p(2, 4)]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let g = grid_with(8, &[p(1, 1), p(2, 2), p(3, 3), p(4, 2), p(5, 6), p(6, 5)]);
        let (a, log_a) = logged(&g, p(0, 7), p(7, 0));
        let (b, log_b) = logged(&g, p(0, 7), p(7, 0));
        assert_eq!(a, b);
        assert_eq!(log_a, log_b);
    }

    #[test]
    fn break_from_sink_cancels_after_current_expansion() {
        let g = grid_with(5, &[]);
        let mut events = Vec::new();
        let res = search(&g, p(0, 0), p(4, 4), |e: StepEvent| {
            events.push(e);
            Flow::Break(())
        });
        assert_eq!(res, Ok(Outcome::Cancelled));
        // The start's neighbours are still reported before the poll.
        assert_eq!(
            events,
            vec![
                StepEvent::OpenedFrontier(p(1, 0)),
                StepEvent::OpenedFrontier(p(0, 1))
            ]
        );
    }

    #[test]
    fn cancelled_token_stops_before_first_pop() {
        let g = grid_with(5, &[]);
        let token = CancelToken::new();
        token.cancel();
        let mut log = StepLog::new();
        let report = SearchEngine::new()
            .with_cancel(token)
            .run(&g, p(0, 0), p(4, 4), &mut log)
            .unwrap();
        assert_eq!(report.outcome, Outcome::Cancelled);
        assert_eq!(report.stats.expanded, 0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn token_tripped_mid_run() {
        let g = grid_with(10, &[]);
        let token = CancelToken::new();
        let engine = SearchEngine::new().with_cancel(token.clone());
        let mut closed = 0;
        let mut sink = |e: StepEvent| {
            if matches!(e, StepEvent::Closed(_)) {
                closed += 1;
                if closed == 3 {
                    token.cancel();
                }
            }
            Flow::Continue(())
        };
        let res = engine.search(&g, p(0, 0), p(9, 9), &mut sink);
        assert_eq!(res, Ok(Outcome::Cancelled));
        assert_eq!(closed, 3);
    }

    #[test]
    fn channel_sink_matches_log() {
        let g = grid_with(6, &[p(2, 2), p(2, 3), p(3, 2)]);
        let (tx, rx) = mpsc::channel();
        let worker = {
            let g = g.clone();
            std::thread::spawn(move || search(&g, p(0, 0), p(5, 5), tx))
        };
        let received: Vec<StepEvent> = rx.iter().collect();
        let outcome = worker.join().unwrap().unwrap();

        let (expected, log) = logged(&g, p(0, 0), p(5, 5));
        assert_eq!(Ok(outcome), expected);
        assert_eq!(received, log.into_events());
    }

    #[test]
    fn dropped_receiver_cancels() {
        let g = grid_with(4, &[]);
        let (tx, rx) = mpsc::channel::<StepEvent>();
        drop(rx);
        assert_eq!(search(&g, p(0, 0), p(3, 3), tx), Ok(Outcome::Cancelled));
    }

    #[test]
    fn replaying_events_marks_grid() {
        let mut g = grid_with(5, &[p(1, 1)]);
        g.set_state(p(0, 0), CellState::Start).unwrap();
        g.set_state(p(4, 4), CellState::End).unwrap();
        let snapshot = g.clone();
        let res = search(&snapshot, p(0, 0), p(4, 4), |e: StepEvent| {
            e.apply_to(&mut g);
            Flow::Continue(())
        })
        .unwrap();
        let path = res.into_path().unwrap();
        assert_eq!(g.state(p(0, 0)), Some(CellState::Start));
        assert_eq!(g.state(p(4, 4)), Some(CellState::End));
        assert_eq!(g.state(p(1, 1)), Some(CellState::Barrier));
        for &c in path.intermediate() {
            assert_eq!(g.state(c), Some(CellState::Path));
        }
        let path_cells = g.iter().filter(|c| c.state() == CellState::Path).count();
        assert_eq!(path_cells, path.intermediate().len());
    }

    // ---------------------------------------------------------------------
    // Properties over random grids
    // ---------------------------------------------------------------------

    #[derive(Clone, Debug)]
    struct Scenario {
        rows: usize,
        barriers: Vec<Pos>,
        start: Pos,
        end: Pos,
    }

    impl Scenario {
        fn grid(&self) -> Grid {
            grid_with(self.rows, &self.barriers)
        }
    }

    impl Arbitrary for Scenario {
        fn arbitrary(g: &mut Gen) -> Self {
            let rows = 1 + usize::arbitrary(g) % 9;
            let density = *g.choose(&[0u8, 0, 15, 30, 45]).unwrap_or(&0);
            let pick = |g: &mut Gen| p(usize::arbitrary(g) % rows, usize::arbitrary(g) % rows);
            let start = pick(g);
            let end = pick(g);
            let mut barriers = Vec::new();
            for row in 0..rows {
                for col in 0..rows {
                    let c = p(row, col);
                    if c != start && c != end && u8::arbitrary(g) % 100 < density {
                        barriers.push(c);
                    }
                }
            }
            Scenario {
                rows,
                barriers,
                start,
                end,
            }
        }
    }

    quickcheck! {
        fn finds_shortest_path_iff_reachable(s: Scenario) -> bool {
            let g = s.grid();
            let dist = bfs(&g, s.start);
            match search(&g, s.start, s.end, |_: StepEvent| Flow::Continue(())) {
                Ok(Outcome::Found(path)) => {
                    dist.get(&s.end) == Some(&path.moves())
                        && path.start() == s.start
                        && path.end() == s.end
                        && path.cells().windows(2).all(|w| g.neighbors(w[0]).contains(&w[1]))
                }
                Ok(Outcome::NotFound) => !dist.contains_key(&s.end),
                _ => false,
            }
        }

        fn open_grid_path_is_manhattan(s: Scenario) -> bool {
            let g = grid_with(s.rows, &[]);
            let res = search(&g, s.start, s.end, |_: StepEvent| Flow::Continue(()));
            res.ok().and_then(Outcome::into_path).map(|p| p.moves())
                == Some(manhattan(s.start, s.end))
        }

        // Once popped, a cell's cost is final: nothing is opened twice,
        // closed twice, or re-opened after closing.
        fn closed_cells_stay_closed(s: Scenario) -> bool {
            let g = s.grid();
            let (res, log) = logged(&g, s.start, s.end);
            if res.is_err() {
                return false;
            }
            let mut opened = HashSet::new();
            let mut closed = HashSet::new();
            for e in log.events() {
                let ok = match *e {
                    StepEvent::OpenedFrontier(c) => c != s.start && !closed.contains(&c) && opened.insert(c),
                    StepEvent::Closed(c) => c != s.start && opened.contains(&c) && closed.insert(c),
                    StepEvent::PathMember(c) => closed.contains(&c),
                };
                if !ok {
                    return false;
                }
            }
            true
        }

        fn not_found_closes_whole_component(s: Scenario) -> bool {
            let g = s.grid();
            let (res, log) = logged(&g, s.start, s.end);
            if res != Ok(Outcome::NotFound) {
                return true;
            }
            let closed: HashSet<_> = log.cells(|e| matches!(e, StepEvent::Closed(_))).into_iter().collect();
            let mut reachable: HashSet<_> = bfs(&g, s.start).into_keys().collect();
            reachable.remove(&s.start);
            closed == reachable
        }

        fn deterministic(s: Scenario) -> bool {
            let g = s.grid();
            logged(&g, s.start, s.end) == logged(&g, s.start, s.end)
        }
    }
}
