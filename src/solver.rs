//! Lowest total risk from the top-left cell to the bottom-right cell.
//!
//! This is Dijkstra's algorithm.  Entering a cell costs that cell's
//! risk, and every risk is at least 1, so the first time the target is
//! settled its distance is final and the search stops there.  That
//! early exit would be wrong if zero or negative risks were ever
//! allowed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::{self, Display, Formatter};

use clap::ValueEnum;
use tracing::{event, span, Level};

use crate::error::{Error, Result};
use crate::grid::{Grid, Position};

/// How the solver picks the next cell to settle.  Both strategies
/// break ties between equally distant cells in row-major order, so
/// they settle cells in the same order and record the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Scan every cell on every round: O(V²).
    Scan,
    /// Keep candidate cells in a binary heap: O((V+E) log V).
    Heap,
}

impl Default for Strategy {
    fn default() -> Strategy {
        Strategy::Heap
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Scan => "scan",
            Strategy::Heap => "heap",
        })
    }
}

/// Source of the next cell to settle.
trait Frontier {
    /// The unsettled cell with the smallest known distance, if any.
    fn next(&mut self, grid: &Grid) -> Option<(Position, usize)>;

    /// Called whenever a cell's tentative distance improves.
    fn improved(&mut self, pos: Position, distance: usize);
}

struct ScanFrontier;

impl Frontier for ScanFrontier {
    fn next(&mut self, grid: &Grid) -> Option<(Position, usize)> {
        // min_by_key keeps the first of several equal minima, and
        // cells() runs in row-major order.
        grid.cells()
            .filter(|cell| !cell.settled)
            .filter_map(|cell| cell.distance.map(|d| (cell.position(), d)))
            .min_by_key(|&(_, d)| d)
    }

    fn improved(&mut self, _pos: Position, _distance: usize) {}
}

#[derive(Default)]
struct HeapFrontier {
    heap: BinaryHeap<Reverse<(usize, Position)>>,
}

impl Frontier for HeapFrontier {
    fn next(&mut self, grid: &Grid) -> Option<(Position, usize)> {
        while let Some(Reverse((distance, pos))) = self.heap.pop() {
            let cell = &grid[pos];
            // Skip entries superseded by a later improvement.
            if !cell.settled && cell.distance == Some(distance) {
                return Some((pos, distance));
            }
        }
        None
    }

    fn improved(&mut self, pos: Position, distance: usize) {
        self.heap.push(Reverse((distance, pos)));
    }
}

fn run<F: Frontier>(grid: &mut Grid, frontier: &mut F) -> Result<usize> {
    grid.reset();
    let origin = grid.top_left();
    let target = grid.bottom_right();
    grid.cell_mut(origin).distance = Some(0);
    frontier.improved(origin, 0);

    let mut settled_count: usize = 0;
    loop {
        let (current, distance) = match frontier.next(grid) {
            Some(found) => found,
            None => {
                event!(
                    Level::WARN,
                    "ran out of reachable cells after settling {}; {} is unreachable",
                    settled_count,
                    target,
                );
                return Err(Error::NoReachableTarget);
            }
        };
        grid.cell_mut(current).settled = true;
        settled_count += 1;
        event!(Level::TRACE, "settled {} at distance {}", current, distance);
        if current == target {
            event!(
                Level::DEBUG,
                "reached {} at distance {} after settling {} cells",
                target,
                distance,
                settled_count,
            );
            return Ok(distance);
        }

        for neighbour in grid.neighbour_positions(current) {
            let cell = grid.cell_mut(neighbour);
            if cell.settled || cell.blocked {
                continue;
            }
            let candidate = distance + usize::from(cell.risk);
            if cell.distance.map_or(true, |d| candidate < d) {
                cell.distance = Some(candidate);
                cell.predecessor = Some(current);
                frontier.improved(neighbour, candidate);
            }
        }
    }
}

/// Computes the lowest total risk of a route from the top-left to the
/// bottom-right of `grid`, using the default strategy.
pub fn solve(grid: &mut Grid) -> Result<usize> {
    solve_with(grid, Strategy::default())
}

/// As `solve`, but with an explicit cell selection strategy.  Any
/// state left by a previous solve is discarded first.  Afterwards the
/// grid holds the distances and predecessors the search recorded, so
/// `Grid::path_to` can recover the route.
pub fn solve_with(grid: &mut Grid, strategy: Strategy) -> Result<usize> {
    let span = span!(
        Level::INFO,
        "solve",
        rows = grid.rows(),
        cols = grid.cols(),
        %strategy
    );
    let _enter = span.enter();
    match strategy {
        Strategy::Scan => run(grid, &mut ScanFrontier),
        Strategy::Heap => run(grid, &mut HeapFrontier::default()),
    }
}

#[cfg(test)]
const EXAMPLE: &str = "\
1163751742
1381373672
2136511328
3694931569
7463417111
1319128137
1359912421
3125421639
1293138521
2311944581
";

#[cfg(test)]
fn example_grid() -> Grid {
    crate::parse::parse_grid(EXAMPLE).expect("valid test data")
}

#[cfg(test)]
const STRATEGIES: [Strategy; 2] = [Strategy::Scan, Strategy::Heap];

#[test]
fn test_lowest_risk_path() {
    for strategy in STRATEGIES {
        let mut small =
            crate::parse::parse_grid("116\n138\n213\n").expect("valid test data");
        assert_eq!(solve_with(&mut small, strategy).expect("reachable"), 7);

        let mut grid = example_grid();
        assert_eq!(solve_with(&mut grid, strategy).expect("reachable"), 40);
    }
}

#[test]
fn test_extrapolated_example() {
    let base = example_grid();
    let mut big = crate::extrapolate::extrapolate(&base, 5).expect("valid factor");
    assert_eq!(big.dimensions(), (50, 50));
    for strategy in STRATEGIES {
        assert_eq!(solve_with(&mut big, strategy).expect("reachable"), 315);
    }
}

#[test]
fn test_single_cell() {
    let mut grid = crate::parse::parse_grid("7\n").expect("valid test data");
    assert_eq!(solve(&mut grid).expect("reachable"), 0);
    assert_eq!(grid.path_to(grid.bottom_right()), Some(vec![Position::new(0, 0)]));
}

#[test]
fn test_uniform_grid_cost_is_manhattan() {
    for strategy in STRATEGIES {
        for w in [1u8, 4, 9] {
            for (rows, cols) in [(1, 1), (1, 6), (5, 1), (3, 4), (7, 7)] {
                let risks = ndarray::Array2::from_elem((rows, cols), w);
                let mut grid = Grid::from_risks(&risks).expect("valid test data");
                assert_eq!(
                    solve_with(&mut grid, strategy).expect("reachable"),
                    usize::from(w) * ((rows - 1) + (cols - 1)),
                    "{}x{} grid of {}s, {} strategy",
                    rows,
                    cols,
                    w,
                    strategy
                );
            }
        }
    }
}

#[test]
fn test_blocked_target() {
    for strategy in STRATEGIES {
        let mut grid = crate::parse::parse_grid("12\n").expect("valid test data");
        grid.block(1, 0).expect("in bounds");
        assert!(matches!(
            solve_with(&mut grid, strategy),
            Err(Error::NoReachableTarget)
        ));
        assert_eq!(grid.path_to(grid.bottom_right()), None);
    }
}

#[test]
fn test_wall() {
    let mut grid = crate::parse::parse_grid("111\n111\n111\n").expect("valid test data");
    for row in 0..3 {
        grid.block(1, row).expect("in bounds");
    }
    assert!(matches!(solve(&mut grid), Err(Error::NoReachableTarget)));

    // A gap in the wall lets the search through, the long way round.
    let mut grid = crate::parse::parse_grid("111\n111\n111\n").expect("valid test data");
    grid.block(1, 1).expect("in bounds");
    grid.block(1, 2).expect("in bounds");
    assert_eq!(solve(&mut grid).expect("reachable"), 4);
}

#[test]
fn test_path_matches_cost() {
    let mut grid = example_grid();
    let cost = solve(&mut grid).expect("reachable");
    let path = grid.path_to(grid.bottom_right()).expect("target was reached");
    assert_eq!(path.first(), Some(&grid.top_left()));
    assert_eq!(path.last(), Some(&grid.bottom_right()));
    for step in path.windows(2) {
        let (a, b) = (step[0], step[1]);
        assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1);
    }
    let total: usize = path[1..]
        .iter()
        .map(|p| usize::from(grid.risk(p.row, p.col)))
        .sum();
    assert_eq!(total, cost);
}

#[test]
fn test_deterministic() {
    let mut grid = example_grid();
    let first = solve(&mut grid).expect("reachable");
    let first_path = grid.path_to(grid.bottom_right());
    let second = solve(&mut grid).expect("reachable");
    assert_eq!(first, second);
    assert_eq!(first_path, grid.path_to(grid.bottom_right()));

    // Both strategies share a tie-break, so they agree on the path too.
    solve_with(&mut grid, Strategy::Scan).expect("reachable");
    assert_eq!(first_path, grid.path_to(grid.bottom_right()));
}

#[test]
fn test_settled_distances_do_not_change() {
    struct Recording {
        inner: HeapFrontier,
        settled: Vec<(Position, usize)>,
    }

    impl Frontier for Recording {
        fn next(&mut self, grid: &Grid) -> Option<(Position, usize)> {
            let found = self.inner.next(grid);
            if let Some(entry) = found {
                self.settled.push(entry);
            }
            found
        }

        fn improved(&mut self, pos: Position, distance: usize) {
            assert!(
                !self.settled.iter().any(|&(p, _)| p == pos),
                "distance of settled cell {} changed",
                pos
            );
            self.inner.improved(pos, distance);
        }
    }

    let mut grid = crate::extrapolate::extrapolate(&example_grid(), 2).expect("valid factor");
    let mut frontier = Recording {
        inner: HeapFrontier::default(),
        settled: Vec::new(),
    };
    run(&mut grid, &mut frontier).expect("reachable");
    assert!(!frontier.settled.is_empty());
    let mut previous = 0;
    for (pos, distance) in frontier.settled {
        assert_eq!(grid[pos].distance(), Some(distance));
        assert!(grid[pos].is_settled());
        // Cells are settled in order of distance.
        assert!(distance >= previous);
        previous = distance;
    }
}

#[test]
fn test_agrees_with_pathfinding() {
    use pathfinding::directed::dijkstra::dijkstra;

    fn reference_cost(grid: &Grid) -> usize {
        let target = grid.bottom_right();
        let successors = |pos: &Position| -> Vec<(Position, usize)> {
            let cell = &grid[*pos];
            grid.neighbors(cell)
                .iter()
                .map(|n| (n.position(), usize::from(n.risk())))
                .collect()
        };
        match dijkstra(&grid.top_left(), successors, |pos| *pos == target) {
            Some((_path, cost)) => cost,
            None => {
                panic!("no solution found");
            }
        }
    }

    let base = example_grid();
    for factor in 1..=3 {
        let mut grid = crate::extrapolate::extrapolate(&base, factor).expect("valid factor");
        let expected = reference_cost(&grid);
        for strategy in STRATEGIES {
            assert_eq!(solve_with(&mut grid, strategy).expect("reachable"), expected);
        }
    }
}

#[test]
fn test_strategy_names() {
    for strategy in STRATEGIES {
        assert_eq!(
            Strategy::from_str(&strategy.to_string(), false),
            Ok(strategy)
        );
    }
    assert!(Strategy::from_str("astar", false).is_err());
}
