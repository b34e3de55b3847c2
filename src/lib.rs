//! Finds the route of lowest total risk across a grid of digits,
//! optionally after tiling the grid into a larger one.

pub mod config;
pub mod error;
pub mod extrapolate;
pub mod grid;
pub mod parse;
pub mod solver;

pub use config::Config;
pub use error::{Error, Result};
pub use extrapolate::extrapolate;
pub use grid::{Cell, Grid, Position};
pub use parse::{parse_grid, read_grid};
pub use solver::{solve, solve_with, Strategy};

/// Tiles `base` as `config` asks and returns the lowest total risk
/// from the top-left to the bottom-right of the result.
pub fn shortest_route(base: &Grid, config: &Config) -> Result<usize> {
    let mut grid = extrapolate(base, config.times)?;
    solve_with(&mut grid, config.strategy)
}

/// The line the chiton binary prints for a route of total risk `length`.
pub fn report(length: usize) -> String {
    format!("Shortest route length: {}", length)
}

#[test]
fn test_report() {
    assert_eq!(report(40), "Shortest route length: 40");
    assert_eq!(report(0), "Shortest route length: 0");
}

#[test]
fn test_shortest_route() {
    let base = parse_grid(
        "1163751742\n1381373672\n2136511328\n3694931569\n7463417111\n\
         1319128137\n1359912421\n3125421639\n1293138521\n2311944581\n",
    )
    .expect("valid test data");
    let config = Config::default();
    assert_eq!(shortest_route(&base, &config).expect("reachable"), 40);
    let config = Config {
        times: 5,
        strategy: Strategy::Scan,
    };
    assert_eq!(shortest_route(&base, &config).expect("reachable"), 315);
}
