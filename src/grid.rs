use std::fmt::{self, Display, Formatter};
use std::ops::Index;

use ndarray::prelude::*;

use crate::error::{Error, Result};

/// Index of a cell in a `Grid`'s storage.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// One grid position.  The coordinates and risk are fixed when the cell
/// is created; `distance`, `predecessor` and `settled` belong to the
/// solver and are cleared at the start of every solve.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) risk: u8,
    pub(crate) distance: Option<usize>,
    pub(crate) predecessor: Option<Position>,
    pub(crate) settled: bool,
    pub(crate) blocked: bool,
}

impl Cell {
    fn new(row: usize, col: usize, risk: u8) -> Cell {
        Cell {
            row,
            col,
            risk,
            distance: None,
            predecessor: None,
            settled: false,
            blocked: false,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn risk(&self) -> u8 {
        self.risk
    }

    /// Best known total risk from the origin, if any path has been found.
    pub fn distance(&self) -> Option<usize> {
        self.distance
    }

    pub fn predecessor(&self) -> Option<Position> {
        self.predecessor
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    fn clear(&mut self) {
        self.distance = None;
        self.predecessor = None;
        self.settled = false;
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Builds a grid from a rectangular array of risks, each of which
    /// must lie in 1..=9.
    pub fn from_risks(risks: &Array2<u8>) -> Result<Grid> {
        if risks.is_empty() {
            return Err(Error::Empty);
        }
        if let Some(((row, col), &risk)) = risks
            .indexed_iter()
            .find(|(_, risk)| !(1..=9).contains(*risk))
        {
            return Err(Error::InvalidRisk { row, col, risk });
        }
        Ok(Grid {
            cells: Array::from_shape_fn(risks.dim(), |(r, c)| Cell::new(r, c, risks[(r, c)])),
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Looks up a cell.  Coordinates are signed so that a neighbour
    /// search can ask for positions off the top or left edge.
    pub fn get(&self, col: isize, row: isize) -> Result<&Cell> {
        if row < 0 || col < 0 || row as usize >= self.rows() || col as usize >= self.cols() {
            Err(Error::OutOfBounds {
                col,
                row,
                cols: self.cols(),
                rows: self.rows(),
            })
        } else {
            Ok(&self.cells[(row as usize, col as usize)])
        }
    }

    /// Panics outside the grid; `get` is the checked lookup.
    pub(crate) fn risk(&self, row: usize, col: usize) -> u8 {
        self.cells[(row, col)].risk
    }

    /// The risk of every cell, in grid layout.
    pub fn risks(&self) -> Array2<u8> {
        self.cells.map(|cell| cell.risk)
    }

    pub fn top_left(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(self.rows() - 1, self.cols() - 1)
    }

    pub(crate) fn neighbour_positions(&self, pos: Position) -> Vec<Position> {
        let (r, c) = (pos.row as isize, pos.col as isize);
        // Up, down, left, right.  No diagonals.
        [(c, r - 1), (c, r + 1), (c - 1, r), (c + 1, r)]
            .iter()
            .filter_map(|&(col, row)| self.get(col, row).ok())
            .map(Cell::position)
            .collect()
    }

    /// The in-bounds orthogonal neighbours of `cell`, in the order up,
    /// down, left, right.
    pub fn neighbors(&self, cell: &Cell) -> Vec<&Cell> {
        self.neighbour_positions(cell.position())
            .into_iter()
            .map(|p| &self[p])
            .collect()
    }

    /// Marks a cell as impassable.  The solver never enters it.
    pub fn block(&mut self, col: isize, row: isize) -> Result<()> {
        let pos = self.get(col, row)?.position();
        self.cell_mut(pos).blocked = true;
        Ok(())
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[(pos.row, pos.col)]
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Forgets everything a previous solve recorded.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear);
    }

    /// Follows predecessor links back from `target` to the origin.  The
    /// result starts at the origin and ends at `target`; it is `None` if
    /// no route to `target` has been recorded.
    pub fn path_to(&self, target: Position) -> Option<Vec<Position>> {
        self[target].distance?;
        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self[current].predecessor {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Cell {
        &self.cells[(pos.row, pos.col)]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                write!(f, "{}", cell.risk)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn small_grid() -> Grid {
    Grid::from_risks(&array![[1, 1, 6], [1, 3, 8], [2, 1, 3]]).expect("valid test data")
}

#[test]
fn test_get() {
    let grid = small_grid();
    assert_eq!(grid.dimensions(), (3, 3));
    let cell = grid.get(2, 1).expect("in bounds");
    assert_eq!((cell.row(), cell.col(), cell.risk()), (1, 2, 8));
    assert!(matches!(grid.get(-1, 0), Err(Error::OutOfBounds { .. })));
    assert!(matches!(grid.get(0, -1), Err(Error::OutOfBounds { .. })));
    assert!(matches!(grid.get(3, 0), Err(Error::OutOfBounds { .. })));
    assert!(matches!(grid.get(0, 3), Err(Error::OutOfBounds { .. })));
}

#[test]
fn test_risk_lookup() {
    let grid = small_grid();
    assert_eq!(grid.risk(1, 2), 8);
    assert_eq!(grid.get(2, 1).map(Cell::risk).ok(), Some(8));
    assert!(matches!(
        grid.get(3, 1).map(Cell::risk),
        Err(Error::OutOfBounds {
            col: 3,
            row: 1,
            cols: 3,
            rows: 3
        })
    ));
}

#[test]
fn test_neighbors() {
    let grid = small_grid();
    let positions = |row: isize, col: isize| -> Vec<Position> {
        let cell = grid.get(col, row).expect("in bounds");
        grid.neighbors(cell).iter().map(|n| n.position()).collect()
    };
    // Corners have two neighbours, edges three, the middle four.
    assert_eq!(
        positions(0, 0),
        vec![Position::new(1, 0), Position::new(0, 1)]
    );
    assert_eq!(
        positions(2, 1),
        vec![Position::new(1, 1), Position::new(2, 0), Position::new(2, 2)]
    );
    assert_eq!(
        positions(1, 1),
        vec![
            Position::new(0, 1),
            Position::new(2, 1),
            Position::new(1, 0),
            Position::new(1, 2)
        ]
    );
}

#[test]
fn test_from_risks_rejects_bad_input() {
    assert!(matches!(
        Grid::from_risks(&Array2::zeros((0, 0))),
        Err(Error::Empty)
    ));
    assert!(matches!(
        Grid::from_risks(&array![[1, 2], [0, 4]]),
        Err(Error::InvalidRisk {
            row: 1,
            col: 0,
            risk: 0
        })
    ));
    assert!(matches!(
        Grid::from_risks(&array![[10]]),
        Err(Error::InvalidRisk { risk: 10, .. })
    ));
}

#[test]
fn test_display() {
    assert_eq!(small_grid().to_string(), "116\n138\n213\n");
}

#[test]
fn test_block() {
    let mut grid = small_grid();
    grid.block(1, 2).expect("in bounds");
    assert!(grid[Position::new(2, 1)].is_blocked());
    assert!(!grid[Position::new(1, 2)].is_blocked());
    assert!(grid.block(5, 0).is_err());
}
