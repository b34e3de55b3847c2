use std::fmt::{self, Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum Error {
    /// A lookup fell outside the grid.
    OutOfBounds {
        col: isize,
        row: isize,
        cols: usize,
        rows: usize,
    },
    /// Tile repetition factors start at 1.
    InvalidFactor(i64),
    /// The solver ran out of candidate cells before settling the target.
    NoReachableTarget,
    /// Tiling would produce a grid with more cells than can be addressed.
    TooLarge {
        rows: usize,
        cols: usize,
        factor: usize,
    },
    /// The input held no complete rows.
    Empty,
    /// A row's length differs from the first row's.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A digit outside 1-9, which includes `0`.
    InvalidRisk {
        row: usize,
        col: usize,
        risk: u8,
    },
    /// Something other than a digit in a row.
    InvalidCharacter {
        row: usize,
        col: usize,
        ch: char,
    },
    /// The command line could not be understood.
    Usage(String),
    /// Reading the input failed.
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds {
                col,
                row,
                cols,
                rows,
            } => {
                write!(
                    f,
                    "position (col {}, row {}) is outside the {}x{} grid",
                    col, row, cols, rows
                )
            }
            Error::InvalidFactor(n) => {
                write!(f, "tile repetition factor must be at least 1, got {}", n)
            }
            Error::NoReachableTarget => f.write_str("no eligible cells remaining"),
            Error::TooLarge { rows, cols, factor } => {
                write!(
                    f,
                    "tiling a {}x{} grid {} times in each direction gives too many cells",
                    rows, cols, factor
                )
            }
            Error::Empty => f.write_str("no data"),
            Error::RaggedRow {
                row,
                expected,
                found,
            } => {
                write!(
                    f,
                    "row {} has {} cells but earlier rows have {}",
                    row, found, expected
                )
            }
            Error::InvalidRisk { row, col, risk } => {
                write!(
                    f,
                    "risk {} at row {}, col {} is outside the range 1-9",
                    risk, row, col
                )
            }
            Error::InvalidCharacter { row, col, ch } => {
                write!(
                    f,
                    "invalid (non-numeric) cell {:?} at row {}, col {}",
                    ch, row, col
                )
            }
            Error::Usage(msg) => f.write_str(msg.trim_end()),
            Error::Io(e) => write!(f, "failed to read input: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Error {
        // A rejected --times value carries our own error as its source.
        match std::error::Error::source(&e).and_then(|s| s.downcast_ref::<Error>()) {
            Some(Error::InvalidFactor(n)) => Error::InvalidFactor(*n),
            _ => Error::Usage(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_display() {
    assert_eq!(
        Error::InvalidFactor(0).to_string(),
        "tile repetition factor must be at least 1, got 0"
    );
    assert_eq!(
        Error::OutOfBounds {
            col: -1,
            row: 2,
            cols: 5,
            rows: 5
        }
        .to_string(),
        "position (col -1, row 2) is outside the 5x5 grid"
    );
    assert_eq!(Error::Empty.to_string(), "no data");
    assert_eq!(
        Error::TooLarge {
            rows: 2,
            cols: 3,
            factor: 7
        }
        .to_string(),
        "tiling a 2x3 grid 7 times in each direction gives too many cells"
    );
}
