use ndarray::prelude::*;
use tracing::{event, Level};

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};

/// Shifts a risk by `steps`, wrapping from 9 back round to 1.
fn shifted_risk(risk: u8, steps: usize) -> u8 {
    let shifted = usize::from(risk) + steps;
    (1 + (shifted - 1) % 9) as u8
}

/// Tiles `base` `factor` times in each direction.  Each tile's risks
/// are those of `base` raised by the tile's Manhattan distance (in
/// tiles) from the top-left tile.  `base` itself is untouched.
pub fn extrapolate(base: &Grid, factor: usize) -> Result<Grid> {
    if factor < 1 {
        return Err(Error::InvalidFactor(factor as i64));
    }
    let (bh, bw) = base.dimensions();
    let too_large = || Error::TooLarge {
        rows: bh,
        cols: bw,
        factor,
    };
    let rows = bh.checked_mul(factor).ok_or_else(too_large)?;
    let cols = bw.checked_mul(factor).ok_or_else(too_large)?;
    // ndarray will not allocate more than isize::MAX bytes.
    rows.checked_mul(cols)
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<Cell>()))
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or_else(too_large)?;
    let big = Grid::from_risks(&Array::from_shape_fn(
        (rows, cols),
        |(r, c)| {
            let tile_distance = r / bh + c / bw;
            shifted_risk(base.risk(r % bh, c % bw), tile_distance)
        },
    ))?;
    event!(
        Level::DEBUG,
        "extrapolated {}x{} grid by a factor of {} to {}x{}",
        bh,
        bw,
        factor,
        big.rows(),
        big.cols(),
    );
    Ok(big)
}

#[test]
fn test_shifted_risk() {
    assert_eq!(shifted_risk(8, 0), 8);
    assert_eq!(shifted_risk(8, 1), 9);
    assert_eq!(shifted_risk(8, 2), 1);
    assert_eq!(shifted_risk(9, 9), 9);
    assert_eq!(shifted_risk(1, 17), 9);
}

#[test]
fn test_factor_one_is_identity() {
    let base = Grid::from_risks(&array![[1, 2, 3], [9, 8, 7]]).expect("valid test data");
    let same = extrapolate(&base, 1).expect("valid factor");
    assert_eq!(same.dimensions(), base.dimensions());
    assert_eq!(same.risks(), base.risks());
}

#[test]
fn test_invalid_factor() {
    let base = Grid::from_risks(&array![[1]]).expect("valid test data");
    assert!(matches!(extrapolate(&base, 0), Err(Error::InvalidFactor(0))));
}

#[test]
fn test_huge_factor() {
    let base = Grid::from_risks(&array![[1, 2], [3, 4]]).expect("valid test data");
    assert!(matches!(
        extrapolate(&base, usize::MAX / 2 + 1),
        Err(Error::TooLarge {
            rows: 2,
            cols: 2,
            ..
        })
    ));
    // Each side fits, but the cell count does not.
    assert!(matches!(
        extrapolate(&base, 1 << (usize::BITS / 2)),
        Err(Error::TooLarge { .. })
    ));
    // The base grid is still usable afterwards.
    assert_eq!(extrapolate(&base, 2).expect("valid factor").dimensions(), (4, 4));
}

#[test]
fn test_single_cell() {
    // The classic illustration: one 8 becomes a diagonal band of 8..3.
    let base = Grid::from_risks(&array![[8]]).expect("valid test data");
    let big = extrapolate(&base, 5).expect("valid factor");
    assert_eq!(
        big.risks(),
        array![
            [8, 9, 1, 2, 3],
            [9, 1, 2, 3, 4],
            [1, 2, 3, 4, 5],
            [2, 3, 4, 5, 6],
            [3, 4, 5, 6, 7],
        ]
    );
}

#[test]
fn test_tiling() {
    let base = Grid::from_risks(&array![[1, 5, 9], [2, 7, 8]]).expect("valid test data");
    let factor = 4;
    let big = extrapolate(&base, factor).expect("valid factor");
    let (rows, cols) = base.dimensions();
    assert_eq!(big.dimensions(), (rows * factor, cols * factor));
    for i in 0..factor {
        for j in 0..factor {
            for r in 0..rows {
                for c in 0..cols {
                    let expected = (usize::from(base.risk(r, c)) + i + j - 1) % 9 + 1;
                    let got = big.risk(rows * j + r, cols * i + c);
                    assert_eq!(usize::from(got), expected, "tile ({}, {}), cell ({}, {})", i, j, r, c);
                    assert!((1..=9).contains(&got));
                }
            }
        }
    }
    // The base grid is not changed.
    assert_eq!(base.risks(), array![[1, 5, 9], [2, 7, 8]]);
}
