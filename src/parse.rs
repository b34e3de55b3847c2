//! Reading a grid from rows of digits.

use std::io::Read;

use ndarray::prelude::*;
use nom::{character::complete::digit0, combinator::map, IResult};

use crate::error::{Error, Result};
use crate::grid::Grid;

fn risk_row(input: &str) -> IResult<&str, Vec<u8>> {
    map(digit0, |digits: &str| {
        digits.bytes().map(|b| b - b'0').collect()
    })(input)
}

fn parse_row(row: usize, line: &str) -> Result<Vec<u8>> {
    match risk_row(line) {
        Ok((unparsed, risks)) => match unparsed.chars().next() {
            None => Ok(risks),
            Some(ch) => Err(Error::InvalidCharacter {
                row,
                col: risks.len(),
                ch,
            }),
        },
        Err(_) => Err(Error::InvalidCharacter {
            row,
            col: 0,
            ch: line.chars().next().unwrap_or('\n'),
        }),
    }
}

/// Builds a grid from lines which have already had their line
/// terminators removed.
pub fn parse_lines<'a, I>(lines: I) -> Result<Grid>
where
    I: IntoIterator<Item = &'a str>,
{
    let rows: Vec<Vec<u8>> = lines
        .into_iter()
        .enumerate()
        .map(|(r, line)| parse_row(r, line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Result<_>>()?;
    let width = match rows.first() {
        Some(first) => first.len(),
        None => {
            return Err(Error::Empty);
        }
    };
    if let Some((row, ragged)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(Error::RaggedRow {
            row,
            expected: width,
            found: ragged.len(),
        });
    }
    let risks = Array::from_shape_fn((rows.len(), width), |(r, c)| rows[r][c]);
    Grid::from_risks(&risks)
}

/// Parses newline-terminated digit rows.  Text after the final newline
/// is not part of the grid.
pub fn parse_grid(input: &str) -> Result<Grid> {
    parse_lines(
        input
            .split_inclusive('\n')
            .filter_map(|line| line.strip_suffix('\n')),
    )
}

pub fn read_grid<R: Read>(mut reader: R) -> Result<Grid> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_grid(&input)
}

impl TryFrom<&[String]> for Grid {
    type Error = Error;
    fn try_from(lines: &[String]) -> Result<Grid> {
        parse_lines(lines.iter().map(String::as_str))
    }
}

#[test]
fn test_parse_grid() {
    let grid = parse_grid("116\n138\n213\n").expect("valid test data");
    assert_eq!(grid.dimensions(), (3, 3));
    assert_eq!(grid.risks(), array![[1, 1, 6], [1, 3, 8], [2, 1, 3]]);
}

#[test]
fn test_unterminated_last_line_is_ignored() {
    let grid = parse_grid("116\n138\n213").expect("valid test data");
    assert_eq!(grid.dimensions(), (2, 3));
}

#[test]
fn test_crlf() {
    let grid = parse_grid("12\r\n34\r\n").expect("valid test data");
    assert_eq!(grid.risks(), array![[1, 2], [3, 4]]);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(parse_grid(""), Err(Error::Empty)));
    assert!(matches!(parse_grid("123"), Err(Error::Empty)));
    assert!(matches!(
        parse_grid("123\n12x\n"),
        Err(Error::InvalidCharacter {
            row: 1,
            col: 2,
            ch: 'x'
        })
    ));
    assert!(matches!(
        parse_grid("123\n1234\n"),
        Err(Error::RaggedRow {
            row: 1,
            expected: 3,
            found: 4
        })
    ));
    assert!(matches!(
        parse_grid("123\n\n"),
        Err(Error::RaggedRow { row: 1, found: 0, .. })
    ));
    assert!(matches!(
        parse_grid("123\n103\n"),
        Err(Error::InvalidRisk {
            row: 1,
            col: 1,
            risk: 0
        })
    ));
}

#[test]
fn test_try_from_lines() {
    let lines: Vec<String> = ["19", "91"].iter().map(|s| s.to_string()).collect();
    let grid = Grid::try_from(lines.as_slice()).expect("valid test data");
    assert_eq!(grid.risks(), array![[1, 9], [9, 1]]);
}

#[test]
fn test_read_grid() {
    let grid = read_grid("55\n55\n".as_bytes()).expect("valid test data");
    assert_eq!(grid.dimensions(), (2, 2));
}
