use std::ffi::OsString;

use clap::Parser;

use crate::error::{Error, Result};
use crate::solver::Strategy;

/// Finds the route of lowest total risk through a grid of digits read
/// from standard input.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chiton")]
#[command(allow_negative_numbers = true)]
pub struct Config {
    /// How many times to tile the input grid in each direction.
    #[arg(long, default_value_t = 1, value_parser = parse_times)]
    pub times: usize,

    /// How the solver picks the next cell to settle.
    #[arg(long, value_enum, default_value_t)]
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            times: 1,
            strategy: Strategy::default(),
        }
    }
}

fn parse_times(value: &str) -> Result<usize> {
    match value.parse::<i64>() {
        Ok(n) if n >= 1 => usize::try_from(n).map_err(|_| Error::InvalidFactor(n)),
        Ok(n) => Err(Error::InvalidFactor(n)),
        Err(e) => Err(Error::Usage(format!(
            "failed to parse '{}' as an integer: {}",
            value, e
        ))),
    }
}

impl Config {
    /// Parses a full command line, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Config>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Config::try_parse_from(args)?)
    }
}

#[test]
fn test_defaults() {
    assert_eq!(
        Config::from_args(["chiton"]).expect("valid"),
        Config {
            times: 1,
            strategy: Strategy::Heap
        }
    );
    assert_eq!(
        Config::from_args(["chiton"]).expect("valid"),
        Config::default()
    );
}

#[test]
fn test_spellings() {
    for words in [
        &["chiton", "--times", "5"][..],
        &["chiton", "--times=5"][..],
    ] {
        assert_eq!(Config::from_args(words).expect("valid").times, 5);
    }
    let config =
        Config::from_args(["chiton", "--strategy", "scan", "--times=2"]).expect("valid");
    assert_eq!(
        config,
        Config {
            times: 2,
            strategy: Strategy::Scan
        }
    );
}

#[test]
fn test_bad_options() {
    assert!(matches!(
        Config::from_args(["chiton", "--times", "0"]),
        Err(Error::InvalidFactor(0))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--times", "-3"]),
        Err(Error::InvalidFactor(-3))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--times=-3"]),
        Err(Error::InvalidFactor(-3))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--times", "lots"]),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--times"]),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--strategy", "astar"]),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "--verbose"]),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        Config::from_args(["chiton", "input.txt"]),
        Err(Error::Usage(_))
    ));
}

#[test]
fn test_clap_definition() {
    use clap::CommandFactory;
    Config::command().debug_assert();
}
