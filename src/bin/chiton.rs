use std::io;

use clap::Parser;

use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use chiton::{read_grid, report, shortest_route, Config};

fn run() -> chiton::Result<usize> {
    let config = match Config::try_parse() {
        Ok(config) => config,
        // --help and --version are not failures.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            return Err(e.into());
        }
    };
    let base = read_grid(io::stdin())?;
    event!(
        Level::INFO,
        "read a {}x{} grid; tiling it {} times with the {} strategy",
        base.rows(),
        base.cols(),
        config.times,
        config.strategy,
    );
    shortest_route(&base, &config)
}

fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    match run() {
        Ok(length) => {
            println!("{}", report(length));
        }
        Err(e) => {
            eprintln!("chiton: {}", e);
            std::process::exit(1);
        }
    }
}
