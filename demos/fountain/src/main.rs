//! Fountain
//!
//! Runs a flurry pattern headless: parses and compiles it, steps a field
//! for a number of ticks and prints a summary of the particles each tick.
//!
//! ```text
//! cargo run -p fountain -- --source "loop 10 emit 3 1 1 { speed 4 | rotate 0 [] 0 | 30 nop }"
//! RUST_LOG=debug cargo run -p fountain -- demos/fountain/patterns/spiral.flurry --ticks 120 --config demos/fountain/field.ron
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use flurry_core::{Field, FieldConfig};
use flurry_script::{Compiler, Pattern};
use flurry_syntax::{print, PrintOptions};
use glam::DVec3;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SOURCE: &str = "\
// every 30 time units, three particles fanned around the circle
loop 30 emit 3 1 1 {
  speed 2; 60 opacity 0
| rotate 0 [] 0
}";

#[derive(Parser)]
#[command(name = "fountain")]
#[command(about = "Run a flurry pattern and print a per-tick summary")]
struct Cli {
    /// Pattern file to run
    pattern: Option<PathBuf>,

    /// Pattern source given inline instead of a file
    #[arg(short, long, conflicts_with = "pattern")]
    source: Option<String>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 60)]
    ticks: u32,

    /// Time advanced per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// RNG seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Field configuration in RON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the program in canonical form before running it
    #[arg(long)]
    print: bool,

    /// List the names the compiler knows and exit
    #[arg(long)]
    names: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if cli.names {
        println!("{}", Compiler::new().names().join(" "));
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FieldConfig::from_ron(&text)?
        }
        None => FieldConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
        config.validate()?;
    }
    if cli.dt.is_nan() || cli.dt <= 0.0 {
        bail!("--dt must be positive, got {}", cli.dt);
    }

    let pattern = match (&cli.pattern, &cli.source) {
        (Some(path), _) => Pattern::load_file(path)
            .with_context(|| format!("loading pattern {}", path.display()))?,
        (None, Some(source)) => Pattern::compile_source(source)?,
        (None, None) => Pattern::compile_source(DEFAULT_SOURCE)?,
    };
    if cli.print {
        println!("{}\n", print(pattern.program(), PrintOptions::default()));
    }

    info!(seed = config.seed, ticks = cli.ticks, dt = cli.dt, "starting field");
    let mut field = Field::new(config);
    pattern.spawn_into(&mut field);

    for tick in 1..=cli.ticks {
        field.update(cli.dt);
        println!("{}", summarize(tick, tick as f64 * cli.dt, &field));
        if field.is_empty() {
            info!(tick, "pattern finished");
            break;
        }
    }
    Ok(())
}

/// One line describing the field after a tick
fn summarize(tick: u32, time: f64, field: &Field) -> String {
    let live = field.len();
    let closed = field.iter().filter(|p| p.closed).count();
    let (sum, extent) = field.iter().fold((DVec3::ZERO, 0.0f64), |(sum, extent), p| {
        (sum + p.position, extent.max(p.position.length()))
    });
    let center = if live > 0 { sum / live as f64 } else { DVec3::ZERO };
    format!(
        "tick {:>4}  t={:>8.2}  live={:>5}  closed={:>4}  center=({:>7.2}, {:>7.2}, {:>7.2})  extent={:>7.2}",
        tick, time, live, closed, center.x, center.y, center.z, extent
    )
}
