//! GraphEq - implicit-curve calculator for loosely typed algebra.
//!
//! Takes a human-typed expression or equation (`2x+3=y^2`), replies with
//! the canonical solution text, and renders an implicit-curve PNG when
//! exactly two unknowns are present. Range hints (`x=-5..5`) may follow
//! the expression, comma-separated.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use grapheq_core::{ArtifactStore, BoundedConfig, Engine, EngineConfig, Reply};
use grapheq_plot::ContourRenderer;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "grapheq",
    version = env!("CARGO_PKG_VERSION"),
    about = "Solve loosely typed algebra and plot implicit curves",
    long_about = r#"
GraphEq normalizes loose, human-typed algebra (implicit multiplication,
`x2`-style exponents), solves the equation for each unknown under a hard
time budget, and renders an implicit-curve PNG with an automatically
chosen viewing window when the equation has exactly two unknowns.

Examples:
  grapheq "2x+4x"                 # simplify: 6x
  grapheq "x2=4"                  # solve: x = -2, x = 2
  grapheq "x^2+y^2=4"             # solve and render a circle
  grapheq "x^2+y^2=4, x=-5..5"    # seed the horizontal axis
  grapheq                         # interactive session
"#,
    after_help = r#"
Environment variables:
  GRAPHEQ_LOG=debug           Log filter (error, warn, info, debug, trace)
  GRAPHEQ_BUDGET_SECS=10      Per-variable solve budget
  GRAPHEQ_RESOLUTION=400      Contour field resolution
  GRAPHEQ_ARTIFACT_DIR=...    Where rendered images land
  GRAPHEQ_TTL_SECS=300        Image retention before cleanup
"#
)]
struct Args {
    /// Expression or equation to evaluate; starts a REPL when omitted.
    expression: Option<String>,

    /// Per-variable solve budget in seconds.
    #[arg(long)]
    budget_secs: Option<u64>,

    /// Contour field resolution along each axis.
    #[arg(long)]
    resolution: Option<usize>,

    /// Directory for rendered images.
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Image retention in seconds before the sweeper removes them.
    #[arg(long)]
    ttl_secs: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::new().filter_or("GRAPHEQ_LOG", "warn")).init();

    let args = Args::parse();
    let config = CliConfig::resolve(
        args.budget_secs,
        args.resolution,
        args.artifact_dir,
        args.ttl_secs,
    );

    let artifacts = ArtifactStore::new(&config.artifact_dir, config.ttl)
        .with_context(|| format!("creating artifact directory {:?}", config.artifact_dir))?;
    let engine = Engine::new(
        EngineConfig {
            bounded: BoundedConfig {
                budget: config.budget,
                ..BoundedConfig::default()
            },
            resolution: config.resolution,
        },
        artifacts,
        Box::new(ContourRenderer::default()),
    );
    info!(
        "engine ready (budget {:?}, resolution {})",
        config.budget, config.resolution
    );

    match args.expression {
        Some(expression) => {
            print_reply(&engine.handle(&expression));
            Ok(())
        }
        None => repl(&engine),
    }
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    if let Some(image) = &reply.image {
        println!("image: {}", image.display());
    }
}

fn repl(engine: &Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ").context("writing prompt")?;
        stdout.flush().context("flushing prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading input")?;
        if read == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            return Ok(());
        }
        print_reply(&engine.handle(line));
    }
}
