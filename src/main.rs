// main.rs - Command-line front end for the maze generator

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mazegen::{MazeGenerator, Template};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

/// Hub stamped into the center when no template file is given: a portal
/// room with one opening on each side.
const DEFAULT_TEMPLATE: &str = "\
## ##
#   #
  P
# S #
## ##
";

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural lock-and-key maze generator")]
struct Args {
    /// Rooms per row; the cell grid is 2*width+1 columns wide
    #[arg(short = 'W', long, default_value_t = 13)]
    width: usize,

    /// Rooms per column; the cell grid is 2*height+1 rows tall
    #[arg(short = 'H', long, default_value_t = 13)]
    height: usize,

    /// RNG seed; omitted means a fresh random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Center template file in the level text format
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Number of mazes to generate; batches run in parallel
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Emit JSON instead of the text rendering
    #[arg(long)]
    json: bool,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ceiling on main-path restart attempts, 0 for unbounded
    #[arg(long, default_value_t = mazegen::main_path::DEFAULT_RETRY_LIMIT)]
    retry_limit: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let template_text = match &args.template {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading template {}", path.display()))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let template = Template::parse(&template_text);

    let retry_limit = (args.retry_limit > 0).then_some(args.retry_limit);
    let generator =
        MazeGenerator::new(args.width, args.height, template)?.with_retry_limit(retry_limit);

    let base_seed = args.seed.unwrap_or_else(rand::random);
    info!("generating {} maze(s) from seed {}", args.count, base_seed);

    let grids = (0..args.count as u64)
        .into_par_iter()
        .map(|offset| generator.generate_seeded(base_seed.wrapping_add(offset)))
        .collect::<mazegen::Result<Vec<_>>>()?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&grids)?
    } else {
        grids
            .iter()
            .map(|grid| grid.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };

    match &args.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
