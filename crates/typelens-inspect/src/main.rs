//! Command-line inspector for typelens type tables.
//!
//! Loads one or more JSON type tables, builds a type universe from them and
//! prints the properties reflection discovers for each requested type, with
//! generic types resolved against that type.
//!
//! ```text
//! typelens-inspect --table crates/typelens-inspect/tables/sample.json --type StringContainer
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use typelens_reflect::ReflectorConfig;
use typelens_types::TypeTable;

mod report;

/// CLI arguments for the inspector
#[derive(Parser, Debug)]
#[command(name = "typelens-inspect")]
#[command(about = "Print the reflected properties of types described in JSON tables")]
struct Args {
    /// JSON type table to load (may be repeated)
    #[arg(short, long = "table", required = true)]
    tables: Vec<PathBuf>,

    /// Type to reflect (may be repeated; defaults to every type in the tables)
    #[arg(short = 'T', long = "type")]
    types: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Do not treat non-public members as accessible
    #[arg(long)]
    no_private_access: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_table(path: &Path) -> anyhow::Result<TypeTable> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let table: TypeTable = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!("loaded {} types from {}", table.types.len(), path.display());
    Ok(table)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    let tables = args
        .tables
        .iter()
        .map(|path| load_table(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let config = ReflectorConfig {
        allow_private_access: !args.no_private_access,
    };

    let reports = report::inspect(tables, &args.types, config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", report::render_text(&reports));
    }
    Ok(())
}
