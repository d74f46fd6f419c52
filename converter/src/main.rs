//! csv2json CLI - Convert a folder of game-data sheets to JSON
//!
//! ```bash
//! csv2json monsters                          # input/monsters/*.csv → output/monsters/*.json
//! csv2json skills --input-root data/in       # read from data/in/skills
//! csv2json items --exclude draft.csv --quiet # skip another sheet, no progress output
//! ```
//!
//! Every option can also be set through the environment (or a `.env` file):
//! `CSV2JSON_FOLDER`, `CSV2JSON_INPUT_ROOT`, `CSV2JSON_OUTPUT_ROOT`.

use clap::Parser;
use csv2json::config::{
    DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT, FOLDER_ENV_VAR, INPUT_ROOT_ENV_VAR,
    OUTPUT_ROOT_ENV_VAR,
};
use csv2json::logs::{log_info, LOGGER};
use csv2json::{convert_folder, ConvertConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csv2json")]
#[command(about = "Convert game-data CSV sheets to nested JSON documents", long_about = None)]
struct Cli {
    /// Data set folder, looked up under the input root
    #[arg(env = FOLDER_ENV_VAR)]
    folder: String,

    /// Directory holding one sub-folder of sheets per data set
    #[arg(long, env = INPUT_ROOT_ENV_VAR, default_value = DEFAULT_INPUT_ROOT)]
    input_root: PathBuf,

    /// Directory receiving the converted folders
    #[arg(long, env = OUTPUT_ROOT_ENV_VAR, default_value = DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Additional sheet names to skip (daemons.csv is always skipped)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.folder.trim().is_empty() {
        return Err("Missing output folder name argument".into());
    }

    LOGGER.set_quiet(cli.quiet);

    let config = ConvertConfig::new(cli.folder)
        .with_input_root(cli.input_root)
        .with_output_root(cli.output_root)
        .with_exclusions(cli.exclude);

    let report = convert_folder(&config).await?;

    if !report.converted.is_empty() || report.has_failures() {
        log_info(report.summary());
    }

    if report.has_failures() {
        return Err(format!("{} file(s) failed to convert", report.failed.len()).into());
    }

    Ok(())
}
