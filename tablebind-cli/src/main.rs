//! `tablebind`: bind a JSON array of records to a document table, replay an
//! operation script against it and print the result.

mod config;
mod error;
mod paths;
mod script;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use simplelog::{LevelFilter, WriteLogger};
use tablebind::{Document, Table, TableOptions, records_from_str, render_table};

use crate::config::Config;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tablebind", version, about = "Render JSON records as a bound table")]
struct Args {
    /// JSON file holding an array of records.
    data: PathBuf,

    /// JSON file holding an array of operations to apply after binding.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Column keys in display order, comma separated.
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Cut cells wider than this many columns.
    #[arg(long)]
    max_width: Option<usize>,

    /// Print the document as markup instead of aligned text.
    #[arg(long)]
    markup: bool,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, simplelog::Config::default(), file);
        }
        Err(err) => eprintln!("warning: cannot open log {}: {}", path.display(), err),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: Args, mut config: Config) -> Result<String, CliError> {
    if let Some(width) = args.max_width {
        config.text.max_cell_width = width;
    }
    let columns = args.columns.or(config.columns);

    let records = records_from_str(&read(&args.data)?)?;
    log::info!("[cli] loaded {} records from {}", records.len(), args.data.display());

    let mut options = TableOptions::new();
    options.columns = columns;
    let mut table = Table::bind(Document::new(), records, options)?;

    if let Some(path) = &args.script {
        let ops = script::parse(&read(path)?).map_err(|source| CliError::Script {
            path: path.clone(),
            source,
        })?;
        log::info!("[cli] applying {} operations", ops.len());
        for (step, op) in ops.into_iter().enumerate() {
            log::debug!("[cli] step {}: {:?}", step, op);
            op.apply(&mut table)
                .map_err(|source| CliError::Step { step, source })?;
        }
    }

    let surface = *table.surface();
    let doc = table.into_backend();
    if args.markup {
        Ok(doc.to_markup(surface))
    } else {
        Ok(render_table(&doc, surface, &config.text))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.level());

    match run(args, config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("[cli] {}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
