use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use pkganalyzer::export::{self, ExportData, ExportFormat};
use pkganalyzer::parser::{self, ParseError, SolutionItem};

#[derive(Parser)]
#[command(name = "pkganalyzer")]
#[command(author = "Dominik Lachance")]
#[command(version)]
#[command(about = "Build order and package analyzer for .NET solutions", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a solution and report its build order and packages
    Analyze {
        /// Solution file, or a directory containing exactly one
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text, json, csv or markdown
        #[arg(short, long, env = "PKGANALYZER_FORMAT", default_value = "text")]
        format: ExportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the build order, one project per line
    Order {
        /// Solution file, or a directory containing exactly one
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Analyze {
            path,
            format,
            output,
        }) => analyze(&path, format, output.as_deref()),
        Some(Commands::Order { path }) => order(&path),
        Some(Commands::Version) => {
            println!("pkganalyzer v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            let _ = Cli::command().print_help();
            process::exit(1);
        }
    };

    if let Err(err) = result {
        report_error(&err);
        process::exit(1);
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &anyhow::Error) {
    eprintln!("error: {:#}", err);

    if let Some(ParseError::CircularDependency { cycles, .. }) = err.downcast_ref::<ParseError>()
    {
        for cycle in cycles {
            eprintln!("  cycle: {}", cycle.cycle_path());
        }
    }
}

fn analyze(path: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let solution = load_solution(path)?;
    let data = ExportData::new(&solution);

    match output {
        Some(file) => {
            let handle = File::create(file)
                .with_context(|| format!("Failed to create '{}'", file.display()))?;
            let mut writer = BufWriter::new(handle);
            export::export(format, &data, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export::export(format, &data, &mut writer)?;
        }
    }

    Ok(())
}

fn order(path: &Path) -> Result<()> {
    let solution = load_solution(path)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    for project in &solution.projects {
        writeln!(writer, "{}", project.name)?;
    }

    Ok(())
}

fn load_solution(path: &Path) -> Result<SolutionItem> {
    let solution_path = find_solution(path)?;
    debug!("Using solution {}", solution_path.display());

    Ok(parser::parse_file(&solution_path)?)
}

/// Returns `path` itself when it is a file, otherwise the single `.sln`
/// directly inside the directory.
fn find_solution(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("Path '{}' does not exist", path.display());
    }

    let solutions: Vec<PathBuf> = WalkDir::new(path)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sln"))
        })
        .collect();

    match solutions.as_slice() {
        [] => bail!("No solution file found in '{}'", path.display()),
        [single] => Ok(single.clone()),
        many => bail!(
            "Found {} solution files in '{}', pass one explicitly: {}",
            many.len(),
            path.display(),
            many.iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
