//! Runlens: test-execution report viewer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use runlens::config::{load_config, log_filter, Config, CONFIG_FILENAME};
use runlens::export::{run_status, ConsoleReporter, HtmlExporter, JsonReporter};
use runlens::loader::ResultDir;
use runlens::render::log_window_document;
use runlens::watcher::ResultWatcher;
use runlens::{Report, Status};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Runlens: render a collected test-execution report as an interactive page
#[derive(Parser, Debug)]
#[command(name = "runlens")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Result directory or result document (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output HTML file (default: report.html in the result directory)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Page title of the exported report
    #[arg(long)]
    title: Option<String>,

    /// Print a JSON summary instead of the console summary
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (one line per export)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (failed tests, log names, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .runlensrc.json in the result directory and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit 1 when the run's execution status is not a pass
    #[arg(long)]
    fail_on_failure: bool,

    /// Watch result.json and the logs directory and re-export on change
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .runlensrc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print the standalone log view for one captured log
    Log {
        /// Result directory or result document
        path: PathBuf,

        /// Log name as shown in the report's log selector
        name: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init { dir } => run_init(dir.as_deref()),
            Commands::Log { path, name } => run_log(&path, &name, args.config.as_deref()),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a result path is required");
    };

    if args.watch {
        return run_watch(&args, &path);
    }

    let (dir, config) = open(&path, &args)?;
    let report = load(&dir, &config)?;
    let written = export(&dir, &config, &args, &report)?;
    print_summary(&args, &report, &written);

    if config.fail_on_failure() && run_status(&report) == Status::Fail {
        if !args.quiet && !args.json {
            eprintln!(
                "\n{}: execution status is {}",
                "Failed".red().bold(),
                "Fail".red()
            );
        }
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Locate the result directory and load its config (CLI flags override config file)
fn open(path: &Path, args: &Args) -> Result<(ResultDir, Config)> {
    let dir = ResultDir::open(path)?;
    let config = load_config(dir.root(), args.config.as_deref())?.merge_with_cli(
        args.title.clone(),
        args.output.as_ref().map(|p| p.display().to_string()),
        args.fail_on_failure,
    );
    Ok((dir, config))
}

fn load(dir: &ResultDir, config: &Config) -> Result<Report> {
    let filter = log_filter(&config.logs)?;
    Ok(dir.load(config.logs.dir(), &filter)?)
}

/// A CLI `--output` is taken as given; a configured one is relative to the result directory
fn output_path(dir: &ResultDir, config: &Config, args: &Args) -> PathBuf {
    match &args.output {
        Some(p) => p.clone(),
        None => dir.root().join(config.output()),
    }
}

fn export(dir: &ResultDir, config: &Config, args: &Args, report: &Report) -> Result<PathBuf> {
    let out = output_path(dir, config, args);
    let html = HtmlExporter::new().export(report, config);
    std::fs::write(&out, html)
        .with_context(|| format!("Failed to write report to {}", out.display()))?;
    log::debug!("wrote {}", out.display());
    Ok(out)
}

fn print_summary(args: &Args, report: &Report, written: &Path) {
    if args.json {
        println!("{}", JsonReporter::new().pretty().report(report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(report);
    } else {
        let reporter = if args.verbose {
            ConsoleReporter::new().verbose()
        } else {
            ConsoleReporter::new()
        };
        reporter.report(report);
        eprintln!("{}: Wrote {}", "Info".blue(), written.display());
    }
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = r#"{
  "title": "Test Execution Report",
  "output": "report.html",
  "logs": {
    "dir": "logs",
    "include": ["**/*.log"],
    "ignore": []
  },
  "failOnFailure": false
}
"#;

    std::fs::write(&config_path, json).with_context(|| {
        format!("Failed to write config to {}", config_path.display())
    })?;

    println!(
        "{}: Created {}",
        "Done".green().bold(),
        config_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_log(path: &Path, name: &str, config_path: Option<&Path>) -> Result<ExitCode> {
    let dir = ResultDir::open(path)?;
    let config = load_config(dir.root(), config_path)?;
    let report = load(&dir, &config)?;

    let Some(entry) = report.logs.iter().find(|l| l.name == name) else {
        let known: Vec<&str> = report.logs.iter().map(|l| l.name.as_str()).collect();
        if known.is_empty() {
            anyhow::bail!("No log named {} (the report has no logs)", name);
        }
        anyhow::bail!("No log named {} (available: {})", name, known.join(", "));
    };
    print!("{}", log_window_document(entry));
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let (dir, config) = open(path, args)?;

    match load(&dir, &config).and_then(|r| export(&dir, &config, args, &r).map(|w| (r, w))) {
        Ok((report, written)) => print_summary(args, &report, &written),
        Err(e) => eprintln!("{}: {}", "Error".red(), e),
    }

    let watcher = ResultWatcher::watch(dir.root(), config.logs.dir())
        .context("Failed to create file watcher")?
        .with_result_file(dir.result_file())
        .ignoring(&output_path(&dir, &config, args));
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let paths = watcher.next_changes();
        if paths.is_empty() {
            continue;
        }
        for p in &paths {
            log::debug!("changed: {}", p.display());
        }
        match load(&dir, &config) {
            Ok(report) => match export(&dir, &config, args, &report) {
                Ok(written) => print_summary(args, &report, &written),
                Err(e) => eprintln!("{}: {}", "Error".red(), e),
            },
            Err(e) => eprintln!("{}: {}", "Error".red(), e),
        }
    }
}
