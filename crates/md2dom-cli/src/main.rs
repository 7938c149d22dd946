//! md2dom: CLI tool to convert Markdown into DOM-like JSON trees

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use md2dom_core::options::{COMMONMARK, FRONTMATTER, GFM, MATH};
use md2dom_core::{AstNode, Node, ParserOptions, ast_to_dom, parse_markdown};

use crate::config::{CONFIG_FILE_NAME, Config};

#[derive(Parser, Debug)]
#[command(name = "md2dom")]
#[command(about = "Convert Markdown into DOM-like JSON trees")]
#[command(version)]
#[command(after_help = "Examples:
  md2dom README.md                  # Print the tree of a single file
  md2dom README.md -o readme.json   # Write to a specific output file
  md2dom docs/ -o out/ -r           # Convert a directory recursively
  md2dom docs/ -o out/ -j4          # Use 4 parallel jobs
  md2dom tree.json --from-mdast     # Map an mdast JSON tree")]
struct Cli {
    /// Input Markdown file or directory
    #[arg(required_unless_present_any = ["schema", "init"])]
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to `_md2dom.toml` next to the input)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Enable GitHub Flavored Markdown
    #[arg(long)]
    gfm: bool,

    /// Enable math syntax
    #[arg(long)]
    math: bool,

    /// Enable YAML/TOML frontmatter
    #[arg(long)]
    frontmatter: bool,

    /// Turn off CommonMark-compliant parsing
    #[arg(long)]
    no_commonmark: bool,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Treat the input file as mdast JSON instead of Markdown
    #[arg(long)]
    from_mdast: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    schema: bool,

    /// Write a sample `_md2dom.toml` to the current directory and exit
    #[arg(long)]
    init: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Settings shared by every file of a run
struct Settings {
    options: ParserOptions,
    pretty: bool,
    extension: String,
    from_mdast: bool,
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }
    if cli.init {
        return write_sample_config();
    }

    let input = cli
        .input
        .as_deref()
        .context("An input file or directory is required")?;
    let config = load_config(&cli, input)?;
    let settings = settings_from(&cli, &config);

    if input.is_file() {
        convert_file(input, cli.output.as_deref(), &settings)?;
    } else if input.is_dir() {
        if settings.from_mdast {
            anyhow::bail!("--from-mdast only supports a single input file");
        }
        convert_directory(input, cli.output.as_deref(), cli.recursive, cli.jobs, &settings)?;
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG takes precedence over the flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn write_sample_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    fs::write(path, Config::sample().to_toml()?)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

/// Explicit `--config`, else `_md2dom.toml` beside the input
fn load_config(cli: &Cli, input: &Path) -> Result<Config> {
    if let Some(path) = &cli.config {
        return Config::load(path);
    }

    let dir = if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new("."))
    };
    let config = Config::load_from_dir(dir)?;
    if config.is_some() {
        log::info!("Using {}", dir.join(CONFIG_FILE_NAME).display());
    }
    Ok(config.unwrap_or_default())
}

/// Command-line flags override the config file
fn settings_from(cli: &Cli, config: &Config) -> Settings {
    let mut options = config.parser.to_options();
    if cli.no_commonmark {
        options = options.with(COMMONMARK, false);
    }
    let flags = [(GFM, cli.gfm), (MATH, cli.math), (FRONTMATTER, cli.frontmatter)];
    for (key, enabled) in flags {
        if enabled {
            options = options.with(key, true);
        }
    }

    Settings {
        options,
        pretty: config.pretty() && !cli.compact,
        extension: config.extension().to_string(),
        from_mdast: cli.from_mdast,
        quiet: cli.quiet,
    }
}

/// Convert a single file, writing to `output` or stdout
fn convert_file(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    log::debug!("Converting: {}", input.display());

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;
    let json = convert_content(&content, settings)?;

    match output {
        Some(output_path) => {
            write_output(output_path, &json)?;
            if !settings.quiet {
                println!("{}", output_path.display());
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Convert a directory of Markdown files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    jobs: Option<usize>,
    settings: &Settings,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_markdown_files(input, recursive)?;

    if files.is_empty() {
        if !settings.quiet {
            eprintln!("No Markdown files found in {}", input.display());
        }
        return Ok(());
    }

    log::info!("Found {} Markdown files", files.len());

    // Configure thread pool if jobs specified
    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Atomic counters for thread-safe progress tracking
    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir.join(relative).with_extension(&settings.extension);

            match convert_file_inner(file, &output_file, settings) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !settings.quiet {
                        println!("{}", output_file.display());
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    for (file, e) in &errors {
        eprintln!("Error converting {}: {:#}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !settings.quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

/// Inner conversion function that doesn't print (for parallel use)
fn convert_file_inner(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;
    let json = convert_content(&content, settings)?;
    write_output(output, &json)
}

fn write_output(output: &Path, json: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(output, json).with_context(|| format!("Failed to write: {}", output.display()))
}

/// Collect all Markdown files in a directory
fn collect_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") {
                    files.push(path);
                }
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_markdown_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

/// Core conversion function
fn convert_content(content: &str, settings: &Settings) -> Result<String> {
    let tree = if settings.from_mdast {
        let mdast: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse mdast JSON")?;
        ast_to_dom(&AstNode::from_json(&mdast))
    } else {
        let root = parse_markdown(content, Some(&settings.options))
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))?;
        Node::from(root)
    };

    let json = if settings.pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    };
    json.context("Failed to serialize tree")
}
