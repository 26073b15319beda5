use clap::{Parser, Subcommand};
use scholar_site::{config, export, output, resolve, scan};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scholar-site")]
#[command(about = "Content pipeline for a personal academic website")]
#[command(long_about = "\
Content pipeline for a personal academic website

Markdown files with YAML front matter are validated against per-collection
schemas and exported as display-ready JSON for the page templates.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── publications/                # title, date, authors, journal required
  │   └── 2024-growth-laws.md
  ├── research/                    # title, description required
  │   └── growth.md                # publications: [2024-growth-laws]
  ├── software/                    # title, description required
  │   └── cellsize/index.md        # slug: cellsize
  └── writing/                     # title, description, date, tags required
      └── on-models.md             # draft: true hides it from export

Unknown front matter keys are errors. Publication slugs listed by research
and software entries that match no publication are dropped; 'check' lists them.

Run 'scholar-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".scholar-site-temp", global = true)]
    temp_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan and validate content into a manifest
    Scan,
    /// Run the full pipeline: scan → export
    Build,
    /// Validate content and report dangling references without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Exporting → {}", cli.output.display());
            let summary = export::export(&manifest, &cli.output)?;
            output::print_export_output(&summary, &cli.output);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            let dangling = resolve::dangling_references(&manifest);
            if !dangling.is_empty() {
                tracing::warn!("{} publication references do not resolve", dangling.len());
            }
            output::print_check_output(&dangling);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the global subscriber. `--verbose` raises the level to debug.
fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}
