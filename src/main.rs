use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki2html::config::{self, WikiConfig};
use wiki2html::output;
use wiki2html::transform::WikiToHtml;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "wiki2html")]
#[command(about = "Convert a git wiki into HTML pages and navigation menus")]
#[command(long_about = "\
Convert a git wiki into HTML pages and navigation menus

Filenames are the data source. Each markdown page becomes an HTML page of the
same name, and the separator in its name places it in the menu tree.

Wiki structure:

  wiki/
  ├── wiki.toml                         # Options (optional)
  ├── en:Help.md                        # Category page  → en:Help.html
  ├── en:Help:Getting-Started.md        # Menu item      → en:Help:Getting-Started.html
  ├── en:Help:Guides:Install.md         # Nested item under the `Guides` category
  ├── fr_ca:Help:Guides:Install.md      # Same page, Canadian French menu
  └── Home.md                           # No locale = not published

Output:

  dist/
  ├── en:Help.html
  ├── en:Help:Getting-Started.html
  ├── en:_menu_.html                    # One menu per locale
  └── fr_ca:_menu_.html

Menu order: pages listed in [rules] order first, then descending by name.

Run 'wiki2html gen-config' to generate a documented wiki.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Wiki directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Config file (default: <source>/wiki.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (otherwise RUST_LOG applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform every page and write the menus
    Build,
    /// Show the menu tree without writing anything
    Check,
    /// Print a stock wiki.toml with all options documented
    GenConfig,
    /// Print the translation table as JSON
    Translations,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            let config = resolve_config(&cli)?;
            std::fs::create_dir_all(&cli.output)?;

            println!(
                "==> Transforming {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let mut wiki = WikiToHtml::new(&cli.source, &cli.output, config)?;
            let report = wiki.transform()?;
            output::print_transform_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            println!("==> Checking {}", cli.source.display());
            let mut wiki = WikiToHtml::new(&cli.source, &cli.output, config)?;
            let files = wiki.load_files()?.to_vec();
            let tree = wiki.build_menu_tree(&files);
            output::print_check_output(&tree, wiki.config().multilang);
            println!("==> Wiki is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Translations => {
            let config = resolve_config(&cli)?;
            let mut wiki = WikiToHtml::new(&cli.source, &cli.output, config)?;
            wiki.load_files()?;
            let json = serde_json::to_string_pretty(&wiki.translation_table())?;
            println!("{json}");
        }
    }

    Ok(())
}

/// `--config` if given, else `wiki.toml` in the source directory.
fn resolve_config(cli: &Cli) -> Result<WikiConfig, config::ConfigError> {
    match &cli.config {
        Some(path) if !path.exists() => Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        )
        .into()),
        Some(path) => config::load_config_file(path),
        None => config::load_config(&cli.source),
    }
}
