//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use specsift_crawler::{CrawlEngine, CrawlObserver, CrawlOutcome};
use specsift_shared::{CrawlConfig, config_file_path, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// specsift — find the API spec behind a documentation site.
#[derive(Parser)]
#[command(
    name = "specsift",
    version,
    about = "Discover and reconstruct OpenAPI/Swagger/Postman specs from documentation sites.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl a documentation site and reconstruct its API spec.
    Scan {
        /// Documentation URL to start from.
        url: String,

        /// Enable rendered (WebDriver) fetches from the first pass onward.
        #[arg(long)]
        render: bool,

        /// Visit only the given page; skip link extraction.
        #[arg(long)]
        single_page: bool,

        /// Hard ceiling on pages visited.
        #[arg(long)]
        max_pages: Option<usize>,

        /// Write the first reconstructed spec (canonical JSON) to this file.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Emit a machine-readable JSON report of all pages to stdout.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "specsift=info",
        1 => "specsift=debug",
        _ => "specsift=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            url,
            render,
            single_page,
            max_pages,
            out,
            json,
        } => cmd_scan(&url, render, single_page, max_pages, out.as_deref(), json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

async fn cmd_scan(
    url: &str,
    render: bool,
    single_page: bool,
    max_pages: Option<usize>,
    out: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let root = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;

    // CLI flags override config file values override defaults.
    let app_config = load_config()?;
    let mut config = CrawlConfig::from(&app_config);
    config.allow_render_initially = config.allow_render_initially || render;
    config.single_page = config.single_page || single_page;
    if let Some(n) = max_pages {
        config.max_pages = n;
    }

    info!(url, single_page = config.single_page, "starting scan");

    let engine = CrawlEngine::new(config)?;
    let progress = CliProgress::new();
    let outcome = engine.crawl(&root, &progress).await?;
    progress.finish();

    if let (Some(path), Some(spec)) = (out, outcome.first_spec()) {
        std::fs::write(path, &spec.canonical_json)
            .map_err(|e| eyre!("cannot write {}: {e}", path.display()))?;
        info!(path = %path.display(), "wrote canonical spec");
    }

    if json {
        let report = serde_json::json!({
            "pages": outcome.pages,
            "rendered_pass": outcome.rendered_pass,
            "pages_skipped": outcome.pages_skipped,
            "duration_ms": outcome.duration.as_millis(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &CrawlOutcome) {
    let specs: Vec<_> = outcome.pages.iter().filter_map(|p| p.spec.as_ref()).collect();

    println!();
    println!("  Pages visited: {}", outcome.pages.len());
    println!("  Pages skipped: {}", outcome.pages_skipped);
    println!("  Rendered:      {}", if outcome.rendered_pass { "yes" } else { "no" });
    println!("  Time:          {:.1}s", outcome.duration.as_secs_f64());

    if let Some(spec) = specs.first() {
        println!(
            "  Spec:          {} ({})",
            spec.source_url, spec.doc_type.kind
        );
    } else if let Some(spec_ref) = outcome.pages.iter().find_map(|p| p.spec_ref.as_ref()) {
        println!("  Spec:          referenced at {spec_ref} but could not be resolved");
    } else {
        println!("  Spec:          none found");
    }
    println!();
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    println!("# {}", config_file_path()?.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl CrawlObserver for CliProgress {
    fn pass_started(&self, rendered: bool) {
        self.spinner.set_message(if rendered {
            "Crawling (rendered)"
        } else {
            "Crawling (static)"
        });
    }

    fn page_visited(&self, url: &Url, visited: usize) {
        self.spinner.set_message(format!("Visited [{visited}] {url}"));
    }

    fn spec_discovered(&self, url: &Url) {
        self.spinner.set_message(format!("Found spec reference {url}"));
    }
}
