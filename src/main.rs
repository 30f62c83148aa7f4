use anyhow::{Context, Result};
use citation_fetcher::config::{find_config_file, get_config, load_config, Config};
use citation_fetcher::io::{download_link, read_csv_file, read_dois, to_csv, write_csv};
use citation_fetcher::models::{CitationStyle, CitationTable};
use citation_fetcher::pipeline::{collect_citations_with_stats, DuplicateKeyPolicy, Normalizer};
use citation_fetcher::sources::CrossCiteSource;
use citation_fetcher::ui::{self, Status};
use citation_fetcher::utils::{HttpClient, ProgressReporter};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Citation Fetcher - Turn a list of DOIs into formatted citations
#[derive(Parser, Debug)]
#[command(name = "citation-fetcher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch formatted citations for a list of DOIs and export them as CSV", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format for the citation preview
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configuration)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// One citation per line
    Plain,
    /// CSV with a single Citation column
    Csv,
    /// No preview
    None,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch citations for every DOI in a CSV, TSV, TXT or JSON file
    #[command(alias = "f")]
    Fetch {
        /// File with a DOI column
        input: PathBuf,

        /// Citation style (ieee, apa, vancouver, chicago-author-date, elsevier-harvard,
        /// modern-language-association)
        #[arg(long, short)]
        style: Option<CitationStyle>,

        /// Where to write the CSV (default: citations.csv)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also print an HTML download link with the CSV embedded as a data URI
        #[arg(long)]
        link: bool,

        /// How repeated keys of the repair table apply (sequential, last-wins)
        #[arg(long)]
        duplicate_keys: Option<DuplicateKeyPolicy>,

        /// Base URL of the formatting service
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Re-run character repair over an exported citations CSV
    #[command(alias = "n")]
    Normalize {
        /// CSV with a Citation column
        input: PathBuf,

        /// Where to write the repaired CSV (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// How repeated keys of the repair table apply (sequential, last-wins)
        #[arg(long)]
        duplicate_keys: Option<DuplicateKeyPolicy>,
    },

    /// List supported citation styles
    Styles,

    /// Show the effective configuration, or write a default config file
    Config {
        /// Write a default configuration to this path
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("citation_fetcher={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()?
    };

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    match cli.command {
        Commands::Fetch {
            input,
            style,
            out,
            link,
            duplicate_keys,
            base_url,
        } => {
            if let Some(style) = style {
                config.citation.style = style;
            }
            if let Some(policy) = duplicate_keys {
                config.citation.duplicate_keys = policy;
            }
            if let Some(base_url) = base_url {
                config.http.base_url = base_url;
            }
            if let Some(out) = out {
                config.output.path = out;
            }

            run_fetch(&config, &input, cli.output, cli.quiet, link).await?;
        }

        Commands::Normalize {
            input,
            out,
            duplicate_keys,
        } => {
            let policy = duplicate_keys.unwrap_or(config.citation.duplicate_keys);
            let citations = read_csv_file(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let repaired = Normalizer::new(policy).normalize(&citations);

            match out {
                Some(path) => {
                    write_csv(&path, &repaired)?;
                    if !cli.quiet {
                        ui::print_status(
                            Status::Success,
                            &format!("Saved {} citations to {}", repaired.len(), path.display()),
                        );
                    }
                }
                None => print!("{}", to_csv(&repaired)?),
            }
        }

        Commands::Styles => match cli.output {
            OutputFormat::Json => {
                let styles: Vec<&str> = CitationStyle::ALL.iter().map(|s| s.id()).collect();
                println!("{}", serde_json::to_string_pretty(&styles)?);
            }
            OutputFormat::Table => println!("{}", ui::style_table()),
            OutputFormat::Auto if ui::is_terminal() => println!("{}", ui::style_table()),
            _ => {
                for style in CitationStyle::ALL {
                    println!("{}", style.id());
                }
            }
        },

        Commands::Config { init } => match init {
            Some(path) => {
                Config::default().save(&path)?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote default configuration to {}", path.display()),
                    );
                }
            }
            None => print!("{}", config.to_toml()?),
        },
    }

    Ok(())
}

async fn run_fetch(
    config: &Config,
    input: &std::path::Path,
    output: OutputFormat,
    quiet: bool,
    link: bool,
) -> Result<()> {
    let dois = read_dois(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mut builder = HttpClient::builder()
        .timeout(config.http.timeout())
        .connect_timeout(config.http.connect_timeout());
    if let Some(user_agent) = &config.http.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    let client = builder.build().context("Failed to create HTTP client")?;

    let source = CrossCiteSource::with_client(Arc::new(client))
        .base_url(config.http.base_url.clone())
        .lang(config.citation.lang.clone());

    if !quiet {
        ui::print_status(
            Status::Info,
            &format!(
                "Fetching {} citations in {} style. This may take several minutes for long lists.",
                dois.len(),
                config.citation.style.name()
            ),
        );
    }

    let reporter = if quiet || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        ProgressReporter::quiet("Fetching citations", dois.len())
    } else {
        ProgressReporter::new("Fetching citations", dois.len())
    };

    let (table, stats) = collect_citations_with_stats(
        &source,
        &dois,
        config.citation.style,
        config.citation.duplicate_keys,
        reporter.callback(),
    )
    .await;
    reporter.finish();

    write_csv(&config.output.path, table.citations())
        .with_context(|| format!("Failed to write {}", config.output.path.display()))?;

    if !quiet {
        ui::print_status(
            Status::Download,
            &format!(
                "Saved {} of {} citations to {}",
                stats.succeeded,
                stats.requested,
                config.output.path.display()
            ),
        );
        if stats.failed > 0 {
            ui::print_status(
                Status::Warning,
                &format!("{} DOIs returned no citation and were left out", stats.failed),
            );
        }
    }

    output_citations(&table, output)?;

    if link {
        println!("{}", download_link(&to_csv(table.citations())?));
    }

    Ok(())
}

fn output_citations(table: &CitationTable, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if ui::is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table.citations())?);
        }
        OutputFormat::Plain => {
            for citation in table {
                println!("{}", citation.trim_end());
            }
        }
        OutputFormat::Csv => {
            print!("{}", to_csv(table.citations())?);
        }
        OutputFormat::Table => {
            if table.is_empty() {
                ui::print_status(Status::Warning, "No citations to show");
            } else {
                ui::print_section("Citations");
                println!("{}", ui::citation_table(table.citations(), ui::terminal_width()));
            }
        }
        OutputFormat::None => {}
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["citation-fetcher", "styles"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.timeout, None);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Styles));
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["citation-fetcher", "-v", "styles"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["citation-fetcher", "-vv", "styles"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_and_output() {
        let cli = Cli::parse_from(["citation-fetcher", "-q", "-o", "json", "styles"]);
        assert!(cli.quiet);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_fetch_defaults() {
        let cli = Cli::parse_from(["citation-fetcher", "fetch", "dois.csv"]);
        match cli.command {
            Commands::Fetch {
                input,
                style,
                out,
                link,
                duplicate_keys,
                base_url,
            } => {
                assert_eq!(input, PathBuf::from("dois.csv"));
                assert!(style.is_none());
                assert!(out.is_none());
                assert!(!link);
                assert!(duplicate_keys.is_none());
                assert!(base_url.is_none());
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_fetch_with_options() {
        let cli = Cli::parse_from([
            "citation-fetcher",
            "fetch",
            "dois.tsv",
            "--style",
            "chicago-author-date",
            "--out",
            "out.csv",
            "--link",
            "--duplicate-keys",
            "sequential",
            "--timeout",
            "60",
        ]);
        assert_eq!(cli.timeout, Some(60));
        match cli.command {
            Commands::Fetch {
                style,
                out,
                link,
                duplicate_keys,
                ..
            } => {
                assert_eq!(style, Some(CitationStyle::ChicagoAuthorDate));
                assert_eq!(out, Some(PathBuf::from("out.csv")));
                assert!(link);
                assert_eq!(duplicate_keys, Some(DuplicateKeyPolicy::Sequential));
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_style() {
        let result = Cli::try_parse_from(["citation-fetcher", "fetch", "d.csv", "-s", "harvard"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_normalize_command() {
        let cli = Cli::parse_from(["citation-fetcher", "normalize", "citations.csv"]);
        match cli.command {
            Commands::Normalize { input, out, .. } => {
                assert_eq!(input, PathBuf::from("citations.csv"));
                assert!(out.is_none());
            }
            _ => panic!("Expected Normalize command"),
        }
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["citation-fetcher", "config", "--init", "cf.toml"]);
        match cli.command {
            Commands::Config { init } => assert_eq!(init, Some(PathBuf::from("cf.toml"))),
            _ => panic!("Expected Config command"),
        }
    }
}
