//! Archive fidelity CLI
//!
//! Entry point for single-article checks, manifest batches and reference
//! extraction.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fidelity_cli::{extract_html, run_batch, verify_article, ArticleConfig, Manifest};
use fidelity_engine::VerifyConfig;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fidelity")]
#[command(version, about = "Verify archived articles against their live pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify one archived article
    Check(CheckArgs),
    /// Verify every article listed in a TOML manifest
    Batch {
        /// Manifest file
        #[arg(short, long)]
        manifest: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the reference content extracted from an HTML page as JSON
    Extract {
        /// HTML snapshot of the live page
        #[arg(long)]
        html: PathBuf,

        /// Article body selector
        #[arg(long)]
        selector: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Archived markdown to verify
    #[arg(short, long)]
    candidate: PathBuf,

    /// JSON capture of the live page
    #[arg(short, long, conflicts_with = "html", required_unless_present = "html")]
    reference: Option<PathBuf>,

    /// HTML snapshot of the live page
    #[arg(long)]
    html: Option<PathBuf>,

    /// Article body selector for --html
    #[arg(long, requires = "html")]
    selector: Option<String>,

    /// Minimum pass rate for an imperfect archive
    #[arg(long)]
    threshold: Option<f64>,

    /// Paragraphs checked from each end of the article
    #[arg(long)]
    paragraph_sample: Option<usize>,

    /// List items checked from the start
    #[arg(long)]
    list_sample: Option<usize>,

    /// Figures the archive must reference
    #[arg(long)]
    expected_figures: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the report, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    match cli.command {
        Command::Check(args) => check(args),
        Command::Batch { manifest, format } => {
            let manifest = Manifest::from_file(&manifest)?;
            tracing::info!("Verifying {} articles", manifest.articles.len());

            let summary = run_batch(&manifest);
            print_output(&summary, format, || summary.to_text())?;
            Ok(summary.exit_code() as u8)
        }
        Command::Extract { html, selector } => {
            let page = std::fs::read_to_string(&html)
                .with_context(|| format!("Failed to read HTML snapshot: {}", html.display()))?;
            let content = extract_html(&page, selector.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&content)?);
            Ok(0)
        }
    }
}

fn check(args: CheckArgs) -> anyhow::Result<u8> {
    let mut defaults = VerifyConfig::default();
    if let Some(n) = args.paragraph_sample {
        defaults.samples.paragraphs = n;
    }
    if let Some(n) = args.list_sample {
        defaults.samples.list_items = n;
    }

    let name = args
        .candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.candidate.display().to_string());
    let article = ArticleConfig {
        name,
        url: None,
        candidate: args.candidate,
        reference: args.reference,
        html: args.html,
        body_selector: args.selector,
        expected_figures: args.expected_figures,
        pass_threshold: args.threshold,
    };

    let outcome = verify_article(&article, &defaults)?;
    print_output(&outcome.report, args.format, || outcome.report.to_text())?;
    Ok(outcome.report.exit_code() as u8)
}

fn print_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
