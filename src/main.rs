use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use codectx::config::{ConfigError, ExtractConfig, DEFAULT_MAX_LINES};
use codectx::{run, CancelToken, ReportFormat};

#[derive(Parser)]
#[command(
    name = "codectx",
    version,
    about = "Extract structural context from a React Native/TypeScript tree"
)]
struct Cli {
    /// Write the report here instead of stdout
    output: Option<PathBuf>,

    /// Project root to scan
    #[arg(long = "root-dir", default_value = ".")]
    root: PathBuf,

    /// Report encoding: plain, tree, outline or hypertext
    #[arg(short, long, default_value = "plain")]
    format: String,

    /// Budget for the report's reportable lines
    #[arg(long, default_value_t = DEFAULT_MAX_LINES)]
    max_lines: usize,

    /// Flag render-performance issues in component bodies
    #[arg(long = "analyze-performance")]
    performance: bool,

    /// Flag platform-specific issues in component bodies
    #[arg(long = "analyze-platform")]
    platform: bool,

    /// Track state handed from components to children
    #[arg(long = "track-data-flow")]
    data_flow: bool,

    /// Extra directory fragment to exclude (repeatable)
    #[arg(long = "exclude", value_name = "PATH")]
    exclude: Vec<String>,

    /// Extra directory to include (repeatable)
    #[arg(long = "include", value_name = "PATH")]
    include: Vec<String>,
}

static INTERRUPT_TOKEN: OnceCell<CancelToken> = OnceCell::new();

#[cfg(unix)]
fn install_interrupt_handler(cancel: &CancelToken) {
    extern "C" fn on_interrupt(_: libc::c_int) {
        if let Some(token) = INTERRUPT_TOKEN.get() {
            token.cancel();
        }
    }
    let _ = INTERRUPT_TOKEN.set(cancel.clone());
    unsafe {
        libc::signal(libc::SIGINT, on_interrupt as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler(_cancel: &CancelToken) {}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = ReportFormat::from_name(&cli.format)
        .ok_or_else(|| ConfigError::UnknownFormat(cli.format.clone()))?;

    let config = ExtractConfig {
        format,
        max_lines: cli.max_lines,
        enable_performance_heuristics: cli.performance,
        enable_platform_heuristics: cli.platform,
        enable_data_flow_tracking: cli.data_flow,
        ..ExtractConfig::default()
    }
    .with_extra_paths(cli.exclude, cli.include);

    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel);

    let outcome = run(&cli.root, &config, &cancel)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, outcome.report.as_bytes())
                .with_context(|| format!("writing report to {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(outcome.report.as_bytes())
                .context("writing report to stdout")?;
            if !outcome.report.ends_with('\n') {
                handle.write_all(b"\n").context("writing report to stdout")?;
            }
        }
    }

    Ok(())
}
