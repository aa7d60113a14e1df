mod error;
mod loader;
mod parser;
mod pipeline;
mod record;
mod settings;
mod sink;
mod totals;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use settings::{Overrides, Settings};
use sink::JsonDirSink;

#[derive(Parser)]
#[command(
    name = "forum_archive_parser",
    about = "Convert archived forum pages into per-page JSON post records"
)]
struct Cli {
    /// Directory of archived pages (default: html_files)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Directory for per-page JSON (default: json_files)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Run summary file (default: total_counts.txt)
    #[arg(short, long)]
    summary: Option<PathBuf>,
    /// Worker threads (default: one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?.apply(Overrides {
        input_dir: cli.input,
        output_dir: cli.output,
        summary_path: cli.summary,
        threads: cli.threads,
        pretty: cli.pretty,
    });
    info!(?settings, "starting forum archive parser");

    if settings.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build_global()
            .context("Failed to set up worker pool")?;
    }

    let pages = pipeline::list_pages(&settings.input_dir)?;
    if pages.is_empty() {
        println!("No pages in {:?}.", settings.input_dir);
    } else {
        println!("Parsing {} pages...", pages.len());
    }

    let sink = JsonDirSink::new(
        settings.output_dir.clone(),
        settings.summary_path.clone(),
        settings.pretty,
    );
    let report = pipeline::run(&pages, &sink)?;
    report.print();
    println!("Totals written to {:?}", settings.summary_path);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    if !report.failures.is_empty() {
        anyhow::bail!("{} of {} pages failed", report.failures.len(), report.pages);
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
