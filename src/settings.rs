use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub summary_path: PathBuf,
    /// Worker threads; 0 lets rayon decide.
    pub threads: usize,
    pub pretty: bool,
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub pretty: bool,
}

impl Settings {
    /// Defaults, then `forum_parser.{toml,yaml,json}`, then `FORUM_*` env vars.
    pub fn load() -> Result<Self> {
        Self::load_with_prefix("FORUM")
    }

    fn load_with_prefix(prefix: &str) -> Result<Self> {
        Config::builder()
            .set_default("input_dir", "html_files")?
            .set_default("output_dir", "json_files")?
            .set_default("summary_path", "total_counts.txt")?
            .set_default("threads", 0_i64)?
            .set_default("pretty", false)?
            .add_source(File::with_name("forum_parser").required(false))
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn apply(mut self, o: Overrides) -> Self {
        if let Some(p) = o.input_dir {
            self.input_dir = p;
        }
        if let Some(p) = o.output_dir {
            self.output_dir = p;
        }
        if let Some(p) = o.summary_path {
            self.summary_path = p;
        }
        if let Some(n) = o.threads {
            self.threads = n;
        }
        self.pretty |= o.pretty;
        self
    }
}
