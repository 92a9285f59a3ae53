use clap::{Args, Parser, Subcommand};
use notizen_core::{AppConfig, Depth};

#[derive(Debug, Parser)]
#[command(name = "notizen")]
#[command(about = "Organize dated notes, compile them and build an index", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Organize notes, compile them and write index.html
    Build,
    /// Move dated notes into year/month/day folders only
    Organize,
    /// Print configuration values
    PrintConfig,
}

/// Command line values that take precedence over the loaded configuration.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Notes directory
    #[arg(short, long, global = true)]
    pub directory: Option<String>,

    /// Index grouping: year, month or week
    #[arg(long, global = true)]
    pub depth: Option<Depth>,

    /// Command converting a note to HTML on stdout
    #[arg(long, global = true)]
    pub markdown_command: Option<String>,

    /// Extension of notes to compile
    #[arg(long, global = true)]
    pub markdown_extension: Option<String>,

    /// Delay between completion checks of running jobs
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Maximum number of conversion processes running at once
    #[arg(long, global = true)]
    pub max_jobs: Option<usize>,

    /// Directory containing an index.html template
    #[arg(long, global = true)]
    pub templates: Option<String>,

    /// Also consider hidden files and directories
    #[arg(long, global = true)]
    pub include_hidden: bool,

    /// Skip compiling notes
    #[arg(long, global = true)]
    pub no_compile: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(directory) = self.directory {
            config.directory = directory;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(command) = self.markdown_command {
            config.markdown_command = command;
        }
        if let Some(extension) = self.markdown_extension {
            config.markdown_extension = extension;
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        if self.max_jobs.is_some() {
            config.max_jobs = self.max_jobs;
        }
        if self.templates.is_some() {
            config.template_dir = self.templates;
        }
        if self.include_hidden {
            config.include_hidden = true;
        }
        if self.no_compile {
            config.compile = false;
        }
    }
}
