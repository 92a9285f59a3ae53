use crate::compiler::{self, CompileOptions, JobFailure};
use crate::config::AppConfig;
use crate::error::Error;
use crate::index::{AssetFetcher, HttpFetcher, IndexBuilder};
use crate::progress::ProgressReporter;
use crate::relocate::{self, Relocation};
use crate::scanner::ScanFilter;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct NoteEngine {
    config: AppConfig,
    fetcher: Option<Box<dyn AssetFetcher>>,
}

#[derive(Debug)]
pub struct RunResult {
    pub relocate_duration: Duration,
    pub compile_duration: Duration,
    pub index_duration: Duration,
    pub notes: usize,
    pub moved: usize,
    pub others: usize,
    pub compiled: usize,
    pub failures: Vec<JobFailure>,
    pub index_path: PathBuf,
}

impl NoteEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            fetcher: None,
        }
    }

    /// Replaces the HTTP asset fetcher.
    pub fn with_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Moves dated notes into place without compiling or indexing.
    pub fn organize(&self, reporter: &dyn ProgressReporter) -> Result<Relocation, Error> {
        let directory = self.config.directory_path();
        let filter = ScanFilter::new(self.config.include_hidden, &self.config.ignore_patterns);

        reporter.on_relocate_start();
        let start = Instant::now();
        let relocation = relocate::relocate(&directory, &filter)?;
        reporter.on_relocate_complete(
            relocation.notes.len(),
            relocation.moved,
            start.elapsed().as_secs_f64(),
        );
        Ok(relocation)
    }

    /// Full pipeline:
    /// 1. Relocate dated notes into `year/month/day`
    /// 2. Compile notes through the external converter
    /// 3. Render `index.html` over compiled notes and other files
    pub fn run(self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        let directory = self.config.directory_path();
        info!("Processing directory: {}", directory.display());

        // Phase 1: Relocate
        let relocate_start = Instant::now();
        let Relocation {
            notes,
            others,
            moved,
        } = self.organize(reporter)?;
        let relocate_duration = relocate_start.elapsed();
        let note_count = notes.len();

        // Phase 2: Compile
        let (indexed_notes, compiled, failures, compile_duration) = if self.config.compile {
            let options = CompileOptions {
                extension: self.config.markdown_extension.clone(),
                command: self.config.markdown_command.clone(),
                poll_interval: self.config.poll_interval(),
                max_jobs: self.config.max_jobs,
            };
            let report = compiler::compile_files(&notes, &options, reporter)?;
            let kept: Vec<PathBuf> = report
                .files
                .iter()
                .filter(|f| !report.is_failed(f))
                .cloned()
                .collect();
            if !report.failures.is_empty() {
                warn!(
                    "{} notes failed to compile and are left out of the index",
                    report.failures.len()
                );
            }
            (kept, report.compiled, report.failures, report.duration)
        } else {
            debug!("Compilation disabled");
            (notes, 0, Vec::new(), Duration::ZERO)
        };

        // Phase 3: Index
        let index_start = Instant::now();
        let fetcher = self.fetcher.unwrap_or_else(|| Box::new(HttpFetcher::new()));
        let builder = IndexBuilder::new(&directory, self.config.depth)
            .with_template_dir(self.config.template_dir.as_ref().map(PathBuf::from))
            .with_library_urls(self.config.library_urls.clone())
            .with_fetcher(fetcher);
        let index_path = builder.build(&indexed_notes, &others)?;
        let index_duration = index_start.elapsed();
        reporter.on_index_written(&index_path);

        Ok(RunResult {
            relocate_duration,
            compile_duration,
            index_duration,
            notes: note_count,
            moved,
            others: others.len(),
            compiled,
            failures,
            index_path,
        })
    }
}
