//! Converts note sources by running one external process per file.
//!
//! Jobs write their rendered output to stdout, which is redirected into the
//! output file. Completion is detected by polling: each sweep drains the
//! first finished job it finds and starts over; a sweep that finds nothing
//! sleeps for the poll interval.

pub mod job;

use crate::error::Error;
use crate::progress::ProgressReporter;
use job::Job;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub const OUTPUT_EXTENSION: &str = "html";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Extension selecting the files to convert, with or without the leading dot.
    pub extension: String,
    /// Shell-style command line; the source path is appended as the last argument.
    pub command: String,
    pub poll_interval: Duration,
    /// Cap on simultaneously running jobs. `None` launches every job at once.
    pub max_jobs: Option<usize>,
}

/// A conversion process that exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub source: PathBuf,
    /// Removed on failure, including any copy left by an earlier run.
    pub output: PathBuf,
    pub invocation: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

#[derive(Debug)]
pub struct CompileReport {
    /// The input list with each successfully converted source replaced by its output.
    pub files: Vec<PathBuf>,
    pub compiled: usize,
    pub failures: Vec<JobFailure>,
    pub duration: Duration,
}

impl CompileReport {
    /// True for a failed job's source and for its (now removed) output.
    pub fn is_failed(&self, path: &Path) -> bool {
        self.failures
            .iter()
            .any(|f| f.source == path || f.output == path)
    }
}

/// Converts every file in `files` whose extension matches, one process each.
///
/// Blocks until all launched jobs have exited. A job exiting non-zero is
/// logged and recorded in [`CompileReport::failures`]; its source keeps its
/// place in the output list. Launch or polling errors abort the batch, and
/// jobs still running at that point are killed.
pub fn compile_files(
    files: &[PathBuf],
    options: &CompileOptions,
    reporter: &dyn ProgressReporter,
) -> Result<CompileReport, Error> {
    let start = Instant::now();
    let args = shlex::split(&options.command)
        .ok_or_else(|| Error::Command(format!("unbalanced quoting in '{}'", options.command)))?;
    if args.is_empty() {
        return Err(Error::Command("empty command".to_string()));
    }

    let extension = options.extension.trim_start_matches('.');
    if extension.is_empty() || extension == OUTPUT_EXTENSION {
        return Err(Error::Command(format!(
            "cannot compile '.{}' files into '.{}'",
            extension, OUTPUT_EXTENSION
        )));
    }
    let mut queue: VecDeque<(usize, &PathBuf)> = files
        .iter()
        .enumerate()
        .filter(|(_, f)| f.extension().map_or(false, |e| e == extension))
        .collect();
    let total = queue.len();
    let cap = options.max_jobs.unwrap_or(usize::MAX).max(1);

    info!("Compiling {} of {} files", total, files.len());
    reporter.on_compile_start(total);

    let mut report = CompileReport {
        files: files.to_vec(),
        compiled: 0,
        failures: Vec::new(),
        duration: Duration::ZERO,
    };
    let mut live: Vec<Job> = Vec::new();
    let mut next_id = 0;
    let mut finished = 0;

    loop {
        while live.len() < cap {
            let Some((index, source)) = queue.pop_front() else {
                break;
            };
            let output = source.with_extension(OUTPUT_EXTENSION);
            live.push(Job::launch(next_id, index, &args, source, output)?);
            next_id += 1;
        }

        if live.is_empty() {
            break;
        }

        match first_finished(&mut live)? {
            Some((position, status)) => {
                let job = live.remove(position);
                handle_exit(job, status, &mut report);
                finished += 1;
                reporter.on_job_complete(finished, total);
            }
            None => thread::sleep(options.poll_interval),
        }
    }

    report.duration = start.elapsed();
    info!(
        "Compiled {} files, {} failed in {:.2}s",
        report.compiled,
        report.failures.len(),
        report.duration.as_secs_f64()
    );
    reporter.on_compile_complete(
        report.compiled,
        report.failures.len(),
        report.duration.as_secs_f64(),
    );
    Ok(report)
}

/// One polling sweep: the position of the first exited job, if any.
fn first_finished(live: &mut [Job]) -> Result<Option<(usize, ExitStatus)>, Error> {
    for (position, job) in live.iter_mut().enumerate() {
        if let Some(status) = job.poll()? {
            return Ok(Some((position, status)));
        }
    }
    Ok(None)
}

fn handle_exit(job: Job, status: ExitStatus, report: &mut CompileReport) {
    if status.success() {
        debug!(job = job.id, "Compiled {}", job.output.display());
        report.files[job.index] = job.output.clone();
        report.compiled += 1;
        return;
    }

    error!(
        job = job.id,
        "{} returned with value {}",
        job.invocation,
        status
            .code()
            .map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
    );
    job::remove_output(&job.output);
    report.failures.push(JobFailure {
        source: job.source.clone(),
        output: job.output.clone(),
        invocation: job.invocation.clone(),
        exit_code: status.code(),
    });
}
