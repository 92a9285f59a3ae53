use crate::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// One running conversion process.
///
/// Identity is `id`, a launch sequence number, never the invocation text:
/// two sources may well produce identical command lines.
pub struct Job {
    pub id: usize,
    /// Position of the source in the scheduler's file list.
    pub index: usize,
    pub source: PathBuf,
    pub output: PathBuf,
    pub invocation: String,
    child: Child,
    reaped: bool,
}

impl Job {
    /// Opens `output` and starts `args + [source]` with stdout redirected into it.
    pub fn launch(
        id: usize,
        index: usize,
        args: &[String],
        source: &Path,
        output: PathBuf,
    ) -> Result<Job, Error> {
        let invocation = invocation_string(args, source);
        let (program, program_args) = args
            .split_first()
            .ok_or_else(|| Error::Command("empty command".to_string()))?;

        let outfile = File::create(&output).map_err(|source| Error::Output {
            path: output.clone(),
            invocation: invocation.clone(),
            source,
        })?;

        // The Command owns the only parent-side handle and drops it on return.
        let spawned = Command::new(program)
            .args(program_args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::from(outfile))
            .spawn();

        let child = match spawned {
            Ok(child) => child,
            Err(source_err) => {
                remove_output(&output);
                return Err(Error::Spawn {
                    invocation,
                    source: source_err,
                });
            }
        };

        debug!(job = id, pid = child.id(), "Launched `{}`", invocation);
        Ok(Job {
            id,
            index,
            source: source.to_path_buf(),
            output,
            invocation,
            child,
            reaped: false,
        })
    }

    /// Non-blocking completion check.
    pub fn poll(&mut self) -> Result<Option<ExitStatus>, Error> {
        let status = self.child.try_wait().map_err(|source| Error::Poll {
            invocation: self.invocation.clone(),
            source,
        })?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }
}

impl Drop for Job {
    // Only reached with a live child when the scheduler bails out early.
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        warn!(job = self.id, "Killing unfinished `{}`", self.invocation);
        let _ = self.child.kill();
        let _ = self.child.wait();
        remove_output(&self.output);
    }
}

/// Shell-quoted rendering of the full command line, for logs and reports.
pub fn invocation_string(args: &[String], source: &Path) -> String {
    let source = source.to_string_lossy();
    args.iter()
        .map(String::as_str)
        .chain(std::iter::once(source.as_ref()))
        .map(|word| match shlex::try_quote(word) {
            Ok(quoted) => quoted.into_owned(),
            Err(_) => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn remove_output(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        warn!("Could not remove {}: {}", output.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_string_quotes_source() {
        let args = vec!["pandoc".to_string(), "-t".to_string(), "html".to_string()];
        let invocation = invocation_string(&args, Path::new("2023/06/15/my note.md"));
        assert_eq!(
            shlex::split(&invocation).unwrap(),
            vec!["pandoc", "-t", "html", "2023/06/15/my note.md"]
        );
        assert_eq!(
            invocation_string(&args, Path::new("plain.md")),
            "pandoc -t html plain.md"
        );
    }
}
