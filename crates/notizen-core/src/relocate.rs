use crate::classify::classify;
use crate::error::Error;
use crate::scanner::{self, ScanFilter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of organizing a directory.
#[derive(Debug, Default)]
pub struct Relocation {
    /// Final location of every dated note, rooted at the scanned directory.
    pub notes: Vec<PathBuf>,
    /// Every other scanned file, rooted at the scanned directory.
    pub others: Vec<PathBuf>,
    /// How many notes actually changed location.
    pub moved: usize,
}

/// Moves every dated note under `directory` into `directory/year/[month/[day/]]`.
///
/// Notes already in place are left alone, so a second run moves nothing.
/// The first filesystem error aborts the run; notes moved before it stay moved.
pub fn relocate(directory: &Path, filter: &ScanFilter) -> Result<Relocation, Error> {
    let files = scanner::list_files(directory, filter)?;
    debug!("Found {} files under {}", files.len(), directory.display());

    let mut result = Relocation::default();
    for file in files {
        let Some(file_name) = file.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(date) = classify(&file_name) else {
            result.others.push(file);
            continue;
        };

        let destination = directory.join(date.relative_dir()).join(&file_name);
        if file != destination {
            move_note(&file, &destination)?;
            result.moved += 1;
        }
        result.notes.push(destination);
    }

    info!(
        "Organized {} notes ({} moved), {} other files",
        result.notes.len(),
        result.moved,
        result.others.len()
    );
    Ok(result)
}

fn move_note(from: &Path, to: &Path) -> Result<(), Error> {
    let relocation_error = |source| Error::Relocation {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(relocation_error)?;
    }
    fs::rename(from, to).map_err(relocation_error)?;
    debug!("Moved {} -> {}", from.display(), to.display());
    Ok(())
}
