use crate::config::{Depth, DEFAULT_LIBRARY_URLS};
use crate::error::Error;
use crate::index::assets::{fetch_libraries, AssetFetcher, HttpFetcher};
use crate::index::group::group_paths;
use crate::index::template::{render_index, resolve_template_source, IndexContext};
use crate::scanner::walk::INDEX_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders `directory/index.html` from the notes and other files of a run.
pub struct IndexBuilder {
    directory: PathBuf,
    depth: Depth,
    template_dir: Option<PathBuf>,
    library_urls: Vec<String>,
    fetcher: Box<dyn AssetFetcher>,
}

impl IndexBuilder {
    pub fn new(directory: impl Into<PathBuf>, depth: Depth) -> Self {
        Self {
            directory: directory.into(),
            depth,
            template_dir: None,
            library_urls: DEFAULT_LIBRARY_URLS.iter().map(|u| u.to_string()).collect(),
            fetcher: Box::new(HttpFetcher::new()),
        }
    }

    pub fn with_template_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.template_dir = dir;
        self
    }

    pub fn with_library_urls(mut self, urls: Vec<String>) -> Self {
        self.library_urls = urls;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.directory.join(INDEX_FILE_NAME)
    }

    /// Groups `notes` and `others` together, renders them and overwrites the index.
    ///
    /// Nothing is written if rendering fails.
    pub fn build(&self, notes: &[PathBuf], others: &[PathBuf]) -> Result<PathBuf, Error> {
        let source = resolve_template_source(self.template_dir.as_deref());
        let libraries = fetch_libraries(&self.library_urls, &self.directory, self.fetcher.as_ref())?;

        let all: Vec<PathBuf> = notes.iter().chain(others).cloned().collect();
        let groups = group_paths(&all, &self.directory, self.depth);

        let rendered = render_index(
            source.as_ref(),
            &IndexContext {
                notes: &groups,
                libraries: &libraries,
            },
        )?;

        let path = self.index_path();
        write_index(&path, &rendered)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

fn write_index(path: &Path, contents: &str) -> Result<(), Error> {
    fs::write(path, contents).map_err(|source| Error::IndexWrite {
        path: path.to_path_buf(),
        source,
    })
}
