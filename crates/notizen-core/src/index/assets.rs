use crate::error::Error;
use crate::scanner::walk::LIBRARY_DIR_NAME;
use reqwest::blocking::Client;
use reqwest::Url;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Downloads a single asset to a local path.
pub trait AssetFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<(), Error>;
}

/// Plain HTTP(S) GET into a temporary sibling, renamed into place when complete.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<(), Error> {
        let fetch_error = |source| Error::Fetch {
            url: url.to_string(),
            source,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;

        let partial = destination.with_extension("part");
        let mut file = File::create(&partial)?;
        if let Err(e) = response.copy_to(&mut file) {
            drop(file);
            let _ = fs::remove_file(&partial);
            return Err(fetch_error(e));
        }
        drop(file);
        fs::rename(&partial, destination)?;
        Ok(())
    }
}

/// File name an asset URL is stored under.
pub fn asset_file_name(url: &str) -> Result<String, Error> {
    let parsed = Url::parse(url).map_err(|e| Error::Asset(format!("invalid URL {}: {}", url, e)))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Asset(format!("URL {} has no file name", url)))
}

/// Makes sure every asset in `urls` exists under `directory/lib/`.
///
/// Files already present are never fetched again nor checked. Returns the
/// assets' paths relative to `directory`, in `urls` order.
pub fn fetch_libraries(
    urls: &[String],
    directory: &Path,
    fetcher: &dyn AssetFetcher,
) -> Result<Vec<String>, Error> {
    let lib_dir = directory.join(LIBRARY_DIR_NAME);
    fs::create_dir_all(&lib_dir)?;

    let mut libraries = Vec::with_capacity(urls.len());
    for url in urls {
        let file_name = asset_file_name(url)?;
        let destination = lib_dir.join(&file_name);
        if destination.exists() {
            debug!("{} already present", destination.display());
        } else {
            info!("Fetching {}", url);
            fetcher.fetch(url, &destination)?;
        }
        libraries.push(format!("{}/{}", LIBRARY_DIR_NAME, file_name));
    }
    Ok(libraries)
}
