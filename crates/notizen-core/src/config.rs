use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LIBRARY_URLS: [&str; 2] = [
    "https://ajax.googleapis.com/ajax/libs/jquery/1.10.2/jquery.min.js",
    "https://ajax.googleapis.com/ajax/libs/jqueryui/1.10.3/jquery-ui.min.js",
];

/// Granularity of the index hierarchy below the year level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Year,
    #[default]
    Month,
    Week,
}

impl FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(Depth::Year),
            "month" => Ok(Depth::Month),
            "week" => Ok(Depth::Week),
            other => Err(format!(
                "unknown depth '{}', expected one of: year, month, week",
                other
            )),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Depth::Year => "year",
            Depth::Month => "month",
            Depth::Week => "week",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub directory: String,
    pub depth: Depth,
    pub markdown_extension: String,
    pub markdown_command: String,
    pub poll_interval_ms: u64,
    pub max_jobs: Option<usize>,
    pub compile: bool,
    pub template_dir: Option<String>,
    pub library_urls: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub include_hidden: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            depth: Depth::default(),
            markdown_extension: ".md".to_string(),
            markdown_command: "markdown".to_string(),
            poll_interval_ms: 100,
            max_jobs: None,
            compile: true,
            template_dir: None,
            library_urls: DEFAULT_LIBRARY_URLS.iter().map(|u| u.to_string()).collect(),
            ignore_patterns: Vec::new(),
            include_hidden: false,
        }
    }
}

impl AppConfig {
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Defaults, then an optional `Notizen.{toml,yaml,json}`, then `NOTIZEN_*` env vars.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Notizen").required(false))
        .add_source(
            Environment::with_prefix("NOTIZEN")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("library_urls")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
