use crate::error::Error;
use crate::index::group::Group;
use minijinja::{path_loader, Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const INDEX_TEMPLATE: &str = "index.html";

const BUNDLED_INDEX: &str = include_str!("../../templates/index.html");

/// Everything the index template can see.
#[derive(Debug, Serialize)]
pub struct IndexContext<'a> {
    pub notes: &'a [Group],
    pub libraries: &'a [String],
}

/// Somewhere `index.html` templates can be loaded from.
pub trait TemplateSource {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    fn environment(&self) -> Result<Environment<'static>, Error>;
}

/// Templates read from a user-supplied directory.
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirectoryTemplates {
    fn name(&self) -> &str {
        "directory"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn environment(&self) -> Result<Environment<'static>, Error> {
        let mut env = Environment::new();
        env.set_loader(path_loader(self.root.clone()));
        Ok(env)
    }
}

/// Templates compiled into the binary.
pub struct BundledTemplates;

impl TemplateSource for BundledTemplates {
    fn name(&self) -> &str {
        "bundled"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn environment(&self) -> Result<Environment<'static>, Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, BUNDLED_INDEX)?;
        Ok(env)
    }
}

/// First available source of: the override directory, then the bundled templates.
pub fn resolve_template_source(override_dir: Option<&Path>) -> Box<dyn TemplateSource> {
    let mut chain: Vec<Box<dyn TemplateSource>> = Vec::with_capacity(2);
    if let Some(dir) = override_dir {
        chain.push(Box::new(DirectoryTemplates::new(dir)));
    }
    chain.push(Box::new(BundledTemplates));

    let source = chain
        .into_iter()
        .find(|source| source.is_available())
        .unwrap_or_else(|| Box::new(BundledTemplates));
    debug!("Using {} templates", source.name());
    source
}

/// Renders `index.html`. Referencing anything missing from the context is an error.
pub fn render_index(source: &dyn TemplateSource, context: &IndexContext) -> Result<String, Error> {
    let mut env = source.environment()?;
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    let template = env.get_template(INDEX_TEMPLATE)?;
    Ok(template.render(context)?)
}
