pub mod assets;
pub mod builder;
pub mod group;
pub mod template;

pub use assets::{fetch_libraries, AssetFetcher, HttpFetcher};
pub use builder::IndexBuilder;
pub use group::{group_paths, Group, Note, SortKey};
pub use template::{resolve_template_source, IndexContext, TemplateSource};
