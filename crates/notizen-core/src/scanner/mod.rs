pub mod walk;

pub use walk::{is_generated, is_hidden, list_files, ScanFilter};
