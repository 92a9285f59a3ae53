pub mod classify;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod progress;
pub mod relocate;
pub mod scanner;

pub use config::{AppConfig, Depth};
pub use engine::{NoteEngine, RunResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
