pub mod aligner;
pub mod cli;
pub mod clustering;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;

pub use error::PipelineError;
