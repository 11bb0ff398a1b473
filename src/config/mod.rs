mod config;

pub use config::{AlignerConfig, ClusteringConfig, Config};
