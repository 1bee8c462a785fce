// Configuration loading

pub mod settings;

pub use settings::{DataPaths, Settings};
