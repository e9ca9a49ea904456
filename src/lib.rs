pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod layout;
pub mod links;
pub mod reformat;

pub use config::Config;
pub use error::{Error, Result};
pub use reformat::{Reformatter, ReformatSummary};
