pub mod cli;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod readers;
pub mod remote;
pub mod settings;
pub mod utils;

pub use error::{FetchError, Result};
